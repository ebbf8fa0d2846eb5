use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the intake pipeline.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub extraction: ExtractionConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_file = env::var("RECRUIT_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));

        let defaults = ExtractionConfig::default();
        let extraction = ExtractionConfig {
            tesseract_binary: env::var("OCR_TESSERACT_BIN").unwrap_or(defaults.tesseract_binary),
            ocr_language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr_language),
            pdftotext_binary: env::var("OCR_PDFTOTEXT_BIN").unwrap_or(defaults.pdftotext_binary),
            pdftoppm_binary: env::var("OCR_PDFTOPPM_BIN").unwrap_or(defaults.pdftoppm_binary),
            raster_dpi: parse_var("OCR_RASTER_DPI", defaults.raster_dpi)?,
            max_raster_pages: parse_var("OCR_MAX_PAGES", defaults.max_raster_pages)?,
            min_embedded_chars: parse_var("OCR_MIN_TEXT_CHARS", defaults.min_embedded_chars)?,
        };

        if extraction.raster_dpi == 0 {
            return Err(ConfigError::OutOfRange {
                key: "OCR_RASTER_DPI",
            });
        }
        if extraction.max_raster_pages == 0 {
            return Err(ConfigError::OutOfRange {
                key: "OCR_MAX_PAGES",
            });
        }

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            storage: StorageConfig { data_file },
            extraction,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

const DEFAULT_DATA_FILE: &str = "recruit-data.json";

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Where application and document records are kept between runs.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

/// External tooling and thresholds for the extraction stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub tesseract_binary: String,
    pub ocr_language: String,
    pub pdftotext_binary: String,
    pub pdftoppm_binary: String,
    pub raster_dpi: u32,
    pub max_raster_pages: u32,
    /// Embedded PDF text shorter than this (in characters) triggers the OCR fallback.
    pub min_embedded_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tesseract_binary: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
            pdftotext_binary: "pdftotext".to_string(),
            pdftoppm_binary: "pdftoppm".to_string(),
            raster_dpi: 200,
            max_raster_pages: 10,
            min_embedded_chars: 50,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    OutOfRange { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer (found '{value}')")
            }
            ConfigError::OutOfRange { key } => write!(f, "{key} must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}
