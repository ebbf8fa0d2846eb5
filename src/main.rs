use clap::{Args, Parser, Subcommand};
use recruit_intake::config::AppConfig;
use recruit_intake::error::AppError;
use recruit_intake::telemetry;
use recruit_intake::workflows::recruitment::extraction::tools::tool_availability;
use recruit_intake::workflows::recruitment::{
    channel, run_consumer, Application, ApplicationId, ApplicationRepository, ApplicationRun,
    Document, DocumentId, DocumentKind, DocumentProcessor, DocumentReport, DocumentRepository,
    ExtractionRouter, JsonStore, ScreeningConfig, ScreeningEngine, ScreeningOutcome, Shortlist,
    StoredFile, SummaryGenerator, VacancyId, VacancyScreening, DEFAULT_SHORTLIST_THRESHOLD,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

type Processor = DocumentProcessor<JsonStore, JsonStore>;

#[derive(Parser, Debug)]
#[command(
    name = "recruit",
    about = "Extract, screen and summarise recruitment applications from the command line",
    version
)]
struct Cli {
    /// Override the record store file (defaults to RECRUIT_DATA_FILE)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register an application from a JSON file
    Register {
        file: PathBuf,
    },
    /// Register an uploaded document and run it through the processing queue
    Ingest(IngestArgs),
    /// Extract documents for an application and regenerate its summary
    Process {
        #[arg(long)]
        application: String,
        /// Re-extract every document, even those that already have text
        #[arg(long)]
        force: bool,
    },
    /// Extract a single document and refresh its application's summary
    ProcessDocument {
        document: String,
    },
    /// Score one application or every application of a vacancy
    Screen(ScreenArgs),
    /// Print an application's stored summary
    Summary {
        #[arg(long)]
        application: String,
        /// Regenerate the summary before printing
        #[arg(long)]
        refresh: bool,
    },
    /// Rank a vacancy's scored applications against a threshold
    Shortlist {
        #[arg(long)]
        vacancy: String,
        #[arg(long, default_value_t = DEFAULT_SHORTLIST_THRESHOLD)]
        threshold: f64,
    },
    /// Report whether the external OCR and PDF tools are installed
    Tools,
}

#[derive(Args, Debug)]
struct IngestArgs {
    #[arg(long)]
    application: String,
    /// Document kind, e.g. cv, cover_letter, academic_transcript
    #[arg(long, value_parser = parse_kind)]
    kind: DocumentKind,
    file: PathBuf,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ScreenArgs {
    #[arg(long)]
    application: Option<String>,
    #[arg(long)]
    vacancy: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.data.clone() {
        config.storage.data_file = path;
    }
    telemetry::init(&config.telemetry, cli.verbose)?;

    if let Command::Tools = cli.command {
        return report_tools(&config, cli.json);
    }

    let store = Arc::new(JsonStore::open(&config.storage.data_file)?);
    info!(?config.environment, data_file = %config.storage.data_file.display(), "record store opened");

    let processor = Arc::new(DocumentProcessor::new(
        store.clone(),
        store.clone(),
        ExtractionRouter::from_config(&config.extraction),
        SummaryGenerator::default(),
        ScreeningEngine::new(ScreeningConfig::default()),
    ));

    match cli.command {
        Command::Register { file } => register(&store, file, cli.json),
        Command::Ingest(args) => ingest(&store, processor, args, cli.json).await,
        Command::Process { application, force } => {
            let id = ApplicationId(application);
            let run = if force {
                processor.force_reprocess(&id)?
            } else {
                processor.process_application(&id)?
            };
            render_run(&run, cli.json)
        }
        Command::ProcessDocument { document } => {
            let report = processor.process_document(&DocumentId(document))?;
            render_reports(std::slice::from_ref(&report), cli.json)
        }
        Command::Screen(args) => screen(&processor, args, cli.json),
        Command::Summary {
            application,
            refresh,
        } => {
            let id = ApplicationId(application);
            let summary = if refresh {
                Some(processor.refresh_summary(&id)?)
            } else {
                store
                    .application(&id)?
                    .ok_or_else(|| AppError::Usage(format!("application {id} not found")))?
                    .summary
            };
            match summary {
                Some(text) => println!("{text}"),
                None => println!("No summary stored yet; run with --refresh."),
            }
            Ok(())
        }
        Command::Shortlist { vacancy, threshold } => {
            let shortlist = processor.shortlist(&VacancyId(vacancy), threshold)?;
            render_shortlist(&shortlist, cli.json)
        }
        Command::Tools => Ok(()),
    }
}

fn parse_kind(raw: &str) -> Result<DocumentKind, String> {
    DocumentKind::parse(raw).ok_or_else(|| format!("unknown document kind '{raw}'"))
}

fn register(store: &JsonStore, file: PathBuf, json: bool) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&file)?;
    let application: Application = serde_json::from_str(&raw)?;
    let id = store.insert_application(application)?;
    if json {
        print_json(&serde_json::json!({ "application_id": id }))
    } else {
        println!("Registered application {id}");
        Ok(())
    }
}

async fn ingest(
    store: &JsonStore,
    processor: Arc<Processor>,
    args: IngestArgs,
    json: bool,
) -> Result<(), AppError> {
    let path = std::fs::canonicalize(&args.file)?;
    let original_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let document_id = store.insert_document(Document {
        id: DocumentId(String::new()),
        application_id: ApplicationId(args.application),
        kind: args.kind,
        file: StoredFile {
            path,
            original_name,
        },
        extracted_text: String::new(),
        extraction: None,
        verification: None,
    })?;

    let (sender, receiver) = channel();
    let consumer = tokio::spawn(run_consumer(processor, receiver));
    sender.document_created(document_id.clone())?;
    drop(sender);
    let handled = consumer
        .await
        .map_err(|err| AppError::Usage(format!("event consumer stopped: {err}")))?;
    info!(handled, "document queue drained");

    let document = store_document(store, &document_id)?;
    if json {
        return print_json(&document);
    }
    println!(
        "Ingested {} [{}] {} ({})",
        document.id,
        document.kind.label(),
        document.file.original_name,
        document.extraction_status().label()
    );
    Ok(())
}

fn store_document(store: &JsonStore, id: &DocumentId) -> Result<Document, AppError> {
    store
        .document(id)?
        .ok_or_else(|| AppError::Usage(format!("document {id} not found")))
}

fn screen(processor: &Processor, args: ScreenArgs, json: bool) -> Result<(), AppError> {
    match (args.application, args.vacancy) {
        (Some(application), _) => {
            let outcome = processor.screen(&ApplicationId(application))?;
            if json {
                return print_json(&outcome);
            }
            render_outcome(&outcome);
            Ok(())
        }
        (None, Some(vacancy)) => {
            let screening = processor.screen_vacancy(&VacancyId(vacancy))?;
            if json {
                return print_json(&screening);
            }
            render_vacancy_screening(&screening);
            Ok(())
        }
        (None, None) => Err(AppError::Usage(
            "screen requires --application or --vacancy".to_string(),
        )),
    }
}

fn report_tools(config: &AppConfig, json: bool) -> Result<(), AppError> {
    let availability = tool_availability(&config.extraction);
    if json {
        let entries: Vec<_> = availability
            .iter()
            .map(|(tool, found)| serde_json::json!({ "tool": tool, "available": found }))
            .collect();
        return print_json(&entries);
    }
    println!("External tools");
    for (tool, found) in availability {
        let state = if found { "available" } else { "missing" };
        println!("- {tool}: {state}");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_run(run: &ApplicationRun, json: bool) -> Result<(), AppError> {
    if json {
        return print_json(run);
    }
    println!("Application {}", run.application_id);
    render_reports(&run.documents, false)?;
    println!("\n{}", run.summary);
    Ok(())
}

fn render_reports(reports: &[DocumentReport], json: bool) -> Result<(), AppError> {
    if json {
        return print_json(&reports);
    }
    if reports.is_empty() {
        println!("Documents: none");
        return Ok(());
    }
    println!("Documents");
    for report in reports {
        println!("- {}: {:?}", report.document_id, report.outcome);
    }
    Ok(())
}

fn render_outcome(outcome: &ScreeningOutcome) {
    println!(
        "Application {}: {:.2}/100",
        outcome.application_id, outcome.total_score
    );
    for component in &outcome.components {
        println!(
            "- {}: {:.2} ({})",
            component.factor.label(),
            component.weighted,
            component.notes
        );
    }
}

fn render_vacancy_screening(screening: &VacancyScreening) {
    println!(
        "Vacancy {}: {} scored, {} failed",
        screening.vacancy_id,
        screening.scored.len(),
        screening.failed.len()
    );
    for outcome in &screening.scored {
        println!("- {}: {:.2}", outcome.application_id, outcome.total_score);
    }
    for failure in &screening.failed {
        println!("- {}: failed ({})", failure.application_id, failure.reason);
    }
}

fn render_shortlist(shortlist: &Shortlist, json: bool) -> Result<(), AppError> {
    if json {
        return print_json(shortlist);
    }
    println!("Shortlist (threshold {:.2})", shortlist.threshold);
    if shortlist.qualified.is_empty() {
        println!("Qualified: none");
    } else {
        println!("Qualified");
        for entry in &shortlist.qualified {
            println!(
                "- {} {} ({}): {:.2}",
                entry.application_id, entry.name, entry.applicant_ref, entry.score
            );
        }
    }
    if !shortlist.below_threshold.is_empty() {
        println!("\nBelow threshold");
        for entry in &shortlist.below_threshold {
            println!("- {} {}: {:.2}", entry.application_id, entry.name, entry.score);
        }
    }
    if !shortlist.unscored.is_empty() {
        println!("\nUnscored");
        for id in &shortlist.unscored {
            println!("- {id}");
        }
    }
    Ok(())
}
