mod common;
mod extraction;
mod scoring;
