//! Sequential batch runner: parse, classify, extract, aggregate.

use std::path::PathBuf;
use std::sync::Arc;

use catalogist_core::{AppConfig, BatchReport, Dialect, FailedDocument, FieldMap, SourceDocument};

use crate::dialect::classify;
use crate::error::Result;
use crate::extractors::{Extractor, FindingAidExtractor, MarcExtractor, ModsExtractor};
use crate::lookup::UrlLookup;
use crate::nlp::NlpModel;
use crate::xml::Document;

/// Runs every document of a batch through its dialect's extractor.
///
/// Documents are handled one at a time, in input order.
pub struct Pipeline {
    finding_aids: FindingAidExtractor,
    marc: MarcExtractor,
    mods: ModsExtractor,
}

enum Outcome {
    Row(FieldMap),
    Skipped,
}

impl Pipeline {
    pub fn new(config: &AppConfig, nlp: Arc<dyn NlpModel>, lookup: Arc<dyn UrlLookup>) -> Self {
        Self {
            finding_aids: FindingAidExtractor::new(nlp, lookup, &config.heuristics),
            marc: MarcExtractor::new(),
            mods: ModsExtractor::new(),
        }
    }

    fn extractor(&self, dialect: Dialect) -> Option<&dyn Extractor> {
        match dialect {
            Dialect::FindingAid => Some(&self.finding_aids),
            Dialect::Marc => Some(&self.marc),
            Dialect::Mods => Some(&self.mods),
            Dialect::Unknown => None,
        }
    }

    pub async fn run(&self, sources: &[SourceDocument]) -> BatchReport {
        let mut report = BatchReport::new(sources.len());
        for source in sources {
            let outcome = self.process(source).await;
            record(&mut report, &source.name, outcome);
        }
        summarize(&report);
        report
    }

    /// Read and process files one at a time.
    ///
    /// A file that cannot be read is recorded as failed and the batch
    /// moves on to the next one.
    pub async fn run_files(&self, paths: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::new(paths.len());
        for path in paths {
            let outcome = match SourceDocument::read(path) {
                Ok(source) => self.process(&source).await,
                Err(e) => Err(e.into()),
            };
            record(&mut report, &SourceDocument::name_for(path), outcome);
        }
        summarize(&report);
        report
    }

    /// Classify without extracting.
    pub fn classify_source(source: &SourceDocument) -> Result<Dialect> {
        Ok(classify(&Document::from_source(source)?))
    }

    async fn process(&self, source: &SourceDocument) -> Result<Outcome> {
        let document = Document::from_source(source)?;
        let dialect = classify(&document);
        let Some(extractor) = self.extractor(dialect) else {
            return Ok(Outcome::Skipped);
        };
        let map = extractor.extract(&document).await?;
        tracing::debug!(document = %source.name, %dialect, "extracted");
        Ok(Outcome::Row(map))
    }
}

fn record(report: &mut BatchReport, name: &str, outcome: Result<Outcome>) {
    match outcome {
        Ok(Outcome::Row(map)) => {
            let dialect = map.dialect();
            let pushed = match report.table_mut(dialect) {
                Some(table) => table.push(map),
                None => Ok(()),
            };
            if let Err(e) = pushed {
                report.failed.push(failure(name, &e));
            }
        }
        Ok(Outcome::Skipped) => {
            tracing::warn!(document = %name, "unrecognized dialect, skipping");
            report.skipped.push(name.to_string());
        }
        Err(e) => {
            tracing::warn!(document = %name, error = %e, "document failed");
            report.failed.push(failure(name, &e));
        }
    }
}

fn summarize(report: &BatchReport) {
    tracing::info!(
        total = report.total,
        finding_aids = report.finding_aids.len(),
        marc = report.marc.len(),
        mods = report.mods.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "batch complete"
    );
}

fn failure(name: &str, error: &impl std::fmt::Display) -> FailedDocument {
    FailedDocument {
        name: name.to_string(),
        error: error.to_string(),
    }
}
