use crate::baseline;
use crate::classifier::NumericClassifier;
use crate::config::FormatConfig;
use crate::docx::DocxPackage;
use crate::error::TypografError;
use crate::stages::{self, TextStage};
use crate::types::{Document, RunReport, StageReport};
use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;

/// Runs the full normalization pipeline over a document: formatting reset,
/// the lexical rewrite stages in canonical order, then numeric emphasis.
/// The first failing stage aborts the run; nothing is persisted after a fault.
pub struct DocumentFormatter {
    config: FormatConfig,
    stages: Vec<Box<dyn TextStage>>,
    classifier: NumericClassifier,
}

impl DocumentFormatter {
    pub fn new(config: FormatConfig) -> Self {
        let stages = stages::lexical_stages();
        Self::new_with_stages(config, stages)
    }

    /// Constructor with injectable stages, used by tests to exercise the
    /// abort path with a deliberately failing stage
    pub fn new_with_stages(config: FormatConfig, stages: Vec<Box<dyn TextStage>>) -> Self {
        let classifier = NumericClassifier::new(&config.classifier);
        Self {
            config,
            stages,
            classifier,
        }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Format one file end to end: open, parse, run the pipeline, persist.
    /// The output file is only written when every stage succeeded.
    pub fn format_file(&self, input: &Path, output: &Path) -> Result<RunReport, TypografError> {
        println!("📄 Formatting document: {}", input.display());

        let package = DocxPackage::open(input).map_err(TypografError::Input)?;
        let mut document = package.parse().map_err(TypografError::Input)?;
        println!("   {} text blocks (body + table cells)", document.block_count());

        let report = self.format_document(&mut document)?;

        package
            .write_formatted(&document, &self.config, output)
            .map_err(TypografError::Persist)?;
        println!("💾 Saved formatted document to: {}", output.display());

        Ok(report)
    }

    /// Run the pipeline over an already parsed document
    pub fn format_document(&self, document: &mut Document) -> Result<RunReport, TypografError> {
        let started_at = Utc::now();
        let blocks_total = document.block_count();
        let mut reports = Vec::new();

        reports.push(self.run_reset(document));

        for stage in &self.stages {
            let start = Instant::now();
            match self.run_lexical_stage(stage.as_ref(), document) {
                Ok(blocks_changed) => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    println!(
                        "✅ {}: {} blocks changed ({}ms)",
                        stage.name(),
                        blocks_changed,
                        elapsed_ms
                    );
                    reports.push(StageReport {
                        stage: stage.name().to_string(),
                        blocks_changed,
                        elapsed_ms,
                    });
                }
                Err(err) => {
                    println!("❌ {}: {}", stage.name(), err);
                    return Err(TypografError::stage(stage.name(), err));
                }
            }
        }

        reports.push(self.run_emphasis(document));

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            blocks_total,
            stages: reports,
        })
    }

    fn run_reset(&self, document: &mut Document) -> StageReport {
        let start = Instant::now();
        let mut blocks_changed = 0usize;
        for block in document.iter_blocks_mut() {
            if baseline::reset_formatting(block) {
                blocks_changed += 1;
            }
        }
        let elapsed_ms = start.elapsed().as_millis() as u64;
        println!("✅ reset-formatting: {} blocks changed ({}ms)", blocks_changed, elapsed_ms);
        StageReport {
            stage: "reset-formatting".to_string(),
            blocks_changed,
            elapsed_ms,
        }
    }

    /// Apply one lexical stage to the flattened text of every block.
    /// A changed block collapses to a single plain span.
    fn run_lexical_stage(&self, stage: &dyn TextStage, document: &mut Document) -> Result<usize> {
        let mut blocks_changed = 0usize;
        for block in document.iter_blocks_mut() {
            let text = block.flattened_text();
            if text.trim().is_empty() {
                continue;
            }
            let rewritten = stage.apply(&text)?;
            if rewritten != text {
                block.replace_text(rewritten);
                blocks_changed += 1;
            }
        }
        Ok(blocks_changed)
    }

    /// Re-partition every block into plain and emphasized spans
    fn run_emphasis(&self, document: &mut Document) -> StageReport {
        let start = Instant::now();
        let mut blocks_changed = 0usize;
        for block in document.iter_blocks_mut() {
            let text = block.flattened_text();
            block.spans = self.classifier.partition(&text);
            if block.has_emphasis() {
                blocks_changed += 1;
            }
        }
        let elapsed_ms = start.elapsed().as_millis() as u64;
        println!(
            "✅ number-emphasis: {} blocks with emphasized numbers ({}ms)",
            blocks_changed, elapsed_ms
        );
        StageReport {
            stage: "number-emphasis".to_string(),
            blocks_changed,
            elapsed_ms,
        }
    }
}
