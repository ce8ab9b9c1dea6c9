//! Run orchestration: discover, extract, patch, write
//!
//! Each suite moves through `Discovered → Extracted → Patched` or ends in a
//! failed state for the artifact whose anchor could not be found. Failures are
//! recorded in the report and never stop the remaining suites. Every artifact
//! is written at most once, after its in-memory buffer is final.

use serde::Serialize;

use crate::config::RegistrarConfig;
use crate::descriptor::patch_descriptor;
use crate::discovery::{discover_suites, TestSuite};
use crate::error::{RegistrarError, Result};
use crate::extract::{extract_test_cases, TestCase};
use crate::fs_utils::{read_text, write_atomic};
use crate::lines::LineBuffer;
use crate::suite_file::patch_suite_file;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Patch and write changed files
    Write,
    /// Patch in memory only and report whether anything is stale
    Check,
    /// Patch in memory only and report what would change
    DryRun,
}

impl RunMode {
    pub fn writes(&self) -> bool {
        matches!(self, RunMode::Write)
    }
}

/// What happened to one artifact of one suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatchOutcome {
    Unchanged,
    Updated,
    /// Registration block appended to the descriptor
    Inserted,
    /// Dispatch scaffolding generated in the suite file
    Synthesized,
    Failed { reason: String },
}

impl PatchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, PatchOutcome::Failed { .. })
    }

    pub fn is_change(&self) -> bool {
        matches!(
            self,
            PatchOutcome::Updated | PatchOutcome::Inserted | PatchOutcome::Synthesized
        )
    }

    pub fn label(&self) -> String {
        match self {
            PatchOutcome::Unchanged => "unchanged".to_string(),
            PatchOutcome::Updated => "updated".to_string(),
            PatchOutcome::Inserted => "inserted".to_string(),
            PatchOutcome::Synthesized => "synthesized".to_string(),
            PatchOutcome::Failed { reason } => format!("failed: {}", reason),
        }
    }

    fn from_error(err: RegistrarError) -> Self {
        tracing::warn!("{}", err);
        PatchOutcome::Failed {
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub suite: String,
    pub file: String,
    pub tests: Vec<String>,
    pub descriptor: PatchOutcome,
    pub suite_file: PatchOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: RunMode,
    pub root: String,
    pub descriptor: String,
    pub descriptor_changed: bool,
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.suites
            .iter()
            .map(|s| s.descriptor.is_failure() as usize + s.suite_file.is_failure() as usize)
            .sum()
    }

    /// Number of files that were (or would be) rewritten
    pub fn changed_files(&self) -> usize {
        self.descriptor_changed as usize
            + self
                .suites
                .iter()
                .filter(|s| s.suite_file.is_change())
                .count()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.changed_files() == 0 && self.failures() == 0
    }
}

/// A discovered suite with its extracted test cases
#[derive(Debug, Clone, Serialize)]
pub struct SuiteListing {
    #[serde(flatten)]
    pub suite: TestSuite,
    pub tests: Vec<TestCase>,
}

pub struct Registrar {
    config: RegistrarConfig,
}

impl Registrar {
    pub fn new(config: RegistrarConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegistrarConfig {
        &self.config
    }

    pub fn discover(&self) -> Result<Vec<TestSuite>> {
        discover_suites(&self.config.root, &self.config.discovery)
    }

    /// Suites and their test cases, without touching any file
    pub fn list(&self) -> Result<Vec<SuiteListing>> {
        self.discover()?
            .into_iter()
            .map(|suite| {
                let source = read_text(&suite.path)?;
                let tests = extract_test_cases(&source, &self.config.extract);
                Ok(SuiteListing { suite, tests })
            })
            .collect()
    }

    pub fn run(&self, mode: RunMode) -> Result<RunReport> {
        let descriptor_path = self.config.descriptor_path();
        let descriptor_label = self.config.descriptor.display().to_string();
        let descriptor_text = read_text(&descriptor_path)?;
        let mut descriptor = LineBuffer::from_text(&descriptor_text);

        let suites = self.discover()?;
        tracing::info!(
            "Synchronizing {} suite(s) in {}",
            suites.len(),
            self.config.root.display()
        );

        // Nothing is written until every suite has been read and patched
        let mut reports = Vec::with_capacity(suites.len());
        let mut pending = Vec::new();
        for suite in &suites {
            let (report, rewritten) = self.run_suite(suite, &mut descriptor, &descriptor_label)?;
            if let Some(buffer) = rewritten {
                pending.push((suite.path.as_path(), buffer));
            }
            reports.push(report);
        }

        let descriptor_changed = descriptor.to_text() != descriptor_text;
        if mode.writes() {
            for (path, buffer) in &pending {
                write_atomic(path, &buffer.to_text())?;
            }
            if descriptor_changed {
                write_atomic(&descriptor_path, &descriptor.to_text())?;
            }
        }

        Ok(RunReport {
            mode,
            root: self.config.root.display().to_string(),
            descriptor: descriptor_label,
            descriptor_changed,
            suites: reports,
        })
    }

    /// Patch one suite, returning its report and the suite file buffer if it changed
    fn run_suite(
        &self,
        suite: &TestSuite,
        descriptor: &mut LineBuffer,
        descriptor_label: &str,
    ) -> Result<(SuiteReport, Option<LineBuffer>)> {
        let file = suite.file_name();
        let source = read_text(&suite.path)?;
        let tests: Vec<String> = extract_test_cases(&source, &self.config.extract)
            .into_iter()
            .map(|case| case.name)
            .collect();
        tracing::debug!("{}: {} test case(s)", suite.stem, tests.len());

        let descriptor_outcome = match patch_descriptor(
            descriptor,
            &suite.stem,
            &tests,
            &self.config.descriptor_patch,
            descriptor_label,
        ) {
            Ok(edit) if edit.inserted => PatchOutcome::Inserted,
            Ok(edit) if edit.changed => PatchOutcome::Updated,
            Ok(_) => PatchOutcome::Unchanged,
            Err(e) => PatchOutcome::from_error(e),
        };

        let mut buffer = LineBuffer::from_text(&source);
        let mut rewritten = None;
        let suite_outcome = match patch_suite_file(
            &mut buffer,
            &suite.stem,
            &tests,
            &self.config.suite_patch,
            &file,
        ) {
            Ok(edit) => {
                let outcome = if edit.synthesized {
                    PatchOutcome::Synthesized
                } else if edit.changed {
                    PatchOutcome::Updated
                } else {
                    PatchOutcome::Unchanged
                };
                if edit.changed {
                    rewritten = Some(buffer);
                }
                outcome
            }
            Err(e) => PatchOutcome::from_error(e),
        };

        let report = SuiteReport {
            suite: suite.stem.clone(),
            file,
            tests,
            descriptor: descriptor_outcome,
            suite_file: suite_outcome,
        };
        Ok((report, rewritten))
    }
}
