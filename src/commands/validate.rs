//! Validate command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::validation::{ProposalForm, ProposalKind, ValidationReport};
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Result of validating one form.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub report: ValidationReport,
    pub output: String,
}

/// Checks a proposal form before submission.
pub struct ValidateCommand {
    config: Config,
}

impl ValidateCommand {
    /// Creates a new validate command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads the form file and validates it for the given kind.
    ///
    /// `blacklist` is the publisher's comma-separated field and replaces the
    /// form's own list when given.
    pub fn execute(
        &self,
        kind: ProposalKind,
        form_path: &Path,
        blacklist: Option<&str>,
    ) -> Result<ValidationOutcome> {
        let mut form = ProposalForm::from_file(form_path)?;
        if let Some(field) = blacklist {
            form = form.with_blacklist_field(field);
        }

        Ok(self.execute_form(kind, &form))
    }

    /// Validates an already loaded form.
    pub fn execute_form(&self, kind: ProposalKind, form: &ProposalForm) -> ValidationOutcome {
        let report = ValidationReport::run(kind, form);
        info!("Validated {} proposal: {}", kind, if report.valid { "ok" } else { "rejected" });

        let output = Formatter::new(self.config.format).format_report(&report);
        ValidationOutcome { report, output }
    }
}
