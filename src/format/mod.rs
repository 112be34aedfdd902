//! Output formatting for quotes, validation reports and word tiers
//! (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::display::{DisplayTarget, DisplayedQuote};
use crate::pricing::WordTiers;
use crate::validation::ValidationReport;

/// Formats results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the displayed figures of a quote.
    pub fn format_quote(&self, site_id: &str, quote: &DisplayedQuote) -> String {
        if quote.is_empty() {
            return match self.format {
                OutputFormat::Json => "{}".to_string(),
                OutputFormat::Csv => Self::csv_quote_header(),
                _ => "No price available.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(quote).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.table_quote(site_id, quote),
            OutputFormat::Markdown => self.markdown_quote(site_id, quote),
            OutputFormat::Csv => self.csv_quote(site_id, quote),
        }
    }

    /// Formats the outcome of a validation run.
    pub fn format_report(&self, report: &ValidationReport) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => {
                let mut lines = Vec::new();
                lines.push(format!("Kind:    {}", report.kind));
                lines.push(format!("Result:  {}", if report.valid { "valid" } else { "invalid" }));
                if let Some(error) = &report.error {
                    lines.push(format!("Error:   {}", error));
                }
                lines.push(format!("Checks:  {}", report.checks.join(" -> ")));
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines = Vec::new();
                lines.push(format!("## Proposal `{}`", report.kind));
                lines.push(String::new());
                for (i, check) in report.checks.iter().enumerate() {
                    let failed = !report.valid && i + 1 == report.checks.len();
                    lines.push(format!("- [{}] {}", if failed { " " } else { "x" }, check));
                }
                if let Some(error) = &report.error {
                    lines.push(String::new());
                    lines.push(format!("**Error:** {}", error));
                }
                lines.join("\n")
            }
            OutputFormat::Csv => format!(
                "kind,valid,error\n{},{},{}",
                report.kind,
                report.valid,
                report.error.as_deref().map(Self::csv_escape).unwrap_or_default()
            ),
        }
    }

    /// Formats the offered word tiers.
    pub fn format_tiers(&self, tiers: &WordTiers) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string(tiers).unwrap_or_else(|_| "[]".to_string()),
            OutputFormat::Csv => {
                let mut lines = vec!["words".to_string()];
                lines.extend(tiers.iter().map(|t| t.to_string()));
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines = vec!["| Extra words |".to_string(), "|-------------|".to_string()];
                lines.extend(tiers.iter().map(|t| format!("| +{} |", t)));
                lines.join("\n")
            }
            OutputFormat::Table => {
                if tiers.is_empty() {
                    return "No word tiers offered.".to_string();
                }
                let mut lines = vec!["Extra-word tiers:".to_string()];
                lines.extend(tiers.iter().map(|t| format!("  +{} words", t)));
                lines.join("\n")
            }
        }
    }

    // Quote formatting

    fn table_quote(&self, site_id: &str, quote: &DisplayedQuote) -> String {
        let label_width = 34;
        let mut lines = Vec::new();

        lines.push(format!("Site {}", site_id));
        lines.push(format!("{:-<label_width$}  {:-<12}", "", ""));

        for target in DisplayTarget::all() {
            if let Some(text) = quote.get(*target) {
                lines.push(format!("{:<label_width$}  {:>12}", target.label(), text));
            }
        }

        lines.join("\n")
    }

    fn markdown_quote(&self, site_id: &str, quote: &DisplayedQuote) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## Quote for site {}", site_id));
        lines.push(String::new());
        lines.push("| Display | Id | Value |".to_string());
        lines.push("|---------|----|-------|".to_string());

        for target in DisplayTarget::all() {
            if let Some(text) = quote.get(*target) {
                lines.push(format!("| {} | `{}` | {} |", target.label(), target.id(), text));
            }
        }

        lines.join("\n")
    }

    fn csv_quote_header() -> String {
        "site_id,target,value".to_string()
    }

    fn csv_quote(&self, site_id: &str, quote: &DisplayedQuote) -> String {
        let mut lines = vec![Self::csv_quote_header()];

        for target in DisplayTarget::all() {
            if let Some(text) = quote.get(*target) {
                lines.push(format!(
                    "{},{},{}",
                    Self::csv_escape(site_id),
                    target.id(),
                    Self::csv_escape(text)
                ));
            }
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
