//! Proposal validation: one variant per proposal kind, each with an ordered
//! list of checks evaluated until the first failure.

pub mod checks;
pub mod form;

pub use checks::Check;
pub use form::ProposalForm;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Kind of proposal being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    /// Article written by the platform (`writing_ereferer`, `writing_webmaster`)
    #[serde(rename = "writing_ereferer", alias = "writing_webmaster", alias = "writing_referral")]
    WritingReferral,
    /// Article supplied by the advertiser
    #[serde(rename = "submit_your_article", alias = "submit_article")]
    SubmitArticle,
    CreateGroup,
    JoinGroup,
    AdminProposal,
    ContactPartner,
}

impl ProposalKind {
    /// Returns all proposal kinds.
    pub fn all() -> &'static [ProposalKind] {
        &[
            ProposalKind::WritingReferral,
            ProposalKind::SubmitArticle,
            ProposalKind::CreateGroup,
            ProposalKind::JoinGroup,
            ProposalKind::AdminProposal,
            ProposalKind::ContactPartner,
        ]
    }

    /// Checks for this kind, in the order they run.
    pub fn checks(&self) -> &'static [Check] {
        use Check::*;

        match self {
            ProposalKind::WritingReferral => {
                &[UrlsPresent, RefuseConditionAccepted, AnchorsPresent, UrlValid, NotBlacklisted]
            }
            ProposalKind::SubmitArticle => &[CopywritingCertified, ImageSourcesPresent],
            ProposalKind::CreateGroup => {
                &[RefuseConditionAccepted, AnchorsPresent, UrlValid, NotBlacklisted]
            }
            ProposalKind::JoinGroup => &[
                RefuseConditionAccepted,
                AnchorsPresent,
                UrlValid,
                PartnerMessagePresent,
                NotBlacklisted,
            ],
            ProposalKind::AdminProposal => &[UrlValid, AnchorsPresent, RequiredFieldsComplete],
            ProposalKind::ContactPartner => &[UrlsPresent, AnchorsPresent, UrlValid, NotBlacklisted],
        }
    }

    /// Validates a form, stopping at the first failing check.
    pub fn validate(&self, form: &ProposalForm) -> Result<(), ValidationError> {
        for check in self.checks() {
            if let Err(e) = check.run(*self, form) {
                debug!("{} failed on '{}': {}", self, check.description(), e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Wire name used by the modal.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalKind::WritingReferral => "writing_ereferer",
            ProposalKind::SubmitArticle => "submit_your_article",
            ProposalKind::CreateGroup => "create_group",
            ProposalKind::JoinGroup => "join_group",
            ProposalKind::AdminProposal => "admin_proposal",
            ProposalKind::ContactPartner => "contact_partner",
        }
    }
}

impl std::str::FromStr for ProposalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "writing_ereferer" | "writing_webmaster" | "writing_referral" => {
                Ok(ProposalKind::WritingReferral)
            }
            "submit_your_article" | "submit_article" => Ok(ProposalKind::SubmitArticle),
            "create_group" => Ok(ProposalKind::CreateGroup),
            "join_group" => Ok(ProposalKind::JoinGroup),
            "admin_proposal" => Ok(ProposalKind::AdminProposal),
            "contact_partner" => Ok(ProposalKind::ContactPartner),
            _ => Err(format!(
                "Unknown proposal kind: {}. Use: writing_ereferer, submit_your_article, create_group, join_group, admin_proposal, contact_partner",
                s
            )),
        }
    }
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a proposal form was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{kind}: please fill in the {field} field")]
    MissingField { kind: ProposalKind, field: &'static str },

    #[error("url must start with http:// or https://")]
    InvalidUrl,

    #[error("'{entry}' is blacklisted by the publisher")]
    Blacklisted { entry: String },

    #[error("you must accept the refusal conditions")]
    RefuseConditionNotAccepted,

    #[error("you must certify the copywriting conditions")]
    CopywritingNotCertified,

    #[error("{kind}: a message to the partner is required")]
    MissingPartnerMessage { kind: ProposalKind },
}

/// Serializable summary of one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub kind: ProposalKind,
    pub valid: bool,
    pub error: Option<String>,
    /// Checks that ran, in order
    pub checks: Vec<String>,
}

impl ValidationReport {
    /// Validates a form and records which checks ran.
    pub fn run(kind: ProposalKind, form: &ProposalForm) -> Self {
        let mut checks = Vec::new();
        let mut error = None;

        for check in kind.checks() {
            checks.push(check.description().to_string());
            if let Err(e) = check.run(kind, form) {
                error = Some(e.to_string());
                break;
            }
        }

        Self { kind, valid: error.is_none(), error, checks }
    }
}
