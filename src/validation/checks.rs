//! Individual checks a proposal form can be put through.

use super::form::ProposalForm;
use super::{ProposalKind, ValidationError};

/// One validation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    UrlsPresent,
    AnchorsPresent,
    UrlValid,
    NotBlacklisted,
    RefuseConditionAccepted,
    CopywritingCertified,
    /// Only enforced when the form has image fields at all
    ImageSourcesPresent,
    PartnerMessagePresent,
    RequiredFieldsComplete,
}

impl Check {
    /// Runs the check against a form.
    pub fn run(&self, kind: ProposalKind, form: &ProposalForm) -> Result<(), ValidationError> {
        match self {
            Check::UrlsPresent => {
                require(any_filled(&form.urls), ValidationError::MissingField { kind, field: "url" })
            }
            Check::AnchorsPresent => require(
                any_filled(&form.anchors),
                ValidationError::MissingField { kind, field: "anchor" },
            ),
            Check::UrlValid => {
                require(form.urls.iter().any(|u| is_http_url(u)), ValidationError::InvalidUrl)
            }
            Check::NotBlacklisted => match blacklisted_entry(form) {
                Some(entry) => Err(ValidationError::Blacklisted { entry }),
                None => Ok(()),
            },
            Check::RefuseConditionAccepted => {
                require(form.refuse_condition_accepted, ValidationError::RefuseConditionNotAccepted)
            }
            Check::CopywritingCertified => {
                require(form.copywriting_certified, ValidationError::CopywritingNotCertified)
            }
            Check::ImageSourcesPresent => require(
                form.image_sources.is_empty() || any_filled(&form.image_sources),
                ValidationError::MissingField { kind, field: "image source" },
            ),
            Check::PartnerMessagePresent => require(
                form.partner_message.as_deref().is_some_and(|m| !m.trim().is_empty()),
                ValidationError::MissingPartnerMessage { kind },
            ),
            Check::RequiredFieldsComplete => require(
                form.required_fields_complete,
                ValidationError::MissingField { kind, field: "required fields" },
            ),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Check::UrlsPresent => "url present",
            Check::AnchorsPresent => "anchor present",
            Check::UrlValid => "url starts with http(s)://",
            Check::NotBlacklisted => "no blacklisted term",
            Check::RefuseConditionAccepted => "refusal conditions accepted",
            Check::CopywritingCertified => "copywriting certified",
            Check::ImageSourcesPresent => "image sources present",
            Check::PartnerMessagePresent => "partner message present",
            Check::RequiredFieldsComplete => "required fields complete",
        }
    }
}

fn require(ok: bool, error: ValidationError) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(error)
    }
}

fn any_filled(values: &[String]) -> bool {
    values.iter().any(|v| !v.trim().is_empty())
}

fn is_http_url(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// First blacklist entry found in the first url or first anchor.
fn blacklisted_entry(form: &ProposalForm) -> Option<String> {
    let url = form.urls.first().map(|u| u.to_lowercase()).unwrap_or_default();
    let anchor = form.anchors.first().map(|a| a.to_lowercase()).unwrap_or_default();

    if url.is_empty() || anchor.is_empty() {
        return None;
    }

    form.blacklist
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .find(|entry| {
            let needle = entry.to_lowercase();
            url.contains(&needle) || anchor.contains(&needle)
        })
        .map(str::to_string)
}
