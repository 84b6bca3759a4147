//! Field checks run on request records before they leave the client.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{DashboardError, Result};

/// A request body that can be checked before submission.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> Result<&'static Regex> {
    static EMAIL_RE: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(EMAIL_PATTERN).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| DashboardError::Config(format!("email pattern: {e}")))
}

pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DashboardError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn require_email(field: &str, value: &str) -> Result<()> {
    require(field, value)?;
    if !email_regex()?.is_match(value.trim()) {
        return Err(DashboardError::Validation(format!(
            "{field} is not a valid email address"
        )));
    }
    Ok(())
}

pub(crate) fn require_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DashboardError::Validation(format!(
            "{field} must be a non-negative amount"
        )));
    }
    Ok(())
}
