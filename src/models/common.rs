use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier. Some endpoints hand out integers, others strings; both
/// are kept as received so they round-trip unchanged into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Server-side collection variant. Switching tabs triggers a fetch; it is
/// never applied as a client-side filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Draft,
    Scheduled,
    Published,
    Pending,
}

impl Tab {
    /// Value for the `status` query parameter, if any.
    pub fn status_query(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Draft => Some("draft"),
            Self::Scheduled => Some("scheduled"),
            Self::Published => Some("published"),
            Self::Pending => Some("pending"),
        }
    }
}

/// Coarse entity families, used for permission checks and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Admission,
    BookList,
    JobPost,
    Bill,
    PaymentReceipt,
    BillingTemplate,
    BillingItem,
    Student,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Admission => "admission",
            Self::BookList => "book list",
            Self::JobPost => "job post",
            Self::Bill => "bill",
            Self::PaymentReceipt => "payment receipt",
            Self::BillingTemplate => "billing template",
            Self::BillingItem => "billing item",
            Self::Student => "student",
        }
    }
}

/// Defines a wire status enum with known lowercase variants and a catch-all
/// that keeps unknown values instead of failing the whole list.
macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
            #[serde(untagged)]
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(raw) => raw.as_str(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_enum! {
    /// Review state of an admission application.
    AdmissionStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Waitlisted => "waitlisted",
    }
}

status_enum! {
    /// Lifecycle of publishable content (book lists, job posts).
    PublishStatus {
        Draft => "draft",
        Scheduled => "scheduled",
        Published => "published",
        Archived => "archived",
    }
}

status_enum! {
    BillStatus {
        Unpaid => "unpaid",
        Partial => "partial",
        Paid => "paid",
        Overdue => "overdue",
    }
}

/// Parse the date strings the backend hands out. Accepts RFC 3339, naive
/// `YYYY-MM-DDTHH:MM:SS[.f]` (taken as UTC) and plain `YYYY-MM-DD`.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Money arrives either as a JSON number or as a decimal string ("120.50").
pub(crate) fn de_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) if s.trim().is_empty() => Ok(0.0),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid amount {s:?}: {e}"))),
        Raw::Null(()) => Ok(0.0),
    }
}
