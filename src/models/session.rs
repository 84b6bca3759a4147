use serde::{Deserialize, Serialize};

use super::common::EntityKind;

/// Dashboard role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Principal,
    Accountant,
    Teacher,
    Staff,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Whether the delete button is offered for this kind of row. This is a
    /// UI gate only; the backend makes the real decision.
    pub fn can_delete(self, kind: EntityKind) -> bool {
        use EntityKind::*;
        match self {
            Self::Admin => true,
            Self::Principal => matches!(kind, Admission | BookList | JobPost | Student),
            Self::Accountant => matches!(
                kind,
                Bill | PaymentReceipt | BillingTemplate | BillingItem
            ),
            Self::Teacher => kind == BookList,
            Self::Staff | Self::Unknown => false,
        }
    }
}

/// Persisted sign-in state. Issued elsewhere; this crate only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionState {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
}
