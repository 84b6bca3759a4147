pub mod api_client;
pub mod config_service;
pub mod session_service;
pub mod admission_service;
pub mod booklist_service;
pub mod jobpost_service;
pub mod billing_service;
pub mod student_service;

use std::fmt::Debug;
use std::future::Future;

use crate::controllers::ListItem;
use crate::error::Result;
use crate::models::{EntityId, EntityKind, Tab};

pub use admission_service::AdmissionService;
pub use api_client::{ApiClient, ApiPath};
pub use billing_service::{BillService, BillingItemService, BillingTemplateService, ReceiptService};
pub use booklist_service::{BookListService, Publish};
pub use config_service::{Config, ConfigStore};
pub use jobpost_service::{JobPostService, JobPostTransition};
pub use session_service::{MemorySession, SessionStore, StaticToken, TokenSource};
pub use student_service::StudentService;

/// What a list screen needs from its backend: fetch a tab, delete a row.
pub trait EntityApi: Send + Sync {
    type Item: ListItem + Send;

    const KIND: EntityKind;

    fn list(&self, tab: Tab) -> impl Future<Output = Result<Vec<Self::Item>>> + Send;

    fn delete(&self, id: &EntityId) -> impl Future<Output = Result<()>> + Send;
}

/// Entities with server-confirmed status changes (publish, approve...).
pub trait TransitionApi: EntityApi {
    type Transition: Clone + Debug + Send;

    /// Returns the backend's representation after the change.
    fn transition(
        &self,
        id: &EntityId,
        target: Self::Transition,
    ) -> impl Future<Output = Result<Self::Item>> + Send;
}

/// `base/{id}/` with optional action suffix.
pub(crate) fn item_path(base: &str, id: &EntityId, action: Option<&str>) -> ApiPath {
    let path = ApiPath::new(base).push(id.to_string());
    match action {
        Some(action) => path.push(action),
        None => path,
    }
}

pub(crate) fn collection_path(base: &str) -> ApiPath {
    ApiPath::new(base)
}

/// Query pairs for a tab.
pub(crate) fn tab_query(tab: Tab) -> Vec<(&'static str, &'static str)> {
    tab.status_query()
        .map(|status| vec![("status", status)])
        .unwrap_or_default()
}
