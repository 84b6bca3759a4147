use std::sync::Arc;

use crate::controllers::{
    AdmissionsScreen, BillsScreen, BookListsScreen, JobPostsScreen, ListController,
    ReceiptsScreen, StudentsScreen,
};
use crate::error::Result;
use crate::services::{
    AdmissionService, ApiClient, BillService, BillingItemService, BillingTemplateService,
    BookListService, Config, ConfigStore, JobPostService, ReceiptService, SessionStore,
    StudentService, TokenSource,
};

/// Entry point for a host UI: one shared API client and a constructor per
/// screen. Each screen gets its own controller and owns its state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    api: ApiClient,
}

impl Dashboard {
    pub fn new(config: &Config, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let base_url = config.effective_api_base_url();
        let api = ApiClient::new(&base_url, tokens)?.with_request_log(config.request_log);
        tracing::info!(target: "schooldesk::api", base_url = %api.base_url(), "dashboard ready");
        Ok(Self { api })
    }

    /// Stored config plus the on-disk session.
    pub fn from_default_stores() -> Result<Self> {
        let config = ConfigStore::open_default()?.load()?;
        let session = SessionStore::open_default()?;
        Self::new(&config, Arc::new(session))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn admissions(&self) -> AdmissionsScreen {
        ListController::new(AdmissionService::new(self.api.clone()))
    }

    pub fn booklists(&self) -> BookListsScreen {
        ListController::new(BookListService::new(self.api.clone()))
    }

    pub fn jobposts(&self) -> JobPostsScreen {
        ListController::new(JobPostService::new(self.api.clone()))
    }

    pub fn bills(&self) -> BillsScreen {
        ListController::new(BillService::new(self.api.clone()))
    }

    pub fn receipts(&self) -> ReceiptsScreen {
        ListController::new(ReceiptService::new(self.api.clone()))
    }

    pub fn students(&self) -> StudentsScreen {
        ListController::new(StudentService::new(self.api.clone()))
    }

    pub fn billing_templates(&self) -> BillingTemplateService {
        BillingTemplateService::new(self.api.clone())
    }

    pub fn billing_items(&self) -> BillingItemService {
        BillingItemService::new(self.api.clone())
    }
}
