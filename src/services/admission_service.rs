use crate::error::Result;
use crate::models::{
    Admission, AdmissionForm, AdmissionStatus, AdmissionStatusChange, EntityId, EntityKind, Tab,
    Validate,
};

use super::{collection_path, item_path, tab_query, ApiClient, EntityApi, TransitionApi};

const BASE: &str = "admissions";

/// Client for `/admissions`.
#[derive(Debug, Clone)]
pub struct AdmissionService {
    api: ApiClient,
}

impl AdmissionService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_admissions(&self, tab: Tab) -> Result<Vec<Admission>> {
        self.api.get_list(&collection_path(BASE), &tab_query(tab)).await
    }

    pub async fn get_admission(&self, id: &EntityId) -> Result<Admission> {
        self.api.get_json(&item_path(BASE, id, None), &[]).await
    }

    pub async fn create_admission(&self, form: &AdmissionForm) -> Result<Admission> {
        form.validate()?;
        self.api.post_json(&collection_path(BASE), form).await
    }

    pub async fn update_admission(&self, id: &EntityId, form: &AdmissionForm) -> Result<Admission> {
        form.validate()?;
        self.api.put_json(&item_path(BASE, id, None), form).await
    }

    pub async fn delete_admission(&self, id: &EntityId) -> Result<()> {
        self.api.delete(&item_path(BASE, id, None)).await
    }

    pub async fn set_status(&self, id: &EntityId, status: AdmissionStatus) -> Result<Admission> {
        let body = AdmissionStatusChange { status };
        self.api.put_json(&item_path(BASE, id, None), &body).await
    }
}

impl EntityApi for AdmissionService {
    type Item = Admission;

    const KIND: EntityKind = EntityKind::Admission;

    async fn list(&self, tab: Tab) -> Result<Vec<Admission>> {
        self.list_admissions(tab).await
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        self.delete_admission(id).await
    }
}

impl TransitionApi for AdmissionService {
    type Transition = AdmissionStatus;

    async fn transition(&self, id: &EntityId, target: AdmissionStatus) -> Result<Admission> {
        self.set_status(id, target).await
    }
}
