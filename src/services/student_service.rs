use crate::error::Result;
use crate::models::{EntityId, EntityKind, Student, Tab};

use super::{collection_path, item_path, ApiClient, EntityApi};

const BASE: &str = "students";

/// Client for `/students`. Read-mostly: the dashboard looks students up when
/// billing, and principals may remove records.
#[derive(Debug, Clone)]
pub struct StudentService {
    api: ApiClient,
}

impl StudentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.api.get_list(&collection_path(BASE), &[]).await
    }

    pub async fn get_student(&self, id: &EntityId) -> Result<Student> {
        self.api.get_json(&item_path(BASE, id, None), &[]).await
    }

    pub async fn delete_student(&self, id: &EntityId) -> Result<()> {
        self.api.delete(&item_path(BASE, id, None)).await
    }
}

impl EntityApi for StudentService {
    type Item = Student;

    const KIND: EntityKind = EntityKind::Student;

    async fn list(&self, _tab: Tab) -> Result<Vec<Student>> {
        self.list_students().await
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        self.delete_student(id).await
    }
}
