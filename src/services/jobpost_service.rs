use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{EntityId, EntityKind, JobPost, JobPostForm, ScheduleRequest, Tab, Validate};

use super::{collection_path, item_path, tab_query, ApiClient, EntityApi, TransitionApi};

const BASE: &str = "jobposts";

/// Client for `/jobposts`.
#[derive(Debug, Clone)]
pub struct JobPostService {
    api: ApiClient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPostTransition {
    Publish,
    Schedule(DateTime<Utc>),
}

impl JobPostService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_jobposts(&self, tab: Tab) -> Result<Vec<JobPost>> {
        self.api.get_list(&collection_path(BASE), &tab_query(tab)).await
    }

    pub async fn get_jobpost(&self, id: &EntityId) -> Result<JobPost> {
        self.api.get_json(&item_path(BASE, id, None), &[]).await
    }

    pub async fn create_jobpost(&self, form: &JobPostForm) -> Result<JobPost> {
        form.validate()?;
        self.api.post_json(&collection_path(BASE), form).await
    }

    pub async fn update_jobpost(&self, id: &EntityId, form: &JobPostForm) -> Result<JobPost> {
        form.validate()?;
        self.api.put_json(&item_path(BASE, id, None), form).await
    }

    pub async fn delete_jobpost(&self, id: &EntityId) -> Result<()> {
        self.api.delete(&item_path(BASE, id, None)).await
    }

    pub async fn publish_jobpost(&self, id: &EntityId) -> Result<JobPost> {
        self.api.post_action(&item_path(BASE, id, Some("publish"))).await
    }

    /// Publish time is checked against the local clock before sending; the
    /// backend owns the actual scheduling.
    pub async fn schedule_jobpost(
        &self,
        id: &EntityId,
        publish_at: DateTime<Utc>,
    ) -> Result<JobPost> {
        let body = ScheduleRequest { publish_at };
        body.validate_at(Utc::now())?;
        self.api
            .post_json(&item_path(BASE, id, Some("schedule")), &body)
            .await
    }
}

impl EntityApi for JobPostService {
    type Item = JobPost;

    const KIND: EntityKind = EntityKind::JobPost;

    async fn list(&self, tab: Tab) -> Result<Vec<JobPost>> {
        self.list_jobposts(tab).await
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        self.delete_jobpost(id).await
    }
}

impl TransitionApi for JobPostService {
    type Transition = JobPostTransition;

    async fn transition(&self, id: &EntityId, target: JobPostTransition) -> Result<JobPost> {
        match target {
            JobPostTransition::Publish => self.publish_jobpost(id).await,
            JobPostTransition::Schedule(at) => self.schedule_jobpost(id, at).await,
        }
    }
}
