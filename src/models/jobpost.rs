use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::{EntityId, PublishStatus};
use super::validate::{require, Validate};
use crate::controllers::{ListItem, SortValue};
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPost {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub description: String,
    pub status: PublishStatus,
    #[serde(default, alias = "created_at")]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub publish_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobPostFilter {
    Status,
    Category,
    EmploymentType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobPostSort {
    Title,
    PostedAt,
    Deadline,
    Status,
}

impl ListItem for JobPost {
    type Filter = JobPostFilter;
    type Sort = JobPostSort;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.department, self.location)
    }

    fn filter_value(&self, key: JobPostFilter) -> Option<String> {
        match key {
            JobPostFilter::Status => Some(self.status.as_str().to_string()),
            JobPostFilter::Category => Some(self.category.clone()),
            JobPostFilter::EmploymentType => Some(self.employment_type.clone()),
        }
    }

    fn sort_value(&self, key: JobPostSort) -> SortValue {
        match key {
            JobPostSort::Title => SortValue::text(self.title.to_lowercase()),
            JobPostSort::PostedAt => SortValue::date(self.posted_at.as_deref()),
            JobPostSort::Deadline => SortValue::date(self.deadline.as_deref()),
            JobPostSort::Status => SortValue::text(self.status.as_str()),
        }
    }
}

/// Body for `POST /jobposts/` and `PUT /jobposts/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPostForm {
    pub title: String,
    pub department: String,
    pub location: String,
    pub category: String,
    pub employment_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl Validate for JobPostForm {
    fn validate(&self) -> Result<()> {
        require("title", &self.title)?;
        require("department", &self.department)?;
        require("description", &self.description)?;
        if let (Some(publish_at), Some(deadline)) = (self.publish_at, self.deadline) {
            if deadline < publish_at.date_naive() {
                return Err(DashboardError::Validation(
                    "deadline cannot be before the publish date".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Body for `POST /jobposts/{id}/schedule/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub publish_at: DateTime<Utc>,
}

impl ScheduleRequest {
    /// The instant must be in the future relative to `now`.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<()> {
        if self.publish_at <= now {
            return Err(DashboardError::Validation(
                "scheduled publish time must be in the future".to_string(),
            ));
        }
        Ok(())
    }
}
