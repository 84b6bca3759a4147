use serde::{Deserialize, Serialize};

use super::common::{AdmissionStatus, EntityId};
use super::validate::{require, require_email, Validate};
use crate::controllers::{ListItem, SortValue};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default, alias = "class_applied")]
    pub applied_class: String,
    pub status: AdmissionStatus,
    #[serde(default, alias = "created_at")]
    pub applied_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Admission {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AdmissionFilter {
    Status,
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmissionSort {
    FullName,
    AppliedAt,
    Status,
    Class,
}

impl ListItem for Admission {
    type Filter = AdmissionFilter;
    type Sort = AdmissionSort;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.first_name,
            self.last_name,
            self.email,
            self.guardian_name.as_deref().unwrap_or_default(),
            self.applied_class
        )
    }

    fn filter_value(&self, key: AdmissionFilter) -> Option<String> {
        match key {
            AdmissionFilter::Status => Some(self.status.as_str().to_string()),
            AdmissionFilter::Class => Some(self.applied_class.clone()),
        }
    }

    fn sort_value(&self, key: AdmissionSort) -> SortValue {
        match key {
            AdmissionSort::FullName => SortValue::full_name(&self.first_name, &self.last_name),
            AdmissionSort::AppliedAt => SortValue::date(self.applied_at.as_deref()),
            AdmissionSort::Status => SortValue::text(self.status.as_str()),
            AdmissionSort::Class => SortValue::text(&self.applied_class),
        }
    }
}

/// Body for `POST /admissions/` and `PUT /admissions/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    pub applied_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Validate for AdmissionForm {
    fn validate(&self) -> Result<()> {
        require("first name", &self.first_name)?;
        require("last name", &self.last_name)?;
        require_email("email", &self.email)?;
        require("applied class", &self.applied_class)
    }
}

/// Body for a status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionStatusChange {
    pub status: AdmissionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_row() {
        let json = r#"{
            "id": 7,
            "first_name": "Ngozi",
            "last_name": "Okafor",
            "email": "ngozi@example.com",
            "class_applied": "JSS1",
            "status": "pending",
            "created_at": "2024-08-14T09:12:00Z"
        }"#;
        let admission: Admission = serde_json::from_str(json).unwrap();
        assert_eq!(admission.id, EntityId::Number(7));
        assert_eq!(admission.applied_class, "JSS1");
        assert_eq!(admission.status, AdmissionStatus::Pending);
        assert_eq!(admission.full_name(), "Ngozi Okafor");
        assert!(admission.search_text().contains("ngozi@example.com"));
    }

    #[test]
    fn form_requires_names_and_valid_email() {
        let mut form = AdmissionForm {
            first_name: "Tunde".into(),
            last_name: "Bello".into(),
            email: "tunde@example".into(),
            applied_class: "JSS2".into(),
            ..Default::default()
        };
        assert!(form.validate().is_err());
        form.email = "tunde@example.com".into();
        assert!(form.validate().is_ok());
        form.first_name = "  ".into();
        assert!(form.validate().is_err());
    }
}
