use serde::{Deserialize, Serialize};

use super::common::EntityId;
use crate::controllers::{ListItem, SortValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub admission_number: String,
    #[serde(default, alias = "class")]
    pub class_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StudentFilter {
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentSort {
    FullName,
    Class,
    AdmissionNumber,
}

impl ListItem for Student {
    type Filter = StudentFilter;
    type Sort = StudentSort;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.first_name, self.last_name, self.admission_number
        )
    }

    fn filter_value(&self, key: StudentFilter) -> Option<String> {
        match key {
            StudentFilter::Class => Some(self.class_name.clone()),
        }
    }

    fn sort_value(&self, key: StudentSort) -> SortValue {
        match key {
            StudentSort::FullName => SortValue::full_name(&self.first_name, &self.last_name),
            StudentSort::Class => SortValue::text(&self.class_name),
            StudentSort::AdmissionNumber => SortValue::text(&self.admission_number),
        }
    }
}
