use serde::{Deserialize, Serialize};

use super::common::{de_amount, EntityId, PublishStatus};
use super::validate::{require, require_amount, Validate};
use crate::controllers::{ListItem, SortValue};
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookListItem {
    #[serde(default)]
    pub id: Option<EntityId>,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "de_amount")]
    pub unit_price: f64,
}

fn one() -> u32 {
    1
}

impl BookListItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookList {
    pub id: EntityId,
    pub title: String,
    #[serde(default, alias = "class")]
    pub class_name: String,
    #[serde(default)]
    pub session: Option<String>,
    pub status: PublishStatus,
    #[serde(default)]
    pub items: Vec<BookListItem>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl BookList {
    /// Number of distinct titles on the list.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantity times unit price over all titles.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(BookListItem::line_total).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BookListFilter {
    Class,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookListSort {
    Title,
    Class,
    ItemCount,
    TotalPrice,
    UpdatedAt,
}

impl ListItem for BookList {
    type Filter = BookListFilter;
    type Sort = BookListSort;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.class_name,
            self.session.as_deref().unwrap_or_default()
        )
    }

    fn filter_value(&self, key: BookListFilter) -> Option<String> {
        match key {
            BookListFilter::Class => Some(self.class_name.clone()),
            BookListFilter::Status => Some(self.status.as_str().to_string()),
        }
    }

    fn sort_value(&self, key: BookListSort) -> SortValue {
        match key {
            BookListSort::Title => SortValue::text(self.title.to_lowercase()),
            BookListSort::Class => SortValue::text(&self.class_name),
            BookListSort::ItemCount => SortValue::number(self.item_count() as f64),
            BookListSort::TotalPrice => SortValue::number(self.total_price()),
            BookListSort::UpdatedAt => SortValue::date(self.updated_at.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookListItemForm {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Body for `POST /booklists/` and `PUT /booklists/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookListForm {
    pub title: String,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    pub items: Vec<BookListItemForm>,
}

impl Validate for BookListForm {
    fn validate(&self) -> Result<()> {
        require("title", &self.title)?;
        require("class", &self.class_name)?;
        if self.items.is_empty() {
            return Err(DashboardError::Validation(
                "a book list needs at least one item".to_string(),
            ));
        }
        for (idx, item) in self.items.iter().enumerate() {
            require(&format!("item {} title", idx + 1), &item.title)?;
            if item.quantity == 0 {
                return Err(DashboardError::Validation(format!(
                    "item {} quantity must be at least 1",
                    idx + 1
                )));
            }
            require_amount(&format!("item {} price", idx + 1), item.unit_price)?;
        }
        Ok(())
    }
}
