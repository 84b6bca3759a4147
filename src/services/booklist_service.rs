use crate::error::Result;
use crate::models::{BookList, BookListForm, EntityId, EntityKind, Tab, Validate};

use super::{collection_path, item_path, tab_query, ApiClient, EntityApi, TransitionApi};

const BASE: &str = "booklists";

/// Client for `/booklists`.
#[derive(Debug, Clone)]
pub struct BookListService {
    api: ApiClient,
}

impl BookListService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_booklists(&self, tab: Tab) -> Result<Vec<BookList>> {
        self.api.get_list(&collection_path(BASE), &tab_query(tab)).await
    }

    pub async fn get_booklist(&self, id: &EntityId) -> Result<BookList> {
        self.api.get_json(&item_path(BASE, id, None), &[]).await
    }

    pub async fn create_booklist(&self, form: &BookListForm) -> Result<BookList> {
        form.validate()?;
        self.api.post_json(&collection_path(BASE), form).await
    }

    pub async fn update_booklist(&self, id: &EntityId, form: &BookListForm) -> Result<BookList> {
        form.validate()?;
        self.api.put_json(&item_path(BASE, id, None), form).await
    }

    pub async fn delete_booklist(&self, id: &EntityId) -> Result<()> {
        self.api.delete(&item_path(BASE, id, None)).await
    }

    pub async fn publish_booklist(&self, id: &EntityId) -> Result<BookList> {
        self.api.post_action(&item_path(BASE, id, Some("publish"))).await
    }
}

/// The only book-list transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publish;

impl EntityApi for BookListService {
    type Item = BookList;

    const KIND: EntityKind = EntityKind::BookList;

    async fn list(&self, tab: Tab) -> Result<Vec<BookList>> {
        self.list_booklists(tab).await
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        self.delete_booklist(id).await
    }
}

impl TransitionApi for BookListService {
    type Transition = Publish;

    async fn transition(&self, id: &EntityId, _target: Publish) -> Result<BookList> {
        self.publish_booklist(id).await
    }
}
