//! Collection Store for LearnHub.
//!
//! Owns the in-memory bookmark and category collections and keeps them in
//! step with the remote service. Apart from `load_all` and `search`, every
//! mutation here is a plain collection edit applied after a gateway call has
//! already succeeded.
//!
//! Search and the category filter do not compose. A search replaces the
//! visible bookmarks with the server's result set and drops the category
//! filter; clearing the query fetches the full collection again.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::gateway::{GatewayResult, RemoteGateway};
use crate::managers::session_manager::IdentitySession;
use crate::services::notifications::EventChannel;
use crate::services::view_projector;
use crate::types::bookmark::{Bookmark, BookmarkId, Category, CategoryId};

pub struct CollectionStore {
    gateway: Arc<dyn RemoteGateway>,
    session: IdentitySession,
    events: EventChannel,
    bookmarks: Vec<Bookmark>,
    categories: Vec<Category>,
    search_results: Option<Vec<Bookmark>>,
    search_query: String,
    active_category: Option<CategoryId>,
    loaded: bool,
}

impl CollectionStore {
    pub fn new(gateway: Arc<dyn RemoteGateway>, session: IdentitySession, events: EventChannel) -> Self {
        Self {
            gateway,
            session,
            events,
            bookmarks: Vec::new(),
            categories: Vec::new(),
            search_results: None,
            search_query: String::new(),
            active_category: None,
            loaded: false,
        }
    }

    /// Fetches bookmarks and categories concurrently and replaces both.
    ///
    /// Both fetches must succeed for anything to change. On failure the
    /// previous collections stay in place; an unauthorized response also ends
    /// the session and requests the login route.
    pub async fn load_all(&mut self) -> GatewayResult<()> {
        let (bookmarks, categories) = tokio::join!(
            self.gateway.list_bookmarks(),
            self.gateway.list_categories()
        );

        let combined = match (bookmarks, categories) {
            (Ok(b), Ok(c)) => Ok((b, c)),
            (Err(e), Err(other)) if other.is_unauthorized() && !e.is_unauthorized() => Err(other),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };

        match self.session.guard(combined, &self.events) {
            Ok((bookmarks, categories)) => {
                info!(
                    bookmarks = bookmarks.len(),
                    categories = categories.len(),
                    "collections loaded"
                );
                self.bookmarks = bookmarks;
                self.categories = categories;
                self.search_results = None;
                self.search_query.clear();
                if let Some(active) = self.active_category {
                    if self.find_category(active).is_none() {
                        self.active_category = None;
                    }
                }
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load collections, keeping previous state");
                Err(e)
            }
        }
    }

    /// Runs a server-side search, or reloads everything for a blank keyword.
    pub async fn search(&mut self, keyword: &str) -> GatewayResult<()> {
        self.search_query = keyword.to_string();
        if keyword.trim().is_empty() {
            return self.load_all().await;
        }

        let result = self.gateway.search_bookmarks(keyword).await;
        match self.session.guard(result, &self.events) {
            Ok(results) => {
                debug!(keyword, hits = results.len(), "search completed");
                self.replace_bookmarks_with_search_results(results);
                Ok(())
            }
            Err(e) => {
                warn!(keyword, error = %e, "search failed");
                Err(e)
            }
        }
    }

    pub fn replace_bookmarks_with_search_results(&mut self, results: Vec<Bookmark>) {
        self.active_category = None;
        self.search_results = Some(results);
    }

    pub fn apply_created_bookmark(&mut self, bookmark: Bookmark) {
        debug!(id = %bookmark.id, "bookmark added to store");
        self.bookmarks.push(bookmark);
    }

    pub fn apply_updated_bookmark(&mut self, bookmark: Bookmark) {
        if let Some(results) = self.search_results.as_mut() {
            if let Some(slot) = results.iter_mut().find(|b| b.id == bookmark.id) {
                *slot = bookmark.clone();
            }
        }
        match self.bookmarks.iter_mut().find(|b| b.id == bookmark.id) {
            Some(slot) => *slot = bookmark,
            None => self.bookmarks.push(bookmark),
        }
    }

    /// Removes a bookmark. Removing an unknown id is a no-op.
    pub fn remove_bookmark(&mut self, id: BookmarkId) {
        self.bookmarks.retain(|b| b.id != id);
        if let Some(results) = self.search_results.as_mut() {
            results.retain(|b| b.id != id);
        }
    }

    pub fn apply_created_category(&mut self, category: Category) {
        debug!(id = %category.id, "category added to store");
        self.categories.push(category);
    }

    pub fn apply_updated_category(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(slot) => *slot = category,
            None => self.categories.push(category),
        }
    }

    /// Removes a category without touching any bookmark.
    ///
    /// Bookmarks that referenced it keep a dangling reference. The active
    /// filter is cleared when it pointed at the removed category.
    pub fn remove_category(&mut self, id: CategoryId) {
        self.categories.retain(|c| c.id != id);
        if self.active_category == Some(id) {
            self.active_category = None;
        }
    }

    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.active_category = category;
    }

    /// The full collection from the last load, never search results.
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The collection the view is projected from.
    pub fn visible_source(&self) -> &[Bookmark] {
        self.search_results.as_deref().unwrap_or(&self.bookmarks)
    }

    pub fn visible(&self) -> Vec<&Bookmark> {
        view_projector::project(self.visible_source(), self.active_category)
    }

    pub fn sidebar(&self) -> Vec<view_projector::SidebarEntry> {
        view_projector::sidebar(&self.bookmarks, &self.categories, self.active_category)
    }

    pub fn active_category(&self) -> Option<CategoryId> {
        self.active_category
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_searching(&self) -> bool {
        self.search_results.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find_bookmark(&self, id: BookmarkId) -> Option<&Bookmark> {
        self.bookmarks
            .iter()
            .chain(self.search_results.iter().flatten())
            .find(|b| b.id == id)
    }

    pub fn find_category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}
