//! In-process implementation of the bookmark service.
//!
//! Keeps users' bookmarks, categories and tags in memory and follows the same
//! contract as the remote service: category deletion does not cascade,
//! deletes of missing ids succeed, and tag identity is decided here rather
//! than by the caller. Every call is recorded so callers can check which
//! requests were (or were not) issued, and failures can be injected.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{GatewayResult, RemoteGateway};
use crate::types::analysis::AnalysisResult;
use crate::types::bookmark::{
    Bookmark, BookmarkId, BookmarkUpdate, Category, CategoryId, CategoryRef, NewBookmark, Tag,
    TagId,
};
use crate::types::errors::GatewayError;

#[derive(Debug, Default)]
struct ServiceState {
    accounts: HashMap<String, String>,
    bookmarks: Vec<Bookmark>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    analyses: HashMap<String, AnalysisResult>,
    next_id: i64,
}

impl ServiceState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn category_ref(&self, id: CategoryId) -> GatewayResult<CategoryRef> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| CategoryRef {
                id: c.id,
                name: Some(c.name.clone()),
            })
            .ok_or_else(|| not_found("Category", id))
    }

    fn intern_tags(&mut self, names: &[String]) -> Vec<Tag> {
        let mut result: Vec<Tag> = Vec::new();
        for name in names {
            let existing = self.tags.iter().find(|t| t.name.eq_ignore_ascii_case(name)).cloned();
            let tag = match existing {
                Some(tag) => tag,
                None => {
                    let tag = Tag {
                        id: TagId(self.next_id()),
                        name: name.clone(),
                    };
                    self.tags.push(tag.clone());
                    tag
                }
            };
            if !result.iter().any(|t| t.id == tag.id) {
                result.push(tag);
            }
        }
        result
    }
}

/// In-memory bookmark service with call recording and failure injection.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    state: Mutex<ServiceState>,
    calls: Mutex<Vec<&'static str>>,
    queued_failures: Mutex<VecDeque<GatewayError>>,
    persistent_failure: Mutex<Option<GatewayError>>,
    operation_failures: Mutex<HashMap<&'static str, GatewayError>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a category directly, bypassing call recording.
    pub fn seed_category(&self, name: &str) -> Category {
        let mut state = self.state.lock();
        let category = Category {
            id: CategoryId(state.next_id()),
            name: name.to_string(),
        };
        state.categories.push(category.clone());
        category
    }

    /// Seeds a bookmark directly, bypassing call recording.
    pub fn seed_bookmark(&self, url: &str, title: &str, category: Option<CategoryId>, tags: &[&str]) -> Bookmark {
        let mut state = self.state.lock();
        let category = category.and_then(|id| state.category_ref(id).ok());
        let names: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        let tags = state.intern_tags(&names);
        let bookmark = Bookmark {
            id: BookmarkId(state.next_id()),
            url: url.to_string(),
            title: title.to_string(),
            description: None,
            category,
            tags,
            thumbnail_url: None,
        };
        state.bookmarks.push(bookmark.clone());
        bookmark
    }

    /// Canned result for `analyze_url(url)`.
    pub fn set_analysis(&self, url: &str, result: AnalysisResult) {
        self.state.lock().analyses.insert(url.to_string(), result);
    }

    /// The next call fails with `error`. Queued failures are consumed in order.
    pub fn fail_next(&self, error: GatewayError) {
        self.queued_failures.lock().push_back(error);
    }

    /// Every call fails with `error` until cleared with `None`.
    pub fn fail_always(&self, error: Option<GatewayError>) {
        *self.persistent_failure.lock() = error;
    }

    /// Every call to `operation` fails with `error`; other calls are unaffected.
    pub fn fail_operation(&self, operation: &'static str, error: GatewayError) {
        self.operation_failures.lock().insert(operation, error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == operation).count()
    }

    pub fn stored_bookmarks(&self) -> Vec<Bookmark> {
        self.state.lock().bookmarks.clone()
    }

    pub fn stored_categories(&self) -> Vec<Category> {
        self.state.lock().categories.clone()
    }

    fn enter(&self, operation: &'static str) -> GatewayResult<()> {
        self.calls.lock().push(operation);
        if let Some(error) = self.queued_failures.lock().pop_front() {
            return Err(error);
        }
        if let Some(error) = self.operation_failures.lock().get(operation) {
            return Err(error.clone());
        }
        match self.persistent_failure.lock().as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> GatewayError {
    GatewayError::Service {
        status: 404,
        message: Some(format!("{} not found: {}", kind, id)),
    }
}

fn bad_request(message: &str) -> GatewayError {
    GatewayError::Service {
        status: 400,
        message: Some(message.to_string()),
    }
}

fn matches_keyword(bookmark: &Bookmark, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    bookmark.title.to_lowercase().contains(&needle)
        || bookmark.url.to_lowercase().contains(&needle)
        || bookmark
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
        || bookmark.tags.iter().any(|t| t.name.to_lowercase().contains(&needle))
}

#[async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn login(&self, email: &str, password: &str) -> GatewayResult<String> {
        self.enter("login")?;
        let state = self.state.lock();
        match state.accounts.get(email) {
            Some(stored) if stored == password => Ok(format!("token-{}", email)),
            _ => Err(GatewayError::Unauthorized),
        }
    }

    async fn register(&self, email: &str, password: &str, _role: &str) -> GatewayResult<()> {
        self.enter("register")?;
        let mut state = self.state.lock();
        if state.accounts.contains_key(email) {
            return Err(GatewayError::Service {
                status: 409,
                message: Some("Email already registered".to_string()),
            });
        }
        state.accounts.insert(email.to_string(), password.to_string());
        Ok(())
    }

    async fn list_bookmarks(&self) -> GatewayResult<Vec<Bookmark>> {
        self.enter("list_bookmarks")?;
        Ok(self.state.lock().bookmarks.clone())
    }

    async fn get_bookmark(&self, id: BookmarkId) -> GatewayResult<Bookmark> {
        self.enter("get_bookmark")?;
        self.state
            .lock()
            .bookmarks
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| not_found("Bookmark", id))
    }

    async fn create_bookmark(&self, new: &NewBookmark) -> GatewayResult<Bookmark> {
        self.enter("create_bookmark")?;
        if new.url.trim().is_empty() {
            return Err(bad_request("url is required"));
        }
        let category_id = new
            .category_id
            .ok_or_else(|| bad_request("categoryId is required"))?;

        let mut state = self.state.lock();
        let category = state.category_ref(category_id)?;
        let tags = state.intern_tags(&new.tags);
        let bookmark = Bookmark {
            id: BookmarkId(state.next_id()),
            url: new.url.clone(),
            title: new.title.clone().unwrap_or_default(),
            description: new.description.clone().filter(|d| !d.is_empty()),
            category: Some(category),
            tags,
            thumbnail_url: new.thumbnail_url.clone(),
        };
        state.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn update_bookmark(&self, id: BookmarkId, update: &BookmarkUpdate) -> GatewayResult<Bookmark> {
        self.enter("update_bookmark")?;
        let mut state = self.state.lock();
        let category = match update.category_id {
            Some(category_id) => Some(state.category_ref(category_id)?),
            None => None,
        };
        let tags = update.tags.as_ref().map(|names| state.intern_tags(names));

        let bookmark = state
            .bookmarks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("Bookmark", id))?;
        if let Some(url) = update.url.as_ref().filter(|u| !u.is_empty()) {
            bookmark.url = url.clone();
        }
        if let Some(title) = update.title.as_ref().filter(|t| !t.is_empty()) {
            bookmark.title = title.clone();
        }
        if let Some(description) = update.description.as_ref().filter(|d| !d.is_empty()) {
            bookmark.description = Some(description.clone());
        }
        if let Some(thumbnail) = update.thumbnail_url.as_ref().filter(|t| !t.is_empty()) {
            bookmark.thumbnail_url = Some(thumbnail.clone());
        }
        if category.is_some() {
            bookmark.category = category;
        }
        if let Some(tags) = tags {
            bookmark.tags = tags;
        }
        Ok(bookmark.clone())
    }

    async fn delete_bookmark(&self, id: BookmarkId) -> GatewayResult<()> {
        self.enter("delete_bookmark")?;
        self.state.lock().bookmarks.retain(|b| b.id != id);
        Ok(())
    }

    async fn search_bookmarks(&self, keyword: &str) -> GatewayResult<Vec<Bookmark>> {
        self.enter("search_bookmarks")?;
        Ok(self
            .state
            .lock()
            .bookmarks
            .iter()
            .filter(|b| matches_keyword(b, keyword))
            .cloned()
            .collect())
    }

    async fn analyze_url(&self, url: &str) -> GatewayResult<AnalysisResult> {
        self.enter("analyze_url")?;
        Ok(self
            .state
            .lock()
            .analyses
            .get(url)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_categories(&self) -> GatewayResult<Vec<Category>> {
        self.enter("list_categories")?;
        Ok(self.state.lock().categories.clone())
    }

    async fn get_category(&self, id: CategoryId) -> GatewayResult<Category> {
        self.enter("get_category")?;
        self.state
            .lock()
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| not_found("Category", id))
    }

    async fn create_category(&self, name: &str) -> GatewayResult<Category> {
        self.enter("create_category")?;
        if name.trim().is_empty() {
            return Err(bad_request("name is required"));
        }
        let mut state = self.state.lock();
        if state.categories.iter().any(|c| c.name == name) {
            return Err(GatewayError::Service {
                status: 409,
                message: Some(format!("Category already exists: {}", name)),
            });
        }
        let category = Category {
            id: CategoryId(state.next_id()),
            name: name.to_string(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: CategoryId, name: &str) -> GatewayResult<Category> {
        self.enter("update_category")?;
        if name.trim().is_empty() {
            return Err(bad_request("name is required"));
        }
        let mut state = self.state.lock();
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("Category", id))?;
        category.name = name.to_string();
        let renamed = category.clone();
        for bookmark in state.bookmarks.iter_mut() {
            if let Some(reference) = bookmark.category.as_mut().filter(|r| r.id == id) {
                reference.name = Some(renamed.name.clone());
            }
        }
        Ok(renamed)
    }

    async fn delete_category(&self, id: CategoryId) -> GatewayResult<()> {
        self.enter("delete_category")?;
        self.state.lock().categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn list_tags(&self) -> GatewayResult<Vec<Tag>> {
        self.enter("list_tags")?;
        Ok(self.state.lock().tags.clone())
    }

    async fn list_popular_tags(&self) -> GatewayResult<Vec<Tag>> {
        self.enter("list_popular_tags")?;
        let state = self.state.lock();
        let mut counted: Vec<(usize, Tag)> = state
            .tags
            .iter()
            .map(|tag| {
                let uses = state
                    .bookmarks
                    .iter()
                    .filter(|b| b.tags.iter().any(|t| t.id == tag.id))
                    .count();
                (uses, tag.clone())
            })
            .filter(|(uses, _)| *uses > 0)
            .collect();
        counted.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(counted.into_iter().map(|(_, tag)| tag).take(10).collect())
    }
}
