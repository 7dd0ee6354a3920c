//! Remote Gateway for LearnHub.
//!
//! `RemoteGateway` is the transport-agnostic contract the client core talks
//! to. `http::HttpGateway` speaks to the real service; `memory::InMemoryGateway`
//! implements the same contract in-process.

use async_trait::async_trait;

use crate::types::analysis::AnalysisResult;
use crate::types::bookmark::{
    Bookmark, BookmarkId, BookmarkUpdate, Category, CategoryId, NewBookmark, Tag,
};
use crate::types::errors::GatewayError;

#[cfg(feature = "network")]
pub mod http;
pub mod memory;
pub mod payload;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Operations offered by the bookmark service.
///
/// List operations never fail on a malformed body: a payload that is not a
/// sequence decodes to an empty one.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> GatewayResult<String>;
    async fn register(&self, email: &str, password: &str, role: &str) -> GatewayResult<()>;

    async fn list_bookmarks(&self) -> GatewayResult<Vec<Bookmark>>;
    async fn get_bookmark(&self, id: BookmarkId) -> GatewayResult<Bookmark>;
    async fn create_bookmark(&self, new: &NewBookmark) -> GatewayResult<Bookmark>;
    async fn update_bookmark(&self, id: BookmarkId, update: &BookmarkUpdate) -> GatewayResult<Bookmark>;
    async fn delete_bookmark(&self, id: BookmarkId) -> GatewayResult<()>;
    async fn search_bookmarks(&self, keyword: &str) -> GatewayResult<Vec<Bookmark>>;
    async fn analyze_url(&self, url: &str) -> GatewayResult<AnalysisResult>;

    async fn list_categories(&self) -> GatewayResult<Vec<Category>>;
    async fn get_category(&self, id: CategoryId) -> GatewayResult<Category>;
    async fn create_category(&self, name: &str) -> GatewayResult<Category>;
    async fn update_category(&self, id: CategoryId, name: &str) -> GatewayResult<Category>;
    async fn delete_category(&self, id: CategoryId) -> GatewayResult<()>;

    async fn list_tags(&self) -> GatewayResult<Vec<Tag>>;
    async fn list_popular_tags(&self) -> GatewayResult<Vec<Tag>>;
}
