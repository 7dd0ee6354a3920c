//! HTTP implementation of the remote gateway.
//!
//! Talks to the LearnHub REST service with `reqwest`. Mutations send their
//! fields as query parameters (tags as repeated `tags` keys), the URL analysis
//! call sends a JSON body. Every request carries the session's bearer token
//! when one is active.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{json, Value};
use tracing::debug;

use super::payload::{classify, coerce_list, decode_one};
use super::{GatewayResult, RemoteGateway};
use crate::managers::session_manager::{IdentitySession, SessionManagerTrait};
use crate::types::analysis::AnalysisResult;
use crate::types::bookmark::{
    Bookmark, BookmarkId, BookmarkUpdate, Category, CategoryId, NewBookmark, Tag,
};
use crate::types::errors::GatewayError;
use crate::types::session::LoginResponse;
use crate::types::settings::ApiSettings;

/// Gateway backed by the remote REST service.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    session: IdentitySession,
}

impl HttpGateway {
    pub fn new(settings: &ApiSettings, session: IdentitySession) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match self.session.bearer() {
            Some(bearer) => builder.header(reqwest::header::AUTHORIZATION, bearer),
            None => builder,
        }
    }

    async fn send(&self, label: &str, builder: RequestBuilder) -> GatewayResult<Value> {
        debug!(call = label, "gateway request");
        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        debug!(call = label, status, "gateway response");
        classify(status, &body).into_result()
    }

    async fn send_delete(&self, label: &str, path: &str) -> GatewayResult<()> {
        let result = self.send(label, self.request(Method::DELETE, path)).await;
        delete_outcome(label, result)
    }
}

/// Deletes are idempotent from the caller's view: a missing target is fine.
fn delete_outcome(label: &str, result: GatewayResult<Value>) -> GatewayResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(GatewayError::Service { status: 404, .. }) => {
            debug!(call = label, "target already gone");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Query parameters for a bookmark creation request.
pub fn new_bookmark_query(new: &NewBookmark) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(category_id) = new.category_id {
        query.push(("categoryId", category_id.to_string()));
    }
    query.push(("url", new.url.clone()));
    push_non_empty(&mut query, "title", new.title.as_deref());
    push_non_empty(&mut query, "description", new.description.as_deref());
    push_non_empty(&mut query, "thumbnailUrl", new.thumbnail_url.as_deref());
    for tag in &new.tags {
        query.push(("tags", tag.clone()));
    }
    query
}

/// Query parameters for a partial bookmark update. Absent and empty fields are omitted.
pub fn bookmark_update_query(update: &BookmarkUpdate) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    push_non_empty(&mut query, "url", update.url.as_deref());
    push_non_empty(&mut query, "title", update.title.as_deref());
    push_non_empty(&mut query, "description", update.description.as_deref());
    push_non_empty(&mut query, "thumbnailUrl", update.thumbnail_url.as_deref());
    if let Some(category_id) = update.category_id {
        query.push(("categoryId", category_id.to_string()));
    }
    if let Some(tags) = &update.tags {
        for tag in tags {
            query.push(("tags", tag.clone()));
        }
    }
    if update.reanalyze {
        query.push(("reanalyze", "true".to_string()));
    }
    query
}

fn push_non_empty(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        query.push((key, v.to_string()));
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn login(&self, email: &str, password: &str) -> GatewayResult<String> {
        let builder = self
            .request(Method::POST, "/auth/login")
            .json(&json!({ "email": email, "password": password }));
        let value = self.send("login", builder).await?;
        let response: LoginResponse = decode_one(value)?;
        Ok(response.token)
    }

    async fn register(&self, email: &str, password: &str, role: &str) -> GatewayResult<()> {
        let builder = self
            .request(Method::POST, "/auth/register")
            .json(&json!({ "email": email, "password": password, "role": role }));
        self.send("register", builder).await.map(|_| ())
    }

    async fn list_bookmarks(&self) -> GatewayResult<Vec<Bookmark>> {
        let value = self.send("list_bookmarks", self.request(Method::GET, "/bookmarks")).await?;
        Ok(coerce_list("bookmarks", value))
    }

    async fn get_bookmark(&self, id: BookmarkId) -> GatewayResult<Bookmark> {
        let path = format!("/bookmarks/{}", id);
        decode_one(self.send("get_bookmark", self.request(Method::GET, &path)).await?)
    }

    async fn create_bookmark(&self, new: &NewBookmark) -> GatewayResult<Bookmark> {
        let builder = self
            .request(Method::POST, "/bookmarks")
            .query(&new_bookmark_query(new));
        decode_one(self.send("create_bookmark", builder).await?)
    }

    async fn update_bookmark(&self, id: BookmarkId, update: &BookmarkUpdate) -> GatewayResult<Bookmark> {
        let path = format!("/bookmarks/{}", id);
        let builder = self
            .request(Method::PUT, &path)
            .query(&bookmark_update_query(update));
        decode_one(self.send("update_bookmark", builder).await?)
    }

    async fn delete_bookmark(&self, id: BookmarkId) -> GatewayResult<()> {
        self.send_delete("delete_bookmark", &format!("/bookmarks/{}", id)).await
    }

    async fn search_bookmarks(&self, keyword: &str) -> GatewayResult<Vec<Bookmark>> {
        let builder = self
            .request(Method::GET, "/bookmarks/search")
            .query(&[("keyword", keyword)]);
        let value = self.send("search_bookmarks", builder).await?;
        Ok(coerce_list("search results", value))
    }

    async fn analyze_url(&self, url: &str) -> GatewayResult<AnalysisResult> {
        let builder = self
            .request(Method::POST, "/bookmarks/analyze")
            .json(&json!({ "url": url }));
        decode_one(self.send("analyze_url", builder).await?)
    }

    async fn list_categories(&self) -> GatewayResult<Vec<Category>> {
        let value = self.send("list_categories", self.request(Method::GET, "/categories")).await?;
        Ok(coerce_list("categories", value))
    }

    async fn get_category(&self, id: CategoryId) -> GatewayResult<Category> {
        let path = format!("/categories/{}", id);
        decode_one(self.send("get_category", self.request(Method::GET, &path)).await?)
    }

    async fn create_category(&self, name: &str) -> GatewayResult<Category> {
        let builder = self
            .request(Method::POST, "/categories")
            .query(&[("name", name)]);
        decode_one(self.send("create_category", builder).await?)
    }

    async fn update_category(&self, id: CategoryId, name: &str) -> GatewayResult<Category> {
        let path = format!("/categories/{}", id);
        let builder = self.request(Method::PUT, &path).query(&[("name", name)]);
        decode_one(self.send("update_category", builder).await?)
    }

    async fn delete_category(&self, id: CategoryId) -> GatewayResult<()> {
        self.send_delete("delete_category", &format!("/categories/{}", id)).await
    }

    async fn list_tags(&self) -> GatewayResult<Vec<Tag>> {
        let value = self.send("list_tags", self.request(Method::GET, "/tags")).await?;
        Ok(coerce_list("tags", value))
    }

    async fn list_popular_tags(&self) -> GatewayResult<Vec<Tag>> {
        let value = self
            .send("list_popular_tags", self.request(Method::GET, "/tags/popular"))
            .await?;
        Ok(coerce_list("popular tags", value))
    }
}
