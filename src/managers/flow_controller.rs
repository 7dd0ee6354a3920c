//! Mutation Flow Controller for LearnHub.
//!
//! Sequences the multi-step user actions (bookmark edit with optional
//! enrichment, category edit, confirmed delete) around gateway calls and
//! commits successful results into the collection store. Every mutation of
//! the store after a load goes through here.
//!
//! Each flow refuses to start a request while its own previous request is
//! outstanding; the flows' state, not a lock, is what enforces this.

use std::sync::Arc;

use tracing::{info, warn};

use crate::gateway::{GatewayResult, RemoteGateway};
use crate::managers::bookmark_flow::{BookmarkFlow, BookmarkSubmission};
use crate::managers::category_flow::{CategoryFlow, CategoryTarget};
use crate::managers::collection_store::CollectionStore;
use crate::managers::delete_flow::{DeleteFlow, DeleteTarget};
use crate::managers::session_manager::IdentitySession;
use crate::services::notifications::EventChannel;
use crate::types::bookmark::{Bookmark, Category};
use crate::types::errors::{FlowError, GatewayError};

const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

pub struct MutationFlowController {
    gateway: Arc<dyn RemoteGateway>,
    session: IdentitySession,
    events: EventChannel,
    bookmark: BookmarkFlow,
    category: CategoryFlow,
    delete: DeleteFlow,
}

impl MutationFlowController {
    pub fn new(gateway: Arc<dyn RemoteGateway>, session: IdentitySession, events: EventChannel) -> Self {
        Self {
            gateway,
            session,
            events,
            bookmark: BookmarkFlow::new(),
            category: CategoryFlow::new(),
            delete: DeleteFlow::new(),
        }
    }

    pub fn bookmark_flow(&self) -> &BookmarkFlow {
        &self.bookmark
    }

    /// Synchronous transitions (begin, edit form, cancel) go through here.
    pub fn bookmark_flow_mut(&mut self) -> &mut BookmarkFlow {
        &mut self.bookmark
    }

    pub fn category_flow(&self) -> &CategoryFlow {
        &self.category
    }

    pub fn category_flow_mut(&mut self) -> &mut CategoryFlow {
        &mut self.category
    }

    pub fn delete_flow(&self) -> &DeleteFlow {
        &self.delete
    }

    fn guard<T>(&self, result: GatewayResult<T>) -> GatewayResult<T> {
        self.session.guard(result, &self.events)
    }

    fn failure_message(error: &GatewayError, fallback: &str) -> String {
        if error.is_unauthorized() {
            SESSION_EXPIRED.to_string()
        } else {
            error.user_message(fallback)
        }
    }

    // ─── Bookmark flow ───

    /// Runs URL enrichment for the bookmark being edited.
    ///
    /// Needs a non-empty url; otherwise fails validation without a request.
    pub async fn analyze_bookmark_url(&mut self, store: &CollectionStore) -> Result<(), FlowError> {
        let url = self.bookmark.start_analysis()?;
        info!(url = %url, "analyzing bookmark url");

        let result = self.gateway.analyze_url(&url).await;
        match self.guard(result) {
            Ok(analysis) => {
                self.bookmark.finish_analysis(&analysis, store.categories())?;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "url analysis failed");
                self.bookmark.fail_analysis(Self::failure_message(
                    &e,
                    "AI analysis failed. Please fill in the details manually.",
                ))?;
                Err(FlowError::Gateway(e))
            }
        }
    }

    /// Submits the bookmark form and commits the result into the store.
    pub async fn submit_bookmark(&mut self, store: &mut CollectionStore) -> Result<Bookmark, FlowError> {
        let submission = self.bookmark.start_submit()?;

        let (result, success, fallback) = match &submission {
            BookmarkSubmission::Create(new) => (
                self.gateway.create_bookmark(new).await,
                "Bookmark created.",
                "Failed to create bookmark.",
            ),
            BookmarkSubmission::Update(id, update) => (
                self.gateway.update_bookmark(*id, update).await,
                "Bookmark updated.",
                "Failed to update bookmark.",
            ),
        };

        match self.guard(result) {
            Ok(bookmark) => {
                match submission {
                    BookmarkSubmission::Create(_) => store.apply_created_bookmark(bookmark.clone()),
                    BookmarkSubmission::Update(..) => store.apply_updated_bookmark(bookmark.clone()),
                }
                info!(id = %bookmark.id, "bookmark saved");
                self.bookmark.finish_submit()?;
                self.events.success(success);
                Ok(bookmark)
            }
            Err(e) => {
                warn!(error = %e, "bookmark submit failed");
                self.bookmark.fail_submit(Self::failure_message(&e, fallback))?;
                Err(FlowError::Gateway(e))
            }
        }
    }

    // ─── Category flow ───

    /// Submits the category form and commits the result into the store.
    pub async fn submit_category(&mut self, store: &mut CollectionStore) -> Result<Category, FlowError> {
        let (target, name) = self.category.start_submit()?;

        let (result, success, fallback) = match target {
            CategoryTarget::New => (
                self.gateway.create_category(&name).await,
                "Category created.",
                "Failed to create category.",
            ),
            CategoryTarget::Existing(id) => (
                self.gateway.update_category(id, &name).await,
                "Category updated.",
                "Failed to update category.",
            ),
        };

        match self.guard(result) {
            Ok(category) => {
                match target {
                    CategoryTarget::New => store.apply_created_category(category.clone()),
                    CategoryTarget::Existing(_) => store.apply_updated_category(category.clone()),
                }
                info!(id = %category.id, "category saved");
                self.category.finish_submit()?;
                self.events.success(success);
                Ok(category)
            }
            Err(e) => {
                warn!(error = %e, "category submit failed");
                self.category.fail_submit(Self::failure_message(&e, fallback))?;
                Err(FlowError::Gateway(e))
            }
        }
    }

    // ─── Delete flow ───

    /// Holds `target` for confirmation. Refused while another delete is pending.
    pub fn request_delete(&mut self, target: DeleteTarget) -> Result<(), FlowError> {
        self.delete.request(target)?;
        info!(%target, "delete awaiting confirmation");
        Ok(())
    }

    /// Drops the pending target without any request.
    pub fn cancel_delete(&mut self) -> Result<DeleteTarget, FlowError> {
        let target = self.delete.cancel()?;
        info!(%target, "delete cancelled");
        Ok(target)
    }

    /// Deletes the confirmed target and removes it from the store.
    ///
    /// The flow returns to idle whether or not the request succeeds; the
    /// outcome is reported through the notification channel.
    pub async fn confirm_delete(&mut self, store: &mut CollectionStore) -> Result<DeleteTarget, FlowError> {
        let target = self.delete.start_delete()?;

        let result = match target {
            DeleteTarget::Bookmark(id) => self.gateway.delete_bookmark(id).await,
            DeleteTarget::Category(id) => self.gateway.delete_category(id).await,
        };
        let result = self.guard(result);
        self.delete.finish()?;

        match result {
            Ok(()) => {
                match target {
                    DeleteTarget::Bookmark(id) => {
                        store.remove_bookmark(id);
                        self.events.success("Bookmark deleted.");
                    }
                    DeleteTarget::Category(id) => {
                        store.remove_category(id);
                        self.events.success("Category deleted.");
                    }
                }
                info!(%target, "deleted");
                Ok(target)
            }
            Err(e) => {
                warn!(%target, error = %e, "delete failed");
                let fallback = match target {
                    DeleteTarget::Bookmark(_) => "Failed to delete bookmark.",
                    DeleteTarget::Category(_) => "Failed to delete category.",
                };
                self.events.error(Self::failure_message(&e, fallback));
                Err(FlowError::Gateway(e))
            }
        }
    }
}
