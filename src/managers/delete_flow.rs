//! Confirmed delete flow, shared by bookmarks and categories.
//!
//! Exactly one target can be pending at a time: a second request while one
//! is awaiting confirmation or in flight is refused rather than queued.

use std::fmt;

use crate::types::bookmark::{BookmarkId, CategoryId};
use crate::types::errors::FlowError;

const FLOW: &str = "delete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Bookmark(BookmarkId),
    Category(CategoryId),
}

impl DeleteTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            DeleteTarget::Bookmark(_) => "bookmark",
            DeleteTarget::Category(_) => "category",
        }
    }

    /// Question shown in the confirmation dialog.
    pub fn confirmation_prompt(&self) -> String {
        match self {
            DeleteTarget::Bookmark(_) => "Are you sure you want to delete this bookmark?".to_string(),
            DeleteTarget::Category(_) => {
                "Are you sure you want to delete this category? Its bookmarks are kept.".to_string()
            }
        }
    }
}

impl fmt::Display for DeleteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteTarget::Bookmark(id) => write!(f, "bookmark {}", id),
            DeleteTarget::Category(id) => write!(f, "category {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteFlowState {
    Idle,
    Confirming(DeleteTarget),
    Deleting(DeleteTarget),
}

#[derive(Debug)]
pub struct DeleteFlow {
    state: DeleteFlowState,
}

impl Default for DeleteFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self {
            state: DeleteFlowState::Idle,
        }
    }

    pub fn state(&self) -> DeleteFlowState {
        self.state
    }

    pub fn pending(&self) -> Option<DeleteTarget> {
        match self.state {
            DeleteFlowState::Idle => None,
            DeleteFlowState::Confirming(t) | DeleteFlowState::Deleting(t) => Some(t),
        }
    }

    /// `Idle -> Confirming(target)`.
    pub fn request(&mut self, target: DeleteTarget) -> Result<(), FlowError> {
        match self.state {
            DeleteFlowState::Idle => {
                self.state = DeleteFlowState::Confirming(target);
                Ok(())
            }
            DeleteFlowState::Confirming(held) | DeleteFlowState::Deleting(held) => {
                Err(FlowError::DeletePending(held.to_string()))
            }
        }
    }

    /// `Confirming -> Idle`, discarding the target.
    pub fn cancel(&mut self) -> Result<DeleteTarget, FlowError> {
        match self.state {
            DeleteFlowState::Confirming(target) => {
                self.state = DeleteFlowState::Idle;
                Ok(target)
            }
            state => Err(FlowError::invalid_state(FLOW, state)),
        }
    }

    /// `Confirming -> Deleting`.
    pub fn start_delete(&mut self) -> Result<DeleteTarget, FlowError> {
        match self.state {
            DeleteFlowState::Confirming(target) => {
                self.state = DeleteFlowState::Deleting(target);
                Ok(target)
            }
            state => Err(FlowError::invalid_state(FLOW, state)),
        }
    }

    /// `Deleting -> Idle`, whatever the outcome.
    pub fn finish(&mut self) -> Result<DeleteTarget, FlowError> {
        match self.state {
            DeleteFlowState::Deleting(target) => {
                self.state = DeleteFlowState::Idle;
                Ok(target)
            }
            state => Err(FlowError::invalid_state(FLOW, state)),
        }
    }
}
