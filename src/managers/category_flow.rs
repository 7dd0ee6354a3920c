//! Create/edit category flow.
//!
//! Same shape as the bookmark flow without the enrichment step:
//! `Idle -> Editing -> Submitting -> {Idle, Editing}`.

use tracing::debug;

use crate::types::bookmark::{Category, CategoryId};
use crate::types::errors::{FlowError, ValidationError};

const FLOW: &str = "category";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFlowState {
    Idle,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryTarget {
    New,
    Existing(CategoryId),
}

#[derive(Debug)]
pub struct CategoryFlow {
    state: CategoryFlowState,
    target: Option<CategoryTarget>,
    name: String,
    error: Option<String>,
}

impl Default for CategoryFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryFlow {
    pub fn new() -> Self {
        Self {
            state: CategoryFlowState::Idle,
            target: None,
            name: String::new(),
            error: None,
        }
    }

    pub fn state(&self) -> CategoryFlowState {
        self.state
    }

    pub fn target(&self) -> Option<CategoryTarget> {
        self.target
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the submit action should be offered at all.
    pub fn can_submit(&self) -> bool {
        self.state == CategoryFlowState::Editing && !self.name.trim().is_empty()
    }

    pub fn begin_create(&mut self) -> Result<(), FlowError> {
        self.enter_editing(CategoryTarget::New, String::new())
    }

    pub fn begin_edit(&mut self, category: &Category) -> Result<(), FlowError> {
        self.enter_editing(CategoryTarget::Existing(category.id), category.name.clone())
    }

    fn enter_editing(&mut self, target: CategoryTarget, name: String) -> Result<(), FlowError> {
        if self.state != CategoryFlowState::Idle {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        debug!(?target, "category flow: editing");
        self.state = CategoryFlowState::Editing;
        self.target = Some(target);
        self.name = name;
        self.error = None;
        Ok(())
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), FlowError> {
        if self.state != CategoryFlowState::Editing {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), FlowError> {
        match self.state {
            CategoryFlowState::Idle | CategoryFlowState::Editing => {
                self.reset();
                Ok(())
            }
            state => Err(FlowError::invalid_state(FLOW, state)),
        }
    }

    /// `Editing -> Submitting`. Returns the target and the trimmed name.
    pub fn start_submit(&mut self) -> Result<(CategoryTarget, String), FlowError> {
        if self.state != CategoryFlowState::Editing {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        let target = self
            .target
            .ok_or_else(|| FlowError::invalid_state(FLOW, self.state))?;
        let name = self.name.trim().to_string();
        if name.is_empty() {
            let error = ValidationError::MissingName;
            self.error = Some(error.to_string());
            return Err(FlowError::Validation(error));
        }
        self.state = CategoryFlowState::Submitting;
        self.error = None;
        Ok((target, name))
    }

    /// `Submitting -> Idle`.
    pub fn finish_submit(&mut self) -> Result<(), FlowError> {
        if self.state != CategoryFlowState::Submitting {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        debug!("category flow: submitted");
        self.reset();
        Ok(())
    }

    /// `Submitting -> Editing`, keeping the typed name.
    pub fn fail_submit(&mut self, message: String) -> Result<(), FlowError> {
        if self.state != CategoryFlowState::Submitting {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        self.error = Some(message);
        self.state = CategoryFlowState::Editing;
        Ok(())
    }

    fn reset(&mut self) {
        self.state = CategoryFlowState::Idle;
        self.target = None;
        self.name.clear();
        self.error = None;
    }
}
