//! Create/edit bookmark flow.
//!
//! States: `Idle -> Editing -> [Analyzing -> Editing] -> Submitting`, then
//! back to `Idle` on success or to `Editing` on failure. The transition
//! methods here are synchronous; `MutationFlowController` wraps them around
//! the gateway calls.

use tracing::debug;

use crate::types::analysis::{AnalysisResult, SuggestedCategory};
use crate::types::bookmark::{Bookmark, BookmarkId, BookmarkUpdate, Category, CategoryId, NewBookmark};
use crate::types::errors::{FlowError, ValidationError};

const FLOW: &str = "bookmark";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkFlowState {
    Idle,
    Editing,
    Analyzing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkTarget {
    New,
    Existing(BookmarkId),
}

/// Raw form fields as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkForm {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Category id as text; coerced to an integer on submit.
    pub category_id: String,
    /// Comma-delimited tag names.
    pub tags: String,
}

impl BookmarkForm {
    /// Seeds the form from an existing bookmark.
    pub fn from_bookmark(bookmark: &Bookmark) -> Self {
        Self {
            url: bookmark.url.clone(),
            title: bookmark.title.clone(),
            description: bookmark.description.clone().unwrap_or_default(),
            category_id: bookmark
                .category_id()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            tags: bookmark.joined_tags(),
        }
    }
}

/// What a submit sends to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkSubmission {
    Create(NewBookmark),
    Update(BookmarkId, BookmarkUpdate),
}

/// Splits a comma-delimited tag field into trimmed, non-empty names.
///
/// Duplicates are kept; the service decides tag identity.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Coerces the category field to an id.
pub fn parse_category_id(raw: &str) -> Result<CategoryId, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map(CategoryId)
        .map_err(|_| ValidationError::InvalidCategoryId(raw.to_string()))
}

/// Folds an enrichment result into the form.
///
/// A field is overwritten only when the result carries a non-empty value, so
/// an empty result never blanks something the user typed.
pub fn merge_analysis(form: &mut BookmarkForm, result: &AnalysisResult, categories: &[Category]) {
    if let Some(title) = non_empty(result.title.as_deref()) {
        form.title = title.to_string();
    }
    if let Some(description) = non_empty(result.description.as_deref()) {
        form.description = description.to_string();
    }
    if let Some(tags) = &result.tags {
        let names: Vec<&str> = tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
        if !names.is_empty() {
            form.tags = names.join(", ");
        }
    }
    if let Some(id) = result
        .suggested_category
        .as_ref()
        .and_then(|s| resolve_suggestion(s, categories))
    {
        form.category_id = id.to_string();
    }
}

fn resolve_suggestion(suggestion: &SuggestedCategory, categories: &[Category]) -> Option<CategoryId> {
    match suggestion {
        SuggestedCategory::Id(id) => Some(CategoryId(*id)),
        SuggestedCategory::Name(name) => {
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
                .map(|c| c.id)
                .or_else(|| name.parse::<i64>().ok().map(CategoryId))
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug)]
pub struct BookmarkFlow {
    state: BookmarkFlowState,
    target: Option<BookmarkTarget>,
    form: BookmarkForm,
    error: Option<String>,
}

impl Default for BookmarkFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl BookmarkFlow {
    pub fn new() -> Self {
        Self {
            state: BookmarkFlowState::Idle,
            target: None,
            form: BookmarkForm::default(),
            error: None,
        }
    }

    pub fn state(&self) -> BookmarkFlowState {
        self.state
    }

    pub fn target(&self) -> Option<BookmarkTarget> {
        self.target
    }

    pub fn form(&self) -> &BookmarkForm {
        &self.form
    }

    /// Flow-scoped error from the last failed step.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_create(&mut self) -> Result<(), FlowError> {
        self.enter_editing(BookmarkTarget::New, BookmarkForm::default())
    }

    pub fn begin_edit(&mut self, bookmark: &Bookmark) -> Result<(), FlowError> {
        self.enter_editing(
            BookmarkTarget::Existing(bookmark.id),
            BookmarkForm::from_bookmark(bookmark),
        )
    }

    fn enter_editing(&mut self, target: BookmarkTarget, form: BookmarkForm) -> Result<(), FlowError> {
        if self.state != BookmarkFlowState::Idle {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        debug!(?target, "bookmark flow: editing");
        self.state = BookmarkFlowState::Editing;
        self.target = Some(target);
        self.form = form;
        self.error = None;
        Ok(())
    }

    /// Form access for user edits. Only while `Editing`.
    pub fn form_mut(&mut self) -> Result<&mut BookmarkForm, FlowError> {
        if self.state != BookmarkFlowState::Editing {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        Ok(&mut self.form)
    }

    /// Abandons the edit. Not possible while a request is outstanding.
    pub fn cancel(&mut self) -> Result<(), FlowError> {
        match self.state {
            BookmarkFlowState::Idle | BookmarkFlowState::Editing => {
                self.reset();
                Ok(())
            }
            state => Err(FlowError::invalid_state(FLOW, state)),
        }
    }

    /// `Editing -> Analyzing`. Returns the url to analyze.
    ///
    /// An empty url fails validation and leaves the flow in `Editing`.
    pub fn start_analysis(&mut self) -> Result<String, FlowError> {
        if self.state != BookmarkFlowState::Editing {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        let url = self.form.url.trim().to_string();
        if url.is_empty() {
            return Err(self.reject(ValidationError::MissingUrl));
        }
        self.state = BookmarkFlowState::Analyzing;
        self.error = None;
        Ok(url)
    }

    /// `Analyzing -> Editing`, merging the result into the form.
    pub fn finish_analysis(
        &mut self,
        result: &AnalysisResult,
        categories: &[Category],
    ) -> Result<(), FlowError> {
        self.expect_state(BookmarkFlowState::Analyzing)?;
        merge_analysis(&mut self.form, result, categories);
        self.state = BookmarkFlowState::Editing;
        Ok(())
    }

    /// `Analyzing -> Editing` with an error message; the form is untouched.
    pub fn fail_analysis(&mut self, message: String) -> Result<(), FlowError> {
        self.expect_state(BookmarkFlowState::Analyzing)?;
        self.error = Some(message);
        self.state = BookmarkFlowState::Editing;
        Ok(())
    }

    /// `Editing -> Submitting`. Validates the form and builds the request.
    pub fn start_submit(&mut self) -> Result<BookmarkSubmission, FlowError> {
        if self.state != BookmarkFlowState::Editing {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        let target = self
            .target
            .ok_or_else(|| FlowError::invalid_state(FLOW, self.state))?;

        let submission = match self.build_submission(target) {
            Ok(submission) => submission,
            Err(e) => return Err(self.reject(e)),
        };
        self.state = BookmarkFlowState::Submitting;
        self.error = None;
        Ok(submission)
    }

    fn build_submission(&self, target: BookmarkTarget) -> Result<BookmarkSubmission, ValidationError> {
        let url = self.form.url.trim();
        if url.is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        let category_id = parse_category_id(&self.form.category_id)?;
        let tags = parse_tags(&self.form.tags);

        Ok(match target {
            BookmarkTarget::New => BookmarkSubmission::Create(NewBookmark {
                url: url.to_string(),
                title: optional(&self.form.title),
                description: optional(&self.form.description),
                category_id: Some(category_id),
                thumbnail_url: None,
                tags,
            }),
            BookmarkTarget::Existing(id) => BookmarkSubmission::Update(
                id,
                BookmarkUpdate {
                    url: Some(url.to_string()),
                    title: optional(&self.form.title),
                    description: optional(&self.form.description),
                    category_id: Some(category_id),
                    thumbnail_url: None,
                    tags: Some(tags),
                    reanalyze: false,
                },
            ),
        })
    }

    /// `Submitting -> Idle`.
    pub fn finish_submit(&mut self) -> Result<(), FlowError> {
        self.expect_state(BookmarkFlowState::Submitting)?;
        debug!("bookmark flow: submitted");
        self.reset();
        Ok(())
    }

    /// `Submitting -> Editing`, keeping the form for a retry.
    pub fn fail_submit(&mut self, message: String) -> Result<(), FlowError> {
        self.expect_state(BookmarkFlowState::Submitting)?;
        self.error = Some(message);
        self.state = BookmarkFlowState::Editing;
        Ok(())
    }

    fn expect_state(&self, expected: BookmarkFlowState) -> Result<(), FlowError> {
        if self.state != expected {
            return Err(FlowError::invalid_state(FLOW, self.state));
        }
        Ok(())
    }

    fn reject(&mut self, error: ValidationError) -> FlowError {
        self.error = Some(error.to_string());
        FlowError::Validation(error)
    }

    fn reset(&mut self) {
        self.state = BookmarkFlowState::Idle;
        self.target = None;
        self.form = BookmarkForm::default();
        self.error = None;
    }
}
