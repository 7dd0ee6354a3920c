//! Unit tests for the bookmark create/edit flow.
//!
//! The first half exercises the synchronous state machine directly; the
//! second half drives it through the `MutationFlowController` against an
//! in-memory service.

use std::sync::Arc;

use learnhub::gateway::memory::InMemoryGateway;
use learnhub::managers::bookmark_flow::{
    merge_analysis, parse_tags, BookmarkFlow, BookmarkFlowState, BookmarkForm,
    BookmarkSubmission, BookmarkTarget,
};
use learnhub::managers::collection_store::CollectionStore;
use learnhub::managers::flow_controller::MutationFlowController;
use learnhub::managers::session_manager::IdentitySession;
use learnhub::services::notifications::{ClientEvent, EventChannel, EventReceiver, Notice, Route};
use learnhub::types::analysis::{AnalysisResult, SuggestedCategory};
use learnhub::types::bookmark::{Bookmark, Category, CategoryId};
use learnhub::types::errors::{FlowError, GatewayError, ValidationError};
use learnhub::types::session::AccessToken;

// ---------------------------------------------------------------------------
// Form helpers
// ---------------------------------------------------------------------------

#[test]
fn test_parse_tags_trims_and_drops_empty_segments() {
    assert_eq!(parse_tags("React, Spring,  AWS ,"), vec!["React", "Spring", "AWS"]);
    assert!(parse_tags(" , ,").is_empty());
}

/// An empty enrichment field never overwrites what the user typed.
#[test]
fn test_merge_keeps_tags_when_result_has_none() {
    let mut form = BookmarkForm {
        tags: "a,b".to_string(),
        ..Default::default()
    };
    let result = AnalysisResult {
        title: Some("New".to_string()),
        tags: Some(Vec::new()),
        ..Default::default()
    };

    merge_analysis(&mut form, &result, &[]);

    assert_eq!(form.title, "New");
    assert_eq!(form.tags, "a,b");
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[test]
fn test_begin_create_enters_editing_with_blank_form() {
    let mut flow = BookmarkFlow::new();
    flow.begin_create().unwrap();

    assert_eq!(flow.state(), BookmarkFlowState::Editing);
    assert_eq!(flow.target(), Some(BookmarkTarget::New));
    assert_eq!(flow.form().url, "");
}

#[test]
fn test_begin_twice_is_rejected() {
    let mut flow = BookmarkFlow::new();
    flow.begin_create().unwrap();
    assert!(matches!(
        flow.begin_create(),
        Err(FlowError::InvalidState { flow: "bookmark", .. })
    ));
}

/// Submitting without a url never builds a request.
#[test]
fn test_submit_without_url_fails_validation() {
    let mut flow = BookmarkFlow::new();
    flow.begin_create().unwrap();
    flow.form_mut().unwrap().category_id = "1".to_string();

    let err = flow.start_submit().unwrap_err();

    assert_eq!(err, FlowError::Validation(ValidationError::MissingUrl));
    assert_eq!(flow.state(), BookmarkFlowState::Editing);
    assert_eq!(flow.error(), Some("Please enter a URL first"));
}

#[test]
fn test_submit_with_non_numeric_category_fails_validation() {
    let mut flow = BookmarkFlow::new();
    flow.begin_create().unwrap();
    let form = flow.form_mut().unwrap();
    form.url = "https://a.io".to_string();
    form.category_id = "Backend".to_string();

    let err = flow.start_submit().unwrap_err();
    assert_eq!(
        err,
        FlowError::Validation(ValidationError::InvalidCategoryId("Backend".to_string()))
    );
}

#[test]
fn test_create_submission_shape() {
    let mut flow = BookmarkFlow::new();
    flow.begin_create().unwrap();
    let form = flow.form_mut().unwrap();
    form.url = "  https://a.io  ".to_string();
    form.category_id = "3".to_string();
    form.tags = "rust, , async,rust".to_string();

    let submission = flow.start_submit().unwrap();

    match submission {
        BookmarkSubmission::Create(new) => {
            assert_eq!(new.url, "https://a.io");
            assert_eq!(new.title, None);
            assert_eq!(new.description, None);
            assert_eq!(new.category_id, Some(CategoryId(3)));
            assert_eq!(new.tags, vec!["rust", "async", "rust"]);
        }
        other => panic!("expected create, got {:?}", other),
    }
    assert_eq!(flow.state(), BookmarkFlowState::Submitting);
}

/// While a request is outstanding the form is locked and cancel is refused.
#[test]
fn test_submitting_locks_the_flow() {
    let mut flow = BookmarkFlow::new();
    flow.begin_create().unwrap();
    let form = flow.form_mut().unwrap();
    form.url = "https://a.io".to_string();
    form.category_id = "1".to_string();
    flow.start_submit().unwrap();

    assert!(flow.form_mut().is_err());
    assert!(flow.cancel().is_err());
    assert!(flow.start_submit().is_err());
    assert!(flow.start_analysis().is_err());
}

#[test]
fn test_analysis_requires_url_and_stays_editing() {
    let mut flow = BookmarkFlow::new();
    flow.begin_create().unwrap();

    assert_eq!(
        flow.start_analysis().unwrap_err(),
        FlowError::Validation(ValidationError::MissingUrl)
    );
    assert_eq!(flow.state(), BookmarkFlowState::Editing);
}

#[test]
fn test_failed_analysis_leaves_form_untouched() {
    let mut flow = BookmarkFlow::new();
    flow.begin_create().unwrap();
    flow.form_mut().unwrap().url = "https://a.io".to_string();
    flow.form_mut().unwrap().title = "Mine".to_string();
    flow.start_analysis().unwrap();
    assert_eq!(flow.state(), BookmarkFlowState::Analyzing);

    flow.fail_analysis("nope".to_string()).unwrap();

    assert_eq!(flow.state(), BookmarkFlowState::Editing);
    assert_eq!(flow.form().title, "Mine");
    assert_eq!(flow.error(), Some("nope"));
}

/// Completion steps only apply to the step they complete.
#[test]
fn test_completions_rejected_outside_their_state() {
    let mut flow = BookmarkFlow::new();
    assert!(flow.fail_submit("late".to_string()).is_err());
    assert!(flow.finish_submit().is_err());
    assert_eq!(flow.state(), BookmarkFlowState::Idle);
    assert_eq!(flow.target(), None);

    flow.begin_create().unwrap();
    flow.form_mut().unwrap().title = "Mine".to_string();
    let result = AnalysisResult {
        title: Some("Theirs".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        flow.finish_analysis(&result, &[]),
        Err(FlowError::InvalidState { flow: "bookmark", .. })
    ));
    assert!(flow.fail_analysis("late".to_string()).is_err());

    assert_eq!(flow.state(), BookmarkFlowState::Editing);
    assert_eq!(flow.form().title, "Mine");
    assert_eq!(flow.error(), None);
}

#[test]
fn test_cancel_resets_form() {
    let mut flow = BookmarkFlow::new();
    flow.begin_create().unwrap();
    flow.form_mut().unwrap().url = "https://a.io".to_string();
    flow.cancel().unwrap();

    assert_eq!(flow.state(), BookmarkFlowState::Idle);
    assert_eq!(flow.target(), None);
    assert_eq!(flow.form().url, "");
}

// ---------------------------------------------------------------------------
// Through the controller
// ---------------------------------------------------------------------------

struct Fixture {
    gateway: Arc<InMemoryGateway>,
    session: IdentitySession,
    store: CollectionStore,
    flows: MutationFlowController,
    events: EventReceiver,
    backend: Category,
}

async fn setup() -> Fixture {
    let gateway = Arc::new(InMemoryGateway::new());
    let backend = gateway.seed_category("Backend");
    gateway.seed_category("Frontend");
    gateway.seed_bookmark("https://tokio.rs", "Tokio", Some(backend.id), &["rust"]);

    let session = IdentitySession::with_token(AccessToken::new("token"));
    let (channel, events) = EventChannel::channel();
    let mut store = CollectionStore::new(gateway.clone(), session.clone(), channel.clone());
    store.load_all().await.unwrap();
    let flows = MutationFlowController::new(gateway.clone(), session.clone(), channel);
    Fixture {
        gateway,
        session,
        store,
        flows,
        events,
        backend,
    }
}

fn fill(fx: &mut Fixture, url: &str, category: &str) {
    let form = fx.flows.bookmark_flow_mut().form_mut().unwrap();
    form.url = url.to_string();
    form.category_id = category.to_string();
}

#[tokio::test]
async fn test_create_adds_bookmark_and_notifies() {
    let mut fx = setup().await;
    fx.flows.bookmark_flow_mut().begin_create().unwrap();
    let backend_id = fx.backend.id.to_string();
    fill(&mut fx, "https://axum.rs", &backend_id);
    fx.flows.bookmark_flow_mut().form_mut().unwrap().tags = "rust, web".to_string();

    let created = fx.flows.submit_bookmark(&mut fx.store).await.unwrap();

    assert_eq!(created.url, "https://axum.rs");
    assert_eq!(created.tags.len(), 2);
    assert_eq!(fx.store.bookmarks().len(), 2);
    assert_eq!(fx.flows.bookmark_flow().state(), BookmarkFlowState::Idle);
    assert_eq!(
        fx.events.drain(),
        vec![ClientEvent::Notice(Notice::Success("Bookmark created.".to_string()))]
    );
}

#[tokio::test]
async fn test_validation_failure_sends_no_request() {
    let mut fx = setup().await;
    let before = fx.gateway.call_count();
    fx.flows.bookmark_flow_mut().begin_create().unwrap();
    fill(&mut fx, "", "1");

    let result = fx.flows.submit_bookmark(&mut fx.store).await;

    assert!(matches!(result, Err(FlowError::Validation(_))));
    assert_eq!(fx.gateway.call_count(), before);
    assert!(fx.events.drain().is_empty());
}

/// A service failure keeps the typed form and surfaces the server message.
#[tokio::test]
async fn test_create_failure_returns_to_editing() {
    let mut fx = setup().await;
    fx.flows.bookmark_flow_mut().begin_create().unwrap();
    fill(&mut fx, "https://axum.rs", "999");

    let result = fx.flows.submit_bookmark(&mut fx.store).await;

    assert!(matches!(
        result,
        Err(FlowError::Gateway(GatewayError::Service { status: 404, .. }))
    ));
    let flow = fx.flows.bookmark_flow();
    assert_eq!(flow.state(), BookmarkFlowState::Editing);
    assert_eq!(flow.form().url, "https://axum.rs");
    assert_eq!(flow.error(), Some("Category not found: 999"));
    assert_eq!(fx.store.bookmarks().len(), 1);
}

#[tokio::test]
async fn test_create_failure_without_message_uses_fallback() {
    let mut fx = setup().await;
    fx.flows.bookmark_flow_mut().begin_create().unwrap();
    fill(&mut fx, "https://axum.rs", "1");
    fx.gateway.fail_next(GatewayError::Network("timeout".to_string()));

    assert!(fx.flows.submit_bookmark(&mut fx.store).await.is_err());
    assert_eq!(
        fx.flows.bookmark_flow().error(),
        Some("Failed to create bookmark.")
    );
}

#[tokio::test]
async fn test_edit_updates_store_in_place() {
    let mut fx = setup().await;
    let existing: Bookmark = fx.store.bookmarks()[0].clone();
    fx.flows.bookmark_flow_mut().begin_edit(&existing).unwrap();
    assert_eq!(fx.flows.bookmark_flow().form().tags, "rust");
    fx.flows.bookmark_flow_mut().form_mut().unwrap().title = "Tokio runtime".to_string();

    let updated = fx.flows.submit_bookmark(&mut fx.store).await.unwrap();

    assert_eq!(updated.id, existing.id);
    assert_eq!(fx.store.bookmarks().len(), 1);
    assert_eq!(fx.store.bookmarks()[0].title, "Tokio runtime");
    assert_eq!(fx.gateway.calls_to("update_bookmark"), 1);
}

/// Enrichment fills fields and resolves a suggested category by name.
#[tokio::test]
async fn test_analysis_merges_into_form() {
    let mut fx = setup().await;
    fx.gateway.set_analysis(
        "https://axum.rs",
        AnalysisResult {
            title: Some("Axum".to_string()),
            description: Some("Web framework".to_string()),
            tags: Some(vec!["rust".to_string(), "http".to_string()]),
            suggested_category: Some(SuggestedCategory::Name("backend".to_string())),
        },
    );
    fx.flows.bookmark_flow_mut().begin_create().unwrap();
    fx.flows.bookmark_flow_mut().form_mut().unwrap().url = "https://axum.rs".to_string();

    fx.flows.analyze_bookmark_url(&fx.store).await.unwrap();

    let form = fx.flows.bookmark_flow().form();
    assert_eq!(form.title, "Axum");
    assert_eq!(form.description, "Web framework");
    assert_eq!(form.tags, "rust, http");
    assert_eq!(form.category_id, fx.backend.id.to_string());
    assert_eq!(fx.flows.bookmark_flow().state(), BookmarkFlowState::Editing);
}

#[tokio::test]
async fn test_analysis_failure_sets_flow_error() {
    let mut fx = setup().await;
    fx.flows.bookmark_flow_mut().begin_create().unwrap();
    fx.flows.bookmark_flow_mut().form_mut().unwrap().url = "https://axum.rs".to_string();
    fx.gateway.fail_next(GatewayError::Service {
        status: 502,
        message: None,
    });

    assert!(fx.flows.analyze_bookmark_url(&fx.store).await.is_err());
    assert_eq!(
        fx.flows.bookmark_flow().error(),
        Some("AI analysis failed. Please fill in the details manually.")
    );
    assert_eq!(fx.flows.bookmark_flow().state(), BookmarkFlowState::Editing);
}

/// An expired session during submit signs out and keeps the form.
#[tokio::test]
async fn test_unauthorized_submit_signs_out() {
    let mut fx = setup().await;
    fx.flows.bookmark_flow_mut().begin_create().unwrap();
    fill(&mut fx, "https://axum.rs", "1");
    fx.gateway.fail_next(GatewayError::Unauthorized);

    let result = fx.flows.submit_bookmark(&mut fx.store).await;

    assert_eq!(result.unwrap_err(), FlowError::Gateway(GatewayError::Unauthorized));
    assert!(!fx.session.is_active());
    assert_eq!(fx.events.drain(), vec![ClientEvent::Navigate(Route::Login)]);
    assert_eq!(fx.flows.bookmark_flow().state(), BookmarkFlowState::Editing);
    assert_eq!(
        fx.flows.bookmark_flow().error(),
        Some("Your session has expired. Please log in again.")
    );
}
