pub mod flashcards;
pub mod templates;

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::LogOnError;
use crate::state::AppState;

use templates::IndexTemplate;

pub use flashcards::{
  flashcards_flip, flashcards_leave, flashcards_next, flashcards_panel, flashcards_prev,
  flashcards_start, flashcards_state, practice_select, practice_submit,
};

/// Subtopic listing
pub async fn index(State(state): State<AppState>) -> Html<String> {
  let listed = state
    .loader
    .list_subtopics()
    .await
    .log_warn("Failed to list subtopics");
  let load_failed = listed.is_none();
  let subtopics = listed.unwrap_or_default();

  let template = IndexTemplate {
    subtopics,
    load_failed,
  };
  Html(template.render().unwrap_or_default())
}

/// All routes, with sign media served from `media_dir`
pub fn router(state: AppState, media_dir: &Path) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/flashcards", get(flashcards_start))
    .route("/flashcards/panel", get(flashcards_panel))
    .route("/flashcards/next", post(flashcards_next))
    .route("/flashcards/prev", post(flashcards_prev))
    .route("/flashcards/flip", post(flashcards_flip))
    .route("/flashcards/practice/select", post(practice_select))
    .route("/flashcards/practice/submit", post(practice_submit))
    .route("/flashcards/leave", post(flashcards_leave))
    .route("/api/flashcards/state", get(flashcards_state))
    .nest_service("/media", ServeDir::new(media_dir))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
