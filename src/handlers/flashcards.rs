//! Flashcard learn/practice handlers.
//!
//! The page is rendered once per deck load; every action afterwards returns
//! the panel partial for htmx to swap in.

use askama::Template;
use axum::Form;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::config;
use crate::flashcard::{FlashcardSession, SessionView, SubmitOutcome};
use crate::state::AppState;

use super::templates::{
  EmptyDeckTemplate, FlashcardPanelTemplate, FlashcardQuery, FlashcardsTemplate, SelectAnswerForm,
};

const NO_SESSION_HTML: &str =
  "<section id=\"flashcard-panel\"><p>Your session has ended. <a href=\"/\">Pick a subtopic</a> to start again.</p></section>";

fn session_id(jar: &CookieJar) -> Option<String> {
  jar.get(config::SESSION_COOKIE).map(|c| c.value().to_string())
}

fn session_cookie(id: String) -> Cookie<'static> {
  Cookie::build((config::SESSION_COOKIE, id))
    .path("/")
    .http_only(true)
    .build()
}

fn expired_cookie() -> Cookie<'static> {
  Cookie::build(config::SESSION_COOKIE).path("/").build()
}

fn empty_state(message: &str) -> Html<String> {
  let template = EmptyDeckTemplate {
    message: message.to_string(),
  };
  Html(template.render().unwrap_or_default())
}

fn render_panel(state: &AppState, view: SessionView) -> Html<String> {
  let template = FlashcardPanelTemplate {
    view,
    completion_delay_ms: state.completion_delay.as_millis() as u64,
  };
  Html(template.render().unwrap_or_default())
}

/// Run `f` on the cookie's session and render the panel afterwards
fn with_panel(
  state: &AppState,
  jar: &CookieJar,
  f: impl FnOnce(&mut FlashcardSession),
) -> Response {
  let view = session_id(jar).and_then(|id| {
    state.sessions.with_session(&id, |session| {
      f(session);
      session.view()
    })
  });

  match view {
    Some(view) => render_panel(state, view).into_response(),
    None => (StatusCode::NOT_FOUND, Html(NO_SESSION_HTML)).into_response(),
  }
}

/// Load the deck for `?subtopic=` and start a new session, replacing any
/// previous one for this browser
pub async fn flashcards_start(
  State(state): State<AppState>,
  jar: CookieJar,
  Query(query): Query<FlashcardQuery>,
) -> impl IntoResponse {
  if let Some(old) = session_id(&jar) {
    state.sessions.remove(&old);
  }

  let Some(subtopic_id) = query.subtopic else {
    return (jar.remove(expired_cookie()), empty_state("No subtopic selected."));
  };

  match state.loader.load_deck(subtopic_id).await {
    Ok(loaded) => {
      tracing::info!(
        subtopic_id,
        cards = loaded.deck.len(),
        "Starting flashcard session"
      );
      let session = FlashcardSession::new(loaded.meta, loaded.deck, state.practice_policy);
      let view = session.view();
      let id = state.sessions.insert(session);

      let template = FlashcardsTemplate {
        view,
        completion_delay_ms: state.completion_delay.as_millis() as u64,
      };
      (
        jar.add(session_cookie(id)),
        Html(template.render().unwrap_or_default()),
      )
    }
    Err(e) => {
      if e.is_missing() {
        tracing::info!(subtopic_id, "No flashcards to show: {}", e);
      } else {
        tracing::warn!(subtopic_id, "Failed to load deck: {}", e);
      }
      (
        jar.remove(expired_cookie()),
        empty_state("There are no flashcards for this subtopic yet."),
      )
    }
  }
}

pub async fn flashcards_panel(State(state): State<AppState>, jar: CookieJar) -> Response {
  with_panel(&state, &jar, |_| {})
}

pub async fn flashcards_next(State(state): State<AppState>, jar: CookieJar) -> Response {
  with_panel(&state, &jar, |session| {
    let mut rng = rand::rng();
    session.advance(&mut rng);
  })
}

pub async fn flashcards_prev(State(state): State<AppState>, jar: CookieJar) -> Response {
  with_panel(&state, &jar, |session| {
    session.retreat();
  })
}

pub async fn flashcards_flip(State(state): State<AppState>, jar: CookieJar) -> Response {
  with_panel(&state, &jar, |session| {
    session.flip();
  })
}

pub async fn practice_select(
  State(state): State<AppState>,
  jar: CookieJar,
  Form(form): Form<SelectAnswerForm>,
) -> Response {
  with_panel(&state, &jar, |session| {
    if !session.select_answer(form.card_id, &form.word) {
      tracing::debug!(card_id = form.card_id, "Ignored answer selection");
    }
  })
}

/// Grade the open quiz. A pass arms the delayed return to learn mode.
pub async fn practice_submit(State(state): State<AppState>, jar: CookieJar) -> Response {
  let Some(id) = session_id(&jar) else {
    return (StatusCode::NOT_FOUND, Html(NO_SESSION_HTML)).into_response();
  };

  let outcome = state.sessions.with_session(&id, |session| session.submit());
  if let Some(SubmitOutcome::Passed { batch_id }) = outcome {
    let armed = state
      .sessions
      .schedule_completion(&id, batch_id, state.completion_delay);
    if !armed {
      tracing::debug!(batch_id, "Practice completion not armed");
    }
  }

  with_panel(&state, &jar, |_| {})
}

/// Tear the session down, cancelling any pending completion
pub async fn flashcards_leave(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
  if let Some(id) = session_id(&jar) {
    state.sessions.remove(&id);
  }
  (jar.remove(expired_cookie()), Redirect::to("/"))
}

/// Current session as JSON
pub async fn flashcards_state(
  State(state): State<AppState>,
  jar: CookieJar,
) -> Result<axum::Json<SessionView>, StatusCode> {
  session_id(&jar)
    .and_then(|id| state.sessions.with_session(&id, |session| session.view()))
    .map(axum::Json)
    .ok_or(StatusCode::NOT_FOUND)
}
