//! HTTP endpoint handlers. These are thin wrappers that forward to the store
//! and the random-play logic, then render a view.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Form, Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Redirect, Response},
  Json,
};
use tracing::{info, instrument};

use crate::domain::{Question, QuestionDraft, QuestionId};
use crate::error::AppError;
use crate::logic::{answers_match, next_question, submit_answer};
use crate::protocol::*;
use crate::state::AppState;
use crate::store::{Pagination, QuestionFilter, StoreError};
use crate::util::trunc_for_log;

/// Resolve `:quizId`. Ids that do not parse are reported like missing ones.
async fn load_quiz(state: &AppState, raw_id: &str) -> Result<Question, AppError> {
  let id: QuestionId = raw_id.trim().parse().map_err(|_| AppError::NotFound(raw_id.to_string()))?;
  Ok(state.store.find_by_id(id).await?)
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

pub async fn http_home() -> Json<View> { Json(View::Home) }

pub async fn http_author() -> Json<View> { Json(View::Author) }

pub async fn http_help() -> Json<View> { Json(View::Help) }

#[instrument(level = "info", skip(state, q), fields(search = ?q.search, page = q.page()))]
pub async fn http_index(
  State(state): State<Arc<AppState>>,
  Query(q): Query<IndexQuery>,
) -> Result<Json<View>, AppError> {
  let search = q.search.clone().unwrap_or_default();
  let filter = QuestionFilter::searching(&search);

  let total = state.store.count(&filter).await?;
  let pagination = PageInfo::new(total, state.settings.items_per_page, q.page());
  let window = Pagination { offset: pagination.offset(), limit: pagination.per_page };
  let quizzes = state.store.find(&filter, Some(window)).await?;

  info!(target: "quiz_backend", total, shown = quizzes.len(), page = pagination.page, "Quiz listing served");
  Ok(Json(View::Index { quizzes, search, pagination }))
}

pub async fn http_new() -> Json<View> {
  Json(View::New { quiz: QuestionDraft::default(), errors: Vec::new() })
}

#[instrument(level = "info", skip(state, draft))]
pub async fn http_create(
  State(state): State<Arc<AppState>>,
  Form(draft): Form<QuestionDraft>,
) -> Result<Response, AppError> {
  match state.store.create(&draft).await {
    Ok(quiz) => {
      info!(target: "quiz_backend", id = quiz.id, "Quiz created");
      Ok(Redirect::to(&format!("/quizzes/{}", quiz.id)).into_response())
    }
    Err(StoreError::Validation(errors)) => {
      info!(target: "quiz_backend", invalid = errors.len(), "Quiz form rejected");
      Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(View::New { quiz: draft, errors })).into_response())
    }
    Err(e) => Err(e.into()),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_show(
  State(state): State<Arc<AppState>>,
  Path(quiz_id): Path<String>,
) -> Result<Json<View>, AppError> {
  let quiz = load_quiz(&state, &quiz_id).await?;
  Ok(Json(View::Show { quiz }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_edit(
  State(state): State<Arc<AppState>>,
  Path(quiz_id): Path<String>,
) -> Result<Json<View>, AppError> {
  let quiz = load_quiz(&state, &quiz_id).await?;
  Ok(Json(View::Edit { quiz, errors: Vec::new() }))
}

#[instrument(level = "info", skip(state, draft))]
pub async fn http_update(
  State(state): State<Arc<AppState>>,
  Path(quiz_id): Path<String>,
  Form(draft): Form<QuestionDraft>,
) -> Result<Response, AppError> {
  let current = load_quiz(&state, &quiz_id).await?;
  match state.store.update(current.id, &draft).await {
    Ok(quiz) => {
      info!(target: "quiz_backend", id = quiz.id, "Quiz updated");
      Ok(Redirect::to(&format!("/quizzes/{}", quiz.id)).into_response())
    }
    Err(StoreError::Validation(errors)) => {
      let quiz = Question { id: current.id, question: draft.question, answer: draft.answer };
      Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(View::Edit { quiz, errors })).into_response())
    }
    Err(e) => Err(e.into()),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_destroy(
  State(state): State<Arc<AppState>>,
  Path(quiz_id): Path<String>,
) -> Result<Redirect, AppError> {
  let quiz = load_quiz(&state, &quiz_id).await?;
  state.store.delete(quiz.id).await?;
  info!(target: "quiz_backend", id = quiz.id, "Quiz deleted");
  Ok(Redirect::to("/quizzes"))
}

#[instrument(level = "info", skip(state, q))]
pub async fn http_play(
  State(state): State<Arc<AppState>>,
  Path(quiz_id): Path<String>,
  Query(q): Query<AnswerQuery>,
) -> Result<Json<View>, AppError> {
  let quiz = load_quiz(&state, &quiz_id).await?;
  Ok(Json(View::Play { quiz: quiz.into(), answer: q.answer }))
}

#[instrument(level = "info", skip(state, q), fields(answer = %trunc_for_log(&q.answer, 40)))]
pub async fn http_check(
  State(state): State<Arc<AppState>>,
  Path(quiz_id): Path<String>,
  Query(q): Query<AnswerQuery>,
) -> Result<Json<View>, AppError> {
  let quiz = load_quiz(&state, &quiz_id).await?;
  let result = answers_match(&q.answer, &quiz.answer);
  info!(target: "quiz_backend", id = quiz.id, result, "Answer checked");
  Ok(Json(View::CheckResult { quiz, result, answer: q.answer }))
}

/// Next unanswered question for this session, or the "no more" page. Reaching
/// the "no more" page starts a new streak.
#[instrument(level = "info", skip(state, headers))]
pub async fn http_random_play(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<Response, AppError> {
  let session = state.sessions.open(&headers).await;
  let view = {
    let mut data = session.lock().await;
    let score = data.random_play.score();
    let next = match next_question(&data.random_play, state.store.as_ref()).await {
      Ok(next) => next,
      Err(e) => {
        drop(data);
        // The cookie never reaches the client on an error page.
        if session.is_new() {
          state.sessions.discard(session.id).await;
        }
        return Err(e.into());
      }
    };
    match next {
      Some(quiz) => {
        info!(target: "random_play", session = %session.id, id = quiz.id, score, "Random question served");
        View::RandomPlay { score, quiz: quiz.into() }
      }
      None => {
        data.random_play.reset();
        info!(target: "random_play", session = %session.id, score, "All questions answered; streak closed");
        View::RandomNoMore { score }
      }
    }
  };
  Ok(session.respond(Json(view)))
}

/// Score an answer for the current streak. The quiz is resolved before the
/// session so a bad id never creates one.
#[instrument(level = "info", skip(state, headers, q), fields(answer = %trunc_for_log(&q.answer, 40)))]
pub async fn http_random_check(
  State(state): State<Arc<AppState>>,
  Path(quiz_id): Path<String>,
  Query(q): Query<AnswerQuery>,
  headers: HeaderMap,
) -> Result<Response, AppError> {
  let quiz = load_quiz(&state, &quiz_id).await?;
  let session = state.sessions.open(&headers).await;
  let outcome = {
    let mut data = session.lock().await;
    submit_answer(&mut data.random_play, &quiz, &q.answer)
  };
  info!(target: "random_play", session = %session.id, id = quiz.id, correct = outcome.correct, score = outcome.score, "Random answer scored");
  Ok(session.respond(Json(View::RandomResult {
    quiz,
    result: outcome.correct,
    score: outcome.score,
    answer: q.answer,
  })))
}
