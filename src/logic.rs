//! Random play: pick the next unanswered question and score submitted answers.
//!
//! Flow per session:
//!   - `next_question` draws uniformly from the questions not yet answered in
//!     the current streak; `None` means every question has been answered.
//!   - `submit_answer` extends the streak on a match and resets it on a miss.
//!
//! Store errors are passed through untouched; nothing here retries.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::Question;
use crate::session::SessionProgress;
use crate::store::{Pagination, QuestionFilter, QuestionStore, StoreError};
use crate::util::normalize_answer;

/// Result of scoring one answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
  pub correct: bool,
  pub score: usize,
}

/// Case-insensitive comparison ignoring surrounding whitespace.
pub fn answers_match(given: &str, expected: &str) -> bool {
  normalize_answer(given) == normalize_answer(expected)
}

/// Choose one question uniformly from those not in `progress`.
///
/// Draws a position in the id-ordered complement set and fetches just that
/// row. If the store shrank between the count and the fetch, falls back to
/// enumerating the complement.
#[instrument(level = "debug", skip_all, fields(answered = progress.score()))]
pub async fn next_question(
  progress: &SessionProgress,
  store: &dyn QuestionStore,
) -> Result<Option<Question>, StoreError> {
  let filter = QuestionFilter::excluding(progress.answered_ids());

  let remaining = store.count(&filter).await?;
  if remaining == 0 {
    debug!(target: "random_play", "No unanswered questions left");
    return Ok(None);
  }

  let offset = rand::thread_rng().gen_range(0..remaining);
  let picked = store
    .find(&filter, Some(Pagination { offset, limit: 1 }))
    .await?
    .into_iter()
    .next();
  if let Some(q) = picked {
    debug!(target: "random_play", id = q.id, remaining, offset, "Picked question");
    return Ok(Some(q));
  }

  warn!(target: "random_play", remaining, offset, "Store shrank during selection; enumerating complement");
  let rest = store.find(&filter, None).await?;
  Ok(rest.choose(&mut rand::thread_rng()).cloned())
}

/// Score `answer` against `question` and update the streak.
#[instrument(level = "debug", skip(progress, question, answer), fields(id = question.id))]
pub fn submit_answer(progress: &mut SessionProgress, question: &Question, answer: &str) -> AnswerOutcome {
  let correct = answers_match(answer, &question.answer);
  if correct {
    if !progress.record(question.id) {
      debug!(target: "random_play", id = question.id, "Already counted in this streak");
    }
  } else {
    progress.reset();
  }
  let outcome = AnswerOutcome { correct, score: progress.score() };
  debug!(target: "random_play", correct, score = outcome.score, "Answer scored");
  outcome
}
