//! Built-in questions so a fresh instance has something to play.

use crate::domain::QuestionDraft;

pub fn seed_questions() -> Vec<QuestionDraft> {
  vec![
    QuestionDraft::new("Capital of Italy?", "Rome"),
    QuestionDraft::new("Capital of Portugal?", "Lisbon"),
    QuestionDraft::new("Capital of Spain?", "Madrid"),
    QuestionDraft::new("Capital of France?", "Paris"),
  ]
}
