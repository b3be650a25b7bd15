//! Domain models: questions, form drafts and field-level validation.

use serde::{Deserialize, Serialize};

pub type QuestionId = u64;

/// A stored question/answer pair. `id` is assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub id: QuestionId,
  pub question: String,
  pub answer: String,
}

/// Unvalidated question fields as submitted by the new/edit forms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
  #[serde(default)] pub question: String,
  #[serde(default)] pub answer: String,
}

/// One failed field of a draft, e.g. `question: "Missing question"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field: &'static str,
  pub message: String,
}

impl QuestionDraft {
  pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
    Self { question: question.into(), answer: answer.into() }
  }

  /// Trim both fields and reject blanks. Returns the cleaned draft or every
  /// field error at once.
  pub fn validate(&self) -> Result<QuestionDraft, Vec<FieldError>> {
    let question = self.question.trim();
    let answer = self.answer.trim();

    let mut errors = Vec::new();
    if question.is_empty() {
      errors.push(FieldError { field: "question", message: "Missing question".into() });
    }
    if answer.is_empty() {
      errors.push(FieldError { field: "answer", message: "Missing answer".into() });
    }

    if errors.is_empty() {
      Ok(QuestionDraft::new(question, answer))
    } else {
      Err(errors)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validate_trims_fields() {
    let draft = QuestionDraft::new("  Capital of Italy?  ", " Rome\n");
    let clean = draft.validate().unwrap();
    assert_eq!(clean.question, "Capital of Italy?");
    assert_eq!(clean.answer, "Rome");
  }

  #[test]
  fn validate_reports_every_blank_field() {
    let errors = QuestionDraft::new("   ", "").validate().unwrap_err();
    let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
    assert_eq!(fields, vec!["question", "answer"]);
    assert_eq!(errors[1].message, "Missing answer");
  }
}
