//! Public protocol structs: query/form inputs and the rendered views (serde ready).
//!
//! Every page is a JSON document tagged with its view name, e.g.
//! `{"view": "quizzes/random_play", "score": 2, "quiz": {...}}`; the front end
//! owns the markup.

use serde::{Deserialize, Serialize};

use crate::domain::{FieldError, Question, QuestionDraft, QuestionId};

/// Views the service can render.
#[derive(Debug, Serialize)]
#[serde(tag = "view")]
pub enum View {
    #[serde(rename = "index")]
    Home,
    #[serde(rename = "author")]
    Author,
    #[serde(rename = "help")]
    Help,
    #[serde(rename = "quizzes/index")]
    Index {
        quizzes: Vec<Question>,
        search: String,
        pagination: PageInfo,
    },
    #[serde(rename = "quizzes/show")]
    Show { quiz: Question },
    #[serde(rename = "quizzes/new")]
    New {
        quiz: QuestionDraft,
        errors: Vec<FieldError>,
    },
    #[serde(rename = "quizzes/edit")]
    Edit {
        quiz: Question,
        errors: Vec<FieldError>,
    },
    #[serde(rename = "quizzes/play")]
    Play { quiz: QuizOut, answer: String },
    #[serde(rename = "quizzes/result")]
    CheckResult {
        quiz: Question,
        result: bool,
        answer: String,
    },
    #[serde(rename = "quizzes/random_play")]
    RandomPlay { score: usize, quiz: QuizOut },
    #[serde(rename = "quizzes/random_nomore")]
    RandomNoMore { score: usize },
    #[serde(rename = "quizzes/random_result")]
    RandomResult {
        quiz: Question,
        result: bool,
        score: usize,
        answer: String,
    },
    #[serde(rename = "error")]
    Error { status: u16, message: String },
}

/// A question as shown while it is being answered: the answer stays server-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuizOut {
    pub id: QuestionId,
    pub question: String,
}

impl From<Question> for QuizOut {
    fn from(q: Question) -> Self {
        Self { id: q.id, question: q.question }
    }
}

/// Listing window. `page` is 1-based; `total_pages` is 0 for an empty listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PageInfo {
    pub fn new(total_items: u64, per_page: u64, page: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            page: page.max(1),
            per_page,
            total_items,
            total_pages: total_items.div_ceil(per_page),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

//
// HTTP request DTOs
//

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub search: Option<String>,
    pub pageno: Option<String>,
}

impl IndexQuery {
    /// Requested page; anything missing, unparseable or zero means page 1.
    pub fn page(&self) -> u64 {
        self.pageno
            .as_deref()
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswerQuery {
    #[serde(default)]
    pub answer: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
