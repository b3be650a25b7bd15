//! Question store: the persistence boundary used by handlers and random play.
//!
//! `QuestionStore` is an async trait so the backend can be swapped; the
//! in-memory implementation keeps questions ordered by id behind a RwLock.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::domain::{FieldError, Question, QuestionDraft, QuestionId};
use crate::util::matches_search;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("no question with id={0}")]
    NotFound(QuestionId),

    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("question store unavailable: {0}")]
    Unavailable(String),
}

/// Row filter. The default matches every question.
#[derive(Clone, Debug, Default)]
pub struct QuestionFilter {
    pub exclude_ids: Vec<QuestionId>,
    pub search: Option<String>,
}

impl QuestionFilter {
    pub fn excluding(ids: &[QuestionId]) -> Self {
        Self { exclude_ids: ids.to_vec(), search: None }
    }

    pub fn searching(search: &str) -> Self {
        let search = Some(search.to_string()).filter(|s| !s.trim().is_empty());
        Self { exclude_ids: Vec::new(), search }
    }

    pub fn matches(&self, q: &Question) -> bool {
        if self.exclude_ids.contains(&q.id) {
            return false;
        }
        match &self.search {
            Some(s) => matches_search(&q.question, s),
            None => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Number of questions matching `filter`.
    async fn count(&self, filter: &QuestionFilter) -> Result<u64, StoreError>;

    /// Matching questions ordered by ascending id, optionally windowed.
    async fn find(
        &self,
        filter: &QuestionFilter,
        page: Option<Pagination>,
    ) -> Result<Vec<Question>, StoreError>;

    /// # Errors
    ///
    /// `StoreError::NotFound` if no question has this id.
    async fn find_by_id(&self, id: QuestionId) -> Result<Question, StoreError>;

    /// Validate and insert a draft, assigning a fresh id.
    ///
    /// # Errors
    ///
    /// `StoreError::Validation` carrying every failed field.
    async fn create(&self, draft: &QuestionDraft) -> Result<Question, StoreError>;

    async fn update(&self, id: QuestionId, draft: &QuestionDraft) -> Result<Question, StoreError>;

    async fn delete(&self, id: QuestionId) -> Result<(), StoreError>;
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<QuestionId, Question>,
    last_id: QuestionId,
}

/// In-memory store. Ids start at 1 and are never reused after deletion.
#[derive(Clone, Default)]
pub struct InMemoryQuestionStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn count(&self, filter: &QuestionFilter) -> Result<u64, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|q| filter.matches(q)).count() as u64)
    }

    async fn find(
        &self,
        filter: &QuestionFilter,
        page: Option<Pagination>,
    ) -> Result<Vec<Question>, StoreError> {
        let table = self.table.read().await;
        let matching = table.rows.values().filter(|q| filter.matches(q));
        let out = match page {
            Some(p) => matching
                .skip(usize::try_from(p.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(p.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };
        Ok(out)
    }

    async fn find_by_id(&self, id: QuestionId) -> Result<Question, StoreError> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    #[instrument(level = "debug", skip(self, draft))]
    async fn create(&self, draft: &QuestionDraft) -> Result<Question, StoreError> {
        let clean = draft.validate().map_err(StoreError::Validation)?;
        let mut table = self.table.write().await;
        table.last_id += 1;
        let q = Question { id: table.last_id, question: clean.question, answer: clean.answer };
        table.rows.insert(q.id, q.clone());
        debug!(target: "quiz_backend", id = q.id, "Question inserted");
        Ok(q)
    }

    #[instrument(level = "debug", skip(self, draft))]
    async fn update(&self, id: QuestionId, draft: &QuestionDraft) -> Result<Question, StoreError> {
        let clean = draft.validate().map_err(StoreError::Validation)?;
        let mut table = self.table.write().await;
        let row = table.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.question = clean.question;
        row.answer = clean.answer;
        Ok(row.clone())
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete(&self, id: QuestionId) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }
}
