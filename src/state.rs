//! Application state: question store, session store and settings.
//!
//! At startup the store is filled from the TOML question bank when one is
//! configured, otherwise from the built-in seeds.

use std::{sync::Arc, time::Duration};
use tracing::{error, info, instrument, warn};

use crate::config::{load_config_from_env, QuizConfig, Settings};
use crate::domain::QuestionDraft;
use crate::seeds::seed_questions;
use crate::session::SessionStore;
use crate::store::{InMemoryQuestionStore, QuestionStore, StoreError};

pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
    pub sessions: SessionStore,
    pub settings: Settings,
}

impl AppState {
    /// Build state from env: load config, seed the in-memory store.
    #[instrument(level = "info", skip_all)]
    pub async fn from_env() -> Result<Self, StoreError> {
        let cfg = load_config_from_env().unwrap_or_default();
        let store = InMemoryQuestionStore::new();
        let inserted = seed_store(&store, &cfg).await?;
        info!(target: "quiz_backend", inserted, "Startup question inventory");
        Ok(Self::with_store(Arc::new(store), cfg.settings))
    }

    pub fn with_store(store: Arc<dyn QuestionStore>, settings: Settings) -> Self {
        let sessions = SessionStore::new(
            settings.cookie_name.clone(),
            Duration::from_secs(settings.session_idle_secs),
        );
        Self { store, sessions, settings }
    }
}

/// Insert the configured bank, or the built-in seeds when the bank is empty.
/// Invalid bank entries are logged and skipped.
async fn seed_store(store: &dyn QuestionStore, cfg: &QuizConfig) -> Result<usize, StoreError> {
    let drafts: Vec<QuestionDraft> = if cfg.questions.is_empty() {
        seed_questions()
    } else {
        cfg.questions
            .iter()
            .map(|q| QuestionDraft::new(q.question.clone(), q.answer.clone()))
            .collect()
    };

    let mut inserted = 0;
    for draft in &drafts {
        match store.create(draft).await {
            Ok(_) => inserted += 1,
            Err(StoreError::Validation(errs)) => {
                let fields: Vec<_> = errs.iter().map(|e| e.field).collect();
                warn!(target: "quiz_backend", ?fields, "Skipping bank item: invalid fields");
            }
            Err(e) => {
                error!(target: "quiz_backend", error = %e, "Failed to seed question store");
                return Err(e);
            }
        }
    }
    Ok(inserted)
}
