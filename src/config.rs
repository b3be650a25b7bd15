//! Loading service configuration (settings + optional question bank) from TOML.
//!
//! Example file (path in QUIZ_CONFIG_PATH):
//!
//! ```toml
//! [settings]
//! items_per_page = 10
//! session_idle_secs = 3600
//! cookie_name = "quiz.sid"
//!
//! [[questions]]
//! question = "Capital of Italy?"
//! answer = "Rome"
//! ```

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub settings: Settings,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

/// Question bank entry. Blank entries are skipped at startup.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub question: String,
  pub answer: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
  /// Rows per page on the question listing.
  pub items_per_page: u64,
  /// Sessions untouched for longer than this are forgotten.
  pub session_idle_secs: u64,
  pub cookie_name: String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      items_per_page: 10,
      session_idle_secs: 60 * 60,
      cookie_name: "quiz.sid".into(),
    }
  }
}

pub fn parse_config(src: &str) -> Result<QuizConfig, toml::de::Error> {
  let mut cfg = toml::from_str::<QuizConfig>(src)?;
  if cfg.settings.items_per_page == 0 {
    cfg.settings.items_per_page = Settings::default().items_per_page;
  }
  Ok(cfg)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "quiz_backend", %path, questions = cfg.questions.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
