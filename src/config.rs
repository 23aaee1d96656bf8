use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::model::{Lawyer, Roster};

pub const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_SPECIALTY: &str = "Estratégico";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub store: StoreConfig,
  #[serde(default)]
  pub ai: AiConfig,
  /// Bucket for processes whose lawyer is not on the roster
  #[serde(default = "default_specialty")]
  pub default_specialty: String,
  #[serde(default)]
  pub lawyers: Vec<Lawyer>,
}

fn default_specialty() -> String {
  DEFAULT_SPECIALTY.to_string()
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
  /// Hosted PostgREST endpoint
  #[default]
  Supabase,
  /// Local SQLite file
  Sqlite,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
  #[serde(default)]
  pub backend: StoreBackend,
  /// Project URL of the hosted store; `SUPABASE_URL` overrides it
  pub url: Option<String>,
  /// Database file for the sqlite backend (defaults to the data directory)
  pub sqlite_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
  /// Model for call triage and interview summaries
  #[serde(default = "default_fast_model")]
  pub fast_model: String,
  /// Model for legal-process reviews
  #[serde(default = "default_pro_model")]
  pub pro_model: String,
  pub endpoint: Option<String>,
}

fn default_fast_model() -> String {
  "gemini-3-flash-preview".to_string()
}

fn default_pro_model() -> String {
  "gemini-3-pro-preview".to_string()
}

impl Default for AiConfig {
  fn default() -> Self {
    Self {
      fast_model: default_fast_model(),
      pro_model: default_pro_model(),
      endpoint: None,
    }
  }
}

impl AiConfig {
  pub fn endpoint(&self) -> &str {
    self.endpoint.as_deref().unwrap_or(DEFAULT_AI_ENDPOINT)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./juriscall.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/juriscall/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/juriscall/config.yaml\n\
                 See juriscall.example.yaml for the format."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("juriscall.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("juriscall").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  /// The lawyer roster with the configured default specialty.
  pub fn roster(&self) -> Roster {
    Roster::new(self.lawyers.clone(), self.default_specialty.clone())
  }

  /// Hosted store URL: `SUPABASE_URL` if set, else `store.url`.
  pub fn store_url(&self) -> Result<String> {
    std::env::var("SUPABASE_URL")
      .ok()
      .filter(|u| !u.trim().is_empty())
      .or_else(|| self.store.url.clone())
      .ok_or_else(|| eyre!("Store URL not configured. Set store.url or SUPABASE_URL."))
  }

  /// SQLite file from the config, with a leading `~/` expanded.
  pub fn sqlite_path(&self) -> Option<PathBuf> {
    self.store.sqlite_path.as_deref().map(expand_home)
  }

  /// Get the store key from environment variables.
  ///
  /// Checks JURISCALL_SUPABASE_KEY first, then SUPABASE_ANON_KEY as fallback.
  pub fn get_store_key() -> Result<String> {
    std::env::var("JURISCALL_SUPABASE_KEY")
      .or_else(|_| std::env::var("SUPABASE_ANON_KEY"))
      .map_err(|_| {
        eyre!(
          "Store key not found. Set JURISCALL_SUPABASE_KEY or SUPABASE_ANON_KEY \
           environment variable."
        )
      })
  }

  /// Get the analysis service key, if any.
  ///
  /// Checks JURISCALL_GEMINI_KEY first, then GEMINI_API_KEY as fallback.
  pub fn get_ai_key() -> Option<String> {
    std::env::var("JURISCALL_GEMINI_KEY")
      .or_else(|_| std::env::var("GEMINI_API_KEY"))
      .ok()
      .filter(|k| !k.trim().is_empty())
  }
}

fn expand_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), dirs::home_dir()) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::roster::LawyerRole;

  const FULL: &str = r#"
store:
  backend: sqlite
  url: https://abc.supabase.co
  sqlite_path: /tmp/juriscall.db
ai:
  fast_model: flash-test
  endpoint: http://localhost:9999/v1
default_specialty: Geral
lawyers:
  - name: Dr. André Oliveira
    specialty: Direito Previdenciário
    oab: OAB/SP 345.678
    email: andre@example.com
    role: partner
  - name: Dra. Beatriz Costa
    specialty: Direito Cível
    role: Associado
"#;

  #[test]
  fn test_parse_full_config() {
    let config = Config::parse(FULL).unwrap();
    assert_eq!(config.store.backend, StoreBackend::Sqlite);
    assert_eq!(config.store.url.as_deref(), Some("https://abc.supabase.co"));
    assert_eq!(config.ai.fast_model, "flash-test");
    assert_eq!(config.ai.pro_model, "gemini-3-pro-preview");
    assert_eq!(config.ai.endpoint(), "http://localhost:9999/v1");
    assert_eq!(config.lawyers.len(), 2);
    assert_eq!(config.lawyers[1].role, Some(LawyerRole::Associate));

    let roster = config.roster();
    assert_eq!(roster.specialty_of("Dra. Beatriz Costa"), "Direito Cível");
    assert_eq!(roster.specialty_of("Dr. Fulano"), "Geral");
  }

  #[test]
  fn test_parse_minimal_config_uses_defaults() {
    let config = Config::parse("lawyers: []\n").unwrap();
    assert_eq!(config.store.backend, StoreBackend::Supabase);
    assert_eq!(config.default_specialty, DEFAULT_SPECIALTY);
    assert_eq!(config.ai.fast_model, "gemini-3-flash-preview");
    assert_eq!(config.ai.endpoint(), DEFAULT_AI_ENDPOINT);
    assert!(config.sqlite_path().is_none());
  }

  #[test]
  fn test_unknown_backend_is_rejected() {
    assert!(Config::parse("store:\n  backend: oracle\n").is_err());
  }

  #[test]
  fn test_load_from_explicit_path() {
    let path = std::env::temp_dir().join(format!("juriscall-{}.yaml", uuid::Uuid::new_v4()));
    std::fs::write(&path, FULL).unwrap();
    let config = Config::load(Some(&path)).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.default_specialty, "Geral");

    assert!(Config::load(Some(&path)).is_err());
  }

  #[test]
  fn test_expand_home() {
    let plain = Path::new("/var/data/j.db");
    assert_eq!(expand_home(plain), plain);
    if let Some(home) = dirs::home_dir() {
      assert_eq!(expand_home(Path::new("~/j.db")), home.join("j.db"));
    }
  }
}
