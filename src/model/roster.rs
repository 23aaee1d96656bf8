//! The office's lawyer roster.
//!
//! Lawyers are configuration, not stored entities. Calls and processes name a
//! lawyer by display name only, so a lookup may come back empty.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LawyerRole {
  #[serde(alias = "Sócio", alias = "socio")]
  Partner,
  #[serde(alias = "Associado", alias = "associado")]
  Associate,
}

impl LawyerRole {
  pub fn label(&self) -> &'static str {
    match self {
      LawyerRole::Partner => "Sócio",
      LawyerRole::Associate => "Associado",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Lawyer {
  pub name: String,
  pub specialty: String,
  /// Bar registration number
  #[serde(default)]
  pub oab: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub role: Option<LawyerRole>,
  #[serde(default)]
  pub bio: Option<String>,
}

/// Read-only lawyer list plus the bucket used when a name is not on it.
#[derive(Debug, Clone, Default)]
pub struct Roster {
  lawyers: Vec<Lawyer>,
  default_specialty: String,
}

impl Roster {
  pub fn new(lawyers: Vec<Lawyer>, default_specialty: impl Into<String>) -> Self {
    Self {
      lawyers,
      default_specialty: default_specialty.into(),
    }
  }

  pub fn lawyers(&self) -> &[Lawyer] {
    &self.lawyers
  }

  /// Exact-name lookup, mirroring how records reference lawyers.
  pub fn find(&self, name: &str) -> Option<&Lawyer> {
    self.lawyers.iter().find(|l| l.name == name)
  }

  /// Specialty of the named lawyer, or the default bucket.
  pub fn specialty_of(&self, name: &str) -> &str {
    self
      .find(name)
      .map(|l| l.specialty.as_str())
      .unwrap_or(&self.default_specialty)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn roster() -> Roster {
    Roster::new(
      vec![Lawyer {
        name: "Dr. André Oliveira".to_string(),
        specialty: "Direito Previdenciário".to_string(),
        oab: "OAB/SP 345.678".to_string(),
        email: String::new(),
        role: Some(LawyerRole::Partner),
        bio: None,
      }],
      "Estratégico",
    )
  }

  #[test]
  fn test_specialty_falls_back_to_default_bucket() {
    let roster = roster();
    assert_eq!(
      roster.specialty_of("Dr. André Oliveira"),
      "Direito Previdenciário"
    );
    assert_eq!(roster.specialty_of("Dra. Desconhecida"), "Estratégico");
  }

  #[test]
  fn test_lookup_is_exact() {
    assert!(roster().find("dr. andré oliveira").is_none());
  }

  #[test]
  fn test_role_accepts_portuguese_labels() {
    let role: LawyerRole = serde_yaml::from_str("Sócio").unwrap();
    assert_eq!(role, LawyerRole::Partner);
    let role: LawyerRole = serde_yaml::from_str("associate").unwrap();
    assert_eq!(role, LawyerRole::Associate);
  }
}
