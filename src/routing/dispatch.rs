//! Artist profile variant selection.
//!
//! The label stores an artist's function as free text ("DJ", "Productor",
//! "Artista Exclusivo", ...). Which profile presentation to use is inferred
//! from that text at read time. Callers depend on [`RoleClassifier`] only, so
//! a structured role field can replace the keyword rules later.

use serde::{Deserialize, Serialize};

use crate::config::ProfileConfig;

/// The three mutually exclusive artist profile presentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileVariant {
    /// Standard artist profile (the default).
    Artist,
    Dj,
    Producer,
}

impl ProfileVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileVariant::Artist => "artist",
            ProfileVariant::Dj => "dj",
            ProfileVariant::Producer => "producer",
        }
    }
}

impl std::fmt::Display for ProfileVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an artist's role to a profile variant. Must be total.
pub trait RoleClassifier: Send + Sync + std::fmt::Debug {
    fn classify(&self, role: Option<&str>) -> ProfileVariant;
}

/// Case-insensitive substring rules; DJ keywords take precedence over producer keywords.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    dj: Vec<String>,
    producer: Vec<String>,
}

impl KeywordClassifier {
    pub fn new<I, J, S>(dj: I, producer: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalize = |k: S| k.as_ref().trim().to_lowercase();
        Self {
            dj: dj.into_iter().map(normalize).filter(|k| !k.is_empty()).collect(),
            producer: producer.into_iter().map(normalize).filter(|k| !k.is_empty()).collect(),
        }
    }

    pub fn from_config(config: &ProfileConfig) -> Self {
        Self::new(&config.dj_keywords, &config.producer_keywords)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::from_config(&ProfileConfig::default())
    }
}

impl RoleClassifier for KeywordClassifier {
    fn classify(&self, role: Option<&str>) -> ProfileVariant {
        let role = match role {
            Some(r) if !r.is_empty() => r.to_lowercase(),
            _ => return ProfileVariant::Artist,
        };

        let contains_any = |keywords: &[String]| keywords.iter().any(|k| role.contains(k.as_str()));

        if contains_any(&self.dj) {
            ProfileVariant::Dj
        } else if contains_any(&self.producer) {
            ProfileVariant::Producer
        } else {
            ProfileVariant::Artist
        }
    }
}
