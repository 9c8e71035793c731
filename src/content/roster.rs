//! Roster listing helpers: tab filters and role labels.
//!
//! These follow the roster page's own rules, which are looser than the
//! profile dispatcher: the filter is a plain substring test and the label
//! checks producer keywords before DJ.

use serde::{Deserialize, Serialize};

/// Roster tab selected through `?role=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterFilter {
    #[default]
    All,
    Artista,
    Dj,
    Productor,
}

impl RosterFilter {
    fn needle(&self) -> Option<&'static str> {
        match self {
            RosterFilter::All => None,
            RosterFilter::Artista => Some("artista"),
            RosterFilter::Dj => Some("dj"),
            RosterFilter::Productor => Some("productor"),
        }
    }

    /// Whether an artist with this role belongs in the tab.
    ///
    /// A missing role counts as "artista".
    pub fn matches(&self, role: Option<&str>) -> bool {
        let Some(needle) = self.needle() else {
            return true;
        };
        let role = role
            .filter(|r| !r.is_empty())
            .unwrap_or("artista")
            .to_lowercase();
        role.contains(needle)
    }
}

/// Translated label category shown on a roster card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterRole {
    Default,
    Producer,
    Dj,
    Artist,
}

impl RosterRole {
    pub fn from_role(role: Option<&str>) -> Self {
        let Some(role) = role.filter(|r| !r.is_empty()) else {
            return RosterRole::Default;
        };
        let role = role.to_lowercase();
        if role.contains("productor") || role.contains("producer") {
            RosterRole::Producer
        } else if role.contains("dj") {
            RosterRole::Dj
        } else {
            RosterRole::Artist
        }
    }

    /// Key under `components.roster_filter` in the dictionaries.
    pub fn dictionary_key(&self) -> &'static str {
        match self {
            RosterRole::Default => "role_default",
            RosterRole::Producer => "role_producer",
            RosterRole::Dj => "role_dj",
            RosterRole::Artist => "role_artist",
        }
    }
}
