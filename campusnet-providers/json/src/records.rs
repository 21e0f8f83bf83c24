//! Serde shapes of the JSON documents.
//!
//! These mirror what is found on disk, not what the core accepts: names may
//! be split into first name and surname, interests may reference categories
//! by id or by name, and costs stay signed so validation can report negative
//! values with their record index.

use campusnet_core::{CategoryRecord, EdgeRecord, UserRecord};
use serde::Deserialize;

/// One entry of `users.json`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct RawUser {
    pub(crate) id: u64,
    #[serde(default, alias = "nombre")]
    pub(crate) name: Option<String>,
    #[serde(default, alias = "apellido")]
    pub(crate) surname: Option<String>,
    #[serde(default, alias = "intereses")]
    pub(crate) interests: Vec<InterestRef>,
}

impl RawUser {
    /// Full display name: the name followed by the surname when both exist.
    pub(crate) fn display_name(&self) -> String {
        match (self.name.as_deref(), self.surname.as_deref()) {
            (Some(name), Some(surname)) => format!("{name} {surname}"),
            (Some(name), None) => name.to_owned(),
            (None, Some(surname)) => surname.to_owned(),
            (None, None) => format!("user {}", self.id),
        }
    }

    pub(crate) fn to_record(&self) -> UserRecord {
        UserRecord::new(self.id, self.display_name())
    }

    /// Returns `true` when the user lists the category with this id or name.
    ///
    /// Names match case-insensitively over full Unicode, so `TECNOLOGÍA`
    /// matches `Tecnología`.
    pub(crate) fn is_interested_in(&self, id: u64, name: Option<&str>) -> bool {
        self.interests.iter().any(|interest| match interest {
            InterestRef::Id(raw) => *raw == id,
            InterestRef::Name(label) => {
                name.is_some_and(|name| label.to_lowercase() == name.to_lowercase())
            }
        })
    }
}

/// A user's interest, given either as a category id or a category name.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub(crate) enum InterestRef {
    Id(u64),
    Name(String),
}

/// One entry of `friendships.json` or `candidates.json`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct RawLink {
    #[serde(alias = "u")]
    pub(crate) from_id: u64,
    #[serde(alias = "v")]
    pub(crate) to_id: u64,
    #[serde(alias = "costo")]
    pub(crate) cost: i64,
}

impl From<RawLink> for EdgeRecord {
    fn from(raw: RawLink) -> Self {
        Self::new(raw.from_id, raw.to_id, raw.cost)
    }
}

/// One entry of `categories.json`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct RawCategory {
    pub(crate) id: u64,
    #[serde(default, alias = "nombre")]
    pub(crate) name: Option<String>,
    #[serde(alias = "costo")]
    pub(crate) cost: i64,
    #[serde(default)]
    pub(crate) reached_user_ids: Option<Vec<u64>>,
}

impl RawCategory {
    /// Builds the core record, deriving the reach from user interests when
    /// the document does not list it.
    ///
    /// Returns `None` when the reach is derived and no user lists the
    /// category. An explicit empty list is kept so validation rejects it.
    pub(crate) fn into_record(self, users: &[RawUser]) -> Option<CategoryRecord> {
        let reached = match self.reached_user_ids {
            Some(listed) => listed,
            None => {
                let derived: Vec<u64> = users
                    .iter()
                    .filter(|user| user.is_interested_in(self.id, self.name.as_deref()))
                    .map(|user| user.id)
                    .collect();
                if derived.is_empty() {
                    return None;
                }
                derived
            }
        };
        Some(CategoryRecord {
            id: self.id,
            name: self.name,
            cost: self.cost,
            reached_user_ids: reached,
        })
    }
}
