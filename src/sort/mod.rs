use std::cmp::Reverse;
use std::fmt;

use serde::Serialize;

use crate::model::Character;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Name,
    Status,
    Species,
    Gender,
    Origin,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Id,
        SortKey::Name,
        SortKey::Status,
        SortKey::Species,
        SortKey::Gender,
        SortKey::Origin,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "status" => Some(Self::Status),
            "species" => Some(Self::Species),
            "gender" => Some(Self::Gender),
            "origin" => Some(Self::Origin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Status => "status",
            SortKey::Species => "species",
            SortKey::Gender => "gender",
            SortKey::Origin => "origin",
        }
    }

    fn extract(self, c: &Character) -> SortValue {
        match self {
            SortKey::Id => SortValue::Number(c.id),
            SortKey::Name => SortValue::text(&c.name),
            SortKey::Status => SortValue::text(c.status.as_str()),
            SortKey::Species => SortValue::text(&c.species),
            SortKey::Gender => SortValue::text(c.gender.as_str()),
            SortKey::Origin => SortValue::text(&c.origin.name),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn activate(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.direction.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Number(u64),
    Text(String),
}

impl SortValue {
    fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }
}

/// Stable sort by `key`. Descending reverses the comparator, so records with
/// equal keys keep their input order in both directions.
pub fn sort<'a>(
    mut records: Vec<&'a Character>,
    key: SortKey,
    direction: SortDirection,
) -> Vec<&'a Character> {
    match direction {
        SortDirection::Ascending => records.sort_by_cached_key(|c| key.extract(c)),
        SortDirection::Descending => records.sort_by_cached_key(|c| Reverse(key.extract(c))),
    }
    records
}
