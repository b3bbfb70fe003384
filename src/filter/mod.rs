use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::model::{Character, Gender, Status};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterField {
    Name,
    Status,
    Species,
    Gender,
    Origin,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::Name,
        FilterField::Status,
        FilterField::Species,
        FilterField::Gender,
        FilterField::Origin,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
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
            FilterField::Name => "name",
            FilterField::Status => "status",
            FilterField::Species => "species",
            FilterField::Gender => "gender",
            FilterField::Origin => "origin",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub name: String,
    pub status: Option<Status>,
    pub species: String,
    pub gender: Option<Gender>,
    pub origin: String,
}

impl FilterState {
    pub fn set(&mut self, field: FilterField, value: &str) -> Result<bool, String> {
        let before = self.clone();
        match field {
            FilterField::Name => self.name = value.to_string(),
            FilterField::Species => self.species = value.to_string(),
            FilterField::Origin => self.origin = value.to_string(),
            FilterField::Status => self.status = parse_choice::<Status>(value)?,
            FilterField::Gender => self.gender = parse_choice::<Gender>(value)?,
        }
        Ok(*self != before)
    }

    pub fn get(&self, field: FilterField) -> String {
        match field {
            FilterField::Name => self.name.clone(),
            FilterField::Species => self.species.clone(),
            FilterField::Origin => self.origin.clone(),
            FilterField::Status => self.status.map(|s| s.to_string()).unwrap_or_default(),
            FilterField::Gender => self.gender.map(|g| g.to_string()).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterState::default()
    }

    pub fn summary(&self) -> Vec<String> {
        FilterField::ALL
            .iter()
            .filter_map(|f| {
                let v = self.get(*f);
                if v.is_empty() {
                    None
                } else {
                    Some(format!("{f}={v}"))
                }
            })
            .collect()
    }
}

fn parse_choice<T: FromStr<Err = String>>(value: &str) -> Result<Option<T>, String> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value.parse::<T>().map(Some)
}

struct Matcher {
    name: String,
    status: Option<Status>,
    species: String,
    gender: Option<Gender>,
    origin: String,
}

impl Matcher {
    fn new(state: &FilterState) -> Self {
        Self {
            name: state.name.to_lowercase(),
            status: state.status,
            species: state.species.to_lowercase(),
            gender: state.gender,
            origin: state.origin.to_lowercase(),
        }
    }

    fn matches(&self, c: &Character) -> bool {
        contains_folded(&c.name, &self.name)
            && self.status.map_or(true, |s| c.status == s)
            && contains_folded(&c.species, &self.species)
            && self.gender.map_or(true, |g| c.gender == g)
            && contains_folded(&c.origin.name, &self.origin)
    }
}

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

pub fn filter<'a>(records: &'a [Character], state: &FilterState) -> Vec<&'a Character> {
    let matcher = Matcher::new(state);
    records.iter().filter(|c| matcher.matches(c)).collect()
}
