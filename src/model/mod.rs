use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Status {
    Alive,
    Dead,
    #[serde(rename = "unknown", alias = "Unknown")]
    Unknown,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Alive, Status::Dead, Status::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Alive => "Alive",
            Status::Dead => "Dead",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "alive" => Ok(Status::Alive),
            "dead" => Ok(Status::Dead),
            "unknown" => Ok(Status::Unknown),
            other => Err(format!(
                "unknown status '{other}', expected alive, dead or unknown"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Gender {
    Male,
    Female,
    Genderless,
    #[serde(rename = "unknown", alias = "Unknown")]
    Unknown,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Male,
        Gender::Female,
        Gender::Genderless,
        Gender::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Genderless => "Genderless",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "genderless" => Ok(Gender::Genderless),
            "unknown" => Ok(Gender::Unknown),
            other => Err(format!(
                "unknown gender '{other}', expected male, female, genderless or unknown"
            )),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub status: Status,
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub gender: Gender,
    pub origin: Place,
    pub location: Place,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

impl Character {
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub pages: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Page {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

impl Page {
    pub fn next_cursor(&self) -> Option<&str> {
        self.info
            .next
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub statuses: Vec<Status>,
    pub species: Vec<String>,
    pub genders: Vec<Gender>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Character>,
}

impl Dataset {
    pub fn new(records: Vec<Character>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Character] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|c| c.id == id)
    }

    pub fn get(&self, id: u64) -> Option<&Character> {
        self.records.iter().find(|c| c.id == id)
    }

    pub fn facets(&self) -> Facets {
        Facets {
            statuses: self.records.iter().map(|c| c.status).unique().collect(),
            species: self
                .records
                .iter()
                .map(|c| c.species.clone())
                .unique()
                .collect(),
            genders: self.records.iter().map(|c| c.gender).unique().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RICK: &str = r#"{
        "id": 1,
        "name": "Rick Sanchez",
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": { "name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1" },
        "location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
        "image": "https://rickandmortyapi.com/api/character/avatar/1.jpeg",
        "episode": [
            "https://rickandmortyapi.com/api/episode/1",
            "https://rickandmortyapi.com/api/episode/2"
        ],
        "url": "https://rickandmortyapi.com/api/character/1",
        "created": "2017-11-04T18:48:46.250Z"
    }"#;

    #[test]
    fn decodes_api_character() {
        let c: Character = serde_json::from_str(RICK).unwrap();
        assert_eq!(c.id, 1);
        assert_eq!(c.status, Status::Alive);
        assert_eq!(c.gender, Gender::Male);
        assert_eq!(c.origin.name, "Earth (C-137)");
        assert_eq!(c.episode.len(), 2);
        assert_eq!(c.kind(), None);
    }

    #[test]
    fn decodes_lowercase_unknown_enumerations() {
        let raw = RICK
            .replace("\"Alive\"", "\"unknown\"")
            .replace("\"Male\"", "\"unknown\"");
        let c: Character = serde_json::from_str(&raw).unwrap();
        assert_eq!(c.status, Status::Unknown);
        assert_eq!(c.gender, Gender::Unknown);
    }

    #[test]
    fn rejects_unexpected_status() {
        let raw = RICK.replace("\"Alive\"", "\"Zombie\"");
        assert!(serde_json::from_str::<Character>(&raw).is_err());
    }

    #[test]
    fn page_without_next_has_no_cursor() {
        let raw = format!(r#"{{"info": {{"count": 1, "next": null}}, "results": [{RICK}]}}"#);
        let page: Page = serde_json::from_str(&raw).unwrap();
        assert_eq!(page.next_cursor(), None);

        let raw = format!(r#"{{"info": {{}}, "results": [{RICK}]}}"#);
        let page: Page = serde_json::from_str(&raw).unwrap();
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn page_without_info_is_malformed() {
        let raw = format!(r#"{{"results": [{RICK}]}}"#);
        assert!(serde_json::from_str::<Page>(&raw).is_err());
    }

    #[test]
    fn choices_parse_case_insensitively() {
        assert_eq!("ALIVE".parse::<Status>().unwrap(), Status::Alive);
        assert_eq!(" genderless ".parse::<Gender>().unwrap(), Gender::Genderless);
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn facets_keep_first_appearance_order() {
        let ds = Dataset::new(vec![
            crate::tests::character(1, "a", Status::Dead, "Alien", Gender::Female, "x"),
            crate::tests::character(2, "b", Status::Alive, "Human", Gender::Male, "x"),
            crate::tests::character(3, "c", Status::Dead, "Alien", Gender::Female, "x"),
        ]);
        let facets = ds.facets();
        assert_eq!(facets.statuses, vec![Status::Dead, Status::Alive]);
        assert_eq!(facets.species, vec!["Alien".to_string(), "Human".to_string()]);
        assert_eq!(facets.genders, vec![Gender::Female, Gender::Male]);
    }
}
