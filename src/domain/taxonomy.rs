use super::common::TitleSlug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level biological grouping (goat, sheep, chicken...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genus {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
}

impl Genus {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            info: TitleSlug::new(title),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breed {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
    pub genus_id: Uuid,
}

impl Breed {
    pub fn new(title: impl Into<String>, genus_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            info: TitleSlug::new(title),
            genus_id,
        }
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }
}

/// A breed registry organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationBody {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
    pub breed_id: Uuid,
    #[serde(default)]
    pub website: Option<String>,
}

impl RegistrationBody {
    pub fn new(title: impl Into<String>, breed_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            info: TitleSlug::new(title),
            breed_id,
            website: None,
        }
    }
}
