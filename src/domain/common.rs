//! Small value structs shared by several records.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Title, URL slug and free-text description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleSlug {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TitleSlug {
    /// Build from a title, deriving the slug.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let slug = slugify(&title);
        Self {
            title,
            slug,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Timestamps {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created: now,
            modified: now,
        }
    }

    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::now()
    }
}

/// US-style postal address and phone number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub phone: Option<String>,
}

/// Every kind of record the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Farm,
    Genus,
    Breed,
    RegistrationBody,
    Animal,
    SecondaryBreed,
    AnimalRegistration,
    Milking,
    ProductType,
    Product,
    Building,
    BuildingSpace,
    FieldType,
    Field,
    AttributeOption,
    Attribute,
    Note,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Farm => "farm",
            RecordKind::Genus => "genus",
            RecordKind::Breed => "breed",
            RecordKind::RegistrationBody => "registration_body",
            RecordKind::Animal => "animal",
            RecordKind::SecondaryBreed => "secondary_breed",
            RecordKind::AnimalRegistration => "animal_registration",
            RecordKind::Milking => "milking",
            RecordKind::ProductType => "product_type",
            RecordKind::Product => "product",
            RecordKind::Building => "building",
            RecordKind::BuildingSpace => "building_space",
            RecordKind::FieldType => "field_type",
            RecordKind::Field => "field",
            RecordKind::AttributeOption => "attribute_option",
            RecordKind::Attribute => "attribute",
            RecordKind::Note => "note",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference to a record that notes, attributes and secondary breeds
/// can hang off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Farm(Uuid),
    Animal(Uuid),
    Breed(Uuid),
    Product(Uuid),
    Building(Uuid),
    BuildingSpace(Uuid),
    Field(Uuid),
}

impl EntityRef {
    pub fn kind(&self) -> RecordKind {
        match self {
            EntityRef::Farm(_) => RecordKind::Farm,
            EntityRef::Animal(_) => RecordKind::Animal,
            EntityRef::Breed(_) => RecordKind::Breed,
            EntityRef::Product(_) => RecordKind::Product,
            EntityRef::Building(_) => RecordKind::Building,
            EntityRef::BuildingSpace(_) => RecordKind::BuildingSpace,
            EntityRef::Field(_) => RecordKind::Field,
        }
    }

    pub fn id(&self) -> Uuid {
        match *self {
            EntityRef::Farm(id)
            | EntityRef::Animal(id)
            | EntityRef::Breed(id)
            | EntityRef::Product(id)
            | EntityRef::Building(id)
            | EntityRef::BuildingSpace(id)
            | EntityRef::Field(id) => id,
        }
    }
}

/// Generate a URL-friendly slug from a name
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
