use super::common::TitleSlug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
    #[serde(default)]
    pub farm_id: Option<Uuid>,
}

impl Building {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            info: TitleSlug::new(title),
            farm_id: None,
        }
    }
}

/// A stall, pen or room inside a building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingSpace {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
    pub building_id: Uuid,
}

impl BuildingSpace {
    pub fn new(title: impl Into<String>, building_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            info: TitleSlug::new(title),
            building_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldType {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: Uuid,
    #[serde(flatten)]
    pub info: TitleSlug,
    #[serde(default)]
    pub farm_id: Option<Uuid>,
    #[serde(default)]
    pub field_type_id: Option<Uuid>,
    #[serde(default)]
    pub acreage: Option<Decimal>,
}

impl Field {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            info: TitleSlug::new(title),
            farm_id: None,
            field_type_id: None,
            acreage: None,
        }
    }
}
