use super::common::{EntityRef, Timestamps};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which kind of record an attribute option applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeTarget {
    Animal,
    Product,
    Building,
    Field,
}

impl AttributeTarget {
    pub fn accepts(&self, subject: &EntityRef) -> bool {
        matches!(
            (self, subject),
            (AttributeTarget::Animal, EntityRef::Animal(_))
                | (AttributeTarget::Product, EntityRef::Product(_))
                | (AttributeTarget::Building, EntityRef::Building(_))
                | (AttributeTarget::Field, EntityRef::Field(_))
        )
    }
}

/// A named key attributes can be recorded against ("horns", "color"...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeOption {
    pub id: Uuid,
    pub target: AttributeTarget,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl AttributeOption {
    pub fn new(target: AttributeTarget, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            name: name.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub id: Uuid,
    pub option_id: Uuid,
    pub subject: EntityRef,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub subject: EntityRef,
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub timestamps: Timestamps,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_target_matches_subject_kind() {
        let id = Uuid::new_v4();
        assert!(AttributeTarget::Animal.accepts(&EntityRef::Animal(id)));
        assert!(!AttributeTarget::Animal.accepts(&EntityRef::Product(id)));
        assert!(AttributeTarget::Field.accepts(&EntityRef::Field(id)));
        assert!(!AttributeTarget::Building.accepts(&EntityRef::BuildingSpace(id)));
    }
}
