use super::to_id;
use crate::domain::{self, Attribute, AttributeOption};
use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, Utc};

#[derive(SimpleObject)]
pub struct Note {
    pub id: ID,
    pub body: String,
    pub author: Option<String>,
    pub created: DateTime<Utc>,
}

impl From<domain::Note> for Note {
    fn from(note: domain::Note) -> Self {
        Self {
            id: to_id(note.id),
            body: note.body,
            author: note.author,
            created: note.timestamps.created,
        }
    }
}

/// An attribute value with the name of its option
#[derive(SimpleObject)]
pub struct AttributeValue {
    pub id: ID,
    pub option_id: ID,
    pub name: String,
    pub value: String,
}

impl From<(AttributeOption, Attribute)> for AttributeValue {
    fn from((option, attribute): (AttributeOption, Attribute)) -> Self {
        Self {
            id: to_id(attribute.id),
            option_id: to_id(option.id),
            name: option.name,
            value: attribute.value,
        }
    }
}
