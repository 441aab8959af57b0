use crate::app::records::FarmRecords;
use crate::domain::{Attribute, AttributeOption, EntityRef, Note, Timestamps};
use crate::error::{FarmError, Result};
use tracing::debug;
use uuid::Uuid;

/// Notes and free-form attributes attached to other records.
#[derive(Clone)]
pub struct AnnotationUseCase {
    records: FarmRecords,
}

impl AnnotationUseCase {
    pub fn new(records: FarmRecords) -> Self {
        Self { records }
    }

    async fn check_subject(&self, subject: &EntityRef) -> Result<()> {
        if self.records.exists(subject.kind(), subject.id()).await? {
            Ok(())
        } else {
            Err(FarmError::not_found(subject.kind().as_str(), subject.id().to_string()))
        }
    }

    pub async fn add_note(
        &self,
        subject: EntityRef,
        body: &str,
        author: Option<String>,
    ) -> Result<Note> {
        self.check_subject(&subject).await?;
        if body.trim().is_empty() {
            return Err(FarmError::Validation("note body must not be blank".to_string()));
        }

        let note = Note {
            id: Uuid::new_v4(),
            subject,
            body: body.to_string(),
            author,
            timestamps: Timestamps::now(),
        };
        self.records.insert(&note).await?;
        debug!("Added note {} to {} {}", note.id, subject.kind(), subject.id());
        Ok(note)
    }

    /// Notes on one record, oldest first.
    pub async fn notes_for(&self, subject: EntityRef) -> Result<Vec<Note>> {
        let mut notes = self.records.all::<Note>().await?;
        notes.retain(|n| n.subject == subject);
        notes.sort_by_key(|n| n.timestamps.created);
        Ok(notes)
    }

    pub async fn add_option(&self, option: AttributeOption) -> Result<AttributeOption> {
        if option.name.trim().is_empty() {
            return Err(FarmError::Validation(
                "attribute option name must not be blank".to_string(),
            ));
        }
        self.records.insert(&option).await?;
        Ok(option)
    }

    /// Record a value for an attribute option. The subject has to be the
    /// kind of record the option was declared for.
    pub async fn add_attribute(
        &self,
        option_id: Uuid,
        subject: EntityRef,
        value: &str,
    ) -> Result<Attribute> {
        let option: AttributeOption = self.records.fetch(option_id).await?;
        if !option.target.accepts(&subject) {
            return Err(FarmError::Validation(format!(
                "attribute '{}' applies to {:?} records, not {}",
                option.name,
                option.target,
                subject.kind()
            )));
        }
        self.check_subject(&subject).await?;

        let attribute = Attribute {
            id: Uuid::new_v4(),
            option_id,
            subject,
            value: value.to_string(),
        };
        self.records.insert(&attribute).await?;
        Ok(attribute)
    }

    /// Attributes on one record paired with their options.
    pub async fn attributes_for(
        &self,
        subject: EntityRef,
    ) -> Result<Vec<(AttributeOption, Attribute)>> {
        let mut attributes = self.records.all::<Attribute>().await?;
        attributes.retain(|a| a.subject == subject);

        let mut paired = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let option: AttributeOption = self.records.fetch(attribute.option_id).await?;
            paired.push((option, attribute));
        }
        Ok(paired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AttributeTarget, Product, ProductType};
    use crate::storage::InMemoryStorage;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_attribute_target_mismatch_is_rejected() {
        let records = FarmRecords::new(Arc::new(InMemoryStorage::new()));
        let soap = ProductType::new("Soap");
        let bar = Product::new("Lavender Bar", soap.id);
        records.insert(&soap).await.unwrap();
        records.insert(&bar).await.unwrap();

        let annotations = AnnotationUseCase::new(records);
        let horns = annotations
            .add_option(AttributeOption::new(AttributeTarget::Animal, "Horns"))
            .await
            .unwrap();
        let scent = annotations
            .add_option(AttributeOption::new(AttributeTarget::Product, "Scent"))
            .await
            .unwrap();

        let wrong = annotations
            .add_attribute(horns.id, EntityRef::Product(bar.id), "disbudded")
            .await;
        assert!(matches!(wrong, Err(FarmError::Validation(_))));

        annotations
            .add_attribute(scent.id, EntityRef::Product(bar.id), "lavender")
            .await
            .unwrap();
        let attached = annotations
            .attributes_for(EntityRef::Product(bar.id))
            .await
            .unwrap();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].0.name, "Scent");
        assert_eq!(attached[0].1.value, "lavender");
    }

    #[tokio::test]
    async fn test_notes_attach_to_existing_records() {
        let records = FarmRecords::new(Arc::new(InMemoryStorage::new()));
        let soap = ProductType::new("Soap");
        let bar = Product::new("Oatmeal Bar", soap.id);
        records.insert(&bar).await.unwrap();
        let annotations = AnnotationUseCase::new(records);

        annotations
            .add_note(EntityRef::Product(bar.id), "New batch cured", None)
            .await
            .unwrap();
        let notes = annotations
            .notes_for(EntityRef::Product(bar.id))
            .await
            .unwrap();
        assert_eq!(notes.len(), 1);

        let missing = annotations
            .add_note(EntityRef::Animal(Uuid::new_v4()), "Who?", None)
            .await;
        assert!(missing.unwrap_err().is_not_found());
    }
}
