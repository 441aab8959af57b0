//! Farm records and the pure logic over them.
pub mod animal;
pub mod annotation;
pub mod breed_mix;
pub mod common;
pub mod farm;
pub mod infrastructure;
pub mod lineage;
pub mod product;
pub mod taxonomy;

pub use animal::{
    is_on_the_farm, Animal, AnimalRegistration, FarmAffiliation, Location, MilkUnit, Milking,
    SecondaryBreed, Sex,
};
pub use annotation::{Attribute, AttributeOption, AttributeTarget, Note};
pub use breed_mix::{breed_label, is_mixed_breed, BreedMix, BreedShare};
pub use common::{slugify, Address, EntityRef, RecordKind, TitleSlug, Timestamps};
pub use farm::Farm;
pub use infrastructure::{Building, BuildingSpace, Field, FieldType};
pub use lineage::{group_litters, ChildTableSwitch, LineageScope, Litters, Pedigree};
pub use product::{Product, ProductType};
pub use taxonomy::{Breed, Genus, RegistrationBody};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// Anything that can be persisted through [`crate::storage::Storage`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> Uuid;

    /// Records with timestamps get their modified time bumped on save.
    fn timestamps_mut(&mut self) -> Option<&mut Timestamps> {
        None
    }
}

macro_rules! record {
    ($ty:ty, $kind:expr) => {
        impl Record for $ty {
            const KIND: RecordKind = $kind;

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
    ($ty:ty, $kind:expr, timestamped) => {
        impl Record for $ty {
            const KIND: RecordKind = $kind;

            fn id(&self) -> Uuid {
                self.id
            }

            fn timestamps_mut(&mut self) -> Option<&mut Timestamps> {
                Some(&mut self.timestamps)
            }
        }
    };
}

record!(Farm, RecordKind::Farm, timestamped);
record!(Genus, RecordKind::Genus);
record!(Breed, RecordKind::Breed);
record!(RegistrationBody, RecordKind::RegistrationBody);
record!(Animal, RecordKind::Animal, timestamped);
record!(SecondaryBreed, RecordKind::SecondaryBreed);
record!(AnimalRegistration, RecordKind::AnimalRegistration);
record!(Milking, RecordKind::Milking);
record!(ProductType, RecordKind::ProductType);
record!(Product, RecordKind::Product, timestamped);
record!(Building, RecordKind::Building);
record!(BuildingSpace, RecordKind::BuildingSpace);
record!(FieldType, RecordKind::FieldType);
record!(Field, RecordKind::Field);
record!(AttributeOption, RecordKind::AttributeOption);
record!(Attribute, RecordKind::Attribute);
record!(Note, RecordKind::Note, timestamped);
