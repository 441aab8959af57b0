pub mod animal;
pub mod annotation;
pub mod farm;
pub mod infrastructure;
pub mod product;
pub mod taxonomy;

pub use animal::{Animal, DailyMilk, Litter, Milking, PedigreeNode, Registration};
pub use annotation::{AttributeValue, Note};
pub use farm::Farm;
pub use infrastructure::{Building, BuildingSpace, Field, FieldType};
pub use product::{Product, ProductType};
pub use taxonomy::{Breed, Genus};

use crate::domain::{
    self, AttributeTarget, ChildTableSwitch, EntityRef, LineageScope, MilkUnit, Sex,
};
use async_graphql::{Enum, FieldResult, InputObject, ID};
use uuid::Uuid;

pub(crate) fn parse_id(id: &ID) -> FieldResult<Uuid> {
    Ok(Uuid::parse_str(id)?)
}

pub(crate) fn to_id(id: Uuid) -> ID {
    ID(id.to_string())
}

/// Which animals a listing includes
#[derive(Enum, Copy, Clone, Eq, PartialEq, Default)]
pub enum Scope {
    /// Living animals owned by an active farm
    Farm,
    /// Every animal ever recorded
    #[default]
    All,
}

impl From<Scope> for LineageScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Farm => LineageScope::OnTheFarm,
            Scope::All => LineageScope::Historical,
        }
    }
}

/// Parent slot a child table is built from
#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum ChildSlot {
    Dam,
    Sire,
    All,
}

impl From<ChildSlot> for ChildTableSwitch {
    fn from(slot: ChildSlot) -> Self {
        match slot {
            ChildSlot::Dam => ChildTableSwitch::Dam,
            ChildSlot::Sire => ChildTableSwitch::Sire,
            ChildSlot::All => ChildTableSwitch::All,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum SexValue {
    Male,
    Female,
}

impl From<SexValue> for Sex {
    fn from(value: SexValue) -> Self {
        match value {
            SexValue::Male => Sex::Male,
            SexValue::Female => Sex::Female,
        }
    }
}

impl From<Sex> for SexValue {
    fn from(sex: Sex) -> Self {
        match sex {
            Sex::Male => SexValue::Male,
            Sex::Female => SexValue::Female,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum MilkUnitValue {
    Pounds,
    Liters,
}

impl From<MilkUnitValue> for MilkUnit {
    fn from(value: MilkUnitValue) -> Self {
        match value {
            MilkUnitValue::Pounds => MilkUnit::Pounds,
            MilkUnitValue::Liters => MilkUnit::Liters,
        }
    }
}

impl From<MilkUnit> for MilkUnitValue {
    fn from(unit: MilkUnit) -> Self {
        match unit {
            MilkUnit::Pounds => MilkUnitValue::Pounds,
            MilkUnit::Liters => MilkUnitValue::Liters,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum AttributeTargetValue {
    Animal,
    Product,
    Building,
    Field,
}

impl From<AttributeTargetValue> for AttributeTarget {
    fn from(value: AttributeTargetValue) -> Self {
        match value {
            AttributeTargetValue::Animal => AttributeTarget::Animal,
            AttributeTargetValue::Product => AttributeTarget::Product,
            AttributeTargetValue::Building => AttributeTarget::Building,
            AttributeTargetValue::Field => AttributeTarget::Field,
        }
    }
}

/// Kind of record a note or attribute hangs off
#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum SubjectKind {
    Farm,
    Animal,
    Breed,
    Product,
    Building,
    BuildingSpace,
    Field,
}

/// Reference to any record that can carry notes and attributes
#[derive(InputObject)]
pub struct SubjectInput {
    pub kind: SubjectKind,
    pub id: ID,
}

impl SubjectInput {
    pub fn to_entity_ref(&self) -> FieldResult<EntityRef> {
        let id = parse_id(&self.id)?;
        Ok(match self.kind {
            SubjectKind::Farm => EntityRef::Farm(id),
            SubjectKind::Animal => EntityRef::Animal(id),
            SubjectKind::Breed => EntityRef::Breed(id),
            SubjectKind::Product => EntityRef::Product(id),
            SubjectKind::Building => EntityRef::Building(id),
            SubjectKind::BuildingSpace => EntityRef::BuildingSpace(id),
            SubjectKind::Field => EntityRef::Field(id),
        })
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum LocationKind {
    BuildingSpace,
    Field,
}

#[derive(InputObject)]
pub struct LocationInput {
    pub kind: LocationKind,
    pub id: ID,
}

impl LocationInput {
    pub fn to_location(&self) -> FieldResult<domain::Location> {
        let id = parse_id(&self.id)?;
        Ok(match self.kind {
            LocationKind::BuildingSpace => domain::Location::BuildingSpace(id),
            LocationKind::Field => domain::Location::Field(id),
        })
    }
}
