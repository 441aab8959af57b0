use super::common::{slugify, EntityRef, Timestamps};
use super::farm::Farm;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[default]
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// Owner or breeder of an animal: a farm record, or just a name when the
/// farm is not tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FarmAffiliation {
    Farm(Uuid),
    Named(String),
}

impl FarmAffiliation {
    pub fn farm_id(&self) -> Option<Uuid> {
        match self {
            FarmAffiliation::Farm(id) => Some(*id),
            FarmAffiliation::Named(_) => None,
        }
    }
}

/// Where an animal is currently kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Location {
    BuildingSpace(Uuid),
    Field(Uuid),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub birthtime: Option<NaiveTime>,
    #[serde(default)]
    pub deathday: Option<NaiveDate>,
    pub primary_breed_id: Uuid,
    #[serde(default)]
    pub dam_id: Option<Uuid>,
    #[serde(default)]
    pub sire_id: Option<Uuid>,
    #[serde(default)]
    pub owner: Option<FarmAffiliation>,
    #[serde(default)]
    pub breeder: Option<FarmAffiliation>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub registered: bool,
    #[serde(default)]
    pub timestamps: Timestamps,
}

impl Animal {
    pub fn new(primary_breed_id: Uuid, sex: Sex) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            slug: None,
            description: None,
            sex,
            birthday: None,
            birthtime: None,
            deathday: None,
            primary_breed_id,
            dam_id: None,
            sire_id: None,
            owner: None,
            breeder: None,
            location: None,
            registered: false,
            timestamps: Timestamps::now(),
        }
    }

    /// Set the name and derive the slug from it. A name with nothing
    /// sluggable leaves the slug unset so the id keys the URL.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.slug = Some(slugify(&name)).filter(|s| !s.is_empty());
        self.name = Some(name);
        self
    }

    pub fn born(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    pub fn owned_by(mut self, farm_id: Uuid) -> Self {
        self.owner = Some(FarmAffiliation::Farm(farm_id));
        self
    }

    /// Birth instant used for litter grouping; midnight when no time was recorded.
    pub fn born_at(&self) -> Option<NaiveDateTime> {
        self.birthday
            .map(|day| day.and_time(self.birthtime.unwrap_or(NaiveTime::MIN)))
    }

    pub fn is_alive(&self) -> bool {
        self.deathday.is_none()
    }

    /// Path segment used in detail URLs: the slug, else the UUID.
    pub fn path_key(&self) -> String {
        self.slug
            .clone()
            .unwrap_or_else(|| self.id.simple().to_string())
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }

    /// Whether `fragment` occurs in either UUID spelling.
    pub fn uuid_contains(&self, fragment: &str) -> bool {
        let fragment = fragment.to_lowercase();
        self.id.hyphenated().to_string().contains(&fragment)
            || self.id.simple().to_string().contains(&fragment)
    }
}

/// An animal belongs to the farm when its owner is an active farm record and
/// it has no recorded death.
pub fn is_on_the_farm(animal: &Animal, owner_farm: Option<&Farm>) -> bool {
    let owner_active = match (&animal.owner, owner_farm) {
        (Some(FarmAffiliation::Farm(owner_id)), Some(farm)) => *owner_id == farm.id && farm.current,
        _ => false,
    };
    owner_active && animal.is_alive()
}

/// Minority breed contribution attached to an animal (or any other record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryBreed {
    pub id: Uuid,
    pub breed_id: Uuid,
    pub percentage: u8,
    pub subject: EntityRef,
}

impl SecondaryBreed {
    pub fn new(subject: EntityRef, breed_id: Uuid, percentage: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            breed_id,
            percentage,
            subject,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalRegistration {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub body_id: Uuid,
    #[serde(default)]
    pub reg_id: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilkUnit {
    #[default]
    Pounds,
    Liters,
}

impl MilkUnit {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            MilkUnit::Pounds => "lb",
            MilkUnit::Liters => "l",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milking {
    pub id: Uuid,
    pub animal_id: Uuid,
    pub milked_at: NaiveDateTime,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit: MilkUnit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_the_farm_requires_active_owner_and_no_death() {
        let farm = Farm::new("Home Place", true);
        let animal = Animal::new(Uuid::new_v4(), Sex::Female).owned_by(farm.id);
        assert!(is_on_the_farm(&animal, Some(&farm)));

        let mut dead = animal.clone();
        dead.deathday = NaiveDate::from_ymd_opt(2020, 1, 1);
        assert!(!is_on_the_farm(&dead, Some(&farm)));

        let sold = Farm::new("Neighbor", false);
        let elsewhere = Animal::new(Uuid::new_v4(), Sex::Male).owned_by(sold.id);
        assert!(!is_on_the_farm(&elsewhere, Some(&sold)));

        let mut free_text = animal.clone();
        free_text.owner = Some(FarmAffiliation::Named("Home Place".to_string()));
        assert!(!is_on_the_farm(&free_text, Some(&farm)));
        assert!(!is_on_the_farm(&animal, None));
    }

    #[test]
    fn test_born_at_defaults_to_midnight() {
        let animal = Animal::new(Uuid::new_v4(), Sex::Female)
            .born(NaiveDate::from_ymd_opt(2021, 3, 14).unwrap());
        assert_eq!(
            animal.born_at().unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 14)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_named_animal_gets_slug() {
        let animal = Animal::new(Uuid::new_v4(), Sex::Female).named("Daisy Mae");
        assert_eq!(animal.slug.as_deref(), Some("daisy-mae"));
        assert_eq!(animal.path_key(), "daisy-mae");
    }

    #[test]
    fn test_sex_codes_round_trip() {
        let json = serde_json::to_string(&Sex::Male).unwrap();
        assert_eq!(json, "\"M\"");
        assert_eq!(serde_json::from_str::<Sex>("\"F\"").unwrap(), Sex::Female);
    }
}
