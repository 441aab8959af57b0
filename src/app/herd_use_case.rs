use crate::app::records::FarmRecords;
use crate::domain::{
    breed_label, is_mixed_breed, Animal, AnimalRegistration, Breed, BreedMix, BuildingSpace,
    EntityRef, Farm, FarmAffiliation, Field, Location, MilkUnit, Milking, RegistrationBody,
    SecondaryBreed, Sex, slugify,
};
use crate::error::{FarmError, Result};
use crate::time_format;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Everything needed to enter a new animal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAnimal {
    pub name: Option<String>,
    /// Derived from the name when absent.
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub sex: Sex,
    pub birthday: Option<NaiveDate>,
    pub birthtime: Option<NaiveTime>,
    pub primary_breed_id: Uuid,
    pub dam_id: Option<Uuid>,
    pub sire_id: Option<Uuid>,
    pub owner: Option<FarmAffiliation>,
    pub breeder: Option<FarmAffiliation>,
    pub location: Option<Location>,
}

/// Milk produced by one animal on one day, per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyMilkTotal {
    pub date: NaiveDate,
    pub unit: MilkUnit,
    pub total: Decimal,
}

/// Record entry and derived values for individual animals.
#[derive(Clone)]
pub struct HerdUseCase {
    records: FarmRecords,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl HerdUseCase {
    pub fn new(records: FarmRecords) -> Self {
        Self { records }
    }

    /// Validate and store a new animal.
    ///
    /// The primary breed must exist, a dam must be a recorded female and a
    /// sire a recorded male. Farm owners, breeders and locations must point at
    /// existing records. The slug is unique within the breed.
    pub async fn register_animal(&self, new: NewAnimal) -> Result<Animal> {
        let breed: Breed = self
            .records
            .get(new.primary_breed_id)
            .await?
            .ok_or_else(|| {
                FarmError::Validation(format!("breed {} does not exist", new.primary_breed_id))
            })?;

        self.check_parent(new.dam_id, Sex::Female, "dam").await?;
        self.check_parent(new.sire_id, Sex::Male, "sire").await?;
        for affiliation in [&new.owner, &new.breeder].into_iter().flatten() {
            self.check_affiliation(affiliation).await?;
        }
        if let Some(location) = &new.location {
            self.check_location(location).await?;
        }

        let mut animal = Animal::new(breed.id, new.sex);
        animal.name = non_blank(new.name);
        animal.slug = non_blank(new.slug)
            .map(|s| slugify(&s))
            .or_else(|| animal.name.as_deref().map(slugify))
            .filter(|s| !s.is_empty());
        animal.description = new.description;
        animal.birthday = new.birthday;
        animal.birthtime = new.birthtime;
        animal.dam_id = new.dam_id;
        animal.sire_id = new.sire_id;
        animal.owner = new.owner;
        animal.breeder = new.breeder;
        animal.location = new.location;

        self.check_slug_free(&animal).await?;
        self.records.insert(&animal).await?;
        info!(
            "Registered {} ({}) as {}",
            animal.display_name(),
            animal.sex.label(),
            breed.title()
        );
        Ok(animal)
    }

    async fn check_parent(&self, id: Option<Uuid>, sex: Sex, slot: &str) -> Result<()> {
        let Some(id) = id else {
            return Ok(());
        };
        let parent: Animal = self
            .records
            .get(id)
            .await?
            .ok_or_else(|| FarmError::Validation(format!("{slot} {id} does not exist")))?;
        if parent.sex != sex {
            return Err(FarmError::Validation(format!(
                "{slot} {} is recorded as {}",
                parent.display_name(),
                parent.sex.label().to_lowercase()
            )));
        }
        Ok(())
    }

    async fn check_affiliation(&self, affiliation: &FarmAffiliation) -> Result<()> {
        match affiliation {
            FarmAffiliation::Farm(id) => {
                if self.records.get::<Farm>(*id).await?.is_none() {
                    return Err(FarmError::Validation(format!("farm {id} does not exist")));
                }
            }
            FarmAffiliation::Named(name) => {
                if name.trim().is_empty() {
                    return Err(FarmError::Validation(
                        "farm name must not be blank".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    async fn check_location(&self, location: &Location) -> Result<()> {
        let exists = match location {
            Location::BuildingSpace(id) => self.records.get::<BuildingSpace>(*id).await?.is_some(),
            Location::Field(id) => self.records.get::<Field>(*id).await?.is_some(),
        };
        if exists {
            Ok(())
        } else {
            Err(FarmError::Validation(format!(
                "location {location:?} does not exist"
            )))
        }
    }

    async fn check_slug_free(&self, animal: &Animal) -> Result<()> {
        let Some(slug) = &animal.slug else {
            return Ok(());
        };
        let taken = self.records.all::<Animal>().await?.into_iter().any(|other| {
            other.id != animal.id
                && other.primary_breed_id == animal.primary_breed_id
                && other.slug.as_ref() == Some(slug)
        });
        if taken {
            return Err(FarmError::Validation(format!(
                "slug '{slug}' is already used in this breed"
            )));
        }
        Ok(())
    }

    pub async fn rename(&self, animal_id: Uuid, name: &str) -> Result<Animal> {
        let mut animal: Animal = self.records.fetch(animal_id).await?;
        let name = name.trim();
        if name.is_empty() {
            return Err(FarmError::Validation("name must not be blank".to_string()));
        }
        animal = animal.named(name);
        self.check_slug_free(&animal).await?;
        self.records.save(&mut animal).await?;
        Ok(animal)
    }

    pub async fn move_to(&self, animal_id: Uuid, location: Location) -> Result<Animal> {
        let mut animal: Animal = self.records.fetch(animal_id).await?;
        self.check_location(&location).await?;
        animal.location = Some(location);
        self.records.save(&mut animal).await?;
        debug!("Moved {} to {:?}", animal.display_name(), location);
        Ok(animal)
    }

    /// Record a death date. The animal stays in the historical record.
    pub async fn record_death(&self, animal_id: Uuid, deathday: NaiveDate) -> Result<Animal> {
        let mut animal: Animal = self.records.fetch(animal_id).await?;
        if animal.birthday.is_some_and(|born| deathday < born) {
            return Err(FarmError::Validation(format!(
                "death date {deathday} is before the birthday"
            )));
        }
        animal.deathday = Some(deathday);
        self.records.save(&mut animal).await?;
        info!("Recorded death of {} on {}", animal.display_name(), deathday);
        Ok(animal)
    }

    pub async fn secondary_breeds(&self, animal_id: Uuid) -> Result<Vec<SecondaryBreed>> {
        let subject = EntityRef::Animal(animal_id);
        let mut secondaries = self.records.all::<SecondaryBreed>().await?;
        secondaries.retain(|s| s.subject == subject);
        Ok(secondaries)
    }

    /// Attach a secondary breed. Rejected when the resulting mix leaves the
    /// primary breed with nothing.
    pub async fn add_secondary_breed(
        &self,
        animal_id: Uuid,
        breed_id: Uuid,
        percentage: u8,
    ) -> Result<SecondaryBreed> {
        let animal: Animal = self.records.fetch(animal_id).await?;
        let breed: Breed = self.records.fetch(breed_id).await?;
        if breed.id == animal.primary_breed_id {
            return Err(FarmError::Validation(format!(
                "{} is already the primary breed",
                breed.title()
            )));
        }

        let mut secondaries = self.secondary_breeds(animal_id).await?;
        if secondaries.iter().any(|s| s.breed_id == breed_id) {
            return Err(FarmError::Validation(format!(
                "{} is already recorded as a secondary breed",
                breed.title()
            )));
        }
        let secondary = SecondaryBreed::new(EntityRef::Animal(animal_id), breed_id, percentage);
        secondaries.push(secondary.clone());
        BreedMix::resolve(animal.primary_breed_id, &secondaries)?;

        self.records.insert(&secondary).await?;
        Ok(secondary)
    }

    pub async fn breed_label(&self, animal: &Animal) -> Result<String> {
        let primary: Breed = self.records.fetch(animal.primary_breed_id).await?;
        let secondaries = self.secondary_breeds(animal.id).await?;
        Ok(breed_label(&primary, &secondaries))
    }

    /// Mixed as soon as any secondary breed is recorded, whether or not the
    /// shares resolve.
    pub async fn is_mixed_breed(&self, animal: &Animal) -> Result<bool> {
        Ok(is_mixed_breed(&self.secondary_breeds(animal.id).await?))
    }

    pub async fn breed_mix(&self, animal: &Animal) -> Result<BreedMix> {
        let secondaries = self.secondary_breeds(animal.id).await?;
        BreedMix::resolve(animal.primary_breed_id, &secondaries)
    }

    /// Age as of `today` (or at death). `None` without a birthday or on the
    /// day of birth.
    pub fn age(&self, animal: &Animal, today: NaiveDate, full_version: bool) -> Option<String> {
        let birthday = animal.birthday?;
        time_format::age(birthday, animal.deathday, today, full_version)
    }

    /// Record a registration with a breed registry and flag the animal as
    /// registered.
    pub async fn register_with_body(
        &self,
        animal_id: Uuid,
        body_id: Uuid,
        reg_id: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<AnimalRegistration> {
        let mut animal: Animal = self.records.fetch(animal_id).await?;
        let body: RegistrationBody = self.records.fetch(body_id).await?;

        let registration = AnimalRegistration {
            id: Uuid::new_v4(),
            animal_id,
            body_id: body.id,
            reg_id: non_blank(reg_id),
            date,
        };
        self.records.insert(&registration).await?;

        if !animal.registered {
            animal.registered = true;
            self.records.save(&mut animal).await?;
        }
        info!(
            "Registered {} with {}",
            animal.display_name(),
            body.info.title
        );
        Ok(registration)
    }

    pub async fn registrations(&self, animal_id: Uuid) -> Result<Vec<AnimalRegistration>> {
        let mut registrations = self.records.all::<AnimalRegistration>().await?;
        registrations.retain(|r| r.animal_id == animal_id);
        Ok(registrations)
    }

    pub async fn record_milking(
        &self,
        animal_id: Uuid,
        milked_at: NaiveDateTime,
        quantity: Decimal,
        unit: MilkUnit,
    ) -> Result<Milking> {
        let animal: Animal = self.records.fetch(animal_id).await?;
        if animal.sex != Sex::Female {
            return Err(FarmError::Validation(format!(
                "{} is not a female",
                animal.display_name()
            )));
        }
        if quantity <= Decimal::ZERO {
            return Err(FarmError::Validation(format!(
                "milk quantity must be positive, got {quantity}"
            )));
        }

        let milking = Milking {
            id: Uuid::new_v4(),
            animal_id,
            milked_at,
            quantity,
            unit,
        };
        self.records.insert(&milking).await?;
        debug!(
            "Milked {}: {} {}",
            animal.display_name(),
            quantity,
            unit.abbreviation()
        );
        Ok(milking)
    }

    /// Milkings for one animal, oldest first.
    pub async fn milkings(&self, animal_id: Uuid) -> Result<Vec<Milking>> {
        let mut milkings = self.records.all::<Milking>().await?;
        milkings.retain(|m| m.animal_id == animal_id);
        milkings.sort_by_key(|m| m.milked_at);
        Ok(milkings)
    }

    /// Per-day totals between `from` and `to`, both inclusive. Quantities in
    /// different units are totalled separately.
    pub async fn daily_milk_totals(
        &self,
        animal_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyMilkTotal>> {
        if from > to {
            return Err(FarmError::Validation(format!(
                "range start {from} is after its end {to}"
            )));
        }

        let mut totals: BTreeMap<(NaiveDate, &'static str), DailyMilkTotal> = BTreeMap::new();
        for milking in self.milkings(animal_id).await? {
            let date = milking.milked_at.date();
            if date < from || date > to {
                continue;
            }
            totals
                .entry((date, milking.unit.abbreviation()))
                .or_insert_with(|| DailyMilkTotal {
                    date,
                    unit: milking.unit,
                    total: Decimal::ZERO,
                })
                .total += milking.quantity;
        }
        Ok(totals.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Genus;
    use crate::storage::InMemoryStorage;
    use std::sync::Arc;

    struct Fixture {
        herd: HerdUseCase,
        records: FarmRecords,
        nubian: Breed,
        alpine: Breed,
        doe: Animal,
        buck: Animal,
    }

    async fn fixture() -> Fixture {
        let records = FarmRecords::new(Arc::new(InMemoryStorage::new()));
        let goat = Genus::new("Goat");
        let nubian = Breed::new("Nubian", goat.id);
        let alpine = Breed::new("Alpine", goat.id);
        records.insert(&goat).await.unwrap();
        records.insert(&nubian).await.unwrap();
        records.insert(&alpine).await.unwrap();

        let herd = HerdUseCase::new(records.clone());
        let doe = herd
            .register_animal(NewAnimal {
                name: Some("Clover".to_string()),
                sex: Sex::Female,
                birthday: NaiveDate::from_ymd_opt(2020, 3, 1),
                primary_breed_id: nubian.id,
                ..Default::default()
            })
            .await
            .unwrap();
        let buck = herd
            .register_animal(NewAnimal {
                name: Some("Duke".to_string()),
                sex: Sex::Male,
                primary_breed_id: nubian.id,
                ..Default::default()
            })
            .await
            .unwrap();

        Fixture {
            herd,
            records,
            nubian,
            alpine,
            doe,
            buck,
        }
    }

    #[tokio::test]
    async fn test_register_validates_parents() {
        let f = fixture().await;
        assert_eq!(f.doe.slug.as_deref(), Some("clover"));

        let kid = f
            .herd
            .register_animal(NewAnimal {
                name: Some("Pip".to_string()),
                primary_breed_id: f.nubian.id,
                dam_id: Some(f.doe.id),
                sire_id: Some(f.buck.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(kid.dam_id, Some(f.doe.id));

        let swapped = f
            .herd
            .register_animal(NewAnimal {
                primary_breed_id: f.nubian.id,
                dam_id: Some(f.buck.id),
                ..Default::default()
            })
            .await;
        assert!(matches!(swapped, Err(FarmError::Validation(_))));

        let unknown_breed = f
            .herd
            .register_animal(NewAnimal {
                primary_breed_id: Uuid::new_v4(),
                ..Default::default()
            })
            .await;
        assert!(matches!(unknown_breed, Err(FarmError::Validation(_))));

        let duplicate = f
            .herd
            .register_animal(NewAnimal {
                name: Some("Clover".to_string()),
                primary_breed_id: f.nubian.id,
                ..Default::default()
            })
            .await;
        assert!(matches!(duplicate, Err(FarmError::Validation(_))));
    }

    #[tokio::test]
    async fn test_breed_label_and_mix() {
        let f = fixture().await;
        assert_eq!(f.herd.breed_label(&f.doe).await.unwrap(), "Nubian");

        f.herd
            .add_secondary_breed(f.doe.id, f.alpine.id, 25)
            .await
            .unwrap();
        assert_eq!(f.herd.breed_label(&f.doe).await.unwrap(), "Mixed Nubian");
        let mix = f.herd.breed_mix(&f.doe).await.unwrap();
        assert_eq!(mix.primary.percentage, 75);

        // The buck stays unmixed.
        assert_eq!(f.herd.breed_label(&f.buck).await.unwrap(), "Nubian");
    }

    #[tokio::test]
    async fn test_secondary_breeds_cannot_reach_one_hundred() {
        let f = fixture().await;
        let saanen = Breed::new("Saanen", f.nubian.genus_id);
        f.records.insert(&saanen).await.unwrap();

        f.herd
            .add_secondary_breed(f.buck.id, f.alpine.id, 60)
            .await
            .unwrap();
        let over = f.herd.add_secondary_breed(f.buck.id, saanen.id, 40).await;
        assert!(matches!(over, Err(FarmError::Validation(_))));
        assert_eq!(f.herd.secondary_breeds(f.buck.id).await.unwrap().len(), 1);

        let primary_again = f.herd.add_secondary_breed(f.buck.id, f.nubian.id, 10).await;
        assert!(matches!(primary_again, Err(FarmError::Validation(_))));
    }

    #[tokio::test]
    async fn test_death_and_age() {
        let f = fixture().await;
        let today = NaiveDate::from_ymd_opt(2022, 6, 15).unwrap();
        assert_eq!(
            f.herd.age(&f.doe, today, true).as_deref(),
            Some("2 years, 3 months")
        );

        let early = f
            .herd
            .record_death(f.doe.id, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap())
            .await;
        assert!(matches!(early, Err(FarmError::Validation(_))));

        let dead = f
            .herd
            .record_death(f.doe.id, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(f.herd.age(&dead, today, false).as_deref(), Some("1 year"));
        assert!(f.herd.age(&f.buck, today, false).is_none());
    }

    #[tokio::test]
    async fn test_daily_milk_totals() {
        let f = fixture().await;
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let at = |h: u32| day.and_hms_opt(h, 0, 0).unwrap();

        f.herd
            .record_milking(f.doe.id, at(6), Decimal::new(35, 1), MilkUnit::Pounds)
            .await
            .unwrap();
        f.herd
            .record_milking(f.doe.id, at(18), Decimal::new(30, 1), MilkUnit::Pounds)
            .await
            .unwrap();
        f.herd
            .record_milking(
                f.doe.id,
                at(6) + chrono::Duration::days(1),
                Decimal::new(2, 0),
                MilkUnit::Pounds,
            )
            .await
            .unwrap();

        let totals = f.herd.daily_milk_totals(f.doe.id, day, day).await.unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total, Decimal::new(65, 1));

        let buck_milk = f
            .herd
            .record_milking(f.buck.id, at(6), Decimal::ONE, MilkUnit::Liters)
            .await;
        assert!(matches!(buck_milk, Err(FarmError::Validation(_))));
        assert_eq!(f.herd.milkings(f.doe.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_rename_to_unsluggable_name_keys_url_by_id() {
        let f = fixture().await;
        let renamed = f.herd.rename(f.doe.id, "!!!").await.unwrap();
        assert_eq!(renamed.name.as_deref(), Some("!!!"));
        assert_eq!(renamed.slug, None);

        let genus: Genus = f.records.fetch(f.nubian.genus_id).await.unwrap();
        let url = crate::urls::animal_url(&renamed, &f.nubian, &genus);
        assert_eq!(url, format!("/animals/goat/nubian/{}", f.doe.id.simple()));

        let stored: Animal = f.records.fetch(f.doe.id).await.unwrap();
        assert_eq!(stored.slug, None);
    }
}
