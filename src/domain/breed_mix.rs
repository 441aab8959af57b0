//! Primary / secondary breed resolution.
use super::animal::SecondaryBreed;
use super::taxonomy::Breed;
use crate::constants::MIXED_BREED_PREFIX;
use crate::error::{FarmError, Result};
use serde::Serialize;
use uuid::Uuid;

/// An animal counts as mixed as soon as any secondary breed is recorded.
pub fn is_mixed_breed(secondaries: &[SecondaryBreed]) -> bool {
    !secondaries.is_empty()
}

/// Display label: the primary breed title, prefixed with "Mixed " when mixed.
pub fn breed_label(primary: &Breed, secondaries: &[SecondaryBreed]) -> String {
    if is_mixed_breed(secondaries) {
        format!("{}{}", MIXED_BREED_PREFIX, primary.title())
    } else {
        primary.title().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreedShare {
    pub breed_id: Uuid,
    pub percentage: u8,
}

/// Percentages contributed by each breed of an animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreedMix {
    pub primary: BreedShare,
    pub secondary: Vec<BreedShare>,
}

impl BreedMix {
    /// The primary breed takes whatever the secondary breeds leave over.
    pub fn resolve(primary_breed_id: Uuid, secondaries: &[SecondaryBreed]) -> Result<Self> {
        let mut total: u32 = 0;
        let mut secondary = Vec::with_capacity(secondaries.len());
        for s in secondaries {
            validate_percentage(s.percentage)?;
            total += u32::from(s.percentage);
            secondary.push(BreedShare {
                breed_id: s.breed_id,
                percentage: s.percentage,
            });
        }

        if total >= 100 {
            return Err(FarmError::Validation(format!(
                "secondary breeds add up to {total}%, leaving nothing for the primary breed"
            )));
        }

        Ok(Self {
            primary: BreedShare {
                breed_id: primary_breed_id,
                percentage: (100 - total) as u8,
            },
            secondary,
        })
    }

    pub fn is_mixed(&self) -> bool {
        !self.secondary.is_empty()
    }
}

pub fn validate_percentage(percentage: u8) -> Result<()> {
    if (1..=99).contains(&percentage) {
        Ok(())
    } else {
        Err(FarmError::Validation(format!(
            "secondary breed percentage must be between 1 and 99, got {percentage}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::EntityRef;

    fn secondary(animal: Uuid, percentage: u8) -> SecondaryBreed {
        SecondaryBreed::new(EntityRef::Animal(animal), Uuid::new_v4(), percentage)
    }

    #[test]
    fn test_label_without_secondary_breeds_is_unprefixed() {
        let breed = Breed::new("Nubian", Uuid::new_v4());
        assert_eq!(breed_label(&breed, &[]), "Nubian");
        assert!(!is_mixed_breed(&[]));
    }

    #[test]
    fn test_label_with_secondary_breed_is_mixed() {
        let breed = Breed::new("Nubian", Uuid::new_v4());
        let animal = Uuid::new_v4();
        let secondaries = vec![secondary(animal, 25)];
        assert_eq!(breed_label(&breed, &secondaries), "Mixed Nubian");
    }

    #[test]
    fn test_mix_gives_remainder_to_primary() {
        let animal = Uuid::new_v4();
        let primary = Uuid::new_v4();
        let secondaries = [secondary(animal, 25), secondary(animal, 12)];
        let mix = BreedMix::resolve(primary, &secondaries).unwrap();
        assert_eq!(mix.primary.percentage, 63);
        assert_eq!(mix.secondary.len(), 2);
        assert!(mix.is_mixed());
    }

    #[test]
    fn test_mix_rejects_full_secondary_share() {
        let animal = Uuid::new_v4();
        let secondaries = [secondary(animal, 50), secondary(animal, 50)];
        let err = BreedMix::resolve(Uuid::new_v4(), &secondaries);
        assert!(matches!(err, Err(FarmError::Validation(_))));

        let err = BreedMix::resolve(Uuid::new_v4(), &[secondary(animal, 0)]);
        assert!(matches!(err, Err(FarmError::Validation(_))));
    }
}
