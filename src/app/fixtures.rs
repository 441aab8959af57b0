//! JSON fixture bundles for seeding and exporting a farm.
//!
//! Every collection is optional in the file. Import order follows the
//! references between records so parents land before the records that point
//! at them.
use crate::app::records::FarmRecords;
use crate::domain::{
    Animal, AnimalRegistration, Attribute, AttributeOption, Breed, BreedMix, Building,
    BuildingSpace, EntityRef, Farm, FarmAffiliation, Field, FieldType, Genus, Location, Milking,
    Note, Product, ProductType, Record, RecordKind, RegistrationBody, SecondaryBreed,
};
use crate::error::{FarmError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureBundle {
    pub farms: Vec<Farm>,
    pub genera: Vec<Genus>,
    pub breeds: Vec<Breed>,
    pub registration_bodies: Vec<RegistrationBody>,
    pub field_types: Vec<FieldType>,
    pub fields: Vec<Field>,
    pub buildings: Vec<Building>,
    pub building_spaces: Vec<BuildingSpace>,
    pub product_types: Vec<ProductType>,
    pub products: Vec<Product>,
    pub animals: Vec<Animal>,
    pub secondary_breeds: Vec<SecondaryBreed>,
    pub registrations: Vec<AnimalRegistration>,
    pub milkings: Vec<Milking>,
    pub attribute_options: Vec<AttributeOption>,
    pub attributes: Vec<Attribute>,
    pub notes: Vec<Note>,
}

async fn insert_all<T: Record>(records: &FarmRecords, items: &[T]) -> Result<()> {
    for item in items {
        records.insert(item).await?;
    }
    Ok(())
}

fn ids<T: Record>(items: &[T]) -> HashSet<Uuid> {
    items.iter().map(Record::id).collect()
}

impl FixtureBundle {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FarmError::Config(format!("Failed to read fixture {}: {}", path.display(), e))
        })?;
        let bundle: FixtureBundle = serde_json::from_str(&content)?;
        Ok(bundle)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Store every record in the bundle, replacing records with the same id.
    pub async fn import(&self, records: &FarmRecords) -> Result<()> {
        insert_all(records, &self.farms).await?;
        insert_all(records, &self.genera).await?;
        insert_all(records, &self.breeds).await?;
        insert_all(records, &self.registration_bodies).await?;
        insert_all(records, &self.field_types).await?;
        insert_all(records, &self.fields).await?;
        insert_all(records, &self.buildings).await?;
        insert_all(records, &self.building_spaces).await?;
        insert_all(records, &self.product_types).await?;
        insert_all(records, &self.products).await?;
        insert_all(records, &self.animals).await?;
        insert_all(records, &self.secondary_breeds).await?;
        insert_all(records, &self.registrations).await?;
        insert_all(records, &self.milkings).await?;
        insert_all(records, &self.attribute_options).await?;
        insert_all(records, &self.attributes).await?;
        insert_all(records, &self.notes).await?;

        info!(
            "Imported fixture bundle: {} animals, {} breeds, {} products",
            self.animals.len(),
            self.breeds.len(),
            self.products.len()
        );
        Ok(())
    }

    pub async fn export(records: &FarmRecords) -> Result<Self> {
        Ok(Self {
            farms: records.all().await?,
            genera: records.all().await?,
            breeds: records.all().await?,
            registration_bodies: records.all().await?,
            field_types: records.all().await?,
            fields: records.all().await?,
            buildings: records.all().await?,
            building_spaces: records.all().await?,
            product_types: records.all().await?,
            products: records.all().await?,
            animals: records.all().await?,
            secondary_breeds: records.all().await?,
            registrations: records.all().await?,
            milkings: records.all().await?,
            attribute_options: records.all().await?,
            attributes: records.all().await?,
            notes: records.all().await?,
        })
    }

    /// Number of records per kind, in import order.
    pub fn counts(&self) -> Vec<(RecordKind, usize)> {
        vec![
            (RecordKind::Farm, self.farms.len()),
            (RecordKind::Genus, self.genera.len()),
            (RecordKind::Breed, self.breeds.len()),
            (RecordKind::RegistrationBody, self.registration_bodies.len()),
            (RecordKind::FieldType, self.field_types.len()),
            (RecordKind::Field, self.fields.len()),
            (RecordKind::Building, self.buildings.len()),
            (RecordKind::BuildingSpace, self.building_spaces.len()),
            (RecordKind::ProductType, self.product_types.len()),
            (RecordKind::Product, self.products.len()),
            (RecordKind::Animal, self.animals.len()),
            (RecordKind::SecondaryBreed, self.secondary_breeds.len()),
            (RecordKind::AnimalRegistration, self.registrations.len()),
            (RecordKind::Milking, self.milkings.len()),
            (RecordKind::AttributeOption, self.attribute_options.len()),
            (RecordKind::Attribute, self.attributes.len()),
            (RecordKind::Note, self.notes.len()),
        ]
    }

    /// References inside the bundle that point at records it does not
    /// contain, one message per problem.
    pub fn dangling_references(&self) -> Vec<String> {
        let farms = ids(&self.farms);
        let genera = ids(&self.genera);
        let breeds = ids(&self.breeds);
        let bodies = ids(&self.registration_bodies);
        let field_types = ids(&self.field_types);
        let fields = ids(&self.fields);
        let buildings = ids(&self.buildings);
        let spaces = ids(&self.building_spaces);
        let product_types = ids(&self.product_types);
        let products = ids(&self.products);
        let animals = ids(&self.animals);
        let options = ids(&self.attribute_options);

        let subject_exists = |subject: &EntityRef| match subject {
            EntityRef::Farm(id) => farms.contains(id),
            EntityRef::Animal(id) => animals.contains(id),
            EntityRef::Breed(id) => breeds.contains(id),
            EntityRef::Product(id) => products.contains(id),
            EntityRef::Building(id) => buildings.contains(id),
            EntityRef::BuildingSpace(id) => spaces.contains(id),
            EntityRef::Field(id) => fields.contains(id),
        };

        let mut problems = Vec::new();
        let mut check = |ok: bool, what: String| {
            if !ok {
                problems.push(what);
            }
        };

        for b in &self.breeds {
            check(
                genera.contains(&b.genus_id),
                format!("breed {} -> genus {}", b.id, b.genus_id),
            );
        }
        for r in &self.registration_bodies {
            check(
                breeds.contains(&r.breed_id),
                format!("registration body {} -> breed {}", r.id, r.breed_id),
            );
        }
        for f in &self.fields {
            if let Some(farm) = f.farm_id {
                check(farms.contains(&farm), format!("field {} -> farm {}", f.id, farm));
            }
            if let Some(kind) = f.field_type_id {
                check(
                    field_types.contains(&kind),
                    format!("field {} -> field type {}", f.id, kind),
                );
            }
        }
        for b in &self.buildings {
            if let Some(farm) = b.farm_id {
                check(farms.contains(&farm), format!("building {} -> farm {}", b.id, farm));
            }
        }
        for s in &self.building_spaces {
            check(
                buildings.contains(&s.building_id),
                format!("building space {} -> building {}", s.id, s.building_id),
            );
        }
        for p in &self.products {
            check(
                product_types.contains(&p.type_id),
                format!("product {} -> product type {}", p.id, p.type_id),
            );
        }
        for a in &self.animals {
            check(
                breeds.contains(&a.primary_breed_id),
                format!("animal {} -> breed {}", a.id, a.primary_breed_id),
            );
            for parent in [a.dam_id, a.sire_id].into_iter().flatten() {
                check(
                    animals.contains(&parent),
                    format!("animal {} -> parent {}", a.id, parent),
                );
            }
            let farm_ids = [&a.owner, &a.breeder]
                .into_iter()
                .flatten()
                .filter_map(FarmAffiliation::farm_id);
            for farm in farm_ids {
                check(farms.contains(&farm), format!("animal {} -> farm {}", a.id, farm));
            }
            match a.location {
                Some(Location::BuildingSpace(id)) => check(
                    spaces.contains(&id),
                    format!("animal {} -> building space {}", a.id, id),
                ),
                Some(Location::Field(id)) => {
                    check(fields.contains(&id), format!("animal {} -> field {}", a.id, id))
                }
                None => {}
            }
        }
        for s in &self.secondary_breeds {
            check(
                breeds.contains(&s.breed_id),
                format!("secondary breed {} -> breed {}", s.id, s.breed_id),
            );
            check(
                subject_exists(&s.subject),
                format!("secondary breed {} -> {:?}", s.id, s.subject),
            );
        }
        for r in &self.registrations {
            check(
                animals.contains(&r.animal_id),
                format!("registration {} -> animal {}", r.id, r.animal_id),
            );
            check(
                bodies.contains(&r.body_id),
                format!("registration {} -> registration body {}", r.id, r.body_id),
            );
        }
        for m in &self.milkings {
            check(
                animals.contains(&m.animal_id),
                format!("milking {} -> animal {}", m.id, m.animal_id),
            );
        }
        for a in &self.attributes {
            check(
                options.contains(&a.option_id),
                format!("attribute {} -> option {}", a.id, a.option_id),
            );
            check(
                subject_exists(&a.subject),
                format!("attribute {} -> {:?}", a.id, a.subject),
            );
        }
        for n in &self.notes {
            check(
                subject_exists(&n.subject),
                format!("note {} -> {:?}", n.id, n.subject),
            );
        }
        problems
    }

    /// Animals whose secondary breeds do not form a valid mix: a share
    /// outside 1..=99 or shares that leave the primary breed nothing.
    pub fn invalid_breed_mixes(&self) -> Vec<String> {
        let mut by_animal: BTreeMap<Uuid, Vec<SecondaryBreed>> = BTreeMap::new();
        for secondary in &self.secondary_breeds {
            if let EntityRef::Animal(id) = secondary.subject {
                by_animal.entry(id).or_default().push(secondary.clone());
            }
        }

        let mut problems = Vec::new();
        for animal in &self.animals {
            let Some(secondaries) = by_animal.get(&animal.id) else {
                continue;
            };
            if let Err(e) = BreedMix::resolve(animal.primary_breed_id, secondaries) {
                problems.push(format!("animal {}: {}", animal.id, e));
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;

    #[test]
    fn test_dangling_references_are_reported() {
        let goat = Genus::new("Goat");
        let nubian = Breed::new("Nubian", goat.id);
        let mut kid = Animal::new(nubian.id, Sex::Female).named("Pip");
        kid.dam_id = Some(Uuid::new_v4());

        let bundle = FixtureBundle {
            genera: vec![goat],
            breeds: vec![nubian],
            animals: vec![kid],
            ..Default::default()
        };
        let problems = bundle.dangling_references();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("parent"));
    }

    #[test]
    fn test_invalid_breed_mixes_are_reported() {
        let goat = Genus::new("Goat");
        let nubian = Breed::new("Nubian", goat.id);
        let alpine = Breed::new("Alpine", goat.id);
        let pop = Animal::new(nubian.id, Sex::Male).named("Pop");
        let pip = Animal::new(nubian.id, Sex::Female).named("Pip");

        let bundle = FixtureBundle {
            genera: vec![goat],
            secondary_breeds: vec![
                SecondaryBreed::new(EntityRef::Animal(pop.id), alpine.id, 100),
                SecondaryBreed::new(EntityRef::Animal(pip.id), alpine.id, 25),
            ],
            breeds: vec![nubian, alpine],
            animals: vec![pop.clone(), pip],
            ..Default::default()
        };
        assert!(bundle.dangling_references().is_empty());

        let problems = bundle.invalid_breed_mixes();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains(&pop.id.to_string()));
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let bundle: FixtureBundle = serde_json::from_str(r#"{"genera": []}"#).unwrap();
        assert!(bundle.counts().iter().all(|(_, n)| *n == 0));
        assert!(bundle.dangling_references().is_empty());
    }
}
