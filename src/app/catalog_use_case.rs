use crate::app::records::FarmRecords;
use crate::constants::MIN_UUID_FRAGMENT_LEN;
use crate::domain::{
    Animal, Breed, Building, BuildingSpace, Farm, Field, FieldType, Genus, LineageScope, Product,
    ProductType,
};
use crate::error::{FarmError, Result};
use crate::urls;
use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

/// Which genera a genus listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenusFilter {
    All,
    /// Genera with at least one animal on the farm, optionally minus one.
    OnTheFarm { exclude: Option<Uuid> },
}

/// Listings and path lookups behind the public URL surface.
#[derive(Clone)]
pub struct CatalogUseCase {
    records: FarmRecords,
}

fn by_title<T>(items: &mut [T], title: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| title(a).to_lowercase().cmp(&title(b).to_lowercase()));
}

fn looks_like_uuid_fragment(key: &str) -> bool {
    key.len() >= MIN_UUID_FRAGMENT_LEN && key.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

impl CatalogUseCase {
    pub fn new(records: FarmRecords) -> Self {
        Self { records }
    }

    pub async fn farm_index(&self) -> Result<HashMap<Uuid, Farm>> {
        Ok(self
            .records
            .all::<Farm>()
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect())
    }

    pub async fn farms(&self) -> Result<Vec<Farm>> {
        let mut farms = self.records.all::<Farm>().await?;
        by_title(&mut farms, |f| &f.info.title);
        Ok(farms)
    }

    /// All breeds, alphabetically.
    pub async fn breeds(&self) -> Result<Vec<Breed>> {
        let mut breeds = self.records.all::<Breed>().await?;
        by_title(&mut breeds, |b| &b.info.title);
        Ok(breeds)
    }

    pub async fn breeds_in_genus(&self, genus_id: Uuid) -> Result<Vec<Breed>> {
        let mut breeds = self.breeds().await?;
        breeds.retain(|b| b.genus_id == genus_id);
        Ok(breeds)
    }

    pub async fn genera(&self, filter: GenusFilter) -> Result<Vec<Genus>> {
        let mut genera = self.records.all::<Genus>().await?;
        if let GenusFilter::OnTheFarm { exclude } = filter {
            let breed_genus: HashMap<Uuid, Uuid> = self
                .records
                .all::<Breed>()
                .await?
                .into_iter()
                .map(|b| (b.id, b.genus_id))
                .collect();
            let present: HashSet<Uuid> = self
                .animals(LineageScope::OnTheFarm)
                .await?
                .iter()
                .filter_map(|a| breed_genus.get(&a.primary_breed_id).copied())
                .collect();
            genera.retain(|g| present.contains(&g.id) && Some(g.id) != exclude);
        }
        by_title(&mut genera, |g| &g.info.title);
        Ok(genera)
    }

    pub async fn animals(&self, scope: LineageScope) -> Result<Vec<Animal>> {
        let mut animals = self.records.all::<Animal>().await?;
        if scope == LineageScope::OnTheFarm {
            let farms = self.farm_index().await?;
            animals.retain(|a| scope.admits(a, &farms));
        }
        Ok(animals)
    }

    /// Animals on the farm that have been given a name.
    pub async fn named_animals(&self) -> Result<Vec<Animal>> {
        let mut animals = self.animals(LineageScope::OnTheFarm).await?;
        animals.retain(|a| a.name.as_deref().is_some_and(|n| !n.trim().is_empty()));
        by_title(&mut animals, |a| a.name.as_deref().unwrap_or_default());
        Ok(animals)
    }

    pub async fn animals_of_breed(
        &self,
        breed_id: Uuid,
        scope: LineageScope,
    ) -> Result<Vec<Animal>> {
        let mut animals = self.animals(scope).await?;
        animals.retain(|a| a.primary_breed_id == breed_id);
        Ok(animals)
    }

    pub async fn genus_by_slug(&self, slug: &str) -> Result<Genus> {
        self.records
            .all::<Genus>()
            .await?
            .into_iter()
            .find(|g| g.info.slug == slug)
            .ok_or_else(|| FarmError::not_found("genus", slug))
    }

    pub async fn breed_by_path(&self, genus_slug: &str, slug: &str) -> Result<Breed> {
        let genus = self.genus_by_slug(genus_slug).await?;
        self.records
            .all::<Breed>()
            .await?
            .into_iter()
            .find(|b| b.genus_id == genus.id && b.info.slug == slug)
            .ok_or_else(|| FarmError::not_found("breed", format!("{genus_slug}/{slug}")))
    }

    /// Resolve an animal detail path. The last segment is first tried as a
    /// UUID fragment, then as a slug.
    pub async fn animal_by_path(
        &self,
        genus_slug: &str,
        breed_slug: &str,
        slug_or_uuid: &str,
    ) -> Result<Animal> {
        let breed = self.breed_by_path(genus_slug, breed_slug).await?;
        let candidates = self
            .animals_of_breed(breed.id, LineageScope::Historical)
            .await?;

        if looks_like_uuid_fragment(slug_or_uuid) {
            if let Some(found) = candidates.iter().find(|a| a.uuid_contains(slug_or_uuid)) {
                debug!("Resolved animal {} by UUID fragment", found.id);
                return Ok(found.clone());
            }
        }

        candidates
            .into_iter()
            .find(|a| a.slug.as_deref() == Some(slug_or_uuid))
            .ok_or_else(|| {
                FarmError::not_found("animal", format!("{genus_slug}/{breed_slug}/{slug_or_uuid}"))
            })
    }

    pub async fn animal_url(&self, animal: &Animal) -> Result<String> {
        let breed: Breed = self.records.fetch(animal.primary_breed_id).await?;
        let genus: Genus = self.records.fetch(breed.genus_id).await?;
        Ok(urls::animal_url(animal, &breed, &genus))
    }

    pub async fn product_types(&self) -> Result<Vec<ProductType>> {
        let mut types = self.records.all::<ProductType>().await?;
        by_title(&mut types, |t| &t.info.title);
        Ok(types)
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        let mut products = self.records.all::<Product>().await?;
        by_title(&mut products, |p| &p.info.title);
        Ok(products)
    }

    pub async fn products_of_type(&self, type_id: Uuid) -> Result<Vec<Product>> {
        let mut products = self.products().await?;
        products.retain(|p| p.type_id == type_id);
        Ok(products)
    }

    pub async fn product_type_by_slug(&self, slug: &str) -> Result<ProductType> {
        self.records
            .all::<ProductType>()
            .await?
            .into_iter()
            .find(|t| t.info.slug == slug)
            .ok_or_else(|| FarmError::not_found("product type", slug))
    }

    pub async fn product_by_path(&self, type_slug: &str, slug: &str) -> Result<Product> {
        let product_type = self.product_type_by_slug(type_slug).await?;
        self.records
            .all::<Product>()
            .await?
            .into_iter()
            .find(|p| p.type_id == product_type.id && p.info.slug == slug)
            .ok_or_else(|| FarmError::not_found("product", format!("{type_slug}/{slug}")))
    }

    pub async fn buildings(&self) -> Result<Vec<Building>> {
        let mut buildings = self.records.all::<Building>().await?;
        by_title(&mut buildings, |b| &b.info.title);
        Ok(buildings)
    }

    pub async fn building_by_slug(&self, slug: &str) -> Result<Building> {
        self.records
            .all::<Building>()
            .await?
            .into_iter()
            .find(|b| b.info.slug == slug)
            .ok_or_else(|| FarmError::not_found("building", slug))
    }

    pub async fn spaces_in(&self, building_id: Uuid) -> Result<Vec<BuildingSpace>> {
        let mut spaces = self.records.all::<BuildingSpace>().await?;
        spaces.retain(|s| s.building_id == building_id);
        by_title(&mut spaces, |s| &s.info.title);
        Ok(spaces)
    }

    pub async fn fields(&self) -> Result<Vec<Field>> {
        let mut fields = self.records.all::<Field>().await?;
        by_title(&mut fields, |f| &f.info.title);
        Ok(fields)
    }

    pub async fn field_types(&self) -> Result<Vec<FieldType>> {
        let mut types = self.records.all::<FieldType>().await?;
        by_title(&mut types, |t| &t.info.title);
        Ok(types)
    }

    pub async fn field_by_slug(&self, slug: &str) -> Result<Field> {
        self.records
            .all::<Field>()
            .await?
            .into_iter()
            .find(|f| f.info.slug == slug)
            .ok_or_else(|| FarmError::not_found("field", slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;
    use crate::storage::InMemoryStorage;
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct Herd {
        catalog: CatalogUseCase,
        goat: Genus,
        sheep: Genus,
        nubian: Breed,
        clover: Animal,
        retired: Animal,
    }

    async fn herd() -> Herd {
        let records = FarmRecords::new(Arc::new(InMemoryStorage::new()));
        let home = Farm::new("Home Place", true);
        let goat = Genus::new("Goat");
        let sheep = Genus::new("Sheep");
        let nubian = Breed::new("Nubian", goat.id);
        let katahdin = Breed::new("Katahdin", sheep.id);
        let clover = Animal::new(nubian.id, Sex::Female)
            .named("Clover")
            .owned_by(home.id);
        let mut retired = Animal::new(katahdin.id, Sex::Male)
            .named("Old Tom")
            .owned_by(home.id);
        retired.deathday = NaiveDate::from_ymd_opt(2022, 2, 2);
        let unnamed = Animal::new(nubian.id, Sex::Male).owned_by(home.id);

        records.insert(&home).await.unwrap();
        for g in [&goat, &sheep] {
            records.insert(g).await.unwrap();
        }
        for b in [&nubian, &katahdin] {
            records.insert(b).await.unwrap();
        }
        for a in [&clover, &retired, &unnamed] {
            records.insert(a).await.unwrap();
        }

        Herd {
            catalog: CatalogUseCase::new(records),
            goat,
            sheep,
            nubian,
            clover,
            retired,
        }
    }

    #[tokio::test]
    async fn test_genus_filters() {
        let h = herd().await;
        let all = h.catalog.genera(GenusFilter::All).await.unwrap();
        assert_eq!(all.len(), 2);

        // Only the goat has a living animal on the farm
        let present = h
            .catalog
            .genera(GenusFilter::OnTheFarm { exclude: None })
            .await
            .unwrap();
        assert_eq!(present.iter().map(|g| g.id).collect::<Vec<_>>(), vec![h.goat.id]);

        let excluded = h
            .catalog
            .genera(GenusFilter::OnTheFarm {
                exclude: Some(h.goat.id),
            })
            .await
            .unwrap();
        assert!(excluded.is_empty());
        assert!(all.iter().any(|g| g.id == h.sheep.id));
    }

    #[tokio::test]
    async fn test_named_animals_are_on_the_farm() {
        let h = herd().await;
        let named = h.catalog.named_animals().await.unwrap();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].id, h.clover.id);

        let historical = h.catalog.animals(LineageScope::Historical).await.unwrap();
        assert!(historical.iter().any(|a| a.id == h.retired.id));
    }

    #[tokio::test]
    async fn test_animal_by_path_slug_and_uuid() {
        let h = herd().await;
        let by_slug = h
            .catalog
            .animal_by_path("goat", "nubian", "clover")
            .await
            .unwrap();
        assert_eq!(by_slug.id, h.clover.id);

        let fragment = &h.clover.id.simple().to_string()[..12];
        let by_uuid = h
            .catalog
            .animal_by_path("goat", "nubian", fragment)
            .await
            .unwrap();
        assert_eq!(by_uuid.id, h.clover.id);

        let wrong_breed = h.catalog.animal_by_path("sheep", "katahdin", "clover").await;
        assert!(wrong_breed.unwrap_err().is_not_found());

        let missing_genus = h.catalog.breed_by_path("pig", "nubian").await;
        assert!(missing_genus.unwrap_err().is_not_found());

        let url = h.catalog.animal_url(&by_slug).await.unwrap();
        assert_eq!(url, "/animals/goat/nubian/clover");
        assert_eq!(h.catalog.breeds_in_genus(h.goat.id).await.unwrap()[0].id, h.nubian.id);
    }
}
