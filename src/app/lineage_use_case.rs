use crate::app::records::FarmRecords;
use crate::domain::lineage::{self, Pedigree};
use crate::domain::{Animal, ChildTableSwitch, Farm, LineageScope, Litters};
use crate::error::Result;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Parentage queries against the stored herd.
#[derive(Clone)]
pub struct LineageUseCase {
    records: FarmRecords,
}

impl LineageUseCase {
    pub fn new(records: FarmRecords) -> Self {
        Self { records }
    }

    async fn herd(&self) -> Result<(Vec<Animal>, HashMap<Uuid, Farm>)> {
        let animals = self.records.all::<Animal>().await?;
        let farms = self
            .records
            .all::<Farm>()
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();
        Ok((animals, farms))
    }

    fn scoped(
        found: Vec<&Animal>,
        scope: LineageScope,
        farms: &HashMap<Uuid, Farm>,
    ) -> Vec<Animal> {
        found
            .into_iter()
            .filter(|a| scope.admits(a, farms))
            .cloned()
            .collect()
    }

    pub async fn sire_of(&self, parent: Uuid, scope: LineageScope) -> Result<Vec<Animal>> {
        let (animals, farms) = self.herd().await?;
        Ok(Self::scoped(lineage::sire_of(parent, &animals), scope, &farms))
    }

    pub async fn dam_of(&self, parent: Uuid, scope: LineageScope) -> Result<Vec<Animal>> {
        let (animals, farms) = self.herd().await?;
        Ok(Self::scoped(lineage::dam_of(parent, &animals), scope, &farms))
    }

    /// Union of sire and dam progeny; an animal recorded in both slots is
    /// listed once.
    pub async fn progeny(&self, parent: Uuid, scope: LineageScope) -> Result<Vec<Animal>> {
        let (animals, farms) = self.herd().await?;
        let mut seen = HashSet::new();
        let progeny = lineage::progeny_of(parent, &animals)
            .into_iter()
            .filter(|a| seen.insert(a.id))
            .collect();
        Ok(Self::scoped(progeny, scope, &farms))
    }

    pub async fn litters(&self, parent: Uuid) -> Result<Litters> {
        let progeny = self.progeny(parent, LineageScope::Historical).await?;
        Ok(lineage::group_litters(&progeny))
    }

    /// Children through one parent slot, or `None` when there are none.
    pub async fn child_table(
        &self,
        parent: Uuid,
        switch: ChildTableSwitch,
    ) -> Result<Option<Vec<Animal>>> {
        let children = match switch {
            ChildTableSwitch::Dam => self.dam_of(parent, LineageScope::Historical).await?,
            ChildTableSwitch::Sire => self.sire_of(parent, LineageScope::Historical).await?,
            ChildTableSwitch::All => self.progeny(parent, LineageScope::Historical).await?,
        };
        Ok((!children.is_empty()).then_some(children))
    }

    pub async fn pedigree(&self, animal_id: Uuid, depth: usize) -> Result<Pedigree> {
        let root: Animal = self.records.fetch(animal_id).await?;
        let herd = self.herd_index().await?;
        Ok(lineage::pedigree(&root, &herd, depth))
    }

    pub async fn parentage_cycles(&self) -> Result<Vec<Vec<Uuid>>> {
        let herd = self.herd_index().await?;
        Ok(lineage::parentage_cycles(&herd))
    }

    async fn herd_index(&self) -> Result<HashMap<Uuid, Animal>> {
        Ok(self
            .records
            .all::<Animal>()
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sex;
    use crate::storage::InMemoryStorage;
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_scoped_progeny() {
        let records = FarmRecords::new(Arc::new(InMemoryStorage::new()));
        let home = Farm::new("Home Place", true);
        let breed = Uuid::new_v4();
        let a = Animal::new(breed, Sex::Male).named("Buck").owned_by(home.id);
        let mut b = Animal::new(breed, Sex::Male).named("Kid B").owned_by(home.id);
        b.sire_id = Some(a.id);
        let mut c = Animal::new(breed, Sex::Female).named("Kid C").owned_by(home.id);
        c.dam_id = Some(a.id);
        c.deathday = NaiveDate::from_ymd_opt(2023, 1, 1);

        records.insert(&home).await.unwrap();
        for animal in [&a, &b, &c] {
            records.insert(animal).await.unwrap();
        }
        let lineage = LineageUseCase::new(records);

        let historical = lineage.progeny(a.id, LineageScope::Historical).await.unwrap();
        let ids: HashSet<Uuid> = historical.iter().map(|x| x.id).collect();
        assert_eq!(ids, HashSet::from([b.id, c.id]));

        let on_farm = lineage.progeny(a.id, LineageScope::OnTheFarm).await.unwrap();
        assert_eq!(on_farm.len(), 1);
        assert_eq!(on_farm[0].id, b.id);

        let sired = lineage.sire_of(a.id, LineageScope::Historical).await.unwrap();
        assert_eq!(sired.len(), 1);
        assert_eq!(sired[0].id, b.id);

        assert!(lineage
            .child_table(b.id, ChildTableSwitch::All)
            .await
            .unwrap()
            .is_none());
        let dams = lineage
            .child_table(a.id, ChildTableSwitch::Dam)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dams[0].id, c.id);
    }
}
