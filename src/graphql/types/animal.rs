use super::{to_id, AttributeValue, Breed, ChildSlot, MilkUnitValue, Note, Scope, SexValue};
use crate::app::DailyMilkTotal;
use crate::constants::DEFAULT_PEDIGREE_DEPTH;
use crate::domain::{
    self, AnimalRegistration, ChildTableSwitch, EntityRef, FarmAffiliation, Location, Pedigree,
};
use crate::error::FarmError;
use crate::graphql::schema::GraphQLContext;
use async_graphql::{Context, FieldResult, Object, SimpleObject, ID};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

/// GraphQL representation of an Animal
#[derive(Clone)]
pub struct Animal {
    pub inner: domain::Animal,
}

impl From<domain::Animal> for Animal {
    fn from(animal: domain::Animal) -> Self {
        Self { inner: animal }
    }
}

fn affiliation_label(affiliation: &Option<FarmAffiliation>) -> Option<String> {
    match affiliation {
        Some(FarmAffiliation::Named(name)) => Some(name.clone()),
        Some(FarmAffiliation::Farm(id)) => Some(id.to_string()),
        None => None,
    }
}

#[Object]
impl Animal {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Name, or the UUID for unnamed animals
    async fn display_name(&self) -> String {
        self.inner.display_name()
    }

    async fn slug(&self) -> Option<&str> {
        self.inner.slug.as_deref()
    }

    async fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    async fn sex(&self) -> SexValue {
        self.inner.sex.into()
    }

    async fn birthday(&self) -> Option<NaiveDate> {
        self.inner.birthday
    }

    async fn birthtime(&self) -> Option<NaiveTime> {
        self.inner.birthtime
    }

    async fn deathday(&self) -> Option<NaiveDate> {
        self.inner.deathday
    }

    async fn is_alive(&self) -> bool {
        self.inner.is_alive()
    }

    async fn registered(&self) -> bool {
        self.inner.registered
    }

    /// Owner farm id, or the free-text owner name
    async fn owner(&self) -> Option<String> {
        affiliation_label(&self.inner.owner)
    }

    /// Breeder farm id, or the free-text breeder name
    async fn breeder(&self) -> Option<String> {
        affiliation_label(&self.inner.breeder)
    }

    /// Title of the building space or field the animal is kept in
    async fn location(&self, ctx: &Context<'_>) -> FieldResult<Option<String>> {
        let context = ctx.data::<GraphQLContext>()?;
        let records = &context.services.records;
        let title = match self.inner.location {
            Some(Location::BuildingSpace(id)) => records
                .get::<domain::BuildingSpace>(id)
                .await?
                .map(|s| s.info.title),
            Some(Location::Field(id)) => records
                .get::<domain::Field>(id)
                .await?
                .map(|f| f.info.title),
            None => None,
        };
        Ok(title)
    }

    async fn url(&self, ctx: &Context<'_>) -> FieldResult<String> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(context.services.catalog.animal_url(&self.inner).await?)
    }

    async fn breed(&self, ctx: &Context<'_>) -> FieldResult<Breed> {
        let context = ctx.data::<GraphQLContext>()?;
        let breed: domain::Breed = context
            .services
            .records
            .fetch(self.inner.primary_breed_id)
            .await?;
        Ok(breed.into())
    }

    /// "Mixed <breed>" when secondary breeds are recorded
    async fn breed_label(&self, ctx: &Context<'_>) -> FieldResult<String> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(context.services.herd.breed_label(&self.inner).await?)
    }

    async fn is_mixed_breed(&self, ctx: &Context<'_>) -> FieldResult<bool> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(context.services.herd.is_mixed_breed(&self.inner).await?)
    }

    /// Primary breed percentage after secondary breeds are accounted for.
    /// Null when the recorded shares do not form a valid mix.
    async fn primary_breed_percentage(&self, ctx: &Context<'_>) -> FieldResult<Option<i32>> {
        let context = ctx.data::<GraphQLContext>()?;
        match context.services.herd.breed_mix(&self.inner).await {
            Ok(mix) => Ok(Some(i32::from(mix.primary.percentage))),
            Err(FarmError::Validation(reason)) => {
                warn!("Animal {} has an invalid breed mix: {}", self.inner.id, reason);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Age today, or at death
    async fn age(&self, ctx: &Context<'_>, full: Option<bool>) -> FieldResult<Option<String>> {
        let context = ctx.data::<GraphQLContext>()?;
        let today = Local::now().date_naive();
        Ok(context
            .services
            .herd
            .age(&self.inner, today, full.unwrap_or(false)))
    }

    async fn dam(&self, ctx: &Context<'_>) -> FieldResult<Option<Animal>> {
        parent(ctx, self.inner.dam_id).await
    }

    async fn sire(&self, ctx: &Context<'_>) -> FieldResult<Option<Animal>> {
        parent(ctx, self.inner.sire_id).await
    }

    async fn progeny(&self, ctx: &Context<'_>, scope: Option<Scope>) -> FieldResult<Vec<Animal>> {
        let context = ctx.data::<GraphQLContext>()?;
        let scope = scope.unwrap_or_default().into();
        let progeny = context.services.lineage.progeny(self.inner.id, scope).await?;
        Ok(progeny.into_iter().map(Animal::from).collect())
    }

    async fn sire_of(&self, ctx: &Context<'_>, scope: Option<Scope>) -> FieldResult<Vec<Animal>> {
        let context = ctx.data::<GraphQLContext>()?;
        let scope = scope.unwrap_or_default().into();
        let sired = context.services.lineage.sire_of(self.inner.id, scope).await?;
        Ok(sired.into_iter().map(Animal::from).collect())
    }

    async fn dam_of(&self, ctx: &Context<'_>, scope: Option<Scope>) -> FieldResult<Vec<Animal>> {
        let context = ctx.data::<GraphQLContext>()?;
        let scope = scope.unwrap_or_default().into();
        let dammed = context.services.lineage.dam_of(self.inner.id, scope).await?;
        Ok(dammed.into_iter().map(Animal::from).collect())
    }

    /// Progeny grouped by birth instant
    async fn litters(&self, ctx: &Context<'_>) -> FieldResult<Vec<Litter>> {
        let context = ctx.data::<GraphQLContext>()?;
        let litters = context.services.lineage.litters(self.inner.id).await?;
        Ok(litters
            .into_iter()
            .map(|(born_at, members)| Litter {
                born_at,
                animals: members.into_iter().map(Animal::from).collect(),
            })
            .collect())
    }

    /// Children by dam or sire slot, or null when there are none
    async fn child_table(
        &self,
        ctx: &Context<'_>,
        slot: Option<ChildSlot>,
    ) -> FieldResult<Option<Vec<Animal>>> {
        let context = ctx.data::<GraphQLContext>()?;
        let switch = slot.map(ChildTableSwitch::from).unwrap_or_default();
        let table = context
            .services
            .lineage
            .child_table(self.inner.id, switch)
            .await?;
        Ok(table.map(|children| children.into_iter().map(Animal::from).collect()))
    }

    async fn pedigree(&self, ctx: &Context<'_>, depth: Option<i32>) -> FieldResult<PedigreeNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let depth = depth
            .and_then(|d| usize::try_from(d).ok())
            .unwrap_or(DEFAULT_PEDIGREE_DEPTH);
        let tree = context.services.lineage.pedigree(self.inner.id, depth).await?;
        Ok(tree.into())
    }

    async fn registrations(&self, ctx: &Context<'_>) -> FieldResult<Vec<Registration>> {
        let context = ctx.data::<GraphQLContext>()?;
        let registrations = context.services.herd.registrations(self.inner.id).await?;
        Ok(registrations.into_iter().map(Registration::from).collect())
    }

    async fn milkings(&self, ctx: &Context<'_>) -> FieldResult<Vec<Milking>> {
        let context = ctx.data::<GraphQLContext>()?;
        let milkings = context.services.herd.milkings(self.inner.id).await?;
        Ok(milkings.into_iter().map(Milking::from).collect())
    }

    async fn daily_milk_totals(
        &self,
        ctx: &Context<'_>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> FieldResult<Vec<DailyMilk>> {
        let context = ctx.data::<GraphQLContext>()?;
        let totals = context
            .services
            .herd
            .daily_milk_totals(self.inner.id, from, to)
            .await?;
        Ok(totals.into_iter().map(DailyMilk::from).collect())
    }

    async fn notes(&self, ctx: &Context<'_>) -> FieldResult<Vec<Note>> {
        let context = ctx.data::<GraphQLContext>()?;
        let notes = context
            .services
            .annotations
            .notes_for(EntityRef::Animal(self.inner.id))
            .await?;
        Ok(notes.into_iter().map(Note::from).collect())
    }

    async fn attributes(&self, ctx: &Context<'_>) -> FieldResult<Vec<AttributeValue>> {
        let context = ctx.data::<GraphQLContext>()?;
        let attributes = context
            .services
            .annotations
            .attributes_for(EntityRef::Animal(self.inner.id))
            .await?;
        Ok(attributes.into_iter().map(AttributeValue::from).collect())
    }
}

async fn parent(ctx: &Context<'_>, id: Option<uuid::Uuid>) -> FieldResult<Option<Animal>> {
    let Some(id) = id else {
        return Ok(None);
    };
    let context = ctx.data::<GraphQLContext>()?;
    let parent: Option<domain::Animal> = context.services.records.get(id).await?;
    Ok(parent.map(Animal::from))
}

/// Progeny born within a day of one another
#[derive(SimpleObject)]
pub struct Litter {
    pub born_at: NaiveDateTime,
    pub animals: Vec<Animal>,
}

/// One node of an ancestor tree
pub struct PedigreeNode {
    inner: Pedigree,
}

impl From<Pedigree> for PedigreeNode {
    fn from(pedigree: Pedigree) -> Self {
        Self { inner: pedigree }
    }
}

#[Object]
impl PedigreeNode {
    async fn animal_id(&self) -> ID {
        to_id(self.inner.animal_id)
    }

    async fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    async fn dam(&self) -> Option<PedigreeNode> {
        self.inner.dam.as_deref().cloned().map(PedigreeNode::from)
    }

    async fn sire(&self) -> Option<PedigreeNode> {
        self.inner.sire.as_deref().cloned().map(PedigreeNode::from)
    }
}

pub struct Registration {
    inner: AnimalRegistration,
}

impl From<AnimalRegistration> for Registration {
    fn from(registration: AnimalRegistration) -> Self {
        Self {
            inner: registration,
        }
    }
}

#[Object]
impl Registration {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn reg_id(&self) -> Option<&str> {
        self.inner.reg_id.as_deref()
    }

    async fn date(&self) -> Option<NaiveDate> {
        self.inner.date
    }

    /// Title of the registry
    async fn body(&self, ctx: &Context<'_>) -> FieldResult<String> {
        let context = ctx.data::<GraphQLContext>()?;
        let body: domain::RegistrationBody =
            context.services.records.fetch(self.inner.body_id).await?;
        Ok(body.info.title)
    }
}

#[derive(SimpleObject)]
pub struct Milking {
    pub id: ID,
    pub milked_at: NaiveDateTime,
    /// Decimal quantity as text
    pub quantity: String,
    pub unit: MilkUnitValue,
}

impl From<domain::Milking> for Milking {
    fn from(milking: domain::Milking) -> Self {
        Self {
            id: to_id(milking.id),
            milked_at: milking.milked_at,
            quantity: milking.quantity.to_string(),
            unit: milking.unit.into(),
        }
    }
}

#[derive(SimpleObject)]
pub struct DailyMilk {
    pub date: NaiveDate,
    pub unit: MilkUnitValue,
    pub total: String,
}

impl From<DailyMilkTotal> for DailyMilk {
    fn from(total: DailyMilkTotal) -> Self {
        Self {
            date: total.date,
            unit: total.unit.into(),
            total: total.total.to_string(),
        }
    }
}
