use crate::app::NewAnimal;
use crate::domain::{AttributeOption, FarmAffiliation};
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{
    parse_id, to_id, Animal, AttributeTargetValue, AttributeValue, LocationInput, Milking,
    MilkUnitValue, Note, Registration, SexValue, SubjectInput,
};
use async_graphql::{Context, FieldResult, InputObject, Object, ID};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Input for entering a new animal. A farm id wins over a free-text name
/// for owner and breeder.
#[derive(InputObject)]
pub struct NewAnimalInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub sex: Option<SexValue>,
    pub birthday: Option<NaiveDate>,
    pub birthtime: Option<NaiveTime>,
    pub primary_breed_id: ID,
    pub dam_id: Option<ID>,
    pub sire_id: Option<ID>,
    pub owner_farm_id: Option<ID>,
    pub owner_name: Option<String>,
    pub breeder_farm_id: Option<ID>,
    pub breeder_name: Option<String>,
    pub location: Option<LocationInput>,
}

fn affiliation(farm_id: Option<ID>, name: Option<String>) -> FieldResult<Option<FarmAffiliation>> {
    if let Some(id) = farm_id {
        return Ok(Some(FarmAffiliation::Farm(parse_id(&id)?)));
    }
    Ok(name.map(FarmAffiliation::Named))
}

impl NewAnimalInput {
    fn into_new_animal(self) -> FieldResult<NewAnimal> {
        Ok(NewAnimal {
            name: self.name,
            slug: self.slug,
            description: self.description,
            sex: self.sex.map(Into::into).unwrap_or_default(),
            birthday: self.birthday,
            birthtime: self.birthtime,
            primary_breed_id: parse_id(&self.primary_breed_id)?,
            dam_id: self.dam_id.as_ref().map(parse_id).transpose()?,
            sire_id: self.sire_id.as_ref().map(parse_id).transpose()?,
            owner: affiliation(self.owner_farm_id, self.owner_name)?,
            breeder: affiliation(self.breeder_farm_id, self.breeder_name)?,
            location: self.location.as_ref().map(LocationInput::to_location).transpose()?,
        })
    }
}

/// Root mutation object for record entry and annotations
pub struct Mutation;

#[Object]
impl Mutation {
    async fn register_animal(
        &self,
        ctx: &Context<'_>,
        input: NewAnimalInput,
    ) -> FieldResult<Animal> {
        let context = ctx.data::<GraphQLContext>()?;
        let animal = context
            .services
            .herd
            .register_animal(input.into_new_animal()?)
            .await?;
        Ok(animal.into())
    }

    async fn rename_animal(&self, ctx: &Context<'_>, id: ID, name: String) -> FieldResult<Animal> {
        let context = ctx.data::<GraphQLContext>()?;
        let animal = context.services.herd.rename(parse_id(&id)?, &name).await?;
        Ok(animal.into())
    }

    async fn move_animal(
        &self,
        ctx: &Context<'_>,
        id: ID,
        location: LocationInput,
    ) -> FieldResult<Animal> {
        let context = ctx.data::<GraphQLContext>()?;
        let animal = context
            .services
            .herd
            .move_to(parse_id(&id)?, location.to_location()?)
            .await?;
        Ok(animal.into())
    }

    async fn record_death(
        &self,
        ctx: &Context<'_>,
        id: ID,
        deathday: NaiveDate,
    ) -> FieldResult<Animal> {
        let context = ctx.data::<GraphQLContext>()?;
        let animal = context
            .services
            .herd
            .record_death(parse_id(&id)?, deathday)
            .await?;
        Ok(animal.into())
    }

    /// Returns the id of the new secondary breed record
    async fn add_secondary_breed(
        &self,
        ctx: &Context<'_>,
        animal_id: ID,
        breed_id: ID,
        percentage: i32,
    ) -> FieldResult<ID> {
        let context = ctx.data::<GraphQLContext>()?;
        let percentage = u8::try_from(percentage)
            .map_err(|_| format!("percentage {percentage} is out of range"))?;
        let secondary = context
            .services
            .herd
            .add_secondary_breed(parse_id(&animal_id)?, parse_id(&breed_id)?, percentage)
            .await?;
        Ok(to_id(secondary.id))
    }

    async fn register_with_body(
        &self,
        ctx: &Context<'_>,
        animal_id: ID,
        body_id: ID,
        reg_id: Option<String>,
        date: Option<NaiveDate>,
    ) -> FieldResult<Registration> {
        let context = ctx.data::<GraphQLContext>()?;
        let registration = context
            .services
            .herd
            .register_with_body(parse_id(&animal_id)?, parse_id(&body_id)?, reg_id, date)
            .await?;
        Ok(registration.into())
    }

    /// `quantity` is a decimal string such as "3.5"
    async fn record_milking(
        &self,
        ctx: &Context<'_>,
        animal_id: ID,
        milked_at: NaiveDateTime,
        quantity: String,
        unit: Option<MilkUnitValue>,
    ) -> FieldResult<Milking> {
        let context = ctx.data::<GraphQLContext>()?;
        let quantity = Decimal::from_str(&quantity)?;
        let unit = unit.map(Into::into).unwrap_or_default();
        let milking = context
            .services
            .herd
            .record_milking(parse_id(&animal_id)?, milked_at, quantity, unit)
            .await?;
        Ok(milking.into())
    }

    async fn add_note(
        &self,
        ctx: &Context<'_>,
        subject: SubjectInput,
        body: String,
        author: Option<String>,
    ) -> FieldResult<Note> {
        let context = ctx.data::<GraphQLContext>()?;
        let note = context
            .services
            .annotations
            .add_note(subject.to_entity_ref()?, &body, author)
            .await?;
        Ok(note.into())
    }

    /// Returns the id of the new option
    async fn add_attribute_option(
        &self,
        ctx: &Context<'_>,
        target: AttributeTargetValue,
        name: String,
        description: Option<String>,
    ) -> FieldResult<ID> {
        let context = ctx.data::<GraphQLContext>()?;
        let mut option = AttributeOption::new(target.into(), name);
        option.description = description;
        let option = context.services.annotations.add_option(option).await?;
        Ok(to_id(option.id))
    }

    async fn add_attribute(
        &self,
        ctx: &Context<'_>,
        option_id: ID,
        subject: SubjectInput,
        value: String,
    ) -> FieldResult<AttributeValue> {
        let context = ctx.data::<GraphQLContext>()?;
        let option_id = parse_id(&option_id)?;
        let attribute = context
            .services
            .annotations
            .add_attribute(option_id, subject.to_entity_ref()?, &value)
            .await?;
        let option: AttributeOption = context.services.records.fetch(option_id).await?;
        Ok((option, attribute).into())
    }
}
