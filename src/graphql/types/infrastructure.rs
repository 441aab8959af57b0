use super::{to_id, AttributeValue, Note};
use crate::domain::{self, EntityRef};
use crate::graphql::schema::GraphQLContext;
use crate::urls;
use async_graphql::{Context, FieldResult, Object, SimpleObject, ID};

#[derive(Clone)]
pub struct Building {
    pub inner: domain::Building,
}

impl From<domain::Building> for Building {
    fn from(building: domain::Building) -> Self {
        Self { inner: building }
    }
}

#[Object]
impl Building {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn title(&self) -> &str {
        &self.inner.info.title
    }

    async fn slug(&self) -> &str {
        &self.inner.info.slug
    }

    async fn description(&self) -> Option<&str> {
        self.inner.info.description.as_deref()
    }

    async fn url(&self) -> String {
        urls::building_url(&self.inner)
    }

    /// Stalls, pens and rooms in the building
    async fn spaces(&self, ctx: &Context<'_>) -> FieldResult<Vec<BuildingSpace>> {
        let context = ctx.data::<GraphQLContext>()?;
        let spaces = context.services.catalog.spaces_in(self.inner.id).await?;
        Ok(spaces.into_iter().map(BuildingSpace::from).collect())
    }

    async fn notes(&self, ctx: &Context<'_>) -> FieldResult<Vec<Note>> {
        let context = ctx.data::<GraphQLContext>()?;
        let notes = context
            .services
            .annotations
            .notes_for(EntityRef::Building(self.inner.id))
            .await?;
        Ok(notes.into_iter().map(Note::from).collect())
    }

    async fn attributes(&self, ctx: &Context<'_>) -> FieldResult<Vec<AttributeValue>> {
        let context = ctx.data::<GraphQLContext>()?;
        let attributes = context
            .services
            .annotations
            .attributes_for(EntityRef::Building(self.inner.id))
            .await?;
        Ok(attributes.into_iter().map(AttributeValue::from).collect())
    }
}

#[derive(SimpleObject)]
pub struct BuildingSpace {
    pub id: ID,
    pub title: String,
    pub slug: String,
}

impl From<domain::BuildingSpace> for BuildingSpace {
    fn from(space: domain::BuildingSpace) -> Self {
        Self {
            id: to_id(space.id),
            title: space.info.title,
            slug: space.info.slug,
        }
    }
}

#[derive(SimpleObject)]
pub struct FieldType {
    pub id: ID,
    pub title: String,
    pub slug: String,
}

impl From<domain::FieldType> for FieldType {
    fn from(field_type: domain::FieldType) -> Self {
        Self {
            id: to_id(field_type.id),
            title: field_type.info.title,
            slug: field_type.info.slug,
        }
    }
}

#[derive(Clone)]
pub struct Field {
    pub inner: domain::Field,
}

impl From<domain::Field> for Field {
    fn from(field: domain::Field) -> Self {
        Self { inner: field }
    }
}

#[Object]
impl Field {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn title(&self) -> &str {
        &self.inner.info.title
    }

    async fn slug(&self) -> &str {
        &self.inner.info.slug
    }

    async fn description(&self) -> Option<&str> {
        self.inner.info.description.as_deref()
    }

    /// Decimal acreage as text
    async fn acreage(&self) -> Option<String> {
        self.inner.acreage.map(|a| a.to_string())
    }

    async fn field_type(&self, ctx: &Context<'_>) -> FieldResult<Option<String>> {
        let Some(type_id) = self.inner.field_type_id else {
            return Ok(None);
        };
        let context = ctx.data::<GraphQLContext>()?;
        let field_type: Option<domain::FieldType> = context.services.records.get(type_id).await?;
        Ok(field_type.map(|t| t.info.title))
    }

    async fn url(&self) -> String {
        urls::field_url(&self.inner)
    }

    async fn notes(&self, ctx: &Context<'_>) -> FieldResult<Vec<Note>> {
        let context = ctx.data::<GraphQLContext>()?;
        let notes = context
            .services
            .annotations
            .notes_for(EntityRef::Field(self.inner.id))
            .await?;
        Ok(notes.into_iter().map(Note::from).collect())
    }

    async fn attributes(&self, ctx: &Context<'_>) -> FieldResult<Vec<AttributeValue>> {
        let context = ctx.data::<GraphQLContext>()?;
        let attributes = context
            .services
            .annotations
            .attributes_for(EntityRef::Field(self.inner.id))
            .await?;
        Ok(attributes.into_iter().map(AttributeValue::from).collect())
    }
}
