use super::{to_id, Animal, Scope};
use crate::constants::female_term;
use crate::domain;
use crate::graphql::schema::GraphQLContext;
use crate::urls;
use async_graphql::{Context, FieldResult, Object, ID};

/// GraphQL representation of a Genus
#[derive(Clone)]
pub struct Genus {
    pub inner: domain::Genus,
}

impl From<domain::Genus> for Genus {
    fn from(genus: domain::Genus) -> Self {
        Self { inner: genus }
    }
}

#[Object]
impl Genus {
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

    /// Word for a female of this genus ("doe", "ewe"...), when known
    async fn female_term(&self) -> Option<&'static str> {
        female_term(&self.inner.info.slug)
    }

    async fn url(&self) -> String {
        urls::genus_url(&self.inner)
    }

    async fn breeds(&self, ctx: &Context<'_>) -> FieldResult<Vec<Breed>> {
        let context = ctx.data::<GraphQLContext>()?;
        let breeds = context.services.catalog.breeds_in_genus(self.inner.id).await?;
        Ok(breeds.into_iter().map(Breed::from).collect())
    }
}

/// GraphQL representation of a Breed
#[derive(Clone)]
pub struct Breed {
    pub inner: domain::Breed,
}

impl From<domain::Breed> for Breed {
    fn from(breed: domain::Breed) -> Self {
        Self { inner: breed }
    }
}

#[Object]
impl Breed {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn title(&self) -> &str {
        self.inner.title()
    }

    async fn slug(&self) -> &str {
        &self.inner.info.slug
    }

    async fn description(&self) -> Option<&str> {
        self.inner.info.description.as_deref()
    }

    async fn genus(&self, ctx: &Context<'_>) -> FieldResult<Genus> {
        let context = ctx.data::<GraphQLContext>()?;
        let genus: domain::Genus = context.services.records.fetch(self.inner.genus_id).await?;
        Ok(genus.into())
    }

    async fn url(&self, ctx: &Context<'_>) -> FieldResult<String> {
        let context = ctx.data::<GraphQLContext>()?;
        let genus: domain::Genus = context.services.records.fetch(self.inner.genus_id).await?;
        Ok(urls::breed_url(&self.inner, &genus))
    }

    /// Animals whose primary breed this is
    async fn animals(&self, ctx: &Context<'_>, scope: Option<Scope>) -> FieldResult<Vec<Animal>> {
        let context = ctx.data::<GraphQLContext>()?;
        let animals = context
            .services
            .catalog
            .animals_of_breed(self.inner.id, scope.unwrap_or_default().into())
            .await?;
        Ok(animals.into_iter().map(Animal::from).collect())
    }
}
