use super::{to_id, AttributeValue, Note};
use crate::domain::{self, EntityRef};
use crate::graphql::schema::GraphQLContext;
use crate::urls;
use async_graphql::{Context, FieldResult, Object, ID};

#[derive(Clone)]
pub struct ProductType {
    pub inner: domain::ProductType,
}

impl From<domain::ProductType> for ProductType {
    fn from(product_type: domain::ProductType) -> Self {
        Self {
            inner: product_type,
        }
    }
}

#[Object]
impl ProductType {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn title(&self) -> &str {
        &self.inner.info.title
    }

    async fn slug(&self) -> &str {
        &self.inner.info.slug
    }

    async fn url(&self) -> String {
        urls::product_type_url(&self.inner)
    }

    async fn products(&self, ctx: &Context<'_>) -> FieldResult<Vec<Product>> {
        let context = ctx.data::<GraphQLContext>()?;
        let products = context.services.catalog.products_of_type(self.inner.id).await?;
        Ok(products.into_iter().map(Product::from).collect())
    }
}

/// GraphQL representation of a Product
#[derive(Clone)]
pub struct Product {
    pub inner: domain::Product,
}

impl From<domain::Product> for Product {
    fn from(product: domain::Product) -> Self {
        Self { inner: product }
    }
}

#[Object]
impl Product {
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

    /// Decimal price as text
    async fn price(&self) -> Option<String> {
        self.inner.price.map(|p| p.to_string())
    }

    async fn unit(&self) -> Option<&str> {
        self.inner.unit.as_deref()
    }

    /// Price as shown in listings
    async fn price_label(&self) -> Option<String> {
        self.inner.price_label()
    }

    async fn product_type(&self, ctx: &Context<'_>) -> FieldResult<ProductType> {
        let context = ctx.data::<GraphQLContext>()?;
        let product_type: domain::ProductType =
            context.services.records.fetch(self.inner.type_id).await?;
        Ok(product_type.into())
    }

    async fn url(&self, ctx: &Context<'_>) -> FieldResult<String> {
        let context = ctx.data::<GraphQLContext>()?;
        let product_type: domain::ProductType =
            context.services.records.fetch(self.inner.type_id).await?;
        Ok(urls::product_url(&self.inner, &product_type))
    }

    async fn notes(&self, ctx: &Context<'_>) -> FieldResult<Vec<Note>> {
        let context = ctx.data::<GraphQLContext>()?;
        let notes = context
            .services
            .annotations
            .notes_for(EntityRef::Product(self.inner.id))
            .await?;
        Ok(notes.into_iter().map(Note::from).collect())
    }

    async fn attributes(&self, ctx: &Context<'_>) -> FieldResult<Vec<AttributeValue>> {
        let context = ctx.data::<GraphQLContext>()?;
        let attributes = context
            .services
            .annotations
            .attributes_for(EntityRef::Product(self.inner.id))
            .await?;
        Ok(attributes.into_iter().map(AttributeValue::from).collect())
    }
}
