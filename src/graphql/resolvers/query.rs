use crate::app::GenusFilter;
use crate::constants::DEFAULT_PEDIGREE_DEPTH;
use crate::domain;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{
    parse_id, to_id, Animal, Breed, Building, Farm, Field, FieldType, Genus, PedigreeNode,
    Product, ProductType, Scope,
};
use async_graphql::{Context, FieldResult, Object, ID};

/// Root query object for GraphQL
pub struct Query;

#[Object]
impl Query {
    async fn farms(&self, ctx: &Context<'_>) -> FieldResult<Vec<Farm>> {
        let context = ctx.data::<GraphQLContext>()?;
        let farms = context.services.catalog.farms().await?;
        Ok(farms.into_iter().map(Farm::from).collect())
    }

    /// Genera, optionally only those with animals on the farm
    async fn genera(
        &self,
        ctx: &Context<'_>,
        on_farm: Option<bool>,
        exclude: Option<ID>,
    ) -> FieldResult<Vec<Genus>> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter = if on_farm.unwrap_or(false) {
            GenusFilter::OnTheFarm {
                exclude: exclude.as_ref().map(parse_id).transpose()?,
            }
        } else {
            GenusFilter::All
        };
        let genera = context.services.catalog.genera(filter).await?;
        Ok(genera.into_iter().map(Genus::from).collect())
    }

    async fn genus(&self, ctx: &Context<'_>, slug: String) -> FieldResult<Genus> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(context.services.catalog.genus_by_slug(&slug).await?.into())
    }

    /// All breeds, alphabetically
    async fn breeds(&self, ctx: &Context<'_>) -> FieldResult<Vec<Breed>> {
        let context = ctx.data::<GraphQLContext>()?;
        let breeds = context.services.catalog.breeds().await?;
        Ok(breeds.into_iter().map(Breed::from).collect())
    }

    async fn breed(&self, ctx: &Context<'_>, genus: String, slug: String) -> FieldResult<Breed> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(context.services.catalog.breed_by_path(&genus, &slug).await?.into())
    }

    async fn animals(&self, ctx: &Context<'_>, scope: Option<Scope>) -> FieldResult<Vec<Animal>> {
        let context = ctx.data::<GraphQLContext>()?;
        let animals = context
            .services
            .catalog
            .animals(scope.unwrap_or_default().into())
            .await?;
        Ok(animals.into_iter().map(Animal::from).collect())
    }

    /// Named animals on the farm
    async fn named_animals(&self, ctx: &Context<'_>) -> FieldResult<Vec<Animal>> {
        let context = ctx.data::<GraphQLContext>()?;
        let animals = context.services.catalog.named_animals().await?;
        Ok(animals.into_iter().map(Animal::from).collect())
    }

    /// Get an animal by ID
    async fn animal(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Animal>> {
        let context = ctx.data::<GraphQLContext>()?;
        let animal: Option<domain::Animal> = context.services.records.get(parse_id(&id)?).await?;
        Ok(animal.map(Animal::from))
    }

    /// Resolve an animal the way its detail URL does
    async fn animal_by_path(
        &self,
        ctx: &Context<'_>,
        genus: String,
        breed: String,
        key: String,
    ) -> FieldResult<Animal> {
        let context = ctx.data::<GraphQLContext>()?;
        let animal = context
            .services
            .catalog
            .animal_by_path(&genus, &breed, &key)
            .await?;
        Ok(animal.into())
    }

    async fn pedigree(
        &self,
        ctx: &Context<'_>,
        id: ID,
        depth: Option<i32>,
    ) -> FieldResult<PedigreeNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let depth = depth
            .and_then(|d| usize::try_from(d).ok())
            .unwrap_or(DEFAULT_PEDIGREE_DEPTH);
        let tree = context
            .services
            .lineage
            .pedigree(parse_id(&id)?, depth)
            .await?;
        Ok(tree.into())
    }

    /// Animals recorded as their own ancestors
    async fn parentage_cycles(&self, ctx: &Context<'_>) -> FieldResult<Vec<Vec<ID>>> {
        let context = ctx.data::<GraphQLContext>()?;
        let cycles = context.services.lineage.parentage_cycles().await?;
        Ok(cycles
            .into_iter()
            .map(|cycle| cycle.into_iter().map(to_id).collect())
            .collect())
    }

    async fn product_types(&self, ctx: &Context<'_>) -> FieldResult<Vec<ProductType>> {
        let context = ctx.data::<GraphQLContext>()?;
        let types = context.services.catalog.product_types().await?;
        Ok(types.into_iter().map(ProductType::from).collect())
    }

    async fn products(&self, ctx: &Context<'_>) -> FieldResult<Vec<Product>> {
        let context = ctx.data::<GraphQLContext>()?;
        let products = context.services.catalog.products().await?;
        Ok(products.into_iter().map(Product::from).collect())
    }

    async fn product(
        &self,
        ctx: &Context<'_>,
        product_type: String,
        slug: String,
    ) -> FieldResult<Product> {
        let context = ctx.data::<GraphQLContext>()?;
        let product = context
            .services
            .catalog
            .product_by_path(&product_type, &slug)
            .await?;
        Ok(product.into())
    }

    async fn buildings(&self, ctx: &Context<'_>) -> FieldResult<Vec<Building>> {
        let context = ctx.data::<GraphQLContext>()?;
        let buildings = context.services.catalog.buildings().await?;
        Ok(buildings.into_iter().map(Building::from).collect())
    }

    async fn building(&self, ctx: &Context<'_>, slug: String) -> FieldResult<Building> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(context.services.catalog.building_by_slug(&slug).await?.into())
    }

    async fn fields(&self, ctx: &Context<'_>) -> FieldResult<Vec<Field>> {
        let context = ctx.data::<GraphQLContext>()?;
        let fields = context.services.catalog.fields().await?;
        Ok(fields.into_iter().map(Field::from).collect())
    }

    async fn field_types(&self, ctx: &Context<'_>) -> FieldResult<Vec<FieldType>> {
        let context = ctx.data::<GraphQLContext>()?;
        let types = context.services.catalog.field_types().await?;
        Ok(types.into_iter().map(FieldType::from).collect())
    }

    async fn field(&self, ctx: &Context<'_>, slug: String) -> FieldResult<Field> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(context.services.catalog.field_by_slug(&slug).await?.into())
    }
}
