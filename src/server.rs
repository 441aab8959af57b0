use crate::app::FarmServices;
use crate::config::ServerConfig;
use crate::domain::{self, EntityRef, LineageScope};
use crate::error::{FarmError, Result};
use crate::graphql::{create_schema, GraphQLSchema};
use crate::urls;
use anyhow::Context as _;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use hyper::Server;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

/// Shared state for the REST handlers
#[derive(Clone)]
pub struct AppState {
    pub services: FarmServices,
}

impl IntoResponse for FarmError {
    fn into_response(self) -> Response {
        let status = match &self {
            FarmError::NotFound { .. } => StatusCode::NOT_FOUND,
            FarmError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ScopeParam {
    #[default]
    Farm,
    All,
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    #[serde(default)]
    scope: ScopeParam,
}

impl ListParams {
    fn lineage_scope(&self) -> LineageScope {
        match self.scope {
            ScopeParam::Farm => LineageScope::OnTheFarm,
            ScopeParam::All => LineageScope::Historical,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Link {
    pub title: String,
    pub slug: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AnimalSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub sex: &'static str,
    pub birthday: Option<NaiveDate>,
    pub deathday: Option<NaiveDate>,
    pub breed: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct LitterView {
    pub born_at: NaiveDateTime,
    pub animals: Vec<AnimalSummary>,
}

#[derive(Debug, Serialize)]
pub struct AttributeView {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct AnimalDetail {
    pub animal: domain::Animal,
    pub breed: String,
    pub url: String,
    pub age: Option<String>,
    pub dam: Option<AnimalSummary>,
    pub sire: Option<AnimalSummary>,
    pub progeny: Vec<AnimalSummary>,
    pub litters: Vec<LitterView>,
    pub notes: Vec<domain::Note>,
    pub attributes: Vec<AttributeView>,
}

#[derive(Debug, Serialize)]
pub struct GenusDetail {
    pub genus: domain::Genus,
    pub female_term: Option<&'static str>,
    pub breeds: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct BreedDetail {
    pub breed: domain::Breed,
    pub url: String,
    pub animals: Vec<AnimalSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub title: String,
    pub slug: String,
    pub price: Option<String>,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ProductTypeDetail {
    pub product_type: domain::ProductType,
    pub products: Vec<ProductSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub product: domain::Product,
    pub price: Option<String>,
    pub url: String,
    pub notes: Vec<domain::Note>,
    pub attributes: Vec<AttributeView>,
}

#[derive(Debug, Serialize)]
pub struct BuildingDetail {
    pub building: domain::Building,
    pub spaces: Vec<domain::BuildingSpace>,
    pub notes: Vec<domain::Note>,
    pub attributes: Vec<AttributeView>,
}

#[derive(Debug, Serialize)]
pub struct FieldDetail {
    pub field: domain::Field,
    pub notes: Vec<domain::Note>,
    pub attributes: Vec<AttributeView>,
}

async fn summarize(services: &FarmServices, animal: &domain::Animal) -> Result<AnimalSummary> {
    Ok(AnimalSummary {
        id: animal.id,
        name: animal.name.clone(),
        sex: animal.sex.code(),
        birthday: animal.birthday,
        deathday: animal.deathday,
        breed: services.herd.breed_label(animal).await?,
        url: services.catalog.animal_url(animal).await?,
    })
}

async fn summarize_all(
    services: &FarmServices,
    animals: &[domain::Animal],
) -> Result<Vec<AnimalSummary>> {
    let mut summaries = Vec::with_capacity(animals.len());
    for animal in animals {
        summaries.push(summarize(services, animal).await?);
    }
    Ok(summaries)
}

async fn attribute_views(
    services: &FarmServices,
    subject: EntityRef,
) -> Result<Vec<AttributeView>> {
    Ok(services
        .annotations
        .attributes_for(subject)
        .await?
        .into_iter()
        .map(|(option, attribute)| AttributeView {
            name: option.name,
            value: attribute.value,
        })
        .collect())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "farmstead",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn list_animals(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<AnimalSummary>>> {
    let animals = state.services.catalog.animals(params.lineage_scope()).await?;
    Ok(Json(summarize_all(&state.services, &animals).await?))
}

async fn genus_detail(
    State(state): State<AppState>,
    Path(genus): Path<String>,
) -> Result<Json<GenusDetail>> {
    let catalog = &state.services.catalog;
    let genus = catalog.genus_by_slug(&genus).await?;
    let breeds = catalog
        .breeds_in_genus(genus.id)
        .await?
        .iter()
        .map(|b| Link {
            title: b.title().to_string(),
            slug: b.info.slug.clone(),
            url: urls::breed_url(b, &genus),
        })
        .collect();
    Ok(Json(GenusDetail {
        female_term: crate::constants::female_term(&genus.info.slug),
        genus,
        breeds,
    }))
}

async fn breed_detail(
    State(state): State<AppState>,
    Path((genus_slug, breed_slug)): Path<(String, String)>,
    Query(params): Query<ListParams>,
) -> Result<Json<BreedDetail>> {
    let catalog = &state.services.catalog;
    let breed = catalog.breed_by_path(&genus_slug, &breed_slug).await?;
    let genus = catalog.genus_by_slug(&genus_slug).await?;
    let animals = catalog
        .animals_of_breed(breed.id, params.lineage_scope())
        .await?;
    Ok(Json(BreedDetail {
        url: urls::breed_url(&breed, &genus),
        animals: summarize_all(&state.services, &animals).await?,
        breed,
    }))
}

async fn animal_detail(
    State(state): State<AppState>,
    Path((genus, breed, key)): Path<(String, String, String)>,
) -> Result<Json<AnimalDetail>> {
    let services = &state.services;
    let animal = services.catalog.animal_by_path(&genus, &breed, &key).await?;

    let mut dam = None;
    if let Some(id) = animal.dam_id {
        if let Some(parent) = services.records.get::<domain::Animal>(id).await? {
            dam = Some(summarize(services, &parent).await?);
        }
    }
    let mut sire = None;
    if let Some(id) = animal.sire_id {
        if let Some(parent) = services.records.get::<domain::Animal>(id).await? {
            sire = Some(summarize(services, &parent).await?);
        }
    }

    let progeny = services
        .lineage
        .progeny(animal.id, LineageScope::Historical)
        .await?;
    let mut litters = Vec::new();
    for (born_at, members) in services.lineage.litters(animal.id).await? {
        litters.push(LitterView {
            born_at,
            animals: summarize_all(services, &members).await?,
        });
    }

    let subject = EntityRef::Animal(animal.id);
    Ok(Json(AnimalDetail {
        breed: services.herd.breed_label(&animal).await?,
        url: services.catalog.animal_url(&animal).await?,
        age: services.herd.age(&animal, Local::now().date_naive(), true),
        dam,
        sire,
        progeny: summarize_all(services, &progeny).await?,
        litters,
        notes: services.annotations.notes_for(subject).await?,
        attributes: attribute_views(services, subject).await?,
        animal,
    }))
}

async fn summarize_products(
    services: &FarmServices,
    products: Vec<domain::Product>,
) -> Result<Vec<ProductSummary>> {
    let mut summaries = Vec::with_capacity(products.len());
    for product in products {
        let product_type: domain::ProductType = services.records.fetch(product.type_id).await?;
        summaries.push(ProductSummary {
            url: urls::product_url(&product, &product_type),
            price: product.price_label(),
            title: product.info.title,
            slug: product.info.slug,
        });
    }
    Ok(summaries)
}

async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductSummary>>> {
    let products = state.services.catalog.products().await?;
    Ok(Json(summarize_products(&state.services, products).await?))
}

async fn product_type_detail(
    State(state): State<AppState>,
    Path(type_slug): Path<String>,
) -> Result<Json<ProductTypeDetail>> {
    let catalog = &state.services.catalog;
    let product_type = catalog.product_type_by_slug(&type_slug).await?;
    let products = catalog.products_of_type(product_type.id).await?;
    Ok(Json(ProductTypeDetail {
        product_type,
        products: summarize_products(&state.services, products).await?,
    }))
}

async fn product_detail(
    State(state): State<AppState>,
    Path((type_slug, slug)): Path<(String, String)>,
) -> Result<Json<ProductDetail>> {
    let services = &state.services;
    let product_type = services.catalog.product_type_by_slug(&type_slug).await?;
    let product = services.catalog.product_by_path(&type_slug, &slug).await?;
    let subject = EntityRef::Product(product.id);
    Ok(Json(ProductDetail {
        price: product.price_label(),
        url: urls::product_url(&product, &product_type),
        notes: services.annotations.notes_for(subject).await?,
        attributes: attribute_views(services, subject).await?,
        product,
    }))
}

async fn list_buildings(State(state): State<AppState>) -> Result<Json<Vec<Link>>> {
    let buildings = state.services.catalog.buildings().await?;
    Ok(Json(
        buildings
            .into_iter()
            .map(|b| Link {
                url: urls::building_url(&b),
                title: b.info.title,
                slug: b.info.slug,
            })
            .collect(),
    ))
}

async fn building_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BuildingDetail>> {
    let services = &state.services;
    let building = services.catalog.building_by_slug(&slug).await?;
    let subject = EntityRef::Building(building.id);
    Ok(Json(BuildingDetail {
        spaces: services.catalog.spaces_in(building.id).await?,
        notes: services.annotations.notes_for(subject).await?,
        attributes: attribute_views(services, subject).await?,
        building,
    }))
}

async fn list_fields(State(state): State<AppState>) -> Result<Json<Vec<Link>>> {
    let fields = state.services.catalog.fields().await?;
    Ok(Json(
        fields
            .into_iter()
            .map(|f| Link {
                url: urls::field_url(&f),
                title: f.info.title,
                slug: f.info.slug,
            })
            .collect(),
    ))
}

async fn field_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<FieldDetail>> {
    let services = &state.services;
    let field = services.catalog.field_by_slug(&slug).await?;
    let subject = EntityRef::Field(field.id);
    Ok(Json(FieldDetail {
        notes: services.annotations.notes_for(subject).await?,
        attributes: attribute_views(services, subject).await?,
        field,
    }))
}

/// GraphQL handler (supports GET and POST)
async fn graphql_handler(
    Extension(schema): Extension<GraphQLSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Create the HTTP router with the REST surface and GraphQL
pub fn create_router(services: FarmServices) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let schema = create_schema(services.clone());
    let state = AppState { services };

    Router::new()
        .route("/health", get(health))
        .route("/animals", get(list_animals))
        .route("/animals/:genus", get(genus_detail))
        .route("/animals/:genus/:breed", get(breed_detail))
        .route("/animals/:genus/:breed/:slug", get(animal_detail))
        .route("/products", get(list_products))
        .route("/products/:type", get(product_type_detail))
        .route("/products/:type/:slug", get(product_detail))
        .route("/buildings", get(list_buildings))
        .route("/buildings/:slug", get(building_detail))
        .route("/fields", get(list_fields))
        .route("/fields/:slug", get(field_detail))
        .route("/graphql", get(graphql_handler).post(graphql_handler))
        .route("/graphiql", get(graphiql))
        .layer(Extension(schema))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Start the HTTP server on the configured address
pub async fn start_server(config: &ServerConfig, services: FarmServices) -> anyhow::Result<()> {
    let app = create_router(services);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    info!("HTTP server running on http://{}", addr);
    info!("GraphQL: http://{}/graphql, GraphiQL UI: http://{}/graphiql", addr, addr);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .context("HTTP server failed")?;
    Ok(())
}
