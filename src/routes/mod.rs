pub mod archives;
pub mod brands;
pub mod entities;
pub mod health;
pub mod instrument_models;
pub mod networks;
pub mod sensors;
pub mod sites;
pub mod station_models;
pub mod stations;

mod auth;
mod rate_limit;

use axum::{middleware, routing::get, Router};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use uuid::Uuid;

use rate_limit::FallbackIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::entity;
use crate::error::{AppError, AppResult};

pub use auth::check_token;

/// Delete policy is RESTRICT: a record that other records still reference
/// cannot be removed. Callers pass the live reference counts they gathered.
///
/// # Errors
///
/// Returns `AppError::ReferentialIntegrity` when any count is non-zero.
pub fn check_unreferenced(record: &str, references: &[(&str, u64)]) -> AppResult<()> {
    if references.iter().all(|(_, count)| *count == 0) {
        return Ok(());
    }
    let detail = references
        .iter()
        .map(|(what, count)| format!("{count} {what}"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(AppError::ReferentialIntegrity(format!(
        "{record} is still referenced by {detail}"
    )))
}

/// Resolve an owning entity by UUID
pub async fn find_entity(
    db: &DatabaseConnection,
    id: Uuid,
) -> AppResult<entity::entities::Model> {
    entity::entities::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Entity '{id}' not found")))
}

/// Resolve a network by UUID
pub async fn find_network(
    db: &DatabaseConnection,
    id: Uuid,
) -> AppResult<entity::networks::Model> {
    entity::networks::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Network '{id}' not found")))
}

/// Resolve a site by UUID
pub async fn find_site(db: &DatabaseConnection, id: Uuid) -> AppResult<entity::sites::Model> {
    entity::sites::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Site '{id}' not found")))
}

/// Resolve a brand by UUID
pub async fn find_brand(db: &DatabaseConnection, id: Uuid) -> AppResult<entity::brands::Model> {
    entity::brands::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Brand '{id}' not found")))
}

/// Resolve an instrument model by UUID
pub async fn find_instrument_model(
    db: &DatabaseConnection,
    id: Uuid,
) -> AppResult<entity::instrument_models::Model> {
    entity::instrument_models::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Instrument model '{id}' not found")))
}

/// Resolve a station model by UUID
pub async fn find_station_model(
    db: &DatabaseConnection,
    id: Uuid,
) -> AppResult<entity::station_models::Model> {
    entity::station_models::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Station model '{id}' not found")))
}

/// Resolve a deployed station by UUID
pub async fn find_station(
    db: &DatabaseConnection,
    id: Uuid,
) -> AppResult<entity::stations::Model> {
    entity::stations::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Station '{id}' not found")))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        entities::list_entities,
        entities::get_entity,
        entities::create_entity,
        entities::update_entity,
        entities::delete_entity,
        networks::list_networks,
        networks::get_network,
        networks::create_network,
        networks::update_network,
        networks::delete_network,
        sites::list_sites,
        sites::get_site,
        sites::create_site,
        sites::update_site,
        sites::delete_site,
        brands::list_brands,
        brands::get_brand,
        brands::create_brand,
        brands::update_brand,
        brands::delete_brand,
        instrument_models::list_instrument_models,
        instrument_models::get_instrument_model,
        instrument_models::create_instrument_model,
        instrument_models::update_instrument_model,
        instrument_models::delete_instrument_model,
        station_models::list_station_models,
        station_models::get_station_model,
        station_models::create_station_model,
        station_models::update_station_model,
        station_models::delete_station_model,
        stations::list_stations,
        stations::get_station,
        stations::create_station,
        stations::update_station,
        stations::delete_station,
        sensors::list_sensors,
        sensors::get_sensor,
        sensors::create_sensor,
        sensors::update_sensor,
        sensors::delete_sensor,
        archives::list_archives,
        archives::get_archive,
        archives::create_archive,
        archives::update_archive,
        archives::delete_archive,
    ),
    components(
        schemas(
            entities::EntityRef,
            entities::EntityResponse,
            entities::CreateEntityPayload,
            entities::UpdateEntityPayload,
            networks::NetworkRef,
            networks::NetworkResponse,
            networks::NetworkDetailResponse,
            networks::CreateNetworkPayload,
            networks::UpdateNetworkPayload,
            sites::SiteRef,
            sites::SiteResponse,
            sites::SiteDetailResponse,
            sites::CreateSitePayload,
            sites::UpdateSitePayload,
            brands::BrandRef,
            brands::BrandResponse,
            brands::CreateBrandPayload,
            brands::UpdateBrandPayload,
            instrument_models::InstrumentModelRef,
            instrument_models::InstrumentModelResponse,
            instrument_models::InstrumentModelDetailResponse,
            instrument_models::CreateInstrumentModelPayload,
            instrument_models::UpdateInstrumentModelPayload,
            station_models::StationModelRef,
            station_models::StationModelResponse,
            station_models::StationModelDetailResponse,
            station_models::CreateStationModelPayload,
            station_models::UpdateStationModelPayload,
            stations::StationRef,
            stations::StationResponse,
            stations::StationDetailResponse,
            stations::CreateStationPayload,
            stations::UpdateStationPayload,
            sensors::SensorResponse,
            sensors::SensorDetailResponse,
            sensors::CreateSensorPayload,
            sensors::UpdateSensorPayload,
            archives::ArchiveResponse,
            archives::ArchiveDetailResponse,
            archives::CreateArchivePayload,
            archives::UpdateArchivePayload,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "entities", description = "Owning entities"),
        (name = "networks", description = "Station networks"),
        (name = "sites", description = "Physical sites"),
        (name = "catalog", description = "Brands, instrument models and station models"),
        (name = "stations", description = "Deployed stations"),
        (name = "sensors", description = "Deployed sensors"),
        (name = "archives", description = "Weather archive records"),
    ),
    info(
        title = "Meteo DB API",
        description = "Station network registry API for citizen weather observation",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            rate = %format!("{}/s burst {}", config.rate_limit_per_second, config.rate_limit_burst),
            "Rate limiting configured"
        );
    }

    let api_routes_base = Router::new()
        .route(
            "/entities",
            get(entities::list_entities).post(entities::create_entity),
        )
        .route(
            "/entities/{entity_id}",
            get(entities::get_entity)
                .put(entities::update_entity)
                .delete(entities::delete_entity),
        )
        .route(
            "/networks",
            get(networks::list_networks).post(networks::create_network),
        )
        .route(
            "/networks/{network_id}",
            get(networks::get_network)
                .put(networks::update_network)
                .delete(networks::delete_network),
        )
        .route("/sites", get(sites::list_sites).post(sites::create_site))
        .route(
            "/sites/{site_id}",
            get(sites::get_site)
                .put(sites::update_site)
                .delete(sites::delete_site),
        )
        .route(
            "/brands",
            get(brands::list_brands).post(brands::create_brand),
        )
        .route(
            "/brands/{brand_id}",
            get(brands::get_brand)
                .put(brands::update_brand)
                .delete(brands::delete_brand),
        )
        .route(
            "/instrument-models",
            get(instrument_models::list_instrument_models)
                .post(instrument_models::create_instrument_model),
        )
        .route(
            "/instrument-models/{instrument_model_id}",
            get(instrument_models::get_instrument_model)
                .put(instrument_models::update_instrument_model)
                .delete(instrument_models::delete_instrument_model),
        )
        .route(
            "/station-models",
            get(station_models::list_station_models).post(station_models::create_station_model),
        )
        .route(
            "/station-models/{station_model_id}",
            get(station_models::get_station_model)
                .put(station_models::update_station_model)
                .delete(station_models::delete_station_model),
        )
        .route(
            "/stations",
            get(stations::list_stations).post(stations::create_station),
        )
        .route(
            "/stations/{station_id}",
            get(stations::get_station)
                .put(stations::update_station)
                .delete(stations::delete_station),
        )
        .route(
            "/sensors",
            get(sensors::list_sensors).post(sensors::create_sensor),
        )
        .route(
            "/sensors/{sensor_id}",
            get(sensors::get_sensor)
                .put(sensors::update_sensor)
                .delete(sensors::delete_sensor),
        )
        .route(
            "/archives",
            get(archives::list_archives).post(archives::create_archive),
        )
        .route(
            "/archives/{archive_id}",
            get(archives::get_archive)
                .put(archives::update_archive)
                .delete(archives::delete_archive),
        );

    // Rate limit the whole administrative surface per client IP
    let api_routes = if config.disable_rate_limiting {
        api_routes_base
    } else {
        let limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .expect("Failed to create rate limiter");

        api_routes_base.layer(GovernorLayer {
            config: Arc::new(limiter),
        })
    }
    .layer(RequestBodyLimitLayer::new(1024 * 1024)) // 1MB body limit
    .layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_operator,
    ));

    // Health check routes (NO authentication)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
