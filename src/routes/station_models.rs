use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::codes::StationType;
use crate::entity::{instrument_models, station_model_instruments, station_models, stations};
use crate::error::{AppError, AppResult};
use crate::labels;

use super::brands::BrandRef;
use super::instrument_models::InstrumentModelRef;
use super::networks::check_name;

/// Brief station model reference for embedding in responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationModelRef {
    pub id: Uuid,
    pub label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StationModelResponse {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub description: String,
    pub station_type: String,
    pub station_type_label: String,
}

/// Detailed station model response with brand and instrument info
#[derive(Debug, Serialize, ToSchema)]
pub struct StationModelDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub station_type: String,
    pub station_type_label: String,
    pub brand: BrandRef,
    /// Instrument models carried by this configuration (unordered set)
    pub instruments: Vec<InstrumentModelRef>,
    pub label: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StationModelsQuery {
    /// Filter by brand ID
    pub brand_id: Option<Uuid>,
    /// Filter by station type code (RE, TP, DR, OT)
    pub station_type: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStationModelPayload {
    pub brand_id: Uuid,
    pub name: String,
    pub description: String,
    pub station_type: String,
    /// Instrument models this configuration carries
    #[serde(default)]
    pub instrument_model_ids: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStationModelPayload {
    pub brand_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub station_type: Option<String>,
    /// Replaces the instrument set when provided
    pub instrument_model_ids: Option<Vec<Uuid>>,
}

pub(crate) fn check_station_type(code: &str) -> AppResult<StationType> {
    StationType::parse(code)
        .ok_or_else(|| AppError::Validation(format!("invalid station_type code '{code}'")))
}

fn station_model_response(m: station_models::Model) -> StationModelResponse {
    let station_type_label = StationType::parse(&m.station_type)
        .map(|t| t.label().to_string())
        .unwrap_or_default();
    StationModelResponse {
        id: m.id,
        brand_id: m.brand_id,
        name: m.name,
        description: m.description,
        station_type: m.station_type,
        station_type_label,
    }
}

async fn check_instruments_exist(state: &AppState, ids: &[Uuid]) -> AppResult<()> {
    for id in ids {
        super::find_instrument_model(&state.db, *id).await?;
    }
    Ok(())
}

/// List all station models
#[utoipa::path(
    get,
    path = "/api/station-models",
    params(StationModelsQuery),
    responses(
        (status = 200, description = "Station models retrieved successfully", body = Vec<StationModelResponse>),
    ),
    tag = "catalog"
)]
pub async fn list_station_models(
    State(state): State<AppState>,
    Query(query): Query<StationModelsQuery>,
) -> AppResult<Json<Vec<StationModelResponse>>> {
    let mut db_query = station_models::Entity::find();

    if let Some(brand_id) = query.brand_id {
        db_query = db_query.filter(station_models::Column::BrandId.eq(brand_id));
    }
    if let Some(ref code) = query.station_type {
        check_station_type(code)?;
        db_query = db_query.filter(station_models::Column::StationType.eq(code));
    }

    let models_list = db_query
        .order_by_asc(station_models::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(
        models_list.into_iter().map(station_model_response).collect(),
    ))
}

/// Get a specific station model by ID
#[utoipa::path(
    get,
    path = "/api/station-models/{station_model_id}",
    params(
        ("station_model_id" = Uuid, Path, description = "Station model UUID"),
    ),
    responses(
        (status = 200, description = "Station model retrieved successfully", body = StationModelDetailResponse),
        (status = 404, description = "Station model not found"),
    ),
    tag = "catalog"
)]
pub async fn get_station_model(
    State(state): State<AppState>,
    Path(station_model_id): Path<Uuid>,
) -> AppResult<Json<StationModelDetailResponse>> {
    let model = super::find_station_model(&state.db, station_model_id).await?;
    let brand = super::find_brand(&state.db, model.brand_id).await?;

    // Resolve the instrument set with each instrument's own brand for its label
    let links = station_model_instruments::Entity::find()
        .filter(station_model_instruments::Column::StationModelId.eq(model.id))
        .all(&state.db)
        .await?;

    let mut instruments = Vec::with_capacity(links.len());
    for link in links {
        let instrument = super::find_instrument_model(&state.db, link.instrument_model_id).await?;
        let instrument_brand = super::find_brand(&state.db, instrument.brand_id).await?;
        instruments.push(InstrumentModelRef {
            id: instrument.id,
            label: labels::instrument_model(&instrument_brand.name, &instrument.name),
        });
    }

    let station_type_label = StationType::parse(&model.station_type)
        .map(|t| t.label().to_string())
        .unwrap_or_default();

    Ok(Json(StationModelDetailResponse {
        id: model.id,
        label: labels::station_model(&brand.name, &model.name, &station_type_label),
        name: model.name,
        description: model.description,
        station_type: model.station_type,
        station_type_label,
        brand: BrandRef {
            id: brand.id,
            name: brand.name,
        },
        instruments,
    }))
}

/// Create a station model
#[utoipa::path(
    post,
    path = "/api/station-models",
    request_body = CreateStationModelPayload,
    responses(
        (status = 201, description = "Station model created", body = StationModelResponse),
        (status = 404, description = "Brand or instrument model not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "catalog"
)]
pub async fn create_station_model(
    State(state): State<AppState>,
    Json(payload): Json<CreateStationModelPayload>,
) -> AppResult<(StatusCode, Json<StationModelResponse>)> {
    check_name(&payload.name, 40)?;
    check_station_type(&payload.station_type)?;
    super::find_brand(&state.db, payload.brand_id).await?;
    check_instruments_exist(&state, &payload.instrument_model_ids).await?;

    let now = Utc::now();
    let id = Uuid::new_v4();
    let model = station_models::ActiveModel {
        id: Set(id),
        brand_id: Set(payload.brand_id),
        name: Set(payload.name),
        description: Set(payload.description),
        station_type: Set(payload.station_type),
        created_at: Set(Some(now.into())),
        updated_at: Set(Some(now.into())),
    };

    // Model row and its instrument links land together or not at all
    let txn = state.db.begin().await?;
    let created = model.insert(&txn).await?;
    if !payload.instrument_model_ids.is_empty() {
        let links: Vec<station_model_instruments::ActiveModel> = payload
            .instrument_model_ids
            .iter()
            .map(|instrument_id| station_model_instruments::ActiveModel {
                station_model_id: Set(id),
                instrument_model_id: Set(*instrument_id),
            })
            .collect();
        station_model_instruments::Entity::insert_many(links)
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;

    tracing::info!(id = %created.id, name = %created.name, "Created station model");

    Ok((StatusCode::CREATED, Json(station_model_response(created))))
}

/// Update a station model (partial)
///
/// Providing `instrument_model_ids` replaces the instrument set.
#[utoipa::path(
    put,
    path = "/api/station-models/{station_model_id}",
    params(
        ("station_model_id" = Uuid, Path, description = "Station model UUID"),
    ),
    request_body = UpdateStationModelPayload,
    responses(
        (status = 200, description = "Station model updated", body = StationModelResponse),
        (status = 404, description = "Station model, brand or instrument model not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "catalog"
)]
pub async fn update_station_model(
    State(state): State<AppState>,
    Path(station_model_id): Path<Uuid>,
    Json(payload): Json<UpdateStationModelPayload>,
) -> AppResult<Json<StationModelResponse>> {
    if let Some(ref name) = payload.name {
        check_name(name, 40)?;
    }
    if let Some(ref code) = payload.station_type {
        check_station_type(code)?;
    }
    if let Some(brand_id) = payload.brand_id {
        super::find_brand(&state.db, brand_id).await?;
    }
    if let Some(ref instrument_ids) = payload.instrument_model_ids {
        check_instruments_exist(&state, instrument_ids).await?;
    }

    let existing = super::find_station_model(&state.db, station_model_id).await?;
    let id = existing.id;
    let mut model: station_models::ActiveModel = existing.into();

    if let Some(brand_id) = payload.brand_id {
        model.brand_id = Set(brand_id);
    }
    if let Some(name) = payload.name {
        model.name = Set(name);
    }
    if let Some(description) = payload.description {
        model.description = Set(description);
    }
    if let Some(station_type) = payload.station_type {
        model.station_type = Set(station_type);
    }
    model.updated_at = Set(Some(Utc::now().into()));

    let txn = state.db.begin().await?;
    let updated = model.update(&txn).await?;
    if let Some(instrument_ids) = payload.instrument_model_ids {
        station_model_instruments::Entity::delete_many()
            .filter(station_model_instruments::Column::StationModelId.eq(id))
            .exec(&txn)
            .await?;
        if !instrument_ids.is_empty() {
            let links: Vec<station_model_instruments::ActiveModel> = instrument_ids
                .iter()
                .map(|instrument_id| station_model_instruments::ActiveModel {
                    station_model_id: Set(id),
                    instrument_model_id: Set(*instrument_id),
                })
                .collect();
            station_model_instruments::Entity::insert_many(links)
                .exec(&txn)
                .await?;
        }
    }
    txn.commit().await?;

    Ok(Json(station_model_response(updated)))
}

/// Delete a station model
///
/// Its instrument links go with it; deployed stations must be removed first.
#[utoipa::path(
    delete,
    path = "/api/station-models/{station_model_id}",
    params(
        ("station_model_id" = Uuid, Path, description = "Station model UUID"),
    ),
    responses(
        (status = 204, description = "Station model deleted"),
        (status = 404, description = "Station model not found"),
        (status = 409, description = "Station model is still referenced"),
    ),
    tag = "catalog"
)]
pub async fn delete_station_model(
    State(state): State<AppState>,
    Path(station_model_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let model = super::find_station_model(&state.db, station_model_id).await?;

    let stations_count = stations::Entity::find()
        .filter(stations::Column::StationModelId.eq(model.id))
        .count(&state.db)
        .await?;
    super::check_unreferenced(
        &format!("station model '{}'", model.name),
        &[("station(s)", stations_count)],
    )?;

    let txn = state.db.begin().await?;
    station_model_instruments::Entity::delete_many()
        .filter(station_model_instruments::Column::StationModelId.eq(model.id))
        .exec(&txn)
        .await?;
    station_models::Entity::delete_by_id(model.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(id = %model.id, "Deleted station model");

    Ok(StatusCode::NO_CONTENT)
}

// Composes the station model label the same way the detail endpoint does,
// for callers that already hold the brand name.
pub(crate) fn composed_label(brand_name: &str, model: &station_models::Model) -> String {
    let station_type_label = StationType::parse(&model.station_type)
        .map(|t| t.label().to_string())
        .unwrap_or_default();
    labels::station_model(brand_name, &model.name, &station_type_label)
}
