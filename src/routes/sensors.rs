use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::sensors;
use crate::error::{AppError, AppResult};
use crate::labels;

use super::instrument_models::InstrumentModelRef;
use super::stations::{check_window, StationRef};

#[derive(Debug, Serialize, ToSchema)]
pub struct SensorResponse {
    pub id: Uuid,
    pub station_id: Uuid,
    pub instrument_model_id: Uuid,
    pub description: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    /// Derived: deployment window still open at response time
    pub is_active: bool,
}

/// Detailed sensor response with related records
#[derive(Debug, Serialize, ToSchema)]
pub struct SensorDetailResponse {
    pub id: Uuid,
    pub description: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub is_active: bool,
    pub station: StationRef,
    pub instrument_model: InstrumentModelRef,
    pub label: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SensorsQuery {
    /// Filter by station ID
    pub station_id: Option<Uuid>,
    /// Filter by instrument model ID
    pub instrument_model_id: Option<Uuid>,
    /// Keep only sensors whose activity matches (evaluated at request time)
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSensorPayload {
    pub station_id: Uuid,
    pub instrument_model_id: Uuid,
    pub description: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSensorPayload {
    pub station_id: Option<Uuid>,
    pub instrument_model_id: Option<Uuid>,
    pub description: Option<String>,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
}

fn sensor_response(m: sensors::Model, now: DateTime<Utc>) -> SensorResponse {
    SensorResponse {
        id: m.id,
        station_id: m.station_id,
        instrument_model_id: m.instrument_model_id,
        is_active: m.is_active_at(now),
        description: m.description,
        date_start: m.date_start.with_timezone(&Utc),
        date_end: m.date_end.with_timezone(&Utc),
    }
}

async fn find_sensor(state: &AppState, id: Uuid) -> AppResult<sensors::Model> {
    sensors::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sensor '{id}' not found")))
}

/// List all deployed sensors
#[utoipa::path(
    get,
    path = "/api/sensors",
    params(SensorsQuery),
    responses(
        (status = 200, description = "Sensors retrieved successfully", body = Vec<SensorResponse>),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(
    State(state): State<AppState>,
    Query(query): Query<SensorsQuery>,
) -> AppResult<Json<Vec<SensorResponse>>> {
    let mut db_query = sensors::Entity::find();

    if let Some(station_id) = query.station_id {
        db_query = db_query.filter(sensors::Column::StationId.eq(station_id));
    }
    if let Some(instrument_model_id) = query.instrument_model_id {
        db_query = db_query.filter(sensors::Column::InstrumentModelId.eq(instrument_model_id));
    }

    let sensors_list = db_query
        .order_by_asc(sensors::Column::DateStart)
        .all(&state.db)
        .await?;

    // Activity is derived, so the filter runs after the fetch
    let now = Utc::now();
    let response: Vec<SensorResponse> = sensors_list
        .into_iter()
        .filter(|s| query.active.is_none_or(|want| s.is_active_at(now) == want))
        .map(|s| sensor_response(s, now))
        .collect();

    Ok(Json(response))
}

/// Get a specific sensor by ID
#[utoipa::path(
    get,
    path = "/api/sensors/{sensor_id}",
    params(
        ("sensor_id" = Uuid, Path, description = "Sensor UUID"),
    ),
    responses(
        (status = 200, description = "Sensor retrieved successfully", body = SensorDetailResponse),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<Uuid>,
) -> AppResult<Json<SensorDetailResponse>> {
    let sensor = find_sensor(&state, sensor_id).await?;
    let station = super::find_station(&state.db, sensor.station_id).await?;
    let network = super::find_network(&state.db, station.network_id).await?;
    let site = super::find_site(&state.db, station.site_id).await?;
    let instrument = super::find_instrument_model(&state.db, sensor.instrument_model_id).await?;
    let instrument_brand = super::find_brand(&state.db, instrument.brand_id).await?;

    let label = labels::sensor(&network.name, &site.code, &sensor.description, &station.name);
    let now = Utc::now();

    Ok(Json(SensorDetailResponse {
        id: sensor.id,
        is_active: sensor.is_active_at(now),
        description: sensor.description,
        date_start: sensor.date_start.with_timezone(&Utc),
        date_end: sensor.date_end.with_timezone(&Utc),
        station: StationRef {
            id: station.id,
            name: station.name,
        },
        instrument_model: InstrumentModelRef {
            id: instrument.id,
            label: labels::instrument_model(&instrument_brand.name, &instrument.name),
        },
        label,
    }))
}

/// Create a deployed sensor
#[utoipa::path(
    post,
    path = "/api/sensors",
    request_body = CreateSensorPayload,
    responses(
        (status = 201, description = "Sensor created", body = SensorResponse),
        (status = 404, description = "Station or instrument model not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "sensors"
)]
pub async fn create_sensor(
    State(state): State<AppState>,
    Json(payload): Json<CreateSensorPayload>,
) -> AppResult<(StatusCode, Json<SensorResponse>)> {
    check_window(payload.date_start, payload.date_end)?;
    super::find_station(&state.db, payload.station_id).await?;
    super::find_instrument_model(&state.db, payload.instrument_model_id).await?;

    let now = Utc::now();
    let sensor = sensors::ActiveModel {
        id: Set(Uuid::new_v4()),
        station_id: Set(payload.station_id),
        instrument_model_id: Set(payload.instrument_model_id),
        description: Set(payload.description),
        date_start: Set(payload.date_start.into()),
        date_end: Set(payload.date_end.into()),
        created_at: Set(Some(now.into())),
        updated_at: Set(Some(now.into())),
    };

    let created = sensor.insert(&state.db).await?;
    tracing::info!(id = %created.id, station_id = %created.station_id, "Created sensor");

    Ok((StatusCode::CREATED, Json(sensor_response(created, now))))
}

/// Update a deployed sensor (partial)
#[utoipa::path(
    put,
    path = "/api/sensors/{sensor_id}",
    params(
        ("sensor_id" = Uuid, Path, description = "Sensor UUID"),
    ),
    request_body = UpdateSensorPayload,
    responses(
        (status = 200, description = "Sensor updated", body = SensorResponse),
        (status = 404, description = "Sensor or referenced record not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "sensors"
)]
pub async fn update_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<Uuid>,
    Json(payload): Json<UpdateSensorPayload>,
) -> AppResult<Json<SensorResponse>> {
    if let Some(station_id) = payload.station_id {
        super::find_station(&state.db, station_id).await?;
    }
    if let Some(instrument_model_id) = payload.instrument_model_id {
        super::find_instrument_model(&state.db, instrument_model_id).await?;
    }

    let existing = find_sensor(&state, sensor_id).await?;

    let start = payload
        .date_start
        .unwrap_or_else(|| existing.date_start.with_timezone(&Utc));
    let end = payload
        .date_end
        .unwrap_or_else(|| existing.date_end.with_timezone(&Utc));
    check_window(start, end)?;

    let mut sensor: sensors::ActiveModel = existing.into();

    if let Some(station_id) = payload.station_id {
        sensor.station_id = Set(station_id);
    }
    if let Some(instrument_model_id) = payload.instrument_model_id {
        sensor.instrument_model_id = Set(instrument_model_id);
    }
    if let Some(description) = payload.description {
        sensor.description = Set(description);
    }
    if let Some(date_start) = payload.date_start {
        sensor.date_start = Set(date_start.into());
    }
    if let Some(date_end) = payload.date_end {
        sensor.date_end = Set(date_end.into());
    }
    sensor.updated_at = Set(Some(Utc::now().into()));

    let updated = sensor.update(&state.db).await?;
    Ok(Json(sensor_response(updated, Utc::now())))
}

/// Delete a deployed sensor
#[utoipa::path(
    delete,
    path = "/api/sensors/{sensor_id}",
    params(
        ("sensor_id" = Uuid, Path, description = "Sensor UUID"),
    ),
    responses(
        (status = 204, description = "Sensor deleted"),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "sensors"
)]
pub async fn delete_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let sensor = find_sensor(&state, sensor_id).await?;

    sensors::Entity::delete_by_id(sensor.id)
        .exec(&state.db)
        .await?;
    tracing::info!(id = %sensor.id, "Deleted sensor");

    Ok(StatusCode::NO_CONTENT)
}
