use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::codes::{ReadingType, SensorType};
use crate::entity::{instrument_models, sensors, station_model_instruments};
use crate::error::{AppError, AppResult};
use crate::labels;

use super::brands::BrandRef;
use super::networks::check_name;

/// Brief instrument model reference for embedding in responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InstrumentModelRef {
    pub id: Uuid,
    pub label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstrumentModelResponse {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub reading_type: String,
    pub reading_type_label: String,
    pub sensor_type: String,
    pub sensor_type_label: String,
    pub precision: String,
}

/// Detailed instrument model response with brand info
#[derive(Debug, Serialize, ToSchema)]
pub struct InstrumentModelDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub reading_type: String,
    pub reading_type_label: String,
    pub sensor_type: String,
    pub sensor_type_label: String,
    pub precision: String,
    pub brand: BrandRef,
    pub label: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct InstrumentModelsQuery {
    /// Filter by brand ID
    pub brand_id: Option<Uuid>,
    /// Filter by sensor type code (ANM, PLG, THM, HYM, THH, PYM, UVS)
    pub sensor_type: Option<String>,
    /// Filter by reading type code (MAN, AUT)
    pub reading_type: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInstrumentModelPayload {
    pub brand_id: Uuid,
    pub name: String,
    pub reading_type: String,
    pub sensor_type: String,
    pub precision: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateInstrumentModelPayload {
    pub brand_id: Option<Uuid>,
    pub name: Option<String>,
    pub reading_type: Option<String>,
    pub sensor_type: Option<String>,
    pub precision: Option<String>,
}

pub(crate) fn check_reading_type(code: &str) -> AppResult<ReadingType> {
    ReadingType::parse(code)
        .ok_or_else(|| AppError::Validation(format!("invalid reading_type code '{code}'")))
}

pub(crate) fn check_sensor_type(code: &str) -> AppResult<SensorType> {
    SensorType::parse(code)
        .ok_or_else(|| AppError::Validation(format!("invalid sensor_type code '{code}'")))
}

impl CreateInstrumentModelPayload {
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a field fails its declared constraint.
    pub fn validate(&self) -> AppResult<()> {
        check_name(&self.name, 30)?;
        check_reading_type(&self.reading_type)?;
        check_sensor_type(&self.sensor_type)?;
        if self.precision.len() > 20 {
            return Err(AppError::Validation(
                "precision must be at most 20 characters".to_string(),
            ));
        }
        Ok(())
    }
}

impl UpdateInstrumentModelPayload {
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a provided field fails its constraint.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref name) = self.name {
            check_name(name, 30)?;
        }
        if let Some(ref code) = self.reading_type {
            check_reading_type(code)?;
        }
        if let Some(ref code) = self.sensor_type {
            check_sensor_type(code)?;
        }
        if let Some(ref precision) = self.precision {
            if precision.len() > 20 {
                return Err(AppError::Validation(
                    "precision must be at most 20 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn instrument_model_response(m: instrument_models::Model) -> InstrumentModelResponse {
    let reading_type_label = ReadingType::parse(&m.reading_type)
        .map(|t| t.label().to_string())
        .unwrap_or_default();
    let sensor_type_label = SensorType::parse(&m.sensor_type)
        .map(|t| t.label().to_string())
        .unwrap_or_default();
    InstrumentModelResponse {
        id: m.id,
        brand_id: m.brand_id,
        name: m.name,
        reading_type: m.reading_type,
        reading_type_label,
        sensor_type: m.sensor_type,
        sensor_type_label,
        precision: m.precision,
    }
}

/// List all instrument models
#[utoipa::path(
    get,
    path = "/api/instrument-models",
    params(InstrumentModelsQuery),
    responses(
        (status = 200, description = "Instrument models retrieved successfully", body = Vec<InstrumentModelResponse>),
    ),
    tag = "catalog"
)]
pub async fn list_instrument_models(
    State(state): State<AppState>,
    Query(query): Query<InstrumentModelsQuery>,
) -> AppResult<Json<Vec<InstrumentModelResponse>>> {
    let mut db_query = instrument_models::Entity::find();

    if let Some(brand_id) = query.brand_id {
        db_query = db_query.filter(instrument_models::Column::BrandId.eq(brand_id));
    }
    if let Some(ref code) = query.sensor_type {
        check_sensor_type(code)?;
        db_query = db_query.filter(instrument_models::Column::SensorType.eq(code));
    }
    if let Some(ref code) = query.reading_type {
        check_reading_type(code)?;
        db_query = db_query.filter(instrument_models::Column::ReadingType.eq(code));
    }

    let models_list = db_query
        .order_by_asc(instrument_models::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(
        models_list
            .into_iter()
            .map(instrument_model_response)
            .collect(),
    ))
}

/// Get a specific instrument model by ID
#[utoipa::path(
    get,
    path = "/api/instrument-models/{instrument_model_id}",
    params(
        ("instrument_model_id" = Uuid, Path, description = "Instrument model UUID"),
    ),
    responses(
        (status = 200, description = "Instrument model retrieved successfully", body = InstrumentModelDetailResponse),
        (status = 404, description = "Instrument model not found"),
    ),
    tag = "catalog"
)]
pub async fn get_instrument_model(
    State(state): State<AppState>,
    Path(instrument_model_id): Path<Uuid>,
) -> AppResult<Json<InstrumentModelDetailResponse>> {
    let model = super::find_instrument_model(&state.db, instrument_model_id).await?;
    let brand = super::find_brand(&state.db, model.brand_id).await?;

    let reading_type_label = ReadingType::parse(&model.reading_type)
        .map(|t| t.label().to_string())
        .unwrap_or_default();
    let sensor_type_label = SensorType::parse(&model.sensor_type)
        .map(|t| t.label().to_string())
        .unwrap_or_default();

    Ok(Json(InstrumentModelDetailResponse {
        id: model.id,
        label: labels::instrument_model(&brand.name, &model.name),
        name: model.name,
        reading_type: model.reading_type,
        reading_type_label,
        sensor_type: model.sensor_type,
        sensor_type_label,
        precision: model.precision,
        brand: BrandRef {
            id: brand.id,
            name: brand.name,
        },
    }))
}

/// Create an instrument model
#[utoipa::path(
    post,
    path = "/api/instrument-models",
    request_body = CreateInstrumentModelPayload,
    responses(
        (status = 201, description = "Instrument model created", body = InstrumentModelResponse),
        (status = 404, description = "Brand not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "catalog"
)]
pub async fn create_instrument_model(
    State(state): State<AppState>,
    Json(payload): Json<CreateInstrumentModelPayload>,
) -> AppResult<(StatusCode, Json<InstrumentModelResponse>)> {
    payload.validate()?;
    super::find_brand(&state.db, payload.brand_id).await?;

    let now = Utc::now();
    let model = instrument_models::ActiveModel {
        id: Set(Uuid::new_v4()),
        brand_id: Set(payload.brand_id),
        name: Set(payload.name),
        reading_type: Set(payload.reading_type),
        sensor_type: Set(payload.sensor_type),
        precision: Set(payload.precision),
        created_at: Set(Some(now.into())),
        updated_at: Set(Some(now.into())),
    };

    let created = model.insert(&state.db).await?;
    tracing::info!(id = %created.id, name = %created.name, "Created instrument model");

    Ok((
        StatusCode::CREATED,
        Json(instrument_model_response(created)),
    ))
}

/// Update an instrument model (partial)
#[utoipa::path(
    put,
    path = "/api/instrument-models/{instrument_model_id}",
    params(
        ("instrument_model_id" = Uuid, Path, description = "Instrument model UUID"),
    ),
    request_body = UpdateInstrumentModelPayload,
    responses(
        (status = 200, description = "Instrument model updated", body = InstrumentModelResponse),
        (status = 404, description = "Instrument model or brand not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "catalog"
)]
pub async fn update_instrument_model(
    State(state): State<AppState>,
    Path(instrument_model_id): Path<Uuid>,
    Json(payload): Json<UpdateInstrumentModelPayload>,
) -> AppResult<Json<InstrumentModelResponse>> {
    payload.validate()?;

    if let Some(brand_id) = payload.brand_id {
        super::find_brand(&state.db, brand_id).await?;
    }

    let existing = super::find_instrument_model(&state.db, instrument_model_id).await?;
    let mut model: instrument_models::ActiveModel = existing.into();

    if let Some(brand_id) = payload.brand_id {
        model.brand_id = Set(brand_id);
    }
    if let Some(name) = payload.name {
        model.name = Set(name);
    }
    if let Some(reading_type) = payload.reading_type {
        model.reading_type = Set(reading_type);
    }
    if let Some(sensor_type) = payload.sensor_type {
        model.sensor_type = Set(sensor_type);
    }
    if let Some(precision) = payload.precision {
        model.precision = Set(precision);
    }
    model.updated_at = Set(Some(Utc::now().into()));

    let updated = model.update(&state.db).await?;
    Ok(Json(instrument_model_response(updated)))
}

/// Delete an instrument model
///
/// Fails while any deployed sensor or station model configuration still
/// references it.
#[utoipa::path(
    delete,
    path = "/api/instrument-models/{instrument_model_id}",
    params(
        ("instrument_model_id" = Uuid, Path, description = "Instrument model UUID"),
    ),
    responses(
        (status = 204, description = "Instrument model deleted"),
        (status = 404, description = "Instrument model not found"),
        (status = 409, description = "Instrument model is still referenced"),
    ),
    tag = "catalog"
)]
pub async fn delete_instrument_model(
    State(state): State<AppState>,
    Path(instrument_model_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let model = super::find_instrument_model(&state.db, instrument_model_id).await?;

    let sensors_count = sensors::Entity::find()
        .filter(sensors::Column::InstrumentModelId.eq(model.id))
        .count(&state.db)
        .await?;
    let configurations_count = station_model_instruments::Entity::find()
        .filter(station_model_instruments::Column::InstrumentModelId.eq(model.id))
        .count(&state.db)
        .await?;
    super::check_unreferenced(
        &format!("instrument model '{}'", model.name),
        &[
            ("sensor(s)", sensors_count),
            ("station model(s)", configurations_count),
        ],
    )?;

    instrument_models::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;
    tracing::info!(id = %model.id, "Deleted instrument model");

    Ok(StatusCode::NO_CONTENT)
}
