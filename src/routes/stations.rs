use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::{archives, sensors, stations};
use crate::error::{AppError, AppResult};
use crate::labels;

use super::entities::EntityRef;
use super::networks::{check_name, NetworkRef};
use super::sites::SiteRef;
use super::station_models::{composed_label, StationModelRef};

/// Brief station reference for embedding in responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StationRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StationResponse {
    pub id: Uuid,
    pub network_id: Uuid,
    pub owner_id: Uuid,
    pub site_id: Uuid,
    pub station_model_id: Uuid,
    pub name: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub description: String,
    pub auto_transmit: bool,
}

/// Detailed station response with related records
#[derive(Debug, Serialize, ToSchema)]
pub struct StationDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub description: String,
    pub auto_transmit: bool,
    pub network: NetworkRef,
    pub owner: EntityRef,
    pub site: SiteRef,
    pub station_model: StationModelRef,
    pub label: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StationsQuery {
    /// Filter by network ID
    pub network_id: Option<Uuid>,
    /// Filter by site ID
    pub site_id: Option<Uuid>,
    /// Filter by owning entity ID
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStationPayload {
    pub network_id: Uuid,
    pub owner_id: Uuid,
    pub site_id: Uuid,
    pub station_model_id: Uuid,
    pub name: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub description: String,
    pub auto_transmit: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStationPayload {
    pub network_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    pub site_id: Option<Uuid>,
    pub station_model_id: Option<Uuid>,
    pub name: Option<String>,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub auto_transmit: Option<bool>,
}

pub(crate) fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if end <= start {
        return Err(AppError::Validation(
            "date_end must be after date_start".to_string(),
        ));
    }
    Ok(())
}

fn station_response(m: stations::Model) -> StationResponse {
    StationResponse {
        id: m.id,
        network_id: m.network_id,
        owner_id: m.owner_id,
        site_id: m.site_id,
        station_model_id: m.station_model_id,
        name: m.name,
        date_start: m.date_start.with_timezone(&Utc),
        date_end: m.date_end.with_timezone(&Utc),
        description: m.description,
        auto_transmit: m.auto_transmit,
    }
}

/// List all stations
#[utoipa::path(
    get,
    path = "/api/stations",
    params(StationsQuery),
    responses(
        (status = 200, description = "Stations retrieved successfully", body = Vec<StationResponse>),
    ),
    tag = "stations"
)]
pub async fn list_stations(
    State(state): State<AppState>,
    Query(query): Query<StationsQuery>,
) -> AppResult<Json<Vec<StationResponse>>> {
    let mut db_query = stations::Entity::find();

    if let Some(network_id) = query.network_id {
        db_query = db_query.filter(stations::Column::NetworkId.eq(network_id));
    }
    if let Some(site_id) = query.site_id {
        db_query = db_query.filter(stations::Column::SiteId.eq(site_id));
    }
    if let Some(owner_id) = query.owner_id {
        db_query = db_query.filter(stations::Column::OwnerId.eq(owner_id));
    }

    let stations_list = db_query
        .order_by_asc(stations::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(
        stations_list.into_iter().map(station_response).collect(),
    ))
}

/// Get a specific station by ID
#[utoipa::path(
    get,
    path = "/api/stations/{station_id}",
    params(
        ("station_id" = Uuid, Path, description = "Station UUID"),
    ),
    responses(
        (status = 200, description = "Station retrieved successfully", body = StationDetailResponse),
        (status = 404, description = "Station not found"),
    ),
    tag = "stations"
)]
pub async fn get_station(
    State(state): State<AppState>,
    Path(station_id): Path<Uuid>,
) -> AppResult<Json<StationDetailResponse>> {
    let station = super::find_station(&state.db, station_id).await?;
    let network = super::find_network(&state.db, station.network_id).await?;
    let owner = super::find_entity(&state.db, station.owner_id).await?;
    let site = super::find_site(&state.db, station.site_id).await?;
    let station_model = super::find_station_model(&state.db, station.station_model_id).await?;
    let model_brand = super::find_brand(&state.db, station_model.brand_id).await?;

    let model_label = composed_label(&model_brand.name, &station_model);
    let label = labels::station(&network.name, &site.code, &station.name, &model_label);

    Ok(Json(StationDetailResponse {
        id: station.id,
        name: station.name,
        date_start: station.date_start.with_timezone(&Utc),
        date_end: station.date_end.with_timezone(&Utc),
        description: station.description,
        auto_transmit: station.auto_transmit,
        network: NetworkRef {
            id: network.id,
            name: network.name,
        },
        owner: EntityRef {
            id: owner.id,
            name: owner.name,
        },
        site: SiteRef {
            id: site.id,
            code: site.code,
        },
        station_model: StationModelRef {
            id: station_model.id,
            label: model_label,
        },
        label,
    }))
}

/// Create a deployed station
#[utoipa::path(
    post,
    path = "/api/stations",
    request_body = CreateStationPayload,
    responses(
        (status = 201, description = "Station created", body = StationResponse),
        (status = 404, description = "Referenced record not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "stations"
)]
pub async fn create_station(
    State(state): State<AppState>,
    Json(payload): Json<CreateStationPayload>,
) -> AppResult<(StatusCode, Json<StationResponse>)> {
    check_name(&payload.name, 100)?;
    check_window(payload.date_start, payload.date_end)?;
    super::find_network(&state.db, payload.network_id).await?;
    super::find_entity(&state.db, payload.owner_id).await?;
    super::find_site(&state.db, payload.site_id).await?;
    super::find_station_model(&state.db, payload.station_model_id).await?;

    let now = Utc::now();
    let station = stations::ActiveModel {
        id: Set(Uuid::new_v4()),
        network_id: Set(payload.network_id),
        owner_id: Set(payload.owner_id),
        site_id: Set(payload.site_id),
        station_model_id: Set(payload.station_model_id),
        name: Set(payload.name),
        date_start: Set(payload.date_start.into()),
        date_end: Set(payload.date_end.into()),
        description: Set(payload.description),
        auto_transmit: Set(payload.auto_transmit),
        created_at: Set(Some(now.into())),
        updated_at: Set(Some(now.into())),
    };

    let created = station.insert(&state.db).await?;
    tracing::info!(id = %created.id, name = %created.name, "Created station");

    Ok((StatusCode::CREATED, Json(station_response(created))))
}

/// Update a deployed station (partial)
#[utoipa::path(
    put,
    path = "/api/stations/{station_id}",
    params(
        ("station_id" = Uuid, Path, description = "Station UUID"),
    ),
    request_body = UpdateStationPayload,
    responses(
        (status = 200, description = "Station updated", body = StationResponse),
        (status = 404, description = "Station or referenced record not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "stations"
)]
pub async fn update_station(
    State(state): State<AppState>,
    Path(station_id): Path<Uuid>,
    Json(payload): Json<UpdateStationPayload>,
) -> AppResult<Json<StationResponse>> {
    if let Some(ref name) = payload.name {
        check_name(name, 100)?;
    }
    if let Some(network_id) = payload.network_id {
        super::find_network(&state.db, network_id).await?;
    }
    if let Some(owner_id) = payload.owner_id {
        super::find_entity(&state.db, owner_id).await?;
    }
    if let Some(site_id) = payload.site_id {
        super::find_site(&state.db, site_id).await?;
    }
    if let Some(station_model_id) = payload.station_model_id {
        super::find_station_model(&state.db, station_model_id).await?;
    }

    let existing = super::find_station(&state.db, station_id).await?;

    // The deployment window stays consistent across partial updates
    let start = payload
        .date_start
        .unwrap_or_else(|| existing.date_start.with_timezone(&Utc));
    let end = payload
        .date_end
        .unwrap_or_else(|| existing.date_end.with_timezone(&Utc));
    check_window(start, end)?;

    let mut station: stations::ActiveModel = existing.into();

    if let Some(network_id) = payload.network_id {
        station.network_id = Set(network_id);
    }
    if let Some(owner_id) = payload.owner_id {
        station.owner_id = Set(owner_id);
    }
    if let Some(site_id) = payload.site_id {
        station.site_id = Set(site_id);
    }
    if let Some(station_model_id) = payload.station_model_id {
        station.station_model_id = Set(station_model_id);
    }
    if let Some(name) = payload.name {
        station.name = Set(name);
    }
    if let Some(date_start) = payload.date_start {
        station.date_start = Set(date_start.into());
    }
    if let Some(date_end) = payload.date_end {
        station.date_end = Set(date_end.into());
    }
    if let Some(description) = payload.description {
        station.description = Set(description);
    }
    if let Some(auto_transmit) = payload.auto_transmit {
        station.auto_transmit = Set(auto_transmit);
    }
    station.updated_at = Set(Some(Utc::now().into()));

    let updated = station.update(&state.db).await?;
    Ok(Json(station_response(updated)))
}

/// Delete a deployed station
#[utoipa::path(
    delete,
    path = "/api/stations/{station_id}",
    params(
        ("station_id" = Uuid, Path, description = "Station UUID"),
    ),
    responses(
        (status = 204, description = "Station deleted"),
        (status = 404, description = "Station not found"),
        (status = 409, description = "Station is still referenced"),
    ),
    tag = "stations"
)]
pub async fn delete_station(
    State(state): State<AppState>,
    Path(station_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let station = super::find_station(&state.db, station_id).await?;

    let sensors_count = sensors::Entity::find()
        .filter(sensors::Column::StationId.eq(station.id))
        .count(&state.db)
        .await?;
    let archives_count = archives::Entity::find()
        .filter(archives::Column::StationId.eq(station.id))
        .count(&state.db)
        .await?;
    super::check_unreferenced(
        &format!("station '{}'", station.name),
        &[
            ("sensor(s)", sensors_count),
            ("archive(s)", archives_count),
        ],
    )?;

    stations::Entity::delete_by_id(station.id)
        .exec(&state.db)
        .await?;
    tracing::info!(id = %station.id, "Deleted station");

    Ok(StatusCode::NO_CONTENT)
}
