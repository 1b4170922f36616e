use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio_stream::wrappers::ReceiverStream;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::codes::Units;
use crate::entity::{archives, sites};
use crate::error::{AppError, AppResult};
use crate::labels;

use super::sites::SiteRef;
use super::stations::StationRef;

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArchiveResponse {
    pub id: Uuid,
    pub station_id: Uuid,
    pub site_id: Uuid,
    pub date: DateTime<Utc>,
    pub interval_sec: i32,
    pub units: String,
    pub units_label: String,
    pub temperature: Decimal,
    pub temperature2: Decimal,
    pub humidity: i16,
    pub dewpoint: Decimal,
    pub windchill: Decimal,
    pub heatindex: Decimal,
    pub pressure: Decimal,
    pub wind_direction: Decimal,
    pub wind: Decimal,
    pub wind_gust: Decimal,
    pub wind_gust_dir: Decimal,
    pub wind_2min: Decimal,
    pub wind_10min: Decimal,
    pub rain: Decimal,
    pub rain_rate: Decimal,
    pub uv_radiation: Decimal,
    pub solar_radiation: i16,
    pub et: Decimal,
}

/// Detailed archive response with related records
#[derive(Debug, Serialize, ToSchema)]
pub struct ArchiveDetailResponse {
    #[serde(flatten)]
    pub archive: ArchiveResponse,
    pub station: StationRef,
    pub site: SiteRef,
    pub label: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ArchivesQuery {
    /// Filter by station ID
    pub station_id: Option<Uuid>,
    /// Filter by site ID
    pub site_id: Option<Uuid>,
    /// Start of time range (inclusive, ISO 8601)
    pub start: Option<DateTime<Utc>>,
    /// End of time range (inclusive, ISO 8601)
    pub end: Option<DateTime<Utc>>,
    /// Maximum number of records to return
    pub limit: Option<u64>,
    /// Number of records to skip
    pub offset: Option<u64>,
    /// Response format: json (default) or csv
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArchivePayload {
    pub station_id: Uuid,
    pub site_id: Uuid,
    pub date: DateTime<Utc>,
    pub interval_sec: i32,
    pub units: String,
    pub temperature: Decimal,
    pub temperature2: Decimal,
    pub humidity: i16,
    pub dewpoint: Decimal,
    pub windchill: Decimal,
    pub heatindex: Decimal,
    pub pressure: Decimal,
    pub wind_direction: Decimal,
    pub wind: Decimal,
    pub wind_gust: Decimal,
    pub wind_gust_dir: Decimal,
    pub wind_2min: Decimal,
    pub wind_10min: Decimal,
    pub rain: Decimal,
    pub rain_rate: Decimal,
    pub uv_radiation: Decimal,
    pub solar_radiation: i16,
    pub et: Decimal,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateArchivePayload {
    pub station_id: Option<Uuid>,
    pub site_id: Option<Uuid>,
    pub date: Option<DateTime<Utc>>,
    pub interval_sec: Option<i32>,
    pub units: Option<String>,
    pub temperature: Option<Decimal>,
    pub temperature2: Option<Decimal>,
    pub humidity: Option<i16>,
    pub dewpoint: Option<Decimal>,
    pub windchill: Option<Decimal>,
    pub heatindex: Option<Decimal>,
    pub pressure: Option<Decimal>,
    pub wind_direction: Option<Decimal>,
    pub wind: Option<Decimal>,
    pub wind_gust: Option<Decimal>,
    pub wind_gust_dir: Option<Decimal>,
    pub wind_2min: Option<Decimal>,
    pub wind_10min: Option<Decimal>,
    pub rain: Option<Decimal>,
    pub rain_rate: Option<Decimal>,
    pub uv_radiation: Option<Decimal>,
    pub solar_radiation: Option<i16>,
    pub et: Option<Decimal>,
}

pub(crate) fn check_units(code: &str) -> AppResult<Units> {
    Units::parse(code).ok_or_else(|| AppError::Validation(format!("invalid units code '{code}'")))
}

pub(crate) fn check_interval(interval_sec: i32) -> AppResult<()> {
    if interval_sec <= 0 {
        return Err(AppError::Validation(
            "interval_sec must be positive".to_string(),
        ));
    }
    Ok(())
}

impl CreateArchivePayload {
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a field fails its declared constraint.
    pub fn validate(&self) -> AppResult<()> {
        check_units(&self.units)?;
        check_interval(self.interval_sec)?;
        if self.humidity < 0 {
            return Err(AppError::Validation(
                "humidity must not be negative".to_string(),
            ));
        }
        if self.solar_radiation < 0 {
            return Err(AppError::Validation(
                "solar_radiation must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl UpdateArchivePayload {
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a provided field fails its constraint.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref code) = self.units {
            check_units(code)?;
        }
        if let Some(interval_sec) = self.interval_sec {
            check_interval(interval_sec)?;
        }
        if let Some(humidity) = self.humidity {
            if humidity < 0 {
                return Err(AppError::Validation(
                    "humidity must not be negative".to_string(),
                ));
            }
        }
        if let Some(solar_radiation) = self.solar_radiation {
            if solar_radiation < 0 {
                return Err(AppError::Validation(
                    "solar_radiation must not be negative".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn archive_response(m: archives::Model) -> ArchiveResponse {
    let units_label = Units::parse(&m.units)
        .map(|u| u.label().to_string())
        .unwrap_or_default();
    ArchiveResponse {
        id: m.id,
        station_id: m.station_id,
        site_id: m.site_id,
        date: m.date.with_timezone(&Utc),
        interval_sec: m.interval_sec,
        units: m.units,
        units_label,
        temperature: m.temperature,
        temperature2: m.temperature2,
        humidity: m.humidity,
        dewpoint: m.dewpoint,
        windchill: m.windchill,
        heatindex: m.heatindex,
        pressure: m.pressure,
        wind_direction: m.wind_direction,
        wind: m.wind,
        wind_gust: m.wind_gust,
        wind_gust_dir: m.wind_gust_dir,
        wind_2min: m.wind_2min,
        wind_10min: m.wind_10min,
        rain: m.rain,
        rain_rate: m.rain_rate,
        uv_radiation: m.uv_radiation,
        solar_radiation: m.solar_radiation,
        et: m.et,
    }
}

async fn find_archive(state: &AppState, id: Uuid) -> AppResult<archives::Model> {
    archives::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Archive '{id}' not found")))
}

const CSV_HEADER: &str = "site_code,date,interval_sec,units,temperature,temperature2,humidity,\
                          dewpoint,windchill,heatindex,pressure,wind_direction,wind,wind_gust,\
                          wind_gust_dir,wind_2min,wind_10min,rain,rain_rate,uv_radiation,\
                          solar_radiation,et";

/// Fields exported per archive row, in `CSV_HEADER` order
#[derive(Serialize)]
struct ArchiveCsvRow {
    site_code: String,
    date: String,
    interval_sec: i32,
    units: String,
    temperature: Decimal,
    temperature2: Decimal,
    humidity: i16,
    dewpoint: Decimal,
    windchill: Decimal,
    heatindex: Decimal,
    pressure: Decimal,
    wind_direction: Decimal,
    wind: Decimal,
    wind_gust: Decimal,
    wind_gust_dir: Decimal,
    wind_2min: Decimal,
    wind_10min: Decimal,
    rain: Decimal,
    rain_rate: Decimal,
    uv_radiation: Decimal,
    solar_radiation: i16,
    et: Decimal,
}

fn csv_line(row: &ArchiveCsvRow) -> Option<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.serialize(row).ok()?;
    let bytes = writer.into_inner().ok()?;
    String::from_utf8(bytes).ok()
}

fn build_csv_response(
    records: Vec<archives::Model>,
    site_codes: HashMap<Uuid, String>,
) -> AppResult<Response> {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<String, std::io::Error>>(100);

    tokio::spawn(async move {
        if tx.send(Ok(format!("{CSV_HEADER}\n"))).await.is_err() {
            return;
        }

        for m in records {
            let row = ArchiveCsvRow {
                site_code: site_codes.get(&m.site_id).cloned().unwrap_or_default(),
                date: m.date.with_timezone(&Utc).to_rfc3339(),
                interval_sec: m.interval_sec,
                units: m.units,
                temperature: m.temperature,
                temperature2: m.temperature2,
                humidity: m.humidity,
                dewpoint: m.dewpoint,
                windchill: m.windchill,
                heatindex: m.heatindex,
                pressure: m.pressure,
                wind_direction: m.wind_direction,
                wind: m.wind,
                wind_gust: m.wind_gust,
                wind_gust_dir: m.wind_gust_dir,
                wind_2min: m.wind_2min,
                wind_10min: m.wind_10min,
                rain: m.rain,
                rain_rate: m.rain_rate,
                uv_radiation: m.uv_radiation,
                solar_radiation: m.solar_radiation,
                et: m.et,
            };
            let Some(line) = csv_line(&row) else { continue };
            if tx.send(Ok(line)).await.is_err() {
                break;
            }
        }
    });

    let stream = ReceiverStream::new(rx);
    let body = axum::body::Body::from_stream(stream);

    Response::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// List weather archive records
///
/// Supports time-range filtering, paging, and CSV export via `format=csv`.
#[utoipa::path(
    get,
    path = "/api/archives",
    params(ArchivesQuery),
    responses(
        (status = 200, description = "Archives retrieved successfully", body = Vec<ArchiveResponse>),
        (status = 400, description = "Invalid query parameters"),
    ),
    tag = "archives"
)]
pub async fn list_archives(
    State(state): State<AppState>,
    Query(query): Query<ArchivesQuery>,
) -> AppResult<Response> {
    // Validate time range if both provided
    if let (Some(start), Some(end)) = (query.start, query.end) {
        if end <= start {
            return Err(AppError::BadRequest(
                "end time must be after start time".to_string(),
            ));
        }
    }

    let mut db_query = archives::Entity::find();

    if let Some(station_id) = query.station_id {
        db_query = db_query.filter(archives::Column::StationId.eq(station_id));
    }
    if let Some(site_id) = query.site_id {
        db_query = db_query.filter(archives::Column::SiteId.eq(site_id));
    }
    if let Some(start) = query.start {
        db_query = db_query.filter(archives::Column::Date.gte(start));
    }
    if let Some(end) = query.end {
        db_query = db_query.filter(archives::Column::Date.lte(end));
    }
    if let Some(limit) = query.limit {
        db_query = db_query.limit(limit);
    }
    if let Some(offset) = query.offset {
        db_query = db_query.offset(offset);
    }

    let archives_list = db_query
        .order_by_asc(archives::Column::Date)
        .all(&state.db)
        .await?;

    if query.format.eq_ignore_ascii_case("csv") {
        // Resolve site codes once; rows only carry the site UUID
        let site_codes: HashMap<Uuid, String> = sites::Entity::find()
            .all(&state.db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.code))
            .collect();
        return build_csv_response(archives_list, site_codes);
    }

    let response: Vec<ArchiveResponse> =
        archives_list.into_iter().map(archive_response).collect();
    Ok(Json(response).into_response())
}

/// Get a specific archive record by ID
#[utoipa::path(
    get,
    path = "/api/archives/{archive_id}",
    params(
        ("archive_id" = Uuid, Path, description = "Archive UUID"),
    ),
    responses(
        (status = 200, description = "Archive retrieved successfully", body = ArchiveDetailResponse),
        (status = 404, description = "Archive not found"),
    ),
    tag = "archives"
)]
pub async fn get_archive(
    State(state): State<AppState>,
    Path(archive_id): Path<Uuid>,
) -> AppResult<Json<ArchiveDetailResponse>> {
    let archive = find_archive(&state, archive_id).await?;
    let station = super::find_station(&state.db, archive.station_id).await?;
    let site = super::find_site(&state.db, archive.site_id).await?;

    let label = labels::archive(&site.code, archive.date.with_timezone(&Utc));

    Ok(Json(ArchiveDetailResponse {
        archive: archive_response(archive),
        station: StationRef {
            id: station.id,
            name: station.name,
        },
        site: SiteRef {
            id: site.id,
            code: site.code,
        },
        label,
    }))
}

/// Create a weather archive record
#[utoipa::path(
    post,
    path = "/api/archives",
    request_body = CreateArchivePayload,
    responses(
        (status = 201, description = "Archive created", body = ArchiveResponse),
        (status = 404, description = "Station or site not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "archives"
)]
pub async fn create_archive(
    State(state): State<AppState>,
    Json(payload): Json<CreateArchivePayload>,
) -> AppResult<(StatusCode, Json<ArchiveResponse>)> {
    payload.validate()?;
    super::find_station(&state.db, payload.station_id).await?;
    super::find_site(&state.db, payload.site_id).await?;

    let now = Utc::now();
    let archive = archives::ActiveModel {
        id: Set(Uuid::new_v4()),
        station_id: Set(payload.station_id),
        site_id: Set(payload.site_id),
        date: Set(payload.date.into()),
        interval_sec: Set(payload.interval_sec),
        units: Set(payload.units),
        temperature: Set(payload.temperature),
        temperature2: Set(payload.temperature2),
        humidity: Set(payload.humidity),
        dewpoint: Set(payload.dewpoint),
        windchill: Set(payload.windchill),
        heatindex: Set(payload.heatindex),
        pressure: Set(payload.pressure),
        wind_direction: Set(payload.wind_direction),
        wind: Set(payload.wind),
        wind_gust: Set(payload.wind_gust),
        wind_gust_dir: Set(payload.wind_gust_dir),
        wind_2min: Set(payload.wind_2min),
        wind_10min: Set(payload.wind_10min),
        rain: Set(payload.rain),
        rain_rate: Set(payload.rain_rate),
        uv_radiation: Set(payload.uv_radiation),
        solar_radiation: Set(payload.solar_radiation),
        et: Set(payload.et),
        created_at: Set(Some(now.into())),
    };

    let created = archive.insert(&state.db).await?;
    tracing::info!(id = %created.id, station_id = %created.station_id, "Created archive record");

    Ok((StatusCode::CREATED, Json(archive_response(created))))
}

/// Update a weather archive record (partial)
#[utoipa::path(
    put,
    path = "/api/archives/{archive_id}",
    params(
        ("archive_id" = Uuid, Path, description = "Archive UUID"),
    ),
    request_body = UpdateArchivePayload,
    responses(
        (status = 200, description = "Archive updated", body = ArchiveResponse),
        (status = 404, description = "Archive or referenced record not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "archives"
)]
pub async fn update_archive(
    State(state): State<AppState>,
    Path(archive_id): Path<Uuid>,
    Json(payload): Json<UpdateArchivePayload>,
) -> AppResult<Json<ArchiveResponse>> {
    payload.validate()?;

    if let Some(station_id) = payload.station_id {
        super::find_station(&state.db, station_id).await?;
    }
    if let Some(site_id) = payload.site_id {
        super::find_site(&state.db, site_id).await?;
    }

    let existing = find_archive(&state, archive_id).await?;
    let mut archive: archives::ActiveModel = existing.into();

    if let Some(station_id) = payload.station_id {
        archive.station_id = Set(station_id);
    }
    if let Some(site_id) = payload.site_id {
        archive.site_id = Set(site_id);
    }
    if let Some(date) = payload.date {
        archive.date = Set(date.into());
    }
    if let Some(interval_sec) = payload.interval_sec {
        archive.interval_sec = Set(interval_sec);
    }
    if let Some(units) = payload.units {
        archive.units = Set(units);
    }
    if let Some(temperature) = payload.temperature {
        archive.temperature = Set(temperature);
    }
    if let Some(temperature2) = payload.temperature2 {
        archive.temperature2 = Set(temperature2);
    }
    if let Some(humidity) = payload.humidity {
        archive.humidity = Set(humidity);
    }
    if let Some(dewpoint) = payload.dewpoint {
        archive.dewpoint = Set(dewpoint);
    }
    if let Some(windchill) = payload.windchill {
        archive.windchill = Set(windchill);
    }
    if let Some(heatindex) = payload.heatindex {
        archive.heatindex = Set(heatindex);
    }
    if let Some(pressure) = payload.pressure {
        archive.pressure = Set(pressure);
    }
    if let Some(wind_direction) = payload.wind_direction {
        archive.wind_direction = Set(wind_direction);
    }
    if let Some(wind) = payload.wind {
        archive.wind = Set(wind);
    }
    if let Some(wind_gust) = payload.wind_gust {
        archive.wind_gust = Set(wind_gust);
    }
    if let Some(wind_gust_dir) = payload.wind_gust_dir {
        archive.wind_gust_dir = Set(wind_gust_dir);
    }
    if let Some(wind_2min) = payload.wind_2min {
        archive.wind_2min = Set(wind_2min);
    }
    if let Some(wind_10min) = payload.wind_10min {
        archive.wind_10min = Set(wind_10min);
    }
    if let Some(rain) = payload.rain {
        archive.rain = Set(rain);
    }
    if let Some(rain_rate) = payload.rain_rate {
        archive.rain_rate = Set(rain_rate);
    }
    if let Some(uv_radiation) = payload.uv_radiation {
        archive.uv_radiation = Set(uv_radiation);
    }
    if let Some(solar_radiation) = payload.solar_radiation {
        archive.solar_radiation = Set(solar_radiation);
    }
    if let Some(et) = payload.et {
        archive.et = Set(et);
    }

    let updated = archive.update(&state.db).await?;
    Ok(Json(archive_response(updated)))
}

/// Delete a weather archive record
#[utoipa::path(
    delete,
    path = "/api/archives/{archive_id}",
    params(
        ("archive_id" = Uuid, Path, description = "Archive UUID"),
    ),
    responses(
        (status = 204, description = "Archive deleted"),
        (status = 404, description = "Archive not found"),
    ),
    tag = "archives"
)]
pub async fn delete_archive(
    State(state): State<AppState>,
    Path(archive_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let archive = find_archive(&state, archive_id).await?;

    archives::Entity::delete_by_id(archive.id)
        .exec(&state.db)
        .await?;
    tracing::info!(id = %archive.id, "Deleted archive record");

    Ok(StatusCode::NO_CONTENT)
}
