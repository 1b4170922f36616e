use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::{archives, sites, stations};
use crate::error::{AppError, AppResult};

use super::entities::EntityRef;

/// Brief site reference for embedding in responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SiteRef {
    pub id: Uuid,
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SiteResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub code: String,
    pub description: String,
    pub address: String,
    pub postal_code: i32,
    pub town: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub altitude_m: i16,
}

/// Detailed site response with owner info
#[derive(Debug, Serialize, ToSchema)]
pub struct SiteDetailResponse {
    pub id: Uuid,
    pub code: String,
    pub description: String,
    pub address: String,
    pub postal_code: i32,
    pub town: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub altitude_m: i16,
    pub owner: EntityRef,
    pub label: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SitesQuery {
    /// Filter by owning entity ID
    pub owner_id: Option<Uuid>,
    /// Filter by town name
    pub town: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSitePayload {
    pub owner_id: Uuid,
    pub code: String,
    pub description: String,
    pub address: String,
    pub postal_code: i32,
    pub town: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub altitude_m: i16,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSitePayload {
    pub owner_id: Option<Uuid>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<i32>,
    pub town: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub altitude_m: Option<i16>,
}

pub(crate) fn check_code(code: &str) -> AppResult<()> {
    if code.is_empty() || code.len() > 10 {
        return Err(AppError::Validation(
            "code must be 1-10 characters".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_coordinates(latitude: Decimal, longitude: Decimal) -> AppResult<()> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err(AppError::Validation(format!(
            "latitude {latitude} out of range [-90, 90]"
        )));
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err(AppError::Validation(format!(
            "longitude {longitude} out of range [-180, 180]"
        )));
    }
    Ok(())
}

pub(crate) fn check_non_negative(value: i64, field: &str) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::Validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

impl CreateSitePayload {
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a field fails its declared constraint.
    pub fn validate(&self) -> AppResult<()> {
        check_code(&self.code)?;
        check_coordinates(self.latitude, self.longitude)?;
        check_non_negative(i64::from(self.postal_code), "postal_code")?;
        check_non_negative(i64::from(self.altitude_m), "altitude_m")?;
        if self.town.len() > 30 {
            return Err(AppError::Validation(
                "town must be at most 30 characters".to_string(),
            ));
        }
        Ok(())
    }
}

impl UpdateSitePayload {
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a provided field fails its constraint.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref code) = self.code {
            check_code(code)?;
        }
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            check_coordinates(latitude, longitude)?;
        } else if let Some(latitude) = self.latitude {
            check_coordinates(latitude, Decimal::ZERO)?;
        } else if let Some(longitude) = self.longitude {
            check_coordinates(Decimal::ZERO, longitude)?;
        }
        if let Some(postal_code) = self.postal_code {
            check_non_negative(i64::from(postal_code), "postal_code")?;
        }
        if let Some(altitude_m) = self.altitude_m {
            check_non_negative(i64::from(altitude_m), "altitude_m")?;
        }
        if let Some(ref town) = self.town {
            if town.len() > 30 {
                return Err(AppError::Validation(
                    "town must be at most 30 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Site codes are globally unique; the store is checked before insert so the
/// operator gets a validation failure rather than a bare constraint error.
async fn check_code_available(
    state: &AppState,
    code: &str,
    exclude: Option<Uuid>,
) -> AppResult<()> {
    let mut db_query = sites::Entity::find().filter(sites::Column::Code.eq(code));
    if let Some(id) = exclude {
        db_query = db_query.filter(sites::Column::Id.ne(id));
    }
    if db_query.one(&state.db).await?.is_some() {
        return Err(AppError::Validation(format!(
            "site code '{code}' already exists"
        )));
    }
    Ok(())
}

fn site_response(m: sites::Model) -> SiteResponse {
    SiteResponse {
        id: m.id,
        owner_id: m.owner_id,
        code: m.code,
        description: m.description,
        address: m.address,
        postal_code: m.postal_code,
        town: m.town,
        latitude: m.latitude,
        longitude: m.longitude,
        altitude_m: m.altitude_m,
    }
}

/// List all sites
#[utoipa::path(
    get,
    path = "/api/sites",
    params(SitesQuery),
    responses(
        (status = 200, description = "Sites retrieved successfully", body = Vec<SiteResponse>),
    ),
    tag = "sites"
)]
pub async fn list_sites(
    State(state): State<AppState>,
    Query(query): Query<SitesQuery>,
) -> AppResult<Json<Vec<SiteResponse>>> {
    let mut db_query = sites::Entity::find();

    if let Some(owner_id) = query.owner_id {
        db_query = db_query.filter(sites::Column::OwnerId.eq(owner_id));
    }
    if let Some(ref town) = query.town {
        db_query = db_query.filter(sites::Column::Town.eq(town));
    }

    let sites_list = db_query
        .order_by_asc(sites::Column::Code)
        .all(&state.db)
        .await?;

    Ok(Json(sites_list.into_iter().map(site_response).collect()))
}

/// Get a specific site by ID
#[utoipa::path(
    get,
    path = "/api/sites/{site_id}",
    params(
        ("site_id" = Uuid, Path, description = "Site UUID"),
    ),
    responses(
        (status = 200, description = "Site retrieved successfully", body = SiteDetailResponse),
        (status = 404, description = "Site not found"),
    ),
    tag = "sites"
)]
pub async fn get_site(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
) -> AppResult<Json<SiteDetailResponse>> {
    let site = super::find_site(&state.db, site_id).await?;
    let owner = super::find_entity(&state.db, site.owner_id).await?;

    Ok(Json(SiteDetailResponse {
        id: site.id,
        label: site.code.clone(),
        code: site.code,
        description: site.description,
        address: site.address,
        postal_code: site.postal_code,
        town: site.town,
        latitude: site.latitude,
        longitude: site.longitude,
        altitude_m: site.altitude_m,
        owner: EntityRef {
            id: owner.id,
            name: owner.name,
        },
    }))
}

/// Create a site
#[utoipa::path(
    post,
    path = "/api/sites",
    request_body = CreateSitePayload,
    responses(
        (status = 201, description = "Site created", body = SiteResponse),
        (status = 404, description = "Owner not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "sites"
)]
pub async fn create_site(
    State(state): State<AppState>,
    Json(payload): Json<CreateSitePayload>,
) -> AppResult<(StatusCode, Json<SiteResponse>)> {
    payload.validate()?;
    super::find_entity(&state.db, payload.owner_id).await?;
    check_code_available(&state, &payload.code, None).await?;

    let now = Utc::now();
    let site = sites::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(payload.owner_id),
        code: Set(payload.code),
        description: Set(payload.description),
        address: Set(payload.address),
        postal_code: Set(payload.postal_code),
        town: Set(payload.town),
        latitude: Set(payload.latitude),
        longitude: Set(payload.longitude),
        altitude_m: Set(payload.altitude_m),
        created_at: Set(Some(now.into())),
        updated_at: Set(Some(now.into())),
    };

    let created = site.insert(&state.db).await?;
    tracing::info!(id = %created.id, code = %created.code, "Created site");

    Ok((StatusCode::CREATED, Json(site_response(created))))
}

/// Update a site (partial)
#[utoipa::path(
    put,
    path = "/api/sites/{site_id}",
    params(
        ("site_id" = Uuid, Path, description = "Site UUID"),
    ),
    request_body = UpdateSitePayload,
    responses(
        (status = 200, description = "Site updated", body = SiteResponse),
        (status = 404, description = "Site or owner not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "sites"
)]
pub async fn update_site(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
    Json(payload): Json<UpdateSitePayload>,
) -> AppResult<Json<SiteResponse>> {
    payload.validate()?;

    let existing = super::find_site(&state.db, site_id).await?;

    if let Some(ref code) = payload.code {
        check_code_available(&state, code, Some(existing.id)).await?;
    }
    if let Some(owner_id) = payload.owner_id {
        super::find_entity(&state.db, owner_id).await?;
    }

    let mut site: sites::ActiveModel = existing.into();

    if let Some(owner_id) = payload.owner_id {
        site.owner_id = Set(owner_id);
    }
    if let Some(code) = payload.code {
        site.code = Set(code);
    }
    if let Some(description) = payload.description {
        site.description = Set(description);
    }
    if let Some(address) = payload.address {
        site.address = Set(address);
    }
    if let Some(postal_code) = payload.postal_code {
        site.postal_code = Set(postal_code);
    }
    if let Some(town) = payload.town {
        site.town = Set(town);
    }
    if let Some(latitude) = payload.latitude {
        site.latitude = Set(latitude);
    }
    if let Some(longitude) = payload.longitude {
        site.longitude = Set(longitude);
    }
    if let Some(altitude_m) = payload.altitude_m {
        site.altitude_m = Set(altitude_m);
    }
    site.updated_at = Set(Some(Utc::now().into()));

    let updated = site.update(&state.db).await?;
    Ok(Json(site_response(updated)))
}

/// Delete a site
#[utoipa::path(
    delete,
    path = "/api/sites/{site_id}",
    params(
        ("site_id" = Uuid, Path, description = "Site UUID"),
    ),
    responses(
        (status = 204, description = "Site deleted"),
        (status = 404, description = "Site not found"),
        (status = 409, description = "Site is still referenced"),
    ),
    tag = "sites"
)]
pub async fn delete_site(
    State(state): State<AppState>,
    Path(site_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let site = super::find_site(&state.db, site_id).await?;

    let stations_count = stations::Entity::find()
        .filter(stations::Column::SiteId.eq(site.id))
        .count(&state.db)
        .await?;
    let archives_count = archives::Entity::find()
        .filter(archives::Column::SiteId.eq(site.id))
        .count(&state.db)
        .await?;
    super::check_unreferenced(
        &format!("site '{}'", site.code),
        &[
            ("station(s)", stations_count),
            ("archive(s)", archives_count),
        ],
    )?;

    sites::Entity::delete_by_id(site.id).exec(&state.db).await?;
    tracing::info!(id = %site.id, code = %site.code, "Deleted site");

    Ok(StatusCode::NO_CONTENT)
}
