use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::AppState;
use crate::entity::{brands, instrument_models, station_models};
use crate::error::AppResult;

use super::networks::check_name;

/// Brief brand reference for embedding in responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrandRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BrandResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBrandPayload {
    pub name: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBrandPayload {
    pub name: Option<String>,
}

/// List all brands
#[utoipa::path(
    get,
    path = "/api/brands",
    responses(
        (status = 200, description = "Brands retrieved successfully", body = Vec<BrandResponse>),
    ),
    tag = "catalog"
)]
pub async fn list_brands(State(state): State<AppState>) -> AppResult<Json<Vec<BrandResponse>>> {
    let brands_list = brands::Entity::find()
        .order_by_asc(brands::Column::Name)
        .all(&state.db)
        .await?;

    let response: Vec<BrandResponse> = brands_list
        .into_iter()
        .map(|b| BrandResponse {
            id: b.id,
            name: b.name,
        })
        .collect();

    Ok(Json(response))
}

/// Get a specific brand by ID
#[utoipa::path(
    get,
    path = "/api/brands/{brand_id}",
    params(
        ("brand_id" = Uuid, Path, description = "Brand UUID"),
    ),
    responses(
        (status = 200, description = "Brand retrieved successfully", body = BrandResponse),
        (status = 404, description = "Brand not found"),
    ),
    tag = "catalog"
)]
pub async fn get_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<Uuid>,
) -> AppResult<Json<BrandResponse>> {
    let brand = super::find_brand(&state.db, brand_id).await?;
    Ok(Json(BrandResponse {
        id: brand.id,
        name: brand.name,
    }))
}

/// Create a brand
#[utoipa::path(
    post,
    path = "/api/brands",
    request_body = CreateBrandPayload,
    responses(
        (status = 201, description = "Brand created", body = BrandResponse),
        (status = 422, description = "Validation failed"),
    ),
    tag = "catalog"
)]
pub async fn create_brand(
    State(state): State<AppState>,
    Json(payload): Json<CreateBrandPayload>,
) -> AppResult<(StatusCode, Json<BrandResponse>)> {
    check_name(&payload.name, 30)?;

    let now = Utc::now();
    let brand = brands::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        created_at: Set(Some(now.into())),
        updated_at: Set(Some(now.into())),
    };

    let created = brand.insert(&state.db).await?;
    tracing::info!(id = %created.id, name = %created.name, "Created brand");

    Ok((
        StatusCode::CREATED,
        Json(BrandResponse {
            id: created.id,
            name: created.name,
        }),
    ))
}

/// Update a brand (partial)
#[utoipa::path(
    put,
    path = "/api/brands/{brand_id}",
    params(
        ("brand_id" = Uuid, Path, description = "Brand UUID"),
    ),
    request_body = UpdateBrandPayload,
    responses(
        (status = 200, description = "Brand updated", body = BrandResponse),
        (status = 404, description = "Brand not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "catalog"
)]
pub async fn update_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<Uuid>,
    Json(payload): Json<UpdateBrandPayload>,
) -> AppResult<Json<BrandResponse>> {
    if let Some(ref name) = payload.name {
        check_name(name, 30)?;
    }

    let existing = super::find_brand(&state.db, brand_id).await?;
    let mut brand: brands::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        brand.name = Set(name);
    }
    brand.updated_at = Set(Some(Utc::now().into()));

    let updated = brand.update(&state.db).await?;
    Ok(Json(BrandResponse {
        id: updated.id,
        name: updated.name,
    }))
}

/// Delete a brand
///
/// Fails while any instrument or station model still references it.
#[utoipa::path(
    delete,
    path = "/api/brands/{brand_id}",
    params(
        ("brand_id" = Uuid, Path, description = "Brand UUID"),
    ),
    responses(
        (status = 204, description = "Brand deleted"),
        (status = 404, description = "Brand not found"),
        (status = 409, description = "Brand is still referenced"),
    ),
    tag = "catalog"
)]
pub async fn delete_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let brand = super::find_brand(&state.db, brand_id).await?;

    let instrument_count = instrument_models::Entity::find()
        .filter(instrument_models::Column::BrandId.eq(brand.id))
        .count(&state.db)
        .await?;
    let station_model_count = station_models::Entity::find()
        .filter(station_models::Column::BrandId.eq(brand.id))
        .count(&state.db)
        .await?;
    super::check_unreferenced(
        &format!("brand '{}'", brand.name),
        &[
            ("instrument model(s)", instrument_count),
            ("station model(s)", station_model_count),
        ],
    )?;

    brands::Entity::delete_by_id(brand.id)
        .exec(&state.db)
        .await?;
    tracing::info!(id = %brand.id, "Deleted brand");

    Ok(StatusCode::NO_CONTENT)
}
