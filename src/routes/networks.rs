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
use crate::entity::{networks, stations};
use crate::error::{AppError, AppResult};

use super::entities::EntityRef;

/// Brief network reference for embedding in responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NetworkRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NetworkResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
}

/// Detailed network response with owner info
#[derive(Debug, Serialize, ToSchema)]
pub struct NetworkDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner: EntityRef,
    pub label: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NetworksQuery {
    /// Filter by owning entity ID
    pub owner_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNetworkPayload {
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateNetworkPayload {
    pub owner_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
}

pub(crate) fn check_name(name: &str, max: usize) -> AppResult<()> {
    if name.is_empty() || name.len() > max {
        return Err(AppError::Validation(format!(
            "name must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// List all networks
#[utoipa::path(
    get,
    path = "/api/networks",
    params(NetworksQuery),
    responses(
        (status = 200, description = "Networks retrieved successfully", body = Vec<NetworkResponse>),
    ),
    tag = "networks"
)]
pub async fn list_networks(
    State(state): State<AppState>,
    Query(query): Query<NetworksQuery>,
) -> AppResult<Json<Vec<NetworkResponse>>> {
    let mut db_query = networks::Entity::find();

    if let Some(owner_id) = query.owner_id {
        db_query = db_query.filter(networks::Column::OwnerId.eq(owner_id));
    }

    let networks_list = db_query
        .order_by_asc(networks::Column::Name)
        .all(&state.db)
        .await?;

    let response: Vec<NetworkResponse> = networks_list
        .into_iter()
        .map(|n| NetworkResponse {
            id: n.id,
            owner_id: n.owner_id,
            name: n.name,
            description: n.description,
        })
        .collect();

    Ok(Json(response))
}

/// Get a specific network by ID
#[utoipa::path(
    get,
    path = "/api/networks/{network_id}",
    params(
        ("network_id" = Uuid, Path, description = "Network UUID"),
    ),
    responses(
        (status = 200, description = "Network retrieved successfully", body = NetworkDetailResponse),
        (status = 404, description = "Network not found"),
    ),
    tag = "networks"
)]
pub async fn get_network(
    State(state): State<AppState>,
    Path(network_id): Path<Uuid>,
) -> AppResult<Json<NetworkDetailResponse>> {
    let network = super::find_network(&state.db, network_id).await?;
    let owner = super::find_entity(&state.db, network.owner_id).await?;

    Ok(Json(NetworkDetailResponse {
        id: network.id,
        label: network.name.clone(),
        name: network.name,
        description: network.description,
        owner: EntityRef {
            id: owner.id,
            name: owner.name,
        },
    }))
}

/// Create a network
#[utoipa::path(
    post,
    path = "/api/networks",
    request_body = CreateNetworkPayload,
    responses(
        (status = 201, description = "Network created", body = NetworkResponse),
        (status = 404, description = "Owner not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "networks"
)]
pub async fn create_network(
    State(state): State<AppState>,
    Json(payload): Json<CreateNetworkPayload>,
) -> AppResult<(StatusCode, Json<NetworkResponse>)> {
    check_name(&payload.name, 100)?;
    super::find_entity(&state.db, payload.owner_id).await?;

    let now = Utc::now();
    let network = networks::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(payload.owner_id),
        name: Set(payload.name),
        description: Set(payload.description),
        created_at: Set(Some(now.into())),
        updated_at: Set(Some(now.into())),
    };

    let created = network.insert(&state.db).await?;
    tracing::info!(id = %created.id, name = %created.name, "Created network");

    Ok((
        StatusCode::CREATED,
        Json(NetworkResponse {
            id: created.id,
            owner_id: created.owner_id,
            name: created.name,
            description: created.description,
        }),
    ))
}

/// Update a network (partial)
#[utoipa::path(
    put,
    path = "/api/networks/{network_id}",
    params(
        ("network_id" = Uuid, Path, description = "Network UUID"),
    ),
    request_body = UpdateNetworkPayload,
    responses(
        (status = 200, description = "Network updated", body = NetworkResponse),
        (status = 404, description = "Network or owner not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "networks"
)]
pub async fn update_network(
    State(state): State<AppState>,
    Path(network_id): Path<Uuid>,
    Json(payload): Json<UpdateNetworkPayload>,
) -> AppResult<Json<NetworkResponse>> {
    if let Some(ref name) = payload.name {
        check_name(name, 100)?;
    }
    if let Some(owner_id) = payload.owner_id {
        super::find_entity(&state.db, owner_id).await?;
    }

    let existing = super::find_network(&state.db, network_id).await?;
    let mut network: networks::ActiveModel = existing.into();

    if let Some(owner_id) = payload.owner_id {
        network.owner_id = Set(owner_id);
    }
    if let Some(name) = payload.name {
        network.name = Set(name);
    }
    if let Some(description) = payload.description {
        network.description = Set(description);
    }
    network.updated_at = Set(Some(Utc::now().into()));

    let updated = network.update(&state.db).await?;
    Ok(Json(NetworkResponse {
        id: updated.id,
        owner_id: updated.owner_id,
        name: updated.name,
        description: updated.description,
    }))
}

/// Delete a network
#[utoipa::path(
    delete,
    path = "/api/networks/{network_id}",
    params(
        ("network_id" = Uuid, Path, description = "Network UUID"),
    ),
    responses(
        (status = 204, description = "Network deleted"),
        (status = 404, description = "Network not found"),
        (status = 409, description = "Network is still referenced"),
    ),
    tag = "networks"
)]
pub async fn delete_network(
    State(state): State<AppState>,
    Path(network_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let network = super::find_network(&state.db, network_id).await?;

    let stations_count = stations::Entity::find()
        .filter(stations::Column::NetworkId.eq(network.id))
        .count(&state.db)
        .await?;
    super::check_unreferenced(
        &format!("network '{}'", network.name),
        &[("station(s)", stations_count)],
    )?;

    networks::Entity::delete_by_id(network.id)
        .exec(&state.db)
        .await?;
    tracing::info!(id = %network.id, "Deleted network");

    Ok(StatusCode::NO_CONTENT)
}
