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
use crate::entity::codes::EntityType;
use crate::entity::{entities, networks, sites, stations};
use crate::error::{AppError, AppResult};

/// Brief entity reference for embedding in responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntityResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub entity_type: String,
    pub entity_type_label: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub operator: String,
    pub label: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EntitiesQuery {
    /// Filter by entity type code (IN, OR, CO, PR)
    pub entity_type: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEntityPayload {
    pub name: String,
    pub description: String,
    pub entity_type: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub operator: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEntityPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub entity_type: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub operator: Option<String>,
}

pub(crate) fn check_email(email: &str) -> AppResult<()> {
    if email.contains('@') && !email.contains(char::is_whitespace) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("invalid email '{email}'")))
    }
}

pub(crate) fn check_entity_type(code: &str) -> AppResult<EntityType> {
    EntityType::parse(code)
        .ok_or_else(|| AppError::Validation(format!("invalid entity_type code '{code}'")))
}

impl CreateEntityPayload {
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a field fails its declared constraint.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.is_empty() || self.name.len() > 200 {
            return Err(AppError::Validation(
                "name must be 1-200 characters".to_string(),
            ));
        }
        check_entity_type(&self.entity_type)?;
        check_email(&self.email)?;
        if self.phone.len() > 16 {
            return Err(AppError::Validation(
                "phone must be at most 16 characters".to_string(),
            ));
        }
        if self.operator.is_empty() {
            return Err(AppError::Validation("operator must not be empty".to_string()));
        }
        Ok(())
    }
}

impl UpdateEntityPayload {
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a provided field fails its constraint.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref name) = self.name {
            if name.is_empty() || name.len() > 200 {
                return Err(AppError::Validation(
                    "name must be 1-200 characters".to_string(),
                ));
            }
        }
        if let Some(ref code) = self.entity_type {
            check_entity_type(code)?;
        }
        if let Some(ref email) = self.email {
            check_email(email)?;
        }
        if let Some(ref phone) = self.phone {
            if phone.len() > 16 {
                return Err(AppError::Validation(
                    "phone must be at most 16 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn entity_response(m: entities::Model) -> EntityResponse {
    let entity_type_label = EntityType::parse(&m.entity_type)
        .map(|t| t.label().to_string())
        .unwrap_or_default();
    EntityResponse {
        id: m.id,
        label: m.name.clone(),
        name: m.name,
        description: m.description,
        entity_type: m.entity_type,
        entity_type_label,
        email: m.email,
        phone: m.phone,
        address: m.address,
        operator: m.operator,
    }
}

/// List all owning entities
#[utoipa::path(
    get,
    path = "/api/entities",
    params(EntitiesQuery),
    responses(
        (status = 200, description = "Entities retrieved successfully", body = Vec<EntityResponse>),
    ),
    tag = "entities"
)]
pub async fn list_entities(
    State(state): State<AppState>,
    Query(query): Query<EntitiesQuery>,
) -> AppResult<Json<Vec<EntityResponse>>> {
    let mut db_query = entities::Entity::find();

    if let Some(ref code) = query.entity_type {
        check_entity_type(code)?;
        db_query = db_query.filter(entities::Column::EntityType.eq(code));
    }

    let entities_list = db_query
        .order_by_asc(entities::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(entities_list.into_iter().map(entity_response).collect()))
}

/// Get a specific entity by ID
#[utoipa::path(
    get,
    path = "/api/entities/{entity_id}",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
    ),
    responses(
        (status = 200, description = "Entity retrieved successfully", body = EntityResponse),
        (status = 404, description = "Entity not found"),
    ),
    tag = "entities"
)]
pub async fn get_entity(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
) -> AppResult<Json<EntityResponse>> {
    let entity = super::find_entity(&state.db, entity_id).await?;
    Ok(Json(entity_response(entity)))
}

/// Create an owning entity
#[utoipa::path(
    post,
    path = "/api/entities",
    request_body = CreateEntityPayload,
    responses(
        (status = 201, description = "Entity created", body = EntityResponse),
        (status = 422, description = "Validation failed"),
    ),
    tag = "entities"
)]
pub async fn create_entity(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntityPayload>,
) -> AppResult<(StatusCode, Json<EntityResponse>)> {
    payload.validate()?;

    let now = Utc::now();
    let entity = entities::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        entity_type: Set(payload.entity_type),
        email: Set(payload.email),
        phone: Set(payload.phone),
        address: Set(payload.address),
        operator: Set(payload.operator),
        created_at: Set(Some(now.into())),
        updated_at: Set(Some(now.into())),
    };

    let created = entity.insert(&state.db).await?;
    tracing::info!(id = %created.id, name = %created.name, "Created entity");

    Ok((StatusCode::CREATED, Json(entity_response(created))))
}

/// Update an owning entity (partial)
#[utoipa::path(
    put,
    path = "/api/entities/{entity_id}",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
    ),
    request_body = UpdateEntityPayload,
    responses(
        (status = 200, description = "Entity updated", body = EntityResponse),
        (status = 404, description = "Entity not found"),
        (status = 422, description = "Validation failed"),
    ),
    tag = "entities"
)]
pub async fn update_entity(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
    Json(payload): Json<UpdateEntityPayload>,
) -> AppResult<Json<EntityResponse>> {
    payload.validate()?;

    let existing = super::find_entity(&state.db, entity_id).await?;
    let mut entity: entities::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        entity.name = Set(name);
    }
    if let Some(description) = payload.description {
        entity.description = Set(description);
    }
    if let Some(entity_type) = payload.entity_type {
        entity.entity_type = Set(entity_type);
    }
    if let Some(email) = payload.email {
        entity.email = Set(email);
    }
    if let Some(phone) = payload.phone {
        entity.phone = Set(phone);
    }
    if let Some(address) = payload.address {
        entity.address = Set(address);
    }
    if let Some(operator) = payload.operator {
        entity.operator = Set(operator);
    }
    entity.updated_at = Set(Some(Utc::now().into()));

    let updated = entity.update(&state.db).await?;
    Ok(Json(entity_response(updated)))
}

/// Delete an owning entity
#[utoipa::path(
    delete,
    path = "/api/entities/{entity_id}",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
    ),
    responses(
        (status = 204, description = "Entity deleted"),
        (status = 404, description = "Entity not found"),
        (status = 409, description = "Entity is still referenced"),
    ),
    tag = "entities"
)]
pub async fn delete_entity(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let entity = super::find_entity(&state.db, entity_id).await?;

    let networks_count = networks::Entity::find()
        .filter(networks::Column::OwnerId.eq(entity.id))
        .count(&state.db)
        .await?;
    let sites_count = sites::Entity::find()
        .filter(sites::Column::OwnerId.eq(entity.id))
        .count(&state.db)
        .await?;
    let stations_count = stations::Entity::find()
        .filter(stations::Column::OwnerId.eq(entity.id))
        .count(&state.db)
        .await?;
    super::check_unreferenced(
        &format!("entity '{}'", entity.name),
        &[
            ("network(s)", networks_count),
            ("site(s)", sites_count),
            ("station(s)", stations_count),
        ],
    )?;

    entities::Entity::delete_by_id(entity.id)
        .exec(&state.db)
        .await?;
    tracing::info!(id = %entity.id, "Deleted entity");

    Ok(StatusCode::NO_CONTENT)
}
