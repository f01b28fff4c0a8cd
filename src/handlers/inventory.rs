// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::PaginationParams},
    config::AppState,
    models::inventory::{InventoryMovement, MovementType},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,

    pub movement_type: MovementType,

    pub description: Option<String>,
}

// Editar uma movimentação exige tipo e quantidade novos: o motor reverte o
// efeito antigo e aplica o novo, então não faz sentido "editar só a descrição
// pela metade" — a descrição é o único campo realmente opcional.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovementPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,

    pub movement_type: MovementType,

    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/inventory",
    tag = "Inventory",
    request_body = CreateMovementPayload,
    responses(
        (status = 201, description = "Movimentação registrada e estoque atualizado", body = InventoryMovement),
        (status = 400, description = "Quantidade inválida ou estoque insuficiente"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_movement(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateMovementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let movement = app_state
        .inventory_service
        .create_movement(
            payload.product_id,
            payload.movement_type,
            payload.quantity,
            payload.description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}

#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = "Inventory",
    params(PaginationParams),
    responses((status = 200, description = "Listagem paginada de movimentações")),
    security(("api_jwt" = []))
)]
pub async fn get_all_movements(
    State(app_state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.inventory_service.find_all(&pagination).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    responses(
        (status = 200, description = "Movimentação encontrada", body = InventoryMovement),
        (status = 404, description = "Movimentação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_movement(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let movement = app_state.inventory_service.find_one(id).await?;
    Ok(Json(movement))
}

#[utoipa::path(
    patch,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    request_body = UpdateMovementPayload,
    responses(
        (status = 200, description = "Movimentação editada (efeito antigo revertido, novo aplicado)", body = InventoryMovement),
        (status = 400, description = "Quantidade inválida ou estoque insuficiente"),
        (status = 404, description = "Movimentação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_movement(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let movement = app_state
        .inventory_service
        .update_movement(
            id,
            payload.movement_type,
            payload.quantity,
            payload.description.as_deref(),
        )
        .await?;

    Ok(Json(movement))
}

#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    responses(
        (status = 204, description = "Movimentação removida e efeito revertido"),
        (status = 404, description = "Movimentação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_movement(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.remove_movement(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
