// src/handlers/users.rs
//
// CRUD de usuários. Todas as rotas exigem o extractor RequireAdmin.

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
    middleware::auth::RequireAdmin,
    models::auth::{Role, User},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(length(min = 3, message = "O username precisa de ao menos 3 caracteres."))]
    pub username: String,

    #[validate(email(message = "E-mail inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha precisa de ao menos 6 caracteres."))]
    pub password: String,

    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub name: Option<String>,

    #[validate(email(message = "E-mail inválido."))]
    pub email: Option<String>,

    pub role: Option<Role>,

    pub is_active: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 403, description = "Requer perfil de administrador"),
        (status = 409, description = "E-mail ou username já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .create(
            &payload.name,
            &payload.username,
            &payload.email,
            &payload.password,
            payload.role,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(PaginationParams),
    responses(
        (status = 200, description = "Listagem paginada de usuários"),
        (status = 403, description = "Requer perfil de administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_all_users(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.user_service.find_all(&pagination).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário encontrado", body = User),
        (status = 403, description = "Requer perfil de administrador"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.find_one(id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 403, description = "Requer perfil de administrador"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "Operação deixaria o sistema sem administrador ativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .update(
            id,
            payload.name.as_deref(),
            payload.email.as_deref(),
            payload.role,
            payload.is_active,
        )
        .await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 403, description = "Requer perfil de administrador"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "Operação deixaria o sistema sem administrador ativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
