// src/handlers/sales.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::PaginationParams},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::sale::{Sale, SaleWithItems, SalesSummary},
    services::sale_service::SaleLine,
};

// Serialize além de Deserialize: a validação de comprimento da lista
// serializa o item ao montar os parâmetros do erro.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleItemPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser no mínimo 1."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub date: DateTime<Utc>,

    #[validate(length(min = 1, message = "A venda precisa de ao menos um item."))]
    #[validate(nested)]
    pub items: Vec<CreateSaleItemPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalePayload {
    pub date: DateTime<Utc>,
}

#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda registrada com todas as linhas", body = SaleWithItems),
        (status = 400, description = "Estoque insuficiente em alguma linha — nada é registrado"),
        (status = 404, description = "Produto ou usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lines: Vec<SaleLine> = payload
        .items
        .iter()
        .map(|item| SaleLine {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();

    let sale = app_state
        .sale_service
        .create_sale(user.0.id, payload.date, &lines)
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    params(PaginationParams),
    responses((status = 200, description = "Listagem paginada de vendas")),
    security(("api_jwt" = []))
)]
pub async fn get_all_sales(
    State(app_state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state.sale_service.find_all(&pagination).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/sales/summary",
    tag = "Sales",
    responses((status = 200, description = "Indicadores agregados de vendas", body = SalesSummary)),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.sale_service.summary().await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com seus itens", body = SaleWithItems),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.find_one(id).await?;
    Ok(Json(sale))
}

// Edição de metadados apenas. Não re-executa lógica de estoque.
#[utoipa::path(
    patch,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    request_body = UpdateSalePayload,
    responses(
        (status = 200, description = "Metadados da venda atualizados", body = Sale),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sale = app_state.sale_service.update_date(id, payload.date).await?;
    Ok(Json(sale))
}

#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 204, description = "Venda removida (soft delete, estoque intacto)"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sale_service.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_payload_without_items_fails_validation() {
        let payload = CreateSalePayload {
            date: Utc::now(),
            items: vec![],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn sale_payload_with_valid_line_passes_validation() {
        let payload = CreateSalePayload {
            date: Utc::now(),
            items: vec![CreateSaleItemPayload {
                product_id: Uuid::new_v4(),
                quantity: 2,
            }],
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn sale_line_with_zero_quantity_fails_nested_validation() {
        let payload = CreateSalePayload {
            date: Utc::now(),
            items: vec![CreateSaleItemPayload {
                product_id: Uuid::new_v4(),
                quantity: 0,
            }],
        };
        assert!(payload.validate().is_err());
    }
}
