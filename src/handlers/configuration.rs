// src/handlers/configuration.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::configuration::StoreConfiguration,
    services::configuration_service::ConfigurationChanges,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigurationPayload {
    #[validate(length(min = 1, message = "O nome da loja não pode ser vazio."))]
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub store_phone: Option<String>,
    #[validate(email(message = "E-mail inválido."))]
    pub store_email: Option<String>,
    pub store_currency: Option<String>,
    pub store_timezone: Option<String>,
    pub store_logo: Option<String>,
    pub store_favicon: Option<String>,
    pub store_language: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/configuration",
    tag = "Configuration",
    responses((status = 200, description = "Configuração atual da loja", body = StoreConfiguration)),
    security(("api_jwt" = []))
)]
pub async fn get_configuration(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let configuration = app_state.configuration_service.get().await?;
    Ok(Json(configuration))
}

#[utoipa::path(
    patch,
    path = "/api/configuration",
    tag = "Configuration",
    request_body = UpdateConfigurationPayload,
    responses((status = 200, description = "Configuração atualizada", body = StoreConfiguration)),
    security(("api_jwt" = []))
)]
pub async fn update_configuration(
    State(app_state): State<AppState>,
    Json(payload): Json<UpdateConfigurationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let changes = ConfigurationChanges {
        store_name: payload.store_name,
        store_address: payload.store_address,
        store_phone: payload.store_phone,
        store_email: payload.store_email,
        store_currency: payload.store_currency,
        store_timezone: payload.store_timezone,
        store_logo: payload.store_logo,
        store_favicon: payload.store_favicon,
        store_language: payload.store_language,
    };
    let configuration = app_state.configuration_service.update(&changes).await?;
    Ok(Json(configuration))
}
