// src/models/configuration.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Configuração da loja: linha única, criada no bootstrap se não existir.
// Não participa do núcleo transacional de estoque.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfiguration {
    pub id: i32,
    pub store_name: String,
    pub store_address: Option<String>,
    pub store_phone: Option<String>,
    pub store_email: Option<String>,
    pub store_currency: Option<String>,
    pub store_timezone: Option<String>,
    pub store_logo: Option<String>,
    pub store_favicon: Option<String>,
    pub store_language: Option<String>,
}
