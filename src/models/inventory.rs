// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Tipo da movimentação: entrada (IN) soma no estoque, saída (OUT) subtrai.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_type", rename_all = "UPPERCASE")] // Banco
#[serde(rename_all = "UPPERCASE")] // JSON
pub enum MovementType {
    In,
    Out,
}

// Uma linha do razão de estoque. Imutável em espírito: "editar" uma
// movimentação é reverter o efeito antigo e aplicar o novo na mesma
// transação, e "remover" é reverter o efeito e marcar deleted_at.
// Nunca sobrescrevemos o efeito em silêncio.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub movement_type: MovementType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}
