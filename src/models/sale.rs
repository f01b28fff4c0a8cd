// src/models/sale.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    // Sempre igual à soma dos subtotais das linhas da venda.
    pub total: Decimal,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    // Preço unitário congelado no momento da venda. Mudanças posteriores no
    // catálogo não alteram vendas já registradas.
    pub unit_price: Decimal,
    pub sub_total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

// Venda com suas linhas, como retornada pelos endpoints de leitura e criação.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

// Indicadores agregados para o painel da loja.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: i64,
    pub total_revenue: Decimal,
    pub day_revenue: Decimal,
    pub average_ticket: Decimal,
    pub top_products: Vec<TopProductEntry>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i64,
}

/// Subtotal de uma linha: quantidade × preço unitário, arredondado para
/// 2 casas decimais. Recalculado sempre que quantidade ou preço mudam,
/// nunca lido de volta do banco para refazer a conta.
pub fn calculate_sub_total(unit_price: Decimal, quantity: i32) -> Decimal {
    (unit_price * Decimal::from(quantity)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn sub_total_is_quantity_times_unit_price() {
        assert_eq!(calculate_sub_total(dec("10.00"), 5), dec("50.00"));
    }

    #[test]
    fn sub_total_is_rounded_to_two_decimal_places() {
        let result = calculate_sub_total(dec("0.335"), 3);
        // 3 × 0.335 = 1.005; round_dp usa arredondamento bancário.
        assert_eq!(result, dec("1.00"));
        assert!(result.scale() <= 2);
    }

    #[test]
    fn sub_total_of_single_unit_is_the_unit_price() {
        assert_eq!(calculate_sub_total(dec("89.50"), 1), dec("89.50"));
    }
}
