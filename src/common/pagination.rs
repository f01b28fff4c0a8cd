// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: i64 = 10;

// Parâmetros de paginação padrão (?limit=10&offset=0) usados em todas as listagens.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.filter(|o| *o >= 0).unwrap_or(0)
    }
}

// Envelope de resposta paginada: itens + total + eco dos parâmetros.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: i64, params: &PaginationParams) -> Self {
        Self {
            items,
            total,
            limit: params.limit(),
            offset: params.offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_limit_10_offset_0() {
        let params = PaginationParams { limit: None, offset: None };
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn non_positive_values_fall_back_to_defaults() {
        let params = PaginationParams { limit: Some(0), offset: Some(-5) };
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn explicit_values_are_kept() {
        let params = PaginationParams { limit: Some(25), offset: Some(50) };
        let page = PaginatedResponse::new(vec![1, 2, 3], 100, &params);
        assert_eq!(page.limit, 25);
        assert_eq!(page.offset, 50);
        assert_eq!(page.total, 100);
    }
}
