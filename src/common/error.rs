// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// A taxonomia segue as regras de negócio: validação, não-encontrado,
// estoque insuficiente, conflito e erro interno.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("A quantidade deve ser um inteiro maior ou igual a 1")]
    InvalidQuantity,

    #[error("Estoque insuficiente")]
    InsufficientStock,

    #[error("Produto com id {0} não encontrado")]
    ProductNotFound(Uuid),

    #[error("Movimentação de estoque com id {0} não encontrada")]
    MovementNotFound(Uuid),

    #[error("Venda com id {0} não encontrada")]
    SaleNotFound(Uuid),

    #[error("Usuário com id {0} não encontrado")]
    UserNotFound(Uuid),

    #[error("Já existe um produto com este SKU")]
    SkuAlreadyExists,

    #[error("Já existe um produto com este código de barras")]
    BarcodeAlreadyExists,

    #[error("Já existe um usuário com este {0}")]
    UserAlreadyExists(String),

    // Invariante do módulo de usuários: a loja nunca fica sem administrador.
    #[error("Não é possível remover ou rebaixar o último administrador")]
    LastAdministrator,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Conta de usuário inativa")]
    InactiveUser,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    // Variante para erros de banco de dados (lock timeout, conexão, etc).
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidQuantity | AppError::InsufficientStock => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }

            AppError::ProductNotFound(_)
            | AppError::MovementNotFound(_)
            | AppError::SaleNotFound(_)
            | AppError::UserNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::SkuAlreadyExists
            | AppError::BarcodeAlreadyExists
            | AppError::UserAlreadyExists(_)
            | AppError::LastAdministrator => (StatusCode::CONFLICT, self.to_string()),

            AppError::InvalidCredentials | AppError::InactiveUser | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),

            // JWT malformado/expirado vindo do decode também é 401.
            AppError::JwtError(_) => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou expirado.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError, Bcrypt) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe só o genérico.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_maps_to_bad_request() {
        let response = AppError::InsufficientStock.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_variants_map_to_404() {
        let id = Uuid::new_v4();
        assert_eq!(
            AppError::ProductNotFound(id).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MovementNotFound(id).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn conflict_variants_map_to_409() {
        assert_eq!(
            AppError::LastAdministrator.into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::SkuAlreadyExists.into_response().status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn database_error_is_opaque_500() {
        let response = AppError::DatabaseError(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
