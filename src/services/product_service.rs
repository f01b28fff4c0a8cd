// src/services/product_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{PaginatedResponse, PaginationParams},
    },
    db::ProductRepository,
    models::product::{Product, ProductChanges},
};

// Catálogo de produtos. Colaborador externo do núcleo de estoque: cria e
// edita metadados, mas NUNCA toca em `stock` — isso é exclusivo do razão.
#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, pool: PgPool) -> Self {
        Self { product_repo, pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        image_url: Option<&str>,
        sku: &str,
        barcode: Option<&str>,
        is_active: bool,
    ) -> Result<Product, AppError> {
        // Pré-checagem amigável; a constraint UNIQUE cobre a corrida.
        if let Some(existing) = self.product_repo.find_by_sku_or_barcode(sku, barcode).await? {
            if existing.sku == sku {
                return Err(AppError::SkuAlreadyExists);
            }
            return Err(AppError::BarcodeAlreadyExists);
        }

        let product = self
            .product_repo
            .insert(&self.pool, name, description, price, image_url, sku, barcode, is_active)
            .await?;

        tracing::info!("📦 Produto criado: {} ({})", product.name, product.sku);
        Ok(product)
    }

    pub async fn find_all(
        &self,
        pagination: &PaginationParams,
    ) -> Result<PaginatedResponse<Product>, AppError> {
        let products = self.product_repo.find_all(pagination).await?;
        let total = self.product_repo.count_all().await?;
        Ok(PaginatedResponse::new(products, total, pagination))
    }

    pub async fn search(
        &self,
        query: &str,
        pagination: &PaginationParams,
    ) -> Result<PaginatedResponse<Product>, AppError> {
        let products = self.product_repo.search(query, pagination).await?;
        let total = self.product_repo.count_search(query).await?;
        Ok(PaginatedResponse::new(products, total, pagination))
    }

    pub async fn find_one(&self, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ProductNotFound(id))
    }

    pub async fn update(&self, id: Uuid, changes: &ProductChanges) -> Result<Product, AppError> {
        self.product_repo
            .update_changes(id, changes)
            .await?
            .ok_or(AppError::ProductNotFound(id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let affected = self.product_repo.soft_delete(id).await?;
        if affected == 0 {
            return Err(AppError::ProductNotFound(id));
        }
        Ok(())
    }
}
