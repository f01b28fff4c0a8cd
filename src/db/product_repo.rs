// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PaginationParams},
    models::product::{Product, ProductChanges},
};

// Repositório de produtos, responsável por todas as interações com a tabela
// 'products'. Leituras simples usam a pool; escritas e leituras com lock
// aceitam um executor genérico para rodarem dentro de uma transação.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, pagination: &PaginationParams) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE deleted_at IS NULL
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    // Busca por SKU, nome ou código de barras (parcial, sem case).
    pub async fn search(
        &self,
        query: &str,
        pagination: &PaginationParams,
    ) -> Result<Vec<Product>, AppError> {
        let pattern = format!("%{}%", query);
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE deleted_at IS NULL
              AND (sku ILIKE $1 OR name ILIKE $1 OR barcode ILIKE $1)
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn count_search(&self, query: &str) -> Result<i64, AppError> {
        let pattern = format!("%{}%", query);
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products
            WHERE deleted_at IS NULL
              AND (sku ILIKE $1 OR name ILIKE $1 OR barcode ILIKE $1)
            "#,
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    // Exclui soft-deletados: um produto removido não existe para o resto do sistema.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_product)
    }

    /// Carrega o produto COM LOCK DE LINHA (FOR UPDATE). Único caminho
    /// sancionado para ler o estoque antes de mutá-lo: o lock segura a linha
    /// até o commit/rollback da transação e impede o lost update de duas
    /// vendas concorrentes lendo o mesmo saldo.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_product)
    }

    pub async fn find_by_sku_or_barcode(
        &self,
        sku: &str,
        barcode: Option<&str>,
    ) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE deleted_at IS NULL AND (sku = $1 OR ($2::varchar IS NOT NULL AND barcode = $2))
            LIMIT 1
            "#,
        )
        .bind(sku)
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_product)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        image_url: Option<&str>,
        sku: &str,
        barcode: Option<&str>,
        is_active: bool,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, image_url, sku, barcode, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(image_url)
        .bind(sku)
        .bind(barcode)
        .bind(is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // A pré-checagem do serviço cobre o caminho comum; isto cobre a corrida.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("barcode") {
                        return AppError::BarcodeAlreadyExists;
                    }
                    return AppError::SkuAlreadyExists;
                }
            }
            e.into()
        })
    }

    // Atualização parcial de metadados. `stock` fica de fora: a projeção só
    // muda via update_stock, dentro de uma transação do razão.
    pub async fn update_changes(
        &self,
        id: Uuid,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                image_url = COALESCE($5, image_url),
                is_active = COALESCE($6, is_active),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.price)
        .bind(changes.image_url.as_deref())
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_product)
    }

    /// Persiste a projeção de estoque calculada pelo razão. Só deve ser
    /// chamada com a linha já travada pela mesma transação (FOR UPDATE).
    pub async fn update_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        stock: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE products SET stock = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(stock)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
