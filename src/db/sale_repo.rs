// src/db/sale_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PaginationParams},
    models::sale::{Sale, SaleItem, TopProductEntry},
};

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // A "casca" da venda: total zero, sem itens. As linhas e o total chegam
    // na mesma transação, via insert_item/update_total.
    pub async fn insert_sale<'e, E>(
        &self,
        executor: E,
        date: DateTime<Utc>,
        user_id: Uuid,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (date, total, user_id)
            VALUES ($1, 0, $2)
            RETURNING *
            "#,
        )
        .bind(date)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
        sub_total: Decimal,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, unit_price, sub_total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(sale_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(sub_total)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn update_total<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        total: Decimal,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            "UPDATE sales SET total = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(total)
        .fetch_one(executor)
        .await?;
        Ok(sale)
    }

    pub async fn find_all(&self, pagination: &PaginationParams) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT * FROM sales
            WHERE deleted_at IS NULL
            ORDER BY date DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        let maybe_sale =
            sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_sale)
    }

    pub async fn find_items(&self, sale_id: Uuid) -> Result<Vec<SaleItem>, AppError> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT * FROM sale_items
            WHERE sale_id = $1 AND deleted_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // Atualização de metadados apenas (data). Nunca recalcula estoque:
    // só a criação de linhas dispara efeitos no razão.
    pub async fn update_date(
        &self,
        id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<Option<Sale>, AppError> {
        let maybe_sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales SET date = $2, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_sale)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE sales SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Agregados do resumo (dashboard)
    // ---

    pub async fn total_revenue(&self) -> Result<Decimal, AppError> {
        let revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0) FROM sales WHERE deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(revenue)
    }

    pub async fn revenue_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        let revenue: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total), 0) FROM sales
            WHERE deleted_at IS NULL AND date >= $1 AND date <= $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(revenue)
    }

    pub async fn top_products(&self, limit: i64) -> Result<Vec<TopProductEntry>, AppError> {
        let entries = sqlx::query_as::<_, TopProductEntry>(
            r#"
            SELECT p.id AS product_id, p.name, SUM(si.quantity)::BIGINT AS quantity
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            JOIN products p ON p.id = si.product_id
            WHERE s.deleted_at IS NULL AND si.deleted_at IS NULL
            GROUP BY p.id, p.name
            ORDER BY SUM(si.quantity) DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
