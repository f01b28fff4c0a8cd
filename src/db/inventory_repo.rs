// src/db/inventory_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PaginationParams},
    models::inventory::{InventoryMovement, MovementType},
};

// Repositório do razão de movimentações (tabela 'inventory'). O razão é
// append-oriented: linhas nunca são apagadas de verdade, apenas marcadas
// com deleted_at depois que o efeito delas foi revertido na projeção.
#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(
        &self,
        pagination: &PaginationParams,
    ) -> Result<Vec<InventoryMovement>, AppError> {
        let movements = sqlx::query_as::<_, InventoryMovement>(
            r#"
            SELECT * FROM inventory
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryMovement>, AppError> {
        let maybe_movement = sqlx::query_as::<_, InventoryMovement>(
            "SELECT * FROM inventory WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_movement)
    }

    // Carrega a movimentação COM LOCK DE LINHA (FOR UPDATE), incluindo
    // soft-deletadas: o caminho de remoção precisa distinguir "não existe"
    // (404) de "já removida" (no-op). O lock serializa edições e remoções
    // concorrentes da mesma movimentação, e quem espera o lock enxerga os
    // valores da última versão commitada — nunca reverte valores obsoletos.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<InventoryMovement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_movement =
            sqlx::query_as::<_, InventoryMovement>("SELECT * FROM inventory WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(maybe_movement)
    }

    pub async fn insert_movement<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        movement_type: MovementType,
        quantity: i32,
        description: Option<&str>,
    ) -> Result<InventoryMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, InventoryMovement>(
            r#"
            INSERT INTO inventory (product_id, movement_type, quantity, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(movement_type)
        .bind(quantity)
        .bind(description)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    // Persiste os novos campos da movimentação. Quem chama já reverteu o
    // efeito antigo e aplicou o novo na projeção, na MESMA transação.
    pub async fn update_movement<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        movement_type: MovementType,
        quantity: i32,
        description: Option<&str>,
    ) -> Result<InventoryMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, InventoryMovement>(
            r#"
            UPDATE inventory SET
                movement_type = $2,
                quantity = $3,
                description = COALESCE($4, description),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(movement_type)
        .bind(quantity)
        .bind(description)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    pub async fn soft_delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE inventory SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Recalcula o saldo do razão para um produto: Σ(IN) − Σ(OUT) sobre as
    /// movimentações não removidas. Caminho de reconciliação/auditoria,
    /// fora do caminho quente.
    pub async fn ledger_balance<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(
                SUM(CASE WHEN movement_type = 'IN' THEN quantity ELSE -quantity END),
                0
            )::BIGINT
            FROM inventory
            WHERE product_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(product_id)
        .fetch_one(executor)
        .await?;
        Ok(balance)
    }
}
