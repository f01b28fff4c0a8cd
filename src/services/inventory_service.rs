// src/services/inventory_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{PaginatedResponse, PaginationParams},
    },
    db::{InventoryRepository, ProductRepository},
    models::inventory::{InventoryMovement, MovementType},
    services::stock,
};

// Serviço do razão de estoque. Toda operação que muda a projeção `stock`
// roda aqui dentro de UMA transação: trava a linha do produto (FOR UPDATE),
// aplica/reverte o efeito via `stock`, e persiste produto + movimentação
// juntos. Qualquer falha no meio descarta tudo.
#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    product_repo: ProductRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(
        inventory_repo: InventoryRepository,
        product_repo: ProductRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            inventory_repo,
            product_repo,
            pool,
        }
    }

    /// Registra uma movimentação manual (entrada de fornecedor, ajuste, etc)
    /// e aplica o efeito dela no estoque, atomicamente.
    pub async fn create_movement(
        &self,
        product_id: Uuid,
        movement_type: MovementType,
        quantity: i32,
        description: Option<&str>,
    ) -> Result<InventoryMovement, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Trava a linha do produto até o fim da transação.
        let mut product = self
            .product_repo
            .find_by_id_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        // 2. Aplica o efeito na projeção (valida quantidade e estoque).
        stock::apply(&mut product, movement_type, quantity)?;

        // 3. Persiste projeção + linha do razão juntos.
        self.product_repo
            .update_stock(&mut *tx, product.id, product.stock)
            .await?;
        let movement = self
            .inventory_repo
            .insert_movement(&mut *tx, product.id, movement_type, quantity, description)
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    /// Edita uma movimentação: reverte o efeito antigo e aplica o novo na
    /// MESMA transação. Se a validação ou a reaplicação falhar, nada é
    /// commitado — nunca fica observável o estado "revertido mas não
    /// reaplicado".
    pub async fn update_movement(
        &self,
        id: Uuid,
        new_type: MovementType,
        new_quantity: i32,
        new_description: Option<&str>,
    ) -> Result<InventoryMovement, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a movimentação ANTES de ler os valores antigos: uma edição
        // concorrente da mesma movimentação espera aqui, e ao acordar lê os
        // valores que a outra transação commitou — o revert usa sempre o
        // efeito vigente, nunca um snapshot obsoleto.
        let original = self
            .inventory_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .filter(|m| m.deleted_at.is_none())
            .ok_or(AppError::MovementNotFound(id))?;

        let mut product = self
            .product_repo
            .find_by_id_for_update(&mut *tx, original.product_id)
            .await?
            .ok_or(AppError::ProductNotFound(original.product_id))?;

        // 1. Desfaz o efeito registrado.
        stock::revert(&mut product, original.movement_type, original.quantity);

        // 2. Aplica o novo efeito. InvalidQuantity/InsufficientStock abortam
        //    a transação inteira (o `?` derruba o tx via Drop → rollback),
        //    deixando movimentação e estoque originais intactos.
        stock::apply(&mut product, new_type, new_quantity)?;

        // 3. Persiste produto e movimentação juntos.
        self.product_repo
            .update_stock(&mut *tx, product.id, product.stock)
            .await?;
        let updated = self
            .inventory_repo
            .update_movement(&mut *tx, id, new_type, new_quantity, new_description)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Remove (soft delete) uma movimentação, revertendo o efeito dela no
    /// estoque na mesma transação. Remover algo já removido é no-op: o
    /// efeito nunca é revertido duas vezes.
    pub async fn remove_movement(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // O lock serializa remoções concorrentes: a segunda só lê a linha
        // depois do commit da primeira, e então vê deleted_at preenchido.
        let movement = self
            .inventory_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::MovementNotFound(id))?;

        if movement.deleted_at.is_some() {
            // Já removida: efeito já foi revertido quando foi removida.
            return Ok(());
        }

        let mut product = self
            .product_repo
            .find_by_id_for_update(&mut *tx, movement.product_id)
            .await?
            .ok_or(AppError::ProductNotFound(movement.product_id))?;

        stock::revert(&mut product, movement.movement_type, movement.quantity);

        self.product_repo
            .update_stock(&mut *tx, product.id, product.stock)
            .await?;
        let affected = self.inventory_repo.soft_delete(&mut *tx, id).await?;
        if affected == 0 {
            // Outra transação removeu primeiro; descartar o tx desfaz o revert.
            return Ok(());
        }

        tx.commit().await?;
        Ok(())
    }

    /// Reconciliação explícita: recalcula a projeção `stock` a partir do
    /// razão completo (Σ entradas − Σ saídas não removidas). Caminho de
    /// auditoria/reparo, nunca chamado pelo fluxo normal.
    pub async fn recount_stock(&self, product_id: Uuid) -> Result<i32, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .product_repo
            .find_by_id_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        let balance = self
            .inventory_repo
            .ledger_balance(&mut *tx, product.id)
            .await?;
        let recounted = i32::try_from(balance)
            .map_err(|_| anyhow::anyhow!("Saldo do razão fora do intervalo de i32"))?;

        if recounted != product.stock {
            tracing::warn!(
                "Projeção divergente para o produto {}: stock={}, razão={}",
                product.id,
                product.stock,
                recounted
            );
        }

        self.product_repo
            .update_stock(&mut *tx, product.id, recounted)
            .await?;

        tx.commit().await?;
        Ok(recounted)
    }

    pub async fn find_all(
        &self,
        pagination: &PaginationParams,
    ) -> Result<PaginatedResponse<InventoryMovement>, AppError> {
        let movements = self.inventory_repo.find_all(pagination).await?;
        let total = self.inventory_repo.count_all().await?;
        Ok(PaginatedResponse::new(movements, total, pagination))
    }

    pub async fn find_one(&self, id: Uuid) -> Result<InventoryMovement, AppError> {
        self.inventory_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::MovementNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn service(pool: &PgPool) -> InventoryService {
        InventoryService::new(
            InventoryRepository::new(pool.clone()),
            ProductRepository::new(pool.clone()),
            pool.clone(),
        )
    }

    async fn seed_product(pool: &PgPool, stock: i32) -> Uuid {
        let repo = ProductRepository::new(pool.clone());
        let product = repo
            .insert(
                pool,
                "Café moído 250g",
                None,
                Decimal::new(1000, 2),
                None,
                "CAF-COL-250",
                None,
                true,
            )
            .await
            .unwrap();
        repo.update_stock(pool, product.id, stock).await.unwrap();
        product.id
    }

    async fn stock_of(pool: &PgPool, id: Uuid) -> i32 {
        ProductRepository::new(pool.clone())
            .find_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    // Duas edições concorrentes da mesma movimentação: o lock na linha da
    // movimentação força a segunda a reverter os valores que a primeira
    // commitou, então a projeção sempre termina igual a base + versão final.
    #[sqlx::test]
    async fn concurrent_updates_of_one_movement_keep_projection_on_ledger(pool: PgPool) {
        let service = service(&pool);
        let product_id = seed_product(&pool, 10).await;
        let movement = service
            .create_movement(product_id, MovementType::In, 5, None)
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product_id).await, 15);

        let (first, second) = tokio::join!(
            service.update_movement(movement.id, MovementType::In, 2, None),
            service.update_movement(movement.id, MovementType::In, 3, None),
        );
        first.unwrap();
        second.unwrap();

        let stored = service.find_one(movement.id).await.unwrap();
        assert_eq!(stock_of(&pool, product_id).await, 10 + stored.quantity);
    }

    #[sqlx::test]
    async fn concurrent_removals_revert_the_effect_exactly_once(pool: PgPool) {
        let service = service(&pool);
        let product_id = seed_product(&pool, 10).await;
        let movement = service
            .create_movement(product_id, MovementType::In, 5, None)
            .await
            .unwrap();
        assert_eq!(stock_of(&pool, product_id).await, 15);

        let (first, second) = tokio::join!(
            service.remove_movement(movement.id),
            service.remove_movement(movement.id),
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(stock_of(&pool, product_id).await, 10);
    }

    #[sqlx::test]
    async fn removing_an_already_removed_movement_is_a_noop(pool: PgPool) {
        let service = service(&pool);
        let product_id = seed_product(&pool, 10).await;
        let movement = service
            .create_movement(product_id, MovementType::In, 5, None)
            .await
            .unwrap();

        service.remove_movement(movement.id).await.unwrap();
        assert_eq!(stock_of(&pool, product_id).await, 10);

        service.remove_movement(movement.id).await.unwrap();
        assert_eq!(stock_of(&pool, product_id).await, 10);
    }
}
