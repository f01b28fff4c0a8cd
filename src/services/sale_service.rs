// src/services/sale_service.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        pagination::{PaginatedResponse, PaginationParams},
    },
    db::{InventoryRepository, ProductRepository, SaleRepository, UserRepository},
    models::{
        inventory::MovementType,
        sale::{SaleWithItems, SalesSummary, calculate_sub_total},
    },
};

// Uma linha do pedido de venda, já validada pelo handler.
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

// Coordenador da venda. A criação é UMA unidade de trabalho: usuário,
// casca da venda, e por linha — produto travado, saída aplicada no razão,
// item persistido — tudo commitado junto ou nada commitado.
#[derive(Clone)]
pub struct SaleService {
    sale_repo: SaleRepository,
    product_repo: ProductRepository,
    inventory_repo: InventoryRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl SaleService {
    pub fn new(
        sale_repo: SaleRepository,
        product_repo: ProductRepository,
        inventory_repo: InventoryRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            sale_repo,
            product_repo,
            inventory_repo,
            user_repo,
            pool,
        }
    }

    /// Cria uma venda com N linhas de forma atômica.
    ///
    /// As linhas são processadas NA ORDEM do pedido, fail-fast: a primeira
    /// linha sem estoque aborta a venda inteira — sem atendimento parcial e
    /// sem reordenar linhas para "caber". Linhas repetidas do mesmo produto
    /// enxergam o estoque de trabalho já decrementado pelas anteriores,
    /// porque o lock FOR UPDATE e o update de stock acontecem na mesma
    /// transação.
    pub async fn create_sale(
        &self,
        actor_user_id: Uuid,
        date: DateTime<Utc>,
        lines: &[SaleLine],
    ) -> Result<SaleWithItems, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Resolve o usuário que registra a venda.
        let user = self
            .user_repo
            .find_by_id(actor_user_id)
            .await?
            .ok_or(AppError::UserNotFound(actor_user_id))?;

        // 2. Casca da venda: total 0, sem itens.
        let sale = self.sale_repo.insert_sale(&mut *tx, date, user.id).await?;

        let mut total = Decimal::ZERO;
        let mut items = Vec::with_capacity(lines.len());

        // 3. Uma linha por vez, na ordem do pedido.
        for line in lines {
            // Trava a linha do produto; soft-deletado = não encontrado.
            let mut product = self
                .product_repo
                .find_by_id_for_update(&mut *tx, line.product_id)
                .await?
                .ok_or(AppError::ProductNotFound(line.product_id))?;

            // Congela o preço do momento da venda.
            let unit_price = product.price;

            // Saída no razão. InsufficientStock aborta a transação inteira
            // (o `?` descarta o tx → rollback de tudo que foi feito acima).
            crate::services::stock::apply(&mut product, MovementType::Out, line.quantity)?;

            self.product_repo
                .update_stock(&mut *tx, product.id, product.stock)
                .await?;

            let description = format!("Venda {}", sale.id);
            self.inventory_repo
                .insert_movement(
                    &mut *tx,
                    product.id,
                    MovementType::Out,
                    line.quantity,
                    Some(&description),
                )
                .await?;

            let sub_total = calculate_sub_total(unit_price, line.quantity);
            let item = self
                .sale_repo
                .insert_item(
                    &mut *tx,
                    sale.id,
                    product.id,
                    line.quantity,
                    unit_price,
                    sub_total,
                )
                .await?;

            total += sub_total;
            items.push(item);
        }

        // 4. Total = soma dos subtotais, sempre.
        let sale = self.sale_repo.update_total(&mut *tx, sale.id, total).await?;

        // 5. Só aqui a venda, os itens, as movimentações e os estoques
        //    mutados se tornam visíveis, todos de uma vez.
        tx.commit().await?;

        tracing::info!("🧾 Venda {} registrada com {} item(ns)", sale.id, items.len());
        Ok(SaleWithItems { sale, items })
    }

    pub async fn find_all(
        &self,
        pagination: &PaginationParams,
    ) -> Result<PaginatedResponse<crate::models::sale::Sale>, AppError> {
        let sales = self.sale_repo.find_all(pagination).await?;
        let total = self.sale_repo.count_all().await?;
        Ok(PaginatedResponse::new(sales, total, pagination))
    }

    pub async fn find_one(&self, id: Uuid) -> Result<SaleWithItems, AppError> {
        let sale = self
            .sale_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::SaleNotFound(id))?;
        let items = self.sale_repo.find_items(id).await?;
        Ok(SaleWithItems { sale, items })
    }

    // Edita apenas metadados (data). Não re-executa nenhuma lógica de
    // estoque: só a criação de linhas dispara efeitos no razão.
    pub async fn update_date(
        &self,
        id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<crate::models::sale::Sale, AppError> {
        self.sale_repo
            .update_date(id, date)
            .await?
            .ok_or(AppError::SaleNotFound(id))
    }

    // Soft delete da venda. Também não mexe no estoque.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let affected = self.sale_repo.soft_delete(id).await?;
        if affected == 0 {
            return Err(AppError::SaleNotFound(id));
        }
        Ok(())
    }

    pub async fn summary(&self) -> Result<SalesSummary, AppError> {
        let total_sales = self.sale_repo.count_all().await?;
        let total_revenue = self.sale_repo.total_revenue().await?;

        // Janela do dia corrente em UTC.
        let start = Utc::now()
            .date_naive()
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        let end = start + Duration::days(1) - Duration::milliseconds(1);
        let day_revenue = self.sale_repo.revenue_between(start, end).await?;

        let average_ticket = if total_sales > 0 {
            (total_revenue / Decimal::from(total_sales)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        let top_products = self.sale_repo.top_products(5).await?;

        Ok(SalesSummary {
            total_sales,
            total_revenue,
            day_revenue,
            average_ticket,
            top_products,
        })
    }
}
