// src/services/stock.rs

// O "razão" de estoque em sua forma pura: aplicar e reverter o efeito de uma
// movimentação sobre a projeção `stock` de um produto. Nenhum I/O acontece
// aqui; quem chama é responsável por estar dentro de uma transação com a
// linha do produto travada (FOR UPDATE) e por persistir o resultado.

use crate::{common::error::AppError, models::inventory::MovementType, models::product::Product};

/// Aplica o efeito de uma movimentação sobre o estoque do produto.
///
/// - Quantidade deve ser >= 1 (`InvalidQuantity`).
/// - IN soma a quantidade.
/// - OUT exige `stock >= quantity`; caso contrário falha com
///   `InsufficientStock` e deixa o estoque intocado.
///
/// Pode ser chamada quantas vezes for preciso dentro da mesma transação:
/// cada chamada enxerga o "estoque de trabalho" já ajustado pelas anteriores.
pub fn apply(
    product: &mut Product,
    movement_type: MovementType,
    quantity: i32,
) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::InvalidQuantity);
    }

    match movement_type {
        MovementType::In => product.stock += quantity,
        MovementType::Out => {
            if product.stock < quantity {
                return Err(AppError::InsufficientStock);
            }
            product.stock -= quantity;
        }
    }
    Ok(())
}

/// Desfaz o efeito de uma movimentação já aplicada: o inverso exato de
/// `apply`. Reverter um efeito que de fato foi aplicado nunca torna o
/// estoque negativo, então esta função não falha por conta própria.
pub fn revert(product: &mut Product, movement_type: MovementType, quantity: i32) {
    match movement_type {
        MovementType::In => product.stock -= quantity,
        MovementType::Out => product.stock += quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn product_with_stock(stock: i32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: "Café moído 250g".into(),
            description: None,
            price: Decimal::new(1000, 2), // 10.00
            stock,
            image_url: None,
            sku: "CAF-COL-250".into(),
            barcode: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn in_movement_increments_stock() {
        let mut product = product_with_stock(10);
        apply(&mut product, MovementType::In, 5).unwrap();
        assert_eq!(product.stock, 15);
    }

    #[test]
    fn out_movement_decrements_stock() {
        let mut product = product_with_stock(10);
        apply(&mut product, MovementType::Out, 4).unwrap();
        assert_eq!(product.stock, 6);
    }

    #[test]
    fn out_movement_with_insufficient_stock_is_rejected_and_stock_untouched() {
        let mut product = product_with_stock(3);
        let err = apply(&mut product, MovementType::Out, 4).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock));
        assert_eq!(product.stock, 3);
    }

    #[test]
    fn out_movement_consuming_exact_stock_succeeds() {
        let mut product = product_with_stock(4);
        apply(&mut product, MovementType::Out, 4).unwrap();
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let mut product = product_with_stock(10);
        assert!(matches!(
            apply(&mut product, MovementType::In, 0),
            Err(AppError::InvalidQuantity)
        ));
        assert!(matches!(
            apply(&mut product, MovementType::Out, -2),
            Err(AppError::InvalidQuantity)
        ));
        assert_eq!(product.stock, 10);
    }

    #[test]
    fn revert_is_the_exact_inverse_of_apply() {
        let mut product = product_with_stock(10);
        apply(&mut product, MovementType::In, 7).unwrap();
        revert(&mut product, MovementType::In, 7);
        assert_eq!(product.stock, 10);

        apply(&mut product, MovementType::Out, 6).unwrap();
        revert(&mut product, MovementType::Out, 6);
        assert_eq!(product.stock, 10);
    }

    // Cenário de "edição por delta": estoque 10, entra IN 5 (estoque 15);
    // editar essa movimentação para IN 2 é reverter a antiga e aplicar a
    // nova, terminando em 12 — nunca uma sobrescrita cega.
    #[test]
    fn updating_a_movement_is_revert_then_apply() {
        let mut product = product_with_stock(10);
        apply(&mut product, MovementType::In, 5).unwrap();
        assert_eq!(product.stock, 15);

        revert(&mut product, MovementType::In, 5);
        apply(&mut product, MovementType::In, 2).unwrap();
        assert_eq!(product.stock, 12);
    }

    // Se a reaplicação falhar, quem chama descarta a transação inteira;
    // aqui só garantimos que a falha não mexe no valor já revertido.
    #[test]
    fn failed_reapply_after_revert_leaves_working_stock_as_reverted() {
        let mut product = product_with_stock(2);
        apply(&mut product, MovementType::In, 5).unwrap(); // estoque 7
        revert(&mut product, MovementType::In, 5); // estoque 2

        let err = apply(&mut product, MovementType::Out, 3).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock));
        assert_eq!(product.stock, 2);
    }

    // Duas linhas da mesma venda sobre o mesmo produto: a primeira reduz o
    // estoque de trabalho, a segunda é avaliada contra o que sobrou.
    // A falha derruba a venda inteira (fail-fast no coordenador).
    #[test]
    fn second_sale_line_is_checked_against_remaining_working_stock() {
        let mut product = product_with_stock(20);
        apply(&mut product, MovementType::Out, 5).unwrap();
        assert_eq!(product.stock, 15);

        let err = apply(&mut product, MovementType::Out, 20).unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock));
        assert_eq!(product.stock, 15);
    }
}
