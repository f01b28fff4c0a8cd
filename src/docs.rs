// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::get_me,
        handlers::auth::change_password,

        // --- Products ---
        handlers::products::create_product,
        handlers::products::get_all_products,
        handlers::products::search_products,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::remove_product,
        handlers::products::recount_product_stock,

        // --- Inventory ---
        handlers::inventory::create_movement,
        handlers::inventory::get_all_movements,
        handlers::inventory::get_movement,
        handlers::inventory::update_movement,
        handlers::inventory::remove_movement,

        // --- Sales ---
        handlers::sales::create_sale,
        handlers::sales::get_all_sales,
        handlers::sales::get_summary,
        handlers::sales::get_sale,
        handlers::sales::update_sale,
        handlers::sales::remove_sale,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::get_all_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::remove_user,

        // --- Configuration ---
        handlers::configuration::get_configuration,
        handlers::configuration::update_configuration,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::AuthResponse,
            handlers::auth::LoginPayload,
            handlers::auth::RefreshPayload,
            handlers::auth::ChangePasswordPayload,

            // --- Products ---
            models::product::Product,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,

            // --- Inventory ---
            models::inventory::MovementType,
            models::inventory::InventoryMovement,
            handlers::inventory::CreateMovementPayload,
            handlers::inventory::UpdateMovementPayload,

            // --- Sales ---
            models::sale::Sale,
            models::sale::SaleItem,
            models::sale::SaleWithItems,
            models::sale::SalesSummary,
            models::sale::TopProductEntry,
            handlers::sales::CreateSaleItemPayload,
            handlers::sales::CreateSalePayload,
            handlers::sales::UpdateSalePayload,

            // --- Users ---
            handlers::users::CreateUserPayload,
            handlers::users::UpdateUserPayload,

            // --- Configuration ---
            models::configuration::StoreConfiguration,
            handlers::configuration::UpdateConfigurationPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Sessão"),
        (name = "Products", description = "Catálogo de Produtos"),
        (name = "Inventory", description = "Movimentações de Estoque"),
        (name = "Sales", description = "Vendas e Indicadores"),
        (name = "Users", description = "Gestão de Usuários (admin)"),
        (name = "Configuration", description = "Configurações da Loja")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
