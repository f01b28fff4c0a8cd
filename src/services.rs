pub mod auth_service;
pub mod configuration_service;
pub mod inventory_service;
pub mod product_service;
pub mod sale_service;
pub mod stock;
pub mod user_service;

pub use auth_service::AuthService;
pub use configuration_service::ConfigurationService;
pub use inventory_service::InventoryService;
pub use product_service::ProductService;
pub use sale_service::SaleService;
pub use user_service::UserService;
