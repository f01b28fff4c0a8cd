pub mod configuration_repo;
pub mod inventory_repo;
pub mod product_repo;
pub mod sale_repo;
pub mod user_repo;

pub use configuration_repo::ConfigurationRepository;
pub use inventory_repo::InventoryRepository;
pub use product_repo::ProductRepository;
pub use sale_repo::SaleRepository;
pub use user_repo::UserRepository;
