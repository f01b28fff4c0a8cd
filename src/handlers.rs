pub mod auth;
pub mod configuration;
pub mod inventory;
pub mod products;
pub mod sales;
pub mod users;
