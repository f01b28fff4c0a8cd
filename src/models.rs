pub mod auth;
pub mod configuration;
pub mod inventory;
pub mod product;
pub mod sale;
