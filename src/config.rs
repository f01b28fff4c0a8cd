// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        ConfigurationRepository, InventoryRepository, ProductRepository, SaleRepository,
        UserRepository,
    },
    services::{
        AuthService, ConfigurationService, InventoryService, ProductService, SaleService,
        UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub inventory_service: InventoryService,
    pub sale_service: SaleService,
    pub user_service: UserService,
    pub configuration_service: ConfigurationService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let configuration_repo = ConfigurationRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret.clone());
        let product_service = ProductService::new(product_repo.clone(), db_pool.clone());
        let inventory_service = InventoryService::new(
            inventory_repo.clone(),
            product_repo.clone(),
            db_pool.clone(),
        );
        let sale_service = SaleService::new(
            sale_repo,
            product_repo,
            inventory_repo,
            user_repo.clone(),
            db_pool.clone(),
        );
        let user_service = UserService::new(user_repo, db_pool.clone());
        let configuration_service = ConfigurationService::new(configuration_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            product_service,
            inventory_service,
            sale_service,
            user_service,
            configuration_service,
        })
    }
}
