// src/db/configuration_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::configuration::StoreConfiguration};

#[derive(Clone)]
pub struct ConfigurationRepository {
    pool: PgPool,
}

impl ConfigurationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // A configuração é uma linha única; pegamos sempre a primeira.
    pub async fn get(&self) -> Result<Option<StoreConfiguration>, AppError> {
        let maybe_config = sqlx::query_as::<_, StoreConfiguration>(
            "SELECT * FROM configuration ORDER BY id ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_config)
    }

    pub async fn insert_default(&self, store_name: &str) -> Result<StoreConfiguration, AppError> {
        let config = sqlx::query_as::<_, StoreConfiguration>(
            "INSERT INTO configuration (store_name) VALUES ($1) RETURNING *",
        )
        .bind(store_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(config)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: i32,
        store_name: Option<&str>,
        store_address: Option<&str>,
        store_phone: Option<&str>,
        store_email: Option<&str>,
        store_currency: Option<&str>,
        store_timezone: Option<&str>,
        store_logo: Option<&str>,
        store_favicon: Option<&str>,
        store_language: Option<&str>,
    ) -> Result<Option<StoreConfiguration>, AppError> {
        let maybe_config = sqlx::query_as::<_, StoreConfiguration>(
            r#"
            UPDATE configuration SET
                store_name = COALESCE($2, store_name),
                store_address = COALESCE($3, store_address),
                store_phone = COALESCE($4, store_phone),
                store_email = COALESCE($5, store_email),
                store_currency = COALESCE($6, store_currency),
                store_timezone = COALESCE($7, store_timezone),
                store_logo = COALESCE($8, store_logo),
                store_favicon = COALESCE($9, store_favicon),
                store_language = COALESCE($10, store_language)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(store_name)
        .bind(store_address)
        .bind(store_phone)
        .bind(store_email)
        .bind(store_currency)
        .bind(store_timezone)
        .bind(store_logo)
        .bind(store_favicon)
        .bind(store_language)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_config)
    }
}
