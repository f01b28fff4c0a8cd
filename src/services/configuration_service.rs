// src/services/configuration_service.rs

use crate::{
    common::error::AppError,
    db::ConfigurationRepository,
    models::configuration::StoreConfiguration,
};

#[derive(Clone)]
pub struct ConfigurationService {
    configuration_repo: ConfigurationRepository,
}

// Campos editáveis da configuração (todos opcionais, atualização parcial).
#[derive(Debug, Default, Clone)]
pub struct ConfigurationChanges {
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub store_phone: Option<String>,
    pub store_email: Option<String>,
    pub store_currency: Option<String>,
    pub store_timezone: Option<String>,
    pub store_logo: Option<String>,
    pub store_favicon: Option<String>,
    pub store_language: Option<String>,
}

impl ConfigurationService {
    pub fn new(configuration_repo: ConfigurationRepository) -> Self {
        Self { configuration_repo }
    }

    /// Bootstrap idempotente da configuração padrão da loja.
    pub async fn seed_default(&self) -> Result<(), AppError> {
        if self.configuration_repo.get().await?.is_none() {
            tracing::info!("Nenhuma configuração encontrada. Criando configuração padrão...");
            self.configuration_repo.insert_default("POS System").await?;
            tracing::info!("✅ Configuração padrão criada: POS System");
        }
        Ok(())
    }

    pub async fn get(&self) -> Result<StoreConfiguration, AppError> {
        self.configuration_repo
            .get()
            .await?
            .ok_or_else(|| anyhow::anyhow!("Configuração da loja ausente").into())
    }

    pub async fn update(
        &self,
        changes: &ConfigurationChanges,
    ) -> Result<StoreConfiguration, AppError> {
        let current = self.get().await?;
        self.configuration_repo
            .update(
                current.id,
                changes.store_name.as_deref(),
                changes.store_address.as_deref(),
                changes.store_phone.as_deref(),
                changes.store_email.as_deref(),
                changes.store_currency.as_deref(),
                changes.store_timezone.as_deref(),
                changes.store_logo.as_deref(),
                changes.store_favicon.as_deref(),
                changes.store_language.as_deref(),
            )
            .await?
            .ok_or_else(|| anyhow::anyhow!("Configuração da loja ausente").into())
    }
}
