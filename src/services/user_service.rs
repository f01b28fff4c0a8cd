// src/services/user_service.rs

use bcrypt::hash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{PaginatedResponse, PaginationParams},
    },
    db::UserRepository,
    models::auth::{Role, User},
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(user_repo: UserRepository, pool: PgPool) -> Self {
        Self { user_repo, pool }
    }

    /// Bootstrap idempotente: cria o admin padrão se não existir nenhum
    /// usuário. Preocupação de inicialização — a correção dos invariantes
    /// de estoque não depende disso.
    pub async fn seed_default_admin(&self) -> Result<(), AppError> {
        let count = self.user_repo.count_all().await?;
        if count > 0 {
            return Ok(());
        }

        tracing::info!("Nenhum usuário encontrado. Criando admin padrão...");
        let password_hash = tokio::task::spawn_blocking(|| hash("Admin123@", bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .insert(
                &self.pool,
                "Admin User",
                "admin",
                "admin@admin.com",
                &password_hash,
                Role::Admin,
                true,
            )
            .await?;
        tracing::info!("✅ Admin padrão criado: admin@admin.com");
        Ok(())
    }

    pub async fn create(
        &self,
        name: &str,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        if let Some(existing) = self
            .user_repo
            .find_by_email_or_username(email, username)
            .await?
        {
            let field = if existing.email == email { "email" } else { "username" };
            return Err(AppError::UserAlreadyExists(field.to_string()));
        }

        // Hashing fora do executor async, como manda o figurino.
        let password = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .insert(&self.pool, name, username, email, &password_hash, role, true)
            .await
    }

    pub async fn find_all(
        &self,
        pagination: &PaginationParams,
    ) -> Result<PaginatedResponse<User>, AppError> {
        let users = self.user_repo.find_all(pagination).await?;
        let total = self.user_repo.count_all().await?;
        Ok(PaginatedResponse::new(users, total, pagination))
    }

    pub async fn find_one(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound(id))
    }

    /// Atualiza um usuário. Rebaixar ou desativar o último administrador é
    /// `Conflict`: a leitura do alvo, a contagem (com lock das linhas de
    /// admin) e a escrita saem todas na mesma transação, então duas
    /// rebaixadas concorrentes nunca passam ambas pelo guarda.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        role: Option<Role>,
        is_active: Option<bool>,
    ) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .user_repo
            .find_by_id_tx(&mut *tx, id)
            .await?
            .ok_or(AppError::UserNotFound(id))?;

        let loses_admin = current.role == Role::Admin
            && (matches!(role, Some(Role::Seller)) || matches!(is_active, Some(false)));
        if loses_admin {
            let admins = self.user_repo.count_active_admins(&mut *tx).await?;
            if admins <= 1 {
                return Err(AppError::LastAdministrator);
            }
        }

        let updated = self
            .user_repo
            .update(&mut *tx, id, name, email, role, is_active)
            .await?
            .ok_or(AppError::UserNotFound(id))?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Remove (soft delete) um usuário, com o mesmo guarda de último admin.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .user_repo
            .find_by_id_tx(&mut *tx, id)
            .await?
            .ok_or(AppError::UserNotFound(id))?;

        if current.role == Role::Admin {
            let admins = self.user_repo.count_active_admins(&mut *tx).await?;
            if admins <= 1 {
                return Err(AppError::LastAdministrator);
            }
        }

        let affected = self.user_repo.soft_delete(&mut *tx, id).await?;
        if affected == 0 {
            return Err(AppError::UserNotFound(id));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(pool: &PgPool) -> UserService {
        UserService::new(UserRepository::new(pool.clone()), pool.clone())
    }

    // Duas rebaixadas concorrentes de admins diferentes: a contagem com lock
    // serializa o guarda, então exatamente uma passa e a loja nunca fica sem
    // administrador ativo.
    #[sqlx::test]
    async fn concurrent_demotions_never_leave_zero_active_admins(pool: PgPool) {
        let service = service(&pool);
        let ana = service
            .create("Ana", "ana", "ana@loja.com", "Senha123@", Role::Admin)
            .await
            .unwrap();
        let bia = service
            .create("Bia", "bia", "bia@loja.com", "Senha123@", Role::Admin)
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            service.update(ana.id, None, None, Some(Role::Seller), None),
            service.update(bia.id, None, None, Some(Role::Seller), None),
        );

        let rejected = [first, second]
            .into_iter()
            .filter(|result| matches!(result, Err(AppError::LastAdministrator)))
            .count();
        assert_eq!(rejected, 1);

        let repo = UserRepository::new(pool.clone());
        let mut tx = pool.begin().await.unwrap();
        let admins = repo.count_active_admins(&mut *tx).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(admins, 1);
    }

    #[sqlx::test]
    async fn demoting_the_last_admin_is_rejected(pool: PgPool) {
        let service = service(&pool);
        let ana = service
            .create("Ana", "ana", "ana@loja.com", "Senha123@", Role::Admin)
            .await
            .unwrap();

        let err = service
            .update(ana.id, None, None, Some(Role::Seller), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LastAdministrator));

        let err = service.remove(ana.id).await.unwrap_err();
        assert!(matches!(err, AppError::LastAdministrator));
    }
}
