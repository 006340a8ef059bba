use anyhow::Result;
use tracing::info;

use crate::config::AuthConfig;
use crate::db::dao::DaoContext;
use crate::db::entities::franchise;

use super::Role;
use super::password::hash_password;
use super::store::STATUS_ACTIVE;

const SEED_FRANCHISE_NAME: &str = "Demo Water Solutions";
const SEED_FRANCHISE_REG: &str = "REG-2020-001";
const SEED_FRANCHISE_ADDRESS: &str = "1 Main Road, Cape Town";

/// Ensure a login is possible on a fresh database: create the seed franchise
/// and the configured admin user if they are missing. Safe to run on every
/// startup.
pub async fn seed_admin(daos: &DaoContext, cfg: &AuthConfig) -> Result<()> {
    let email = cfg.admin_email.trim().to_lowercase();
    let users = daos.user();
    let user_roles = daos.user_role();

    if let Some(existing) = users.find_by_email(&email).await? {
        // User survives restarts; only the role assignment might be missing.
        let assignment = user_roles
            .find_assignment(&existing.id, &existing.franchise_id, Role::Admin.as_str())
            .await?;
        if assignment.is_none() {
            user_roles
                .assign(&existing.id, &existing.franchise_id, Role::Admin.as_str())
                .await?;
            info!(user_id = %existing.id, "restored admin role assignment");
        }
        info!(user_id = %existing.id, "admin user already present");
        return Ok(());
    }

    let franchise = seed_franchise(daos).await?;
    let password_hash = hash_password(&cfg.admin_password)?;
    let admin = users
        .create_user(&email, None, &password_hash, STATUS_ACTIVE, &franchise.id)
        .await?;
    user_roles
        .assign(&admin.id, &franchise.id, Role::Admin.as_str())
        .await?;

    info!(user_id = %admin.id, franchise_id = %franchise.id, "seeded admin user");
    Ok(())
}

async fn seed_franchise(daos: &DaoContext) -> Result<franchise::Model> {
    let franchises = daos.franchise();
    if let Some(existing) = franchises.find_by_reg_number(SEED_FRANCHISE_REG).await? {
        return Ok(existing);
    }

    let created = franchises
        .create_franchise(
            SEED_FRANCHISE_NAME,
            SEED_FRANCHISE_REG,
            true,
            Some("VAT-4820103948"),
            SEED_FRANCHISE_ADDRESS,
        )
        .await?;
    info!(franchise_id = %created.id, "seeded default franchise");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::seed_admin;
    use crate::config::AuthConfig;
    use crate::db::dao::DaoContext;
    use crate::db::entities::{user, user_role};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn auth_cfg() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            access_ttl_secs: 3600,
            admin_email: "admin@demo.com".to_string(),
            admin_password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn existing_admin_with_assignment_is_left_alone() {
        let user_id = Uuid::new_v4();
        let franchise_id = Uuid::new_v4();
        let admin = user::Model {
            id: user_id,
            created_at: ts(),
            updated_at: ts(),
            email: "admin@demo.com".to_string(),
            phone_e164: None,
            password_hash: "hash".to_string(),
            status: "active".to_string(),
            franchise_id,
            last_login_at: None,
        };
        let assignment = user_role::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            user_id,
            franchise_id,
            role: "admin".to_string(),
        };
        // Only two lookups happen; any insert would hit an exhausted mock.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![admin]])
            .append_query_results([vec![assignment]])
            .into_connection();

        seed_admin(&DaoContext::new(&db), &auth_cfg())
            .await
            .expect("seed should be a no-op");
    }
}
