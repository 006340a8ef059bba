use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::UserRole, user_role};

#[derive(Clone)]
pub struct UserRoleDao {
    db: DatabaseConnection,
}

impl DaoBase for UserRoleDao {
    type Entity = UserRole;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserRoleDao {
    pub async fn assign(
        &self,
        user_id: &Uuid,
        franchise_id: &Uuid,
        role: &str,
    ) -> DaoResult<user_role::Model> {
        let model = user_role::ActiveModel {
            user_id: Set(*user_id),
            franchise_id: Set(*franchise_id),
            role: Set(role.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn roles_for_user(&self, user_id: &Uuid) -> DaoResult<Vec<user_role::Model>> {
        let user_id = *user_id;
        self.find(1, Self::MAX_PAGE_SIZE, None, move |query| {
            query.filter(user_role::Column::UserId.eq(user_id))
        })
        .await
        .map(|response| response.data)
    }

    pub async fn roles_for_tenant(
        &self,
        user_id: &Uuid,
        franchise_id: &Uuid,
    ) -> DaoResult<Vec<user_role::Model>> {
        let user_id = *user_id;
        let franchise_id = *franchise_id;
        self.find(1, Self::MAX_PAGE_SIZE, None, move |query| {
            query
                .filter(user_role::Column::UserId.eq(user_id))
                .filter(user_role::Column::FranchiseId.eq(franchise_id))
        })
        .await
        .map(|response| response.data)
    }

    pub async fn find_assignment(
        &self,
        user_id: &Uuid,
        franchise_id: &Uuid,
        role: &str,
    ) -> DaoResult<Option<user_role::Model>> {
        let user_id = *user_id;
        let franchise_id = *franchise_id;
        let role = role.to_string();
        self.find(1, 1, None, move |query| {
            query
                .filter(user_role::Column::UserId.eq(user_id))
                .filter(user_role::Column::FranchiseId.eq(franchise_id))
                .filter(user_role::Column::Role.eq(role))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use super::UserRoleDao;
    use crate::db::dao::DaoBase;
    use crate::db::entities::user_role;

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn assignment(user_id: Uuid, franchise_id: Uuid, role: &str) -> user_role::Model {
        user_role::Model {
            id: Uuid::new_v4(),
            created_at: ts(),
            updated_at: ts(),
            user_id,
            franchise_id,
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn roles_for_tenant_returns_all_rows() {
        let user_id = Uuid::new_v4();
        let franchise_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                assignment(user_id, franchise_id, "manager"),
                assignment(user_id, franchise_id, "cashier"),
            ]])
            .into_connection();
        let dao = UserRoleDao::new(&db);

        let roles = dao
            .roles_for_tenant(&user_id, &franchise_id)
            .await
            .expect("query should succeed");
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].role, "manager");
    }

    #[tokio::test]
    async fn find_assignment_returns_none_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_role::Model>::new()])
            .into_connection();
        let dao = UserRoleDao::new(&db);

        let found = dao
            .find_assignment(&Uuid::new_v4(), &Uuid::new_v4(), "admin")
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }
}
