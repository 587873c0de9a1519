use std::collections::HashMap;

use chrono::Utc;
use sqlx::{MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::{AppError, Result};
use crate::modules::users::models::{Role, User};

const USER_COLUMNS: &str = r#"
    id, full_name, email, password_hash, phone_number, address,
    created_at, updated_at, deleted_at
"#;

/// Repository for users and their role assignments
#[derive(Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!(
            "SELECT {} FROM users WHERE email = ? AND deleted_at IS NULL",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        match user {
            Some(mut user) => {
                user.roles = self.role_names(user.id).await?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let query = format!(
            "SELECT {} FROM users WHERE id = ? AND deleted_at IS NULL",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match user {
            Some(mut user) => {
                user.roles = self.role_names(user.id).await?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Users with their roles in two queries; missing ids are skipped
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM users WHERE deleted_at IS NULL AND id IN (",
            USER_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let mut users = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        let mut builder = QueryBuilder::<MySql>::new(
            r#"
            SELECT ur.user_id, r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE r.deleted_at IS NULL AND ur.user_id IN (
            "#,
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY r.name");

        let rows: Vec<(i64, String)> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut roles: HashMap<i64, Vec<String>> = HashMap::new();
        for (user_id, name) in rows {
            roles.entry(user_id).or_default().push(name);
        }

        for user in &mut users {
            user.roles = roles.remove(&user.id).unwrap_or_default();
        }

        Ok(users)
    }

    pub async fn role_names(&self, user_id: i64) -> Result<Vec<String>> {
        let names: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = ? AND r.deleted_at IS NULL
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(names.into_iter().map(|(name,)| name).collect())
    }

    pub async fn find_role_by_name_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        name: &str,
    ) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name FROM roles WHERE name = ? AND deleted_at IS NULL",
        )
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(role)
    }

    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        full_name: &str,
        email: &str,
        password_hash: &str,
        phone_number: &str,
        address: &str,
    ) -> Result<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                full_name, email, password_hash, phone_number, address, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(phone_number)
        .bind(address)
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict("User with this email already exists");
                }
            }
            AppError::Database(e)
        })?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn assign_role_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        user_id: i64,
        role_id: i64,
    ) -> Result<()> {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
