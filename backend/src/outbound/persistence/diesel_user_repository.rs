//! PostgreSQL-backed `UserRepository` adapter.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    City, DisplayName, DisplayNames, EmailAddress, PasswordDigest, PhoneNumber, RegionCode, Role,
    StoredCredentials, User, UserId, UserProfile,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        |message| UserPersistenceError::query(message),
        |message| UserPersistenceError::connection(message),
    )
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> UserPersistenceError {
    UserPersistenceError::query(format!("invalid {field} in users row: {err}"))
}

fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserPersistenceError> {
    let profile = UserProfile {
        display_name: DisplayName::new(&row.display_name)
            .map_err(|err| corrupt("display_name", err))?,
        phone: PhoneNumber::new(&row.phone).map_err(|err| corrupt("phone", err))?,
        city: City::new(&row.city).map_err(|err| corrupt("city", err))?,
        region: RegionCode::new(&row.region).map_err(|err| corrupt("region", err))?,
    };
    let user = User::new(
        UserId::from_uuid(row.id),
        EmailAddress::new(&row.email).map_err(|err| corrupt("email", err))?,
        profile,
        Role::from_str(&row.role).map_err(|err| corrupt("role", err))?,
        row.created_at,
    );
    Ok(StoredCredentials {
        user,
        digest: PasswordDigest::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User, digest: &PasswordDigest) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let profile = user.profile();
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            password_hash: digest.as_str(),
            display_name: profile.display_name.as_ref(),
            phone: profile.phone.as_ref(),
            city: profile.city.as_ref(),
            region: profile.region.as_ref(),
            role: user.role().as_str(),
            created_at: user.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, EMAIL_CONSTRAINT) {
                    debug!(user_id = %user.id(), "email already registered");
                    UserPersistenceError::duplicate_email(user.email().as_ref())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row_to_credentials(row).map(|stored| stored.user))
            .transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_credentials).transpose()
    }

    async fn display_names(&self, ids: &[UserId]) -> Result<DisplayNames, UserPersistenceError> {
        if ids.is_empty() {
            return Ok(DisplayNames::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<_> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<(uuid::Uuid, String)> = users::table
            .filter(users::id.eq_any(&uuids))
            .select((users::id, users::display_name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(id, name)| {
                DisplayName::new(&name)
                    .map(|name| (UserId::from_uuid(id), name))
                    .map_err(|err| corrupt("display_name", err))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row() -> UserRow {
        UserRow {
            id: uuid::Uuid::new_v4(),
            email: "ana@example.com".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            display_name: "Ana".to_owned(),
            phone: "+55 11 5555-0100".to_owned(),
            city: "São Paulo".to_owned(),
            region: "SP".to_owned(),
            role: "cook".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn rows_convert_to_credentials() {
        let source = row();
        let stored = row_to_credentials(source.clone()).expect("valid row");
        assert_eq!(*stored.user.id().as_uuid(), source.id);
        assert_eq!(stored.user.role(), Role::Cook);
        assert_eq!(stored.digest.as_str(), source.password_hash);
    }

    #[rstest]
    fn unknown_role_is_a_query_error() {
        let mut source = row();
        source.role = "chef".to_owned();
        let err = row_to_credentials(source).expect_err("corrupt role");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
        assert!(err.to_string().contains("role"));
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }
}
