//! # Identity Service
//!
//! Users, their roles, and password credentials.
//!
//! ## Password Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Password Handling                                │
//! │                                                                         │
//! │  NewUser { password: "plain" }                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  argon2 (random salt) ──► "$argon2id$v=19$m=19456,t=2,p=1$..."          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  users.password_hash        UserDto never carries either value          │
//! │                                                                         │
//! │  verify_password(id, candidate) ──► PasswordHash::new + verify          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::{debug, error, info};

use commerce_core::dto::{UserDto, UserRoleDto};
use commerce_core::payload::{NewUser, NewUserRole, UserPatch, UserRolePatch};
use commerce_core::validation::validate_uuid;
use commerce_core::NamePattern;
use commerce_db::{generate_id, Database};

use crate::error::{ServiceError, ServiceResult};
use crate::now;

#[derive(Debug, Clone)]
pub struct IdentityService {
    db: Database,
}

impl IdentityService {
    pub fn new(db: Database) -> Self {
        IdentityService { db }
    }

    // =========================================================================
    // Roles
    // =========================================================================

    pub async fn list_roles(&self) -> ServiceResult<Vec<UserRoleDto>> {
        let roles = self.db.user_roles().list().await?;
        Ok(roles.into_iter().map(UserRoleDto::from).collect())
    }

    pub async fn get_role(&self, id: i64) -> ServiceResult<UserRoleDto> {
        self.db
            .user_roles()
            .get_by_id(id)
            .await?
            .map(UserRoleDto::from)
            .ok_or_else(|| ServiceError::not_found("UserRole", id))
    }

    pub async fn create_role(&self, new: NewUserRole) -> ServiceResult<UserRoleDto> {
        let role = self.db.user_roles().insert(&new).await?;
        info!(id = role.id, role = %role.role, "Role created");
        Ok(role.into())
    }

    pub async fn update_role(&self, id: i64, patch: UserRolePatch) -> ServiceResult<UserRoleDto> {
        let repo = self.db.user_roles();
        let mut role = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("UserRole", id))?;

        patch.apply_to(&mut role);
        repo.update(&role).await?;
        Ok(role.into())
    }

    /// Fails with Conflict while any user holds the role.
    pub async fn delete_role(&self, id: i64) -> ServiceResult<()> {
        self.db.user_roles().delete(id).await?;
        info!(id = id, "Role deleted");
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn list_users(&self) -> ServiceResult<Vec<UserDto>> {
        let users = self.db.users().list().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn get_user(&self, id: &str) -> ServiceResult<UserDto> {
        validate_uuid("id", id)?;
        self.db
            .users()
            .get_by_id(id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Creates a user. Duplicate username or email is a Conflict.
    pub async fn create_user(&self, new: NewUser) -> ServiceResult<UserDto> {
        new.validate()?;
        self.require_role(new.role_id).await?;
        self.require_city(new.city_id).await?;

        let password_hash = hash_password(&new.password)?;
        let user = new.into_user(generate_id(), password_hash, now());
        let user = self.db.users().insert(&user).await?;

        info!(id = %user.id, username = %user.username, "User created");
        Ok(user.into())
    }

    /// Find-then-merge update. A supplied password is re-hashed.
    pub async fn update_user(&self, id: &str, patch: UserPatch) -> ServiceResult<UserDto> {
        validate_uuid("id", id)?;
        patch.validate()?;

        let repo = self.db.users();
        let mut user = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;

        if let Some(role_id) = patch.role_id {
            self.require_role(role_id).await?;
        }
        if let Some(city_id) = patch.city_id {
            self.require_city(city_id).await?;
        }

        patch.apply_to(&mut user);
        if let Some(password) = &patch.password {
            user.password_hash = hash_password(password)?;
        }
        repo.update(&user).await?;

        debug!(id = %id, "User updated");
        Ok(user.into())
    }

    /// Fails with Conflict while the user has sales.
    pub async fn delete_user(&self, id: &str) -> ServiceResult<()> {
        validate_uuid("id", id)?;
        self.db.users().delete(id).await?;
        info!(id = %id, "User deleted");
        Ok(())
    }

    /// Checks a candidate password against the stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; NotFound if the user does not exist.
    pub async fn verify_password(&self, user_id: &str, candidate: &str) -> ServiceResult<bool> {
        validate_uuid("user_id", user_id)?;
        let user = self
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        Ok(verify_hash(candidate, &user.password_hash))
    }

    // =========================================================================
    // User Queries
    // =========================================================================

    /// Case-insensitive exact last-name match.
    pub async fn users_by_last_name(&self, last_name: &str) -> ServiceResult<Vec<UserDto>> {
        let users = self.db.users().find_by_last_name(last_name).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn users_by_city_id(&self, city_id: i64) -> ServiceResult<Vec<UserDto>> {
        let users = self.db.users().find_by_city_id(city_id).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn users_by_city_name(&self, city_name: &str) -> ServiceResult<Vec<UserDto>> {
        let users = self.db.users().find_by_city_name(city_name).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    pub async fn users_by_department_name(
        &self,
        department_name: &str,
    ) -> ServiceResult<Vec<UserDto>> {
        let users = self.db.users().find_by_department_name(department_name).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    /// Case-insensitive first-name search.
    pub async fn users_by_first_name(&self, pattern: &NamePattern) -> ServiceResult<Vec<UserDto>> {
        let users = self.db.users().find_by_first_name(pattern).await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    // =========================================================================
    // Parent resolution
    // =========================================================================

    async fn require_role(&self, id: i64) -> ServiceResult<()> {
        match self.db.user_roles().get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("UserRole", id)),
        }
    }

    async fn require_city(&self, id: i64) -> ServiceResult<()> {
        match self.db.cities().get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("City", id)),
        }
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password into a PHC string with a fresh random salt.
fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(hashing_error)?;

    Ok(hash.to_string())
}

fn hashing_error(err: argon2::password_hash::Error) -> ServiceError {
    error!(error = %err, "Password hashing failed");
    ServiceError::internal(format!("failed to hash password: {err}"))
}

fn verify_hash(candidate: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
