use common::storage::{PutCondition, StoreError};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cascade::{CascadeCoordinator, CascadeReport};
use crate::codec::{Entity, attr};
use crate::entity::{EntityKind, EntityRef, User};
use crate::keys;
use crate::models::user::{
    CreateUserRequest, UpdateUserRequest, UserFilter, validate_create_user, validate_password,
    validate_user,
};
use crate::utils::hash;

use super::{RepoError, Store};

#[derive(Clone)]
pub struct UserRepository {
    store: Store,
    cascade: CascadeCoordinator,
}

impl UserRepository {
    pub fn new(store: Store, cascade: CascadeCoordinator) -> Self {
        Self { store, cascade }
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn create(&self, payload: CreateUserRequest) -> Result<User, RepoError> {
        validate_create_user(&payload)?;

        let user = User {
            id: Uuid::new_v4(),
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            password: hash_password(&payload.password)?,
        };

        self.store
            .put(user.encode(), PutCondition::NotExists)
            .await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<User, RepoError> {
        self.store
            .fetch(&keys::user_key(id))
            .await?
            .ok_or(RepoError::NotFound(EntityRef::User { id }))
    }

    /// Apply a partial update. An empty patch returns the current user.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: UpdateUserRequest) -> Result<User, RepoError> {
        let mut user = self.get(id).await?;
        if patch == UpdateUserRequest::default() {
            return Ok(user);
        }

        if let Some(name) = patch.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            user.email = email.trim().to_string();
        }
        validate_user(&user)?;
        if let Some(password) = patch.password {
            validate_password(&password)?;
            user.password = hash_password(&password)?;
        }

        // Must-exist write: a concurrent delete wins over this update.
        self.store
            .put(user.encode(), PutCondition::Exists)
            .await
            .map_err(|e| match e {
                StoreError::ConditionFailed(_) => RepoError::NotFound(EntityRef::User { id }),
                other => other.into(),
            })?;

        Ok(user)
    }

    /// Delete a user together with their blogs and comments.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<CascadeReport, RepoError> {
        self.get(id).await?;
        Ok(self.cascade.delete_user(id).await?)
    }

    /// Users matching every given filter, from a single type-index query.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: UserFilter) -> Result<Vec<User>, RepoError> {
        let filter = filter.normalized();
        let mut query = keys::all_of(EntityKind::User);
        if let Some(name) = filter.name {
            query = query.filter_eq(attr::NAME, name);
        }
        if let Some(email) = filter.email {
            query = query.filter_eq(attr::EMAIL, email);
        }
        self.store.query_entities(&query).await
    }
}

fn hash_password(password: &str) -> Result<String, RepoError> {
    hash::hash_password(password)
        .map_err(|e| RepoError::Internal(format!("Password hash error: {e}")))
}
