//! Cascading deletes rooted at a user or a blog.
//!
//! A cascade first enumerates every dependent record through the index access
//! patterns, then deletes them children-first, parent last. Enumeration and
//! deletion are separate store calls with no transaction around them: a child
//! written after enumeration survives as an orphan.

use std::collections::HashSet;

use common::storage::{PrimaryKey, Query};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::codec;
use crate::entity::EntityRef;
use crate::keys;
use crate::repository::{RepoError, Store};

/// Records removed by a completed cascade, in deletion order.
#[derive(Debug, Clone, Serialize)]
pub struct CascadeReport {
    pub root: EntityRef,
    pub deleted: Vec<EntityRef>,
}

/// A cascade stopped part way. Already-deleted records stay deleted.
#[derive(Debug, Error)]
#[error(
    "cascade delete of {root} stopped: {cause}; removed [{}]; not removed [{}]",
    join_refs(.deleted),
    join_refs(.remaining)
)]
pub struct CascadeError {
    pub root: EntityRef,
    pub deleted: Vec<EntityRef>,
    pub remaining: Vec<EntityRef>,
    pub cause: String,
}

fn join_refs(refs: &[EntityRef]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

struct Step {
    key: PrimaryKey,
    entity: EntityRef,
}

/// Deletes users and blogs together with their dependents.
#[derive(Clone)]
pub struct CascadeCoordinator {
    store: Store,
    cancel: CancellationToken,
}

impl CascadeCoordinator {
    /// The coordinator checks `cancel` before every delete and stops with a
    /// [`CascadeError`] once it fires.
    pub fn new(store: Store, cancel: CancellationToken) -> Self {
        Self { store, cancel }
    }

    /// Delete a user, every blog they own with its comments, and every comment
    /// they wrote elsewhere.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> Result<CascadeReport, CascadeError> {
        let root = EntityRef::User { id };
        let mut plan = Vec::new();
        if let Err(e) = self.plan_user(id, &mut plan).await {
            return Err(Self::planning_failed(root, plan, e));
        }
        self.execute(root, plan).await
    }

    /// Delete a blog and every comment on it.
    #[instrument(skip(self), fields(blog_id = %id))]
    pub async fn delete_blog(&self, id: Uuid) -> Result<CascadeReport, CascadeError> {
        let root = EntityRef::Blog { id };
        let mut plan = Vec::new();
        if let Err(e) = self.plan_blog_children(id, &mut plan).await {
            return Err(Self::planning_failed(root, plan, e));
        }
        plan.push(Step {
            key: keys::blog_key(id),
            entity: root.clone(),
        });
        self.execute(root, plan).await
    }

    /// Appends the steps for a user cascade to `plan`. On error, `plan` still
    /// holds every record enumerated so far.
    async fn plan_user(&self, id: Uuid, plan: &mut Vec<Step>) -> Result<(), RepoError> {
        let blogs = self.enumerate(&keys::blogs_by_user(id)).await?;
        let own_blogs: HashSet<Uuid> = blogs
            .iter()
            .filter_map(|step| match step.entity {
                EntityRef::Blog { id } => Some(id),
                _ => None,
            })
            .collect();

        let mut blogs = blogs.into_iter();
        while let Some(blog) = blogs.next() {
            let children = match blog.entity {
                EntityRef::Blog { id } => self.plan_blog_children(id, plan).await,
                _ => Ok(()),
            };
            plan.push(blog);
            if let Err(e) = children {
                plan.extend(blogs);
                return Err(e);
            }
        }

        // Comments on the user's own blogs were already planned with the blog.
        let comments = self.enumerate(&keys::comments_by_user(id)).await?;
        plan.extend(
            comments
                .into_iter()
                .filter(|step| match step.entity {
                    EntityRef::Comment { blog_id, .. } => !own_blogs.contains(&blog_id),
                    _ => true,
                }),
        );

        plan.push(Step {
            key: keys::user_key(id),
            entity: EntityRef::User { id },
        });

        debug!(
            blogs = own_blogs.len(),
            steps = plan.len(),
            "Planned user cascade"
        );
        Ok(())
    }

    async fn plan_blog_children(
        &self,
        blog_id: Uuid,
        plan: &mut Vec<Step>,
    ) -> Result<(), RepoError> {
        plan.extend(self.enumerate(&keys::comments_by_blog(blog_id)).await?);
        Ok(())
    }

    /// Run one query and locate every returned record by key and id only.
    async fn enumerate(&self, query: &Query) -> Result<Vec<Step>, RepoError> {
        self.store
            .query(query)
            .await?
            .iter()
            .map(|item| {
                codec::decode_ref(item)
                    .map(|(key, entity)| Step { key, entity })
                    .map_err(RepoError::from)
            })
            .collect()
    }

    async fn execute(
        &self,
        root: EntityRef,
        plan: Vec<Step>,
    ) -> Result<CascadeReport, CascadeError> {
        let mut deleted = Vec::with_capacity(plan.len());

        for (i, step) in plan.iter().enumerate() {
            let failure = if self.cancel.is_cancelled() {
                Some("cancelled".to_string())
            } else {
                match self.store.delete(&step.key).await {
                    Ok(true) => {
                        deleted.push(step.entity.clone());
                        None
                    }
                    Ok(false) => {
                        debug!(entity = %step.entity, "Already absent, skipping");
                        None
                    }
                    Err(e) => Some(e.to_string()),
                }
            };

            if let Some(cause) = failure {
                let remaining: Vec<EntityRef> =
                    plan[i..].iter().map(|s| s.entity.clone()).collect();
                warn!(
                    root = %root,
                    deleted = deleted.len(),
                    remaining = remaining.len(),
                    %cause,
                    "Cascade delete stopped"
                );
                return Err(CascadeError {
                    root,
                    deleted,
                    remaining,
                    cause,
                });
            }
        }

        info!(root = %root, deleted = deleted.len(), "Cascade delete complete");
        Ok(CascadeReport { root, deleted })
    }

    /// Nothing was deleted; every record enumerated before the failure, and the
    /// root, remains.
    fn planning_failed(root: EntityRef, plan: Vec<Step>, err: RepoError) -> CascadeError {
        let mut remaining: Vec<EntityRef> = plan.into_iter().map(|s| s.entity).collect();
        if remaining.last() != Some(&root) {
            remaining.push(root.clone());
        }
        warn!(
            root = %root,
            remaining = remaining.len(),
            error = %err,
            "Cascade enumeration failed"
        );
        CascadeError {
            root,
            deleted: Vec::new(),
            remaining,
            cause: err.to_string(),
        }
    }
}
