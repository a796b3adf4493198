// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Role-based access checks against user profiles
//!
//! Fails closed: a failed lookup, a missing profile or an unrecognised
//! role all deny.

use crate::error::EngineError;
use pit_adapters::StoreAdapter;
use pit_core::{resolve_access, Access, Permission, Role};

#[derive(Clone)]
pub struct AccessControl<S> {
    store: S,
}

impl<S: StoreAdapter> AccessControl<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolve a user's access from their profile
    pub async fn access(&self, user_id: &str) -> Access {
        match self.store.profile_role(user_id).await {
            Ok(role) => resolve_access(role.as_deref()),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "profile lookup failed, denying access");
                Access::Denied
            }
        }
    }

    /// The user's role, if it grants `permission`
    pub async fn authorize(
        &self,
        user_id: &str,
        permission: Permission,
    ) -> Result<Role, EngineError> {
        match self.access(user_id).await {
            Access::Granted(role) if role.allows(permission) => Ok(role),
            Access::Granted(role) => {
                tracing::info!(user_id, %role, %permission, "permission refused");
                Err(EngineError::AccessDenied(permission))
            }
            Access::Denied => Err(EngineError::AccessDenied(permission)),
        }
    }
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
