// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staff roles and what they may do
//!
//! Access is resolved from the role string on a user's profile. Anything
//! that cannot be resolved is denied.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff role as stored on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Cashier,
    Mechanic,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            "cashier" | "kasir" => Some(Role::Cashier),
            "mechanic" | "mekanik" => Some(Role::Mechanic),
            _ => None,
        }
    }

    pub fn allows(self, permission: Permission) -> bool {
        use Permission as P;
        match self {
            Role::Owner => true,
            Role::Admin => !matches!(permission, P::ViewFinance | P::ManageStaff),
            Role::Cashier => matches!(permission, P::ManageQueue | P::Checkout),
            Role::Mechanic => matches!(permission, P::ManageQueue),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Cashier => "cashier",
            Role::Mechanic => "mechanic",
        };
        f.write_str(name)
    }
}

/// Guarded capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageQueue,
    Checkout,
    ManageInventory,
    ViewFinance,
    ManageStaff,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permission::ManageQueue => "manage queue",
            Permission::Checkout => "checkout",
            Permission::ManageInventory => "manage inventory",
            Permission::ViewFinance => "view finance",
            Permission::ManageStaff => "manage staff",
        };
        f.write_str(name)
    }
}

/// Outcome of resolving a user's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted(Role),
    Denied,
}

impl Access {
    pub fn allows(self, permission: Permission) -> bool {
        match self {
            Access::Granted(role) => role.allows(permission),
            Access::Denied => false,
        }
    }
}

/// Resolve access from an optional profile role; missing or unknown denies
pub fn resolve_access(profile_role: Option<&str>) -> Access {
    match profile_role.and_then(Role::parse) {
        Some(role) => Access::Granted(role),
        None => {
            tracing::warn!(role = ?profile_role, "no usable role on profile, denying access");
            Access::Denied
        }
    }
}

#[cfg(test)]
#[path = "roles_tests.rs"]
mod tests;
