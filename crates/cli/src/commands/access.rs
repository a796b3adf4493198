// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pit access` - what a user's profile allows

use crate::adapters::App;
use crate::output::{print, OutputFormat};
use anyhow::Result;
use pit_core::{Access, Permission};
use pit_engine::AccessControl;
use serde::Serialize;
use std::fmt;

const ALL: [Permission; 5] = [
    Permission::ManageQueue,
    Permission::Checkout,
    Permission::ManageInventory,
    Permission::ViewFinance,
    Permission::ManageStaff,
];

#[derive(Serialize)]
struct AccessView {
    user: String,
    role: Option<String>,
    allowed: Vec<Permission>,
}

impl AccessView {
    fn new(user: &str, access: Access) -> Self {
        let role = match access {
            Access::Granted(role) => Some(role.to_string()),
            Access::Denied => None,
        };
        Self {
            user: user.to_string(),
            role,
            allowed: ALL.into_iter().filter(|p| access.allows(*p)).collect(),
        }
    }
}

impl fmt::Display for AccessView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.role {
            Some(role) => writeln!(f, "{}: {}", self.user, role)?,
            None => return write!(f, "{}: no access", self.user),
        }
        let allowed: Vec<_> = self.allowed.iter().map(|p| p.to_string()).collect();
        write!(f, "  may: {}", allowed.join(", "))
    }
}

pub async fn handle(user: &str, app: &App, format: OutputFormat) -> Result<()> {
    let access = AccessControl::new(app.store.clone()).access(user).await;
    print(&AccessView::new(user, access), format);
    Ok(())
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
