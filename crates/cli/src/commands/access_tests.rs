// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use pit_core::Role;

#[test]
fn cashier_sees_queue_and_checkout() {
    let view = AccessView::new("user-1", Access::Granted(Role::Cashier));

    assert_eq!(view.role.as_deref(), Some("cashier"));
    assert_eq!(view.allowed, vec![Permission::ManageQueue, Permission::Checkout]);
    assert_eq!(view.to_string(), "user-1: cashier\n  may: manage queue, checkout");
}

#[test]
fn denied_user_has_nothing() {
    let view = AccessView::new("user-2", Access::Denied);

    assert!(view.role.is_none());
    assert!(view.allowed.is_empty());
    assert_eq!(view.to_string(), "user-2: no access");
}
