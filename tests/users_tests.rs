// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tillbook::auth::Role;
use tillbook::db::Database;
use tillbook::error::Error;
use tillbook::store::MemoryStore;

fn setup() -> Database {
    Database::new(Box::new(MemoryStore::new()))
}

#[test]
fn created_users_verify_with_their_password() {
    let db = setup();
    let user = db.add_user("volkan", "correct horse", Role::Admin).unwrap();
    assert!(user.password_hash.starts_with("$argon2id$"));

    let verified = db.verify_user("volkan", "correct horse").unwrap().unwrap();
    assert_eq!(verified.role, Role::Admin);
    assert!(verified.role.can_manage_users());
}

#[test]
fn wrong_password_and_unknown_user_are_quiet_failures() {
    let db = setup();
    db.add_user("volkan", "correct horse", Role::Observer).unwrap();
    assert!(db.verify_user("volkan", "wrong").unwrap().is_none());
    assert!(db.verify_user("nobody", "x").unwrap().is_none());
}

#[test]
fn usernames_are_unique() {
    let db = setup();
    db.add_user("volkan", "a", Role::Personnel).unwrap();
    assert!(matches!(
        db.add_user("volkan", "b", Role::Personnel),
        Err(Error::Validation(_))
    ));
}
