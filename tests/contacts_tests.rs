// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tillbook::db::Database;
use tillbook::error::Error;
use tillbook::store::MemoryStore;

fn setup() -> Database {
    Database::new(Box::new(MemoryStore::new()))
}

#[test]
fn phone_numbers_are_validated_on_add_and_edit() {
    let db = setup();
    let c = db
        .add_contact("Ayşe", "(532) 111-22-33", "supplier")
        .unwrap();
    assert!(matches!(
        db.add_contact("Kaan", "12345", ""),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        db.update_contact(c.id, "Ayşe", "bad-phone", "supplier"),
        Err(Error::Validation(_))
    ));
    assert!(db.update_contact(c.id, "Ayşe", "5321112234", "supplier").unwrap());
}

#[test]
fn search_spans_all_text_columns() {
    let db = setup();
    db.add_contact("Ayşe", "5321112233", "copper supplier").unwrap();
    db.add_contact("Mehmet", "5440005566", "driver").unwrap();

    assert_eq!(db.search_contacts("copper").unwrap().len(), 1);
    assert_eq!(db.search_contacts("544000").unwrap().len(), 1);
    assert_eq!(db.search_contacts("nobody").unwrap().len(), 0);
}

#[test]
fn newest_contacts_list_first() {
    let db = setup();
    db.add_contact("First", "5321112233", "").unwrap();
    db.add_contact("Second", "5321112234", "").unwrap();
    let contacts = db.list_contacts().unwrap();
    assert_eq!(contacts[0].name, "Second");
}

#[test]
fn delete_reports_missing_ids() {
    let db = setup();
    let c = db.add_contact("Ayşe", "5321112233", "").unwrap();
    assert!(db.delete_contact(c.id).unwrap());
    assert!(!db.delete_contact(c.id).unwrap());
}

#[test]
fn password_vault_clear_removes_everything() {
    let db = setup();
    db.add_password("bank", "till", "s3cret", "").unwrap();
    db.add_password("webmail", "till", "hunter2", "work").unwrap();
    assert_eq!(db.search_passwords("work").unwrap().len(), 1);
    assert_eq!(db.delete_all_passwords().unwrap(), 2);
    assert!(db.list_passwords().unwrap().is_empty());
}
