// Copyright (c) 2025 Tillbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Password hashing and role-based access.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a signed-in user may do. Observers read, personnel write
/// everything except user management, admins do both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Personnel,
    Observer,
}

impl Role {
    pub fn can_write(self) -> bool {
        !matches!(self, Role::Observer)
    }

    pub fn can_manage_users(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "personnel" => Ok(Role::Personnel),
            "observer" => Ok(Role::Observer),
            other => Err(Error::Validation(format!(
                "unknown role '{other}' (admin, personnel or observer)"
            ))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Personnel => write!(f, "personnel"),
            Role::Observer => write!(f, "observer"),
        }
    }
}

/// Hashes a password with Argon2id into PHC string format.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Validation(format!("failed to hash password: {e}")))
}

/// Verifies a password against a stored PHC hash. A wrong password is
/// `Ok(false)`; only a malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|_| Error::Validation("invalid password hash".into()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Validation(format!("verification failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret!", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("till").unwrap();
        let b = hash_password("till").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "not-a-phc-string").is_err());
    }

    #[test]
    fn role_permissions() {
        use std::str::FromStr;
        assert!(Role::from_str("Admin").unwrap().can_manage_users());
        assert!(Role::from_str("personnel").unwrap().can_write());
        let observer = Role::from_str("observer").unwrap();
        assert!(!observer.can_write());
        assert!(Role::from_str("root").is_err());
    }
}
