//! Login credentials created alongside teacher records.

use thiserror::Error;

pub const DEFAULT_TEACHER_PASSWORD: &str = "docente";

/// bcrypt work factor for stored passwords.
pub const HASH_COST: u32 = 10;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct CredentialError(#[from] bcrypt::BcryptError);

/// Username derived from the local part of an email address.
pub fn username_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).trim().to_string()
}

/// bcrypt hash in the modular `$2b$` form; the salt is embedded.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

/// False for a wrong password and for anything that is not a bcrypt hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_email_local_part() {
        assert_eq!(username_from_email("rossi@uniparthenope.it"), "rossi");
    }

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let a = hash_password(DEFAULT_TEACHER_PASSWORD).unwrap();
        let b = hash_password(DEFAULT_TEACHER_PASSWORD).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("docente", &a));
        assert!(!verify_password("admin", &a));
        assert!(!verify_password("docente", "garbage"));
    }

    #[test]
    fn stored_form_is_bcrypt_with_the_configured_cost() {
        let stored = hash_password("admin").unwrap();
        assert!(stored.starts_with("$2"), "{stored}");
        assert_eq!(stored.len(), 60);
        let cost: u32 = stored.split('$').nth(2).unwrap().parse().unwrap();
        assert_eq!(cost, HASH_COST);
    }
}
