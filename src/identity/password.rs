use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use rand::thread_rng;

use super::IdentityError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// PHC-format argon2id hash, as stored by the local identity backends.
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(IdentityError::Password(format!(
            "must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let salt = SaltString::generate(&mut thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| IdentityError::Password(format!("hashing failed: {err}")))
}

#[cfg(test)]
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, IdentityError> {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    let parsed = PasswordHash::new(hash)
        .map_err(|err| IdentityError::Password(format!("stored hash unreadable: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
