//! Credential hashing (argon2, PHC string format)

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Outcome of checking a presented credential against the stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    /// Matches an argon2 hash, or the default credential while none is set
    Valid,
    /// Matches a legacy plaintext value; caller should re-store it hashed
    ValidLegacy,
    Invalid,
}

impl CredentialCheck {
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

/// Hash a credential using argon2
pub fn hash_credential(credential: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(credential.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Whether a stored value is an argon2 PHC string rather than legacy plaintext
pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with("$argon2")
}

/// Verify `presented` against `stored`.
///
/// - empty stored value: only `default_credential` is accepted
/// - argon2 PHC string: argon2 verification
/// - anything else: legacy plaintext, exact comparison
pub fn verify_credential(
    stored: &str,
    presented: &str,
    default_credential: &str,
) -> CredentialCheck {
    if stored.is_empty() {
        return if !default_credential.is_empty() && presented == default_credential {
            CredentialCheck::Valid
        } else {
            CredentialCheck::Invalid
        };
    }

    if is_hashed(stored) {
        let Ok(parsed) = PasswordHash::new(stored) else {
            tracing::warn!("Stored credential is not a valid PHC string");
            return CredentialCheck::Invalid;
        };
        return if Argon2::default()
            .verify_password(presented.as_bytes(), &parsed)
            .is_ok()
        {
            CredentialCheck::Valid
        } else {
            CredentialCheck::Invalid
        };
    }

    if stored == presented {
        CredentialCheck::ValidLegacy
    } else {
        CredentialCheck::Invalid
    }
}
