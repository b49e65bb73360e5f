//! Password hashing with Argon2id.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Password hashing failed.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

/// Salted one-way password hashing.
///
/// Hashes are PHC strings (`$argon2id$v=19$m=...`) carrying their own salt and
/// cost parameters, so a hasher can verify hashes produced with a different
/// cost.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Argon2id with explicit memory (KiB) and iteration costs.
    ///
    /// Lower costs than the default are only appropriate for tests.
    ///
    /// # Errors
    ///
    /// Returns `HashError` if the parameters are out of range.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, HashError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| HashError(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `HashError` if Argon2 fails (e.g. the password exceeds its
    /// length limit).
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashError(e.to_string()))
    }

    /// Whether `password` matches `hash`.
    ///
    /// A stored hash that cannot be parsed never matches.
    #[must_use]
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash).is_ok_and(|parsed| {
            self.argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }

    /// Run the same Argon2 work as [`verify`](Self::verify) for an account
    /// that does not exist. Always `false`.
    ///
    /// Login calls this when the email is unknown, so both failure paths cost
    /// one Argon2 evaluation at this hasher's parameters.
    #[must_use]
    pub fn verify_absent(&self, password: &str) -> bool {
        let salt = SaltString::generate(&mut OsRng);
        if let Err(e) = self.argon2.hash_password(password.as_bytes(), &salt) {
            tracing::debug!(error = %e, "Argon2 failed on the absent-account path");
        }
        false
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}
