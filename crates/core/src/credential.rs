// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Explicit bearer credentials for store calls.
//!
//! Every store call takes a credential argument; there is no ambient
//! session state. The orchestrator acquires a credential before dispatch
//! and attempts one refresh when the current one has expired.

use crate::error::CoreError;

/// An opaque bearer token presented on every store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerCredential {
    token: String,
}

impl BearerCredential {
    /// Creates a new `BearerCredential`.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self { token }
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Supplies and renews bearer credentials.
pub trait CredentialProvider: Send + Sync {
    /// Returns the currently held credential.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Credential` if no credential is held or the
    /// held one is known to be expired.
    fn current(&self) -> impl Future<Output = Result<BearerCredential, CoreError>> + Send;

    /// Obtains a fresh credential, replacing the held one.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Credential` if a fresh credential cannot be
    /// obtained.
    fn refresh(&self) -> impl Future<Output = Result<BearerCredential, CoreError>> + Send;
}

/// Acquires a usable credential, refreshing once if the current one is
/// unavailable or expired.
///
/// # Errors
///
/// Returns `CoreError::Credential` when neither the current credential nor
/// a single refresh yields a usable one.
pub async fn acquire<P: CredentialProvider>(provider: &P) -> Result<BearerCredential, CoreError> {
    match provider.current().await {
        Ok(credential) => Ok(credential),
        Err(CoreError::Credential(reason)) => {
            tracing::debug!(%reason, "current credential unusable, refreshing once");
            provider.refresh().await
        }
        Err(err) => Err(err),
    }
}
