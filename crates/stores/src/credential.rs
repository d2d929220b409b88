// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use amc_book::{BearerCredential, CoreError, CredentialProvider};

/// A credential provider backed by one fixed token.
///
/// Used with [`crate::MemoryStore`], which accepts the same token. Refresh
/// hands back the same credential; the token never expires.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    token: String,
}

impl StaticCredentialProvider {
    /// Creates a provider that always yields `token`.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self { token }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn current(&self) -> impl Future<Output = Result<BearerCredential, CoreError>> + Send {
        async move { Ok(BearerCredential::new(self.token.clone())) }
    }

    fn refresh(&self) -> impl Future<Output = Result<BearerCredential, CoreError>> + Send {
        async move { Ok(BearerCredential::new(self.token.clone())) }
    }
}
