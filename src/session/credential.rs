//! Derives the HTTP Basic credential token presented on every request.

use std::fmt::Debug;

use base64::{Engine as _, engine::general_purpose::STANDARD};

/// The HTTP authentication scheme the backend accepts.
const BASIC_SCHEME: &str = "Basic";

/// The value of the `Authorization` header for a logged in principal.
///
/// The token is derived once from the principal and secret at log in. The raw
/// secret is not kept anywhere after derivation, and the token itself is
/// redacted from debug output so it does not end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialToken(String);

impl CredentialToken {
    /// Derive the token `Basic base64(principal:secret)`.
    ///
    /// This is a pure, local computation. Whether the backend accepts the
    /// credentials is only discovered by the first request that uses them.
    pub fn derive(principal: &str, secret: &str) -> Self {
        let encoded = STANDARD.encode(format!("{principal}:{secret}"));

        Self(format!("{BASIC_SCHEME} {encoded}"))
    }

    /// Wrap a previously derived token, e.g. one read back from storage.
    ///
    /// The caller should ensure that `value` was produced by [CredentialToken::derive].
    pub fn new_unchecked(value: &str) -> Self {
        Self(value.to_owned())
    }

    /// The header value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for CredentialToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialToken(********)")
    }
}
