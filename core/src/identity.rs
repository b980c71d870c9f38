//! Signed-in user seam.
//!
//! Authentication lives outside the engine. The session only ever asks
//! "who, if anyone, is signed in", and sign-in/sign-out are fire-and-forget.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub photo_url: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("no profile available to sign in with")]
    NoProfile,
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

pub trait IdentityProvider {
    fn current_user(&self) -> Option<User>;
    fn sign_in(&mut self) -> Result<(), IdentityError>;
    fn sign_out(&mut self) -> Result<(), IdentityError>;
}

/// Sign in, logging rather than returning any failure.
pub fn sign_in(provider: &mut dyn IdentityProvider) {
    if let Err(e) = provider.sign_in() {
        warn!(error = %e, "sign-in failed");
    }
}

/// Sign out, logging rather than returning any failure.
pub fn sign_out(provider: &mut dyn IdentityProvider) {
    if let Err(e) = provider.sign_out() {
        warn!(error = %e, "sign-out failed");
    }
}

/// A provider backed by a locally configured profile, e.g. a CLI `--player`.
#[derive(Debug, Clone, Default)]
pub struct LocalIdentity {
    profile: Option<User>,
    signed_in: bool,
}

impl LocalIdentity {
    /// A provider with no profile; nobody can sign in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A provider holding `name` as its profile, already signed in.
    pub fn signed_in(name: &str) -> Self {
        LocalIdentity {
            profile: Some(User {
                id: format!("local:{}", name.to_lowercase()),
                display_name: name.to_string(),
                photo_url: None,
            }),
            signed_in: true,
        }
    }
}

impl IdentityProvider for LocalIdentity {
    fn current_user(&self) -> Option<User> {
        if self.signed_in {
            self.profile.clone()
        } else {
            None
        }
    }

    fn sign_in(&mut self) -> Result<(), IdentityError> {
        if self.profile.is_none() {
            return Err(IdentityError::NoProfile);
        }
        self.signed_in = true;
        Ok(())
    }

    fn sign_out(&mut self) -> Result<(), IdentityError> {
        self.signed_in = false;
        Ok(())
    }
}
