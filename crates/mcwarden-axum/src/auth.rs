//! Shared-passcode authentication.
//!
//! Every mutating endpoint carries the passcode in its body (or query for the
//! list endpoints). There are no sessions.

use std::fmt;

use crate::error::HttpError;

/// The admin passcode. Never printed.
#[derive(Clone)]
pub struct Passcode(String);

impl Passcode {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Compare `candidate` against the secret in time independent of where
    /// the first mismatch is.
    pub fn verify(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        let given = candidate.as_bytes();

        let mut diff = u8::from(expected.len() != given.len());
        for (i, &byte) in expected.iter().enumerate() {
            diff |= byte ^ given.get(i).copied().unwrap_or(0);
        }
        diff == 0
    }

    /// `Ok` when `candidate` matches, [`HttpError::Unauthorized`] otherwise.
    pub fn authorize(&self, candidate: &str) -> Result<(), HttpError> {
        if self.verify(candidate) {
            Ok(())
        } else {
            Err(HttpError::Unauthorized)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passcode(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_exact_secret() {
        let passcode = Passcode::new("hunter2");
        assert!(passcode.verify("hunter2"));
        assert!(!passcode.verify("hunter"));
        assert!(!passcode.verify("hunter22"));
        assert!(!passcode.verify("Hunter2"));
        assert!(!passcode.verify(""));
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", Passcode::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn authorize_maps_to_unauthorized() {
        let passcode = Passcode::new("s3cret");
        assert!(passcode.authorize("s3cret").is_ok());
        assert!(matches!(
            passcode.authorize("nope"),
            Err(HttpError::Unauthorized)
        ));
    }
}
