// src/prompt.rs
//! Interactive password prompt collaborator

use std::io::ErrorKind;

use crate::error::Result;

/// Asks the user for a password. `Ok(None)` means the user declined.
pub trait PasswordPrompt {
    fn ask(&self, message: &str) -> Result<Option<String>>;
}

/// Terminal prompt with hidden input
pub struct TtyPrompt;

impl PasswordPrompt for TtyPrompt {
    fn ask(&self, message: &str) -> Result<Option<String>> {
        match rpassword::prompt_password(message) {
            Ok(password) if password.is_empty() => Ok(None),
            Ok(password) => Ok(Some(password)),
            Err(e) if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
