//! Status lines and outcome formatting.

use std::fmt;

use crate::models::Outcome;

/// A one-line success or error message.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            if self.success { "Success:" } else { "Error:" },
            self.message
        )
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_success() {
            OperationStatus::success(self.description.clone())
        } else {
            OperationStatus::failure(self.description.clone())
        };
        write!(f, "{status}")?;
        if let Some(value) = &self.value {
            writeln!(f)?;
            write!(f, "{value}")?;
        }
        Ok(())
    }
}
