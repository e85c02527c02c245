//! Markdown formatting for models and operation outcomes.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections get newtype wrappers ([`collections`]) and every
//! [`Outcome`](crate::models::Outcome) renders as a status line followed by
//! its payload ([`status`]). The CLI pipes this markdown through its terminal
//! renderer and the MCP server returns it verbatim.
//!
//! ```rust
//! use mender_core::{display::OperationStatus, models::Outcome};
//!
//! let outcome: Outcome<String> = Outcome::failed("Plan with ID 7 not found");
//! assert_eq!(outcome.to_string(), "Error: Plan with ID 7 not found\n");
//!
//! let status = OperationStatus::success("Compiled plan".to_string());
//! assert_eq!(status.to_string(), "Success: Compiled plan\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{FileChanges, PlanRecords};
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
