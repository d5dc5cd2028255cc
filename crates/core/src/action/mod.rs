//! Per-record actions.
//!
//! The harness never knows what an action does. It hands each [`Record`]
//! to an [`Action`] and classifies the result as an [`Outcome`]:
//! - `Ok(message)` becomes [`Outcome::Success`] and is only counted
//! - `Err(error)` becomes [`Outcome::Failure`] and is written to the result sink
//!
//! Two adapters are provided:
//! - [`FnAction`] wraps an async closure
//! - [`CommandAction`] runs an external program once per record
//!
//! [`Record`]: crate::record::Record

mod command;
mod error;
mod function;
mod traits;

pub use command::{CommandAction, CommandConfig};
pub use error::ActionError;
pub use function::FnAction;
pub use traits::{Action, Outcome};
