//! Configuration for a sitefetch run
//!
//! All knobs are explicit fields on [`Options`]; nothing is read from the
//! process environment at runtime.

mod types;
mod validation;

pub use types::{default_user_agent, BasicAuth, Options, SlowLimit};
pub use validation::validate;
