//! Pipeline entry points for the polling bot.
//!
//! - `validate`: response shape checks and status interpretation
//! - `poll`: the fetch → validate → notify loop

pub mod poll;
pub mod validate;

pub use poll::{CycleOutcome, PollState, Poller};
pub use validate::{check_response, current_date, parse_status};
