//! Adapters implementing application ports.

mod deadline;
mod static_variables;
mod system_clock;

pub use deadline::DeadlineVariables;
pub use static_variables::{StaticVariables, VarAssignmentError};
pub use system_clock::{FixedClock, SystemClock};
