//! Turns a forest of parsed declarations into a C++-flavoured program
//! stream plus the two header texts (imports/exports) the driver writes
//! alongside it.

mod emitter;
pub mod error;
pub mod naming;
pub mod stdlib_map;

pub use emitter::Emitter;
pub use error::{EmitError, Result};
