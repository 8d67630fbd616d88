//! State table and publish interface for the Trellis matching machine.
//!
//! This crate contains:
//! - [`StateId`]: index of a published root
//! - [`Machine`]: the publish interface the compiler writes through
//! - [`StateTable`]: an in-memory machine with probing helpers
//! - [`dump`]: a textual rendering of a table

mod dump;
mod ids;
mod machine;
mod table;

pub use dump::dump;
pub use ids::StateId;
pub use machine::{MAX_STATE_SIZE, Machine, MachineError, Publish};
pub use table::StateTable;
