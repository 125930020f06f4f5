//! Filesystem operations: collision naming and the collision-safe mover.

mod copy;
mod helpers;
mod mover;
mod naming;
mod util;

pub use helpers::describe_io_error;
pub use mover::move_and_rename;
pub use naming::{disambiguated_name, split_name};
