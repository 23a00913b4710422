//! SSA intermediate representation.
//!
//! This module provides the host-side value and block model the compiler
//! passes operate on:
//!
//! - [`value`] - SSA values and identifiers
//! - [`ops`] - the opcode vocabulary
//! - [`block`] - basic blocks with kinds, control values, and edges
//! - [`function`] - the function container and structural verification
//! - [`builder`] - programmatic construction for tests and benches
//!
//! # Model
//!
//! A function is a flat table of immutable values plus a list of blocks.
//! Values carry an opcode, ordered arguments, and (for constants) an
//! integer payload; their IDs form a stable total order. Blocks carry
//! control flow only: a kind, an optional control value, and ordered
//! successor/predecessor lists. For a conditional block, successor 0 is
//! the positive (true) edge and successor 1 the negative (false) edge.
//!
//! The representation is deliberately minimal: passes in this crate
//! reason about value identity and orderings, never about instruction
//! schedules within a block.

mod block;
mod builder;
mod function;
mod ops;
mod value;

pub use block::{Block, BlockKind};
pub use builder::FunctionBuilder;
pub use function::Function;
pub use ops::Op;
pub use value::{Value, ValueId};
