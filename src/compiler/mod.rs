//! Compiler infrastructure for SSA transformations.
//!
//! This module provides the machinery shared by optimization passes and
//! the passes themselves:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     Pass Execution                       │
//! ├──────────────────────────────────────────────────────────┤
//! │                                                          │
//! │  PassContext            Shared per-run state             │
//! │    ├─ EventLog          (what happened, and where)       │
//! │    └─ debug level       (how chatty proofs should be)    │
//! │                                                          │
//! │  Pass trait             Interface for all passes         │
//! │    └─ run_on_function() Per-function transformation      │
//! │                                                          │
//! │  Passes                                                  │
//! │    └─ ProvePass         Branch proving over the          │
//! │                         dominator tree with a            │
//! │                         checkpointable fact table        │
//! │                                                          │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod context;
mod events;
mod pass;
mod passes;

pub use context::PassContext;
pub use events::{Event, EventBuilder, EventKind, EventLog};
pub use pass::Pass;
pub use passes::{prove, Domain, FactTable, ProvePass, Relation};
