//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use branchprove::prelude::*;
//!
//! let mut f = FunctionBuilder::new();
//! f.ret_block(0);
//! let mut func = f.finish();
//!
//! let ctx = PassContext::new();
//! let changed = ProvePass::new().run_on_function(&mut func, &ctx)?;
//! assert!(!changed);
//! # Ok::<(), Error>(())
//! ```

pub use crate::{
    analysis::DominatorTree,
    compiler::{Domain, EventKind, EventLog, FactTable, Pass, PassContext, ProvePass, Relation},
    ir::{Block, BlockKind, Function, FunctionBuilder, Op, Value, ValueId},
    Error, Result,
};
