// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # branchprove
//!
//! Dominator-guided branch proving for SSA functions: a dataflow pass
//! that infers relational facts among values from the comparisons on the
//! dominating path and eliminates conditional branches whose outcome is
//! provably determined. Its primary economic payoff is removing the
//! redundant array-bounds checks front-ends emit, but it subsumes any
//! provable integer, pointer, or boolean comparison.
//!
//! # Architecture
//!
//! - [`crate::ir`] - the SSA value and block model, plus a builder for
//!   constructing functions programmatically
//! - [`crate::analysis`] - dominator tree computation and queries
//! - [`crate::compiler`] - the pass trait, the event log, and the
//!   [`ProvePass`](crate::compiler::ProvePass) itself
//! - [`crate::Error`] and [`crate::Result`] - error handling
//!
//! # How Proving Works
//!
//! Walking the dominator tree, the pass maintains a checkpointable table
//! of the orderings still possible between pairs of values, split by
//! interpretation domain (signed, unsigned, pointer, boolean). Each
//! conditional edge that must have been taken to reach a block
//! contributes facts; each conditional block whose possible orderings
//! all fall on one side of its comparison is rewritten to take that edge
//! unconditionally. Checkpoints are restored on ascent, so facts never
//! leak between sibling subtrees - and the whole walk costs no per-branch
//! table cloning.
//!
//! # Usage
//!
//! ```rust
//! use branchprove::compiler::{EventKind, Pass, PassContext, ProvePass};
//! use branchprove::ir::{BlockKind, FunctionBuilder};
//!
//! // if i <u len(s) { if i <u len(s) { A } else { B } }
//! let mut f = FunctionBuilder::new();
//! let i = f.arg();
//! let s = f.arg();
//! let len = f.slice_len(s);
//! let outer = f.is_in_bounds(i, len);
//! f.if_block(0, outer, 1, 4);
//! let inner = f.is_in_bounds(i, len);
//! f.if_block(1, inner, 2, 3);
//! f.ret_block(2);
//! f.ret_block(3);
//! f.ret_block(4);
//! let mut func = f.finish();
//!
//! let ctx = PassContext::with_debug(1);
//! let changed = ProvePass::new().run_on_function(&mut func, &ctx)?;
//!
//! assert!(changed);
//! // The inner check is gone: the block now always takes its A edge.
//! assert_eq!(func.block(1).unwrap().kind(), BlockKind::First);
//! assert_eq!(
//!     ctx.events().messages_of(EventKind::BranchProved),
//!     vec!["Proved IsInBounds".to_string()],
//! );
//! # Ok::<(), branchprove::Error>(())
//! ```

pub mod analysis;
pub mod compiler;
mod error;
pub mod ir;
pub mod prelude;

pub use error::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;
