//! Basic blocks and block kinds.
//!
//! A block carries control flow only: its kind, an optional control value,
//! and ordered successor and predecessor lists. For conditional blocks the
//! successor order is significant - index 0 is taken when the control is
//! true (the positive successor), index 1 when it is false (the negative
//! successor).
//!
//! # Block Rewriting
//!
//! When a pass proves a conditional's outcome, the block is downgraded to
//! [`BlockKind::First`]: the control value is detached and successor 0 is
//! always taken. Proving the negative outcome additionally swaps the two
//! successors so the surviving edge sits at index 0. The dead successor
//! edge stays in place for later cleanup passes.

use std::fmt;

use strum::Display;

use crate::ir::ValueId;

/// The kind of a basic block, determining how its successors are chosen.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Unconditional: exactly one successor.
    Plain,

    /// Conditional: a control value selects between two successors.
    /// Successor 0 is taken when the control is true.
    If,

    /// Degenerate conditional: successor 0 is always taken regardless of
    /// any control. Produced by rewriting a proven [`BlockKind::If`].
    First,

    /// Function exit: no successors.
    Ret,
}

/// A basic block.
///
/// # Examples
///
/// ```rust
/// use branchprove::ir::{Block, BlockKind, ValueId};
///
/// let mut block = Block::new(0, BlockKind::If);
/// block.set_control(ValueId::new(3));
/// block.push_successor(1);
/// block.push_successor(2);
///
/// assert_eq!(block.successors(), &[1, 2]);
/// assert_eq!(block.control(), Some(ValueId::new(3)));
/// ```
#[derive(Debug, Clone)]
pub struct Block {
    /// Block index within the function.
    id: usize,

    /// How this block transfers control.
    kind: BlockKind,

    /// The condition for [`BlockKind::If`] blocks, `None` otherwise.
    control: Option<ValueId>,

    /// Successor block indices. Index 0 is the positive successor of a
    /// conditional.
    succs: Vec<usize>,

    /// Predecessor block indices. Maintained by
    /// [`Function::recompute_predecessors`].
    ///
    /// [`Function::recompute_predecessors`]: crate::ir::Function::recompute_predecessors
    preds: Vec<usize>,
}

impl Block {
    /// Creates a new block with no control value and no edges.
    #[must_use]
    pub fn new(id: usize, kind: BlockKind) -> Self {
        Self {
            id,
            kind,
            control: None,
            succs: Vec::new(),
            preds: Vec::new(),
        }
    }

    /// Returns the block index.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Returns the block kind.
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Sets the block kind.
    pub fn set_kind(&mut self, kind: BlockKind) {
        self.kind = kind;
    }

    /// Returns the control value, if any.
    #[must_use]
    pub const fn control(&self) -> Option<ValueId> {
        self.control
    }

    /// Sets the control value.
    pub fn set_control(&mut self, control: ValueId) {
        self.control = Some(control);
    }

    /// Detaches and returns the control value.
    pub fn take_control(&mut self) -> Option<ValueId> {
        self.control.take()
    }

    /// Returns the successor block indices.
    #[must_use]
    pub fn successors(&self) -> &[usize] {
        &self.succs
    }

    /// Returns the predecessor block indices.
    #[must_use]
    pub fn predecessors(&self) -> &[usize] {
        &self.preds
    }

    /// Appends a successor edge.
    pub fn push_successor(&mut self, target: usize) {
        self.succs.push(target);
    }

    /// Swaps the two successor edges of a conditional.
    ///
    /// # Panics
    ///
    /// Panics if the block does not have exactly two successors.
    pub fn swap_successors(&mut self) {
        assert_eq!(
            self.succs.len(),
            2,
            "swap_successors on block {} with {} successors",
            self.id,
            self.succs.len()
        );
        self.succs.swap(0, 1);
    }

    /// Returns the positive (true) successor of a two-way conditional.
    #[must_use]
    pub fn positive_successor(&self) -> Option<usize> {
        self.succs.first().copied()
    }

    /// Returns the negative (false) successor of a two-way conditional.
    #[must_use]
    pub fn negative_successor(&self) -> Option<usize> {
        self.succs.get(1).copied()
    }

    pub(crate) fn clear_predecessors(&mut self) {
        self.preds.clear();
    }

    pub(crate) fn push_predecessor(&mut self, pred: usize) {
        self.preds.push(pred);
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}: {}", self.id, self.kind)?;
        if let Some(control) = self.control {
            write!(f, " {control}")?;
        }
        if !self.succs.is_empty() {
            write!(f, " ->")?;
            for s in &self.succs {
                write!(f, " b{s}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_creation() {
        let block = Block::new(3, BlockKind::Plain);
        assert_eq!(block.id(), 3);
        assert_eq!(block.kind(), BlockKind::Plain);
        assert!(block.control().is_none());
        assert!(block.successors().is_empty());
        assert!(block.predecessors().is_empty());
    }

    #[test]
    fn test_block_control() {
        let mut block = Block::new(0, BlockKind::If);
        block.set_control(ValueId::new(7));
        assert_eq!(block.control(), Some(ValueId::new(7)));

        let taken = block.take_control();
        assert_eq!(taken, Some(ValueId::new(7)));
        assert!(block.control().is_none());
    }

    #[test]
    fn test_block_successor_order() {
        let mut block = Block::new(0, BlockKind::If);
        block.push_successor(5);
        block.push_successor(9);

        assert_eq!(block.positive_successor(), Some(5));
        assert_eq!(block.negative_successor(), Some(9));

        block.swap_successors();
        assert_eq!(block.positive_successor(), Some(9));
        assert_eq!(block.negative_successor(), Some(5));
    }

    #[test]
    #[should_panic(expected = "swap_successors")]
    fn test_block_swap_requires_two_successors() {
        let mut block = Block::new(0, BlockKind::Plain);
        block.push_successor(1);
        block.swap_successors();
    }

    #[test]
    fn test_block_display() {
        let mut block = Block::new(1, BlockKind::If);
        block.set_control(ValueId::new(4));
        block.push_successor(2);
        block.push_successor(3);
        assert_eq!(block.to_string(), "b1: If v4 -> b2 b3");

        let ret = Block::new(5, BlockKind::Ret);
        assert_eq!(ret.to_string(), "b5: Ret");
    }
}
