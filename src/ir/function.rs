//! SSA function representation.
//!
//! A [`Function`] is the top-level container the prove pass operates on:
//! a flat value table plus a list of basic blocks. Block 0 is the entry.
//!
//! # Structure
//!
//! ```text
//! Function
//! ├── values: Vec<Value>   // flat value table, indexed by ValueId
//! └── blocks: Vec<Block>   // basic blocks, block 0 is the entry
//! ```
//!
//! Values are immutable once added; blocks are mutated only by the
//! targeted rewrite a pass performs when it proves a conditional.

use std::fmt;

use crate::{
    error::malformed_ir,
    ir::{Block, BlockKind, Op, Value, ValueId},
    Error, Result,
};

/// A function in SSA form.
///
/// # Examples
///
/// ```rust
/// use branchprove::ir::{Block, BlockKind, Function, Op};
///
/// let mut func = Function::new();
/// let a = func.add_value(Op::Arg, vec![], 0);
/// let b = func.add_value(Op::Arg, vec![], 0);
/// let cond = func.add_value(Op::Less64, vec![a, b], 0);
///
/// let mut entry = Block::new(0, BlockKind::If);
/// entry.set_control(cond);
/// entry.push_successor(1);
/// entry.push_successor(2);
/// func.add_block(entry);
/// func.add_block(Block::new(1, BlockKind::Ret));
/// func.add_block(Block::new(2, BlockKind::Ret));
/// func.recompute_predecessors();
///
/// assert!(func.verify().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Function {
    /// All values, indexed by [`ValueId`].
    values: Vec<Value>,

    /// All blocks, indexed by block id. Block 0 is the entry.
    blocks: Vec<Block>,
}

impl Function {
    /// Creates a new empty function.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry block index.
    ///
    /// The entry is always block 0.
    #[must_use]
    pub const fn entry(&self) -> usize {
        0
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the number of values.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if this function has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Gets a block by index.
    #[must_use]
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Gets a mutable block by index.
    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Returns the blocks.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns an iterator over blocks with their indices.
    pub fn iter_blocks(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks.iter().enumerate()
    }

    /// Gets a value by ID.
    #[must_use]
    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.values.get(id.index())
    }

    /// Returns the values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Adds a value and returns its freshly assigned ID.
    pub fn add_value(&mut self, op: Op, args: Vec<ValueId>, aux_int: i64) -> ValueId {
        // Value tables are bounded well below u32::MAX in practice.
        #[allow(clippy::cast_possible_truncation)]
        let id = ValueId::new(self.values.len() as u32);
        self.values.push(Value::new(id, op, args, aux_int));
        id
    }

    /// Adds a block.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Rebuilds every block's predecessor list from the successor edges.
    ///
    /// Must be called after constructing or restructuring the block graph
    /// and before computing dominators or running passes.
    pub fn recompute_predecessors(&mut self) {
        for block in &mut self.blocks {
            block.clear_predecessors();
        }

        let edges: Vec<(usize, usize)> = self
            .blocks
            .iter()
            .flat_map(|b| b.successors().iter().map(move |&s| (b.id(), s)))
            .collect();

        for (from, to) in edges {
            if let Some(block) = self.blocks.get_mut(to) {
                block.push_predecessor(from);
            }
        }
    }

    /// Checks structural well-formedness of the function.
    ///
    /// Verifies that:
    ///
    /// - every successor and predecessor index names an existing block,
    /// - predecessor lists agree with successor edges,
    /// - `If` blocks carry a control value and exactly two successors,
    /// - `Plain` and `First` blocks have at least one successor and `Ret`
    ///   blocks have none,
    /// - every value argument and control reference names an existing
    ///   value.
    ///
    /// # Errors
    ///
    /// Returns a [`MalformedIr`](crate::Error::MalformedIr) error naming
    /// the first violated check.
    pub fn verify(&self) -> Result<()> {
        if self.blocks.is_empty() {
            return Err(malformed_ir!("function has no blocks"));
        }

        for value in &self.values {
            for &arg in value.args() {
                if arg.index() >= self.values.len() {
                    return Err(Error::UndefinedValue(arg));
                }
            }
        }

        for block in &self.blocks {
            for &succ in block.successors() {
                if succ >= self.blocks.len() {
                    return Err(Error::BlockOutOfBounds(succ));
                }
                if !self.blocks[succ].predecessors().contains(&block.id()) {
                    return Err(malformed_ir!(
                        "b{} -> b{succ} edge missing from predecessor list",
                        block.id()
                    ));
                }
            }

            if let Some(control) = block.control() {
                if control.index() >= self.values.len() {
                    return Err(Error::UndefinedValue(control));
                }
            }

            match block.kind() {
                BlockKind::If => {
                    if block.control().is_none() {
                        return Err(Error::MissingControl(block.id()));
                    }
                    if block.successors().len() != 2 {
                        return Err(malformed_ir!(
                            "If block b{} has {} successors, expected 2",
                            block.id(),
                            block.successors().len()
                        ));
                    }
                }
                BlockKind::Plain | BlockKind::First => {
                    if block.successors().is_empty() {
                        return Err(malformed_ir!(
                            "{} block b{} has no successors",
                            block.kind(),
                            block.id()
                        ));
                    }
                }
                BlockKind::Ret => {
                    if !block.successors().is_empty() {
                        return Err(malformed_ir!(
                            "Ret block b{} has {} successors, expected 0",
                            block.id(),
                            block.successors().len()
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in &self.values {
            writeln!(f, "  {value}")?;
        }
        for block in &self.blocks {
            writeln!(f, "{block}")?;
        }
        Ok(())
    }
}
