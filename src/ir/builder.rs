//! Builder for programmatic function construction.
//!
//! Provides a compact API for building SSA functions without manual ID
//! management, used by unit tests, integration tests, and benchmarks:
//!
//! ```rust
//! use branchprove::ir::FunctionBuilder;
//!
//! // if i <u len(s) { ret } else { ret }
//! let mut f = FunctionBuilder::new();
//! let i = f.arg();
//! let s = f.arg();
//! let len = f.slice_len(s);
//! let cond = f.is_in_bounds(i, len);
//! f.if_block(0, cond, 1, 2);
//! f.ret_block(1);
//! f.ret_block(2);
//!
//! let func = f.finish();
//! assert!(func.verify().is_ok());
//! ```
//!
//! Value-creating helpers return the allocated [`ValueId`] for use in
//! later operations. Blocks may be declared in any order; gaps in the
//! block ID sequence are filled with empty `Ret` blocks so the resulting
//! function always verifies.

use rustc_hash::FxHashMap;

use crate::ir::{Block, BlockKind, Function, Op, ValueId};

/// Builder for constructing SSA functions programmatically.
#[derive(Debug, Default)]
pub struct FunctionBuilder {
    func: Function,
    blocks: FxHashMap<usize, Block>,
    max_block_id: usize,
}

impl FunctionBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value with the given opcode and arguments.
    ///
    /// This is the generic escape hatch; the named helpers below cover
    /// the common operations.
    pub fn value(&mut self, op: Op, args: &[ValueId]) -> ValueId {
        self.func.add_value(op, args.to_vec(), 0)
    }

    /// Adds an opaque function argument.
    pub fn arg(&mut self) -> ValueId {
        self.func.add_value(Op::Arg, vec![], 0)
    }

    /// Adds a 64-bit integer constant.
    pub fn const64(&mut self, value: i64) -> ValueId {
        self.func.add_value(Op::Const64, vec![], value)
    }

    /// Adds a boolean constant.
    pub fn const_bool(&mut self, value: bool) -> ValueId {
        self.func.add_value(Op::ConstBool, vec![], i64::from(value))
    }

    /// Adds a nil pointer constant.
    pub fn const_nil(&mut self) -> ValueId {
        self.func.add_value(Op::ConstNil, vec![], 0)
    }

    /// Adds a slice length operation.
    pub fn slice_len(&mut self, slice: ValueId) -> ValueId {
        self.value(Op::SliceLen, &[slice])
    }

    /// Adds a slice capacity operation.
    pub fn slice_cap(&mut self, slice: ValueId) -> ValueId {
        self.value(Op::SliceCap, &[slice])
    }

    /// Adds a string length operation.
    pub fn string_len(&mut self, string: ValueId) -> ValueId {
        self.value(Op::StringLen, &[string])
    }

    /// Adds a 64-bit addition.
    pub fn add64(&mut self, left: ValueId, right: ValueId) -> ValueId {
        self.value(Op::Add64, &[left, right])
    }

    /// Adds a 64-bit arithmetic right shift.
    pub fn rsh64x64(&mut self, value: ValueId, amount: ValueId) -> ValueId {
        self.value(Op::Rsh64x64, &[value, amount])
    }

    /// Adds a zero extension from 32 to 64 bits.
    pub fn zero_ext32to64(&mut self, value: ValueId) -> ValueId {
        self.value(Op::ZeroExt32to64, &[value])
    }

    /// Adds a comparison with an arbitrary comparison opcode.
    pub fn compare(&mut self, op: Op, left: ValueId, right: ValueId) -> ValueId {
        self.value(op, &[left, right])
    }

    /// Adds a 64-bit signed less-than.
    pub fn less64(&mut self, left: ValueId, right: ValueId) -> ValueId {
        self.compare(Op::Less64, left, right)
    }

    /// Adds a 64-bit unsigned less-than.
    pub fn less64u(&mut self, left: ValueId, right: ValueId) -> ValueId {
        self.compare(Op::Less64U, left, right)
    }

    /// Adds a 64-bit signed less-or-equal.
    pub fn leq64(&mut self, left: ValueId, right: ValueId) -> ValueId {
        self.compare(Op::Leq64, left, right)
    }

    /// Adds a 64-bit signed greater-or-equal.
    pub fn geq64(&mut self, left: ValueId, right: ValueId) -> ValueId {
        self.compare(Op::Geq64, left, right)
    }

    /// Adds a 64-bit equality.
    pub fn eq64(&mut self, left: ValueId, right: ValueId) -> ValueId {
        self.compare(Op::Eq64, left, right)
    }

    /// Adds a 64-bit inequality.
    pub fn neq64(&mut self, left: ValueId, right: ValueId) -> ValueId {
        self.compare(Op::Neq64, left, right)
    }

    /// Adds an array bounds check: `0 <= index < length`.
    pub fn is_in_bounds(&mut self, index: ValueId, length: ValueId) -> ValueId {
        self.compare(Op::IsInBounds, index, length)
    }

    /// Adds a slice bounds check: `0 <= index <= length`.
    pub fn is_slice_in_bounds(&mut self, index: ValueId, length: ValueId) -> ValueId {
        self.compare(Op::IsSliceInBounds, index, length)
    }

    /// Declares a conditional block.
    ///
    /// `positive` is taken when `control` is true, `negative` when false.
    pub fn if_block(&mut self, id: usize, control: ValueId, positive: usize, negative: usize) {
        let mut block = Block::new(id, BlockKind::If);
        block.set_control(control);
        block.push_successor(positive);
        block.push_successor(negative);
        self.insert_block(block);
    }

    /// Declares an unconditional block.
    pub fn plain_block(&mut self, id: usize, target: usize) {
        let mut block = Block::new(id, BlockKind::Plain);
        block.push_successor(target);
        self.insert_block(block);
    }

    /// Declares a function exit block.
    pub fn ret_block(&mut self, id: usize) {
        self.insert_block(Block::new(id, BlockKind::Ret));
    }

    fn insert_block(&mut self, block: Block) {
        if block.id() > self.max_block_id {
            self.max_block_id = block.id();
        }
        self.blocks.insert(block.id(), block);
    }

    /// Consumes the builder and produces the function.
    ///
    /// Blocks are laid out in ID order; gaps in the sequence are filled
    /// with empty `Ret` blocks. Predecessor lists are computed here.
    #[must_use]
    pub fn finish(mut self) -> Function {
        for id in 0..=self.max_block_id {
            let block = self
                .blocks
                .remove(&id)
                .unwrap_or_else(|| Block::new(id, BlockKind::Ret));
            self.func.add_block(block);
        }

        self.func.recompute_predecessors();
        self.func
    }
}
