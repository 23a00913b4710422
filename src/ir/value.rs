//! SSA value representation and identifiers.
//!
//! Each value is defined exactly once and identified by a [`ValueId`], a
//! lightweight handle into the function's value table. The ID encodes no
//! semantic information but provides the stable total order the fact
//! table relies on for pair canonicalization.

use std::fmt;

use crate::ir::Op;

/// Unique identifier for an SSA value.
///
/// A handle into the value table of a [`Function`], providing O(1) access
/// to value metadata. IDs are unique within a single function and never
/// reused, so they double as a total order over values.
///
/// [`Function`]: crate::ir::Function
///
/// # Examples
///
/// ```rust
/// use branchprove::ir::ValueId;
///
/// let id = ValueId::new(3);
/// assert_eq!(id.index(), 3);
/// assert_eq!(id.to_string(), "v3");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueId(u32);

impl ValueId {
    /// Creates a new value identifier.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying index into the value table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// An SSA value: an opcode applied to zero or more argument values.
///
/// Values are immutable once added to a function. Constants carry their
/// payload in `aux_int`; for [`Op::ConstBool`] the payload is 0 or 1.
#[derive(Debug, Clone)]
pub struct Value {
    /// Stable identifier, equal to the value's index in the value table.
    id: ValueId,

    /// The operation computing this value.
    op: Op,

    /// Argument values, in operand order.
    args: Vec<ValueId>,

    /// Auxiliary integer payload. Meaningful only for constant opcodes.
    aux_int: i64,
}

impl Value {
    /// Creates a new value.
    ///
    /// Values are normally created through [`Function::add_value`] or the
    /// [`FunctionBuilder`], which assign sequential IDs.
    ///
    /// [`Function::add_value`]: crate::ir::Function::add_value
    /// [`FunctionBuilder`]: crate::ir::FunctionBuilder
    #[must_use]
    pub fn new(id: ValueId, op: Op, args: Vec<ValueId>, aux_int: i64) -> Self {
        Self {
            id,
            op,
            args,
            aux_int,
        }
    }

    /// Returns the value's identifier.
    #[must_use]
    pub const fn id(&self) -> ValueId {
        self.id
    }

    /// Returns the value's opcode.
    #[must_use]
    pub const fn op(&self) -> Op {
        self.op
    }

    /// Returns the argument values.
    #[must_use]
    pub fn args(&self) -> &[ValueId] {
        &self.args
    }

    /// Returns the argument at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds for this value's arity.
    #[must_use]
    pub fn arg(&self, index: usize) -> ValueId {
        self.args[index]
    }

    /// Returns the auxiliary integer payload.
    ///
    /// For [`Op::Const64`] this is the constant itself; for
    /// [`Op::ConstBool`] it is 0 or 1. For non-constant opcodes the
    /// payload is 0 and carries no meaning.
    #[must_use]
    pub const fn aux_int(&self) -> i64 {
        self.aux_int
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.id, self.op)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        if self.op.is_const() {
            write!(f, " [{}]", self.aux_int)?;
        }
        Ok(())
    }
}
