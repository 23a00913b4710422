//! Opcode vocabulary for the SSA value model.
//!
//! The set of opcodes is intentionally narrow: it covers the comparison
//! family at each integer width (signed and unsigned), pointer equality,
//! the two bounds-check forms emitted for array and slice indexing, and
//! the value-producing operations the non-negativity analysis inspects
//! (constants, lengths, zero extensions, right shifts). Everything the
//! prove pass does not reason about is represented by opaque opcodes like
//! [`Op::Arg`] and [`Op::Phi`].
//!
//! Width suffixes follow the usual convention: `Less32` compares two
//! 32-bit values as signed integers, `Less32U` compares the same bit
//! patterns as unsigned. The distinction matters because a relation
//! learned in one interpretation says nothing about the other.

use strum::Display;

/// An SSA operation.
///
/// Comparison opcodes produce a boolean value from two operands and may
/// serve as the control value of a conditional block. The remaining
/// opcodes exist so that realistic functions can be built and so that the
/// non-negativity analysis has definitions to look through.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Incoming function argument. Opaque to all analyses.
    Arg,
    /// Value merge at a control flow join. Opaque to all analyses.
    Phi,
    /// Copy of another value.
    Copy,

    /// 64-bit integer constant; the payload lives in the value's `aux_int`.
    Const64,
    /// Boolean constant; `aux_int` is 0 or 1.
    ConstBool,
    /// Nil pointer constant.
    ConstNil,

    /// 64-bit addition.
    Add64,
    /// 64-bit subtraction.
    Sub64,
    /// 64-bit arithmetic right shift (signed value, 64-bit shift amount).
    Rsh64x64,

    /// Length of a string.
    StringLen,
    /// Length of a slice.
    SliceLen,
    /// Capacity of a slice.
    SliceCap,

    /// Zero extension from 8 to 64 bits.
    ZeroExt8to64,
    /// Zero extension from 16 to 64 bits.
    ZeroExt16to64,
    /// Zero extension from 32 to 64 bits.
    ZeroExt32to64,

    /// 8-bit equality.
    Eq8,
    /// 16-bit equality.
    Eq16,
    /// 32-bit equality.
    Eq32,
    /// 64-bit equality.
    Eq64,
    /// Pointer equality.
    EqPtr,

    /// 8-bit inequality.
    Neq8,
    /// 16-bit inequality.
    Neq16,
    /// 32-bit inequality.
    Neq32,
    /// 64-bit inequality.
    Neq64,
    /// Pointer inequality.
    NeqPtr,

    /// 8-bit signed less-than.
    Less8,
    /// 8-bit unsigned less-than.
    Less8U,
    /// 16-bit signed less-than.
    Less16,
    /// 16-bit unsigned less-than.
    Less16U,
    /// 32-bit signed less-than.
    Less32,
    /// 32-bit unsigned less-than.
    Less32U,
    /// 64-bit signed less-than.
    Less64,
    /// 64-bit unsigned less-than.
    Less64U,

    /// 8-bit signed less-or-equal.
    Leq8,
    /// 8-bit unsigned less-or-equal.
    Leq8U,
    /// 16-bit signed less-or-equal.
    Leq16,
    /// 16-bit unsigned less-or-equal.
    Leq16U,
    /// 32-bit signed less-or-equal.
    Leq32,
    /// 32-bit unsigned less-or-equal.
    Leq32U,
    /// 64-bit signed less-or-equal.
    Leq64,
    /// 64-bit unsigned less-or-equal.
    Leq64U,

    /// 8-bit signed greater-or-equal.
    Geq8,
    /// 8-bit unsigned greater-or-equal.
    Geq8U,
    /// 16-bit signed greater-or-equal.
    Geq16,
    /// 16-bit unsigned greater-or-equal.
    Geq16U,
    /// 32-bit signed greater-or-equal.
    Geq32,
    /// 32-bit unsigned greater-or-equal.
    Geq32U,
    /// 64-bit signed greater-or-equal.
    Geq64,
    /// 64-bit unsigned greater-or-equal.
    Geq64U,

    /// 8-bit signed greater-than.
    Greater8,
    /// 8-bit unsigned greater-than.
    Greater8U,
    /// 16-bit signed greater-than.
    Greater16,
    /// 16-bit unsigned greater-than.
    Greater16U,
    /// 32-bit signed greater-than.
    Greater32,
    /// 32-bit unsigned greater-than.
    Greater32U,
    /// 64-bit signed greater-than.
    Greater64,
    /// 64-bit unsigned greater-than.
    Greater64U,

    /// Array bounds check: `0 <= index < length`.
    IsInBounds,
    /// Slice bounds check: `0 <= index <= length` (an index equal to the
    /// length is a valid slicing position).
    IsSliceInBounds,
}

impl Op {
    /// Returns `true` if this opcode produces a constant value.
    #[must_use]
    pub const fn is_const(self) -> bool {
        matches!(self, Self::Const64 | Self::ConstBool | Self::ConstNil)
    }

    /// Returns `true` if this opcode is one of the two bounds-check forms.
    #[must_use]
    pub const fn is_bounds_check(self) -> bool {
        matches!(self, Self::IsInBounds | Self::IsSliceInBounds)
    }
}
