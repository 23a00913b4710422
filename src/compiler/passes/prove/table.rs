//! The opcode to (domain, relation) lookup.
//!
//! For each comparison opcode this table gives the domain union it
//! reasons in and the relation that holds between its two arguments when
//! the comparison is true. It is the only place the opcode vocabulary
//! leaks into the prove pass: opcodes without an entry are opaque, and a
//! conditional over one can still be proven through the boolean-domain
//! fact on the control value itself.

use crate::{
    compiler::passes::prove::relation::{Domain, Relation},
    ir::Op,
};

/// Returns the domains and positive-edge relation asserted by a
/// comparison opcode, or `None` for opcodes the pass cannot interpret.
///
/// Equality and inequality assert in the signed and unsigned domains
/// simultaneously, since equal bit patterns are equal under both
/// interpretations. The bounds checks assert only unsigned less-than
/// (`IsInBounds`) and unsigned less-or-equal (`IsSliceInBounds`): an
/// in-bounds index, being non-negative, compares the same way unsigned as
/// it does signed, but the negative edge only recovers the unsigned
/// complement, so nothing signed is recorded here.
pub(crate) fn branch_relation(op: Op) -> Option<(Domain, Relation)> {
    const LT: Relation = Relation::LT;
    const EQ: Relation = Relation::EQ;
    const GT: Relation = Relation::GT;
    const LE: Relation = Relation::LT.union(Relation::EQ);
    const NE: Relation = Relation::LT.union(Relation::GT);
    const GE: Relation = Relation::EQ.union(Relation::GT);

    let both = Domain::SIGNED.union(Domain::UNSIGNED);

    let entry = match op {
        Op::Eq8 | Op::Eq16 | Op::Eq32 | Op::Eq64 => (both, EQ),
        Op::EqPtr => (Domain::POINTER, EQ),

        Op::Neq8 | Op::Neq16 | Op::Neq32 | Op::Neq64 => (both, NE),
        Op::NeqPtr => (Domain::POINTER, NE),

        Op::Less8 | Op::Less16 | Op::Less32 | Op::Less64 => (Domain::SIGNED, LT),
        Op::Less8U | Op::Less16U | Op::Less32U | Op::Less64U => (Domain::UNSIGNED, LT),

        Op::Leq8 | Op::Leq16 | Op::Leq32 | Op::Leq64 => (Domain::SIGNED, LE),
        Op::Leq8U | Op::Leq16U | Op::Leq32U | Op::Leq64U => (Domain::UNSIGNED, LE),

        Op::Geq8 | Op::Geq16 | Op::Geq32 | Op::Geq64 => (Domain::SIGNED, GE),
        Op::Geq8U | Op::Geq16U | Op::Geq32U | Op::Geq64U => (Domain::UNSIGNED, GE),

        Op::Greater8 | Op::Greater16 | Op::Greater32 | Op::Greater64 => (Domain::SIGNED, GT),
        Op::Greater8U | Op::Greater16U | Op::Greater32U | Op::Greater64U => (Domain::UNSIGNED, GT),

        Op::IsInBounds => (Domain::UNSIGNED, LT),
        Op::IsSliceInBounds => (Domain::UNSIGNED, LE),

        _ => return None,
    };

    Some(entry)
}
