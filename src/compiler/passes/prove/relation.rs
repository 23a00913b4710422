//! Relation sets and ordering domains.
//!
//! A [`Relation`] is a set of possible orderings between a pair of
//! values, encoded as a 3-bit mask over {less, equal, greater}. Without
//! prior knowledge the set is [`Relation::ANY`]; branching on a
//! comparison intersects away the orderings the taken edge rules out.
//! An empty set means the path is infeasible.
//!
//! A [`Domain`] selects the interpretation under which an ordering holds.
//! The same bit pattern orders differently as a signed and as an unsigned
//! integer, so relations learned in one domain say nothing about another.
//! Equality opcodes assert in several domains at once, which is why
//! `Domain` is a bit mask rather than a plain enum.

use std::{fmt, ops};

use bitflags::bitflags;

/// Pointwise swap of the LT and GT bits for each of the 8 possible masks.
const REVERSE: [u8; 8] = [0, 4, 2, 6, 1, 5, 3, 7];

/// A set of possible orderings between two values.
///
/// # Examples
///
/// ```rust
/// use branchprove::compiler::Relation;
///
/// // "v < w" reversed is "w > v".
/// assert_eq!(Relation::LT.reverse(), Relation::GT);
///
/// // The complement of "<" is ">=".
/// assert_eq!(Relation::LT.complement(), Relation::EQ | Relation::GT);
///
/// // Intersection is how knowledge grows more precise.
/// let le = Relation::LT | Relation::EQ;
/// assert_eq!(le & Relation::LT, Relation::LT);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relation(u8);

impl Relation {
    /// The empty set: no ordering is possible (infeasible path).
    pub const EMPTY: Self = Self(0);
    /// The first value is less than the second.
    pub const LT: Self = Self(1);
    /// The two values are equal.
    pub const EQ: Self = Self(2);
    /// The first value is greater than the second.
    pub const GT: Self = Self(4);
    /// Any ordering is possible: no information.
    pub const ANY: Self = Self(1 | 2 | 4);

    /// Returns the relation as seen with the arguments swapped.
    ///
    /// LT and GT trade places; EQ is symmetric. An 8-entry table keeps
    /// this branch-free.
    #[must_use]
    pub const fn reverse(self) -> Self {
        Self(REVERSE[self.0 as usize])
    }

    /// Returns the orderings *not* in this set.
    ///
    /// The facts that hold on the negative edge of a branch are the
    /// complement of the facts its positive edge asserts.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self(Self::ANY.0 ^ self.0)
    }

    /// Returns `true` if no ordering is possible.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every ordering in `self` is also in `other`.
    #[must_use]
    pub const fn is_subset_of(self, other: Self) -> bool {
        self.0 & other.0 == self.0
    }

    /// Returns the union of two relation sets.
    ///
    /// Usable in const context, unlike the `BitOr` impl.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the raw bit mask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl ops::BitAnd for Relation {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl ops::BitOr for Relation {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }

        f.write_str("{")?;
        let mut first = true;
        for (bit, sym) in [(Self::LT, "<"), (Self::EQ, "="), (Self::GT, ">")] {
            if bit.is_subset_of(*self) {
                if !first {
                    f.write_str(",")?;
                }
                f.write_str(sym)?;
                first = false;
            }
        }
        f.write_str("}")
    }
}

bitflags! {
    /// Interpretation domains in which an ordering can hold.
    ///
    /// A pair of values may hold independent relation sets in different
    /// domains; a table entry may assert over a union of domains.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Domain: u8 {
        /// Two's-complement signed integer ordering.
        const SIGNED = 1;
        /// Unsigned integer ordering.
        const UNSIGNED = 1 << 1;
        /// Pointer ordering (only equality is ever asserted).
        const POINTER = 1 << 2;
        /// Boolean ordering relative to false.
        const BOOLEAN = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_masks() -> impl Iterator<Item = Relation> {
        (0u8..8).map(Relation)
    }

    #[test]
    fn test_reverse_swaps_lt_and_gt() {
        assert_eq!(Relation::LT.reverse(), Relation::GT);
        assert_eq!(Relation::GT.reverse(), Relation::LT);
        assert_eq!(Relation::EQ.reverse(), Relation::EQ);
        assert_eq!(
            (Relation::LT | Relation::EQ).reverse(),
            Relation::EQ | Relation::GT
        );
        assert_eq!(Relation::ANY.reverse(), Relation::ANY);
        assert_eq!(Relation::EMPTY.reverse(), Relation::EMPTY);
    }

    #[test]
    fn test_reverse_is_involutive() {
        for r in all_masks() {
            assert_eq!(r.reverse().reverse(), r, "reverse(reverse({r})) != {r}");
        }
    }

    #[test]
    fn test_complement() {
        assert_eq!(Relation::LT.complement(), Relation::EQ | Relation::GT);
        assert_eq!(Relation::ANY.complement(), Relation::EMPTY);
        assert_eq!(Relation::EMPTY.complement(), Relation::ANY);
        for r in all_masks() {
            assert_eq!(r.complement().complement(), r);
            assert_eq!(r & r.complement(), Relation::EMPTY);
        }
    }

    #[test]
    fn test_intersection_shrinks() {
        for a in all_masks() {
            for b in all_masks() {
                let i = a & b;
                assert!(i.is_subset_of(a));
                assert!(i.is_subset_of(b));
            }
        }
    }

    #[test]
    fn test_subset() {
        assert!(Relation::LT.is_subset_of(Relation::LT | Relation::EQ));
        assert!(!Relation::GT.is_subset_of(Relation::LT | Relation::EQ));
        assert!(Relation::EMPTY.is_subset_of(Relation::EMPTY));
        for r in all_masks() {
            assert!(r.is_subset_of(Relation::ANY));
            assert!(Relation::EMPTY.is_subset_of(r));
        }
    }

    #[test]
    fn test_relation_display() {
        assert_eq!(Relation::EMPTY.to_string(), "{}");
        assert_eq!(Relation::LT.to_string(), "{<}");
        assert_eq!((Relation::LT | Relation::EQ).to_string(), "{<,=}");
        assert_eq!(Relation::ANY.to_string(), "{<,=,>}");
    }

    #[test]
    fn test_domain_iteration_yields_single_bits() {
        let union = Domain::SIGNED | Domain::UNSIGNED;
        let bits: Vec<Domain> = union.iter().collect();
        assert_eq!(bits, vec![Domain::SIGNED, Domain::UNSIGNED]);

        let single: Vec<Domain> = Domain::BOOLEAN.iter().collect();
        assert_eq!(single, vec![Domain::BOOLEAN]);
    }
}
