//! Branch proving pass.
//!
//! Removes conditional branches whose outcome is already determined by
//! comparisons on the dominating path. By far the most common redundant
//! pair is generated by bounds checking:
//!
//! ```text
//! if i >= len(a) { panic }
//! a[i] = 4
//! if i >= len(a) { panic }     // provably false here
//! use(a[i])
//! ```
//!
//! The second check is redundant: on the only path reaching it, `i <
//! len(a)` already holds. This pass proves that and rewrites the second
//! conditional so its live edge is taken unconditionally.
//!
//! # How it works
//!
//! The pass walks the dominator tree with an explicit two-phase stack.
//! Descending into a block that sits under exactly one edge of its
//! immediate dominator's conditional, it checkpoints the [`FactTable`]
//! and installs what that edge guarantees: the control value's boolean
//! truth, and - when the control is a comparison the opcode table
//! knows - the asserted ordering of its two arguments in every
//! applicable domain (complemented on the negative edge). After all
//! dominated blocks are handled the table is restored, so facts never
//! leak across sibling subtrees.
//!
//! At each conditional block the accumulated facts are consulted: if
//! every ordering still possible between the compared values lies inside
//! the set the comparison accepts (or inside its complement), the branch
//! is decided. The block is then rewritten to [`BlockKind::First`] with
//! the surviving edge at successor 0; dead edges are left for later
//! cleanup passes.
//!
//! Facts are never learned across loop back-edges or at control flow
//! joins: an edge contributes facts only when it is the join's sole
//! predecessor and dominates it.

mod facts;
mod relation;
mod table;

pub use facts::FactTable;
pub use relation::{Domain, Relation};

use crate::{
    analysis::DominatorTree,
    compiler::{passes::prove::table::branch_relation, EventKind, Pass, PassContext},
    ir::{Block, BlockKind, Function, Op, ValueId},
    Result,
};

/// Which edge of a conditional is (or must be) taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchOutcome {
    /// The positive (true) edge.
    Positive,
    /// The negative (false) edge.
    Negative,
    /// Not determined.
    Unknown,
}

/// One entry of the explicit dominator-tree walk stack.
#[derive(Debug, Clone, Copy)]
enum WorkItem {
    /// Install the facts the parent's branch guarantees, then queue the
    /// block's simplification and its dominator-tree children.
    Descend { block: usize },
    /// Attempt to decide the block's conditional, then roll back the
    /// facts installed during the matching descent.
    Simplify {
        block: usize,
        /// Whether the descent checkpointed and installed facts. Cached
        /// here so sibling rewrites cannot desynchronise the
        /// checkpoint/restore pairing.
        installed: bool,
    },
}

/// Branch proving pass.
///
/// # Examples
///
/// ```rust
/// use branchprove::compiler::{Pass, PassContext, ProvePass};
/// use branchprove::ir::{BlockKind, FunctionBuilder};
///
/// // Two identical bounds checks, the second dominated by the
/// // positive edge of the first.
/// let mut f = FunctionBuilder::new();
/// let i = f.arg();
/// let s = f.arg();
/// let len = f.slice_len(s);
/// let first = f.is_in_bounds(i, len);
/// f.if_block(0, first, 1, 4);
/// let second = f.is_in_bounds(i, len);
/// f.if_block(1, second, 2, 3);
/// f.ret_block(2);
/// f.ret_block(3);
/// f.ret_block(4);
/// let mut func = f.finish();
///
/// let ctx = PassContext::new();
/// let changed = ProvePass::new().run_on_function(&mut func, &ctx)?;
///
/// assert!(changed);
/// assert_eq!(func.block(1).unwrap().kind(), BlockKind::First);
/// # Ok::<(), branchprove::Error>(())
/// ```
pub struct ProvePass;

impl Default for ProvePass {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvePass {
    /// Creates a new branch proving pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for ProvePass {
    fn name(&self) -> &'static str {
        "prove"
    }

    fn description(&self) -> &'static str {
        "Removes conditional branches whose outcome dominating comparisons determine"
    }

    fn run_on_function(&self, func: &mut Function, ctx: &PassContext) -> Result<bool> {
        if func.is_empty() {
            return Ok(false);
        }

        let dom = DominatorTree::compute(func);
        let mut ft = FactTable::new();
        let mut changed = false;

        let mut work = Vec::with_capacity(func.block_count() * 2);
        work.push(WorkItem::Descend {
            block: func.entry(),
        });

        while let Some(item) = work.pop() {
            match item {
                WorkItem::Descend { block } => {
                    let parent = dom.idom(block);
                    let branch = branch_from_parent(func, &dom, parent, block);

                    let mut installed = false;
                    if branch != BranchOutcome::Unknown {
                        if let Some(parent) = parent {
                            ft.checkpoint();
                            install_branch_facts(func, &mut ft, parent, branch);
                            installed = true;
                        }
                    }

                    // LIFO order: children run before this block's
                    // Simplify, so the subtree sees the installed facts.
                    work.push(WorkItem::Simplify { block, installed });
                    for child in dom.children(block) {
                        work.push(WorkItem::Descend { block: child });
                    }
                }

                WorkItem::Simplify { block, installed } => {
                    let outcome = simplify_block(func, &ft, block, ctx);
                    if outcome != BranchOutcome::Unknown {
                        rewrite_block(func, block, outcome, ctx);
                        changed = true;
                    }

                    if installed {
                        ft.restore();
                    }
                }
            }
        }

        debug_assert_eq!(ft.checkpoint_depth(), 0);
        Ok(changed)
    }
}

/// Determines which edge of `block`'s immediate dominator must have been
/// taken to reach `block`.
///
/// The answer is only definite when the relevant successor both
/// dominates `block` and has a single predecessor: at a join fed by
/// several edges, facts that hold on one incoming edge need not hold on
/// the others, so nothing may be installed.
fn branch_from_parent(
    func: &Function,
    dom: &DominatorTree,
    parent: Option<usize>,
    block: usize,
) -> BranchOutcome {
    let Some(parent) = parent else {
        return BranchOutcome::Unknown;
    };
    let Some(pb) = func.block(parent) else {
        return BranchOutcome::Unknown;
    };
    if pb.kind() != BlockKind::If {
        return BranchOutcome::Unknown;
    }

    let (Some(positive), Some(negative)) = (pb.positive_successor(), pb.negative_successor())
    else {
        return BranchOutcome::Unknown;
    };

    let sole_pred =
        |b: usize| func.block(b).is_some_and(|blk| blk.predecessors().len() == 1);

    if dom.is_ancestor_or_eq(positive, block) && sole_pred(positive) {
        return BranchOutcome::Positive;
    }
    if dom.is_ancestor_or_eq(negative, block) && sole_pred(negative) {
        return BranchOutcome::Negative;
    }
    BranchOutcome::Unknown
}

/// Installs the facts guaranteed by taking `branch` out of `parent`.
///
/// The control value itself is recorded in the boolean domain relative
/// to the zero value: non-equal when the positive edge was taken, equal
/// when the negative edge was. If the control is a comparison with a
/// table entry, its argument ordering is recorded in every domain the
/// entry names.
fn install_branch_facts(func: &Function, ft: &mut FactTable, parent: usize, branch: BranchOutcome) {
    let Some(control) = func.block(parent).and_then(Block::control) else {
        return;
    };

    update_restrictions(
        ft,
        Domain::BOOLEAN,
        None,
        Some(control),
        Relation::LT.union(Relation::GT),
        branch,
    );

    let Some(cv) = func.value(control) else {
        return;
    };
    if let Some((domains, relation)) = branch_relation(cv.op()) {
        if let &[a0, a1] = cv.args() {
            update_restrictions(ft, domains, Some(a0), Some(a1), relation, branch);
        }
    }
}

/// Restricts `(v, w)` to `r` in every single-bit domain of `domains`,
/// complementing `r` when the negative branch was taken.
fn update_restrictions(
    ft: &mut FactTable,
    domains: Domain,
    v: Option<ValueId>,
    w: Option<ValueId>,
    r: Relation,
    branch: BranchOutcome,
) {
    if domains.is_empty() || branch == BranchOutcome::Unknown {
        return;
    }

    let r = if branch == BranchOutcome::Negative {
        r.complement()
    } else {
        r
    };

    for d in domains.iter() {
        ft.update(v, w, d, r);
    }
}

/// Decides a conditional block from the currently known facts.
///
/// Returns which edge must be taken, or
/// [`BranchOutcome::Unknown`] when the facts do not determine it. An
/// empty relation set - a contradiction, meaning the block is
/// unreachable - is deliberately treated as not-proven; this pass leaves
/// dead code for others.
fn simplify_block(func: &Function, ft: &FactTable, block: usize, ctx: &PassContext) -> BranchOutcome {
    let Some(b) = func.block(block) else {
        return BranchOutcome::Unknown;
    };
    if b.kind() != BlockKind::If {
        return BranchOutcome::Unknown;
    }
    let Some(control) = b.control() else {
        return BranchOutcome::Unknown;
    };
    let Some(cv) = func.value(control) else {
        return BranchOutcome::Unknown;
    };
    let op = cv.op();

    // A dominating branch may have pinned the control value's truth even
    // when its opcode is opaque to the relation table.
    let m = ft.get(None, Some(control), Domain::BOOLEAN);
    if m == Relation::LT.union(Relation::GT) {
        warn(ctx, EventKind::BranchProved, block, format!("Proved boolean {op}"));
        return BranchOutcome::Positive;
    }
    if m == Relation::EQ {
        warn(
            ctx,
            EventKind::BranchDisproved,
            block,
            format!("Disproved boolean {op}"),
        );
        return BranchOutcome::Negative;
    }

    let Some((domains, positive)) = branch_relation(op) else {
        return BranchOutcome::Unknown;
    };
    let &[a0, a1] = cv.args() else {
        return BranchOutcome::Unknown;
    };

    // `positive` is the set of orderings on which the positive edge is
    // taken; `m` the set still possible here. Containment one way or the
    // other decides the branch.
    for d in domains.iter() {
        let m = ft.get(Some(a0), Some(a1), d);
        if !m.is_empty() && m.is_subset_of(positive) {
            warn(ctx, EventKind::BranchProved, block, format!("Proved {op}"));
            return BranchOutcome::Positive;
        }
        if !m.is_empty() && m.is_subset_of(positive.complement()) {
            warn(ctx, EventKind::BranchDisproved, block, format!("Disproved {op}"));
            return BranchOutcome::Negative;
        }
    }

    // Bounds checks record facts in the unsigned domain only, but their
    // index is frequently known non-negative, in which case a signed
    // ordering against the length is just as conclusive. Most useful for:
    //   if len(a) <= 1 { return }
    //   use(a[1])
    if op.is_bounds_check() && is_non_negative(func, a0) {
        let m = ft.get(Some(a0), Some(a1), Domain::SIGNED);
        if !m.is_empty() && m.is_subset_of(positive) {
            warn(
                ctx,
                EventKind::BranchProved,
                block,
                format!("Proved non-negative bounds {op}"),
            );
            return BranchOutcome::Positive;
        }
    }

    BranchOutcome::Unknown
}

/// Rewrites a decided conditional to its unconditional form.
///
/// The block becomes [`BlockKind::First`]: control detached, successor 0
/// always taken. A negative outcome swaps the two successor edges first
/// so the surviving edge sits at index 0.
fn rewrite_block(func: &mut Function, block: usize, outcome: BranchOutcome, ctx: &PassContext) {
    let Some(b) = func.block_mut(block) else {
        return;
    };

    b.set_kind(BlockKind::First);
    b.take_control();
    if outcome == BranchOutcome::Negative {
        b.swap_successors();
    }
    let target = b.positive_successor();

    ctx.events()
        .record(EventKind::BranchSimplified)
        .at(block)
        .message(match target {
            Some(t) => format!("b{block} always continues to b{t}"),
            None => format!("b{block} made unconditional"),
        });
}

/// Records a proof diagnostic when the debug verbosity is positive.
fn warn(ctx: &PassContext, kind: EventKind, block: usize, message: String) {
    if ctx.debug_level() > 0 {
        ctx.events().record(kind).at(block).message(message);
    }
}

/// Syntactic non-negativity: `true` only when the value cannot be
/// negative by construction.
///
/// Constants are checked directly; lengths, capacities, and zero
/// extensions are non-negative by IR invariant; a right shift is
/// non-negative whenever its shifted operand is. Anything else is
/// unknown. Recursion depth is bounded by the SSA depth of the shift
/// chains, which is trivially small in practice.
fn is_non_negative(func: &Function, v: ValueId) -> bool {
    let Some(value) = func.value(v) else {
        return false;
    };

    match value.op() {
        Op::Const64 => value.aux_int() >= 0,

        Op::StringLen
        | Op::SliceLen
        | Op::SliceCap
        | Op::ZeroExt8to64
        | Op::ZeroExt16to64
        | Op::ZeroExt32to64 => true,

        Op::Rsh64x64 => value
            .args()
            .first()
            .is_some_and(|&shifted| is_non_negative(func, shifted)),

        _ => false,
    }
}
