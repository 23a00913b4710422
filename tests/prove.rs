//! End-to-end tests for the branch proving pass.
//!
//! Each test builds a small SSA function through the public builder API,
//! runs [`ProvePass`], and checks three things:
//!
//! 1. which blocks were rewritten (and which were left alone),
//! 2. that a rewritten block keeps its live edge at successor 0,
//! 3. the diagnostics recorded at debug verbosity.

use branchprove::{
    compiler::{EventKind, Pass, PassContext, ProvePass},
    ir::{BlockKind, Function, FunctionBuilder, Op},
};

/// Runs the prove pass at debug verbosity 1.
fn run_prove(func: &mut Function) -> (bool, PassContext) {
    func.verify().expect("test function must be well-formed");
    let ctx = PassContext::with_debug(1);
    let changed = ProvePass::new()
        .run_on_function(func, &ctx)
        .expect("prove pass failed");
    (changed, ctx)
}

#[test]
fn test_redundant_bounds_check_eliminated() {
    // if i <u len(a) {          b0
    //     if i <u len(a) {      b1   <- provably true
    //         A                 b2
    //     } else { B }          b3
    // }
    // C                         b4
    let mut f = FunctionBuilder::new();
    let i = f.arg();
    let a = f.arg();
    let len = f.slice_len(a);
    let first = f.is_in_bounds(i, len);
    f.if_block(0, first, 1, 4);
    let second = f.is_in_bounds(i, len);
    f.if_block(1, second, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    let rewritten = func.block(1).unwrap();
    assert_eq!(rewritten.kind(), BlockKind::First);
    assert_eq!(rewritten.control(), None);
    // The positive successor survives at index 0.
    assert_eq!(rewritten.positive_successor(), Some(2));
    assert_eq!(
        ctx.events().messages_of(EventKind::BranchProved),
        vec!["Proved IsInBounds".to_string()]
    );

    // The guarding check itself is untouched.
    assert_eq!(func.block(0).unwrap().kind(), BlockKind::If);
}

#[test]
fn test_false_edge_learns_complement() {
    // if i < 10 { A }           b0
    // else {                    b1   (false edge, sole predecessor)
    //     if i < 10 { B }       b1's condition is provably false
    //     else { C }
    // }
    let mut f = FunctionBuilder::new();
    let i = f.arg();
    let ten = f.const64(10);
    let outer = f.less64(i, ten);
    f.if_block(0, outer, 4, 1);
    let inner = f.less64(i, ten);
    f.if_block(1, inner, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    let rewritten = func.block(1).unwrap();
    assert_eq!(rewritten.kind(), BlockKind::First);
    // Successors were swapped: the false-edge target is now successor 0.
    assert_eq!(rewritten.positive_successor(), Some(3));
    assert_eq!(rewritten.negative_successor(), Some(2));
    assert_eq!(
        ctx.events().messages_of(EventKind::BranchDisproved),
        vec!["Disproved Less64".to_string()]
    );
}

#[test]
fn test_unsigned_fact_does_not_prove_signed() {
    // An unsigned ordering between x and y says nothing about their
    // signed ordering: the same bits can compare either way.
    let mut f = FunctionBuilder::new();
    let x = f.arg();
    let y = f.arg();
    let unsigned = f.compare(Op::Less32U, x, y);
    f.if_block(0, unsigned, 1, 4);
    let signed = f.compare(Op::Less32, x, y);
    f.if_block(1, signed, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(!changed);
    assert_eq!(func.block(1).unwrap().kind(), BlockKind::If);
    assert!(ctx.events().is_empty());
}

#[test]
fn test_boolean_control_proved_without_table_entry() {
    // The control is an opaque boolean (an argument). Its opcode has no
    // table entry, but the dominating edge pins its truth.
    let mut f = FunctionBuilder::new();
    let b = f.arg();
    f.if_block(0, b, 1, 4);
    f.if_block(1, b, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    assert_eq!(func.block(1).unwrap().kind(), BlockKind::First);
    assert_eq!(func.block(1).unwrap().positive_successor(), Some(2));
    assert_eq!(
        ctx.events().messages_of(EventKind::BranchProved),
        vec!["Proved boolean Arg".to_string()]
    );
}

#[test]
fn test_boolean_control_disproved_on_false_edge() {
    let mut f = FunctionBuilder::new();
    let b = f.arg();
    f.if_block(0, b, 4, 1);
    f.if_block(1, b, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    assert_eq!(func.block(1).unwrap().positive_successor(), Some(3));
    assert_eq!(
        ctx.events().messages_of(EventKind::BranchDisproved),
        vec!["Disproved boolean Arg".to_string()]
    );
}

#[test]
fn test_non_negative_bounds_shortcut() {
    // Bounds checks record facts in the unsigned domain only. Here the
    // dominating comparison is signed, so the plain relational test
    // cannot fire - but the index is a slice length, known non-negative,
    // so the signed ordering is just as conclusive.
    //
    // i = len(s)
    // if i < n {                b0   (signed)
    //     if i <u n { A }       b1   <- proven via the shortcut
    // }
    let mut f = FunctionBuilder::new();
    let s = f.arg();
    let n = f.arg();
    let i = f.slice_len(s);
    let guard = f.less64(i, n);
    f.if_block(0, guard, 1, 4);
    let bounds = f.is_in_bounds(i, n);
    f.if_block(1, bounds, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    assert_eq!(func.block(1).unwrap().kind(), BlockKind::First);
    assert_eq!(func.block(1).unwrap().positive_successor(), Some(2));
    assert_eq!(
        ctx.events().messages_of(EventKind::BranchProved),
        vec!["Proved non-negative bounds IsInBounds".to_string()]
    );
}

#[test]
fn test_constant_index_bounds_after_length_guard() {
    // if len(a) <= 1 { return }
    // use(a[1])                 <- the check on a[1] is redundant
    let mut f = FunctionBuilder::new();
    let a = f.arg();
    let len = f.slice_len(a);
    let one = f.const64(1);
    let small = f.leq64(len, one);
    f.if_block(0, small, 4, 1);
    let bounds = f.is_in_bounds(one, len);
    f.if_block(1, bounds, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    assert_eq!(func.block(1).unwrap().kind(), BlockKind::First);
    assert_eq!(
        ctx.events().messages_of(EventKind::BranchProved),
        vec!["Proved non-negative bounds IsInBounds".to_string()]
    );
}

#[test]
fn test_shared_join_learns_nothing() {
    // Both edges of b0 join at b3, so reaching b3 implies nothing about
    // the condition - the same comparison there must stay.
    let mut f = FunctionBuilder::new();
    let x = f.arg();
    let y = f.arg();
    let cond = f.less64(x, y);
    f.if_block(0, cond, 1, 2);
    f.plain_block(1, 3);
    f.plain_block(2, 3);
    f.if_block(3, cond, 4, 5);
    f.ret_block(4);
    f.ret_block(5);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(!changed);
    assert_eq!(func.block(3).unwrap().kind(), BlockKind::If);
    assert!(ctx.events().is_empty());
}

#[test]
fn test_equality_proves_in_both_integer_domains() {
    // x == y pins the pair to equality in the signed and unsigned
    // domains at once, which decides any ordering test that includes
    // equality.
    let mut f = FunctionBuilder::new();
    let x = f.arg();
    let y = f.arg();
    let eq = f.eq64(x, y);
    f.if_block(0, eq, 1, 4);
    let le = f.leq64(x, y);
    f.if_block(1, le, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    assert_eq!(func.block(1).unwrap().positive_successor(), Some(2));
    assert_eq!(
        ctx.events().messages_of(EventKind::BranchProved),
        vec!["Proved Leq64".to_string()]
    );
}

#[test]
fn test_pointer_equality_disproves_inequality() {
    let mut f = FunctionBuilder::new();
    let p = f.arg();
    let q = f.arg();
    let eq = f.compare(Op::EqPtr, p, q);
    f.if_block(0, eq, 1, 4);
    let ne = f.compare(Op::NeqPtr, p, q);
    f.if_block(1, ne, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    assert_eq!(func.block(1).unwrap().positive_successor(), Some(3));
    assert_eq!(
        ctx.events().messages_of(EventKind::BranchDisproved),
        vec!["Disproved NeqPtr".to_string()]
    );
}

#[test]
fn test_contradiction_is_not_exploited() {
    // The path into b2 asserts both x < y and x > y: infeasible. The
    // pass does not prove anything from an empty relation set - it only
    // decides branches it can prove live paths for. The contradictory
    // inner condition itself is disproved on the way.
    let mut f = FunctionBuilder::new();
    let x = f.arg();
    let y = f.arg();
    let lt = f.less64(x, y);
    f.if_block(0, lt, 1, 6);
    let gt = f.compare(Op::Greater64, x, y);
    f.if_block(1, gt, 2, 5);
    let eq = f.eq64(x, y);
    f.if_block(2, eq, 3, 4);
    f.ret_block(3);
    f.ret_block(4);
    f.ret_block(5);
    f.ret_block(6);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    // b1 (x > y under x < y) is disproved; b2 sits on a dead path with
    // an empty relation set and must be left alone.
    assert!(changed);
    assert_eq!(func.block(1).unwrap().kind(), BlockKind::First);
    assert_eq!(func.block(1).unwrap().positive_successor(), Some(5));
    assert_eq!(func.block(2).unwrap().kind(), BlockKind::If);
    assert_eq!(ctx.events().count_of(EventKind::BranchDisproved), 1);
}

#[test]
fn test_chain_of_redundant_checks() {
    // One guarding check followed by a chain of identical checks, each
    // dominated by the previous positive edge. All of them are proven.
    const CHAIN: usize = 8;

    let mut f = FunctionBuilder::new();
    let i = f.arg();
    let a = f.arg();
    let len = f.slice_len(a);
    let exit = CHAIN + 2;

    for k in 0..=CHAIN {
        let check = f.is_in_bounds(i, len);
        // Positive edge continues the chain; negative edge leaves.
        f.if_block(k, check, k + 1, exit);
    }
    f.ret_block(CHAIN + 1);
    f.ret_block(exit);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    assert_eq!(ctx.events().count_of(EventKind::BranchProved), CHAIN);
    assert_eq!(ctx.events().count_of(EventKind::BranchSimplified), CHAIN);
    // The guard stays conditional; everything below it is decided.
    assert_eq!(func.block(0).unwrap().kind(), BlockKind::If);
    for k in 1..=CHAIN {
        assert_eq!(func.block(k).unwrap().kind(), BlockKind::First, "block {k}");
        assert_eq!(func.block(k).unwrap().positive_successor(), Some(k + 1));
    }
}

#[test]
fn test_function_remains_well_formed_after_rewrites() {
    let mut f = FunctionBuilder::new();
    let i = f.arg();
    let a = f.arg();
    let len = f.slice_len(a);
    let first = f.is_in_bounds(i, len);
    f.if_block(0, first, 1, 4);
    let second = f.is_slice_in_bounds(i, len);
    f.if_block(1, second, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, _ctx) = run_prove(&mut func);

    assert!(changed);
    // Structure is intact: no dangling control, successor lists and
    // predecessor lists still agree.
    func.verify().expect("function must stay well-formed");
}

#[test]
fn test_slice_in_bounds_implied_by_in_bounds() {
    // i <u len implies i <=u len.
    let mut f = FunctionBuilder::new();
    let i = f.arg();
    let a = f.arg();
    let len = f.slice_len(a);
    let strict = f.is_in_bounds(i, len);
    f.if_block(0, strict, 1, 4);
    let loose = f.is_slice_in_bounds(i, len);
    f.if_block(1, loose, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let (changed, ctx) = run_prove(&mut func);

    assert!(changed);
    assert_eq!(
        ctx.events().messages_of(EventKind::BranchProved),
        vec!["Proved IsSliceInBounds".to_string()]
    );
}

#[test]
fn test_no_learning_through_loop_header() {
    // b1 is a loop header: reached from the entry and from the back
    // edge, so it has two predecessors and the conditional edge into it
    // teaches nothing.
    let mut f = FunctionBuilder::new();
    let x = f.arg();
    let y = f.arg();
    let cond = f.less64(x, y);
    f.plain_block(0, 1);
    f.if_block(1, cond, 2, 3);
    f.plain_block(2, 1);
    f.if_block(3, cond, 4, 5);
    f.ret_block(4);
    f.ret_block(5);
    let mut func = f.finish();

    let (changed, _ctx) = run_prove(&mut func);

    // b3 is reached only along the negative edge of b1 and that edge has
    // a single predecessor, so b3 *is* decided; the loop body b2 (under
    // the positive edge) also has a single predecessor. The header
    // itself must stay.
    assert_eq!(func.block(1).unwrap().kind(), BlockKind::If);
    assert!(changed);
    assert_eq!(func.block(3).unwrap().kind(), BlockKind::First);
    assert_eq!(func.block(3).unwrap().positive_successor(), Some(5));
}

#[test]
fn test_debug_level_zero_suppresses_proof_diagnostics() {
    let mut f = FunctionBuilder::new();
    let b = f.arg();
    f.if_block(0, b, 1, 4);
    f.if_block(1, b, 2, 3);
    f.ret_block(2);
    f.ret_block(3);
    f.ret_block(4);
    let mut func = f.finish();

    let ctx = PassContext::new();
    let changed = ProvePass::new().run_on_function(&mut func, &ctx).unwrap();

    // The rewrite happens and is recorded; the proof chatter is not.
    assert!(changed);
    assert_eq!(ctx.events().count_of(EventKind::BranchProved), 0);
    assert_eq!(ctx.events().count_of(EventKind::BranchSimplified), 1);
}
