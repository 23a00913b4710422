//! Dominator tree computation using the Lengauer-Tarjan algorithm.
//!
//! A block `d` **dominates** a block `n` if every path from the entry to
//! `n` passes through `d`. The **immediate dominator** of `n` is the
//! closest strict dominator of `n`; making each block's immediate
//! dominator its parent yields the dominator tree, rooted at the entry.
//!
//! The tree is stored sparsely as first-child/next-sibling links, which
//! is exactly the shape a pass needs to walk it without allocating, and
//! carries a pre/post-order numbering so ancestor queries answer in O(1).
//!
//! # Algorithm
//!
//! Lengauer-Tarjan with path compression: O(V α(V)) over the reachable
//! blocks, using the function's stored predecessor lists. Blocks not
//! reachable from the entry have no immediate dominator and are never
//! reported as ancestors.

use crate::ir::Function;

/// Sentinel for "no block" inside the Lengauer-Tarjan working arrays.
const UNDEF: usize = usize::MAX;

/// The dominator tree of a function.
///
/// # Examples
///
/// ```rust
/// use branchprove::analysis::DominatorTree;
/// use branchprove::ir::FunctionBuilder;
///
/// // Diamond: 0 -> {1, 2} -> 3
/// let mut f = FunctionBuilder::new();
/// let cond = f.arg();
/// f.if_block(0, cond, 1, 2);
/// f.plain_block(1, 3);
/// f.plain_block(2, 3);
/// f.ret_block(3);
/// let func = f.finish();
///
/// let dom = DominatorTree::compute(&func);
/// assert_eq!(dom.idom(3), Some(0));
/// assert!(dom.dominates(0, 3));
/// assert!(!dom.dominates(1, 3));
/// ```
#[derive(Debug, Clone)]
pub struct DominatorTree {
    /// The entry (root) block.
    entry: usize,
    /// Immediate dominator per block; `None` for the entry and for
    /// unreachable blocks.
    idom: Vec<Option<usize>>,
    /// First child in the dominator tree, `None` for leaves.
    first_child: Vec<Option<usize>>,
    /// Next sibling in the dominator tree, `None` for the last child.
    next_sibling: Vec<Option<usize>>,
    /// Pre-order number in the dominator tree; 0 marks unreachable.
    pre: Vec<u32>,
    /// Post-order number in the dominator tree; 0 marks unreachable.
    post: Vec<u32>,
}

impl DominatorTree {
    /// Computes the dominator tree of a function.
    ///
    /// The function's predecessor lists must be up to date (see
    /// [`Function::recompute_predecessors`]).
    #[must_use]
    pub fn compute(func: &Function) -> Self {
        let n = func.block_count();
        let entry = func.entry();

        let mut tree = Self {
            entry,
            idom: vec![None; n],
            first_child: vec![None; n],
            next_sibling: vec![None; n],
            pre: vec![0; n],
            post: vec![0; n],
        };

        if n == 0 {
            return tree;
        }

        let mut lt = LengauerTarjan::new(n, entry);
        lt.compute(func);

        for block in 0..n {
            if block != entry && lt.dfnum[block] != 0 {
                tree.idom[block] = Some(lt.idom[block]);
            }
        }

        tree.link_children();
        tree.number_tree();
        tree
    }

    /// Builds the first-child/next-sibling links from the idom array.
    ///
    /// Iterating block indices in reverse keeps each child list sorted by
    /// block index.
    fn link_children(&mut self) {
        for block in (0..self.idom.len()).rev() {
            if let Some(parent) = self.idom[block] {
                self.next_sibling[block] = self.first_child[parent];
                self.first_child[parent] = Some(block);
            }
        }
    }

    /// Assigns pre/post-order numbers with an explicit DFS over the tree.
    fn number_tree(&mut self) {
        if self.pre.is_empty() {
            return;
        }

        let mut counter = 0u32;
        let mut stack = vec![(self.entry, false)];

        while let Some((block, exiting)) = stack.pop() {
            counter += 1;
            if exiting {
                self.post[block] = counter;
                continue;
            }

            self.pre[block] = counter;
            stack.push((block, true));

            let mut child = self.first_child[block];
            while let Some(c) = child {
                stack.push((c, false));
                child = self.next_sibling[c];
            }
        }
    }

    /// Returns the entry (root) block.
    #[must_use]
    pub const fn entry(&self) -> usize {
        self.entry
    }

    /// Returns the number of blocks the tree was computed over.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.idom.len()
    }

    /// Returns the immediate dominator of a block.
    ///
    /// The entry block and unreachable blocks have none.
    #[must_use]
    pub fn idom(&self, block: usize) -> Option<usize> {
        self.idom.get(block).copied().flatten()
    }

    /// Returns `true` if the block is reachable from the entry.
    #[must_use]
    pub fn is_reachable(&self, block: usize) -> bool {
        self.pre.get(block).is_some_and(|&p| p != 0)
    }

    /// Returns the first child of a block in the dominator tree.
    #[must_use]
    pub fn child(&self, block: usize) -> Option<usize> {
        self.first_child.get(block).copied().flatten()
    }

    /// Returns the next sibling of a block in the dominator tree.
    #[must_use]
    pub fn sibling(&self, block: usize) -> Option<usize> {
        self.next_sibling.get(block).copied().flatten()
    }

    /// Returns an iterator over a block's dominator-tree children.
    pub fn children(&self, block: usize) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.child(block);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.sibling(current);
            Some(current)
        })
    }

    /// Checks whether `a` is an ancestor of `b` in the dominator tree, or
    /// equal to it.
    ///
    /// Equivalent to "`a` dominates `b`". O(1) via the pre/post-order
    /// interval numbering. Returns `false` when either block is
    /// unreachable.
    #[must_use]
    pub fn is_ancestor_or_eq(&self, a: usize, b: usize) -> bool {
        if !self.is_reachable(a) || !self.is_reachable(b) {
            return false;
        }
        self.pre[a] <= self.pre[b] && self.post[b] <= self.post[a]
    }

    /// Checks whether `a` dominates `b`.
    #[must_use]
    pub fn dominates(&self, a: usize, b: usize) -> bool {
        self.is_ancestor_or_eq(a, b)
    }

    /// Checks whether `a` strictly dominates `b` (dominates and differs).
    #[must_use]
    pub fn strictly_dominates(&self, a: usize, b: usize) -> bool {
        a != b && self.is_ancestor_or_eq(a, b)
    }
}

/// Working state for the Lengauer-Tarjan algorithm.
struct LengauerTarjan {
    /// Entry block.
    entry: usize,
    /// DFS number per block (0 = not visited).
    dfnum: Vec<usize>,
    /// Block with each DFS number (inverse of `dfnum`).
    vertex: Vec<usize>,
    /// Parent in the DFS tree.
    parent: Vec<usize>,
    /// Semidominator, stored as a block index.
    semi: Vec<usize>,
    /// Immediate dominator (the final result).
    idom: Vec<usize>,
    /// Ancestor in the link-eval forest.
    ancestor: Vec<usize>,
    /// Best node on the path to the forest root (path compression).
    best: Vec<usize>,
    /// Nodes whose semidominator is this node.
    bucket: Vec<Vec<usize>>,
    /// DFS counter.
    dfs_counter: usize,
}

impl LengauerTarjan {
    fn new(n: usize, entry: usize) -> Self {
        Self {
            entry,
            dfnum: vec![0; n],
            vertex: vec![UNDEF; n],
            parent: vec![UNDEF; n],
            semi: (0..n).collect(),
            idom: vec![UNDEF; n],
            ancestor: vec![UNDEF; n],
            best: (0..n).collect(),
            bucket: vec![Vec::new(); n],
            dfs_counter: 0,
        }
    }

    fn compute(&mut self, func: &Function) {
        self.dfs(func);

        // Process reachable blocks in reverse DFS order, excluding entry.
        for i in (1..self.dfs_counter).rev() {
            let w = self.vertex[i];
            let parent_w = self.parent[w];

            // Semidominators, per the semidominator theorem.
            let preds: Vec<usize> = func
                .block(w)
                .map(|b| b.predecessors().to_vec())
                .unwrap_or_default();
            for v in preds {
                if self.dfnum[v] == 0 {
                    // Unreachable predecessor.
                    continue;
                }
                let u = self.eval(v);
                if self.dfnum[self.semi[u]] < self.dfnum[self.semi[w]] {
                    self.semi[w] = self.semi[u];
                }
            }

            let semi_w = self.semi[w];
            self.bucket[semi_w].push(w);
            self.ancestor[w] = parent_w;

            // Implicit immediate dominators for parent's bucket.
            let bucket = std::mem::take(&mut self.bucket[parent_w]);
            for v in bucket {
                let u = self.eval(v);
                self.idom[v] = if self.semi[u] == self.semi[v] {
                    parent_w
                } else {
                    u
                };
            }
        }

        // Explicit immediate dominators.
        for i in 1..self.dfs_counter {
            let w = self.vertex[i];
            if self.idom[w] != self.semi[w] {
                self.idom[w] = self.idom[self.idom[w]];
            }
        }

        self.idom[self.entry] = self.entry;
    }

    /// Iterative DFS assigning DFS numbers and building the DFS tree.
    fn dfs(&mut self, func: &Function) {
        let mut stack = vec![self.entry];

        while let Some(block) = stack.pop() {
            if self.dfnum[block] != 0 {
                continue;
            }

            self.dfs_counter += 1;
            self.dfnum[block] = self.dfs_counter;
            self.vertex[self.dfs_counter - 1] = block;

            if let Some(b) = func.block(block) {
                for &succ in b.successors() {
                    if self.dfnum[succ] == 0 {
                        self.parent[succ] = block;
                        stack.push(succ);
                    }
                }
            }
        }
    }

    /// Finds the node with minimum semidominator on the path to the
    /// forest root.
    fn eval(&mut self, v: usize) -> usize {
        if self.ancestor[v] == UNDEF {
            return v;
        }
        self.compress(v);
        self.best[v]
    }

    /// Path compression, iteratively to keep stack use bounded on deep
    /// dominator chains.
    fn compress(&mut self, v: usize) {
        // Collect the path to the node just below the forest root.
        let mut path = vec![v];
        let mut top = self.ancestor[v];
        while self.ancestor[top] != UNDEF {
            path.push(top);
            top = self.ancestor[top];
        }

        // Apply compression top-down.
        for &node in path.iter().rev() {
            let anc = self.ancestor[node];
            if self.ancestor[anc] == UNDEF {
                continue;
            }
            let best_anc = self.best[anc];
            if self.dfnum[self.semi[best_anc]] < self.dfnum[self.semi[self.best[node]]] {
                self.best[node] = best_anc;
            }
            self.ancestor[node] = self.ancestor[anc];
        }
    }
}
