//! The pass trait implemented by all SSA transformations.

use crate::{compiler::PassContext, ir::Function, Result};

/// A transformation pass over a single SSA function.
///
/// Passes receive mutable access to the function and shared access to the
/// [`PassContext`], and report whether they changed anything so a
/// pipeline can iterate to a fixed point.
///
/// # Examples
///
/// ```rust
/// use branchprove::compiler::{Pass, PassContext, ProvePass};
/// use branchprove::ir::FunctionBuilder;
///
/// let mut f = FunctionBuilder::new();
/// f.ret_block(0);
/// let mut func = f.finish();
///
/// let ctx = PassContext::new();
/// let changed = ProvePass::new().run_on_function(&mut func, &ctx)?;
/// assert!(!changed);
/// # Ok::<(), branchprove::Error>(())
/// ```
pub trait Pass: Send + Sync {
    /// Unique name for logging and debugging.
    fn name(&self) -> &'static str;

    /// A description of what this pass does.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Runs the pass on a single function.
    ///
    /// Returns `true` if the function was modified.
    ///
    /// # Errors
    ///
    /// Returns an error if the pass fails to process the function. Passes
    /// never fail on well-formed IR; failures indicate IR the pass was
    /// not prepared for.
    fn run_on_function(&self, func: &mut Function, ctx: &PassContext) -> Result<bool>;
}
