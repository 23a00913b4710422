use thiserror::Error;

use crate::ir::ValueId;

macro_rules! malformed_ir {
    // Single string version
    ($msg:expr) => {
        crate::Error::MalformedIr {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedIr {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

pub(crate) use malformed_ir;

/// The generic error type covering all errors this library can return.
///
/// Every variant describes a malformed or inconsistent SSA function. The
/// prove pass itself never produces an error for legitimate IR; it simply
/// leaves unprovable blocks untouched. Errors surface from [`verify`] and
/// from IR construction, before any pass runs.
///
/// [`verify`]: crate::ir::Function::verify
///
/// # Examples
///
/// ```rust
/// use branchprove::ir::FunctionBuilder;
///
/// let mut f = FunctionBuilder::new();
/// f.ret_block(0);
/// let func = f.finish();
///
/// match func.verify() {
///     Ok(()) => println!("function is well-formed"),
///     Err(e) => eprintln!("broken IR: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The function structure is inconsistent.
    ///
    /// Includes the source location where the inconsistency was detected,
    /// which points at the failing structural check rather than the IR
    /// construction site.
    #[error("Malformed IR - {file}:{line}: {message}")]
    MalformedIr {
        /// Description of what was malformed.
        message: String,
        /// Source file in which this error was detected.
        file: &'static str,
        /// Source line in which this error was detected.
        line: u32,
    },

    /// A block index referenced a block that does not exist.
    #[error("Block index {0} is out of bounds")]
    BlockOutOfBounds(usize),

    /// A value ID referenced a value that does not exist.
    #[error("Value {0} is not defined in this function")]
    UndefinedValue(ValueId),

    /// A conditional block is missing its control value.
    #[error("Block {0} is a conditional but has no control value")]
    MissingControl(usize),
}
