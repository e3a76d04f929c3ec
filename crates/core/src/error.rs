//! Runtime error taxonomy
//!
//! Every failure the runtime can report. The core crate only ever *returns*
//! these; deciding that an error ends the process is the job of the runtime
//! crate's ABI layer (see `pylite_runtime::fatal`).
//!
//! The `Display` text is the message body only. At the ABI every message is
//! printed behind one uniform `RUNTIME ERROR: ` prefix, and unknown tags read
//! `Unknown type: <c>` on both the input and the print path.

use crate::registry::ObjectKind;
use crate::value::TypeTag;

/// Result alias used throughout the runtime
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Everything that can go wrong inside the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// The allocation registry has no room for another object of `kind`
    CapacityExhausted { kind: ObjectKind },

    /// `fill_next` called on a list whose initial slots are all written
    InitOverflow { length: usize },

    /// A read, slice or append on a list that is still being constructed
    InitIncomplete { length: usize, pending: usize },

    /// `get` with an index outside `[0, length)`
    IndexOutOfBounds { index: i64, length: usize },

    /// Slice start outside `[0, length)`
    SliceStartOutOfBounds { start: i64, length: usize },

    /// Slice end outside `[0, length)`
    SliceEndOutOfBounds { end: i64, length: usize },

    /// Slice with `start > end`
    SliceReversed { start: i64, end: i64 },

    /// List constructor called with a negative size
    NegativeLength(i64),

    /// End of input reached while reading or discarding a line
    UnexpectedEof,

    /// A type tag character the runtime does not know
    UnknownTag(char),

    /// A value read as a variant it does not hold
    TagMismatch { expected: TypeTag, found: TypeTag },

    /// A handle used after the teardown that released its object
    StaleHandle { kind: ObjectKind },

    /// The host failed to read stdin or write stdout
    Io(String),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::CapacityExhausted { kind } => write!(f, "Out of memory for {}", kind),
            RuntimeError::InitOverflow { length } => write!(
                f,
                "Trying to add more initial elements to full list. Length is {}",
                length
            ),
            RuntimeError::InitIncomplete { length, pending } => write!(
                f,
                "List initialization is not complete. Length is {}, uninitialized length is {}",
                length, pending
            ),
            RuntimeError::IndexOutOfBounds { index, length } => write!(
                f,
                "Index out of bounds. Trying to access {}, length is {}",
                index, length
            ),
            RuntimeError::SliceStartOutOfBounds { start, length } => write!(
                f,
                "Start index out of bounds. Trying to access {}, length is {}",
                start, length
            ),
            RuntimeError::SliceEndOutOfBounds { end, length } => write!(
                f,
                "End index out of bounds. Trying to access {}, length is {}",
                end, length
            ),
            RuntimeError::SliceReversed { start, end } => write!(
                f,
                "Start index is greater than end index. start={}, end={}",
                start, end
            ),
            RuntimeError::NegativeLength(n) => {
                write!(f, "List length must be non-negative, got {}", n)
            }
            RuntimeError::UnexpectedEof => write!(f, "Reaching unexpected EOF."),
            RuntimeError::UnknownTag(c) => write!(f, "Unknown type: {}", c.escape_default()),
            RuntimeError::TagMismatch { expected, found } => write!(
                f,
                "Type tag mismatch: expected {}, found {}",
                expected, found
            ),
            RuntimeError::StaleHandle { kind } => {
                write!(f, "Use of a {} that was already released", kind)
            }
            RuntimeError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::Io(e.to_string())
    }
}
