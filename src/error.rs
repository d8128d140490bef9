use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers the recoverable failure modes of descriptor interning, hierarchy
/// registration, and footprint estimation. Invariant violations (a malformed descriptor
/// reaching classification, a cyclic hierarchy, a lost class in the debug rebuild check)
/// are not represented here - they abort the operation instead, because an inconsistent
/// type universe cannot produce trustworthy query results.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::Malformed`] - Descriptor text that does not follow the descriptor grammar
/// - [`Error::Empty`] - Empty input provided where a descriptor was expected
///
/// ## Concurrency Errors
/// - [`Error::LockError`] - Thread synchronization failure during registration
///
/// ## Analysis Errors
/// - [`Error::PatternError`] - Penalty pattern compilation failure
///
/// # Examples
///
/// ```rust
/// use dexscope::{DescriptorPool, Error};
///
/// let pool = DescriptorPool::new();
/// match pool.intern("Qjava/lang/Object;") {
///     Ok(descriptor) => println!("interned: {}", pool.name(descriptor)),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed descriptor: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The descriptor text is damaged and could not be interned.
    ///
    /// This error indicates that the input does not conform to the descriptor
    /// grammar (`V`, a primitive code, `L<name>;`, or a `[` run followed by any
    /// of those). The error includes the source location where the malformation
    /// was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided input was empty.
    ///
    /// This error occurs when an empty string is provided where actual
    /// descriptor text was expected.
    #[error("Provided input was empty")]
    Empty,

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories or for
    /// wrapping external library errors with additional context.
    #[error("{0}")]
    Error(String),

    /// Penalty pattern compilation failed.
    ///
    /// The footprint estimator compiles its penalty pattern table once at
    /// construction. This error wraps any failure from that compilation.
    #[error("{0}")]
    PatternError(#[from] regex::Error),

    /// Failed to lock target.
    ///
    /// This error occurs when thread synchronization fails, typically when
    /// the registration mutex was poisoned by a panicking writer.
    #[error("Failed to lock target")]
    LockError,
}
