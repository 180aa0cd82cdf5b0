//! # Error Types
//!
//! General error handling for the introspection engine.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Every variant is local to a single render or formatter invocation. Nothing
//! in this module ever terminates the debug session: callers either propagate
//! the error up to a command handler (which prints it) or degrade to an
//! error-marker string so the host always has something to display.
//!
//! "Variable not found" is deliberately *not* an error. The frame-chain
//! resolver reports absence as `Ok(None)` because an exhausted caller chain is
//! a normal outcome of an interactive inspection, not a failure.

use thiserror::Error;

/// Main error type for introspection operations
///
/// This enum represents all the ways a render or formatter invocation can
/// fail. Each variant corresponds to one failure point in the synthesize-and-
/// evaluate pipeline.
///
/// ## Error Categories
///
/// 1. **Type errors**: NoRenderMethod (the runtime type cannot render itself)
/// 2. **Context errors**: MissingContext (a required contextual object was not
///    found anywhere in the caller chain)
/// 3. **Evaluation errors**: EvaluationFailed (the in-process evaluator
///    returned an invalid or empty result)
/// 4. **Memory errors**: MemoryReadFailed (a raw read stopped short)
/// 5. **Handle errors**: InvalidHandle (the host rejected a handle operation)
/// 6. **Lifecycle errors**: AlreadyAttached (second attach on the write-once
///    formatter registry)
/// 7. **Host errors**: Host (anything else reported across the capability
///    boundary)
#[derive(Error, Debug)]
pub enum PeriscopeError
{
    /// The value's runtime type declares no rendering method
    ///
    /// The dynamic renderer only works for target types that know how to
    /// print themselves. The diagnostic names the offending type so the user
    /// can tell which part of the object graph is opaque.
    #[error("type {type_name} has no rendering method")]
    NoRenderMethod
    {
        /// Runtime type name of the value that could not be rendered.
        type_name: String,
    },

    /// A required contextual object could not be located
    ///
    /// Rendering methods inside the target take the compiler's global state
    /// (and sometimes the enclosing control-flow graph) as arguments. When no
    /// frame in the caller chain holds one, a single render call aborts with
    /// this error.
    ///
    /// The payload is the human-readable description, e.g. `"no state
    /// instance"` or `"no CFG instance"`.
    #[error("missing context: {0}")]
    MissingContext(String),

    /// The in-process evaluator returned an invalid or empty result
    ///
    /// The synthesized expression was submitted but the host reported that
    /// the evaluation produced nothing usable. The payload carries whatever
    /// detail the host gave us.
    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),

    /// A raw process-memory read failed or stopped short
    ///
    /// Carries the host's low-level error text so it can be surfaced verbatim
    /// inside an error marker.
    #[error("memory read failed: {0}")]
    MemoryReadFailed(String),

    /// The host rejected an operation on a value handle
    ///
    /// Examples: dereferencing a handle whose pointee is gone, reading the
    /// raw storage of a malformed reference, or persisting a handle after its
    /// frame was torn down.
    #[error("invalid value handle: {0}")]
    InvalidHandle(String),

    /// The formatter registry was attached twice
    ///
    /// Registrations are write-once per session. A bootstrap that attaches
    /// the registry a second time without detaching first gets this error and
    /// the original registrations stay live.
    #[error("formatter registry is already attached")]
    AlreadyAttached,

    /// Any other failure reported by the host debugging environment
    #[error("host error: {0}")]
    Host(String),
}

/// Convenience type alias for `Result<T, PeriscopeError>`
///
/// ```rust
/// use periscope_core::error::PeriscopeResult;
/// fn foo() -> PeriscopeResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type PeriscopeResult<T> = std::result::Result<T, PeriscopeError>;
