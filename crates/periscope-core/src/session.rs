//! # Host Capability Traits
//!
//! The interface between the introspection engine and the debugging
//! environment it is loaded into.
//!
//! These traits define what the engine needs from a host, regardless of which
//! debugger it actually runs inside. The host implements them on top of its
//! own frame, value, and evaluation machinery; the in-memory test double in
//! [`crate::mock`] implements them over scripted data.
//!
//! ## Why use traits?
//!
//! Traits let us:
//! - Keep the engine free of any dependency on a concrete debugger API
//! - Swap implementations easily (the mock host drives every test)
//! - Hide host-specific details behind a clean interface
//!
//! ## Lifetime discipline
//!
//! Everything here is a snapshot of one stopped process. Frames and the
//! values reachable from them are only guaranteed valid while the host keeps
//! focus on the frame they came from; a handle that must outlive a focus
//! change is copied out via [`Value::persist`]. The engine is single-threaded
//! and no trait requires `Send` or `Sync`.

use crate::error::PeriscopeResult;
use crate::types::{Address, FrameId, Indirection};

/// The paused-process context owned by the host
///
/// One `Session` corresponds to one attach/detach cycle. All expression
/// evaluation blocks the interactive control thread until the host's own
/// evaluation timeout elapses; the engine never imposes its own.
pub trait Session
{
    /// The frame the interactive user currently has selected.
    fn current_frame(&self) -> PeriscopeResult<Box<dyn Frame>>;

    /// Submit an expression for execution inside the stopped process.
    ///
    /// The expression is evaluated in the context of `frame`. A `Host` or
    /// `EvaluationFailed` error means the evaluator itself rejected the
    /// expression; an `Ok` result may still be invalid (see
    /// [`Value::is_valid`]) when evaluation produced nothing usable.
    fn evaluate(&self, frame: &dyn Frame, expression: &str) -> PeriscopeResult<Box<dyn Value>>;

    /// Read raw process memory, up to `cap` bytes.
    ///
    /// Returns the bytes actually read, which may be fewer than `cap` if the
    /// readable region ends first. Failure carries the host's low-level error
    /// text so formatters can surface it verbatim.
    fn read_memory(&self, address: Address, cap: usize) -> PeriscopeResult<Vec<u8>>;

    /// Reconstruct a typed value handle at an explicit address.
    ///
    /// This is the only way to look through a reference-shaped handle: read
    /// its storage as an address, then rebuild a handle of the statically
    /// known dereferenced type at that address.
    fn value_at_address(&self, type_name: &str, address: Address) -> PeriscopeResult<Box<dyn Value>>;
}

/// One activation record in a paused thread's call chain
///
/// Immutable snapshot for the duration of one inspection. The chain is only
/// walkable outward: a frame knows its caller, never its callees.
pub trait Frame
{
    /// Stable identity of this frame within the current stop.
    fn id(&self) -> FrameId;

    /// The caller of this frame, or `None` at the outermost frame.
    fn caller(&self) -> Option<Box<dyn Frame>>;

    /// All bindings visible in this frame, in declaration order.
    ///
    /// Declaration order matters: the resolver's first-match policy is
    /// defined over exactly this ordering.
    fn bindings(&self) -> Vec<VariableBinding>;

    /// Best-effort function name for logging.
    fn function_name(&self) -> Option<String>
    {
        None
    }
}

/// A named variable visible in a frame: locals, parameters, and statics.
pub struct VariableBinding
{
    /// Source-level name of the binding.
    pub name: String,
    /// Declared type name as the host reports it (what predicates match on).
    pub type_name: String,
    /// Handle to the binding's storage.
    pub value: Box<dyn Value>,
}

/// A typed reference to a memory region inside the target process
///
/// May be a direct value, a pointer indirection, or a language-level
/// reference indirection — see [`Indirection`] for the asymmetry between the
/// two indirect shapes.
pub trait Value
{
    /// Declared (static) type name of this handle.
    fn type_name(&self) -> String;

    /// Runtime type reflection for this handle.
    fn type_info(&self) -> Box<dyn TypeInfo>;

    /// Access-path text for this handle, splicable into a larger expression.
    fn path_expression(&self) -> String;

    /// How this handle aliases its target memory.
    fn indirection(&self) -> Indirection;

    /// Dereference a pointer-shaped handle.
    ///
    /// Must only be called on [`Indirection::Pointer`] handles, and at most
    /// once per handle; reference-shaped handles go through
    /// [`Value::storage_address`] + [`Session::value_at_address`] instead.
    fn dereference(&self) -> PeriscopeResult<Box<dyn Value>>;

    /// Read this handle's raw storage bytes as a target address.
    ///
    /// Used to look through reference-shaped handles, whose storage *is* the
    /// address of the value they alias.
    fn storage_address(&self) -> PeriscopeResult<Address>;

    /// Copy this handle so it survives past the current frame focus.
    ///
    /// Handles obtained from a frame other than the one being inspected are
    /// invalidated once the host moves focus away; persisting returns an
    /// owned handle that is not.
    fn persist(&self) -> PeriscopeResult<Box<dyn Value>>;

    /// This handle's value read as a signed integer.
    fn integer(&self) -> PeriscopeResult<i64>;

    /// Child handle for a named member.
    fn field(&self, name: &str) -> PeriscopeResult<Box<dyn Value>>;

    /// The host's own one-line summary of this value, if it has one.
    fn summary(&self) -> Option<String>;

    /// Display text of this value (an evaluation result's printed form).
    fn display_text(&self) -> Option<String>;

    /// Whether the handle refers to anything at all.
    ///
    /// Evaluation can succeed at the transport level and still produce an
    /// invalid result object; callers must check before trusting the rest of
    /// the accessors.
    fn is_valid(&self) -> bool;
}

/// Runtime type reflection for a value handle
pub trait TypeInfo
{
    /// Runtime type name.
    fn name(&self) -> String;

    /// Arity of the declared member function `method`, or `None` if the type
    /// doesn't declare it. Arity counts declared parameters, including any
    /// with default arguments.
    fn method_arity(&self, method: &str) -> Option<usize>;
}

/// Options the host passes along when invoking a formatter.
///
/// Present for signature stability; no option is consumed today.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatOptions {}

/// A formatter callback: `(session, handle, options) → display string`.
///
/// Formatters never fail; every error path degrades to an error-marker
/// string so the host always has something to display.
pub type SummaryFormatter = Box<dyn Fn(&dyn Session, &dyn Value, &FormatOptions) -> String>;

/// A command handler: `(session, argument text) → printed output`.
pub type CommandHandler = Box<dyn Fn(&dyn Session, &str) -> String>;

/// Process-wide registration boundary
///
/// The session bootstrap (outside this crate) wires the engine into the host
/// through this trait at attach time. Summary registrations are nominal:
/// the host fires a formatter only on values whose type name equals the
/// registered pattern, with no supertype traversal.
pub trait Registrar
{
    /// Register a (type-name pattern → formatter) binding with the host's
    /// value-rendering subsystem.
    fn register_summary(&mut self, pattern: &str, formatter: SummaryFormatter) -> PeriscopeResult<()>;

    /// Remove a previously registered summary binding.
    fn unregister_summary(&mut self, pattern: &str) -> PeriscopeResult<()>;

    /// Register a named interactive command.
    fn register_command(&mut self, name: &str, help: &str, handler: CommandHandler) -> PeriscopeResult<()>;
}
