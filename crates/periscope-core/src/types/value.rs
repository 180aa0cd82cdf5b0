//! Value handle shape and resolution types.

/// Stable identifier for a stack frame within one stop.
///
/// Frame identity is what decides whether a resolved binding came from the
/// frame currently being inspected or from an ancestor. Handles from ancestor
/// frames must be persisted before the resolver moves focus away, so the
/// comparison has to be explicit rather than pointer-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId
{
    /// Create a new identifier from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self
    {
        Self(value)
    }

    /// Get the raw numeric representation (useful for logging / errors).
    #[must_use]
    pub const fn raw(self) -> u64
    {
        self.0
    }
}

/// How a value handle aliases its target memory.
///
/// The host cannot dereference reference-shaped handles through the same API
/// as pointers, so the two indirect shapes take different reconstruction
/// paths and must never be confused at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indirection
{
    /// The handle addresses the value itself.
    Direct,
    /// One level of pointer indirection; dereferenceable exactly once.
    Pointer,
    /// Language-level reference. Resolved by reading the raw storage as an
    /// address and reconstructing a handle of the dereferenced type there.
    Reference,
}

impl Indirection
{
    /// Returns `true` for either indirect shape.
    pub const fn is_indirect(self) -> bool
    {
        matches!(self, Indirection::Pointer | Indirection::Reference)
    }
}

/// Where a resolved context object was found relative to the start frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance
{
    /// Found in the frame the inspection started from.
    CurrentFrame,
    /// Found in an ancestor frame; the handle has been persisted.
    CallerFrame
    {
        /// How many caller links were followed to reach the frame (1 = direct caller).
        depth: usize,
    },
}

impl Provenance
{
    /// Returns `true` if the binding came from outside the start frame.
    pub const fn is_ancestor(self) -> bool
    {
        matches!(self, Provenance::CallerFrame { .. })
    }
}

/// A context object located by the frame-chain resolver.
pub struct ResolvedContext
{
    /// The resolved handle, indirection already normalized away.
    pub value: Box<dyn crate::session::Value>,
    /// Declared type name of the binding the match came from.
    pub type_name: String,
    /// Name of the matched binding (for logging).
    pub binding_name: String,
    /// Which frame supplied the match.
    pub provenance: Provenance,
}

impl std::fmt::Debug for ResolvedContext
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("ResolvedContext")
            .field("type_name", &self.type_name)
            .field("binding_name", &self.binding_name)
            .field("provenance", &self.provenance)
            .finish_non_exhaustive()
    }
}
