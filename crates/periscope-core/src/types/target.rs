//! Debug-time description of the target build.
//!
//! The engine has no static knowledge of the compiler's types; everything it
//! needs to synthesize expressions against the stopped process is collected
//! here. The defaults describe the layout the extension is normally loaded
//! against, and a session bootstrap can override individual names when
//! attaching to a differently-versioned binary.

/// Type names, member names, and method names the engine matches against.
///
/// All type matching is case-sensitive substring matching on declared type
/// names, so entries here should be qualified just enough to be unambiguous
/// (`"core::GlobalState"` rather than `"GlobalState"` where practical).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetProfile
{
    /// Primary global-state type rendering methods take as their first argument.
    pub state_type: String,
    /// Secondary context wrapper that embeds the global state.
    pub context_type: String,
    /// Member of the context wrapper holding the embedded state.
    pub context_state_member: String,
    /// Control-flow-graph type required by arity-2 rendering methods.
    pub graph_type: String,
    /// Fixed name of the rendering method looked up on runtime types.
    pub render_method: String,
    /// No-argument render-to-C-string method on the global state.
    pub state_cstring_method: String,
    /// Substring marking an owning smart-pointer wrapper type.
    pub smart_pointer_marker: String,
    /// Interned-identifier reference type (integer id into the name table).
    pub identifier_type: String,
    /// Tagged name value type (discriminated union over name payloads).
    pub name_type: String,
    /// Discriminant field of the tagged name value.
    pub name_kind_field: String,
    /// Nested string field read when the discriminant is the UTF8 tag.
    pub name_utf8_field: String,
    /// Discriminant value of the UTF8 payload variant.
    pub utf8_kind_tag: i64,
    /// Every concrete polymorphic variant that gets its own formatter
    /// registration. The host's formatter lookup is nominal, so base-type
    /// registration would never fire; each variant is listed explicitly.
    pub variant_types: Vec<String>,
}

impl TargetProfile
{
    /// Predicates accepted when resolving a global-state context object.
    ///
    /// Either the primary state type or the context wrapper satisfies the
    /// role; the wrapper's embedded state is reached through
    /// [`TargetProfile::context_state_member`].
    #[must_use]
    pub fn state_predicates(&self) -> [&str; 2]
    {
        [self.state_type.as_str(), self.context_type.as_str()]
    }

    /// Predicates accepted when resolving a graph context object.
    #[must_use]
    pub fn graph_predicates(&self) -> [&str; 1]
    {
        [self.graph_type.as_str()]
    }

    /// Returns `true` if a declared type name matched the wrapper shape
    /// rather than the primary state shape.
    #[must_use]
    pub fn is_context_wrapper(&self, type_name: &str) -> bool
    {
        type_name.contains(self.context_type.as_str()) && !type_name.contains(self.state_type.as_str())
    }
}

impl Default for TargetProfile
{
    fn default() -> Self
    {
        Self {
            state_type: "core::GlobalState".to_string(),
            context_type: "core::Context".to_string(),
            context_state_member: "state".to_string(),
            graph_type: "cfg::CFG".to_string(),
            render_method: "showRaw".to_string(),
            state_cstring_method: "toCString".to_string(),
            smart_pointer_marker: "unique_ptr".to_string(),
            identifier_type: "core::NameRef".to_string(),
            name_type: "core::Name".to_string(),
            name_kind_field: "kind".to_string(),
            name_utf8_field: "utf8".to_string(),
            utf8_kind_tag: 1,
            variant_types: vec![
                "cfg::Ident".to_string(),
                "cfg::Alias".to_string(),
                "cfg::Send".to_string(),
                "cfg::Return".to_string(),
                "cfg::Literal".to_string(),
                "cfg::LoadArg".to_string(),
                "cfg::LoadSelf".to_string(),
                "cfg::Cast".to_string(),
                "cfg::Unanalyzable".to_string(),
                "core::ClassType".to_string(),
                "core::AppliedType".to_string(),
                "core::LiteralType".to_string(),
                "core::TypeVar".to_string(),
                "core::OrType".to_string(),
                "core::AndType".to_string(),
                "core::SelfType".to_string(),
            ],
        }
    }
}
