//! # periscope-core
//!
//! Dynamic value introspection engine for inspecting a compiler's in-memory
//! state from a stopped process.
//!
//! Periscope is loaded into an interactive debugging environment as an
//! extension. It contributes commands and per-type summary formatters for a
//! target whose binary layout it has no static knowledge of; instead of
//! decoding bytes it synthesizes expressions that make the stopped process
//! render its own values, using the rendering methods the target's types
//! already carry. This crate provides:
//!
//! - Frame-chain resolution of contextual objects ([`resolve`])
//! - Indirection normalization into expression text ([`expr`])
//! - Expression synthesis and evaluation ([`render`])
//! - The summary-formatter table and its attach lifecycle ([`formatters`])
//! - Interactive command handlers ([`commands`])
//! - The host capability boundary ([`session`]) and a scriptable in-memory
//!   host ([`mock`])
//!
//! ## Evaluation hazards
//!
//! Dynamic evaluation executes arbitrary code inside the target process and
//! blocks the interactive control thread until the host's evaluation timeout
//! elapses. A hang or crash inside evaluated code can stall or destabilize
//! the whole session; the engine's defensive error discipline limits local
//! damage but is not isolation. Hosts should treat evaluation-triggered
//! target termination as session-fatal rather than silently reattaching.
//!
//! ## Threading
//!
//! Single-threaded by design. The host serializes commands and formatter
//! invocations on one interactive control thread while the target is
//! stopped; nothing here is `Send` or `Sync`.

pub mod commands;
pub mod error;
pub mod expr;
pub mod formatters;
pub mod mock;
pub mod names;
pub mod render;
pub mod resolve;
pub mod session;
pub mod types;

pub use commands::CommandSet;
// Re-export commonly used types
pub use error::{PeriscopeError, PeriscopeResult};
pub use formatters::FormatterRegistry;
pub use render::Renderer;
pub use session::{Frame, Registrar, Session, TypeInfo, Value};
pub use types::{Address, TargetProfile};
