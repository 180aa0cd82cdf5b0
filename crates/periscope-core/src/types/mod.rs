//! # Types
//!
//! Host-agnostic types used throughout the introspection engine.
//!
//! These types abstract away the concrete debugging environment, allowing the
//! engine to reason about concepts like "memory address", "frame identity",
//! and "handle indirection" without knowing which host it is loaded into.

pub mod address;
pub mod target;
pub mod value;

// Re-export all public types
pub use address::Address;
pub use target::TargetProfile;
pub use value::{FrameId, Indirection, Provenance, ResolvedContext};
