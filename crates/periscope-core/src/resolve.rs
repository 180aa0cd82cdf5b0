//! # Frame-Chain Variable Resolution
//!
//! Locates a named contextual value by type, searching outward through the
//! caller chain.
//!
//! Rendering methods inside the target take contextual objects (the
//! compiler's global state, the enclosing control-flow graph) as arguments.
//! The interactive user rarely has one of those in hand; some frame further
//! out in the call chain almost always does. This module finds it.
//!
//! ## Matching policy
//!
//! Within a frame, bindings are scanned in declaration order and the first
//! one whose declared type name contains **any** of the given substrings
//! (case-sensitive) wins. The substring policy is intentionally loose:
//! multiple predicates let a caller accept alternative concrete types that
//! serve the same contextual role. When several bindings in one frame match,
//! the first in declaration order wins even if an unrelated identifier
//! merely embeds the type name.
//!
//! ## Indirection
//!
//! Pointer-shaped matches are dereferenced exactly once. Reference-shaped
//! matches cannot be dereferenced through the pointer path; their raw
//! storage is read as an address and a handle of the statically-known
//! dereferenced type is reconstructed there. A match whose indirection
//! cannot be normalized is treated as not found and the scan continues.

use tracing::debug;

use crate::error::PeriscopeResult;
use crate::session::{Frame, Session, VariableBinding};
use crate::types::{Provenance, ResolvedContext};

/// Search the caller chain starting at `start` for a binding whose declared
/// type name contains any of `predicates`.
///
/// Walks from `start` outward only; callee frames are never inspected. An
/// exhausted chain is a normal outcome: `Ok(None)`, never an error.
///
/// A match found in a frame other than `start` is persisted before return so
/// the handle survives once the host moves focus away from that frame; the
/// returned [`ResolvedContext`] records the provenance either way.
pub fn find(session: &dyn Session, start: &dyn Frame, predicates: &[&str]) -> PeriscopeResult<Option<ResolvedContext>>
{
    let start_id = start.id();
    let mut owned: Option<Box<dyn Frame>> = None;
    let mut depth = 0usize;

    loop {
        let frame: &dyn Frame = owned.as_deref().unwrap_or(start);

        if let Some(mut resolved) = scan_frame(session, frame, predicates)? {
            if frame.id() != start_id {
                resolved.value = resolved.value.persist()?;
                resolved.provenance = Provenance::CallerFrame { depth };
            }
            debug!(
                binding = %resolved.binding_name,
                type_name = %resolved.type_name,
                depth,
                "resolved context object"
            );
            return Ok(Some(resolved));
        }

        match frame.caller() {
            Some(caller) => {
                owned = Some(caller);
                depth += 1;
            }
            None => return Ok(None),
        }
    }
}

/// Scan one frame's bindings in declaration order for the first match.
fn scan_frame(session: &dyn Session, frame: &dyn Frame, predicates: &[&str]) -> PeriscopeResult<Option<ResolvedContext>>
{
    for binding in frame.bindings() {
        if !predicates.iter().any(|p| binding.type_name.contains(p)) {
            continue;
        }
        let VariableBinding { name, type_name, value } = binding;
        match normalize(session, value, &name, &type_name) {
            Some(value) => {
                return Ok(Some(ResolvedContext {
                    value,
                    type_name,
                    binding_name: name,
                    provenance: Provenance::CurrentFrame,
                }))
            }
            // Indirection could not be normalized; the match does not count.
            None => continue,
        }
    }
    Ok(None)
}

/// Normalize a matched binding's indirection, or report the match unusable.
fn normalize(
    session: &dyn Session,
    value: Box<dyn crate::session::Value>,
    name: &str,
    type_name: &str,
) -> Option<Box<dyn crate::session::Value>>
{
    use crate::types::Indirection;

    match value.indirection() {
        Indirection::Direct => Some(value),
        Indirection::Pointer => match value.dereference() {
            Ok(pointee) => Some(pointee),
            Err(err) => {
                debug!(binding = %name, %err, "pointer match could not be dereferenced");
                None
            }
        },
        Indirection::Reference => {
            let address = match value.storage_address() {
                Ok(address) if !address.is_null() => address,
                Ok(_) => {
                    debug!(binding = %name, "reference match holds a null address");
                    return None;
                }
                Err(err) => {
                    debug!(binding = %name, %err, "reference match has no extractable address");
                    return None;
                }
            };
            match session.value_at_address(referent_type_name(type_name), address) {
                Ok(reconstructed) => Some(reconstructed),
                Err(err) => {
                    debug!(binding = %name, %err, "reference match could not be reconstructed");
                    None
                }
            }
        }
    }
}

/// Statically-known dereferenced type of a reference-shaped declaration.
///
/// `"const core::GlobalState &"` → `"const core::GlobalState"`; the host
/// accepts cv-qualified names for reconstruction.
fn referent_type_name(type_name: &str) -> &str
{
    type_name.trim_end().trim_end_matches('&').trim_end()
}
