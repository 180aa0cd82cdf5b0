//! # Summary Formatters
//!
//! The fixed table of (type-name pattern → formatter) bindings registered
//! with the host's value-rendering subsystem at session attach, so that
//! formatters fire automatically whenever the host displays a matching
//! value, not only on explicit commands.
//!
//! The host's formatter lookup is nominal, not hierarchical: registering a
//! base type would never fire for its variants, so every concrete
//! polymorphic variant in [`TargetProfile::variant_types`] gets its own
//! registration of the shared fallback formatter.
//!
//! Formatters never fail. Every error path degrades to an error-marker
//! string or the handle's raw primitive value, so the interactive display
//! always shows something for every value.

use std::fmt::Display;
use std::rc::Rc;

use tracing::warn;

use crate::error::{PeriscopeError, PeriscopeResult};
use crate::expr;
use crate::names::{WELL_KNOWN_BOUND, WELL_KNOWN_NAMES};
use crate::render::Renderer;
use crate::session::{Registrar, Session, Value};
use crate::types::{Address, Indirection, TargetProfile};

/// Byte cap for reading the global state's rendered C string.
pub const STATE_SUMMARY_CAP: usize = 4096;

/// Appended when a C-string read fills the whole cap.
const TRUNCATION_MARKER: &str = "<truncated>";

/// Registry of the engine's formatter bindings.
///
/// Write-once per session: `attach` installs the fixed table and refuses to
/// run twice; `detach` removes the bindings and re-arms `attach`. There is
/// no internal state machine beyond that — registered once, invoked many
/// times, synchronously, per value.
pub struct FormatterRegistry
{
    profile: Rc<TargetProfile>,
    attached: bool,
}

impl FormatterRegistry
{
    /// Create a registry for the given target profile.
    #[must_use]
    pub fn new(profile: TargetProfile) -> Self
    {
        Self {
            profile: Rc::new(profile),
            attached: false,
        }
    }

    /// The profile this registry formats for.
    #[must_use]
    pub fn profile(&self) -> &TargetProfile
    {
        &self.profile
    }

    /// Whether `attach` has run without a matching `detach`.
    #[must_use]
    pub fn is_attached(&self) -> bool
    {
        self.attached
    }

    /// Every type-name pattern this registry binds, in registration order.
    #[must_use]
    pub fn patterns(&self) -> Vec<String>
    {
        let mut patterns = vec![
            self.profile.identifier_type.clone(),
            self.profile.name_type.clone(),
            self.profile.state_type.clone(),
        ];
        patterns.extend(self.profile.variant_types.iter().cloned());
        patterns
    }

    /// Install the fixed formatter table into the host.
    ///
    /// ## Errors
    ///
    /// `AlreadyAttached` if the registry is live; any `Registrar` error is
    /// propagated and leaves the registry detached.
    pub fn attach(&mut self, host: &mut dyn Registrar) -> PeriscopeResult<()>
    {
        if self.attached {
            return Err(PeriscopeError::AlreadyAttached);
        }

        let profile = Rc::clone(&self.profile);
        host.register_summary(
            self.profile.identifier_type.as_str(),
            Box::new(move |session: &dyn Session, value: &dyn Value, _options| {
                summarize_identifier(session, value, &profile)
            }),
        )?;

        let profile = Rc::clone(&self.profile);
        host.register_summary(
            self.profile.name_type.as_str(),
            Box::new(move |_session: &dyn Session, value: &dyn Value, _options| summarize_name(value, &profile)),
        )?;

        let profile = Rc::clone(&self.profile);
        host.register_summary(
            self.profile.state_type.as_str(),
            Box::new(move |session: &dyn Session, value: &dyn Value, _options| {
                summarize_state(session, value, &profile)
            }),
        )?;

        for variant in &self.profile.variant_types {
            let profile = Rc::clone(&self.profile);
            host.register_summary(
                variant.as_str(),
                Box::new(move |session: &dyn Session, value: &dyn Value, _options| {
                    summarize_variant(session, value, &profile)
                }),
            )?;
        }

        self.attached = true;
        Ok(())
    }

    /// Remove every binding installed by `attach`. Idempotent.
    pub fn detach(&mut self, host: &mut dyn Registrar) -> PeriscopeResult<()>
    {
        if !self.attached {
            return Ok(());
        }
        for pattern in self.patterns() {
            host.unregister_summary(&pattern)?;
        }
        self.attached = false;
        Ok(())
    }
}

/// Interned-identifier reference formatter.
///
/// Reads the integer id. Ids at or below zero are the default sentinel; ids
/// inside the reserved block decode through the static debug-name table; ids
/// past the block are minted at runtime and require dynamic rendering, with
/// `"Dynamic ID <id>"` as the degraded form.
#[must_use]
pub fn summarize_identifier(session: &dyn Session, value: &dyn Value, profile: &TargetProfile) -> String
{
    let id = match value.integer() {
        Ok(id) => id,
        Err(err) => return error_marker(&err),
    };

    if id <= 0 {
        return "Default ID".to_string();
    }
    if id < WELL_KNOWN_BOUND {
        #[allow(clippy::cast_sign_loss)]
        return WELL_KNOWN_NAMES[id as usize].to_string();
    }

    match render_in_current_frame(session, value, profile) {
        Ok(text) => text,
        Err(err) => {
            warn!(id, %err, "dynamic identifier render failed");
            format!("Dynamic ID {id}")
        }
    }
}

/// Tagged name value formatter.
///
/// A UTF8-tagged name shows its nested string payload; every other tag is
/// reported numerically.
#[must_use]
pub fn summarize_name(value: &dyn Value, profile: &TargetProfile) -> String
{
    let kind = match value.field(profile.name_kind_field.as_str()).and_then(|field| field.integer()) {
        Ok(kind) => kind,
        Err(err) => return error_marker(&err),
    };

    if kind == profile.utf8_kind_tag {
        return match value.field(profile.name_utf8_field.as_str()) {
            Ok(payload) => payload.summary().unwrap_or_else(|| error_marker(&"utf8 payload has no summary")),
            Err(err) => error_marker(&err),
        };
    }
    format!("Name kind={kind}")
}

/// Global-state singleton formatter.
///
/// Evaluates the state's no-argument render-to-C-string method, then reads
/// the resulting string out of process memory up to [`STATE_SUMMARY_CAP`]
/// bytes, marking truncation when the read fills the cap.
#[must_use]
pub fn summarize_state(session: &dyn Session, value: &dyn Value, profile: &TargetProfile) -> String
{
    let pointee;
    let state: &dyn Value = if value.indirection() == Indirection::Pointer {
        match value.dereference() {
            Ok(derefed) => {
                pointee = derefed;
                pointee.as_ref()
            }
            Err(err) => return error_marker(&err),
        }
    } else {
        value
    };

    let frame = match session.current_frame() {
        Ok(frame) => frame,
        Err(err) => return error_marker(&err),
    };

    let path = expr::expression_path(state, profile);
    let method = profile.state_cstring_method.as_str();
    let expression = format!("({path}).{method}()");

    let result = match session.evaluate(frame.as_ref(), &expression) {
        Ok(result) => result,
        Err(err) => return error_marker(&err),
    };
    if !result.is_valid() {
        return error_marker(&format!("evaluator returned an invalid result for `{expression}`"));
    }
    #[allow(clippy::cast_sign_loss)]
    let address = match result.integer() {
        Ok(raw) => Address::new(raw as u64),
        Err(err) => return error_marker(&err),
    };
    if address.is_null() {
        return error_marker(&"render method returned a null string");
    }

    match session.read_memory(address, STATE_SUMMARY_CAP) {
        Ok(bytes) => cstring_text(&bytes),
        Err(err) => error_marker(&err),
    }
}

/// Fallback formatter shared by every registered polymorphic variant.
///
/// Delegates to the dynamic renderer; on failure falls back to the handle's
/// raw primitive value when the host has one, else the error text.
#[must_use]
pub fn summarize_variant(session: &dyn Session, value: &dyn Value, profile: &TargetProfile) -> String
{
    match render_in_current_frame(session, value, profile) {
        Ok(text) => text,
        Err(err) => {
            warn!(%err, "variant render degraded to raw value");
            match value.display_text() {
                Some(raw) if !raw.is_empty() => raw,
                _ => error_marker(&err),
            }
        }
    }
}

/// Render `value` anchored at the host's currently selected frame.
fn render_in_current_frame(session: &dyn Session, value: &dyn Value, profile: &TargetProfile) -> PeriscopeResult<String>
{
    let frame = session.current_frame()?;
    Renderer::new(session, profile).render(frame.as_ref(), value)
}

/// Decode a C string from raw bytes, marking truncation at the cap.
fn cstring_text(bytes: &[u8]) -> String
{
    match bytes.iter().position(|byte| *byte == 0) {
        Some(nul) => String::from_utf8_lossy(&bytes[..nul]).into_owned(),
        None => {
            let mut text = String::from_utf8_lossy(bytes).into_owned();
            if bytes.len() >= STATE_SUMMARY_CAP {
                text.push_str(TRUNCATION_MARKER);
            }
            text
        }
    }
}

/// The uniform degraded form: the low-level error text, wrapped.
fn error_marker(err: &dyn Display) -> String
{
    format!("<error: {err}>")
}
