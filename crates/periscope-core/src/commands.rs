//! # Interactive Commands
//!
//! Named commands the extension contributes to the host's command
//! interpreter. Each handler takes the raw argument text and returns the
//! text to print; failures degrade to printed error text so a typo never
//! disturbs the session.
//!
//! The host-side registration plumbing lives outside this crate (the
//! session bootstrap calls [`Registrar::register_command`]); this module
//! only supplies the handlers and their help strings.

use std::rc::Rc;

use tracing::debug;

use crate::error::PeriscopeResult;
use crate::formatters;
use crate::render::Renderer;
use crate::session::{Registrar, Session};
use crate::types::TargetProfile;

/// Name and help text for one contributed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec
{
    /// Command name as typed by the user.
    pub name: &'static str,
    /// One-line help string shown by the host.
    pub help: &'static str,
}

/// The commands this extension contributes.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "render",
        help: "Evaluate an expression and render the result through the target's own rendering method",
    },
    CommandSpec {
        name: "state",
        help: "Locate the global state from the current frame and render it",
    },
];

/// The extension's command set, bound to one target profile.
pub struct CommandSet
{
    profile: Rc<TargetProfile>,
}

impl CommandSet
{
    /// Create the command set for a target profile.
    #[must_use]
    pub fn new(profile: TargetProfile) -> Self
    {
        Self {
            profile: Rc::new(profile),
        }
    }

    /// Register every contributed command with the host.
    ///
    /// ## Errors
    ///
    /// Propagates any `Registrar` failure; commands registered before the
    /// failure stay registered (the host owns command lifecycle).
    pub fn register(&self, host: &mut dyn Registrar) -> PeriscopeResult<()>
    {
        let profile = Rc::clone(&self.profile);
        host.register_command(
            "render",
            COMMANDS[0].help,
            Box::new(move |session: &dyn Session, args: &str| render_command(session, args, &profile)),
        )?;

        let profile = Rc::clone(&self.profile);
        host.register_command(
            "state",
            COMMANDS[1].help,
            Box::new(move |session: &dyn Session, args: &str| state_command(session, args, &profile)),
        )?;

        Ok(())
    }
}

/// `render <expression>`: evaluate, then dynamically render the result.
#[must_use]
pub fn render_command(session: &dyn Session, args: &str, profile: &TargetProfile) -> String
{
    let expression = args.trim();
    if expression.is_empty() {
        return "usage: render <expression>".to_string();
    }
    debug!(%expression, "render command");

    let frame = match session.current_frame() {
        Ok(frame) => frame,
        Err(err) => return format!("error: {err}"),
    };
    let value = match session.evaluate(frame.as_ref(), expression) {
        Ok(value) => value,
        Err(err) => return format!("error: {err}"),
    };
    if !value.is_valid() {
        return format!("error: `{expression}` evaluated to nothing");
    }
    match Renderer::new(session, profile).render(frame.as_ref(), value.as_ref()) {
        Ok(text) => text,
        Err(err) => format!("error: {err}"),
    }
}

/// `state`: locate the global-state context and render it.
#[must_use]
pub fn state_command(session: &dyn Session, _args: &str, profile: &TargetProfile) -> String
{
    let frame = match session.current_frame() {
        Ok(frame) => frame,
        Err(err) => return format!("error: {err}"),
    };
    let resolved = match crate::resolve::find(session, frame.as_ref(), &profile.state_predicates()) {
        Ok(Some(resolved)) => resolved,
        Ok(None) => return "error: no state instance visible from the current frame".to_string(),
        Err(err) => return format!("error: {err}"),
    };
    // A context-wrapper match renders its embedded state, not the wrapper.
    let state = if profile.is_context_wrapper(&resolved.type_name) {
        match resolved.value.field(profile.context_state_member.as_str()) {
            Ok(state) => state,
            Err(err) => return format!("error: {err}"),
        }
    } else {
        resolved.value
    };
    formatters::summarize_state(session, state.as_ref(), profile)
}
