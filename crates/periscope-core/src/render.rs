//! # Dynamic Stringification
//!
//! Synthesizes and evaluates "render this value" expressions against the
//! live, stopped process.
//!
//! The target's own types know how to print themselves: each renderable type
//! declares a rendering method (named by the active [`TargetProfile`]) that
//! takes the compiler's global state, and for graph-resident values the
//! enclosing control-flow graph as well. The engine has no static knowledge
//! of those layouts, so instead of decoding bytes it asks the stopped
//! process to do the printing: it builds a call expression from the handle's
//! access path and resolved context arguments, submits it to the host's
//! evaluator, and returns the resulting text.
//!
//! Every failure is local to one render call and comes back as a
//! [`PeriscopeError`] whose `Display` form is the user-facing diagnostic;
//! nothing here can destabilize the session beyond what evaluating arbitrary
//! target code inherently risks (see the crate docs on evaluation hazards).

use tracing::debug;

use crate::error::{PeriscopeError, PeriscopeResult};
use crate::expr;
use crate::resolve;
use crate::session::{Frame, Session, Value};
use crate::types::{Indirection, TargetProfile};

/// Orchestrates resolution, normalization, and evaluation for one session.
///
/// Holds no state of its own beyond borrowed collaborators; construct one
/// per call site or keep one around, it makes no difference.
pub struct Renderer<'a>
{
    session: &'a dyn Session,
    profile: &'a TargetProfile,
}

impl<'a> Renderer<'a>
{
    /// Create a renderer over a session and target profile.
    #[must_use]
    pub fn new(session: &'a dyn Session, profile: &'a TargetProfile) -> Self
    {
        Self { session, profile }
    }

    /// Render `value` by invoking the target's own rendering method.
    ///
    /// `frame` anchors both context resolution (the caller-chain walk starts
    /// there) and expression evaluation. The returned string is the
    /// evaluator's display text, unmodified.
    ///
    /// ## Errors
    ///
    /// - `NoRenderMethod`: the runtime type declares no rendering method
    /// - `MissingContext`: no state (or, for arity ≥ 2, no graph) instance
    ///   anywhere in the caller chain
    /// - `EvaluationFailed`: the evaluator returned an invalid/empty result
    /// - `InvalidHandle` / `Host`: the host rejected a handle operation
    pub fn render(&self, frame: &dyn Frame, value: &dyn Value) -> PeriscopeResult<String>
    {
        // Pointer-shaped handles are dereferenced exactly once up front.
        let pointee;
        let value: &dyn Value = if value.indirection() == Indirection::Pointer {
            pointee = value.dereference()?;
            pointee.as_ref()
        } else {
            value
        };

        let info = value.type_info();
        let type_name = info.name();
        let Some(arity) = info.method_arity(self.profile.render_method.as_str()) else {
            return Err(PeriscopeError::NoRenderMethod { type_name });
        };

        let state_argument = self.state_argument(frame)?;
        let graph_argument = if arity >= 2 { Some(self.graph_argument(frame)?) } else { None };

        let path = value.path_expression();
        let method = self.profile.render_method.as_str();
        let expression = match graph_argument {
            Some(graph) => format!("({path}).{method}({state_argument}, {graph})"),
            None => format!("({path}).{method}({state_argument})"),
        };
        debug!(%type_name, %expression, "submitting render expression");

        let result = self.session.evaluate(frame, &expression)?;
        if !result.is_valid() {
            return Err(PeriscopeError::EvaluationFailed(format!(
                "evaluator returned an invalid result for `{expression}`"
            )));
        }
        match result.display_text() {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(PeriscopeError::EvaluationFailed(format!(
                "evaluator returned an empty result for `{expression}`"
            ))),
        }
    }

    /// Locate the global-state context and produce its argument text.
    ///
    /// Accepts the primary state shape or the context wrapper that embeds
    /// it; a wrapper match gets the embedded-state member appended so the
    /// generated call always receives the state itself.
    fn state_argument(&self, frame: &dyn Frame) -> PeriscopeResult<String>
    {
        let Some(state) = resolve::find(self.session, frame, &self.profile.state_predicates())? else {
            return Err(PeriscopeError::MissingContext("no state instance".to_string()));
        };
        let mut argument = expr::expression_path(state.value.as_ref(), self.profile);
        if self.profile.is_context_wrapper(&state.type_name) {
            argument.push('.');
            argument.push_str(self.profile.context_state_member.as_str());
        }
        Ok(argument)
    }

    /// Locate the control-flow-graph context and produce its argument text.
    fn graph_argument(&self, frame: &dyn Frame) -> PeriscopeResult<String>
    {
        let Some(graph) = resolve::find(self.session, frame, &self.profile.graph_predicates())? else {
            return Err(PeriscopeError::MissingContext("no CFG instance".to_string()));
        };
        Ok(expr::expression_path(graph.value.as_ref(), self.profile))
    }
}
