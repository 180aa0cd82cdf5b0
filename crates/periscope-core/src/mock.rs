//! Deterministic, in-memory host double.
//!
//! Implements every capability trait over scripted data: frames and their
//! bindings, evaluation results keyed by expression text, a byte-level
//! memory map, and typed values reconstructable at addresses. Tests and the
//! embedding example drive the engine through this module instead of a real
//! debugger; call logs record what the engine asked the host to do.
//!
//! Nothing here is compiled out in release builds: a host integration can
//! also use the double to smoke-test its bootstrap wiring.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{PeriscopeError, PeriscopeResult};
use crate::session::{
    CommandHandler, FormatOptions, Frame, Registrar, Session, SummaryFormatter, TypeInfo, Value, VariableBinding,
};
use crate::types::{Address, FrameId, Indirection};

/// Scriptable value handle.
///
/// Built with the constructor matching the handle's shape, then refined with
/// the `with_*` builders. Cloning shares the persist counter so tests can
/// observe lifetime extension through [`MockValue::persist_probe`].
#[derive(Clone)]
pub struct MockValue
{
    type_name: String,
    runtime_type: String,
    path: String,
    indirection: Indirection,
    integer: Option<i64>,
    summary: Option<String>,
    display: Option<String>,
    valid: bool,
    methods: Vec<(String, usize)>,
    fields: HashMap<String, MockValue>,
    pointee: Option<Box<MockValue>>,
    storage: Option<Address>,
    persist_count: Rc<Cell<usize>>,
}

impl MockValue
{
    fn base(type_name: &str, path: &str, indirection: Indirection) -> Self
    {
        Self {
            type_name: type_name.to_string(),
            runtime_type: type_name.to_string(),
            path: path.to_string(),
            indirection,
            integer: None,
            summary: None,
            display: None,
            valid: true,
            methods: Vec::new(),
            fields: HashMap::new(),
            pointee: None,
            storage: None,
            persist_count: Rc::new(Cell::new(0)),
        }
    }

    /// A direct (non-indirect) value.
    #[must_use]
    pub fn direct(type_name: &str, path: &str) -> Self
    {
        Self::base(type_name, path, Indirection::Direct)
    }

    /// A direct value carrying an integer payload.
    #[must_use]
    pub fn integer(type_name: &str, path: &str, value: i64) -> Self
    {
        Self::base(type_name, path, Indirection::Direct).with_integer(value)
    }

    /// A pointer-shaped value dereferencing to `pointee`.
    #[must_use]
    pub fn pointer(type_name: &str, path: &str, pointee: MockValue) -> Self
    {
        let mut value = Self::base(type_name, path, Indirection::Pointer);
        value.pointee = Some(Box::new(pointee));
        value
    }

    /// A reference-shaped value whose raw storage holds `storage`.
    #[must_use]
    pub fn reference(type_name: &str, path: &str, storage: Address) -> Self
    {
        let mut value = Self::base(type_name, path, Indirection::Reference);
        value.storage = Some(storage);
        value
    }

    /// An invalid handle (what a failed evaluation produces).
    #[must_use]
    pub fn invalid(type_name: &str) -> Self
    {
        let mut value = Self::base(type_name, "", Indirection::Direct);
        value.valid = false;
        value
    }

    /// Override the handle's indirection shape.
    ///
    /// Useful for modelling malformed handles, e.g. a reference whose raw
    /// storage cannot be read.
    #[must_use]
    pub fn with_indirection(mut self, indirection: Indirection) -> Self
    {
        self.indirection = indirection;
        self
    }

    /// Override the runtime type name reported by reflection.
    #[must_use]
    pub fn with_runtime_type(mut self, name: &str) -> Self
    {
        self.runtime_type = name.to_string();
        self
    }

    /// Declare a member function on the runtime type.
    #[must_use]
    pub fn with_method(mut self, name: &str, arity: usize) -> Self
    {
        self.methods.push((name.to_string(), arity));
        self
    }

    /// Attach a child field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: MockValue) -> Self
    {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Set the host-rendered one-line summary.
    #[must_use]
    pub fn with_summary(mut self, summary: &str) -> Self
    {
        self.summary = Some(summary.to_string());
        self
    }

    /// Set the display text (an evaluation result's printed form).
    #[must_use]
    pub fn with_display(mut self, display: &str) -> Self
    {
        self.display = Some(display.to_string());
        self
    }

    /// Set the integer payload.
    #[must_use]
    pub fn with_integer(mut self, value: i64) -> Self
    {
        self.integer = Some(value);
        self
    }

    /// Shared counter incremented every time this handle (or a clone of it)
    /// is persisted.
    #[must_use]
    pub fn persist_probe(&self) -> Rc<Cell<usize>>
    {
        Rc::clone(&self.persist_count)
    }
}

impl Value for MockValue
{
    fn type_name(&self) -> String
    {
        self.type_name.clone()
    }

    fn type_info(&self) -> Box<dyn TypeInfo>
    {
        Box::new(MockTypeInfo {
            name: self.runtime_type.clone(),
            methods: self.methods.clone(),
        })
    }

    fn path_expression(&self) -> String
    {
        self.path.clone()
    }

    fn indirection(&self) -> Indirection
    {
        self.indirection
    }

    fn dereference(&self) -> PeriscopeResult<Box<dyn Value>>
    {
        match &self.pointee {
            Some(pointee) => Ok(Box::new((**pointee).clone())),
            None => Err(PeriscopeError::InvalidHandle(format!(
                "`{}` is not dereferenceable",
                self.path
            ))),
        }
    }

    fn storage_address(&self) -> PeriscopeResult<Address>
    {
        self.storage
            .ok_or_else(|| PeriscopeError::InvalidHandle(format!("`{}` has no readable storage", self.path)))
    }

    fn persist(&self) -> PeriscopeResult<Box<dyn Value>>
    {
        self.persist_count.set(self.persist_count.get() + 1);
        Ok(Box::new(self.clone()))
    }

    fn integer(&self) -> PeriscopeResult<i64>
    {
        self.integer
            .ok_or_else(|| PeriscopeError::InvalidHandle(format!("`{}` has no integer value", self.path)))
    }

    fn field(&self, name: &str) -> PeriscopeResult<Box<dyn Value>>
    {
        match self.fields.get(name) {
            Some(field) => Ok(Box::new(field.clone())),
            None => Err(PeriscopeError::InvalidHandle(format!(
                "`{}` has no field `{name}`",
                self.path
            ))),
        }
    }

    fn summary(&self) -> Option<String>
    {
        self.summary.clone()
    }

    fn display_text(&self) -> Option<String>
    {
        self.display.clone()
    }

    fn is_valid(&self) -> bool
    {
        self.valid
    }
}

/// Reflection data backing [`MockValue::type_info`].
struct MockTypeInfo
{
    name: String,
    methods: Vec<(String, usize)>,
}

impl TypeInfo for MockTypeInfo
{
    fn name(&self) -> String
    {
        self.name.clone()
    }

    fn method_arity(&self, method: &str) -> Option<usize>
    {
        self.methods.iter().find(|(name, _)| name == method).map(|(_, arity)| *arity)
    }
}

struct FrameData
{
    id: u64,
    function: Option<String>,
    bindings: Vec<(String, String, MockValue)>,
}

struct SessionData
{
    frames: RefCell<Vec<FrameData>>,
    evaluations: RefCell<HashMap<String, Result<MockValue, String>>>,
    evaluated: RefCell<Vec<String>>,
    memory: RefCell<Vec<(u64, Vec<u8>)>>,
    values_at: RefCell<HashMap<(String, u64), MockValue>>,
    next_frame_id: Cell<u64>,
}

/// Scriptable paused-process session.
///
/// Frames are pushed innermost first: the first `push_frame` call defines
/// the current frame, each subsequent call its next caller.
pub struct MockSession
{
    shared: Rc<SessionData>,
}

impl Default for MockSession
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl MockSession
{
    /// Create an empty session (no frames, nothing scripted).
    #[must_use]
    pub fn new() -> Self
    {
        Self {
            shared: Rc::new(SessionData {
                frames: RefCell::new(Vec::new()),
                evaluations: RefCell::new(HashMap::new()),
                evaluated: RefCell::new(Vec::new()),
                memory: RefCell::new(Vec::new()),
                values_at: RefCell::new(HashMap::new()),
                next_frame_id: Cell::new(1),
            }),
        }
    }

    /// Append the next-outer frame with its bindings in declaration order.
    pub fn push_frame(&self, function: &str, bindings: Vec<(&str, &str, MockValue)>) -> FrameId
    {
        let id = self.shared.next_frame_id.get();
        self.shared.next_frame_id.set(id + 1);
        self.shared.frames.borrow_mut().push(FrameData {
            id,
            function: Some(function.to_string()),
            bindings: bindings
                .into_iter()
                .map(|(name, type_name, value)| (name.to_string(), type_name.to_string(), value))
                .collect(),
        });
        FrameId::from_raw(id)
    }

    /// Script the outcome of evaluating `expression`.
    pub fn set_evaluation(&self, expression: &str, result: Result<MockValue, String>)
    {
        self.shared.evaluations.borrow_mut().insert(expression.to_string(), result);
    }

    /// Script a readable memory region starting at `address`.
    pub fn set_memory(&self, address: Address, bytes: Vec<u8>)
    {
        self.shared.memory.borrow_mut().push((address.value(), bytes));
    }

    /// Script the value reconstructed for `(type_name, address)`.
    pub fn set_value_at(&self, type_name: &str, address: Address, value: MockValue)
    {
        self.shared
            .values_at
            .borrow_mut()
            .insert((type_name.to_string(), address.value()), value);
    }

    /// Every expression submitted to the evaluator, in order.
    #[must_use]
    pub fn evaluated(&self) -> Vec<String>
    {
        self.shared.evaluated.borrow().clone()
    }
}

impl Session for MockSession
{
    fn current_frame(&self) -> PeriscopeResult<Box<dyn Frame>>
    {
        if self.shared.frames.borrow().is_empty() {
            return Err(PeriscopeError::Host("no frames in mock session".to_string()));
        }
        Ok(Box::new(MockFrame {
            index: 0,
            shared: Rc::clone(&self.shared),
        }))
    }

    fn evaluate(&self, _frame: &dyn Frame, expression: &str) -> PeriscopeResult<Box<dyn Value>>
    {
        self.shared.evaluated.borrow_mut().push(expression.to_string());
        match self.shared.evaluations.borrow().get(expression) {
            Some(Ok(value)) => Ok(Box::new(value.clone())),
            Some(Err(text)) => Err(PeriscopeError::EvaluationFailed(text.clone())),
            None => Err(PeriscopeError::EvaluationFailed(format!(
                "unscripted expression: {expression}"
            ))),
        }
    }

    fn read_memory(&self, address: Address, cap: usize) -> PeriscopeResult<Vec<u8>>
    {
        let memory = self.shared.memory.borrow();
        for (start, bytes) in memory.iter() {
            let end = start + bytes.len() as u64;
            if address.value() >= *start && address.value() < end {
                #[allow(clippy::cast_possible_truncation)]
                let offset = (address.value() - start) as usize;
                let available = &bytes[offset..];
                return Ok(available[..available.len().min(cap)].to_vec());
            }
        }
        Err(PeriscopeError::MemoryReadFailed(format!("unreadable address {address}")))
    }

    fn value_at_address(&self, type_name: &str, address: Address) -> PeriscopeResult<Box<dyn Value>>
    {
        match self.shared.values_at.borrow().get(&(type_name.to_string(), address.value())) {
            Some(value) => Ok(Box::new(value.clone())),
            None => Err(PeriscopeError::Host(format!(
                "no value of type `{type_name}` at {address}"
            ))),
        }
    }
}

struct MockFrame
{
    index: usize,
    shared: Rc<SessionData>,
}

impl Frame for MockFrame
{
    fn id(&self) -> FrameId
    {
        FrameId::from_raw(self.shared.frames.borrow()[self.index].id)
    }

    fn caller(&self) -> Option<Box<dyn Frame>>
    {
        if self.index + 1 < self.shared.frames.borrow().len() {
            Some(Box::new(MockFrame {
                index: self.index + 1,
                shared: Rc::clone(&self.shared),
            }))
        } else {
            None
        }
    }

    fn bindings(&self) -> Vec<VariableBinding>
    {
        self.shared.frames.borrow()[self.index]
            .bindings
            .iter()
            .map(|(name, type_name, value)| VariableBinding {
                name: name.clone(),
                type_name: type_name.clone(),
                value: Box::new(value.clone()),
            })
            .collect()
    }

    fn function_name(&self) -> Option<String>
    {
        self.shared.frames.borrow()[self.index].function.clone()
    }
}

/// Scriptable registration boundary.
///
/// Stores whatever the engine registers and lets tests invoke it the way
/// the host would.
#[derive(Default)]
pub struct MockRegistrar
{
    summaries: HashMap<String, SummaryFormatter>,
    commands: HashMap<String, (String, CommandHandler)>,
    registered: Vec<String>,
}

impl MockRegistrar
{
    /// Create an empty registrar.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Patterns registered so far, in registration order (unregistration
    /// does not rewrite history).
    #[must_use]
    pub fn registration_log(&self) -> &[String]
    {
        &self.registered
    }

    /// Whether a summary binding is currently live for `pattern`.
    #[must_use]
    pub fn has_summary(&self, pattern: &str) -> bool
    {
        self.summaries.contains_key(pattern)
    }

    /// Number of live summary bindings.
    #[must_use]
    pub fn summary_count(&self) -> usize
    {
        self.summaries.len()
    }

    /// Invoke a registered formatter the way the host's rendering subsystem
    /// would: nominal lookup, then `(handle, options)` call.
    #[must_use]
    pub fn summarize(&self, pattern: &str, session: &dyn Session, value: &dyn Value) -> Option<String>
    {
        let formatter = self.summaries.get(pattern)?;
        Some(formatter(session, value, &FormatOptions::default()))
    }

    /// Registered command names.
    #[must_use]
    pub fn command_names(&self) -> Vec<String>
    {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Invoke a registered command handler.
    #[must_use]
    pub fn run_command(&self, name: &str, session: &dyn Session, args: &str) -> Option<String>
    {
        let (_, handler) = self.commands.get(name)?;
        Some(handler(session, args))
    }
}

impl Registrar for MockRegistrar
{
    fn register_summary(&mut self, pattern: &str, formatter: SummaryFormatter) -> PeriscopeResult<()>
    {
        self.registered.push(pattern.to_string());
        self.summaries.insert(pattern.to_string(), formatter);
        Ok(())
    }

    fn unregister_summary(&mut self, pattern: &str) -> PeriscopeResult<()>
    {
        self.summaries.remove(pattern);
        Ok(())
    }

    fn register_command(&mut self, name: &str, help: &str, handler: CommandHandler) -> PeriscopeResult<()>
    {
        self.commands.insert(name.to_string(), (help.to_string(), handler));
        Ok(())
    }
}
