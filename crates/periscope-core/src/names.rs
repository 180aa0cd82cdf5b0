//! Static debug-name table for well-known interned identifiers.
//!
//! The target interns identifiers into a process-wide table; the first block
//! of ids is reserved for names the compiler itself mints, in a fixed order
//! baked into the target binary at build time. Those can be decoded without
//! touching the stopped process at all, which keeps the common case of the
//! identifier formatter instant and side-effect free.
//!
//! The entries and their order must stay in sync with the reserved block of
//! the target's name table. Ids at or past [`WELL_KNOWN_BOUND`] are minted at
//! runtime and can only be decoded by evaluating inside the target.

/// Debug names for the reserved id block, indexed by id.
///
/// Index 0 is the "no name" sentinel; the identifier formatter never indexes
/// it because ids `<= 0` short-circuit to a constant.
pub const WELL_KNOWN_NAMES: &[&str] = &[
    "<none>",
    "initialize",
    "new",
    "call",
    "block",
    "self",
    "super",
    "main",
    "<root>",
    "<top>",
    "raise",
    "class",
    "module",
    "include",
    "extend",
    "singleton",
    "attached",
    "to_s",
    "to_a",
    "to_proc",
    "each",
    "map",
    "nil?",
    "hash",
    "freeze",
    "dup",
    "clone",
    "send",
    "lambda",
    "proc",
    "require",
    "attr_reader",
    "attr_writer",
    "attr_accessor",
    "method_missing",
    "respond_to?",
    "instance_variable_get",
    "instance_variable_set",
    "define_method",
    "module_function",
    "private",
    "protected",
    "public",
    "+",
    "-",
    "*",
    "/",
    "%",
    "==",
    "!=",
    "<",
    ">",
    "<=",
    ">=",
    "<=>",
    "<<",
    ">>",
    "[]",
    "[]=",
    "!",
    "&",
    "|",
    "^",
    "=~",
];

/// Exclusive upper bound of the reserved id block.
///
/// Defined as the table's length so the boundary cannot drift from the table
/// it indexes; ids in `1..WELL_KNOWN_BOUND` decode by lookup, ids at or past
/// it go through dynamic rendering.
pub const WELL_KNOWN_BOUND: i64 = WELL_KNOWN_NAMES.len() as i64;
