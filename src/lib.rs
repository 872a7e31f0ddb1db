//! Core subsystems of the finch embeddable JavaScript engine.
//!
//! Two cooperating pieces live here. The AST store is a growable byte
//! buffer plus a schema table: the parser appends packed nodes through
//! the write API, the interpreter walks them back through the read
//! API, and a diagnostic dumper renders the tree as indented text. The
//! date module maps between the ECMAScript millisecond timeline and
//! broken-down calendar time, and carries the string parsing,
//! formatting and host-value coercion the `Date` builtin needs.
//!
//! The parser and the interpreter themselves are separate crates; they
//! meet here only through byte offsets and numeric instants.

extern crate finch_ast;
extern crate finch_date;

/// Packed binary AST: schema table, writer, reader, diagnostic dumper.
pub mod ast {
    pub use finch_ast::*;
}

/// Date/time arithmetic: calendar kernel, local time, string parsing
/// and formatting, host-value coercion.
pub mod date {
    pub use finch_date::*;
}
