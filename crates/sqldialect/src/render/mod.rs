//! Clause renderer: walks expression trees and clauses, producing SQL text
//! and ordered params under one dialect.
//!
//! Capability checks happen here, at the point a gated construct would be
//! written, so a rejected build never yields SQL.

mod clause;
mod writer;

pub use writer::SqlWriter;
