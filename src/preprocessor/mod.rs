//! Preprocessor module for expanding directives into units.
//!
//! This module sits between the lexer and code generation. It handles:
//!
//! - `%CONST <name> ... %END` definitions with depth-based shadowing
//! - `$name` references, expanded recursively
//! - `%USE "<file>"` inclusion with include-once caching and cycle reporting
//! - A depth limit that bounds every kind of nested expansion
//!
//! The result is a tree of units which can be flattened back into a plain
//! token stream.

pub mod preprocessor;
pub mod reader;
pub mod unit;
