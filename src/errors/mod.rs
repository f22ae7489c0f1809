//! Error types for the assembler front end.
//!
//! This module defines the errors produced while turning source text into
//! preprocessed units. It includes:
//!
//! - Lexical errors with source position information
//! - Preprocessing errors that chain through nested expansions
//! - A pipeline error that distinguishes failure classes for exit codes
//! - Helpful error messages and suggestions

pub mod errors;
