//! Lexical analysis for the assembly language.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a stream of tokens for the preprocessor. It handles:
//!
//! - Tokenization driven by an ordered table of regex patterns
//! - Classification of directives, references and instruction mnemonics,
//!   including operand type suffixes such as `PUSH.WORD`
//! - Number, character and string literals
//! - Line/column tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
