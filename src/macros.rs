//! Utility macros for the assembler front end.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed lexemes
//!
//! These macros reduce boilerplate in the lexer's pattern table.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$content` - The token's textual payload
/// * `$position` - Where the token starts
/// * `$operand` - Optional operand type suffix (defaults to `None`)
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::LiteralNumber, "42".to_string(), position);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $content:expr, $position:expr) => {
        Token {
            kind: $kind,
            operand_type: None,
            content: $content,
            position: $position,
        }
    };
    ($kind:expr, $content:expr, $position:expr, $operand:expr) => {
        Token {
            kind: $kind,
            operand_type: $operand,
            content: $content,
            position: $position,
        }
    };
}

/// Creates a default lexer handler for single fixed lexemes with no content.
///
/// Generates a handler function that pushes a token of the given kind at the
/// lexer's current position and advances past the lexeme.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\*").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| -> Result<(), LexError> {
            let position = lexer.position();
            lexer.push(MK_TOKEN!($kind, String::new(), position));
            lexer.advance_n($value.len());
            Ok(())
        }
    };
}
