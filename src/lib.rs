#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use crate::{
    errors::errors::FrontendError,
    lexer::lexer::tokenize,
    preprocessor::{
        preprocessor::{Preprocessor, PreprocessorConfig},
        reader::FileReader,
        unit::Unit,
    },
};

pub mod errors;
pub mod lexer;
pub mod macros;
pub mod preprocessor;

extern crate regex;

/// Where a token or error originates: 1-based line, 0-based column, and the
/// name of the buffer it was lexed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: usize, column: usize, file: Rc<String>) -> Self {
        Position { line, column, file }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Lexes and preprocesses `source`, which was read from `source_name`.
pub fn process_source(
    source_name: &str,
    source: &str,
    reader: &dyn FileReader,
    config: PreprocessorConfig,
) -> Result<Vec<Unit>, FrontendError> {
    let tokens = tokenize(source_name, source)?;
    tracing::debug!(
        file = source_name,
        bytes = source.len(),
        tokens = tokens.len(),
        "lexed source"
    );

    let mut preprocessor = Preprocessor::with_config(reader, config);
    let units = preprocessor.run(tokens)?;
    Ok(units)
}

/// Reads `path` through `reader`, then lexes and preprocesses it.
pub fn process_file(
    path: &str,
    reader: &dyn FileReader,
    config: PreprocessorConfig,
) -> Result<Vec<Unit>, FrontendError> {
    let source = reader
        .read_file(path)
        .ok_or_else(|| FrontendError::MissingSource(path.to_string()))?;
    process_source(path, &source, reader, config)
}

/// Returns the 1-based line number and the text of that line.
pub fn get_line(source: &str, line: usize) -> Option<&str> {
    source.split('\n').nth(line.checked_sub(1)?)
}

/// Renders the line containing `position` with a caret under its column.
///
/// ```text
///    |
/// 20 | push.wrd 1
///    | -----^
/// ```
pub fn render_excerpt(source: &str, position: &Position) -> Option<String> {
    let line_text = get_line(source, position.line)?.trim_end_matches('\r');
    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    let arrows = position.column.saturating_sub(removed_whitespace) + 1;

    let mut out = String::new();
    out.push_str(&format!("{:>padding$}\n", "|"));
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));
    out.push_str(&format!("{:>padding$} {:->arrows$}", "|", "^"));
    Some(out)
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start_matches([' ', '\t']);
    (trimmed, string.len() - trimmed.len())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::Position;

    #[test]
    fn test_get_line() {
        let source = "noop\n  push.byte 1\nhalt";
        assert_eq!(super::get_line(source, 1), Some("noop"));
        assert_eq!(super::get_line(source, 2), Some("  push.byte 1"));
        assert_eq!(super::get_line(source, 4), None);
        assert_eq!(super::get_line(source, 0), None);
    }

    #[test]
    fn test_render_excerpt() {
        let source = "noop\n  push.wrd 1\n";
        let position = Position::new(2, 7, Rc::new("main.asm".to_string()));
        let excerpt = super::render_excerpt(source, &position).unwrap();

        assert_eq!(excerpt, "  |\n2 | push.wrd 1\n  | -----^");
    }

    #[test]
    fn test_position_display() {
        let position = Position::new(3, 4, Rc::new("lib.asm".to_string()));
        assert_eq!(position.to_string(), "lib.asm:3:4");
    }
}
