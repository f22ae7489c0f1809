use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{LexError, LexErrorImpl},
    Position, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{OperandType, SuffixClass, Token, TokenKind, EXACT_LOOKUP, PREFIX_TABLE};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), LexError>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Order matters: hex before decimal, and both before symbols since the
    // symbol alphabet includes digits and `-`.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new(r"^[\s\x00]+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^;[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r"^\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new(r#"^"[^"]*""#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new(r"^'").unwrap(), handler: char_handler },
        RegexPattern { regex: Regex::new(r"^0x[0-9a-fA-F]+").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r"^-?[0-9]+").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new(r"^[a-zA-Z0-9\-_.:%#$]+").unwrap(), handler: symbol_handler },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: usize,
    column: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: &str, file: &str) -> Lexer {
        Lexer {
            tokens: vec![],
            source: source.to_string(),
            pos: 0,
            line: 1,
            column: 0,
            file: Rc::new(file.to_string()),
        }
    }

    /// Moves forward `n` bytes, keeping line and column bookkeeping in step
    /// with the characters consumed.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column(), Rc::clone(&self.file))
    }

    fn position_at_offset(&self, offset: usize) -> Position {
        let mut position = self.position();
        position.column += offset;
        position
    }

    fn error(&self, error_impl: LexErrorImpl) -> LexError {
        LexError::new(error_impl, self.position())
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), LexError> {
    let matched = regex.find(lexer.remainder()).map_or(0, |m| m.end());
    lexer.advance_n(matched);
    Ok(())
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), LexError> {
    let Some(matched) = regex.find(lexer.remainder()) else {
        return Err(lexer.error(LexErrorImpl::InvalidStringLiteral));
    };
    let length = matched.end();
    let content = lexer.remainder()[1..length - 1].to_string();

    let position = lexer.position();
    lexer.push(MK_TOKEN!(TokenKind::LiteralString, content, position));
    lexer.advance_n(length);
    Ok(())
}

fn char_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), LexError> {
    let mut chars = lexer.remainder().chars().skip(1);

    let (value, length) = match chars.next() {
        None | Some('\'') => return Err(lexer.error(LexErrorImpl::InvalidCharLiteral)),
        Some('\\') => {
            let escape = chars.next();
            if chars.next() != Some('\'') {
                return Err(lexer.error(LexErrorImpl::InvalidCharLiteral));
            }
            let value = match escape {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('\\') => '\\',
                Some(escape) => {
                    return Err(LexError::new(
                        LexErrorImpl::InvalidCharLiteralEscapeSequence { escape },
                        lexer.position_at_offset(2),
                    ))
                }
                None => return Err(lexer.error(LexErrorImpl::InvalidCharLiteral)),
            };
            (value, 4)
        }
        Some(c) => {
            if chars.next() != Some('\'') {
                return Err(lexer.error(LexErrorImpl::InvalidCharLiteral));
            }
            (c, 2 + c.len_utf8())
        }
    };

    let position = lexer.position();
    lexer.push(MK_TOKEN!(TokenKind::LiteralChar, (value as u32).to_string(), position));
    lexer.advance_n(length);
    Ok(())
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), LexError> {
    let Some(matched) = regex.find(lexer.remainder()) else {
        return Err(lexer.error(LexErrorImpl::UnknownLexeme { lexeme: lexer.at() }));
    };
    let length = matched.end();
    let literal = matched.as_str().to_string();

    // `123abc` must not silently split into a number and a symbol
    if let Some(next) = lexer.remainder()[length..].chars().next() {
        if !(next.is_whitespace() || next == '\0') {
            let literal = lexer.remainder()[..length + next.len_utf8()].to_string();
            return Err(lexer.error(LexErrorImpl::InvalidNumberLiteral { literal }));
        }
    }

    let position = lexer.position();
    lexer.push(MK_TOKEN!(TokenKind::LiteralNumber, literal, position));
    lexer.advance_n(length);
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), LexError> {
    let Some(matched) = regex.find(lexer.remainder()) else {
        return Err(lexer.error(LexErrorImpl::UnknownLexeme { lexeme: lexer.at() }));
    };
    let length = matched.end();
    let symbol = matched.as_str().to_ascii_uppercase();

    let token = classify_symbol(lexer, symbol)?;
    lexer.push(token);
    lexer.advance_n(length);
    Ok(())
}

fn classify_symbol(lexer: &Lexer, symbol: String) -> Result<Token, LexError> {
    let position = lexer.position();

    if let Some(kind) = EXACT_LOOKUP.get(symbol.as_str()) {
        return Ok(MK_TOKEN!(*kind, String::new(), position));
    }

    if symbol.starts_with('%') {
        return Err(lexer.error(LexErrorImpl::InvalidPreprocessorDirective { directive: symbol }));
    }

    if symbol.len() > 1 && symbol.starts_with('$') {
        return Ok(MK_TOKEN!(TokenKind::PpReference, symbol[1..].to_string(), position));
    }

    for (prefix, kind, class) in PREFIX_TABLE.iter() {
        if symbol.len() <= prefix.len() || !symbol.starts_with(prefix) {
            continue;
        }

        let suffix = &symbol[prefix.len()..];
        return match OperandType::parse(suffix, *class) {
            Some(operand) => Ok(MK_TOKEN!(*kind, String::new(), position, Some(operand))),
            None => {
                let suffix = suffix.to_string();
                let error_impl = match class {
                    SuffixClass::Unsigned => LexErrorImpl::ExpectedUnsignedTypeSuffix { suffix },
                    SuffixClass::Signed => LexErrorImpl::ExpectedTypeSuffix { suffix },
                };
                Err(LexError::new(error_impl, lexer.position_at_offset(prefix.len())))
            }
        };
    }

    Ok(MK_TOKEN!(TokenKind::Symbol, symbol, position))
}

/// Splits `source` into tokens. Either every token is produced or the first
/// lexical error is returned.
pub fn tokenize(source_name: &str, source: &str) -> Result<Vec<Token>, LexError> {
    let mut lex = Lexer::new(source, source_name);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex)?,
            None => {
                let lexeme = lex.at();
                // Strings fall through here only when unterminated
                let error_impl = if lexeme == '"' {
                    LexErrorImpl::InvalidStringLiteral
                } else {
                    LexErrorImpl::UnknownLexeme { lexeme }
                };
                return Err(lex.error(error_impl));
            }
        }
    }

    tracing::trace!(
        file = source_name,
        tokens = lex.tokens.len(),
        "tokenized buffer"
    );
    Ok(lex.tokens)
}
