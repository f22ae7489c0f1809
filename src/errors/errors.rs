use std::{fmt::Display, rc::Rc};

use thiserror::Error;

use crate::{lexer::tokens::Token, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    internal_error: LexErrorImpl,
    position: Position,
}

impl LexError {
    pub fn new(error_impl: LexErrorImpl, position: Position) -> Self {
        LexError {
            internal_error: error_impl,
            position,
        }
    }

    pub fn kind(&self) -> &LexErrorImpl {
        &self.internal_error
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            LexErrorImpl::InvalidCharLiteral => "INVALID_CHAR_LITERAL",
            LexErrorImpl::InvalidCharLiteralEscapeSequence { .. } => {
                "INVALID_CHAR_LITERAL_ESCAPE_SEQUENCE"
            }
            LexErrorImpl::InvalidStringLiteral => "INVALID_STRING_LITERAL",
            LexErrorImpl::InvalidNumberLiteral { .. } => "INVALID_NUMBER_LITERAL",
            LexErrorImpl::InvalidPreprocessorDirective { .. } => "INVALID_PREPROCESSOR_DIRECTIVE",
            LexErrorImpl::ExpectedTypeSuffix { .. } => "EXPECTED_TYPE_SUFFIX",
            LexErrorImpl::ExpectedUnsignedTypeSuffix { .. } => "EXPECTED_UNSIGNED_TYPE_SUFFIX",
            LexErrorImpl::UnknownLexeme { .. } => "UNKNOWN_LEXEME",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            LexErrorImpl::InvalidCharLiteral => ErrorTip::Suggestion(String::from(
                "Character literals are a single character or escape between single quotes",
            )),
            LexErrorImpl::InvalidCharLiteralEscapeSequence { escape } => ErrorTip::Suggestion(
                format!("Unknown escape `\\{}`, expected one of \\n \\t \\r \\\\", escape),
            ),
            LexErrorImpl::InvalidStringLiteral => {
                ErrorTip::Suggestion(String::from("String literal is missing its closing quote"))
            }
            LexErrorImpl::InvalidNumberLiteral { literal } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, numbers must be followed by whitespace",
                literal
            )),
            LexErrorImpl::InvalidPreprocessorDirective { directive } => ErrorTip::Suggestion(
                format!("Unknown directive `{}`, expected %CONST, %USE or %END", directive),
            ),
            LexErrorImpl::ExpectedTypeSuffix { suffix } => ErrorTip::Suggestion(format!(
                "Unknown suffix `{}`, expected BYTE, CHAR, HWORD, INT, WORD or LONG",
                suffix
            )),
            LexErrorImpl::ExpectedUnsignedTypeSuffix { suffix } => ErrorTip::Suggestion(format!(
                "Unknown suffix `{}`, expected BYTE, HWORD or WORD",
                suffix
            )),
            LexErrorImpl::UnknownLexeme { .. } => ErrorTip::None,
        }
    }

    /// Ordinal of the error kind, stable across releases.
    pub fn ordinal(&self) -> i32 {
        match &self.internal_error {
            LexErrorImpl::InvalidCharLiteral => 1,
            LexErrorImpl::InvalidCharLiteralEscapeSequence { .. } => 2,
            LexErrorImpl::InvalidStringLiteral => 3,
            LexErrorImpl::InvalidNumberLiteral { .. } => 4,
            LexErrorImpl::InvalidPreprocessorDirective { .. } => 5,
            LexErrorImpl::ExpectedTypeSuffix { .. } => 6,
            LexErrorImpl::ExpectedUnsignedTypeSuffix { .. } => 7,
            LexErrorImpl::UnknownLexeme { .. } => 8,
        }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.get_error_name())
    }
}

impl std::error::Error for LexError {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorImpl {
    #[error("invalid character literal")]
    InvalidCharLiteral,
    #[error("invalid escape sequence in character literal: {escape:?}")]
    InvalidCharLiteralEscapeSequence { escape: char },
    #[error("unterminated string literal")]
    InvalidStringLiteral,
    #[error("invalid number literal: {literal:?}")]
    InvalidNumberLiteral { literal: String },
    #[error("invalid preprocessor directive: {directive:?}")]
    InvalidPreprocessorDirective { directive: String },
    #[error("expected type suffix, found {suffix:?}")]
    ExpectedTypeSuffix { suffix: String },
    #[error("expected unsigned type suffix, found {suffix:?}")]
    ExpectedUnsignedTypeSuffix { suffix: String },
    #[error("unknown lexeme: {lexeme:?}")]
    UnknownLexeme { lexeme: char },
}

/// A preprocessing failure anchored at the token that caused it. Failures
/// inside an expansion are wrapped by the expanding token, forming a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessError {
    internal_error: PreprocessErrorImpl,
    token: Rc<Token>,
}

impl PreprocessError {
    pub fn new(error_impl: PreprocessErrorImpl, token: Rc<Token>) -> Self {
        PreprocessError {
            internal_error: error_impl,
            token,
        }
    }

    pub fn kind(&self) -> &PreprocessErrorImpl {
        &self.internal_error
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn get_position(&self) -> &Position {
        &self.token.position
    }

    pub fn child_error(&self) -> Option<&PreprocessError> {
        match &self.internal_error {
            PreprocessErrorImpl::InError(child) => Some(child),
            _ => None,
        }
    }

    pub fn lexer_error(&self) -> Option<&LexError> {
        match &self.internal_error {
            PreprocessErrorImpl::InFileLexing(error) => Some(error),
            _ => None,
        }
    }

    /// Every frame of the chain, outermost first.
    pub fn chain(&self) -> Vec<&PreprocessError> {
        let mut frames = vec![self];
        let mut current = self;
        while let Some(child) = current.child_error() {
            frames.push(child);
            current = child;
        }
        frames
    }

    pub fn root_cause(&self) -> &PreprocessError {
        let mut current = self;
        while let Some(child) = current.child_error() {
            current = child;
        }
        current
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            PreprocessErrorImpl::ExpectedEnd => "EXPECTED_END",
            PreprocessErrorImpl::NoConstAround => "NO_CONST_AROUND",
            PreprocessErrorImpl::EmptyConst => "EMPTY_CONST",
            PreprocessErrorImpl::ExpectedSymbolForName => "EXPECTED_SYMBOL_FOR_NAME",
            PreprocessErrorImpl::DirectivesInConstBody => "DIRECTIVES_IN_CONST_BODY",
            PreprocessErrorImpl::UnknownNameInReference => "UNKNOWN_NAME_IN_REFERENCE",
            PreprocessErrorImpl::ExpectedFileNameAsString => "EXPECTED_FILE_NAME_AS_STRING",
            PreprocessErrorImpl::FileNonExistent { .. } => "FILE_NON_EXISTENT",
            PreprocessErrorImpl::InFileLexing(_) => "IN_FILE_LEXING",
            PreprocessErrorImpl::SelfRecursiveUseCall { .. } => "SELF_RECURSIVE_USE_CALL",
            PreprocessErrorImpl::InError(_) => "IN_ERROR",
            PreprocessErrorImpl::ExceededPreprocessorDepth { .. } => "EXCEEDED_PREPROCESSER_DEPTH",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            PreprocessErrorImpl::ExpectedEnd => {
                ErrorTip::Suggestion(String::from("%CONST block is missing its %END"))
            }
            PreprocessErrorImpl::NoConstAround => {
                ErrorTip::Suggestion(String::from("%END found without an opening %CONST"))
            }
            PreprocessErrorImpl::EmptyConst => {
                ErrorTip::Suggestion(String::from("%CONST blocks must contain at least one token"))
            }
            PreprocessErrorImpl::ExpectedSymbolForName => {
                ErrorTip::Suggestion(String::from("%CONST must be followed by a symbol name"))
            }
            PreprocessErrorImpl::DirectivesInConstBody => ErrorTip::Suggestion(String::from(
                "%CONST and %USE cannot appear inside a %CONST body, references can",
            )),
            PreprocessErrorImpl::UnknownNameInReference => ErrorTip::Suggestion(format!(
                "No constant named `{}` is in scope",
                self.token.content
            )),
            PreprocessErrorImpl::ExpectedFileNameAsString => ErrorTip::Suggestion(String::from(
                "%USE must be followed by a file name in double quotes",
            )),
            PreprocessErrorImpl::FileNonExistent { name } => {
                ErrorTip::Suggestion(format!("File `{}` could not be read", name))
            }
            PreprocessErrorImpl::InFileLexing(error) => {
                ErrorTip::Suggestion(format!("Lexing failed at {}", error))
            }
            PreprocessErrorImpl::SelfRecursiveUseCall { name } => ErrorTip::Suggestion(format!(
                "File `{}` is already being included further up",
                name
            )),
            PreprocessErrorImpl::InError(_) => ErrorTip::None,
            PreprocessErrorImpl::ExceededPreprocessorDepth { max_depth } => ErrorTip::Suggestion(
                format!("Expansion nested deeper than {} levels, check for cycles", max_depth),
            ),
        }
    }

    /// Ordinal of the error kind, stable across releases.
    pub fn ordinal(&self) -> i32 {
        match &self.internal_error {
            PreprocessErrorImpl::ExpectedEnd => 1,
            PreprocessErrorImpl::NoConstAround => 2,
            PreprocessErrorImpl::EmptyConst => 3,
            PreprocessErrorImpl::ExpectedSymbolForName => 4,
            PreprocessErrorImpl::DirectivesInConstBody => 5,
            PreprocessErrorImpl::UnknownNameInReference => 6,
            PreprocessErrorImpl::ExpectedFileNameAsString => 7,
            PreprocessErrorImpl::FileNonExistent { .. } => 8,
            PreprocessErrorImpl::InFileLexing(_) => 9,
            PreprocessErrorImpl::SelfRecursiveUseCall { .. } => 10,
            PreprocessErrorImpl::InError(_) => 11,
            PreprocessErrorImpl::ExceededPreprocessorDepth { .. } => 12,
        }
    }
}

impl Display for PreprocessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let frames = self.chain();
        for (i, frame) in frames.iter().enumerate() {
            write!(f, "{}: {}", frame.get_position(), frame.get_error_name())?;
            if let Some(error) = frame.lexer_error() {
                write!(f, ":\n{}", error)?;
            }
            if i != frames.len() - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for PreprocessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.internal_error {
            PreprocessErrorImpl::InError(child) => Some(child.as_ref()),
            PreprocessErrorImpl::InFileLexing(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessErrorImpl {
    #[error("expected %END")]
    ExpectedEnd,
    #[error("%END without enclosing %CONST")]
    NoConstAround,
    #[error("empty %CONST body")]
    EmptyConst,
    #[error("expected symbol as %CONST name")]
    ExpectedSymbolForName,
    #[error("directive inside %CONST body")]
    DirectivesInConstBody,
    #[error("unknown name in reference")]
    UnknownNameInReference,
    #[error("expected file name as string after %USE")]
    ExpectedFileNameAsString,
    #[error("file {name:?} does not exist")]
    FileNonExistent { name: String },
    #[error("error while lexing included file: {0}")]
    InFileLexing(LexError),
    #[error("file {name:?} includes itself")]
    SelfRecursiveUseCall { name: String },
    #[error("error during expansion")]
    InError(Box<PreprocessError>),
    #[error("exceeded maximum preprocessor depth of {max_depth}")]
    ExceededPreprocessorDepth { max_depth: usize },
}

/// Any failure of the front end pipeline.
#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("file `{0}` does not exist")]
    MissingSource(String),
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("{0}")]
    Preprocess(#[from] PreprocessError),
}

impl FrontendError {
    /// Process exit status for this failure; lexical and preprocessing
    /// failures occupy disjoint ranges. A chained preprocessing failure is
    /// classified by its root cause.
    pub fn exit_code(&self) -> i32 {
        match self {
            FrontendError::MissingSource(_) => 1,
            FrontendError::Lex(error) => 255 - error.ordinal(),
            FrontendError::Preprocess(error) => 127 - error.root_cause().ordinal(),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}
