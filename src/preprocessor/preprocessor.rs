//! Preprocessor implementation for expanding directives.
//!
//! This module contains the Preprocessor struct that walks a token stream and
//! expands `%CONST`/`$reference` macros and `%USE` file inclusions into a
//! tree of units. Included files are lexed on demand through a `FileReader`.
//!
//! It maintains, for the whole of one run:
//! - The scope map of constant definitions, with the depth each was made at
//! - The file cache, so each file is only ever expanded once
//! - The stack of files currently being included, to report cycles

use std::{collections::HashMap, rc::Rc};

use crate::{
    errors::errors::{PreprocessError, PreprocessErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
};

use super::{reader::FileReader, unit::Unit};

/// How deep expansions may nest before the run is aborted.
pub const MAX_PREPROCESSOR_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessorConfig {
    pub max_depth: usize,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        PreprocessorConfig {
            max_depth: MAX_PREPROCESSOR_DEPTH,
        }
    }
}

/// A `%CONST` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The `%CONST` token that opened the definition
    pub root: Rc<Token>,
    /// Tokens between the name and the matching `%END`
    pub body: Vec<Rc<Token>>,
    /// Expansion depth the definition was made at
    pub depth: usize,
}

pub type ScopeMap = HashMap<String, Block>;

pub struct Preprocessor<'r> {
    /// Where `%USE` reads included files from
    reader: &'r dyn FileReader,
    config: PreprocessorConfig,
    /// Constant name to its applicable definition
    scope_map: ScopeMap,
    /// File name to its lexed body; empty for files only seen as includers
    file_cache: HashMap<String, Vec<Rc<Token>>>,
    /// Files whose `%USE` expansion is in progress, outermost first
    include_stack: Vec<String>,
}

impl<'r> Preprocessor<'r> {
    pub fn new(reader: &'r dyn FileReader) -> Self {
        Preprocessor::with_config(reader, PreprocessorConfig::default())
    }

    pub fn with_config(reader: &'r dyn FileReader, config: PreprocessorConfig) -> Self {
        Preprocessor {
            reader,
            config,
            scope_map: HashMap::new(),
            file_cache: HashMap::new(),
            include_stack: vec![],
        }
    }

    pub fn scope_map(&self) -> &ScopeMap {
        &self.scope_map
    }

    pub fn lookup(&self, name: &str) -> Option<&Block> {
        self.scope_map.get(name)
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.file_cache.contains_key(name)
    }

    /// Expands a freshly lexed token stream from depth zero.
    pub fn run(&mut self, tokens: Vec<Token>) -> Result<Vec<Unit>, PreprocessError> {
        let tokens: Vec<Rc<Token>> = tokens.into_iter().map(Rc::new).collect();
        self.preprocess(&tokens, 0)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(depth = depth, tokens = tokens.len()))]
    pub fn preprocess(
        &mut self,
        tokens: &[Rc<Token>],
        depth: usize,
    ) -> Result<Vec<Unit>, PreprocessError> {
        let Some(first) = tokens.first() else {
            return Ok(vec![]);
        };

        if depth >= self.config.max_depth {
            return Err(PreprocessError::new(
                PreprocessErrorImpl::ExceededPreprocessorDepth {
                    max_depth: self.config.max_depth,
                },
                Rc::clone(first),
            ));
        }

        let mut units = vec![];
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenKind::PpConst => {
                    i = self.define_const(tokens, i, depth)?;
                }
                TokenKind::PpReference => {
                    units.push(self.expand_reference(token, depth)?);
                }
                TokenKind::PpUse => {
                    let (name_index, unit) = self.expand_use(tokens, i, depth)?;
                    units.extend(unit);
                    i = name_index;
                }
                TokenKind::PpEnd => {
                    return Err(PreprocessError::new(
                        PreprocessErrorImpl::NoConstAround,
                        Rc::clone(token),
                    ));
                }
                _ => units.push(Unit::leaf(Rc::clone(token))),
            }
            i += 1;
        }

        Ok(units)
    }

    /// Handles `%CONST <name> ... %END` starting at `start`, returning the
    /// index of the `%END`.
    fn define_const(
        &mut self,
        tokens: &[Rc<Token>],
        start: usize,
        depth: usize,
    ) -> Result<usize, PreprocessError> {
        let token = &tokens[start];
        let name = match tokens.get(start + 1) {
            Some(name) if name.kind == TokenKind::Symbol => name.content.clone(),
            _ => {
                return Err(PreprocessError::new(
                    PreprocessErrorImpl::ExpectedSymbolForName,
                    Rc::clone(token),
                ))
            }
        };

        let mut end = start + 2;
        while end < tokens.len() && tokens[end].kind != TokenKind::PpEnd {
            if matches!(tokens[end].kind, TokenKind::PpConst | TokenKind::PpUse) {
                return Err(PreprocessError::new(
                    PreprocessErrorImpl::DirectivesInConstBody,
                    Rc::clone(&tokens[end]),
                ));
            }
            end += 1;
        }

        if end == tokens.len() {
            return Err(PreprocessError::new(
                PreprocessErrorImpl::ExpectedEnd,
                Rc::clone(token),
            ));
        } else if end == start + 2 {
            return Err(PreprocessError::new(
                PreprocessErrorImpl::EmptyConst,
                Rc::clone(token),
            ));
        }

        // A definition from the same or a shallower depth is never overwritten
        if let Some(existing) = self.scope_map.get(&name) {
            if existing.depth <= depth {
                tracing::debug!(
                    depth,
                    name = name.as_str(),
                    defined_at = existing.depth,
                    "preserving definition from outer scope"
                );
                return Ok(end);
            }
        }

        let body = tokens[start + 2..end].to_vec();
        tracing::debug!(depth, name = name.as_str(), tokens = body.len(), "defined constant");
        self.scope_map.insert(
            name,
            Block {
                root: Rc::clone(token),
                body,
                depth,
            },
        );

        Ok(end)
    }

    fn expand_reference(
        &mut self,
        token: &Rc<Token>,
        depth: usize,
    ) -> Result<Unit, PreprocessError> {
        let Some(block) = self.scope_map.get(&token.content) else {
            return Err(PreprocessError::new(
                PreprocessErrorImpl::UnknownNameInReference,
                Rc::clone(token),
            ));
        };
        let body = block.body.clone();

        tracing::trace!(depth, name = token.content.as_str(), "expanding reference");
        let expansion = self
            .preprocess(&body, depth + 1)
            .map_err(|error| in_error(error, token))?;

        Ok(Unit {
            root: Rc::clone(token),
            expansion,
        })
    }

    /// Handles `%USE "<file>"` starting at `start`. Returns the index of the
    /// file name token and the unit to append, if any.
    fn expand_use(
        &mut self,
        tokens: &[Rc<Token>],
        start: usize,
        depth: usize,
    ) -> Result<(usize, Option<Unit>), PreprocessError> {
        let token = &tokens[start];
        let name = match tokens.get(start + 1) {
            Some(name) if name.kind == TokenKind::LiteralString => name.content.clone(),
            _ => {
                return Err(PreprocessError::new(
                    PreprocessErrorImpl::ExpectedFileNameAsString,
                    Rc::clone(token),
                ))
            }
        };

        let including = token.source_name().to_string();
        self.file_cache.entry(including.clone()).or_default();

        if name == including || self.include_stack.contains(&name) {
            return Err(PreprocessError::new(
                PreprocessErrorImpl::SelfRecursiveUseCall { name },
                Rc::clone(token),
            ));
        }

        if self.file_cache.contains_key(&name) {
            tracing::debug!(depth, file = name.as_str(), "file already included, skipping");
            return Ok((start + 1, None));
        }

        let Some(content) = self.reader.read_file(&name) else {
            return Err(PreprocessError::new(
                PreprocessErrorImpl::FileNonExistent { name },
                Rc::clone(token),
            ));
        };

        let body: Vec<Rc<Token>> = tokenize(&name, &content)
            .map_err(|error| {
                PreprocessError::new(PreprocessErrorImpl::InFileLexing(error), Rc::clone(token))
            })?
            .into_iter()
            .map(Rc::new)
            .collect();
        tracing::debug!(
            depth,
            file = name.as_str(),
            bytes = content.len(),
            tokens = body.len(),
            "including file"
        );
        self.file_cache.insert(name, body.clone());

        self.include_stack.push(including);
        let result = self.preprocess(&body, depth + 1);
        self.include_stack.pop();
        let expansion = result.map_err(|error| in_error(error, token))?;

        // Files that only define constants leave nothing behind
        if expansion.is_empty() {
            return Ok((start + 1, None));
        }

        Ok((
            start + 1,
            Some(Unit {
                root: Rc::clone(token),
                expansion,
            }),
        ))
    }
}

fn in_error(error: PreprocessError, token: &Rc<Token>) -> PreprocessError {
    PreprocessError::new(PreprocessErrorImpl::InError(Box::new(error)), Rc::clone(token))
}

/// Expands every directive in `tokens`, reading included files through
/// `reader`.
pub fn preprocess(tokens: Vec<Token>, reader: &dyn FileReader) -> Result<Vec<Unit>, PreprocessError> {
    Preprocessor::new(reader).run(tokens)
}
