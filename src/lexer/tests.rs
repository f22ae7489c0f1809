//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Directives and references
//! - Instruction mnemonics with operand type suffixes
//! - Numeric, character and string literals
//! - Comments and position tracking
//! - Error cases

use pretty_assertions::assert_eq;

use super::{
    lexer::tokenize,
    tokens::{OperandType, SuffixClass, TokenKind, PREFIX_TABLE},
};
use crate::errors::errors::LexErrorImpl;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize("test.asm", source)
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_directives() {
    let tokens = tokenize("test.asm", "%const %use %end $name %CONST").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::PpConst);
    assert_eq!(tokens[1].kind, TokenKind::PpUse);
    assert_eq!(tokens[2].kind, TokenKind::PpEnd);
    assert_eq!(tokens[3].kind, TokenKind::PpReference);
    assert_eq!(tokens[3].content, "NAME");
    assert_eq!(tokens[4].kind, TokenKind::PpConst);
    assert_eq!(tokens.len(), 5);
}

#[test]
fn test_tokenize_fixed_mnemonics() {
    assert_eq!(
        kinds("noop halt mdelete msize jump.abs jump.stack call call.stack ret global"),
        vec![
            TokenKind::Noop,
            TokenKind::Halt,
            TokenKind::Mdelete,
            TokenKind::Msize,
            TokenKind::JumpAbs,
            TokenKind::JumpStack,
            TokenKind::Call,
            TokenKind::CallStack,
            TokenKind::Ret,
            TokenKind::Global,
        ]
    );
}

#[test]
fn test_tokenize_every_family_with_suffix() {
    let suffixes = ["BYTE", "CHAR", "HWORD", "INT", "WORD", "LONG"];

    for (prefix, kind, class) in PREFIX_TABLE.iter() {
        for suffix in suffixes {
            let source = format!("{}{}", prefix, suffix);
            let result = tokenize("test.asm", &source);

            match OperandType::parse(suffix, *class) {
                Some(operand) => {
                    let tokens = result.unwrap();
                    assert_eq!(tokens.len(), 1, "{}", source);
                    assert_eq!(tokens[0].kind, *kind, "{}", source);
                    assert_eq!(tokens[0].operand_type, Some(operand), "{}", source);
                    assert!(tokens[0].content.is_empty());
                }
                None => {
                    let error = result.unwrap_err();
                    let expected = match class {
                        SuffixClass::Unsigned => LexErrorImpl::ExpectedUnsignedTypeSuffix {
                            suffix: suffix.to_string(),
                        },
                        SuffixClass::Signed => LexErrorImpl::ExpectedTypeSuffix {
                            suffix: suffix.to_string(),
                        },
                    };
                    assert_eq!(error.kind(), &expected, "{}", source);
                    assert_eq!(error.get_position().column, prefix.len(), "{}", source);
                }
            }
        }
    }
}

#[test]
fn test_tokenize_signed_suffixes() {
    let tokens = tokenize("test.asm", "plus.byte sub.char mult.hword print.int lt.word gte.long").unwrap();

    assert_eq!(tokens[0].operand_type, Some(OperandType::Byte));
    assert_eq!(tokens[1].operand_type, Some(OperandType::Char));
    assert_eq!(tokens[2].operand_type, Some(OperandType::Hword));
    assert_eq!(tokens[3].operand_type, Some(OperandType::Int));
    assert_eq!(tokens[4].operand_type, Some(OperandType::Word));
    assert_eq!(tokens[5].operand_type, Some(OperandType::Long));
    assert_eq!(tokens[5].kind, TokenKind::Gte);
}

#[test]
fn test_longer_prefixes_win() {
    assert_eq!(
        kinds("push.reg.byte push.byte malloc.stack.word mset.stack.hword mget.stack.byte lte.int lt.int"),
        vec![
            TokenKind::PushReg,
            TokenKind::Push,
            TokenKind::MallocStack,
            TokenKind::MsetStack,
            TokenKind::MgetStack,
            TokenKind::Lte,
            TokenKind::Lt,
        ]
    );
}

#[test]
fn test_unsigned_family_rejects_signed_suffix() {
    let error = tokenize("test.asm", "push.int 1").unwrap_err();

    assert_eq!(error.get_error_name(), "EXPECTED_UNSIGNED_TYPE_SUFFIX");
    assert_eq!(
        error.kind(),
        &LexErrorImpl::ExpectedUnsignedTypeSuffix {
            suffix: "INT".to_string()
        }
    );
    assert_eq!(error.get_position().column, 5);
}

#[test]
fn test_signed_family_rejects_unknown_suffix() {
    let error = tokenize("test.asm", "noop\n  print.dword").unwrap_err();

    assert_eq!(error.get_error_name(), "EXPECTED_TYPE_SUFFIX");
    assert_eq!(error.get_position().line, 2);
    assert_eq!(error.get_position().column, 8);
}

#[test]
fn test_prefix_without_suffix_is_symbol() {
    let tokens = tokenize("test.asm", "push.").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Symbol);
    assert_eq!(tokens[0].content, "PUSH.");
}

#[test]
fn test_tokenize_symbols() {
    let tokens = tokenize("test.asm", "loop main:start _x#1 - .label").unwrap();

    let contents: Vec<&str> = tokens.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, vec!["LOOP", "MAIN:START", "_X#1", "-", ".LABEL"]);
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Symbol));
}

#[test]
fn test_lone_dollar_is_symbol() {
    let tokens = tokenize("test.asm", "$").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Symbol);
    assert_eq!(tokens[0].content, "$");
}

#[test]
fn test_unknown_directive() {
    let error = tokenize("test.asm", "noop %define").unwrap_err();

    assert_eq!(error.get_error_name(), "INVALID_PREPROCESSOR_DIRECTIVE");
    assert_eq!(error.get_position().column, 5);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("test.asm", "42 -7 0 0x1F 0xff").unwrap();

    let contents: Vec<&str> = tokens.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, vec!["42", "-7", "0", "0x1F", "0xff"]);
    assert!(tokens.iter().all(|t| t.kind == TokenKind::LiteralNumber));
}

#[test]
fn test_number_must_end_at_whitespace() {
    let error = tokenize("test.asm", "push.byte 123abc").unwrap_err();

    assert_eq!(error.get_error_name(), "INVALID_NUMBER_LITERAL");
    assert_eq!(error.get_position().column, 10);

    let error = tokenize("test.asm", "0x1G").unwrap_err();
    assert_eq!(error.get_error_name(), "INVALID_NUMBER_LITERAL");
}

#[test]
fn test_number_at_end_of_input() {
    let tokens = tokenize("test.asm", "push.word 10").unwrap();

    assert_eq!(tokens[1].kind, TokenKind::LiteralNumber);
    assert_eq!(tokens[1].content, "10");
}

#[test]
fn test_dash_symbol_versus_negative_number() {
    let tokens = tokenize("test.asm", "-x -1").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Symbol);
    assert_eq!(tokens[1].kind, TokenKind::LiteralNumber);
    assert_eq!(tokens[1].content, "-1");
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize("test.asm", r#""hello" "two words" "no\nescape""#).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::LiteralString);
    assert_eq!(tokens[0].content, "hello");
    assert_eq!(tokens[1].content, "two words");
    assert_eq!(tokens[2].content, r"no\nescape");
}

#[test]
fn test_unterminated_string() {
    let error = tokenize("test.asm", "\"abc").unwrap_err();

    assert_eq!(error.get_error_name(), "INVALID_STRING_LITERAL");
    assert_eq!(error.get_position().column, 0);
}

#[test]
fn test_tokenize_chars() {
    let tokens = tokenize("test.asm", r"'a' '\n' '\t' '\r' '\\' ' '").unwrap();

    let contents: Vec<&str> = tokens.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, vec!["97", "10", "9", "13", "92", "32"]);
    assert!(tokens.iter().all(|t| t.kind == TokenKind::LiteralChar));
}

#[test]
fn test_malformed_char_literals() {
    for source in ["'ab'", "''", "'", "'a", r"'\n"] {
        let error = tokenize("test.asm", source).unwrap_err();
        assert_eq!(error.get_error_name(), "INVALID_CHAR_LITERAL", "{}", source);
    }
}

#[test]
fn test_invalid_char_escape() {
    let error = tokenize("test.asm", r"'\z'").unwrap_err();

    assert_eq!(error.get_error_name(), "INVALID_CHAR_LITERAL_ESCAPE_SEQUENCE");
    assert_eq!(
        error.kind(),
        &LexErrorImpl::InvalidCharLiteralEscapeSequence { escape: 'z' }
    );
    assert_eq!(error.get_position().column, 2);
}

#[test]
fn test_star_and_comment() {
    let tokens = tokenize("test.asm", "* ; comment\n").unwrap();

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Star);
    assert!(tokens[0].content.is_empty());
}

#[test]
fn test_comment_at_end_of_file() {
    assert_eq!(kinds("halt ; no trailing newline"), vec![TokenKind::Halt]);
}

#[test]
fn test_unknown_lexeme() {
    let error = tokenize("test.asm", "noop @").unwrap_err();

    assert_eq!(error.get_error_name(), "UNKNOWN_LEXEME");
    assert_eq!(error.kind(), &LexErrorImpl::UnknownLexeme { lexeme: '@' });
    assert_eq!(error.get_position().column, 5);
}

#[test]
fn test_positions() {
    let source = "push.byte 1\n\tmov.word 2 ; comment\n\n  \"str\" halt";
    let tokens = tokenize("pos.asm", source).unwrap();

    let positions: Vec<(usize, usize)> = tokens
        .iter()
        .map(|t| (t.position.line, t.position.column))
        .collect();
    assert_eq!(
        positions,
        vec![(1, 0), (1, 10), (2, 1), (2, 10), (4, 2), (4, 8)]
    );
    assert!(tokens.iter().all(|t| t.source_name() == "pos.asm"));
}

#[test]
fn test_string_spanning_lines_advances_line() {
    let tokens = tokenize("test.asm", "\"a\nb\" halt").unwrap();

    assert_eq!(tokens[0].content, "a\nb");
    assert_eq!(tokens[1].position.line, 2);
    assert_eq!(tokens[1].position.column, 3);
}

#[test]
fn test_columns_after_multibyte_characters() {
    let tokens = tokenize("test.asm", "\"héllo→\" 'é' halt\n\"ü\" noop").unwrap();

    let positions: Vec<(usize, usize)> = tokens
        .iter()
        .map(|t| (t.position.line, t.position.column))
        .collect();
    assert_eq!(positions, vec![(1, 0), (1, 9), (1, 13), (2, 0), (2, 4)]);
}

#[test]
fn test_columns_on_long_line() {
    let count = 20_000;
    let tokens = tokenize("test.asm", &"noop ".repeat(count)).unwrap();

    assert_eq!(tokens.len(), count);
    assert_eq!(tokens[count - 1].position.line, 1);
    assert_eq!(tokens[count - 1].position.column, 5 * (count - 1));
}

#[test]
fn test_round_trip_canonical_mnemonics() {
    let source = "push.reg.word pop.hword plus.long jump.if.byte jump.abs call.stack \
                  global * $ref sym 12 'a' '\\n' \"text\" %const %end %use";
    let tokens = tokenize("test.asm", source).unwrap();

    for token in &tokens {
        let relexed = tokenize("test.asm", &token.to_source()).unwrap();
        assert_eq!(relexed.len(), 1, "{}", token);
        assert_eq!(relexed[0].kind, token.kind);
        assert_eq!(relexed[0].operand_type, token.operand_type);
        assert_eq!(relexed[0].content, token.content);
    }
}

#[test]
fn test_token_display() {
    let tokens = tokenize("test.asm", "push.word 5").unwrap();

    assert_eq!(tokens[0].to_string(), "PUSH[WORD]@1, 0");
    assert_eq!(tokens[1].to_string(), "LITERAL_NUMBER(`5`)@1, 10");
}

#[test]
fn test_empty_source() {
    assert!(tokenize("test.asm", "").unwrap().is_empty());
    assert!(tokenize("test.asm", " \n\t; only a comment").unwrap().is_empty());
}
