use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Position;

/// Which set of operand type suffixes an instruction family accepts.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SuffixClass {
    /// `BYTE`, `HWORD`, `WORD`
    Unsigned,
    /// `BYTE`, `CHAR`, `HWORD`, `INT`, `WORD`, `LONG`
    Signed,
}

lazy_static! {
    /// Symbols that map straight onto a token kind.
    pub static ref EXACT_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("%CONST", TokenKind::PpConst);
        map.insert("%USE", TokenKind::PpUse);
        map.insert("%END", TokenKind::PpEnd);
        map.insert("NOOP", TokenKind::Noop);
        map.insert("HALT", TokenKind::Halt);
        map.insert("MDELETE", TokenKind::Mdelete);
        map.insert("MSIZE", TokenKind::Msize);
        map.insert("JUMP.ABS", TokenKind::JumpAbs);
        map.insert("JUMP.STACK", TokenKind::JumpStack);
        map.insert("CALL", TokenKind::Call);
        map.insert("CALL.STACK", TokenKind::CallStack);
        map.insert("RET", TokenKind::Ret);
        map.insert("GLOBAL", TokenKind::Global);
        map
    };

    /// Instruction families that carry an operand type suffix. Longer prefixes
    /// sharing a stem come first so `PUSH.REG.` wins over `PUSH.`.
    pub static ref PREFIX_TABLE: Vec<(&'static str, TokenKind, SuffixClass)> = vec![
        ("PUSH.REG.", TokenKind::PushReg, SuffixClass::Unsigned),
        ("PUSH.", TokenKind::Push, SuffixClass::Unsigned),
        ("POP.", TokenKind::Pop, SuffixClass::Unsigned),
        ("MOV.", TokenKind::Mov, SuffixClass::Unsigned),
        ("DUP.", TokenKind::Dup, SuffixClass::Unsigned),
        ("MALLOC.STACK.", TokenKind::MallocStack, SuffixClass::Unsigned),
        ("MALLOC.", TokenKind::Malloc, SuffixClass::Unsigned),
        ("MSET.STACK.", TokenKind::MsetStack, SuffixClass::Unsigned),
        ("MSET.", TokenKind::Mset, SuffixClass::Unsigned),
        ("MGET.STACK.", TokenKind::MgetStack, SuffixClass::Unsigned),
        ("MGET.", TokenKind::Mget, SuffixClass::Unsigned),
        ("NOT.", TokenKind::Not, SuffixClass::Unsigned),
        ("OR.", TokenKind::Or, SuffixClass::Unsigned),
        ("AND.", TokenKind::And, SuffixClass::Unsigned),
        ("XOR.", TokenKind::Xor, SuffixClass::Unsigned),
        ("EQ.", TokenKind::Eq, SuffixClass::Unsigned),
        ("LTE.", TokenKind::Lte, SuffixClass::Signed),
        ("LT.", TokenKind::Lt, SuffixClass::Signed),
        ("GTE.", TokenKind::Gte, SuffixClass::Signed),
        ("GT.", TokenKind::Gt, SuffixClass::Signed),
        ("SUB.", TokenKind::Sub, SuffixClass::Signed),
        ("PLUS.", TokenKind::Plus, SuffixClass::Signed),
        ("MULT.", TokenKind::Mult, SuffixClass::Signed),
        ("PRINT.", TokenKind::Print, SuffixClass::Signed),
        ("JUMP.IF.", TokenKind::JumpIf, SuffixClass::Unsigned),
    ];
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Preprocessor directives
    PpConst,     // %const <symbol> ... %end
    PpUse,       // %use <string>
    PpEnd,       // %end
    PpReference, // $<symbol>

    Global,
    Star,

    // Literals
    LiteralNumber,
    LiteralChar,
    LiteralString,
    Symbol,

    // Instructions
    Noop,
    Halt,
    Push,
    Pop,
    PushReg,
    Mov,
    Dup,
    Malloc,
    MallocStack,
    Mset,
    MsetStack,
    Mget,
    MgetStack,
    Mdelete,
    Msize,
    Not,
    Or,
    And,
    Xor,
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    Plus,
    Sub,
    Mult,
    Print,
    JumpAbs,
    JumpStack,
    JumpIf,
    Call,
    CallStack,
    Ret,
}

impl TokenKind {
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            TokenKind::PpConst | TokenKind::PpUse | TokenKind::PpEnd | TokenKind::PpReference
        )
    }

    /// The canonical source spelling of this kind, without any operand
    /// suffix. Literals, symbols and references have no fixed spelling.
    pub fn mnemonic(&self) -> Option<&'static str> {
        if let Some((prefix, _, _)) = PREFIX_TABLE.iter().find(|(_, kind, _)| kind == self) {
            return Some(prefix.trim_end_matches('.'));
        }

        EXACT_LOOKUP
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::PpConst => "PP_CONST",
            TokenKind::PpUse => "PP_USE",
            TokenKind::PpEnd => "PP_END",
            TokenKind::PpReference => "PP_REFERENCE",
            TokenKind::Global => "GLOBAL",
            TokenKind::Star => "STAR",
            TokenKind::LiteralNumber => "LITERAL_NUMBER",
            TokenKind::LiteralChar => "LITERAL_CHAR",
            TokenKind::LiteralString => "LITERAL_STRING",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Noop => "NOOP",
            TokenKind::Halt => "HALT",
            TokenKind::Push => "PUSH",
            TokenKind::Pop => "POP",
            TokenKind::PushReg => "PUSH_REG",
            TokenKind::Mov => "MOV",
            TokenKind::Dup => "DUP",
            TokenKind::Malloc => "MALLOC",
            TokenKind::MallocStack => "MALLOC_STACK",
            TokenKind::Mset => "MSET",
            TokenKind::MsetStack => "MSET_STACK",
            TokenKind::Mget => "MGET",
            TokenKind::MgetStack => "MGET_STACK",
            TokenKind::Mdelete => "MDELETE",
            TokenKind::Msize => "MSIZE",
            TokenKind::Not => "NOT",
            TokenKind::Or => "OR",
            TokenKind::And => "AND",
            TokenKind::Xor => "XOR",
            TokenKind::Eq => "EQ",
            TokenKind::Lt => "LT",
            TokenKind::Lte => "LTE",
            TokenKind::Gt => "GT",
            TokenKind::Gte => "GTE",
            TokenKind::Plus => "PLUS",
            TokenKind::Sub => "SUB",
            TokenKind::Mult => "MULT",
            TokenKind::Print => "PRINT",
            TokenKind::JumpAbs => "JUMP_ABS",
            TokenKind::JumpStack => "JUMP_STACK",
            TokenKind::JumpIf => "JUMP_IF",
            TokenKind::Call => "CALL",
            TokenKind::CallStack => "CALL_STACK",
            TokenKind::Ret => "RET",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Operand width/signedness parsed from an instruction suffix.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum OperandType {
    Byte,
    Char,
    Hword,
    Int,
    Word,
    Long,
}

impl OperandType {
    pub fn parse(suffix: &str, class: SuffixClass) -> Option<OperandType> {
        let operand = match suffix {
            "BYTE" => OperandType::Byte,
            "CHAR" => OperandType::Char,
            "HWORD" => OperandType::Hword,
            "INT" => OperandType::Int,
            "WORD" => OperandType::Word,
            "LONG" => OperandType::Long,
            _ => return None,
        };

        match class {
            SuffixClass::Signed => Some(operand),
            SuffixClass::Unsigned if operand.is_unsigned() => Some(operand),
            SuffixClass::Unsigned => None,
        }
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, OperandType::Byte | OperandType::Hword | OperandType::Word)
    }

    pub fn name(&self) -> &'static str {
        match self {
            OperandType::Byte => "BYTE",
            OperandType::Char => "CHAR",
            OperandType::Hword => "HWORD",
            OperandType::Int => "INT",
            OperandType::Word => "WORD",
            OperandType::Long => "LONG",
        }
    }
}

impl Display for OperandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub operand_type: Option<OperandType>,
    pub content: String,
    pub position: Position,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(operand) = self.operand_type {
            write!(f, "[{}]", operand)?;
        }
        if !self.content.is_empty() {
            write!(f, "(`{}`)", self.content)?;
        }
        write!(f, "@{}, {}", self.position.line, self.position.column)
    }
}

impl Token {
    pub fn source_name(&self) -> &str {
        self.position.file.as_str()
    }

    /// Reconstructs source text that lexes back to an equivalent token.
    pub fn to_source(&self) -> String {
        match self.kind {
            TokenKind::LiteralNumber | TokenKind::Symbol => self.content.clone(),
            TokenKind::LiteralString => format!("\"{}\"", self.content),
            TokenKind::LiteralChar => {
                let code = self.content.parse::<u32>().ok().and_then(char::from_u32);
                match code {
                    Some('\n') => String::from("'\\n'"),
                    Some('\t') => String::from("'\\t'"),
                    Some('\r') => String::from("'\\r'"),
                    Some('\\') => String::from("'\\\\'"),
                    Some(c) => format!("'{}'", c),
                    None => String::from("''"),
                }
            }
            TokenKind::PpReference => format!("${}", self.content),
            TokenKind::Star => String::from("*"),
            kind => {
                let mnemonic = kind.mnemonic().unwrap_or_default();
                match self.operand_type {
                    Some(operand) => format!("{}.{}", mnemonic, operand),
                    None => mnemonic.to_string(),
                }
            }
        }
    }
}
