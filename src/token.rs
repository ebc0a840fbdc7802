//! Token kinds for the C99 + GNU dialect.

use std::fmt;
use std::sync::OnceLock;

use hashbrown::HashMap;

use crate::ast::Symbol;
use crate::position::{HasPos, Pos};

/// Suffix flags of an integer constant (`42ul`, `7LL`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntSuffix {
    pub unsigned: bool,
    pub long: bool,
    pub long_long: bool,
}

/// Suffix flags of a floating constant (`1.0f`, `2.5L`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FloatSuffix {
    pub float: bool,
    pub long_double: bool,
}

/// Lexical token kinds.
///
/// Identifiers arrive in two flavors: [`TokenKind::Identifier`] for ordinary
/// names and [`TokenKind::TypedefName`] for names the scope stack currently
/// binds as typedefs. The split is decided at fetch time by the parser, which
/// is what lets the grammar tell declarations from expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === LITERALS ===
    IntegerConstant(u64, IntSuffix),
    FloatConstant(Symbol, FloatSuffix),
    CharConstant(u32),
    StringLiteral(Symbol),

    // === IDENTIFIERS ===
    Identifier(Symbol),
    TypedefName(Symbol),

    // === KEYWORDS ===
    // Storage class specifiers
    Auto,
    Extern,
    Register,
    Static,
    Thread,
    Typedef,

    // Type qualifiers
    Const,
    Restrict,
    Volatile,
    Inline,

    // Type specifiers
    Bool,
    Char,
    Complex,
    Double,
    Float,
    Int,
    Long,
    Short,
    Signed,
    Unsigned,
    Void,

    Struct,
    Union,
    Enum,

    // Control flow
    Break,
    Case,
    Continue,
    Default,
    Do,
    Else,
    For,
    Goto,
    If,
    Return,
    Switch,
    While,

    Sizeof,
    Alignof,

    // GNU extension markers
    Asm,
    Attribute,
    Extension,
    Typeof,
    Real,
    Imag,
    Label,
    BuiltinVaArg,
    BuiltinOffsetof,
    BuiltinTypesCompatible,

    // === OPERATORS ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Increment,
    Decrement,

    And,
    Or,
    Xor,
    Not,
    Tilde,
    LeftShift,
    RightShift,

    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,

    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    LeftShiftAssign,
    RightShiftAssign,

    LogicAnd,
    LogicOr,

    Arrow,
    Dot,

    Question,
    Colon,

    // === PUNCTUATION ===
    Comma,
    Semicolon,
    Ellipsis,

    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,

    // === SPECIAL ===
    Eof,
}

/// Token with its source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos) -> Self {
        Token { kind, pos }
    }
}

impl HasPos for Token {
    fn pos(&self) -> Pos {
        self.pos
    }
}

/// Keyword lookup table, including the double-underscore GNU spellings.
static KEYWORDS: OnceLock<HashMap<&'static str, TokenKind>> = OnceLock::new();

fn init_keywords() -> HashMap<&'static str, TokenKind> {
    let mut map = HashMap::new();

    // C99 keywords
    map.insert("auto", TokenKind::Auto);
    map.insert("break", TokenKind::Break);
    map.insert("case", TokenKind::Case);
    map.insert("char", TokenKind::Char);
    map.insert("const", TokenKind::Const);
    map.insert("continue", TokenKind::Continue);
    map.insert("default", TokenKind::Default);
    map.insert("do", TokenKind::Do);
    map.insert("double", TokenKind::Double);
    map.insert("else", TokenKind::Else);
    map.insert("enum", TokenKind::Enum);
    map.insert("extern", TokenKind::Extern);
    map.insert("float", TokenKind::Float);
    map.insert("for", TokenKind::For);
    map.insert("goto", TokenKind::Goto);
    map.insert("if", TokenKind::If);
    map.insert("inline", TokenKind::Inline);
    map.insert("int", TokenKind::Int);
    map.insert("long", TokenKind::Long);
    map.insert("register", TokenKind::Register);
    map.insert("restrict", TokenKind::Restrict);
    map.insert("return", TokenKind::Return);
    map.insert("short", TokenKind::Short);
    map.insert("signed", TokenKind::Signed);
    map.insert("sizeof", TokenKind::Sizeof);
    map.insert("static", TokenKind::Static);
    map.insert("struct", TokenKind::Struct);
    map.insert("switch", TokenKind::Switch);
    map.insert("typedef", TokenKind::Typedef);
    map.insert("union", TokenKind::Union);
    map.insert("unsigned", TokenKind::Unsigned);
    map.insert("void", TokenKind::Void);
    map.insert("volatile", TokenKind::Volatile);
    map.insert("while", TokenKind::While);
    map.insert("_Bool", TokenKind::Bool);
    map.insert("_Complex", TokenKind::Complex);

    // GNU alternate spellings of standard keywords
    map.insert("__const", TokenKind::Const);
    map.insert("__const__", TokenKind::Const);
    map.insert("__inline", TokenKind::Inline);
    map.insert("__inline__", TokenKind::Inline);
    map.insert("__restrict", TokenKind::Restrict);
    map.insert("__restrict__", TokenKind::Restrict);
    map.insert("__signed", TokenKind::Signed);
    map.insert("__signed__", TokenKind::Signed);
    map.insert("__volatile", TokenKind::Volatile);
    map.insert("__volatile__", TokenKind::Volatile);
    map.insert("__complex__", TokenKind::Complex);

    // GNU extensions
    map.insert("__thread", TokenKind::Thread);
    map.insert("_Thread_local", TokenKind::Thread);
    map.insert("asm", TokenKind::Asm);
    map.insert("__asm", TokenKind::Asm);
    map.insert("__asm__", TokenKind::Asm);
    map.insert("__attribute", TokenKind::Attribute);
    map.insert("__attribute__", TokenKind::Attribute);
    map.insert("__extension__", TokenKind::Extension);
    map.insert("typeof", TokenKind::Typeof);
    map.insert("__typeof", TokenKind::Typeof);
    map.insert("__typeof__", TokenKind::Typeof);
    map.insert("__alignof", TokenKind::Alignof);
    map.insert("__alignof__", TokenKind::Alignof);
    map.insert("_Alignof", TokenKind::Alignof);
    map.insert("__real__", TokenKind::Real);
    map.insert("__real", TokenKind::Real);
    map.insert("__imag__", TokenKind::Imag);
    map.insert("__imag", TokenKind::Imag);
    map.insert("__label__", TokenKind::Label);
    map.insert("__builtin_va_arg", TokenKind::BuiltinVaArg);
    map.insert("__builtin_offsetof", TokenKind::BuiltinOffsetof);
    map.insert("__builtin_types_compatible_p", TokenKind::BuiltinTypesCompatible);

    map
}

/// Classify an identifier lexeme as a keyword, if it is one.
pub fn lookup_keyword(name: &str) -> Option<TokenKind> {
    KEYWORDS.get_or_init(init_keywords).get(name).copied()
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::IntegerConstant(value, _) => return write!(f, "{}", value),
            TokenKind::FloatConstant(text, _) => return write!(f, "{}", text),
            TokenKind::CharConstant(value) => return write!(f, "'\\x{:x}'", value),
            TokenKind::StringLiteral(text) => return write!(f, "\"{}\"", text),
            TokenKind::Identifier(name) | TokenKind::TypedefName(name) => {
                return write!(f, "{}", name);
            }

            TokenKind::Auto => "auto",
            TokenKind::Extern => "extern",
            TokenKind::Register => "register",
            TokenKind::Static => "static",
            TokenKind::Thread => "__thread",
            TokenKind::Typedef => "typedef",
            TokenKind::Const => "const",
            TokenKind::Restrict => "restrict",
            TokenKind::Volatile => "volatile",
            TokenKind::Inline => "inline",
            TokenKind::Bool => "_Bool",
            TokenKind::Char => "char",
            TokenKind::Complex => "_Complex",
            TokenKind::Double => "double",
            TokenKind::Float => "float",
            TokenKind::Int => "int",
            TokenKind::Long => "long",
            TokenKind::Short => "short",
            TokenKind::Signed => "signed",
            TokenKind::Unsigned => "unsigned",
            TokenKind::Void => "void",
            TokenKind::Struct => "struct",
            TokenKind::Union => "union",
            TokenKind::Enum => "enum",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Continue => "continue",
            TokenKind::Default => "default",
            TokenKind::Do => "do",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Return => "return",
            TokenKind::Switch => "switch",
            TokenKind::While => "while",
            TokenKind::Sizeof => "sizeof",
            TokenKind::Alignof => "__alignof__",
            TokenKind::Asm => "asm",
            TokenKind::Attribute => "__attribute__",
            TokenKind::Extension => "__extension__",
            TokenKind::Typeof => "typeof",
            TokenKind::Real => "__real__",
            TokenKind::Imag => "__imag__",
            TokenKind::Label => "__label__",
            TokenKind::BuiltinVaArg => "__builtin_va_arg",
            TokenKind::BuiltinOffsetof => "__builtin_offsetof",
            TokenKind::BuiltinTypesCompatible => "__builtin_types_compatible_p",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Xor => "^",
            TokenKind::Not => "!",
            TokenKind::Tilde => "~",
            TokenKind::LeftShift => "<<",
            TokenKind::RightShift => ">>",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Assign => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::StarAssign => "*=",
            TokenKind::DivAssign => "/=",
            TokenKind::ModAssign => "%=",
            TokenKind::AndAssign => "&=",
            TokenKind::OrAssign => "|=",
            TokenKind::XorAssign => "^=",
            TokenKind::LeftShiftAssign => "<<=",
            TokenKind::RightShiftAssign => ">>=",
            TokenKind::LogicAnd => "&&",
            TokenKind::LogicOr => "||",
            TokenKind::Arrow => "->",
            TokenKind::Dot => ".",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Ellipsis => "...",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}
