// src/frontend/token.rs

use miette::SourceSpan;

/// All token types the Go declaration frontend distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Literals
    Identifier,
    IntLiteral,
    FloatLiteral,
    ImaginaryLiteral,
    RuneLiteral,
    StringLiteral,
    RawStringLiteral,

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators the declaration grammar cares about
    Star,
    Tilde,
    Pipe,
    Assign,
    Arrow, // <-
    Increment,
    Decrement,
    /// Any other operator (`+`, `&&`, `:=`, ...); only skipped over
    Operator,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Ellipsis,
    Colon,
    Semicolon,

    // Special
    Eof,
    Error,
}

impl TokenType {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::IntLiteral => "integer",
            Self::FloatLiteral => "float",
            Self::ImaginaryLiteral => "imaginary",
            Self::RuneLiteral => "rune",
            Self::StringLiteral | Self::RawStringLiteral => "string",
            Self::KwBreak => "break",
            Self::KwCase => "case",
            Self::KwChan => "chan",
            Self::KwConst => "const",
            Self::KwContinue => "continue",
            Self::KwDefault => "default",
            Self::KwDefer => "defer",
            Self::KwElse => "else",
            Self::KwFallthrough => "fallthrough",
            Self::KwFor => "for",
            Self::KwFunc => "func",
            Self::KwGo => "go",
            Self::KwGoto => "goto",
            Self::KwIf => "if",
            Self::KwImport => "import",
            Self::KwInterface => "interface",
            Self::KwMap => "map",
            Self::KwPackage => "package",
            Self::KwRange => "range",
            Self::KwReturn => "return",
            Self::KwSelect => "select",
            Self::KwStruct => "struct",
            Self::KwSwitch => "switch",
            Self::KwType => "type",
            Self::KwVar => "var",
            Self::Star => "*",
            Self::Tilde => "~",
            Self::Pipe => "|",
            Self::Assign => "=",
            Self::Arrow => "<-",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::Operator => "operator",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Ellipsis => "...",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Eof => "end of file",
            Self::Error => "error",
        }
    }

    /// Look up the keyword for an identifier-shaped lexeme
    pub fn keyword(lexeme: &str) -> Option<TokenType> {
        let ty = match lexeme {
            "break" => Self::KwBreak,
            "case" => Self::KwCase,
            "chan" => Self::KwChan,
            "const" => Self::KwConst,
            "continue" => Self::KwContinue,
            "default" => Self::KwDefault,
            "defer" => Self::KwDefer,
            "else" => Self::KwElse,
            "fallthrough" => Self::KwFallthrough,
            "for" => Self::KwFor,
            "func" => Self::KwFunc,
            "go" => Self::KwGo,
            "goto" => Self::KwGoto,
            "if" => Self::KwIf,
            "import" => Self::KwImport,
            "interface" => Self::KwInterface,
            "map" => Self::KwMap,
            "package" => Self::KwPackage,
            "range" => Self::KwRange,
            "return" => Self::KwReturn,
            "select" => Self::KwSelect,
            "struct" => Self::KwStruct,
            "switch" => Self::KwSwitch,
            "type" => Self::KwType,
            "var" => Self::KwVar,
            _ => return None,
        };
        Some(ty)
    }

    /// Whether a newline directly after this token ends the statement.
    pub fn ends_line(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::IntLiteral
                | Self::FloatLiteral
                | Self::ImaginaryLiteral
                | Self::RuneLiteral
                | Self::StringLiteral
                | Self::RawStringLiteral
                | Self::KwBreak
                | Self::KwContinue
                | Self::KwFallthrough
                | Self::KwReturn
                | Self::Increment
                | Self::Decrement
                | Self::RParen
                | Self::RBracket
                | Self::RBrace
        )
    }

    /// Whether a type expression can start with this token
    pub fn starts_type(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::Star
                | Self::LBracket
                | Self::LParen
                | Self::Arrow
                | Self::KwChan
                | Self::KwFunc
                | Self::KwInterface
                | Self::KwMap
                | Self::KwStruct
        )
    }
}

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize, // Byte offset
    pub end: usize,   // Byte offset (exclusive)
    pub line: u32,    // Start line (1-indexed)
    pub column: u32,  // Start column (1-indexed)
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// A token with its location in source code
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            span,
        }
    }
}
