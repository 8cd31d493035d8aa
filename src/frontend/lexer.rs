// src/frontend/lexer.rs

use crate::errors::LexerError;
use crate::frontend::{Span, Token, TokenType};

/// Tokenizer for Go source.
///
/// Comments are dropped. Semicolons are inserted at line ends following the
/// rules of the Go specification, so the parser only ever sees explicit
/// `;` separators.
pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
    start_line: u32,
    start_column: u32,
    // Last emitted token, drives semicolon insertion
    last: Option<TokenType>,
    // Error collection
    errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
            last: None,
            errors: Vec::new(),
        }
    }

    /// Take all collected errors, leaving the internal list empty.
    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors have been collected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Lex the whole source, ending with a single `Eof` token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.ty == TokenType::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        if let Some(semicolon) = self.skip_trivia() {
            return semicolon;
        }

        self.start = self.current;
        self.start_column = self.column;
        self.start_line = self.line;

        let Some(c) = self.advance() else {
            if self.needs_semicolon() {
                return self.make_token(TokenType::Semicolon);
            }
            return self.make_token(TokenType::Eof);
        };

        match c {
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '[' => self.make_token(TokenType::LBracket),
            ']' => self.make_token(TokenType::RBracket),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),
            ',' => self.make_token(TokenType::Comma),
            ';' => self.make_token(TokenType::Semicolon),
            '~' => self.make_token(TokenType::Tilde),
            ':' => {
                if self.match_char('=') {
                    self.make_token(TokenType::Operator)
                } else {
                    self.make_token(TokenType::Colon)
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.make_token(TokenType::Ellipsis)
                } else if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.number()
                } else {
                    self.make_token(TokenType::Dot)
                }
            }
            '*' => {
                if self.match_char('=') {
                    self.make_token(TokenType::Operator)
                } else {
                    self.make_token(TokenType::Star)
                }
            }
            '|' => {
                if self.match_char('|') || self.match_char('=') {
                    self.make_token(TokenType::Operator)
                } else {
                    self.make_token(TokenType::Pipe)
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenType::Operator)
                } else {
                    self.make_token(TokenType::Assign)
                }
            }
            '<' => {
                if self.match_char('-') {
                    self.make_token(TokenType::Arrow)
                } else {
                    // <, <=, <<, <<=
                    self.match_char('<');
                    self.match_char('=');
                    self.make_token(TokenType::Operator)
                }
            }
            '>' => {
                self.match_char('>');
                self.match_char('=');
                self.make_token(TokenType::Operator)
            }
            '+' => {
                if self.match_char('+') {
                    self.make_token(TokenType::Increment)
                } else {
                    self.match_char('=');
                    self.make_token(TokenType::Operator)
                }
            }
            '-' => {
                if self.match_char('-') {
                    self.make_token(TokenType::Decrement)
                } else {
                    self.match_char('=');
                    self.make_token(TokenType::Operator)
                }
            }
            '&' => {
                if !self.match_char('&') {
                    self.match_char('^');
                    self.match_char('=');
                }
                self.make_token(TokenType::Operator)
            }
            '!' | '^' | '%' | '/' => {
                self.match_char('=');
                self.make_token(TokenType::Operator)
            }
            '"' => self.string(),
            '`' => self.raw_string(),
            '\'' => self.rune(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            c => {
                self.errors.push(LexerError::UnexpectedCharacter {
                    ch: c,
                    span: self.current_span().into(),
                });
                self.make_token(TokenType::Error)
            }
        }
    }

    /// Skip whitespace and comments. Returns an inserted semicolon when a
    /// line break ends a statement.
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\u{feff}') => {
                    self.advance();
                }
                Some('\n') => {
                    if self.needs_semicolon() {
                        self.begin_token();
                        self.advance();
                        return Some(self.make_token(TokenType::Semicolon));
                    }
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    self.begin_token();
                    self.advance();
                    self.advance();
                    let mut saw_newline = false;
                    let mut closed = false;
                    while let Some(c) = self.advance() {
                        if c == '\n' {
                            saw_newline = true;
                        } else if c == '*' && self.match_char('/') {
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        self.errors.push(LexerError::UnterminatedComment {
                            span: Span::new(self.start, self.start + 2, self.start_line, self.start_column)
                                .into(),
                        });
                    }
                    if saw_newline && self.needs_semicolon() {
                        return Some(self.make_token(TokenType::Semicolon));
                    }
                }
                _ => return None,
            }
        }
    }

    fn identifier(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let lexeme = &self.source[self.start..self.current];
        match TokenType::keyword(lexeme) {
            Some(keyword) => self.make_token(keyword),
            None => self.make_token(TokenType::Identifier),
        }
    }

    fn number(&mut self) -> Token {
        let lexeme_start = self.start;
        let is_hex = {
            let rest = &self.source[lexeme_start..];
            rest.starts_with("0x") || rest.starts_with("0X")
        };
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
                let exponent = if is_hex {
                    matches!(c, 'p' | 'P')
                } else {
                    matches!(c, 'e' | 'E')
                };
                if exponent && matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
            } else if c == '.' && self.peek_next() != Some('.') {
                self.advance();
            } else {
                break;
            }
        }

        let lexeme = &self.source[lexeme_start..self.current];
        let ty = if lexeme.ends_with('i') {
            TokenType::ImaginaryLiteral
        } else if lexeme.contains('.')
            || (!is_hex && lexeme.contains(['e', 'E']))
            || (is_hex && lexeme.contains(['p', 'P']))
        {
            TokenType::FloatLiteral
        } else {
            TokenType::IntLiteral
        };
        self.make_token(ty)
    }

    fn string(&mut self) -> Token {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.errors.push(LexerError::UnterminatedString {
                        span: self.current_span().into(),
                    });
                    return self.make_token(TokenType::Error);
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    self.advance();
                    return self.make_token(TokenType::StringLiteral);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn raw_string(&mut self) -> Token {
        loop {
            match self.advance() {
                None => {
                    self.errors.push(LexerError::UnterminatedRawString {
                        span: Span::new(self.start, self.start + 1, self.start_line, self.start_column)
                            .into(),
                    });
                    return self.make_token(TokenType::Error);
                }
                Some('`') => return self.make_token(TokenType::RawStringLiteral),
                Some(_) => {}
            }
        }
    }

    fn rune(&mut self) -> Token {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.errors.push(LexerError::UnterminatedRune {
                        span: self.current_span().into(),
                    });
                    return self.make_token(TokenType::Error);
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('\'') => {
                    self.advance();
                    return self.make_token(TokenType::RuneLiteral);
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn needs_semicolon(&self) -> bool {
        self.last.is_some_and(|ty| ty.ends_line())
    }

    fn begin_token(&mut self) {
        self.start = self.current;
        self.start_column = self.column;
        self.start_line = self.line;
    }

    fn advance(&mut self) -> Option<char> {
        let (idx, c) = self.chars.next()?;
        self.current = idx + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut rest = self.source[self.current..].chars();
        rest.next();
        rest.next()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_span(&self) -> Span {
        Span::new(self.start, self.current, self.start_line, self.start_column)
    }

    fn make_token(&mut self, ty: TokenType) -> Token {
        self.last = Some(ty);
        Token::new(ty, &self.source[self.start..self.current], self.current_span())
    }
}
