use crate::language::error::{Error, Result};
use crate::language::token::{Token, TokenType};
use crate::lexer_error;

/// Single-pass scanner. Errors do not abort the scan; they are collected and
/// scanning picks up at the next character, so one pass reports everything.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    start: usize,
    line: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            start: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.consume();
            } else {
                break;
            }
        }
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        let lexeme: String = self.input[self.start..self.position].iter().collect();
        Token::new(token_type, lexeme, self.line)
    }

    /// Emits the two-character kind when the next character matches,
    /// otherwise the single-character kind.
    fn make_operator(&mut self, expected: char, double: TokenType, single: TokenType) -> Token {
        if self.peek() == Some(expected) {
            self.consume();
            self.make_token(double)
        } else {
            self.make_token(single)
        }
    }

    fn read_string(&mut self) -> Result<Token> {
        self.consume();

        while let Some(ch) = self.peek() {
            if ch == '"' {
                break;
            }
            self.consume();
        }

        if self.peek().is_none() {
            return lexer_error!("Unterminated string.", self.line);
        }

        self.consume();

        let literal: String = self.input[self.start + 1..self.position - 1]
            .iter()
            .collect();
        Ok(self.make_token(TokenType::String(literal)))
    }

    fn read_number(&mut self) -> Result<Token> {
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.consume();
        }

        // A trailing dot is not part of the number; only consume the dot when
        // a digit follows it.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|ch| ch.is_ascii_digit()) {
            self.consume();
            while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                self.consume();
            }
        }

        let text: String = self.input[self.start..self.position].iter().collect();
        match text.parse::<f64>() {
            Ok(value) => Ok(self.make_token(TokenType::Number(value))),
            Err(_) => lexer_error!(format!("Failed to parse number literal: {text}"), self.line),
        }
    }

    fn read_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            self.consume();
        }

        let text: String = self.input[self.start..self.position].iter().collect();
        let token_type = TokenType::keyword(&text).unwrap_or(TokenType::Identifier);
        Token::new(token_type, text, self.line)
    }

    fn read_comment(&mut self) -> Token {
        self.consume();

        let mut comment = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            comment.push(ch);
            self.consume();
        }

        self.make_token(TokenType::Comment(comment))
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        self.start = self.position;

        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenType::Eof, String::new(), self.line));
        };

        match ch {
            '(' => {
                self.consume();
                Ok(self.make_token(TokenType::LeftParen))
            }
            ')' => {
                self.consume();
                Ok(self.make_token(TokenType::RightParen))
            }
            '{' => {
                self.consume();
                Ok(self.make_token(TokenType::LeftBrace))
            }
            '}' => {
                self.consume();
                Ok(self.make_token(TokenType::RightBrace))
            }
            ',' => {
                self.consume();
                Ok(self.make_token(TokenType::Comma))
            }
            '.' => {
                self.consume();
                Ok(self.make_token(TokenType::Dot))
            }
            '-' => {
                self.consume();
                Ok(self.make_token(TokenType::Minus))
            }
            '+' => {
                self.consume();
                Ok(self.make_token(TokenType::Plus))
            }
            ';' => {
                self.consume();
                Ok(self.make_token(TokenType::Semicolon))
            }
            '*' => {
                self.consume();
                Ok(self.make_token(TokenType::Star))
            }
            '!' => {
                self.consume();
                Ok(self.make_operator('=', TokenType::BangEqual, TokenType::Bang))
            }
            '=' => {
                self.consume();
                Ok(self.make_operator('=', TokenType::EqualEqual, TokenType::Equal))
            }
            '<' => {
                self.consume();
                Ok(self.make_operator('=', TokenType::LessEqual, TokenType::Less))
            }
            '>' => {
                self.consume();
                Ok(self.make_operator('=', TokenType::GreaterEqual, TokenType::Greater))
            }
            '/' => {
                self.consume();
                if self.peek() == Some('/') {
                    Ok(self.read_comment())
                } else {
                    Ok(self.make_token(TokenType::Slash))
                }
            }
            '"' => self.read_string(),
            '0'..='9' => self.read_number(),
            _ if ch.is_ascii_alphabetic() || ch == '_' => Ok(self.read_identifier()),
            _ => {
                self.consume();
                lexer_error!(format!("Unexpected token: {ch}"), self.line)
            }
        }
    }

    /// Scans the whole input. Comment tokens are dropped here; the returned
    /// sequence always ends with an `Eof` token.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Error>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            match self.next_token() {
                Ok(token) => {
                    if matches!(token.token_type, TokenType::Comment(_)) {
                        continue;
                    }
                    let at_end = matches!(token.token_type, TokenType::Eof);
                    tokens.push(token);
                    if at_end {
                        break;
                    }
                }
                Err(error) => errors.push(error),
            }
        }

        (tokens, errors)
    }
}
