//! Value Tokenizer
//!
//! Splits a CSS property value into tokens while keeping the exact source
//! text of numbers and strings, so the normalizer can re-serialize values
//! without losing precision or escapes.

use crate::error::{CssError, CssResult, SourceLocation};

/// Value token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier (keywords, custom property names)
    Ident(String),
    /// Function token (identifier followed by '(')
    Function(String),
    /// Hash token (e.g. #fff)
    Hash(String),
    /// String token, with the quote character and the raw contents
    String { quote: char, raw: String },
    /// Unquoted url() contents
    Url(String),
    /// Number without unit, as written
    Number(String),
    /// Percentage, number part as written
    Percentage(String),
    /// Number with unit, number part as written
    Dimension(String, String),
    /// Whitespace run
    Whitespace,
    /// Comma ','
    Comma,
    /// Left paren '(' not opening a function
    LeftParen,
    /// Right paren ')'
    RightParen,
    /// Any other single character
    Delim(char),
    /// End of input
    Eof,
}

/// Value tokenizer
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Get the current source location
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.position)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let mut iter = self.input[self.position..].chars();
        iter.next();
        iter.next()
    }

    fn peek_third(&self) -> Option<char> {
        let mut iter = self.input[self.position..].chars();
        iter.next();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.position = pos + c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    fn consume_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CssResult<Token> {
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        match c {
            _ if c.is_whitespace() => {
                self.consume_whitespace();
                Ok(Token::Whitespace)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            '(' => {
                self.advance();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RightParen)
            }
            '"' | '\'' => self.consume_string(),
            '#' => {
                self.advance();
                Ok(Token::Hash(self.consume_ident_name()))
            }
            '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.consume_number(),
            '0'..='9' => self.consume_number(),
            '+' | '-' => {
                if self.starts_number() {
                    self.consume_number()
                } else if c == '-' && self.starts_identifier() {
                    self.consume_ident_like()
                } else {
                    self.advance();
                    Ok(Token::Delim(c))
                }
            }
            _ if is_ident_start(c) => self.consume_ident_like(),
            _ => {
                self.advance();
                Ok(Token::Delim(c))
            }
        }
    }

    fn starts_number(&self) -> bool {
        match self.peek_second() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_third().is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn starts_identifier(&self) -> bool {
        let mut chars = self.input[self.position..].chars();
        match chars.next() {
            Some('-') => match chars.next() {
                Some(c) if is_ident_start(c) => true,
                Some('-') => true,
                _ => false,
            },
            Some(c) if is_ident_start(c) => true,
            _ => false,
        }
    }

    fn consume_string(&mut self) -> CssResult<Token> {
        let start = self.location();
        let quote = match self.advance() {
            Some(q) => q,
            None => return Ok(Token::Eof),
        };
        let mut raw = String::new();

        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(Token::String { quote, raw }),
                Some('\\') => {
                    raw.push('\\');
                    if let Some(c) = self.advance() {
                        raw.push(c);
                    }
                }
                Some(c) => raw.push(c),
                None => {
                    return Err(CssError::UnterminatedString {
                        input: self.input.to_string(),
                        location: start,
                    });
                }
            }
        }
    }

    fn consume_ident_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                name.push(c);
                self.advance();
            } else if c == '\\' {
                name.push(c);
                self.advance();
                if let Some(escaped) = self.advance() {
                    name.push(escaped);
                }
            } else {
                break;
            }
        }
        name
    }

    fn consume_ident_like(&mut self) -> CssResult<Token> {
        let name = self.consume_ident_name();

        if self.peek() == Some('(') {
            self.advance();

            if name.eq_ignore_ascii_case("url") {
                let mut lookahead = self.input[self.position..].chars();
                let first = lookahead.find(|c| !c.is_whitespace());
                if !matches!(first, Some('"') | Some('\'')) {
                    return self.consume_url();
                }
            }

            return Ok(Token::Function(name));
        }

        Ok(Token::Ident(name))
    }

    fn consume_url(&mut self) -> CssResult<Token> {
        let start = self.location();
        let mut url = String::new();
        self.consume_whitespace();

        loop {
            match self.advance() {
                Some(')') => return Ok(Token::Url(url.trim_end().to_string())),
                Some('\\') => {
                    url.push('\\');
                    if let Some(c) = self.advance() {
                        url.push(c);
                    }
                }
                Some(c) => url.push(c),
                None => {
                    return Err(CssError::UnbalancedParens {
                        input: self.input.to_string(),
                        location: start,
                    });
                }
            }
        }
    }

    fn consume_number(&mut self) -> CssResult<Token> {
        let start = self.location();
        let mut num_str = String::new();

        if let Some(c) = self.peek() {
            if c == '+' || c == '-' {
                num_str.push(c);
                self.advance();
            }
        }

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                num_str.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            num_str.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    num_str.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        // Exponent, only when followed by digits (otherwise it is a unit like "em")
        if matches!(self.peek(), Some('e') | Some('E')) {
            let second = self.peek_second();
            let has_exponent = match second {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self.peek_third().is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if has_exponent {
                if let Some(e) = self.advance() {
                    num_str.push(e);
                }
                if matches!(self.peek(), Some('+') | Some('-')) {
                    if let Some(sign) = self.advance() {
                        num_str.push(sign);
                    }
                }
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        num_str.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        if num_str.parse::<f64>().is_err() {
            return Err(CssError::InvalidNumber {
                number: num_str,
                location: start,
            });
        }

        if self.peek() == Some('%') {
            self.advance();
            return Ok(Token::Percentage(num_str));
        }

        if self.peek().is_some_and(is_ident_start) {
            let unit = self.consume_ident_name();
            return Ok(Token::Dimension(num_str, unit));
        }

        Ok(Token::Number(num_str))
    }
}

/// Tokenize a whole value, checking that parentheses balance
pub fn tokenize(input: &str) -> CssResult<Vec<Token>> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    let mut depth = 0usize;

    loop {
        let location = tokenizer.location();
        let token = tokenizer.next_token()?;
        match token {
            Token::Eof => break,
            Token::Function(_) | Token::LeftParen => depth += 1,
            Token::RightParen => {
                if depth == 0 {
                    return Err(CssError::UnbalancedParens {
                        input: input.to_string(),
                        location,
                    });
                }
                depth -= 1;
            }
            _ => {}
        }
        tokens.push(token);
    }

    if depth != 0 {
        return Err(CssError::UnbalancedParens {
            input: input.to_string(),
            location: tokenizer.location(),
        });
    }

    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}
