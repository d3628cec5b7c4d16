//! Lexer for the Jack programming language.
//!
//! This module turns raw source text into a flat stream of tokens. Comments
//! are consumed here, not in a preprocessing pass, so comment markers inside
//! string constants stay part of the string.
mod token;
mod tokens;

pub use token::*;
pub use tokens::*;

use once_cell::sync::Lazy;
use std::{collections::HashMap, error::Error, fmt::Display, iter::Peekable, str::Chars};

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    use Keyword::*;

    HashMap::from([
        ("class", Class),
        ("constructor", Constructor),
        ("function", Function),
        ("method", Method),
        ("field", Field),
        ("static", Static),
        ("var", Var),
        ("int", Int),
        ("char", Char),
        ("boolean", Boolean),
        ("void", Void),
        ("true", True),
        ("false", False),
        ("null", Null),
        ("this", This),
        ("let", Let),
        ("do", Do),
        ("if", If),
        ("else", Else),
        ("while", While),
        ("return", Return),
    ])
});

const SYMBOLS: &str = "{}()[].,;+-*/&|<>=~";

/// Largest value an integer constant may take.
const MAX_INT: u32 = 32767;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError(String);

pub type LexResult<T> = Result<T, LexError>;

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Error for LexError {}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    tokens: Vec<Token>,
    iterator: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iterator = input.chars().peekable();

        Self {
            tokens: vec![],
            iterator,
            line: 1,
            col: 1,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.iterator.peek()
    }

    /// Consume the next character, keeping line and column in sync.
    fn bump(&mut self) -> Option<char> {
        let next = self.iterator.next();

        match next {
            Some('\n') => {
                self.col = 1;
                self.line += 1;
            }
            Some(_) => self.col += 1,
            None => {}
        }

        next
    }

    fn next_if(&mut self, func: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek().copied() {
            Some(next) if func(next) => self.bump(),
            _ => None,
        }
    }

    fn eat_whitespace(&mut self) {
        while self.next_if(|item| item.is_whitespace()).is_some() {}
    }

    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        loop {
            self.eat_whitespace();

            let Some(&next) = self.peek() else {
                return Ok(self.tokens);
            };

            match next {
                '/' => self.lex_slash()?,
                '"' => self.lex_string()?,
                '0'..='9' => self.lex_numeric()?,
                'a'..='z' | 'A'..='Z' | '_' => self.lex_alphanumeric(),
                c if SYMBOLS.contains(c) => {
                    let position = (self.line, self.col);
                    self.bump();
                    self.tokens.push(Token::Symbol { value: c, position });
                }
                c => {
                    return Err(LexError(format!(
                        "unexpected character '{c}' ({}:{})",
                        self.line, self.col
                    )));
                }
            };
        }
    }

    /// A `/` opens a line comment, a block comment, or is the division
    /// symbol, depending on the character after it.
    fn lex_slash(&mut self) -> LexResult<()> {
        let position = (self.line, self.col);
        self.bump();

        match self.peek() {
            Some('/') => {
                while let Some(next) = self.bump() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            Some('*') => {
                self.bump();
                loop {
                    let Some(next) = self.bump() else {
                        return Err(LexError(format!(
                            "unterminated block comment ({}:{})",
                            position.0, position.1
                        )));
                    };

                    if next == '*' && self.peek() == Some(&'/') {
                        self.bump();
                        break;
                    }
                }
            }
            _ => self.tokens.push(Token::Symbol {
                value: '/',
                position,
            }),
        }

        Ok(())
    }

    fn lex_string(&mut self) -> LexResult<()> {
        let position = (self.line, self.col);
        self.bump();

        let mut value = String::new();

        loop {
            match self.bump() {
                Some('"') => break,
                Some('\n') | None => {
                    return Err(LexError(format!(
                        "unterminated string constant ({}:{})",
                        position.0, position.1
                    )));
                }
                Some(next) => value.push(next),
            }
        }

        self.tokens.push(Token::StrConst { value, position });

        Ok(())
    }

    fn lex_numeric(&mut self) -> LexResult<()> {
        let mut stack = vec![];

        let position = (self.line, self.col);

        while let Some(next) = self.next_if(|item| item.is_ascii_digit()) {
            stack.push(next);
        }

        let read = stack.iter().collect::<String>();

        let value = read
            .parse::<u32>()
            .ok()
            .filter(|value| *value <= MAX_INT)
            .ok_or_else(|| {
                LexError(format!(
                    "integer constant '{read}' out of range ({}:{})",
                    position.0, position.1
                ))
            })?;

        self.tokens.push(Token::IntConst {
            value: value as u16,
            position,
        });

        Ok(())
    }

    fn lex_alphanumeric(&mut self) {
        let mut stack = vec![];

        let position = (self.line, self.col);

        while let Some(next) = self.next_if(|item| item.is_ascii_alphanumeric() || item == '_') {
            stack.push(next);
        }

        let read = stack.iter().collect::<String>();

        if let Some(&keyword) = KEYWORDS.get(read.as_str()) {
            self.tokens.push(Token::Keyword { keyword, position });
        } else {
            self.tokens.push(Token::Identifier {
                value: read,
                position,
            });
        }
    }
}
