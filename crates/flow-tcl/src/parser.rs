//! Splits a script into commands and words
//!
//! Words keep their quoting so the interpreter knows which ones undergo
//! substitution. Braced words are literal; quoted and bare words are not.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Word {
    Braced(String),
    Quoted(String),
    Bare(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Command {
    pub line: usize,
    pub words: Vec<Word>,
}

pub(crate) fn parse_script(source: &str, first_line: usize) -> Result<Vec<Command>> {
    Parser::new(source, first_line).parse()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Parser {
    fn new(source: &str, first_line: usize) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: first_line,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn parse(mut self) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                None => break,
                Some('#') => {
                    self.skip_comment();
                    continue;
                }
                Some(_) => {}
            }

            let line = self.line;
            let mut words = Vec::new();
            loop {
                self.skip_inline_space();
                match self.peek() {
                    None | Some('\n') | Some(';') => break,
                    Some(_) => words.push(self.parse_word()?),
                }
            }
            if !words.is_empty() {
                commands.push(Command { line, words });
            }
        }
        Ok(commands)
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ';' {
                self.bump();
            } else if c == '\\' && self.peek_at(1) == Some('\n') {
                self.bump();
                self.bump();
            } else {
                break;
            }
        }
    }

    fn skip_inline_space(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.bump();
            } else if c == '\\' && self.peek_at(1) == Some('\n') {
                self.bump();
                self.bump();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == '\n' {
                break;
            }
        }
    }

    fn at_word_end(&self) -> bool {
        match self.peek() {
            None => true,
            Some(c) => c == ' ' || c == '\t' || c == '\r' || c == '\n' || c == ';',
        }
    }

    fn parse_word(&mut self) -> Result<Word> {
        match self.peek() {
            Some('{') => self.parse_braced(),
            Some('"') => self.parse_quoted(),
            _ => Ok(self.parse_bare()),
        }
    }

    fn parse_braced(&mut self) -> Result<Word> {
        let line = self.line;
        self.bump();
        let mut depth = 1usize;
        let mut text = String::new();
        loop {
            let c = self.bump().ok_or(Error::Unterminated {
                line,
                what: "brace",
            })?;
            match c {
                '\\' => {
                    text.push(c);
                    if let Some(next) = self.bump() {
                        text.push(next);
                    }
                }
                '{' => {
                    depth += 1;
                    text.push(c);
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    text.push(c);
                }
                _ => text.push(c),
            }
        }
        if !self.at_word_end() {
            return Err(Error::ExtraCharacters {
                line: self.line,
                what: "brace",
            });
        }
        Ok(Word::Braced(text))
    }

    fn parse_quoted(&mut self) -> Result<Word> {
        let line = self.line;
        self.bump();
        let mut brackets = 0usize;
        let mut text = String::new();
        loop {
            let c = self.bump().ok_or(Error::Unterminated {
                line,
                what: "quote",
            })?;
            match c {
                '\\' => {
                    text.push(c);
                    if let Some(next) = self.bump() {
                        text.push(next);
                    }
                }
                '[' => {
                    brackets += 1;
                    text.push(c);
                }
                ']' => {
                    brackets = brackets.saturating_sub(1);
                    text.push(c);
                }
                '"' if brackets == 0 => break,
                _ => text.push(c),
            }
        }
        if !self.at_word_end() {
            return Err(Error::ExtraCharacters {
                line: self.line,
                what: "quote",
            });
        }
        Ok(Word::Quoted(text))
    }

    fn parse_bare(&mut self) -> Word {
        let mut brackets = 0usize;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if brackets == 0 && self.at_word_end() {
                break;
            }
            match c {
                '\\' if self.peek_at(1) == Some('\n') && brackets == 0 => break,
                '\\' => {
                    self.bump();
                    text.push(c);
                    if let Some(next) = self.bump() {
                        text.push(next);
                    }
                    continue;
                }
                '[' => brackets += 1,
                ']' => brackets = brackets.saturating_sub(1),
                _ => {}
            }
            self.bump();
            text.push(c);
        }
        Word::Bare(text)
    }
}
