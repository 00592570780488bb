//! Evaluation of parsed commands against the `::env` array

use std::collections::HashMap;

use crate::list::{quote_element, unescape};
use crate::parser::{Word, parse_script};
use crate::{Env, Error, Result};

pub(crate) struct Interp {
    env: Env,
    locals: HashMap<String, String>,
}

enum Target {
    Env(String),
    Local(String),
}

impl Interp {
    pub(crate) fn new(env: Env) -> Self {
        Self {
            env,
            locals: HashMap::new(),
        }
    }

    pub(crate) fn into_env(self) -> Env {
        self.env
    }

    /// Evaluate a script, returning the result of its last command.
    pub(crate) fn eval_script(&mut self, source: &str, first_line: usize) -> Result<String> {
        let mut result = String::new();
        for command in parse_script(source, first_line)? {
            let mut args = Vec::with_capacity(command.words.len());
            for word in &command.words {
                args.push(match word {
                    Word::Braced(text) => text.clone(),
                    Word::Quoted(text) | Word::Bare(text) => self.subst(text, command.line)?,
                });
            }
            result = self.exec(&args, command.line)?;
        }
        Ok(result)
    }

    fn exec(&mut self, args: &[String], line: usize) -> Result<String> {
        let Some(name) = args.first() else {
            return Ok(String::new());
        };
        match name.as_str() {
            "set" => match args {
                [_, var] => self.read(var, line),
                [_, var, value] => {
                    self.write(var, value.clone());
                    Ok(value.clone())
                }
                _ => Err(Error::WrongArgs {
                    line,
                    usage: "set varName ?newValue?",
                }),
            },
            "unset" => {
                let mut nocomplain = false;
                for var in &args[1..] {
                    if var == "-nocomplain" {
                        nocomplain = true;
                        continue;
                    }
                    if !self.remove(var) && !nocomplain {
                        return Err(Error::NoSuchVariable {
                            line,
                            name: var.clone(),
                        });
                    }
                }
                Ok(String::new())
            }
            "append" => {
                let Some(var) = args.get(1) else {
                    return Err(Error::WrongArgs {
                        line,
                        usage: "append varName ?value ...?",
                    });
                };
                let mut value = self.lookup(var).unwrap_or_default();
                for piece in &args[2..] {
                    value.push_str(piece);
                }
                self.write(var, value.clone());
                Ok(value)
            }
            "lappend" => {
                let Some(var) = args.get(1) else {
                    return Err(Error::WrongArgs {
                        line,
                        usage: "lappend varName ?value ...?",
                    });
                };
                let mut value = self.lookup(var).unwrap_or_default();
                for element in &args[2..] {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(&quote_element(element));
                }
                self.write(var, value.clone());
                Ok(value)
            }
            "list" => Ok(args[1..]
                .iter()
                .map(|element| quote_element(element))
                .collect::<Vec<_>>()
                .join(" ")),
            "info" => match args {
                [_, sub, var] if sub == "exists" => {
                    Ok(if self.lookup(var).is_some() { "1" } else { "0" }.to_string())
                }
                _ => Err(Error::WrongArgs {
                    line,
                    usage: "info exists varName",
                }),
            },
            "expr" => {
                if args.len() < 2 {
                    return Err(Error::WrongArgs {
                        line,
                        usage: "expr arg ?arg ...?",
                    });
                }
                self.eval_expr(&args[1..].join(" "), line)
            }
            "if" => self.exec_if(args, line),
            "puts" => {
                if let Some(message) = args.last().filter(|_| args.len() > 1) {
                    tracing::debug!(line, message = %message, "Configuration script output");
                }
                Ok(String::new())
            }
            _ => Err(Error::UnknownCommand {
                line,
                command: name.clone(),
            }),
        }
    }

    fn exec_if(&mut self, args: &[String], line: usize) -> Result<String> {
        const USAGE: &str = "if expr ?then? body ?elseif expr ?then? body ...? ?else? ?body?";
        let wrong = || Error::WrongArgs { line, usage: USAGE };

        let mut i = 1;
        loop {
            let condition = args.get(i).ok_or_else(wrong)?;
            i += 1;
            if args.get(i).is_some_and(|a| a == "then") {
                i += 1;
            }
            let body = args.get(i).ok_or_else(wrong)?;
            i += 1;

            let value = self.eval_expr(condition, line)?;
            if truthy(&value, line)? {
                return self.eval_script(body, line);
            }

            match args.get(i).map(String::as_str) {
                None => return Ok(String::new()),
                Some("elseif") => i += 1,
                Some("else") => {
                    let body = args.get(i + 1).ok_or_else(wrong)?;
                    return self.eval_script(body, line);
                }
                Some(_) => {
                    let body = &args[i];
                    return self.eval_script(body, line);
                }
            }
        }
    }

    fn target(var: &str) -> Target {
        let trimmed = var.trim_start_matches("::");
        if let Some(rest) = trimmed.strip_prefix("env(") {
            if let Some(key) = rest.strip_suffix(')') {
                return Target::Env(key.to_string());
            }
        }
        Target::Local(trimmed.to_string())
    }

    fn lookup(&self, var: &str) -> Option<String> {
        match Self::target(var) {
            Target::Env(key) => self.env.get(&key).cloned(),
            Target::Local(key) => self.locals.get(&key).cloned(),
        }
    }

    fn read(&self, var: &str, line: usize) -> Result<String> {
        self.lookup(var).ok_or_else(|| Error::NoSuchVariable {
            line,
            name: var.to_string(),
        })
    }

    fn write(&mut self, var: &str, value: String) {
        match Self::target(var) {
            Target::Env(key) => {
                self.env.insert(key, value);
            }
            Target::Local(key) => {
                self.locals.insert(key, value);
            }
        }
    }

    fn remove(&mut self, var: &str) -> bool {
        match Self::target(var) {
            Target::Env(key) => self.env.shift_remove(&key).is_some(),
            Target::Local(key) => self.locals.remove(&key).is_some(),
        }
    }

    /// Backslash, variable and command substitution.
    fn subst(&mut self, text: &str, line: usize) -> Result<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::new();
        let mut pos = 0;

        while pos < chars.len() {
            match chars[pos] {
                '\\' => {
                    pos += 1;
                    match chars.get(pos) {
                        Some('\n') => {
                            pos += 1;
                            while pos < chars.len() && (chars[pos] == ' ' || chars[pos] == '\t') {
                                pos += 1;
                            }
                            out.push(' ');
                        }
                        Some(&c) => {
                            out.push(unescape(c));
                            pos += 1;
                        }
                        None => out.push('\\'),
                    }
                }
                '$' => {
                    let (value, next) = self.subst_variable(&chars, pos, line)?;
                    out.push_str(&value);
                    pos = next;
                }
                '[' => {
                    let end = matching(&chars, pos, '[', ']').ok_or(Error::Unterminated {
                        line,
                        what: "bracket",
                    })?;
                    let inner: String = chars[pos + 1..end].iter().collect();
                    out.push_str(&self.eval_script(&inner, line)?);
                    pos = end + 1;
                }
                c => {
                    out.push(c);
                    pos += 1;
                }
            }
        }
        Ok(out)
    }

    /// Substitute the variable reference starting at `chars[start] == '$'`,
    /// returning the value and the position after the reference.
    fn subst_variable(&mut self, chars: &[char], start: usize, line: usize) -> Result<(String, usize)> {
        let mut pos = start + 1;

        if chars.get(pos) == Some(&'{') {
            let end = matching(chars, pos, '{', '}').ok_or(Error::Unterminated {
                line,
                what: "brace",
            })?;
            let name: String = chars[pos + 1..end].iter().collect();
            return Ok((self.read(&name, line)?, end + 1));
        }

        let name_start = pos;
        while pos < chars.len() {
            let c = chars[pos];
            if c.is_ascii_alphanumeric() || c == '_' {
                pos += 1;
            } else if c == ':' && chars.get(pos + 1) == Some(&':') {
                pos += 2;
            } else {
                break;
            }
        }
        if pos == name_start {
            return Ok(("$".to_string(), start + 1));
        }
        let mut name: String = chars[name_start..pos].iter().collect();

        if chars.get(pos) == Some(&'(') {
            let end = matching(chars, pos, '(', ')').ok_or(Error::Unterminated {
                line,
                what: "paren",
            })?;
            let raw_index: String = chars[pos + 1..end].iter().collect();
            let index = self.subst(&raw_index, line)?;
            name = format!("{name}({index})");
            pos = end + 1;
        }

        Ok((self.read(&name, line)?, pos))
    }

    pub(crate) fn eval_expr(&mut self, text: &str, line: usize) -> Result<String> {
        let tokens = self.tokenize_expr(text, line)?;
        let mut parser = ExprParser {
            tokens: &tokens,
            pos: 0,
            line,
            text,
        };
        let value = parser.or()?;
        if parser.pos != tokens.len() {
            return Err(parser.invalid());
        }
        Ok(value)
    }

    fn tokenize_expr(&mut self, text: &str, line: usize) -> Result<Vec<Tok>> {
        let chars: Vec<char> = text.chars().collect();
        let invalid = || Error::InvalidExpression {
            line,
            expr: text.to_string(),
        };
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < chars.len() {
            let c = chars[pos];
            let next = chars.get(pos + 1).copied();
            match c {
                c if c.is_whitespace() => pos += 1,
                '(' => {
                    tokens.push(Tok::LParen);
                    pos += 1;
                }
                ')' => {
                    tokens.push(Tok::RParen);
                    pos += 1;
                }
                '!' if next == Some('=') => {
                    tokens.push(Tok::Op("!="));
                    pos += 2;
                }
                '!' => {
                    tokens.push(Tok::Not);
                    pos += 1;
                }
                '=' if next == Some('=') => {
                    tokens.push(Tok::Op("=="));
                    pos += 2;
                }
                '&' if next == Some('&') => {
                    tokens.push(Tok::And);
                    pos += 2;
                }
                '|' if next == Some('|') => {
                    tokens.push(Tok::Or);
                    pos += 2;
                }
                '<' | '>' => {
                    let op = match (c, next) {
                        ('<', Some('=')) => "<=",
                        ('>', Some('=')) => ">=",
                        ('<', _) => "<",
                        _ => ">",
                    };
                    pos += op.len();
                    tokens.push(Tok::Op(op));
                }
                '$' => {
                    let (value, end) = self.subst_variable(&chars, pos, line)?;
                    tokens.push(Tok::Operand(value));
                    pos = end;
                }
                '[' => {
                    let end = matching(&chars, pos, '[', ']').ok_or_else(invalid)?;
                    let inner: String = chars[pos + 1..end].iter().collect();
                    tokens.push(Tok::Operand(self.eval_script(&inner, line)?));
                    pos = end + 1;
                }
                '"' => {
                    let mut end = pos + 1;
                    while end < chars.len() && chars[end] != '"' {
                        if chars[end] == '\\' {
                            end += 1;
                        }
                        end += 1;
                    }
                    if end >= chars.len() {
                        return Err(invalid());
                    }
                    let inner: String = chars[pos + 1..end].iter().collect();
                    tokens.push(Tok::Operand(self.subst(&inner, line)?));
                    pos = end + 1;
                }
                '{' => {
                    let end = matching(&chars, pos, '{', '}').ok_or_else(invalid)?;
                    tokens.push(Tok::Operand(chars[pos + 1..end].iter().collect()));
                    pos = end + 1;
                }
                _ => {
                    let start = pos;
                    while pos < chars.len()
                        && (chars[pos].is_ascii_alphanumeric() || matches!(chars[pos], '_' | '.' | '-' | '+'))
                    {
                        pos += 1;
                    }
                    if pos == start {
                        return Err(invalid());
                    }
                    let word: String = chars[start..pos].iter().collect();
                    tokens.push(match word.as_str() {
                        "eq" => Tok::Op("eq"),
                        "ne" => Tok::Op("ne"),
                        _ => Tok::Operand(word),
                    });
                }
            }
        }
        Ok(tokens)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Operand(String),
    Op(&'static str),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

struct ExprParser<'a> {
    tokens: &'a [Tok],
    pos: usize,
    line: usize,
    text: &'a str,
}

impl ExprParser<'_> {
    fn invalid(&self) -> Error {
        Error::InvalidExpression {
            line: self.line,
            expr: self.text.to_string(),
        }
    }

    fn bool_str(value: bool) -> String {
        if value { "1" } else { "0" }.to_string()
    }

    fn or(&mut self) -> Result<String> {
        let mut left = self.and()?;
        while self.tokens.get(self.pos) == Some(&Tok::Or) {
            self.pos += 1;
            let right = self.and()?;
            left = Self::bool_str(truthy(&left, self.line)? || truthy(&right, self.line)?);
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<String> {
        let mut left = self.comparison()?;
        while self.tokens.get(self.pos) == Some(&Tok::And) {
            self.pos += 1;
            let right = self.comparison()?;
            left = Self::bool_str(truthy(&left, self.line)? && truthy(&right, self.line)?);
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<String> {
        let left = self.unary()?;
        let Some(Tok::Op(op)) = self.tokens.get(self.pos) else {
            return Ok(left);
        };
        let op = *op;
        self.pos += 1;
        let right = self.unary()?;

        let numeric = left
            .trim()
            .parse::<f64>()
            .ok()
            .zip(right.trim().parse::<f64>().ok());
        let result = match (op, numeric) {
            ("eq", _) => left == right,
            ("ne", _) => left != right,
            ("==", Some((l, r))) => l == r,
            ("!=", Some((l, r))) => l != r,
            ("<", Some((l, r))) => l < r,
            ("<=", Some((l, r))) => l <= r,
            (">", Some((l, r))) => l > r,
            (">=", Some((l, r))) => l >= r,
            ("==", None) => left == right,
            ("!=", None) => left != right,
            ("<", None) => left < right,
            ("<=", None) => left <= right,
            (">", None) => left > right,
            (">=", None) => left >= right,
            _ => return Err(self.invalid()),
        };
        Ok(Self::bool_str(result))
    }

    fn unary(&mut self) -> Result<String> {
        match self.tokens.get(self.pos) {
            Some(Tok::Not) => {
                self.pos += 1;
                let value = self.unary()?;
                Ok(Self::bool_str(!truthy(&value, self.line)?))
            }
            Some(Tok::LParen) => {
                self.pos += 1;
                let value = self.or()?;
                if self.tokens.get(self.pos) != Some(&Tok::RParen) {
                    return Err(self.invalid());
                }
                self.pos += 1;
                Ok(value)
            }
            Some(Tok::Operand(value)) => {
                self.pos += 1;
                Ok(value.clone())
            }
            _ => Err(self.invalid()),
        }
    }
}

fn truthy(value: &str, line: usize) -> Result<bool> {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<f64>() {
        return Ok(number != 0.0);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err(Error::NotBoolean {
            line,
            value: value.to_string(),
        }),
    }
}

/// Index of the delimiter closing the one opened at `chars[start]`.
fn matching(chars: &[char], start: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = start;
    while pos < chars.len() {
        let c = chars[pos];
        if c == '\\' {
            pos += 2;
            continue;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(pos);
            }
        }
        pos += 1;
    }
    None
}
