//! Error types for flow-tcl

/// Result type for flow-tcl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing or evaluating a legacy configuration script
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("line {line}: missing close-{what}")]
    Unterminated { line: usize, what: &'static str },

    #[error("line {line}: extra characters after close-{what}")]
    ExtraCharacters { line: usize, what: &'static str },

    #[error("line {line}: invalid command name \"{command}\"")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: wrong # args: should be \"{usage}\"")]
    WrongArgs { line: usize, usage: &'static str },

    #[error("line {line}: can't read \"{name}\": no such variable")]
    NoSuchVariable { line: usize, name: String },

    #[error("line {line}: invalid expression \"{expr}\"")]
    InvalidExpression { line: usize, expr: String },

    #[error("line {line}: expected boolean value but got \"{value}\"")]
    NotBoolean { line: usize, value: String },
}
