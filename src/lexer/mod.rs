use std::fmt;

use crate::opcode::Opcode;

pub mod lexer;

#[derive(Debug, Clone, PartialEq)]
pub enum LexerTokenKind {
    /// One of the eight operation symbols
    Op(Opcode),

    /// A run of non-operation characters (whitespace is dropped before this)
    Comment(String),

    /// End of file: no more tokens left
    EOF,
}

/// A non-fatal note about source text that was skipped while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub col: usize,
    /// offset within the source in codepoints
    pub offset: usize,
    pub text: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: skipped non-operation text {:?}",
            self.line, self.col, self.text
        )
    }
}

/// The opcodes of a program in source order plus whatever was skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexedProgram {
    pub opcodes: Vec<Opcode>,
    pub diagnostics: Vec<Diagnostic>,
}
