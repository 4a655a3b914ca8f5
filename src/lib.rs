//! A tape machine for the eight instruction `> < + - . , [ ]` language where
//! the program and its data live on the same byte tape.

extern crate thiserror;

pub mod lexer;
pub mod machine;
pub mod opcode;

pub use machine::{fault::Fault, Exit, Machine, MIN_TAPE_SIZE};

/// Prints `Hello World!` followed by a newline, uses cells 0 to 4
pub const HELLO_WORLD: &str = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
