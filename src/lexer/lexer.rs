use crate::opcode::Opcode;

use super::{Diagnostic, LexedProgram, LexerTokenKind};

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** Human Readable positions in file */
    pub cur_line: usize,
    pub cur_col: usize,

    /** 'raw' format / offset within the file (in terms of 'codepoints') */
    pub codepoint_offset: usize,

    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a str) -> Lexer<'a> {
        Lexer {
            cur_col: 1,
            cur_line: 1,

            codepoint_offset: 0,

            chars: chars.chars().peekable(),
        }
    }

    fn transform_to_type(&mut self, c: char) -> LexerTokenKind {
        if let Some(op) = Opcode::from_char(c) {
            return LexerTokenKind::Op(op);
        }

        // Simplify the comment stream down to strings, stopping at whitespace
        // so diagnostics point at each word rather than whole paragraphs
        let mut comment = String::from(c);
        while let Some(&next) = self.chars.peek() {
            if next.is_whitespace() || Opcode::from_char(next).is_some() {
                break;
            }
            self.consume_char();
            comment.push(next);
        }

        LexerTokenKind::Comment(comment)
    }

    fn consume_char(&mut self) -> Option<char> {
        match self.chars.next() {
            Some(c) => {
                self.cur_col += 1;
                if c == '\n' {
                    self.cur_line += 1;
                    self.cur_col = 1;
                }
                self.codepoint_offset += 1;
                Some(c)
            }
            None => None,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.consume_char();
        }
    }

    pub fn next_token(&mut self) -> LexerTokenKind {
        self.skip_whitespace();

        match self.consume_char() {
            Some(c) => self.transform_to_type(c),
            None => LexerTokenKind::EOF,
        }
    }

    /// Lex the whole source, comments become diagnostics
    pub fn collect_program(&mut self) -> LexedProgram {
        let mut program = LexedProgram::default();
        loop {
            // position has to be captured before the token is consumed
            self.skip_whitespace();
            let (line, col, offset) = (self.cur_line, self.cur_col, self.codepoint_offset);

            match self.next_token() {
                LexerTokenKind::EOF => break program,
                LexerTokenKind::Op(op) => program.opcodes.push(op),
                LexerTokenKind::Comment(text) => program.diagnostics.push(Diagnostic {
                    line,
                    col,
                    offset,
                    text,
                }),
            }
        }
    }

    pub fn collect(&mut self) -> Vec<LexerTokenKind> {
        let mut v = vec![];
        loop {
            match self.next_token() {
                LexerTokenKind::EOF => break v,
                x => v.push(x),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_are_collected_in_order() {
        let program = Lexer::new("+>-<.,[]").collect_program();
        assert_eq!(
            program.opcodes,
            vec![
                Opcode::DerefIncrement,
                Opcode::Increment,
                Opcode::DerefDecrement,
                Opcode::Decrement,
                Opcode::Write,
                Opcode::Read,
                Opcode::JumpStart,
                Opcode::JumpEnd,
            ]
        );
        assert!(program.diagnostics.is_empty());
    }

    #[test]
    fn whitespace_is_skipped_silently() {
        let program = Lexer::new("  +\n\t+  ").collect_program();
        assert_eq!(program.opcodes.len(), 2);
        assert!(program.diagnostics.is_empty());
    }

    #[test]
    fn comments_become_diagnostics_with_positions() {
        let program = Lexer::new("+ add one\n>x<").collect_program();
        assert_eq!(
            program.opcodes,
            vec![Opcode::DerefIncrement, Opcode::Increment, Opcode::Decrement]
        );

        let texts: Vec<_> = program.diagnostics.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["add", "one", "x"]);

        let x = &program.diagnostics[2];
        assert_eq!((x.line, x.col, x.offset), (2, 2, 11));
    }

    #[test]
    fn unbalanced_brackets_are_not_a_lexer_concern() {
        let program = Lexer::new("]]][").collect_program();
        assert_eq!(program.opcodes.len(), 4);
        assert!(program.diagnostics.is_empty());
    }

    #[test]
    fn collect_keeps_comment_tokens() {
        let tokens = Lexer::new("a+").collect();
        assert_eq!(
            tokens,
            vec![
                LexerTokenKind::Comment("a".to_string()),
                LexerTokenKind::Op(Opcode::DerefIncrement),
            ]
        );
    }
}
