/// Written to the cell after the last loaded instruction so a dump shows where
/// the program ends. The byte alone never halts, the machine keeps the end of
/// program marks beside the tape.
pub const END_OF_PROGRAM: u8 = 0xFF;

/// The eight instructions, stored on the tape as their source symbol
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `>`: Increment the `data pointer` by one
    Increment = b'>',
    /// `<`: Decrement the `data pointer` by one
    Decrement = b'<',

    /// `+`: Increment the byte at the `data pointer` by one (saturating)
    DerefIncrement = b'+',
    /// `-`: Decrement the byte at the `data pointer` by one (saturating)
    DerefDecrement = b'-',

    /// `.`: Write the byte at the `data pointer` to the output
    Write = b'.',
    /// `,`: Read the next value from the input into the `data pointer`
    Read = b',',

    /// `[`: If the byte at the `data pointer` is zero jump past the matching `]`
    JumpStart = b'[',
    /// `]`: If the byte at the `data pointer` is non-zero jump back into the matching `[`
    JumpEnd = b']',
}

impl Opcode {
    pub const ALL: [Opcode; 8] = [
        Opcode::Increment,
        Opcode::Decrement,
        Opcode::DerefIncrement,
        Opcode::DerefDecrement,
        Opcode::Write,
        Opcode::Read,
        Opcode::JumpStart,
        Opcode::JumpEnd,
    ];

    pub fn from_char(c: char) -> Option<Opcode> {
        match c {
            '>' => Some(Opcode::Increment),
            '<' => Some(Opcode::Decrement),
            '+' => Some(Opcode::DerefIncrement),
            '-' => Some(Opcode::DerefDecrement),
            '.' => Some(Opcode::Write),
            ',' => Some(Opcode::Read),
            '[' => Some(Opcode::JumpStart),
            ']' => Some(Opcode::JumpEnd),
            _ => None,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Opcode> {
        // every opcode is ascii so this can't misfire on multibyte chars
        Self::from_char(byte as char)
    }

    pub fn byte(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> char {
        self as u8 as char
    }
}
