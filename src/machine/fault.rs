use thiserror::Error;

/// Everything that can stop a load, step or run
///
/// None of these are recovered internally, the machine is left exactly as it
/// was when the fault was raised.
#[derive(Error, Debug)]
pub enum Fault {
    #[error("MemoryPointerUnderflow: data pointer moved below 0")]
    MemoryPointerUnderflow,

    #[error("MemoryPointerOverflow: data pointer moved past the end of the tape")]
    MemoryPointerOverflow,

    #[error("ProgramPointerUnderflow: no matching `[` before the start of the tape")]
    ProgramPointerUnderflow,

    #[error("ProgramPointerOverflow: program counter moved past the end of the tape")]
    ProgramPointerOverflow,

    #[error("InvalidOperation: byte {byte:#04x} is not an instruction")]
    InvalidOperation { byte: u8 },

    #[error("InputExhausted: `,` executed after the input ended")]
    InputExhausted,

    #[error("IO Error")]
    Io(
        #[from]
        std::io::Error,
    ),
}
