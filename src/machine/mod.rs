pub mod dump;
pub mod fault;
pub mod io;

use std::{
    collections::BTreeSet,
    io::{Stdin, Stdout, Write},
};

use tracing::{debug, trace};

use crate::{
    lexer::{lexer::Lexer, Diagnostic, LexedProgram},
    opcode::{Opcode, END_OF_PROGRAM},
};

use self::{
    dump::Dump,
    fault::Fault,
    io::{clamp_to_cell, ByteInput, EofPolicy, InputSource},
};

/// Smaller requested tapes are silently raised to this
pub const MIN_TAPE_SIZE: usize = 30_000;

const JUMP_START: u8 = Opcode::JumpStart as u8;
const JUMP_END: u8 = Opcode::JumpEnd as u8;

/// Why a bounded run returned without faulting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The end of program marker was reached
    Halted,
    /// The step budget ran out first, the machine is still `running`
    StepLimit,
}

/// A tape machine where program and data share one address space
///
/// Pointers are signed so a move past either end can be observed after the
/// fault it raises.
pub struct Machine<I = ByteInput<Stdin>, O = Stdout> {
    /// Our statically allocated tape, code and data alike
    tape: Vec<u8>,

    /// Cells holding an end of program mark, kept off the tape so no cell
    /// value a program can produce halts it
    end_marks: BTreeSet<usize>,

    data_pointer: isize,
    program_counter: isize,
    running: bool,

    /// Instructions executed since the last run started
    steps: u64,

    eof_policy: EofPolicy,
    input: I,
    output: O,
}

impl Machine {
    /// A machine wired to the process' stdin and stdout
    pub fn new(requested_size: usize) -> Self {
        Self::with_io(
            requested_size,
            ByteInput::new(std::io::stdin()),
            std::io::stdout(),
        )
    }
}

impl<I: InputSource, O: Write> Machine<I, O> {
    pub fn with_io(requested_size: usize, input: I, output: O) -> Self {
        Self {
            tape: vec![0; requested_size.max(MIN_TAPE_SIZE)],
            end_marks: BTreeSet::new(),
            data_pointer: 0,
            program_counter: 0,
            running: false,
            steps: 0,
            eof_policy: EofPolicy::default(),
            input,
            output,
        }
    }

    pub fn with_eof_policy(mut self, eof_policy: EofPolicy) -> Self {
        self.eof_policy = eof_policy;
        self
    }

    pub fn reset(&mut self) {
        self.tape.fill(0);
        self.end_marks.clear();
        self.data_pointer = 0;
        self.program_counter = 0;
        self.running = false;
        self.steps = 0;
    }

    /// Write the operations in `source` starting at `load_address`, followed
    /// by the end of program marker
    ///
    /// Everything that isn't an operation is skipped and handed back as a
    /// diagnostic. The whole range is checked before anything is written so a
    /// failed load leaves the tape untouched.
    pub fn load(&mut self, source: &str, load_address: isize) -> Result<Vec<Diagnostic>, Fault> {
        let LexedProgram {
            opcodes,
            diagnostics,
        } = Lexer::new(source).collect_program();

        let start = self.tape_index(load_address)?;
        let end = self.tape_index(load_address.saturating_add(opcodes.len() as isize))?;

        for (cell, op) in (start..end).zip(&opcodes) {
            self.store(cell, op.byte());
        }
        self.tape[end] = END_OF_PROGRAM;
        self.end_marks.insert(end);

        for diagnostic in diagnostics.iter() {
            debug!(%diagnostic, "skipped while loading");
        }
        debug!(
            load_address,
            instructions = opcodes.len(),
            skipped = diagnostics.len(),
            "loaded program"
        );

        Ok(diagnostics)
    }

    /// Fetch, decode and execute the instruction under the program counter
    pub fn step(&mut self) -> Result<(), Fault> {
        let pc = self.program_index()?;
        let byte = self.tape[pc];

        if self.end_marks.contains(&pc) {
            self.running = false;
            self.output.flush()?;
        } else {
            match Opcode::from_byte(byte) {
                Some(op) => {
                    trace!(pc, dp = self.data_pointer, op = %op.symbol(), "step");
                    self.execute(op, pc)?;
                }
                None => return Err(Fault::InvalidOperation { byte }),
            }
        }

        // jumps land on the matching bracket so this moves past it
        self.program_counter += 1;
        self.steps += 1;
        Ok(())
    }

    /// Run from `start_address` until the end of program marker
    pub fn run(&mut self, start_address: isize) -> Result<(), Fault> {
        self.start(start_address);
        let result = self.drive(None);
        self.finish(result).map(|_| ())
    }

    /// Like `run` but gives up after `max_steps` instructions
    pub fn run_bounded(&mut self, start_address: isize, max_steps: u64) -> Result<Exit, Fault> {
        self.start(start_address);
        let result = self.drive(Some(max_steps));
        self.finish(result)
    }

    pub fn peek(&self, index: isize) -> Result<u8, Fault> {
        Ok(self.tape[self.tape_index(index)?])
    }

    pub fn poke(&mut self, index: isize, value: u8) -> Result<(), Fault> {
        let index = self.tape_index(index)?;
        self.store(index, value);
        Ok(())
    }

    /// Whether the cell at `index` halts the machine when executed
    pub fn is_end_of_program(&self, index: isize) -> bool {
        usize::try_from(index).is_ok_and(|index| self.end_marks.contains(&index))
    }

    pub fn dump(&self) -> Dump<'_> {
        Dump {
            program_counter: self.program_counter,
            data_pointer: self.data_pointer,
            tape: &self.tape,
        }
    }

    pub fn size(&self) -> usize {
        self.tape.len()
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn data_pointer(&self) -> isize {
        self.data_pointer
    }

    pub fn program_counter(&self) -> isize {
        self.program_counter
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }

    fn start(&mut self, start_address: isize) {
        self.running = true;
        self.program_counter = start_address;
        self.steps = 0;
        debug!(start_address, "running");
    }

    fn drive(&mut self, max_steps: Option<u64>) -> Result<Exit, Fault> {
        while self.running {
            if max_steps.is_some_and(|max| self.steps >= max) {
                return Ok(Exit::StepLimit);
            }
            self.step()?;
        }
        Ok(Exit::Halted)
    }

    fn finish(&mut self, result: Result<Exit, Fault>) -> Result<Exit, Fault> {
        // a fault takes priority over a failed flush
        let flushed = self.output.flush();
        match &result {
            Ok(exit) => debug!(?exit, steps = self.steps, "stopped"),
            Err(fault) => debug!(
                %fault,
                pc = self.program_counter,
                dp = self.data_pointer,
                steps = self.steps,
                "faulted"
            ),
        }
        let exit = result?;
        flushed?;
        Ok(exit)
    }

    fn execute(&mut self, op: Opcode, pc: usize) -> Result<(), Fault> {
        match op {
            // the pointer moves first and is validated after
            Opcode::Increment => {
                self.data_pointer += 1;
                self.current_cell()?;
            }
            Opcode::Decrement => {
                self.data_pointer -= 1;
                self.current_cell()?;
            }
            Opcode::DerefIncrement => {
                let cell = self.current_cell()?;
                self.store(cell, self.tape[cell].saturating_add(1));
            }
            Opcode::DerefDecrement => {
                let cell = self.current_cell()?;
                self.store(cell, self.tape[cell].saturating_sub(1));
            }
            Opcode::Write => {
                let cell = self.current_cell()?;
                self.output.write_all(&[self.tape[cell]])?;
            }
            Opcode::Read => {
                let cell = self.current_cell()?;
                match self.input.read_value()? {
                    Some(value) => self.store(cell, clamp_to_cell(value)),
                    None => match self.eof_policy {
                        EofPolicy::Zero => self.store(cell, 0),
                        EofPolicy::Unchanged => {}
                        EofPolicy::Fault => return Err(Fault::InputExhausted),
                    },
                }
            }
            Opcode::JumpStart => {
                let cell = self.current_cell()?;
                if self.tape[cell] == 0 {
                    self.program_counter = self.matching_end(pc)? as isize;
                }
            }
            Opcode::JumpEnd => {
                let cell = self.current_cell()?;
                if self.tape[cell] != 0 {
                    self.program_counter = self.matching_start(pc)? as isize;
                }
            }
        }
        Ok(())
    }

    /// Scan forwards over whatever is on the tape right now for the `]`
    /// closing the `[` at `from`
    fn matching_end(&self, from: usize) -> Result<usize, Fault> {
        let mut unbalance = 1usize;
        let mut i = from;
        while unbalance > 0 {
            i += 1;
            match self.tape.get(i) {
                None => return Err(Fault::ProgramPointerOverflow),
                Some(&JUMP_END) => unbalance -= 1,
                Some(&JUMP_START) => unbalance += 1,
                Some(_) => {}
            }
        }

        // the advance after the jump would leave the tape
        if i + 1 >= self.tape.len() {
            return Err(Fault::ProgramPointerOverflow);
        }
        Ok(i)
    }

    /// Scan backwards for the `[` opening the `]` at `from`
    fn matching_start(&self, from: usize) -> Result<usize, Fault> {
        let mut unbalance = 1usize;
        let mut i = from;
        while unbalance > 0 {
            i = i.checked_sub(1).ok_or(Fault::ProgramPointerUnderflow)?;
            match self.tape[i] {
                JUMP_END => unbalance += 1,
                JUMP_START => unbalance -= 1,
                _ => {}
            }
        }
        // i < from, so landing here can never push the advance off the tape
        Ok(i)
    }

    /// Every write goes through here, overwriting a cell removes its end mark
    fn store(&mut self, index: usize, value: u8) {
        self.tape[index] = value;
        self.end_marks.remove(&index);
    }

    fn current_cell(&self) -> Result<usize, Fault> {
        self.tape_index(self.data_pointer)
    }

    fn tape_index(&self, index: isize) -> Result<usize, Fault> {
        if index < 0 {
            Err(Fault::MemoryPointerUnderflow)
        } else if index as usize >= self.tape.len() {
            Err(Fault::MemoryPointerOverflow)
        } else {
            Ok(index as usize)
        }
    }

    fn program_index(&self) -> Result<usize, Fault> {
        if self.program_counter < 0 {
            Err(Fault::ProgramPointerUnderflow)
        } else if self.program_counter as usize >= self.tape.len() {
            Err(Fault::ProgramPointerOverflow)
        } else {
            Ok(self.program_counter as usize)
        }
    }
}
