use std::fmt;

const ROW_WIDTH: usize = 16;

/// Human readable snapshot of the registers and the whole tape
///
/// Rows are printed as hex, a run of identical all-zero rows is folded into a
/// single `*` line the same way `hexdump` does it.
pub struct Dump<'a> {
    pub(super) program_counter: isize,
    pub(super) data_pointer: isize,
    pub(super) tape: &'a [u8],
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PC: {}", self.program_counter)?;
        writeln!(f, "Data address: {}", self.data_pointer)?;

        let mut folded = false;
        for (row, cells) in self.tape.chunks(ROW_WIDTH).enumerate() {
            let zero = cells.iter().all(|&c| c == 0);
            if zero && row > 0 && self.tape[(row - 1) * ROW_WIDTH..row * ROW_WIDTH].iter().all(|&c| c == 0) {
                if !folded {
                    writeln!(f, "*")?;
                    folded = true;
                }
                continue;
            }
            folded = false;

            write!(f, "{:06x}:", row * ROW_WIDTH)?;
            for cell in cells {
                write!(f, " {cell:02x}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
