use std::{
    io::{self, BufRead, ErrorKind, Read},
    num::IntErrorKind,
};

/// Where `,` gets its values from
pub trait InputSource {
    /// The next raw value, `None` once the stream has ended
    fn read_value(&mut self) -> io::Result<Option<i64>>;
}

/// What `,` does once the input has run dry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EofPolicy {
    /// Store 0 in the current cell
    #[default]
    Zero,
    /// Leave the current cell as it was
    Unchanged,
    /// Raise `Fault::InputExhausted`
    Fault,
}

/// Every byte of the reader is one value
pub struct ByteInput<R> {
    reader: R,
}

impl<R: Read> ByteInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> InputSource for ByteInput<R> {
    fn read_value(&mut self) -> io::Result<Option<i64>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0] as i64)),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Whitespace separated decimal integers, i.e. `72 105 -3 900`
pub struct DecimalInput<R> {
    reader: R,
    pending: Vec<String>,
}

impl<R: BufRead> DecimalInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: vec![],
        }
    }
}

impl<R: BufRead> InputSource for DecimalInput<R> {
    fn read_value(&mut self) -> io::Result<Option<i64>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            // stored reversed so pop yields them in order
            self.pending = line.split_whitespace().rev().map(str::to_owned).collect();
        }

        match self.pending.pop() {
            Some(word) => match word.parse::<i64>() {
                Ok(value) => Ok(Some(value)),
                // too big for an i64 still clamps into a cell
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
                Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
                Err(e) => Err(io::Error::new(
                    ErrorKind::InvalidData,
                    format!("bad input value {word:?}: {e}"),
                )),
            },
            None => Ok(None),
        }
    }
}

/// Clamp a raw input value into a cell
pub fn clamp_to_cell(value: i64) -> u8 {
    value.clamp(0, u8::MAX as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_input_yields_each_byte_then_none() {
        let mut input = ByteInput::new(&b"Hi"[..]);
        assert_eq!(input.read_value().unwrap(), Some(b'H' as i64));
        assert_eq!(input.read_value().unwrap(), Some(b'i' as i64));
        assert_eq!(input.read_value().unwrap(), None);
    }

    #[test]
    fn decimal_input_spans_lines() {
        let mut input = DecimalInput::new(&b"1 2\n\n  -7\n300"[..]);
        let values: Vec<_> = std::iter::from_fn(|| input.read_value().unwrap()).collect();
        assert_eq!(values, vec![1, 2, -7, 300]);
    }

    #[test]
    fn decimal_input_rejects_garbage() {
        let mut input = DecimalInput::new(&b"12 abc"[..]);
        assert_eq!(input.read_value().unwrap(), Some(12));
        let err = input.read_value().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn decimal_input_saturates_huge_values() {
        let mut input = DecimalInput::new(&b"99999999999999999999 -99999999999999999999"[..]);
        let high = input.read_value().unwrap().unwrap();
        let low = input.read_value().unwrap().unwrap();
        assert_eq!(high, i64::MAX);
        assert_eq!(low, i64::MIN);
        assert_eq!((clamp_to_cell(high), clamp_to_cell(low)), (255, 0));
    }

    #[test]
    fn values_clamp_into_a_byte() {
        assert_eq!(clamp_to_cell(-5), 0);
        assert_eq!(clamp_to_cell(65), 65);
        assert_eq!(clamp_to_cell(1000), 255);
    }
}
