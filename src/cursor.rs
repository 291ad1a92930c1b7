use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("end of input at byte {position}")]
pub struct EndOfInput {
    pub position: usize,
}

impl From<EndOfInput> for DecodeError {
    fn from(from: EndOfInput) -> DecodeError {
        DecodeError::TruncatedInput {
            offset: from.position,
        }
    }
}

/// Read position over an immutable instruction buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor {
            buffer,
            position: 0,
        }
    }

    /// Starts at `position`, clamped to the buffer length.
    pub fn at(buffer: &'a [u8], position: usize) -> ByteCursor<'a> {
        ByteCursor {
            buffer,
            position: position.min(buffer.len()),
        }
    }

    pub fn peek(&self) -> Result<u8, EndOfInput> {
        self.buffer
            .get(self.position)
            .copied()
            .ok_or(EndOfInput {
                position: self.position,
            })
    }

    pub fn next(&mut self) -> Result<u8, EndOfInput> {
        let byte = self.peek()?;
        self.position += 1;
        Ok(byte)
    }

    // low byte first
    pub fn next_word(&mut self) -> Result<u16, EndOfInput> {
        let low = self.next()?;
        let high = self.next()?;
        Ok(u16::from_le_bytes([low, high]))
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
