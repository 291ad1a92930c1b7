use thiserror::Error;

use crate::structs::OpCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unrecognized opcode {byte:#04x} at byte {offset}")]
    UnrecognizedOpcode { byte: u8, offset: usize },
    #[error("instruction truncated, byte {offset} is past the end of input")]
    TruncatedInput { offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("unsupported operation `{}` at ip {address:#06x}", .op_code.mnemonic())]
    UnsupportedOperation { op_code: OpCode, address: u16 },
    #[error("destination of the instruction at ip {address:#06x} is not writable")]
    InvalidDestination { address: u16 },
    #[error("program of {len} bytes does not fit in a 64 KiB segment")]
    ProgramTooLarge { len: usize },
    #[error("step limit of {limit} reached")]
    StepLimitExceeded { limit: u64 },
}
