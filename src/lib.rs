//! 8086 instruction decoder and a simulator for a subset of it
//! (mov, add, sub, cmp and jne).

pub mod cursor;
pub mod decoder;
pub mod error;
pub mod format;
pub mod machine;
pub mod simulator;
pub mod structs;

pub use cursor::{ByteCursor, EndOfInput};
pub use decoder::{decode, disassemble};
pub use error::{DecodeError, SimulationError};
pub use machine::{Flags, MachineState};
pub use simulator::{execute, Execution, Mutation, Simulator, SimulatorConfig, Step, Transition};
pub use structs::*;
