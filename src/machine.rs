use std::collections::BTreeMap;

use crate::structs::{Register, RegisterPart};

/// Condition left behind by the last flag-writing instruction. Only one is
/// active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flags {
    #[default]
    None,
    Zero,
    Sign,
}

impl Flags {
    /// Zero wins over Sign; anything else clears both.
    pub fn from_value(value: u16) -> Flags {
        if value == 0 {
            Flags::Zero
        } else if value & 0x8000 != 0 {
            Flags::Sign
        } else {
            Flags::None
        }
    }
}

/// Registers, sparse word memory, flags and instruction pointer of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineState {
    registers: [u16; 8],
    // word addressed, entries appear on first write
    memory: BTreeMap<u16, u16>,
    flags: Flags,
    ip: u16,
}

impl MachineState {
    pub fn new() -> MachineState {
        MachineState::default()
    }

    /// Value of `reg`; 8-bit registers read their half of the word.
    pub fn get_register(&self, reg: Register) -> u16 {
        let word = self.registers[reg.index()];
        match reg.part() {
            RegisterPart::Word => word,
            RegisterPart::Low => word & 0x00FF,
            RegisterPart::High => word >> 8,
        }
    }

    pub fn set_register(&mut self, reg: Register, value: u16) {
        let slot = &mut self.registers[reg.index()];
        *slot = match reg.part() {
            RegisterPart::Word => value,
            RegisterPart::Low => (*slot & 0xFF00) | (value & 0x00FF),
            RegisterPart::High => (*slot & 0x00FF) | ((value & 0x00FF) << 8),
        };
    }

    pub fn get_memory(&self, address: u16) -> u16 {
        self.memory.get(&address).copied().unwrap_or(0)
    }

    pub fn set_memory(&mut self, address: u16, value: u16) {
        self.memory.insert(address, value);
    }

    pub fn get_flags(&self) -> Flags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    pub fn ip(&self) -> u16 {
        self.ip
    }

    pub fn advance_instruction_pointer(&mut self, delta: u16) {
        self.ip = self.ip.wrapping_add(delta);
    }

    pub fn jump_instruction_pointer(&mut self, delta: i16) {
        self.ip = self.ip.wrapping_add_signed(delta);
    }

    /// 16-bit registers holding something other than zero, in dump order.
    pub fn non_zero_registers(&self) -> impl Iterator<Item = (Register, u16)> + '_ {
        Register::WORD_REGISTERS
            .iter()
            .map(|reg| (*reg, self.get_register(*reg)))
            .filter(|(_, value)| *value != 0)
    }

    pub fn memory(&self) -> &BTreeMap<u16, u16> {
        &self.memory
    }
}
