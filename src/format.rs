use std::fmt::Write;

use crate::{
    machine::{Flags, MachineState},
    simulator::{Mutation, Step},
    structs::*,
};

pub trait Formattable {
    fn format(&self) -> String;
}

impl Formattable for Register {
    fn format(&self) -> String {
        match self {
            Register::Ax => "ax",
            Register::Ah => "ah",
            Register::Al => "al",

            Register::Bx => "bx",
            Register::Bh => "bh",
            Register::Bl => "bl",

            Register::Cx => "cx",
            Register::Cl => "cl",
            Register::Ch => "ch",

            Register::Dx => "dx",
            Register::Dl => "dl",
            Register::Dh => "dh",

            Register::Sp => "sp",
            Register::Bp => "bp",
            Register::Si => "si",
            Register::Di => "di",
        }
        .to_string()
    }
}

impl Formattable for OpCode {
    fn format(&self) -> String {
        self.mnemonic().to_string()
    }
}

impl Formattable for EffectiveAddress {
    fn format(&self) -> String {
        if self.is_direct() {
            return format!("[{}]", self.displacement as u16);
        }

        let mut res = String::from("[");
        if let Some(base) = self.base {
            res.push_str(&base.format());
        }
        if let Some(index) = self.index {
            res.push_str(" + ");
            res.push_str(&index.format());
        }
        // a zero displacement is still decoded, it just isn't shown
        match self.displacement {
            0 => {}
            displacement if displacement > 0 => {
                write!(res, " + {}", displacement).expect("write is ok")
            }
            displacement => {
                write!(res, " - {}", displacement.unsigned_abs()).expect("write is ok")
            }
        }
        res.push(']');

        res
    }
}

impl Formattable for Operand {
    fn format(&self) -> String {
        match self {
            Self::Register(reg) => reg.format(),
            Self::Memory(address) => address.format(),
            Self::Immediate(immediate) => immediate.to_string(),
            Self::JumpDisplacement(displacement) => format!("{:+}", displacement),
            Self::None => "".to_string(),
        }
    }
}

impl Formattable for Instruction {
    fn format(&self) -> String {
        if self.op_code.is_jump() {
            // nasm wants the target relative to the start of the jump
            let relative = match self.destination() {
                Operand::JumpDisplacement(displacement) => {
                    i32::from(*displacement) + i32::from(self.size)
                }
                _ => 0,
            };
            return format!("{} ${:+}", self.op_code.format(), relative);
        }

        let size_prefix = match (self.destination(), self.source()) {
            (Operand::Memory(_), Operand::Immediate(_)) if self.is_wide() => "word ",
            (Operand::Memory(_), Operand::Immediate(_)) => "byte ",
            _ => "",
        };

        format!(
            "{} {}{}, {}",
            self.op_code.format(),
            size_prefix,
            self.destination().format(),
            self.source().format()
        )
    }
}

impl Formattable for Flags {
    fn format(&self) -> String {
        match self {
            Flags::None => "",
            Flags::Zero => "Z",
            Flags::Sign => "S",
        }
        .to_string()
    }
}

/// nasm compatible listing.
pub fn format_listing(instructions: &[Instruction]) -> String {
    let mut res = String::from("bits 16\n");
    for instruction in instructions {
        res.push('\n');
        res.push_str(&instruction.format());
    }
    res
}

pub fn format_step(step: &Step) -> String {
    let mut res = format!("{} ;", step.instruction.format());

    match step.mutation {
        Some(Mutation::Register { register, change }) => write!(
            res,
            " {}:{:#x} -> {:#x}",
            register.format(),
            change.before,
            change.after
        )
        .expect("write is ok"),
        Some(Mutation::Memory { address, change }) => write!(
            res,
            " [{:#06x}]:{:#x} -> {:#x}",
            address, change.before, change.after
        )
        .expect("write is ok"),
        None => {}
    }

    write!(res, " ip:{:#x} -> {:#x}", step.ip.before, step.ip.after).expect("write is ok");

    if let Some(flags) = step.flags.filter(|flags| flags.is_change()) {
        write!(
            res,
            " ; Flags:{}->{}",
            flags.before.format(),
            flags.after.format()
        )
        .expect("write is ok");
    }

    res
}

/// Non-zero registers, the instruction pointer and the flag line, empty when
/// no flag is active.
pub fn format_final_state(state: &MachineState) -> String {
    let mut res = String::from("Final registers:");

    for (reg, value) in state.non_zero_registers() {
        write!(res, "\n    {}: {:#06x} ({})", reg.format(), value, value).expect("write is ok");
    }
    write!(res, "\n    ip: {:#06x} ({})", state.ip(), state.ip()).expect("write is ok");

    res.push_str("\nFlags:");
    if state.get_flags() != Flags::None {
        write!(res, " {}", state.get_flags().format()).expect("write is ok");
    }

    res
}

/// Every step on its own line, then the final state.
pub fn format_trace(steps: &[Step], state: &MachineState) -> String {
    let mut res = String::new();
    for step in steps {
        res.push_str(&format_step(step));
        res.push('\n');
    }
    res.push('\n');
    res.push_str(&format_final_state(state));
    res
}
