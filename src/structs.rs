use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InstructionFlags: u8 {
        // w bit: operands are 16 bit
        const Wide = 0b0000_0001;
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
  Ax, Al, Ah,
  Bx, Bl, Bh,
  Cx, Cl, Ch,
  Dx, Dl, Dh,

  Sp,
  Bp,
  Si,
  Di,
}

/// Which part of a 16-bit register an operand names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterPart {
    Low,
    High,
    Word,
}

impl Register {
    pub const WORD_REGISTERS: [Register; 8] = [
        Register::Ax,
        Register::Bx,
        Register::Cx,
        Register::Dx,
        Register::Sp,
        Register::Bp,
        Register::Si,
        Register::Di,
    ];

    /// Slot of the containing 16-bit register in the register file.
    pub fn index(&self) -> usize {
        match self {
            Register::Ax | Register::Al | Register::Ah => 0,
            Register::Bx | Register::Bl | Register::Bh => 1,
            Register::Cx | Register::Cl | Register::Ch => 2,
            Register::Dx | Register::Dl | Register::Dh => 3,
            Register::Sp => 4,
            Register::Bp => 5,
            Register::Si => 6,
            Register::Di => 7,
        }
    }

    pub fn part(&self) -> RegisterPart {
        match self {
            Register::Al | Register::Bl | Register::Cl | Register::Dl => RegisterPart::Low,
            Register::Ah | Register::Bh | Register::Ch | Register::Dh => RegisterPart::High,
            _ => RegisterPart::Word,
        }
    }

    pub fn is_wide(&self) -> bool {
        self.part() == RegisterPart::Word
    }

    pub fn to_word(&self) -> Register {
        Register::WORD_REGISTERS[self.index()]
    }
}

/// `[base + index + displacement]`; both registers absent means a direct address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveAddress {
    pub base: Option<Register>,
    pub index: Option<Register>,
    pub displacement: i16,
}

impl EffectiveAddress {
    pub fn direct(address: u16) -> EffectiveAddress {
        EffectiveAddress {
            base: None,
            index: None,
            displacement: address as i16,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.base.is_none() && self.index.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Register(Register),
    Memory(EffectiveAddress),
    Immediate(i16),
    // relative to the end of the jump instruction
    JumpDisplacement(i8),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Mov,
    Add,
    Sub,
    Cmp,

    // jumps
    Je,
    Jl,
    Jle,
    Jb,
    Jbe,
    Jp,
    Jo,
    Js,
    Jne,
    Jnl,
    Jnle,
    Jnb,
    Jnbe,
    Jnp,
    Jno,
    Jns,
    Loop,
    Loopz,
    Loopnz,
    Jcxz,
}

impl OpCode {
    pub fn is_jump(&self) -> bool {
        use OpCode::*;
        !matches!(self, Mov | Add | Sub | Cmp)
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpCode::Add => "add",
            OpCode::Cmp => "cmp",
            OpCode::Mov => "mov",
            OpCode::Sub => "sub",

            OpCode::Je => "je",
            OpCode::Jl => "jl",
            OpCode::Jle => "jle",
            OpCode::Jb => "jb",
            OpCode::Jbe => "jbe",
            OpCode::Jp => "jp",
            OpCode::Jo => "jo",
            OpCode::Js => "js",
            OpCode::Jne => "jne",
            OpCode::Jnl => "jnl",
            OpCode::Jnle => "jnle",
            OpCode::Jnb => "jnb",
            OpCode::Jnbe => "jnbe",
            OpCode::Jnp => "jnp",
            OpCode::Jno => "jno",
            OpCode::Jns => "jns",
            OpCode::Loop => "loop",
            OpCode::Loopz => "loopz",
            OpCode::Loopnz => "loopnz",
            OpCode::Jcxz => "jcxz",
        }
    }
}

/// One decoded instruction. `operands[0]` is the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op_code: OpCode,
    pub flags: InstructionFlags,
    pub operands: [Operand; 2],
    pub size: u16,
}

impl Instruction {
    pub fn destination(&self) -> &Operand {
        &self.operands[0]
    }

    pub fn source(&self) -> &Operand {
        &self.operands[1]
    }

    pub fn is_wide(&self) -> bool {
        self.flags.contains(InstructionFlags::Wide)
    }
}
