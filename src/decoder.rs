use tracing::trace;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::structs::*;

#[derive(Debug, Clone, Copy)]
enum ImmediateGroup {
    Mov,
    Arithmetic,
}

#[derive(Debug, Clone, Copy)]
enum Encoding {
    RegMemWithReg(OpCode),
    ImmediateToRegMem(ImmediateGroup),
    ImmediateToReg,
    MemoryToAccumulator,
    AccumulatorToMemory,
    ImmediateToAccumulator(OpCode),
    Jump(OpCode),
}

/// Leading `width` bits of the first byte must equal `value`.
struct OpcodePattern {
    width: u8,
    value: u8,
    encoding: Encoding,
}

impl OpcodePattern {
    const fn new(width: u8, value: u8, encoding: Encoding) -> OpcodePattern {
        OpcodePattern {
            width,
            value,
            encoding,
        }
    }

    fn matches(&self, byte: u8) -> bool {
        byte >> (8 - self.width) == self.value
    }
}

#[rustfmt::skip]
const PATTERNS: &[OpcodePattern] = &[
    // movs
    OpcodePattern::new(6, 0b100010, Encoding::RegMemWithReg(OpCode::Mov)),
    OpcodePattern::new(7, 0b1100011, Encoding::ImmediateToRegMem(ImmediateGroup::Mov)),
    OpcodePattern::new(4, 0b1011, Encoding::ImmediateToReg),
    OpcodePattern::new(7, 0b1010000, Encoding::MemoryToAccumulator),
    OpcodePattern::new(7, 0b1010001, Encoding::AccumulatorToMemory),

    // arithmetic
    OpcodePattern::new(6, 0b000000, Encoding::RegMemWithReg(OpCode::Add)),
    OpcodePattern::new(6, 0b001010, Encoding::RegMemWithReg(OpCode::Sub)),
    OpcodePattern::new(6, 0b001110, Encoding::RegMemWithReg(OpCode::Cmp)),
    OpcodePattern::new(6, 0b100000, Encoding::ImmediateToRegMem(ImmediateGroup::Arithmetic)),
    OpcodePattern::new(7, 0b0000010, Encoding::ImmediateToAccumulator(OpCode::Add)),
    OpcodePattern::new(7, 0b0010110, Encoding::ImmediateToAccumulator(OpCode::Sub)),
    OpcodePattern::new(7, 0b0011110, Encoding::ImmediateToAccumulator(OpCode::Cmp)),

    // jumps
    OpcodePattern::new(8, 0b0111_0100, Encoding::Jump(OpCode::Je)),
    OpcodePattern::new(8, 0b0111_1100, Encoding::Jump(OpCode::Jl)),
    OpcodePattern::new(8, 0b0111_1110, Encoding::Jump(OpCode::Jle)),
    OpcodePattern::new(8, 0b0111_0010, Encoding::Jump(OpCode::Jb)),
    OpcodePattern::new(8, 0b0111_0110, Encoding::Jump(OpCode::Jbe)),
    OpcodePattern::new(8, 0b0111_1010, Encoding::Jump(OpCode::Jp)),
    OpcodePattern::new(8, 0b0111_0000, Encoding::Jump(OpCode::Jo)),
    OpcodePattern::new(8, 0b0111_1000, Encoding::Jump(OpCode::Js)),
    OpcodePattern::new(8, 0b0111_0101, Encoding::Jump(OpCode::Jne)),
    OpcodePattern::new(8, 0b0111_1101, Encoding::Jump(OpCode::Jnl)),
    OpcodePattern::new(8, 0b0111_1111, Encoding::Jump(OpCode::Jnle)),
    OpcodePattern::new(8, 0b0111_0011, Encoding::Jump(OpCode::Jnb)),
    OpcodePattern::new(8, 0b0111_0111, Encoding::Jump(OpCode::Jnbe)),
    OpcodePattern::new(8, 0b0111_1011, Encoding::Jump(OpCode::Jnp)),
    OpcodePattern::new(8, 0b0111_0001, Encoding::Jump(OpCode::Jno)),
    OpcodePattern::new(8, 0b0111_1001, Encoding::Jump(OpCode::Jns)),
    OpcodePattern::new(8, 0b1110_0010, Encoding::Jump(OpCode::Loop)),
    OpcodePattern::new(8, 0b1110_0001, Encoding::Jump(OpCode::Loopz)),
    OpcodePattern::new(8, 0b1110_0000, Encoding::Jump(OpCode::Loopnz)),
    OpcodePattern::new(8, 0b1110_0011, Encoding::Jump(OpCode::Jcxz)),
];

fn decode_reg(reg: u8, w: u8) -> Register {
    #[rustfmt::skip]
    const W_TO_REG: &[Register] = &[
        Register::Al, Register::Cl, Register::Dl, Register::Bl, Register::Ah, Register::Ch , Register::Dh, Register::Bh, // w = 0
        Register::Ax, Register::Cx, Register::Dx, Register::Bx, Register::Sp, Register::Bp, Register::Si, Register::Di, // w = 1
    ];

    W_TO_REG[usize::from(w & 0b1) * 8 + usize::from(reg & 0b111)]
}

fn wide_flag(w: u8) -> InstructionFlags {
    if w == 0b1 {
        InstructionFlags::Wide
    } else {
        InstructionFlags::empty()
    }
}

fn decode_address(
    cursor: &mut ByteCursor,
    mode: u8,
    rm: u8,
) -> Result<EffectiveAddress, DecodeError> {
    let is_direct_address = mode == 0b00 && rm == 0b110;

    let displacement: i16 = match mode {
        _ if is_direct_address => cursor.next_word()? as i16,
        0b10 => cursor.next_word()? as i16,
        0b01 => i16::from(cursor.next()? as i8),
        _ => 0,
    };

    if is_direct_address {
        return Ok(EffectiveAddress::direct(displacement as u16));
    }

    const BASE: [Register; 8] = [
        Register::Bx,
        Register::Bx,
        Register::Bp,
        Register::Bp,
        Register::Si,
        Register::Di,
        Register::Bp,
        Register::Bx,
    ];
    const INDEX: [Option<Register>; 8] = [
        Some(Register::Si),
        Some(Register::Di),
        Some(Register::Si),
        Some(Register::Di),
        None,
        None,
        None,
        None,
    ];

    Ok(EffectiveAddress {
        base: Some(BASE[usize::from(rm)]),
        index: INDEX[usize::from(rm)],
        displacement,
    })
}

fn decode_rm(cursor: &mut ByteCursor, mode: u8, rm: u8, w: u8) -> Result<Operand, DecodeError> {
    match mode {
        0b11 => Ok(Operand::Register(decode_reg(rm, w))),
        _ => Ok(Operand::Memory(decode_address(cursor, mode, rm)?)),
    }
}

fn arithmetic_op_code(byte: u8) -> Option<OpCode> {
    match (byte >> 3) & 0b111 {
        0b000 => Some(OpCode::Add),
        0b101 => Some(OpCode::Sub),
        0b111 => Some(OpCode::Cmp),
        _ => None,
    }
}

fn rm_to_reg(op_code: OpCode, cursor: &mut ByteCursor, first: u8) -> Result<Instruction, DecodeError> {
    let w = first & 0b1;
    let d = (first >> 1) & 0b1;

    let second = cursor.next()?;
    let reg = (second >> 3) & 0b111;
    let rm = second & 0b111;
    let mode = (second >> 6) & 0b11;

    let address_or_reg = decode_rm(cursor, mode, rm, w)?;
    let reg_name = Operand::Register(decode_reg(reg, w));

    let operands = if d == 0b1 {
        [reg_name, address_or_reg]
    } else {
        [address_or_reg, reg_name]
    };

    Ok(Instruction {
        op_code,
        flags: wide_flag(w),
        operands,
        size: 0,
    })
}

fn immediate_to_rm(
    group: ImmediateGroup,
    cursor: &mut ByteCursor,
    first: u8,
    offset: usize,
) -> Result<Instruction, DecodeError> {
    let w = first & 0b1;
    // the mov form has no s bit, its data width follows w alone
    let sign_extend = matches!(group, ImmediateGroup::Arithmetic) && (first >> 1) & 0b1 == 0b1;

    let second = cursor.next()?;
    let op_code = match group {
        ImmediateGroup::Mov if (second >> 3) & 0b111 == 0b000 => Some(OpCode::Mov),
        ImmediateGroup::Mov => None,
        ImmediateGroup::Arithmetic => arithmetic_op_code(second),
    }
    .ok_or(DecodeError::UnrecognizedOpcode {
        byte: first,
        offset,
    })?;

    let mode = (second >> 6) & 0b11;
    let rm = second & 0b111;
    let destination = decode_rm(cursor, mode, rm, w)?;

    let immediate = match (w, sign_extend) {
        (0b1, false) => cursor.next_word()? as i16,
        _ => i16::from(cursor.next()? as i8),
    };

    Ok(Instruction {
        op_code,
        flags: wide_flag(w),
        operands: [destination, Operand::Immediate(immediate)],
        size: 0,
    })
}

fn mov_immediate_to_reg(cursor: &mut ByteCursor, first: u8) -> Result<Instruction, DecodeError> {
    let w = (first >> 3) & 0b1;
    let reg = first & 0b111;

    let immediate: i16 = if w == 0b1 {
        cursor.next_word()? as i16
    } else {
        i16::from(cursor.next()? as i8)
    };

    Ok(Instruction {
        op_code: OpCode::Mov,
        flags: wide_flag(w),
        operands: [
            Operand::Register(decode_reg(reg, w)),
            Operand::Immediate(immediate),
        ],
        size: 0,
    })
}

fn mov_acc(cursor: &mut ByteCursor, first: u8, to_acc: bool) -> Result<Instruction, DecodeError> {
    let w = first & 0b1;
    let accumulator = Operand::Register(decode_reg(0b000, w));
    // the address is always a full word, whatever w says
    let memory = Operand::Memory(EffectiveAddress::direct(cursor.next_word()?));

    Ok(Instruction {
        op_code: OpCode::Mov,
        flags: wide_flag(w),
        operands: if to_acc {
            [accumulator, memory]
        } else {
            [memory, accumulator]
        },
        size: 0,
    })
}

fn im_to_acc(op_code: OpCode, cursor: &mut ByteCursor, first: u8) -> Result<Instruction, DecodeError> {
    let w = first & 0b1;

    let immediate: i16 = if w == 0b1 {
        cursor.next_word()? as i16
    } else {
        i16::from(cursor.next()? as i8)
    };

    Ok(Instruction {
        op_code,
        flags: wide_flag(w),
        operands: [
            Operand::Register(decode_reg(0b000, w)),
            Operand::Immediate(immediate),
        ],
        size: 0,
    })
}

fn parse_jump(op_code: OpCode, cursor: &mut ByteCursor) -> Result<Instruction, DecodeError> {
    let displacement = cursor.next()? as i8;

    Ok(Instruction {
        op_code,
        flags: InstructionFlags::empty(),
        operands: [Operand::JumpDisplacement(displacement), Operand::None],
        size: 0,
    })
}

/// Decodes the instruction starting at the cursor and leaves the cursor right
/// after it. `size` is the number of bytes consumed.
pub fn decode(cursor: &mut ByteCursor) -> Result<Instruction, DecodeError> {
    let start = cursor.position();
    let first = cursor.next()?;

    let Some(pattern) = PATTERNS.iter().find(|pattern| pattern.matches(first)) else {
        return Err(DecodeError::UnrecognizedOpcode {
            byte: first,
            offset: start,
        });
    };

    let mut instruction = match pattern.encoding {
        Encoding::RegMemWithReg(op_code) => rm_to_reg(op_code, cursor, first)?,
        Encoding::ImmediateToRegMem(group) => immediate_to_rm(group, cursor, first, start)?,
        Encoding::ImmediateToReg => mov_immediate_to_reg(cursor, first)?,
        Encoding::MemoryToAccumulator => mov_acc(cursor, first, true)?,
        Encoding::AccumulatorToMemory => mov_acc(cursor, first, false)?,
        Encoding::ImmediateToAccumulator(op_code) => im_to_acc(op_code, cursor, first)?,
        Encoding::Jump(op_code) => parse_jump(op_code, cursor)?,
    };
    instruction.size = (cursor.position() - start) as u16;

    trace!(
        offset = start,
        size = instruction.size,
        op = instruction.op_code.mnemonic(),
        "decoded instruction"
    );

    Ok(instruction)
}

/// Decodes the whole buffer front to back.
pub fn disassemble(bytes: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
    let mut cursor = ByteCursor::new(bytes);
    let mut result = Vec::new();

    while !cursor.is_empty() {
        result.push(decode(&mut cursor)?);
    }

    Ok(result)
}
