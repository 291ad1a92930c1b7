use tracing::{debug, debug_span, warn};

use crate::{
    cursor::ByteCursor,
    decoder,
    error::SimulationError,
    machine::{Flags, MachineState},
    structs::{EffectiveAddress, Instruction, OpCode, Operand, Register},
};

#[derive(Debug, Clone, Default)]
pub struct SimulatorConfig {
    /// Abort with `StepLimitExceeded` after this many executed instructions.
    pub max_steps: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<T> {
    pub before: T,
    pub after: T,
}

impl<T: PartialEq> Transition<T> {
    pub fn is_change(&self) -> bool {
        self.before != self.after
    }
}

/// State written by one instruction. Byte registers are reported through
/// their 16-bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Register {
        register: Register,
        change: Transition<u16>,
    },
    Memory {
        address: u16,
        change: Transition<u16>,
    },
}

/// Record of one executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub address: u16,
    pub instruction: Instruction,
    pub mutation: Option<Mutation>,
    /// Present for instructions that write flags, even when they did not change.
    pub flags: Option<Transition<Flags>>,
    pub ip: Transition<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithmeticOp {
    Add,
    Sub,
    Cmp,
}

impl OpCode {
    fn as_arithmetic_op(&self) -> Option<ArithmeticOp> {
        match self {
            OpCode::Add => Some(ArithmeticOp::Add),
            OpCode::Sub => Some(ArithmeticOp::Sub),
            OpCode::Cmp => Some(ArithmeticOp::Cmp),
            _ => None,
        }
    }

    fn is_executable(&self) -> bool {
        matches!(
            self,
            OpCode::Mov | OpCode::Add | OpCode::Sub | OpCode::Cmp | OpCode::Jne
        )
    }
}

fn truncate(value: u16, is_wide: bool) -> u16 {
    if is_wide {
        value
    } else {
        value & 0x00FF
    }
}

// byte results are sign extended so the 0x8000 test sees their top bit
fn flags_of(result: u16, is_wide: bool) -> Flags {
    if is_wide {
        Flags::from_value(result)
    } else {
        Flags::from_value(((result as u8) as i8) as i16 as u16)
    }
}

fn execute_add(left: u16, right: u16, is_wide: bool) -> u16 {
    truncate(left.wrapping_add(right), is_wide)
}

fn execute_sub(left: u16, right: u16, is_wide: bool) -> u16 {
    truncate(left.wrapping_sub(right), is_wide)
}

/// Returns the value to write back (`None` for cmp) and the new flags.
fn execute_arithmetic_op(
    left: u16,
    right: u16,
    arithm_op: ArithmeticOp,
    is_wide: bool,
) -> (Option<u16>, Flags) {
    let op_result = match arithm_op {
        ArithmeticOp::Add => execute_add(left, right, is_wide),
        ArithmeticOp::Sub | ArithmeticOp::Cmp => execute_sub(left, right, is_wide),
    };
    let flags = flags_of(op_result, is_wide);

    match arithm_op {
        ArithmeticOp::Cmp => (None, flags),
        ArithmeticOp::Add | ArithmeticOp::Sub => (Some(op_result), flags),
    }
}

#[derive(Debug, Clone, Copy)]
enum Location {
    Register(Register),
    Memory(u16),
}

/// Largest program a 16-bit instruction pointer can address.
pub const MAX_PROGRAM_LEN: usize = 0x10000;

pub struct Simulator {
    program: Vec<u8>,
    machine: MachineState,
    config: SimulatorConfig,
    steps: u64,
    // set once the unwrapped next position falls outside the program
    left_program: bool,
}

impl TryFrom<Vec<u8>> for Simulator {
    type Error = SimulationError;

    fn try_from(program: Vec<u8>) -> Result<Simulator, SimulationError> {
        Simulator::new(program, SimulatorConfig::default())
    }
}

impl Simulator {
    pub fn new(program: Vec<u8>, config: SimulatorConfig) -> Result<Simulator, SimulationError> {
        if program.len() > MAX_PROGRAM_LEN {
            return Err(SimulationError::ProgramTooLarge { len: program.len() });
        }

        Ok(Simulator {
            program,
            machine: MachineState::new(),
            config,
            steps: 0,
            left_program: false,
        })
    }

    pub fn machine(&self) -> &MachineState {
        &self.machine
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.left_program || usize::from(self.machine.ip()) >= self.program.len()
    }

    fn is_outside_program(&self, position: i32) -> bool {
        usize::try_from(position).map_or(true, |position| position >= self.program.len())
    }

    fn address_of(&self, address: &EffectiveAddress) -> u16 {
        let base = address
            .base
            .map(|reg| self.machine.get_register(reg))
            .unwrap_or(0);
        let index = address
            .index
            .map(|reg| self.machine.get_register(reg))
            .unwrap_or(0);

        base.wrapping_add(index)
            .wrapping_add_signed(address.displacement)
    }

    fn location_of(&self, operand: &Operand) -> Option<Location> {
        match operand {
            Operand::Register(reg) => Some(Location::Register(*reg)),
            Operand::Memory(address) => Some(Location::Memory(self.address_of(address))),
            _ => None,
        }
    }

    fn read(&self, location: Location, is_wide: bool) -> u16 {
        match location {
            Location::Register(reg) => self.machine.get_register(reg),
            Location::Memory(address) => truncate(self.machine.get_memory(address), is_wide),
        }
    }

    fn write(&mut self, location: Location, value: u16, is_wide: bool) -> Mutation {
        match location {
            Location::Register(reg) => {
                let word_reg = reg.to_word();
                let before = self.machine.get_register(word_reg);
                self.machine.set_register(reg, value);

                Mutation::Register {
                    register: word_reg,
                    change: Transition {
                        before,
                        after: self.machine.get_register(word_reg),
                    },
                }
            }
            Location::Memory(address) => {
                let before = self.machine.get_memory(address);
                // byte stores keep the high byte of the word entry
                let after = if is_wide {
                    value
                } else {
                    (before & 0xFF00) | (value & 0x00FF)
                };
                self.machine.set_memory(address, after);

                Mutation::Memory {
                    address,
                    change: Transition { before, after },
                }
            }
        }
    }

    fn value_of(&self, operand: &Operand, is_wide: bool) -> u16 {
        match operand {
            Operand::Immediate(value) => truncate(*value as u16, is_wide),
            Operand::JumpDisplacement(displacement) => i16::from(*displacement) as u16,
            Operand::None => 0,
            Operand::Register(_) | Operand::Memory(_) => match self.location_of(operand) {
                Some(location) => self.read(location, is_wide),
                None => 0,
            },
        }
    }

    // everything that can fail is checked here, before any state changes
    fn validate(&self, instruction: &Instruction, address: u16) -> Result<(), SimulationError> {
        if !instruction.op_code.is_executable() {
            return Err(SimulationError::UnsupportedOperation {
                op_code: instruction.op_code,
                address,
            });
        }

        let has_destination = matches!(
            instruction.op_code,
            OpCode::Mov | OpCode::Add | OpCode::Sub | OpCode::Cmp
        );
        if has_destination
            && !matches!(
                instruction.destination(),
                Operand::Register(_) | Operand::Memory(_)
            )
        {
            return Err(SimulationError::InvalidDestination { address });
        }

        Ok(())
    }

    fn process_mov(&mut self, instruction: &Instruction) -> Option<Mutation> {
        let is_wide = instruction.is_wide();
        let value = self.value_of(instruction.source(), is_wide);
        let location = self.location_of(instruction.destination())?;

        Some(self.write(location, value, is_wide))
    }

    fn process_arithmetic(
        &mut self,
        instruction: &Instruction,
        arithm_op: ArithmeticOp,
    ) -> (Option<Mutation>, Transition<Flags>) {
        let is_wide = instruction.is_wide();
        let location = self.location_of(instruction.destination());

        let left = location
            .map(|location| self.read(location, is_wide))
            .unwrap_or(0);
        let right = self.value_of(instruction.source(), is_wide);

        let prev_flags = self.machine.get_flags();
        let (next_value, next_flags) = execute_arithmetic_op(left, right, arithm_op, is_wide);
        self.machine.set_flags(next_flags);

        let mutation = match (location, next_value) {
            (Some(location), Some(value)) => Some(self.write(location, value, is_wide)),
            _ => None,
        };

        (
            mutation,
            Transition {
                before: prev_flags,
                after: next_flags,
            },
        )
    }

    /// Displacement of a taken branch.
    fn process_jump(&mut self, instruction: &Instruction) -> Option<i16> {
        let Operand::JumpDisplacement(displacement) = *instruction.destination() else {
            return None;
        };

        let taken = match instruction.op_code {
            OpCode::Jne => self.machine.get_flags() != Flags::Zero,
            _ => false,
        };
        if !taken {
            return None;
        }
        let displacement = i16::from(displacement);
        self.machine.jump_instruction_pointer(displacement);
        Some(displacement)
    }

    /// Executes the instruction at the instruction pointer. `Ok(None)` once
    /// the pointer has left the program. On error the machine is untouched.
    pub fn step(&mut self) -> Result<Option<Step>, SimulationError> {
        if self.is_finished() {
            return Ok(None);
        }
        if let Some(limit) = self.config.max_steps {
            if self.steps >= limit {
                return Err(SimulationError::StepLimitExceeded { limit });
            }
        }

        let address = self.machine.ip();
        let mut cursor = ByteCursor::at(&self.program, usize::from(address));
        let instruction = decoder::decode(&mut cursor)?;
        self.validate(&instruction, address)?;

        // branches are relative to the end of the instruction
        self.machine.advance_instruction_pointer(instruction.size);
        // the pointer wraps at 16 bits, the end of the run is judged without wrapping
        let mut next = i32::from(address) + i32::from(instruction.size);

        let (mutation, flags) = match instruction.op_code.as_arithmetic_op() {
            Some(arithm_op) => {
                let (mutation, flags) = self.process_arithmetic(&instruction, arithm_op);
                (mutation, Some(flags))
            }
            None if instruction.op_code == OpCode::Mov => (self.process_mov(&instruction), None),
            None => {
                if let Some(displacement) = self.process_jump(&instruction) {
                    next += i32::from(displacement);
                }
                (None, None)
            }
        };
        self.left_program = self.is_outside_program(next);

        self.steps += 1;
        let step = Step {
            address,
            instruction,
            mutation,
            flags,
            ip: Transition {
                before: address,
                after: self.machine.ip(),
            },
        };

        debug!(
            address,
            op = instruction.op_code.mnemonic(),
            next_ip = step.ip.after,
            "executed instruction"
        );

        Ok(Some(step))
    }

    /// Runs to completion, handing every step to `on_step` as it happens.
    pub fn run_with<F: FnMut(&Step)>(&mut self, mut on_step: F) -> Result<(), SimulationError> {
        let span = debug_span!("simulate", program_len = self.program.len());
        let _guard = span.enter();

        loop {
            match self.step() {
                Ok(Some(step)) => on_step(&step),
                Ok(None) => break,
                Err(err) => {
                    warn!(ip = self.machine.ip(), steps = self.steps, "simulation aborted: {err}");
                    return Err(err);
                }
            }
        }

        debug!(steps = self.steps, ip = self.machine.ip(), "simulation finished");
        Ok(())
    }

    pub fn run(&mut self) -> Result<Vec<Step>, SimulationError> {
        let mut steps = Vec::new();
        self.run_with(|step| steps.push(*step))?;
        Ok(steps)
    }
}

#[derive(Debug)]
pub struct Execution {
    pub steps: Vec<Step>,
    pub state: MachineState,
}

pub fn execute(instructions: Vec<u8>, config: SimulatorConfig) -> Result<Execution, SimulationError> {
    let mut machine = Simulator::new(instructions, config)?;
    let steps = machine.run()?;

    Ok(Execution {
        steps,
        state: machine.machine,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn test_execute_add() {
        assert_eq!(execute_add(0x29, 0x4c, true), 117);
        assert_eq!(execute_add(0x29, 0x4c, false), 117);
        assert_eq!(execute_add(0xA9, 0x7c, true), 293);
        assert_eq!(execute_add(0xA0_09, 0xA0_09, true), 16402);
        assert_eq!(execute_add(0xA9, 0x7c, false), 37);
    }

    #[test]
    fn test_execute_sub() {
        // borrowing
        assert_eq!(execute_sub(0x29, 0x4c, true), 65501);
        assert_eq!(execute_sub(0x29, 0x4c, false), 221);

        assert_eq!(execute_sub(0x29, 0x20, true), 0x09);
        assert_eq!(execute_sub(0x29, 0x20, false), 0x09);
    }

    #[test]
    fn test_produce_flags() {
        assert_eq!(execute_arithmetic_op(1, 1, ArithmeticOp::Sub, true), (Some(0), Flags::Zero));
        assert_eq!(
            execute_arithmetic_op(0, 1, ArithmeticOp::Sub, true),
            (Some(0xFFFF), Flags::Sign)
        );
        assert_eq!(
            execute_arithmetic_op(0x7F, 1, ArithmeticOp::Add, false),
            (Some(0x80), Flags::Sign)
        );
        assert_eq!(
            execute_arithmetic_op(0x7F, 1, ArithmeticOp::Add, true),
            (Some(0x80), Flags::None)
        );
        assert_eq!(execute_arithmetic_op(5, 5, ArithmeticOp::Cmp, true), (None, Flags::Zero));
    }

    #[test]
    fn cmp_matches_sub_flags() {
        for (left, right) in [(5u16, 5u16), (3, 9), (0x9000, 1), (10, 4)] {
            let (_, sub_flags) = execute_arithmetic_op(left, right, ArithmeticOp::Sub, true);
            let (written, cmp_flags) = execute_arithmetic_op(left, right, ArithmeticOp::Cmp, true);
            assert_eq!(sub_flags, cmp_flags);
            assert_eq!(written, None);
        }
    }

    #[test]
    fn mov_immediate_and_register() {
        // mov ax, 5 ; mov bx, ax ; mov cl, -1
        let program = vec![0xb8, 0x05, 0x00, 0x89, 0xc3, 0xb1, 0xff];
        let execution = execute(program, SimulatorConfig::default()).unwrap();

        assert_eq!(execution.steps.len(), 3);
        assert_eq!(
            execution.steps[0].mutation,
            Some(Mutation::Register {
                register: Register::Ax,
                change: Transition {
                    before: 0,
                    after: 5
                },
            })
        );
        assert_eq!(execution.steps[0].flags, None);
        assert_eq!(execution.steps[1].ip, Transition { before: 3, after: 5 });
        assert_eq!(
            execution.steps[2].mutation,
            Some(Mutation::Register {
                register: Register::Cx,
                change: Transition {
                    before: 0,
                    after: 0xFF
                },
            })
        );

        let state = execution.state;
        assert_eq!(state.get_register(Register::Bx), 5);
        assert_eq!(state.get_register(Register::Cx), 0x00FF);
        assert_eq!(state.ip(), 7);
        assert_eq!(state.get_flags(), Flags::None);
    }

    #[test]
    fn sub_then_cmp_keeps_flags() {
        // mov bx, 3 ; mov cx, 3 ; sub bx, cx ; cmp bx, cx
        let program = vec![0xbb, 0x03, 0x00, 0xb9, 0x03, 0x00, 0x29, 0xcb, 0x39, 0xcb];
        let execution = execute(program, SimulatorConfig::default()).unwrap();

        let sub = &execution.steps[2];
        assert_eq!(
            sub.flags,
            Some(Transition {
                before: Flags::None,
                after: Flags::Zero
            })
        );
        assert_eq!(
            sub.mutation,
            Some(Mutation::Register {
                register: Register::Bx,
                change: Transition {
                    before: 3,
                    after: 0
                },
            })
        );

        // bx is now 0, so cmp bx, cx is 0 - 3
        let cmp = &execution.steps[3];
        assert_eq!(cmp.mutation, None);
        assert_eq!(
            cmp.flags,
            Some(Transition {
                before: Flags::Zero,
                after: Flags::Sign
            })
        );
        assert_eq!(execution.state.get_register(Register::Bx), 0);
    }

    #[test]
    fn cmp_never_writes_back() {
        // mov ax, 7 ; cmp ax, 7
        let program = vec![0xb8, 0x07, 0x00, 0x3d, 0x07, 0x00];
        let execution = execute(program, SimulatorConfig::default()).unwrap();

        assert_eq!(execution.state.get_register(Register::Ax), 7);
        assert_eq!(execution.state.get_flags(), Flags::Zero);
        assert_eq!(execution.steps[1].mutation, None);
    }

    #[test]
    fn jne_not_taken_on_zero() {
        // sub ax, ax ; jne $+4 ; mov bx, 1
        let program = vec![0x29, 0xc0, 0x75, 0x02, 0xbb, 0x01, 0x00];
        let execution = execute(program, SimulatorConfig::default()).unwrap();

        assert_eq!(execution.steps.len(), 3);
        assert_eq!(execution.steps[1].ip, Transition { before: 2, after: 4 });
        assert_eq!(execution.steps[1].flags, None);
        assert_eq!(execution.state.get_register(Register::Bx), 1);
    }

    #[test]
    fn jne_taken_adds_to_advanced_pointer() {
        // mov ax, 1 ; jne $+5 ; mov bx, 1 ; mov cx, 2
        let program = vec![0xb8, 0x01, 0x00, 0x75, 0x03, 0xbb, 0x01, 0x00, 0xb9, 0x02, 0x00];
        let execution = execute(program, SimulatorConfig::default()).unwrap();

        assert_eq!(execution.steps.len(), 3);
        assert_eq!(execution.steps[1].ip, Transition { before: 3, after: 8 });
        assert_eq!(execution.state.get_register(Register::Bx), 0);
        assert_eq!(execution.state.get_register(Register::Cx), 2);
    }

    #[test]
    fn counting_loop() {
        // mov cx, 3 ; sub cx, 1 ; jne $-3
        let program = vec![0xb9, 0x03, 0x00, 0x83, 0xe9, 0x01, 0x75, 0xfb];
        let execution = execute(program, SimulatorConfig::default()).unwrap();

        assert_eq!(execution.steps.len(), 7);
        let jumps: Vec<_> = execution
            .steps
            .iter()
            .filter(|step| step.instruction.op_code == OpCode::Jne)
            .map(|step| step.ip.after)
            .collect();
        assert_eq!(jumps, vec![3, 3, 8]);

        assert_eq!(execution.state.get_register(Register::Cx), 0);
        assert_eq!(execution.state.ip(), 8);
        assert_eq!(execution.state.get_flags(), Flags::Zero);
    }

    #[test]
    fn byte_loop_until_wraparound() {
        // mov ax, 5 ; add al, 3 ; jne $-2
        let program = vec![0xb8, 0x05, 0x00, 0x04, 0x03, 0x75, 0xfc];
        let mut simulator = Simulator::try_from(program).unwrap();

        let first = simulator.step().unwrap().unwrap();
        let second = simulator.step().unwrap().unwrap();
        let third = simulator.step().unwrap().unwrap();

        let ax = |step: &Step| match step.mutation {
            Some(Mutation::Register {
                register: Register::Ax,
                change,
            }) => Some((change.before, change.after)),
            _ => None,
        };
        assert_eq!(ax(&first), Some((0, 5)));
        assert_eq!(ax(&second), Some((5, 8)));
        assert_eq!(third.ip, Transition { before: 5, after: 3 });

        let rest = simulator.run().unwrap();
        // 5 + 3 * 169 wraps al to zero
        assert_eq!(3 + rest.len(), 1 + 169 * 2);
        assert_eq!(simulator.machine().get_register(Register::Ax), 0);
        assert_eq!(simulator.machine().get_flags(), Flags::Zero);
        assert_eq!(simulator.machine().ip(), 7);
        assert!(simulator.is_finished());
    }

    #[test]
    fn memory_operands() {
        // mov word [1000], 5 ; mov bx, [1000] ; add word [1000], 3 ; mov byte [bx + 2], -1
        let program = vec![
            0xc7, 0x06, 0xe8, 0x03, 0x05, 0x00, //
            0x8b, 0x1e, 0xe8, 0x03, //
            0x83, 0x06, 0xe8, 0x03, 0x03, //
            0xc6, 0x47, 0x02, 0xff,
        ];
        let execution = execute(program, SimulatorConfig::default()).unwrap();

        assert_eq!(
            execution.steps[0].mutation,
            Some(Mutation::Memory {
                address: 1000,
                change: Transition {
                    before: 0,
                    after: 5
                },
            })
        );
        assert_eq!(execution.state.get_register(Register::Bx), 5);
        assert_eq!(execution.state.get_memory(1000), 8);
        assert_eq!(execution.steps[2].flags.map(|it| it.after), Some(Flags::None));
        assert_eq!(execution.state.get_memory(7), 0x00FF);
    }

    #[test]
    fn malformed_input_keeps_prior_state() {
        let program = vec![0xb8, 0x05, 0x00, 0xff];
        let mut simulator = Simulator::try_from(program).unwrap();

        let result = simulator.run();
        assert_eq!(
            result,
            Err(SimulationError::Decode(DecodeError::UnrecognizedOpcode {
                byte: 0xff,
                offset: 3
            }))
        );
        assert_eq!(simulator.machine().get_register(Register::Ax), 5);
        assert_eq!(simulator.machine().ip(), 3);
        assert_eq!(simulator.steps(), 1);
    }

    #[test]
    fn truncated_program() {
        let result = execute(vec![0xb8, 0x05], SimulatorConfig::default());
        assert!(matches!(
            result,
            Err(SimulationError::Decode(DecodeError::TruncatedInput { offset: 2 }))
        ));
    }

    #[test]
    fn unsupported_operation_is_rejected_before_execution() {
        // mov ax, 5 ; je $+4
        let mut simulator = Simulator::try_from(vec![0xb8, 0x05, 0x00, 0x74, 0x02]).unwrap();
        assert_eq!(
            simulator.run(),
            Err(SimulationError::UnsupportedOperation {
                op_code: OpCode::Je,
                address: 3
            })
        );
        assert_eq!(simulator.machine().ip(), 3);
    }

    #[test]
    fn step_limit_stops_endless_loop() {
        // jne $+0 with flags never reaching zero
        let config = SimulatorConfig {
            max_steps: Some(10),
        };
        let mut simulator = Simulator::new(vec![0x75, 0xfe], config).unwrap();
        let mut seen = 0;
        let result = simulator.run_with(|_| seen += 1);

        assert_eq!(result, Err(SimulationError::StepLimitExceeded { limit: 10 }));
        assert_eq!(seen, 10);
        assert_eq!(simulator.machine().ip(), 0);
    }

    #[test]
    fn mov_leaves_flags_alone() {
        // sub ax, ax ; mov ax, 1
        let execution = execute(vec![0x29, 0xc0, 0xb8, 0x01, 0x00], SimulatorConfig::default()).unwrap();
        assert_eq!(execution.state.get_flags(), Flags::Zero);
        assert_eq!(execution.state.get_register(Register::Ax), 1);
    }

    #[test]
    fn empty_program_does_nothing() {
        let execution = execute(Vec::new(), SimulatorConfig::default()).unwrap();
        assert!(execution.steps.is_empty());
        assert_eq!(execution.state, MachineState::new());
    }

    #[test]
    fn full_segment_program_runs_off_the_end() {
        // mov ax, ax filling all 64 KiB
        let program = [0x89, 0xc0].repeat(0x8000);
        let config = SimulatorConfig {
            max_steps: Some(100_000),
        };
        let mut simulator = Simulator::new(program, config).unwrap();

        assert_eq!(simulator.run_with(|_| {}), Ok(()));
        assert_eq!(simulator.steps(), 0x8000);
        assert_eq!(simulator.machine().ip(), 0);
        assert!(simulator.is_finished());
        assert_eq!(simulator.step(), Ok(None));
    }

    #[test]
    fn jump_past_the_segment_end_finishes() {
        // mov ax, ax ... ; jne $+4 as the last two bytes of the segment
        let mut program = [0x89, 0xc0].repeat(0x7fff);
        program.extend([0x75, 0x02]);
        let execution = execute(program, SimulatorConfig::default()).unwrap();

        let last = execution.steps.last().unwrap();
        assert_eq!(last.ip, Transition { before: 0xfffe, after: 0x0002 });
        assert_eq!(execution.steps.len(), 0x8000);
    }

    #[test]
    fn backward_jump_before_the_start_finishes() {
        // mov ax, 1 ; jne $-8
        let execution = execute(vec![0xb8, 0x01, 0x00, 0x75, 0xf6], SimulatorConfig::default()).unwrap();
        assert_eq!(execution.steps.len(), 2);
        assert_eq!(execution.state.ip(), 0xfffb);
    }

    #[test]
    fn oversized_program_is_rejected() {
        let result = Simulator::try_from(vec![0x90; MAX_PROGRAM_LEN + 1]);
        assert!(matches!(
            result,
            Err(SimulationError::ProgramTooLarge { len }) if len == MAX_PROGRAM_LEN + 1
        ));
    }
}
