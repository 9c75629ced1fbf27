//! 指令處理模組
//!
//! 操作碼先解碼為 [`Instruction`]，再分派到各類指令的處理器。
//! 處理器回傳消耗的週期數；PC 的固定加 1 由 `Cpu::step` 完成。

pub mod arithmetic;
pub mod control;
pub mod inc_dec;
pub mod io;
pub mod jump;
pub mod ld;
pub mod rotate;
pub mod stack;

use crate::cpu::{Cpu, Flags, Operand, Pair};
use crate::error::CpuError;
use crate::mmu::Mmu;
use crate::ports::IoBus;

/// 累加器運算，共用 0x80-0xBF 的暫存器區塊以及 0xC0-0xFF 第 6 欄的立即數形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    fn from_code(code: u8) -> Self {
        match (code >> 3) & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbb,
            4 => AluOp::Ana,
            5 => AluOp::Xra,
            6 => AluOp::Ora,
            _ => AluOp::Cmp,
        }
    }
}

/// 條件碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    fn from_code(code: u8) -> Self {
        match (code >> 3) & 0x07 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }

    pub fn holds(self, flags: &Flags) -> bool {
        match self {
            Condition::NotZero => !flags.z,
            Condition::Zero => flags.z,
            Condition::NoCarry => !flags.cy,
            Condition::Carry => flags.cy,
            Condition::ParityOdd => !flags.p,
            Condition::ParityEven => flags.p,
            Condition::Plus => !flags.s,
            Condition::Minus => flags.s,
        }
    }
}

/// 解碼後的一個 8080 指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Lxi(Pair),
    Stax(Pair),
    Ldax(Pair),
    Inx(Pair),
    Dcx(Pair),
    Dad(Pair),
    Inr(Operand),
    Dcr(Operand),
    Mvi(Operand),
    Rlc,
    Rrc,
    Ral,
    Rar,
    Shld,
    Lhld,
    Sta,
    Lda,
    Daa,
    Cma,
    Stc,
    Cmc,
    Mov(Operand, Operand),
    Hlt,
    Alu(AluOp, Operand),
    AluImmediate(AluOp),
    Ret,
    RetIf(Condition),
    Jmp,
    JmpIf(Condition),
    Call,
    CallIf(Condition),
    Pop(Pair),
    Push(Pair),
    Rst(u8),
    Out,
    In,
    Xthl,
    Xchg,
    Pchl,
    Sphl,
    Di,
    Ei,
}

// 暫存器對編碼：位元 4-5
fn pair_from_code(code: u8, fourth: Pair) -> Pair {
    match (code >> 4) & 0x03 {
        0 => Pair::BC,
        1 => Pair::DE,
        2 => Pair::HL,
        _ => fourth,
    }
}

impl Instruction {
    /// 解碼一個操作碼；十二個未定義的編碼回傳 `None`
    pub fn decode(opcode: u8) -> Option<Instruction> {
        use Instruction::*;
        let instruction = match opcode {
            0x00 => Nop,
            0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => return None,
            0xCB | 0xD9 | 0xDD | 0xED | 0xFD => return None,

            0x01 | 0x11 | 0x21 | 0x31 => Lxi(pair_from_code(opcode, Pair::SP)),
            0x02 | 0x12 => Stax(pair_from_code(opcode, Pair::SP)),
            0x0A | 0x1A => Ldax(pair_from_code(opcode, Pair::SP)),
            0x03 | 0x13 | 0x23 | 0x33 => Inx(pair_from_code(opcode, Pair::SP)),
            0x0B | 0x1B | 0x2B | 0x3B => Dcx(pair_from_code(opcode, Pair::SP)),
            0x09 | 0x19 | 0x29 | 0x39 => Dad(pair_from_code(opcode, Pair::SP)),

            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                Inr(Operand::from_code(opcode >> 3))
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                Dcr(Operand::from_code(opcode >> 3))
            }
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                Mvi(Operand::from_code(opcode >> 3))
            }

            0x07 => Rlc,
            0x0F => Rrc,
            0x17 => Ral,
            0x1F => Rar,
            0x22 => Shld,
            0x2A => Lhld,
            0x32 => Sta,
            0x3A => Lda,
            0x27 => Daa,
            0x2F => Cma,
            0x37 => Stc,
            0x3F => Cmc,

            0x76 => Hlt,
            0x40..=0x75 | 0x77..=0x7F => {
                Mov(Operand::from_code(opcode >> 3), Operand::from_code(opcode))
            }
            0x80..=0xBF => Alu(AluOp::from_code(opcode), Operand::from_code(opcode)),

            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                AluImmediate(AluOp::from_code(opcode))
            }
            0xC9 => Ret,
            0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
                RetIf(Condition::from_code(opcode))
            }
            0xC3 => Jmp,
            0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
                JmpIf(Condition::from_code(opcode))
            }
            0xCD => Call,
            0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
                CallIf(Condition::from_code(opcode))
            }
            0xC1 | 0xD1 | 0xE1 | 0xF1 => Pop(pair_from_code(opcode, Pair::PSW)),
            0xC5 | 0xD5 | 0xE5 | 0xF5 => Push(pair_from_code(opcode, Pair::PSW)),
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => Rst((opcode >> 3) & 0x07),

            0xD3 => Out,
            0xDB => In,
            0xE3 => Xthl,
            0xEB => Xchg,
            0xE9 => Pchl,
            0xF9 => Sphl,
            0xF3 => Di,
            0xFB => Ei,
        };
        Some(instruction)
    }
}

/// 主要的指令處理器
pub fn execute_instruction(
    cpu: &mut Cpu,
    mmu: &mut Mmu,
    io: &mut impl IoBus,
    instruction: Instruction,
) -> Result<u32, CpuError> {
    use Instruction::*;
    match instruction {
        // 載入指令
        Mov(dst, src) => ld::handle_mov(cpu, mmu, dst, src),
        Mvi(dst) => ld::handle_mvi(cpu, mmu, dst),
        Lxi(pair) => ld::handle_lxi(cpu, mmu, pair),
        Stax(pair) => ld::handle_stax(cpu, mmu, pair),
        Ldax(pair) => ld::handle_ldax(cpu, mmu, pair),
        Sta => ld::handle_sta(cpu, mmu),
        Lda => ld::handle_lda(cpu, mmu),
        Shld => ld::handle_shld(cpu, mmu),
        Lhld => ld::handle_lhld(cpu, mmu),
        Xchg => ld::handle_xchg(cpu),

        // 算術指令
        Alu(op, operand) => {
            let value = cpu.read_operand(mmu, operand)?;
            arithmetic::handle_alu(cpu, op, value);
            Ok(if operand == Operand::Mem { 7 } else { 4 })
        }
        AluImmediate(op) => {
            let value = cpu.immediate_byte(mmu)?;
            arithmetic::handle_alu(cpu, op, value);
            Ok(7)
        }
        Daa => arithmetic::handle_daa(cpu),
        Dad(pair) => arithmetic::handle_dad(cpu, pair),

        // 增減指令
        Inr(operand) => inc_dec::handle_inr(cpu, mmu, operand),
        Dcr(operand) => inc_dec::handle_dcr(cpu, mmu, operand),
        Inx(pair) => inc_dec::handle_inx(cpu, pair),
        Dcx(pair) => inc_dec::handle_dcx(cpu, pair),

        // 旋轉指令
        Rlc => rotate::handle_rlc(cpu),
        Rrc => rotate::handle_rrc(cpu),
        Ral => rotate::handle_ral(cpu),
        Rar => rotate::handle_rar(cpu),

        // 跳轉指令
        Jmp => jump::handle_jmp(cpu, mmu, None),
        JmpIf(condition) => jump::handle_jmp(cpu, mmu, Some(condition)),
        Call => jump::handle_call(cpu, mmu, None),
        CallIf(condition) => jump::handle_call(cpu, mmu, Some(condition)),
        Ret => jump::handle_ret(cpu, mmu, None),
        RetIf(condition) => jump::handle_ret(cpu, mmu, Some(condition)),
        Rst(vector) => jump::handle_rst(cpu, mmu, vector),
        Pchl => jump::handle_pchl(cpu),

        // 堆疊指令
        Push(pair) => stack::handle_push(cpu, mmu, pair),
        Pop(pair) => stack::handle_pop(cpu, mmu, pair),
        Xthl => stack::handle_xthl(cpu, mmu),
        Sphl => stack::handle_sphl(cpu),

        // 輸入輸出
        In => io::handle_in(cpu, mmu, io),
        Out => io::handle_out(cpu, mmu, io),

        // 控制指令
        Nop => control::handle_nop(),
        Hlt => control::handle_hlt(cpu),
        Ei => control::handle_ei(cpu),
        Di => control::handle_di(cpu),
        Stc => control::handle_stc(cpu),
        Cmc => control::handle_cmc(cpu),
        Cma => control::handle_cma(cpu),
    }
}
