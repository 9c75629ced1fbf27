// Intel 8080 CPU 核心 - 暫存器、旗標、堆疊與單步執行

use crate::error::CpuError;
use crate::instructions::{self, Instruction};
use crate::mmu::Mmu;
use crate::ports::IoBus;

/// 8 位元暫存器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// 8 位元運算元：暫存器或 (HL) 指向的記憶體
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Mem,
}

impl Operand {
    /// 解碼操作碼中的 3 位元暫存器欄位
    pub fn from_code(code: u8) -> Self {
        match code & 0x07 {
            0 => Operand::Reg(Reg::B),
            1 => Operand::Reg(Reg::C),
            2 => Operand::Reg(Reg::D),
            3 => Operand::Reg(Reg::E),
            4 => Operand::Reg(Reg::H),
            5 => Operand::Reg(Reg::L),
            6 => Operand::Mem,
            _ => Operand::Reg(Reg::A),
        }
    }
}

/// 16 位元暫存器對
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pair {
    BC,
    DE,
    HL,
    SP,
    /// A 與旗標位元組，只用於 PUSH/POP
    PSW,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub z: bool,  // Zero
    pub s: bool,  // Sign
    pub p: bool,  // Parity (even)
    pub cy: bool, // Carry
    pub ac: bool, // Auxiliary carry
}

impl Flags {
    /// 打包成 PSW 位元組：S Z 0 AC 0 P 1 CY
    pub fn to_byte(self) -> u8 {
        let mut f = 0x02u8;
        if self.s {
            f |= 0x80;
        }
        if self.z {
            f |= 0x40;
        }
        if self.ac {
            f |= 0x10;
        }
        if self.p {
            f |= 0x04;
        }
        if self.cy {
            f |= 0x01;
        }
        f
    }

    pub fn from_byte(value: u8) -> Self {
        Flags {
            s: value & 0x80 != 0,
            z: value & 0x40 != 0,
            ac: value & 0x10 != 0,
            p: value & 0x04 != 0,
            cy: value & 0x01 != 0,
        }
    }

    /// Z、S 與 P 由結果的低位元組決定
    pub fn set_zsp(&mut self, value: u8) {
        self.z = value == 0;
        self.s = value & 0x80 != 0;
        self.p = value.count_ones() % 2 == 0;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
}

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    pub pc: u16,                 // 程式計數器
    pub sp: u16,                 // 堆疊指標
    pub registers: Registers,    // 暫存器
    pub flags: Flags,            // CPU 旗標
    pub interrupts_enabled: bool, // 中斷啟用 (EI/DI)
    pub instr_count: u64,        // 已執行指令數
}

impl Cpu {
    /// 開機狀態：全部歸零，中斷關閉
    pub fn new() -> Self {
        Self::default()
    }

    // 執行一個指令，回傳消耗的週期數
    pub fn step(&mut self, mmu: &mut Mmu, io: &mut impl IoBus) -> Result<u32, CpuError> {
        let opcode = mmu.read_byte(self.pc)?;
        let Some(instruction) = Instruction::decode(opcode) else {
            log::error!("undefined opcode {:02X} at PC={:04X}", opcode, self.pc);
            return Err(CpuError::UndefinedOpcode {
                opcode,
                pc: self.pc,
            });
        };

        self.instr_count += 1;
        let cycles = instructions::execute_instruction(self, mmu, io, instruction)?;
        // 每個指令處理完畢後 PC 固定再加 1，處理器只需前進運算元的長度
        self.pc = self.pc.wrapping_add(1);
        Ok(cycles)
    }

    // 讀取 PC 之後的立即位元組
    pub fn immediate_byte(&mut self, mmu: &Mmu) -> Result<u8, CpuError> {
        let byte = mmu.read_byte(self.pc.wrapping_add(1))?;
        self.pc = self.pc.wrapping_add(1);
        Ok(byte)
    }

    // 讀取 PC 之後的立即字 (低位元組在前)
    pub fn immediate_word(&mut self, mmu: &Mmu) -> Result<u16, CpuError> {
        let word = mmu.read_word(self.pc.wrapping_add(1))?;
        self.pc = self.pc.wrapping_add(2);
        Ok(word)
    }

    // 堆疊操作：高位元組在 SP-1，低位元組在 SP-2
    pub fn push_word(&mut self, mmu: &mut Mmu, value: u16) -> Result<(), CpuError> {
        mmu.write_byte(self.sp.wrapping_sub(1), (value >> 8) as u8)?;
        mmu.write_byte(self.sp.wrapping_sub(2), (value & 0xFF) as u8)?;
        self.sp = self.sp.wrapping_sub(2);
        Ok(())
    }

    pub fn pop_word(&mut self, mmu: &Mmu) -> Result<u16, CpuError> {
        let value = mmu.read_word(self.sp)?;
        self.sp = self.sp.wrapping_add(2);
        Ok(value)
    }

    /// 推入 `return_address` 後跳到 `vector * 8`；RST 與外部中斷共用，固定 11 週期
    pub fn call_vector(
        &mut self,
        mmu: &mut Mmu,
        vector: u8,
        return_address: u16,
    ) -> Result<u32, CpuError> {
        self.push_word(mmu, return_address)?;
        self.pc = ((vector & 0x07) as u16) << 3;
        Ok(11)
    }

    // 暫存器訪問方法
    pub fn reg(&self, reg: Reg) -> u8 {
        match reg {
            Reg::A => self.registers.a,
            Reg::B => self.registers.b,
            Reg::C => self.registers.c,
            Reg::D => self.registers.d,
            Reg::E => self.registers.e,
            Reg::H => self.registers.h,
            Reg::L => self.registers.l,
        }
    }

    pub fn set_reg(&mut self, reg: Reg, value: u8) {
        match reg {
            Reg::A => self.registers.a = value,
            Reg::B => self.registers.b = value,
            Reg::C => self.registers.c = value,
            Reg::D => self.registers.d = value,
            Reg::E => self.registers.e = value,
            Reg::H => self.registers.h = value,
            Reg::L => self.registers.l = value,
        }
    }

    pub fn pair(&self, pair: Pair) -> u16 {
        let join = |high: u8, low: u8| ((high as u16) << 8) | low as u16;
        match pair {
            Pair::BC => join(self.registers.b, self.registers.c),
            Pair::DE => join(self.registers.d, self.registers.e),
            Pair::HL => join(self.registers.h, self.registers.l),
            Pair::SP => self.sp,
            Pair::PSW => join(self.registers.a, self.flags.to_byte()),
        }
    }

    pub fn set_pair(&mut self, pair: Pair, value: u16) {
        let high = (value >> 8) as u8;
        let low = (value & 0xFF) as u8;
        match pair {
            Pair::BC => {
                self.registers.b = high;
                self.registers.c = low;
            }
            Pair::DE => {
                self.registers.d = high;
                self.registers.e = low;
            }
            Pair::HL => {
                self.registers.h = high;
                self.registers.l = low;
            }
            Pair::SP => self.sp = value,
            Pair::PSW => {
                self.registers.a = high;
                self.flags = Flags::from_byte(low);
            }
        }
    }

    pub fn get_hl(&self) -> u16 {
        self.pair(Pair::HL)
    }

    pub fn set_hl(&mut self, value: u16) {
        self.set_pair(Pair::HL, value);
    }

    pub fn read_operand(&self, mmu: &Mmu, operand: Operand) -> Result<u8, CpuError> {
        match operand {
            Operand::Reg(reg) => Ok(self.reg(reg)),
            Operand::Mem => mmu.read_byte(self.get_hl()),
        }
    }

    pub fn write_operand(
        &mut self,
        mmu: &mut Mmu,
        operand: Operand,
        value: u8,
    ) -> Result<(), CpuError> {
        match operand {
            Operand::Reg(reg) => {
                self.set_reg(reg, value);
                Ok(())
            }
            Operand::Mem => mmu.write_byte(self.get_hl(), value),
        }
    }
}
