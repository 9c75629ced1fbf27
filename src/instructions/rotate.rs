//! 旋轉指令的處理模組
//!
//! 包含 RLC, RRC, RAL, RAR；只影響累加器與進位旗標

use crate::cpu::Cpu;
use crate::error::CpuError;

/// 處理 RLC 指令 (向左旋轉累加器)
pub fn handle_rlc(cpu: &mut Cpu) -> Result<u32, CpuError> {
    let a = cpu.registers.a;
    cpu.flags.cy = a & 0x80 != 0;
    cpu.registers.a = a.rotate_left(1);
    Ok(4)
}

/// 處理 RRC 指令 (向右旋轉累加器)
pub fn handle_rrc(cpu: &mut Cpu) -> Result<u32, CpuError> {
    let a = cpu.registers.a;
    cpu.flags.cy = a & 0x01 != 0;
    cpu.registers.a = a.rotate_right(1);
    Ok(4)
}

/// 處理 RAL 指令 (經由進位向左旋轉)
pub fn handle_ral(cpu: &mut Cpu) -> Result<u32, CpuError> {
    let a = cpu.registers.a;
    let carry_in = cpu.flags.cy as u8;
    cpu.flags.cy = a & 0x80 != 0;
    cpu.registers.a = (a << 1) | carry_in;
    Ok(4)
}

/// 處理 RAR 指令 (經由進位向右旋轉)
pub fn handle_rar(cpu: &mut Cpu) -> Result<u32, CpuError> {
    let a = cpu.registers.a;
    let carry_in = cpu.flags.cy as u8;
    cpu.flags.cy = a & 0x01 != 0;
    cpu.registers.a = (a >> 1) | (carry_in << 7);
    Ok(4)
}
