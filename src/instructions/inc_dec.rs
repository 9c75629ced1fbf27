//! 增減指令的處理模組
//!
//! 這個模組負責處理 INR, DCR, INX, DCX 等增減指令

use crate::cpu::{Cpu, Operand, Pair};
use crate::error::CpuError;
use crate::mmu::Mmu;

fn operand_cycles(operand: Operand) -> u32 {
    if operand == Operand::Mem { 10 } else { 5 }
}

/// 處理 INR 指令，不影響進位旗標
pub fn handle_inr(cpu: &mut Cpu, mmu: &mut Mmu, operand: Operand) -> Result<u32, CpuError> {
    let result = cpu.read_operand(mmu, operand)?.wrapping_add(1);
    cpu.write_operand(mmu, operand, result)?;
    cpu.flags.set_zsp(result);
    cpu.flags.ac = (result & 0x0F) == 0;
    Ok(operand_cycles(operand))
}

/// 處理 DCR 指令，不影響進位旗標
pub fn handle_dcr(cpu: &mut Cpu, mmu: &mut Mmu, operand: Operand) -> Result<u32, CpuError> {
    let result = cpu.read_operand(mmu, operand)?.wrapping_sub(1);
    cpu.write_operand(mmu, operand, result)?;
    cpu.flags.set_zsp(result);
    cpu.flags.ac = (result & 0x0F) != 0x0F;
    Ok(operand_cycles(operand))
}

/// 處理 INX 指令 (16 位元，不影響旗標)
pub fn handle_inx(cpu: &mut Cpu, pair: Pair) -> Result<u32, CpuError> {
    cpu.set_pair(pair, cpu.pair(pair).wrapping_add(1));
    Ok(5)
}

/// 處理 DCX 指令 (16 位元，不影響旗標)
pub fn handle_dcx(cpu: &mut Cpu, pair: Pair) -> Result<u32, CpuError> {
    cpu.set_pair(pair, cpu.pair(pair).wrapping_sub(1));
    Ok(5)
}
