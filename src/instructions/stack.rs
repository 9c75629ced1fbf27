//! 堆疊指令的處理模組
//!
//! 這個模組負責處理 PUSH, POP, XTHL, SPHL

use crate::cpu::{Cpu, Pair};
use crate::error::CpuError;
use crate::mmu::Mmu;

/// 處理 PUSH 指令
pub fn handle_push(cpu: &mut Cpu, mmu: &mut Mmu, pair: Pair) -> Result<u32, CpuError> {
    cpu.push_word(mmu, cpu.pair(pair))?;
    Ok(11)
}

/// 處理 POP 指令
pub fn handle_pop(cpu: &mut Cpu, mmu: &mut Mmu, pair: Pair) -> Result<u32, CpuError> {
    let value = cpu.pop_word(mmu)?;
    cpu.set_pair(pair, value);
    Ok(10)
}

/// 處理 XTHL 指令：L 與 (SP)、H 與 (SP+1) 交換
pub fn handle_xthl(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<u32, CpuError> {
    let top = mmu.read_word(cpu.sp)?;
    mmu.write_word(cpu.sp, cpu.get_hl())?;
    cpu.set_hl(top);
    Ok(18)
}

/// 處理 SPHL 指令
pub fn handle_sphl(cpu: &mut Cpu) -> Result<u32, CpuError> {
    cpu.sp = cpu.get_hl();
    Ok(5)
}
