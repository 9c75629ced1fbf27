//! 跳轉和控制流指令的處理模組
//!
//! 這個模組負責處理 JMP, CALL, RET, RST, PCHL 及其條件形式。
//! 跳轉目標一律設為「目標 - 1」，由 `Cpu::step` 的固定加 1 補回。

use super::Condition;
use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::mmu::Mmu;

fn condition_met(cpu: &Cpu, condition: Option<Condition>) -> bool {
    condition.is_none_or(|c| c.holds(&cpu.flags))
}

/// 處理 JMP / Jcc 指令，成立與否都是 10 週期
pub fn handle_jmp(
    cpu: &mut Cpu,
    mmu: &mut Mmu,
    condition: Option<Condition>,
) -> Result<u32, CpuError> {
    let target = cpu.immediate_word(mmu)?;
    if condition_met(cpu, condition) {
        cpu.pc = target.wrapping_sub(1);
    }
    Ok(10)
}

/// 處理 CALL / Ccc 指令
pub fn handle_call(
    cpu: &mut Cpu,
    mmu: &mut Mmu,
    condition: Option<Condition>,
) -> Result<u32, CpuError> {
    let target = cpu.immediate_word(mmu)?;
    if !condition_met(cpu, condition) {
        return Ok(11);
    }
    // PC 此時指向運算元的最後一個位元組
    let return_address = cpu.pc.wrapping_add(1);
    cpu.push_word(mmu, return_address)?;
    cpu.pc = target.wrapping_sub(1);
    Ok(17)
}

/// 處理 RET / Rcc 指令
pub fn handle_ret(
    cpu: &mut Cpu,
    mmu: &mut Mmu,
    condition: Option<Condition>,
) -> Result<u32, CpuError> {
    if !condition_met(cpu, condition) {
        return Ok(5);
    }
    let address = cpu.pop_word(mmu)?;
    cpu.pc = address.wrapping_sub(1);
    Ok(if condition.is_some() { 11 } else { 10 })
}

/// 處理 RST 指令：推入下一個指令的位址並跳到 vector * 8
pub fn handle_rst(cpu: &mut Cpu, mmu: &mut Mmu, vector: u8) -> Result<u32, CpuError> {
    let return_address = cpu.pc.wrapping_add(1);
    let cycles = cpu.call_vector(mmu, vector, return_address)?;
    cpu.pc = cpu.pc.wrapping_sub(1);
    Ok(cycles)
}

/// 處理 PCHL 指令 (跳轉到 HL)
pub fn handle_pchl(cpu: &mut Cpu) -> Result<u32, CpuError> {
    cpu.pc = cpu.get_hl().wrapping_sub(1);
    Ok(5)
}
