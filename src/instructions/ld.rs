//! 資料搬移指令的處理模組
//!
//! 這個模組負責處理 MOV, MVI, LXI, STAX, LDAX, STA, LDA, SHLD, LHLD, XCHG

use crate::cpu::{Cpu, Operand, Pair};
use crate::error::CpuError;
use crate::mmu::Mmu;

/// 處理 MOV 指令
pub fn handle_mov(
    cpu: &mut Cpu,
    mmu: &mut Mmu,
    dst: Operand,
    src: Operand,
) -> Result<u32, CpuError> {
    let value = cpu.read_operand(mmu, src)?;
    cpu.write_operand(mmu, dst, value)?;
    Ok(if dst == Operand::Mem || src == Operand::Mem { 7 } else { 5 })
}

/// 處理 MVI 指令 (載入立即數)
pub fn handle_mvi(cpu: &mut Cpu, mmu: &mut Mmu, dst: Operand) -> Result<u32, CpuError> {
    let value = cpu.immediate_byte(mmu)?;
    cpu.write_operand(mmu, dst, value)?;
    Ok(if dst == Operand::Mem { 10 } else { 7 })
}

/// 處理 LXI 指令 (16 位元立即數)
pub fn handle_lxi(cpu: &mut Cpu, mmu: &mut Mmu, pair: Pair) -> Result<u32, CpuError> {
    let value = cpu.immediate_word(mmu)?;
    cpu.set_pair(pair, value);
    Ok(10)
}

/// 處理 STAX 指令：A 寫到 BC 或 DE 指向的位址
pub fn handle_stax(cpu: &mut Cpu, mmu: &mut Mmu, pair: Pair) -> Result<u32, CpuError> {
    mmu.write_byte(cpu.pair(pair), cpu.registers.a)?;
    Ok(7)
}

/// 處理 LDAX 指令
pub fn handle_ldax(cpu: &mut Cpu, mmu: &mut Mmu, pair: Pair) -> Result<u32, CpuError> {
    cpu.registers.a = mmu.read_byte(cpu.pair(pair))?;
    Ok(7)
}

/// 處理 STA 指令
pub fn handle_sta(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<u32, CpuError> {
    let address = cpu.immediate_word(mmu)?;
    mmu.write_byte(address, cpu.registers.a)?;
    Ok(13)
}

/// 處理 LDA 指令
pub fn handle_lda(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<u32, CpuError> {
    let address = cpu.immediate_word(mmu)?;
    cpu.registers.a = mmu.read_byte(address)?;
    Ok(13)
}

/// 處理 SHLD 指令：L 寫到 addr，H 寫到 addr+1
pub fn handle_shld(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<u32, CpuError> {
    let address = cpu.immediate_word(mmu)?;
    mmu.write_word(address, cpu.get_hl())?;
    Ok(16)
}

/// 處理 LHLD 指令
pub fn handle_lhld(cpu: &mut Cpu, mmu: &mut Mmu) -> Result<u32, CpuError> {
    let address = cpu.immediate_word(mmu)?;
    let value = mmu.read_word(address)?;
    cpu.set_hl(value);
    Ok(16)
}

/// 處理 XCHG 指令 (交換 HL 與 DE)
pub fn handle_xchg(cpu: &mut Cpu) -> Result<u32, CpuError> {
    let de = cpu.pair(Pair::DE);
    cpu.set_pair(Pair::DE, cpu.get_hl());
    cpu.set_hl(de);
    Ok(4)
}
