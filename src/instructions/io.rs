//! 輸入輸出指令的處理模組
//!
//! IN / OUT 透過 [`IoBus`] 轉給埠橋接器

use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::mmu::Mmu;
use crate::ports::IoBus;

/// 處理 IN 指令
pub fn handle_in(cpu: &mut Cpu, mmu: &mut Mmu, io: &mut impl IoBus) -> Result<u32, CpuError> {
    let port = cpu.immediate_byte(mmu)?;
    cpu.registers.a = io.input(port);
    Ok(10)
}

/// 處理 OUT 指令
pub fn handle_out(cpu: &mut Cpu, mmu: &mut Mmu, io: &mut impl IoBus) -> Result<u32, CpuError> {
    let port = cpu.immediate_byte(mmu)?;
    io.output(port, cpu.registers.a);
    Ok(10)
}
