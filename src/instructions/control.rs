//! 控制指令的處理模組
//!
//! 包含 NOP, HLT, DI, EI, STC, CMC, CMA

use crate::cpu::Cpu;
use crate::error::CpuError;

/// 處理 NOP 指令
pub fn handle_nop() -> Result<u32, CpuError> {
    Ok(4)
}

/// 處理 HLT 指令，結束執行並把 PC 留在 HLT 上
pub fn handle_hlt(cpu: &mut Cpu) -> Result<u32, CpuError> {
    log::info!("HLT at PC={:04X}", cpu.pc);
    Err(CpuError::Halted { pc: cpu.pc })
}

/// 處理 DI 指令 (停用中斷)
pub fn handle_di(cpu: &mut Cpu) -> Result<u32, CpuError> {
    cpu.interrupts_enabled = false;
    Ok(4)
}

/// 處理 EI 指令 (啟用中斷，立即生效)
pub fn handle_ei(cpu: &mut Cpu) -> Result<u32, CpuError> {
    cpu.interrupts_enabled = true;
    Ok(4)
}

/// 處理 STC 指令 (設定進位旗標)
pub fn handle_stc(cpu: &mut Cpu) -> Result<u32, CpuError> {
    cpu.flags.cy = true;
    Ok(4)
}

/// 處理 CMC 指令 (反轉進位旗標)
pub fn handle_cmc(cpu: &mut Cpu) -> Result<u32, CpuError> {
    cpu.flags.cy = !cpu.flags.cy;
    Ok(4)
}

/// 處理 CMA 指令 (累加器取補數)
pub fn handle_cma(cpu: &mut Cpu) -> Result<u32, CpuError> {
    cpu.registers.a = !cpu.registers.a;
    Ok(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::test_support::{run, run_on};

    #[test]
    fn test_halt_reports_its_address() {
        let (mut cpu, mut mmu, _) = run(&[0x00, 0x00, 0x76], 2);
        let err = run_on(&mut cpu, &mut mmu, 1).unwrap_err();
        assert_eq!(err, CpuError::Halted { pc: 2 });
        assert_eq!(cpu.pc, 2);
    }

    #[test]
    fn test_ei_di() {
        // EI ; DI ; EI
        let (cpu, _, cycles) = run(&[0xFB, 0xF3, 0xFB], 3);
        assert!(cpu.interrupts_enabled);
        assert_eq!(cycles, 12);
        let (cpu, _, _) = run(&[0xFB, 0xF3], 2);
        assert!(!cpu.interrupts_enabled);
    }

    #[test]
    fn test_carry_and_complement() {
        // STC ; CMC ; CMC ; CMA
        let (cpu, _, _) = run(&[0x37, 0x3F, 0x3F, 0x2F], 4);
        assert!(cpu.flags.cy);
        assert_eq!(cpu.registers.a, 0xFF);
        assert!(!cpu.flags.z);
    }
}
