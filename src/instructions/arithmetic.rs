//! 算術與邏輯指令的處理模組
//!
//! 包含 ADD, ADC, SUB, SBB, ANA, XRA, ORA, CMP 及其立即數形式，以及 DAA 與 DAD

use super::AluOp;
use crate::cpu::{Cpu, Pair};
use crate::error::CpuError;

/// 處理累加器運算，結果寫回 A (CMP 除外)
pub fn handle_alu(cpu: &mut Cpu, op: AluOp, value: u8) {
    match op {
        AluOp::Add => add(cpu, value, 0),
        AluOp::Adc => {
            let carry = cpu.flags.cy as u8;
            add(cpu, value, carry)
        }
        AluOp::Sub => subtract(cpu, value, 0),
        AluOp::Sbb => {
            let borrow = cpu.flags.cy as u8;
            subtract(cpu, value, borrow)
        }
        AluOp::Ana => {
            let a = cpu.registers.a;
            cpu.flags.ac = ((a | value) & 0x08) != 0;
            cpu.flags.cy = false;
            cpu.registers.a = a & value;
            cpu.flags.set_zsp(cpu.registers.a);
        }
        AluOp::Xra => {
            cpu.registers.a ^= value;
            cpu.flags.cy = false;
            cpu.flags.ac = false;
            cpu.flags.set_zsp(cpu.registers.a);
        }
        AluOp::Ora => {
            cpu.registers.a |= value;
            cpu.flags.cy = false;
            cpu.flags.ac = false;
            cpu.flags.set_zsp(cpu.registers.a);
        }
        AluOp::Cmp => compare(cpu, value),
    }
}

fn add(cpu: &mut Cpu, value: u8, carry: u8) {
    let a = cpu.registers.a;
    let result = a as u16 + value as u16 + carry as u16;
    cpu.flags.ac = ((a & 0x0F) + (value & 0x0F) + carry) & 0xF0 != 0;
    cpu.flags.cy = result & 0x0F00 != 0;
    cpu.registers.a = result as u8;
    cpu.flags.set_zsp(cpu.registers.a);
}

// 以補數相加實作減法：A + !(value + borrow) + 1
// 進位旗標代表借位：高位元組沒有進位時設定
fn subtract(cpu: &mut Cpu, value: u8, borrow: u8) {
    let a = cpu.registers.a;
    let complement = !value.wrapping_add(borrow);
    let result = a as u16 + complement as u16 + 1;
    cpu.flags.ac = ((a & 0x0F) + (complement & 0x0F) + 1) & 0xF0 != 0;
    cpu.flags.cy = result & 0x0F00 == 0;
    cpu.registers.a = result as u8;
    cpu.flags.set_zsp(cpu.registers.a);
}

fn compare(cpu: &mut Cpu, value: u8) {
    let a = cpu.registers.a;
    let result = a as u16 + (!value) as u16 + 1;
    let difference = a.wrapping_sub(value);
    cpu.flags.cy = result & 0x0F00 == 0;
    cpu.flags.ac = ((a ^ difference ^ value) & 0x10) == 0;
    cpu.flags.set_zsp(difference);
}

/// 處理 DAA (十進位調整) 指令
pub fn handle_daa(cpu: &mut Cpu) -> Result<u32, CpuError> {
    let mut a = cpu.registers.a;
    if cpu.flags.ac || (a & 0x0F) > 9 {
        cpu.flags.ac = true;
        a = a.wrapping_add(0x06);
    }
    if cpu.flags.cy || (a >> 4) > 9 {
        cpu.flags.cy = true;
        a = a.wrapping_add(0x60);
    }
    cpu.registers.a = a;
    cpu.flags.set_zsp(a);
    Ok(4)
}

/// 處理 DAD (16 位元加法到 HL) 指令
pub fn handle_dad(cpu: &mut Cpu, pair: Pair) -> Result<u32, CpuError> {
    let sum = cpu.pair(pair) as u32 + cpu.get_hl() as u32;
    cpu.flags.cy = sum & 0x1_0000 != 0;
    match pair {
        // DAD SP 的結果寫回 SP 的低位元組，HL 不變
        Pair::SP => cpu.sp = (sum & 0xFF) as u16,
        _ => cpu.set_hl(sum as u16),
    }
    Ok(10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::test_support::run;

    fn alu(a: u8, op: AluOp, value: u8, carry: bool) -> Cpu {
        let mut cpu = Cpu::new();
        cpu.registers.a = a;
        cpu.flags.cy = carry;
        handle_alu(&mut cpu, op, value);
        cpu
    }

    #[test]
    fn test_add_sets_carry_and_aux() {
        let cpu = alu(0xFF, AluOp::Add, 0x01, false);
        assert_eq!(cpu.registers.a, 0x00);
        assert!(cpu.flags.cy);
        assert!(cpu.flags.ac);
        assert!(cpu.flags.z);
        assert!(cpu.flags.p);

        let cpu = alu(0x12, AluOp::Add, 0x34, true);
        assert_eq!(cpu.registers.a, 0x46);
        assert!(!cpu.flags.cy && !cpu.flags.ac);
    }

    #[test]
    fn test_adc_uses_carry() {
        let cpu = alu(0x0F, AluOp::Adc, 0x00, true);
        assert_eq!(cpu.registers.a, 0x10);
        assert!(cpu.flags.ac);
        assert!(!cpu.flags.cy);
    }

    #[test]
    fn test_sub_zero_minus_one_borrows() {
        let cpu = alu(0x00, AluOp::Sub, 0x01, false);
        assert_eq!(cpu.registers.a, 0xFF);
        assert!(cpu.flags.cy);
        assert!(cpu.flags.s);
        assert!(!cpu.flags.z);
        assert!(cpu.flags.p);
    }

    #[test]
    fn test_sub_without_borrow() {
        let cpu = alu(0x3E, AluOp::Sub, 0x3E, false);
        assert_eq!(cpu.registers.a, 0);
        assert!(cpu.flags.z);
        assert!(!cpu.flags.cy);
    }

    #[test]
    fn test_sbb_includes_borrow() {
        let cpu = alu(0x04, AluOp::Sbb, 0x02, true);
        assert_eq!(cpu.registers.a, 0x01);
        assert!(!cpu.flags.cy);
        let cpu = alu(0x02, AluOp::Sbb, 0x02, true);
        assert_eq!(cpu.registers.a, 0xFF);
        assert!(cpu.flags.cy);
    }

    #[test]
    fn test_logical_ops_clear_carry() {
        let cpu = alu(0xF0, AluOp::Ana, 0x3C, true);
        assert_eq!(cpu.registers.a, 0x30);
        assert!(!cpu.flags.cy);
        assert!(cpu.flags.ac); // 0xF0 | 0x3C 的位元 3 為 1

        let cpu = alu(0xFF, AluOp::Xra, 0xFF, true);
        assert_eq!(cpu.registers.a, 0);
        assert!(cpu.flags.z && !cpu.flags.cy && !cpu.flags.ac);

        let cpu = alu(0x01, AluOp::Ora, 0x80, true);
        assert_eq!(cpu.registers.a, 0x81);
        assert!(cpu.flags.s && !cpu.flags.cy && cpu.flags.p);
    }

    #[test]
    fn test_cmp_leaves_a_untouched() {
        let cpu = alu(0x05, AluOp::Cmp, 0x05, false);
        assert_eq!(cpu.registers.a, 0x05);
        assert!(cpu.flags.z);
        assert!(!cpu.flags.cy);

        let cpu = alu(0x02, AluOp::Cmp, 0x05, false);
        assert!(!cpu.flags.z);
        assert!(cpu.flags.cy);
        assert!(cpu.flags.s);

        let cpu = alu(0x05, AluOp::Cmp, 0x02, true);
        assert!(!cpu.flags.cy);
    }

    #[test]
    fn test_daa_adjusts_bcd() {
        let mut cpu = Cpu::new();
        cpu.registers.a = 0x9B;
        handle_daa(&mut cpu).unwrap();
        assert_eq!(cpu.registers.a, 0x01);
        assert!(cpu.flags.cy);
        assert!(cpu.flags.ac);

        let mut cpu = Cpu::new();
        cpu.registers.a = 0x15;
        handle_daa(&mut cpu).unwrap();
        assert_eq!(cpu.registers.a, 0x15);
        assert!(!cpu.flags.cy);
    }

    #[test]
    fn test_dad_carries_out_of_bit_16() {
        let mut cpu = Cpu::new();
        cpu.set_hl(0xFFFF);
        cpu.set_pair(Pair::BC, 0x0002);
        assert_eq!(handle_dad(&mut cpu, Pair::BC).unwrap(), 10);
        assert_eq!(cpu.get_hl(), 0x0001);
        assert!(cpu.flags.cy);
    }

    #[test]
    fn test_dad_sp_writes_low_byte_to_sp() {
        let mut cpu = Cpu::new();
        cpu.set_hl(0x1234);
        cpu.sp = 0x2300;
        handle_dad(&mut cpu, Pair::SP).unwrap();
        assert_eq!(cpu.sp, 0x34);
        assert_eq!(cpu.get_hl(), 0x1234);
    }

    #[test]
    fn test_immediate_forms_from_memory() {
        // MVI A,10 ; ADI 05 ; SUI 20 ; CPI F5
        let (cpu, _, cycles) = run(&[0x3E, 0x10, 0xC6, 0x05, 0xD6, 0x20, 0xFE, 0xF5], 4);
        assert_eq!(cpu.registers.a, 0xF5);
        assert!(cpu.flags.z);
        assert_eq!(cycles, 28);
        assert_eq!(cpu.pc, 8);
    }

    #[test]
    fn test_register_and_memory_operand_cycles() {
        // LXI H,2000 ; MVI M,03 ; MVI A,01 ; ADD M ; ADD A
        let (cpu, _, cycles) = run(&[0x21, 0x00, 0x20, 0x36, 0x03, 0x3E, 0x01, 0x86, 0x87], 5);
        assert_eq!(cpu.registers.a, 0x08);
        assert_eq!(cycles, 10 + 10 + 7 + 7 + 4);
    }
}
