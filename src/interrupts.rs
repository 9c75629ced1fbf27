// 中斷控制 - 由排程器在畫面中段與結尾觸發 RST 1 / RST 2

use crate::cpu::Cpu;
use crate::error::CpuError;
use crate::mmu::Mmu;

/// 機台每幀產生的兩個視訊中斷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// 電子束到達畫面中央
    MidScreen,
    /// 電子束到達底部，開始垂直遮沒
    VBlank,
}

impl Interrupt {
    pub fn vector(self) -> u8 {
        match self {
            Interrupt::MidScreen => 1,
            Interrupt::VBlank => 2,
        }
    }
}

impl Cpu {
    /// 從外部送入 RST `vector`。中斷關閉時忽略 (0 週期)；
    /// 否則關閉中斷，推入下一個指令的位址並跳到 `vector * 8`
    pub fn raise(&mut self, mmu: &mut Mmu, vector: u8) -> Result<u32, CpuError> {
        if !self.interrupts_enabled {
            return Ok(0);
        }
        self.interrupts_enabled = false;
        let return_address = self.pc;
        self.call_vector(mmu, vector, return_address)
    }

    pub fn interrupt(&mut self, mmu: &mut Mmu, interrupt: Interrupt) -> Result<u32, CpuError> {
        self.raise(mmu, interrupt.vector())
    }
}
