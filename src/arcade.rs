// Space Invaders 機台主結構 - CPU、記憶體、I/O 板與畫面排程

use std::time::Duration;

use crate::audio::SoundSink;
use crate::controls::{DipSwitches, Inputs};
use crate::cpu::Cpu;
use crate::error::{CpuError, Result};
use crate::interrupts::Interrupt;
use crate::mmu::Mmu;
use crate::ports::{PortBus, Ports};
use crate::timer::{CYCLES_PER_FRAME, FramePacer};

/// 模擬器的主機端：輸入、畫面與音效輸出
pub trait Frontend {
    /// 更新 `inputs`，每幀開始前呼叫一次
    fn poll_input(&mut self, inputs: &mut Inputs);
    /// 顯示完成的一幀 (1 bpp 視訊 RAM)
    fn present(&mut self, frame_buffer: &[u8], screen_flip: bool) -> Result<()>;
    fn sound(&mut self) -> &mut dyn SoundSink;
}

/// 一幀模擬的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// 這幀執行的週期數，包含中斷進入
    pub cycles: u64,
    /// 這幀超過更新週期時設定
    pub overrun: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Checkpoint {
    MidScreen,
    VBlank,
}

#[derive(Debug)]
pub struct Arcade {
    pub cpu: Cpu,
    pub mmu: Mmu,
    pub ports: Ports,
    pub inputs: Inputs,
    pub dip_switches: DipSwitches,
    pub frames: u64,
    pub cycles: u64,
    carry: f64,
}

impl Arcade {
    /// 用已載入程式的記憶體映像建立機台
    pub fn new(mmu: Mmu, dip_switches: DipSwitches) -> Self {
        Arcade {
            cpu: Cpu::new(),
            mmu,
            ports: Ports::new(),
            inputs: Inputs::new(),
            dip_switches,
            frames: 0,
            cycles: 0,
            carry: 0.0,
        }
    }

    /// 上一幀多跑的週期，已計入下一幀
    pub fn carry(&self) -> f64 {
        self.carry
    }

    // 執行一個完整的幀：半幀時觸發 RST 1，滿幀時觸發 RST 2
    pub fn run_frame(&mut self, sound: &mut dyn SoundSink) -> std::result::Result<u64, CpuError> {
        let half = CYCLES_PER_FRAME / 2.0;
        let mut count = self.carry;
        let mut executed = 0u64;
        let mut checkpoint = Checkpoint::MidScreen;
        let mut bus = PortBus {
            ports: &mut self.ports,
            inputs: &self.inputs,
            dip_switches: &self.dip_switches,
            sound,
        };

        loop {
            executed += self.cpu.step(&mut self.mmu, &mut bus)? as u64;

            if checkpoint == Checkpoint::MidScreen && count + executed as f64 >= half {
                checkpoint = Checkpoint::VBlank;
                executed += self.cpu.interrupt(&mut self.mmu, Interrupt::MidScreen)? as u64;
            }
            if checkpoint == Checkpoint::VBlank && count + executed as f64 >= CYCLES_PER_FRAME {
                executed += self.cpu.interrupt(&mut self.mmu, Interrupt::VBlank)? as u64;
                break;
            }
        }

        // 超出的週期從下一幀的預算扣除
        count += executed as f64;
        self.carry = count - CYCLES_PER_FRAME;
        self.cycles += executed;
        self.frames += 1;
        Ok(executed)
    }

    /// 一幀加上限速，主迴圈重複的單位
    pub fn tick(&mut self, sound: &mut dyn SoundSink, pacer: &mut FramePacer) -> Result<FrameReport> {
        let cycles = self.run_frame(sound)?;
        let overrun = pacer.wait();
        if let Some(elapsed) = overrun {
            log::warn!(
                "frame {} overran: {:?} (budget {:?})",
                self.frames,
                elapsed,
                pacer.period()
            );
        }
        Ok(FrameReport { cycles, overrun })
    }

    /// 持續執行直到前端設定離開旗標或發生致命錯誤
    pub fn run(&mut self, frontend: &mut dyn Frontend, pacer: &mut FramePacer) -> Result<()> {
        while !self.inputs.quit {
            frontend.poll_input(&mut self.inputs);
            self.tick(frontend.sound(), pacer)?;
            frontend.present(self.mmu.frame_buffer(), self.ports.screen_flip())?;
        }
        log::info!("quit after {} frames, {} cycles", self.frames, self.cycles);
        Ok(())
    }
}
