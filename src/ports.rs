// 埠橋接器 - IN/OUT 指令與機台硬體之間的轉接
// 包含輸入打包、DIP 開關、移位暫存器、音效觸發與畫面翻轉旗標

use crate::audio::SoundSink;
use crate::controls::{DipSwitches, Inputs};

/// CPU 的 IN 與 OUT 指令看到的連接埠
pub trait IoBus {
    fn input(&mut self, port: u8) -> u8;
    fn output(&mut self, port: u8, value: u8);
}

/// I/O 板在存取之間保存的狀態
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ports {
    shift_data: u16,
    shift_offset: u8,
    last_port3: u8, // 上一次寫入埠 3 的值
    last_port5: u8, // 上一次寫入埠 5 的值
    screen_flip: bool,
}

impl Ports {
    pub fn new() -> Self {
        Self::default()
    }

    // 讀取埠，按鍵與 DIP 開關由呼叫端提供
    pub fn read(&self, port: u8, inputs: &Inputs, dips: &DipSwitches) -> u8 {
        let controls =
            (inputs.fire as u8) << 4 | (inputs.left as u8) << 5 | (inputs.right as u8) << 6;
        match port {
            0 => {
                (1 - dips.bit(3))
                    | dips.bit(5) << 1
                    | dips.bit(6) << 2
                    | dips.bit(7) << 3
                    | controls
            }
            1 => {
                inputs.coin as u8
                    | (inputs.start2 as u8) << 1
                    | (inputs.start1 as u8) << 2
                    | 1 << 3
                    | controls
                    | 1 << 7
            }
            2 => {
                (1 - dips.bit(1))
                    | (1 - dips.bit(2)) << 1
                    | (inputs.tilt as u8) << 2
                    | (1 - dips.bit(4)) << 3
                    | controls
                    | (1 - dips.bit(8)) << 7
            }
            3 => (self.shift_data >> (8 - self.shift_offset)) as u8,
            _ => 0,
        }
    }

    // 寫入埠
    pub fn write(&mut self, port: u8, value: u8, sound: &mut dyn SoundSink) {
        match port {
            2 => self.shift_offset = value & 0x07,
            3 => {
                trigger_edges(self.last_port3, value, 0, sound);
                self.last_port3 = value;
            }
            4 => self.shift_data = (self.shift_data >> 8) | (value as u16) << 8,
            5 => {
                trigger_edges(self.last_port5, value, 5, sound);
                self.last_port5 = value;
                self.screen_flip = value & 0x20 != 0;
            }
            6 => log::trace!("watchdog {:02X}", value),
            _ => {}
        }
    }

    /// 雞尾酒台翻轉旗標，輪到玩家 2 時設定
    pub fn screen_flip(&self) -> bool {
        self.screen_flip
    }

    pub fn shift_data(&self) -> u16 {
        self.shift_data
    }

    pub fn shift_offset(&self) -> u8 {
        self.shift_offset
    }
}

// 位元 0-4 由 0 變 1 時播放對應音效
fn trigger_edges(previous: u8, value: u8, first_sample: u8, sound: &mut dyn SoundSink) {
    let rising = value & !previous;
    for bit in 0..5 {
        if rising & (1 << bit) != 0 {
            log::trace!("sound {}", first_sample + bit);
            sound.play(first_sample + bit);
        }
    }
}

/// 在一幀期間借用連接埠存取會用到的所有狀態
pub struct PortBus<'a> {
    pub ports: &'a mut Ports,
    pub inputs: &'a Inputs,
    pub dip_switches: &'a DipSwitches,
    pub sound: &'a mut dyn SoundSink,
}

impl std::fmt::Debug for PortBus<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortBus")
            .field("ports", &self.ports)
            .field("inputs", &self.inputs)
            .field("dip_switches", &self.dip_switches)
            .finish_non_exhaustive()
    }
}

impl IoBus for PortBus<'_> {
    fn input(&mut self, port: u8) -> u8 {
        self.ports.read(port, self.inputs, self.dip_switches)
    }

    fn output(&mut self, port: u8, value: u8) {
        self.ports.write(port, value, &mut *self.sound);
    }
}
