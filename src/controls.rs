// 機台控制 - 玩家按鍵、投幣、傾斜開關與 DIP 開關

/// 目前的按鍵狀態，由前端持有，連接埠只讀取
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inputs {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub start1: bool,
    pub start2: bool,
    pub coin: bool,
    pub tilt: bool,
    pub quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Fire,
    Start1,
    Start2,
    Coin,
    Tilt,
    Quit,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    // 更新按鍵狀態 (由外部轉送，如 SDL3)
    pub fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Left => self.left = pressed,
            Control::Right => self.right = pressed,
            Control::Fire => self.fire = pressed,
            Control::Start1 => self.start1 = pressed,
            Control::Start2 => self.start2 = pressed,
            Control::Coin => self.coin = pressed,
            Control::Tilt => self.tilt = pressed,
            // 離開只會被設定，不會因放開按鍵而取消
            Control::Quit => self.quit |= pressed,
        }
    }
}

/// 機台的八個 DIP 開關，SW1 在索引 0，`true` 表示 ON
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DipSwitches([bool; 8]);

impl DipSwitches {
    pub fn new(switches: [bool; 8]) -> Self {
        DipSwitches(switches)
    }

    /// 第 `number` 個開關 (從 1 起算，與電路板標示相同)
    pub fn sw(&self, number: usize) -> bool {
        self.0[number - 1]
    }

    /// 開關值轉成單一位元，由連接埠移到對應位置
    pub fn bit(&self, number: usize) -> u8 {
        self.sw(number) as u8
    }
}

impl From<[u8; 8]> for DipSwitches {
    fn from(values: [u8; 8]) -> Self {
        DipSwitches(values.map(|v| v != 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_release() {
        let mut inputs = Inputs::new();
        inputs.set(Control::Fire, true);
        inputs.set(Control::Left, true);
        assert!(inputs.fire && inputs.left);
        inputs.set(Control::Fire, false);
        assert!(!inputs.fire && inputs.left);
    }

    #[test]
    fn test_quit_latches() {
        let mut inputs = Inputs::new();
        inputs.set(Control::Quit, true);
        inputs.set(Control::Quit, false);
        assert!(inputs.quit);
    }

    #[test]
    fn test_dip_numbering() {
        let dips = DipSwitches::from([1, 0, 0, 0, 0, 0, 0, 1]);
        assert!(dips.sw(1));
        assert!(!dips.sw(2));
        assert_eq!(dips.bit(8), 1);
        assert_eq!(dips.bit(5), 0);
    }
}
