// 記憶體管理單元 (MMU) - 8K ROM + 8K RAM，RAM 在 0x4000-0x5FFF 有鏡像

use crate::error::{CpuError, RomError};

/// 程式 ROM 位於 0x0000-0x1FFF，寫入會被忽略
pub const ROM_SIZE: usize = 0x2000;
/// 實際安裝的記憶體：8K ROM 之後接 8K RAM
pub const PHYSICAL_SIZE: usize = 0x4000;
/// 邏輯位址空間之後的第一個位址
pub const ADDRESS_LIMIT: u16 = 0x6000;
/// 鏡像 0x2000-0x3FFF 的區段起點
pub const MIRROR_START: u16 = 0x4000;
const MIRROR_OFFSET: u16 = 0x2000;

/// 每像素 1 位元的視訊 RAM，256x224，依 CRT 掃描順序
pub const FRAME_BUFFER_START: u16 = 0x2400;
pub const FRAME_BUFFER_LEN: usize = 0x1C00;

#[derive(Debug, Clone)]
pub struct Mmu {
    memory: Vec<u8>,
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}

impl Mmu {
    pub fn new() -> Self {
        Mmu {
            memory: vec![0; PHYSICAL_SIZE],
        }
    }

    /// 把邏輯位址對應到實際的記憶體位置
    #[inline]
    fn translate(address: u16) -> Result<usize, CpuError> {
        match address {
            0x0000..MIRROR_START => Ok(address as usize),
            MIRROR_START..ADDRESS_LIMIT => Ok((address - MIRROR_OFFSET) as usize),
            _ => Err(CpuError::AddressOutOfRange { address }),
        }
    }

    pub fn read_byte(&self, address: u16) -> Result<u8, CpuError> {
        Self::translate(address).map(|index| self.memory[index])
    }

    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), CpuError> {
        // ROM 區域的寫入直接忽略
        if (address as usize) < ROM_SIZE {
            return Ok(());
        }
        let index = Self::translate(address)?;
        self.memory[index] = value;
        Ok(())
    }

    /// 讀取 `address` 的 16 位元值 (小端序)
    pub fn read_word(&self, address: u16) -> Result<u16, CpuError> {
        let low = self.read_byte(address)?;
        let high = self.read_byte(address.wrapping_add(1))?;
        Ok(((high as u16) << 8) | low as u16)
    }

    pub fn write_word(&mut self, address: u16, value: u16) -> Result<(), CpuError> {
        self.write_byte(address, (value & 0xFF) as u8)?;
        self.write_byte(address.wrapping_add(1), (value >> 8) as u8)
    }

    /// 把程式映像複製進 ROM，不受寫入保護限制
    pub fn load(&mut self, address: u16, data: &[u8]) -> Result<(), RomError> {
        let start = address as usize;
        let end = start + data.len();
        if end > ROM_SIZE {
            return Err(RomError::DoesNotFit {
                address,
                len: data.len(),
            });
        }
        self.memory[start..end].copy_from_slice(data);
        log::debug!("loaded {} bytes at {:04X}", data.len(), address);
        Ok(())
    }

    /// 視訊 RAM 區段，每幀由繪圖器讀取一次
    pub fn frame_buffer(&self) -> &[u8] {
        let start = FRAME_BUFFER_START as usize;
        &self.memory[start..start + FRAME_BUFFER_LEN]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rom_writes_are_ignored() {
        let mut mmu = Mmu::new();
        mmu.load(0x0100, &[0xAA]).unwrap();
        mmu.write_byte(0x0100, 0x55).unwrap();
        assert_eq!(mmu.read_byte(0x0100).unwrap(), 0xAA);
        mmu.write_byte(0x1FFF, 0x55).unwrap();
        assert_eq!(mmu.read_byte(0x1FFF).unwrap(), 0x00);
    }

    #[test]
    fn test_ram_is_writable() {
        let mut mmu = Mmu::new();
        mmu.write_byte(0x2000, 0x12).unwrap();
        mmu.write_byte(0x3FFF, 0x34).unwrap();
        assert_eq!(mmu.read_byte(0x2000).unwrap(), 0x12);
        assert_eq!(mmu.read_byte(0x3FFF).unwrap(), 0x34);
    }

    #[test]
    fn test_mirror_edges() {
        let mut mmu = Mmu::new();
        mmu.write_byte(0x4000, 0x01).unwrap();
        mmu.write_byte(0x5FFF, 0x02).unwrap();
        assert_eq!(mmu.read_byte(0x2000).unwrap(), 0x01);
        assert_eq!(mmu.read_byte(0x3FFF).unwrap(), 0x02);
    }

    #[test]
    fn test_out_of_range_is_fatal() {
        let mut mmu = Mmu::new();
        assert_eq!(
            mmu.read_byte(0x6000),
            Err(CpuError::AddressOutOfRange { address: 0x6000 })
        );
        assert_eq!(
            mmu.write_byte(0xFFFF, 0),
            Err(CpuError::AddressOutOfRange { address: 0xFFFF })
        );
    }

    #[test]
    fn test_word_is_little_endian() {
        let mut mmu = Mmu::new();
        mmu.write_word(0x2100, 0xBEEF).unwrap();
        assert_eq!(mmu.read_byte(0x2100).unwrap(), 0xEF);
        assert_eq!(mmu.read_byte(0x2101).unwrap(), 0xBE);
        assert_eq!(mmu.read_word(0x2100).unwrap(), 0xBEEF);
    }

    #[test]
    fn test_load_rejects_overflowing_image() {
        let mut mmu = Mmu::new();
        let image = vec![0u8; 0x900];
        assert!(matches!(
            mmu.load(0x1800, &image),
            Err(RomError::DoesNotFit { address: 0x1800, len: 0x900 })
        ));
        assert!(mmu.load(0x1800, &image[..0x800]).is_ok());
    }

    #[test]
    fn test_frame_buffer_window() {
        let mut mmu = Mmu::new();
        mmu.write_byte(0x2400, 0x81).unwrap();
        mmu.write_byte(0x3FFF, 0x7E).unwrap();
        let fb = mmu.frame_buffer();
        assert_eq!(fb.len(), 7168);
        assert_eq!(fb[0], 0x81);
        assert_eq!(fb[fb.len() - 1], 0x7E);
    }

    proptest! {
        #[test]
        fn mirror_write_is_visible_below(address in 0x4000u16..0x6000, value in any::<u8>()) {
            let mut mmu = Mmu::new();
            mmu.write_byte(address, value).unwrap();
            prop_assert_eq!(mmu.read_byte(address - 0x2000).unwrap(), value);
            prop_assert_eq!(mmu.read_byte(address).unwrap(), value);
        }

        #[test]
        fn ram_write_is_visible_in_mirror(address in 0x2000u16..0x4000, value in any::<u8>()) {
            let mut mmu = Mmu::new();
            mmu.write_byte(address, value).unwrap();
            prop_assert_eq!(mmu.read_byte(address + 0x2000).unwrap(), value);
        }

        #[test]
        fn rom_never_changes(address in 0u16..0x2000, value in any::<u8>()) {
            let mut mmu = Mmu::new();
            let before = mmu.read_byte(address).unwrap();
            mmu.write_byte(address, value).unwrap();
            prop_assert_eq!(mmu.read_byte(address).unwrap(), before);
        }
    }
}
