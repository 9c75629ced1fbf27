// 設定檔 - invaders.json，缺少的欄位使用原版 Space Invaders 的預設值

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::SAMPLE_COUNT;
use crate::controls::DipSwitches;
use crate::error::ConfigError;
use crate::mmu::ROM_SIZE;

pub const DEFAULT_CONFIG_FILE: &str = "invaders.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RomEntry {
    pub file: String,
    pub address: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// 玻璃紙色片
    pub color: bool,
    /// 像機台一樣把畫面轉正
    pub rotate: bool,
    /// 垂直鏡像，給透過半透明鏡子觀看的機台使用
    pub flip: bool,
    pub fullscreen: bool,
    /// 在遊戲畫面下方繪製背景圖
    pub background: bool,
    /// 背景圖檔 (BMP)，相對於工作目錄
    pub background_image: PathBuf,
    /// 雞尾酒台：玩家 2 時跟隨遊戲的翻轉訊號
    pub cocktail_flip: bool,
    pub scale: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            color: true,
            rotate: true,
            flip: false,
            fullscreen: false,
            background: false,
            background_image: PathBuf::from("background.bmp"),
            cocktail_flip: false,
            scale: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub rom_dir: PathBuf,
    pub roms: Vec<RomEntry>,
    pub sample_dir: PathBuf,
    pub samples: Vec<String>,
    pub dip_switches: [u8; 8],
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        let roms = [
            ("invaders.h", 0x0000),
            ("invaders.g", 0x0800),
            ("invaders.f", 0x1000),
            ("invaders.e", 0x1800),
        ]
        .into_iter()
        .map(|(file, address)| RomEntry {
            file: file.to_string(),
            address,
        })
        .collect();

        Config {
            rom_dir: PathBuf::from("rom"),
            roms,
            sample_dir: PathBuf::from("samples"),
            samples: (0..SAMPLE_COUNT).map(|i| format!("{}.wav", i)).collect(),
            dip_switches: [0, 0, 0, 1, 1, 1, 1, 0],
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// 讀取並驗證設定檔
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((index, &value)) = self
            .dip_switches
            .iter()
            .enumerate()
            .find(|&(_, &v)| v > 1)
        {
            return Err(ConfigError::DipSwitch {
                index: index + 1,
                value,
            });
        }
        if let Some(rom) = self.roms.iter().find(|r| r.address as usize >= ROM_SIZE) {
            return Err(ConfigError::RomAddress {
                file: rom.file.clone(),
                address: rom.address,
            });
        }
        if !self.samples.is_empty() && self.samples.len() != SAMPLE_COUNT {
            return Err(ConfigError::SampleCount(self.samples.len()));
        }
        Ok(())
    }

    pub fn dip_switches(&self) -> DipSwitches {
        DipSwitches::from(self.dip_switches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_the_stock_set() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.roms.len(), 4);
        assert_eq!(config.roms[3].file, "invaders.e");
        assert_eq!(config.roms[3].address, 0x1800);
        assert_eq!(config.samples[9], "9.wav");
        assert!(config.display.rotate);
        assert_eq!(config.display.scale, 3);
        assert!(!config.display.background);
        assert_eq!(config.display.background_image, PathBuf::from("background.bmp"));
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json(
            r#"{ "rom_dir": "/opt/roms", "display": { "color": false, "scale": 2 } }"#,
        )
        .unwrap();
        assert_eq!(config.rom_dir, PathBuf::from("/opt/roms"));
        assert!(!config.display.color);
        assert!(config.display.rotate);
        assert_eq!(config.display.scale, 2);
        assert_eq!(config.roms, Config::default().roms);
    }

    #[test]
    fn test_background_artwork_path() {
        let config = Config::from_json(
            r#"{ "display": { "background": true, "background_image": "art/cabinet.bmp" } }"#,
        )
        .unwrap();
        assert!(config.display.background);
        assert_eq!(config.display.background_image, PathBuf::from("art/cabinet.bmp"));
    }

    #[test]
    fn test_dip_switch_validation() {
        let err = Config::from_json(r#"{ "dip_switches": [0,0,2,0,0,0,0,0] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::DipSwitch { index: 3, value: 2 }));
        assert!(Config::from_json(r#"{ "dip_switches": [0,0,0] }"#).is_err());
    }

    #[test]
    fn test_rom_address_validation() {
        let err = Config::from_json(r#"{ "roms": [ { "file": "x.bin", "address": 8192 } ] }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::RomAddress { address: 0x2000, .. }));
    }

    #[test]
    fn test_sample_count_validation() {
        let err = Config::from_json(r#"{ "samples": ["a.wav", "b.wav"] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::SampleCount(2)));
        assert!(Config::from_json(r#"{ "samples": [] }"#).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Config::from_json("{ rom_dir: 1 }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/invaders.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_dip_switch_conversion() {
        let dips = Config::default().dip_switches();
        assert!(!dips.sw(1));
        assert!(dips.sw(4));
        assert!(!dips.sw(8));
    }
}
