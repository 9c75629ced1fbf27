// 錯誤型別 - 致命錯誤一律回傳給呼叫端，不直接結束行程

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArcadeError>;

/// 結束模擬的各種情況
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CpuError {
    #[error("memory access outside the address space: {address:#06X}")]
    AddressOutOfRange { address: u16 },
    #[error("undefined opcode {opcode:#04X} at PC={pc:#06X}")]
    UndefinedOpcode { opcode: u8, pc: u16 },
    #[error("processor halted at PC={pc:#06X}")]
    Halted { pc: u16 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dip switch SW{index} must be 0 or 1, got {value}")]
    DipSwitch { index: usize, value: u8 },
    #[error("ROM {file} mapped at {address:#06X}, outside the program area")]
    RomAddress { file: String, address: u16 },
    #[error("expected 10 sound samples, got {0}")]
    SampleCount(usize),
}

#[derive(Debug, Error)]
pub enum RomError {
    #[error("cannot read ROM {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ROM file {file} not found in {dir}")]
    NotFound { file: String, dir: PathBuf },
    #[error("ROM file {0} is empty")]
    Empty(PathBuf),
    #[error("{len} bytes at {address:#06X} do not fit into program memory")]
    DoesNotFit { address: u16, len: usize },
}

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error(transparent)]
    Cpu(#[from] CpuError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rom(#[from] RomError),
    #[error("sample {path}: {reason}")]
    Sample { path: PathBuf, reason: String },
    #[error("frontend: {0}")]
    Frontend(String),
}

impl ArcadeError {
    /// 程式執行了 HLT 時為 `true`，這是正常的結束方式
    pub fn is_halt(&self) -> bool {
        matches!(self, ArcadeError::Cpu(CpuError::Halted { .. }))
    }
}
