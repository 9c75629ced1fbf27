//! Space Invaders 街機模擬器核心
//!
//! Intel 8080 CPU、64K 位址空間中的 ROM/RAM 配置、機台 I/O 板
//! (輸入、DIP 開關、移位暫存器、音效觸發) 以及每幀兩次中斷的排程。
//! 視窗與音訊輸出由 `frontend` 功能中的 SDL3 前端提供。

pub mod arcade;
pub mod audio;
pub mod config;
pub mod controls;
pub mod cpu;
pub mod error;
pub mod instructions;
pub mod interrupts;
pub mod mmu;
pub mod ports;
pub mod rom;
pub mod timer;
pub mod video;

#[cfg(feature = "frontend")]
pub mod sdl3;

pub use arcade::{Arcade, Frontend, FrameReport};
pub use config::Config;
pub use cpu::Cpu;
pub use error::{ArcadeError, CpuError, Result};
pub use mmu::Mmu;
