use std::path::PathBuf;
use std::process::ExitCode;

use rust_invaders::config::{Config, DEFAULT_CONFIG_FILE};
use rust_invaders::error::ArcadeError;
use rust_invaders::sdl3;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("=== 啟動 Space Invaders 模擬器 ===");

    // 第一個參數為設定檔路徑，未指定時使用 invaders.json
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let result = Config::load(&path)
        .map_err(ArcadeError::from)
        .and_then(sdl3::main);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_halt() => {
            log::info!("{}", err);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
