// ROM 載入 - 依設定把各個 ROM 檔放到程式記憶體

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::RomError;
use crate::mmu::Mmu;

/// 在 `dir` 底下 (不含子目錄) 找 `file`，不分大小寫
pub fn find_rom_file(dir: &Path, file: &str) -> Result<PathBuf, RomError> {
    let exact = dir.join(file);
    if exact.is_file() {
        return Ok(exact);
    }
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| entry.file_name().to_string_lossy().eq_ignore_ascii_case(file))
        .map(|entry| entry.into_path())
        .ok_or_else(|| RomError::NotFound {
            file: file.to_string(),
            dir: dir.to_path_buf(),
        })
}

pub fn read_rom_file(path: &Path) -> Result<Vec<u8>, RomError> {
    let data = fs::read(path).map_err(|source| RomError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if data.is_empty() {
        return Err(RomError::Empty(path.to_path_buf()));
    }
    Ok(data)
}

/// 把設定中列出的 ROM 全部載入新的記憶體映像
pub fn load_roms(config: &Config) -> Result<Mmu, RomError> {
    let mut mmu = Mmu::new();
    for entry in &config.roms {
        let path = find_rom_file(&config.rom_dir, &entry.file)?;
        let data = read_rom_file(&path)?;
        mmu.load(entry.address, &data)?;
        log::info!(
            "ROM {} ({} bytes) at {:04X}",
            path.display(),
            data.len(),
            entry.address
        );
    }
    Ok(mmu)
}
