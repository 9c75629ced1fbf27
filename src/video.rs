// 影像合成 - 把 1 bpp 的視訊 RAM 轉為 RGBA，加上玻璃紙色片、旋轉與翻轉

use crate::config::DisplayConfig;
use crate::mmu::FRAME_BUFFER_LEN;

/// CRT 掃描方向的畫面寬度 (機台的螢幕是側放的)
pub const GAME_WIDTH: usize = 256;
pub const GAME_HEIGHT: usize = 224;
/// 把 256x224 拉成 4:3 畫面的水平比例
pub const STRETCH_4_3: f32 = 1.16375;

pub type Rgba = [u8; 4];

const LIT: Rgba = [0xFF, 0xFF, 0xFF, 0xFF];
const CLEAR: Rgba = [0x00, 0x00, 0x00, 0x00];
const CELLOPHANE_GREEN: Rgba = [0x00, 0xFF, 0x00, 0x80];
// Taito 機台的紅色玻璃紙偏洋紅
const CELLOPHANE_RED: Rgba = [0x6D, 0x00, 0xF5, 0xA0];

/// 掃描座標 (x, y) 上的玻璃紙顏色
pub fn cellophane(x: usize, y: usize) -> Rgba {
    if x > 191 && x < 224 {
        CELLOPHANE_RED
    } else if (16..64).contains(&x) || (x < 16 && y > 25 && y < 136) {
        CELLOPHANE_GREEN
    } else {
        CLEAR
    }
}

/// 乘法混合：`dst = src * dst + dst * (1 - src_alpha)`，保留原本的 alpha
fn multiply(dst: Rgba, filter: Rgba) -> Rgba {
    let inverse_alpha = 255 - filter[3] as u32;
    let mut out = dst;
    for i in 0..3 {
        let d = dst[i] as u32;
        let value = (filter[i] as u32 * d + d * inverse_alpha) / 255;
        out[i] = value.min(255) as u8;
    }
    out
}

/// 純軟體合成器，前端只負責上傳結果
#[derive(Debug, Clone)]
pub struct Renderer {
    config: DisplayConfig,
    filter: Vec<Rgba>,
    raster: Vec<Rgba>,
}

impl Renderer {
    pub fn new(config: DisplayConfig) -> Self {
        let filter = (0..GAME_HEIGHT)
            .flat_map(|y| (0..GAME_WIDTH).map(move |x| cellophane(x, y)))
            .collect();
        Renderer {
            config,
            filter,
            raster: vec![CLEAR; GAME_WIDTH * GAME_HEIGHT],
        }
    }

    /// [`Renderer::render`] 輸出影像的像素尺寸
    pub fn dimensions(&self) -> (usize, usize) {
        if self.config.rotate {
            (GAME_HEIGHT, GAME_WIDTH)
        } else {
            (GAME_WIDTH, GAME_HEIGHT)
        }
    }

    /// 套用 4:3 拉伸後、縮放前的視窗大小
    pub fn display_size(&self) -> (u32, u32) {
        let stretched = (GAME_WIDTH as f32 * STRETCH_4_3).round() as u32;
        if self.config.rotate {
            (GAME_HEIGHT as u32, stretched)
        } else {
            (stretched, GAME_HEIGHT as u32)
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// 水平與垂直翻轉；雞尾酒台的玩家 2 畫面轉 180 度，鏡面機台再加上垂直翻轉
    pub fn flips(&self, screen_flip: bool) -> (bool, bool) {
        let half_turn = screen_flip && self.config.cocktail_flip;
        (half_turn, half_turn || self.config.flip)
    }

    /// 把一幀視訊 RAM 合成為 RGBA8888 位元組寫入 `out`
    pub fn render(&mut self, frame_buffer: &[u8], screen_flip: bool, out: &mut Vec<u8>) {
        // 依 CRT 掃描順序解碼：每列 32 位元組，低位元在左
        for (i, &byte) in frame_buffer.iter().take(FRAME_BUFFER_LEN).enumerate() {
            let base = i * 8;
            for bit in 0..8 {
                let index = base + bit;
                let mut pixel = if (byte >> bit) & 0x01 != 0 { LIT } else { CLEAR };
                if self.config.color {
                    pixel = multiply(pixel, self.filter[index]);
                }
                self.raster[index] = pixel;
            }
        }

        let (flip_x, flip_y) = self.flips(screen_flip);

        let (width, height) = self.dimensions();
        out.clear();
        out.resize(width * height * 4, 0);
        for y in 0..GAME_HEIGHT {
            for x in 0..GAME_WIDTH {
                // 翻轉作用在旋轉之前的畫面上
                let sx = if flip_x { GAME_WIDTH - 1 - x } else { x };
                let sy = if flip_y { GAME_HEIGHT - 1 - y } else { y };
                let (dx, dy) = if self.config.rotate {
                    (y, GAME_WIDTH - 1 - x)
                } else {
                    (x, y)
                };
                let dst = (dy * width + dx) * 4;
                out[dst..dst + 4].copy_from_slice(&self.raster[sy * GAME_WIDTH + sx]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(rotate: bool) -> DisplayConfig {
        DisplayConfig {
            color: false,
            rotate,
            ..DisplayConfig::default()
        }
    }

    fn pixel(out: &[u8], width: usize, x: usize, y: usize) -> Rgba {
        let i = (y * width + x) * 4;
        [out[i], out[i + 1], out[i + 2], out[i + 3]]
    }

    fn frame_with(pixels: &[(usize, usize)]) -> Vec<u8> {
        let mut fb = vec![0u8; FRAME_BUFFER_LEN];
        for &(x, y) in pixels {
            fb[y * 32 + x / 8] |= 1 << (x % 8);
        }
        fb
    }

    #[test]
    fn test_decode_is_lsb_first() {
        let mut renderer = Renderer::new(plain(false));
        let mut fb = vec![0u8; FRAME_BUFFER_LEN];
        fb[0] = 0x01;
        fb[33] = 0x80; // 第 1 列，x = 15
        let mut out = Vec::new();
        renderer.render(&fb, false, &mut out);
        assert_eq!(out.len(), 256 * 224 * 4);
        assert_eq!(pixel(&out, 256, 0, 0), LIT);
        assert_eq!(pixel(&out, 256, 1, 0), CLEAR);
        assert_eq!(pixel(&out, 256, 15, 1), LIT);
    }

    #[test]
    fn test_rotation_turns_upright() {
        let mut renderer = Renderer::new(plain(true));
        assert_eq!(renderer.dimensions(), (224, 256));
        let fb = frame_with(&[(0, 0), (255, 223)]);
        let mut out = Vec::new();
        renderer.render(&fb, false, &mut out);
        // 掃描線起點落在左下角
        assert_eq!(pixel(&out, 224, 0, 255), LIT);
        assert_eq!(pixel(&out, 224, 223, 0), LIT);
        assert_eq!(pixel(&out, 224, 0, 0), CLEAR);
    }

    #[test]
    fn test_mirror_flip() {
        let config = DisplayConfig {
            flip: true,
            ..plain(false)
        };
        let mut renderer = Renderer::new(config);
        let mut out = Vec::new();
        renderer.render(&frame_with(&[(10, 0)]), false, &mut out);
        assert_eq!(pixel(&out, 256, 10, 223), LIT);
    }

    #[test]
    fn test_cocktail_flip_needs_both_flags() {
        let fb = frame_with(&[(0, 0)]);
        let mut out = Vec::new();

        let mut renderer = Renderer::new(plain(false));
        renderer.render(&fb, true, &mut out);
        assert_eq!(pixel(&out, 256, 0, 0), LIT);

        let mut renderer = Renderer::new(DisplayConfig {
            cocktail_flip: true,
            ..plain(false)
        });
        renderer.render(&fb, false, &mut out);
        assert_eq!(pixel(&out, 256, 0, 0), LIT);
        renderer.render(&fb, true, &mut out);
        assert_eq!(pixel(&out, 256, 255, 223), LIT);
    }

    #[test]
    fn test_cellophane_bands() {
        assert_eq!(cellophane(20, 0), CELLOPHANE_GREEN);
        assert_eq!(cellophane(5, 100), CELLOPHANE_GREEN);
        assert_eq!(cellophane(5, 10), CLEAR);
        assert_eq!(cellophane(200, 50), CELLOPHANE_RED);
        assert_eq!(cellophane(100, 50), CLEAR);
        assert_eq!(cellophane(230, 50), CLEAR);
    }

    #[test]
    fn test_colour_overlay_tints_lit_pixels_only() {
        let mut renderer = Renderer::new(DisplayConfig {
            rotate: false,
            ..DisplayConfig::default()
        });
        let fb = frame_with(&[(20, 0), (100, 0)]);
        let mut out = Vec::new();
        renderer.render(&fb, false, &mut out);
        assert_eq!(pixel(&out, 256, 20, 0), [0x7F, 0xFF, 0x7F, 0xFF]);
        assert_eq!(pixel(&out, 256, 100, 0), LIT);
        // 暗點保持透明，背景圖可以透出
        assert_eq!(pixel(&out, 256, 21, 0), CLEAR);
    }

    #[test]
    fn test_flips_follow_the_options() {
        let renderer = Renderer::new(plain(false));
        assert_eq!(renderer.flips(true), (false, false));
        let renderer = Renderer::new(DisplayConfig {
            flip: true,
            cocktail_flip: true,
            ..plain(false)
        });
        assert_eq!(renderer.flips(false), (false, true));
        assert_eq!(renderer.flips(true), (true, true));
    }

    #[test]
    fn test_display_size_is_4_by_3() {
        let renderer = Renderer::new(DisplayConfig::default());
        assert_eq!(renderer.display_size(), (224, 298));
    }
}
