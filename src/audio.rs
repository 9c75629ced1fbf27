// 音效 - 十個取樣音效的觸發與混音；WAV 解碼交給前端

use std::path::Path;

use crossbeam::channel::{Sender, TrySendError};

use crate::error::ArcadeError;

/// 音效板上的獨立音效數量
pub const SAMPLE_COUNT: usize = 10;
/// 前端音訊串流的輸出取樣率
pub const OUTPUT_RATE: u32 = 44100;

/// 音效埠每個上升緣送出一次觸發
pub trait SoundSink {
    fn play(&mut self, sample: u8);
}

/// 靜音輸出，丟棄所有觸發
#[derive(Debug, Default, Clone, Copy)]
pub struct Mute;

impl SoundSink for Mute {
    fn play(&mut self, _sample: u8) {}
}

// 記錄觸發順序，用於測試與除錯
impl SoundSink for Vec<u8> {
    fn play(&mut self, sample: u8) {
        self.push(sample);
    }
}

// 送往音訊執行緒；通道滿了就丟棄，不阻塞模擬
impl SoundSink for Sender<u8> {
    fn play(&mut self, sample: u8) {
        match self.try_send(sample) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::debug!("sound queue full, dropped {}", sample),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Voice {
    sample: usize,
    position: usize,
}

/// 十個音效的軟體混音器，可任意重疊
#[derive(Debug, Default)]
pub struct Mixer {
    samples: Vec<Vec<f32>>,
    voices: Vec<Voice>,
    volume: f32,
}

impl Mixer {
    pub fn new(samples: Vec<Vec<f32>>) -> Self {
        Mixer {
            samples,
            voices: Vec::new(),
            volume: 0.5,
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// 為 `sample` 開一個新聲部；未知或空的音效忽略
    pub fn trigger(&mut self, sample: u8) {
        let index = sample as usize;
        match self.samples.get(index) {
            Some(data) if !data.is_empty() => self.voices.push(Voice {
                sample: index,
                position: 0,
            }),
            _ => log::trace!("no sample loaded for sound {}", sample),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.voices.is_empty()
    }

    /// 把所有聲部混入 `out` (覆寫)，並移除播完的聲部
    pub fn fill(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        for voice in &mut self.voices {
            let data = &self.samples[voice.sample];
            let remaining = &data[voice.position..];
            for (dst, src) in out.iter_mut().zip(remaining) {
                *dst += src * self.volume;
            }
            voice.position += remaining.len().min(out.len());
        }
        for s in out.iter_mut() {
            *s = s.clamp(-1.0, 1.0);
        }
        let samples = &self.samples;
        self.voices
            .retain(|voice| voice.position < samples[voice.sample].len());
    }
}

/// 依設定載入十個音效；任何一個失敗時該音效保持靜音，並記錄警告
pub fn load_samples<F>(dir: &Path, names: &[String], mut decode: F) -> Vec<Vec<f32>>
where
    F: FnMut(&Path) -> Result<Vec<f32>, ArcadeError>,
{
    names
        .iter()
        .map(|name| match decode(&dir.join(name)) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("{}", e);
                Vec::new()
            }
        })
        .collect()
}
