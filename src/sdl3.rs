// SDL3 前端 - 視窗、鍵盤與遊戲手把、音訊串流
extern crate sdl3;

use std::path::Path;

use crossbeam::channel::{Receiver, Sender};
use sdl3::audio::{AudioCallback, AudioFormat, AudioSpec, AudioSpecWAV, AudioStream};
use sdl3::event::Event;
use sdl3::gamepad::{Button, Gamepad};
use sdl3::keyboard::Keycode;
use sdl3::pixels::{Color, PixelFormat};
use sdl3::rect::Rect;
use sdl3::render::{BlendMode, Canvas, FPoint, FRect, Texture};
use sdl3::surface::Surface;
use sdl3::video::Window;
use sdl3::{AudioSubsystem, EventPump, GamepadSubsystem};

use crate::arcade::{Arcade, Frontend};
use crate::audio::{Mixer, OUTPUT_RATE, SoundSink, load_samples};
use crate::config::Config;
use crate::controls::{Control, Inputs};
use crate::error::{ArcadeError, Result};
use crate::rom::load_roms;
use crate::timer::FramePacer;
use crate::video::Renderer;

// 最多同時使用兩個手把
const MAX_GAMEPADS: usize = 2;

fn frontend_error<E: std::fmt::Display>(err: E) -> ArcadeError {
    ArcadeError::Frontend(err.to_string())
}

fn output_spec() -> AudioSpec {
    AudioSpec {
        format: Some(AudioFormat::f32_sys()),
        channels: Some(1),
        freq: Some(OUTPUT_RATE as i32),
    }
}

/// 用 SDL 載入 WAV，再經由轉換串流轉成輸出格式 (單聲道 f32)
fn decode_sample(audio: &AudioSubsystem, path: &Path) -> Result<Vec<f32>> {
    let sample_error = |reason: String| ArcadeError::Sample {
        path: path.to_path_buf(),
        reason,
    };

    let wav = AudioSpecWAV::load_wav(path).map_err(|e| sample_error(e.to_string()))?;
    let source = AudioSpec::new(Some(wav.freq), Some(wav.channels as i32), Some(wav.format));
    let mut stream = audio
        .new_stream(Some(&source), Some(&output_spec()))
        .map_err(|e| sample_error(e.to_string()))?;
    stream
        .put_data(wav.buffer())
        .map_err(|e| sample_error(e.to_string()))?;
    stream.flush().map_err(|e| sample_error(e.to_string()))?;

    let mut decoded = Vec::new();
    let mut chunk = [0.0f32; 4096];
    loop {
        let count = stream
            .read_f32_samples(&mut chunk)
            .map_err(|e| sample_error(e.to_string()))?;
        if count == 0 {
            break;
        }
        decoded.extend_from_slice(&chunk[..count]);
    }
    log::debug!("sample {} ({} frames)", path.display(), decoded.len());
    Ok(decoded)
}

struct InvadersAudio {
    receiver: Receiver<u8>,
    mixer: Mixer,
    buffer: Vec<f32>,
}

impl AudioCallback<f32> for InvadersAudio {
    fn callback(&mut self, stream: &mut AudioStream, requested: i32) {
        // 先取出模擬執行緒送來的觸發，再混音
        for sample in self.receiver.try_iter() {
            self.mixer.trigger(sample);
        }
        self.buffer.resize(requested.max(0) as usize, 0.0);
        self.mixer.fill(&mut self.buffer);
        let _ = stream.put_data_f32(&self.buffer);
    }
}

fn control_for_key(key: Keycode) -> Option<Control> {
    match key {
        Keycode::Left => Some(Control::Left),
        Keycode::Right => Some(Control::Right),
        Keycode::Space => Some(Control::Fire),
        Keycode::_1 => Some(Control::Start1),
        Keycode::_2 => Some(Control::Start2),
        Keycode::C => Some(Control::Coin),
        Keycode::T => Some(Control::Tilt),
        Keycode::Escape => Some(Control::Quit),
        _ => None,
    }
}

// 任何一個手把都同時操作玩家 1 與玩家 2
fn control_for_button(button: Button) -> Option<Control> {
    match button {
        Button::Start => Some(Control::Coin),
        Button::Back => Some(Control::Quit),
        Button::North => Some(Control::Start1),
        Button::East => Some(Control::Start2),
        Button::South | Button::West => Some(Control::Fire),
        Button::DPadLeft => Some(Control::Left),
        Button::DPadRight => Some(Control::Right),
        _ => None,
    }
}

pub struct SdlFrontend<'a> {
    canvas: Canvas<Window>,
    texture: Texture<'a>,
    background: Option<Texture<'a>>,
    event_pump: EventPump,
    gamepad_subsystem: Option<GamepadSubsystem>,
    gamepads: Vec<Gamepad>,
    sound: Sender<u8>,
    renderer: Renderer,
    rgba: Vec<u8>,
}

impl std::fmt::Debug for SdlFrontend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdlFrontend")
            .field("renderer", &self.renderer)
            .field("gamepads", &self.gamepads.len())
            .field("background", &self.background.is_some())
            .finish_non_exhaustive()
    }
}

impl SdlFrontend<'_> {
    // 依視窗大小置中，保持 4:3 比例
    fn destination(&self) -> Rect {
        let (win_w, win_h) = self.canvas.window().size();
        let (w, h) = self.renderer.display_size();
        let scale = (win_w as f32 / w as f32).min(win_h as f32 / h as f32);
        let dest_w = ((w as f32 * scale) as u32).max(1);
        let dest_h = ((h as f32 * scale) as u32).max(1);
        let dst_x = ((win_w as i32 - dest_w as i32) / 2).max(0);
        let dst_y = ((win_h as i32 - dest_h as i32) / 2).max(0);
        Rect::new(dst_x, dst_y, dest_w, dest_h)
    }

    fn is_open(&self, which: u32) -> bool {
        self.gamepads
            .iter()
            .any(|pad| pad.id().is_ok_and(|id| id.0 == which))
    }

    // 開啟尚未使用的手把，最多兩個
    fn find_gamepads(&mut self) {
        let Some(subsystem) = &self.gamepad_subsystem else {
            return;
        };
        let ids = match subsystem.gamepads() {
            Ok(ids) => ids,
            Err(e) => {
                log::warn!("cannot list gamepads: {}", e);
                return;
            }
        };
        for id in ids {
            if self.gamepads.len() >= MAX_GAMEPADS {
                break;
            }
            if self.is_open(id.0) {
                continue;
            }
            match subsystem.open(id) {
                Ok(pad) => {
                    log::info!("gamepad connected: {}", pad.name().unwrap_or_default());
                    self.gamepads.push(pad);
                }
                Err(e) => log::warn!("cannot open gamepad: {}", e),
            }
        }
        log::info!("number of gamepads: {}", self.gamepads.len());
    }

    fn remove_gamepad(&mut self, which: u32) {
        self.gamepads
            .retain(|pad| pad.id().is_ok_and(|id| id.0 != which));
        self.find_gamepads();
    }
}

impl Frontend for SdlFrontend<'_> {
    fn poll_input(&mut self, inputs: &mut Inputs) {
        let events: Vec<Event> = self.event_pump.poll_iter().collect();
        for event in events {
            match event {
                Event::Quit { .. } => inputs.set(Control::Quit, true),
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => {
                    if let Some(control) = control_for_key(key) {
                        inputs.set(control, true);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(control) = control_for_key(key) {
                        inputs.set(control, false);
                    }
                }
                Event::ControllerDeviceAdded { .. } => self.find_gamepads(),
                Event::ControllerDeviceRemoved { which, .. } => self.remove_gamepad(which),
                Event::ControllerButtonDown { which, button, .. } if self.is_open(which) => {
                    if let Some(control) = control_for_button(button) {
                        inputs.set(control, true);
                    }
                }
                Event::ControllerButtonUp { which, button, .. } if self.is_open(which) => {
                    if let Some(control) = control_for_button(button) {
                        inputs.set(control, false);
                    }
                }
                _ => {}
            }
        }
    }

    fn present(&mut self, frame_buffer: &[u8], screen_flip: bool) -> Result<()> {
        self.renderer.render(frame_buffer, screen_flip, &mut self.rgba);
        let (width, _) = self.renderer.dimensions();
        self.texture
            .update(None, &self.rgba, width * 4)
            .map_err(frontend_error)?;

        let dest = self.destination();
        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        self.canvas.clear();

        // 背景圖以掃描方向繪製，與遊戲畫面一起翻轉與旋轉
        if let Some(background) = &self.background {
            let (flip_h, flip_v) = self.renderer.flips(screen_flip);
            let (angle, area) = if self.renderer.config().rotate {
                let center = dest.center();
                let (w, h) = (dest.height() as f32, dest.width() as f32);
                let area = FRect::new(
                    center.x() as f32 - w / 2.0,
                    center.y() as f32 - h / 2.0,
                    w,
                    h,
                );
                (-90.0, area)
            } else {
                let area = FRect::new(
                    dest.x() as f32,
                    dest.y() as f32,
                    dest.width() as f32,
                    dest.height() as f32,
                );
                (0.0, area)
            };
            self.canvas
                .copy_ex(
                    background,
                    None::<FRect>,
                    area,
                    angle,
                    None::<FPoint>,
                    flip_h,
                    flip_v,
                )
                .map_err(frontend_error)?;
        }

        self.canvas
            .copy(&self.texture, None::<FRect>, dest)
            .map_err(frontend_error)?;
        self.canvas.present();
        Ok(())
    }

    fn sound(&mut self) -> &mut dyn SoundSink {
        &mut self.sound
    }
}

/// 開啟視窗與音訊裝置，載入設定中的所有檔案，執行到玩家離開為止
pub fn main(config: Config) -> Result<()> {
    let mmu = load_roms(&config)?;

    let sdl_context = sdl3::init().map_err(frontend_error)?;
    let video_subsystem = sdl_context.video().map_err(frontend_error)?;
    let audio_subsystem = sdl_context.audio().map_err(frontend_error)?;
    let gamepad_subsystem = match sdl_context.gamepad() {
        Ok(subsystem) => Some(subsystem),
        Err(e) => {
            log::warn!("gamepad support unavailable: {}", e);
            None
        }
    };

    let samples = load_samples(&config.sample_dir, &config.samples, |path| {
        decode_sample(&audio_subsystem, path)
    });

    let (tx, rx) = crossbeam::channel::bounded(64);
    let audio = InvadersAudio {
        receiver: rx,
        mixer: Mixer::new(samples),
        buffer: Vec::new(),
    };
    let stream = audio_subsystem
        .open_playback_stream(&output_spec(), audio)
        .map_err(frontend_error)?;
    stream.resume().map_err(frontend_error)?;

    let renderer = Renderer::new(config.display.clone());
    let (display_w, display_h) = renderer.display_size();
    let scale = config.display.scale.max(1);
    let mut builder =
        video_subsystem.window("Space Invaders", display_w * scale, display_h * scale);
    builder.position_centered().resizable();
    if config.display.fullscreen {
        builder.fullscreen();
    }
    let window = builder.build().map_err(frontend_error)?;

    let canvas = window.into_canvas();
    let texture_creator = canvas.texture_creator();
    let (tex_w, tex_h) = renderer.dimensions();
    let mut texture = texture_creator
        .create_texture_streaming(PixelFormat::ABGR8888, tex_w as u32, tex_h as u32)
        .map_err(frontend_error)?;
    // 暗點透明，背景圖才看得到
    texture.set_blend_mode(BlendMode::Blend);

    let background = if config.display.background {
        let path = &config.display.background_image;
        match Surface::load_bmp(path)
            .map_err(frontend_error)
            .and_then(|surface| {
                texture_creator
                    .create_texture_from_surface(surface)
                    .map_err(frontend_error)
            }) {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::warn!("background {}: {}", path.display(), e);
                None
            }
        }
    } else {
        None
    };

    let event_pump = sdl_context.event_pump().map_err(frontend_error)?;

    let mut frontend = SdlFrontend {
        canvas,
        texture,
        background,
        event_pump,
        gamepad_subsystem,
        gamepads: Vec::new(),
        sound: tx,
        renderer,
        rgba: Vec::new(),
    };
    frontend.find_gamepads();

    let mut arcade = Arcade::new(mmu, config.dip_switches());
    let mut pacer = FramePacer::new();
    arcade.run(&mut frontend, &mut pacer)
}
