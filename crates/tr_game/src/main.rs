//! Tilerun: a sprite walks left and right across a tile map.
//!
//! winit drives the event loop via `ApplicationHandler`. Each
//! `RedrawRequested` runs the fixed-step simulation (one step is one animation
//! tick), then rebuilds the sprite batch from the background tiles, the player
//! and the HUD text and draws it in a single pass.

mod config;
mod player;

use std::path::Path;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::{load_config_from_path, GameConfig, GAME_CONFIG_PATH};
use player::PlayerController;
use tr_core::collision::CollisionGrid;
use tr_core::control::LoopControl;
use tr_core::input::{InputState, Key};
use tr_core::tilemap::{load_map_from_path, TileSet};
use tr_core::time::TimeState;
use tr_core::{load_texture_or_log, Entity, Object};
use tr_platform::PlatformConfig;
use tr_render::batch::WHITE;
use tr_render::{
    BitmapFont, Camera2D, GpuContext, SpriteBatch, SpriteMesh, SpritePipeline, TextureCache,
};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.09,
    g: 0.11,
    b: 0.18,
    a: 1.0,
};

/// Counters from the last rendered frame, shown by the HUD.
#[derive(Debug, Default, Clone, Copy)]
struct FrameStats {
    draw_calls: usize,
    texture_binds: usize,
    quads: usize,
}

/// Everything that needs a window and a GPU. Built in `resumed`.
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: Camera2D,
    sprite_pipeline: SpritePipeline,
    textures: TextureCache,
    mesh: SpriteMesh,
    batch: SpriteBatch,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    background: Vec<Object>,
    grid: CollisionGrid,
    player: Entity,
    controller: PlayerController,
    font: BitmapFont,
    show_hud: bool,
    last_stats: FrameStats,
}

impl GameState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self, String> {
        let present_mode = if config.window.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        let gpu = GpuContext::new(window.clone(), present_mode).map_err(|e| e.to_string())?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let camera = Camera2D::new(gpu.size.0, gpu.size.1);

        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let map = load_map_from_path(Path::new(&config.map))?;
        log::info!(
            "Map '{}' loaded: {}x{} tiles",
            config.map,
            map.width,
            map.height
        );
        let grid = CollisionGrid::from_map(&map, config.tileset.tile_size);

        let mut textures = TextureCache::new();
        let (background, player, controller, font) = {
            let mut loader = textures.loader(&gpu, &sprite_pipeline);
            let tileset = TileSet {
                texture: load_texture_or_log(&mut loader, &config.tileset.texture),
                columns: config.tileset.columns,
                tile_size: config.tileset.tile_size,
            };
            let background = map.background_objects(&tileset);
            let (player, controller) = PlayerController::spawn(&config.player, &mut loader)?;
            let font = BitmapFont {
                scale: config.font.scale.max(1),
                ..BitmapFont::new(
                    load_texture_or_log(&mut loader, &config.font.texture),
                    config.font.glyph_width,
                    config.font.glyph_height,
                    config.font.columns,
                    config.font.glyph_count,
                )
            };
            (background, player, controller, font)
        };
        log::info!(
            "{} background tiles, {} solid cells, {} textures ({:.2} MB)",
            background.len(),
            grid.solid_count(),
            textures.len(),
            textures.memory_estimate_mb()
        );

        let mesh = SpriteMesh::new(&gpu.device);

        Ok(Self {
            window,
            gpu,
            time: TimeState::new(),
            input: InputState::new(),
            camera,
            sprite_pipeline,
            textures,
            mesh,
            batch: SpriteBatch::new(),
            camera_buffer,
            camera_bind_group,
            background,
            grid,
            player,
            controller,
            font,
            show_hud: true,
            last_stats: FrameStats::default(),
        })
    }

    /// Run the fixed steps owed for this frame.
    fn update(&mut self, control: &mut LoopControl) {
        self.time.begin_frame();
        while self.time.should_step() {
            if self.input.is_just_pressed(Key::Escape) {
                control.request_exit("escape pressed");
                break;
            }
            if self.input.is_just_pressed(Key::F3) {
                self.show_hud = !self.show_hud;
                log::info!("HUD: {}", if self.show_hud { "ON" } else { "OFF" });
            }

            self.controller.step(
                &mut self.player,
                self.input.horizontal_axis(),
                &self.grid,
            );
            self.player.update_animation();

            // Edges are consumed by the first step that sees them.
            self.input.end_frame();
        }
        self.time.end_frame();
    }

    fn build_batch(&mut self) {
        self.batch.clear();
        for object in &self.background {
            queue_object(&mut self.batch, &self.textures, object);
        }
        queue_object(&mut self.batch, &self.textures, self.player.object());

        if self.show_hud {
            let dest = self.player.dest();
            let hud = format!(
                "FPS {:.0} ({:.1} MS)  TICK {}\nX {} Y {}\nDRAWS {} BINDS {} QUADS {}",
                self.time.smoothed_fps,
                self.time.smoothed_frame_time_ms,
                self.time.fixed_step_count,
                dest.x,
                dest.y,
                self.last_stats.draw_calls,
                self.last_stats.texture_binds,
                self.last_stats.quads,
            );
            let font_size = self
                .font
                .texture
                .as_ref()
                .and_then(|key| self.textures.size(key));
            if let Some(size) = font_size {
                self.font
                    .draw_msg(&mut self.batch, size, &hud, 8, 8, 255, 255, 255);
            }
        }

        self.last_stats = FrameStats {
            draw_calls: self.batch.draw_calls.len(),
            texture_binds: self.batch.texture_binds(),
            quads: self.batch.quad_count(),
        };
    }

    fn render(&mut self) {
        self.build_batch();
        self.mesh
            .upload(&self.gpu.device, &self.gpu.queue, &self.batch);
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.build_uniform()]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            self.mesh.draw(&mut render_pass, &self.batch, &self.textures);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Queue `object` if its texture made it into the cache.
fn queue_object(batch: &mut SpriteBatch, textures: &TextureCache, object: &Object) {
    let Some(key) = object.texture() else {
        return;
    };
    let Some(size) = textures.size(key) else {
        return;
    };
    batch.push(key, size, object.src(), object.dest(), WHITE);
}

struct App {
    config: GameConfig,
    control: LoopControl,
    state: Option<GameState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            control: LoopControl::new(),
            state: None,
        }
    }

    fn platform_config(&self) -> PlatformConfig {
        PlatformConfig::new(
            &self.config.window.title,
            self.config.window.width,
            self.config.window.height,
        )
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let started = tr_platform::create_window(event_loop, &self.platform_config())
            .and_then(|window| GameState::new(window, &self.config));
        match started {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Startup failed: {}", err);
                self.control.request_exit("startup failed");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.control.request_exit("window close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => state.input.release_all(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(key),
                            ElementState::Released => state.input.key_up(key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }
                state.update(&mut self.control);
                if !self.control.is_running() {
                    event_loop.exit();
                    return;
                }
                state.render();
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Tilerun starting...");

    let config = match load_config_from_path(Path::new(GAME_CONFIG_PATH)) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            return;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {}", err);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", err);
    }
    log::info!("Tilerun stopped");
}
