//! Lane Rush -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a **fixed-timestep** model
//! (see `FrameClock`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- consume fixed-dt slices for the active mode
//!   3. Rebuild the quad mesh (road, cars, menu backdrop) and stream it to GPU
//!   4. Issue draw calls, composite the egui screen layer on top
//!
//! Modes form the session state machine: menu screens, playing, game over.
//! Mode changes from keyboard happen inside fixed steps; mode changes from
//! UI buttons are collected after egui runs and applied at the end of the
//! frame, taking effect on the next one.

mod collision;
mod config;
mod enemy;
mod highscore;
mod player;
mod road;
mod session;
mod sprite;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::GameConfig;
use highscore::HighScoreStore;
use lr_core::input::{InputState, Key};
use lr_core::time::FrameClock;
use lr_platform::window::PlatformConfig;
use lr_render::{GpuContext, ScreenCamera, SpritePipeline, SpriteVertex, Texture};
use lr_ui::{UiActions, UiLayer, UiView};
use player::MoveIntent;
use session::{GameSession, SessionEvent};
use sprite::{CarModel, CarSprite};

const TEX_WHITE: &str = "__white";
const TEX_ROAD: &str = "road";
const TEX_PLAYER: &str = "player";
const TEX_ENEMY: &str = "enemy";

/// Downward drift of the menu backdrop dashes, pixels per fixed step.
const MENU_SCROLL_SPEED: f32 = 1.5;
const MENU_DASH_SPACING: f32 = 50.0;

/// A contiguous run of indices that share the same texture binding.
/// Consecutive quads using the same texture merge into one draw call.
#[derive(Debug, Clone)]
struct DrawCall {
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
}

struct QuadSpec<'a> {
    texture_key: &'a str,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    tint: [f32; 4],
}

struct GpuSpriteTexture {
    #[allow(dead_code)]
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuScreen {
    Main,
    CarSelect,
    Instructions,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Menu(MenuScreen),
    Playing,
    GameOver { final_score: u64, new_record: bool },
}

/// All mutable game state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: FrameClock,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    ui: UiLayer,

    config: GameConfig,
    highscore: HighScoreStore,
    high_score: u64,

    mode: Mode,
    selected_model: CarModel,
    preview_model: CarModel,
    session: GameSession,
    menu_scroll: f32,

    textures: HashMap<Arc<str>, GpuSpriteTexture>,
    textures_dirty: bool,

    // The quad mesh is rebuilt on the CPU each frame, then streamed into
    // these GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
}

impl GameState {
    fn new(window: Arc<Window>, config: GameConfig) -> Self {
        let gpu = GpuContext::new(window.clone());
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let ui = UiLayer::new(&gpu.device, gpu.surface_format, &window);
        let camera = ScreenCamera::new(gpu.size.0, gpu.size.1);

        let highscore = HighScoreStore::new(Path::new(&config.highscore_path));
        let high_score = highscore.load();
        log::info!("Stored high score: {high_score}");

        let selected_model = CarModel::default();
        let session = GameSession::new(
            Path::new(&config.assets_dir),
            selected_model,
            gpu.size,
        );

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            clock: FrameClock::new(),
            input: InputState::new(),
            camera,
            sprite_pipeline,
            ui,
            config,
            highscore,
            high_score,
            mode: Mode::Menu(MenuScreen::Main),
            selected_model,
            preview_model: selected_model,
            session,
            menu_scroll: 0.0,
            textures: HashMap::new(),
            textures_dirty: false,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
        };

        state.refresh_textures();
        state
    }

    fn assets_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.assets_dir)
    }

    /// (Re)upload every texture the current state can draw: the scene
    /// sprites, the road, the white quad, and the five preview cars.
    /// Sprites are tiny, so a full rebuild on change beats cache bookkeeping.
    fn refresh_textures(&mut self) {
        self.textures.clear();

        let white = Texture::from_rgba8(
            &self.gpu.device,
            &self.gpu.queue,
            &[255, 255, 255, 255],
            1,
            1,
            "white",
        );
        let bind_group = self
            .sprite_pipeline
            .create_texture_bind_group(&self.gpu.device, &white);
        self.textures.insert(
            Arc::from(TEX_WHITE),
            GpuSpriteTexture {
                texture: white,
                bind_group,
            },
        );

        let road_image = self.session.road.image.clone();
        self.upload_image(TEX_ROAD, &road_image);
        let player_image = self.session.player.sprite.image.clone();
        self.upload_image(TEX_PLAYER, &player_image);
        let enemy_image = self.session.enemy.sprite.image.clone();
        self.upload_image(TEX_ENEMY, &enemy_image);

        let preview_size = self.preview_size();
        let assets_dir = self.assets_dir();
        for number in CarModel::MIN..=CarModel::MAX {
            if let Some(model) = CarModel::new(number) {
                let sprite = CarSprite::load(&assets_dir, model, preview_size);
                self.upload_image(&preview_key(number), &sprite.image);
            }
        }
    }

    fn upload_image(&mut self, key: &str, image: &image::RgbaImage) {
        let texture = Texture::from_rgba8(
            &self.gpu.device,
            &self.gpu.queue,
            image.as_raw(),
            image.width(),
            image.height(),
            key,
        );
        let bind_group = self
            .sprite_pipeline
            .create_texture_bind_group(&self.gpu.device, &texture);
        self.textures.insert(
            Arc::from(key),
            GpuSpriteTexture {
                texture,
                bind_group,
            },
        );
    }

    fn preview_size(&self) -> (u32, u32) {
        let w = (self.gpu.size.0 as f32 * 0.15).min(120.0).max(1.0);
        (w as u32, (w * 1.25) as u32)
    }

    fn start_new_session(&mut self) {
        self.session = GameSession::new(
            &self.assets_dir(),
            self.selected_model,
            self.gpu.size,
        );
        self.textures_dirty = true;
        self.mode = Mode::Playing;
        log::info!(
            "New session: car{} at {}x{}",
            self.selected_model.number(),
            self.gpu.size.0,
            self.gpu.size.1
        );
    }

    /// One fixed simulation step of the active mode.
    fn fixed_step(&mut self) {
        match self.mode {
            Mode::Menu(screen) => {
                let span = self.gpu.size.1 as f32 + MENU_DASH_SPACING;
                self.menu_scroll = (self.menu_scroll + MENU_SCROLL_SPEED) % span;

                match screen {
                    MenuScreen::Main => {}
                    MenuScreen::CarSelect => {
                        // All five preview textures are pre-uploaded, so
                        // switching the previewed model is just a mesh change.
                        if self.input.is_just_pressed(Key::Left) {
                            self.preview_model = self.preview_model.prev();
                        }
                        if self.input.is_just_pressed(Key::Right) {
                            self.preview_model = self.preview_model.next();
                        }
                        if self.input.is_just_pressed(Key::Enter) {
                            self.selected_model = self.preview_model;
                            self.mode = Mode::Menu(MenuScreen::Main);
                        }
                        if self.input.is_just_pressed(Key::Escape) {
                            self.mode = Mode::Menu(MenuScreen::Main);
                        }
                    }
                    MenuScreen::Instructions => {
                        if self.input.is_just_pressed(Key::Escape) {
                            self.mode = Mode::Menu(MenuScreen::Main);
                        }
                    }
                }
            }

            Mode::Playing => {
                if self.input.is_just_pressed(Key::Escape) {
                    self.mode = Mode::Menu(MenuScreen::Main);
                    return;
                }
                if let Some(digit) = self.input.just_pressed_digit() {
                    self.session.set_player_model(digit);
                    self.textures_dirty = true;
                }

                let intent = move_intent(&self.input);
                if self.session.tick(intent) == SessionEvent::Collision {
                    let final_score = self.session.score.score();
                    let previous_best = self.high_score;
                    self.high_score = self.highscore.update(final_score);
                    self.mode = Mode::GameOver {
                        final_score,
                        new_record: final_score > previous_best,
                    };
                    log::info!("Crash at score {final_score}");
                }
            }

            // Scene stays frozen under the game-over screen; the retry and
            // quit buttons arrive through UiActions.
            Mode::GameOver { .. } => {}
        }
    }

    fn ui_view(&self) -> UiView {
        match self.mode {
            Mode::Menu(MenuScreen::Main) => UiView::MainMenu,
            Mode::Menu(MenuScreen::CarSelect) => UiView::CarSelect {
                model: self.preview_model.number(),
            },
            Mode::Menu(MenuScreen::Instructions) => UiView::Instructions,
            Mode::Playing => UiView::Hud {
                score: self.session.score.score(),
                high_score: self.high_score,
                fps: self.clock.smoothed_fps,
            },
            Mode::GameOver {
                final_score,
                new_record,
            } => UiView::GameOver {
                score: final_score,
                high_score: self.high_score,
                new_record,
            },
        }
    }

    /// Apply button results collected from egui. Runs at the end of the
    /// frame, so effects are visible from the next frame on.
    fn apply_ui_actions(&mut self, actions: UiActions, event_loop: &ActiveEventLoop) {
        if actions.quit {
            log::info!("Quit requested, exiting.");
            event_loop.exit();
            return;
        }

        match self.mode {
            Mode::Menu(MenuScreen::Main) => {
                if actions.start_game {
                    self.start_new_session();
                } else if actions.open_car_select {
                    self.preview_model = self.selected_model;
                    self.mode = Mode::Menu(MenuScreen::CarSelect);
                } else if actions.open_instructions {
                    self.mode = Mode::Menu(MenuScreen::Instructions);
                }
            }
            Mode::Menu(MenuScreen::CarSelect) => {
                if actions.prev_car {
                    self.preview_model = self.preview_model.prev();
                }
                if actions.next_car {
                    self.preview_model = self.preview_model.next();
                }
                if actions.select_car {
                    self.selected_model = self.preview_model;
                    self.mode = Mode::Menu(MenuScreen::Main);
                    log::info!("Selected car{}", self.selected_model.number());
                }
                if actions.back_to_menu {
                    self.mode = Mode::Menu(MenuScreen::Main);
                }
            }
            Mode::Menu(MenuScreen::Instructions) => {
                if actions.back_to_menu {
                    self.mode = Mode::Menu(MenuScreen::Main);
                }
            }
            Mode::GameOver { .. } => {
                if actions.retry {
                    self.session.restart();
                    self.mode = Mode::Playing;
                    log::info!("Retry");
                }
            }
            Mode::Playing => {}
        }
    }

    fn build_mesh(&self) -> (Vec<SpriteVertex>, Vec<u32>, Vec<DrawCall>) {
        let mut vertices = Vec::with_capacity(64);
        let mut indices = Vec::with_capacity(96);
        let mut draw_calls = Vec::with_capacity(8);

        match self.mode {
            Mode::Menu(screen) => {
                self.build_menu_backdrop(&mut vertices, &mut indices, &mut draw_calls);
                if screen == MenuScreen::CarSelect {
                    self.build_preview_quad(&mut vertices, &mut indices, &mut draw_calls);
                }
            }
            Mode::Playing | Mode::GameOver { .. } => {
                self.build_scene(&mut vertices, &mut indices, &mut draw_calls);
            }
        }

        (vertices, indices, draw_calls)
    }

    /// Animated center-line dashes over the dark menu background.
    fn build_menu_backdrop(
        &self,
        vertices: &mut Vec<SpriteVertex>,
        indices: &mut Vec<u32>,
        draw_calls: &mut Vec<DrawCall>,
    ) {
        let (w, h) = (self.gpu.size.0 as f32, self.gpu.size.1 as f32);
        let span = h + MENU_DASH_SPACING;
        let dash_tint = [0.392, 0.392, 0.47, 1.0];

        let mut i = 0.0;
        while i < span {
            let y = (i + self.menu_scroll) % span;
            add_quad(
                vertices,
                indices,
                draw_calls,
                QuadSpec {
                    texture_key: TEX_WHITE,
                    x: w * 0.5 - 5.0,
                    y,
                    width: 10.0,
                    height: 30.0,
                    tint: dash_tint,
                },
            );
            i += MENU_DASH_SPACING;
        }
    }

    fn build_preview_quad(
        &self,
        vertices: &mut Vec<SpriteVertex>,
        indices: &mut Vec<u32>,
        draw_calls: &mut Vec<DrawCall>,
    ) {
        let (w, h) = (self.gpu.size.0 as f32, self.gpu.size.1 as f32);
        let (pw, ph) = self.preview_size();
        let (pw, ph) = (pw as f32, ph as f32);
        let key = preview_key(self.preview_model.number());
        add_quad(
            vertices,
            indices,
            draw_calls,
            QuadSpec {
                texture_key: &key,
                x: w * 0.5 - pw * 0.5,
                y: h * 0.5 - ph,
                width: pw,
                height: ph,
                tint: [1.0; 4],
            },
        );
    }

    /// Road (two scrolling copies), then enemy, then player on top.
    fn build_scene(
        &self,
        vertices: &mut Vec<SpriteVertex>,
        indices: &mut Vec<u32>,
        draw_calls: &mut Vec<DrawCall>,
    ) {
        let road = &self.session.road;
        let (rw, rh) = road.image.dimensions();
        for y in [road.y1, road.y2] {
            add_quad(
                vertices,
                indices,
                draw_calls,
                QuadSpec {
                    texture_key: TEX_ROAD,
                    x: 0.0,
                    y,
                    width: rw as f32,
                    height: rh as f32,
                    tint: [1.0; 4],
                },
            );
        }

        let enemy = &self.session.enemy;
        add_quad(
            vertices,
            indices,
            draw_calls,
            QuadSpec {
                texture_key: TEX_ENEMY,
                x: enemy.x,
                y: enemy.y,
                width: enemy.width() as f32,
                height: enemy.height() as f32,
                tint: [1.0; 4],
            },
        );

        let player = &self.session.player;
        add_quad(
            vertices,
            indices,
            draw_calls,
            QuadSpec {
                texture_key: TEX_PLAYER,
                x: player.x,
                y: player.y,
                width: player.width() as f32,
                height: player.height() as f32,
                tint: [1.0; 4],
            },
        );
    }

    fn upload_mesh(&mut self) {
        let (vertices, indices, draw_calls) = self.build_mesh();
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.draw_calls = draw_calls;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn clear_color(&self) -> wgpu::Color {
        match self.mode {
            // Dark blue-gray behind the menus.
            Mode::Menu(_) => wgpu::Color {
                r: 0.118,
                g: 0.118,
                b: 0.196,
                a: 1.0,
            },
            // Dark gray shoulder area around the road.
            Mode::Playing | Mode::GameOver { .. } => wgpu::Color {
                r: 0.196,
                g: 0.196,
                b: 0.196,
                a: 1.0,
            },
        }
    }
}

struct App {
    config: GameConfig,
    state: Option<GameState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform_config = PlatformConfig {
            title: self.config.window_title.clone(),
            width: self.config.window_width,
            height: self.config.window_height,
        };
        let window = lr_platform::window::create_window(event_loop, &platform_config);
        self.state = Some(GameState::new(window, self.config.clone()));
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
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.ui.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    state.session.handle_resize(w, h);
                    state.textures_dirty = true;
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.clock.begin_frame();
                while state.clock.should_step() {
                    state.fixed_step();
                }

                if state.textures_dirty {
                    state.refresh_textures();
                    state.textures_dirty = false;
                }
                state.upload_mesh();

                // Render phase reads finalized simulation state.
                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let (ui_primitives, ui_textures_delta, ui_actions) =
                    state.ui.prepare(&state.window, state.ui_view());

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut last_bound_texture_key: Option<&Arc<str>> = None;
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(state.clear_color()),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                    for draw in &state.draw_calls {
                        if let Some(texture) = state.textures.get(&draw.texture_key) {
                            let need_rebind = match last_bound_texture_key {
                                Some(last) => **last != *draw.texture_key,
                                None => true,
                            };
                            if need_rebind {
                                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                                last_bound_texture_key = Some(&draw.texture_key);
                            }
                            render_pass.draw_indexed(
                                draw.index_start..(draw.index_start + draw.index_count),
                                0,
                                0..1,
                            );
                        }
                    }
                }

                state.ui.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &ui_primitives,
                    &ui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut ui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("UI Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .ui
                        .paint(&mut ui_pass, &ui_primitives, &screen_descriptor);
                }

                state.ui.cleanup(&ui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                state.apply_ui_actions(ui_actions, event_loop);

                // Only clear edge-triggered input after at least one fixed
                // step consumed it. Otherwise a press that lands on a frame
                // with 0 simulation steps is silently lost.
                if state.clock.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Append an axis-aligned quad with top-left anchored coordinates. UVs map
/// the full texture with v growing downward, matching the screen-space
/// camera.
fn add_quad(
    vertices: &mut Vec<SpriteVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    spec: QuadSpec<'_>,
) {
    let base_index = vertices.len() as u32;
    let (x0, y0) = (spec.x, spec.y);
    let (x1, y1) = (spec.x + spec.width, spec.y + spec.height);

    vertices.push(SpriteVertex {
        position: [x0, y0],
        tex_coords: [0.0, 0.0],
        tint: spec.tint,
    });
    vertices.push(SpriteVertex {
        position: [x1, y0],
        tex_coords: [1.0, 0.0],
        tint: spec.tint,
    });
    vertices.push(SpriteVertex {
        position: [x1, y1],
        tex_coords: [1.0, 1.0],
        tint: spec.tint,
    });
    vertices.push(SpriteVertex {
        position: [x0, y1],
        tex_coords: [0.0, 1.0],
        tint: spec.tint,
    });

    let draw_start = indices.len() as u32;
    indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);

    push_draw_call(draw_calls, Arc::from(spec.texture_key), draw_start, 6);
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous. The scene emits road, enemy and player in a
/// stable order, so the two road quads always collapse into one call.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}

fn preview_key(model_number: u8) -> String {
    format!("preview{model_number}")
}

fn move_intent(input: &InputState) -> MoveIntent {
    MoveIntent {
        left: input.is_held(Key::Left) || input.is_held(Key::A),
        right: input.is_held(Key::Right) || input.is_held(Key::D),
        up: input.is_held(Key::Up) || input.is_held(Key::W),
        down: input.is_held(Key::Down) || input.is_held(Key::S),
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Digit1 => Some(Key::Digit1),
        KeyCode::Digit2 => Some(Key::Digit2),
        KeyCode::Digit3 => Some(Key::Digit3),
        KeyCode::Digit4 => Some(Key::Digit4),
        KeyCode::Digit5 => Some(Key::Digit5),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Lane Rush starting...");

    let config = config::load_or_default(Path::new(config::CONFIG_PATH));

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
