//! Menu, HUD and game-over screens rendered via egui on top of the scene.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! The layer is purely declarative toward the game: `prepare` takes a
//! `UiView` describing what to show and returns a `UiActions` struct of
//! button results. It never touches game state itself. The car preview on
//! the selection screen is drawn by the sprite renderer underneath; this
//! layer only leaves a hole for it.

use winit::window::Window;

const BUTTON_SIZE: [f32; 2] = [180.0, 44.0];
const BUTTON_FILL: egui::Color32 = egui::Color32::from_rgb(70, 130, 180);
const BUTTON_HOVER_FILL: egui::Color32 = egui::Color32::from_rgb(100, 149, 237);
const QUIT_FILL: egui::Color32 = egui::Color32::from_rgb(180, 70, 70);
const SELECT_FILL: egui::Color32 = egui::Color32::from_rgb(70, 180, 70);
const DIM_TEXT: egui::Color32 = egui::Color32::from_rgb(200, 200, 200);

/// What the UI layer should draw this frame.
#[derive(Debug, Clone, Copy)]
pub enum UiView {
    MainMenu,
    CarSelect { model: u8 },
    Instructions,
    Hud { score: u64, high_score: u64, fps: f64 },
    GameOver { score: u64, high_score: u64, new_record: bool },
}

/// Button results for one frame. Consumed by the main loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiActions {
    pub start_game: bool,
    pub open_car_select: bool,
    pub open_instructions: bool,
    pub back_to_menu: bool,
    pub prev_car: bool,
    pub next_car: bool,
    pub select_car: bool,
    pub retry: bool,
    pub quit: bool,
}

pub struct UiLayer {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl UiLayer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        apply_theme(&egui_ctx);
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
        }
    }

    /// Returns true when egui consumed the event (pointer over a button etc.).
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        view: UiView,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        UiActions,
    ) {
        let mut actions = UiActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| match view {
            UiView::MainMenu => draw_main_menu(ctx, &mut actions),
            UiView::CarSelect { model } => draw_car_select(ctx, model, &mut actions),
            UiView::Instructions => draw_instructions(ctx, &mut actions),
            UiView::Hud {
                score,
                high_score,
                fps,
            } => draw_hud(ctx, score, high_score, fps),
            UiView::GameOver {
                score,
                high_score,
                new_record,
            } => draw_game_over(ctx, score, high_score, new_record, &mut actions),
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals.widgets.inactive.weak_bg_fill = BUTTON_FILL;
    style.visuals.widgets.hovered.weak_bg_fill = BUTTON_HOVER_FILL;
    style.visuals.widgets.active.weak_bg_fill = BUTTON_HOVER_FILL;
    style.visuals.widgets.inactive.fg_stroke =
        egui::Stroke::new(1.0, egui::Color32::WHITE);
    style.visuals.widgets.hovered.bg_stroke =
        egui::Stroke::new(3.0, egui::Color32::WHITE);
    style.visuals.window_fill = egui::Color32::TRANSPARENT;
    style.visuals.panel_fill = egui::Color32::TRANSPARENT;
    ctx.set_style(style);
}

fn menu_button(ui: &mut egui::Ui, label: &str, fill: egui::Color32) -> bool {
    ui.add_sized(
        BUTTON_SIZE,
        egui::Button::new(
            egui::RichText::new(label)
                .size(22.0)
                .color(egui::Color32::WHITE),
        )
        .fill(fill)
        .stroke(egui::Stroke::new(2.0, egui::Color32::WHITE)),
    )
    .clicked()
}

fn title(ui: &mut egui::Ui, text: &str, size: f32, color: egui::Color32) {
    ui.label(egui::RichText::new(text).size(size).strong().color(color));
}

fn draw_main_menu(ctx: &egui::Context, actions: &mut UiActions) {
    egui::Area::new(egui::Id::new("main_menu"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                title(ui, "LANE RUSH", 52.0, egui::Color32::WHITE);
                ui.label(
                    egui::RichText::new("Drive and Survive!")
                        .size(24.0)
                        .color(DIM_TEXT),
                );
                ui.add_space(30.0);
                if menu_button(ui, "New Game", BUTTON_FILL) {
                    actions.start_game = true;
                }
                ui.add_space(12.0);
                if menu_button(ui, "Change Car", BUTTON_FILL) {
                    actions.open_car_select = true;
                }
                ui.add_space(12.0);
                if menu_button(ui, "Instructions", BUTTON_FILL) {
                    actions.open_instructions = true;
                }
                ui.add_space(12.0);
                if menu_button(ui, "Quit", QUIT_FILL) {
                    actions.quit = true;
                }
            });
        });
}

fn draw_car_select(ctx: &egui::Context, model: u8, actions: &mut UiActions) {
    egui::Area::new(egui::Id::new("car_select_top"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 40.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                title(ui, "SELECT YOUR CAR", 44.0, egui::Color32::WHITE);
                ui.label(
                    egui::RichText::new(format!("Car {model}"))
                        .size(22.0)
                        .color(DIM_TEXT),
                );
            });
        });

    // Bottom half: preview sprite is drawn by the game renderer in the gap.
    egui::Area::new(egui::Id::new("car_select_controls"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -60.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.horizontal(|ui| {
                    if menu_button(ui, "Previous", BUTTON_FILL) {
                        actions.prev_car = true;
                    }
                    ui.add_space(40.0);
                    if menu_button(ui, "Next", BUTTON_FILL) {
                        actions.next_car = true;
                    }
                });
                ui.add_space(16.0);
                if menu_button(ui, "Select the Car", SELECT_FILL) {
                    actions.select_car = true;
                }
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new("Use Previous/Next or Arrow Keys, Enter to confirm")
                        .size(16.0)
                        .color(DIM_TEXT),
                );
                ui.label(
                    egui::RichText::new("Press ESC to return to main menu")
                        .size(14.0)
                        .color(egui::Color32::from_rgb(150, 150, 150)),
                );
            });
        });
}

fn draw_instructions(ctx: &egui::Context, actions: &mut UiActions) {
    egui::Area::new(egui::Id::new("instructions"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 40.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                title(ui, "GAME INSTRUCTIONS", 40.0, egui::Color32::WHITE);
                ui.add_space(20.0);

                let sections: [(&str, &[&str]); 3] = [
                    (
                        "GAME CONTROLS:",
                        &[
                            "ARROW KEYS or WASD - Move your car",
                            "LEFT/RIGHT ARROWS - Change car in selection",
                            "Numbers 1-5 - Change car model during game",
                            "ESC - Return to main menu",
                        ],
                    ),
                    (
                        "GAME OBJECTIVES:",
                        &[
                            "- Avoid colliding with enemy cars",
                            "- Survive as long as possible",
                        ],
                    ),
                    (
                        "FEATURES:",
                        &[
                            "- Dynamic screen resizing support",
                            "- Multiple car models to choose from",
                            "- Pixel-accurate collision detection",
                        ],
                    ),
                ];

                for (header, lines) in sections {
                    ui.label(
                        egui::RichText::new(header)
                            .size(24.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                    ui.add_space(6.0);
                    for line in lines {
                        ui.label(egui::RichText::new(*line).size(18.0).color(DIM_TEXT));
                    }
                    ui.add_space(16.0);
                }

                ui.add_space(10.0);
                if menu_button(ui, "Back", BUTTON_FILL) {
                    actions.back_to_menu = true;
                }
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new("Press ESC to return to main menu")
                        .size(14.0)
                        .color(egui::Color32::from_rgb(150, 150, 150)),
                );
            });
        });
}

fn draw_hud(ctx: &egui::Context, score: u64, high_score: u64, fps: f64) {
    egui::Area::new(egui::Id::new("hud"))
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("Score: {score}"))
                    .size(26.0)
                    .strong()
                    .color(egui::Color32::WHITE),
            );
            ui.label(
                egui::RichText::new(format!("Best: {high_score}"))
                    .size(18.0)
                    .color(DIM_TEXT),
            );
            ui.label(
                egui::RichText::new(format!("{fps:.0} FPS"))
                    .size(12.0)
                    .color(egui::Color32::from_rgb(150, 150, 150)),
            );
        });
}

fn draw_game_over(
    ctx: &egui::Context,
    score: u64,
    high_score: u64,
    new_record: bool,
    actions: &mut UiActions,
) {
    egui::Area::new(egui::Id::new("game_over"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                title(ui, "Game Over", 56.0, egui::Color32::from_rgb(255, 0, 0));
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new(format!("Score: {score}"))
                        .size(26.0)
                        .color(egui::Color32::WHITE),
                );
                if new_record {
                    ui.label(
                        egui::RichText::new("New high score!")
                            .size(22.0)
                            .strong()
                            .color(egui::Color32::from_rgb(255, 215, 0)),
                    );
                } else {
                    ui.label(
                        egui::RichText::new(format!("Best: {high_score}"))
                            .size(20.0)
                            .color(DIM_TEXT),
                    );
                }
                ui.add_space(24.0);
                if menu_button(ui, "Try Again", BUTTON_FILL) {
                    actions.retry = true;
                }
                ui.add_space(12.0);
                if menu_button(ui, "Quit", QUIT_FILL) {
                    actions.quit = true;
                }
            });
        });
}
