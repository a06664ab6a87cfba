//! Native window surface built on raylib.

mod texture_loader;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use rand::rngs::ThreadRng;
use raylib::prelude::*;

use crate::clock::IntervalScheduler;
use crate::constants::*;
use crate::glitch::{GlitchOverlay, GlitchSettings};
use crate::layout::{self, Grid};
use crate::panel::PanelVisibility;
use crate::session::Session;
use crate::surface::Surface;
use texture_loader::TextureCache;

const GAP: f32 = 4.0;
const PANEL_FONT: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleGroup(usize),
    TogglePlayback,
    StepFrequency(i64),
    ToggleGlitch,
    StepGlitch(i16),
}

const GROUP_KEYS: [KeyboardKey; 9] = [
    KeyboardKey::KEY_ONE,
    KeyboardKey::KEY_TWO,
    KeyboardKey::KEY_THREE,
    KeyboardKey::KEY_FOUR,
    KeyboardKey::KEY_FIVE,
    KeyboardKey::KEY_SIX,
    KeyboardKey::KEY_SEVEN,
    KeyboardKey::KEY_EIGHT,
    KeyboardKey::KEY_NINE,
];

pub struct WindowSurface {
    rl: RaylibHandle,
    thread: RaylibThread,
    textures: TextureCache,
    panel: PanelVisibility,
    panel_lines: Vec<String>,
    rng: ThreadRng,
}

impl WindowSurface {
    pub fn open(root: PathBuf) -> Self {
        let (mut rl, thread) = raylib::init()
            .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
            .title("gridshow")
            .vsync()
            .resizable()
            .build();
        rl.set_target_fps(FPS);
        rl.set_trace_log(TraceLogLevel::LOG_ERROR);

        Self {
            rl,
            thread,
            textures: TextureCache::new(root),
            panel: PanelVisibility::default(),
            panel_lines: Vec::new(),
            rng: rand::rng(),
        }
    }

    pub fn frame_time(&self) -> f32 {
        self.rl.get_frame_time()
    }

    /// Loads the selected groups' textures before they are first drawn.
    pub fn preload(&mut self, references: &[&str]) {
        self.textures.sync(&mut self.rl, &self.thread, references);
    }

    pub fn set_panel_lines(&mut self, lines: Vec<String>) {
        self.panel_lines = lines;
    }

    /// Reads this frame's input. Also drives the panel's idle timer.
    pub fn poll_commands(&mut self, dt: f32) -> Vec<Command> {
        let rl = &self.rl;
        let mut commands = Vec::new();

        for (idx, key) in GROUP_KEYS.iter().enumerate() {
            if rl.is_key_pressed(*key) {
                commands.push(Command::ToggleGroup(idx));
            }
        }
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            commands.push(Command::TogglePlayback);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_UP) {
            commands.push(Command::StepFrequency(1));
        }
        if rl.is_key_pressed(KeyboardKey::KEY_DOWN) {
            commands.push(Command::StepFrequency(-1));
        }
        if rl.is_key_pressed(KeyboardKey::KEY_G) {
            commands.push(Command::ToggleGlitch);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT_BRACKET) {
            commands.push(Command::StepGlitch(GLITCH_STEP as i16));
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT_BRACKET) {
            commands.push(Command::StepGlitch(-(GLITCH_STEP as i16)));
        }

        let mouse = rl.get_mouse_delta();
        let moved = mouse.x != 0.0 || mouse.y != 0.0;
        if moved || !commands.is_empty() {
            self.panel.wake();
        } else {
            self.panel.update(dt);
        }
        commands
    }

    fn draw_panel(d: &mut RaylibDrawHandle, lines: &[String]) {
        let height = PANEL_FONT * (lines.len() as i32) + 16;
        // Rough glyph width for the default font
        let longest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as i32;
        let width = longest * PANEL_FONT * 3 / 5 + 24;
        d.draw_rectangle(8, 8, width, height, Color::new(0, 0, 0, 180));
        for (i, line) in lines.iter().enumerate() {
            d.draw_text(line, 20, 16 + i as i32 * PANEL_FONT, PANEL_FONT, Color::WHITE);
        }
    }
}

// Draws `texture` centered in `cell`, scaled to fit
fn draw_fitted(d: &mut RaylibDrawHandle, texture: &Texture2D, cell: layout::Rect) {
    let tex_width = texture.width() as f32;
    let tex_height = texture.height() as f32;
    let target = cell.fit(tex_width, tex_height);

    d.draw_texture_pro(
        texture,
        Rectangle::new(0.0, 0.0, tex_width, tex_height),
        Rectangle::new(target.x, target.y, target.width, target.height),
        Vector2::new(0.0, 0.0),
        0.0,
        Color::WHITE,
    );
}

impl Surface for WindowSurface {
    fn present(&mut self, grid: &Grid, _frame_index: u64, glitch: &GlitchSettings) {
        let sw = self.rl.get_screen_width() as f32;
        let sh = self.rl.get_screen_height() as f32;
        let area = layout::Rect::new(0.0, 0.0, sw, sh);
        let bands = GlitchOverlay::bands(&mut self.rng, area, glitch);
        let shape = grid.shape();
        let show_panel = self.panel.is_visible();

        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(Color::BLACK);

        for (idx, cell) in grid.cells().iter().enumerate() {
            let Some(rect) = shape.cell_rect(idx, area) else {
                continue;
            };
            let inner = layout::Rect::new(
                rect.x + GAP,
                rect.y + GAP,
                (rect.width - 2.0 * GAP).max(0.0),
                (rect.height - 2.0 * GAP).max(0.0),
            );
            if let Some(texture) = cell.image.as_deref().and_then(|r| self.textures.get(r)) {
                draw_fitted(&mut d, texture, inner);
            }
        }

        for band in &bands {
            let [r, g, b, a] = band.tint;
            d.draw_rectangle_rec(
                Rectangle::new(band.rect.x + band.offset_x, band.rect.y, band.rect.width, band.rect.height),
                Color::new(r, g, b, a),
            );
        }

        if grid.is_empty() {
            d.draw_text("Press 1-9 to show a group", 20, sh as i32 - 40, PANEL_FONT, Color::GRAY);
        }
        if show_panel {
            Self::draw_panel(&mut d, &self.panel_lines);
        }
    }

    fn is_open(&self) -> bool {
        !self.rl.window_should_close()
    }
}

fn apply_command(session: &mut Session<IntervalScheduler>, command: Command) {
    match command {
        Command::ToggleGroup(idx) => {
            if let Err(e) = session.toggle_group_at(idx) {
                warn!("{}", e);
            }
        }
        Command::TogglePlayback => {
            session.toggle_playback();
        }
        Command::StepFrequency(delta) => {
            session.step_frequency(delta);
        }
        Command::ToggleGlitch => {
            session.glitch_mut().toggle();
        }
        Command::StepGlitch(delta) => session.glitch_mut().adjust_intensity(delta),
    }
}

fn panel_lines(session: &Session<IntervalScheduler>) -> Vec<String> {
    let mut lines: Vec<String> = session
        .toggles()
        .names()
        .enumerate()
        .map(|(i, name)| {
            let mark = if session.toggles().is_checked(name) { "x" } else { " " };
            format!("[{}] {} {}", mark, i + 1, name)
        })
        .collect();
    lines.push(format!(
        "[Space] {}   [Up/Down] {}",
        session.playback_state().label(),
        session.frequency()
    ));
    lines.push(format!(
        "[G] glitch {}   [ [ / ] ] intensity {}%",
        if session.glitch().enabled { "on" } else { "off" },
        session.glitch().intensity()
    ));
    lines
}

/// Runs the slideshow in a window until it is closed.
pub fn run(mut session: Session<IntervalScheduler>, root: PathBuf) -> Result<()> {
    let mut surface = WindowSurface::open(root);
    surface.preload(&session.selected_images());
    // Loading took wall time the clock must not see
    let mut skip_dt = true;
    info!("Window opened: {}", session.status_line());

    while surface.is_open() {
        let dt = if skip_dt { 0.0 } else { surface.frame_time() };
        skip_dt = false;
        for command in surface.poll_commands(dt) {
            let selection = session.toggles().selection();
            apply_command(&mut session, command);
            if session.toggles().selection() != selection {
                surface.preload(&session.selected_images());
                skip_dt = true;
            }
            info!("{}", session.status_line());
        }

        session.scheduler_mut().advance(Duration::from_secs_f32(dt.max(0.0)));
        session.pump();

        surface.set_panel_lines(panel_lines(&session));
        surface.present(session.grid(), session.frame_index(), session.glitch());
    }

    info!("Window closed at frame {} ({} textures loaded)", session.frame_index(), surface.textures.len());
    Ok(())
}
