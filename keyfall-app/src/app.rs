use crate::surface::{restore_antialiasing, EguiSurface};
use egui::{Color32, Context, Key, RichText, Sense};
use keyfall_core::{display_name, Command, Event, PlaybackSession, SessionState};
use keyfall_ports::types::Viewport;
use std::path::PathBuf;
use std::time::Instant;

const MENU_BACKGROUND: Color32 = Color32::from_rgb(0x1a, 0x52, 0x76);
const ACCENT: Color32 = Color32::from_rgb(0x2d, 0xa4, 0x4e);

pub struct KeyfallApp {
    session: PlaybackSession,
    status: Option<String>,
}

impl KeyfallApp {
    pub fn new(session: PlaybackSession) -> Self {
        let mut app = Self {
            session,
            status: None,
        };
        app.absorb_events();
        app
    }

    fn send(&mut self, command: Command) {
        if let Err(err) = self.session.handle_command(command) {
            log::warn!("{err}");
            self.status = Some(err.to_string());
        }
        self.absorb_events();
    }

    fn open(&mut self, path: PathBuf) {
        self.status = None;
        self.send(Command::OpenFile {
            path: path.to_string_lossy().into_owned(),
        });
    }

    fn absorb_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                Event::LoadFailed { path, message } => {
                    self.status = Some(format!("Could not open {}: {message}", display_name(&path)));
                }
                Event::AudioUnavailable { message } => {
                    self.status = Some(format!("Playing without sound: {message}"));
                }
                Event::PlaybackStarted {
                    path, note_count, ..
                } => {
                    log::info!("playing {} ({note_count} notes)", display_name(&path));
                }
                Event::SessionStateUpdated { .. } | Event::RecentsUpdated { .. } => {}
            }
        }
    }

    fn show_menu(&mut self, ctx: &Context) {
        restore_antialiasing(ctx);
        let mut selected: Option<PathBuf> = None;

        egui::SidePanel::left("side_panel")
            .resizable(false)
            .min_width(250.0)
            .frame(egui::Frame::none().fill(MENU_BACKGROUND).inner_margin(30.0))
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("keyfall")
                        .size(40.0)
                        .strong()
                        .color(Color32::WHITE),
                );
                ui.add_space(30.0);
                let play = egui::Button::new(RichText::new("Play a Song").size(16.0).strong())
                    .fill(ACCENT)
                    .min_size(egui::vec2(ui.available_width(), 44.0));
                if ui.add(play).clicked() {
                    selected = rfd::FileDialog::new()
                        .set_title("Open MIDI")
                        .add_filter("MIDI", &["mid", "midi"])
                        .pick_file();
                }
                ui.add_space(8.0);
                let exit = egui::Button::new(RichText::new("Exit").size(16.0).strong())
                    .min_size(egui::vec2(ui.available_width(), 44.0));
                if ui.add(exit).clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Recently Played");
            if let Some(status) = &self.status {
                ui.colored_label(Color32::from_rgb(0xcf, 0x22, 0x2e), status);
            }
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                for path in self.session.recents().paths() {
                    let row = ui
                        .selectable_label(false, display_name(path))
                        .on_hover_text(path.as_str());
                    if row.double_clicked() {
                        selected = Some(PathBuf::from(path));
                    }
                }
            });
        });

        if let Some(path) = selected {
            self.open(path);
        }
    }

    fn show_playfield(&mut self, ctx: &Context) {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.send(Command::Cancel);
            return;
        }

        let now = Instant::now();
        self.session.poll_tick(now);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
                let area = response.rect;
                let mut surface = EguiSurface::new(&painter, area);
                self.session.render_at(
                    &mut surface,
                    Viewport::new(area.width(), area.height()),
                    now,
                );
            });

        if let Some(wait) = self.session.time_until_next_frame(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for KeyfallApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        match self.session.state() {
            SessionState::Playing => self.show_playfield(ctx),
            SessionState::Idle | SessionState::Loading | SessionState::Stopped => {
                self.show_menu(ctx)
            }
        }
    }
}
