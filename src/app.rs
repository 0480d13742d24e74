use std::path::PathBuf;

use egui::{Color32, RichText, Sense, Stroke, Visuals};

use crate::audio::AudioEngine;
use crate::buffer::SampleBuffer;
use crate::error::SpliceError;
use crate::ledger::UsedFileLedger;
use crate::selection::Selection;
use crate::splice::{RegionKind, SpliceResult, PAD_MS};
use crate::wave::{build_minmax, resample_linear};
use crate::workflow;

const WAVE_COLOR: Color32 = Color32::from_rgb(0, 217, 255);
const PAD_COLOR: Color32 = Color32::from_rgb(255, 215, 0);
const AUDIO_REGION_COLOR: Color32 = Color32::from_rgb(74, 222, 128);
const CURSOR_COLOR: Color32 = Color32::from_rgb(255, 107, 107);
const WAVE_BINS: usize = 2048;

#[derive(Clone, Debug, Default)]
pub struct StartupConfig {
    pub open_folder: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
}

struct LoadedSource {
    filename: String,
    buffer: SampleBuffer,
    waveform: Vec<(f32, f32)>,
}

/// What the engine is currently fed with, so the playback cursor can be
/// drawn on the right canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlaybackTarget {
    None,
    Original,
    Selection,
    Output,
}

pub struct SpliceWaveApp {
    audio: AudioEngine,
    source_folder: Option<PathBuf>,
    output_folder: Option<PathBuf>,
    files: Vec<String>,
    ledger: UsedFileLedger,
    current: Option<LoadedSource>,
    selection: Selection,
    sel_raw_ms: Option<(f64, f64)>,
    splice: Option<SpliceResult>,
    preview_wave: Vec<(f32, f32)>,
    pad_enabled: bool,
    output_name: String,
    pending_overwrite: Option<PathBuf>,
    playback_target: PlaybackTarget,
    drag_anchor_ms: Option<f64>,
    volume: f32,
    status: String,
}

impl SpliceWaveApp {
    pub fn new(cc: &eframe::CreationContext<'_>, cfg: StartupConfig) -> Self {
        let mut visuals = Visuals::dark();
        visuals.panel_fill = Color32::from_rgb(18, 18, 24);
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(22, 22, 30);
        cc.egui_ctx.set_visuals(visuals);

        let audio = AudioEngine::new().unwrap_or_else(|err| {
            eprintln!("audio device unavailable, playback disabled: {err:#}");
            AudioEngine::new_for_test()
        });
        Self::from_parts(audio, cfg)
    }

    fn from_parts(audio: AudioEngine, cfg: StartupConfig) -> Self {
        let mut app = Self {
            audio,
            source_folder: None,
            output_folder: cfg.output_folder,
            files: Vec::new(),
            ledger: UsedFileLedger::new(),
            current: None,
            selection: Selection::empty(),
            sel_raw_ms: None,
            splice: None,
            preview_wave: Vec::new(),
            pad_enabled: true,
            output_name: String::new(),
            pending_overwrite: None,
            playback_target: PlaybackTarget::None,
            drag_anchor_ms: None,
            volume: 1.0,
            status: "Ready - Select a folder to load audio files".to_string(),
        };
        if let Some(folder) = cfg.open_folder {
            app.open_source_folder(folder);
        }
        app
    }

    fn open_source_folder(&mut self, folder: PathBuf) {
        self.files = workflow::list_audio_files(&folder);
        self.ledger = UsedFileLedger::load(&folder);
        self.source_folder = Some(folder);
        self.current = None;
        self.clear_selection();
        self.status = format!("Loaded {} audio files from folder", self.files.len());
    }

    fn clear_selection(&mut self) {
        self.selection = Selection::empty();
        self.sel_raw_ms = None;
        self.splice = None;
        self.preview_wave.clear();
        self.drag_anchor_ms = None;
    }

    fn load_file(&mut self, filename: &str) {
        let Some(folder) = self.source_folder.clone() else {
            return;
        };
        self.audio.stop();
        self.playback_target = PlaybackTarget::None;
        match workflow::select_source(&folder.join(filename)) {
            Ok((buffer, suggested_name)) => {
                let mut waveform = Vec::new();
                build_minmax(&mut waveform, buffer.samples(), WAVE_BINS);
                self.current = Some(LoadedSource {
                    filename: filename.to_string(),
                    buffer,
                    waveform,
                });
                self.clear_selection();
                self.output_name = suggested_name;
                self.status = format!("Loaded: {filename}");
            }
            Err(err) => {
                self.status = format!("Could not load {filename}: {err}");
            }
        }
    }

    fn on_selection_drag(&mut self, start_ms: f64, end_ms: f64) {
        let Some(source) = &self.current else {
            return;
        };
        let (selection, splice) =
            workflow::update_selection(&source.buffer, start_ms, end_ms, self.pad_enabled);
        self.selection = selection;
        self.sel_raw_ms = Some((start_ms, end_ms));
        self.preview_wave.clear();
        if let Some(result) = &splice {
            build_minmax(&mut self.preview_wave, result.samples(), WAVE_BINS);
        }
        self.splice = splice;
    }

    fn rebuild_output(&mut self) {
        if let Some((a, b)) = self.sel_raw_ms {
            self.on_selection_drag(a, b);
        }
    }

    fn play_samples(&mut self, samples: &[f32], sample_rate: u32, target: PlaybackTarget) {
        self.audio.stop();
        let resampled = resample_linear(samples, sample_rate, self.audio.shared.out_sample_rate);
        self.audio.set_samples(resampled);
        self.audio.play();
        self.playback_target = target;
        self.status = "Playing...".to_string();
    }

    /// Audition the raw selection, without any padding the output build
    /// would add.
    fn play_selection(&mut self) {
        let Some(source) = &self.current else {
            return;
        };
        let Some(slice) = self.selection.slice(&source.buffer) else {
            return;
        };
        let samples = slice.to_vec();
        let sr = source.buffer.sample_rate();
        self.play_samples(&samples, sr, PlaybackTarget::Selection);
    }

    fn do_save(&mut self, overwrite: bool) {
        let Some(source) = &self.current else {
            self.status = "Load a file first".to_string();
            return;
        };
        let Some(source_folder) = self.source_folder.clone() else {
            self.status = "Select a source folder first".to_string();
            return;
        };
        let filename = source.filename.clone();
        match workflow::save(
            &filename,
            self.splice.as_ref(),
            self.output_folder.as_deref(),
            &self.output_name,
            overwrite,
            &mut self.ledger,
            &source_folder,
        ) {
            Ok(outcome) => {
                self.status = match outcome.ledger_error {
                    None => format!("Saved: {}", outcome.path.display()),
                    Some(err) => format!(
                        "Saved: {} (used-file ledger not updated: {err})",
                        outcome.path.display()
                    ),
                };
            }
            Err(SpliceError::FileExists(path)) => {
                // re-prompt instead of silently skipping or overwriting
                self.pending_overwrite = Some(path);
            }
            Err(err) => {
                self.status = format!("Save failed: {err}");
            }
        }
    }

    fn file_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Source Folder");
        if ui.button("Select Folder...").clicked() {
            if let Some(folder) = rfd::FileDialog::new().pick_folder() {
                self.open_source_folder(folder);
            }
        }
        if let Some(folder) = &self.source_folder {
            ui.label(RichText::new(folder.display().to_string()).weak());
        }
        ui.separator();

        ui.heading("Audio Files");
        let used = self.files.iter().filter(|f| self.ledger.is_used(f)).count();
        ui.label(format!("{} files ({} used)", self.files.len(), used));
        let mut clicked: Option<String> = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height((ui.available_height() - 120.0).max(100.0))
            .show(ui, |ui| {
                for name in &self.files {
                    let is_used = self.ledger.is_used(name);
                    let is_current = self
                        .current
                        .as_ref()
                        .map(|c| &c.filename == name)
                        .unwrap_or(false);
                    let label = if is_used {
                        format!("\u{2713} {name}")
                    } else {
                        name.clone()
                    };
                    let text = if is_used {
                        RichText::new(label).color(AUDIO_REGION_COLOR)
                    } else {
                        RichText::new(label)
                    };
                    if ui.selectable_label(is_current, text).clicked() {
                        clicked = Some(name.clone());
                    }
                }
            });
        if let Some(name) = clicked {
            self.load_file(&name);
        }
        ui.separator();

        ui.heading("Output Folder");
        if ui.button("Select Output Folder...").clicked() {
            if let Some(folder) = rfd::FileDialog::new().pick_folder() {
                self.output_folder = Some(folder);
            }
        }
        match &self.output_folder {
            Some(folder) => {
                ui.label(RichText::new(folder.display().to_string()).weak());
            }
            None => {
                ui.label(RichText::new("No output folder selected").weak());
            }
        }
    }

    fn draw_minmax(
        painter: &egui::Painter,
        rect: egui::Rect,
        waveform: &[(f32, f32)],
        color: Color32,
    ) {
        if waveform.is_empty() {
            return;
        }
        let mid = rect.center().y;
        let half_h = rect.height() * 0.48;
        let peak = waveform
            .iter()
            .map(|(mn, mx)| mn.abs().max(mx.abs()))
            .fold(0.0f32, f32::max)
            .max(1e-6);
        let step = rect.width() / waveform.len() as f32;
        for (i, &(mn, mx)) in waveform.iter().enumerate() {
            let x = rect.left() + (i as f32 + 0.5) * step;
            let y0 = mid - (mx / peak) * half_h;
            let y1 = mid - (mn / peak) * half_h;
            painter.line_segment(
                [egui::pos2(x, y0), egui::pos2(x, y1.max(y0 + 0.5))],
                Stroke::new(1.0, color),
            );
        }
    }

    fn source_canvas(&mut self, ui: &mut egui::Ui) {
        let avail_w = ui.available_width();
        let (resp, painter) =
            ui.allocate_painter(egui::vec2(avail_w, 180.0), Sense::click_and_drag());
        let rect = resp.rect;
        painter.rect_filled(rect, 4.0, Color32::from_rgb(16, 21, 40));
        let Some(source) = &self.current else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No file loaded",
                egui::TextStyle::Body.resolve(ui.style()),
                Color32::GRAY,
            );
            return;
        };
        Self::draw_minmax(&painter, rect, &source.waveform, WAVE_COLOR);

        let duration_ms = source.buffer.duration_ms();
        let sr = source.buffer.sample_rate();
        // selection overlay
        if !self.selection.is_empty() && duration_ms > 0.0 {
            let start_ms = self.selection.start_sample() as f64 / sr as f64 * 1000.0;
            let end_ms = self.selection.end_sample() as f64 / sr as f64 * 1000.0;
            let x0 = rect.left() + (start_ms / duration_ms) as f32 * rect.width();
            let x1 = rect.left() + (end_ms / duration_ms) as f32 * rect.width();
            let sel_rect =
                egui::Rect::from_min_max(egui::pos2(x0, rect.top()), egui::pos2(x1, rect.bottom()));
            painter.rect_filled(sel_rect, 0.0, WAVE_COLOR.gamma_multiply(0.25));
        }
        // playback cursor; selection playback starts at the selection's
        // left edge on this canvas
        let cursor_ms = match self.playback_target {
            PlaybackTarget::Original if self.audio.is_playing() => Some(self.audio.position_ms()),
            PlaybackTarget::Selection if self.audio.is_playing() => {
                let start_ms = self.selection.start_sample() as f64 / sr as f64 * 1000.0;
                Some(start_ms + self.audio.position_ms())
            }
            _ => None,
        };
        if let Some(pos_ms) = cursor_ms {
            if duration_ms > 0.0 {
                let x = rect.left() + (pos_ms / duration_ms).min(1.0) as f32 * rect.width();
                painter.line_segment(
                    [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                    Stroke::new(2.0, CURSOR_COLOR),
                );
            }
        }

        // drag selection: x position maps linearly onto the file's time axis
        let x_to_ms = |x: f32| -> f64 {
            let t = ((x - rect.left()) / rect.width().max(1.0)).clamp(0.0, 1.0);
            t as f64 * duration_ms
        };
        if resp.drag_started() {
            if let Some(pos) = resp.interact_pointer_pos() {
                self.drag_anchor_ms = Some(x_to_ms(pos.x));
            }
        }
        if resp.dragged() || resp.drag_stopped() {
            if let (Some(anchor), Some(pos)) = (self.drag_anchor_ms, resp.interact_pointer_pos()) {
                let here = x_to_ms(pos.x);
                self.on_selection_drag(anchor, here);
            }
        }
        if resp.drag_stopped() {
            self.drag_anchor_ms = None;
        }
    }

    fn preview_canvas(&mut self, ui: &mut egui::Ui) {
        let avail_w = ui.available_width();
        let (resp, painter) = ui.allocate_painter(egui::vec2(avail_w, 120.0), Sense::hover());
        let rect = resp.rect;
        painter.rect_filled(rect, 4.0, Color32::from_rgb(16, 21, 40));
        let Some(result) = &self.splice else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Select audio to see output preview",
                egui::TextStyle::Body.resolve(ui.style()),
                Color32::GRAY,
            );
            return;
        };
        let total_ms = result.duration_ms().max(1e-9);
        for region in result.regions() {
            let x0 = rect.left() + (region.start_ms / total_ms) as f32 * rect.width();
            let x1 = rect.left() + (region.end_ms / total_ms) as f32 * rect.width();
            let color = match region.kind {
                RegionKind::Silence => PAD_COLOR.gamma_multiply(0.18),
                RegionKind::Audio => AUDIO_REGION_COLOR.gamma_multiply(0.10),
            };
            let region_rect =
                egui::Rect::from_min_max(egui::pos2(x0, rect.top()), egui::pos2(x1, rect.bottom()));
            painter.rect_filled(region_rect, 0.0, color);
            if region.kind == RegionKind::Silence {
                painter.line_segment(
                    [egui::pos2(x1, rect.top()), egui::pos2(x1, rect.bottom())],
                    Stroke::new(1.0, PAD_COLOR.gamma_multiply(0.7)),
                );
            }
        }
        Self::draw_minmax(&painter, rect, &self.preview_wave, WAVE_COLOR);
        if self.audio.is_playing() && self.playback_target == PlaybackTarget::Output {
            let x = rect.left() + (self.audio.position_ms() / total_ms).min(1.0) as f32 * rect.width();
            painter.line_segment(
                [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                Stroke::new(2.0, CURSOR_COLOR),
            );
        }
    }

    fn selection_readout(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let Some(source) = &self.current else {
                ui.label("Start: -- ms  End: -- ms  Duration: -- ms");
                return;
            };
            if self.selection.is_empty() {
                ui.label("Start: -- ms  End: -- ms  Duration: -- ms");
            } else {
                let sr = source.buffer.sample_rate() as f64;
                let start_ms = self.selection.start_sample() as f64 / sr * 1000.0;
                let end_ms = self.selection.end_sample() as f64 / sr * 1000.0;
                ui.label(format!(
                    "Start: {start_ms:.1} ms  End: {end_ms:.1} ms  Duration: {:.1} ms",
                    self.selection.duration_ms(&source.buffer)
                ));
            }
        });
    }

    fn playback_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let has_file = self.current.is_some();
            let has_selection = self.splice.is_some();
            if ui
                .add_enabled(has_file, egui::Button::new("\u{25B6} Original"))
                .clicked()
            {
                if let Some(source) = &self.current {
                    let samples = source.buffer.samples().to_vec();
                    let sr = source.buffer.sample_rate();
                    self.play_samples(&samples, sr, PlaybackTarget::Original);
                }
            }
            if ui
                .add_enabled(
                    has_file && !self.selection.is_empty(),
                    egui::Button::new("\u{25B6} Selection"),
                )
                .clicked()
            {
                self.play_selection();
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("\u{25B6} Output"))
                .clicked()
            {
                if let Some(result) = &self.splice {
                    let samples = result.samples().to_vec();
                    let sr = result.sample_rate();
                    self.play_samples(&samples, sr, PlaybackTarget::Output);
                }
            }
            if ui.button("\u{23F9} Stop").clicked() {
                self.audio.stop();
                self.playback_target = PlaybackTarget::None;
            }
            ui.separator();
            if ui
                .add(egui::Slider::new(&mut self.volume, 0.0..=1.0).text("Vol"))
                .changed()
            {
                self.audio.set_volume(self.volume);
            }
        });
    }

    fn save_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut pad = self.pad_enabled;
            if ui
                .checkbox(&mut pad, format!("Add {PAD_MS} ms padding (start & end)"))
                .changed()
            {
                self.pad_enabled = pad;
                self.rebuild_output();
            }
        });
        ui.horizontal(|ui| {
            ui.label("Filename:");
            ui.add(
                egui::TextEdit::singleline(&mut self.output_name)
                    .hint_text("filename without extension")
                    .desired_width(260.0),
            );
            ui.label(".wav");
            if ui.button("\u{1F4BE} Save Spliced Audio").clicked() {
                self.do_save(false);
            }
        });
    }

    fn overwrite_modal(&mut self, ctx: &egui::Context) {
        let Some(path) = self.pending_overwrite.clone() else {
            return;
        };
        let mut decided: Option<bool> = None;
        egui::Window::new("File Exists")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "'{}' already exists. Overwrite?",
                    path.file_name()
                        .and_then(|s| s.to_str())
                        .unwrap_or("output.wav")
                ));
                ui.horizontal(|ui| {
                    if ui.button("Overwrite").clicked() {
                        decided = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decided = Some(false);
                    }
                });
            });
        match decided {
            Some(true) => {
                self.pending_overwrite = None;
                self.do_save(true);
            }
            Some(false) => {
                self.pending_overwrite = None;
                self.status = "Save cancelled".to_string();
            }
            None => {}
        }
    }
}


impl eframe::App for SpliceWaveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.audio.is_playing() {
            ctx.request_repaint();
        } else if self.playback_target != PlaybackTarget::None {
            self.playback_target = PlaybackTarget::None;
        }

        egui::SidePanel::left("files")
            .default_width(280.0)
            .show(ctx, |ui| {
                self.file_panel(ui);
            });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let title = self
                .current
                .as_ref()
                .map(|c| c.filename.clone())
                .unwrap_or_else(|| "No file loaded".to_string());
            ui.heading(title);
            ui.add_space(4.0);
            self.source_canvas(ui);
            self.selection_readout(ui);
            ui.add_space(8.0);
            ui.label(
                RichText::new("OUTPUT PREVIEW (what will be saved)")
                    .color(PAD_COLOR)
                    .strong(),
            );
            self.preview_canvas(ui);
            if let Some(result) = &self.splice {
                let total = result.duration_ms();
                if result.pad_samples() > 0 {
                    let pad = result.pad_ms();
                    ui.label(format!(
                        "Total output: {total:.1} ms ({pad:.0} ms + {:.1} ms + {pad:.0} ms)",
                        total - 2.0 * pad
                    ));
                } else {
                    ui.label(format!("Total output: {total:.1} ms"));
                }
            }
            ui.add_space(8.0);
            self.playback_controls(ui);
            ui.separator();
            self.save_controls(ui);
        });

        self.overwrite_modal(ctx);
    }
}
