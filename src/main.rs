#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use splicewave::{SpliceWaveApp, StartupConfig};

fn parse_startup_config() -> StartupConfig {
    let mut cfg = StartupConfig::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--open-folder" => {
                if let Some(p) = args.next() {
                    cfg.open_folder = Some(std::path::PathBuf::from(p));
                }
            }
            "--output-folder" => {
                if let Some(p) = args.next() {
                    cfg.output_folder = Some(std::path::PathBuf::from(p));
                }
            }
            _ => {}
        }
    }
    cfg
}

fn main() -> eframe::Result<()> {
    let cfg = parse_startup_config();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "SpliceWave",
        options,
        Box::new(move |cc| Ok(Box::new(SpliceWaveApp::new(cc, cfg)))),
    )
}
