//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use eframe::egui::{self, Context, Ui};
use egui_extras::{Column, TableBuilder};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cv_core::{
    detect_or_fallback, Action, AppMode, AppState, ChartDetector, ChartType, DatasetSummary, DetectionResult,
    Generation,
};
use cv_views::{ChartEngine, ChartOutcome, ExportFormat};

mod activity;
mod config;
mod detector;
mod painter;

use activity::ActivityLog;
use config::AppConfig;
use detector::OfflineDetector;

/// Results of background work, tagged with the request they answer
enum Message {
    Profiled {
        generation: Generation,
        file_name: String,
        result: std::result::Result<DatasetSummary, String>,
    },
    Detected {
        generation: Generation,
        result: DetectionResult,
    },
}

/// Main application state
struct ChartSketchApp {
    state: AppState,
    config: AppConfig,
    engine: ChartEngine,

    /// Outcome of the selected chart and the state version it was built for
    outcome: Option<(u64, ChartOutcome)>,

    activity: ActivityLog,
    detector: Arc<dyn ChartDetector>,

    /// Tokio runtime
    runtime: tokio::runtime::Runtime,
    sender: UnboundedSender<Message>,
    receiver: UnboundedReceiver<Message>,

    /// Egui context
    egui_ctx: egui::Context,
}

impl ChartSketchApp {
    fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, runtime: tokio::runtime::Runtime) -> Self {
        let state = AppState::new();
        let activity = ActivityLog::default();
        activity.attach(&state.events);

        let (sender, receiver) = unbounded_channel();

        Self {
            state,
            engine: ChartEngine::new(config.chart.clone()),
            config,
            outcome: None,
            activity,
            detector: Arc::new(OfflineDetector),
            runtime,
            sender,
            receiver,
            egui_ctx: cc.egui_ctx.clone(),
        }
    }

    /// Profile a CSV file off the UI thread
    fn open_csv_file(&mut self, path: PathBuf) {
        info!("Opening CSV file: {:?}", path);

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let generation = self.state.begin_upload(file_name.clone());

        let profiler = self.config.profiler.clone();
        let sender = self.sender.clone();
        let ctx = self.egui_ctx.clone();

        self.runtime.spawn(async move {
            let result = cv_data::profile_file(&path, &profiler).await.map_err(|e| e.to_string());
            let _ = sender.send(Message::Profiled { generation, file_name, result });
            ctx.request_repaint();
        });
    }

    /// Send an image to the detector off the UI thread
    fn detect_image(&mut self, path: PathBuf) {
        info!("Detecting chart in {:?}", path);

        let generation = self.state.begin_detection();
        let detector = self.detector.clone();
        let sender = self.sender.clone();
        let ctx = self.egui_ctx.clone();

        self.runtime.spawn(async move {
            let result = match tokio::fs::read(&path).await {
                Ok(image) => detect_or_fallback(detector.as_ref(), &image).await,
                Err(e) => {
                    error!("Failed to read image {:?}: {}", path, e);
                    DetectionResult::fallback()
                }
            };
            let _ = sender.send(Message::Detected { generation, result });
            ctx.request_repaint();
        });
    }

    fn poll_messages(&mut self) {
        while let Ok(message) = self.receiver.try_recv() {
            let action = match message {
                Message::Profiled { generation, file_name, result: Ok(summary) } => {
                    Action::UploadProfiled { generation, file_name, summary }
                }
                Message::Profiled { generation, file_name, result: Err(error) } => {
                    Action::UploadFailed { generation, file_name, error }
                }
                Message::Detected { generation, result } => Action::DetectionFinished { generation, result },
            };
            self.state.dispatch(action);
        }
    }

    /// Rebuild the chart when the state changed since the last build
    fn current_outcome(&mut self) -> Option<&ChartOutcome> {
        let chart_type = self.state.selected_chart()?;
        let dataset = self.state.dataset()?;

        let stale = !matches!(&self.outcome, Some((version, _)) if *version == self.state.version());
        if stale {
            let outcome = self.engine.outcome(chart_type, &dataset.summary);
            self.outcome = Some((self.state.version(), outcome));
        }
        self.outcome.as_ref().map(|(_, outcome)| outcome)
    }

    fn export_chart(&mut self, format: ExportFormat) -> Result<()> {
        let chart_type = self.state.selected_chart().context("No chart selected")?;
        let outcome = self.current_outcome().context("No chart to export")?.clone();

        let Some(path) = rfd::FileDialog::new()
            .add_filter(format.filter_name(), &[format.extension()])
            .set_file_name(format!("{}.{}", chart_type.id(), format.extension()))
            .save_file()
        else {
            return Ok(());
        };

        let contents = cv_views::export(&outcome, format, &self.config.chart.canvas)
            .context("Failed to serialize chart")?;
        std::fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

        info!("Exported {} to {}", chart_type, path.display());
        self.activity.push(format!("Exported {}", path.display()));
        Ok(())
    }

    fn handle_menu(&mut self) {
        let ctx = self.egui_ctx.clone();
        egui::TopBottomPanel::top("menu_bar").show(&ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Chart Sketch");
                ui.separator();

                let mode = self.state.mode();
                if ui.selectable_label(mode == AppMode::Upload, "Explore CSV").clicked() {
                    self.state.dispatch(Action::SetMode(AppMode::Upload));
                }
                if ui.selectable_label(mode == AppMode::Detect, "Detect chart").clicked() {
                    self.state.dispatch(Action::SetMode(AppMode::Detect));
                }

                ui.separator();

                if ui.button("Open CSV...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("CSV Files", &["csv", "txt"])
                        .pick_file()
                    {
                        self.state.dispatch(Action::SetMode(AppMode::Upload));
                        self.open_csv_file(path);
                    }
                }

                if ui.button("Reset").clicked() {
                    self.state.dispatch(Action::Reset);
                    self.outcome = None;
                }

                if let Some(name) = self.state.pending_upload() {
                    ui.spinner();
                    ui.label(format!("Sampling {}...", name));
                }
            });
        });
    }

    fn show_status_bar(&self, ctx: &Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(error) = self.state.last_error() {
                    ui.colored_label(egui::Color32::from_rgb(239, 68, 68), error);
                    ui.separator();
                }
                for entry in self.activity.recent(3) {
                    ui.label(entry);
                    ui.separator();
                }
            });
        });
    }

    fn show_dataset_panel(&mut self, ctx: &Context) {
        let Some(dataset) = self.state.dataset().cloned() else {
            return;
        };

        egui::SidePanel::left("dataset_panel").default_width(320.0).show(ctx, |ui| {
            ui.heading(&dataset.file_name);
            ui.label(format!(
                "~{} rows, {} columns (first {} rows sampled)",
                dataset.summary.estimated_row_count,
                dataset.summary.column_count,
                dataset.summary.rows.len()
            ));
            ui.separator();

            show_column_table(ui, &dataset.summary);

            ui.separator();
            ui.strong("Chart type");
            let selected = self.state.selected_chart();
            for chart_type in ChartType::ALL {
                if ui.selectable_label(selected == Some(chart_type), chart_type.label()).clicked() {
                    self.state.dispatch(Action::SelectChart(chart_type));
                }
            }
        });
    }

    fn show_chart(&mut self, ui: &mut Ui) {
        let Some(dataset) = self.state.dataset().cloned() else {
            show_welcome(ui);
            return;
        };
        let Some(chart_type) = self.state.selected_chart() else {
            ui.centered_and_justified(|ui| {
                ui.label("Pick a chart type on the left");
            });
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(chart_type.label());
            for format in ExportFormat::ALL {
                if ui.button(format!("Export {}", format.extension().to_uppercase())).clicked() {
                    if let Err(e) = self.export_chart(format) {
                        error!("Export failed: {:#}", e);
                        self.activity.push(format!("Export failed: {:#}", e));
                    }
                }
            }
        });

        let canvas = self.config.chart.canvas;
        if let Some(outcome) = self.current_outcome() {
            painter::paint(ui, outcome, &canvas);
        }

        ui.add_space(12.0);
        let code = cv_templates::snippets(chart_type, &dataset.summary, self.config.chart.heatmap_columns);
        show_code(ui, "R (ggplot2)", &code.r);
        show_code(ui, "Python (seaborn)", &code.python);
    }

    fn show_detection(&mut self, ui: &mut Ui) {
        ui.heading("Detect a chart from an image");
        ui.label("The image is classified and matching R and Python code is suggested.");

        ui.horizontal(|ui| {
            if ui.button("Choose image...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &["png", "jpg", "jpeg", "webp", "gif"])
                    .pick_file()
                {
                    self.detect_image(path);
                }
            }
            if self.state.is_detecting() {
                ui.spinner();
            }
        });

        if let Some(result) = self.state.detection().cloned() {
            ui.separator();
            ui.strong(format!("{} ({}% confidence)", result.chart_type, result.confidence));
            ui.label(&result.explanation);
            show_code(ui, "R", &result.r_code);
            show_code(ui, "Python", &result.python_code);
        }
    }
}

fn show_welcome(ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.heading("Open a CSV file to get started");
        ui.label("Only the first 50 KB are read; column types are inferred from the leading rows.");
    });
}

fn show_column_table(ui: &mut Ui, summary: &DatasetSummary) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Column");
            });
            header.col(|ui| {
                ui.strong("Type");
            });
            header.col(|ui| {
                ui.strong("Unique");
            });
            header.col(|ui| {
                ui.strong("Samples");
            });
        })
        .body(|mut body| {
            for column in &summary.columns {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&column.name);
                    });
                    row.col(|ui| {
                        ui.label(if column.is_numeric() { "numeric" } else { "categorical" });
                    });
                    row.col(|ui| {
                        ui.label(column.unique_count.to_string());
                    });
                    row.col(|ui| {
                        ui.label(column.sample_values.join(", "));
                    });
                });
            }
        });
}

fn show_code(ui: &mut Ui, title: &str, code: &str) {
    egui::CollapsingHeader::new(title).default_open(true).show(ui, |ui| {
        if ui.small_button("Copy").clicked() {
            ui.output_mut(|o| o.copied_text = code.to_string());
        }
        let mut text = code;
        ui.add(
            egui::TextEdit::multiline(&mut text)
                .code_editor()
                .desired_width(f32::INFINITY),
        );
    });
}

impl eframe::App for ChartSketchApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_messages();

        // Menu bar
        self.handle_menu();
        self.show_status_bar(ctx);

        match self.state.mode() {
            AppMode::Upload => {
                self.show_dataset_panel(ctx);
                egui::CentralPanel::default().show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| self.show_chart(ui));
                });
            }
            AppMode::Detect => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| self.show_detection(ui));
                });
            }
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Chart Sketch");

    let config = AppConfig::load()?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chart Sketch",
        options,
        Box::new(move |cc| Box::new(ChartSketchApp::new(cc, config, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
