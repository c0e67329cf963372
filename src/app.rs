use std::time::Duration;

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use log::warn;
use tokio::runtime::Runtime;

use crate::config::AppConfig;
use crate::host::Host;
use crate::latency_color::{MAX_GRAPH_LATENCY, bar_color, bar_fraction};
use crate::monitor::HostMonitor;
use crate::probe::ProbeBackend;
use crate::registry::{DEFAULT_CAPACITY, MonitorRegistry};

const REFRESH_INTERVAL: Duration = Duration::from_millis(250);
const HOST_COLUMNS: usize = 3;
const GRAPH_HEIGHT: f32 = 170.0;
const BAR_WIDTH: f32 = 10.0;
const BAR_OFFSET: f32 = 10.0;
const AXIS_MARGIN: f32 = 20.0;
const AXIS_COLOR: Color32 = Color32::from_rgb(168, 34, 3);

/// Number of bars that fit into a graph of the given width.
pub fn graph_capacity(width: f32) -> usize {
    ((width - BAR_OFFSET - BAR_WIDTH * 2.0) / BAR_WIDTH).floor().max(1.0) as usize
}

enum Action {
    Select(Host),
    Deselect(Host),
    TogglePause,
    Resize(usize),
}

/// Host checkboxes, a pause button and one graph per selected host.
pub struct PinguinApp {
    hosts: Vec<Host>,
    registry: MonitorRegistry<ProbeBackend>,
    runtime: Runtime,
}

impl PinguinApp {
    pub fn new(config: AppConfig, runtime: Runtime) -> Self {
        let prober = ProbeBackend::new(config.backend);
        let registry = MonitorRegistry::new(runtime.handle().clone(), prober, DEFAULT_CAPACITY);
        Self {
            hosts: config.hosts,
            registry,
            runtime,
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Select(host) => {
                if let Err(e) = self.registry.add(host) {
                    warn!("{e}");
                }
            }
            Action::Deselect(host) => {
                // Stopping cancels the in-flight probe instead of waiting for
                // its timeout, so this returns within the frame.
                if let Err(e) = self.runtime.block_on(self.registry.remove(&host)) {
                    warn!("{e}");
                }
            }
            Action::TogglePause => self.registry.toggle_pause(),
            Action::Resize(capacity) => self.registry.set_capacity(capacity),
        }
    }
}

impl eframe::App for PinguinApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Grid::new("hosts").show(ui, |ui| {
                for (i, host) in self.hosts.iter().enumerate() {
                    let mut selected = self.registry.contains(host);
                    if ui.checkbox(&mut selected, host.name()).changed() {
                        actions.push(if selected {
                            Action::Select(host.clone())
                        } else {
                            Action::Deselect(host.clone())
                        });
                    }
                    if (i + 1) % HOST_COLUMNS == 0 {
                        ui.end_row();
                    }
                }
            });

            if self.registry.is_empty() {
                return;
            }

            ui.separator();
            let label = if self.registry.is_paused() { "Resume" } else { "Pause" };
            if ui.button(label).clicked() {
                actions.push(Action::TogglePause);
            }

            let capacity = graph_capacity(ui.available_width());
            if capacity != self.registry.capacity() {
                actions.push(Action::Resize(capacity));
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for host in &self.hosts {
                    if let Some(monitor) = self.registry.get(host) {
                        draw_monitor(ui, monitor);
                    }
                }
            });
        });

        for action in actions {
            self.apply(action);
        }

        ctx.request_repaint_after(REFRESH_INTERVAL);
    }
}

impl Drop for PinguinApp {
    fn drop(&mut self) {
        self.runtime.block_on(self.registry.shutdown());
    }
}

fn draw_monitor(ui: &mut egui::Ui, monitor: &HostMonitor) {
    let view = monitor.view();
    let stats = view.stats;

    ui.horizontal(|ui| {
        ui.label(monitor.host().to_string());
        let loss_color = if stats.loss_count == 0 {
            ui.visuals().text_color()
        } else {
            Color32::RED
        };
        ui.colored_label(
            loss_color,
            format!("loss count/percent: {}/{}%", stats.loss_count, stats.loss_percent),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!(
                "ping min/max/avg: {}/{}/{}",
                stats.min, stats.max, stats.avg
            ));
        });
    });

    let (rect, _) = ui.allocate_exact_size(
        Vec2::new(ui.available_width(), GRAPH_HEIGHT),
        Sense::hover(),
    );
    let painter = ui.painter_at(rect);

    for (i, &outcome) in view.samples.iter().enumerate() {
        let x = rect.left() + BAR_OFFSET + (i + 1) as f32 * BAR_WIDTH;
        let top = rect.bottom() - rect.height() * bar_fraction(outcome);
        let bar = Rect::from_min_max(Pos2::new(x, top), Pos2::new(x + BAR_WIDTH, rect.bottom()));
        painter.rect_filled(bar, 0.0, bar_color(outcome));
    }

    let font = FontId::proportional(10.0);
    for (fraction, value) in [
        (1.0, MAX_GRAPH_LATENCY),
        (0.5, MAX_GRAPH_LATENCY / 2),
        (0.25, MAX_GRAPH_LATENCY / 4),
        (0.0, 0),
    ] {
        let y = rect.bottom() - rect.height() * fraction;
        let line_color = if fraction == 0.0 || fraction == 1.0 {
            Color32::GRAY
        } else {
            Color32::DARK_GRAY
        };
        painter.hline(
            rect.left() + AXIS_MARGIN..=rect.right(),
            y,
            Stroke::new(1.0, line_color),
        );
        painter.text(
            Pos2::new(rect.left(), y),
            Align2::LEFT_CENTER,
            value.to_string(),
            font.clone(),
            AXIS_COLOR,
        );
    }

    ui.separator();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_capacity() {
        assert_eq!(graph_capacity(640.0), 61);
        assert_eq!(graph_capacity(35.0), 1);
        assert_eq!(graph_capacity(0.0), 1);
    }
}
