use egui::Color32;

use crate::outcome::ProbeOutcome;

/// Latency at and above which bars are full height and fully red.
pub const MAX_GRAPH_LATENCY: u64 = 200;

const GOOD_COLOR: Color32 = Color32::from_rgb(0, 255, 0);
const BAD_COLOR: Color32 = Color32::from_rgb(255, 0, 0);
const LOSS_COLOR: Color32 = Color32::from_rgba_premultiplied(96, 0, 0, 96);

/// Fraction of the graph height a bar for `outcome` fills. Losses fill it all.
pub fn bar_fraction(outcome: ProbeOutcome) -> f32 {
    match outcome {
        ProbeOutcome::Latency(ms) => ms.min(MAX_GRAPH_LATENCY) as f32 / MAX_GRAPH_LATENCY as f32,
        ProbeOutcome::Lost => 1.0,
    }
}

/// Green for fast replies, fading to red at [`MAX_GRAPH_LATENCY`].
pub fn bar_color(outcome: ProbeOutcome) -> Color32 {
    match outcome {
        ProbeOutcome::Latency(_) => blend_colors(BAD_COLOR, GOOD_COLOR, bar_fraction(outcome)),
        ProbeOutcome::Lost => LOSS_COLOR,
    }
}

fn blend_colors(color1: Color32, color2: Color32, factor: f32) -> Color32 {
    Color32::from_rgb(
        (color1.r() as f32 * factor + color2.r() as f32 * (1.0 - factor)) as u8,
        (color1.g() as f32 * factor + color2.g() as f32 * (1.0 - factor)) as u8,
        (color1.b() as f32 * factor + color2.b() as f32 * (1.0 - factor)) as u8,
    )
}
