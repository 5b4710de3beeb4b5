//! Color scales shared by the interactive plots and the PNG renderer.

/// Plain RGB triple so both egui and plotters can consume it.
pub type Rgb = (u8, u8, u8);

/// Viridis-like ramp (dark purple to yellow) for bar values.
const VIRIDIS: [Rgb; 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Yellow-green-blue ramp for heatmap cells.
const YL_GN_BU: [Rgb; 5] = [
    (255, 255, 217),
    (199, 233, 180),
    (65, 182, 196),
    (34, 94, 168),
    (8, 29, 88),
];

/// Categorical colors for subjects / pie slices
pub const PALETTE: [Rgb; 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (121, 85, 72),   // Brown
    (96, 125, 139),  // Blue Grey
];

pub fn categorical(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

pub fn viridis(value: f64, min: f64, max: f64) -> Rgb {
    sample(&VIRIDIS, normalize(value, min, max))
}

pub fn yl_gn_bu(value: f64, min: f64, max: f64) -> Rgb {
    sample(&YL_GN_BU, normalize(value, min, max))
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_text(background: Rgb) -> Rgb {
    let (r, g, b) = background;
    let luminance = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luminance > 140.0 {
        (0, 0, 0)
    } else {
        (255, 255, 255)
    }
}

/// Position of `value` in [min, max] as 0..=1. A flat range maps to the middle.
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return 0.5;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

fn sample(stops: &[Rgb], t: f64) -> Rgb {
    let scaled = t * (stops.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(stops.len() - 1);
    let upper = (lower + 1).min(stops.len() - 1);
    let frac = scaled - lower as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (stops[lower], stops[upper]);
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}
