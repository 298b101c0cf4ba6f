//! Color blending helpers for the cell canvas.

use ratatui::style::Color;

/// Stops of the page backdrop gradient, top to bottom.
const BACKDROP_STOPS: [(f32, [u8; 3]); 5] = [
    (0.0, [0x0f, 0x04, 0x20]),
    (0.2, [0x1a, 0x06, 0x38]),
    (0.42, [0x2e, 0x10, 0x65]),
    (0.65, [0x1a, 0x06, 0x38]),
    (1.0, [0x0d, 0x02, 0x22]),
];

/// Composite `src` over `dst` with coverage `alpha`.
pub fn blend(dst: [f32; 3], src: [f32; 3], alpha: f32) -> [f32; 3] {
    let alpha = alpha.clamp(0.0, 1.0);
    [
        dst[0] + (src[0] - dst[0]) * alpha,
        dst[1] + (src[1] - dst[1]) * alpha,
        dst[2] + (src[2] - dst[2]) * alpha,
    ]
}

/// Convert float channels to a terminal color.
pub fn to_color(rgb: [f32; 3]) -> Color {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
}

/// Backdrop color at vertical position `t` (0.0 = top, 1.0 = bottom).
pub fn backdrop_at(t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    let to_f = |c: [u8; 3]| [c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0];

    for pair in BACKDROP_STOPS.windows(2) {
        let (lo_t, lo) = pair[0];
        let (hi_t, hi) = pair[1];
        if t <= hi_t {
            let local = (t - lo_t) / (hi_t - lo_t);
            return blend(to_f(lo), to_f(hi), local);
        }
    }
    to_f(BACKDROP_STOPS[BACKDROP_STOPS.len() - 1].1)
}
