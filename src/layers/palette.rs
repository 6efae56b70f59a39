//! Evenly spaced hue rotation for categorical colors.

/// `count` fully saturated colors with hues spaced evenly around the wheel,
/// starting at red, as lowercase `#rrggbb`.
pub fn hue_rotation(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let (r, g, b) = hsv_to_rgb(i as f64 / count as f64, 1.0, 1.0);
            format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
        })
        .collect()
}

fn channel(value: f64) -> u8 {
    (255.0 * value).round().clamp(0.0, 255.0) as u8
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}
