//! Color contrast math and theme color resolution.
//!
//! Luminance and contrast follow the WCAG definitions, except that the
//! lighter of two colors is picked by raw channel sum rather than by
//! luminance.

use crate::error::{Error, Result};
use crate::types::{ColorFormat, ColorScheme, Rgb, SchemeValue, ThemeColor};

/// Slot of the last theme color before the text/background aliases, which
/// wrap back onto the start of the scheme.
const THEME_WRAP_AROUND: i32 = ThemeColor::FollowedHyperlink as i32;

/// Linearize one sRGB channel.
fn linear_channel(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c < 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a color, in [0, 1].
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * linear_channel(color.r)
        + 0.7152 * linear_channel(color.g)
        + 0.0722 * linear_channel(color.b)
}

/// Contrast ratio between two colors, in [1, 21].
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (sum_a, sum_b) = (a.channel_sum(), b.channel_sum());
    let light = if sum_a > sum_b { a } else { b };
    let dark = if sum_a < sum_b { a } else { b };

    (relative_luminance(light) + 0.05) / (relative_luminance(dark) + 0.05)
}

/// Resolve a theme slot to a literal color, applying a brightness shift.
///
/// A brightness of zero (or `None`) leaves the scheme color unchanged.
pub fn resolve_theme_color(
    scheme: &ColorScheme,
    slot: i32,
    brightness: Option<f64>,
) -> Result<Rgb> {
    let len = scheme.entries.len();
    let raw = if slot >= ThemeColor::Dark1.slot() {
        slot - THEME_WRAP_AROUND - 1
    } else if slot == 0 {
        slot
    } else {
        slot - 1
    };
    // Negative indices count back from the end of the scheme.
    let index = if raw < 0 { raw + len as i32 } else { raw };
    let entry = usize::try_from(index)
        .ok()
        .and_then(|i| scheme.entries.get(i))
        .ok_or(Error::ThemeSlotOutOfRange { slot, len })?;

    let base = match &entry.value {
        SchemeValue::Srgb(rgb) => *rgb,
        SchemeValue::System {
            last_color: Some(rgb),
            ..
        } => *rgb,
        SchemeValue::System {
            name,
            last_color: None,
        } => match name.as_str() {
            "windowText" => Rgb::BLACK,
            "window" => Rgb::WHITE,
            other => {
                return Err(Error::MalformedColor(format!(
                    "system color '{}' in scheme slot '{}' has no RGB value",
                    other, entry.name
                )))
            }
        },
    };

    match brightness {
        Some(b) if b != 0.0 => Ok(adjust_brightness(base, b)),
        _ => Ok(base),
    }
}

/// Resolve any color reference against the scheme.
pub fn resolve_color(scheme: &ColorScheme, color: &ColorFormat) -> Result<Rgb> {
    match *color {
        ColorFormat::Rgb(rgb) => Ok(rgb),
        ColorFormat::Theme { color, brightness } => {
            resolve_theme_color(scheme, color.slot(), Some(brightness))
        }
    }
}

/// Shift the HLS lightness of a color by `brightness` (-1..1).
fn adjust_brightness(color: Rgb, brightness: f64) -> Rgb {
    let (h, l, s) = rgb_to_hls(
        f64::from(color.r) / 255.0,
        f64::from(color.g) / 255.0,
        f64::from(color.b) / 255.0,
    );
    let l = if brightness > 0.0 {
        l * (1.0 - brightness) + brightness
    } else {
        l * (1.0 + brightness)
    };
    let (r, g, b) = hls_to_rgb(h, l, s);
    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

fn to_channel(value: f64) -> u8 {
    (value * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}

fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let sum = max + min;
    let range = max - min;
    let l = sum / 2.0;
    if min == max {
        return (0.0, l, 0.0);
    }
    let s = if l <= 0.5 {
        range / sum
    } else {
        range / (2.0 - max - min)
    };
    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
