//! Glass material slice and the color variables derived from it

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlassStyle {
    #[default]
    Liquid,
    Frosted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlassSettings {
    pub style: GlassStyle,
    /// Multiplier applied to every base alpha
    pub opacity: f64,
    /// Hue rotation in degrees
    pub tint_shift: f64,
}

impl Default for GlassSettings {
    fn default() -> Self {
        Self {
            style: GlassStyle::Liquid,
            opacity: 1.0,
            tint_shift: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlassPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<GlassStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint_shift: Option<f64>,
}

impl GlassPatch {
    pub fn apply_to(self, glass: &mut GlassSettings) {
        if let Some(v) = self.style {
            glass.style = v;
        }
        if let Some(v) = self.opacity {
            glass.opacity = v;
        }
        if let Some(v) = self.tint_shift {
            glass.tint_shift = v;
        }
    }
}

impl From<GlassSettings> for GlassPatch {
    fn from(g: GlassSettings) -> Self {
        Self {
            style: Some(g.style),
            opacity: Some(g.opacity),
            tint_shift: Some(g.tint_shift),
        }
    }
}

/// CSS color values for the three glass layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlassVars {
    pub tint: String,
    pub surface: String,
    pub base: String,
}

#[derive(Debug, Clone, Copy)]
struct Rgba {
    r: u8,
    g: u8,
    b: u8,
    a: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Hsla {
    h: f64,
    s: f64,
    l: f64,
    a: f64,
}

const TINT: Rgba = Rgba { r: 34, g: 48, b: 84, a: 0.18 };
const SURFACE: Rgba = Rgba { r: 6, g: 9, b: 18, a: 0.45 };
const BASE: Rgba = Rgba { r: 5, g: 7, b: 13, a: 0.24 };

const MAX_ALPHA: f64 = 1.6;

fn clamp_alpha(value: f64) -> f64 {
    value.max(0.0).min(MAX_ALPHA)
}

impl Rgba {
    fn to_hsl(self) -> Hsla {
        let red = f64::from(self.r) / 255.0;
        let green = f64::from(self.g) / 255.0;
        let blue = f64::from(self.b) / 255.0;
        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let delta = max - min;
        let lightness = (max + min) / 2.0;
        let mut hue = 0.0;
        let mut saturation = 0.0;

        if delta != 0.0 {
            saturation = if lightness > 0.5 {
                delta / (2.0 - max - min)
            } else {
                delta / (max + min)
            };
            hue = if max == red {
                (green - blue) / delta + if green < blue { 6.0 } else { 0.0 }
            } else if max == green {
                (blue - red) / delta + 2.0
            } else {
                (red - green) / delta + 4.0
            };
            hue *= 60.0;
        }

        Hsla {
            h: hue.round(),
            s: (saturation * 100.0).round(),
            l: (lightness * 100.0).round(),
            a: self.a,
        }
    }

    fn css(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a * alpha)
    }
}

impl Hsla {
    fn css(self, tint_shift: f64, alpha: f64) -> String {
        let hue = (self.h + tint_shift + 360.0).rem_euclid(360.0);
        let a = clamp_alpha(self.a * alpha);
        format!("hsla({} {}% {}% / {:.3})", hue, self.s, self.l, a)
    }
}

/// Derive the glass color variables
///
/// With no tint shift the base colors keep their RGB and only alpha scales;
/// otherwise each layer is rotated in HSL space. Alpha is clamped to `[0, 1.6]`.
pub fn glass_vars(tint_shift: f64, opacity: f64) -> GlassVars {
    let alpha = clamp_alpha(opacity);
    if tint_shift == 0.0 {
        return GlassVars {
            tint: TINT.css(alpha),
            surface: SURFACE.css(alpha),
            base: BASE.css(alpha),
        };
    }

    GlassVars {
        tint: TINT.to_hsl().css(tint_shift, alpha),
        surface: SURFACE.to_hsl().css(tint_shift, alpha),
        base: BASE.to_hsl().css(tint_shift, alpha),
    }
}

impl GlassSettings {
    pub fn vars(&self) -> GlassVars {
        glass_vars(self.tint_shift, self.opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unshifted_vars_scale_alpha() {
        let vars = glass_vars(0.0, 1.0);
        assert_eq!(vars.tint, "rgba(34, 48, 84, 0.180)");
        assert_eq!(vars.surface, "rgba(6, 9, 18, 0.450)");
        assert_eq!(vars.base, "rgba(5, 7, 13, 0.240)");

        let half = glass_vars(0.0, 0.5);
        assert_eq!(half.tint, "rgba(34, 48, 84, 0.090)");
    }

    #[test]
    fn test_opacity_clamped() {
        let vars = glass_vars(0.0, 10.0);
        // 0.45 * 1.6
        assert_eq!(vars.surface, "rgba(6, 9, 18, 0.720)");
        let none = glass_vars(0.0, -1.0);
        assert_eq!(none.tint, "rgba(34, 48, 84, 0.000)");
    }

    #[test]
    fn test_rgb_to_hsl() {
        let hsl = TINT.to_hsl();
        assert_eq!(hsl, Hsla { h: 223.0, s: 42.0, l: 23.0, a: 0.18 });
    }

    #[test]
    fn test_shifted_vars_rotate_hue() {
        let vars = glass_vars(40.0, 1.0);
        assert_eq!(vars.tint, "hsla(263 42% 23% / 0.180)");

        let wrapped = glass_vars(-300.0, 1.0);
        assert_eq!(wrapped.tint, "hsla(283 42% 23% / 0.180)");
    }
}
