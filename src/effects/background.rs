//! Background engine slice
//!
//! Motion and visual parameters of the animated page background, the named
//! presets offered by the background lab, and the mapping from engine
//! parameters to the wave renderer's inputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteId {
    #[default]
    Dark,
    Neon,
    Calm,
    /// Derived from `accent_hue`
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundConfig {
    pub speed: f64,
    pub noise_intensity: f64,
    pub palette_id: PaletteId,
    pub accent_hue: f64,
    pub parallax_depth: f64,
    pub motion_damping: f64,
    pub glow: f64,
    pub grain: f64,
    pub vignette: f64,
    pub reduce_motion: bool,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            speed: 0.95,
            noise_intensity: 0.6,
            palette_id: PaletteId::Dark,
            accent_hue: 210.0,
            parallax_depth: 0.35,
            motion_damping: 0.18,
            glow: 0.45,
            grain: 0.22,
            vignette: 0.55,
            reduce_motion: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_intensity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette_id: Option<PaletteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_hue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallax_depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion_damping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vignette: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce_motion: Option<bool>,
}

impl BackgroundPatch {
    pub fn apply_to(self, cfg: &mut BackgroundConfig) {
        if let Some(v) = self.speed {
            cfg.speed = v;
        }
        if let Some(v) = self.noise_intensity {
            cfg.noise_intensity = v;
        }
        if let Some(v) = self.palette_id {
            cfg.palette_id = v;
        }
        if let Some(v) = self.accent_hue {
            cfg.accent_hue = v;
        }
        if let Some(v) = self.parallax_depth {
            cfg.parallax_depth = v;
        }
        if let Some(v) = self.motion_damping {
            cfg.motion_damping = v;
        }
        if let Some(v) = self.glow {
            cfg.glow = v;
        }
        if let Some(v) = self.grain {
            cfg.grain = v;
        }
        if let Some(v) = self.vignette {
            cfg.vignette = v;
        }
        if let Some(v) = self.reduce_motion {
            cfg.reduce_motion = v;
        }
    }
}

impl From<BackgroundConfig> for BackgroundPatch {
    fn from(c: BackgroundConfig) -> Self {
        Self {
            speed: Some(c.speed),
            noise_intensity: Some(c.noise_intensity),
            palette_id: Some(c.palette_id),
            accent_hue: Some(c.accent_hue),
            parallax_depth: Some(c.parallax_depth),
            motion_damping: Some(c.motion_damping),
            glow: Some(c.glow),
            grain: Some(c.grain),
            vignette: Some(c.vignette),
            reduce_motion: Some(c.reduce_motion),
        }
    }
}

/// Named presets offered by the background lab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundPreset {
    Finance,
    Healthcare,
    Creative,
    Enterprise,
}

impl BackgroundPreset {
    pub const ALL: [BackgroundPreset; 4] = [
        BackgroundPreset::Finance,
        BackgroundPreset::Healthcare,
        BackgroundPreset::Creative,
        BackgroundPreset::Enterprise,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BackgroundPreset::Finance => "Finance",
            BackgroundPreset::Healthcare => "Healthcare",
            BackgroundPreset::Creative => "Creative",
            BackgroundPreset::Enterprise => "Enterprise",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BackgroundPreset::Finance => "Crisp & analytical",
            BackgroundPreset::Healthcare => "Calm & trustworthy",
            BackgroundPreset::Creative => "Expressive & kinetic",
            BackgroundPreset::Enterprise => "Reserved & premium",
        }
    }

    pub fn config(&self) -> BackgroundConfig {
        let (speed, noise_intensity, palette_id, accent_hue, parallax_depth, motion_damping, glow, grain, vignette) =
            match self {
                BackgroundPreset::Finance => (1.15, 0.32, PaletteId::Dark, 206.0, 0.22, 0.22, 0.4, 0.18, 0.6),
                BackgroundPreset::Healthcare => (0.45, 0.2, PaletteId::Calm, 170.0, 0.15, 0.28, 0.3, 0.15, 0.65),
                BackgroundPreset::Creative => (1.6, 0.9, PaletteId::Neon, 280.0, 0.55, 0.12, 0.75, 0.35, 0.45),
                BackgroundPreset::Enterprise => (0.7, 0.35, PaletteId::Dark, 210.0, 0.25, 0.24, 0.35, 0.2, 0.7),
            };
        BackgroundConfig {
            speed,
            noise_intensity,
            palette_id,
            accent_hue,
            parallax_depth,
            motion_damping,
            glow,
            grain,
            vignette,
            reduce_motion: false,
        }
    }
}

impl fmt::Display for BackgroundPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_lowercase())
    }
}

impl FromStr for BackgroundPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        BackgroundPreset::ALL
            .into_iter()
            .find(|p| p.to_string() == needle)
            .ok_or_else(|| anyhow::anyhow!("Unknown background preset '{}'", s))
    }
}

const DARK: [&str; 8] = ["#050914", "#081a2f", "#0b2038", "#13466c", "#1c7dd1", "#2fb9ff", "#8fe5ff", "#3f7ce6"];
const NEON: [&str; 8] = ["#0a0717", "#11104a", "#2b1b70", "#4a2299", "#6f2ed1", "#9d52ff", "#53c8ff", "#4efad1"];
const CALM: [&str; 8] = ["#060b1f", "#0d1b2b", "#123341", "#1c5b6b", "#248e9c", "#59b9c3", "#96e2e2", "#3a7f89"];

/// (hue offset, saturation %, lightness %) steps of the custom palette
const CUSTOM_STEPS: [(f64, u32, u32); 7] = [
    (0.0, 42, 12),
    (10.0, 52, 18),
    (22.0, 62, 24),
    (28.0, 72, 34),
    (36.0, 78, 46),
    (44.0, 82, 58),
    (52.0, 88, 68),
];

fn custom_palette(accent_hue: f64) -> Vec<String> {
    let hue = accent_hue.rem_euclid(360.0);
    CUSTOM_STEPS
        .iter()
        .map(|(offset, s, l)| format!("hsl({}, {}%, {}%)", hue + offset, s, l))
        .collect()
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Inputs of the wave renderer derived from a [`BackgroundConfig`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveParams {
    pub colors: Vec<String>,
    pub speed: f64,
    pub blur: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub opacity: f64,
    pub color_drift: f64,
    pub structure_jitter: f64,
    pub center_drift: f64,
    pub thickness: f64,
    pub thickness_variation: f64,
}

impl BackgroundConfig {
    /// Colors of the active palette
    pub fn palette_colors(&self) -> Vec<String> {
        let fixed: &[&str] = match self.palette_id {
            PaletteId::Dark => &DARK,
            PaletteId::Neon => &NEON,
            PaletteId::Calm => &CALM,
            PaletteId::Custom => return custom_palette(self.accent_hue),
        };
        fixed.iter().map(|c| c.to_string()).collect()
    }

    pub fn wave_params(&self) -> WaveParams {
        let speed_base = if self.reduce_motion { 0.00035 } else { self.speed * 0.001 };
        let noise = clamp(self.noise_intensity / 1.5, 0.0, 1.0);
        let depth = clamp(self.parallax_depth, 0.0, 1.0);
        let damping = clamp((self.motion_damping - 0.05) / 0.3, 0.0, 1.0);

        WaveParams {
            colors: self.palette_colors(),
            speed: clamp(speed_base * (1.0 - damping * 0.35), 0.0002, 0.003),
            blur: 14.0 + noise * 14.0,
            amplitude: 0.3 + noise * 0.35 + depth * 0.18,
            frequency: 0.0011 + noise * 0.0009,
            opacity: 0.94,
            color_drift: (0.2 + noise * 0.4 + depth * 0.15) * (1.0 - damping * 0.2),
            structure_jitter: (0.35 + noise * 0.65) * (1.0 - damping * 0.2),
            center_drift: 0.06 + noise * 0.12 + depth * 0.04,
            thickness: 4.2 + noise * 1.8 + depth * 0.5,
            thickness_variation: clamp(0.5 + noise * 0.5 + depth * 0.2, 0.3, 1.2),
        }
    }

    /// Tone the config down for visitors who prefer reduced motion
    pub fn with_reduced_motion(mut self) -> Self {
        self.reduce_motion = true;
        self.speed = self.speed.min(0.5);
        self.parallax_depth = self.parallax_depth.min(0.2);
        self
    }
}
