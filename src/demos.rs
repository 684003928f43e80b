//! Demo catalog
//!
//! The four sandbox demos and the card descriptors shown in the demos section.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a sandbox demo; doubles as its storage namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemoId {
    EditMode,
    BackgroundLab,
    FunnelLab,
    IndustrySwitcher,
}

impl DemoId {
    pub const ALL: [DemoId; 4] = [
        DemoId::EditMode,
        DemoId::BackgroundLab,
        DemoId::FunnelLab,
        DemoId::IndustrySwitcher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DemoId::EditMode => "edit-mode",
            DemoId::BackgroundLab => "background-lab",
            DemoId::FunnelLab => "funnel-lab",
            DemoId::IndustrySwitcher => "industry-switcher",
        }
    }
}

impl fmt::Display for DemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DemoId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown demo id '{}'", s))
    }
}

/// Icon shown on a demo card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKey {
    Builder,
    Engine,
    Funnel,
    Industry,
}

/// Card descriptor as it appears in content documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub badge: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub icon_key: IconKey,
}

impl CardContent {
    fn new(id: DemoId, title: &str, subtitle: &str, badge: &str, tags: &[&str], icon_key: IconKey) -> Self {
        Self {
            id: id.as_str().to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            badge: badge.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            icon_key,
        }
    }
}

/// Cards in their natural (catalog) order
pub fn default_cards() -> Vec<CardContent> {
    vec![
        CardContent::new(
            DemoId::EditMode,
            "Live Admin Overlay",
            "Builder-mode controls with inline edits, layout variants, and drag-and-drop ordering.",
            "Flagship",
            &["Edit Mode", "Layout"],
            IconKey::Builder,
        ),
        CardContent::new(
            DemoId::BackgroundLab,
            "Background Engine Lab",
            "Tune motion, noise, and palette presets that re-skin the live canvas.",
            "Control Lab",
            &["Motion", "Presets"],
            IconKey::Engine,
        ),
        CardContent::new(
            DemoId::FunnelLab,
            "Live KPI Funnel Simulator",
            "Adjust traffic, conversion, and AOV to see revenue lift in real time.",
            "Growth",
            &["KPIs", "Uplift"],
            IconKey::Funnel,
        ),
        CardContent::new(
            DemoId::IndustrySwitcher,
            "Industry Skin Switcher",
            "Swap copy, accents, and icons across finance, healthcare, SaaS, retail, manufacturing, and security.",
            "Context",
            &["Copy", "Palette"],
            IconKey::Industry,
        ),
    ]
}
