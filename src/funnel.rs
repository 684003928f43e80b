//! KPI funnel simulator
//!
//! Traffic flows through conversion and close rates into customers and
//! revenue. In `dnd` mode every input is lifted by an improvement multiplier
//! that is larger the weaker the starting number is.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::industry::Labels;

pub const TRAFFIC_MIN: f64 = 500.0;
pub const TRAFFIC_MAX: f64 = 200_000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelMode {
    #[default]
    Before,
    Dnd,
}

impl fmt::Display for FunnelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunnelMode::Before => f.write_str("before"),
            FunnelMode::Dnd => f.write_str("dnd"),
        }
    }
}

impl FromStr for FunnelMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(FunnelMode::Before),
            "dnd" => Ok(FunnelMode::Dnd),
            other => Err(anyhow::anyhow!("unknown funnel mode '{}' (expected before or dnd)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelInputs {
    /// Monthly visitors
    pub traffic: f64,
    /// Percent of visitors that become leads
    pub conversion_rate: f64,
    /// Average order value
    pub aov: f64,
    /// Cost per click
    pub cpc: f64,
    /// Percent of leads that become customers
    pub close_rate: f64,
    pub mode: FunnelMode,
}

impl Default for FunnelInputs {
    fn default() -> Self {
        Self {
            traffic: 12_000.0,
            conversion_rate: 2.4,
            aov: 180.0,
            cpc: 2.1,
            close_rate: 24.0,
            mode: FunnelMode::Before,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Multipliers {
    pub traffic: f64,
    pub conversion_rate: f64,
    pub aov: f64,
    pub cpc: f64,
    pub close_rate: f64,
}

impl Multipliers {
    pub fn for_inputs(inputs: &FunnelInputs) -> Self {
        let cr = inputs.conversion_rate;
        Self {
            traffic: if inputs.traffic < 5_000.0 {
                1.45
            } else if inputs.traffic < 50_000.0 {
                1.22
            } else {
                1.12
            },
            conversion_rate: if cr < 1.0 {
                1.6
            } else if cr < 3.0 {
                1.35
            } else {
                1.2
            },
            aov: if inputs.aov < 120.0 { 1.18 } else { 1.12 },
            cpc: if inputs.cpc > 0.0 {
                if cr < 1.0 { 0.8 } else { 0.88 }
            } else {
                1.0
            },
            close_rate: if inputs.close_rate < 20.0 { 1.2 } else { 1.1 },
        }
    }
}

impl FunnelInputs {
    pub fn improved(&self) -> FunnelInputs {
        let m = Multipliers::for_inputs(self);
        FunnelInputs {
            traffic: self.traffic * m.traffic,
            conversion_rate: self.conversion_rate * m.conversion_rate,
            aov: self.aov * m.aov,
            cpc: self.cpc * m.cpc,
            close_rate: self.close_rate * m.close_rate,
            mode: self.mode,
        }
    }

    /// Inputs the metrics are computed from: improved in `dnd` mode
    pub fn effective(&self) -> FunnelInputs {
        match self.mode {
            FunnelMode::Before => self.clone(),
            FunnelMode::Dnd => self.improved(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quality {
    #[serde(rename = "High Intent")]
    HighIntent,
    Mixed,
    #[serde(rename = "Low Intent")]
    LowIntent,
}

impl Quality {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Quality::HighIntent
        } else if score > 0.45 {
            Quality::Mixed
        } else {
            Quality::LowIntent
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quality::HighIntent => "High Intent",
            Quality::Mixed => "Mixed",
            Quality::LowIntent => "Low Intent",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStage {
    pub label: String,
    pub value: f64,
    /// Bar width relative to the widest stage, never below 6
    pub width_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelReport {
    pub mode: FunnelMode,
    pub multipliers: Multipliers,
    pub leads: f64,
    pub customers: f64,
    pub revenue: f64,
    pub spend: f64,
    pub roas: f64,
    pub quality_score: f64,
    pub quality: Quality,
    pub stages: Vec<FunnelStage>,
}

/// Run the funnel for `inputs`, naming the lead stage with `labels`
pub fn simulate(inputs: &FunnelInputs, labels: &Labels) -> FunnelReport {
    let e = inputs.effective();
    let leads = e.traffic * (e.conversion_rate / 100.0);
    let customers = leads * (e.close_rate / 100.0);
    let revenue = customers * e.aov;
    let spend = e.traffic * e.cpc;
    let roas = if spend > 0.0 { revenue / spend } else { 0.0 };
    let quality_score =
        ((e.conversion_rate / 12.0 + e.aov / 2000.0 + (1.0 - e.cpc / 15.0)) / 3.0).clamp(0.0, 1.0);

    let raw = [
        ("Visitors".to_string(), e.traffic),
        (labels.leads.clone(), leads),
        ("Customers".to_string(), customers),
    ];
    let max = raw.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let stages = raw
        .into_iter()
        .map(|(label, value)| {
            let share = if max > 0.0 { value / max * 100.0 } else { 0.0 };
            FunnelStage {
                label,
                value,
                width_percent: share.max(6.0),
            }
        })
        .collect();

    FunnelReport {
        mode: inputs.mode,
        multipliers: Multipliers::for_inputs(inputs),
        leads,
        customers,
        revenue,
        spend,
        roas,
        quality_score,
        quality: Quality::from_score(quality_score),
        stages,
    }
}

/// Map traffic onto a 0..=100 log-scale slider
pub fn traffic_to_slider(traffic: f64) -> f64 {
    ((traffic / TRAFFIC_MIN).ln() / (TRAFFIC_MAX / TRAFFIC_MIN).ln() * 100.0).round()
}

pub fn slider_to_traffic(value: f64) -> f64 {
    (TRAFFIC_MIN * (TRAFFIC_MAX / TRAFFIC_MIN).powf(value / 100.0)).round()
}
