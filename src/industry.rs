//! Industry profiles
//!
//! Static presets bundling copy, accent palette and terminology for a
//! target vertical. The table is built once and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::content::{ContentOverride, CtaOverride, DemosOverride, HeroOverride};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndustryId {
    Finance,
    Healthcare,
    Manufacturing,
    Saas,
    Retail,
    Security,
}

impl IndustryId {
    pub const ALL: [IndustryId; 6] = [
        IndustryId::Finance,
        IndustryId::Healthcare,
        IndustryId::Manufacturing,
        IndustryId::Saas,
        IndustryId::Retail,
        IndustryId::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndustryId::Finance => "finance",
            IndustryId::Healthcare => "healthcare",
            IndustryId::Manufacturing => "manufacturing",
            IndustryId::Saas => "saas",
            IndustryId::Retail => "retail",
            IndustryId::Security => "security",
        }
    }
}

impl fmt::Display for IndustryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndustryId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        IndustryId::ALL
            .into_iter()
            .find(|id| id.as_str() == needle)
            .ok_or_else(|| anyhow::anyhow!("Unknown industry '{}'", s))
    }
}

/// Four-color accent palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accent {
    pub primary: String,
    pub secondary: String,
    pub glow: String,
    pub icon: String,
}

impl Default for Accent {
    fn default() -> Self {
        Self::new("#00FFAB", "#00A9FF", "rgba(0, 255, 171, 0.35)", "#8FF5FF")
    }
}

impl Accent {
    fn new(primary: &str, secondary: &str, glow: &str, icon: &str) -> Self {
        Self {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            glow: glow.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Terminology used by KPI widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub leads: String,
    pub revenue: String,
    pub pipeline: String,
    pub users: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self::new("Leads", "Revenue", "Pipeline", "Users")
    }
}

impl Labels {
    fn new(leads: &str, revenue: &str, pipeline: &str, users: &str) -> Self {
        Self {
            leads: leads.to_string(),
            revenue: revenue.to_string(),
            pipeline: pipeline.to_string(),
            users: users.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryProfile {
    pub id: IndustryId,
    pub display_name: String,
    pub description: String,
    pub copy: ContentOverride,
    pub palette: Accent,
    pub labels: Labels,
}

/// Copy overlay for a profile: full hero and CTA, demos section titles only
struct ProfileCopy<'a> {
    hero: [&'a str; 4],
    section: [&'a str; 2],
    cta: [&'a str; 2],
}

impl ProfileCopy<'_> {
    fn into_override(self) -> ContentOverride {
        let [title, subtitle, cta_primary, cta_secondary] = self.hero.map(|s| Some(s.to_string()));
        let [section_title, section_subtitle] = self.section.map(|s| Some(s.to_string()));
        let [primary, secondary] = self.cta.map(|s| Some(s.to_string()));
        ContentOverride {
            hero: Some(HeroOverride { title, subtitle, cta_primary, cta_secondary }),
            demos: Some(DemosOverride { section_title, section_subtitle, cards: None }),
            cta: Some(CtaOverride { primary, secondary }),
        }
    }
}

fn profile(id: IndustryId, display_name: &str, description: &str, copy: ProfileCopy<'_>, palette: Accent, labels: Labels) -> IndustryProfile {
    IndustryProfile {
        id,
        display_name: display_name.to_string(),
        description: description.to_string(),
        copy: copy.into_override(),
        palette,
        labels,
    }
}

static PROFILES: LazyLock<Vec<IndustryProfile>> = LazyLock::new(|| {
    vec![
        profile(
            IndustryId::Finance,
            "Finance",
            "Risk-aware, data-first systems.",
            ProfileCopy {
                hero: [
                    "Risk-aware. Data-first. Performance-driven.",
                    "Institutional-grade digital systems that keep growth compliant and measurable.",
                    "Request a Strategy Session",
                    "View Finance Demos",
                ],
                section: [
                    "Financial-grade systems, demonstrated live",
                    "Customize this site to preview builder overlays, tuned backgrounds, and KPI funnels for regulated growth.",
                ],
                cta: ["Schedule a Growth Brief", "Explore Finance Resources"],
            },
            Accent::new("#5AB0FF", "#D1B15C", "rgba(90, 176, 255, 0.45)", "#9BD0FF"),
            Labels::new("Deal Flow", "AUM Impact", "Pipeline", "Accounts"),
        ),
        profile(
            IndustryId::Healthcare,
            "Healthcare",
            "Clear, compliant, patient-first systems.",
            ProfileCopy {
                hero: [
                    "Clear, compliant, patient-centered systems.",
                    "Digital infrastructure that simplifies care journeys and protects trust.",
                    "Plan Your Patient Flow",
                    "View Care Demos",
                ],
                section: [
                    "Patient-ready systems, demonstrated live",
                    "Customize this site to preview calm overlays, background profiles, and KPI funnels for care teams.",
                ],
                cta: ["Book a Care Systems Call", "Explore Healthcare Insights"],
            },
            Accent::new("#42D4B2", "#74F0C1", "rgba(66, 212, 178, 0.45)", "#8FF5D7"),
            Labels::new("Patients", "Care Value", "Referrals", "Care Teams"),
        ),
        profile(
            IndustryId::Manufacturing,
            "Manufacturing",
            "Operational clarity from floor to forecast.",
            ProfileCopy {
                hero: [
                    "Operational clarity from floor to forecast.",
                    "Connected systems that surface throughput, quality, and bottlenecks in real time.",
                    "Optimize Throughput",
                    "View Ops Demos",
                ],
                section: [
                    "Operational systems, demonstrated live",
                    "Customize this site to preview operational overlays, background tuning, and KPI funnels that surface throughput.",
                ],
                cta: ["Plan an Operations Review", "Explore Manufacturing Resources"],
            },
            Accent::new("#A7B3C6", "#F5A623", "rgba(245, 166, 35, 0.38)", "#D6DEE8"),
            Labels::new("Opportunities", "Throughput", "Supply Flow", "Operators"),
        ),
        profile(
            IndustryId::Saas,
            "SaaS",
            "Scale-ready platforms built for velocity.",
            ProfileCopy {
                hero: [
                    "Scale-ready platforms built for velocity.",
                    "Launch, iterate, and optimize growth loops with engineered precision.",
                    "Start a Growth Sprint",
                    "View SaaS Demos",
                ],
                section: [
                    "SaaS systems, demonstrated live",
                    "Customize this site to preview builder overlays, growth-ready backgrounds, and KPI funnels for SaaS teams.",
                ],
                cta: ["Book a SaaS Build Call", "Explore Product Resources"],
            },
            Accent::new("#5B8CFF", "#6FFFD2", "rgba(111, 255, 210, 0.4)", "#9FB8FF"),
            Labels::new("Trials", "MRR", "Pipeline", "Accounts"),
        ),
        profile(
            IndustryId::Retail,
            "Retail",
            "Conversion-led commerce systems.",
            ProfileCopy {
                hero: [
                    "Conversion-led commerce with brand-grade polish.",
                    "Merchandising, loyalty, and lifecycle automation designed for repeat revenue.",
                    "Launch a Commerce Sprint",
                    "View Retail Demos",
                ],
                section: [
                    "Retail systems, demonstrated live",
                    "Customize this site to preview commerce overlays, conversion-ready backgrounds, and KPI funnels.",
                ],
                cta: ["Plan a Commerce Revamp", "Explore Retail Resources"],
            },
            Accent::new("#FF6A3D", "#FFB347", "rgba(255, 106, 61, 0.45)", "#FFC0A0"),
            Labels::new("Shoppers", "Order Value", "Lifecycle", "Customers"),
        ),
        profile(
            IndustryId::Security,
            "Security",
            "Resilient, risk-aware digital control.",
            ProfileCopy {
                hero: [
                    "Secure-by-design systems for high-trust teams.",
                    "Defense-grade UX with visibility, control, and performance in every layer.",
                    "Request a Security Brief",
                    "View Security Demos",
                ],
                section: [
                    "Security systems, demonstrated live",
                    "Customize this site to preview hardened overlays, dark background profiles, and KPI funnels for risk teams.",
                ],
                cta: ["Plan a Secure Build", "Explore Security Resources"],
            },
            Accent::new("#8E1B24", "#0F0608", "rgba(142, 27, 36, 0.5)", "#E2A0A8"),
            Labels::new("Incidents", "Risk Impact", "Threat Flow", "Operators"),
        ),
    ]
});

/// All profiles in display order
pub fn profiles() -> &'static [IndustryProfile] {
    &PROFILES
}

/// Look up a profile; `None` maps to `None`
pub fn find_profile(id: Option<IndustryId>) -> Option<&'static IndustryProfile> {
    let id = id?;
    PROFILES.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_has_a_profile() {
        for id in IndustryId::ALL {
            let profile = find_profile(Some(id)).unwrap();
            assert_eq!(profile.id, id);
        }
        assert_eq!(profiles().len(), IndustryId::ALL.len());
    }

    #[test]
    fn test_find_profile_none() {
        assert!(find_profile(None).is_none());
    }

    #[test]
    fn test_profile_copy_leaves_cards_untouched() {
        for profile in profiles() {
            let demos = profile.copy.demos.as_ref().unwrap();
            assert!(demos.cards.is_none(), "{} should not override cards", profile.id);
        }
    }

    #[test]
    fn test_industry_id_parse_is_case_insensitive() {
        assert_eq!("SaaS".parse::<IndustryId>().unwrap(), IndustryId::Saas);
        assert_eq!(" retail ".parse::<IndustryId>().unwrap(), IndustryId::Retail);
        assert!("banking".parse::<IndustryId>().is_err());
    }
}
