//! Content model
//!
//! `ContentDocument` is the complete copy rendered on the page. Overrides are
//! partial documents; [`merge_content`] layers them over a base.

use serde::{Deserialize, Serialize};

use crate::demos::{CardContent, default_cards};

/// Complete user-facing copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub hero: HeroBlock,
    pub demos: DemosBlock,
    pub cta: CtaBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBlock {
    pub title: String,
    pub subtitle: String,
    pub cta_primary: String,
    pub cta_secondary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemosBlock {
    pub section_title: String,
    pub section_subtitle: String,
    pub cards: Vec<CardContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaBlock {
    pub primary: String,
    pub secondary: String,
}

/// Partial `ContentDocument`; any field at any level may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<HeroOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demos: Option<DemosOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<CtaOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_secondary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemosOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_subtitle: Option<String>,
    /// Replaces the card list wholesale when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<CardContent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CtaOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl Default for ContentDocument {
    fn default() -> Self {
        Self {
            hero: HeroBlock {
                title: "We Build Scalable Digital Systems.".to_string(),
                subtitle: "From advertising & SEO to enterprise-grade software, we design, build, and automate systems that grow and scale your business.".to_string(),
                cta_primary: "Start Your Project".to_string(),
                cta_secondary: "See Examples".to_string(),
            },
            demos: DemosBlock {
                section_title: "Demo platform, engineered for control".to_string(),
                section_subtitle: "Customize this site in real time - these showcases highlight our configurable design system and elegant UX.".to_string(),
                cards: default_cards(),
            },
            cta: CtaBlock {
                primary: "Start a Project".to_string(),
                secondary: "Explore Resources".to_string(),
            },
        }
    }
}

/// A full document used as an override replaces every field
impl From<ContentDocument> for ContentOverride {
    fn from(doc: ContentDocument) -> Self {
        Self {
            hero: Some(HeroOverride {
                title: Some(doc.hero.title),
                subtitle: Some(doc.hero.subtitle),
                cta_primary: Some(doc.hero.cta_primary),
                cta_secondary: Some(doc.hero.cta_secondary),
            }),
            demos: Some(DemosOverride {
                section_title: Some(doc.demos.section_title),
                section_subtitle: Some(doc.demos.section_subtitle),
                cards: Some(doc.demos.cards),
            }),
            cta: Some(CtaOverride {
                primary: Some(doc.cta.primary),
                secondary: Some(doc.cta.secondary),
            }),
        }
    }
}

fn overlay(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

impl HeroBlock {
    fn apply(&mut self, o: &HeroOverride) {
        overlay(&mut self.title, &o.title);
        overlay(&mut self.subtitle, &o.subtitle);
        overlay(&mut self.cta_primary, &o.cta_primary);
        overlay(&mut self.cta_secondary, &o.cta_secondary);
    }
}

impl DemosBlock {
    fn apply(&mut self, o: &DemosOverride) {
        overlay(&mut self.section_title, &o.section_title);
        overlay(&mut self.section_subtitle, &o.section_subtitle);
        if let Some(cards) = &o.cards {
            self.cards = cards.clone();
        }
    }
}

impl CtaBlock {
    fn apply(&mut self, o: &CtaOverride) {
        overlay(&mut self.primary, &o.primary);
        overlay(&mut self.secondary, &o.secondary);
    }
}

/// Layer `overlays` over `base`, lowest precedence first
///
/// Each block present in an overlay is merged field by field; `demos.cards`
/// replaces the accumulated list instead of merging per card. `None`
/// overlays are skipped.
pub fn merge_content(base: &ContentDocument, overlays: &[Option<&ContentOverride>]) -> ContentDocument {
    let mut next = base.clone();

    for o in overlays.iter().flatten() {
        if let Some(hero) = &o.hero {
            next.hero.apply(hero);
        }
        if let Some(demos) = &o.demos {
            next.demos.apply(demos);
        }
        if let Some(cta) = &o.cta {
            next.cta.apply(cta);
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_override(title: &str) -> ContentOverride {
        ContentOverride {
            hero: Some(HeroOverride {
                title: Some(title.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_without_overlays_is_base() {
        let base = ContentDocument::default();
        assert_eq!(merge_content(&base, &[]), base);
        assert_eq!(merge_content(&base, &[None, None]), base);
    }

    #[test]
    fn test_partial_hero_keeps_untouched_fields() {
        let base = ContentDocument::default();
        let merged = merge_content(&base, &[Some(&title_override("New"))]);

        assert_eq!(merged.hero.title, "New");
        assert_eq!(merged.hero.subtitle, base.hero.subtitle);
        assert_eq!(merged.hero.cta_primary, base.hero.cta_primary);
        assert_eq!(merged.demos, base.demos);
        assert_eq!(merged.cta, base.cta);
    }

    #[test]
    fn test_last_overlay_wins() {
        let base = ContentDocument::default();
        let b = title_override("B");
        let c = title_override("C");

        assert_eq!(merge_content(&base, &[Some(&b), Some(&c)]).hero.title, "C");
        assert_eq!(merge_content(&base, &[Some(&c), Some(&b)]).hero.title, "B");
    }

    #[test]
    fn test_cards_replaced_not_merged() {
        let base = ContentDocument::default();
        assert_eq!(base.demos.cards.len(), 4);

        let two: Vec<CardContent> = base.demos.cards.iter().rev().take(2).cloned().collect();
        let o = ContentOverride {
            demos: Some(DemosOverride {
                cards: Some(two.clone()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = merge_content(&base, &[Some(&o)]);
        assert_eq!(merged.demos.cards, two);
        assert_eq!(merged.demos.section_title, base.demos.section_title);
    }

    #[test]
    fn test_demos_block_without_cards_keeps_cards() {
        let base = ContentDocument::default();
        let o = ContentOverride {
            demos: Some(DemosOverride {
                section_title: Some("Live".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = merge_content(&base, &[Some(&o)]);
        assert_eq!(merged.demos.section_title, "Live");
        assert_eq!(merged.demos.cards, base.demos.cards);
    }

    #[test]
    fn test_merge_is_deterministic_and_leaves_inputs_alone() {
        let base = ContentDocument::default();
        let a = title_override("A");
        let snapshot = base.clone();

        let first = merge_content(&base, &[Some(&a)]);
        let second = merge_content(&base, &[Some(&a)]);
        assert_eq!(first, second);
        assert_eq!(base, snapshot);
    }

    #[test]
    fn test_full_document_override_replaces_everything() {
        let base = ContentDocument::default();
        let mut other = base.clone();
        other.hero.title = "X".to_string();
        other.cta.secondary = "Y".to_string();
        other.demos.cards.truncate(1);

        let merged = merge_content(&base, &[Some(&ContentOverride::from(other.clone()))]);
        assert_eq!(merged, other);
    }

    #[test]
    fn test_override_json_omits_absent_fields() {
        let json = serde_json::to_value(title_override("T")).unwrap();
        assert_eq!(json, serde_json::json!({ "hero": { "title": "T" } }));
    }
}
