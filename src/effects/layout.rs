//! Layout slice: hero variant, densities and visitor-chosen orderings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::layout::DEFAULT_SECTIONS;
use crate::demos::DemoId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroVariant {
    #[default]
    Classic,
    Split,
    Centered,
    Dense,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingDensity {
    Compact,
    #[default]
    Normal,
    Spacious,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardDensity {
    #[default]
    Comfortable,
    Compact,
    Spacious,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    pub hero_variant: HeroVariant,
    pub spacing_density: SpacingDensity,
    pub card_density: CardDensity,
    #[serde(default)]
    pub demos_order: Vec<String>,
    #[serde(default)]
    pub sections_order: Vec<String>,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            hero_variant: HeroVariant::default(),
            spacing_density: SpacingDensity::default(),
            card_density: CardDensity::default(),
            demos_order: DemoId::ALL.iter().map(|id| id.to_string()).collect(),
            sections_order: DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Partial layout; present fields replace the slice's fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_variant: Option<HeroVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_density: Option<SpacingDensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_density: Option<CardDensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demos_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections_order: Option<Vec<String>>,
}

impl LayoutPatch {
    pub fn apply_to(self, layout: &mut LayoutState) {
        if let Some(v) = self.hero_variant {
            layout.hero_variant = v;
        }
        if let Some(v) = self.spacing_density {
            layout.spacing_density = v;
        }
        if let Some(v) = self.card_density {
            layout.card_density = v;
        }
        if let Some(v) = self.demos_order {
            layout.demos_order = v;
        }
        if let Some(v) = self.sections_order {
            layout.sections_order = v;
        }
    }
}

/// Replacing the whole slice is a patch with every field set
impl From<LayoutState> for LayoutPatch {
    fn from(layout: LayoutState) -> Self {
        Self {
            hero_variant: Some(layout.hero_variant),
            spacing_density: Some(layout.spacing_density),
            card_density: Some(layout.card_density),
            demos_order: Some(layout.demos_order),
            sections_order: Some(layout.sections_order),
        }
    }
}

/// Arrange `items` by `order`
///
/// Ids listed in `order` come first in that order; ids that match no item are
/// dropped; items not listed follow in their natural order. An empty `order`
/// yields the natural order.
pub fn apply_order<'a, T>(items: &'a [T], order: &[String], id_of: impl Fn(&T) -> &str) -> Vec<&'a T> {
    if order.is_empty() {
        return items.iter().collect();
    }

    let by_id: HashMap<&str, &T> = items.iter().map(|item| (id_of(item), item)).collect();
    let mut ordered: Vec<&T> = order.iter().filter_map(|id| by_id.get(id.as_str()).copied()).collect();
    ordered.extend(items.iter().filter(|item| !order.iter().any(|id| id == id_of(*item))));
    ordered
}

impl LayoutState {
    /// Section ids in display order
    pub fn ordered_sections(&self) -> Vec<String> {
        let natural: Vec<String> = DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect();
        apply_order(&natural, &self.sections_order, |s| s.as_str())
            .into_iter()
            .cloned()
            .collect()
    }
}

/// Move the element at `from` to position `to`; out-of-range indices leave the list unchanged
pub fn move_item<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = list.to_vec();
    if from >= next.len() || to >= next.len() || from == to {
        return next;
    }
    let item = next.remove(from);
    next.insert(to, item);
    next
}

/// Drag-and-drop reorder: move `dragged` onto the slot held by `target`
///
/// Returns `None` when either id is missing from `order` or they are equal.
pub fn reorder_by_id(order: &[String], dragged: &str, target: &str) -> Option<Vec<String>> {
    if dragged == target {
        return None;
    }
    let from = order.iter().position(|id| id == dragged)?;
    let to = order.iter().position(|id| id == target)?;
    Some(move_item(order, from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_apply_order_empty_is_natural() {
        let items = ids(&["a", "b", "c"]);
        let out: Vec<&String> = apply_order(&items, &[], |s| s.as_str());
        assert_eq!(out, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_apply_order_drops_unknown_and_appends_missing() {
        let items = ids(&["a", "b", "c", "d"]);
        let order = ids(&["c", "ghost", "a"]);
        let out: Vec<&String> = apply_order(&items, &order, |s| s.as_str());
        assert_eq!(out, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_ordered_sections_falls_back_to_default() {
        let mut layout = LayoutState::default();
        layout.sections_order.clear();
        assert_eq!(layout.ordered_sections(), ids(&DEFAULT_SECTIONS));

        layout.sections_order = ids(&["cta", "demos"]);
        assert_eq!(layout.ordered_sections(), ids(&["cta", "demos", "outcomes", "services"]));
    }

    #[test]
    fn test_move_item() {
        let list = ids(&["a", "b", "c", "d"]);
        assert_eq!(move_item(&list, 0, 2), ids(&["b", "c", "a", "d"]));
        assert_eq!(move_item(&list, 3, 0), ids(&["d", "a", "b", "c"]));
        assert_eq!(move_item(&list, 1, 9), list);
    }

    #[test]
    fn test_reorder_by_id() {
        let order = ids(&["edit-mode", "background-lab", "funnel-lab"]);
        assert_eq!(
            reorder_by_id(&order, "funnel-lab", "edit-mode"),
            Some(ids(&["funnel-lab", "edit-mode", "background-lab"]))
        );
        assert_eq!(reorder_by_id(&order, "funnel-lab", "funnel-lab"), None);
        assert_eq!(reorder_by_id(&order, "missing", "edit-mode"), None);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut layout = LayoutState::default();
        LayoutPatch {
            hero_variant: Some(HeroVariant::Split),
            ..Default::default()
        }
        .apply_to(&mut layout);

        assert_eq!(layout.hero_variant, HeroVariant::Split);
        assert_eq!(layout.card_density, CardDensity::Comfortable);
        assert_eq!(layout.demos_order.len(), 4);
    }
}
