//! Inline edit session
//!
//! The draft holds the visitor's copy, layout and glass edits plus a short
//! change log. While the session is active the draft drives the page; when it
//! is closed the page shows the last saved copy, or the defaults.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, info};

use crate::constants::debounce::EDIT_MODE_MS;
use crate::constants::edit_mode::CHANGE_LOG_LIMIT;
use crate::content::{ContentDocument, ContentOverride};
use crate::demos::DemoId;
use crate::effects::layout::{move_item, reorder_by_id};
use crate::effects::{EffectsStore, FlagsPatch, GlassSettings, LayoutPatch, LayoutState};
use crate::storage::{DemoStorage, DraftOptions, DraftStore, Scheduler};

const SECTION_LABELS: [(&str, &str); 4] = [
    ("outcomes", "Outcome Panels"),
    ("services", "Services Grid"),
    ("demos", "Components & Demos"),
    ("cta", "Project CTA"),
];

pub fn section_label(id: &str) -> &str {
    SECTION_LABELS
        .iter()
        .find(|(section, _)| *section == id)
        .map(|(_, label)| *label)
        .unwrap_or(id)
}

/// Editor toggles stored with the draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditModeFlags {
    pub inline_editing: bool,
    pub show_editable_regions: bool,
    pub outline_components: bool,
    pub reorder_cards: bool,
    pub reorder_sections: bool,
}

impl Default for EditModeFlags {
    fn default() -> Self {
        Self {
            inline_editing: true,
            show_editable_regions: true,
            outline_components: false,
            reorder_cards: false,
            reorder_sections: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub id: String,
    pub label: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl ChangeLogEntry {
    pub fn new(label: impl Into<String>) -> Self {
        let now = Utc::now();
        let timestamp = now.timestamp_millis();
        Self {
            id: format!("{}-{:05x}", timestamp, now.timestamp_subsec_nanos() & 0xf_ffff),
            label: label.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditModeDraft {
    pub content: ContentDocument,
    pub layout: LayoutState,
    pub glass: GlassSettings,
    pub flags: EditModeFlags,
    /// Newest first
    pub change_log: Vec<ChangeLogEntry>,
}

impl EditModeDraft {
    pub fn log(&mut self, label: impl Into<String>) {
        self.change_log.insert(0, ChangeLogEntry::new(label));
        self.change_log.truncate(CHANGE_LOG_LIMIT);
    }
}

pub struct EditModeSession {
    effects: Rc<EffectsStore>,
    draft: DraftStore<EditModeDraft>,
    active: Cell<bool>,
}

impl EditModeSession {
    pub fn open(effects: Rc<EffectsStore>, storage: DemoStorage, scheduler: Rc<dyn Scheduler>) -> Self {
        let draft = DraftStore::open(
            storage,
            DemoId::EditMode.as_str(),
            EditModeDraft::default(),
            DraftOptions::debounce_ms(EDIT_MODE_MS).with_save(),
            scheduler,
        );
        let session = Self {
            effects,
            draft,
            active: Cell::new(false),
        };
        session.sync();
        session
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn set_active(&self, active: bool) {
        if self.active.replace(active) != active {
            info!(active, "Edit mode toggled");
        }
        self.sync();
    }

    pub fn draft(&self) -> EditModeDraft {
        self.draft.draft()
    }

    pub fn saved(&self) -> Option<EditModeDraft> {
        self.draft.saved()
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.is_dirty()
    }

    /// Modify the draft without logging
    pub fn update(&self, f: impl FnOnce(&mut EditModeDraft)) {
        self.draft.update_draft(|current| {
            let mut next = current.clone();
            f(&mut next);
            next
        });
        self.sync();
    }

    /// Modify the draft and record `label` in the change log
    pub fn apply(&self, label: impl Into<String>, f: impl FnOnce(&mut EditModeDraft)) {
        let label = label.into();
        debug!(change = %label, "Edit applied");
        self.update(|draft| {
            f(draft);
            draft.log(label);
        });
    }

    pub fn set_hero_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.apply("Edited hero title", |d| d.content.hero.title = title);
    }

    pub fn set_hero_subtitle(&self, subtitle: impl Into<String>) {
        let subtitle = subtitle.into();
        self.apply("Edited hero subtitle", |d| d.content.hero.subtitle = subtitle);
    }

    pub fn set_flags(&self, label: impl Into<String>, flags: EditModeFlags) {
        self.apply(label, |d| d.flags = flags);
    }

    /// Move the section at `from` to `to` in the stored order
    pub fn move_section(&self, from: usize, to: usize) -> bool {
        let order = self.draft.with_draft(|d| d.layout.sections_order.clone());
        let Some(id) = order.get(from).cloned() else {
            return false;
        };
        if to >= order.len() || from == to {
            return false;
        }
        let label = format!("Moved section: {}", section_label(&id));
        self.apply(label, |d| d.layout.sections_order = move_item(&d.layout.sections_order, from, to));
        true
    }

    /// Drop card `dragged` onto the slot of card `target`
    ///
    /// Only allowed while card reordering is switched on in the page flags.
    pub fn reorder_cards(&self, dragged: &str, target: &str) -> bool {
        let (allowed, logged, order) =
            self.effects.read(|s| (s.flags.reorder_cards, s.flags.edit_mode_active, s.layout.demos_order.clone()));
        if !allowed {
            return false;
        }
        let Some(next) = reorder_by_id(&order, dragged, target) else {
            return false;
        };
        self.effects.set_layout(LayoutPatch {
            demos_order: Some(next.clone()),
            ..Default::default()
        });
        self.update(|d| {
            d.layout.demos_order = next;
            if logged {
                d.log("Reordered demo cards");
            }
        });
        true
    }

    pub fn save(&self) {
        self.draft.save();
        self.sync();
    }

    /// Back to defaults, dropping the saved copy
    pub fn reset(&self) {
        self.draft.reset(true);
        self.update(|d| d.log("Reset to defaults"));
    }

    /// Throw away unsaved edits
    pub fn discard(&self) {
        let restored = self.draft.saved().unwrap_or_default();
        self.draft.set_draft(restored);
        self.sync();
    }

    pub fn clear(&self) {
        self.draft.clear();
        self.sync();
    }

    pub fn flush(&self) {
        self.draft.flush();
    }

    /// Push the visible copy, layout, glass and flags into the effects store
    pub fn sync(&self) {
        let active = self.active.get();
        let (content, layout, glass, flags) = if active {
            let d = self.draft.draft();
            (Some(ContentOverride::from(d.content)), d.layout, d.glass, d.flags)
        } else {
            match self.draft.saved() {
                Some(s) => (Some(ContentOverride::from(s.content)), s.layout, s.glass, EditModeFlags::default()),
                None => (None, LayoutState::default(), GlassSettings::default(), EditModeFlags::default()),
            }
        };

        self.effects.set_edit_mode_override(content);
        self.effects.set_layout(layout.into());
        self.effects.set_glass(glass.into());
        self.effects.set_flags(FlagsPatch {
            edit_mode_active: Some(active),
            inline_editing: Some(flags.inline_editing),
            show_editable_regions: Some(flags.show_editable_regions),
            outline_components: Some(flags.outline_components),
            reorder_cards: Some(active && flags.reorder_cards),
            reorder_sections: Some(active && flags.reorder_sections),
        });
    }
}
