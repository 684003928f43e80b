//! Demo effects store
//!
//! One `EffectsStore` per page session holds the composed UI configuration:
//! content (base copy, two override sources and the merged result), layout,
//! background, glass material, accent palette, industry terminology and
//! feature flags. State is only changed through the action methods; readers
//! subscribe, optionally through a projection that filters unrelated changes.
//!
//! Override precedence follows `flags.edit_mode_active`: while editing, the
//! edit override is applied last and wins; otherwise the industry override
//! wins. `content.effective` is recomputed inside every transition that can
//! change it, so it is never observed stale.

pub mod background;
pub mod glass;
pub mod layout;

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::{debug, info};

use crate::content::{ContentDocument, ContentOverride, merge_content};
use crate::industry::{Accent, IndustryId, IndustryProfile, Labels};

pub use background::{BackgroundConfig, BackgroundPatch, BackgroundPreset, PaletteId, WaveParams};
pub use glass::{GlassPatch, GlassSettings, GlassStyle, GlassVars};
pub use layout::{CardDensity, HeroVariant, LayoutPatch, LayoutState, SpacingDensity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentState {
    pub base: ContentDocument,
    pub industry_override: Option<ContentOverride>,
    pub edit_override: Option<ContentOverride>,
    /// Derived from the other three fields and `flags.edit_mode_active`
    pub effective: ContentDocument,
}

impl ContentState {
    pub fn new(base: ContentDocument) -> Self {
        Self {
            effective: base.clone(),
            base,
            industry_override: None,
            edit_override: None,
        }
    }

    fn rebuild(&mut self, edit_mode_active: bool) {
        let industry = self.industry_override.as_ref();
        let edit = self.edit_override.as_ref();
        let overlays = if edit_mode_active {
            [industry, edit]
        } else {
            [edit, industry]
        };
        self.effective = merge_content(&self.base, &overlays);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    pub edit_mode_active: bool,
    pub inline_editing: bool,
    pub show_editable_regions: bool,
    pub outline_components: bool,
    pub reorder_cards: bool,
    pub reorder_sections: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            edit_mode_active: false,
            inline_editing: true,
            show_editable_regions: true,
            outline_components: false,
            reorder_cards: false,
            reorder_sections: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_mode_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_editing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_editable_regions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_components: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorder_cards: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorder_sections: Option<bool>,
}

impl FlagsPatch {
    pub fn apply_to(self, flags: &mut Flags) {
        if let Some(v) = self.edit_mode_active {
            flags.edit_mode_active = v;
        }
        if let Some(v) = self.inline_editing {
            flags.inline_editing = v;
        }
        if let Some(v) = self.show_editable_regions {
            flags.show_editable_regions = v;
        }
        if let Some(v) = self.outline_components {
            flags.outline_components = v;
        }
        if let Some(v) = self.reorder_cards {
            flags.reorder_cards = v;
        }
        if let Some(v) = self.reorder_sections {
            flags.reorder_sections = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsState {
    pub content: ContentState,
    pub layout: LayoutState,
    pub background: BackgroundConfig,
    pub glass: GlassSettings,
    pub accent: Accent,
    pub industry_id: Option<IndustryId>,
    pub labels: Labels,
    pub flags: Flags,
}

impl Default for EffectsState {
    fn default() -> Self {
        Self::with_base(ContentDocument::default())
    }
}

impl EffectsState {
    pub fn with_base(base: ContentDocument) -> Self {
        Self {
            content: ContentState::new(base),
            layout: LayoutState::default(),
            background: BackgroundConfig::default(),
            glass: GlassSettings::default(),
            accent: Accent::default(),
            industry_id: None,
            labels: Labels::default(),
            flags: Flags::default(),
        }
    }

    /// Custom properties the page root exposes to styling
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let glass = self.glass.vars();
        vec![
            ("--demo-accent-primary", self.accent.primary.clone()),
            ("--demo-accent-secondary", self.accent.secondary.clone()),
            ("--demo-accent-glow", self.accent.glow.clone()),
            ("--demo-accent-icon", self.accent.icon.clone()),
            ("--demo-glass-tint", glass.tint),
            ("--demo-glass-surface", glass.surface),
            ("--demo-glass-base", glass.base),
        ]
    }
}

type Listener = Rc<dyn Fn(&EffectsState)>;
type Transition = Box<dyn FnOnce(&mut EffectsState)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Handle returned by [`EffectsStore::subscribe`]; the listener is removed on drop
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Subscription {
    /// Remove the listener now; consuming the handle runs `Drop`
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Single-writer, many-reader container for [`EffectsState`]
///
/// Transitions requested while listeners are being notified (for example an
/// action called from inside a listener) are queued and committed once the
/// current round finishes, so listeners always observe transitions in the
/// order the actions were invoked.
pub struct EffectsStore {
    initial: Rc<EffectsState>,
    state: RefCell<Rc<EffectsState>>,
    registry: Rc<RefCell<Registry>>,
    queue: RefCell<VecDeque<Transition>>,
    dispatching: Cell<bool>,
}

impl Default for EffectsStore {
    fn default() -> Self {
        Self::new(EffectsState::default())
    }
}

impl EffectsStore {
    pub fn new(initial: EffectsState) -> Self {
        let initial = Rc::new(initial);
        Self {
            state: RefCell::new(Rc::clone(&initial)),
            initial,
            registry: Rc::new(RefCell::new(Registry::default())),
            queue: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        }
    }

    /// Current snapshot; the same `Rc` is returned until the next commit
    pub fn get_state(&self) -> Rc<EffectsState> {
        Rc::clone(&*self.state.borrow())
    }

    /// Project the current snapshot
    pub fn read<T>(&self, selector: impl FnOnce(&EffectsState) -> T) -> T {
        selector(&**self.state.borrow())
    }

    /// Register `listener` to run after every committed transition, in subscription order
    pub fn subscribe(&self, listener: impl Fn(&EffectsState) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.listeners.push((id, Rc::new(listener)));
        Subscription {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Subscribe to a projection; `on_change` only runs when the projected value changes
    pub fn select<T, S, F>(&self, selector: S, on_change: F) -> Subscription
    where
        T: PartialEq + 'static,
        S: Fn(&EffectsState) -> T + 'static,
        F: Fn(&T) + 'static,
    {
        let last = RefCell::new(self.read(&selector));
        self.subscribe(move |state| {
            let next = selector(state);
            if *last.borrow() != next {
                on_change(&next);
                *last.borrow_mut() = next;
            }
        })
    }

    fn dispatch(&self, transition: Transition) {
        self.queue.borrow_mut().push_back(transition);
        if self.dispatching.replace(true) {
            return;
        }

        loop {
            let Some(transition) = self.queue.borrow_mut().pop_front() else {
                break;
            };
            let mut next = EffectsState::clone(&**self.state.borrow());
            transition(&mut next);
            let next = Rc::new(next);
            *self.state.borrow_mut() = Rc::clone(&next);
            self.notify(&next);
        }

        self.dispatching.set(false);
    }

    fn notify(&self, state: &EffectsState) {
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(state);
        }
    }

    /// Apply an industry profile's copy, palette and labels; `None` restores the defaults
    pub fn set_industry_profile(&self, profile: Option<&IndustryProfile>) {
        debug!(industry = ?profile.map(|p| p.id), "set_industry_profile");
        let profile = profile.cloned();
        let defaults = Rc::clone(&self.initial);
        self.dispatch(Box::new(move |state| {
            match profile {
                Some(profile) => {
                    state.content.industry_override = Some(profile.copy);
                    state.accent = profile.palette;
                    state.industry_id = Some(profile.id);
                    state.labels = profile.labels;
                }
                None => {
                    state.content.industry_override = None;
                    state.accent = defaults.accent.clone();
                    state.industry_id = None;
                    state.labels = defaults.labels.clone();
                }
            }
            state.content.rebuild(state.flags.edit_mode_active);
        }));
    }

    /// Replace the edit override; `None` when the editor is not the active surface
    pub fn set_edit_mode_override(&self, edit_override: Option<ContentOverride>) {
        debug!(present = edit_override.is_some(), "set_edit_mode_override");
        self.dispatch(Box::new(move |state| {
            state.content.edit_override = edit_override;
            state.content.rebuild(state.flags.edit_mode_active);
        }));
    }

    pub fn set_layout(&self, patch: LayoutPatch) {
        debug!(?patch, "set_layout");
        self.dispatch(Box::new(move |state| patch.apply_to(&mut state.layout)));
    }

    pub fn set_background(&self, patch: BackgroundPatch) {
        debug!(?patch, "set_background");
        self.dispatch(Box::new(move |state| patch.apply_to(&mut state.background)));
    }

    pub fn set_glass(&self, patch: GlassPatch) {
        debug!(?patch, "set_glass");
        self.dispatch(Box::new(move |state| patch.apply_to(&mut state.glass)));
    }

    /// Merge flags, then recompute the effective content (precedence depends on them)
    pub fn set_flags(&self, patch: FlagsPatch) {
        debug!(?patch, "set_flags");
        self.dispatch(Box::new(move |state| {
            patch.apply_to(&mut state.flags);
            state.content.rebuild(state.flags.edit_mode_active);
        }));
    }

    /// Restore the initial snapshot
    pub fn reset_all_effects(&self) {
        info!("Resetting all demo effects");
        let initial = Rc::clone(&self.initial);
        self.dispatch(Box::new(move |state| *state = EffectsState::clone(&initial)));
    }
}
