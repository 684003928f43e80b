//! Demo sandbox
//!
//! Each demo owns a persisted draft and mirrors it into the shared effects
//! store, so the rest of the page picks up the visitor's choices.

pub mod background;
pub mod edit_mode;
pub mod funnel;
pub mod industry;

use std::rc::Rc;
use tracing::info;

use crate::effects::EffectsStore;
use crate::storage::{DemoStorage, Scheduler};

pub use background::BackgroundLab;
pub use edit_mode::{ChangeLogEntry, EditModeDraft, EditModeFlags, EditModeSession};
pub use funnel::FunnelLab;
pub use industry::IndustrySwitcher;

pub struct Sandbox {
    effects: Rc<EffectsStore>,
    storage: DemoStorage,
    pub industry: IndustrySwitcher,
    pub edit_mode: EditModeSession,
    pub background: BackgroundLab,
    pub funnel: FunnelLab,
}

impl Sandbox {
    /// Hydrate every demo and apply its state to a fresh effects store
    pub fn open(storage: DemoStorage, scheduler: Rc<dyn Scheduler>) -> Self {
        let effects = Rc::new(EffectsStore::default());
        let industry = IndustrySwitcher::open(Rc::clone(&effects), storage.clone(), Rc::clone(&scheduler));
        let edit_mode = EditModeSession::open(Rc::clone(&effects), storage.clone(), Rc::clone(&scheduler));
        let background = BackgroundLab::open(Rc::clone(&effects), storage.clone(), Rc::clone(&scheduler));
        let funnel = FunnelLab::open(Rc::clone(&effects), storage.clone(), scheduler);
        Self {
            effects,
            storage,
            industry,
            edit_mode,
            background,
            funnel,
        }
    }

    pub fn effects(&self) -> &Rc<EffectsStore> {
        &self.effects
    }

    /// Write every pending debounced draft
    pub fn flush(&self) {
        self.industry.flush();
        self.edit_mode.flush();
        self.background.flush();
        self.funnel.flush();
    }

    /// Forget every stored demo and return the page to its defaults
    pub fn clear(&self) {
        self.industry.clear();
        self.edit_mode.clear();
        self.background.clear();
        self.funnel.clear();
        self.storage.clear_all();
        self.effects.reset_all_effects();
        self.industry.sync();
        self.edit_mode.sync();
        self.background.sync();
        info!("Cleared all demo storage");
    }
}
