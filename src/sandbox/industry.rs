//! Industry switcher: the chosen industry skins copy, accent and labels

use std::rc::Rc;
use tracing::info;

use crate::constants::debounce::INDUSTRY_SWITCHER_MS;
use crate::demos::DemoId;
use crate::effects::EffectsStore;
use crate::industry::{IndustryId, find_profile};
use crate::storage::{DemoStorage, DraftOptions, DraftStore, Scheduler};

pub struct IndustrySwitcher {
    effects: Rc<EffectsStore>,
    draft: DraftStore<Option<IndustryId>>,
}

impl IndustrySwitcher {
    pub fn open(effects: Rc<EffectsStore>, storage: DemoStorage, scheduler: Rc<dyn Scheduler>) -> Self {
        let draft = DraftStore::open(
            storage,
            DemoId::IndustrySwitcher.as_str(),
            None,
            DraftOptions::debounce_ms(INDUSTRY_SWITCHER_MS),
            scheduler,
        );
        let switcher = Self { effects, draft };
        switcher.sync();
        switcher
    }

    pub fn industry(&self) -> Option<IndustryId> {
        self.draft.draft()
    }

    /// Select an industry, or `None` for the neutral skin
    pub fn set_industry(&self, id: Option<IndustryId>) {
        match id {
            Some(id) => info!(industry = %id, "Industry selected"),
            None => info!("Industry cleared"),
        }
        self.draft.set_draft(id);
        self.sync();
    }

    pub fn reset(&self) {
        self.draft.reset(true);
        self.sync();
    }

    pub fn clear(&self) {
        self.draft.clear();
        self.sync();
    }

    pub fn flush(&self) {
        self.draft.flush();
    }

    pub fn sync(&self) {
        self.effects.set_industry_profile(find_profile(self.draft.draft()));
    }
}
