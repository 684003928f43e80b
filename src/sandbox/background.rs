//! Background lab: live tuning of the generated wave background

use std::cell::Cell;
use std::rc::Rc;
use tracing::info;

use crate::constants::debounce::BACKGROUND_LAB_MS;
use crate::demos::DemoId;
use crate::effects::{BackgroundConfig, BackgroundPreset, EffectsStore, WaveParams};
use crate::storage::{DemoStorage, DraftOptions, DraftStore, Scheduler};

pub struct BackgroundLab {
    effects: Rc<EffectsStore>,
    draft: DraftStore<BackgroundConfig>,
    reduced_motion_applied: Cell<bool>,
}

impl BackgroundLab {
    pub fn open(effects: Rc<EffectsStore>, storage: DemoStorage, scheduler: Rc<dyn Scheduler>) -> Self {
        let draft = DraftStore::open(
            storage,
            DemoId::BackgroundLab.as_str(),
            BackgroundConfig::default(),
            DraftOptions::debounce_ms(BACKGROUND_LAB_MS),
            scheduler,
        );
        let lab = Self {
            effects,
            draft,
            reduced_motion_applied: Cell::new(false),
        };
        lab.sync();
        lab
    }

    pub fn config(&self) -> BackgroundConfig {
        self.draft.draft()
    }

    pub fn wave_params(&self) -> WaveParams {
        self.draft.with_draft(BackgroundConfig::wave_params)
    }

    pub fn set_config(&self, config: BackgroundConfig) {
        self.draft.set_draft(config);
        self.sync();
    }

    pub fn update(&self, f: impl FnOnce(&mut BackgroundConfig)) {
        let mut next = self.config();
        f(&mut next);
        self.set_config(next);
    }

    pub fn apply_preset(&self, preset: BackgroundPreset) {
        info!(preset = %preset, "Applying background preset");
        self.set_config(preset.config());
    }

    /// Honour a reduced-motion preference; only the first call with `true` has an effect
    pub fn apply_reduced_motion_preference(&self, prefers_reduced_motion: bool) {
        if !prefers_reduced_motion || self.reduced_motion_applied.replace(true) {
            return;
        }
        info!("Reduced motion preferred, toning down background");
        self.set_config(self.config().with_reduced_motion());
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
        self.effects.set_background(self.config().into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::PaletteId;
    use crate::storage::{ManualScheduler, MemoryStore};

    fn lab() -> (Rc<EffectsStore>, BackgroundLab) {
        let effects = Rc::new(EffectsStore::default());
        let lab = BackgroundLab::open(
            Rc::clone(&effects),
            DemoStorage::new(Rc::new(MemoryStore::new())),
            Rc::new(ManualScheduler::new()),
        );
        (effects, lab)
    }

    #[test]
    fn test_changes_reach_effects() {
        let (effects, lab) = lab();
        lab.update(|c| {
            c.palette_id = PaletteId::Custom;
            c.accent_hue = 42.0;
        });
        let background = effects.get_state().background.clone();
        assert_eq!(background.palette_id, PaletteId::Custom);
        assert_eq!(background.accent_hue, 42.0);
    }

    #[test]
    fn test_preset_replaces_config() {
        let (effects, lab) = lab();
        lab.apply_preset(BackgroundPreset::Creative);
        assert_eq!(lab.config(), BackgroundPreset::Creative.config());
        assert_eq!(effects.get_state().background, BackgroundPreset::Creative.config());
    }

    #[test]
    fn test_reduced_motion_applies_once() {
        let (_, lab) = lab();
        lab.update(|c| {
            c.speed = 1.4;
            c.parallax_depth = 0.8;
        });

        lab.apply_reduced_motion_preference(false);
        assert!(!lab.config().reduce_motion);

        lab.apply_reduced_motion_preference(true);
        let config = lab.config();
        assert!(config.reduce_motion);
        assert_eq!(config.speed, 0.5);
        assert_eq!(config.parallax_depth, 0.2);

        // A later manual change is not overridden again
        lab.update(|c| c.speed = 1.2);
        lab.apply_reduced_motion_preference(true);
        assert_eq!(lab.config().speed, 1.2);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (effects, lab) = lab();
        lab.apply_preset(BackgroundPreset::Enterprise);
        lab.reset();
        assert_eq!(effects.get_state().background, BackgroundConfig::default());
    }
}
