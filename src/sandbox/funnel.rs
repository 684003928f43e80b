//! Funnel lab: persisted simulator inputs, reported in the active industry's terms

use std::rc::Rc;
use tracing::warn;

use crate::constants::debounce::FUNNEL_LAB_MS;
use crate::demos::DemoId;
use crate::effects::EffectsStore;
use crate::funnel::{FunnelInputs, FunnelMode, FunnelReport, TRAFFIC_MAX, TRAFFIC_MIN, simulate};
use crate::storage::{DemoStorage, DraftOptions, DraftStore, Scheduler};

pub struct FunnelLab {
    effects: Rc<EffectsStore>,
    draft: DraftStore<FunnelInputs>,
}

impl FunnelLab {
    pub fn open(effects: Rc<EffectsStore>, storage: DemoStorage, scheduler: Rc<dyn Scheduler>) -> Self {
        let draft = DraftStore::open(
            storage,
            DemoId::FunnelLab.as_str(),
            FunnelInputs::default(),
            DraftOptions::debounce_ms(FUNNEL_LAB_MS),
            scheduler,
        );
        Self { effects, draft }
    }

    pub fn inputs(&self) -> FunnelInputs {
        self.draft.draft()
    }

    pub fn set_inputs(&self, inputs: FunnelInputs) {
        self.draft.set_draft(inputs);
    }

    pub fn set_mode(&self, mode: FunnelMode) {
        self.draft.update_draft(|current| FunnelInputs {
            mode,
            ..current.clone()
        });
    }

    /// Set traffic, kept within the slider range; non-finite values are ignored
    pub fn set_traffic(&self, traffic: f64) {
        if !traffic.is_finite() {
            warn!("Ignoring non-finite funnel traffic {}", traffic);
            return;
        }
        let traffic = traffic.clamp(TRAFFIC_MIN, TRAFFIC_MAX);
        self.draft.update_draft(|current| FunnelInputs {
            traffic,
            ..current.clone()
        });
    }

    pub fn report(&self) -> FunnelReport {
        let labels = self.effects.read(|s| s.labels.clone());
        self.draft.with_draft(|inputs| simulate(inputs, &labels))
    }

    pub fn reset(&self) {
        self.draft.reset(true);
    }

    pub fn clear(&self) {
        self.draft.clear();
    }

    pub fn flush(&self) {
        self.draft.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::industry::{IndustryId, find_profile};
    use crate::storage::{ManualScheduler, MemoryStore};

    fn lab() -> (Rc<EffectsStore>, FunnelLab) {
        let effects = Rc::new(EffectsStore::default());
        let lab = FunnelLab::open(
            Rc::clone(&effects),
            DemoStorage::new(Rc::new(MemoryStore::new())),
            Rc::new(ManualScheduler::new()),
        );
        (effects, lab)
    }

    #[test]
    fn test_report_uses_industry_labels() {
        let (effects, lab) = lab();
        assert_eq!(lab.report().stages[1].label, "Leads");

        effects.set_industry_profile(find_profile(Some(IndustryId::Saas)));
        assert_eq!(lab.report().stages[1].label, "Trials");
    }

    #[test]
    fn test_mode_switch_changes_metrics() {
        let (_, lab) = lab();
        let before = lab.report();
        lab.set_mode(FunnelMode::Dnd);
        let after = lab.report();
        assert_eq!(after.mode, FunnelMode::Dnd);
        assert!(after.revenue > before.revenue);
    }

    #[test]
    fn test_traffic_clamped_to_slider_range() {
        let (_, lab) = lab();
        lab.set_traffic(10.0);
        assert_eq!(lab.inputs().traffic, TRAFFIC_MIN);
        lab.set_traffic(1e9);
        assert_eq!(lab.inputs().traffic, TRAFFIC_MAX);
    }

    #[test]
    fn test_non_finite_traffic_is_ignored() {
        let mem = MemoryStore::new();
        let scheduler = Rc::new(ManualScheduler::new());
        let open = || {
            FunnelLab::open(
                Rc::new(EffectsStore::default()),
                DemoStorage::new(Rc::new(mem.clone())),
                scheduler.clone(),
            )
        };

        let lab = open();
        lab.set_mode(FunnelMode::Dnd);
        lab.set_traffic(20_000.0);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            lab.set_traffic(bad);
            assert_eq!(lab.inputs().traffic, 20_000.0);
        }
        lab.flush();

        let reopened = open().inputs();
        assert_eq!(reopened.mode, FunnelMode::Dnd);
        assert_eq!(reopened.traffic, 20_000.0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let (_, lab) = lab();
        lab.set_mode(FunnelMode::Dnd);
        lab.reset();
        assert_eq!(lab.inputs(), FunnelInputs::default());
    }
}
