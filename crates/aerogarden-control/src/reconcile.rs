//! Reconciliation of cached state with the device's reported state.
//!
//! The remote only reports a binary `lightStat`, so the cached brightness is
//! corrected when it contradicts the report and otherwise left alone.

use aerogarden_core::{Brightness, DeviceState, LightStat};

/// Outcome of reconciling a get-power request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// The power value to answer with.
    pub on: bool,
    /// The state to write back, if the cache needs correcting.
    pub update: Option<DeviceState>,
}

impl Reconciliation {
    /// Answer with `on` and leave the cache alone, as when the query failed.
    #[must_use]
    pub const fn unchanged(on: bool) -> Self {
        Self { on, update: None }
    }
}

/// Reconcile `cached` with the device's reported flag.
#[must_use]
pub fn reconcile(cached: DeviceState, reported: LightStat) -> Reconciliation {
    match reported {
        LightStat::Off => Reconciliation {
            on: false,
            update: (cached.brightness != Brightness::OFF).then_some(DeviceState {
                brightness: Brightness::OFF,
                ..cached
            }),
        },
        // On but zero brightness is not a state the stepper can leave sensibly.
        LightStat::On if cached.brightness == Brightness::OFF => Reconciliation {
            on: true,
            update: Some(DeviceState {
                brightness: Brightness::FULL,
                ..cached
            }),
        },
        LightStat::On => Reconciliation::unchanged(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_off_zeroes_brightness() {
        let cached = DeviceState::new(true, Brightness::HALF);
        let result = reconcile(cached, LightStat::Off);
        assert!(!result.on);
        assert_eq!(result.update, Some(DeviceState::new(true, Brightness::OFF)));
    }

    #[test]
    fn reported_off_when_already_zero() {
        let cached = DeviceState::new(false, Brightness::OFF);
        let result = reconcile(cached, LightStat::Off);
        assert!(!result.on);
        assert_eq!(result.update, None);
    }

    #[test]
    fn reported_on_heals_zero_brightness() {
        let cached = DeviceState::new(false, Brightness::OFF);
        let result = reconcile(cached, LightStat::On);
        assert!(result.on);
        assert_eq!(result.update, Some(DeviceState::new(false, Brightness::FULL)));
    }

    #[test]
    fn reported_on_keeps_nonzero_brightness() {
        let cached = DeviceState::new(false, Brightness::HALF);
        let result = reconcile(cached, LightStat::On);
        assert!(result.on);
        assert_eq!(result.update, None);
    }
}
