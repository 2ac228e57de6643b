//! Brightness stepper state machine.
//!
//! The device only accepts a binary toggle, so brightness is approximated by
//! cycling through three levels. Every step sends exactly one toggle.
//!
//! # State Machine
//!
//! ```text
//!      ┌────────────────┐   step    ┌──────────────────┐
//!      │  Full (100%)   │──────────▶│ Partial (0<b<100)│
//!      │  on            │           │ on (50% after    │
//!      └────────────────┘           │ a step)          │
//!              ▲                    └────────┬─────────┘
//!              │ step                        │ step
//!              │                             ▼
//!              │                    ┌──────────────────┐
//!              └────────────────────│    Off (0%)      │
//!                                   │    off           │
//!                                   └──────────────────┘
//! ```
//!
//! The driving policy for a set-power request only picks how many steps to
//! take; it never sets a level directly.

use aerogarden_core::{Brightness, BrightnessLevel, DeviceState, LightStat};

/// One application of the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// State before the step.
    pub from: DeviceState,
    /// State after the step.
    pub to: DeviceState,
}

impl Step {
    /// The flag to send for this step, taken from the post-step `on`.
    #[must_use]
    pub const fn light_stat(&self) -> LightStat {
        LightStat::from_on(self.to.on)
    }
}

/// What the driving policy decided for a set-power request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPlan {
    /// No legal single step reaches the request; nothing is sent.
    NoOp,
    /// Step once.
    Single,
    /// Step once now and once more after the follow-up delay.
    Double,
}

/// Compute the state that follows `current`.
///
/// Only the brightness band matters; the current `on` flag is ignored.
#[must_use]
pub const fn next_state(current: DeviceState) -> DeviceState {
    match current.brightness.level() {
        BrightnessLevel::Full => DeviceState::new(true, Brightness::HALF),
        BrightnessLevel::Partial => DeviceState::new(false, Brightness::OFF),
        BrightnessLevel::Off => DeviceState::new(true, Brightness::FULL),
    }
}

/// Apply one step to `current`.
#[must_use]
pub const fn step(current: DeviceState) -> Step {
    Step {
        from: current,
        to: next_state(current),
    }
}

/// Decide how to drive the light for a set-power request.
///
/// Turning off from full needs two steps because one step only reaches the
/// intermediate level. Requests outside the four handled combinations are
/// no-ops, including `target = true` at a partial level.
#[must_use]
pub const fn plan(target: bool, brightness: Brightness) -> StepPlan {
    match (target, brightness.level()) {
        (false, BrightnessLevel::Full) => StepPlan::Double,
        (false, BrightnessLevel::Partial) | (true, BrightnessLevel::Off) => StepPlan::Single,
        _ => StepPlan::NoOp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brightness(percent: u8) -> Brightness {
        Brightness::new(percent).unwrap()
    }

    #[test]
    fn full_steps_to_half() {
        let next = next_state(DeviceState::new(false, Brightness::FULL));
        assert_eq!(next, DeviceState::new(true, Brightness::HALF));
    }

    #[test]
    fn partial_steps_to_off() {
        for percent in [1, 50, 65, 99] {
            let next = next_state(DeviceState::new(true, brightness(percent)));
            assert_eq!(next, DeviceState::new(false, Brightness::OFF));
        }
    }

    #[test]
    fn off_steps_to_full() {
        let next = next_state(DeviceState::new(true, Brightness::OFF));
        assert_eq!(next, DeviceState::new(true, Brightness::FULL));
    }

    #[test]
    fn three_steps_cycle_back() {
        let start = DeviceState::new(true, Brightness::FULL);
        let end = next_state(next_state(next_state(start)));
        assert_eq!(end, start);
    }

    #[test]
    fn light_stat_follows_post_step_power() {
        let s = step(DeviceState::new(false, Brightness::FULL));
        assert_eq!(s.light_stat(), LightStat::On);

        let s = step(DeviceState::new(true, Brightness::HALF));
        assert_eq!(s.light_stat(), LightStat::Off);
    }

    #[test]
    fn policy_table() {
        let cases = [
            (100, false, StepPlan::Double),
            (65, false, StepPlan::Single),
            (50, false, StepPlan::Single),
            (0, false, StepPlan::NoOp),
            (100, true, StepPlan::NoOp),
            (65, true, StepPlan::NoOp),
            (50, true, StepPlan::NoOp),
            (0, true, StepPlan::Single),
        ];

        for (percent, target, expected) in cases {
            assert_eq!(
                plan(target, brightness(percent)),
                expected,
                "brightness={percent} target={target}"
            );
        }
    }

    #[test]
    fn double_plan_from_full_reaches_off() {
        let start = DeviceState::new(true, Brightness::FULL);
        assert_eq!(plan(false, start.brightness), StepPlan::Double);

        let first = step(start);
        assert_eq!(first.to, DeviceState::new(true, Brightness::HALF));
        let second = step(first.to);
        assert_eq!(second.to, DeviceState::new(false, Brightness::OFF));
    }
}
