//! Automatable parameter timeline
//!
//! Holds the absolute-time events scheduled on one node parameter (gain,
//! frequency or cutoff) and answers "what is the value at time `t`" the
//! way a Web Audio `AudioParam` does: a ramp runs from the previous event's
//! time and value to its own end time and target.

use crate::audio::backend::Automation;

#[derive(Debug, Clone)]
pub struct ParamTimeline {
    /// Value before the first event (or with no events)
    base: f32,
    /// Sorted by event time; equal times keep insertion order
    events: Vec<Automation>,
}

impl ParamTimeline {
    pub fn new(value: f32) -> Self {
        Self {
            base: value,
            events: Vec::new(),
        }
    }

    /// Immediate assignment: drops every scheduled event
    pub fn set(&mut self, value: f32) {
        self.base = value;
        self.events.clear();
    }

    /// Schedule an event. `now` anchors a ramp that has no earlier event.
    pub fn insert(&mut self, automation: Automation, now: f64) {
        let is_ramp = !matches!(automation, Automation::SetValue { .. });
        if is_ramp && !self.events.iter().any(|e| e.time() <= automation.time()) {
            let anchor = Automation::SetValue {
                value: self.value_at(now),
                at: now.min(automation.time()),
            };
            self.push_sorted(anchor);
        }
        self.push_sorted(automation);
    }

    fn push_sorted(&mut self, automation: Automation) {
        let time = automation.time();
        let index = self.events.partition_point(|e| e.time() <= time);
        self.events.insert(index, automation);
    }

    /// Remove every event at or after `from`, holding the value the
    /// timeline had reached at `from`.
    pub fn cancel_and_hold(&mut self, from: f64) {
        let held = self.value_at(from);
        let split = self.events.partition_point(|e| e.time() < from);
        let interrupted = self.events.get(split).copied();
        self.events.truncate(split);

        let hold = match interrupted {
            Some(Automation::LinearRamp { end, .. }) if end > from && split > 0 => {
                Automation::LinearRamp {
                    value: held,
                    end: from,
                }
            }
            Some(Automation::ExponentialRamp { end, .. }) if end > from && split > 0 => {
                Automation::ExponentialRamp {
                    value: held,
                    end: from,
                }
            }
            _ => Automation::SetValue {
                value: held,
                at: from,
            },
        };
        self.events.push(hold);
    }

    pub fn value_at(&self, t: f64) -> f32 {
        let mut value = self.base;
        let mut previous: Option<(f64, f32)> = None;

        for event in &self.events {
            if event.time() <= t {
                value = event.value();
                previous = Some((event.time(), value));
                continue;
            }
            // First event still in the future
            return match (*event, previous) {
                (Automation::LinearRamp { value: v1, end }, Some((t0, v0))) => {
                    let span = end - t0;
                    if span <= 0.0 {
                        v1
                    } else {
                        let progress = ((t - t0) / span) as f32;
                        v0 + (v1 - v0) * progress
                    }
                }
                (Automation::ExponentialRamp { value: v1, end }, Some((t0, v0))) => {
                    let span = end - t0;
                    if span <= 0.0 {
                        v1
                    } else if v0 == 0.0 || v1 == 0.0 || (v0 < 0.0) != (v1 < 0.0) {
                        // No exponential path between these values
                        v0
                    } else {
                        let progress = (t - t0) / span;
                        v0 * (v1 / v0).powf(progress as f32)
                    }
                }
                _ => value,
            };
        }
        value
    }

    /// Forget events that can no longer influence values at or after `t`
    pub fn prune_before(&mut self, t: f64) {
        let settled = self.events.partition_point(|e| e.time() <= t);
        if settled > 1 {
            let last = self.events[settled - 1];
            self.base = last.value();
            self.events.drain(..settled - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_constant_without_events() {
        let param = ParamTimeline::new(0.7);
        assert_eq!(param.value_at(0.0), 0.7);
        assert_eq!(param.value_at(100.0), 0.7);
    }

    #[test]
    fn test_linear_ramp_from_set_value() {
        let mut param = ParamTimeline::new(1.0);
        param.insert(Automation::SetValue { value: 0.0, at: 1.0 }, 0.0);
        param.insert(Automation::LinearRamp { value: 1.0, end: 2.0 }, 0.0);
        assert_eq!(param.value_at(0.5), 1.0);
        assert_eq!(param.value_at(1.0), 0.0);
        assert!(close(param.value_at(1.5), 0.5));
        assert_eq!(param.value_at(3.0), 1.0);
    }

    #[test]
    fn test_exponential_ramp() {
        let mut param = ParamTimeline::new(0.0);
        param.insert(Automation::SetValue { value: 1.0, at: 0.0 }, 0.0);
        param.insert(Automation::ExponentialRamp { value: 0.01, end: 2.0 }, 0.0);
        assert!(close(param.value_at(1.0), 0.1));
        assert!(close(param.value_at(2.0), 0.01));
    }

    #[test]
    fn test_exponential_from_zero_holds() {
        let mut param = ParamTimeline::new(0.0);
        param.insert(Automation::SetValue { value: 0.0, at: 0.0 }, 0.0);
        param.insert(Automation::ExponentialRamp { value: 1.0, end: 1.0 }, 0.0);
        assert_eq!(param.value_at(0.5), 0.0);
    }

    #[test]
    fn test_ramp_without_prior_event_starts_now() {
        let mut param = ParamTimeline::new(0.2);
        param.insert(Automation::LinearRamp { value: 0.4, end: 3.0 }, 1.0);
        assert_eq!(param.value_at(0.5), 0.2);
        assert!(close(param.value_at(2.0), 0.3));
    }

    #[test]
    fn test_cancel_and_hold_mid_ramp() {
        let mut param = ParamTimeline::new(0.0);
        param.insert(Automation::SetValue { value: 0.0, at: 0.0 }, 0.0);
        param.insert(Automation::LinearRamp { value: 1.0, end: 1.0 }, 0.0);
        param.cancel_and_hold(0.5);
        assert!(close(param.value_at(0.25), 0.25));
        assert!(close(param.value_at(0.5), 0.5));
        assert!(close(param.value_at(10.0), 0.5));

        // A new ramp from the held value
        param.insert(Automation::LinearRamp { value: 0.0, end: 0.6 }, 0.5);
        assert!(close(param.value_at(0.55), 0.25));
        assert_eq!(param.value_at(0.7), 0.0);
    }

    #[test]
    fn test_set_clears_events() {
        let mut param = ParamTimeline::new(0.0);
        param.insert(Automation::LinearRamp { value: 1.0, end: 1.0 }, 0.0);
        param.set(0.3);
        assert!(param.events.is_empty());
        assert_eq!(param.value_at(0.5), 0.3);
    }

    #[test]
    fn test_prune_keeps_anchor() {
        let mut param = ParamTimeline::new(0.0);
        param.insert(Automation::SetValue { value: 0.0, at: 0.0 }, 0.0);
        param.insert(Automation::LinearRamp { value: 1.0, end: 1.0 }, 0.0);
        param.insert(Automation::LinearRamp { value: 0.0, end: 2.0 }, 0.0);
        param.prune_before(1.2);
        assert_eq!(param.events.len(), 2);
        assert!(close(param.value_at(1.5), 0.5));
    }
}
