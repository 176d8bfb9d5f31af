//! Timed event scheduler - elapsed-time gates for transient dialogs
//!
//! Each dialog and the direction indicator keep an independent
//! start/duration pair. Nothing here sleeps; `update` is called once per
//! frame with the current timestamp and reports what elapsed this tick.

use std::time::{SystemTime, UNIX_EPOCH};

use core::constants::{
    CHUTE_DURATION, DIRECTION_INDICATOR_DURATION, ELEVATOR_WAIT_DURATION, OUCH_DURATION,
    PIT_DURATION,
};
use log::warn;

/// Get current time in microseconds.
pub fn timel() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or(0)
}

/// The transient overlays this engine schedules. The first four are
/// mutually exclusive dialogs; the indicator runs independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    /// Blocked-movement feedback.
    Ouch,
    Pit,
    Chute,
    ElevatorWait,
    DirectionIndicator,
}

impl TimedEvent {
    fn duration(self) -> i64 {
        match self {
            TimedEvent::Ouch => OUCH_DURATION,
            TimedEvent::Pit => PIT_DURATION,
            TimedEvent::Chute => CHUTE_DURATION,
            TimedEvent::ElevatorWait => ELEVATOR_WAIT_DURATION,
            TimedEvent::DirectionIndicator => DIRECTION_INDICATOR_DURATION,
        }
    }

    fn is_dialog(self) -> bool {
        !matches!(self, TimedEvent::DirectionIndicator)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Gate {
    start: Option<i64>,
}

impl Gate {
    fn arm(&mut self, now: i64) {
        self.start = Some(now);
    }

    fn clear(&mut self) {
        self.start = None;
    }

    /// True exactly on the tick the gate runs out; clears the start so the
    /// gate is ready for reuse.
    fn expire(&mut self, now: i64, duration: i64) -> bool {
        match self.start {
            Some(start) if now - start >= duration => {
                self.start = None;
                true
            }
            _ => false,
        }
    }
}

/// Owns the five gates. At most one dialog gate is armed at a time;
/// arming a second while one is visible is rejected by precondition.
#[derive(Debug, Default)]
pub struct EventScheduler {
    ouch: Gate,
    pit: Gate,
    chute: Gate,
    elevator_wait: Gate,
    indicator: Gate,
}

impl EventScheduler {
    pub fn new() -> Self {
        EventScheduler::default()
    }

    fn gate(&mut self, event: TimedEvent) -> &mut Gate {
        match event {
            TimedEvent::Ouch => &mut self.ouch,
            TimedEvent::Pit => &mut self.pit,
            TimedEvent::Chute => &mut self.chute,
            TimedEvent::ElevatorWait => &mut self.elevator_wait,
            TimedEvent::DirectionIndicator => &mut self.indicator,
        }
    }

    /// Arms a gate. Returns false (and leaves the first dialog running)
    /// when a dialog is requested while another dialog is still visible.
    pub fn arm(&mut self, event: TimedEvent, now: i64) -> bool {
        if event.is_dialog() {
            if let Some(showing) = self.visible_dialog() {
                warn!("rejected {:?} dialog while {:?} is showing", event, showing);
                return false;
            }
        }
        self.gate(event).arm(now);
        true
    }

    /// Dismisses a gate without reporting it as elapsed.
    pub fn dismiss(&mut self, event: TimedEvent) {
        self.gate(event).clear();
    }

    /// The dialog currently on screen, if any.
    pub fn visible_dialog(&self) -> Option<TimedEvent> {
        if self.ouch.start.is_some() {
            Some(TimedEvent::Ouch)
        } else if self.pit.start.is_some() {
            Some(TimedEvent::Pit)
        } else if self.chute.start.is_some() {
            Some(TimedEvent::Chute)
        } else if self.elevator_wait.start.is_some() {
            Some(TimedEvent::ElevatorWait)
        } else {
            None
        }
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator.start.is_some()
    }

    /// Advances all gates; returns the events whose duration ran out on
    /// this tick, ready for their terminal effect.
    pub fn update(&mut self, now: i64) -> Vec<TimedEvent> {
        let mut elapsed = Vec::new();
        for event in [
            TimedEvent::Ouch,
            TimedEvent::Pit,
            TimedEvent::Chute,
            TimedEvent::ElevatorWait,
            TimedEvent::DirectionIndicator,
        ] {
            let duration = event.duration();
            if self.gate(event).expire(now, duration) {
                elapsed.push(event);
            }
        }
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_expires_once() {
        let mut sched = EventScheduler::new();
        assert!(sched.arm(TimedEvent::Ouch, 1_000));
        assert_eq!(sched.visible_dialog(), Some(TimedEvent::Ouch));

        assert!(sched.update(1_000 + OUCH_DURATION - 1).is_empty());
        assert_eq!(
            sched.update(1_000 + OUCH_DURATION),
            vec![TimedEvent::Ouch]
        );
        // Cleared for reuse; a second update reports nothing.
        assert!(sched.update(1_000 + OUCH_DURATION * 2).is_empty());
        assert_eq!(sched.visible_dialog(), None);
    }

    #[test]
    fn test_second_dialog_rejected_while_first_visible() {
        let mut sched = EventScheduler::new();
        assert!(sched.arm(TimedEvent::Pit, 0));
        // Precondition: only one dialog at a time.
        assert!(!sched.arm(TimedEvent::Chute, 10));
        assert_eq!(sched.visible_dialog(), Some(TimedEvent::Pit));
    }

    #[test]
    fn test_indicator_runs_independently_of_dialogs() {
        let mut sched = EventScheduler::new();
        assert!(sched.arm(TimedEvent::Chute, 0));
        assert!(sched.arm(TimedEvent::DirectionIndicator, 0));
        assert!(sched.indicator_visible());

        let elapsed = sched.update(DIRECTION_INDICATOR_DURATION);
        assert!(elapsed.contains(&TimedEvent::Chute) || elapsed.contains(&TimedEvent::DirectionIndicator));
        assert!(!sched.indicator_visible());
    }

    #[test]
    fn test_dismiss_clears_without_reporting() {
        let mut sched = EventScheduler::new();
        sched.arm(TimedEvent::ElevatorWait, 0);
        sched.dismiss(TimedEvent::ElevatorWait);
        assert_eq!(sched.visible_dialog(), None);
        assert!(sched.update(ELEVATOR_WAIT_DURATION * 2).is_empty());
    }
}
