//! Delayable events and sync barriers.

use alloc::vec::Vec;
use core::fmt;

use crate::motion::Rotation;

/// Number of rotation axes the planner tracks.
pub const MAX_ROTATION_AXES: usize = 4;

/// Number of PWM channels per output event.
pub const PWM_CHANNELS: usize = 4;

/// Identifier handed out for every delayable event, in append order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventId(pub u32);

impl EventId {
    /// The identifier following this one.
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side effect carried by a delayable event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventAction {
    /// Change the masked digital output bits.
    DigitalOutput {
        /// New bit values.
        bits: u32,
        /// Bits this event changes.
        changed: u32,
    },
    /// Set all PWM channels.
    PwmOutput([f32; PWM_CHANNELS]),
    /// Start a rotation.
    Rotate(Rotation),
}

/// Side effect scheduled relative to the start of a move.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayableEvent {
    /// Identifier used by sync barriers.
    pub id: EventId,
    /// Index of the move this event precedes (may equal the move count).
    pub move_index: usize,
    /// Offset from the move's start.
    pub delay: f64,
    /// Resolved trigger time (move start plus delay).
    pub trigger_time: f64,
    /// What happens when the event fires.
    pub action: EventAction,
}

impl DelayableEvent {
    /// Create an unresolved event.
    pub fn new(id: EventId, move_index: usize, delay: f64, action: EventAction) -> Self {
        Self {
            id,
            move_index,
            delay,
            trigger_time: 0.0,
            action,
        }
    }

    /// Time at which the event's effect is complete.
    ///
    /// Output changes complete when they fire; rotations complete once
    /// their own phases have run.
    pub fn completion_time(&self) -> f64 {
        match &self.action {
            EventAction::Rotate(rotation) => self.trigger_time + rotation.duration,
            _ => self.trigger_time,
        }
    }

    /// Embedded rotation, if this is a rotation event.
    pub fn rotation(&self) -> Option<&Rotation> {
        match &self.action {
            EventAction::Rotate(rotation) => Some(rotation),
            _ => None,
        }
    }

    pub(crate) fn rotation_mut(&mut self) -> Option<&mut Rotation> {
        match &mut self.action {
            EventAction::Rotate(rotation) => Some(rotation),
            _ => None,
        }
    }
}

/// Events a sync move waits on.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncBarrier {
    /// Index of the sync move.
    pub move_index: usize,
    /// Awaited event identifiers.
    pub awaits: Vec<EventId>,
    /// First identifier handed out after the sync was appended.
    pub watermark: EventId,
}

impl SyncBarrier {
    /// Whether `id` is one this barrier waits on.
    pub fn awaits(&self, id: EventId) -> bool {
        id < self.watermark && self.awaits.contains(&id)
    }
}
