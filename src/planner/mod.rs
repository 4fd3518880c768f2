//! Trajectory planner: program building, finalization and traversal.
//!
//! A [`Planner`] is built once per program. Moves, rotations and output
//! events are appended, [`Planner::calculate_moves`] generates and schedules
//! everything in one pass, and [`Planner::advance`] then plays the result
//! back tick by tick. A new program is a new planner.

mod builder;
mod dump;
mod events;
mod playback;
mod schedule;

use alloc::vec::Vec;

use tracing::{debug, error, warn};

use crate::config::{
    validate_limits, CornerBlendMethod, MachineLimits, PositionBounds, RotationLimits,
};
use crate::error::{PlanError, Result};
use crate::motion::{blend_corners, BlendType, Move, PlaybackState, Rotation, Segment, Vec3};

pub use builder::MoveBuilder;
pub use dump::PlanDump;
pub use events::{
    DelayableEvent, EventAction, EventId, SyncBarrier, MAX_ROTATION_AXES, PWM_CHANNELS,
};
pub use playback::{
    CollatedPlayback, MotionSample, OverlappingPlayback, Playback, PlaybackStrategy,
};
pub use schedule::{collate, schedule};

/// Maximum number of rotations running at the same time.
pub const MAX_ROTATIONS_IN_PROGRESS: usize = 16;

/// Output of one traversal step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Whether any motion or event is still pending.
    pub running: bool,
    /// Tool position.
    pub position: Vec3,
    /// Tool velocity.
    pub velocity: Vec3,
    /// Angle of every rotation axis.
    pub rotations: [f64; MAX_ROTATION_AXES],
    /// Digital output bits set by events fired during this step.
    pub digital_bits: u32,
    /// Digital output bits changed during this step.
    pub digital_changed: u32,
    /// PWM values, if a PWM event fired during this step.
    pub pwm: Option<[f32; PWM_CHANNELS]>,
}

/// Jerk-limited trajectory planner for one program.
#[derive(Debug, Clone)]
pub struct Planner {
    limits: MachineLimits,
    start_position: Vec3,
    initial_rotations: [f64; MAX_ROTATION_AXES],
    rotation_targets: [f64; MAX_ROTATION_AXES],

    moves: Vec<Move>,
    events: Vec<DelayableEvent>,
    syncs: Vec<SyncBarrier>,
    next_event_id: EventId,

    playback: Option<PlaybackStrategy>,
    traverse_time: f64,

    elapsed: f64,
    next_event: usize,
    in_progress: heapless::Vec<usize, MAX_ROTATIONS_IN_PROGRESS>,
    angles: [f64; MAX_ROTATION_AXES],
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    /// Create an empty planner with unset (zero) limits.
    pub fn new() -> Self {
        Self::with_limits(MachineLimits::default())
    }

    /// Create an empty planner with the given limits.
    pub fn with_limits(limits: MachineLimits) -> Self {
        Self {
            limits,
            start_position: Vec3::ZERO,
            initial_rotations: [0.0; MAX_ROTATION_AXES],
            rotation_targets: [0.0; MAX_ROTATION_AXES],
            moves: Vec::new(),
            events: Vec::new(),
            syncs: Vec::new(),
            next_event_id: EventId::default(),
            playback: None,
            traverse_time: 0.0,
            elapsed: 0.0,
            next_event: 0,
            in_progress: heapless::Vec::new(),
            angles: [0.0; MAX_ROTATION_AXES],
        }
    }

    /// Build a finalized single-move plan that stops from `velocity` at `position`.
    ///
    /// The stop decelerates along the direction of travel as hard as the
    /// machine limits allow.
    ///
    /// # Errors
    ///
    /// Returns an error if the limits are invalid or there is nothing to stop.
    pub fn emergency_stop(limits: MachineLimits, position: Vec3, velocity: Vec3) -> Result<Self> {
        let mut planner = Self::with_limits(limits);
        planner.start_position = position;

        let mv = Move::emergency_stop(position, velocity, f64::INFINITY, f64::INFINITY);
        mv.validate()?;
        planner.moves.push(mv);
        planner.calculate_moves()?;

        Ok(planner)
    }

    // ----- limits ---------------------------------------------------------

    /// Current machine limits.
    #[inline]
    pub fn limits(&self) -> &MachineLimits {
        &self.limits
    }

    /// Replace all machine limits.
    pub fn set_limits(&mut self, limits: MachineLimits) {
        self.limits = limits;
    }

    /// Set or clear the position bounds.
    pub fn set_position_limits(&mut self, bounds: Option<PositionBounds>) {
        self.limits.position = bounds;
    }

    /// Set the per-axis velocity limits.
    pub fn set_velocity_limits(&mut self, velocity: Vec3) {
        self.limits.velocity = velocity;
    }

    /// Set the per-axis acceleration limits.
    pub fn set_acceleration_limits(&mut self, acceleration: Vec3) {
        self.limits.acceleration = acceleration;
    }

    /// Set the per-axis jerk limits.
    pub fn set_jerk_limits(&mut self, jerk: Vec3) {
        self.limits.jerk = jerk;
    }

    /// Set the rotation limits.
    pub fn set_rotation_limits(&mut self, rotation: RotationLimits) {
        self.limits.rotation = rotation;
    }

    /// Set the corner blend method.
    pub fn set_corner_blend_method(&mut self, method: CornerBlendMethod) {
        self.limits.corner_blend = method;
    }

    /// Set the maximum overlap fraction, clamped into `[0.01, 1.0]`.
    pub fn set_max_overlap_fraction(&mut self, fraction: f64) {
        self.limits.set_max_overlap_fraction(fraction);
    }

    /// Set the position the first move starts from.
    ///
    /// Ignored once a move has been appended.
    pub fn set_start_position(&mut self, position: Vec3) {
        if !self.moves.is_empty() {
            warn!("start position ignored: moves already queued");
            return;
        }
        self.start_position = position;
    }

    /// Set the angle the first rotation on `axis` starts from.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is out of range.
    pub fn set_initial_rotation(&mut self, axis: usize, angle: f64) -> Result<()> {
        if axis >= MAX_ROTATION_AXES {
            warn!("initial rotation rejected: {}", PlanError::InvalidAxis(axis));
            return Err(PlanError::InvalidAxis(axis).into());
        }
        let queued = self
            .events
            .iter()
            .filter_map(DelayableEvent::rotation)
            .any(|r| r.axis == axis);
        if !queued {
            self.rotation_targets[axis] = angle;
        }
        self.initial_rotations[axis] = angle;
        self.angles[axis] = angle;
        Ok(())
    }

    // ----- program building -----------------------------------------------

    fn ensure_open(&self) -> Result<()> {
        if self.playback.is_some() {
            warn!("entry rejected: {}", PlanError::AlreadyCalculated);
            return Err(PlanError::AlreadyCalculated.into());
        }
        Ok(())
    }

    fn tail_position(&self) -> Vec3 {
        self.moves.last().map_or(self.start_position, |mv| mv.dst)
    }

    /// Append a linear move from the previous destination to `dst`.
    ///
    /// # Errors
    ///
    /// The move is dropped with a warning if any limit is non-positive, the
    /// move has zero length or `dst` lies outside the position bounds.
    pub fn add_move(
        &mut self,
        dst: Vec3,
        vel: f64,
        acc: f64,
        jerk: f64,
        blend: BlendType,
        clearance: f64,
    ) -> Result<()> {
        self.ensure_open()?;

        let mv = Move::linear(self.tail_position(), dst, vel, acc, jerk).with_blend(blend, clearance);
        if let Err(e) = mv.validate() {
            warn!("move to {} rejected: {}", dst, e);
            return Err(e.into());
        }
        if !self.limits.allows(dst) {
            warn!("move to {} rejected: {}", dst, PlanError::OutOfBounds);
            return Err(PlanError::OutOfBounds.into());
        }

        self.moves.push(mv);
        Ok(())
    }

    /// Append a move described by a [`MoveBuilder`].
    ///
    /// # Errors
    ///
    /// See [`add_move`](Self::add_move).
    pub fn add(&mut self, builder: MoveBuilder) -> Result<()> {
        let (dst, vel, acc, jerk, blend, clearance) = builder.into_parts();
        self.add_move(dst, vel, acc, jerk, blend, clearance)
    }

    /// Append a dwell of `duration` seconds.
    ///
    /// # Errors
    ///
    /// The wait is dropped with a warning if the duration is negative or not finite.
    pub fn add_wait(&mut self, duration: f64) -> Result<()> {
        self.ensure_open()?;

        let mv = Move::wait(self.tail_position(), duration);
        if let Err(e) = mv.validate() {
            warn!("wait of {}s rejected: {}", duration, e);
            return Err(e.into());
        }

        self.moves.push(mv);
        Ok(())
    }

    /// Append a barrier that holds the timeline until `awaits` have completed.
    ///
    /// Identifiers that were never handed out are ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan is already finalized.
    pub fn add_sync(&mut self, awaits: &[EventId]) -> Result<()> {
        self.ensure_open()?;

        let watermark = self.next_event_id;
        let mut known = Vec::with_capacity(awaits.len());
        for &id in awaits {
            if id < watermark {
                known.push(id);
            } else {
                warn!("sync ignores {}", PlanError::UnknownEvent(id.0));
            }
        }

        self.moves.push(Move::sync(self.tail_position()));
        self.syncs.push(SyncBarrier {
            move_index: self.moves.len() - 1,
            awaits: known,
            watermark,
        });
        Ok(())
    }

    /// Rotate `axis` to `dst`, starting `delay` after the next move starts.
    ///
    /// # Errors
    ///
    /// The rotation is dropped with a warning if the axis is out of range,
    /// any limit is non-positive, the angle does not change or the delay is
    /// not finite.
    pub fn add_rotate(
        &mut self,
        axis: usize,
        dst: f64,
        vel: f64,
        acc: f64,
        jerk: f64,
        delay: f64,
    ) -> Result<EventId> {
        self.ensure_open()?;

        if axis >= MAX_ROTATION_AXES {
            warn!("rotation rejected: {}", PlanError::InvalidAxis(axis));
            return Err(PlanError::InvalidAxis(axis).into());
        }
        let rotation = Rotation::new(axis, self.rotation_targets[axis], dst, vel, acc, jerk);
        if let Err(e) = rotation.validate() {
            warn!("rotation of axis {} to {} rejected: {}", axis, dst, e);
            return Err(e.into());
        }

        let id = self.push_event(delay, EventAction::Rotate(rotation))?;
        self.rotation_targets[axis] = dst;
        Ok(id)
    }

    /// Change the digital outputs selected by `changed` to `bits`.
    ///
    /// # Errors
    ///
    /// The event is dropped with a warning if the delay is not finite.
    pub fn add_digital_output(&mut self, bits: u32, changed: u32, delay: f64) -> Result<EventId> {
        self.ensure_open()?;
        self.push_event(delay, EventAction::DigitalOutput { bits, changed })
    }

    /// Set all PWM channels.
    ///
    /// # Errors
    ///
    /// The event is dropped with a warning if the delay is not finite.
    pub fn add_pwm_output(&mut self, values: [f32; PWM_CHANNELS], delay: f64) -> Result<EventId> {
        self.ensure_open()?;
        self.push_event(delay, EventAction::PwmOutput(values))
    }

    fn push_event(&mut self, delay: f64, action: EventAction) -> Result<EventId> {
        if !delay.is_finite() {
            warn!("event rejected: {}", PlanError::InvalidDelay);
            return Err(PlanError::InvalidDelay.into());
        }

        let id = self.next_event_id;
        self.next_event_id = id.next();
        self.events
            .push(DelayableEvent::new(id, self.moves.len(), delay, action));
        Ok(id)
    }

    // ----- finalization ---------------------------------------------------

    /// Generate, blend and schedule every move and event.
    ///
    /// Calling this again on a finalized plan does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the machine limits are invalid or a queued move
    /// has invalid parameters. The plan must not be traversed then.
    pub fn calculate_moves(&mut self) -> Result<()> {
        if self.playback.is_some() {
            return Ok(());
        }

        if let Err(e) = validate_limits(&self.limits) {
            error!("plan rejected: {}", e);
            return Err(e);
        }
        for (index, mv) in self.moves.iter().enumerate() {
            if let Err(e) = mv.validate() {
                error!("plan rejected: move {} invalid: {}", index, e);
                return Err(PlanError::InvalidMoveParameters { index }.into());
            }
        }

        for mv in self.moves.iter_mut() {
            mv.generate(&self.limits);
        }
        for rotation in self.events.iter_mut().filter_map(DelayableEvent::rotation_mut) {
            rotation.generate(&self.limits.rotation);
        }

        let method = self.limits.corner_blend;
        if method == CornerBlendMethod::DiscreteSegments {
            let applied = blend_corners(&mut self.moves, &self.limits);
            debug!("{} corner blends applied", applied);
        }

        let overlapping = method == CornerBlendMethod::InterpolatedMoves;
        self.traverse_time = schedule(
            &mut self.moves,
            &mut self.events,
            &self.syncs,
            overlapping,
            self.limits.max_overlap_fraction(),
        );
        // Trigger times already include each event's delay
        self.events
            .sort_by(|a, b| a.trigger_time.total_cmp(&b.trigger_time));

        self.playback = Some(if overlapping {
            PlaybackStrategy::Overlapping(OverlappingPlayback::new(self.start_position))
        } else {
            PlaybackStrategy::Collated(CollatedPlayback::new(
                collate(&self.moves),
                self.start_position,
            ))
        });
        self.reset_traverse();

        debug!(
            "plan finalized: {} moves, {} events, {}s",
            self.moves.len(),
            self.events.len(),
            self.traverse_time
        );
        Ok(())
    }

    // ----- traversal ------------------------------------------------------

    /// Advance playback by `dt * speed_scale` seconds.
    ///
    /// Events whose trigger time has been reached fire in trigger order.
    /// Digital output bits and change masks fired within one step are OR-ed
    /// together; the last PWM event wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan has not been finalized.
    pub fn advance(&mut self, dt: f64, speed_scale: f64) -> Result<Tick> {
        let Some(playback) = self.playback.as_mut() else {
            return Err(PlanError::NotCalculated.into());
        };

        let dt = (dt * speed_scale).max(0.0);
        self.elapsed += dt;
        let now = self.elapsed;

        let mut digital_bits = 0;
        let mut digital_changed = 0;
        let mut pwm = None;

        while let Some(event) = self.events.get(self.next_event) {
            if event.trigger_time > now {
                break;
            }
            match &event.action {
                EventAction::DigitalOutput { bits, changed } => {
                    digital_bits |= bits;
                    digital_changed |= changed;
                }
                EventAction::PwmOutput(values) => pwm = Some(*values),
                EventAction::Rotate(_) => {
                    if self.in_progress.push(self.next_event).is_err() {
                        warn!("rotation {} dropped: too many in progress", event.id);
                    }
                }
            }
            self.next_event += 1;
        }

        let events = &mut self.events;
        let angles = &mut self.angles;
        self.in_progress.retain_mut(|index| {
            let Some(event) = events.get_mut(*index) else {
                return false;
            };
            let trigger = event.trigger_time;
            let Some(rotation) = event.rotation_mut() else {
                return false;
            };
            let step = match rotation.cursor.state() {
                PlaybackState::Pending => (now - trigger).max(0.0),
                _ => dt,
            };
            let sample = rotation.advance(step);
            if let Some(angle) = angles.get_mut(rotation.axis) {
                *angle = sample.state.pos;
            }
            !sample.done
        });

        let motion = playback.advance(&mut self.moves, now, dt);
        let running =
            !motion.done || self.next_event < self.events.len() || !self.in_progress.is_empty();

        Ok(Tick {
            running,
            position: motion.position,
            velocity: motion.velocity,
            rotations: self.angles,
            digital_bits,
            digital_changed,
            pwm,
        })
    }

    /// Rewind playback to the start of the program.
    pub fn reset_traverse(&mut self) {
        self.elapsed = 0.0;
        self.next_event = 0;
        self.in_progress.clear();
        self.angles = self.initial_rotations;

        for mv in self.moves.iter_mut() {
            mv.cursor.reset();
        }
        for rotation in self.events.iter_mut().filter_map(DelayableEvent::rotation_mut) {
            rotation.cursor.reset();
        }
        if let Some(playback) = self.playback.as_mut() {
            playback.reset();
        }
    }

    /// Remove the program, keeping the limits and start position.
    pub fn clear(&mut self) {
        let mut fresh = Self::with_limits(self.limits.clone());
        fresh.start_position = self.start_position;
        fresh.initial_rotations = self.initial_rotations;
        fresh.rotation_targets = self.initial_rotations;
        fresh.angles = self.initial_rotations;
        *self = fresh;
    }

    // ----- accessors ------------------------------------------------------

    /// Queued moves.
    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Queued events (in trigger order once finalized).
    #[inline]
    pub fn events(&self) -> &[DelayableEvent] {
        &self.events
    }

    /// Flat phase list, when the plan plays back collated.
    pub fn collated_segments(&self) -> Option<&[Segment]> {
        self.playback.as_ref().and_then(PlaybackStrategy::collated_segments)
    }

    /// Destination of the last move.
    pub fn final_position(&self) -> Vec3 {
        self.tail_position()
    }

    /// Total playback time of the finalized plan.
    #[inline]
    pub fn traverse_time(&self) -> f64 {
        self.traverse_time
    }

    /// Angle of every rotation axis after the last queued rotation.
    #[inline]
    pub fn final_rotations(&self) -> [f64; MAX_ROTATION_AXES] {
        self.rotation_targets
    }

    /// Whether the plan has been finalized.
    #[inline]
    pub fn is_calculated(&self) -> bool {
        self.playback.is_some()
    }

    /// Playback time consumed so far.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Human-readable listing of the plan.
    pub fn dump(&self) -> PlanDump<'_> {
        PlanDump::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::motion::MoveType;

    fn limits() -> MachineLimits {
        MachineLimits::new(Vec3::splat(1000.0), Vec3::splat(10000.0), Vec3::splat(100000.0))
            .with_rotation(RotationLimits::new(1000.0, 10000.0, 100000.0))
    }

    fn run(planner: &mut Planner, dt: f64) -> (f64, Tick) {
        let mut t = 0.0;
        loop {
            let tick = planner.advance(dt, 1.0).unwrap();
            t += dt;
            if !tick.running {
                return (t, tick);
            }
            assert!(t < 1000.0, "traversal does not terminate");
        }
    }

    #[test]
    fn test_moves_chain() {
        let mut planner = Planner::with_limits(limits());
        planner.set_start_position(Vec3::new(1.0, 1.0, 1.0));
        planner
            .add_move(Vec3::new(5.0, 1.0, 1.0), 10.0, 100.0, 1000.0, BlendType::None, 0.0)
            .unwrap();
        planner
            .add_move(Vec3::new(5.0, 5.0, 1.0), 10.0, 100.0, 1000.0, BlendType::None, 0.0)
            .unwrap();

        assert_eq!(planner.moves()[0].src, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(planner.moves()[1].src, Vec3::new(5.0, 1.0, 1.0));
        assert_eq!(planner.final_position(), Vec3::new(5.0, 5.0, 1.0));
    }

    #[test]
    fn test_rejected_entries_do_not_fail_plan() {
        let mut planner = Planner::with_limits(limits());
        let x = Vec3::new(10.0, 0.0, 0.0);

        assert!(planner.add_move(x, 10.0, 100.0, 0.0, BlendType::None, 0.0).is_err());
        assert!(planner.add_move(Vec3::ZERO, 10.0, 100.0, 1000.0, BlendType::None, 0.0).is_err());
        assert_eq!(
            planner.add_rotate(MAX_ROTATION_AXES, 90.0, 1.0, 1.0, 1.0, 0.0),
            Err(Error::Plan(PlanError::InvalidAxis(MAX_ROTATION_AXES)))
        );
        planner.add_move(x, 10.0, 100.0, 1000.0, BlendType::None, 0.0).unwrap();

        assert_eq!(planner.moves().len(), 1);
        assert!(planner.calculate_moves().is_ok());
    }

    #[test]
    fn test_invalid_limits_fail_plan() {
        let mut planner = Planner::new();
        planner
            .add_move(Vec3::new(10.0, 0.0, 0.0), 10.0, 100.0, 1000.0, BlendType::None, 0.0)
            .unwrap();

        assert!(matches!(planner.calculate_moves(), Err(Error::Config(_))));
        assert!(!planner.is_calculated());
        assert_eq!(planner.advance(0.01, 1.0), Err(Error::Plan(PlanError::NotCalculated)));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut planner = Planner::with_limits(
            limits().with_position(PositionBounds::new(Vec3::ZERO, Vec3::splat(100.0))),
        );
        let result = planner.add_move(Vec3::new(0.0, 0.0, 101.0), 1.0, 1.0, 1.0, BlendType::None, 0.0);
        assert_eq!(result, Err(Error::Plan(PlanError::OutOfBounds)));
    }

    #[test]
    fn test_append_after_finalize_rejected() {
        let mut planner = Planner::with_limits(limits());
        planner.calculate_moves().unwrap();
        assert_eq!(planner.add_wait(1.0), Err(Error::Plan(PlanError::AlreadyCalculated)));
    }

    #[test]
    fn test_digital_outputs_merge_within_tick() {
        let mut planner = Planner::with_limits(limits());
        planner.add_digital_output(0b0001, 0b0011, 0.0).unwrap();
        planner.add_digital_output(0b0100, 0b0100, 0.01).unwrap();
        planner.add_pwm_output([0.1, 0.2, 0.3, 0.4], 0.0).unwrap();
        planner.add_pwm_output([0.5; 4], 0.01).unwrap();
        planner
            .add_move(Vec3::new(10.0, 0.0, 0.0), 10.0, 100.0, 1000.0, BlendType::None, 0.0)
            .unwrap();
        planner.calculate_moves().unwrap();

        let tick = planner.advance(0.05, 1.0).unwrap();
        assert_eq!(tick.digital_bits, 0b0101);
        assert_eq!(tick.digital_changed, 0b0111);
        assert_eq!(tick.pwm, Some([0.5; 4]));

        let tick = planner.advance(0.05, 1.0).unwrap();
        assert_eq!(tick.digital_changed, 0);
        assert_eq!(tick.pwm, None);
    }

    #[test]
    fn test_conflicting_digital_outputs_accumulate() {
        let mut planner = Planner::with_limits(limits());
        planner.add_digital_output(0b1, 0b1, 0.0).unwrap();
        planner.add_digital_output(0b0, 0b1, 0.0).unwrap();
        planner.add_digital_output(0b10, 0b10, 0.005).unwrap();
        planner.calculate_moves().unwrap();

        let tick = planner.advance(0.01, 1.0).unwrap();
        assert_eq!(tick.digital_bits, 0b11);
        assert_eq!(tick.digital_changed, 0b11);
    }

    #[test]
    fn test_non_finite_targets_rejected() {
        let mut planner = Planner::with_limits(limits());
        let rejected = Err(Error::Plan(PlanError::NonFiniteTarget));

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let dst = Vec3::new(bad, 0.0, 0.0);
            assert_eq!(planner.add_move(dst, 10.0, 100.0, 1000.0, BlendType::None, 0.0), rejected);
            assert_eq!(planner.add_rotate(0, bad, 100.0, 1000.0, 10000.0, 0.0).map(|_| ()), rejected);
        }
        assert!(planner.moves().is_empty());
        assert!(planner.events().is_empty());

        planner
            .add_move(Vec3::new(10.0, 0.0, 0.0), 10.0, 100.0, 1000.0, BlendType::None, 0.0)
            .unwrap();
        planner.calculate_moves().unwrap();
        let (_, tick) = run(&mut planner, 0.01);
        assert!(tick.position.approx_eq(planner.final_position(), 1e-9));
    }

    #[test]
    fn test_rotation_runs_alongside_motion() {
        let mut planner = Planner::with_limits(limits());
        planner.set_initial_rotation(1, 10.0).unwrap();
        planner.add_rotate(1, 100.0, 100.0, 1000.0, 10000.0, 0.1).unwrap();
        planner
            .add_move(Vec3::new(10.0, 0.0, 0.0), 10.0, 100.0, 1000.0, BlendType::None, 0.0)
            .unwrap();
        planner.calculate_moves().unwrap();

        let tick = planner.advance(0.05, 1.0).unwrap();
        assert_eq!(tick.rotations[1], 10.0);

        let (_, tick) = run(&mut planner, 0.01);
        assert!((tick.rotations[1] - 100.0).abs() < 1e-9);
        assert_eq!(planner.final_rotations()[1], 100.0);
    }

    #[test]
    fn test_speed_scale() {
        let mut planner = Planner::with_limits(limits());
        planner
            .add_move(Vec3::new(10.0, 0.0, 0.0), 10.0, 100.0, 1000.0, BlendType::None, 0.0)
            .unwrap();
        planner.calculate_moves().unwrap();

        planner.advance(0.1, 0.5).unwrap();
        assert!((planner.elapsed() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_emergency_stop_plan() {
        let planner =
            Planner::emergency_stop(limits(), Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0)).unwrap();

        assert!(planner.is_calculated());
        assert_eq!(planner.moves().len(), 1);
        assert_eq!(planner.moves()[0].move_type, MoveType::EStop);
        assert!(planner.final_position().y > 0.0);

        let result = Planner::emergency_stop(limits(), Vec3::ZERO, Vec3::ZERO);
        assert_eq!(result.err(), Some(Error::Plan(PlanError::NothingToStop)));
    }

    #[test]
    fn test_reset_and_replay() {
        let mut planner = Planner::with_limits(limits());
        planner
            .add_move(Vec3::new(10.0, 0.0, 0.0), 10.0, 100.0, 1000.0, BlendType::None, 0.0)
            .unwrap();
        planner.calculate_moves().unwrap();

        let (first, end) = run(&mut planner, 0.01);
        planner.reset_traverse();
        assert_eq!(planner.elapsed(), 0.0);
        let (second, again) = run(&mut planner, 0.01);

        assert_eq!(first, second);
        assert_eq!(end.position, again.position);
    }

    #[test]
    fn test_clear_keeps_limits() {
        let mut planner = Planner::with_limits(limits());
        planner.add_wait(1.0).unwrap();
        planner.calculate_moves().unwrap();

        planner.clear();
        assert!(!planner.is_calculated());
        assert!(planner.moves().is_empty());
        assert_eq!(planner.limits(), &limits());
    }
}
