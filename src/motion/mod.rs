//! Motion module: kinematic profiles, segment generation, blending and playback cursors.

pub mod blend;
mod cursor;
mod moves;
mod profile;
mod segment;
mod vec3;

pub use blend::{blend_corners, plan_corner, BlendPlan};
pub use cursor::{CursorSample, PhaseCursor, PlaybackState};
pub use moves::{
    BlendType, Move, MoveType, Rotation, RotateSegmentList, SegmentList, MAX_MOVE_SEGMENTS,
};
pub use profile::{PhaseList, ProfilePhase, SCurveProfile, CRUISE_EPSILON};
pub use segment::{total_duration, Kinematic, KinematicState, RotateSegment, Segment};
pub use vec3::Vec3;

/// Append to a fixed-capacity phase list.
///
/// Capacities are sized for the longest sequence any generator builds.
pub(crate) fn push_phase<T, const N: usize>(list: &mut heapless::Vec<T, N>, item: T) {
    let pushed = list.push(item);
    debug_assert!(pushed.is_ok(), "phase list capacity {} exceeded", N);
}
