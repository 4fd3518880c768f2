//! Corner blending between consecutive moves.
//!
//! A blend replaces the stop at the junction of two moves with a two-phase
//! transition patch: jerk `+J·u` for `T`, then `-J·u` for `T`, where `u` is
//! the direction of the velocity change. The patch starts on the first
//! move's cruise and ends on the second move's cruise; the phases in
//! between are dropped. The first patch phase stays with the first move and
//! the second phase is handed over to the following move, so each move's
//! phase list stays contiguous.

use libm::sqrt;
use tracing::trace;

use super::moves::{BlendType, Move, SegmentList};
use super::push_phase;
use super::segment::{total_duration, Segment};
use super::vec3::Vec3;
use crate::config::MachineLimits;

/// Share of a cruise a blend may consume when the move also blends at its other end.
pub const INNER_CRUISE_SHARE: f64 = 0.49;

/// Cosine of the turn angle beyond which a corner is treated as a reversal.
const REVERSAL_COS: f64 = -1.0 + 1e-6;

/// Geometry of one accepted corner blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendPlan {
    /// Jerk vector of the first patch phase.
    pub jerk: Vec3,
    /// Duration of each patch phase.
    pub duration: f64,
    /// Distance before the corner at which the patch starts.
    pub entry_distance: f64,
    /// Distance after the corner at which the patch ends.
    pub exit_distance: f64,
    /// Whether the corner doubles back on itself.
    pub reversal: bool,
}

/// Blend every eligible junction in `moves`, in order.
///
/// Returns the number of blends applied. Junctions whose geometry cannot
/// be satisfied are left unblended.
pub fn blend_corners(moves: &mut [Move], limits: &MachineLimits) -> usize {
    let mut applied = 0;

    for i in 1..moves.len() {
        let (head, tail) = moves.split_at_mut(i);
        let chain_end = tail
            .get(1)
            .map_or(true, |next| next.blend == BlendType::None || !next.is_blendable());
        let a = &mut head[i - 1];
        let b = &mut tail[0];
        let chain_start = !a.blended_in;

        if let Some(plan) = plan_corner(a, b, limits, chain_start, chain_end) {
            apply_blend(a, b, &plan);
            applied += 1;
        }
    }

    applied
}

/// Work out the transition patch for the junction between `a` and `b`.
///
/// `chain_start` and `chain_end` mark whether `a` is not blended in from
/// its predecessor and whether `b` will not blend into its successor; at a
/// chain boundary the whole cruise is available, otherwise just under half.
pub fn plan_corner(
    a: &Move,
    b: &Move,
    limits: &MachineLimits,
    chain_start: bool,
    chain_end: bool,
) -> Option<BlendPlan> {
    if b.blend == BlendType::None || !a.is_blendable() || !b.is_blendable() {
        return None;
    }
    let cruise_a = *a.segments.get(a.cruise?)?;
    let cruise_b = *b.segments.get(b.cruise?)?;

    let speed_a = cruise_a.vel.length();
    let speed_b = cruise_b.vel.length();
    if speed_a <= 0.0 || speed_b <= 0.0 {
        return None;
    }

    let dir_a = a.direction();
    let dir_b = b.direction();
    let dv = dir_b * speed_b - dir_a * speed_a;
    let dv_len = dv.length();
    let u = dv.normalized();

    let fall_a = (a.dst - cruise_a.end_pos()).dot(dir_a);
    let rise_b = (cruise_b.pos - b.src).dot(dir_b);
    let share_a = if chain_start { 1.0 } else { INNER_CRUISE_SHARE };
    let share_b = if chain_end { 1.0 } else { INNER_CRUISE_SHARE };
    let mut avail_a = fall_a + a.cruise_length * share_a;
    let mut avail_b = rise_b + b.cruise_length * share_b;
    if b.blend_clearance > 0.0 {
        avail_a = avail_a.min(b.blend_clearance);
        avail_b = avail_b.min(b.blend_clearance);
    }

    let max_jerk = a.jerk.min(b.jerk).min(u.axis_capped(limits.jerk));
    let max_acc = a.acc.min(b.acc).min(u.axis_capped(limits.acceleration));
    if max_jerk <= 0.0 || max_acc <= 0.0 {
        return None;
    }
    let t_min = sqrt(dv_len / max_jerk).max(dv_len / max_acc);

    let reversal = dir_a.dot(dir_b) < REVERSAL_COS;
    let (duration, entry_distance, exit_distance) = if reversal {
        let longest = avail_a.min(avail_b).min(0.5 * a.length()).min(0.5 * b.length());
        if longest <= 0.0 || t_min <= 0.0 {
            trace!("reversal blend skipped: no room (longest {})", longest);
            return None;
        }
        let jerk = dv_len / (t_min * t_min);
        let d_a = apex_excursion(speed_a, speed_b, jerk, t_min);
        let d_b = apex_excursion(speed_b, speed_a, jerk, t_min);
        if d_a > longest || d_b > longest {
            trace!("reversal blend skipped: excursion {} / {} exceeds {}", d_a, d_b, longest);
            return None;
        }
        (t_min, d_a, d_b)
    } else {
        let t_max = (avail_a / speed_a).min(avail_b / speed_b);
        if t_max < t_min {
            trace!("corner blend skipped: window [{}, {}] is empty", t_min, t_max);
            return None;
        }
        let t = match b.blend {
            BlendType::MaxJerk => t_min,
            _ => t_max,
        };
        (t, t * speed_a, t * speed_b)
    };

    let jerk = if duration > 0.0 {
        u * (dv_len / (duration * duration))
    } else {
        Vec3::ZERO
    };

    trace!(
        "corner blend: T={} entry={} exit={} reversal={}",
        duration,
        entry_distance,
        exit_distance,
        reversal
    );

    Some(BlendPlan {
        jerk,
        duration,
        entry_distance,
        exit_distance,
        reversal,
    })
}

/// Distance travelled forward before the velocity crosses zero.
///
/// The patch starts at `s1` along the entry direction and ends at `s2`
/// along the reversed direction. With `s1 < s2` the crossing falls within
/// the first phase, otherwise within the second.
fn apex_excursion(s1: f64, s2: f64, jerk: f64, t: f64) -> f64 {
    if s1 < s2 {
        let t0 = sqrt(2.0 * s1 / jerk);
        return s1 * t0 - jerk * t0 * t0 * t0 / 6.0;
    }

    let v_mid = s1 - 0.5 * jerk * t * t;
    let p_mid = s1 * t - jerk * t * t * t / 6.0;
    let tau = t - sqrt((t * t - (s1 - s2) / jerk).max(0.0));
    p_mid + v_mid * tau - 0.5 * jerk * t * tau * tau + jerk * tau * tau * tau / 6.0
}

/// Rewrite both moves around the patch described by `plan`.
fn apply_blend(a: &mut Move, b: &mut Move, plan: &BlendPlan) {
    let (Some(ca), Some(cb)) = (a.cruise, b.cruise) else {
        return;
    };
    let cruise_a = a.segments[ca];
    let cruise_b = b.segments[cb];
    let dir_a = a.direction();
    let dir_b = b.direction();
    let speed_a = cruise_a.vel.length();
    let speed_b = cruise_b.vel.length();

    let start = a.dst - dir_a * plan.entry_distance;
    let cruise_time_a = ((start - cruise_a.pos).dot(dir_a) / speed_a).max(0.0);
    let entry = cruise_a.state_at(cruise_time_a);

    let mut head = SegmentList::new();
    for seg in a.segments[..ca].iter() {
        push_phase(&mut head, *seg);
    }
    push_phase(&mut head, Segment {
        duration: cruise_time_a,
        ..cruise_a
    });
    let patch = Segment::from_state(entry, plan.jerk, plan.duration, cruise_a.move_type);
    push_phase(&mut head, patch);
    push_phase(&mut head, Segment::from_state(
        patch.end_state(),
        -plan.jerk,
        plan.duration,
        cruise_a.move_type,
    ));

    // Hand the second patch phase over to the following move
    let Some(handover) = head.pop() else {
        return;
    };
    let exit = handover.end_state();
    let cruise_time_b = ((cruise_b.end_pos() - exit.pos).dot(dir_b) / speed_b).max(0.0);

    let mut rest = SegmentList::new();
    push_phase(&mut rest, handover);
    push_phase(&mut rest, Segment {
        pos: exit.pos,
        duration: cruise_time_b,
        ..cruise_b
    });
    for seg in b.segments[cb + 1..].iter() {
        push_phase(&mut rest, *seg);
    }

    a.segments = head;
    a.duration = total_duration(&a.segments);
    a.blended = true;

    b.segments = rest;
    b.cruise = Some(1);
    b.duration = total_duration(&b.segments);
    b.blended_in = true;
}
