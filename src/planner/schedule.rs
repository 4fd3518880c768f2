//! Move start times, event trigger times and sync barrier resolution.

use alloc::vec::Vec;

use tracing::debug;

use super::events::{DelayableEvent, SyncBarrier};
use crate::motion::blend::INNER_CRUISE_SHARE;
use crate::motion::{BlendType, Move, MoveType, Segment};

/// Whether `cur` starts before `prev` ends when moves overlap in time.
fn overlaps(prev: &Move, cur: &Move) -> bool {
    cur.blend != BlendType::None
        && cur.move_type == MoveType::Normal
        && prev.move_type == MoveType::Normal
}

/// Assign start times to every move and trigger times to every event.
///
/// Moves are scheduled in one ordered pass, so a sync shortfall pushes
/// every later move and event back by exactly that amount. With
/// `overlapping` set, a move that blends into its predecessor starts early
/// by the smaller of the two sides' overlap allowances. Returns the time
/// at which the last move ends and the last event completes.
pub fn schedule(
    moves: &mut [Move],
    events: &mut [DelayableEvent],
    syncs: &[SyncBarrier],
    overlapping: bool,
    overlap_fraction: f64,
) -> f64 {
    let mut prev_end = 0.0_f64;
    let mut prev_overlapped = false;
    let mut next_event = 0;

    for i in 0..moves.len() {
        let overlapped = overlapping && i > 0 && overlaps(&moves[i - 1], &moves[i]);
        let start = if overlapped {
            let prev = &moves[i - 1];
            let cur = &moves[i];
            let next_overlaps = moves.get(i + 1).map_or(false, |next| overlaps(cur, next));

            let cap_prev = if prev_overlapped { INNER_CRUISE_SHARE } else { 1.0 };
            let cap_cur = if next_overlaps { INNER_CRUISE_SHARE } else { 1.0 };
            let allowance_prev = cap_prev.min(overlap_fraction) * prev.duration;
            let allowance_cur = cap_cur.min(overlap_fraction) * cur.duration;
            prev_end - allowance_prev.min(allowance_cur)
        } else {
            prev_end
        };
        prev_overlapped = overlapped;

        moves[i].schedule_time = start;

        while let Some(event) = events.get_mut(next_event) {
            if event.move_index > i {
                break;
            }
            event.trigger_time = start + event.delay;
            next_event += 1;
        }

        if moves[i].move_type == MoveType::Sync {
            let shortfall = sync_shortfall(i, start, events, syncs);
            if shortfall > 0.0 {
                debug!("sync at move {} waits {}s", i, shortfall);
            }
            moves[i].resolve_sync(shortfall);
        }

        prev_end = prev_end.max(start + moves[i].duration);
    }

    for event in events.iter_mut().skip(next_event) {
        event.trigger_time = prev_end + event.delay;
    }

    events
        .iter()
        .map(DelayableEvent::completion_time)
        .fold(prev_end, f64::max)
}

/// How long the sync at `index` must hold so every awaited event completes.
fn sync_shortfall(index: usize, start: f64, events: &[DelayableEvent], syncs: &[SyncBarrier]) -> f64 {
    syncs
        .iter()
        .filter(|sync| sync.move_index == index)
        .flat_map(|sync| events.iter().filter(move |e| sync.awaits(e.id)))
        .map(|e| e.completion_time() - start)
        .fold(0.0, f64::max)
}

/// Concatenate every move's phases into one flat timeline.
pub fn collate(moves: &[Move]) -> Vec<Segment> {
    moves.iter().flat_map(|mv| mv.segments().iter().copied()).collect()
}
