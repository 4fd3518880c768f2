//! Human-readable plan listing.

use core::fmt;

use super::events::EventAction;
use super::Planner;

/// Display adapter listing every move, its phases and every event.
pub struct PlanDump<'a> {
    planner: &'a Planner,
}

impl<'a> PlanDump<'a> {
    pub(super) fn new(planner: &'a Planner) -> Self {
        Self { planner }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventAction::DigitalOutput { bits, changed } => {
                write!(f, "digital bits={:#010x} mask={:#010x}", bits, changed)
            }
            EventAction::PwmOutput(v) => {
                write!(f, "pwm [{:.3}, {:.3}, {:.3}, {:.3}]", v[0], v[1], v[2], v[3])
            }
            EventAction::Rotate(r) => write!(
                f,
                "rotate axis {} {:.4} -> {:.4} ({:.4}s)",
                r.axis, r.src, r.dst, r.duration
            ),
        }
    }
}

impl fmt::Display for PlanDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.planner;
        writeln!(
            f,
            "plan: {} moves, {} events, traverse {:.4}s{}",
            p.moves.len(),
            p.events.len(),
            p.traverse_time,
            if p.is_calculated() { "" } else { " (not calculated)" }
        )?;

        for (i, mv) in p.moves.iter().enumerate() {
            writeln!(
                f,
                "move {:>3}: {:<6} {} -> {} v={:.3} a={:.3} j={:.3} start={:.4} dur={:.4}{}",
                i,
                mv.move_type,
                mv.src,
                mv.dst,
                mv.vel,
                mv.acc,
                mv.jerk,
                mv.schedule_time,
                mv.duration,
                if mv.blended { " blended" } else { "" }
            )?;
            for seg in mv.segments() {
                writeln!(f, "    {}", seg)?;
            }
        }

        for event in p.events.iter() {
            writeln!(
                f,
                "event {}: at {:.4}s (move {}, delay {:.4}) {}",
                event.id, event.trigger_time, event.move_index, event.delay, event.action
            )?;
        }

        Ok(())
    }
}
