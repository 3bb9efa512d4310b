//! Timed reveal → warmup → hunt → hide sequence.
//!
//! The sequence is a small timer machine advanced from the tick loop, so a
//! session spans many ticks without ever blocking them. It is the only
//! writer of [`ChaseFlags`]; everything else reads them.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChasePhase {
    Dormant,
    /// Revealed and frozen in place while roaring.
    Warmup,
    /// Free to hunt.
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChaseEvent {
    Revealed,
    Hunting,
    Ended,
}

/// State shared with the per-tick components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChaseFlags {
    pub movement_enabled: bool,
    pub stealth_active: bool,
}

impl ChaseFlags {
    pub fn new(stealth_active: bool) -> Self {
        Self {
            movement_enabled: true,
            stealth_active,
        }
    }
}

/// One in-flight run of the sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChaseSession {
    pub phase: ChasePhase,
    pub time_in_phase: f32,
    pub stealth_at_start: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChaseSequence {
    warmup: f32,
    duration: f32,
    session: Option<ChaseSession>,
}

impl ChaseSequence {
    pub fn new(warmup: f32, duration: f32) -> Self {
        Self {
            warmup,
            duration,
            session: None,
        }
    }

    pub fn is_chasing(&self) -> bool {
        self.session.is_some()
    }

    pub fn phase(&self) -> ChasePhase {
        self.session.map_or(ChasePhase::Dormant, |s| s.phase)
    }

    pub fn session(&self) -> Option<&ChaseSession> {
        self.session.as_ref()
    }

    /// Starts a session unless one is already running. A dropped trigger
    /// leaves timers and flags untouched.
    pub fn trigger(&mut self, flags: &mut ChaseFlags) -> Option<ChaseEvent> {
        if self.session.is_some() {
            log::debug!("Chase trigger ignored, session already in flight");
            return None;
        }

        self.session = Some(ChaseSession {
            phase: ChasePhase::Warmup,
            time_in_phase: 0.0,
            stealth_at_start: flags.stealth_active,
        });
        flags.stealth_active = false;
        flags.movement_enabled = false;
        log::info!("Chase started: revealed, warming up for {:.1}s", self.warmup);
        Some(ChaseEvent::Revealed)
    }

    /// Advances the running session by `dt`. At most one transition fires
    /// per call; overshoot carries into the next phase, so advancing again
    /// by zero fires any deadline it already crossed.
    pub fn advance(&mut self, dt: f32, flags: &mut ChaseFlags) -> Option<ChaseEvent> {
        let session = self.session.as_mut()?;
        session.time_in_phase += dt;

        match session.phase {
            ChasePhase::Warmup if session.time_in_phase >= self.warmup => {
                session.phase = ChasePhase::Active;
                session.time_in_phase -= self.warmup;
                flags.movement_enabled = true;
                log::info!("Chase active for {:.1}s", self.duration);
                Some(ChaseEvent::Hunting)
            }
            ChasePhase::Active if session.time_in_phase >= self.duration => {
                self.session = None;
                flags.stealth_active = true;
                log::info!("Chase ended, back in stealth");
                Some(ChaseEvent::Ended)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const DT: f32 = 0.01;

    #[fixture]
    fn sequence() -> ChaseSequence {
        ChaseSequence::new(5.0, 15.0)
    }

    fn run_for(
        sequence: &mut ChaseSequence,
        flags: &mut ChaseFlags,
        seconds: f32,
    ) -> Vec<ChaseEvent> {
        let ticks = (seconds / DT).round() as usize;
        (0..ticks)
            .filter_map(|_| sequence.advance(DT, flags))
            .collect()
    }

    #[rstest]
    fn trigger_reveals_and_freezes(mut sequence: ChaseSequence) {
        let mut flags = ChaseFlags::new(true);
        assert_eq!(sequence.trigger(&mut flags), Some(ChaseEvent::Revealed));
        assert_eq!(
            flags,
            ChaseFlags {
                movement_enabled: false,
                stealth_active: false
            }
        );
        assert_eq!(sequence.phase(), ChasePhase::Warmup);
        assert!(sequence.session().is_some_and(|s| s.stealth_at_start));
    }

    #[rstest]
    fn full_lifecycle(mut sequence: ChaseSequence) {
        let mut flags = ChaseFlags::new(true);
        sequence.trigger(&mut flags);

        assert!(run_for(&mut sequence, &mut flags, 4.9).is_empty());
        assert!(!flags.movement_enabled);

        assert_eq!(
            run_for(&mut sequence, &mut flags, 0.2),
            vec![ChaseEvent::Hunting]
        );
        assert!(flags.movement_enabled);
        assert!(!flags.stealth_active);

        assert!(run_for(&mut sequence, &mut flags, 14.7).is_empty());
        assert!(sequence.is_chasing());

        assert_eq!(
            run_for(&mut sequence, &mut flags, 0.4),
            vec![ChaseEvent::Ended]
        );
        assert!(flags.stealth_active);
        assert!(flags.movement_enabled);
        assert!(!sequence.is_chasing());
        assert_eq!(sequence.phase(), ChasePhase::Dormant);
    }

    #[rstest]
    fn retrigger_mid_session_is_dropped(mut sequence: ChaseSequence) {
        let mut flags = ChaseFlags::new(true);
        sequence.trigger(&mut flags);
        run_for(&mut sequence, &mut flags, 2.0);

        let before = sequence.clone();
        assert_eq!(sequence.trigger(&mut flags), None);
        assert_eq!(sequence, before);

        // Warmup still ends at the first deadline.
        assert_eq!(
            run_for(&mut sequence, &mut flags, 3.1),
            vec![ChaseEvent::Hunting]
        );
    }

    #[rstest]
    fn new_session_after_end(mut sequence: ChaseSequence) {
        let mut flags = ChaseFlags::new(true);
        sequence.trigger(&mut flags);
        run_for(&mut sequence, &mut flags, 20.1);
        assert!(!sequence.is_chasing());

        assert_eq!(sequence.trigger(&mut flags), Some(ChaseEvent::Revealed));
        assert_eq!(sequence.phase(), ChasePhase::Warmup);
        assert!(!flags.movement_enabled);
    }

    #[rstest]
    fn dormant_advance_is_inert(mut sequence: ChaseSequence) {
        let mut flags = ChaseFlags::new(false);
        assert_eq!(sequence.advance(100.0, &mut flags), None);
        assert_eq!(flags, ChaseFlags::new(false));
    }

    #[rstest]
    fn overshoot_carries_into_active_phase(mut sequence: ChaseSequence) {
        let mut flags = ChaseFlags::new(true);
        sequence.trigger(&mut flags);
        assert_eq!(sequence.advance(6.0, &mut flags), Some(ChaseEvent::Hunting));
        let session = sequence.session().expect("still chasing");
        assert!((session.time_in_phase - 1.0).abs() < 1e-5);
        assert_eq!(sequence.advance(14.0, &mut flags), Some(ChaseEvent::Ended));
    }
}
