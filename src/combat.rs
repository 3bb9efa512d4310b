/// Cooldown-gated attack.
///
/// Hit detection is not modelled; an accepted attack only fires the attack
/// animation and stamps the time.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatTrigger {
    cooldown: f64,
    last_attack_time: Option<f64>,
}

impl CombatTrigger {
    pub fn new(cooldown: f32) -> Self {
        Self {
            cooldown: f64::from(cooldown),
            last_attack_time: None,
        }
    }

    pub fn last_attack_time(&self) -> Option<f64> {
        self.last_attack_time
    }

    pub fn is_ready(&self, now: f64) -> bool {
        self.last_attack_time
            .map_or(true, |last| now >= last + self.cooldown)
    }

    /// Returns whether the attack went through.
    pub fn try_attack(&mut self, now: f64) -> bool {
        if !self.is_ready(now) {
            log::debug!("Attack suppressed, on cooldown");
            return false;
        }
        self.last_attack_time = Some(now);
        true
    }
}
