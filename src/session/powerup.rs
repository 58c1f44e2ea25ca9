use crate::session::rules::GameRules;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Shows whether the current item is flawed, without judging it.
    Reveal,
    /// Adds bonus seconds to the countdown.
    TimeExtension,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Reveal, PowerUpKind::TimeExtension];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Reveal => "X-Ray Eyes",
            PowerUpKind::TimeExtension => "Time Freeze",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowerUpInventory {
    reveal: u32,
    time_extension: u32,
}

impl PowerUpInventory {
    pub fn new(rules: &GameRules) -> Self {
        Self {
            reveal: rules.reveal_uses,
            time_extension: rules.time_extension_uses,
        }
    }

    pub fn remaining(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::Reveal => self.reveal,
            PowerUpKind::TimeExtension => self.time_extension,
        }
    }

    /// Takes one use. False when none are left.
    pub fn consume(&mut self, kind: PowerUpKind) -> bool {
        let slot = match kind {
            PowerUpKind::Reveal => &mut self.reveal,
            PowerUpKind::TimeExtension => &mut self.time_extension,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses() {
        let inv = PowerUpInventory::new(&GameRules::default());
        assert_eq!(inv.remaining(PowerUpKind::Reveal), 3);
        assert_eq!(inv.remaining(PowerUpKind::TimeExtension), 1);
    }

    #[test]
    fn consume_stops_at_zero() {
        let mut inv = PowerUpInventory::new(&GameRules::default());
        assert!(inv.consume(PowerUpKind::TimeExtension));
        assert!(!inv.consume(PowerUpKind::TimeExtension));
        assert_eq!(inv.remaining(PowerUpKind::TimeExtension), 0);
        assert_eq!(inv.remaining(PowerUpKind::Reveal), 3);
    }
}
