/// Delay and sound counters. They only move on `tick`, which the host drives
/// at 60 Hz independently of instruction execution.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    pub fn is_sound_active(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::Timers;

    #[test]
    fn tick_on_zero_stays_zero() {
        let mut timers = Timers::default();
        timers.tick();
        assert_eq!(timers.delay(), 0);
        assert_eq!(timers.sound(), 0);
        assert!(!timers.is_sound_active());
    }

    #[test]
    fn tick_decrements_each_counter_by_one() {
        let mut timers = Timers::default();
        timers.set_delay(3);
        timers.set_sound(1);

        timers.tick();

        assert_eq!(timers.delay(), 2);
        assert_eq!(timers.sound(), 0);
        assert!(!timers.is_sound_active());

        timers.tick();
        timers.tick();
        timers.tick();
        assert_eq!(timers.delay(), 0);
    }

    #[test]
    fn sound_active_while_nonzero() {
        let mut timers = Timers::default();
        timers.set_sound(2);
        assert!(timers.is_sound_active());
        timers.tick();
        assert!(timers.is_sound_active());
        timers.tick();
        assert!(!timers.is_sound_active());
    }
}
