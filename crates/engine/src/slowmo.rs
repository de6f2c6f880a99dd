//! Slow motion meter.
//!
//! Holding the slow-motion key ramps game time down to `min_scale` over
//! `ramp_ms` while draining the meter. Releasing ramps back up and refills the
//! meter from empty to full over `refill_ms`. An empty meter forces full speed.

/// Slow motion tuning (milliseconds unless noted).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlowMoConfig {
    /// Meter capacity.
    pub max_ms: u32,
    /// Time to refill an empty meter while released.
    pub refill_ms: u32,
    /// Time to reach full effect while held.
    pub ramp_ms: u32,
    /// Game time scale at full effect.
    pub min_scale: f32,
}

impl Default for SlowMoConfig {
    fn default() -> Self {
        Self {
            max_ms: 5000,
            refill_ms: 60_000,
            ramp_ms: 90,
            min_scale: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlowMo {
    config: SlowMoConfig,
    meter_ms: f32,
    ramp_ms: f32,
    /// Fractional game milliseconds not yet handed out.
    carry_ms: f32,
}

impl SlowMo {
    pub fn new(config: SlowMoConfig) -> Self {
        Self {
            config,
            meter_ms: config.max_ms as f32,
            ramp_ms: 0.0,
            carry_ms: 0.0,
        }
    }

    /// Full meter, no effect.
    pub fn clear(&mut self) {
        *self = Self::new(self.config);
    }

    pub fn meter_ms(&self) -> f32 {
        self.meter_ms
    }

    /// Meter level in 0.0..=1.0.
    pub fn meter_fraction(&self) -> f32 {
        if self.config.max_ms == 0 {
            return 0.0;
        }
        self.meter_ms / self.config.max_ms as f32
    }

    fn ramp_fraction(&self) -> f32 {
        if self.config.ramp_ms == 0 {
            return 0.0;
        }
        self.ramp_ms / self.config.ramp_ms as f32
    }

    /// Current game time scale (1.0 = normal speed).
    pub fn time_scale(&self) -> f32 {
        1.0 - (1.0 - self.config.min_scale) * self.ramp_fraction()
    }

    pub fn is_active(&self) -> bool {
        self.ramp_ms > 0.0
    }

    /// Advance by one frame of real time and return the scaled game time.
    pub fn update(&mut self, held: bool, down_edge: bool, real_ms: u32) -> u32 {
        let dt = real_ms as f32;
        let max = self.config.max_ms as f32;
        let ramp_max = self.config.ramp_ms as f32;

        if self.meter_ms <= 0.0 || down_edge {
            self.ramp_ms = 0.0;
        }

        if held {
            if self.meter_ms > 0.0 {
                self.meter_ms = (self.meter_ms - dt).max(0.0);
                self.ramp_ms += dt;
            }
        } else {
            let refill = if self.config.refill_ms == 0 {
                max
            } else {
                max * dt / self.config.refill_ms as f32
            };
            self.meter_ms = (self.meter_ms + refill).clamp(0.0, max);
            self.ramp_ms -= dt;
        }

        if self.meter_ms <= 0.0 {
            self.ramp_ms = 0.0;
        }
        self.ramp_ms = self.ramp_ms.clamp(0.0, ramp_max);

        self.scale(real_ms)
    }

    /// Scale real time by the current factor, carrying fractions between frames.
    fn scale(&mut self, real_ms: u32) -> u32 {
        let scaled = real_ms as f32 * self.time_scale() + self.carry_ms;
        let whole = scaled.floor();
        self.carry_ms = scaled - whole;
        whole as u32
    }
}

impl Default for SlowMo {
    fn default() -> Self {
        Self::new(SlowMoConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_full_speed() {
        let mut slowmo = SlowMo::default();
        assert_eq!(slowmo.update(false, false, 16), 16);
        assert_eq!(slowmo.time_scale(), 1.0);
        assert_eq!(slowmo.meter_fraction(), 1.0);
    }

    #[test]
    fn test_ramp_reaches_quarter_speed() {
        let mut slowmo = SlowMo::default();
        slowmo.update(true, true, 30);
        assert!(slowmo.time_scale() < 1.0);
        slowmo.update(true, false, 30);
        slowmo.update(true, false, 30);
        assert_eq!(slowmo.time_scale(), 0.25);
        assert_eq!(slowmo.update(true, false, 100), 25);
        assert_eq!(slowmo.meter_ms(), 5000.0 - 190.0);
    }

    #[test]
    fn test_carry_keeps_fractions() {
        let mut slowmo = SlowMo::default();
        for _ in 0..10 {
            slowmo.update(true, false, 10);
        }
        // Full effect: 4 frames of 10 ms make 10 ms of game time.
        let total: u32 = (0..4).map(|_| slowmo.update(true, false, 10)).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_empty_meter_forces_full_speed() {
        let mut slowmo = SlowMo::default();
        slowmo.update(true, true, 100);
        for _ in 0..49 {
            slowmo.update(true, false, 100);
        }
        assert_eq!(slowmo.meter_ms(), 0.0);
        assert_eq!(slowmo.time_scale(), 1.0);
        assert!(!slowmo.is_active());
        assert_eq!(slowmo.update(true, false, 100), 100);
    }

    #[test]
    fn test_refill_rate() {
        let mut slowmo = SlowMo::default();
        for _ in 0..50 {
            slowmo.update(true, false, 100);
        }
        assert_eq!(slowmo.meter_ms(), 0.0);
        for _ in 0..60 {
            slowmo.update(false, false, 1000);
        }
        assert!((slowmo.meter_ms() - 5000.0).abs() < 0.5);
    }

    #[test]
    fn test_release_ramps_back() {
        let mut slowmo = SlowMo::default();
        slowmo.update(true, true, 90);
        assert_eq!(slowmo.time_scale(), 0.25);
        slowmo.update(false, false, 45);
        assert_eq!(slowmo.time_scale(), 0.625);
        slowmo.update(false, false, 45);
        assert_eq!(slowmo.time_scale(), 1.0);
    }
}
