use crate::constants::{BREATH_DEPTH, BREATH_RATE_HZ, VOLUME_RAMP_SEC};

/// Gain the master bus should settle at for a given preference pair.
#[inline]
pub fn preference_target(enabled: bool, volume: f32) -> f32 {
    if enabled && volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Linear ramp from the current value to a target over a fixed duration.
///
/// Retargeting mid-ramp starts the new ramp from wherever the old one had
/// reached, so the output never jumps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainRamp {
    from: f32,
    to: f32,
    start: f64,
    duration: f32,
}

impl GainRamp {
    pub fn new(initial: f32) -> Self {
        let v = initial.clamp(0.0, 1.0);
        Self {
            from: v,
            to: v,
            start: 0.0,
            duration: VOLUME_RAMP_SEC,
        }
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn value_at(&self, now: f64) -> f32 {
        let dt = (now - self.start) as f32;
        if self.duration <= 0.0 || dt >= self.duration {
            return self.to;
        }
        if dt <= 0.0 {
            return self.from;
        }
        let a = dt / self.duration;
        (self.from + (self.to - self.from) * a).clamp(0.0, 1.0)
    }

    pub fn is_settled(&self, now: f64) -> bool {
        (now - self.start) as f32 >= self.duration
    }

    /// Start a new ramp toward `target` at `now`; returns the starting value.
    pub fn retarget(&mut self, target: f32, now: f64) -> f32 {
        let from = self.value_at(now);
        self.from = from;
        self.to = if target.is_finite() {
            target.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.start = now;
        from
    }
}

/// Slow low-frequency "breathing" applied on top of the preference gain.
///
/// The factor swings between `1 - depth` and `1`, so multiplying it into a
/// gain in [0, 1] keeps the result in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breathing {
    pub rate_hz: f32,
    pub depth: f32,
}

impl Default for Breathing {
    fn default() -> Self {
        Self {
            rate_hz: BREATH_RATE_HZ,
            depth: BREATH_DEPTH,
        }
    }
}

impl Breathing {
    #[inline]
    fn depth(&self) -> f32 {
        self.depth.clamp(0.0, 1.0)
    }

    /// Resting value an LFO should oscillate around.
    pub fn center(&self) -> f32 {
        1.0 - self.depth() * 0.5
    }

    /// Peak deviation from [`Breathing::center`].
    pub fn amplitude(&self) -> f32 {
        self.depth() * 0.5
    }

    pub fn factor(&self, t: f64) -> f32 {
        let phase = (std::f64::consts::TAU * self.rate_hz as f64 * t) as f32;
        self.center() + self.amplitude() * phase.sin()
    }
}

/// Combined master level: preference ramp shaped by the breathing LFO.
pub fn master_level(ramp: &GainRamp, breathing: &Breathing, now: f64) -> f32 {
    (ramp.value_at(now) * breathing.factor(now)).clamp(0.0, 1.0)
}
