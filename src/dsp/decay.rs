/*
Exponential Decay
=================

Percussive sounds die away exponentially: every millisecond the level drops
by the same *ratio*, not the same amount. Metronome clicks need exactly that
shape, and they need it short, so a back-to-back click at 300 BPM (200 ms
apart) never overlaps the previous one.

Vocabulary
----------

  level         The current gain (starts at `start`).

  coefficient   The per-sample multiplier. Every sample: level *= coefficient.

  length        How many samples the curve lasts. After that the output is
                hard zero and the curve reports itself inactive, the same way
                a scheduled source is stopped at a fixed time.


Two Ways to Specify the Curve
-----------------------------

1. Time constant (tau): the level falls to 1/e (~37%) every tau seconds.

       coefficient = exp(-1 / (tau * sample_rate))

   Used for the noise burst itself, where tau is a fraction of the burst.

2. Target ramp: go from `start` to `target` in exactly `duration` seconds.

       coefficient = (target / start) ^ (1 / (duration * sample_rate))

   Used for the output gain (e.g. 1.4 -> 0.001 over 50 ms).


    Level
    1.4 ┐╲
        │ ╲
        │  ╲_
        │    ╲__
    0.0 └───────╲▁▁▁▁▁▁▁▁──→ Time
             length ┘
*/

pub struct ExpDecay {
    level: f32,
    coefficient: f32,
    remaining: u32,
}

impl ExpDecay {
    /// Decay from 1.0 with time constant `tau`, lasting `length` seconds.
    pub fn time_constant(tau: f32, length: f32, sample_rate: f32) -> Self {
        let tau_samples = (tau * sample_rate).max(1.0);
        Self {
            level: 1.0,
            coefficient: (-1.0 / tau_samples).exp(),
            remaining: Self::samples(length, sample_rate),
        }
    }

    /// Ramp from `start` to `target` over `duration` seconds, then stop.
    pub fn ramp(start: f32, target: f32, duration: f32, sample_rate: f32) -> Self {
        let remaining = Self::samples(duration, sample_rate);
        let ratio = (target / start).clamp(f32::MIN_POSITIVE, 1.0);
        Self {
            level: start,
            coefficient: ratio.powf(1.0 / remaining.max(1) as f32),
            remaining,
        }
    }

    fn samples(seconds: f32, sample_rate: f32) -> u32 {
        (seconds * sample_rate).round().max(0.0) as u32
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.remaining == 0 {
            return 0.0;
        }
        let out = self.level;
        self.level *= self.coefficient;
        self.remaining -= 1;
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Returns true while the curve still produces output.
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn level(&self) -> f32 {
        if self.is_active() {
            self.level
        } else {
            0.0
        }
    }
}
