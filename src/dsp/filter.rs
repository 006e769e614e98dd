use std::f32::consts::PI;

use crate::dsp::RenderCtx;

/*
Band-pass State-Variable Filter
===============================

A click made of raw white noise sounds like a hiss. Passing it through a
band-pass filter keeps only the energy around a centre frequency, which is
what turns the burst into a "tick" with a perceivable brightness.

  centre (Hz)   Where the pass band sits. Higher centre = brighter click.
  Q             Centre divided by bandwidth. Higher Q = narrower band, more
                "ringing" and a more pitched character.

Topology
--------

This is the TPT (topology-preserving transform) SVF: two trapezoidal
integrators with a damping term k = 1/Q.

    g  = tan(pi * centre / sample_rate)
    h  = 1 / (1 + g * (g + k))
    v1 = h * (ic1eq + g * (x - ic2eq))     band output
    v2 = ic2eq + g * v1                    low output

The raw band output peaks at Q at the centre frequency. We scale it by k so
the centre gain is exactly 1.0 whatever the Q, matching a constant-peak
band-pass and keeping accent gains meaningful.
*/

pub struct BandPass {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub centre_hz: f32,
    pub q: f32,
}

impl BandPass {
    pub fn new(centre_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            centre_hz,
            q: q.max(0.1),
        }
    }

    #[inline]
    fn coefficients(&self, ctx: &RenderCtx) -> (f32, f32) {
        let nyquist_safe = self.centre_hz.min(ctx.sample_rate * 0.49);
        let g = (PI * nyquist_safe / ctx.sample_rate).tan();
        (g, 1.0 / self.q)
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, ctx: &RenderCtx) -> f32 {
        let (g, k) = self.coefficients(ctx);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        k * v1
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, ctx);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn steady_state_peak(filter: &mut BandPass, tone_hz: f32) -> f32 {
        let ctx = RenderCtx::from_freq(SAMPLE_RATE, tone_hz);
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 4800];
        osc.render(&mut buffer, &ctx);
        filter.render(&mut buffer, &ctx);

        // Skip the transient while the integrators settle
        buffer[2400..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn centre_frequency_passes_at_unity() {
        let mut filter = BandPass::new(2500.0, 5.0);
        let peak = steady_state_peak(&mut filter, 2500.0);
        assert!((peak - 1.0).abs() < 0.05, "expected unity at centre, got {peak}");
    }

    #[test]
    fn far_frequencies_are_attenuated() {
        let mut filter = BandPass::new(2500.0, 5.0);
        let low = steady_state_peak(&mut filter, 200.0);
        filter.reset();
        let high = steady_state_peak(&mut filter, 15_000.0);

        assert!(low < 0.1, "200 Hz should be rejected, got {low}");
        assert!(high < 0.1, "15 kHz should be rejected, got {high}");
    }

    #[test]
    fn higher_q_is_narrower() {
        let mut wide = BandPass::new(3000.0, 2.0);
        let mut narrow = BandPass::new(3000.0, 7.5);

        let off_centre = 4500.0;
        let wide_peak = steady_state_peak(&mut wide, off_centre);
        let narrow_peak = steady_state_peak(&mut narrow, off_centre);

        assert!(
            narrow_peak < wide_peak,
            "narrow {narrow_peak} should reject more than wide {wide_peak}"
        );
    }
}
