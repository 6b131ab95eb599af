use crate::types::Scalar;

#[derive(Copy, Clone, Debug, Default)]
pub struct StepStats {
    pub substeps: u32,
    pub pairs_tested: u32,
    pub contacts: u32,
    pub wheel_contacts: u32,
}

impl StepStats {
    pub fn accumulate(&mut self, other: StepStats) {
        self.substeps += other.substeps;
        self.pairs_tested += other.pairs_tested;
        self.contacts += other.contacts;
        self.wheel_contacts += other.wheel_contacts;
    }
}

/// What one `FixedStep::plan` call decided.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepPlan {
    /// Frame time after clamping.
    pub dt: Scalar,
    pub substeps: u32,
    /// Accumulated time thrown away because the sub-step cap was hit.
    pub dropped: Scalar,
    pub non_finite: bool,
}

/// Fixed sub-step accumulator: variable frame `dt` in, whole sub-steps out.
#[derive(Copy, Clone, Debug)]
pub struct FixedStep {
    pub h: Scalar,
    pub max_dt: Scalar,
    pub max_substeps: u32,
    accumulator: Scalar,
}

impl FixedStep {
    pub fn new(h: Scalar, max_dt: Scalar, max_substeps: u32) -> Self {
        Self { h, max_dt, max_substeps, accumulator: 0.0 }
    }

    pub fn plan(&mut self, dt: Scalar) -> StepPlan {
        let non_finite = !dt.is_finite();
        let dt = if non_finite { 0.0 } else { dt.clamp(0.0, self.max_dt) };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.h && substeps < self.max_substeps {
            self.accumulator -= self.h;
            substeps += 1;
        }
        let mut dropped = 0.0;
        if self.accumulator >= self.h {
            let keep = self.accumulator % self.h;
            dropped = self.accumulator - keep;
            self.accumulator = keep;
        }
        StepPlan { dt, substeps, dropped, non_finite }
    }

    #[inline] pub fn accumulator(&self) -> Scalar { self.accumulator }
    /// Fraction of a sub-step left in the accumulator, for render interpolation.
    #[inline] pub fn alpha(&self) -> Scalar { if self.h > 0.0 { self.accumulator / self.h } else { 0.0 } }
    pub fn reset(&mut self) { self.accumulator = 0.0; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn clamps_long_frames() {
        let mut fs = FixedStep::new(0.25, 1.0, 20);
        let p = fs.plan(5.0);
        assert_eq!(p.dt, 1.0);
        assert_eq!(p.substeps, 4);
        assert_eq!(fs.accumulator(), 0.0);
    }

    #[test] fn short_frames_accumulate() {
        let mut fs = FixedStep::new(0.25, 1.0, 20);
        assert_eq!(fs.plan(0.125).substeps, 0);
        assert_eq!(fs.plan(0.125).substeps, 1);
        assert_eq!(fs.accumulator(), 0.0);
    }

    #[test] fn cap_drops_excess_time() {
        let mut fs = FixedStep::new(0.25, 10.0, 2);
        let p = fs.plan(1.125);
        assert_eq!(p.substeps, 2);
        assert_eq!(p.dropped, 0.5);
        assert_eq!(fs.accumulator(), 0.125);
    }

    #[test] fn non_finite_is_zero() {
        let mut fs = FixedStep::new(0.25, 1.0, 20);
        let p = fs.plan(f32::NAN);
        assert!(p.non_finite);
        assert_eq!(p.substeps, 0);
        assert_eq!(fs.plan(-3.0).dt, 0.0);
    }
}
