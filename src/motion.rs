//! Animation driver for reel positions: constant-rate loop or damped spring to a target.
//!
//! Positions are in terminal rows. Motion is time-stepped by the caller, so the same
//! driver runs under the real frame clock and under a simulated one.

use std::time::Duration;

/// Physical parameters of the settle spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub damping: f64,
    pub stiffness: f64,
    pub mass: f64,
}

/// Damping 18 / stiffness 100 / mass 1: slightly under-damped (ratio 0.9).
pub const SETTLE_SPRING: SpringParams = SpringParams {
    damping: 18.0,
    stiffness: 100.0,
    mass: 1.0,
};

/// Below both thresholds the spring is at rest.
const REST_DISPLACEMENT: f64 = 0.005;
const REST_SPEED: f64 = 0.05;

impl SpringParams {
    fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Closed-form (displacement, velocity) at time `t` from displacement `x0` and velocity `v0`.
    fn solve(&self, x0: f64, v0: f64, t: f64) -> (f64, f64) {
        let w0 = self.natural_frequency();
        let zeta = self.damping_ratio();
        if zeta < 1.0 {
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            let alpha = zeta * w0;
            let b = (v0 + alpha * x0) / wd;
            let decay = (-alpha * t).exp();
            let (sin, cos) = (wd * t).sin_cos();
            let x = decay * (x0 * cos + b * sin);
            let v = decay * (v0 * cos - (x0 * wd + alpha * b) * sin);
            (x, v)
        } else if zeta == 1.0 {
            let c = v0 + w0 * x0;
            let decay = (-w0 * t).exp();
            (decay * (x0 + c * t), decay * (v0 - w0 * c * t))
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -w0 * (zeta - root);
            let r2 = -w0 * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, r1 * c1 * e1 + r2 * c2 * e2)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    /// Unbounded motion in the negative direction at `rate` rows/s.
    Loop { rate: f64 },
    /// Spring from `from` to `to`, starting at rest.
    Spring {
        from: f64,
        to: f64,
        params: SpringParams,
    },
}

/// Result of advancing a motion by one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Moving(f64),
    /// Delivered exactly once, when a spring comes to rest.
    Finished(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    kind: Kind,
    start: f64,
    elapsed: f64,
    done: bool,
}

impl Motion {
    pub fn looping(start: f64, rate: f64) -> Self {
        Self {
            kind: Kind::Loop { rate },
            start,
            elapsed: 0.0,
            done: false,
        }
    }

    pub fn spring(from: f64, to: f64, params: SpringParams) -> Self {
        Self {
            kind: Kind::Spring { from, to, params },
            start: from,
            elapsed: 0.0,
            done: false,
        }
    }

    /// Position at the current elapsed time without advancing.
    pub fn position(&self) -> f64 {
        match self.kind {
            Kind::Loop { rate } => self.start - rate * self.elapsed,
            Kind::Spring { to, .. } if self.done => to,
            Kind::Spring { from, to, params } => {
                let (x, _) = params.solve(from - to, 0.0, self.elapsed);
                to + x
            }
        }
    }

    /// Advance by `dt`. A spring yields `Finished` once, then `None` forever.
    pub fn advance(&mut self, dt: Duration) -> Option<Step> {
        if self.done {
            return None;
        }
        self.elapsed += dt.as_secs_f64();
        match self.kind {
            Kind::Loop { .. } => Some(Step::Moving(self.position())),
            Kind::Spring { from, to, params } => {
                let (x, v) = params.solve(from - to, 0.0, self.elapsed);
                if x.abs() < REST_DISPLACEMENT && v.abs() < REST_SPEED {
                    self.done = true;
                    Some(Step::Finished(to))
                } else {
                    Some(Step::Moving(to + x))
                }
            }
        }
    }
}
