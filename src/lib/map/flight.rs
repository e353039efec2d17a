//! Smooth zooming and panning after van Wijk and Nuij, "Smooth and efficient zooming and panning".
//!
//! The camera zooms out while it travels and zooms back in when it approaches the target,
//! so long distances are covered without the map turning into a blur.

use crate::*;

/// Curvature of the flight path. Bigger values zoom out further.
const RHO: f64 = 1.42;

/// Shortest pan distance in pixels which is still flown along the curved path.
const MIN_TRAVEL: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct Flight {
    from: Camera,
    to: Camera,
    /// Edge length of the view at the start, in pixels of the starting zoom level.
    w0: f64,
    /// Edge length of the view at the end, in pixels of the starting zoom level.
    w1: f64,
    /// Travelled distance in pixels of the starting zoom level.
    u1: f64,
    r0: f64,
    /// Length of the path.
    length: f64,
    duration: f64,
}

impl Flight {
    /// Plans a flight for a view of the size of `screen`.
    ///
    /// `speed` is the number of seconds per unit of path length.
    pub fn new(from: Camera, to: Camera, screen: &Screen, speed: f64) -> Self {
        let w0 = screen.width.max(screen.height).max(1.0);
        let w1 = w0 * 2f64.powf(from.zoom - to.zoom);
        let u1 = glm::distance(&from.center, &to.center) * screen.world_size(from.zoom);

        let mut flight = Self {
            from,
            to,
            w0,
            w1,
            u1,
            r0: 0.0,
            length: 0.0,
            duration: 0.0,
        };

        if u1 > MIN_TRAVEL {
            flight.r0 = flight.r(false);
            flight.length = (flight.r(true) - flight.r0) / RHO;
        } else {
            flight.length = (w1 / w0).ln().abs() / RHO;
        }
        flight.duration = flight.length * speed.max(0.0);

        flight
    }

    /// Duration of the flight in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// The camera `elapsed` seconds into the flight.
    ///
    /// Returns the exact target once the flight is over.
    pub fn sample(&self, elapsed: f64) -> Camera {
        if self.duration <= 0.0 || elapsed >= self.duration {
            return self.to;
        }

        let t = (elapsed / self.duration).max(0.0);
        let s = ease_out(t) * self.length;

        let (travelled, width) = if self.u1 > MIN_TRAVEL {
            (self.u(s) / self.u1, self.w(s))
        } else {
            let direction = if self.w1 < self.w0 { -1.0 } else { 1.0 };
            (t, self.w0 * (direction * RHO * s).exp())
        };

        Camera::new(
            self.from.center + (self.to.center - self.from.center) * travelled,
            self.from.zoom + (self.w0 / width).log2(),
        )
    }

    fn r(&self, end: bool) -> f64 {
        let rho2 = RHO * RHO;
        let (sign, w) = if end { (-1.0, self.w1) } else { (1.0, self.w0) };
        let t1 = self.w1 * self.w1 - self.w0 * self.w0 + sign * rho2 * rho2 * self.u1 * self.u1;
        let b1 = 2.0 * w * rho2 * self.u1;
        // ln(sqrt(b^2 + 1) - b), which cancels to ln(0) for large b when written out.
        -(t1 / b1).asinh()
    }

    fn w(&self, s: f64) -> f64 {
        self.w0 * (self.r0.cosh() / (self.r0 + RHO * s).cosh())
    }

    /// Equals `w0 * (cosh(r0) * tanh(r0 + rho * s) - sinh(r0)) / rho^2`.
    fn u(&self, s: f64) -> f64 {
        self.w0 * (RHO * s).sinh() / ((self.r0 + RHO * s).cosh() * RHO * RHO)
    }
}

fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t).powf(1.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Screen {
        Screen::new(1600.0, 1000.0, 256)
    }

    fn taichung() -> Camera {
        Camera::looking_at(&Position::new(24.137396608878987, 120.68692065044608).unwrap(), 8.0)
    }

    fn taipei_101() -> Camera {
        Camera::looking_at(&Position::new(25.0330, 121.5654).unwrap(), 15.0)
    }

    #[test]
    fn starts_at_the_origin_and_ends_at_the_target() {
        let flight = Flight::new(taichung(), taipei_101(), &screen(), 0.8);
        assert!(flight.duration() > 0.0);

        let start = flight.sample(0.0);
        assert!(glm::distance(&start.center, &taichung().center) < 1e-12);
        assert!((start.zoom - 8.0).abs() < 1e-9);

        assert_eq!(flight.sample(flight.duration()), taipei_101());
        assert_eq!(flight.sample(flight.duration() + 10.0), taipei_101());
    }

    #[test]
    fn zooms_out_while_travelling_far() {
        let from = Camera::looking_at(&Position::new(25.0, 121.0).unwrap(), 12.0);
        let to = Camera::looking_at(&Position::new(48.8, 2.3).unwrap(), 12.0);
        let flight = Flight::new(from, to, &screen(), 0.8);

        let halfway = flight.sample(flight.duration() / 2.0);
        assert!(halfway.zoom < 12.0);
    }

    #[test]
    fn moves_monotonically_towards_the_target() {
        let flight = Flight::new(taichung(), taipei_101(), &screen(), 0.8);
        let total = glm::distance(&taichung().center, &taipei_101().center);

        let mut last = total;
        for step in 1..=20 {
            let camera = flight.sample(flight.duration() * step as f64 / 20.0);
            let remaining = glm::distance(&camera.center, &taipei_101().center);
            assert!(remaining <= last + 1e-12);
            last = remaining;
        }
        assert!(last < 1e-12);
    }

    #[test]
    fn zooming_in_place_only_changes_the_zoom() {
        let from = taichung();
        let to = Camera::new(from.center, 15.0);
        let flight = Flight::new(from, to, &screen(), 0.8);

        let halfway = flight.sample(flight.duration() / 2.0);
        assert!(glm::distance(&halfway.center, &from.center) < 1e-12);
        assert!(halfway.zoom > 8.0 && halfway.zoom < 15.0);
    }

    #[test]
    fn zooming_out_after_a_tiny_pan_stays_on_course() {
        let from = Camera::new(taichung().center, 15.0);
        let nudged = Camera::new(from.center + glm::vec2(1e-12, 0.0), 8.0);
        let in_place = Camera::new(from.center, 8.0);

        let flight = Flight::new(from, nudged, &screen(), 0.8);
        let reference = Flight::new(from, in_place, &screen(), 0.8);
        assert!(flight.duration() > 0.0);
        assert!((flight.duration() - reference.duration()).abs() < 1e-6);

        for step in 0..=20 {
            let camera = flight.sample(flight.duration() * step as f64 / 20.0);
            assert!(camera.zoom.is_finite());
            assert!(camera.zoom >= 8.0 - 1e-9 && camera.zoom <= 15.0 + 1e-9);
            assert!(glm::distance(&camera.center, &from.center) <= 2e-12);
        }
    }

    #[test]
    fn flying_nowhere_is_over_immediately() {
        let flight = Flight::new(taichung(), taichung(), &screen(), 0.8);
        assert_eq!(flight.duration(), 0.0);
        assert_eq!(flight.sample(0.0), taichung());
    }
}
