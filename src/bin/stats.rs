use std::collections::VecDeque;
use std::time::Instant;

const FRAMES: usize = 30;

/// Frame timing. Drives the map animation and the optional frame time display.
pub struct Stats {
    stamp: Instant,
    last_frametimes: VecDeque<u64>,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            stamp: Instant::now(),
            last_frametimes: std::iter::repeat(0).take(FRAMES).collect(),
        }
    }

    pub fn capture_frame(&mut self) {
        self.last_frametimes.pop_front();
        self.last_frametimes
            .push_back(self.stamp.elapsed().as_micros() as u64);
        self.stamp = Instant::now();
    }

    /// Average frame time in microseconds.
    pub fn get_average(&self) -> f64 {
        self.last_frametimes.iter().sum::<u64>() as f64 / FRAMES as f64
    }

    /// Duration of the last frame in seconds.
    pub fn get_last_delta(&self) -> f64 {
        self.last_frametimes.back().copied().unwrap_or(0) as f64 / 1_000_000f64
    }
}

#[test]
fn the_last_delta_is_the_latest_frame() {
    let mut stats = Stats::new();
    assert_eq!(stats.get_last_delta(), 0.0);
    std::thread::sleep(std::time::Duration::from_millis(2));
    stats.capture_frame();
    assert!(stats.get_last_delta() >= 0.002);
    assert!(stats.get_average() > 0.0);
}
