use imu_traits::Vector3;
use std::collections::VecDeque;

/// Points kept on screen: ten seconds at a 100 ms cadence.
pub const DEFAULT_CAPACITY: usize = 100;

/// Rolling window of g-force points, oldest evicted first.
///
/// The four series always have the same length.
#[derive(Debug, Clone)]
pub struct PlotWindow {
    capacity: usize,
    times: VecDeque<f64>,
    xs: VecDeque<f64>,
    ys: VecDeque<f64>,
    zs: VecDeque<f64>,
}

impl PlotWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            times: VecDeque::with_capacity(capacity + 1),
            xs: VecDeque::with_capacity(capacity + 1),
            ys: VecDeque::with_capacity(capacity + 1),
            zs: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn push(&mut self, time: f64, g: Vector3) {
        self.times.push_back(time);
        self.xs.push_back(g.x);
        self.ys.push_back(g.y);
        self.zs.push_back(g.z);
        self.truncate();
    }

    fn truncate(&mut self) {
        while self.times.len() > self.capacity {
            self.times.pop_front();
            self.xs.pop_front();
            self.ys.pop_front();
            self.zs.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn times(&self) -> &VecDeque<f64> {
        &self.times
    }

    pub fn xs(&self) -> &VecDeque<f64> {
        &self.xs
    }

    pub fn ys(&self) -> &VecDeque<f64> {
        &self.ys
    }

    pub fn zs(&self) -> &VecDeque<f64> {
        &self.zs
    }

    /// Earliest and latest timestamp in the window.
    pub fn time_bounds(&self) -> Option<(f64, f64)> {
        Some((*self.times.front()?, *self.times.back()?))
    }
}

impl Default for PlotWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
