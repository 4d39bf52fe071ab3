//! Bounded window of recent hand-centroid positions.

use std::collections::VecDeque;

/// A position in frame pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// FIFO of at most `capacity` points; the oldest is evicted on overflow.
#[derive(Clone, Debug)]
pub struct PositionHistory {
    points:   VecDeque<Point>,
    capacity: usize,
}

impl PositionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        PositionHistory { points: VecDeque::with_capacity(capacity + 1), capacity }
    }

    pub fn push(&mut self, p: Point) {
        self.points.push_back(p);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize      { self.points.len() }
    pub fn is_empty(&self) -> bool  { self.points.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }

    pub fn oldest(&self) -> Option<Point> { self.points.front().copied() }
    pub fn newest(&self) -> Option<Point> { self.points.back().copied() }

    /// `(newest − oldest)` across the window, once it holds two samples.
    pub fn displacement(&self) -> Option<(f32, f32)> {
        if self.points.len() < 2 {
            return None;
        }
        let (a, b) = (self.oldest()?, self.newest()?);
        Some((b.x - a.x, b.y - a.y))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}
