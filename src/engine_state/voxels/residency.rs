//! Access-order tracking for loaded chunks.
//!
//! The chunk manager records a chunk as used when it is generated or edited.
//! When a resident-chunk cap is configured, the least recently used chunks
//! outside the view are the first to go.

use cgmath::Point3;
use lru::LruCache;

pub struct Residency {
    order: LruCache<Point3<i32>, ()>,
}

impl Residency {
    pub fn new() -> Self {
        Residency {
            order: LruCache::unbounded(),
        }
    }

    /// Marks a chunk as most recently used.
    pub fn touch(&mut self, chunk: Point3<i32>) {
        self.order.put(chunk, ());
    }

    pub fn forget(&mut self, chunk: &Point3<i32>) {
        self.order.pop(chunk);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Up to `count` chunks, least recently used first, skipping any for which
    /// `protected` returns true.
    pub fn eviction_candidates(
        &self,
        count: usize,
        protected: impl Fn(&Point3<i32>) -> bool,
    ) -> Vec<Point3<i32>> {
        self.order
            .iter()
            .rev()
            .map(|(chunk, _)| *chunk)
            .filter(|chunk| !protected(chunk))
            .take(count)
            .collect()
    }
}

impl Default for Residency {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_come_least_recent_first() {
        let mut residency = Residency::new();
        for x in 0..4 {
            residency.touch(Point3::new(x, 0, 0));
        }
        residency.touch(Point3::new(0, 0, 0));

        assert_eq!(
            residency.eviction_candidates(2, |_| false),
            vec![Point3::new(1, 0, 0), Point3::new(2, 0, 0)]
        );
        assert_eq!(
            residency.eviction_candidates(2, |chunk| chunk.x == 1),
            vec![Point3::new(2, 0, 0), Point3::new(3, 0, 0)]
        );

        residency.forget(&Point3::new(2, 0, 0));
        assert_eq!(residency.len(), 3);
    }
}
