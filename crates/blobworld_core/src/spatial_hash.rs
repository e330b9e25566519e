use glam::Vec2;

#[derive(Clone, Debug)]
/// Uniform grid over a rectangular region, used as the broad phase for every
/// region and ray query in the physics world.
///
/// Items are stored with the "offset array" layout (like compressed sparse
/// rows): `cell_offsets[i]..cell_offsets[i + 1]` indexes the slice of
/// `items` that falls into cell `i`. The layout is rebuilt wholesale from a
/// flat list, which keeps queries allocation-free and cache friendly.
///
/// Items whose position lies outside the grid are not stored; callers keep
/// those in a separate overflow list.
///
/// # Examples
/// ```
/// use blobworld_core::spatial_hash::SpatialHash;
/// use glam::Vec2;
///
/// let mut hash = SpatialHash::new(2.0, Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0));
/// hash.build(&[(Vec2::new(1.0, 1.0), 7_u32), (Vec2::new(8.0, 8.0), 9)]);
///
/// let mut nearby = Vec::new();
/// hash.query_into(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0), &mut nearby);
/// assert_eq!(nearby, vec![7]);
/// ```
pub struct SpatialHash<T> {
    pub cell_size: f32,
    pub origin: Vec2,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub items: Vec<T>,
}

impl<T: Copy> SpatialHash<T> {
    /// Creates an empty grid covering `min..max` with square cells.
    ///
    /// A degenerate or inverted region yields a single cell.
    pub fn new(cell_size: f32, min: Vec2, max: Vec2) -> Self {
        let cell_size = cell_size.max(f32::EPSILON);
        let extent = (max - min).max(Vec2::ZERO);
        let cols = ((extent.x / cell_size).ceil() as usize).max(1);
        let rows = ((extent.y / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            origin: min,
            cols,
            rows,
            cell_offsets: vec![0; cols * rows + 1],
            items: Vec::new(),
        }
    }

    /// Computes the flat cell index for a world position.
    ///
    /// Returns `None` for non-finite coordinates and for positions outside
    /// the grid.
    #[inline]
    pub fn cell_idx(&self, pos: Vec2) -> Option<usize> {
        if !pos.is_finite() {
            return None;
        }
        let local = (pos - self.origin) / self.cell_size;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        // Guard the float-to-int cast against absurd magnitudes.
        if local.x >= self.cols as f32 || local.y >= self.rows as f32 {
            return None;
        }
        Some(local.y as usize * self.cols + local.x as usize)
    }

    /// Rebuilds the grid from scratch. Items outside the grid are dropped.
    pub fn build(&mut self, data: &[(Vec2, T)]) {
        let cell_count = self.cols * self.rows;

        let mut counts = vec![0usize; cell_count];
        for &(pos, _) in data {
            if let Some(idx) = self.cell_idx(pos) {
                counts[idx] += 1;
            }
        }

        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.items.clear();
        self.items.reserve(total);
        let mut slots: Vec<Option<T>> = vec![None; total];
        let mut cursor = self.cell_offsets[..cell_count].to_vec();
        for &(pos, item) in data {
            if let Some(idx) = self.cell_idx(pos) {
                slots[cursor[idx]] = Some(item);
                cursor[idx] += 1;
            }
        }
        self.items.extend(slots.into_iter().flatten());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn cell_range(&self, min: Vec2, max: Vec2) -> Option<(usize, usize, usize, usize)> {
        if !min.is_finite() || !max.is_finite() || min.x > max.x || min.y > max.y {
            return None;
        }
        let lo = ((min - self.origin) / self.cell_size).floor();
        let hi = ((max - self.origin) / self.cell_size).floor();
        if hi.x < 0.0 || hi.y < 0.0 || lo.x >= self.cols as f32 || lo.y >= self.rows as f32 {
            return None;
        }
        let min_cx = lo.x.max(0.0) as usize;
        let min_cy = lo.y.max(0.0) as usize;
        let max_cx = (hi.x as usize).min(self.cols - 1);
        let max_cy = (hi.y as usize).min(self.rows - 1);
        Some((min_cx, max_cx, min_cy, max_cy))
    }

    pub fn query_callback<F>(&self, min: Vec2, max: Vec2, mut callback: F)
    where
        F: FnMut(T),
    {
        let Some((min_cx, max_cx, min_cy, max_cy)) = self.cell_range(min, max) else {
            return;
        };
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy * self.cols + cx;
                let start = self.cell_offsets[cell_idx];
                let end = self.cell_offsets[cell_idx + 1];
                for &item in &self.items[start..end] {
                    callback(item);
                }
            }
        }
    }

    /// Collects every item in the cells overlapping `min..max`.
    ///
    /// This is a broad-phase answer: callers still run the exact test.
    #[inline]
    pub fn query_into(&self, min: Vec2, max: Vec2, result: &mut Vec<T>) {
        result.clear();
        self.query_callback(min, max, |item| result.push(item));
    }

    pub fn count_nearby(&self, min: Vec2, max: Vec2) -> usize {
        let Some((min_cx, max_cx, min_cy, max_cy)) = self.cell_range(min, max) else {
            return 0;
        };
        let mut count = 0;
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy * self.cols + cx;
                count += self.cell_offsets[cell_idx + 1] - self.cell_offsets[cell_idx];
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SpatialHash<usize> {
        SpatialHash::new(5.0, Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0))
    }

    #[test]
    fn test_query_finds_nearby() {
        let mut sh = grid();
        sh.build(&[
            (Vec2::new(1.0, 1.0), 0),
            (Vec2::new(2.0, 2.0), 1),
            (Vec2::new(-9.0, -9.0), 2),
        ]);

        let mut found = Vec::new();
        sh.query_into(Vec2::new(0.5, 0.5), Vec2::new(2.5, 2.5), &mut found);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn test_outside_items_are_dropped() {
        let mut sh = grid();
        sh.build(&[(Vec2::new(50.0, 0.0), 0), (Vec2::new(0.0, 0.0), 1)]);
        assert_eq!(sh.len(), 1);
        assert!(sh.cell_idx(Vec2::new(10.0, 0.0)).is_none());
        assert!(sh.cell_idx(Vec2::new(f32::NAN, 0.0)).is_none());
    }

    #[test]
    fn test_rebuild_clears() {
        let mut sh = grid();
        sh.build(&[(Vec2::ZERO, 3)]);
        sh.build(&[]);
        assert_eq!(sh.count_nearby(Vec2::splat(-10.0), Vec2::splat(10.0)), 0);
    }

    #[test]
    fn test_query_clamps_to_grid() {
        let mut sh = grid();
        sh.build(&[(Vec2::new(9.9, 9.9), 4)]);
        let mut found = Vec::new();
        sh.query_into(Vec2::splat(5.0), Vec2::splat(500.0), &mut found);
        assert_eq!(found, vec![4]);
        sh.query_into(Vec2::splat(100.0), Vec2::splat(500.0), &mut found);
        assert!(found.is_empty());
    }
}
