//! Greedy spatial merge of neighboring rectangles.
//!
//! Rectangles that are neighbors within a per-axis tolerance are joined into
//! one enclosing region. The grown region may then reach rectangles that were
//! out of range before, so every accumulator is scanned to a fixed point.
//! Only "significant" regions survive: both width and height must exceed the
//! tolerance.

use crate::geometry::Rect;

/// Per-axis neighborhood thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tolerance {
    /// Horizontal threshold
    pub dx: f64,
    /// Vertical threshold
    pub dy: f64,
}

impl Tolerance {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Joins rectangles of neighboring layout items into regions.
#[derive(Debug, Clone, Default)]
pub struct RegionClusterer {
    tolerance: Tolerance,
    clip: Option<Rect>,
}

impl RegionClusterer {
    /// Create a clusterer with the given tolerances and no clip.
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            clip: None,
        }
    }

    /// Only consider rectangles fully contained in `clip`.
    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = Some(clip.normalize());
        self
    }

    /// The configured tolerances.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Cluster `rects` into regions, ordered by bottom edge then left edge.
    ///
    /// Every rectangle that survives the clip lies in exactly one region
    /// before the significance filter, and no two returned regions are
    /// neighbors under the configured tolerance. Regions with width or height
    /// not exceeding the tolerance are dropped, together with the rectangles
    /// they hold.
    pub fn cluster(&self, rects: &[Rect]) -> Vec<Rect> {
        let Tolerance { dx, dy } = self.tolerance;

        let pending: Vec<Rect> = rects
            .iter()
            .map(Rect::normalize)
            .filter(|r| self.clip.map_or(true, |clip| clip.contains(r)))
            .collect();
        log::debug!(
            "RegionClusterer: {} of {} rects inside clip (dx={}, dy={})",
            pending.len(),
            rects.len(),
            dx,
            dy
        );

        let mut regions = merge_pass(pending, dx, dy);

        // A region emitted late can grow into one emitted earlier; repeat
        // until a pass leaves the set unchanged.
        loop {
            let count = regions.len();
            regions = merge_pass(regions, dx, dy);
            if regions.len() == count {
                break;
            }
        }

        regions.retain(|r| r.width() > dx && r.height() > dy);
        for region in &regions {
            log::trace!("RegionClusterer: region {:?}", region);
        }
        log::debug!("RegionClusterer: {} regions", regions.len());
        regions
    }
}

/// Cluster `rects` with tolerance `(dx, dy)`, optionally restricted to `clip`.
pub fn cluster_rects(rects: &[Rect], clip: Option<Rect>, dx: f64, dy: f64) -> Vec<Rect> {
    let clusterer = RegionClusterer::new(Tolerance::new(dx, dy));
    match clip {
        Some(clip) => clusterer.with_clip(clip).cluster(rects),
        None => clusterer.cluster(rects),
    }
}

/// One round of greedy merging over normalized rectangles.
///
/// The first pending rectangle becomes the accumulator. Each scan walks the
/// rest from back to front, absorbing every neighbor; scans repeat until one
/// absorbs nothing. The survivors of a scan are collected into a fresh vector.
fn merge_pass(mut pending: Vec<Rect>, dx: f64, dy: f64) -> Vec<Rect> {
    sort_dedup(&mut pending);
    let mut finished = Vec::new();

    while !pending.is_empty() {
        let mut acc = pending.remove(0);

        loop {
            let before = pending.len();
            let mut survivors = Vec::with_capacity(before);
            for rect in pending.into_iter().rev() {
                if rect.is_neighbor(&acc, dx, dy) {
                    acc = acc.union(&rect);
                } else {
                    survivors.push(rect);
                }
            }
            survivors.reverse();
            pending = survivors;
            if pending.len() == before {
                break;
            }
        }

        finished.push(acc);
        sort_dedup(&mut pending);
    }

    sort_dedup(&mut finished);
    finished
}

/// Sort by reading order and drop exact duplicates.
fn sort_dedup(rects: &mut Vec<Rect>) {
    rects.sort_by(|a, b| a.reading_order(b));
    rects.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(x0, y0, x1, y1)
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_rects(&[], None, 0.0, 0.0).is_empty());
        assert!(cluster_rects(&[], None, 5.0, 5.0).is_empty());
    }

    #[test]
    fn test_gap_wider_than_tolerance() {
        let rects = [r(0.0, 0.0, 10.0, 10.0), r(11.0, 0.0, 20.0, 10.0)];
        let regions = cluster_rects(&rects, None, 0.0, 0.0);
        assert_eq!(regions, vec![r(0.0, 0.0, 10.0, 10.0), r(11.0, 0.0, 20.0, 10.0)]);
    }

    #[test]
    fn test_gap_within_tolerance() {
        let rects = [r(0.0, 0.0, 10.0, 10.0), r(11.0, 0.0, 20.0, 10.0)];
        let regions = cluster_rects(&rects, None, 2.0, 0.0);
        assert_eq!(regions, vec![r(0.0, 0.0, 20.0, 10.0)]);
    }

    #[test]
    fn test_chain_needs_repeated_scans() {
        // a-b and b-c are neighbors, a-c are not
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(12.0, 0.0, 22.0, 10.0);
        let c = r(24.0, 0.0, 34.0, 10.0);
        assert!(!a.is_neighbor(&c, 2.0, 0.0));

        for order in [[a, b, c], [c, b, a], [a, c, b], [b, c, a]] {
            let regions = cluster_rects(&order, None, 2.0, 0.0);
            assert_eq!(regions, vec![r(0.0, 0.0, 34.0, 10.0)]);
        }
    }

    #[test]
    fn test_insignificant_region_dropped() {
        let regions = cluster_rects(&[r(0.0, 0.0, 1.0, 1.0)], None, 5.0, 5.0);
        assert!(regions.is_empty());
    }

    #[test]
    fn test_significance_is_strict() {
        // width == dx is not enough
        let regions = cluster_rects(&[r(0.0, 0.0, 3.0, 10.0)], None, 3.0, 0.0);
        assert!(regions.is_empty());
        let regions = cluster_rects(&[r(0.0, 0.0, 3.5, 10.0)], None, 3.0, 0.0);
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn test_clip_excludes_partial_rects() {
        let rects = [r(0.0, 0.0, 10.0, 10.0), r(90.0, 90.0, 110.0, 110.0)];
        let regions = cluster_rects(&rects, Some(r(0.0, 0.0, 100.0, 100.0)), 0.0, 0.0);
        assert_eq!(regions, vec![r(0.0, 0.0, 10.0, 10.0)]);
    }

    #[test]
    fn test_inverted_inputs_normalized() {
        let rects = [r(10.0, 10.0, 0.0, 0.0), r(20.0, 10.0, 10.0, 0.0)];
        let regions = cluster_rects(&rects, None, 0.0, 0.0);
        assert_eq!(regions, vec![r(0.0, 0.0, 20.0, 10.0)]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        let regions = cluster_rects(&[rect, rect, rect], None, 0.0, 0.0);
        assert_eq!(regions, vec![rect]);
    }

    #[test]
    fn test_result_in_reading_order() {
        let rects = [
            r(100.0, 100.0, 150.0, 120.0),
            r(0.0, 100.0, 50.0, 120.0),
            r(0.0, 0.0, 50.0, 20.0),
        ];
        let regions = cluster_rects(&rects, None, 0.0, 0.0);
        assert_eq!(
            regions,
            vec![
                r(0.0, 0.0, 50.0, 20.0),
                r(0.0, 100.0, 50.0, 120.0),
                r(100.0, 100.0, 150.0, 120.0),
            ]
        );
    }

    #[test]
    fn test_late_region_absorbs_earlier_one() {
        // The first accumulator (small box) has no neighbor. The two later
        // boxes merge into a region whose union overlaps it.
        let small = r(40.0, 8.0, 45.0, 12.0);
        let left = r(0.0, 0.0, 30.0, 20.0);
        let right = r(31.0, 15.0, 80.0, 30.0);
        assert!(!small.is_neighbor(&left, 0.0, 0.0));
        assert!(!small.is_neighbor(&right, 0.0, 0.0));

        let regions = cluster_rects(&[small, left, right], None, 1.0, 0.0);
        assert_eq!(regions, vec![r(0.0, 0.0, 80.0, 30.0)]);
    }

    #[test]
    fn test_clusterer_struct() {
        let clusterer = RegionClusterer::new(Tolerance::new(0.0, 3.0))
            .with_clip(r(0.0, 0.0, 612.0, 792.0));
        assert_eq!(clusterer.tolerance(), Tolerance::new(0.0, 3.0));
        let regions = clusterer.cluster(&[
            r(72.0, 72.0, 300.0, 84.0),
            r(72.0, 86.0, 300.0, 98.0),
            r(72.0, 140.0, 300.0, 152.0),
        ]);
        assert_eq!(
            regions,
            vec![r(72.0, 72.0, 300.0, 98.0), r(72.0, 140.0, 300.0, 152.0)]
        );
    }
}
