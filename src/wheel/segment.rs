//! Segment geometry
//!
//! The wheel is split into equal slices in catalog order. All angles are in
//! degrees, measured from the pointer reference at 0°:
//! - segment i spans [i * segment_angle, (i + 1) * segment_angle)
//! - center is the midpoint of that span

use serde::{Deserialize, Serialize};

use crate::catalog::PrizeCatalog;
use crate::error::WheelError;
use crate::normalize_degrees;

/// One slice of the wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelSegment {
    pub prize_id: String,
    pub index: usize,
    pub start_angle: f32,
    pub end_angle: f32,
    pub center_angle: f32,
}

impl WheelSegment {
    /// Angular span of the segment
    #[inline]
    pub fn span(&self) -> f32 {
        self.end_angle - self.start_angle
    }

    /// Check if a wheel-local angle falls inside [start, end)
    pub fn contains_angle(&self, angle: f32) -> bool {
        let angle = normalize_degrees(angle);
        angle >= self.start_angle && angle < self.end_angle
    }

    /// Rotation (mod 360) that places this segment's center under the pointer
    #[inline]
    pub fn pointer_angle(&self) -> f32 {
        360.0 - self.center_angle
    }
}

/// Cached segment layout for one catalog
#[derive(Debug, Clone, PartialEq)]
pub struct WheelLayout {
    segments: Vec<WheelSegment>,
    segment_angle: f32,
}

impl WheelLayout {
    /// Partition 360° among the catalog entries in order
    pub fn compute(catalog: &PrizeCatalog) -> Result<Self, WheelError> {
        if catalog.is_empty() {
            return Err(WheelError::EmptyCatalog);
        }

        let count = catalog.len();
        let segment_angle = 360.0 / count as f32;
        // Boundaries come from the index, not a running sum, so neighbours share
        // the exact same f32 and the last slice closes at 360.
        let boundary = |i: usize| {
            if i == count {
                360.0
            } else {
                i as f32 * segment_angle
            }
        };
        let segments = catalog
            .prizes()
            .iter()
            .enumerate()
            .map(|(i, prize)| {
                let start_angle = boundary(i);
                let end_angle = boundary(i + 1);
                WheelSegment {
                    prize_id: prize.id.clone(),
                    index: i,
                    start_angle,
                    end_angle,
                    center_angle: (start_angle + end_angle) / 2.0,
                }
            })
            .collect();

        Ok(Self {
            segments,
            segment_angle,
        })
    }

    pub fn segments(&self) -> &[WheelSegment] {
        &self.segments
    }

    #[inline]
    pub fn segment_angle(&self) -> f32 {
        self.segment_angle
    }

    /// Segment belonging to a prize
    pub fn segment_for(&self, prize_id: &str) -> Result<&WheelSegment, WheelError> {
        self.segments
            .iter()
            .find(|s| s.prize_id == prize_id)
            .ok_or_else(|| WheelError::UnknownPrize {
                id: prize_id.to_string(),
            })
    }

    /// Segment resting under the pointer after the wheel has rotated by `rotation`
    pub fn segment_under_pointer(&self, rotation: f32) -> &WheelSegment {
        // The wheel turns clockwise, so the pointer reads the wheel-local angle
        // that has been carried back to 0°.
        let local = normalize_degrees(-rotation);
        let guess = ((local / self.segment_angle) as usize).min(self.segments.len() - 1);
        // The division can land one slice off right at a boundary
        self.segments[guess.saturating_sub(1)..]
            .iter()
            .take(3)
            .find(|s| s.contains_angle(local))
            .unwrap_or(&self.segments[guess])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Prize;
    use proptest::prelude::*;

    fn catalog_of(n: usize) -> PrizeCatalog {
        PrizeCatalog::new(
            (0..n)
                .map(|i| Prize::new(&format!("p{i}"), "label", i as f32, "CODE", i % 2 == 0))
                .collect(),
        )
    }

    #[test]
    fn test_seven_segments() {
        let layout = WheelLayout::compute(&PrizeCatalog::default()).unwrap();
        assert_eq!(layout.segments().len(), 7);
        assert!((layout.segment_angle() - 51.428_57).abs() < 0.001);

        let third = &layout.segments()[3];
        assert_eq!(third.prize_id, "try_again");
        assert!((third.center_angle - 3.5 * 360.0 / 7.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = WheelLayout::compute(&PrizeCatalog::new(vec![])).unwrap_err();
        assert_eq!(err, WheelError::EmptyCatalog);
    }

    #[test]
    fn test_unknown_prize() {
        let layout = WheelLayout::compute(&catalog_of(4)).unwrap();
        assert!(matches!(
            layout.segment_for("missing"),
            Err(WheelError::UnknownPrize { .. })
        ));
    }

    #[test]
    fn test_pointer_reads_aligned_segment() {
        let layout = WheelLayout::compute(&catalog_of(6)).unwrap();
        for segment in layout.segments() {
            let rotation = segment.pointer_angle() + 360.0 * 4.0;
            assert_eq!(layout.segment_under_pointer(rotation).index, segment.index);
        }
    }

    #[test]
    fn test_last_segment_closes_circle() {
        let layout = WheelLayout::compute(&PrizeCatalog::default()).unwrap();
        let last = &layout.segments()[6];
        assert_eq!(last.end_angle, 360.0);
        assert!(last.contains_angle(359.999_98));
        for pair in layout.segments().windows(2) {
            assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
    }

    #[test]
    fn test_contains_angle_wraps() {
        let layout = WheelLayout::compute(&catalog_of(4)).unwrap();
        let first = &layout.segments()[0];
        assert!(first.contains_angle(0.0));
        assert!(first.contains_angle(360.0 + 45.0));
        assert!(!first.contains_angle(90.0));
        assert!(layout.segments()[3].contains_angle(-10.0));
    }

    proptest! {
        #[test]
        fn segments_partition_full_circle(n in 1usize..40) {
            let layout = WheelLayout::compute(&catalog_of(n)).unwrap();
            let segments = layout.segments();
            prop_assert_eq!(segments.len(), n);
            prop_assert_eq!(segments[0].start_angle, 0.0);
            prop_assert_eq!(segments[n - 1].end_angle, 360.0);
            for (i, pair) in segments.windows(2).enumerate() {
                prop_assert_eq!(pair[0].end_angle, pair[1].start_angle);
                prop_assert_eq!(pair[0].index, i);
            }
            for (segment, prize) in segments.iter().zip(layout_catalog_ids(n)) {
                prop_assert_eq!(&segment.prize_id, &prize);
                prop_assert!((segment.center_angle - (segment.start_angle + segment.span() / 2.0)).abs() < 1e-3);
            }
        }

        #[test]
        fn every_angle_has_exactly_one_segment(n in 1usize..40, angle in 0.0f32..360.0) {
            let layout = WheelLayout::compute(&catalog_of(n)).unwrap();
            let owners = layout.segments().iter().filter(|s| s.contains_angle(angle)).count();
            prop_assert_eq!(owners, 1);
            let under = layout.segment_under_pointer(-angle);
            prop_assert!(under.contains_angle(angle));
        }

        #[test]
        fn layout_is_deterministic(n in 1usize..40) {
            let a = WheelLayout::compute(&catalog_of(n)).unwrap();
            let b = WheelLayout::compute(&catalog_of(n)).unwrap();
            prop_assert_eq!(a, b);
        }
    }

    fn layout_catalog_ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("p{i}")).collect()
    }
}
