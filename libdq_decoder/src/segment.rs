use std::ops::Range;

use bitvec::slice::BitSlice;
use ndarray::{s, ArrayView1};
use serde::{Deserialize, Serialize};

use super::error::DecodeError;

/// A half-open span of GPS time `[start, end)` during which a condition held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Segment {
    pub start: i64,
    pub end: i64,
}

impl Segment {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Length of the segment in seconds. A reversed segment has no length.
    pub fn duration(&self) -> u64 {
        u64::try_from(self.end - self.start).unwrap_or(0)
    }

    pub fn contains(&self, gps_time: i64) -> bool {
        self.start <= gps_time && gps_time < self.end
    }

    /// Convert the segment into an index range of a series which starts at `series_start`
    /// and is sampled `samples_per_second` times a second.
    ///
    /// The strain channel is typically sampled at 4096 Hz while the mask is sampled at 1 Hz, so
    /// the ratio of the two must be supplied by the caller.
    pub fn sample_range(
        &self,
        series_start: i64,
        samples_per_second: u32,
    ) -> Result<Range<usize>, DecodeError> {
        if samples_per_second == 0 {
            return Err(DecodeError::ZeroSampleRate);
        }
        if self.start < series_start || self.end < self.start {
            return Err(DecodeError::SegmentOutsideSeries(self.start, self.end));
        }
        let rate = samples_per_second as usize;
        let first = (self.start - series_start) as usize * rate;
        let last = (self.end - series_start) as usize * rate;
        Ok(first..last)
    }
}

/// Iterator over the maximal runs of `true` in a boolean series.
///
/// Runs are discovered in index order with a single forward scan, so they come out sorted,
/// disjoint and already maximal. The iterator borrows the series; make a new one to start over.
#[derive(Debug, Clone)]
pub struct SegmentIter<'a> {
    series: &'a BitSlice,
    start_time: i64,
    position: usize,
}

impl Iterator for SegmentIter<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = &self.series[self.position..];
        let run_start = self.position + remaining.first_one()?;
        let run_end = match self.series[run_start..].first_zero() {
            Some(offset) => run_start + offset,
            None => self.series.len(),
        };
        self.position = run_end;
        Some(Segment::new(
            self.start_time + run_start as i64,
            self.start_time + run_end as i64,
        ))
    }
}

/// Find every maximal good-time segment in `series`, where index 0 is at `start_time`.
pub fn extract_segments(series: &BitSlice, start_time: i64) -> SegmentIter<'_> {
    SegmentIter {
        series,
        start_time,
        position: 0,
    }
}

/// Total number of seconds covered by a set of segments
pub fn livetime(segments: &[Segment]) -> u64 {
    segments.iter().map(Segment::duration).sum()
}

/// Slice a higher rate series (typically strain) down to the parts covered by segments
pub fn gate_strain<'a>(
    strain: &'a ArrayView1<'a, f64>,
    segments: &[Segment],
    series_start: i64,
    samples_per_second: u32,
) -> Result<Vec<ArrayView1<'a, f64>>, DecodeError> {
    let mut slices = Vec::with_capacity(segments.len());
    for segment in segments {
        let range = segment.sample_range(series_start, samples_per_second)?;
        if range.end > strain.len() {
            return Err(DecodeError::SegmentOutsideSeries(segment.start, segment.end));
        }
        slices.push(strain.slice(s![range]));
    }
    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;
    use ndarray::Array1;

    #[test]
    fn test_all_false() {
        let series = bitvec![0; 64];
        assert_eq!(extract_segments(&series, 0).count(), 0);
    }

    #[test]
    fn test_empty_series() {
        let series = BitVec::<usize, Lsb0>::new();
        assert_eq!(extract_segments(&series, 10).next(), None);
    }

    #[test]
    fn test_all_true() {
        let series = bitvec![1; 100];
        let segments: Vec<Segment> = extract_segments(&series, 1000).collect();
        assert_eq!(segments, vec![Segment::new(1000, 1100)]);
    }

    #[test]
    fn test_single_interior_run() {
        let series = bitvec![0, 1, 1, 1, 0];
        let segments: Vec<Segment> = extract_segments(&series, 100).collect();
        assert_eq!(segments, vec![Segment::new(101, 104)]);
    }

    #[test]
    fn test_runs_touching_both_edges() {
        let series = bitvec![1, 0, 0, 1, 1];
        let segments: Vec<Segment> = extract_segments(&series, 500).collect();
        assert_eq!(segments, vec![Segment::new(500, 501), Segment::new(503, 505)]);
    }

    #[test]
    fn test_coverage_and_maximality() {
        // Cross a word boundary with an irregular pattern
        let mut series = BitVec::<usize, Lsb0>::new();
        for idx in 0..300usize {
            series.push(idx % 7 != 0 && idx % 11 != 3 && !(130..190).contains(&idx));
        }
        let start = 1_126_259_446;
        let segments: Vec<Segment> = extract_segments(&series, start).collect();

        let mut covered = bitvec![0; series.len()];
        for segment in segments.iter() {
            assert!(segment.end > segment.start);
            for t in segment.start..segment.end {
                let idx = (t - start) as usize;
                assert!(!covered[idx]);
                covered.set(idx, true);
            }
        }
        assert_eq!(covered, series);

        for pair in segments.windows(2) {
            assert!(pair[0].end < pair[1].start);
            assert!(!series[(pair[0].end - start) as usize]);
        }
    }

    #[test]
    fn test_iter_restart() {
        let series = bitvec![1, 1, 0, 1];
        let first: Vec<Segment> = extract_segments(&series, 0).collect();
        let second: Vec<Segment> = extract_segments(&series, 0).collect();
        assert_eq!(first, second);
        assert_eq!(livetime(&first), 3);
    }

    #[test]
    fn test_sample_range() {
        let segment = Segment::new(103, 105);
        assert_eq!(segment.sample_range(100, 4096).unwrap(), 12288..20480);
        assert_eq!(
            segment.sample_range(104, 4096),
            Err(DecodeError::SegmentOutsideSeries(103, 105))
        );
        assert_eq!(
            segment.sample_range(100, 0),
            Err(DecodeError::ZeroSampleRate)
        );
        assert!(segment.contains(104));
        assert!(!segment.contains(105));
        assert_eq!(segment.duration(), 2);
    }

    #[test]
    fn test_reversed_segment_duration() {
        let reversed = Segment::new(10, 5);
        assert_eq!(reversed.duration(), 0);
        assert_eq!(
            reversed.sample_range(0, 16),
            Err(DecodeError::SegmentOutsideSeries(10, 5))
        );
        assert_eq!(livetime(&[reversed, Segment::new(20, 23)]), 3);
    }

    #[test]
    fn test_gate_strain() {
        let strain = Array1::<f64>::from_iter((0..40).map(|x| x as f64));
        let view = strain.view();
        let segments = vec![Segment::new(10, 11), Segment::new(13, 15)];
        let slices = gate_strain(&view, &segments, 10, 8).unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].len(), 8);
        assert_eq!(slices[1].len(), 16);
        assert_eq!(slices[1][0], 24.0);

        assert_eq!(
            gate_strain(&view, &segments, 10, 0),
            Err(DecodeError::ZeroSampleRate)
        );

        let too_long = vec![Segment::new(13, 16)];
        assert_eq!(
            gate_strain(&view, &too_long, 10, 8),
            Err(DecodeError::SegmentOutsideSeries(13, 16))
        );
    }
}
