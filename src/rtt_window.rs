use crate::ping::Sample;

pub const DEFAULT_CHART_WIDTH: usize = 25;

/// Every sample of the session, in arrival order.
///
/// Storage is unbounded; the chart only ever looks at a trailing window.
#[derive(Debug, Clone, Default)]
pub struct RttWindow {
    samples: Vec<Sample>,
}

impl RttWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// The last `width` samples, or all of them when there are fewer.
    pub fn windowed(&self, width: usize) -> &[Sample] {
        let start = self.samples.len().saturating_sub(width);
        &self.samples[start..]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<Sample> {
        self.samples.last().copied()
    }
}
