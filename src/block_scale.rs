use std::time::Duration;

use ratatui::style::Color;

use crate::ping::Sample;

/// Bar symbols in ascending intensity.
pub const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Shaded symbols; the first one marks a failed probe.
pub const SHADED_BLOCKS: [char; 4] = ['░', '▒', '▓', '█'];

pub const FAILURE_SYMBOL: char = SHADED_BLOCKS[0];

const THRESHOLDS: [Duration; 8] = [
    Duration::from_millis(50),
    Duration::from_millis(100),
    Duration::from_millis(150),
    Duration::from_millis(200),
    Duration::from_millis(250),
    Duration::from_millis(300),
    Duration::from_millis(350),
    Duration::from_millis(400),
];

/// Intensity index of a sample, `None` for failures.
///
/// The index is that of the first threshold the RTT does not exceed;
/// anything past the last threshold saturates at the top bar.
pub fn level(sample: Sample) -> Option<usize> {
    let rtt = sample.rtt()?;
    let idx = THRESHOLDS
        .iter()
        .position(|threshold| rtt <= *threshold)
        .unwrap_or(BARS.len() - 1);
    Some(idx)
}

pub fn classify(sample: Sample) -> char {
    match level(sample) {
        Some(idx) => BARS[idx],
        None => FAILURE_SYMBOL,
    }
}

pub fn color(sample: Sample) -> Color {
    match level(sample) {
        Some(0..=1) => Color::Green,
        Some(2..=4) => Color::Yellow,
        Some(_) => Color::Red,
        None => Color::DarkGray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Sample {
        Sample::Reply(Duration::from_millis(v))
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(classify(ms(0)), '▁');
        assert_eq!(classify(ms(50)), '▁');
        assert_eq!(classify(ms(51)), '▂');
        assert_eq!(classify(ms(100)), '▂');
        assert_eq!(classify(ms(399)), '█');
        assert_eq!(classify(ms(400)), '█');
    }

    #[test]
    fn long_rtts_saturate() {
        let top = classify(ms(400));
        for v in [401, 500, 1_000, 60_000] {
            assert_eq!(classify(ms(v)), top);
        }
        assert_eq!(classify(Sample::Reply(Duration::MAX)), top);
    }

    #[test]
    fn intensity_never_decreases() {
        let mut prev = 0;
        for v in (0..=1_000).step_by(5) {
            let idx = level(ms(v)).unwrap();
            assert!(idx >= prev, "level dropped at {v}ms");
            prev = idx;
        }
    }

    #[test]
    fn failure_uses_shaded_symbol() {
        assert_eq!(classify(Sample::Failed), '░');
        assert!(!BARS.contains(&classify(Sample::Failed)));
        assert_eq!(level(Sample::Failed), None);
        assert_eq!(color(Sample::Failed), Color::DarkGray);
    }

    #[test]
    fn sub_millisecond_rtt_is_lowest_bar() {
        assert_eq!(classify(Sample::Reply(Duration::from_micros(300))), BARS[0]);
        assert_eq!(color(ms(10)), Color::Green);
        assert_eq!(color(ms(700)), Color::Red);
    }
}
