use crate::ir::Tick;

/// Fraction of the data span added on each side of an auto-scaled axis.
const AUTO_MARGIN: f64 = 0.05;

/// Upper bound on generated ticks per axis.
pub const MAX_TICKS: usize = 1000;

/// Data extent along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Extent {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Extent {
    pub fn include(&mut self, v: f64) {
        if v.is_finite() {
            if v < self.min {
                self.min = v;
            }
            if v > self.max {
                self.max = v;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Fit an axis range to the data the way an auto-scaling backend does.
///
/// The extent is padded by 5% on each side, except that a bar baseline at 0
/// is sticky: when the data stops exactly at 0 on one side, no margin is
/// added past it. A degenerate extent is widened by 1 on both sides.
pub fn auto_range(extent: Extent, bar_baseline: bool) -> (f64, f64) {
    if extent.is_empty() {
        return (0.0, 1.0);
    }
    let (min, max) = (extent.min, extent.max);
    if min == max {
        return (min - 1.0, max + 1.0);
    }

    let padding = (max - min) * AUTO_MARGIN;
    let lo = if bar_baseline && min == 0.0 { 0.0 } else { min - padding };
    let hi = if bar_baseline && max == 0.0 { 0.0 } else { max + padding };
    (lo, hi)
}

/// Horizontal range for `n` slots centred on 0..n-1.
///
/// `half_extent` is how far geometry reaches either side of a slot centre;
/// `margin` then adds that fraction of the occupied span on both sides.
pub fn x_range(n: usize, half_extent: f64, margin: f64) -> (f64, f64) {
    let first = -half_extent;
    let last = n.saturating_sub(1) as f64 + half_extent;
    let span = last - first;
    (first - margin * span, last + margin * span)
}

/// Major ticks at every multiple of `interval` inside `[min, max]`.
pub fn y_ticks(min: f64, max: f64, interval: f64) -> Vec<Tick> {
    if !(interval > 0.0) || !min.is_finite() || !max.is_finite() || min > max {
        return Vec::new();
    }

    // tolerate float noise at the range ends
    let eps = 1e-9;
    let first = (min / interval - eps).ceil() as i64;
    let last = (max / interval + eps).floor() as i64;
    if last < first {
        return Vec::new();
    }

    let count = (last - first + 1) as usize;
    if count > MAX_TICKS {
        log::warn!(
            "tick interval {} gives {} ticks over [{}, {}]; keeping the first {}",
            interval,
            count,
            min,
            max,
            MAX_TICKS
        );
    }

    (first..=last)
        .take(MAX_TICKS)
        .map(|k| {
            // normalise -0.0 so it prints as "0.0"
            let position = k as f64 * interval + 0.0;
            Tick {
                position,
                label: format!("{:.1}", position),
            }
        })
        .collect()
}

/// One tick per group slot, labelled with the group name.
pub fn category_ticks<'a, I>(labels: I) -> Vec<Tick>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| Tick {
            position: i as f64,
            label: label.to_string(),
        })
        .collect()
}
