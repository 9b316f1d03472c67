use crate::model::Amount;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const HALF: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Fixed-width binning of a set of amounts.
///
/// Bins are half-open `[edge, edge + size)` except the last, which also holds the maximum. When
/// every value is the same, or the values are too close together to split, the bins span one unit
/// centred on the smallest value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    start: Amount,
    size: Amount,
    counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[Amount], bins: usize) -> Self {
        let bins = bins.max(1);
        let min = values.iter().min().copied();
        let max = values.iter().max().copied();
        let count = Decimal::from(bins);

        // A range too narrow to split into `bins` representable widths is treated like a single
        // value.
        let spread = match (min, max) {
            (Some(min), Some(max)) if min < max => {
                // Divided first so that wide ranges stay representable.
                (max.value() / count)
                    .checked_sub(min.value() / count)
                    .filter(|size| !size.is_zero())
                    .map(|size| (min.value(), size))
            }
            _ => None,
        };
        let (start, size) = spread.unwrap_or_else(|| {
            let center = min.map(|m| m.value()).unwrap_or(HALF);
            (center.saturating_sub(HALF), Decimal::ONE / count)
        });

        let mut counts = vec![0usize; bins];
        for value in values {
            let ix = value
                .value()
                .checked_sub(start)
                .and_then(|offset| offset.checked_div(size))
                .and_then(|ix| ix.floor().to_usize())
                .unwrap_or(bins - 1)
                .min(bins - 1);
            counts[ix] += 1;
        }

        Self {
            start: Amount::new(start),
            size: Amount::new(size),
            counts,
        }
    }

    pub fn start(&self) -> Amount {
        self.start
    }

    /// The width of every bin.
    pub fn size(&self) -> Amount {
        self.size
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// The lower edge of bin `ix`.
    pub fn edge(&self, ix: usize) -> Amount {
        let offset = self.size.value().saturating_mul(Decimal::from(ix));
        Amount::new(self.start.value().saturating_add(offset))
    }

    /// The midpoint of every bin, where the bars are drawn.
    pub fn centers(&self) -> Vec<Amount> {
        let half = self.size.value() / Decimal::TWO;
        (0..self.counts.len())
            .map(|ix| Amount::new(self.edge(ix).value().saturating_add(half)))
            .collect()
    }

    /// A `low - high` label for every bin.
    pub fn ranges(&self) -> Vec<String> {
        (0..self.counts.len())
            .map(|ix| format!("{} - {}", self.edge(ix), self.edge(ix + 1)))
            .collect()
    }
}
