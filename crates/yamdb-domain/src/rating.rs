//! Title rating: the rounded mean of review scores.

/// Aggregated review scores for one title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTotals {
    pub sum: i64,
    pub count: i64,
}

impl ScoreTotals {
    pub fn rating(self) -> i64 {
        rating_from_totals(self.sum, self.count)
    }
}

/// Mean score rounded half-to-even. Titles without reviews rate 0.
///
/// Integer arithmetic only; scores are small positive integers so the
/// quotient never needs floating point.
pub fn rating_from_totals(sum: i64, count: i64) -> i64 {
    if count <= 0 {
        return 0;
    }
    let q = sum.div_euclid(count);
    let r = sum.rem_euclid(count);
    match (2 * r).cmp(&count) {
        std::cmp::Ordering::Less => q,
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => q + (q & 1),
    }
}

pub fn rating_from_scores(scores: &[i16]) -> i64 {
    let sum = scores.iter().map(|&s| i64::from(s)).sum();
    rating_from_totals(sum, scores.len() as i64)
}
