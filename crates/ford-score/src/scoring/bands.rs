use super::catalog::{ScoreBand, MAX_SCORE, MIN_SCORE};

pub(crate) fn clamp_score(raw_score: i32) -> i32 {
    raw_score.clamp(MIN_SCORE, MAX_SCORE)
}

/// First band, scanning upward, whose `max_score` covers `score`.
pub(crate) fn select_band(bands: &[ScoreBand], score: i32) -> Option<&ScoreBand> {
    bands.iter().find(|band| score <= band.max_score)
}

/// Pairs each band with its inclusive lower bound (previous max + 1, starting at the minimum score).
pub(crate) fn band_ranges(bands: &[ScoreBand]) -> Vec<(i32, &ScoreBand)> {
    let mut low = MIN_SCORE;
    let mut ranges = Vec::with_capacity(bands.len());
    for band in bands {
        ranges.push((low, band));
        low = band.max_score + 1;
    }
    ranges
}
