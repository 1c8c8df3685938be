use std::cmp::Ordering;

/// Descending by score, ties broken by ascending id.
/// NaN scores compare as the lowest value.
#[inline]
pub fn by_score_desc_then_id(a: (&str, f64), b: (&str, f64)) -> Ordering {
    score_desc(a.1, b.1).then_with(|| a.0.cmp(b.0))
}

/// Descending by score only. Stable sorts keep insertion order on ties.
#[inline]
pub fn score_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}
