//! Discrete action selection from action scores.

/// Returns the index of the highest score.
///
/// Ties resolve to the lowest index. NaN scores are never selected unless every
/// score is NaN, in which case index 0 is returned. Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// use antnest_network::action::argmax;
///
/// assert_eq!(argmax(&[0.1, 0.7, -0.2, 0.7]), Some(1));
/// assert_eq!(argmax(&[]), None);
/// ```
#[must_use]
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let (first, rest) = scores.split_first()?;
    let mut best = 0;
    let mut best_score = *first;
    for (i, &score) in rest.iter().enumerate() {
        if !score.is_nan() && (best_score.is_nan() || score > best_score) {
            best = i + 1;
            best_score = score;
        }
    }
    Some(best)
}
