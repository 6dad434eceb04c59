/// Confidence assigned when nothing at all could be matched.
pub const FALLBACK_BASE_CONFIDENCE: f64 = 0.3;
/// Added per matched field.
pub const FALLBACK_FIELD_WEIGHT: f64 = 0.1;
/// Local heuristics never claim more certainty than this.
pub const FALLBACK_MAX_CONFIDENCE: f64 = 0.85;

/// Confidence of a heuristic extraction that matched `fields_found` fields.
///
/// `min(0.85, 0.3 + 0.1 × fields_found)` — monotonically non-decreasing in
/// `fields_found`.
pub fn fallback_confidence(fields_found: usize) -> f64 {
    (FALLBACK_BASE_CONFIDENCE + FALLBACK_FIELD_WEIGHT * fields_found as f64)
        .min(FALLBACK_MAX_CONFIDENCE)
}

/// Clamps a confidence reported by the AI backend into [0, 1].
/// NaN is treated as no confidence at all.
pub fn normalize_reported_confidence(reported: f64) -> f64 {
    if reported.is_nan() {
        return 0.0;
    }
    reported.clamp(0.0, 1.0)
}
