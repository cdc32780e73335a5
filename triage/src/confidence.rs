//! Response confidence heuristic.

use triage_types::ConfidenceConfig;

/// Keywords whose presence suggests the response engaged with the clinical
/// request rather than deflecting.
const CLINICAL_KEYWORDS: &[&str] = &[
    "patient",
    "assessment",
    "medication",
    "vitals",
    "plan",
    "risk",
    "diagnosis",
    "intervention",
    "allergies",
];

/// Score a response in `[0, 1]`.
///
/// Starts from the configured base, adds length bonuses (both thresholds
/// can stack) and a keyword bonus, and clamps the sum. A heuristic quality
/// estimate only, not a statistical guarantee.
pub(crate) fn score(cfg: &ConfidenceConfig, text: &str) -> f64 {
    let mut score = cfg.base;
    let len = text.chars().count();
    if len >= cfg.short_threshold {
        score += cfg.short_bonus;
    }
    if len >= cfg.long_threshold {
        score += cfg.long_bonus;
    }
    let lower = text.to_lowercase();
    if CLINICAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        score += cfg.keyword_bonus;
    }
    score.clamp(0.0, 1.0)
}
