/// Maximum length of the free-text details field, in Unicode codepoints.
/// Enforced server-side regardless of what the dialog already capped.
pub const MAX_DETAILS_CODEPOINTS: usize = 1000;

/// Client-side cap for the "something else" elaboration.
pub const MAX_SOMETHING_ELSE_CODEPOINTS: usize = 200;

/// Remaining-codepoint counter becomes visible once this fraction of the
/// limit is left. Keeps the counter out of the way for short inputs.
pub const CHAR_COUNT_VISIBLE_FRACTION: f64 = 0.10;

/// Debounce window for username suggestion lookups, in milliseconds.
pub const USERNAME_LOOKUP_DEBOUNCE_MS: u64 = 100;

/// Maximum number of username suggestions surfaced to the reporter.
pub const MAX_USERNAME_SUGGESTIONS: usize = 10;

// =============================================================================
// BEHAVIOR CATALOG
// =============================================================================

/// The "something else" catalog entry. Carries a free-text elaboration and is
/// replaced by it when a notification is rendered.
pub const BEHAVIOR_SOMETHING_ELSE: &str = "something-else";

/// Fixed catalog of unacceptable-behavior categories.
pub const BEHAVIOR_CATALOG: &[&str] = &[
    "doxing",
    "hate-speech",
    "intimidation",
    "sexual-harassment",
    "spam",
    "trolling",
    BEHAVIOR_SOMETHING_ELSE,
];

/// Thread identifiers with this prefix denote a topic heading rather than an
/// individual comment.
pub const TOPIC_THREAD_PREFIX: &str = "h-";
