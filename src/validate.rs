//! Format validation strategies keyed by `ConfigFormat`.
//!
//! One pure function per format, dispatched by enum variant. No I/O and no
//! side effects: identical bytes always yield the identical outcome, which
//! is what makes repeated runs comparable.

use crate::models::{ConfigFormat, ValidationOutcome};

/// Validate a byte buffer against its declared format.
///
/// - `Json`/`Toml`: parse with the standard parser; any parse error becomes
///   `Invalid` carrying the parser's message. Empty (or whitespace-only)
///   input is `Invalid("empty document")`.
/// - `Opaque`: always `Skipped`, no inspection performed.
pub fn validate(bytes: &[u8], format: ConfigFormat) -> ValidationOutcome {
    match format {
        ConfigFormat::Opaque => ValidationOutcome::Skipped,
        ConfigFormat::Json => validate_text(bytes, |s| {
            serde_json::from_str::<serde_json::Value>(s)
                .map(|_| ())
                .map_err(|e| e.to_string())
        }),
        ConfigFormat::Toml => validate_text(bytes, |s| {
            toml::from_str::<toml::Value>(s)
                .map(|_| ())
                .map_err(|e| e.to_string())
        }),
    }
}

fn validate_text(bytes: &[u8], parse: impl Fn(&str) -> Result<(), String>) -> ValidationOutcome {
    let s = match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => return ValidationOutcome::Invalid(format!("not valid UTF-8: {}", e)),
    };
    if s.trim().is_empty() {
        return ValidationOutcome::Invalid("empty document".to_string());
    }
    match parse(s) {
        Ok(()) => ValidationOutcome::Valid,
        Err(msg) => ValidationOutcome::Invalid(msg),
    }
}
