use std::sync::atomic::{AtomicI64, Ordering};

/// Produces stored names of the form `<prefix>-<original-file-name>`.
///
/// The prefix is the current Unix time in milliseconds, bumped so that it is
/// strictly increasing within one process. Two uploads of `shoe.png` in the
/// same millisecond therefore still get different stored names.
#[derive(Debug, Default)]
pub struct StoredNameGenerator {
    last: AtomicI64,
}

impl StoredNameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next strictly increasing prefix.
    pub fn next_prefix(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(prev + 1)
    }

    /// Stored name for an uploaded file.
    pub fn stored_name(&self, original: &str) -> String {
        format!("{}-{}", self.next_prefix(), sanitize_file_name(original))
    }
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Directory parts are dropped, characters outside `[A-Za-z0-9._-]` become
/// `_`, and leading dots are stripped. An empty result becomes `upload`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
