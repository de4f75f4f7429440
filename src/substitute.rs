//! Literal token substitution over raw byte buffers
//!
//! The target is always matched literally, never as a pattern, and content
//! does not need to be valid UTF-8. Preparing a target cannot fail.

use memchr::memmem::Finder;

/// A target token prepared once, reusable across many replacements.
#[derive(Debug, Clone)]
pub struct Substitutor {
    target: String,
    finder: Option<Finder<'static>>,
}

impl Substitutor {
    /// Prepare a literal target. An empty target matches nothing.
    pub fn new(target: &str) -> Self {
        let finder = if target.is_empty() {
            None
        } else {
            Some(Finder::new(target.as_bytes()).into_owned())
        };
        Self { target: target.to_string(), finder }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Replace every non-overlapping occurrence, scanning left to right.
    ///
    /// Always returns a fresh buffer, even when nothing matched.
    pub fn apply(&self, content: &[u8], replacement: &str) -> Vec<u8> {
        let Some(finder) = &self.finder else {
            return content.to_vec();
        };

        let needle_len = finder.needle().len();
        let mut out = Vec::with_capacity(content.len());
        let mut last = 0;
        for start in finder.find_iter(content) {
            out.extend_from_slice(&content[last..start]);
            out.extend_from_slice(replacement.as_bytes());
            last = start + needle_len;
        }
        out.extend_from_slice(&content[last..]);
        out
    }
}

/// Replace every literal `target` in `content` with `replacement`.
pub fn substitute(content: &[u8], target: &str, replacement: &str) -> Vec<u8> {
    Substitutor::new(target).apply(content, replacement)
}
