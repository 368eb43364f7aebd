//! Locating the JSON payload inside a free-form service reply.
//!
//! Strategies run in a fixed order and the first match wins:
//! 1. a fenced block tagged `json`
//! 2. any fenced block whose content looks like JSON
//! 3. the first balanced `{...}` span

pub mod patterns;

use tracing::debug;

use crate::error::ExtractionError;
use patterns::{ANY_FENCE, LEADING_FENCE, TAGGED_JSON_FENCE, TRAILING_FENCE};

/// Result type for JSON location.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// A single JSON location strategy.
pub trait JsonMatcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Return the candidate span, if this strategy matches.
    fn find<'a>(&self, text: &'a str) -> Option<&'a str>;
}

/// Fenced block explicitly tagged as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaggedFenceMatcher;

impl JsonMatcher for TaggedFenceMatcher {
    fn name(&self) -> &'static str {
        "tagged-fence"
    }

    fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        TAGGED_JSON_FENCE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Any fenced block, tagged or not, whose content opens like JSON.
///
/// Blocks holding prose or other code are skipped so a reply without any
/// JSON still reports [`ExtractionError::NoJsonFound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyFenceMatcher;

impl JsonMatcher for AnyFenceMatcher {
    fn name(&self) -> &'static str {
        "fence"
    }

    fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        ANY_FENCE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|content| {
                let content = content.trim_start();
                content.starts_with('{') || content.starts_with('[')
            })
    }
}

/// First top-level balanced `{...}` span.
///
/// Braces inside string literals are ignored. When the first `{` never
/// closes, the span up to the last `}` is returned so the parser can report
/// what is wrong with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedBraceMatcher;

impl JsonMatcher for BalancedBraceMatcher {
    fn name(&self) -> &'static str {
        "braces"
    }

    fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = text.find('{')?;

        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape = false;

        for (offset, c) in text[start..].char_indices() {
            if escape {
                escape = false;
                continue;
            }

            match c {
                '\\' if in_string => escape = true,
                '"' => in_string = !in_string,
                _ if in_string => {}
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..start + offset + 1]);
                    }
                }
                _ => {}
            }
        }

        let end = text.rfind('}')?;
        (end > start).then(|| &text[start..=end])
    }
}

/// Ordered chain of JSON matchers.
pub struct JsonLocator {
    matchers: Vec<Box<dyn JsonMatcher>>,
}

/// A located JSON candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedJson {
    /// Name of the strategy that matched.
    pub strategy: &'static str,
    /// Candidate JSON text, fences and surrounding whitespace removed.
    pub json: String,
}

impl Default for JsonLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonLocator {
    /// Locator with the standard strategy order.
    pub fn new() -> Self {
        Self::with_matchers(vec![
            Box::new(TaggedFenceMatcher),
            Box::new(AnyFenceMatcher),
            Box::new(BalancedBraceMatcher),
        ])
    }

    /// Locator with a custom strategy order.
    pub fn with_matchers(matchers: Vec<Box<dyn JsonMatcher>>) -> Self {
        Self { matchers }
    }

    /// Names of the strategies, in evaluation order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Find the JSON candidate in `reply`.
    pub fn locate(&self, reply: &str) -> Result<LocatedJson> {
        for matcher in &self.matchers {
            if let Some(span) = matcher.find(reply) {
                let json = strip_fences(span);
                if json.is_empty() {
                    continue;
                }

                debug!("Located JSON with {} strategy ({} chars)", matcher.name(), json.len());
                return Ok(LocatedJson {
                    strategy: matcher.name(),
                    json,
                });
            }
        }

        debug!("No JSON found in {} char reply", reply.len());
        Err(ExtractionError::NoJsonFound)
    }
}

/// Locate the JSON payload in `reply` with the standard strategy order.
pub fn locate_json(reply: &str) -> Result<String> {
    JsonLocator::new().locate(reply).map(|l| l.json)
}

/// Remove residual fence markers and surrounding whitespace.
fn strip_fences(span: &str) -> String {
    let without_leading = LEADING_FENCE.replace(span, "");
    let without_trailing = TRAILING_FENCE.replace(&without_leading, "");
    without_trailing.trim().to_string()
}
