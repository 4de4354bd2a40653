//! Signal filters
//!
//! Two independent, order-preserving filters:
//! - Source allow-list (exact membership; an empty list keeps everything)
//! - Content pattern (search semantics: any matching substring keeps the record)
//!
//! Patterns support look-around and back-references in addition to the usual
//! regex syntax.

use std::collections::HashSet;

use fancy_regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::Signal;

/// Errors from pattern filtering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid regular expression: {0}")]
    InvalidPattern(String),
}

/// Bitmask controlling pattern matching.
///
/// Bit values follow the widely used regex flag convention so existing
/// callers can pass their masks unchanged.
///
/// ASCII (256) and LOCALE (4) are rejected rather than ignored: content is
/// always matched as Unicode text, and silently keeping Unicode `\w`, `\d`
/// and `\s` would change which signals a caller's pattern keeps. Spell ASCII
/// classes out instead (`[A-Za-z0-9_]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternFlags(u32);

impl PatternFlags {
    pub const NONE: PatternFlags = PatternFlags(0);
    pub const IGNORECASE: PatternFlags = PatternFlags(2);
    pub const MULTILINE: PatternFlags = PatternFlags(8);
    pub const DOTALL: PatternFlags = PatternFlags(16);
    /// Unicode-aware matching; always on
    pub const UNICODE: PatternFlags = PatternFlags(32);
    pub const VERBOSE: PatternFlags = PatternFlags(64);

    const SUPPORTED: u32 = 2 | 8 | 16 | 32 | 64;

    /// Parse a caller-supplied mask, rejecting unknown bits
    pub fn from_bits(bits: i64) -> Result<Self, FilterError> {
        let bits = u32::try_from(bits)
            .map_err(|_| FilterError::InvalidPattern(format!("invalid flags value {}", bits)))?;

        let unsupported = bits & !Self::SUPPORTED;
        if unsupported != 0 {
            return Err(FilterError::InvalidPattern(format!(
                "unsupported flag bits 0x{:x}",
                unsupported
            )));
        }

        Ok(Self(bits))
    }

    pub fn contains(self, other: PatternFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Inline group enabling these flags, e.g. `(?im)`; empty when none are set
    fn inline_prefix(self) -> String {
        let letters: String = [
            (PatternFlags::IGNORECASE, 'i'),
            (PatternFlags::MULTILINE, 'm'),
            (PatternFlags::DOTALL, 's'),
            (PatternFlags::VERBOSE, 'x'),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, letter)| *letter)
        .collect();

        if letters.is_empty() {
            letters
        } else {
            format!("(?{})", letters)
        }
    }
}

/// Keep signals whose source is in the allow-list.
///
/// An empty allow-list means no filtering, not "reject everything".
pub fn filter_by_source(signals: &[Signal], allowed_sources: &[String]) -> Vec<Signal> {
    if allowed_sources.is_empty() {
        return signals.to_vec();
    }

    let allowed: HashSet<&str> = allowed_sources.iter().map(String::as_str).collect();
    let kept: Vec<Signal> = signals
        .iter()
        .filter(|s| allowed.contains(s.source.as_str()))
        .cloned()
        .collect();

    debug!("Source filter kept {} of {} signals", kept.len(), signals.len());
    kept
}

/// Compile a pattern with the given flags
pub fn compile_pattern(pattern: &str, flags: PatternFlags) -> Result<Regex, FilterError> {
    let full = format!("{}{}", flags.inline_prefix(), pattern);
    Regex::new(&full).map_err(|e| FilterError::InvalidPattern(e.to_string()))
}

/// Keep signals whose content contains a match for `pattern`.
///
/// The pattern is compiled once per call.
pub fn filter_by_pattern(
    signals: &[Signal],
    pattern: &str,
    flags: PatternFlags,
) -> Result<Vec<Signal>, FilterError> {
    let regex = compile_pattern(pattern, flags)?;

    let mut kept = Vec::new();
    for signal in signals {
        // Only pathological patterns (backtrack limit) fail at match time
        let matched = regex.is_match(&signal.content).map_err(|e| {
            FilterError::InvalidPattern(format!("pattern could not be evaluated: {}", e))
        })?;
        if matched {
            kept.push(signal.clone());
        }
    }

    debug!("Pattern filter kept {} of {} signals", kept.len(), signals.len());
    Ok(kept)
}
