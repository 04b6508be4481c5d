//! Bounded retry loops expressed as values.

use crate::foundation::error::StoryreelResult;

/// How many times to try an operation and what counts as an acceptable result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Smallest result size (e.g. transcript word count) accepted without retrying.
    pub min_words: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_words: 1,
        }
    }
}

/// What a [`RetryPolicy`] run ended with.
#[derive(Clone, Debug, PartialEq)]
pub enum RetryOutcome<T> {
    /// An attempt produced an acceptable value.
    Accepted {
        /// The accepted value.
        value: T,
        /// 1-based attempt that produced it.
        attempts: u32,
    },
    /// Every attempt failed or fell short.
    Exhausted {
        /// Largest value seen, if any attempt succeeded at all.
        best: Option<T>,
        /// Attempts made.
        attempts: u32,
        /// Message of the most recent error.
        last_error: Option<String>,
    },
}

impl<T> RetryOutcome<T> {
    /// The accepted value, or the best short result.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Accepted { value, .. } => Some(value),
            Self::Exhausted { best, .. } => best,
        }
    }

    /// Number of attempts made.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Accepted { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// `true` if an attempt met the policy.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl RetryPolicy {
    /// Run `attempt` until `size(&value) >= min_words` or attempts run out.
    ///
    /// Errors from an attempt are recorded and count as a failed try.
    pub fn run<T>(
        &self,
        mut attempt: impl FnMut(u32) -> StoryreelResult<T>,
        size: impl Fn(&T) -> usize,
    ) -> RetryOutcome<T> {
        let max = self.max_attempts.max(1);
        let mut best: Option<(usize, T)> = None;
        let mut last_error = None;

        for n in 1..=max {
            match attempt(n) {
                Ok(value) => {
                    let got = size(&value);
                    if got >= self.min_words {
                        return RetryOutcome::Accepted { value, attempts: n };
                    }
                    tracing::warn!(attempt = n, got, want = self.min_words, "result too small, retrying");
                    if best.as_ref().is_none_or(|(b, _)| got > *b) {
                        best = Some((got, value));
                    }
                }
                Err(e) => {
                    tracing::warn!(attempt = n, error = %e, "attempt failed");
                    last_error = Some(e.to_string());
                }
            }
        }

        RetryOutcome::Exhausted {
            best: best.map(|(_, v)| v),
            attempts: max,
            last_error,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/retry.rs"]
mod tests;
