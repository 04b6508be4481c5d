use std::path::Path;

use serde::Deserialize;

use crate::foundation::error::{StoryreelError, StoryreelResult};
use crate::retry::{RetryOutcome, RetryPolicy};

/// One spoken word and its time window in seconds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, Deserialize)]
pub struct WordToken {
    /// Word text, trimmed.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl WordToken {
    /// Create a token, rejecting non-finite or reversed times.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> StoryreelResult<Self> {
        let text = text.into();
        if !start.is_finite() || !end.is_finite() {
            return Err(StoryreelError::validation(format!(
                "word '{text}' has non-finite times"
            )));
        }
        if end < start {
            return Err(StoryreelError::validation(format!(
                "word '{text}' ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { text, start, end })
    }

    /// `end - start`.
    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }
}

/// Which clock transcript times were measured against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptTimebase {
    /// Times refer to the original narration and are divided by the tempo factor.
    #[default]
    Raw,
    /// Times already refer to the time-scaled narration.
    Scaled,
}

impl TranscriptTimebase {
    /// Map `words` onto the time-scaled narration clock.
    pub fn apply(self, words: Vec<WordToken>, tempo: f64) -> Vec<WordToken> {
        match self {
            Self::Scaled => words,
            Self::Raw => words
                .into_iter()
                .map(|w| WordToken {
                    start: w.start / tempo,
                    end: w.end / tempo,
                    text: w.text,
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptJson {
    Flat(Vec<RawWord>),
    Segmented { segments: Vec<RawSegment> },
}

#[derive(Deserialize)]
struct RawSegment {
    #[serde(default)]
    words: Vec<RawWord>,
}

#[derive(Deserialize)]
struct RawWord {
    #[serde(alias = "word")]
    text: String,
    start: f64,
    end: f64,
}

/// Parse a transcript from JSON text.
///
/// Accepts a flat array of `{text, start, end}` or `{"segments": [{"words": [...]}]}`.
pub fn parse_transcript(json: &str) -> StoryreelResult<Vec<WordToken>> {
    let parsed: TranscriptJson = serde_json::from_str(json)
        .map_err(|e| StoryreelError::validation(format!("invalid transcript json: {e}")))?;
    let raw = match parsed {
        TranscriptJson::Flat(words) => words,
        TranscriptJson::Segmented { segments } => {
            segments.into_iter().flat_map(|s| s.words).collect()
        }
    };
    normalize_words(
        raw.into_iter()
            .map(|w| WordToken::new(w.text.trim(), w.start, w.end))
            .collect::<StoryreelResult<Vec<_>>>()?,
    )
}

/// Read and parse a transcript file.
pub fn load_transcript(path: &Path) -> StoryreelResult<Vec<WordToken>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        StoryreelError::missing_asset(format!(
            "failed to read transcript '{}': {e}",
            path.display()
        ))
    })?;
    parse_transcript(&text)
}

/// Drop empty words, sort by start and pull overlapping starts forward to the previous end.
pub fn normalize_words(mut words: Vec<WordToken>) -> StoryreelResult<Vec<WordToken>> {
    words.retain(|w| !w.text.is_empty());
    words.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut prev_end = f64::NEG_INFINITY;
    for w in &mut words {
        if w.start < prev_end {
            w.start = prev_end;
            w.end = w.end.max(w.start);
        }
        prev_end = w.end;
    }
    Ok(words)
}

/// Runs an external speech-to-text command that prints transcript JSON on stdout.
///
/// `{audio}` in any argument is replaced by the audio path.
#[derive(Clone, Debug)]
pub struct CommandTranscriber {
    argv: Vec<String>,
}

impl CommandTranscriber {
    /// Build from an argv template.
    pub fn new(argv: Vec<String>) -> StoryreelResult<Self> {
        if argv.is_empty() || argv[0].trim().is_empty() {
            return Err(StoryreelError::validation(
                "transcriber command must not be empty",
            ));
        }
        Ok(Self { argv })
    }

    /// Resolved argv for `audio`.
    pub fn command_line(&self, audio: &Path) -> Vec<String> {
        let audio = audio.display().to_string();
        self.argv
            .iter()
            .map(|a| a.replace("{audio}", &audio))
            .collect()
    }

    /// Run once and parse the output.
    pub fn transcribe(&self, audio: &Path) -> StoryreelResult<Vec<WordToken>> {
        let argv = self.command_line(audio);
        let out = std::process::Command::new(&argv[0])
            .args(&argv[1..])
            .output()
            .map_err(|e| {
                StoryreelError::evaluation(format!("failed to run transcriber '{}': {e}", argv[0]))
            })?;
        if !out.status.success() {
            return Err(StoryreelError::evaluation(format!(
                "transcriber exited with status {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        parse_transcript(&String::from_utf8_lossy(&out.stdout))
    }

    /// Run under `policy`, retrying while fewer than `policy.min_words` words come back.
    #[tracing::instrument(skip(self, audio, policy), fields(audio = %audio.display()))]
    pub fn transcribe_with_retry(
        &self,
        audio: &Path,
        policy: &RetryPolicy,
    ) -> RetryOutcome<Vec<WordToken>> {
        policy.run(|_| self.transcribe(audio), Vec::len)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/transcript.rs"]
mod tests;
