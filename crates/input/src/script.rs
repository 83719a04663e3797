use std::collections::VecDeque;
use std::str::FromStr;

use crate::InputError;
use crate::bindings::Key;

/// One scripted key press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptEntry {
    /// Seconds since the start of the run.
    pub at: f64,
    pub key: Key,
}

/// Timed key presses for headless runs, e.g. `"0:space 0.4:right 1.2:up"`.
///
/// Entries are separated by whitespace or commas, each `seconds:key`.
/// Presses are replayed in time order; equal times keep their written order.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    pending: VecDeque<ScriptEntry>,
}

impl InputScript {
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let mut entries = Vec::new();
        for token in text.split(|c: char| c.is_whitespace() || c == ',') {
            if token.is_empty() {
                continue;
            }
            let (time, key) = token
                .split_once(':')
                .ok_or_else(|| InputError::MissingSeparator(token.to_string()))?;
            let at: f64 = time
                .parse()
                .map_err(|_| InputError::BadTime(token.to_string()))?;
            if !(at.is_finite() && at >= 0.0) {
                return Err(InputError::BadTime(token.to_string()));
            }
            entries.push(ScriptEntry {
                at,
                key: key.parse()?,
            });
        }
        entries.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(Self {
            pending: entries.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every press scheduled at or before `now`.
    pub fn due(&mut self, now: f64) -> Vec<Key> {
        let mut keys = Vec::new();
        while let Some(entry) = self.pending.front() {
            if entry.at > now {
                break;
            }
            keys.push(entry.key);
            self.pending.pop_front();
        }
        keys
    }
}

impl FromStr for InputScript {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
