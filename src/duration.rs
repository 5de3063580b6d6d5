/*
Duration codec.
Tasks carry their time budgets as "HH:MM:SS" text on the wire and in db.json,
but every calculation is done on whole seconds.
*/

use std::fmt;

use serde::{Deserialize, Serialize};

// Whole seconds, rendered as HH:MM:SS.
//     Deserialization is lenient: anything `parse` rejects becomes zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Hms(pub u64);

impl Hms {
    pub const ZERO: Hms = Hms(0);

    pub fn secs(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<String> for Hms {
    fn from(text: String) -> Self {
        Hms(parse(&text))
    }
}

impl From<Hms> for String {
    fn from(d: Hms) -> Self {
        format(d.0)
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self.0))
    }
}

// Parse "H:MM:SS" or "H:MM" into seconds.
//
// Rules:
// - hour segment is one or more digits
// - minute / second segments are exactly two digits in 00..=59
// - anything else (including empty input) -> 0
pub fn parse(text: &str) -> u64 {
    let parts: Vec<&str> = text.trim().split(':').collect();
    let (h, m, s) = match parts.as_slice() {
        [h, m, s] => (*h, *m, Some(*s)),
        [h, m] => (*h, *m, None),
        _ => return 0,
    };

    let Some(hours) = digits(h, None) else { return 0 };
    let Some(minutes) = sexagesimal(m) else { return 0 };
    let seconds = match s {
        Some(s) => match sexagesimal(s) {
            Some(v) => v,
            None => return 0,
        },
        None => 0,
    };

    hours
        .checked_mul(3600)
        .and_then(|v| v.checked_add(minutes * 60 + seconds))
        .unwrap_or(0)
}

// Format seconds as zero-padded "HH:MM:SS".
//     Hours grow past two digits when needed.
pub fn format(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

// Boundary check applied to user input before it reaches the engine.
//     Pattern: \d{1,2}:[0-5]\d:[0-5]\d
pub fn is_well_formed(text: &str) -> bool {
    let parts: Vec<&str> = text.split(':').collect();
    match parts.as_slice() {
        [h, m, s] => {
            (1..=2).contains(&h.len())
                && digits(h, None).is_some()
                && sexagesimal(m).is_some()
                && sexagesimal(s).is_some()
        }
        _ => false,
    }
}

fn digits(segment: &str, exact_len: Option<usize>) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(len) = exact_len {
        if segment.len() != len {
            return None;
        }
    }
    segment.parse().ok()
}

fn sexagesimal(segment: &str) -> Option<u64> {
    digits(segment, Some(2)).filter(|v| *v < 60)
}
