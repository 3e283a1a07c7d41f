//! `KeyModifier`, `KeyChord`, `KeySequence` (§4.3) and their parser.
//!
//! Grounded on `par-term-keybindings::parser::parse_key_combo`'s shape
//! (split on a separator, classify each part as a modifier or the key,
//! reject a trailing bare modifier) — translated from winit's
//! `KeyCode`/`NamedKey` universe to the spec's flat canonical key-name
//! set, and from single chords to space-separated sequences.

use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyModifier {
    Ctrl,
    Shift,
    Alt,
    Meta,
}

impl KeyModifier {
    fn from_name(name: &str) -> Option<KeyModifier> {
        match name {
            "ctrl" => Some(KeyModifier::Ctrl),
            "shift" => Some(KeyModifier::Shift),
            "alt" => Some(KeyModifier::Alt),
            "meta" => Some(KeyModifier::Meta),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            KeyModifier::Ctrl => "ctrl",
            KeyModifier::Shift => "shift",
            KeyModifier::Alt => "alt",
            KeyModifier::Meta => "meta",
        }
    }
}

/// One chord: a set of modifiers plus a canonical, lower-cased key name.
/// `PartialEq`/`Hash` ignore modifier insertion order since the set is a
/// `BTreeSet`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: BTreeSet<KeyModifier>,
    pub key: String,
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.label())?;
        }
        write!(f, "{}", self.key)
    }
}

/// Non-empty ordered list of chords. Length 1 is a plain shortcut; length
/// >= 2 is a chord sequence (`ctrl+k ctrl+w`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySequence(pub Vec<KeyChord>);

impl KeySequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// This sequence's chords strictly start `other`'s — a shorter
    /// sequence that is a real (non-equal) prefix.
    pub fn is_strict_prefix_of(&self, other: &KeySequence) -> bool {
        self.0.len() < other.0.len() && self.0 == other.0[..self.0.len()]
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(KeyChord::to_string).collect();
        write!(f, "{}", parts.join(" "))
    }
}

const NAMED_KEYS: &[&str] = &[
    "escape", "tab", "space", "return", "backspace", "delete", "home", "end", "pageup",
    "pagedown", "up", "down", "left", "right", "insert",
];

const PUNCTUATION_KEYS: &[&str] = &[
    "-", "=", "[", "]", ";", "'", ",", ".", "/", "\\", "`",
];

fn is_canonical_key(s: &str) -> bool {
    if s.len() == 1 {
        let c = s.chars().next().unwrap();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            return true;
        }
    }
    if let Some(rest) = s.strip_prefix('f') {
        if let Ok(n) = rest.parse::<u8>() {
            return (1..=24).contains(&n);
        }
    }
    NAMED_KEYS.contains(&s) || PUNCTUATION_KEYS.contains(&s)
}

fn parse_chord(raw: &str) -> Option<KeyChord> {
    if raw.is_empty() || raw.starts_with('+') || raw.ends_with('+') {
        return None;
    }
    let parts: Vec<&str> = raw.split('+').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let mut modifiers = BTreeSet::new();
    let mut key = None;
    for (index, part) in parts.iter().enumerate() {
        let lowered = part.to_lowercase();
        if let Some(modifier) = KeyModifier::from_name(&lowered) {
            modifiers.insert(modifier);
            continue;
        }
        if index != parts.len() - 1 || key.is_some() {
            return None;
        }
        key = Some(lowered);
    }

    let key = key?;
    if !is_canonical_key(&key) {
        return None;
    }
    Some(KeyChord { modifiers, key })
}

/// Parse a full sequence string: chords separated by whitespace.
pub fn parse(input: &str) -> Option<KeySequence> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let chords: Option<Vec<KeyChord>> = trimmed.split_whitespace().map(parse_chord).collect();
    let chords = chords?;
    if chords.is_empty() {
        return None;
    }
    Some(KeySequence(chords))
}

/// `validate(string) -> (ok, error?)`, wrapping `parse`.
pub fn validate(input: &str) -> (bool, Option<String>) {
    match parse(input) {
        Some(_) => (true, None),
        None => (false, Some(format!("'{input}' is not a valid key sequence"))),
    }
}
