//! `Shortcut` (§4.3): a bound key sequence plus its command, context
//! guard, priority, and provenance.

use viloxterm_common::ShortcutId;

use crate::chord::KeySequence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    BuiltIn,
    Keymap,
    User,
}

impl Source {
    /// Higher rank wins an equal-priority tie (`user > keymap > builtin`).
    fn rank(self) -> u8 {
        match self {
            Source::BuiltIn => 0,
            Source::Keymap => 1,
            Source::User => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Shortcut {
    pub id: ShortcutId,
    pub sequence: KeySequence,
    pub command_id: String,
    pub description: String,
    pub when: Option<String>,
    /// Lower is higher priority.
    pub priority: i32,
    pub source: Source,
}

impl Shortcut {
    pub fn new(sequence: KeySequence, command_id: impl Into<String>, source: Source) -> Self {
        Shortcut {
            id: ShortcutId::new(),
            sequence,
            command_id: command_id.into(),
            description: String::new(),
            when: None,
            priority: 0,
            source,
        }
    }

    pub fn with_when(mut self, when: impl Into<String>) -> Self {
        self.when = Some(when.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// True if `self` should win over `other` at equal priority:
    /// `user > keymap > builtin`, and — per spec.md §9 — an equal-source
    /// tie resolves insertion-order-first, so equal priority+source never
    /// displaces an existing shortcut.
    pub fn outranks(&self, other: &Shortcut) -> bool {
        if self.priority != other.priority {
            return self.priority < other.priority;
        }
        self.source.rank() > other.source.rank()
    }
}
