//! The dispatch state machine (§4.3): `Idle` / `AwaitingContinuation`,
//! driven by one key event (and, for the timeout edge, one poll) at a
//! time.

use std::time::{Duration, Instant};

use crate::chord::{KeyChord, KeySequence};
use crate::context::Context;
use crate::registry::ShortcutRegistry;
use crate::shortcut::Shortcut;

pub const DEFAULT_CHORD_TIMEOUT: Duration = Duration::from_millis(1000);

enum State {
    Idle,
    AwaitingContinuation {
        prefix: KeySequence,
        deadline: Instant,
        pending: Option<Shortcut>,
    },
}

#[derive(Debug, Clone)]
pub enum Signal {
    ShortcutTriggered { command_id: String },
    ChordSequenceStarted { prefix: String },
    ChordSequenceCancelled,
}

pub struct Dispatcher {
    state: State,
    timeout: Duration,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher {
            state: State::Idle,
            timeout: DEFAULT_CHORD_TIMEOUT,
        }
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Dispatcher {
            state: State::Idle,
            timeout,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Any UI-initiated reset: return to `Idle` without firing the
    /// pending match, if any.
    pub fn cancel(&mut self) -> Vec<Signal> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => Vec::new(),
            State::AwaitingContinuation { .. } => vec![Signal::ChordSequenceCancelled],
        }
    }

    /// Poll the pending deadline; if it has passed, commit the pending
    /// match (if any) and return to `Idle`.
    pub fn poll_timeout(&mut self, now: Instant) -> Vec<Signal> {
        let fire = match &self.state {
            State::AwaitingContinuation { deadline, .. } => now >= *deadline,
            State::Idle => false,
        };
        if !fire {
            return Vec::new();
        }
        match std::mem::replace(&mut self.state, State::Idle) {
            State::AwaitingContinuation { pending: Some(shortcut), .. } => {
                vec![Signal::ShortcutTriggered { command_id: shortcut.command_id }]
            }
            State::AwaitingContinuation { pending: None, .. } => {
                vec![Signal::ChordSequenceCancelled]
            }
            State::Idle => Vec::new(),
        }
    }

    /// Handle one key event, already converted to a `KeyChord`, against
    /// the current context and registry.
    pub fn handle_chord(
        &mut self,
        chord: KeyChord,
        ctx: &Context,
        registry: &ShortcutRegistry,
        now: Instant,
    ) -> Vec<Signal> {
        let candidate_sequence = match &self.state {
            State::Idle => KeySequence(vec![chord]),
            State::AwaitingContinuation { prefix, .. } => {
                let mut chords = prefix.0.clone();
                chords.push(chord);
                KeySequence(chords)
            }
        };

        let matches = registry.find_matching(&candidate_sequence, ctx);
        let continuations = registry.strict_continuations(&candidate_sequence, ctx);

        if !matches.is_empty() && continuations.is_empty() {
            self.state = State::Idle;
            return vec![Signal::ShortcutTriggered {
                command_id: matches[0].command_id.clone(),
            }];
        }

        if !continuations.is_empty() {
            let pending = matches.first().map(|s| (*s).clone());
            let prefix_str = candidate_sequence.to_string();
            self.state = State::AwaitingContinuation {
                prefix: candidate_sequence,
                deadline: now + self.timeout,
                pending,
            };
            return vec![Signal::ChordSequenceStarted { prefix: prefix_str }];
        }

        // No exact match, no continuation: if we were mid-sequence this
        // is a non-match that commits whatever was pending; if we were
        // idle, the key passes through unhandled.
        match std::mem::replace(&mut self.state, State::Idle) {
            State::AwaitingContinuation { pending: Some(shortcut), .. } => {
                vec![Signal::ShortcutTriggered { command_id: shortcut.command_id }]
            }
            State::AwaitingContinuation { pending: None, .. } => {
                vec![Signal::ChordSequenceCancelled]
            }
            State::Idle => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::parse;
    use crate::shortcut::Source;
    use std::collections::BTreeSet;

    fn chord(key: &str) -> KeyChord {
        KeyChord { modifiers: BTreeSet::new(), key: key.to_string() }
    }

    fn ctrl_chord(key: &str) -> KeyChord {
        let mut modifiers = BTreeSet::new();
        modifiers.insert(crate::chord::KeyModifier::Ctrl);
        KeyChord { modifiers, key: key.to_string() }
    }

    #[test]
    fn scenario_c_single_chord_fires_immediately() {
        let mut registry = ShortcutRegistry::new();
        registry.insert(Shortcut::new(parse("ctrl+s").unwrap(), "file.save", Source::User));
        let mut dispatcher = Dispatcher::new();
        let ctx = Context::new();
        let signals = dispatcher.handle_chord(ctrl_chord("s"), &ctx, &registry, Instant::now());
        assert!(matches!(signals[0], Signal::ShortcutTriggered { .. }));
        assert!(dispatcher.is_idle());
    }

    #[test]
    fn scenario_c_chord_sequence_waits_then_fires() {
        let mut registry = ShortcutRegistry::new();
        registry.insert(Shortcut::new(
            parse("ctrl+k ctrl+w").unwrap(),
            "window.close",
            Source::User,
        ));
        let mut dispatcher = Dispatcher::new();
        let ctx = Context::new();
        let now = Instant::now();

        let first = dispatcher.handle_chord(ctrl_chord("k"), &ctx, &registry, now);
        assert!(matches!(first[0], Signal::ChordSequenceStarted { .. }));
        assert!(!dispatcher.is_idle());

        let second = dispatcher.handle_chord(ctrl_chord("w"), &ctx, &registry, now);
        assert!(matches!(second[0], Signal::ShortcutTriggered { .. }));
        assert!(dispatcher.is_idle());
    }

    #[test]
    fn continuation_supersedes_a_pending_shorter_match() {
        let mut registry = ShortcutRegistry::new();
        registry.insert(Shortcut::new(parse("ctrl+k").unwrap(), "short.action", Source::User));
        registry.insert(Shortcut::new(
            parse("ctrl+k ctrl+w").unwrap(),
            "long.action",
            Source::User,
        ));
        let mut dispatcher = Dispatcher::new();
        let ctx = Context::new();
        let now = Instant::now();

        let first = dispatcher.handle_chord(ctrl_chord("k"), &ctx, &registry, now);
        assert!(matches!(first[0], Signal::ChordSequenceStarted { .. }));

        let second = dispatcher.handle_chord(ctrl_chord("w"), &ctx, &registry, now);
        match &second[0] {
            Signal::ShortcutTriggered { command_id } => assert_eq!(command_id, "long.action"),
            _ => panic!("expected the longer sequence to fire"),
        }
    }

    #[test]
    fn timeout_commits_pending_match() {
        let mut registry = ShortcutRegistry::new();
        registry.insert(Shortcut::new(parse("ctrl+k").unwrap(), "short.action", Source::User));
        registry.insert(Shortcut::new(
            parse("ctrl+k ctrl+w").unwrap(),
            "long.action",
            Source::User,
        ));
        let mut dispatcher = Dispatcher::with_timeout(Duration::from_millis(10));
        let ctx = Context::new();
        let now = Instant::now();
        dispatcher.handle_chord(ctrl_chord("k"), &ctx, &registry, now);

        let signals = dispatcher.poll_timeout(now + Duration::from_millis(20));
        match &signals[0] {
            Signal::ShortcutTriggered { command_id } => assert_eq!(command_id, "short.action"),
            _ => panic!("expected the pending short match to commit"),
        }
        assert!(dispatcher.is_idle());
    }

    #[test]
    fn cancel_returns_to_idle_without_firing() {
        let mut registry = ShortcutRegistry::new();
        registry.insert(Shortcut::new(
            parse("ctrl+k ctrl+w").unwrap(),
            "window.close",
            Source::User,
        ));
        let mut dispatcher = Dispatcher::new();
        let ctx = Context::new();
        dispatcher.handle_chord(ctrl_chord("k"), &ctx, &registry, Instant::now());
        let signals = dispatcher.cancel();
        assert!(matches!(signals[0], Signal::ChordSequenceCancelled));
        assert!(dispatcher.is_idle());
    }

    #[test]
    fn unhandled_key_in_idle_state_passes_through() {
        let registry = ShortcutRegistry::new();
        let mut dispatcher = Dispatcher::new();
        let ctx = Context::new();
        let signals = dispatcher.handle_chord(chord("z"), &ctx, &registry, Instant::now());
        assert!(signals.is_empty());
        assert!(dispatcher.is_idle());
    }
}
