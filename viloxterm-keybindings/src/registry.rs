//! `ShortcutRegistry` (§4.3): registered shortcuts plus the lookup
//! indices dispatch needs (`by_id`, `by_first_chord`, `by_command`).

use std::collections::HashMap;

use viloxterm_common::ShortcutId;

use crate::chord::{KeyChord, KeySequence};
use crate::context::{self, Context};
use crate::shortcut::Shortcut;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Same sequence, overlapping contexts.
    Exact,
    /// One sequence is a strict prefix of the other.
    Prefix,
}

#[derive(Debug, Clone)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub with: ShortcutId,
}

#[derive(Debug)]
pub enum RegisterOutcome {
    Ok,
    Conflict(Vec<Conflict>),
}

#[derive(Default)]
pub struct ShortcutRegistry {
    by_id: HashMap<ShortcutId, Shortcut>,
    by_first_chord: HashMap<KeyChord, Vec<ShortcutId>>,
    by_command: HashMap<String, Vec<ShortcutId>>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        ShortcutRegistry::default()
    }

    pub fn get(&self, id: &ShortcutId) -> Option<&Shortcut> {
        self.by_id.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shortcut> {
        self.by_id.values()
    }

    /// Detect conflicts against the current registry, per the rules in
    /// `crate::conflict`, without mutating anything.
    pub fn find_conflicts(&self, candidate: &Shortcut) -> Vec<Conflict> {
        crate::conflict::find_conflicts(candidate, self)
    }

    /// Register a shortcut if it doesn't conflict; otherwise report the
    /// conflicts without inserting. Callers that want to force resolution
    /// call `crate::conflict::resolve` explicitly.
    pub fn register(&mut self, shortcut: Shortcut) -> RegisterOutcome {
        let conflicts = self.find_conflicts(&shortcut);
        let blocking: Vec<Conflict> = conflicts
            .into_iter()
            .filter(|c| c.kind == ConflictKind::Exact)
            .collect();
        if !blocking.is_empty() {
            return RegisterOutcome::Conflict(blocking);
        }
        self.insert(shortcut);
        RegisterOutcome::Ok
    }

    pub(crate) fn insert(&mut self, shortcut: Shortcut) {
        let id = shortcut.id.clone();
        if let Some(first) = shortcut.sequence.0.first() {
            self.by_first_chord
                .entry(first.clone())
                .or_default()
                .push(id.clone());
        }
        self.by_command
            .entry(shortcut.command_id.clone())
            .or_default()
            .push(id.clone());
        self.by_id.insert(id, shortcut);
    }

    pub fn unregister(&mut self, id: &ShortcutId) -> bool {
        let Some(shortcut) = self.by_id.remove(id) else {
            return false;
        };
        if let Some(first) = shortcut.sequence.0.first() {
            if let Some(ids) = self.by_first_chord.get_mut(first) {
                ids.retain(|existing| existing != id);
            }
        }
        if let Some(ids) = self.by_command.get_mut(&shortcut.command_id) {
            ids.retain(|existing| existing != id);
        }
        true
    }

    pub fn by_first_chord(&self, chord: &KeyChord) -> Vec<&Shortcut> {
        self.by_first_chord
            .get(chord)
            .map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn by_command(&self, command_id: &str) -> Vec<&Shortcut> {
        self.by_command
            .get(command_id)
            .map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    /// All shortcuts whose sequence exactly equals `sequence` and whose
    /// `when` is satisfied in `ctx`, in priority order (highest first).
    pub fn find_matching(&self, sequence: &KeySequence, ctx: &Context) -> Vec<&Shortcut> {
        let mut matches: Vec<&Shortcut> = self
            .by_id
            .values()
            .filter(|s| &s.sequence == sequence)
            .filter(|s| match &s.when {
                Some(expr) => context::evaluate(expr, ctx),
                None => true,
            })
            .collect();
        matches.sort_by(|a, b| a.priority.cmp(&b.priority));
        matches
    }

    /// Shortcuts whose sequence strictly starts with `sequence` and whose
    /// context is currently satisfiable (not necessarily true right now —
    /// "could still fire on more keys").
    pub fn strict_continuations(&self, sequence: &KeySequence, ctx: &Context) -> Vec<&Shortcut> {
        self.by_id
            .values()
            .filter(|s| sequence.is_strict_prefix_of(&s.sequence))
            .filter(|s| match &s.when {
                Some(expr) => context::evaluate(expr, ctx),
                None => true,
            })
            .collect()
    }

    /// Sequences bound by >= 2 shortcuts whose context expressions are
    /// satisfiable simultaneously for at least one pair.
    pub fn get_conflicts(&self) -> HashMap<String, Vec<&Shortcut>> {
        let mut groups: HashMap<String, Vec<&Shortcut>> = HashMap::new();
        for shortcut in self.by_id.values() {
            groups
                .entry(shortcut.sequence.to_string())
                .or_default()
                .push(shortcut);
        }
        groups.retain(|_, shortcuts| {
            shortcuts.len() >= 2
                && shortcuts.iter().enumerate().any(|(i, a)| {
                    shortcuts[i + 1..].iter().any(|b| {
                        context::contexts_overlap(a.when.as_deref(), b.when.as_deref())
                    })
                })
        });
        groups
    }

    /// Load a named keymap bundle atomically: every existing
    /// `Source::Keymap` shortcut is cleared first (user overrides and
    /// built-ins are untouched), then the whole bundle is inserted.
    pub fn load_keymap(&mut self, bundle: Vec<Shortcut>) {
        let keymap_ids: Vec<ShortcutId> = self
            .by_id
            .values()
            .filter(|s| s.source == crate::shortcut::Source::Keymap)
            .map(|s| s.id.clone())
            .collect();
        for id in keymap_ids {
            self.unregister(&id);
        }
        for shortcut in bundle {
            self.insert(shortcut);
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::parse;
    use crate::shortcut::Source;

    fn shortcut(seq: &str, command: &str) -> Shortcut {
        Shortcut::new(parse(seq).unwrap(), command, Source::User)
    }

    #[test]
    fn find_matching_respects_context() {
        let mut registry = ShortcutRegistry::new();
        registry.insert(shortcut("ctrl+p", "editor.find").with_when("editorFocus"));
        registry.insert(shortcut("ctrl+p", "terminal.find").with_when("terminalFocus"));

        let mut ctx = Context::new();
        ctx.set("editorFocus", true);
        let matches = registry.find_matching(&parse("ctrl+p").unwrap(), &ctx);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].command_id, "editor.find");
    }

    #[test]
    fn strict_continuations_finds_longer_sequences() {
        let mut registry = ShortcutRegistry::new();
        registry.insert(shortcut("ctrl+k ctrl+w", "window.close"));
        let ctx = Context::new();
        let continuations = registry.strict_continuations(&parse("ctrl+k").unwrap(), &ctx);
        assert_eq!(continuations.len(), 1);
    }

    #[test]
    fn get_conflicts_flags_unconditional_duplicate_sequence() {
        let mut registry = ShortcutRegistry::new();
        registry.insert(shortcut("ctrl+p", "editor.find"));
        registry.insert(shortcut("ctrl+p", "terminal.find"));
        let conflicts = registry.get_conflicts();
        assert!(conflicts.contains_key("ctrl+p"));
    }
}
