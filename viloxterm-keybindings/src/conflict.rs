//! The conflict resolver (§4.3): exact/prefix detection and the
//! priority-then-source resolution policy.

use crate::context;
use crate::registry::{Conflict, ConflictKind, ShortcutRegistry};
use crate::shortcut::Shortcut;

/// Detect conflicts a candidate shortcut would have against everything
/// already in `registry`.
pub fn find_conflicts(candidate: &Shortcut, registry: &ShortcutRegistry) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for existing in registry.iter() {
        if existing.sequence == candidate.sequence {
            if context::contexts_overlap(
                candidate.when.as_deref(),
                existing.when.as_deref(),
            ) {
                conflicts.push(Conflict {
                    kind: ConflictKind::Exact,
                    with: existing.id.clone(),
                });
            }
        } else if candidate.sequence.is_strict_prefix_of(&existing.sequence)
            || existing.sequence.is_strict_prefix_of(&candidate.sequence)
        {
            conflicts.push(Conflict {
                kind: ConflictKind::Prefix,
                with: existing.id.clone(),
            });
        }
    }
    conflicts
}

pub enum ResolveOutcome {
    /// The candidate was inserted; these existing shortcuts were removed.
    CandidateWon { removed: Vec<String> },
    /// The candidate was rejected; it conflicts with an equal-or-higher
    /// priority incumbent.
    CandidateLost,
}

/// Apply the resolution policy to the `Exact` conflicts in `conflicts`:
/// higher priority (numerically lower) wins; equal priority falls back to
/// `user > keymap > builtin`, and an equal-priority-and-source tie favors
/// the incumbent (insertion-order-first, per spec.md §9). `Prefix`
/// conflicts are left alone — they're a dispatch-timing concern the chord
/// state machine handles, not a registration-time exclusion.
pub fn resolve(
    candidate: Shortcut,
    conflicts: &[Conflict],
    registry: &mut ShortcutRegistry,
) -> ResolveOutcome {
    let exact: Vec<&Conflict> = conflicts.iter().filter(|c| c.kind == ConflictKind::Exact).collect();
    if exact.is_empty() {
        registry.insert(candidate);
        return ResolveOutcome::CandidateWon { removed: Vec::new() };
    }

    for conflict in &exact {
        let Some(incumbent) = registry.get(&conflict.with) else {
            continue;
        };
        if !candidate.outranks(incumbent) {
            return ResolveOutcome::CandidateLost;
        }
    }

    let removed: Vec<String> = exact.iter().map(|c| c.with.as_str().to_string()).collect();
    for conflict in &exact {
        registry.unregister(&conflict.with);
    }
    registry.insert(candidate);
    ResolveOutcome::CandidateWon { removed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::parse;
    use crate::shortcut::Source;

    #[test]
    fn higher_priority_candidate_displaces_incumbent() {
        let mut registry = ShortcutRegistry::new();
        let incumbent = Shortcut::new(parse("ctrl+s").unwrap(), "file.save", Source::BuiltIn)
            .with_priority(10);
        registry.insert(incumbent);

        let candidate =
            Shortcut::new(parse("ctrl+s").unwrap(), "file.saveAs", Source::User).with_priority(0);
        let conflicts = find_conflicts(&candidate, &registry);
        let outcome = resolve(candidate, &conflicts, &mut registry);
        assert!(matches!(outcome, ResolveOutcome::CandidateWon { .. }));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.by_command("file.saveAs").len(), 1);
    }

    #[test]
    fn equal_priority_and_source_tie_favors_incumbent() {
        let mut registry = ShortcutRegistry::new();
        let incumbent = Shortcut::new(parse("ctrl+s").unwrap(), "file.save", Source::User);
        registry.insert(incumbent);

        let candidate = Shortcut::new(parse("ctrl+s").unwrap(), "file.saveAs", Source::User);
        let conflicts = find_conflicts(&candidate, &registry);
        let outcome = resolve(candidate, &conflicts, &mut registry);
        assert!(matches!(outcome, ResolveOutcome::CandidateLost));
        assert_eq!(registry.by_command("file.save").len(), 1);
    }

    #[test]
    fn lower_priority_number_user_beats_higher_number_builtin() {
        let mut registry = ShortcutRegistry::new();
        let incumbent =
            Shortcut::new(parse("ctrl+shift+p").unwrap(), "builtin.cmd", Source::BuiltIn)
                .with_priority(5);
        registry.insert(incumbent);
        let candidate =
            Shortcut::new(parse("ctrl+shift+p").unwrap(), "user.cmd", Source::User).with_priority(5);
        let conflicts = find_conflicts(&candidate, &registry);
        let outcome = resolve(candidate, &conflicts, &mut registry);
        assert!(matches!(outcome, ResolveOutcome::CandidateWon { .. }));
    }
}
