//! Cross-cutting integration coverage for the keyboard dispatcher: the
//! full parse -> registry -> dispatch pipeline, exercised end to end
//! through the crate's public API rather than one module at a time.

use std::time::{Duration, Instant};

use viloxterm_keybindings::{
    chord, context::Context, dispatch::Dispatcher, keymaps, registry::ShortcutRegistry,
    shortcut::{Shortcut, Source}, ConflictKind, RegisterOutcome, Signal,
};

// ---------------------------------------------------------------------
// parse -> registry: registering a parsed sequence round-trips
// ---------------------------------------------------------------------

#[test]
fn a_parsed_sequence_registers_and_is_retrievable_by_first_chord() {
    let sequence = chord::parse("ctrl+k ctrl+w").expect("valid sequence");
    let mut registry = ShortcutRegistry::new();
    let outcome = registry.register(Shortcut::new(sequence.clone(), "window.close", Source::User));
    assert!(matches!(outcome, RegisterOutcome::Ok));

    let first_chord = sequence.0[0].clone();
    let hits = registry.by_first_chord(&first_chord);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].command_id, "window.close");
}

#[test]
fn an_unparseable_sequence_never_reaches_the_registry() {
    assert!(chord::parse("ctrl+").is_none());
    assert!(chord::parse("shift+nosuchkey").is_none());
    let (ok, message) = chord::validate("ctrl+nosuchkey");
    assert!(!ok);
    assert!(message.unwrap().contains("ctrl+nosuchkey"));
}

// ---------------------------------------------------------------------
// registry: conflict detection across sources and contexts
// ---------------------------------------------------------------------

#[test]
fn registering_an_unconditional_duplicate_is_rejected_as_a_conflict() {
    let mut registry = ShortcutRegistry::new();
    let first = Shortcut::new(chord::parse("ctrl+p").unwrap(), "editor.find", Source::User);
    registry.insert(first);

    let second = Shortcut::new(chord::parse("ctrl+p").unwrap(), "terminal.find", Source::User);
    let outcome = registry.register(second);
    match outcome {
        RegisterOutcome::Conflict(conflicts) => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].kind, ConflictKind::Exact);
        }
        RegisterOutcome::Ok => panic!("expected an exact conflict"),
    }
}

#[test]
fn context_gated_duplicates_coexist_when_contexts_cannot_overlap() {
    let mut registry = ShortcutRegistry::new();
    let editor = Shortcut::new(chord::parse("ctrl+p").unwrap(), "editor.find", Source::User)
        .with_when("editorFocus");
    let terminal = Shortcut::new(chord::parse("ctrl+p").unwrap(), "terminal.find", Source::User)
        .with_when("terminalFocus");

    assert!(matches!(registry.register(editor), RegisterOutcome::Ok));
    assert!(matches!(registry.register(terminal), RegisterOutcome::Ok));
    assert_eq!(registry.len(), 2);
    assert!(registry.get_conflicts().is_empty());
}

#[test]
fn find_matching_resolves_by_context_and_then_by_priority() {
    let mut registry = ShortcutRegistry::new();
    registry.insert(
        Shortcut::new(chord::parse("ctrl+p").unwrap(), "editor.find", Source::User)
            .with_when("editorFocus")
            .with_priority(5),
    );
    registry.insert(
        Shortcut::new(chord::parse("ctrl+p").unwrap(), "editor.quickOpen", Source::User)
            .with_when("editorFocus")
            .with_priority(1),
    );

    let mut ctx = Context::new();
    ctx.set("editorFocus", true);
    let matches = registry.find_matching(&chord::parse("ctrl+p").unwrap(), &ctx);
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].command_id, "editor.quickOpen", "lower priority number wins first");
}

// ---------------------------------------------------------------------
// keymaps -> registry: loading a named bundle through to dispatch
// ---------------------------------------------------------------------

#[test]
fn loading_the_default_keymap_makes_its_bindings_dispatchable() {
    let mut registry = ShortcutRegistry::new();
    registry.load_keymap(keymaps::to_shortcuts(keymaps::named("default").unwrap()));
    assert!(!registry.is_empty());

    let ctx = Context::new();
    let mut dispatcher = Dispatcher::new();
    let sequence = chord::parse("ctrl+w").unwrap();
    let signals = dispatcher.handle_chord(sequence.0[0].clone(), &ctx, &registry, Instant::now());
    match &signals[0] {
        Signal::ShortcutTriggered { command_id } => {
            assert_eq!(command_id, "tab.close");
        }
        other => panic!("expected tab.close to fire, got {other:?}"),
    }
}

#[test]
fn switching_keymaps_drops_the_previous_bundle_but_keeps_user_shortcuts() {
    let mut registry = ShortcutRegistry::new();
    registry.insert(Shortcut::new(
        chord::parse("ctrl+alt+u").unwrap(),
        "user.custom",
        Source::User,
    ));
    registry.load_keymap(keymaps::to_shortcuts(keymaps::named("default").unwrap()));
    assert!(!registry.by_command("tab.create").is_empty());

    registry.load_keymap(keymaps::to_shortcuts(keymaps::named("vim").unwrap()));
    assert!(registry.by_command("tab.create").is_empty(), "default bundle should be cleared");
    assert_eq!(registry.by_command("user.custom").len(), 1, "user shortcut must survive");
}

// ---------------------------------------------------------------------
// full pipeline: parse -> registry -> dispatch, chord sequences and
// vim's context-gated bindings
// ---------------------------------------------------------------------

#[test]
fn a_two_chord_vscode_sequence_waits_for_its_continuation_then_fires() {
    let mut registry = ShortcutRegistry::new();
    registry.load_keymap(keymaps::to_shortcuts(keymaps::named("vscode").unwrap()));

    let mut dispatcher = Dispatcher::new();
    let ctx = Context::new();
    let now = Instant::now();

    let prefix = chord::parse("ctrl+k").unwrap();
    let first = dispatcher.handle_chord(prefix.0[0].clone(), &ctx, &registry, now);
    assert!(matches!(first[0], Signal::ChordSequenceStarted { .. }));
    assert!(!dispatcher.is_idle());

    let continuation = chord::parse("ctrl+\\").unwrap();
    let second = dispatcher.handle_chord(continuation.0[0].clone(), &ctx, &registry, now);
    match &second[0] {
        Signal::ShortcutTriggered { command_id } => {
            assert_eq!(command_id, "pane.splitHorizontal");
        }
        other => panic!("expected the ctrl+k ctrl+\\ sequence to fire, got {other:?}"),
    }
    assert!(dispatcher.is_idle());
}

#[test]
fn vim_bindings_only_fire_while_vim_mode_is_active() {
    let mut registry = ShortcutRegistry::new();
    registry.load_keymap(keymaps::to_shortcuts(keymaps::named("vim").unwrap()));

    let mut dispatcher = Dispatcher::new();
    let h = chord::parse("ctrl+w h").unwrap();

    let mut vim_off = Context::new();
    vim_off.set("vimMode", false);
    let signals = dispatcher.handle_chord(h.0[0].clone(), &vim_off, &registry, Instant::now());
    // `ctrl+w` alone has no unconditional binding and no satisfiable
    // continuation while vimMode is off, so the prefix state resets and
    // nothing is reported as triggered.
    assert!(signals.iter().all(|s| !matches!(s, Signal::ShortcutTriggered { .. })));
    assert!(dispatcher.is_idle());

    let mut vim_on = Context::new();
    vim_on.set("vimMode", true);
    let first = dispatcher.handle_chord(h.0[0].clone(), &vim_on, &registry, Instant::now());
    assert!(matches!(first[0], Signal::ChordSequenceStarted { .. }));
    let second = dispatcher.handle_chord(
        chord::parse("h").unwrap().0[0].clone(),
        &vim_on,
        &registry,
        Instant::now(),
    );
    match &second[0] {
        Signal::ShortcutTriggered { command_id } => {
            assert_eq!(command_id, "navigate.left");
        }
        other => panic!("expected navigate.left to fire, got {other:?}"),
    }
}

#[test]
fn an_expired_chord_timeout_commits_the_pending_shorter_match() {
    let mut registry = ShortcutRegistry::new();
    registry.insert(Shortcut::new(chord::parse("ctrl+k").unwrap(), "mark.set", Source::User));
    registry.insert(Shortcut::new(
        chord::parse("ctrl+k ctrl+w").unwrap(),
        "window.close",
        Source::User,
    ));

    let mut dispatcher = Dispatcher::with_timeout(Duration::from_millis(5));
    let ctx = Context::new();
    let now = Instant::now();
    dispatcher.handle_chord(chord::parse("ctrl+k").unwrap().0[0].clone(), &ctx, &registry, now);
    assert!(!dispatcher.is_idle());

    let signals = dispatcher.poll_timeout(now + Duration::from_millis(10));
    match &signals[0] {
        Signal::ShortcutTriggered { command_id } => {
            assert_eq!(command_id, "mark.set");
        }
        other => panic!("expected the pending mark.set to commit on timeout, got {other:?}"),
    }
    assert!(dispatcher.is_idle());
}

#[test]
fn cancelling_mid_sequence_reports_no_command() {
    let mut registry = ShortcutRegistry::new();
    registry.load_keymap(keymaps::to_shortcuts(keymaps::named("vscode").unwrap()));
    let mut dispatcher = Dispatcher::new();
    let ctx = Context::new();
    dispatcher.handle_chord(chord::parse("ctrl+k").unwrap().0[0].clone(), &ctx, &registry, Instant::now());
    assert!(!dispatcher.is_idle());

    let signals = dispatcher.cancel();
    assert!(matches!(signals[0], Signal::ChordSequenceCancelled));
    assert!(dispatcher.is_idle());
}

// ---------------------------------------------------------------------
// KeySequence / KeyChord display and equality, as seen through the
// parser rather than constructed by hand
// ---------------------------------------------------------------------

#[test]
fn display_renders_modifiers_in_canonical_order_regardless_of_input_order() {
    let a = chord::parse("shift+ctrl+alt+meta+b").unwrap();
    assert_eq!(a.to_string(), "ctrl+shift+alt+meta+b");
}

#[test]
fn sequence_display_joins_chords_with_a_single_space() {
    let sequence = chord::parse("ctrl+k ctrl+w").unwrap();
    assert_eq!(sequence.to_string(), "ctrl+k ctrl+w");
}

#[test]
fn equal_sequences_parsed_independently_hash_and_compare_equal() {
    use std::collections::HashMap;

    let mut bound: HashMap<chord::KeySequence, &str> = HashMap::new();
    bound.insert(chord::parse("ctrl+shift+p").unwrap(), "command.palette");

    let lookup = chord::parse("shift+ctrl+p").unwrap();
    assert_eq!(bound.get(&lookup), Some(&"command.palette"));
}
