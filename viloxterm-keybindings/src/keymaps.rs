//! Built-in keymaps (§4.3): `default`, `vscode`, `vim`. Loading a keymap
//! clears previously-loaded keymap shortcuts (not user overrides) and
//! registers the new bundle, via `ShortcutRegistry::load_keymap`.
//!
//! Grounded on `par-term-keybindings::KeybindingRegistry::from_config`'s
//! "log and keep going" loading idiom, generalized from one flat config
//! list to three named built-in bundles.

use crate::chord::parse;
use crate::shortcut::{Shortcut, Source};

pub struct Binding {
    pub sequence: &'static str,
    pub command_id: &'static str,
    pub when: Option<&'static str>,
}

fn default_bindings() -> Vec<Binding> {
    vec![
        Binding { sequence: "ctrl+t", command_id: "tab.create", when: None },
        Binding { sequence: "ctrl+w", command_id: "tab.close", when: None },
        Binding { sequence: "ctrl+tab", command_id: "tab.next", when: None },
        Binding { sequence: "ctrl+shift+tab", command_id: "tab.previous", when: None },
        Binding { sequence: "ctrl+shift+5", command_id: "pane.splitHorizontal", when: None },
        Binding { sequence: "ctrl+shift+4", command_id: "pane.splitVertical", when: None },
        Binding { sequence: "ctrl+shift+w", command_id: "pane.close", when: None },
        Binding { sequence: "alt+left", command_id: "navigate.left", when: None },
        Binding { sequence: "alt+right", command_id: "navigate.right", when: None },
        Binding { sequence: "alt+up", command_id: "navigate.up", when: None },
        Binding { sequence: "alt+down", command_id: "navigate.down", when: None },
        Binding { sequence: "ctrl+,", command_id: "settings.open", when: None },
    ]
}

fn vscode_bindings() -> Vec<Binding> {
    vec![
        Binding { sequence: "ctrl+n", command_id: "tab.create", when: None },
        Binding { sequence: "ctrl+k ctrl+w", command_id: "tab.close", when: None },
        Binding { sequence: "ctrl+pagedown", command_id: "tab.next", when: None },
        Binding { sequence: "ctrl+pageup", command_id: "tab.previous", when: None },
        Binding { sequence: "ctrl+\\", command_id: "pane.splitVertical", when: None },
        Binding { sequence: "ctrl+k ctrl+\\", command_id: "pane.splitHorizontal", when: None },
        Binding { sequence: "ctrl+k left", command_id: "navigate.left", when: None },
        Binding { sequence: "ctrl+k right", command_id: "navigate.right", when: None },
        Binding { sequence: "ctrl+,", command_id: "settings.open", when: None },
    ]
}

fn vim_bindings() -> Vec<Binding> {
    vec![
        Binding { sequence: "ctrl+w h", command_id: "navigate.left", when: Some("vimMode") },
        Binding { sequence: "ctrl+w l", command_id: "navigate.right", when: Some("vimMode") },
        Binding { sequence: "ctrl+w k", command_id: "navigate.up", when: Some("vimMode") },
        Binding { sequence: "ctrl+w j", command_id: "navigate.down", when: Some("vimMode") },
        Binding { sequence: "ctrl+w s", command_id: "pane.splitHorizontal", when: Some("vimMode") },
        Binding { sequence: "ctrl+w v", command_id: "pane.splitVertical", when: Some("vimMode") },
        Binding { sequence: "ctrl+w c", command_id: "pane.close", when: Some("vimMode") },
    ]
}

/// Resolve a named built-in keymap to its binding list. `None` for an
/// unrecognized name.
pub fn named(name: &str) -> Option<Vec<Binding>> {
    match name {
        "default" => Some(default_bindings()),
        "vscode" => Some(vscode_bindings()),
        "vim" => Some(vim_bindings()),
        _ => None,
    }
}

/// Parse a binding list into `Shortcut`s with `Source::Keymap`, logging
/// and skipping any binding whose sequence fails to parse (mirrors the
/// teacher's `from_config` "log and skip invalid" behavior).
pub fn to_shortcuts(bindings: Vec<Binding>) -> Vec<Shortcut> {
    bindings
        .into_iter()
        .filter_map(|binding| match parse(binding.sequence) {
            Some(sequence) => {
                let mut shortcut = Shortcut::new(sequence, binding.command_id, Source::Keymap);
                if let Some(when) = binding.when {
                    shortcut = shortcut.with_when(when);
                }
                Some(shortcut)
            }
            None => {
                log::warn!(
                    "keymap binding '{}' -> '{}' has an unparseable sequence, skipping",
                    binding.sequence,
                    binding.command_id
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ShortcutRegistry;

    #[test]
    fn loading_a_keymap_replaces_the_previous_one_but_keeps_user_shortcuts() {
        let mut registry = ShortcutRegistry::new();
        registry.insert(Shortcut::new(
            crate::chord::parse("ctrl+alt+u").unwrap(),
            "user.custom",
            Source::User,
        ));

        registry.load_keymap(to_shortcuts(named("default").unwrap()));
        let after_default = registry.len();
        assert!(after_default > 1);

        registry.load_keymap(to_shortcuts(named("vscode").unwrap()));
        assert_eq!(registry.by_command("user.custom").len(), 1);
        assert!(registry.by_command("tab.create").is_empty());
        assert_eq!(registry.by_command("tab.next").len(), 1);
    }

    #[test]
    fn all_built_in_bindings_parse() {
        for name in ["default", "vscode", "vim"] {
            let bindings = named(name).unwrap();
            let count = bindings.len();
            let shortcuts = to_shortcuts(bindings);
            assert_eq!(shortcuts.len(), count, "keymap {name} had an unparseable binding");
        }
    }
}
