//! Cross-check shortcuts against the command registry: a shortcut bound
//! to a command id the registry doesn't know about still loads — the
//! command might be registered later by an extension — but is logged, the
//! same "log and keep going" posture the teacher's `from_config` uses for
//! unparseable bindings.

use viloxterm_commands::Registry as CommandRegistry;

use crate::shortcut::Shortcut;

pub fn warn_on_unknown_commands(shortcuts: &[Shortcut], commands: &CommandRegistry) {
    for shortcut in shortcuts {
        if !commands.is_registered(&shortcut.command_id) {
            log::warn!(
                "shortcut '{}' is bound to unregistered command '{}'",
                shortcut.sequence,
                shortcut.command_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::parse;
    use crate::shortcut::Source;

    #[test]
    fn warns_but_does_not_panic_on_unknown_command() {
        let shortcuts = vec![Shortcut::new(
            parse("ctrl+shift+x").unwrap(),
            "no.such.command",
            Source::User,
        )];
        let commands = CommandRegistry::with_builtins();
        warn_on_unknown_commands(&shortcuts, &commands);
    }
}
