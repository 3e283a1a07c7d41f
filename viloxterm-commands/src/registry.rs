//! The command registry (§4.2): name-to-constructor lookup, an
//! independent alias table, and per-name parameter injection.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::command::Command;
use crate::context::CommandContext;
use crate::result::CommandResult;

type Constructor = Box<dyn Fn() -> Box<dyn Command> + Send + Sync>;
type Injector = Box<dyn Fn(&mut Map<String, Value>) + Send + Sync>;

#[derive(Default)]
pub struct Registry {
    constructors: HashMap<String, Constructor>,
    aliases: HashMap<String, String>,
    injectors: HashMap<String, Injector>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Build a registry pre-populated with the built-in catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Registry::new();
        crate::builtin::register_all(&mut registry);
        registry
    }

    pub fn register(&mut self, name: &str, constructor: impl Fn() -> Box<dyn Command> + Send + Sync + 'static) {
        self.constructors.insert(name.to_string(), Box::new(constructor));
    }

    /// Map an alias to a canonical, already-registered name. The alias
    /// table is independent of the constructor table: `execute` always
    /// dereferences aliases before looking up a constructor.
    pub fn alias(&mut self, alias: &str, canonical_name: &str) {
        self.aliases.insert(alias.to_string(), canonical_name.to_string());
    }

    /// Attach a parameter injector to a registered name: runs before
    /// construction, mutating the parameter map the command will read
    /// from `ctx.parameters`.
    pub fn register_injector(
        &mut self,
        name: &str,
        injector: impl Fn(&mut Map<String, Value>) + Send + Sync + 'static,
    ) {
        self.injectors.insert(name.to_string(), Box::new(injector));
    }

    pub fn is_registered(&self, name: &str) -> bool {
        let canonical = self.resolve_alias(name);
        self.constructors.contains_key(canonical)
    }

    fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Construct the named command (resolving aliases and running any
    /// injector first), check `can_execute`, execute it, and return its
    /// result. Never panics: an unknown name is a `Failure`, not a throw.
    pub fn execute(
        &self,
        name: &str,
        ctx: &mut CommandContext,
        params: Map<String, Value>,
    ) -> CommandResult {
        let canonical = self.resolve_alias(name).to_string();

        let Some(constructor) = self.constructors.get(&canonical) else {
            return CommandResult::failure(format!("unknown command `{name}`"));
        };

        let mut params = params;
        if let Some(injector) = self.injectors.get(&canonical) {
            injector(&mut params);
        }
        ctx.parameters = params;

        let command = constructor();
        if !command.can_execute(ctx) {
            return CommandResult::not_applicable(format!("`{canonical}` cannot run right now"));
        }
        command.execute(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viloxterm_workspace::WorkspaceModel;

    #[test]
    fn alias_dereferences_before_constructor_lookup() {
        let mut registry = Registry::with_builtins();
        registry.alias("new-tab", "tab.create");
        let mut model = WorkspaceModel::new();
        let mut ctx = CommandContext::new(&mut model);
        let result = registry.execute("new-tab", &mut ctx, Map::new());
        assert!(result.is_success());
        assert_eq!(model.get_tabs().len(), 2);
    }

    #[test]
    fn unknown_command_is_a_failure_not_a_panic() {
        let registry = Registry::with_builtins();
        let mut model = WorkspaceModel::new();
        let mut ctx = CommandContext::new(&mut model);
        let result = registry.execute("no.such.command", &mut ctx, Map::new());
        assert!(!result.is_success());
    }

    #[test]
    fn split_horizontal_injects_orientation_parameter() {
        let registry = Registry::with_builtins();
        let mut model = WorkspaceModel::new();
        let pane_id = model.get_active_pane().unwrap().id.clone();
        let mut params = Map::new();
        params.insert("pane_id".into(), pane_id.as_str().into());
        let mut ctx = CommandContext::new(&mut model);
        let result = registry.execute("pane.splitVertical", &mut ctx, params);
        assert!(result.is_success());
        assert_eq!(model.get_all_panes_in_active_tab().len(), 2);
    }
}
