//! `CommandContext` (§4.2): what a command executes against.

use serde_json::{Map, Value};
use viloxterm_common::{PaneId, TabId};
use viloxterm_workspace::WorkspaceModel;

use crate::services::Services;

pub struct CommandContext<'a> {
    pub model: &'a mut WorkspaceModel,
    pub active_tab_id: Option<TabId>,
    pub active_pane_id: Option<PaneId>,
    pub parameters: Map<String, Value>,
    pub services: Services,
}

impl<'a> CommandContext<'a> {
    pub fn new(model: &'a mut WorkspaceModel) -> Self {
        CommandContext {
            model,
            active_tab_id: None,
            active_pane_id: None,
            parameters: Map::new(),
            services: Services::new(),
        }
    }

    /// The tab a command should operate on: the context's explicit override
    /// first, else the model's current active tab.
    pub fn resolve_active_tab(&self) -> Option<TabId> {
        self.active_tab_id
            .clone()
            .or_else(|| self.model.active_tab_id().cloned())
    }

    /// The pane a command should operate on: the context's explicit
    /// override first, else the model's current active pane.
    pub fn resolve_active_pane(&self) -> Option<PaneId> {
        self.active_pane_id
            .clone()
            .or_else(|| self.model.get_active_pane().map(|pane| pane.id.clone()))
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.param(key).and_then(Value::as_str)
    }

    pub fn param_f64(&self, key: &str) -> Option<f64> {
        self.param(key).and_then(Value::as_f64)
    }

    pub fn param_u64(&self, key: &str) -> Option<u64> {
        self.param(key).and_then(Value::as_u64)
    }

    pub fn param_bool(&self, key: &str) -> Option<bool> {
        self.param(key).and_then(Value::as_bool)
    }
}
