//! Composite commands (§4.2): an ordered sequence executed as one unit,
//! stopping at the first non-success result.

use crate::command::Command;
use crate::context::CommandContext;
use crate::result::{CommandResult, CommandStatus};

pub struct Composite {
    name: String,
    steps: Vec<Box<dyn Command>>,
}

impl Composite {
    pub fn new(name: impl Into<String>, steps: Vec<Box<dyn Command>>) -> Self {
        Composite {
            name: name.into(),
            steps,
        }
    }
}

impl Command for Composite {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, ctx: &mut CommandContext) -> CommandResult {
        let mut data = serde_json::Map::new();
        let mut results = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            if !step.can_execute(ctx) {
                let result = CommandResult::not_applicable(format!(
                    "`{}` (step {index}) cannot run right now",
                    step.name()
                ));
                let stop = result.status != CommandStatus::Success;
                results.push((step.name().to_string(), result));
                if stop {
                    break;
                }
                continue;
            }
            let result = step.execute(ctx);
            let stop = result.status != CommandStatus::Success;
            results.push((step.name().to_string(), result));
            if stop {
                break;
            }
        }

        let all_succeeded = results.len() == self.steps.len()
            && results.iter().all(|(_, r)| r.status == CommandStatus::Success);

        data.insert(
            "steps".into(),
            serde_json::Value::Array(
                results
                    .iter()
                    .map(|(name, result)| {
                        serde_json::json!({
                            "command": name,
                            "status": format!("{:?}", result.status),
                            "message": result.message,
                        })
                    })
                    .collect(),
            ),
        );

        if all_succeeded {
            CommandResult::success_with(format!("{} completed", self.name), data)
        } else {
            let (failed_name, failed_result) = results.last().expect("at least one step ran");
            CommandResult {
                status: failed_result.status,
                message: format!("{} stopped at `{failed_name}`: {}", self.name, failed_result.message),
                data,
                error: failed_result.error.clone(),
            }
        }
    }
}
