//! Small helpers shared across the built-in command catalog.

use viloxterm_workspace::WidgetKind;

pub fn widget_kind_from_str(s: &str) -> WidgetKind {
    match s {
        "terminal" => WidgetKind::Terminal,
        "editor" => WidgetKind::Editor,
        "output" => WidgetKind::Output,
        "settings" => WidgetKind::Settings,
        "fileExplorer" => WidgetKind::FileExplorer,
        "placeholder" => WidgetKind::Placeholder,
        other => WidgetKind::Custom(other.to_string()),
    }
}
