//! The workspace model: the canonical tree of tabs and recursively split
//! panes, with an observer-notified single source of truth.

pub mod model;
pub mod navigation;
pub mod observer;
pub mod serialization;
pub mod tree;
pub mod types;

pub use model::WorkspaceModel;
pub use navigation::Direction;
pub use observer::{ObserverCallback, ObserverToken};
pub use types::{
    clamp_ratio, MutationResult, Orientation, Pane, PaneNode, Side, Tab, WidgetKind, RATIO_MAX,
    RATIO_MIN,
};
