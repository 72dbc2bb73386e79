// The engine operations behind each menu action.

pub mod commands;
pub mod dockerfile;
pub mod format;
pub mod orchestrator;
mod types;
pub mod validate;

pub use dockerfile::{discover_dockerfiles, write_dockerfile};
pub use orchestrator::{execute, run_action};
pub use types::{
    Action, ActionEvent, ActionRequest, ContainerRow, FieldSpec, ImageRow, ImageSummary, Outcome,
    OutcomeKind, SearchHit,
};
pub use validate::FormError;
