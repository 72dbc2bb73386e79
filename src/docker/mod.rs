// Docker CLI plumbing: availability check, captured and streamed invocations, cancellation.

pub mod engine;
pub mod run;
pub mod types;

pub use engine::{capture, capture_command, ensure_available};
pub use run::spawn;
pub use types::{CancelToken, CommandResult, DEFAULT_PROGRAM, DockerCommand, OutputLine};
