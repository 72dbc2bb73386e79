mod form;
mod input;
mod state;

pub use form::{Form, FormField, prefill};
pub use input::handle_key;
pub use state::{ACTIVITY_LIMIT, App, Panel};
