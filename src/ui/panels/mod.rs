mod actions;
mod activity;

pub use actions::draw_actions;
pub use activity::draw_activity;
