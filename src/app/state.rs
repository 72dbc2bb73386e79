use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::{debug, warn};

use crate::config::Config;
use crate::docker::CancelToken;
use crate::ops::{self, Action, ActionEvent, ActionRequest, Outcome};

use super::form::{Form, prefill};

/// Activity lines kept before the oldest are dropped.
pub const ACTIVITY_LIMIT: usize = 1000;

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Actions,
    Activity,
}

impl Panel {
    pub fn toggle(self) -> Self {
        match self {
            Panel::Actions => Panel::Activity,
            Panel::Activity => Panel::Actions,
        }
    }
}

/// Top-level application state.
pub struct App {
    pub running: bool,
    pub focused_panel: Panel,
    pub config: Config,
    pub cwd: PathBuf,

    /// Index of the selected entry in the actions menu.
    pub action_index: usize,
    /// Output of past and running actions, oldest first.
    pub activity: Vec<String>,
    /// Lines scrolled up from the bottom of the activity panel. 0 follows the tail.
    pub activity_scroll: usize,
    /// One-line hint shown in the status bar.
    pub status: String,

    pub form: Option<Form>,
    pub message: Option<Outcome>,
    /// Lines scrolled down inside the message box.
    pub message_scroll: usize,
    pub show_help: bool,

    /// Validated request waiting to be started by the event loop.
    pub pending: Option<ActionRequest>,
    /// Action currently running in the background.
    pub busy: Option<Action>,
    pub action_rx: Option<Receiver<ActionEvent>>,
    pub cancel_token: Option<CancelToken>,
}

impl App {
    pub fn new(config: Config, cwd: PathBuf) -> Self {
        Self {
            running: true,
            focused_panel: Panel::Actions,
            config,
            cwd,
            action_index: 0,
            activity: Vec::new(),
            activity_scroll: 0,
            status: String::new(),
            form: None,
            message: None,
            message_scroll: 0,
            show_help: false,
            pending: None,
            busy: None,
            action_rx: None,
            cancel_token: None,
        }
    }

    pub fn selected_action(&self) -> Action {
        Action::ALL
            .get(self.action_index)
            .copied()
            .unwrap_or(Action::CreateVm)
    }

    pub fn select_next(&mut self) {
        self.action_index = (self.action_index + 1).min(Action::ALL.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.action_index = self.action_index.saturating_sub(1);
    }

    /// Open the dialog for `action`, or queue it directly when it takes no input.
    pub fn open_action(&mut self, action: Action) {
        if let Some(running) = self.busy {
            self.status = format!("{} is still running (Esc to cancel)", running.label());
            return;
        }
        self.action_index = action.index();

        if action.fields().is_empty() {
            match ops::validate::parse_request(action, &[], &self.cwd) {
                Ok(request) => self.pending = Some(request),
                Err(e) => self.show_message(Outcome::error(action.label(), e.to_string())),
            }
            return;
        }

        let values = prefill(action, &self.config, &self.cwd);
        self.form = Some(Form::new(action, values));
    }

    /// Validate the open form. On success the form closes and the request is queued;
    /// on failure the form stays open under an error message.
    pub fn submit_form(&mut self) {
        let Some(form) = &self.form else { return };
        match ops::validate::parse_request(form.action, &form.values(), &self.cwd) {
            Ok(request) => {
                self.form = None;
                self.pending = Some(request);
            }
            Err(e) => {
                let outcome = Outcome::error(form.title(), e.to_string());
                self.show_message(outcome);
            }
        }
    }

    /// Start a queued request on a background thread.
    pub fn start_pending(&mut self) {
        let Some(request) = self.pending.take() else {
            return;
        };
        if self.busy.is_some() {
            warn!("dropping request while another action is running");
            return;
        }

        let action = request.action();
        debug!(?request, "queueing action");
        self.push_activity(format!("── {} ──", action.label()));
        self.status = format!("Running {}… (Esc to cancel)", action.label());

        let cancel = CancelToken::new();
        let rx = ops::run_action(request, self.config.clone(), cancel.clone());
        self.action_rx = Some(rx);
        self.cancel_token = Some(cancel);
        self.busy = Some(action);
    }

    pub fn cancel_running(&mut self) {
        if let Some(token) = &self.cancel_token {
            token.cancel();
            self.status = "Cancelling…".to_string();
        }
    }

    /// Drain pending action events without blocking.
    pub fn drain_events(&mut self) {
        let mut finished = None;
        if let Some(rx) = &self.action_rx {
            let mut lines = Vec::new();
            loop {
                match rx.try_recv() {
                    Ok(ActionEvent::Log(line)) => lines.push(line),
                    Ok(ActionEvent::Finished(outcome)) => {
                        finished = Some(outcome);
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        // Worker is gone without a result.
                        let title = self.busy.map_or("Action", Action::label);
                        warn!(action = title, "action worker exited without a result");
                        finished = Some(Outcome::error(
                            title,
                            "The action stopped without reporting a result.",
                        ));
                        break;
                    }
                }
            }
            for line in lines {
                self.push_activity(line);
            }
        }

        if let Some(outcome) = finished {
            let verdict = if outcome.is_error() { "failed" } else { "done" };
            self.push_activity(format!("{}: {verdict}", outcome.title));
            self.status.clear();
            self.show_message(outcome);
            self.action_rx = None;
            self.cancel_token = None;
            self.busy = None;
        }
    }

    /// Open the message box at its first line.
    pub fn show_message(&mut self, outcome: Outcome) {
        self.message = Some(outcome);
        self.message_scroll = 0;
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
        self.message_scroll = 0;
    }

    pub fn scroll_message_down(&mut self, by: usize) {
        self.message_scroll = self.message_scroll.saturating_add(by);
    }

    pub fn scroll_message_up(&mut self, by: usize) {
        self.message_scroll = self.message_scroll.saturating_sub(by);
    }

    /// Keep the message scroll within what the last layout can show.
    pub fn clamp_message_scroll(&mut self, max: usize) {
        self.message_scroll = self.message_scroll.min(max);
    }

    pub fn push_activity(&mut self, line: String) {
        self.activity.push(line);
        if self.activity.len() > ACTIVITY_LIMIT {
            let excess = self.activity.len() - ACTIVITY_LIMIT;
            self.activity.drain(..excess);
        }
    }

    pub fn scroll_activity_up(&mut self, by: usize) {
        let max = self.activity.len().saturating_sub(1);
        self.activity_scroll = (self.activity_scroll + by).min(max);
    }

    pub fn scroll_activity_down(&mut self, by: usize) {
        self.activity_scroll = self.activity_scroll.saturating_sub(by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn app_in(dir: &std::path::Path) -> App {
        App::new(Config::default(), dir.to_path_buf())
    }

    fn wait_until_idle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.busy.is_some() && Instant::now() < deadline {
            app.drain_events();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn selection_is_clamped() {
        let mut app = app_in(std::path::Path::new("/"));
        app.select_prev();
        assert_eq!(app.action_index, 0);
        for _ in 0..20 {
            app.select_next();
        }
        assert_eq!(app.selected_action(), Action::PullImage);
    }

    #[test]
    fn actions_without_fields_queue_immediately() {
        let mut app = app_in(std::path::Path::new("/"));
        app.open_action(Action::ListContainers);
        assert!(app.form.is_none());
        assert_eq!(app.pending, Some(ActionRequest::ListContainers));
    }

    #[test]
    fn invalid_form_stays_open_with_error() {
        let mut app = app_in(std::path::Path::new("/"));
        app.open_action(Action::CreateVm);
        if let Some(form) = app.form.as_mut() {
            form.input('x');
        }
        app.submit_form();

        assert!(app.form.is_some());
        assert!(app.pending.is_none());
        let msg = app.message.as_ref().unwrap();
        assert!(msg.is_error());
        assert_eq!(msg.message, "Memory and disk values must be positive integers.");
    }

    #[test]
    fn busy_app_refuses_new_actions() {
        let mut app = app_in(std::path::Path::new("/"));
        app.busy = Some(Action::PullImage);
        app.open_action(Action::StopContainer);
        assert!(app.form.is_none());
        assert!(app.status.contains("Pull Docker Image"));
    }

    #[test]
    fn dockerfile_action_runs_to_a_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.open_action(Action::CreateDockerfile);
        let form = app.form.as_mut().unwrap();
        form.next();
        for c in "FROM alpine".chars() {
            form.input(c);
        }
        app.submit_form();
        assert!(app.form.is_none());

        app.start_pending();
        assert_eq!(app.busy, Some(Action::CreateDockerfile));
        wait_until_idle(&mut app);

        let msg = app.message.as_ref().expect("action should finish");
        assert!(!msg.is_error(), "{msg:?}");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Dockerfile")).unwrap(),
            "FROM alpine\n"
        );
        assert!(app.activity.iter().any(|l| l == "Create Dockerfile: done"));
        assert!(app.cancel_token.is_none());
    }

    #[test]
    fn dead_worker_releases_busy_state() {
        let mut app = app_in(std::path::Path::new("/"));
        let (tx, rx) = std::sync::mpsc::channel::<ActionEvent>();
        tx.send(ActionEvent::Log("pulling".into())).unwrap();
        drop(tx);
        app.action_rx = Some(rx);
        app.cancel_token = Some(CancelToken::new());
        app.busy = Some(Action::PullImage);

        app.drain_events();

        assert!(app.busy.is_none());
        assert!(app.action_rx.is_none());
        assert!(app.cancel_token.is_none());
        assert!(app.activity.iter().any(|l| l == "pulling"));
        let msg = app.message.as_ref().unwrap();
        assert!(msg.is_error());
        assert_eq!(msg.title, "Pull Docker Image");

        app.dismiss_message();
        app.open_action(Action::StopContainer);
        assert!(app.form.is_some(), "new actions are accepted again");
    }

    #[test]
    fn message_scroll_resets_and_clamps() {
        let mut app = app_in(std::path::Path::new("/"));
        app.show_message(Outcome::info("List Docker Images", "a\nb\nc"));
        app.scroll_message_down(5);
        app.clamp_message_scroll(2);
        assert_eq!(app.message_scroll, 2);
        app.scroll_message_up(1);
        assert_eq!(app.message_scroll, 1);

        app.show_message(Outcome::info("x", "y"));
        assert_eq!(app.message_scroll, 0);
        app.scroll_message_down(3);
        app.dismiss_message();
        assert_eq!(app.message_scroll, 0);
        assert!(app.message.is_none());
    }

    #[test]
    fn activity_is_bounded() {
        let mut app = app_in(std::path::Path::new("/"));
        for i in 0..ACTIVITY_LIMIT + 5 {
            app.push_activity(i.to_string());
        }
        assert_eq!(app.activity.len(), ACTIVITY_LIMIT);
        assert_eq!(app.activity[0], "5");
    }

    #[test]
    fn activity_scroll_stays_in_range() {
        let mut app = app_in(std::path::Path::new("/"));
        for i in 0..3 {
            app.push_activity(i.to_string());
        }
        app.scroll_activity_up(10);
        assert_eq!(app.activity_scroll, 2);
        app.scroll_activity_down(10);
        assert_eq!(app.activity_scroll, 0);
    }
}
