use std::path::Path;

use crate::config::Config;
use crate::ops::{self, Action, FieldSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub spec: FieldSpec,
    pub value: String,
}

/// Modal input dialog for one action.
#[derive(Debug, Clone)]
pub struct Form {
    pub action: Action,
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl Form {
    /// Build a form for `action`. Missing prefill values start empty.
    pub fn new(action: Action, prefill: Vec<String>) -> Self {
        let mut values = prefill.into_iter();
        let fields = action
            .fields()
            .iter()
            .map(|spec| FormField {
                spec: *spec,
                value: values.next().unwrap_or_default(),
            })
            .collect();
        Self {
            action,
            fields,
            focused: 0,
        }
    }

    pub fn title(&self) -> &'static str {
        self.action.label()
    }

    pub fn input(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.clear();
        }
    }

    pub fn next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn on_last_field(&self) -> bool {
        self.focused + 1 >= self.fields.len()
    }

    pub fn values(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value.clone()).collect()
    }
}

/// Initial field values for `action`, taken from config and the working directory.
pub fn prefill(action: Action, cfg: &Config, cwd: &Path) -> Vec<String> {
    let num = |n: Option<u64>| n.map(|v| v.to_string()).unwrap_or_default();
    match action {
        Action::CreateVm => vec![num(cfg.default_memory_mb), num(cfg.default_disk_gb)],
        Action::CreateDockerfile => vec![".".to_string(), String::new()],
        Action::BuildImage => {
            let context = ops::discover_dockerfiles(cwd, cfg.dockerfile_search_depth)
                .into_iter()
                .next()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".".to_string());
            vec![context, String::new()]
        }
        _ => Vec::new(),
    }
}
