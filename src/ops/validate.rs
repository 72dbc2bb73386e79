use std::path::{Path, PathBuf};

use super::types::{Action, ActionRequest};

/// Reasons a submitted form is rejected before anything reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Memory and disk values must be positive integers.")]
    InvalidSize,

    #[error("{field} must not be empty.")]
    Blank { field: &'static str },

    #[error("{field} must not contain whitespace.")]
    Whitespace { field: &'static str },

    #[error("Directory not found: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("expected {expected} values, got {got}")]
    FieldCount { expected: usize, got: usize },
}

/// Turn raw dialog values into a request. Relative paths resolve against `cwd`.
pub fn parse_request(
    action: Action,
    values: &[String],
    cwd: &Path,
) -> Result<ActionRequest, FormError> {
    let expected = action.fields().len();
    if values.len() != expected {
        return Err(FormError::FieldCount {
            expected,
            got: values.len(),
        });
    }

    let request = match action {
        Action::CreateVm => ActionRequest::CreateVm {
            memory_mb: positive_int(&values[0])?,
            disk_gb: positive_int(&values[1])?,
        },
        Action::CreateDockerfile => ActionRequest::CreateDockerfile {
            dir: directory(&values[0], cwd)?,
            contents: dockerfile_contents(&values[1])?,
        },
        Action::BuildImage => ActionRequest::BuildImage {
            context: directory(&values[0], cwd)?,
            tag: token("Image name and tag", &values[1])?,
        },
        Action::ListImages => ActionRequest::ListImages,
        Action::ListContainers => ActionRequest::ListContainers,
        Action::StopContainer => ActionRequest::StopContainer {
            id: token("Container ID", &values[0])?,
        },
        Action::SearchLocal => ActionRequest::SearchLocal {
            term: token("Search term", &values[0])?,
        },
        Action::SearchHub => ActionRequest::SearchHub {
            term: token("Search term", &values[0])?,
        },
        Action::PullImage => ActionRequest::PullImage {
            reference: token("Image name", &values[0])?,
        },
    };
    Ok(request)
}

/// Digits only, non-zero, fits in `u64`.
pub fn positive_int(raw: &str) -> Result<u64, FormError> {
    let s = raw.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormError::InvalidSize);
    }
    match s.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(FormError::InvalidSize),
    }
}

fn directory(raw: &str, cwd: &Path) -> Result<PathBuf, FormError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(FormError::Blank { field: "Directory" });
    }
    let path = PathBuf::from(s);
    let path = if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    };
    if !path.is_dir() {
        return Err(FormError::NotADirectory(path));
    }
    Ok(path)
}

/// Single-line input: literal `\n` becomes a newline and the file ends with one.
pub fn dockerfile_contents(raw: &str) -> Result<String, FormError> {
    if raw.trim().is_empty() {
        return Err(FormError::Blank {
            field: "Dockerfile contents",
        });
    }
    let mut contents = raw.replace("\\n", "\n");
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    Ok(contents)
}

fn token(field: &'static str, raw: &str) -> Result<String, FormError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(FormError::Blank { field });
    }
    if s.chars().any(char::is_whitespace) {
        return Err(FormError::Whitespace { field });
    }
    Ok(s.to_string())
}
