use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

/// One entry in the actions menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateVm,
    CreateDockerfile,
    BuildImage,
    ListImages,
    ListContainers,
    StopContainer,
    SearchLocal,
    SearchHub,
    PullImage,
}

/// A single text input in an action's form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub placeholder: &'static str,
}

const fn field(label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec { label, placeholder }
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::CreateVm,
        Action::CreateDockerfile,
        Action::BuildImage,
        Action::ListImages,
        Action::ListContainers,
        Action::StopContainer,
        Action::SearchLocal,
        Action::SearchHub,
        Action::PullImage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::CreateVm => "Create Virtual Machine",
            Action::CreateDockerfile => "Create Dockerfile",
            Action::BuildImage => "Build Docker Image",
            Action::ListImages => "List Docker Images",
            Action::ListContainers => "List Running Containers",
            Action::StopContainer => "Stop Container",
            Action::SearchLocal => "Search Local Images",
            Action::SearchHub => "Search Docker Hub",
            Action::PullImage => "Pull Docker Image",
        }
    }

    /// Inputs collected by the action's dialog. Empty means the action runs immediately.
    pub fn fields(self) -> &'static [FieldSpec] {
        const VM: [FieldSpec; 2] = [
            field("Memory size for the VM (MB)", "512"),
            field("Disk size for the VM (GB)", "10"),
        ];
        const DOCKERFILE: [FieldSpec; 2] = [
            field("Directory to save the Dockerfile in", "."),
            field("Contents of the Dockerfile (\\n for newlines)", "FROM alpine:3.20\\nCMD [\"sh\"]"),
        ];
        const BUILD: [FieldSpec; 2] = [
            field("Path to the build context (directory with Dockerfile)", "."),
            field("Image name and tag", "myapp:latest"),
        ];
        const STOP: [FieldSpec; 1] = [field("Container ID or name to stop", "3f2a9c1b7d")];
        const SEARCH_LOCAL: [FieldSpec; 1] = [field("Image name to search locally", "alpine")];
        const SEARCH_HUB: [FieldSpec; 1] =
            [field("Image name to search on Docker Hub", "nginx")];
        const PULL: [FieldSpec; 1] = [field("Name of the image to pull", "alpine:latest")];

        match self {
            Action::CreateVm => &VM,
            Action::CreateDockerfile => &DOCKERFILE,
            Action::BuildImage => &BUILD,
            Action::ListImages | Action::ListContainers => &[],
            Action::StopContainer => &STOP,
            Action::SearchLocal => &SEARCH_LOCAL,
            Action::SearchHub => &SEARCH_HUB,
            Action::PullImage => &PULL,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|a| *a == self).unwrap_or(0)
    }
}

/// A validated, ready-to-run action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    CreateVm { memory_mb: u64, disk_gb: u64 },
    CreateDockerfile { dir: PathBuf, contents: String },
    BuildImage { context: PathBuf, tag: String },
    ListImages,
    ListContainers,
    StopContainer { id: String },
    SearchLocal { term: String },
    SearchHub { term: String },
    PullImage { reference: String },
}

impl ActionRequest {
    pub fn action(&self) -> Action {
        match self {
            ActionRequest::CreateVm { .. } => Action::CreateVm,
            ActionRequest::CreateDockerfile { .. } => Action::CreateDockerfile,
            ActionRequest::BuildImage { .. } => Action::BuildImage,
            ActionRequest::ListImages => Action::ListImages,
            ActionRequest::ListContainers => Action::ListContainers,
            ActionRequest::StopContainer { .. } => Action::StopContainer,
            ActionRequest::SearchLocal { .. } => Action::SearchLocal,
            ActionRequest::SearchHub { .. } => Action::SearchHub,
            ActionRequest::PullImage { .. } => Action::PullImage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Info,
    Error,
}

/// What the message box shows once an action finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub title: String,
    pub message: String,
    pub kind: OutcomeKind,
}

impl Outcome {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: OutcomeKind::Info,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: OutcomeKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == OutcomeKind::Error
    }
}

/// Events emitted while an action runs in the background.
#[derive(Debug)]
pub enum ActionEvent {
    Log(String),
    Finished(Outcome),
}

// ── docker --format '{{json .}}' rows ─────────────────────────────────

/// One row of `docker image ls`. Several rows share an ID when an image has many tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Repository", default)]
    pub repository: String,
    #[serde(rename = "Tag", default)]
    pub tag: String,
}

/// An image with all of its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub id: String,
    pub tags: Vec<String>,
}

/// One row of `docker ps`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Names", default)]
    pub names: String,
}

impl ContainerRow {
    /// Primary name; `docker ps` joins multiple names with commas.
    pub fn name(&self) -> &str {
        self.names.split(',').next().unwrap_or_default()
    }
}

/// One row of `docker search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "StarCount", default, deserialize_with = "lenient_u64")]
    pub star_count: u64,
    #[serde(rename = "IsOfficial", default, deserialize_with = "lenient_bool")]
    pub is_official: bool,
}

// The CLI renders these as strings ("1234", "true", "[OK]") depending on version.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Number(u64),
    Text(String),
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => n,
        Scalar::Text(s) => s.trim().parse().unwrap_or(0),
        Scalar::Bool(_) => 0,
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Bool(b) => b,
        Scalar::Number(n) => n != 0,
        Scalar::Text(s) => matches!(s.trim(), "true" | "[OK]" | "OK"),
    })
}
