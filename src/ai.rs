//! Interface to the external idea generator and the single in-flight guard.

use crate::model::{now, Node, ThemeColor};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::thread;
use thiserror::Error;

/// Most ideas turned into nodes per request.
pub const MAX_IDEAS: usize = 3;
pub const AI_IDEA_COLOR: ThemeColor = ThemeColor::Lavender;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Target node {0} is not part of the request")]
    UnknownTarget(String),
    #[error("Idea generator is not configured")]
    NotConfigured,
    #[error("Failed to run idea command: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Idea command exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("Invalid request payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRequest {
    pub nodes: Vec<Node>,
    pub target_node_id: String,
}

impl IdeaRequest {
    pub fn target(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == self.target_node_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdeaResponse {
    #[serde(default)]
    pub ideas: Vec<String>,
}

pub trait IdeaGenerator: Send + Sync {
    fn generate(&self, request: &IdeaRequest) -> Result<Vec<String>, AiError>;
}

/// Runs a shell command with the request JSON on stdin. Stdout is read as
/// `{"ideas": [...]}`, or as a bulleted list when it is not JSON.
#[derive(Debug, Clone)]
pub struct CommandIdeaGenerator {
    pub command: String,
}

impl CommandIdeaGenerator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl IdeaGenerator for CommandIdeaGenerator {
    fn generate(&self, request: &IdeaRequest) -> Result<Vec<String>, AiError> {
        if request.target().is_none() {
            return Err(AiError::UnknownTarget(request.target_node_id.clone()));
        }
        let payload = serde_json::to_string(request)?;

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin on its own thread so a command that writes before it
        // has read everything cannot stall on a full pipe
        let stdin = child.stdin.take();
        let output = thread::scope(|scope| {
            if let Some(mut stdin) = stdin {
                scope.spawn(move || {
                    // A command that ignores its input may close stdin early
                    if let Err(e) = stdin.write_all(payload.as_bytes()) {
                        log::debug!("idea command closed stdin: {}", e);
                    }
                });
            }
            child.wait_with_output()
        })?;

        if !output.status.success() {
            return Err(AiError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(parse_ideas(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn bullet_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:・|•|-|\*)\s*(.+?)\s*$").expect("valid bullet regex"))
}

/// Extracts ideas from generator output: a JSON `{"ideas": [...]}` object
/// or bulleted lines. Blank entries are dropped and at most [`MAX_IDEAS`] kept.
pub fn parse_ideas(text: &str) -> Vec<String> {
    let ideas: Vec<String> = match serde_json::from_str::<IdeaResponse>(text.trim()) {
        Ok(response) => response.ideas,
        Err(_) => text
            .lines()
            .filter_map(|line| bullet_regex().captures(line))
            .map(|caps| caps[1].to_string())
            .collect(),
    };

    ideas
        .into_iter()
        .map(|idea| idea.trim().to_string())
        .filter(|idea| !idea.is_empty())
        .take(MAX_IDEAS)
        .collect()
}

/// One lavender, AI-flagged child of `target_id` per idea.
pub fn idea_nodes(target_id: &str, ideas: &[String]) -> Vec<Node> {
    let stamp = now();
    ideas
        .iter()
        .take(MAX_IDEAS)
        .enumerate()
        .map(|(i, idea)| {
            let id = format!("ai-{}-{}-{}", target_id, stamp.timestamp_millis(), i);
            let mut node = Node::new(id, idea.clone(), Some(target_id.to_string()));
            node.color = AI_IDEA_COLOR;
            node.is_ai_generated = true;
            node.created_at = stamp;
            node.updated_at = stamp;
            node
        })
        .collect()
}

/// Map and node an outstanding idea request was made for.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingIdeas {
    pub map_id: String,
    pub node_id: String,
}

/// Allows one outstanding idea request at a time. A second request is
/// refused rather than queued.
#[derive(Debug, Default, Clone)]
pub struct InFlightGuard {
    pending: Option<PendingIdeas>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard for `node_id` in `map_id`; false if a request is
    /// outstanding.
    pub fn try_begin(&mut self, map_id: &str, node_id: &str) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(PendingIdeas {
            map_id: map_id.to_string(),
            node_id: node_id.to_string(),
        });
        true
    }

    /// Releases the guard and returns what it was held for.
    pub fn finish(&mut self) -> Option<PendingIdeas> {
        self.pending.take()
    }

    pub fn in_flight(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.node_id.as_str())
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }
}
