//! The exercise document model.
//!
//! A document is an immutable tree of tagged nodes. Children sit behind `Arc`
//! so that an edit can rebuild the path to the changed leaf and keep every
//! untouched subtree shared with the previous tree.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Discriminant of a [`Node`].
///
/// The string form is used for dispatch in JSON (`"type"`) and for the DOM
/// `data-type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Exercise,
    Solution,
    Text,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Exercise => "exercise",
            NodeKind::Solution => "solution",
            NodeKind::Text => "text",
        }
    }

}

/// A `data-type` value naming no node kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node kind {0:?}")]
pub struct UnknownKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exercise" => Ok(NodeKind::Exercise),
            "solution" => Ok(NodeKind::Solution),
            "text" => Ok(NodeKind::Text),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the exercise tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// A multiple-choice exercise: a title and an ordered list of solutions.
    Exercise {
        title: Arc<Node>,
        solutions: Vec<Arc<Node>>,
    },
    /// One answer option.
    Solution { answer: Arc<Node>, correct: bool },
    /// A plain string leaf.
    Text { value: String },
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn solution(answer: impl Into<String>, correct: bool) -> Self {
        Node::Solution {
            answer: Arc::new(Node::text(answer)),
            correct,
        }
    }

    pub fn exercise(title: impl Into<String>, solutions: impl IntoIterator<Item = Node>) -> Self {
        Node::Exercise {
            title: Arc::new(Node::text(title)),
            solutions: solutions.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Exercise { .. } => NodeKind::Exercise,
            Node::Solution { .. } => NodeKind::Solution,
            Node::Text { .. } => NodeKind::Text,
        }
    }

    /// The string value of a text leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text { .. })
    }

    /// Parse a tree from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The demo exercise shown on the page.
pub fn sample_exercise() -> Node {
    Node::exercise(
        "Which of the following are programming languages?",
        [
            Node::solution("JavaScript", true),
            Node::solution("Python", true),
            Node::solution("HTML", false),
            Node::solution("Rust", true),
        ],
    )
}
