//! Path-addressed lenses over the exercise tree.
//!
//! `get` focuses a path; `update` rebuilds the tree from the root with one
//! node replaced. Every node along the path is a fresh copy, every sibling
//! subtree keeps its `Arc` identity, and the input tree is never mutated.

use std::sync::Arc;

use crate::node::Node;
use crate::path::{ANSWER, PathKey, SOLUTIONS, TITLE};
use crate::text::char_to_byte;

/// Error resolving a path against a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LensError {
    #[error("{kind} has no field {field:?}")]
    MissingField { kind: &'static str, field: String },
    #[error("index {index} out of bounds for list of {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("unexpected key {key} at depth {depth}")]
    UnexpectedKey { key: String, depth: usize },
    #[error("path ends on a list, not a node")]
    NotANode,
    #[error("expected a text node, found {kind}")]
    NotText { kind: &'static str },
}

/// What a path resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Focus<'a> {
    Node(&'a Arc<Node>),
    /// The `solutions` list of an exercise.
    List(&'a [Arc<Node>]),
}

impl<'a> Focus<'a> {
    pub fn node(&self) -> Option<&'a Arc<Node>> {
        match self {
            Focus::Node(node) => Some(node),
            Focus::List(_) => None,
        }
    }

    pub fn list(&self) -> Option<&'a [Arc<Node>]> {
        match self {
            Focus::List(items) => Some(items),
            Focus::Node(_) => None,
        }
    }
}

fn field_child<'a>(node: &'a Node, key: &PathKey, depth: usize) -> Result<Focus<'a>, LensError> {
    let Some(field) = key.as_field() else {
        return Err(LensError::UnexpectedKey {
            key: key.to_string(),
            depth,
        });
    };
    match (node, field) {
        (Node::Exercise { title, .. }, TITLE) => Ok(Focus::Node(title)),
        (Node::Exercise { solutions, .. }, SOLUTIONS) => Ok(Focus::List(solutions)),
        (Node::Solution { answer, .. }, ANSWER) => Ok(Focus::Node(answer)),
        _ => Err(LensError::MissingField {
            kind: node.kind().as_str(),
            field: field.to_string(),
        }),
    }
}

fn list_item<'a>(
    items: &'a [Arc<Node>],
    key: &PathKey,
    depth: usize,
) -> Result<&'a Arc<Node>, LensError> {
    let Some(index) = key.as_index() else {
        return Err(LensError::UnexpectedKey {
            key: key.to_string(),
            depth,
        });
    };
    items.get(index).ok_or(LensError::IndexOutOfBounds {
        index,
        len: items.len(),
    })
}

/// Resolve a path against a tree.
pub fn get<'a>(root: &'a Arc<Node>, path: &[PathKey]) -> Result<Focus<'a>, LensError> {
    let mut focus = Focus::Node(root);
    for (depth, key) in path.iter().enumerate() {
        focus = match focus {
            Focus::Node(node) => field_child(node, key, depth)?,
            Focus::List(items) => Focus::Node(list_item(items, key, depth)?),
        };
    }
    Ok(focus)
}

/// Resolve a path that must end on a node.
pub fn get_node<'a>(root: &'a Arc<Node>, path: &[PathKey]) -> Result<&'a Arc<Node>, LensError> {
    get(root, path)?.node().ok_or(LensError::NotANode)
}

/// Resolve a path that must end on a text leaf, returning its value.
pub fn get_text<'a>(root: &'a Arc<Node>, path: &[PathKey]) -> Result<&'a str, LensError> {
    let node = get_node(root, path)?;
    node.as_text().ok_or(LensError::NotText {
        kind: node.kind().as_str(),
    })
}

/// Replace the node at `path` with `f(old)`, returning the new root.
///
/// The returned tree shares every subtree off the path with `root`.
pub fn update<F>(root: &Arc<Node>, path: &[PathKey], f: F) -> Result<Arc<Node>, LensError>
where
    F: FnOnce(&Node) -> Result<Node, LensError>,
{
    update_node(root, path, 0, f)
}

fn update_node<F>(
    node: &Arc<Node>,
    path: &[PathKey],
    depth: usize,
    f: F,
) -> Result<Arc<Node>, LensError>
where
    F: FnOnce(&Node) -> Result<Node, LensError>,
{
    let Some((key, rest)) = path.split_first() else {
        return Ok(Arc::new(f(node)?));
    };

    let Some(field) = key.as_field() else {
        return Err(LensError::UnexpectedKey {
            key: key.to_string(),
            depth,
        });
    };

    let rebuilt = match (node.as_ref(), field) {
        (Node::Exercise { title, solutions }, TITLE) => Node::Exercise {
            title: update_node(title, rest, depth + 1, f)?,
            solutions: solutions.clone(),
        },
        (Node::Exercise { title, solutions }, SOLUTIONS) => Node::Exercise {
            title: Arc::clone(title),
            solutions: update_list(solutions, rest, depth + 1, f)?,
        },
        (Node::Solution { answer, correct }, ANSWER) => Node::Solution {
            answer: update_node(answer, rest, depth + 1, f)?,
            correct: *correct,
        },
        _ => {
            return Err(LensError::MissingField {
                kind: node.kind().as_str(),
                field: field.to_string(),
            });
        }
    };
    Ok(Arc::new(rebuilt))
}

fn update_list<F>(
    items: &[Arc<Node>],
    path: &[PathKey],
    depth: usize,
    f: F,
) -> Result<Vec<Arc<Node>>, LensError>
where
    F: FnOnce(&Node) -> Result<Node, LensError>,
{
    let Some((key, rest)) = path.split_first() else {
        return Err(LensError::NotANode);
    };
    let target = list_item(items, key, depth)?;
    let replacement = update_node(target, rest, depth + 1, f)?;

    // Cloning the Vec clones Arcs, so the other items keep their identity.
    let mut out = items.to_vec();
    if let Some(index) = key.as_index() {
        out[index] = replacement;
    }
    Ok(out)
}

/// Replace the value of the text leaf at `path`.
pub fn set_text(
    root: &Arc<Node>,
    path: &[PathKey],
    value: impl Into<String>,
) -> Result<Arc<Node>, LensError> {
    let value = value.into();
    update(root, path, move |node| match node {
        Node::Text { .. } => Ok(Node::Text { value }),
        other => Err(LensError::NotText {
            kind: other.kind().as_str(),
        }),
    })
}

/// Insert `insert` into the text leaf at `path`, `offset` chars from its start.
///
/// Offsets past the end of the value append.
pub fn splice_text(
    root: &Arc<Node>,
    path: &[PathKey],
    offset: usize,
    insert: &str,
) -> Result<Arc<Node>, LensError> {
    update(root, path, |node| match node {
        Node::Text { value } => {
            let at = char_to_byte(value, offset);
            let mut spliced = String::with_capacity(value.len() + insert.len());
            spliced.push_str(&value[..at]);
            spliced.push_str(insert);
            spliced.push_str(&value[at..]);
            Ok(Node::Text { value: spliced })
        }
        other => Err(LensError::NotText {
            kind: other.kind().as_str(),
        }),
    })
}
