//! TOML curriculum parser.
//!
//! Loads curricula (topics plus edges) from TOML files and directories,
//! validates them, and builds [`KnowledgeGraph`]s from them.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::{EdgeKind, KnowledgeGraph, DEFAULT_TOPIC_WEIGHT};

/// A parsed curriculum file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topics: Vec<TopicDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
}

/// A topic declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDef {
    pub id: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

/// An edge declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: EdgeKind,
}

fn default_weight() -> f64 {
    DEFAULT_TOPIC_WEIGHT
}

/// Intermediate TOML structure for parsing curriculum files.
#[derive(Debug, Deserialize)]
struct TomlCurriculumFile {
    curriculum: TomlCurriculumHeader,
    #[serde(default)]
    topics: Vec<TopicDef>,
    #[serde(default)]
    edges: Vec<EdgeDef>,
}

#[derive(Debug, Deserialize)]
struct TomlCurriculumHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

impl Curriculum {
    /// Build a graph from this curriculum.
    ///
    /// Topics are inserted first, in declaration order, then edges. Edges
    /// whose source is not a declared topic are skipped with a warning;
    /// [`validate_curriculum`] reports them up front.
    pub fn build_graph(&self) -> KnowledgeGraph {
        let graph = KnowledgeGraph::new();
        for topic in &self.topics {
            graph.add_node(topic.id.clone(), topic.weight);
        }
        for edge in &self.edges {
            if let Err(e) = graph.add_edge(&edge.from, &edge.to, edge.kind.clone()) {
                tracing::warn!("curriculum '{}': {}", self.id, e);
            }
        }
        graph
    }
}

/// Parse a single TOML file into a `Curriculum`.
pub fn parse_curriculum(path: &Path) -> Result<Curriculum> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read curriculum file: {}", path.display()))?;

    parse_curriculum_str(&content, path)
}

/// Parse a TOML string into a `Curriculum` (useful for testing).
pub fn parse_curriculum_str(content: &str, source_path: &Path) -> Result<Curriculum> {
    let parsed: TomlCurriculumFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(Curriculum {
        id: parsed.curriculum.id,
        name: parsed.curriculum.name,
        description: parsed.curriculum.description,
        topics: parsed.topics,
        edges: parsed.edges,
    })
}

/// Recursively load all `.toml` curriculum files from a directory.
pub fn load_curriculum_directory(dir: &Path) -> Result<Vec<Curriculum>> {
    let mut curricula = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            curricula.extend(load_curriculum_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_curriculum(&path) {
                Ok(curriculum) => curricula.push(curriculum),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(curricula)
}

/// A validation warning for a curriculum.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The topic ID (if applicable).
    pub topic_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a curriculum for common issues.
pub fn validate_curriculum(curriculum: &Curriculum) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut declared = HashSet::new();
    for topic in &curriculum.topics {
        if !declared.insert(topic.id.as_str()) {
            warnings.push(ValidationWarning {
                topic_id: Some(topic.id.clone()),
                message: format!("duplicate topic ID: {}", topic.id),
            });
        }
        if !(topic.weight > 0.0 && topic.weight.is_finite()) {
            warnings.push(ValidationWarning {
                topic_id: Some(topic.id.clone()),
                message: format!("weight must be positive and finite, got {}", topic.weight),
            });
        }
    }

    for edge in &curriculum.edges {
        if !declared.contains(edge.from.as_str()) {
            warnings.push(ValidationWarning {
                topic_id: Some(edge.from.clone()),
                message: format!(
                    "edge {} -> {} starts at an undeclared topic and will be rejected",
                    edge.from, edge.to
                ),
            });
        }
        if !declared.contains(edge.to.as_str()) {
            warnings.push(ValidationWarning {
                topic_id: Some(edge.to.clone()),
                message: format!(
                    "edge {} -> {} ends at an undeclared topic; no learning path can reach it",
                    edge.from, edge.to
                ),
            });
        }
        if edge.from == edge.to {
            warnings.push(ValidationWarning {
                topic_id: Some(edge.from.clone()),
                message: format!("self-loop on {}", edge.from),
            });
        }
    }

    if let Some(cycle) = find_prerequisite_cycle(curriculum) {
        warnings.push(ValidationWarning {
            topic_id: cycle.first().cloned(),
            message: format!("prerequisite cycle: {}", cycle.join(" -> ")),
        });
    }

    warnings
}

/// Find one cycle among `prerequisite` edges, if any.
fn find_prerequisite_cycle(curriculum: &Curriculum) -> Option<Vec<String>> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in curriculum
        .edges
        .iter()
        .filter(|e| e.kind.is_prerequisite() && e.from != e.to)
    {
        adjacency.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        InProgress,
        Done,
    }

    fn successors<'g, 'a>(
        adjacency: &'g HashMap<&'a str, Vec<&'a str>>,
        node: &str,
    ) -> std::slice::Iter<'g, &'a str> {
        adjacency.get(node).map(Vec::as_slice).unwrap_or_default().iter()
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for edge in &curriculum.edges {
        let root = edge.from.as_str();
        if marks.contains_key(root) {
            continue;
        }

        // The current DFS path, each topic paired with its unvisited successors.
        marks.insert(root, Mark::InProgress);
        let mut stack = vec![(root, successors(&adjacency, root))];

        while let Some((_, pending)) = stack.last_mut() {
            let Some(&next) = pending.next() else {
                if let Some((done, _)) = stack.pop() {
                    marks.insert(done, Mark::Done);
                }
                continue;
            };

            match marks.get(next) {
                Some(Mark::InProgress) => {
                    let start = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                    let mut cycle: Vec<String> = stack[start..].iter().map(|(n, _)| n.to_string()).collect();
                    cycle.push(next.to_string());
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(next, Mark::InProgress);
                    stack.push((next, successors(&adjacency, next)));
                }
            }
        }
    }
    None
}
