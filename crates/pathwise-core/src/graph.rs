//! In-memory knowledge graph of topics.
//!
//! Topics are joined by directed, typed edges. The graph answers two
//! questions for the recommendation layer: which topics are direct
//! prerequisites of a topic, and what is the shortest chain of topics
//! leading from one topic to another.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Weight assigned to topics inserted without an explicit weight.
pub const DEFAULT_TOPIC_WEIGHT: f64 = 1.0;

/// The relationship an edge expresses between two topics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeKind {
    /// Loosely related topics.
    #[default]
    Related,
    /// The source must be understood before the destination.
    Prerequisite,
    /// Any other caller-defined relationship.
    Other(String),
}

impl EdgeKind {
    /// Collapse an `Other` that spells a built-in kind into that kind.
    pub fn normalized(self) -> Self {
        match self {
            EdgeKind::Other(name) => EdgeKind::from(name),
            kind => kind,
        }
    }

    pub fn is_prerequisite(&self) -> bool {
        match self {
            EdgeKind::Prerequisite => true,
            EdgeKind::Other(name) => name == "prerequisite",
            EdgeKind::Related => false,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Related => write!(f, "related"),
            EdgeKind::Prerequisite => write!(f, "prerequisite"),
            EdgeKind::Other(kind) => write!(f, "{kind}"),
        }
    }
}

impl From<&str> for EdgeKind {
    fn from(s: &str) -> Self {
        match s {
            "related" => EdgeKind::Related,
            "prerequisite" => EdgeKind::Prerequisite,
            other => EdgeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for EdgeKind {
    fn from(s: String) -> Self {
        EdgeKind::from(s.as_str())
    }
}

impl From<EdgeKind> for String {
    fn from(kind: EdgeKind) -> Self {
        kind.to_string()
    }
}

#[derive(Debug, Clone, Copy)]
struct TopicEntry {
    /// Insertion index; defines graph iteration order.
    position: usize,
    weight: f64,
}

#[derive(Debug, Default)]
struct GraphInner {
    order: Vec<String>,
    topics: HashMap<String, TopicEntry>,
    /// Source → destinations, in insertion order. Duplicates allowed.
    adjacency: HashMap<String, Vec<String>>,
    /// Source → (destination → kind). Holds the most recent kind per pair.
    edge_kinds: HashMap<String, HashMap<String, EdgeKind>>,
    /// Destination → distinct sources, in first-insertion order.
    incoming: HashMap<String, Vec<String>>,
    edge_count: usize,
}

impl GraphInner {
    fn direct_prerequisites(&self, node: &str) -> Vec<&str> {
        let Some(sources) = self.incoming.get(node) else {
            return Vec::new();
        };

        let mut found: Vec<(usize, &str)> = sources
            .iter()
            .filter(|source| {
                self.edge_kinds
                    .get(source.as_str())
                    .and_then(|kinds| kinds.get(node))
                    .is_some_and(EdgeKind::is_prerequisite)
            })
            .filter_map(|source| {
                self.topics
                    .get(source.as_str())
                    .map(|entry| (entry.position, source.as_str()))
            })
            .collect();

        found.sort_by_key(|(position, _)| *position);
        found.into_iter().map(|(_, source)| source).collect()
    }

    /// Post-order walk over prerequisite edges, excluding `node` itself.
    fn collect_closure<'a>(&'a self, node: &'a str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([node]);
        let mut out = Vec::new();
        // Each frame is a topic and its prerequisites not yet walked.
        let mut stack = vec![(node, self.direct_prerequisites(node).into_iter())];

        while let Some((current, pending)) = stack.last_mut() {
            match pending.next() {
                Some(prereq) => {
                    if seen.insert(prereq) {
                        stack.push((prereq, self.direct_prerequisites(prereq).into_iter()));
                    }
                }
                None => {
                    let finished = *current;
                    stack.pop();
                    if !stack.is_empty() {
                        out.push(finished.to_string());
                    }
                }
            }
        }

        out
    }
}

/// Directed, weighted, edge-typed topic graph.
///
/// All state lives behind a single `RwLock`: queries may run concurrently
/// with each other, mutations are exclusive.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    inner: RwLock<GraphInner>,
}

impl KnowledgeGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, GraphInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GraphInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a topic with the given weight.
    ///
    /// Re-inserting an existing topic is a no-op and keeps its original
    /// weight. Returns `true` if the topic was newly inserted.
    pub fn add_node(&self, id: impl Into<String>, weight: f64) -> bool {
        let id = id.into();
        let mut inner = self.write();
        if inner.topics.contains_key(&id) {
            return false;
        }

        let position = inner.order.len();
        inner.order.push(id.clone());
        inner.adjacency.insert(id.clone(), Vec::new());
        inner.topics.insert(id.clone(), TopicEntry { position, weight });
        tracing::debug!(topic = %id, weight, "added topic");
        true
    }

    /// Insert a topic with [`DEFAULT_TOPIC_WEIGHT`].
    pub fn add_topic(&self, id: impl Into<String>) -> bool {
        self.add_node(id, DEFAULT_TOPIC_WEIGHT)
    }

    /// Add a directed edge `from → to`.
    ///
    /// `from` must already be a topic; otherwise the graph is left untouched
    /// and [`GraphError::UnknownSource`] is returned. `to` does not need to
    /// exist. Adding the same pair twice appends a second adjacency entry
    /// and replaces the recorded kind.
    pub fn add_edge(&self, from: &str, to: &str, kind: impl Into<EdgeKind>) -> Result<(), GraphError> {
        let kind = kind.into().normalized();
        let mut inner = self.write();

        let Some(destinations) = inner.adjacency.get_mut(from) else {
            tracing::warn!(from, to, "rejected edge from unknown topic");
            return Err(GraphError::UnknownSource {
                from: from.to_string(),
                to: to.to_string(),
            });
        };
        destinations.push(to.to_string());

        tracing::debug!(from, to, %kind, "added edge");
        inner
            .edge_kinds
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), kind);

        let sources = inner.incoming.entry(to.to_string()).or_default();
        if !sources.iter().any(|s| s == from) {
            sources.push(from.to_string());
        }
        inner.edge_count += 1;

        Ok(())
    }

    /// Direct prerequisites of `node`: every topic with a `prerequisite`
    /// edge into it, in topic insertion order.
    pub fn get_prerequisites(&self, node: &str) -> Vec<String> {
        self.read()
            .direct_prerequisites(node)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// All transitive prerequisites of `node`, ordered so that every topic
    /// appears after its own prerequisites. `node` itself is excluded.
    pub fn prerequisite_closure(&self, node: &str) -> Vec<String> {
        self.read().collect_closure(node)
    }

    /// Shortest path from `start` to `end` by edge count, following edges of
    /// any kind.
    ///
    /// Both endpoints are included. Returns `None` when either endpoint is
    /// not a topic or `end` is unreachable. Among equally short paths the
    /// one found first in adjacency order wins.
    pub fn find_learning_path(&self, start: &str, end: &str) -> Option<Vec<String>> {
        let inner = self.read();
        if !inner.topics.contains_key(start) || !inner.topics.contains_key(end) {
            return None;
        }
        if start == end {
            return Some(vec![start.to_string()]);
        }

        let mut parents: HashMap<&str, &str> = HashMap::new();
        let mut visited: HashSet<&str> = HashSet::from([start]);
        let mut queue: VecDeque<&str> = VecDeque::from([start]);

        while let Some(vertex) = queue.pop_front() {
            // Destinations never inserted as topics have no outgoing edges.
            let Some(next) = inner.adjacency.get(vertex) else {
                continue;
            };

            for next_node in next {
                if !visited.insert(next_node.as_str()) {
                    continue;
                }
                parents.insert(next_node.as_str(), vertex);

                if next_node == end {
                    let mut path = vec![end.to_string()];
                    let mut cursor = end;
                    while let Some(&parent) = parents.get(cursor) {
                        path.push(parent.to_string());
                        cursor = parent;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next_node.as_str());
            }
        }

        None
    }

    /// Check if a topic exists.
    pub fn has_node(&self, id: &str) -> bool {
        self.read().topics.contains_key(id)
    }

    /// Weight of a topic, if present.
    pub fn node_weight(&self, id: &str) -> Option<f64> {
        self.read().topics.get(id).map(|entry| entry.weight)
    }

    /// Kind of the edge `from → to`, if present.
    pub fn edge_kind(&self, from: &str, to: &str) -> Option<EdgeKind> {
        self.read()
            .edge_kinds
            .get(from)
            .and_then(|kinds| kinds.get(to))
            .cloned()
    }

    /// Outgoing destinations of a topic, in insertion order.
    pub fn neighbors(&self, id: &str) -> Vec<String> {
        self.read().adjacency.get(id).cloned().unwrap_or_default()
    }

    /// All topics in insertion order.
    pub fn topics(&self) -> Vec<String> {
        self.read().order.clone()
    }

    /// Number of topics.
    pub fn node_count(&self) -> usize {
        self.read().order.len()
    }

    /// Number of edges, counting duplicates.
    pub fn edge_count(&self) -> usize {
        self.read().edge_count
    }
}
