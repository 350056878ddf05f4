//! # Placeholder Dependency Graph
//!
//! Placeholder values may contain the patterns of other placeholders. This
//! module turns those references into a directed graph and checks it for
//! cycles before anything is expanded.
//!
//! ## Construction
//!
//! 1. Every placeholder pattern becomes a node.
//! 2. A value that contains its own pattern is rejected immediately with
//!    [`Error::SelfReference`]. This is a configuration error and is never
//!    retried.
//! 3. For every other placeholder whose pattern occurs in the value, an edge
//!    `P -> Q` is added: expanding `P` requires `Q`.
//!
//! Placeholders without a value yet (no default, not prompted for) add a
//! node but no edges.
//!
//! ## Cycle detection
//!
//! Cycles are found with a three-colour depth-first search. Besides the
//! boolean answer, [`DependencyGraph::find_cycle`] returns the offending path
//! so it can be shown to the user.

use crate::error::{Error, Result};
use crate::placeholder::PatternSource;

/// Directed graph over placeholder patterns.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    names: Vec<String>,
    patterns: Vec<String>,
    /// Outgoing edges per node, in declaration order of the targets
    edges: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl DependencyGraph {
    /// Build the graph for a placeholder set.
    pub fn build<P: PatternSource>(placeholders: &[P]) -> Result<Self> {
        let mut graph = Self {
            names: Vec::with_capacity(placeholders.len()),
            patterns: Vec::with_capacity(placeholders.len()),
            edges: vec![Vec::new(); placeholders.len()],
        };

        for placeholder in placeholders {
            graph.names.push(placeholder.name().to_string());
            graph.patterns.push(placeholder.pattern().to_string());
        }

        for (from, placeholder) in placeholders.iter().enumerate() {
            let Some(value) = placeholder.raw_value() else {
                continue;
            };

            let own_pattern = placeholder.pattern();
            if !own_pattern.is_empty() && value.contains(own_pattern) {
                return Err(Error::SelfReference {
                    name: placeholder.name().to_string(),
                    pattern: own_pattern.to_string(),
                    value: value.to_string(),
                });
            }

            for (to, other) in placeholders.iter().enumerate() {
                if to != from && !other.pattern().is_empty() && value.contains(other.pattern()) {
                    graph.edges[from].push(to);
                }
            }
        }

        Ok(graph)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Node patterns in declaration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Names of the placeholders `name` depends on directly.
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|index| {
                self.edges[index]
                    .iter()
                    .map(|&to| self.names[to].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `from`'s value references `to`'s pattern.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(from), Some(to)) => self.edges[from].contains(&to),
            _ => false,
        }
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Find one cycle and return it as a list of placeholder names, starting
    /// and ending with the same name (`["A", "B", "A"]`).
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks = vec![Mark::Unvisited; self.len()];
        let mut stack = Vec::new();

        for start in 0..self.len() {
            if marks[start] == Mark::Unvisited {
                if let Some(cycle) = self.visit(start, &mut marks, &mut stack) {
                    return Some(cycle.into_iter().map(|i| self.names[i].clone()).collect());
                }
            }
        }
        None
    }

    fn visit(&self, node: usize, marks: &mut [Mark], stack: &mut Vec<usize>) -> Option<Vec<usize>> {
        marks[node] = Mark::InProgress;
        stack.push(node);

        for &next in &self.edges[node] {
            match marks[next] {
                Mark::InProgress => {
                    if let Some(position) = stack.iter().position(|&n| n == next) {
                        let mut cycle = stack[position..].to_vec();
                        cycle.push(next);
                        return Some(cycle);
                    }
                }
                Mark::Unvisited => {
                    if let Some(cycle) = self.visit(next, marks, stack) {
                        return Some(cycle);
                    }
                }
                Mark::Done => {}
            }
        }

        stack.pop();
        marks[node] = Mark::Done;
        None
    }

    /// Placeholder names ordered so that every placeholder comes after the
    /// placeholders it depends on. Returns `None` if the graph is cyclic.
    pub fn topological_order(&self) -> Option<Vec<&str>> {
        if self.has_cycle() {
            return None;
        }

        let mut visited = vec![false; self.len()];
        let mut order = Vec::with_capacity(self.len());
        for start in 0..self.len() {
            self.post_order(start, &mut visited, &mut order);
        }
        Some(order.into_iter().map(|i| self.names[i].as_str()).collect())
    }

    fn post_order(&self, node: usize, visited: &mut [bool], order: &mut Vec<usize>) {
        if visited[node] {
            return;
        }
        visited[node] = true;
        for &next in &self.edges[node] {
            self.post_order(next, visited, order);
        }
        order.push(node);
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// Render a cycle as `A -> B -> A`.
pub fn describe_cycle(cycle: &[String]) -> String {
    cycle.join(" -> ")
}
