//! # Replacement Nodes
//!
//! A resolved template is compiled into a [`ReplacementSet`]: one node per
//! placeholder, stored in an arena and addressed by [`NodeId`]. A node either
//! holds its final text (**constant node**) or remembers where other
//! placeholders' patterns occur in its value (**composite node**) and expands
//! them every time it is computed.
//!
//! Nodes are shared. If three placeholders reference `{{A}}`, all three point
//! at the same node for `A`, so the set forms a DAG that mirrors the
//! dependency graph. Compilation is memoized by placeholder name, which gives
//! exactly-once compilation no matter how often a placeholder is referenced.
//!
//! Composite nodes do not cache their output. Rebinding a node with
//! [`ReplacementSet::rebind`] is therefore visible everywhere it is
//! referenced, without recompiling the referencing nodes.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::graph::describe_cycle;
use crate::placeholder::ResolvedPlaceholder;
use crate::substitute::{self, Replacement};

/// Stable handle of a node inside a [`ReplacementSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Constant(String),
    Composite {
        value: String,
        references: Vec<(Range<usize>, NodeId)>,
    },
}

impl NodeKind {
    fn new(value: String, references: Vec<(Range<usize>, NodeId)>) -> Self {
        if references.is_empty() {
            NodeKind::Constant(value)
        } else {
            NodeKind::Composite { value, references }
        }
    }
}

/// The compiled form of one placeholder.
#[derive(Debug, Clone)]
pub struct ReplacementNode {
    name: String,
    pattern: String,
    kind: NodeKind,
}

impl ReplacementNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The placeholder value before expansion.
    pub fn raw_value(&self) -> &str {
        match &self.kind {
            NodeKind::Constant(value) => value,
            NodeKind::Composite { value, .. } => value,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, NodeKind::Constant(_))
    }

    /// Positions in the raw value that are expanded by other nodes.
    pub fn references(&self) -> &[(Range<usize>, NodeId)] {
        match &self.kind {
            NodeKind::Constant(_) => &[],
            NodeKind::Composite { references, .. } => references,
        }
    }
}

/// A node borrowed together with the set it lives in.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    set: &'a ReplacementSet,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Placeholder name, borrowed from the set rather than the handle.
    pub fn name(&self) -> &'a str {
        self.set.node(self.id).name()
    }
}

impl Replacement for NodeRef<'_> {
    fn pattern(&self) -> &str {
        self.set.node(self.id).pattern()
    }

    fn compute(&self) -> String {
        self.set.compute(self.id)
    }
}

/// Arena of replacement nodes for one resolved template.
#[derive(Debug, Clone, Default)]
pub struct ReplacementSet {
    nodes: Vec<ReplacementNode>,
    by_name: HashMap<String, NodeId>,
    /// Node ids in placeholder declaration order
    order: Vec<NodeId>,
}

impl ReplacementSet {
    /// Compile resolved placeholders into a shared node graph.
    ///
    /// The placeholders are expected to be acyclic already; a cycle that
    /// slips through is reported as [`Error::CycleDetected`] instead of
    /// recursing forever.
    pub fn compile(placeholders: &[ResolvedPlaceholder]) -> Result<Self> {
        let mut compiler = Compiler {
            placeholders,
            set: ReplacementSet::default(),
            stack: Vec::new(),
        };

        for index in 0..placeholders.len() {
            compiler.node_for(index)?;
        }

        let mut set = compiler.set;
        set.order = placeholders
            .iter()
            .filter_map(|p| set.by_name.get(&p.name).copied())
            .collect();
        log::debug!("Compiled {} replacement node(s)", set.nodes.len());
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up the node of a placeholder by name.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> &ReplacementNode {
        &self.nodes[id.0]
    }

    /// Fully expanded text of a node.
    pub fn compute(&self, id: NodeId) -> String {
        match &self.node(id).kind {
            NodeKind::Constant(value) => value.clone(),
            NodeKind::Composite { value, references } => {
                let matches = references
                    .iter()
                    .map(|(range, child)| (range.clone(), self.node_ref(*child)))
                    .collect();
                substitute::apply_ranges(value, matches)
            }
        }
    }

    /// Fully expanded value of a placeholder.
    pub fn value_of(&self, name: &str) -> Option<String> {
        self.get(name).map(|id| self.compute(id))
    }

    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { set: self, id }
    }

    /// All nodes in placeholder declaration order.
    pub fn nodes(&self) -> Vec<NodeRef<'_>> {
        self.order.iter().map(|&id| self.node_ref(id)).collect()
    }

    /// Substitute every placeholder pattern in `text`.
    pub fn apply(&self, text: &str) -> String {
        substitute::apply_all(text, &self.nodes())
    }

    /// Whether `text` still contains any placeholder pattern.
    pub fn matches(&self, text: &str) -> bool {
        substitute::contains_any(text, &self.nodes())
    }

    /// Replace the raw value of one placeholder in place.
    ///
    /// Every node that references the placeholder sees the new value on its
    /// next computation. Values that reference their own pattern or would
    /// close a cycle are rejected and leave the set unchanged.
    pub fn rebind(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let id = self.get(name).ok_or_else(|| Error::UnknownPlaceholder {
            name: name.to_string(),
            hint: None,
        })?;

        let pattern = self.node(id).pattern().to_string();
        if value.contains(&pattern) {
            return Err(Error::SelfReference {
                name: name.to_string(),
                pattern,
                value,
            });
        }

        let mut references = Vec::new();
        for &other in &self.order {
            if other == id {
                continue;
            }
            for range in substitute::find_ranges(&value, self.node(other).pattern()) {
                references.push((range, other));
            }
        }

        for &(_, target) in &references {
            if let Some(path) = self.path_between(target, id) {
                let mut cycle = vec![name.to_string()];
                cycle.extend(path.into_iter().map(|n| self.node(n).name().to_string()));
                return Err(Error::CycleDetected {
                    cycle: describe_cycle(&cycle),
                });
            }
        }

        log::debug!("Rebinding {} to '{}'", name, value);
        self.nodes[id.0].kind = NodeKind::new(value, references);
        Ok(())
    }

    /// Path of node ids from `from` to `to` following references, both ends
    /// included.
    fn path_between(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        let mut visited = vec![false; self.nodes.len()];
        let mut path = Vec::new();
        if self.search(from, to, &mut visited, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn search(&self, current: NodeId, to: NodeId, visited: &mut [bool], path: &mut Vec<NodeId>) -> bool {
        if visited[current.0] {
            return false;
        }
        visited[current.0] = true;
        path.push(current);

        if current == to {
            return true;
        }
        for &(_, next) in self.node(current).references() {
            if self.search(next, to, visited, path) {
                return true;
            }
        }

        path.pop();
        false
    }
}

struct Compiler<'a> {
    placeholders: &'a [ResolvedPlaceholder],
    set: ReplacementSet,
    /// Placeholder indices currently being compiled
    stack: Vec<usize>,
}

impl Compiler<'_> {
    fn node_for(&mut self, index: usize) -> Result<NodeId> {
        let placeholders = self.placeholders;
        let placeholder = &placeholders[index];

        if let Some(&id) = self.set.by_name.get(&placeholder.name) {
            return Ok(id);
        }

        if let Some(position) = self.stack.iter().position(|&i| i == index) {
            let mut cycle: Vec<String> = self.stack[position..]
                .iter()
                .map(|&i| placeholders[i].name.clone())
                .collect();
            cycle.push(placeholder.name.clone());
            return Err(Error::CycleDetected {
                cycle: describe_cycle(&cycle),
            });
        }

        if placeholder.value.contains(&placeholder.pattern) {
            return Err(Error::SelfReference {
                name: placeholder.name.clone(),
                pattern: placeholder.pattern.clone(),
                value: placeholder.value.clone(),
            });
        }

        self.stack.push(index);
        let mut references = Vec::new();
        for (other_index, other) in placeholders.iter().enumerate() {
            if other_index == index {
                continue;
            }
            let ranges = substitute::find_ranges(&placeholder.value, &other.pattern);
            if ranges.is_empty() {
                continue;
            }
            let child = self.node_for(other_index)?;
            references.extend(ranges.into_iter().map(|range| (range, child)));
        }
        self.stack.pop();

        let id = NodeId(self.set.nodes.len());
        self.set.nodes.push(ReplacementNode {
            name: placeholder.name.clone(),
            pattern: placeholder.pattern.clone(),
            kind: NodeKind::new(placeholder.value.clone(), references),
        });
        self.set.by_name.insert(placeholder.name.clone(), id);
        Ok(id)
    }
}
