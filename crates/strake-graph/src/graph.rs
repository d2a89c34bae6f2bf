use rustc_hash::FxHashMap;
use std::hash::{Hash, Hasher};

/// Construction flags. `directed` defaults to true; the layout engine builds
/// its working graphs with `multigraph` and `compound` enabled.
#[derive(Debug, Clone, Copy)]
pub struct GraphOptions {
    pub directed: bool,
    pub multigraph: bool,
    pub compound: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            directed: true,
            multigraph: false,
            compound: false,
        }
    }
}

/// Identity of a (possibly parallel) edge. In an undirected graph the
/// endpoints are stored in sorted order; in a non-multigraph `name` is
/// always `None`.
#[derive(Debug, Clone)]
pub struct EdgeId {
    pub tail: String,
    pub head: String,
    pub name: Option<String>,
}

impl EdgeId {
    pub fn new(
        tail: impl Into<String>,
        head: impl Into<String>,
        name: Option<impl Into<String>>,
    ) -> Self {
        Self {
            tail: tail.into(),
            head: head.into(),
            name: name.map(Into::into),
        }
    }
}

impl PartialEq for EdgeId {
    fn eq(&self, other: &Self) -> bool {
        self.tail == other.tail && self.head == other.head && self.name == other.name
    }
}

impl Eq for EdgeId {}

impl Hash for EdgeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tail.hash(state);
        self.head.hash(state);
        self.name.hash(state);
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    id: String,
    label: N,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    id: EdgeId,
    label: E,
}

pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    options: GraphOptions,

    graph_label: G,
    default_node_label: Box<dyn Fn() -> N + Send + Sync>,
    default_edge_label: Box<dyn Fn() -> E + Send + Sync>,

    nodes: Vec<NodeEntry<N>>,
    node_index: FxHashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: FxHashMap<EdgeId, usize>,

    parent: FxHashMap<String, String>,
    children: FxHashMap<String, Vec<String>>,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: Vec::new(),
            node_index: FxHashMap::default(),
            edges: Vec::new(),
            edge_index: FxHashMap::default(),
            parent: FxHashMap::default(),
            children: FxHashMap::default(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Box::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Box::new(f);
        self
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    /// Adds the node with the default label unless it already exists.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return self;
        }
        let label = (self.default_node_label)();
        self.set_node(id, label)
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Removes the node together with its incident edges and any
    /// parent/child links.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_index.remove(id) else {
            return false;
        };

        self.nodes.remove(idx);
        for i in idx..self.nodes.len() {
            let node_id = self.nodes[i].id.as_str();
            if let Some(slot) = self.node_index.get_mut(node_id) {
                *slot = i;
            }
        }

        let mut removed_edge = false;
        for e in &self.edges {
            if e.id.tail == id || e.id.head == id {
                removed_edge = true;
                self.edge_index.remove(&e.id);
            }
        }
        if removed_edge {
            self.edges.retain(|e| e.id.tail != id && e.id.head != id);
            for (i, e) in self.edges.iter().enumerate() {
                if let Some(slot) = self.edge_index.get_mut(&e.id) {
                    *slot = i;
                }
            }
        }

        if let Some(parent) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|c| c != id);
            }
        }
        if let Some(orphans) = self.children.remove(id) {
            for child in orphans {
                self.parent.remove(&child);
            }
        }

        true
    }

    fn canonical_id(&self, mut id: EdgeId) -> EdgeId {
        if !self.options.directed && id.tail > id.head {
            std::mem::swap(&mut id.tail, &mut id.head);
        }
        if !self.options.multigraph {
            id.name = None;
        }
        id
    }

    pub fn set_edge(&mut self, tail: impl Into<String>, head: impl Into<String>) -> &mut Self {
        self.set_edge_named(tail, head, None::<String>, None)
    }

    pub fn set_edge_with(
        &mut self,
        tail: impl Into<String>,
        head: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(tail, head, None::<String>, Some(label))
    }

    pub fn set_edge_named(
        &mut self,
        tail: impl Into<String>,
        head: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let id = self.canonical_id(EdgeId::new(tail, head, name));
        self.ensure_node(id.tail.clone());
        self.ensure_node(id.head.clone());

        if let Some(&idx) = self.edge_index.get(&id) {
            if let Some(label) = label {
                self.edges[idx].label = label;
            }
            return self;
        }

        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            id: id.clone(),
            label: label.unwrap_or_else(|| (self.default_edge_label)()),
        });
        self.edge_index.insert(id, idx);
        self
    }

    pub fn set_edge_id(&mut self, id: EdgeId, label: E) -> &mut Self {
        self.set_edge_named(id.tail, id.head, id.name, Some(label))
    }

    pub fn set_path(&mut self, ids: &[&str]) -> &mut Self {
        for pair in ids.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    fn edge_idx(&self, tail: &str, head: &str, name: Option<&str>) -> Option<usize> {
        let id = self.canonical_id(EdgeId::new(tail, head, name));
        self.edge_index.get(&id).copied()
    }

    pub fn has_edge(&self, tail: &str, head: &str, name: Option<&str>) -> bool {
        self.edge_idx(tail, head, name).is_some()
    }

    pub fn edge(&self, tail: &str, head: &str, name: Option<&str>) -> Option<&E> {
        self.edge_idx(tail, head, name).map(|i| &self.edges[i].label)
    }

    pub fn edge_mut(&mut self, tail: &str, head: &str, name: Option<&str>) -> Option<&mut E> {
        let idx = self.edge_idx(tail, head, name)?;
        Some(&mut self.edges[idx].label)
    }

    pub fn edge_by_id(&self, id: &EdgeId) -> Option<&E> {
        self.edge(&id.tail, &id.head, id.name.as_deref())
    }

    pub fn edge_mut_by_id(&mut self, id: &EdgeId) -> Option<&mut E> {
        self.edge_mut(&id.tail, &id.head, id.name.as_deref())
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.iter().map(|e| &e.id)
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.iter().map(|e| e.id.clone()).collect()
    }

    fn remove_edge_at(&mut self, idx: usize) {
        self.edge_index.remove(&self.edges[idx].id);
        self.edges.remove(idx);
        for i in idx..self.edges.len() {
            if let Some(slot) = self.edge_index.get_mut(&self.edges[i].id) {
                *slot = i;
            }
        }
    }

    pub fn remove_edge(&mut self, tail: &str, head: &str, name: Option<&str>) -> bool {
        let Some(idx) = self.edge_idx(tail, head, name) else {
            return false;
        };
        self.remove_edge_at(idx);
        true
    }

    pub fn remove_edge_id(&mut self, id: &EdgeId) -> bool {
        self.remove_edge(&id.tail, &id.head, id.name.as_deref())
    }

    /// Distinct successor nodes of `v`, in first-edge order. Parallel edges
    /// contribute one entry.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.adjacent(v);
        }
        let mut out: Vec<&str> = Vec::new();
        for e in &self.edges {
            if e.id.tail == v && !out.contains(&e.id.head.as_str()) {
                out.push(e.id.head.as_str());
            }
        }
        out
    }

    /// Distinct predecessor nodes of `v`, in first-edge order.
    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.adjacent(v);
        }
        let mut out: Vec<&str> = Vec::new();
        for e in &self.edges {
            if e.id.head == v && !out.contains(&e.id.tail.as_str()) {
                out.push(e.id.tail.as_str());
            }
        }
        out
    }

    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.adjacent(v);
        }
        let mut out: Vec<&str> = Vec::new();
        for w in self.successors(v).into_iter().chain(self.predecessors(v)) {
            if !out.contains(&w) {
                out.push(w);
            }
        }
        out
    }

    fn adjacent(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for e in &self.edges {
            let other = if e.id.tail == v {
                e.id.head.as_str()
            } else if e.id.head == v {
                e.id.tail.as_str()
            } else {
                continue;
            };
            if !out.contains(&other) {
                out.push(other);
            }
        }
        out
    }

    /// Edges leaving `v`, optionally restricted to those entering `to`.
    /// In an undirected graph this returns all incident edges.
    pub fn out_edges(&self, v: &str, to: Option<&str>) -> Vec<EdgeId> {
        if !self.options.directed {
            return self.incident(v, to);
        }
        self.edges
            .iter()
            .filter(|e| e.id.tail == v && to.map_or(true, |t| e.id.head == t))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Edges entering `v`, optionally restricted to those leaving `from`.
    pub fn in_edges(&self, v: &str, from: Option<&str>) -> Vec<EdgeId> {
        if !self.options.directed {
            return self.incident(v, from);
        }
        self.edges
            .iter()
            .filter(|e| e.id.head == v && from.map_or(true, |f| e.id.tail == f))
            .map(|e| e.id.clone())
            .collect()
    }

    fn incident(&self, v: &str, other: Option<&str>) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|e| {
                if e.id.tail == v {
                    other.map_or(true, |o| e.id.head == o)
                } else if e.id.head == v {
                    other.map_or(true, |o| e.id.tail == o)
                } else {
                    false
                }
            })
            .map(|e| e.id.clone())
            .collect()
    }

    /// All edges incident on `v`, in insertion order.
    pub fn node_edges(&self, v: &str) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|e| e.id.tail == v || e.id.head == v)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn sources(&self) -> Vec<&str> {
        if !self.options.directed {
            return self.nodes().collect();
        }
        self.nodes
            .iter()
            .filter(|n| !self.edges.iter().any(|e| e.id.head == n.id))
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn sinks(&self) -> Vec<&str> {
        if !self.options.directed {
            return self.nodes().collect();
        }
        self.nodes
            .iter()
            .filter(|n| !self.edges.iter().any(|e| e.id.tail == n.id))
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        if !self.options.compound {
            return self;
        }
        let child = child.into();
        let parent = parent.into();
        self.ensure_node(child.clone());
        self.ensure_node(parent.clone());
        if let Some(prev) = self.parent.insert(child.clone(), parent.clone()) {
            if let Some(siblings) = self.children.get_mut(&prev) {
                siblings.retain(|c| c != &child);
            }
        }
        let entry = self.children.entry(parent).or_default();
        if !entry.contains(&child) {
            entry.push(child);
        }
        self
    }

    pub fn remove_parent(&mut self, child: &str) -> &mut Self {
        if let Some(prev) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(&prev) {
                siblings.retain(|c| c != child);
            }
        }
        self
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        self.parent.get(child).map(String::as_str)
    }

    pub fn children(&self, parent: &str) -> Vec<&str> {
        self.children
            .get(parent)
            .map(|c| c.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Top-level nodes: every node without a parent. In a non-compound graph
    /// this is all nodes.
    pub fn root_children(&self) -> Vec<&str> {
        if !self.options.compound {
            return self.nodes().collect();
        }
        self.nodes
            .iter()
            .filter(|n| !self.parent.contains_key(&n.id))
            .map(|n| n.id.as_str())
            .collect()
    }
}
