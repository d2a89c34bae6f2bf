//! Label types carried on the layout graph.
//!
//! Every transient field a pipeline stage writes is an `Option` (or an empty
//! collection) on these structs; the engine never reads a field before the
//! stage that assigns it has run. Attributes the engine does not recognize
//! live in the `extras` bags and never influence layout.

use crate::graph::EdgeId;
use std::collections::BTreeMap;

/// Direction of the principal axis of the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    /// Parses an attribute value, ignoring case. Unrecognized values fall
    /// back to top-to-bottom.
    pub fn from_attr(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "bt" => Self::BT,
            "lr" => Self::LR,
            "rl" => Self::RL,
            _ => Self::TB,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }
}

/// Placement of an edge label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPos {
    L,
    C,
    #[default]
    R,
}

impl LabelPos {
    pub fn from_attr(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "l" => Self::L,
            "c" => Self::C,
            _ => Self::R,
        }
    }
}

/// Role of a synthetic node inserted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyKind {
    /// Intermediate node of a split long edge.
    Edge,
    /// The chain node that carries the edge's label box.
    EdgeLabel,
    /// Rank anchor for an edge label, removed before normalization.
    EdgeProxy,
    /// Border segment of a compound parent.
    Border,
    /// Placeholder reserving space for a self-loop.
    SelfEdge,
    /// The synthetic root of the nesting graph.
    Root,
}

/// Which side of a compound parent a border segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    pub nodesep: f64,
    pub edgesep: f64,
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,
    pub ranker: Option<String>,
    pub acyclicer: Option<String>,
    pub align: Option<String>,

    // Outputs.
    pub width: f64,
    pub height: f64,
    pub max_rank: Option<i32>,

    // Pipeline bookkeeping.
    pub dummy_chains: Vec<String>,
    pub nesting_root: Option<String>,
    pub node_rank_factor: Option<usize>,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            edgesep: 20.0,
            ranksep: 50.0,
            marginx: 0.0,
            marginy: 0.0,
            ranker: None,
            acyclicer: None,
            align: None,
            width: 0.0,
            height: 0.0,
            max_rank: None,
            dummy_chains: Vec::new(),
            nesting_root: None,
            node_rank_factor: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,

    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,

    pub dummy: Option<DummyKind>,
    pub labelpos: Option<LabelPos>,
    pub edge_label: Option<EdgeLabel>,
    pub edge_id: Option<EdgeId>,

    // Compound-parent bookkeeping.
    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border: Option<BorderSide>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,
    pub border_left: Vec<Option<String>>,
    pub border_right: Vec<Option<String>>,

    pub self_edges: Vec<SelfEdge>,

    pub extras: BTreeMap<String, serde_json::Value>,
}

impl NodeLabel {
    pub fn is_dummy(&self) -> bool {
        self.dummy.is_some()
    }

    pub fn border_left_at(&self, rank: i32) -> Option<String> {
        usize::try_from(rank)
            .ok()
            .and_then(|idx| self.border_left.get(idx).cloned())
            .flatten()
    }

    pub fn border_right_at(&self, rank: i32) -> Option<String> {
        usize::try_from(rank)
            .ok()
            .and_then(|idx| self.border_right.get(idx).cloned())
            .flatten()
    }

    /// The label a compound parent contributes to a single-rank layer graph:
    /// just the pair of border segments that intersect that rank.
    pub fn layer_view(&self, rank: i32) -> Self {
        Self {
            border_left: vec![self.border_left_at(rank)],
            border_right: vec![self.border_right_at(rank)],
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub minlen: usize,
    pub weight: f64,
    pub width: f64,
    pub height: f64,
    pub labeloffset: f64,
    pub labelpos: LabelPos,

    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Vec<Point>,
    pub label_rank: Option<i32>,

    pub reversed: bool,
    pub forward_name: Option<String>,
    pub nesting_edge: bool,

    pub extras: BTreeMap<String, serde_json::Value>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            width: 0.0,
            height: 0.0,
            labeloffset: 10.0,
            labelpos: LabelPos::R,
            x: None,
            y: None,
            points: Vec::new(),
            label_rank: None,
            reversed: false,
            forward_name: None,
            nesting_edge: false,
            extras: BTreeMap::new(),
        }
    }
}

/// A self-loop stashed on its node while ranking and ordering run.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub id: EdgeId,
    pub label: EdgeLabel,
}

/// Lowercases attribute names so lookups are case-insensitive. Values are
/// left untouched. Later duplicates win, matching plain map insertion.
pub fn canonicalize_attrs(
    attrs: &BTreeMap<String, serde_json::Value>,
) -> BTreeMap<String, serde_json::Value> {
    attrs
        .iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
        .collect()
}

fn attr_number(attrs: &BTreeMap<String, serde_json::Value>, key: &str) -> Option<f64> {
    match attrs.get(key)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn attr_string(attrs: &BTreeMap<String, serde_json::Value>, key: &str) -> Option<String> {
    attrs.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

impl GraphLabel {
    /// Builds a graph label from a loosely-typed attribute bag. Attribute
    /// names are matched case-insensitively; unrecognized attributes are
    /// ignored here (the graph label is never copied back wholesale).
    pub fn from_attrs(attrs: &BTreeMap<String, serde_json::Value>) -> Self {
        let attrs = canonicalize_attrs(attrs);
        let mut label = Self::default();
        if let Some(v) = attr_number(&attrs, "nodesep") {
            label.nodesep = v;
        }
        if let Some(v) = attr_number(&attrs, "edgesep") {
            label.edgesep = v;
        }
        if let Some(v) = attr_number(&attrs, "ranksep") {
            label.ranksep = v;
        }
        if let Some(v) = attr_number(&attrs, "marginx") {
            label.marginx = v;
        }
        if let Some(v) = attr_number(&attrs, "marginy") {
            label.marginy = v;
        }
        if let Some(v) = attr_string(&attrs, "rankdir") {
            label.rankdir = RankDir::from_attr(&v);
        }
        label.ranker = attr_string(&attrs, "ranker");
        label.acyclicer = attr_string(&attrs, "acyclicer");
        label.align = attr_string(&attrs, "align");
        label
    }
}

impl NodeLabel {
    pub fn from_attrs(attrs: &BTreeMap<String, serde_json::Value>) -> Self {
        let attrs = canonicalize_attrs(attrs);
        let mut label = Self::default();
        if let Some(v) = attr_number(&attrs, "width") {
            label.width = v;
        }
        if let Some(v) = attr_number(&attrs, "height") {
            label.height = v;
        }
        label.extras = attrs
            .into_iter()
            .filter(|(k, _)| k != "width" && k != "height")
            .collect();
        label
    }
}

impl EdgeLabel {
    pub fn from_attrs(attrs: &BTreeMap<String, serde_json::Value>) -> Self {
        let attrs = canonicalize_attrs(attrs);
        let mut label = Self::default();
        if let Some(v) = attr_number(&attrs, "minlen") {
            if v >= 1.0 {
                label.minlen = v as usize;
            }
        }
        if let Some(v) = attr_number(&attrs, "weight") {
            label.weight = v;
        }
        if let Some(v) = attr_number(&attrs, "width") {
            label.width = v;
        }
        if let Some(v) = attr_number(&attrs, "height") {
            label.height = v;
        }
        if let Some(v) = attr_number(&attrs, "labeloffset") {
            label.labeloffset = v;
        }
        if let Some(v) = attr_string(&attrs, "labelpos") {
            label.labelpos = LabelPos::from_attr(&v);
        }
        const KNOWN: [&str; 6] = ["minlen", "weight", "width", "height", "labeloffset", "labelpos"];
        label.extras = attrs
            .into_iter()
            .filter(|(k, _)| !KNOWN.contains(&k.as_str()))
            .collect();
        label
    }
}
