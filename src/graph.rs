//! Search-tree recording for offline inspection.
//!
//! The engine only talks to [`GraphLogger`]; [`DotGraph`] turns the recorded
//! nodes and edges into a Graphviz document and can hand it to the `dot` tool.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
    process::Command,
};

use fnv::FnvHashMap;

use crate::node::NodeId;

////////////////////////////////////////////////////////////////////////////////

/// Receiver for the nodes and edges a search materializes.
pub trait GraphLogger {
    /// Called for the start node, every discovery, every cost improvement and
    /// every reopened board. Ids are stable per board, so a repeated id
    /// carries a refreshed label for the same board.
    fn record_node(&mut self, id: NodeId, label: &str);

    /// Called once per discovery, improvement or reopening edge.
    fn record_edge(&mut self, from: NodeId, to: NodeId);
}

impl<L: GraphLogger + ?Sized> GraphLogger for &mut L {
    fn record_node(&mut self, id: NodeId, label: &str) {
        (**self).record_node(id, label)
    }

    fn record_edge(&mut self, from: NodeId, to: NodeId) {
        (**self).record_edge(from, to)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl GraphLogger for NullLogger {
    fn record_node(&mut self, _id: NodeId, _label: &str) {}

    fn record_edge(&mut self, _from: NodeId, _to: NodeId) {}
}

////////////////////////////////////////////////////////////////////////////////

/// In-memory graph rendered in the DOT language.
#[derive(Debug, Clone)]
pub struct DotGraph {
    name: String,
    graph_props: Vec<(String, String)>,
    node_props: Vec<(String, String)>,
    edge_props: Vec<(String, String)>,
    order: Vec<NodeId>,
    labels: FnvHashMap<NodeId, String>,
    edges: Vec<(NodeId, NodeId)>,
}

impl DotGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph_props: Vec::new(),
            node_props: Vec::new(),
            edge_props: Vec::new(),
            order: Vec::new(),
            labels: FnvHashMap::default(),
            edges: Vec::new(),
        }
    }

    /// Left-to-right layout with boxed nodes, suited to board labels.
    pub fn search_tree() -> Self {
        Self::new("G")
            .with_graph_property("rankdir", "LR")
            .with_node_property("shape", "box")
    }

    pub fn with_graph_property(mut self, name: &str, value: &str) -> Self {
        self.graph_props.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_node_property(mut self, name: &str, value: &str) -> Self {
        self.node_props.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_edge_property(mut self, name: &str, value: &str) -> Self {
        self.edge_props.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    pub fn render_dot<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "digraph {} {{", quote(&self.name))?;
        for (name, value) in &self.graph_props {
            writeln!(out, "  {}={};", name, quote(value))?;
        }
        write_common(out, "node", &self.node_props)?;
        write_common(out, "edge", &self.edge_props)?;

        for id in &self.order {
            let label = self.labels.get(id).map(String::as_str).unwrap_or_default();
            writeln!(out, "  {} [label={}];", quote(&id.to_string()), quote(label))?;
        }
        for (from, to) in &self.edges {
            writeln!(
                out,
                "  {} -> {};",
                quote(&from.to_string()),
                quote(&to.to_string())
            )?;
        }
        writeln!(out, "}}")
    }

    /// Writes the DOT document to `path`.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.render_dot(&mut out)?;
        out.flush()
    }
}

impl GraphLogger for DotGraph {
    fn record_node(&mut self, id: NodeId, label: &str) {
        if self.labels.insert(id, label.to_owned()).is_none() {
            self.order.push(id);
        }
    }

    fn record_edge(&mut self, from: NodeId, to: NodeId) {
        self.edges.push((from, to));
    }
}

fn write_common<W: Write>(out: &mut W, what: &str, props: &[(String, String)]) -> io::Result<()> {
    if props.is_empty() {
        return Ok(());
    }
    let attrs: Vec<String> = props
        .iter()
        .map(|(name, value)| format!("{}={}", name, quote(value)))
        .collect();
    writeln!(out, "  {} [{}];", what, attrs.join(", "))
}

/// DOT double-quoted string; newlines become centred line breaks.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Runs `dot -Tpng` on a saved document.
pub fn render_png(dot_file: &Path, png_file: &Path) -> io::Result<()> {
    let status = Command::new("dot")
        .arg("-Tpng")
        .arg("-o")
        .arg(png_file)
        .arg(dot_file)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("dot exited with {}", status),
        ))
    }
}
