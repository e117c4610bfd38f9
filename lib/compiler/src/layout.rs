//! Canvas layout from graph topology.
//!
//! Nodes are placed in columns by their longest distance from a root (a node
//! without incoming connections) and stacked within a column in the order
//! the traversal discovered them. A node is finalized only once all of its
//! predecessors are, so merge nodes always land to the right of every input.
//!
//! Cycles stall that rule. When nothing is ready but discovered nodes are
//! still waiting, one is finalized with the depth it has so far: the
//! earliest-discovered node whose only unfinished inputs come from its own
//! cycle, or failing that the earliest-discovered one. Nodes no root reaches (including every node of a rootless
//! cycle) share one column to the right of everything else.

use crate::document::Position;
use flowpress_workflow::{Connection, Node};
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::debug;

/// Grid parameters for the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// x of the first column.
    pub origin_x: i64,
    /// y of the first row.
    pub origin_y: i64,
    /// Horizontal distance between columns.
    pub column_spacing: i64,
    /// Vertical distance between rows.
    pub row_spacing: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 100,
            origin_y: 100,
            column_spacing: 300,
            row_spacing: 200,
        }
    }
}

impl LayoutConfig {
    fn position(&self, column: usize, row: usize) -> Position {
        Position(
            self.origin_x + column as i64 * self.column_spacing,
            self.origin_y + row as i64 * self.row_spacing,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    Pending,
    Queued,
    Expanded,
}

/// Connection graph over node names.
struct Topology<'a> {
    graph: DiGraph<&'a str, ()>,
}

impl<'a> Topology<'a> {
    fn new(nodes: &'a [Node], connections: &[Connection]) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), connections.len());
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(nodes.len());
        for node in nodes {
            index
                .entry(node.name.as_str())
                .or_insert_with(|| graph.add_node(node.name.as_str()));
        }
        // Connections naming unknown nodes are the validator's concern.
        for conn in connections {
            if let (Some(&from), Some(&to)) = (index.get(conn.from.as_str()), index.get(conn.to.as_str())) {
                graph.add_edge(from, to, ());
            }
        }
        Self { graph }
    }

    /// Successors in connection order, one entry per connection.
    fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    fn in_degree(&self, node: NodeIndex) -> usize {
        self.graph.edges_directed(node, Direction::Incoming).count()
    }

    /// Strongly connected component of every node, by node index.
    fn components(&self) -> Vec<usize> {
        let mut component = vec![0; self.graph.node_count()];
        for (id, members) in tarjan_scc(&self.graph).into_iter().enumerate() {
            for node in members {
                component[node.index()] = id;
            }
        }
        component
    }

    /// Picks the waiting node to finalize when traversal stalls on a cycle.
    fn stall_release(&self, discovered: &[NodeIndex], visit: &[Visit], component: &[usize]) -> Option<NodeIndex> {
        let mut pending = discovered.iter().copied().filter(|n| visit[n.index()] == Visit::Pending);
        let first = pending.clone().next()?;
        let entry = pending.find(|&node| {
            self.graph.edges_directed(node, Direction::Incoming).all(|e| {
                let source = e.source().index();
                visit[source] == Visit::Expanded || component[source] == component[node.index()]
            })
        });
        Some(entry.unwrap_or(first))
    }
}

/// Computes a canvas position for every node.
///
/// Deterministic for a given order of nodes and connections. Connections
/// that name unknown nodes are ignored.
#[must_use]
pub fn layout(nodes: &[Node], connections: &[Connection], config: &LayoutConfig) -> HashMap<String, Position> {
    let topology = Topology::new(nodes, connections);
    let count = topology.graph.node_count();
    let component = topology.components();

    let mut visit = vec![Visit::Unseen; count];
    let mut depth = vec![0usize; count];
    let mut waiting: Vec<usize> = topology
        .graph
        .node_indices()
        .map(|n| topology.in_degree(n))
        .collect();
    let mut discovered: Vec<NodeIndex> = Vec::with_capacity(count);
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    for root in topology.graph.node_indices().filter(|n| waiting[n.index()] == 0) {
        visit[root.index()] = Visit::Queued;
        discovered.push(root);
        queue.push_back(root);
    }

    let mut forced = 0usize;
    loop {
        while let Some(current) = queue.pop_front() {
            visit[current.index()] = Visit::Expanded;
            let next_depth = depth[current.index()] + 1;

            for succ in topology.successors(current) {
                let slot = succ.index();
                if visit[slot] == Visit::Expanded {
                    continue;
                }
                depth[slot] = depth[slot].max(next_depth);
                if visit[slot] == Visit::Unseen {
                    visit[slot] = Visit::Pending;
                    discovered.push(succ);
                }
                waiting[slot] = waiting[slot].saturating_sub(1);
                if waiting[slot] == 0 && visit[slot] == Visit::Pending {
                    visit[slot] = Visit::Queued;
                    queue.push_back(succ);
                }
            }
        }

        // Stalled on a cycle.
        let Some(stalled) = topology.stall_release(&discovered, &visit, &component) else {
            break;
        };
        forced += 1;
        visit[stalled.index()] = Visit::Queued;
        queue.push_back(stalled);
    }

    let mut columns: BTreeMap<usize, Vec<NodeIndex>> = BTreeMap::new();
    for &node in &discovered {
        columns.entry(depth[node.index()]).or_default().push(node);
    }

    let orphans: Vec<NodeIndex> = topology
        .graph
        .node_indices()
        .filter(|n| visit[n.index()] == Visit::Unseen)
        .collect();
    if !orphans.is_empty() {
        let orphan_column = columns.keys().next_back().map_or(0, |deepest| deepest + 1);
        columns.entry(orphan_column).or_default().extend(orphans.iter().copied());
    }

    debug!(
        nodes = count,
        columns = columns.len(),
        orphans = orphans.len(),
        forced,
        "computed layout"
    );

    let mut positions = HashMap::with_capacity(count);
    for (column, members) in &columns {
        for (row, node) in members.iter().enumerate() {
            positions.insert(topology.graph[*node].to_string(), config.position(*column, row));
        }
    }
    positions
}
