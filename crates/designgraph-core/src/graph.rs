//! ResolvedGraph: a design with every name reference resolved to a node.
//!
//! This is the form handed to code generators. Nodes are added in component
//! declaration order and edges in connection sequence order, and nothing is
//! ever removed, so petgraph's node and edge indices are exactly the
//! positions in the source design.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::component::Component;
use crate::connection::{Connection, Endpoint};
use crate::design::Design;
use crate::error::CoreError;

/// A design graph with connection endpoints resolved to node indices.
#[derive(Debug, Clone)]
pub struct ResolvedGraph {
    name: String,
    graph: DiGraph<Component, Connection, u32>,
    by_name: HashMap<String, NodeIndex<u32>>,
}

impl ResolvedGraph {
    /// Builds the resolved graph for `design`.
    ///
    /// Fails with `UnknownEndpoint` on the first connection that references a
    /// missing component, and with `DuplicateName` if two components share a
    /// name (the reference would be ambiguous).
    pub fn from_design(design: &Design) -> Result<Self, CoreError> {
        let mut graph = DiGraph::with_capacity(
            design.components().len(),
            design.connections().len(),
        );
        let mut by_name = HashMap::with_capacity(design.components().len());

        for component in design.components() {
            if by_name.contains_key(&component.name) {
                return Err(CoreError::DuplicateName {
                    name: component.name.clone(),
                });
            }
            let idx = graph.add_node(component.clone());
            by_name.insert(component.name.clone(), idx);
        }

        for connection in design.connections() {
            let source = *by_name.get(&connection.source).ok_or_else(|| {
                CoreError::UnknownEndpoint {
                    endpoint: Endpoint::Source,
                    name: connection.source.clone(),
                }
            })?;
            let destination = *by_name.get(&connection.destination).ok_or_else(|| {
                CoreError::UnknownEndpoint {
                    endpoint: Endpoint::Destination,
                    name: connection.destination.clone(),
                }
            })?;
            graph.add_edge(source, destination, connection.clone());
        }

        Ok(ResolvedGraph {
            name: design.name().to_string(),
            graph,
            by_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a read-only reference to the underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<Component, Connection, u32> {
        &self.graph
    }

    pub fn component_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Looks up the node for a component name.
    pub fn node(&self, name: &str) -> Option<NodeIndex<u32>> {
        self.by_name.get(name).copied()
    }

    /// Components in declaration order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Connections in sequence order, with both endpoints resolved.
    pub fn connections(&self) -> impl Iterator<Item = (&Component, &Component, &Connection)> {
        self.graph.edge_indices().filter_map(move |edge: EdgeIndex<u32>| {
            let (source, destination) = self.graph.edge_endpoints(edge)?;
            Some((&self.graph[source], &self.graph[destination], &self.graph[edge]))
        })
    }

    /// Components that `name` has an outgoing connection to, in connection order.
    pub fn downstream(&self, name: &str) -> Vec<&Component> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Components with an outgoing connection to `name`, in connection order.
    pub fn upstream(&self, name: &str) -> Vec<&Component> {
        self.neighbors(name, Direction::Incoming)
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&Component> {
        let Some(idx) = self.node(name) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        // petgraph walks adjacency lists newest-first.
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| match direction {
                Direction::Outgoing => &self.graph[edge.target()],
                Direction::Incoming => &self.graph[edge.source()],
            })
            .collect()
    }
}
