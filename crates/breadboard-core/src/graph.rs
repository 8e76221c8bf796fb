//! Electrical node extraction from ports and wires.
//!
//! Wire connectivity is symmetric and transitive: every wire-connected group
//! of ports collapses into one electrical node. Any group containing a
//! ground terminal becomes node 0; the rest are numbered from 1 in discovery
//! order. Unwired ports still get a (singleton) node so that downstream
//! stamping never sees an unmapped port.

use std::collections::{BTreeMap, HashMap, VecDeque};

use indexmap::IndexMap;

use crate::component::{Component, ComponentKind, PortKey, Wire};
use crate::node::NodeId;

/// The port-to-node mapping produced by [`build_graph`].
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Every valid port, in deterministic discovery order.
    pub port_to_node: IndexMap<PortKey, NodeId>,
    /// Count of non-ground nodes; node ids run 1..=num_nodes.
    pub num_nodes: usize,
    /// Whether the circuit contains a ground component.
    pub has_ground: bool,
}

impl Graph {
    /// Node of a component port, if the port exists.
    pub fn node_of(&self, component: &str, port: usize) -> Option<NodeId> {
        self.port_to_node
            .get(&PortKey::new(component, port))
            .copied()
    }

    /// Component ids touching each node, keyed by node id.
    ///
    /// Ids appear in port discovery order without duplicates.
    pub fn components_by_node(&self) -> BTreeMap<NodeId, Vec<String>> {
        let mut by_node: BTreeMap<NodeId, Vec<String>> = BTreeMap::new();
        for (port, &node) in &self.port_to_node {
            let ids = by_node.entry(node).or_default();
            if !ids.iter().any(|id| id == &port.component) {
                ids.push(port.component.clone());
            }
        }
        by_node
    }
}

/// Group wire-connected ports into numbered electrical nodes.
pub fn build_graph(components: &[Component], wires: &[Wire]) -> Graph {
    let port_counts: HashMap<&str, usize> = components
        .iter()
        .map(|c| (c.id.as_str(), c.port_count()))
        .collect();
    let grounded: HashMap<&str, bool> = components
        .iter()
        .map(|c| (c.id.as_str(), c.kind == ComponentKind::Ground))
        .collect();

    // Every valid port, in component order then port order.
    let mut ports: Vec<PortKey> = Vec::new();
    for component in components {
        for port in 0..component.port_count() {
            ports.push(PortKey::new(&component.id, port));
        }
    }

    let valid = |key: &PortKey| {
        port_counts
            .get(key.component.as_str())
            .is_some_and(|&count| key.port < count)
    };

    let mut adjacency: HashMap<&PortKey, Vec<&PortKey>> = HashMap::new();
    for wire in wires {
        if !valid(&wire.from) || !valid(&wire.to) {
            log::warn!(
                "ignoring wire to unknown port {}:{} or {}:{}",
                wire.from.component,
                wire.from.port,
                wire.to.component,
                wire.to.port
            );
            continue;
        }
        adjacency.entry(&wire.from).or_default().push(&wire.to);
        adjacency.entry(&wire.to).or_default().push(&wire.from);
    }

    let mut port_to_node: IndexMap<PortKey, NodeId> = IndexMap::with_capacity(ports.len());
    let mut next_id = 1u32;

    for seed in &ports {
        if port_to_node.contains_key(seed) {
            continue;
        }

        // BFS over the wire adjacency to collect this port's group.
        let mut group: Vec<&PortKey> = Vec::new();
        let mut queue: VecDeque<&PortKey> = VecDeque::new();
        queue.push_back(seed);
        while let Some(port) = queue.pop_front() {
            if group.contains(&port) {
                continue;
            }
            group.push(port);
            if let Some(neighbors) = adjacency.get(port) {
                for &next in neighbors {
                    if !group.contains(&next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        let touches_ground = group
            .iter()
            .any(|p| grounded.get(p.component.as_str()).copied().unwrap_or(false));
        let node = if touches_ground {
            NodeId::GROUND
        } else {
            let id = NodeId::new(next_id);
            next_id += 1;
            id
        };
        for port in group {
            port_to_node.insert(port.clone(), node);
        }
    }

    Graph {
        port_to_node,
        num_nodes: (next_id - 1) as usize,
        has_ground: components.iter().any(|c| c.kind == ComponentKind::Ground),
    }
}
