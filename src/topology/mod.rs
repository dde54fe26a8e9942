//! # Pad Topology
//!
//! Undirected adjacency graph over suit pads. Built once from a body map and
//! read-only afterwards, so one `Arc<PadTopology>` can serve any number of
//! concurrent traversals.
//!
//! ## Built-in body map
//!
//! ```text
//!  forearm ─ upper arm ─ shoulder ─┬─ back ═══ back ─┬─ shoulder ─ upper arm ─ forearm
//!                                  └─ chest ══ chest ┘
//!                                       │        │
//!                                  upper ab ══ upper ab
//!                                       │        │
//!                                   mid ab ═══ mid ab
//!                                       │        │
//!                                  lower ab ══ lower ab
//! ```
//!
//! `═` marks cross-body edges. Forearm to forearm is seven hops.

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::model::{Region, RegionSet};
use crate::{Error, Result};

// ============================================================================
// Description (input format)
// ============================================================================

fn unit_weight() -> f64 {
    1.0
}

/// One undirected edge of a body map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescription {
    pub a: Region,
    pub b: Region,
    /// Traversal cost. Uniform (1.0) unless physical distance is modelled.
    #[serde(default = "unit_weight")]
    pub weight: f64,
}

/// Body map as supplied at startup, e.g. from a JSON asset.
///
/// ```json
/// { "regions": ["chest_left"], "edges": [{ "a": "chest_left", "b": "chest_right" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopologyDescription {
    /// Pads with no edges still need to be declared to exist.
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub edges: Vec<EdgeDescription>,
}

const SUIT_EDGES: &[(Region, Region)] = &[
    // Left side
    (Region::ForearmLeft, Region::UpperArmLeft),
    (Region::UpperArmLeft, Region::ShoulderLeft),
    (Region::ShoulderLeft, Region::BackLeft),
    (Region::ShoulderLeft, Region::ChestLeft),
    (Region::ChestLeft, Region::UpperAbLeft),
    (Region::UpperAbLeft, Region::MidAbLeft),
    (Region::MidAbLeft, Region::LowerAbLeft),
    // Right side
    (Region::ForearmRight, Region::UpperArmRight),
    (Region::UpperArmRight, Region::ShoulderRight),
    (Region::ShoulderRight, Region::BackRight),
    (Region::ShoulderRight, Region::ChestRight),
    (Region::ChestRight, Region::UpperAbRight),
    (Region::UpperAbRight, Region::MidAbRight),
    (Region::MidAbRight, Region::LowerAbRight),
    // Across the body
    (Region::ChestLeft, Region::ChestRight),
    (Region::BackLeft, Region::BackRight),
    (Region::UpperAbLeft, Region::UpperAbRight),
    (Region::MidAbLeft, Region::MidAbRight),
    (Region::LowerAbLeft, Region::LowerAbRight),
];

impl TopologyDescription {
    /// The standard 16-pad suit.
    pub fn suit() -> Self {
        Self {
            regions: Region::ALL.to_vec(),
            edges: SUIT_EDGES
                .iter()
                .map(|&(a, b)| EdgeDescription { a, b, weight: 1.0 })
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Graph
// ============================================================================

/// An adjacent pad and the cost of stepping onto it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub region: Region,
    pub weight: f64,
}

/// A pad plus its neighbor list, in body-map declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyNode {
    pub region: Region,
    pub neighbors: SmallVec<[Neighbor; 4]>,
}

impl TopologyNode {
    fn new(region: Region) -> Self {
        Self { region, neighbors: SmallVec::new() }
    }

    pub fn neighbor_set(&self) -> RegionSet {
        self.neighbors.iter().map(|n| n.region).collect()
    }
}

/// Immutable pad adjacency graph.
#[derive(Debug, Clone, Default)]
pub struct PadTopology {
    nodes: HashMap<Region, TopologyNode>,
    edge_count: usize,
}

impl PadTopology {
    /// The built-in suit body map.
    pub fn suit() -> Self {
        let mut topology = Self::default();
        for region in Region::ALL {
            topology.ensure_node(region);
        }
        for &(a, b) in SUIT_EDGES {
            topology.insert_edge(a, b, 1.0);
        }
        topology
    }

    /// Build from a body map, validating every edge.
    pub fn from_description(desc: &TopologyDescription) -> Result<Self> {
        let mut topology = Self::default();
        for &region in &desc.regions {
            topology.ensure_node(region);
        }
        for edge in &desc.edges {
            if edge.a == edge.b {
                return Err(Error::InvalidArgument {
                    name: "edges",
                    message: format!("self-loop on {}", edge.a),
                });
            }
            if !edge.weight.is_finite() || edge.weight <= 0.0 {
                return Err(Error::InvalidArgument {
                    name: "weight",
                    message: format!("edge {}-{} has weight {}; must be finite and > 0", edge.a, edge.b, edge.weight),
                });
            }
            if topology.edge_weight(edge.a, edge.b).is_some() {
                tracing::debug!(a = %edge.a, b = %edge.b, "duplicate edge ignored");
                continue;
            }
            topology.insert_edge(edge.a, edge.b, edge.weight);
        }
        Ok(topology)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_description(&TopologyDescription::from_json(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn ensure_node(&mut self, region: Region) -> &mut TopologyNode {
        self.nodes.entry(region).or_insert_with(|| TopologyNode::new(region))
    }

    fn insert_edge(&mut self, a: Region, b: Region, weight: f64) {
        self.ensure_node(a).neighbors.push(Neighbor { region: b, weight });
        self.ensure_node(b).neighbors.push(Neighbor { region: a, weight });
        self.edge_count += 1;
    }

    /// Look up a pad's node.
    pub fn node_for(&self, region: Region) -> Result<&TopologyNode> {
        self.nodes.get(&region).ok_or(Error::UnknownRegion(region))
    }

    /// Adjacent pads. Empty for pads absent from the map.
    pub fn neighbors(&self, region: Region) -> RegionSet {
        self.nodes
            .get(&region)
            .map(TopologyNode::neighbor_set)
            .unwrap_or_default()
    }

    pub fn contains(&self, region: Region) -> bool {
        self.nodes.contains_key(&region)
    }

    pub fn are_adjacent(&self, a: Region, b: Region) -> bool {
        self.edge_weight(a, b).is_some()
    }

    pub fn edge_weight(&self, a: Region, b: Region) -> Option<f64> {
        self.nodes
            .get(&a)?
            .neighbors
            .iter()
            .find(|n| n.region == b)
            .map(|n| n.weight)
    }

    /// Pad count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// All pads in the map, as a set.
    pub fn regions(&self) -> RegionSet {
        self.nodes.keys().copied().collect()
    }
}
