//! Reachability and connected components, edges treated as undirected.
//!
//! Traversal is an explicit-stack depth-first search: network size is not
//! bounded at compile time, so no recursion.
//!
//! Stations with no incident edge are leftovers of upstream filtering.  They
//! do not count against [`is_connected`] but each is still reported as a
//! singleton by [`components`].

use tn_core::StationIdx;

use crate::Graph;

/// Sentinel for "not yet labelled".
const UNVISITED: u32 = u32::MAX;

/// A partition of every station into connected components.
///
/// Components are ordered by their lowest station index; members within a
/// component are sorted by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentSet {
    components: Vec<Vec<String>>,
}

impl ComponentSet {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[String]> {
        self.components.iter().map(Vec::as_slice)
    }

    /// Component sizes, largest first.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.components.iter().map(Vec::len).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }

    /// Position of the component holding `id`.
    pub fn component_of(&self, id: &str) -> Option<usize> {
        self.components
            .iter()
            .position(|c| c.binary_search_by(|m| m.as_str().cmp(id)).is_ok())
    }

    pub fn into_inner(self) -> Vec<Vec<String>> {
        self.components
    }
}

/// Label every station with its component number (0-based, in order of the
/// lowest station index).  Returns the labels and the component count.
fn label_components(graph: &Graph) -> (Vec<u32>, u32) {
    let mut label = vec![UNVISITED; graph.station_count()];
    let mut stack: Vec<StationIdx> = Vec::new();
    let mut next = 0u32;

    for start in graph.station_indices() {
        if label[start.index()] != UNVISITED {
            continue;
        }
        label[start.index()] = next;
        stack.push(start);
        while let Some(s) = stack.pop() {
            for n in graph.undirected_neighbors(s) {
                if label[n.index()] == UNVISITED {
                    label[n.index()] = next;
                    stack.push(n);
                }
            }
        }
        next += 1;
    }

    (label, next)
}

/// Every station in exactly one component.
pub fn components(graph: &Graph) -> ComponentSet {
    let (label, count) = label_components(graph);
    let mut components: Vec<Vec<String>> = vec![Vec::new(); count as usize];
    for s in graph.station_indices() {
        components[label[s.index()] as usize].push(graph.station(s).id.clone());
    }
    for c in &mut components {
        c.sort_unstable();
    }
    ComponentSet { components }
}

/// `true` iff the stations with at least one incident edge form exactly one
/// component.  A graph with no edges has no such component and is not
/// connected.
pub fn is_connected(graph: &Graph) -> bool {
    let mut linked = graph.station_indices().filter(|&s| !graph.is_isolated(s));
    let Some(start) = linked.next() else {
        return false;
    };

    let mut visited = vec![false; graph.station_count()];
    let mut stack = vec![start];
    visited[start.index()] = true;
    while let Some(s) = stack.pop() {
        for n in graph.undirected_neighbors(s) {
            if !visited[n.index()] {
                visited[n.index()] = true;
                stack.push(n);
            }
        }
    }

    linked.all(|s| visited[s.index()])
}

/// `true` if `a` and `b` are in the same undirected component.
pub fn are_connected(graph: &Graph, a: StationIdx, b: StationIdx) -> bool {
    if a == b {
        return true;
    }
    let mut visited = vec![false; graph.station_count()];
    let mut stack = vec![a];
    visited[a.index()] = true;
    while let Some(s) = stack.pop() {
        for n in graph.undirected_neighbors(s) {
            if n == b {
                return true;
            }
            if !visited[n.index()] {
                visited[n.index()] = true;
                stack.push(n);
            }
        }
    }
    false
}
