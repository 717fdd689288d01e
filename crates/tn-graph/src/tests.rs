//! Unit tests for tn-graph.
//!
//! All tests use hand-crafted graphs so they run without any feed.

#[cfg(test)]
mod helpers {
    use crate::{Graph, GraphBuilder, Station};

    pub fn station(id: &str, lines: &[&str]) -> Station {
        Station::new(id, format!("Station {id}")).with_lines(lines.iter().copied())
    }

    /// Stations A, B, C with ride edges A→B (60 s), B→C (60 s), A→C (150 s).
    ///
    /// Shortest A→C is A→B→C = 120 s, not the direct 150 s edge.
    pub fn triangle() -> Graph {
        let mut b = GraphBuilder::new();
        for id in ["A", "B", "C"] {
            b.add_station(station(id, &["1"])).unwrap();
        }
        b.add_ride("A", "B", 60, "1").unwrap();
        b.add_ride("B", "C", 60, "1").unwrap();
        b.add_ride("A", "C", 150, "1").unwrap();
        b.build()
    }

    /// Two disjoint bidirectional triangles: {A,B,C} on line 1, {X,Y,Z} on line 2.
    pub fn two_triangles() -> Graph {
        let mut b = GraphBuilder::new();
        for id in ["A", "B", "C"] {
            b.add_station(station(id, &["1"])).unwrap();
        }
        for id in ["X", "Y", "Z"] {
            b.add_station(station(id, &["2"])).unwrap();
        }
        for (u, v, w, line) in [
            ("A", "B", 10, "1"),
            ("B", "C", 20, "1"),
            ("C", "A", 30, "1"),
            ("X", "Y", 10, "2"),
            ("Y", "Z", 20, "2"),
            ("Z", "X", 30, "2"),
        ] {
            b.add_ride(u, v, w, line).unwrap();
            b.add_ride(v, u, w, line).unwrap();
        }
        b.build()
    }

    /// Line 1: A–B–C (rides, both ways).  Line 2: D–E (rides, both ways).
    /// Transfer C↔D (45 s).  Station F has no edges.
    ///
    /// Weights:
    ///   A–B 100 / 110 (asymmetric dwell), B–C 80, D–E 70, C–D transfer 45.
    pub fn two_lines_with_transfer() -> Graph {
        let mut b = GraphBuilder::new();
        for id in ["A", "B", "C"] {
            b.add_station(station(id, &["1"])).unwrap();
        }
        for id in ["D", "E"] {
            b.add_station(station(id, &["2"])).unwrap();
        }
        b.add_station(station("F", &[])).unwrap();

        b.add_ride("A", "B", 100, "1").unwrap();
        b.add_ride("B", "A", 110, "1").unwrap();
        b.add_ride("B", "C", 80, "1").unwrap();
        b.add_ride("C", "B", 80, "1").unwrap();
        b.add_ride("D", "E", 70, "2").unwrap();
        b.add_ride("E", "D", 70, "2").unwrap();
        b.add_transfer("C", "D", 45).unwrap();
        b.add_transfer("D", "C", 45).unwrap();
        b.build()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use tn_core::{EdgeKind, GeoPoint, LineId};

    use super::helpers::{station, triangle, two_lines_with_transfer};
    use crate::{Graph, GraphBuilder, GraphError, Station};

    #[test]
    fn empty_build() {
        let g = Graph::empty();
        assert_eq!(g.station_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn debug_reports_dimensions() {
        let g = triangle();
        assert_eq!(format!("{g:?}"), "Graph { stations: 3, edges: 3, located: 0 }");
        let r: Result<Graph, GraphError> = Ok(Graph::empty());
        assert!(format!("{r:?}").starts_with("Ok(Graph { stations: 0"));
    }

    #[test]
    fn duplicate_station_rejected() {
        let mut b = GraphBuilder::new();
        b.add_station(station("A", &["1"])).unwrap();
        let err = b.add_station(station("A", &["2"])).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateStation(id) if id == "A"));
    }

    #[test]
    fn edge_invariants_enforced() {
        let mut b = GraphBuilder::new();
        b.add_station(station("A", &["1"])).unwrap();
        b.add_station(station("B", &["1"])).unwrap();

        assert!(matches!(b.add_ride("A", "A", 10, "1"), Err(GraphError::SelfLoop(_))));
        assert!(matches!(b.add_ride("A", "Q", 10, "1"), Err(GraphError::UnknownStation(id)) if id == "Q"));
        b.add_ride("A", "B", 10, "1").unwrap();
        assert!(matches!(b.add_transfer("A", "B", 5), Err(GraphError::DuplicateEdge { .. })));
        // The reverse direction is a different pair.
        b.add_ride("B", "A", 12, "1").unwrap();
        assert_eq!(b.edge_count(), 2);
    }

    #[test]
    fn transfer_edges_carry_no_line() {
        let mut b = GraphBuilder::new();
        b.add_station(station("A", &["1"])).unwrap();
        b.add_station(station("B", &["2"])).unwrap();
        b.add_edge("A", "B", 30, EdgeKind::Transfer, Some(LineId::from("1"))).unwrap();
        let g = b.build();
        let e = g.edges().next().unwrap();
        assert_eq!(e.kind, EdgeKind::Transfer);
        assert_eq!(e.line, None);
    }

    #[test]
    fn csr_out_and_in_edges() {
        let g = triangle();
        let [a, b, c] = ["A", "B", "C"].map(|id| g.idx_of(id).unwrap());

        assert_eq!(g.out_degree(a), 2);
        assert_eq!(g.out_degree(b), 1);
        assert_eq!(g.out_degree(c), 0);
        assert_eq!(g.in_degree(a), 0);
        assert_eq!(g.in_degree(c), 2);

        for e in g.out_edges(a) {
            assert_eq!(g.edge_from[e.index()], a);
        }
        for e in g.in_edges(c) {
            assert_eq!(g.edge_to[e.index()], c);
        }
    }

    #[test]
    fn find_edge_is_directed() {
        let g = triangle();
        let [a, b, _] = ["A", "B", "C"].map(|id| g.idx_of(id).unwrap());
        let e = g.find_edge(a, b).unwrap();
        assert_eq!(g.edge(e).duration, 60);
        assert_eq!(g.find_edge(b, a), None);
    }

    #[test]
    fn isolated_station_detected() {
        let g = two_lines_with_transfer();
        assert!(g.is_isolated(g.idx_of("F").unwrap()));
        assert!(!g.is_isolated(g.idx_of("C").unwrap()));
    }

    #[test]
    fn lookup_by_id() {
        let g = triangle();
        assert!(g.contains("B"));
        assert_eq!(g.station_by_id("B").unwrap().name, "Station B");
        assert!(matches!(g.resolve("Z"), Err(GraphError::UnknownStation(_))));
    }

    #[test]
    fn nearest_station_ignores_stations_without_coords() {
        let mut b = GraphBuilder::new();
        b.add_station(Station::new("near", "Near").with_coords(GeoPoint::new(48.85, 2.35))).unwrap();
        b.add_station(Station::new("far", "Far").with_coords(GeoPoint::new(48.90, 2.40))).unwrap();
        b.add_station(Station::new("nowhere", "No coords")).unwrap();
        let g = b.build();

        let hit = g.nearest_station(GeoPoint::new(48.851, 2.351)).unwrap();
        assert_eq!(g.station(hit).id, "near");
        assert!(Graph::empty().nearest_station(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_station_reports_metres() {
        let mut b = GraphBuilder::new();
        b.add_station(Station::new("chatelet", "Châtelet").with_coords(GeoPoint::new(48.8584, 2.3470))).unwrap();
        b.add_station(Station::new("nowhere", "No coords")).unwrap();
        let g = b.build();

        // 0.01° of latitude is about 1112 m.
        let (hit, metres) = g.nearest_station_distance(GeoPoint::new(48.8684, 2.3470)).unwrap();
        assert_eq!(g.station(hit).id, "chatelet");
        assert!((metres - 1_112.0).abs() < 5.0, "{metres}");

        let (_, zero) = g.nearest_station_distance(GeoPoint::new(48.8584, 2.3470)).unwrap();
        assert!(zero.abs() < 1e-6);
        assert!(Graph::empty().nearest_station_distance(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn lines_label_sorted() {
        let s = station("A", &["7bis", "1", "14"]);
        assert_eq!(s.lines_label(), "1,14,7bis");
    }
}

// ── Shortest path ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use tn_core::{EdgeKind, LineId};

    use super::helpers::{triangle, two_lines_with_transfer, two_triangles};
    use crate::{DijkstraRouter, Graph, GraphError, Router, shortest_path, shortest_paths};

    #[test]
    fn two_hops_beat_direct_edge() {
        let g = triangle();
        let r = shortest_path(&g, "A", "C").unwrap();
        assert_eq!(r.path, ["A", "B", "C"]);
        assert_eq!(r.total_time, Some(120));
        assert_eq!(r.steps.len(), 2);
    }

    #[test]
    fn unknown_destination() {
        let g = triangle();
        let err = shortest_path(&g, "A", "Z").unwrap_err();
        assert!(matches!(err, GraphError::UnknownStation(id) if id == "Z"));
    }

    #[test]
    fn unknown_source() {
        let g = triangle();
        assert!(matches!(shortest_path(&g, "Q", "A"), Err(GraphError::UnknownStation(_))));
    }

    #[test]
    fn same_station_is_trivial() {
        let g = triangle();
        let r = shortest_path(&g, "B", "B").unwrap();
        assert_eq!(r.path, ["B"]);
        assert_eq!(r.total_time, Some(0));
        assert!(r.steps.is_empty());

        let b = g.idx_of("B").unwrap();
        assert!(DijkstraRouter.route(&g, b, b).unwrap().is_trivial());
    }

    #[test]
    fn disjoint_components_are_unreachable_not_errors() {
        let g = two_triangles();
        let r = shortest_path(&g, "A", "X").unwrap();
        assert!(r.path.is_empty());
        assert_eq!(r.total_time, None);
        assert!(!r.is_reachable());
    }

    #[test]
    fn edges_are_directed() {
        // Triangle has no edge leaving C.
        let g = triangle();
        assert!(!shortest_path(&g, "C", "A").unwrap().is_reachable());
    }

    #[test]
    fn asymmetric_weights_respected() {
        let g = two_lines_with_transfer();
        assert_eq!(shortest_path(&g, "A", "B").unwrap().total_time, Some(100));
        assert_eq!(shortest_path(&g, "B", "A").unwrap().total_time, Some(110));
    }

    #[test]
    fn steps_describe_lines_and_transfers() {
        let g = two_lines_with_transfer();
        let r = shortest_path(&g, "A", "E").unwrap();
        assert_eq!(r.path, ["A", "B", "C", "D", "E"]);
        assert_eq!(r.total_time, Some(100 + 80 + 45 + 70));

        let kinds: Vec<EdgeKind> = r.steps.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, [EdgeKind::Ride, EdgeKind::Ride, EdgeKind::Transfer, EdgeKind::Ride]);
        assert_eq!(r.steps[0].line, Some(LineId::from("1")));
        assert_eq!(r.steps[2].line, None);
        assert_eq!(r.steps[3].line, Some(LineId::from("2")));
        assert_eq!(r.steps.iter().map(|s| u64::from(s.duration)).sum::<u64>(), 295);
        let arrivals: Vec<u64> = r.steps.iter().map(|s| s.arrival).collect();
        assert_eq!(arrivals.last().copied(), r.total_time);
        assert!(arrivals.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn isolated_station_unreachable() {
        let g = two_lines_with_transfer();
        assert!(!shortest_path(&g, "A", "F").unwrap().is_reachable());
    }

    #[test]
    fn empty_graph_reports_unknown_station() {
        let g = Graph::empty();
        assert!(matches!(shortest_path(&g, "A", "B"), Err(GraphError::UnknownStation(_))));
    }

    #[test]
    fn batch_results_align_with_input() {
        let g = triangle();
        let pairs = [("A", "C"), ("A", "Z"), ("C", "A")];
        let results = shortest_paths(&g, &pairs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().total_time, Some(120));
        assert!(results[1].is_err());
        assert!(!results[2].as_ref().unwrap().is_reachable());
    }

    #[test]
    fn deterministic_on_ties() {
        // A→B→D and A→C→D both cost 20.
        let mut b = crate::GraphBuilder::new();
        for id in ["A", "B", "C", "D"] {
            b.add_station(super::helpers::station(id, &["1"])).unwrap();
        }
        b.add_ride("A", "B", 10, "1").unwrap();
        b.add_ride("A", "C", 10, "1").unwrap();
        b.add_ride("B", "D", 10, "1").unwrap();
        b.add_ride("C", "D", 10, "1").unwrap();
        let g = b.build();

        let first = shortest_path(&g, "A", "D").unwrap();
        for _ in 0..10 {
            assert_eq!(shortest_path(&g, "A", "D").unwrap(), first);
        }
        assert_eq!(first.total_time, Some(20));
    }
}

// ── Spanning forest ───────────────────────────────────────────────────────────

#[cfg(test)]
mod spanning {
    use tn_core::{EdgeKind, LineId};

    use super::helpers::{station, triangle, two_lines_with_transfer, two_triangles};
    use crate::spanning::UnionFind;
    use crate::{EdgeFilter, GraphBuilder, minimum_spanning_forest};

    #[test]
    fn triangle_drops_heaviest_edge() {
        let g = triangle();
        let f = minimum_spanning_forest(&g, EdgeFilter::All);
        assert_eq!(f.edges.len(), 2);
        assert_eq!(f.total_weight, 120);
        assert!(f.edges.iter().all(|e| e.weight == 60));
    }

    #[test]
    fn disconnected_graph_yields_forest() {
        let g = two_triangles();
        let f = minimum_spanning_forest(&g, EdgeFilter::All);
        assert_eq!(f.edges.len(), 4);
        assert_eq!(f.total_weight, 2 * (10 + 20));
    }

    #[test]
    fn ride_only_filter_ignores_transfers() {
        let g = two_lines_with_transfer();

        let all = minimum_spanning_forest(&g, EdgeFilter::All);
        assert_eq!(all.edges.len(), 4); // A-B, B-C, C-D, D-E; F isolated
        assert_eq!(all.total_weight, 100 + 80 + 45 + 70);

        let rides = minimum_spanning_forest(&g, EdgeFilter::Only(EdgeKind::Ride));
        assert_eq!(rides.edges.len(), 3);
        assert_eq!(rides.total_weight, 100 + 80 + 70);
        assert!(rides.edges.iter().all(|e| e.line.is_some()));

        let transfers = minimum_spanning_forest(&g, EdgeFilter::from(Some(EdgeKind::Transfer)));
        assert_eq!(transfers.edges.len(), 1);
        assert_eq!((transfers.edges[0].from.as_str(), transfers.edges[0].to.as_str()), ("C", "D"));
    }

    #[test]
    fn canonical_direction_supplies_weight() {
        // A→B is 100, B→A is 110: the lexicographically ordered A→B wins.
        let g = two_lines_with_transfer();
        let f = minimum_spanning_forest(&g, EdgeFilter::All);
        let ab = f.edges.iter().find(|e| e.from == "A").unwrap();
        assert_eq!((ab.to.as_str(), ab.weight), ("B", 100));
    }

    #[test]
    fn reverse_only_edge_is_reported_canonically() {
        let mut b = GraphBuilder::new();
        b.add_station(station("A", &["1"])).unwrap();
        b.add_station(station("B", &["1"])).unwrap();
        b.add_ride("B", "A", 42, "1").unwrap();
        let f = minimum_spanning_forest(&b.build(), EdgeFilter::All);
        assert_eq!(f.edges.len(), 1);
        assert_eq!((f.edges[0].from.as_str(), f.edges[0].to.as_str()), ("A", "B"));
        assert_eq!(f.edges[0].weight, 42);
        assert_eq!(f.edges[0].line, Some(LineId::from("1")));
    }

    #[test]
    fn equal_weights_tie_break_by_id() {
        // Square A-B-C-D with every side 10: Kruskal keeps the three
        // lexicographically smallest pairs.
        let mut b = GraphBuilder::new();
        for id in ["A", "B", "C", "D"] {
            b.add_station(station(id, &["1"])).unwrap();
        }
        for (u, v) in [("A", "B"), ("B", "C"), ("C", "D"), ("A", "D")] {
            b.add_ride(u, v, 10, "1").unwrap();
        }
        let f = minimum_spanning_forest(&b.build(), EdgeFilter::All);
        let pairs: Vec<(&str, &str)> =
            f.edges.iter().map(|e| (e.from.as_str(), e.to.as_str())).collect();
        assert_eq!(pairs, [("A", "B"), ("A", "D"), ("B", "C")]);
    }

    #[test]
    fn union_find_basics() {
        let mut uf = UnionFind::new(4);
        assert!(uf.union(0, 1));
        assert!(uf.union(2, 3));
        assert!(!uf.union(1, 0));
        assert_ne!(uf.find(0), uf.find(2));
        assert!(uf.union(1, 3));
        assert_eq!(uf.find(0), uf.find(2));
    }

    #[test]
    fn empty_graph_has_empty_forest() {
        let f = minimum_spanning_forest(&crate::Graph::empty(), EdgeFilter::All);
        assert!(f.edges.is_empty());
        assert_eq!(f.total_weight, 0);
    }
}

// ── Connectivity ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod connectivity {
    use super::helpers::{station, triangle, two_lines_with_transfer, two_triangles};
    use crate::connectivity::are_connected;
    use crate::{Graph, GraphBuilder, components, is_connected};

    #[test]
    fn two_disjoint_triangles() {
        let g = two_triangles();
        let cs = components(&g);
        assert_eq!(cs.len(), 2);
        assert_eq!(cs.sizes(), [3, 3]);
        assert!(!is_connected(&g));
        assert_ne!(cs.component_of("A"), cs.component_of("X"));
        assert_eq!(cs.component_of("A"), cs.component_of("C"));
    }

    #[test]
    fn direction_ignored() {
        // Triangle edges all point away from A; still one component.
        let g = triangle();
        assert!(is_connected(&g));
        assert_eq!(components(&g).len(), 1);
    }

    #[test]
    fn isolated_station_is_singleton_but_not_disconnecting() {
        let g = two_lines_with_transfer();
        assert!(is_connected(&g));
        let cs = components(&g);
        assert_eq!(cs.len(), 2);
        assert_eq!(cs.sizes(), [5, 1]);
        let f = cs.component_of("F").unwrap();
        assert_eq!(cs.iter().nth(f).unwrap(), ["F"]);
    }

    #[test]
    fn empty_graph_is_not_connected() {
        let g = Graph::empty();
        assert!(!is_connected(&g));
        assert!(components(&g).is_empty());
    }

    #[test]
    fn edgeless_stations_are_not_connected() {
        let mut b = GraphBuilder::new();
        b.add_station(station("A", &["1"])).unwrap();
        b.add_station(station("B", &["1"])).unwrap();
        let g = b.build();
        assert!(!is_connected(&g));
        assert_eq!(components(&g).sizes(), [1, 1]);
    }

    #[test]
    fn pairwise_reachability() {
        let g = two_triangles();
        let [a, c, x] = ["A", "C", "X"].map(|id| g.idx_of(id).unwrap());
        assert!(are_connected(&g, a, c));
        assert!(are_connected(&g, a, a));
        assert!(!are_connected(&g, a, x));
    }

    #[test]
    fn components_sorted_members() {
        let g = two_triangles();
        let all = components(&g).into_inner();
        assert_eq!(all[0], ["A", "B", "C"]);
        assert_eq!(all[1], ["X", "Y", "Z"]);
    }
}

// ── Snapshot codec ────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot {
    use tn_core::{EdgeKind, GeoPoint, LineId};

    use super::helpers::two_lines_with_transfer;
    use crate::{GraphBuilder, GraphError, Snapshot, Station, load_snapshot, save_snapshot};

    const SAMPLE: &str = r#"{
        "nodes": [
            { "id": "N1", "name": "Nation", "line": "1,2", "x": 48.848, "y": 2.396 },
            { "id": "N2", "name": "Reuilly", "line": "1" }
        ],
        "edges": [
            { "from": "N1", "to": "N2", "duration": 85, "type": "ride", "line": "1" },
            { "from": "N2", "to": "N1", "duration": 60, "type": "transfer" }
        ]
    }"#;

    #[test]
    fn parses_snapshot_format() {
        let g = Snapshot::from_json_str(SAMPLE).unwrap().into_graph().unwrap();
        assert_eq!(g.station_count(), 2);
        assert_eq!(g.edge_count(), 2);

        let nation = g.station_by_id("N1").unwrap();
        assert_eq!(nation.coords, Some(GeoPoint::new(48.848, 2.396)));
        assert!(nation.lines.contains("2"));
        assert_eq!(g.station_by_id("N2").unwrap().coords, None);

        let e = g.edge(g.find_edge(g.idx_of("N1").unwrap(), g.idx_of("N2").unwrap()).unwrap());
        assert_eq!((e.kind, e.duration, e.line), (EdgeKind::Ride, 85, Some(&LineId::from("1"))));
    }

    #[test]
    fn graph_roundtrip_through_json() {
        let g = two_lines_with_transfer();
        let json = Snapshot::from_graph(&g).to_json_string().unwrap();
        assert!(json.contains("\"type\": \"transfer\""));

        let back = Snapshot::from_json_str(&json).unwrap().into_graph().unwrap();
        assert_eq!(Snapshot::from_graph(&back), Snapshot::from_graph(&g));
    }

    #[test]
    fn coordinates_written_as_x_and_y() {
        let mut b = GraphBuilder::new();
        b.add_station(Station::new("S", "Somewhere").with_lines(["4"]).with_coords(GeoPoint::new(48.1, 2.2)))
            .unwrap();
        b.add_station(Station::new("T", "Nowhere")).unwrap();
        let snap = Snapshot::from_graph(&b.build());
        assert_eq!((snap.nodes[0].x, snap.nodes[0].y), (Some(48.1), Some(2.2)));
        assert_eq!(snap.nodes[1].x, None);
        let json = snap.to_json_string().unwrap();
        assert_eq!(json.matches("\"x\"").count(), 1);
    }

    #[test]
    fn dangling_edge_rejected() {
        let json = r#"{ "nodes": [{ "id": "A", "name": "A", "line": "1" }],
                        "edges": [{ "from": "A", "to": "B", "duration": 5, "type": "ride" }] }"#;
        let err = Snapshot::from_json_str(json).unwrap().into_graph().unwrap_err();
        assert!(matches!(err, GraphError::UnknownStation(id) if id == "B"));
    }

    #[test]
    fn duplicate_node_rejected() {
        let json = r#"{ "nodes": [{ "id": "A", "name": "A" }, { "id": "A", "name": "again" }],
                        "edges": [] }"#;
        let err = Snapshot::from_json_str(json).unwrap().into_graph().unwrap_err();
        assert!(matches!(err, GraphError::DuplicateStation(_)));
    }

    #[test]
    fn bad_edge_type_is_snapshot_error() {
        let json = r#"{ "nodes": [], "edges": [{ "from": "A", "to": "B", "duration": 5, "type": "walk" }] }"#;
        assert!(matches!(Snapshot::from_json_str(json), Err(GraphError::Snapshot(_))));
    }

    #[test]
    fn save_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let g = two_lines_with_transfer();
        save_snapshot(&g, &path).unwrap();
        let back = load_snapshot(&path).unwrap();
        assert_eq!(back.station_count(), g.station_count());
        assert_eq!(back.edge_count(), g.edge_count());
        assert_eq!(
            crate::shortest_path(&back, "A", "E").unwrap(),
            crate::shortest_path(&g, "A", "E").unwrap()
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_snapshot(&dir.path().join("absent.json")), Err(GraphError::Io(_))));
    }
}

// ── Graph slot ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod slot {
    use super::helpers::{triangle, two_triangles};
    use crate::{GraphSlot, shortest_path};

    #[test]
    fn in_flight_query_keeps_old_graph() {
        let slot = GraphSlot::new(triangle());
        let before = slot.current();

        let old = slot.replace(two_triangles());
        assert!(std::sync::Arc::ptr_eq(&before, &old));

        // The old graph is still fully usable.
        assert_eq!(shortest_path(&before, "A", "C").unwrap().total_time, Some(120));
        // New queries see the new graph.
        assert!(slot.current().contains("X"));
    }

    #[test]
    fn default_slot_is_empty() {
        assert!(GraphSlot::default().current().is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let slot = std::sync::Arc::new(GraphSlot::new(triangle()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let slot = std::sync::Arc::clone(&slot);
                std::thread::spawn(move || {
                    let g = slot.current();
                    shortest_path(&g, "A", "C").unwrap().total_time
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Some(120));
        }
    }
}

// ── Properties on small random graphs ─────────────────────────────────────────

#[cfg(test)]
mod properties {
    use std::collections::{BTreeMap, HashSet};

    use proptest::prelude::*;
    use tn_core::EdgeKind;

    use crate::spanning::UnionFind;
    use crate::{EdgeFilter, Graph, GraphBuilder, Station, components, is_connected,
        minimum_spanning_forest, shortest_path};

    type RawEdges = Vec<(usize, usize, u32, bool)>;

    /// Up to 6 stations `s0..s5` and up to 12 directed edges; `true` marks a
    /// ride, `false` a transfer.  Single-digit suffixes keep lexicographic
    /// and numeric order identical.
    fn arb_graph() -> impl Strategy<Value = (usize, RawEdges)> {
        (2usize..=6).prop_flat_map(|n| {
            let edge = (0..n, 0..n, 1u32..100, any::<bool>());
            (Just(n), proptest::collection::vec(edge, 0..12))
        })
    }

    fn build(n: usize, edges: &RawEdges) -> Graph {
        let mut b = GraphBuilder::new();
        for i in 0..n {
            b.add_station(Station::new(format!("s{i}"), format!("S{i}")).with_lines(["1"])).unwrap();
        }
        let mut seen = HashSet::new();
        for &(u, v, w, ride) in edges {
            if u == v || !seen.insert((u, v)) {
                continue;
            }
            let (from, to) = (format!("s{u}"), format!("s{v}"));
            if ride {
                b.add_ride(&from, &to, w, "1").unwrap();
            } else {
                b.add_transfer(&from, &to, w).unwrap();
            }
        }
        b.build()
    }

    /// Minimum cost over every simple path, by exhaustive DFS.
    fn brute_force_dist(g: &Graph, from: usize, to: usize) -> Option<u64> {
        fn walk(g: &Graph, at: usize, to: usize, cost: u64, on_path: &mut Vec<bool>, best: &mut Option<u64>) {
            if at == to {
                *best = Some(best.map_or(cost, |b| b.min(cost)));
                return;
            }
            on_path[at] = true;
            for e in g.out_edges(tn_core::StationIdx(at as u32)) {
                let next = g.edge_to[e.index()].index();
                if !on_path[next] {
                    walk(g, next, to, cost + u64::from(g.edge_duration[e.index()]), on_path, best);
                }
            }
            on_path[at] = false;
        }
        let mut best = None;
        walk(g, from, to, 0, &mut vec![false; g.station_count()], &mut best);
        best
    }

    fn dist(g: &Graph, a: usize, b: usize) -> Option<u64> {
        shortest_path(g, &format!("s{a}"), &format!("s{b}")).unwrap().total_time
    }

    /// Canonical undirected weights of the filtered subgraph, keyed (lo, hi).
    fn canonical_pairs(g: &Graph, filter: EdgeFilter) -> BTreeMap<(usize, usize), u32> {
        let mut pairs = BTreeMap::new();
        for e in g.edges().filter(|e| filter.admits(e.kind)) {
            let (u, v) = (e.from.index(), e.to.index());
            if u < v {
                pairs.insert((u, v), e.duration);
            } else {
                pairs.entry((v, u)).or_insert(e.duration);
            }
        }
        pairs
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn dijkstra_matches_brute_force((n, edges) in arb_graph()) {
            let g = build(n, &edges);
            for a in 0..n {
                for b in 0..n {
                    prop_assert_eq!(dist(&g, a, b), brute_force_dist(&g, a, b), "s{} -> s{}", a, b);
                }
            }
        }

        #[test]
        fn reported_total_matches_steps((n, edges) in arb_graph()) {
            let g = build(n, &edges);
            let r = shortest_path(&g, "s0", &format!("s{}", n - 1)).unwrap();
            if let Some(total) = r.total_time {
                prop_assert_eq!(total, r.steps.iter().map(|s| u64::from(s.duration)).sum::<u64>());
                prop_assert_eq!(r.path.len(), r.steps.len() + 1);
                let mut elapsed = 0u64;
                for step in &r.steps {
                    elapsed += u64::from(step.duration);
                    prop_assert_eq!(step.arrival, elapsed);
                }
                prop_assert_eq!(r.path.first().map(String::as_str), Some("s0"));
            } else {
                prop_assert!(r.path.is_empty());
            }
        }

        #[test]
        fn triangle_inequality((n, edges) in arb_graph()) {
            let g = build(n, &edges);
            for a in 0..n {
                for b in 0..n {
                    for c in 0..n {
                        if let (Some(ab), Some(bc)) = (dist(&g, a, b), dist(&g, b, c)) {
                            let ac = dist(&g, a, c);
                            prop_assert!(ac.is_some_and(|ac| ac <= ab + bc));
                        }
                    }
                }
            }
        }

        #[test]
        fn spanning_forest_is_minimal(
            (n, edges) in arb_graph(),
            filter in prop_oneof![
                Just(EdgeFilter::All),
                Just(EdgeFilter::Only(EdgeKind::Ride)),
                Just(EdgeFilter::Only(EdgeKind::Transfer)),
            ],
        ) {
            let g = build(n, &edges);
            let forest = minimum_spanning_forest(&g, filter);
            let pairs: Vec<((usize, usize), u32)> = canonical_pairs(&g, filter).into_iter().collect();

            // Acyclic, and its size is the rank of the filtered subgraph.
            let idx = |id: &str| g.idx_of(id).unwrap().0;
            let mut uf = UnionFind::new(n);
            for e in &forest.edges {
                prop_assert!(uf.union(idx(&e.from), idx(&e.to)), "cycle through {}-{}", e.from, e.to);
            }
            let mut all = UnionFind::new(n);
            let rank = pairs.iter().filter(|((u, v), _)| all.union(*u as u32, *v as u32)).count();
            prop_assert_eq!(forest.edges.len(), rank);

            // Touches every station that has an admitted edge.
            let touched: HashSet<usize> = forest.edges.iter()
                .flat_map(|e| [idx(&e.from) as usize, idx(&e.to) as usize]).collect();
            for ((u, v), _) in &pairs {
                prop_assert!(touched.contains(u) && touched.contains(v));
            }

            // No spanning forest of the same subgraph is lighter.
            let mut best = u64::MAX;
            for mask in 0u32..(1 << pairs.len()) {
                if mask.count_ones() as usize != rank {
                    continue;
                }
                let mut uf = UnionFind::new(n);
                let mut weight = 0u64;
                let acyclic = pairs.iter().enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .all(|(_, ((u, v), w))| {
                        weight += u64::from(*w);
                        uf.union(*u as u32, *v as u32)
                    });
                if acyclic {
                    best = best.min(weight);
                }
            }
            prop_assert_eq!(forest.total_weight, if rank == 0 { 0 } else { best });
        }

        #[test]
        fn components_partition_stations((n, edges) in arb_graph()) {
            let g = build(n, &edges);
            let cs = components(&g);

            let mut seen = HashSet::new();
            for c in cs.iter() {
                for id in c {
                    prop_assert!(seen.insert(id.clone()), "{} in two components", id);
                }
            }
            prop_assert_eq!(seen.len(), n);

            let linked_components = cs.iter()
                .filter(|c| c.iter().any(|id| !g.is_isolated(g.idx_of(id).unwrap())))
                .count();
            prop_assert_eq!(is_connected(&g), linked_components == 1);
        }
    }
}
