// End-to-end scenarios over the public API: merge, owner graph, swap ranking
// and the full analysis pipeline.

use parcelgraph::{
    analyze, merge_same_owner, suggest_swaps, AdjacencyOptions, Config, DiagnosticKind, OwnerGraph, OwnerId,
    Parcel, ParcelGraph, ParcelId, ParcelRecord, SwapConfig,
};
use parcelgraph::parcelgeom::Relation;
use parcelgraph::Boundary;
use pretty_assertions::assert_eq;

const LEFT: &str = "POLYGON((0 0, 1 0, 1 1, 0 1, 0 0))";
const RIGHT: &str = "POLYGON((1 0, 2 0, 2 1, 1 1, 1 0))";

fn parcel(id: i64, owner: i64, boundary: &str, shape_area: f64) -> Parcel {
    Parcel::try_from(ParcelRecord { id, owner, shape_area, boundary: boundary.into(), ..Default::default() }).unwrap()
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> String {
    format!("POLYGON(({x0} {y0}, {x1} {y0}, {x1} {y1}, {x0} {y1}, {x0} {y0}))")
}

#[test]
fn same_owner_squares_merge_into_area_two() {
    let parcels = [parcel(1, 1, LEFT, 1.0), parcel(2, 1, RIGHT, 1.0)];
    let outcome = merge_same_owner(&parcels, &AdjacencyOptions::default());

    assert_eq!(outcome.len(), 1);
    assert!((outcome.merged[0].parcel().shape_area() - 2.0).abs() < 1e-9);
    assert_eq!(outcome.merged[0].members(), &[ParcelId(1), ParcelId(2)]);
}

#[test]
fn different_owner_squares_yield_one_perfect_swap() {
    let parcels = [parcel(1, 1, LEFT, 1.0), parcel(2, 2, RIGHT, 1.0)];
    let merged = merge_same_owner(&parcels, &AdjacencyOptions::default());
    let graph = ParcelGraph::from_parcels(merged.into_parcels(), &AdjacencyOptions::default());

    let suggestions = suggest_swaps(&graph, &SwapConfig::new(0.10, 10));
    assert_eq!(suggestions.len(), 1);
    assert!((suggestions[0].score - 1.0).abs() < 1e-12);
    assert_eq!(suggestions[0].owners(), (OwnerId(1), OwnerId(2)));
}

/// C | A | B, with recorded areas 50, 100 and 105.
fn three_owners() -> ParcelGraph {
    let parcels = [
        parcel(1, 1, &rect(0.0, 0.0, 10.0, 10.0), 100.0),
        parcel(2, 2, &rect(10.0, 0.0, 20.0, 10.0), 105.0),
        parcel(3, 3, &rect(-10.0, 0.0, 0.0, 10.0), 50.0),
    ];
    ParcelGraph::build(&parcels, &AdjacencyOptions::default())
}

#[test]
fn three_owners_tight_threshold() {
    let graph = three_owners();
    assert_eq!(graph.edge_count(), 2);

    let suggestions = suggest_swaps(&graph, &SwapConfig::new(0.10, 10));
    assert_eq!(suggestions.len(), 1);
    assert_eq!((suggestions[0].first.id(), suggestions[0].second.id()), (ParcelId(1), ParcelId(2)));
}

#[test]
fn three_owners_loose_threshold_ranks_closer_areas_first() {
    let suggestions = suggest_swaps(&three_owners(), &SwapConfig::new(0.60, 10));
    let pairs = suggestions.iter().map(|s| (s.first.id().0, s.second.id().0)).collect::<Vec<_>>();
    assert_eq!(pairs, vec![(1, 2), (1, 3)]);
    assert!(suggestions[0].score > suggestions[1].score);
}

#[test]
fn empty_input_is_empty_everywhere() {
    let options = AdjacencyOptions::default();
    assert!(ParcelGraph::build(&[], &options).is_empty());
    assert!(OwnerGraph::build(&[], &options).is_empty());
    assert!(merge_same_owner(&[], &options).is_empty());
    assert!(suggest_swaps(&ParcelGraph::build(&[], &options), &SwapConfig::default()).is_empty());

    let analysis = analyze(&[], &Config::default());
    assert!(analysis.parcel_graph.is_empty());
    assert!(analysis.owner_graph.is_empty());
    assert!(analysis.merged.is_empty());
    assert!(analysis.suggestions.is_empty());
    assert_eq!(analysis.diagnostics().count(), 0);
}

#[test]
fn owner_in_the_notch_of_an_l_shaped_holding() {
    // Owner 1 holds an L of three squares, owner 2 sits in the notch, owner 3 is far away.
    let parcels = [
        parcel(1, 1, &rect(0.0, 0.0, 1.0, 1.0), 1.0),
        parcel(2, 1, &rect(1.0, 0.0, 2.0, 1.0), 1.0),
        parcel(3, 1, &rect(0.0, 1.0, 1.0, 2.0), 1.0),
        parcel(4, 2, &rect(1.0, 1.0, 2.0, 2.0), 1.0),
        parcel(5, 3, &rect(9.0, 9.0, 10.0, 10.0), 1.0),
    ];
    let owners = OwnerGraph::build(&parcels, &AdjacencyOptions::default());
    assert_eq!(owners.neighbors(OwnerId(1)), &[OwnerId(2)]);
    assert_eq!(owners.neighbors(OwnerId(2)), &[OwnerId(1)]);
    assert!(owners.neighbors(OwnerId(3)).is_empty());

    let merged = merge_same_owner(&parcels, &AdjacencyOptions::default());
    assert_eq!(merged.len(), 3);
    assert!((merged.merged[0].parcel().shape_area() - 3.0).abs() < 1e-9);
}

#[test]
fn full_pipeline() {
    let parcels = [
        parcel(1, 1, &rect(0.0, 0.0, 1.0, 1.0), 1.0),
        parcel(2, 1, &rect(1.0, 0.0, 2.0, 1.0), 1.0),
        parcel(3, 2, &rect(2.0, 0.0, 4.0, 1.0), 2.0),
        parcel(4, 3, &rect(0.0, 1.0, 4.0, 2.0), 4.0),
        parcel(5, 3, "POLYGON((broken", 1.0),
    ];
    let config = Config { swap: SwapConfig::new(0.5, 10), ..Config::default() };
    let analysis = analyze(&parcels, &config);

    assert_eq!(analysis.parcel_graph.node_count(), 5);
    assert_eq!(analysis.owner_graph.owner_count(), 3);
    assert_eq!(analysis.owner_graph.edge_count(), 3);

    // Parcels 1 and 2 merge into one holding of area 2; everything else passes through.
    assert_eq!(analysis.merged.len(), 4);
    let holding = analysis.merged.merged.iter().find(|m| m.members().len() == 2).unwrap();
    assert_eq!(holding.parcel().id(), ParcelId(1));
    assert!((holding.parcel().shape_area() - 2.0).abs() < 1e-9);

    // Holding (2) vs parcel 3 (2): ratio 0. Both vs parcel 4 (4): ratio 0.5.
    let pairs = analysis.suggestions.iter().map(|s| (s.first.id().0, s.second.id().0)).collect::<Vec<_>>();
    assert_eq!(pairs, vec![(1, 3), (1, 4), (3, 4)]);

    let diagnostics = analysis.diagnostics().collect::<Vec<_>>();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].parcel, ParcelId(5));
    assert!(matches!(diagnostics[0].kind, DiagnosticKind::UnparsableBoundary(_)));
}

/// Owner 1 holds two parcels side by side; owner 2's parcel runs along the
/// top of both. Coordinates are in projected metres.
#[test]
fn merged_holding_keeps_touching_its_neighbor_in_projected_coordinates() {
    let (x0, x1, x2) = (322145.137, 322157.412, 322169.688);
    let (y0, y1, y2) = (3617432.871, 3617445.093, 3617457.315);
    let parcels = [
        parcel(1, 1, &rect(x0, y0, x1, y1), 150.0),
        parcel(2, 1, &rect(x1, y0, x2, y1), 150.0),
        parcel(3, 2, &rect(x0, y1, x2, y2), 300.0),
    ];
    let analysis = analyze(&parcels, &Config::default());
    assert_eq!(analysis.parcel_graph.edge_count(), 3);

    let holding = analysis.merged.merged.iter().find(|m| !m.is_singleton()).unwrap().parcel();
    let neighbor = analysis.parcel_graph.parcel(ParcelId(3)).unwrap();
    assert_eq!(holding.boundary().relation(neighbor.boundary()), Some(Relation::Touches));

    // The exported WKT must carry the same contact.
    let reparsed = Boundary::parse(holding.boundary().wkt());
    assert_eq!(reparsed.relation(neighbor.boundary()), Some(Relation::Touches));

    assert_eq!(analysis.merged_graph.edge_count(), 1);
    assert_eq!(analysis.suggestions.len(), 1);
    assert_eq!(analysis.suggestions[0].owners(), (OwnerId(1), OwnerId(2)));
}

#[test]
fn outputs_serialize_for_export_layers() {
    let parcels = [parcel(1, 1, LEFT, 1.0), parcel(2, 2, RIGHT, 1.0)];
    let analysis = analyze(&parcels, &Config::default());

    let suggestions = serde_json::to_value(&analysis.suggestions).unwrap();
    assert_eq!(suggestions[0]["first"]["id"], 1);
    assert_eq!(suggestions[0]["second"]["boundary"], RIGHT);

    let owners = serde_json::to_value(&analysis.owner_graph).unwrap();
    assert_eq!(owners["adjacency"]["1"], serde_json::json!([2]));
}
