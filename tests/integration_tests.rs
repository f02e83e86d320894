//! Integration tests for the stemma pipeline

use pretty_assertions::assert_eq;

use stemma::graph::{visible_set, Filter, TreeError};
use stemma::viewstate::{self, ViewState};
use stemma::{load, render, render_with_config, RenderConfig, RenderError};

const SIMPSONS: &str = "\
# The Simpsons, heavily abridged
Abe + Mona
 n: met at the county fair
 c: Homer, Herb
Homer
 l: 1956-
 n: safety inspector at http://example.com/plant
Homer + Marge
 c: Bart, Lisa, Maggie
Clancy + Jackie
 c: Marge, Patty
Herb + ?
 c: Abbie
";

#[test]
fn test_load_valid_family() {
    let family = load(SIMPSONS).expect("should load");
    assert!(family.graph.contains("Homer"));
    assert!(family.graph.contains("Homer + Marge"));
    // Placeholder partner got a unique minted name.
    assert!(family.graph.contains("Herb + ?#1"));
}

#[test]
fn test_graph_is_symmetric() {
    let family = load(SIMPSONS).expect("should load");
    for u in family.graph.names() {
        for v in family.graph.neighbours(u) {
            assert!(
                family.graph.neighbours(v).contains(&u.to_string()),
                "edge {u} -> {v} has no reverse"
            );
        }
    }
}

#[test]
fn test_singleton_is_rejected() {
    let result = load("Hermit\n");
    assert!(matches!(
        result,
        Err(RenderError::Tree(TreeError::Singleton { name })) if name == "Hermit"
    ));
}

#[test]
fn test_cycle_is_reported_with_its_path() {
    // C marries D and their child is A, who is also C's parent.
    let result = load("A + B\n c: C\nD + C\n c: A\n");
    match result {
        Err(RenderError::Tree(TreeError::Cycle { path })) => {
            assert_eq!(path.first(), path.last());
            assert!(path.contains(&"A + B".to_string()));
            assert!(path.contains(&"D + C".to_string()));
        }
        other => panic!("expected a cycle report, got {other:?}"),
    }
}

#[test]
fn test_partition_is_reported_with_sizes() {
    let result = load("A + B\n c: C\nX + Y\n c: Z\n");
    match result {
        Err(RenderError::Tree(TreeError::Disconnected { components })) => {
            assert_eq!(components.len(), 2);
            assert_eq!(components[0].size, 4);
            assert_eq!(components[1].size, 4);
        }
        other => panic!("expected a partition report, got {other:?}"),
    }
}

#[test]
fn test_depth_zero_from_leaf_root() {
    let family = load(SIMPSONS).expect("should load");
    let visible = visible_set(&family.graph, "Bart", Filter::depth(0));
    // Exactly the ancestor spine plus the other parent of each union on it.
    for name in [
        "Bart",
        "Homer + Marge",
        "Homer",
        "Marge",
        "Abe + Mona",
        "Abe",
        "Mona",
        "Clancy + Jackie",
        "Clancy",
        "Jackie",
    ] {
        assert!(visible.contains(name), "missing {name}");
    }
    assert!(!visible.contains("Lisa"));
    assert!(!visible.contains("Herb"));
    assert!(!visible.contains("Patty"));
}

#[test]
fn test_include_all_ignores_depth() {
    let family = load(SIMPSONS).expect("should load");
    let everyone = visible_set(&family.graph, "Bart", Filter::everyone());
    assert_eq!(everyone.len(), family.graph.len());
}

#[test]
fn test_render_end_to_end() {
    let svg = render(SIMPSONS, "Homer").expect("should render");
    assert!(svg.contains("<svg"));
    assert!(svg.contains(">Homer<"));
    assert!(svg.contains(">Bart<"));
    // The placeholder person displays as a bare question mark.
    let everyone = render_with_config(
        SIMPSONS,
        "Homer",
        RenderConfig::new().with_filter(Filter::everyone()),
    )
    .expect("should render");
    assert!(everyone.contains(">?<"));
}

#[test]
fn test_depth_filter_hides_the_rest() {
    let config = RenderConfig::new().with_filter(Filter::depth(0));
    let svg = render_with_config(SIMPSONS, "Bart", config).expect("should render");
    assert!(svg.contains(">Homer<"));
    assert!(!svg.contains(">Lisa<"));
}

#[test]
fn test_view_state_roundtrip_with_disambiguator() {
    let state = ViewState {
        root: "?#1".to_string(),
        filter: Filter::depth(3),
    };
    let token = viewstate::encode(&state);
    assert_eq!(viewstate::decode(&token), Ok(state));
}

#[test]
fn test_view_state_roundtrip_everyone() {
    let state = ViewState {
        root: "Homer".to_string(),
        filter: Filter::everyone(),
    };
    assert_eq!(viewstate::decode(&viewstate::encode(&state)), Ok(state));
}

#[test]
fn test_unknown_root_is_fatal() {
    let result = render(SIMPSONS, "Ned Flanders");
    match result {
        Err(RenderError::Layout(e)) => assert!(e.to_string().contains("Ned Flanders")),
        other => panic!("expected a layout error, got {other:?}"),
    }
}

#[test]
fn test_parse_error_carries_offender() {
    let result = load("Homer\n x: what\n");
    match result {
        Err(RenderError::Parse(e)) => assert!(e.to_string().contains("Homer")),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
