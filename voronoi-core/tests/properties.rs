//! Property tests for diagram state bookkeeping.

use proptest::prelude::*;
use voronoi_core::{
    ClipEngine, DiagramState, Edge, GeometryEngine, Position, RecordingSurface, RenderGeometry,
};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;

fn site_strategy() -> impl Strategy<Value = Position> {
    // integer grid keeps duplicates likely enough to exercise the guard
    (-40i32..40, -30i32..30).prop_map(|(x, y)| Position::new(x as f64 * 10.0, y as f64 * 10.0))
}

fn distinct(sites: Vec<Position>) -> Vec<Position> {
    let mut out: Vec<Position> = Vec::new();
    for p in sites {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

#[derive(Clone, Debug)]
enum Op {
    Add(Position),
    Resize(u32, u32),
    Render,
}

/// Distinct sites paired with an arbitrary reordering of them.
fn permuted_sites() -> impl Strategy<Value = (Vec<Position>, Vec<Position>)> {
    prop::collection::vec(site_strategy(), 0..20)
        .prop_map(distinct)
        .prop_flat_map(|sites| (Just(sites.clone()), Just(sites).prop_shuffle()))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        site_strategy().prop_map(Op::Add),
        (100u32..1200, 100u32..1200).prop_map(|(w, h)| Op::Resize(w, h)),
        Just(Op::Render),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn adding_existing_site_is_noop(
        sites in prop::collection::vec(site_strategy(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let sites = distinct(sites);
        let existing = sites[pick.index(sites.len())];
        let mut state = DiagramState::new(WIDTH, HEIGHT, sites.clone(), ClipEngine).unwrap();

        prop_assert!(!state.add_point(existing));
        prop_assert_eq!(state.sites(), sites.as_slice());
        prop_assert!(!state.is_dirty());
    }

    #[test]
    fn permutation_does_not_dirty((sites, shuffled) in permuted_sites()) {
        let mut state = DiagramState::new(WIDTH, HEIGHT, sites.clone(), ClipEngine).unwrap();
        let before = state.geometry().clone();

        prop_assert!(!state.set_sites(shuffled));
        prop_assert!(!state.is_dirty());
        prop_assert_eq!(state.geometry(), &before);
    }

    #[test]
    fn render_matches_fresh_computation(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let initial = vec![
            Position::new(0.0, 0.0),
            Position::new(100.0, 0.0),
            Position::new(0.0, 100.0),
        ];
        let mut state = DiagramState::new(WIDTH, HEIGHT, initial, ClipEngine).unwrap();
        let mut surface = RecordingSurface::new();

        for op in ops {
            match op {
                Op::Add(p) => {
                    let had = state.sites().contains(&p);
                    let was_dirty = state.is_dirty();
                    prop_assert_eq!(state.add_point(p), !had);
                    prop_assert_eq!(state.is_dirty(), was_dirty || !had);
                }
                Op::Resize(w, h) => {
                    let vp = state.viewport();
                    let same = vp.width == w as f64 && vp.height == h as f64;
                    let was_dirty = state.is_dirty();
                    state.set_dimensions(w as f64, h as f64);
                    prop_assert_eq!(state.is_dirty(), was_dirty || !same);
                }
                Op::Render => {
                    surface.clear();
                    state.render(&mut surface).unwrap();
                    prop_assert!(!state.is_dirty());

                    let vp = state.viewport();
                    let diagram = ClipEngine
                        .compute(state.sites(), &vp.bounding_box(), true)
                        .unwrap();
                    let expected = RenderGeometry::from_diagram(&diagram);
                    prop_assert_eq!(state.geometry(), &expected);
                    prop_assert_eq!(surface.points.len(), diagram.cells.len());
                    prop_assert_eq!(surface.lines.len(), 2 * diagram.edges.len());
                }
            }
        }
    }

    #[test]
    fn same_dimensions_is_noop(w in 1u32..2000, h in 1u32..2000) {
        let mut state = DiagramState::new(w as f64, h as f64, vec![], ClipEngine).unwrap();
        prop_assert!(!state.set_dimensions(w as f64, h as f64));
        prop_assert!(!state.is_dirty());
    }
}

#[test]
fn empty_input_renders_nothing() {
    let mut state = DiagramState::new(WIDTH, HEIGHT, vec![], ClipEngine).unwrap();
    let mut surface = RecordingSurface::new();
    state.render(&mut surface).unwrap();
    assert!(state.geometry().points.is_empty());
    assert!(state.geometry().lines.is_empty());
    assert_eq!(surface.draw_calls, 0);
}

fn three_site_scenario<E: GeometryEngine>(engine: E) {
    let sites = vec![Position::new(0.0, 0.0), Position::new(100.0, 0.0), Position::new(0.0, 100.0)];
    let mut state = DiagramState::new(WIDTH, HEIGHT, sites.clone(), engine).unwrap();
    let mut surface = RecordingSurface::new();
    state.render(&mut surface).unwrap();

    let geometry = state.geometry();
    assert_eq!(geometry.points.len(), 3);
    for site in &sites {
        assert!(geometry.points.contains(&[site.x as f32, site.y as f32, 0.0]));
    }
    assert!(!geometry.lines.is_empty());
    assert_eq!(geometry.lines.len() % 2, 0);
    assert_eq!(surface.lines, geometry.lines);
}

#[test]
fn three_site_scenario_clip() {
    three_site_scenario(ClipEngine);

    let sites = [Position::new(0.0, 0.0), Position::new(100.0, 0.0), Position::new(0.0, 100.0)];
    let bbox = voronoi_core::Viewport::new(WIDTH, HEIGHT).bounding_box();
    let diagram = ClipEngine.compute(&sites, &bbox, true).unwrap();
    // three bisectors meet at (50, 50)
    let shared: Vec<&Edge> = diagram.edges.iter().filter(|e| !e.is_border()).collect();
    assert_eq!(shared.len(), 3);
    for edge in shared {
        let touches_center = [edge.a, edge.b]
            .iter()
            .any(|p| (p.x - 50.0).abs() < 1e-9 && (p.y - 50.0).abs() < 1e-9);
        assert!(touches_center, "{:?}", edge);
    }
}

#[cfg(feature = "voronator")]
mod voronator {
    use super::*;
    use voronoi_core::{random_sites, Viewport, VoronatorEngine};

    fn on_box_side(edge: &Edge, bbox: &voronoi_core::BoundingBox) -> bool {
        let near = |u: f64, v: f64| (u - v).abs() <= 1e-6;
        let (a, b) = (edge.a, edge.b);
        (near(a.x, bbox.xmin) && near(b.x, bbox.xmin))
            || (near(a.x, bbox.xmax) && near(b.x, bbox.xmax))
            || (near(a.y, bbox.ymin) && near(b.y, bbox.ymin))
            || (near(a.y, bbox.ymax) && near(b.y, bbox.ymax))
    }

    fn elongated() -> impl Strategy<Value = (f64, f64)> {
        (100u32..300, 600u32..1400).prop_flat_map(|(short, long)| {
            prop_oneof![Just((long as f64, short as f64)), Just((short as f64, long as f64))]
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn cells_tile_elongated_viewports(
            n in 3usize..10,
            (w, h) in elongated(),
            seed in any::<u64>(),
        ) {
            let bbox = Viewport::new(w, h).bounding_box();
            let sites = random_sites(n, w, h, seed);
            let diagram = VoronatorEngine::new().compute(&sites, &bbox, true).unwrap();

            prop_assert_eq!(diagram.cells.len(), n);
            let box_area = bbox.area();
            prop_assert!(
                (diagram.area() - box_area).abs() <= 1e-6 * box_area,
                "cell area {} vs box area {}", diagram.area(), box_area
            );
            for edge in &diagram.edges {
                prop_assert!(edge.right.is_some() || on_box_side(edge, &bbox), "{:?}", edge);
            }
        }
    }
}

#[cfg(feature = "voronator")]
#[test]
fn three_site_scenario_voronator() {
    three_site_scenario(voronoi_core::VoronatorEngine::new());
}
