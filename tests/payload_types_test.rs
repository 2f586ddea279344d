use std::collections::HashSet;

use kdarena::axes::{array_axes, AxisAccessor};
use kdarena::distance::{FnMetric, SquaredEuclidean};
use kdarena::distance_metric::DistanceMetric;
use kdarena::{ItemId, KdTree};

#[derive(Clone, Debug, PartialEq)]
struct Named {
    name: String,
    x: f64,
    y: f64,
}

impl Named {
    fn new(name: &str, x: f64, y: f64) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
        }
    }
}

struct PlanarEuclidean;

impl DistanceMetric<Named, f64> for PlanarEuclidean {
    fn dist(&self, a: &Named, b: &Named) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    fn dist1(&self, a: f64, b: f64) -> f64 {
        (a - b).abs()
    }
}

fn named_axes() -> Vec<AxisAccessor<Named, f64>> {
    vec![
        AxisAccessor::new("x", |p: &Named| p.x),
        AxisAccessor::new("y", |p: &Named| p.y),
    ]
}

fn probe(x: f64, y: f64) -> Named {
    Named::new("probe", x, y)
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing() {}

#[test]
fn test_kdtree_with_named_points() {
    init_tracing();

    let points = vec![
        Named::new("a", 2.0, 3.0),
        Named::new("b", 5.0, 4.0),
        Named::new("c", 9.0, 6.0),
        Named::new("d", 4.0, 7.0),
        Named::new("e", 8.0, 1.0),
        Named::new("f", 7.0, 2.0),
    ];
    let tree = KdTree::build(points, named_axes(), PlanarEuclidean).unwrap();

    // Test nearest neighbor query
    let nearest = tree.nearest_n(&probe(9.0, 2.0), 1, None);
    assert_eq!(nearest.len(), 1);
    assert_eq!(nearest[0].payload.name, "e");
    assert!((nearest[0].distance - 2f64.sqrt()).abs() < f64::EPSILON);

    // Test k-nearest neighbors
    let k_nearest = tree.nearest_n(&probe(9.0, 2.0), 3, None);
    let names: Vec<&str> = k_nearest.iter().map(|n| n.payload.name.as_str()).collect();
    assert_eq!(names, vec!["e", "f", "c"]);

    // Test within radius
    let within = tree.nearest_n(&probe(9.0, 2.0), 6, Some(2.5));
    let names: HashSet<&str> = within.iter().map(|n| n.payload.name.as_str()).collect();
    assert_eq!(names, HashSet::from(["e", "f"]));

    let balance = tree.balance_factor();
    assert!((1.0..=3.0).contains(&balance));
}

#[test]
fn test_kdtree_with_closure_metric_and_mutation() {
    init_tracing();

    let metric = FnMetric::new(
        |a: &Named, b: &Named| (a.x - b.x).abs() + (a.y - b.y).abs(),
        |a: f64, b: f64| (a - b).abs(),
    );
    let mut tree = KdTree::new(named_axes(), metric).unwrap();

    let origin = tree.insert(Named::new("origin", 0.0, 0.0)).unwrap();
    let a = tree.insert(Named::new("A", 1.0, 1.0)).unwrap();
    let b = tree.insert(Named::new("B", 2.0, 2.0)).unwrap();
    let c = tree.insert(Named::new("C", -1.0, -1.0)).unwrap();
    assert_eq!(tree.size(), 4);

    let nearest = tree.nearest_one(&probe(0.5, 0.25)).unwrap();
    assert_eq!(nearest.item, origin);
    assert_eq!(nearest.distance, 0.75);

    // deleting by a copy with the right identity works; the wrong identity does nothing
    assert!(!tree.remove(&Named::new("origin", 0.0, 0.0), b));
    assert!(tree.remove(&Named::new("origin", 0.0, 0.0), origin));
    assert_eq!(tree.size(), 3);

    let nearest = tree.nearest_one(&probe(0.5, 0.25)).unwrap();
    assert_eq!(nearest.item, a);

    let remaining: HashSet<ItemId> = tree.iter().map(|(item, _)| item).collect();
    assert_eq!(remaining, HashSet::from([a, b, c]));
}

#[test]
fn test_kdtree_of_arrays_survives_churn() {
    init_tracing();

    let mut tree = KdTree::new(array_axes::<f64, 2>(), SquaredEuclidean).unwrap();
    let mut live: Vec<([f64; 2], ItemId)> = vec![];

    for i in 0..200 {
        let point = [((i * 37) % 101) as f64, ((i * 53) % 97) as f64];
        live.push((point, tree.insert(point).unwrap()));
        if i % 4 == 3 {
            let (point, item) = live.remove(i % live.len());
            assert!(tree.remove(&point, item));
        }
    }

    assert_eq!(tree.size(), live.len());

    let query = [50.0, 50.0];
    let mut expected: Vec<f64> = live
        .iter()
        .map(|(p, _)| SquaredEuclidean.dist(&query, p))
        .collect();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    expected.truncate(5);

    let actual: Vec<f64> = tree.nearest_n(&query, 5, None).iter().map(|n| n.distance).collect();
    assert_eq!(actual, expected);
}
