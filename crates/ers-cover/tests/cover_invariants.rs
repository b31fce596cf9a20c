//! Cover-tree invariants: BRC/SRC/URC must cover every point a plaintext
//! range scan would find, across dividers and random queries.

use ers_cover::{Divider, RangeCoverTree, RangeCoverTreeProduct};
use ers_types::{HyperRange, Point};
use proptest::prelude::*;

fn domain() -> HyperRange {
    HyperRange::from_coords(vec![0, 0], vec![15, 15]).unwrap()
}

fn brc_covers_every_point_in(tree: &RangeCoverTree, query: &HyperRange) -> bool {
    let cover = tree.brc(query);
    query.points().iter().all(|p| cover.iter().any(|node| node.contains_point(p)))
}

#[test]
fn uniform_brc_has_no_false_negatives_on_a_fixed_grid_of_queries() {
    let tree = RangeCoverTree::build(domain(), &Divider::uniform(2, 4)).unwrap();
    for lo in [0u64, 2, 5, 9] {
        for hi in [lo + 1, lo + 4, 15] {
            if hi > 15 {
                continue;
            }
            let query = HyperRange::from_coords(vec![lo, lo], vec![hi, hi]).unwrap();
            assert!(brc_covers_every_point_in(&tree, &query), "missed a point in {query:?}");
        }
    }
}

#[test]
fn src_always_contains_the_full_query() {
    let tree = RangeCoverTree::build(domain(), &Divider::uniform_mid_overlap(2, 4)).unwrap();
    let query = HyperRange::from_coords(vec![3, 3], vec![6, 9]).unwrap();
    let node = tree.src(&query).unwrap();
    assert!(node.contains_range(&query));
}

#[test]
fn urc_is_a_superset_of_the_brc() {
    let tree = RangeCoverTree::build(domain(), &Divider::uniform(2, 4)).unwrap();
    let query = HyperRange::from_coords(vec![2, 2], vec![10, 6]).unwrap();
    let brc = tree.brc(&query);
    let urc = tree.urc(&query);
    for node in &brc {
        assert!(urc.contains(node));
    }
    assert!(urc.len() >= brc.len());
}

#[test]
fn product_descend_path_contains_a_unit_leaf_around_the_point() {
    let product = RangeCoverTreeProduct::build_uniform(&domain(), 4).unwrap();
    let point = Point::new(vec![5, 11]);
    let path = product.descend(&point);
    assert!(path.iter().any(|r| r.volume() == 1 && r.contains_point(&point)));
}

#[test]
fn data_dependent_divider_never_loses_a_dataset_point() {
    let dataset: Vec<Point> = (0..20).map(|i| Point::new(vec![i % 16, (i * 3) % 16])).collect();
    let divider = Divider::data_dependent(&dataset, 4);
    let tree = RangeCoverTree::build(domain(), &divider).unwrap();
    for p in &dataset {
        let path = tree.descend(p);
        assert!(path.last().unwrap().contains_point(p));
    }
}

proptest! {
    #[test]
    fn brc_never_misses_a_true_positive_for_random_queries(
        x0 in 0u64..16, y0 in 0u64..16, x1 in 0u64..16, y1 in 0u64..16,
    ) {
        let tree = RangeCoverTree::build(domain(), &Divider::uniform(2, 4)).unwrap();
        let query = HyperRange::from_coords(
            vec![x0.min(x1), y0.min(y1)],
            vec![x0.max(x1), y0.max(y1)],
        ).unwrap();
        prop_assert!(brc_covers_every_point_in(&tree, &query));
    }

    #[test]
    fn src_node_always_contains_its_query(
        x0 in 0u64..16, y0 in 0u64..16, x1 in 0u64..16, y1 in 0u64..16,
    ) {
        let tree = RangeCoverTree::build(domain(), &Divider::uniform_mid_overlap(2, 3)).unwrap();
        let query = HyperRange::from_coords(
            vec![x0.min(x1), y0.min(y1)],
            vec![x0.max(x1), y0.max(y1)],
        ).unwrap();
        prop_assert!(tree.src(&query).unwrap().contains_range(&query));
    }
}
