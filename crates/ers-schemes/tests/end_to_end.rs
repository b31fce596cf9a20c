//! End-to-end build/trapdoor/search/resolve scenarios across every scheme.
//!
//! Each test builds an encrypted index over a small plaintext multi-map and
//! checks the decrypted query result against what a plaintext range scan
//! would return, the way a real client/server round trip would be checked.

use std::collections::BTreeMap;

use ers_schemes::{
    DataDependentQuadSrc, DataDependentRangeBrc, Linear, LinearHilbert, QuadBrc, QuadSrc,
    RangeBrc, RangeBrcHilbert, Scheme, TdagSrc, TdagSrcHilbert,
};
use ers_types::{HyperRange, Point};

fn small_dataset() -> BTreeMap<Point, Vec<Vec<u8>>> {
    let mut plaintext = BTreeMap::new();
    plaintext.insert(Point::new(vec![1, 1]), vec![b"near-origin".to_vec()]);
    plaintext.insert(Point::new(vec![3, 5]), vec![b"inside".to_vec(), b"inside-2".to_vec()]);
    plaintext.insert(Point::new(vec![9, 2]), vec![b"also-inside".to_vec()]);
    plaintext.insert(Point::new(vec![14, 14]), vec![b"far-corner".to_vec()]);
    plaintext
}

fn domain() -> HyperRange {
    HyperRange::from_coords(vec![0, 0], vec![15, 15]).unwrap()
}

fn assert_finds_every_matching_value(resolved: &[Vec<u8>], expected: &[&[u8]]) {
    for &value in expected {
        assert!(resolved.iter().any(|v| v == value), "missing {value:?} in {resolved:?}");
    }
}

#[test]
fn linear_scan_finds_every_point_in_range() {
    let key = Linear::setup(256);
    let mut scheme = Linear::new(domain());
    scheme.build_index(&key, &small_dataset()).unwrap();

    let query = HyperRange::from_coords(vec![0, 0], vec![9, 9]).unwrap();
    let resolved = scheme.query(&key, &query).unwrap();
    assert_finds_every_matching_value(&resolved, &[b"near-origin", b"inside", b"inside-2", b"also-inside"]);
    assert!(!resolved.iter().any(|v| v == b"far-corner"));
}

#[test]
fn range_brc_never_misses_a_true_positive() {
    let key = RangeBrc::setup(256);
    let mut scheme = RangeBrc::new(domain(), 4).unwrap();
    scheme.build_index(&key, &small_dataset()).unwrap();

    let query = HyperRange::from_coords(vec![0, 0], vec![9, 9]).unwrap();
    let resolved = scheme.query(&key, &query).unwrap();
    assert_finds_every_matching_value(&resolved, &[b"near-origin", b"inside", b"also-inside"]);
}

#[test]
fn quad_brc_and_quad_src_agree_on_membership() {
    let query = HyperRange::from_coords(vec![0, 0], vec![9, 9]).unwrap();

    let brc_key = QuadBrc::setup(256);
    let mut brc = QuadBrc::new(domain(), 4).unwrap();
    brc.build_index(&brc_key, &small_dataset()).unwrap();
    let brc_resolved = brc.query(&brc_key, &query).unwrap();

    let src_key = QuadSrc::setup(256);
    let mut src = QuadSrc::new(domain(), 4).unwrap();
    src.build_index(&src_key, &small_dataset()).unwrap();
    let src_resolved = src.query(&src_key, &query).unwrap();

    // SRC may over-return (it's a superset cover); it must never under-return.
    for value in &brc_resolved {
        assert!(src_resolved.contains(value));
    }
}

#[test]
fn tdag_src_never_misses_a_true_positive() {
    let key = TdagSrc::setup(256);
    let mut scheme = TdagSrc::new(domain(), 4).unwrap();
    scheme.build_index(&key, &small_dataset()).unwrap();

    let query = HyperRange::from_coords(vec![0, 0], vec![9, 9]).unwrap();
    let resolved = scheme.query(&key, &query).unwrap();
    assert_finds_every_matching_value(&resolved, &[b"near-origin", b"inside", b"also-inside"]);
}

#[test]
fn data_dependent_schemes_still_find_every_true_positive() {
    let dataset = small_dataset();
    let points: Vec<Point> = dataset.keys().cloned().collect();
    let query = HyperRange::from_coords(vec![0, 0], vec![9, 9]).unwrap();

    let range_brc_key = DataDependentRangeBrc::setup(256);
    let mut range_brc = DataDependentRangeBrc::new(domain(), &points, 3).unwrap();
    range_brc.build_index(&range_brc_key, &dataset).unwrap();
    let resolved = range_brc.query(&range_brc_key, &query).unwrap();
    assert_finds_every_matching_value(&resolved, &[b"near-origin", b"inside", b"also-inside"]);

    let quad_src_key = DataDependentQuadSrc::setup(256);
    let mut quad_src = DataDependentQuadSrc::new(domain(), &points, 3).unwrap();
    quad_src.build_index(&quad_src_key, &dataset).unwrap();
    let resolved = quad_src.query(&quad_src_key, &query).unwrap();
    assert_finds_every_matching_value(&resolved, &[b"near-origin", b"inside", b"also-inside"]);
}

#[test]
fn hilbert_variants_agree_with_their_non_projected_counterparts() {
    let query = HyperRange::from_coords(vec![0, 0], vec![9, 9]).unwrap();

    let linear_key = LinearHilbert::setup(256);
    let mut linear = LinearHilbert::new(domain(), 4, 0).unwrap();
    linear.build_index(&linear_key, &small_dataset()).unwrap();
    let resolved = linear.query(&linear_key, &query).unwrap();
    assert_finds_every_matching_value(&resolved, &[b"near-origin", b"inside", b"also-inside"]);

    let range_brc_key = RangeBrcHilbert::setup(256);
    let mut range_brc = RangeBrcHilbert::new(domain(), 4, 4, 0).unwrap();
    range_brc.build_index(&range_brc_key, &small_dataset()).unwrap();
    let resolved = range_brc.query(&range_brc_key, &query).unwrap();
    assert_finds_every_matching_value(&resolved, &[b"near-origin", b"inside", b"also-inside"]);

    let tdag_src_key = TdagSrcHilbert::setup(256);
    let mut tdag_src = TdagSrcHilbert::new(domain(), 4, 4).unwrap();
    tdag_src.build_index(&tdag_src_key, &small_dataset()).unwrap();
    let resolved = tdag_src.query(&tdag_src_key, &query).unwrap();
    assert_finds_every_matching_value(&resolved, &[b"near-origin", b"inside", b"also-inside"]);
}

#[test]
fn a_query_outside_the_domain_is_rejected() {
    let key = RangeBrc::setup(256);
    let mut scheme = RangeBrc::new(domain(), 4).unwrap();
    scheme.build_index(&key, &small_dataset()).unwrap();

    let out_of_domain = HyperRange::from_coords(vec![0, 0], vec![99, 99]).unwrap();
    assert!(scheme.query(&key, &out_of_domain).is_err());
}

#[test]
fn ciphertexts_do_not_leak_the_plaintext_value() {
    let key = RangeBrc::setup(256);
    let mut scheme = RangeBrc::new(domain(), 4).unwrap();
    scheme.build_index(&key, &small_dataset()).unwrap();

    let query = HyperRange::from_coords(vec![0, 0], vec![15, 15]).unwrap();
    let tokens = scheme.trapdoor(&key, &query).unwrap();
    let ciphertexts = scheme.search(&tokens).unwrap();
    for ct in &ciphertexts {
        assert!(!ct.windows(b"near-origin".len()).any(|w| w == b"near-origin"));
    }
    let resolved = scheme.resolve(&key, &ciphertexts).unwrap();
    assert!(resolved.iter().any(|v| v == b"near-origin"));
}
