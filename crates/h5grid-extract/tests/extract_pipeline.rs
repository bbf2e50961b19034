use h5grid_core::ExtractionError;
use h5grid_extract::{ArrayExtractor, ExpectedSchema, GridPolicy, SourceResolution};
use h5grid_test_utils::fixtures::{nested_square_grid, square_grid};
use h5grid_test_utils::ContainerBuilder;
use h5grid_walk::{DatasetCatalog, PathWalker};
use proptest::prelude::*;

#[test]
fn nested_grid_extracts_from_last_entered_group() {
    let c = nested_square_grid(3);
    let mut catalog = DatasetCatalog::with_capacity(5);
    let walk = PathWalker::new().traverse(&c, &mut catalog).unwrap();
    assert_eq!(walk.loops.len(), 1);

    let extractor = ArrayExtractor::new(ExpectedSchema::reference(), GridPolicy::SquareOnly);
    let fixed = extractor
        .extract(&c, &catalog, SourceResolution::Fixed(&walk.last_group))
        .unwrap();
    let per_entry = extractor
        .extract(&c, &catalog, SourceResolution::PerEntry)
        .unwrap();
    assert!(fixed.result.is_complete());
    assert_eq!(fixed.result, per_entry.result);
}

#[test]
fn last_entered_misses_datasets_outside_that_group() {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    b.dataset_i32(root, "dim", [1, 1], vec![2]);
    let g = b.group(root, "empty");
    let c = b.finish();

    let mut catalog = DatasetCatalog::with_capacity(5);
    let walk = PathWalker::new().traverse(&c, &mut catalog).unwrap();
    assert_eq!(walk.last_group, g);

    let extractor = ArrayExtractor::default();
    let fixed = extractor
        .extract(&c, &catalog, SourceResolution::Fixed(&walk.last_group))
        .unwrap();
    assert_eq!(
        fixed.failures,
        vec![ExtractionError::DatasetNotFound { name: "dim".into() }]
    );

    let per_entry = extractor
        .extract(&c, &catalog, SourceResolution::PerEntry)
        .unwrap();
    assert!(per_entry.failures.is_empty());
    assert_eq!(per_entry.result.dimension_count.map(|d| d.value), Some(2));
}

#[test]
fn empty_schema_reads_every_entry_and_keeps_none() {
    let c = square_grid(2);
    let mut catalog = DatasetCatalog::with_capacity(5);
    PathWalker::new().traverse(&c, &mut catalog).unwrap();
    let out = ArrayExtractor::new(ExpectedSchema::new(), GridPolicy::SquareOnly)
        .extract(&c, &catalog, SourceResolution::PerEntry)
        .unwrap();
    assert_eq!(out.warnings.len(), 5);
    assert_eq!(out.result, h5grid_core::ExtractionResult::default());
    assert_eq!(c.counts().reads, 5);
}

proptest! {
    #[test]
    fn reference_grid_values_survive_extraction(n in 1usize..12) {
        let c = square_grid(n);
        let mut catalog = DatasetCatalog::with_capacity(5);
        PathWalker::new().traverse(&c, &mut catalog).unwrap();
        let out = ArrayExtractor::new(ExpectedSchema::reference(), GridPolicy::SquareOnly)
            .extract(&c, &catalog, SourceResolution::PerEntry)
            .unwrap();

        let domain = out.result.domain_box.unwrap();
        let xy = out.result.xy.unwrap();
        prop_assert_eq!((domain.rows(), domain.cols()), (n, n));
        for i in 0..n {
            for j in 0..n {
                prop_assert_eq!(domain.get(i, j), Some(i32::from(i == j)));
                prop_assert_eq!(&xy[(i, j)], &[i as f32, j as f32][..]);
            }
        }
    }

    #[test]
    fn rectangular_grids_keep_axis_sizes(rows in 1usize..6, cols in 1usize..6) {
        let mut b = ContainerBuilder::new();
        let root = b.root();
        let data: Vec<i32> = (0..(rows * cols) as i32).collect();
        b.dataset_i32(root, "mask", [rows, cols], data);
        let c = b.finish();
        let mut catalog = DatasetCatalog::with_capacity(1);
        PathWalker::new().traverse(&c, &mut catalog).unwrap();

        let out = ArrayExtractor::new(ExpectedSchema::reference(), GridPolicy::Rectangular)
            .extract(&c, &catalog, SourceResolution::PerEntry)
            .unwrap();
        let mask = out.result.mask.unwrap();
        prop_assert_eq!((mask.rows(), mask.cols()), (rows, cols));
        for r in 0..rows {
            for k in 0..cols {
                prop_assert_eq!(mask.get(r, k), Some((r * cols + k) as i32));
            }
        }

        let square = ArrayExtractor::new(ExpectedSchema::reference(), GridPolicy::SquareOnly)
            .extract(&c, &catalog, SourceResolution::PerEntry);
        prop_assert_eq!(square.is_ok(), rows == cols);
    }
}
