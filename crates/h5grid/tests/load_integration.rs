use std::path::Path;

use h5grid::prelude::*;
use h5grid::CataloguedDataset;
use h5grid::types::{ContainerError, ExtractionError, ExtractionWarning, TraversalError};
use h5grid_test_utils::fixtures::{nested_square_grid, square_grid, write_reference_datasets};
use h5grid_test_utils::{ContainerBuilder, MemoryBackend};

const FILE: &str = "squaregrid.hdf";

fn backend_with(c: &h5grid_test_utils::MemoryContainer) -> MemoryBackend {
    MemoryBackend::new().with_file(FILE, c.clone())
}

#[test]
fn nested_grid_loads_in_both_source_modes() {
    for source in [SourceGroup::Recorded, SourceGroup::LastEntered] {
        let c = nested_square_grid(3);
        let config = LoadConfig {
            source,
            ..LoadConfig::default()
        };
        let loaded = Loader::new(config)
            .run(&backend_with(&c), Path::new(FILE))
            .unwrap();
        assert!(loaded.result.is_complete(), "{source:?}");
        assert_eq!(loaded.walk.loops.len(), 1);
        assert_eq!(loaded.walk.loops[0].path, "/simulation/grid/parent");
        assert!(loaded.failures.is_empty());
        assert_eq!(c.closes(), 1);
    }
}

#[test]
fn missing_file_is_an_open_failure() {
    let err = Loader::default()
        .run(&MemoryBackend::new(), Path::new("nowhere.hdf"))
        .unwrap_err();
    match err {
        LoadError::ContainerOpenFailed { path, source } => {
            assert_eq!(path, Path::new("nowhere.hdf"));
            assert!(matches!(source, ContainerError::NotFound { .. }));
        }
        other => panic!("expected ContainerOpenFailed, got {other:?}"),
    }
}

#[test]
fn traversal_failure_closes_and_reports_partial_catalog() {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    b.dataset_i32(root, "dim", [1, 1], vec![2]);
    b.group(root, "bad");
    b.dataset_i32(root, "mask", [1, 1], vec![0]);
    let c = b.finish().fail_object_info_on("bad");

    let err = Loader::default()
        .run(&backend_with(&c), Path::new(FILE))
        .unwrap_err();
    match err {
        LoadError::Traversal { source, partial } => {
            assert!(matches!(
                source,
                TraversalError::TraversalFailed { ref path, .. } if path == "/bad"
            ));
            assert_eq!(
                partial,
                vec![CataloguedDataset {
                    index: 0,
                    name: "dim".into(),
                    group_path: "/".into(),
                }]
            );
        }
        other => panic!("expected Traversal, got {other:?}"),
    }
    assert_eq!(c.closes(), 1);
    assert_eq!(c.counts().reads, 0);
}

#[test]
fn catalog_overflow_surfaces_as_traversal_error() {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    write_reference_datasets(&mut b, root, 2);
    b.dataset_i32(root, "extra", [1], vec![0]);
    let c = b.finish();

    let err = Loader::default()
        .run(&backend_with(&c), Path::new(FILE))
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Traversal {
            source: TraversalError::CatalogOverflow { capacity: 5, .. },
            ..
        }
    ));
    assert_eq!(c.closes(), 1);
}

#[test]
fn larger_capacity_reads_unrecognized_datasets_once() {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    write_reference_datasets(&mut b, root, 2);
    b.dataset_i32(root, "extra", [1], vec![0]);
    let c = b.finish();

    let config = LoadConfig {
        catalog_capacity: Some(8),
        ..LoadConfig::default()
    };
    let loaded = Loader::new(config)
        .run(&backend_with(&c), Path::new(FILE))
        .unwrap();
    assert!(loaded.result.is_complete());
    assert_eq!(
        loaded.warnings,
        vec![ExtractionWarning::UnrecognizedDataset {
            name: "extra".into()
        }]
    );
    assert_eq!(c.reads_of("extra"), 1);
    assert_eq!(c.counts().reads, 6);
}

#[test]
fn structural_extraction_error_closes_container() {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    b.dataset_f64(root, "xy", [2, 2, 2], vec![0.0; 8]);
    let c = b.finish();

    let err = Loader::default()
        .run(&backend_with(&c), Path::new(FILE))
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Extraction {
            source: ExtractionError::UnsupportedElementType { .. },
            ..
        }
    ));
    assert_eq!(c.closes(), 1);
}

#[test]
fn structural_abort_reports_failures_collected_before_it() {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    b.dataset_i32(root, "dim", [1, 1], vec![2]);
    let g = b.group(root, "g");
    b.dataset_i32(g, "domain_box", [2, 3], vec![0; 6]);
    let c = b.finish();

    let config = LoadConfig {
        source: SourceGroup::LastEntered,
        ..LoadConfig::default()
    };
    let err = Loader::new(config)
        .run(&backend_with(&c), Path::new(FILE))
        .unwrap_err();
    match err {
        LoadError::Extraction {
            source,
            warnings,
            failures,
        } => {
            assert!(matches!(
                source,
                ExtractionError::NonSquareGridUnsupported { ref name, .. } if name == "domain_box"
            ));
            assert!(warnings.is_empty());
            assert_eq!(
                failures,
                vec![ExtractionError::DatasetNotFound { name: "dim".into() }]
            );
        }
        other => panic!("expected Extraction, got {other:?}"),
    }
    assert_eq!(c.closes(), 1);
}

#[test]
fn rectangular_policy_loads_non_square_grid() {
    let mut b = ContainerBuilder::new();
    let root = b.root();
    b.dataset_i32(root, "domain_box", [2, 3], vec![0, 1, 2, 3, 4, 5]);
    let c = b.finish();

    let err = Loader::default()
        .run(&backend_with(&c), Path::new(FILE))
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Extraction {
            source: ExtractionError::NonSquareGridUnsupported { .. },
            ..
        }
    ));

    let config = LoadConfig {
        grid: GridPolicy::Rectangular,
        ..LoadConfig::default()
    };
    let loaded = Loader::new(config)
        .run(&backend_with(&c), Path::new(FILE))
        .unwrap();
    let g = loaded.result.domain_box.unwrap();
    assert_eq!((g.rows(), g.cols()), (2, 3));
    assert_eq!(g[1], [3, 4, 5]);
    assert_eq!(c.closes(), 2);
}

#[test]
fn outline_renders_nested_fixture() {
    let c = nested_square_grid(2);
    let loaded = Loader::default()
        .run(&backend_with(&c), Path::new(FILE))
        .unwrap();
    let text = loaded.walk.outline().to_string();
    let expected = "\
/ {
  Group: simulation {
    Group: grid {
      Dataset: dim
      Dataset: domain_box
      Dataset: interior_box
      Dataset: mask
      Dataset: xy
      Group: parent {
        Warning: Loop detected!
      }
    }
  }
}
";
    assert_eq!(text, expected);
}

#[test]
fn flat_fixture_extracts_reference_values() {
    let c = square_grid(5);
    let loaded = Loader::default()
        .run(&backend_with(&c), Path::new(FILE))
        .unwrap();
    let r = loaded.result;
    assert_eq!(r.dimension_count, Some(ScalarInt { value: 2 }));
    assert_eq!(r.domain_box.as_ref().map(|g| g[4][4]), Some(1));
    assert_eq!(r.domain_box.as_ref().map(|g| g[4][3]), Some(0));
    assert_eq!(r.xy.as_ref().map(|g| g[(4, 2)].to_vec()), Some(vec![4.0, 2.0]));
}
