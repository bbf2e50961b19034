#![cfg(feature = "hdf5")]

use std::path::Path;

use h5grid::prelude::*;
use h5grid::types::{ExtractionError, TraversalError};
use h5grid::{load, Hdf5Backend};

fn write_reference(group: &hdf5::Group, n: usize) -> hdf5::Result<()> {
    group
        .new_dataset::<i32>()
        .shape([1, 1])
        .create("dim")?
        .write_raw(&[2])?;
    let identity: Vec<i32> = (0..n * n).map(|k| i32::from(k / n == k % n)).collect();
    group
        .new_dataset::<i32>()
        .shape([n, n])
        .create("domain_box")?
        .write_raw(&identity)?;
    group
        .new_dataset::<i32>()
        .shape([n, n])
        .create("interior_box")?
        .write_raw(&vec![1; n * n])?;
    group
        .new_dataset::<i32>()
        .shape([n, n])
        .create("mask")?
        .write_raw(&vec![0; n * n])?;
    let xy: Vec<f32> = (0..n)
        .flat_map(|i| (0..n).flat_map(move |j| [i as f32, j as f32]))
        .collect();
    group
        .new_dataset::<f32>()
        .shape([n, n, 2])
        .create("xy")?
        .write_raw(&xy)?;
    Ok(())
}

fn nested_file(path: &Path, n: usize) -> hdf5::Result<()> {
    let file = hdf5::File::create(path)?;
    let grid = file.create_group("simulation")?.create_group("grid")?;
    write_reference(&grid, n)?;
    grid.link_soft("/simulation", "parent")?;
    file.close()
}

#[test]
fn nested_file_with_soft_link_loop_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("squaregrid.hdf");
    nested_file(&path, 3).unwrap();

    let loaded = load(&path).unwrap();
    assert!(loaded.result.is_complete());
    assert_eq!(loaded.walk.loops.len(), 1);
    assert_eq!(loaded.walk.loops[0].path, "/simulation/grid/parent");
    let xy = loaded.result.xy.unwrap();
    assert_eq!(xy[(2, 1)], [2.0, 1.0]);
    assert_eq!(loaded.result.domain_box.unwrap().get(1, 1), Some(1));
}

#[test]
fn last_entered_mode_matches_recorded_for_single_group() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("squaregrid.hdf");
    nested_file(&path, 4).unwrap();

    let recorded = load(&path).unwrap();
    let config = LoadConfig {
        source: SourceGroup::LastEntered,
        ..LoadConfig::default()
    };
    let last = Loader::new(config).run(&Hdf5Backend, &path).unwrap();
    assert_eq!(recorded.result, last.result);
}

#[test]
fn hard_link_to_ancestor_terminates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hard.hdf");
    {
        let file = hdf5::File::create(&path).unwrap();
        let a = file.create_group("a").unwrap();
        a.link_hard("/", "root_again").unwrap();
        write_reference(&a, 2).unwrap();
        file.close().unwrap();
    }
    let loaded = load(&path).unwrap();
    assert_eq!(loaded.walk.loops.len(), 1);
    assert!(loaded.result.is_complete());
}

#[test]
fn f64_dataset_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f64.hdf");
    {
        let file = hdf5::File::create(&path).unwrap();
        file.new_dataset::<f64>()
            .shape([2, 2, 2])
            .create("xy")
            .unwrap()
            .write_raw(&[0.0f64; 8])
            .unwrap();
        file.close().unwrap();
    }
    let err = load(&path).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Extraction {
            source: ExtractionError::UnsupportedElementType { .. },
            ..
        }
    ));
}

#[test]
fn too_many_datasets_overflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("six.hdf");
    {
        let file = hdf5::File::create(&path).unwrap();
        for i in 0..6 {
            file.new_dataset::<i32>()
                .shape([1])
                .create(format!("d{i}").as_str())
                .unwrap();
        }
        file.close().unwrap();
    }
    let err = load(&path).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Traversal {
            source: TraversalError::CatalogOverflow { capacity: 5, .. },
            ..
        }
    ));
}

#[test]
fn missing_file_fails_to_open() {
    let err = load("/definitely/not/here.hdf").unwrap_err();
    assert!(matches!(err, LoadError::ContainerOpenFailed { .. }));
}
