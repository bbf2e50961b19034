//! Shape validation and flat-buffer reshaping.

use h5grid_core::{
    ElementBuffer, ExtractionError, FloatGrid3D, IntGrid2D, ScalarInt, Shape, TypedArray,
};

use crate::schema::ReshapeRule;

/// Which grid shapes extraction accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GridPolicy {
    /// The two leading axes of every grid must be equal.
    #[default]
    SquareOnly,
    /// Leading axes may differ; each is addressed with its own stride.
    Rectangular,
}

/// Validate a described shape against `rule` before anything is read.
pub fn check_shape(
    name: &str,
    rule: &ReshapeRule,
    shape: &Shape,
    policy: GridPolicy,
) -> Result<(), ExtractionError> {
    check_rank(name, rule, shape)?;
    match rule {
        ReshapeRule::Scalar => {
            if shape.element_count() == Some(0) {
                return Err(ExtractionError::EmptyDataset {
                    name: name.to_string(),
                });
            }
        }
        ReshapeRule::IntGrid2D => check_leading_axes(name, shape, policy)?,
        ReshapeRule::FloatGrid3D { inner } => {
            check_leading_axes(name, shape, policy)?;
            let found = shape.dims()[2];
            if found != *inner {
                return Err(ExtractionError::InnerAxisMismatch {
                    name: name.to_string(),
                    expected: *inner,
                    found,
                });
            }
        }
    }
    Ok(())
}

fn check_rank(name: &str, rule: &ReshapeRule, shape: &Shape) -> Result<(), ExtractionError> {
    match rule.rank() {
        Some(rank) if shape.rank() != rank => Err(ExtractionError::RankMismatch {
            name: name.to_string(),
            expected: rank,
            found: shape.clone(),
        }),
        _ => Ok(()),
    }
}

fn check_leading_axes(
    name: &str,
    shape: &Shape,
    policy: GridPolicy,
) -> Result<(), ExtractionError> {
    let dims = shape.dims();
    if policy == GridPolicy::SquareOnly && dims[0] != dims[1] {
        return Err(ExtractionError::NonSquareGridUnsupported {
            name: name.to_string(),
            shape: shape.clone(),
        });
    }
    Ok(())
}

/// Turn a flat buffer read from a dataset of `shape` into a typed array.
///
/// Only the rank and element count are checked here; run [`check_shape`]
/// first for the grid policy and inner axis.
pub fn reshape(
    name: &str,
    rule: &ReshapeRule,
    shape: &Shape,
    buffer: ElementBuffer,
) -> Result<TypedArray, ExtractionError> {
    check_rank(name, rule, shape)?;
    let expected = shape.element_count().unwrap_or(usize::MAX);
    let actual = buffer.len();
    if actual != expected {
        return Err(count_mismatch(name, expected, actual));
    }
    let dims = shape.dims();
    let array = match (rule, buffer) {
        (ReshapeRule::Scalar, ElementBuffer::Int32(data)) => {
            let value = *data.first().ok_or_else(|| ExtractionError::EmptyDataset {
                name: name.to_string(),
            })?;
            TypedArray::Scalar(ScalarInt { value })
        }
        (ReshapeRule::IntGrid2D, ElementBuffer::Int32(data)) => {
            IntGrid2D::from_row_major(dims[0], dims[1], data)
                .map(TypedArray::Int2)
                .ok_or_else(|| count_mismatch(name, expected, actual))?
        }
        (ReshapeRule::FloatGrid3D { .. }, ElementBuffer::Float32(data)) => {
            FloatGrid3D::from_row_major([dims[0], dims[1], dims[2]], data)
                .map(TypedArray::Float3)
                .ok_or_else(|| count_mismatch(name, expected, actual))?
        }
        (rule, buffer) => {
            return Err(ExtractionError::UnsupportedElementType {
                name: name.to_string(),
                expected: Some(rule.element_type()),
                found: buffer.element_type(),
            })
        }
    };
    Ok(array)
}

fn count_mismatch(name: &str, expected: usize, actual: usize) -> ExtractionError {
    ExtractionError::ElementCountMismatch {
        name: name.to_string(),
        expected,
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5grid_core::ElementType;

    const XY: ReshapeRule = ReshapeRule::FloatGrid3D { inner: 2 };

    #[test]
    fn square_only_rejects_rectangular_grids() {
        let shape = Shape::from([3, 4]);
        let err = check_shape("mask", &ReshapeRule::IntGrid2D, &shape, GridPolicy::SquareOnly)
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NonSquareGridUnsupported { .. }));
        assert!(
            check_shape("mask", &ReshapeRule::IntGrid2D, &shape, GridPolicy::Rectangular).is_ok()
        );
    }

    #[test]
    fn rank_is_checked_before_squareness() {
        let err = check_shape(
            "xy",
            &XY,
            &Shape::from([3, 3]),
            GridPolicy::SquareOnly,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExtractionError::RankMismatch {
                name: "xy".into(),
                expected: 3,
                found: Shape::from([3, 3]),
            }
        );
    }

    #[test]
    fn inner_axis_must_match() {
        let err = check_shape("xy", &XY, &Shape::from([2, 2, 3]), GridPolicy::SquareOnly)
            .unwrap_err();
        assert_eq!(
            err,
            ExtractionError::InnerAxisMismatch {
                name: "xy".into(),
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn scalar_accepts_any_rank_but_not_empty() {
        let r = ReshapeRule::Scalar;
        assert!(check_shape("dim", &r, &Shape::from([1, 1]), GridPolicy::SquareOnly).is_ok());
        assert!(check_shape("dim", &r, &Shape::new(Vec::new()), GridPolicy::SquareOnly).is_ok());
        assert_eq!(
            check_shape("dim", &r, &Shape::from([0]), GridPolicy::SquareOnly),
            Err(ExtractionError::EmptyDataset { name: "dim".into() })
        );
    }

    #[test]
    fn rectangular_reshape_uses_per_axis_strides() {
        let shape = Shape::from([2, 3]);
        let buf = ElementBuffer::Int32(vec![0, 1, 2, 10, 11, 12]);
        let TypedArray::Int2(g) = reshape("mask", &ReshapeRule::IntGrid2D, &shape, buf).unwrap()
        else {
            panic!("expected an int grid");
        };
        assert_eq!((g.rows(), g.cols()), (2, 3));
        assert_eq!(g.get(1, 0), Some(10));
        assert_eq!(g.get(0, 2), Some(2));
    }

    #[test]
    fn short_buffer_is_a_count_mismatch() {
        let shape = Shape::from([2, 2]);
        let err = reshape(
            "mask",
            &ReshapeRule::IntGrid2D,
            &shape,
            ElementBuffer::Int32(vec![0; 3]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExtractionError::ElementCountMismatch {
                name: "mask".into(),
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn buffer_of_wrong_type_is_refused() {
        let err = reshape(
            "xy",
            &XY,
            &Shape::from([1, 1, 2]),
            ElementBuffer::Int32(vec![0, 0]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExtractionError::UnsupportedElementType {
                name: "xy".into(),
                expected: Some(ElementType::Float32),
                found: ElementType::Int32,
            }
        );
    }

    #[test]
    fn reshape_without_check_reports_rank() {
        let err = reshape(
            "mask",
            &ReshapeRule::IntGrid2D,
            &Shape::from([4]),
            ElementBuffer::Int32(vec![0; 4]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ExtractionError::RankMismatch {
                name: "mask".into(),
                expected: 2,
                found: Shape::from([4]),
            }
        );
    }

    #[test]
    fn scalar_takes_first_element() {
        let a = reshape(
            "dim",
            &ReshapeRule::Scalar,
            &Shape::from([1, 2]),
            ElementBuffer::Int32(vec![3, 9]),
        )
        .unwrap();
        assert_eq!(a, TypedArray::Scalar(ScalarInt { value: 3 }));
    }
}
