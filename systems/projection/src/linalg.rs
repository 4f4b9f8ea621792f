//! Two-dimensional vector and matrix primitives used by the projector.
//!
//! [`Matrix2x2`] stores its basis as two column vectors `(a, c)` and `(b, d)`.
//! [`apply`] multiplies a row vector by the matrix as written, so callers that
//! need the column-vector product pass the transposed matrix.

use std::ops::{Add, Sub};

use crate::ProjectionError;

/// Plain two-component vector with value semantics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vector2 {
    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Reports whether both components lie within `tolerance` of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Vector2, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<Vector2> for glam::Vec2 {
    fn from(value: Vector2) -> Self {
        glam::Vec2::new(value.x, value.y)
    }
}

impl From<glam::Vec2> for Vector2 {
    fn from(value: glam::Vec2) -> Self {
        Vector2::new(value.x, value.y)
    }
}

/// 2x2 matrix `[[a, b], [c, d]]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix2x2 {
    /// Row 0, column 0.
    pub a: f32,
    /// Row 0, column 1.
    pub b: f32,
    /// Row 1, column 0.
    pub c: f32,
    /// Row 1, column 1.
    pub d: f32,
}

impl Matrix2x2 {
    /// Builds a matrix whose columns are `first` and `second`.
    #[must_use]
    pub const fn from_columns(first: Vector2, second: Vector2) -> Self {
        Self {
            a: first.x,
            b: second.x,
            c: first.y,
            d: second.y,
        }
    }

    /// First column `(a, c)`.
    #[must_use]
    pub const fn first_column(&self) -> Vector2 {
        Vector2::new(self.a, self.c)
    }

    /// Second column `(b, d)`.
    #[must_use]
    pub const fn second_column(&self) -> Vector2 {
        Vector2::new(self.b, self.d)
    }

    /// `a*d - c*b`.
    #[must_use]
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.c * self.b
    }

    /// Swaps the off-diagonal entries.
    #[must_use]
    pub const fn transpose(&self) -> Self {
        Self {
            a: self.a,
            b: self.c,
            c: self.b,
            d: self.d,
        }
    }
}

/// Multiplies both components by `scalar`.
#[must_use]
pub fn scale(vector: Vector2, scalar: f32) -> Vector2 {
    Vector2::new(vector.x * scalar, vector.y * scalar)
}

/// Row vector times matrix: `(v.x*a + v.y*c, v.x*b + v.y*d)`.
#[must_use]
pub fn apply(vector: Vector2, matrix: &Matrix2x2) -> Vector2 {
    Vector2::new(
        vector.x * matrix.a + vector.y * matrix.c,
        vector.x * matrix.b + vector.y * matrix.d,
    )
}

/// Inverts the matrix, refusing singular input instead of producing `Inf` or `NaN`.
pub fn invert(matrix: &Matrix2x2) -> Result<Matrix2x2, ProjectionError> {
    let determinant = matrix.determinant();
    let reciprocal = 1.0 / determinant;
    if determinant == 0.0 || !determinant.is_finite() || !reciprocal.is_finite() {
        return Err(ProjectionError::InvalidProjection { determinant });
    }

    Ok(Matrix2x2 {
        a: reciprocal * matrix.d,
        b: reciprocal * -matrix.b,
        c: reciprocal * -matrix.c,
        d: reciprocal * matrix.a,
    })
}
