//! Implements the scalar control points `c_i` weighting the basis functions of the curve.
//!
//! With a periodic boundary condition the first `p` control points are repeated behind the last one,
//! so the curve closes smoothly across the period. Fewer than `p` points are repeated cyclically.
//! Indices of [`ControlPoints::at`] and [`ControlPoints::size`] address this padded sequence, matching the
//! padded [knots][crate::curve::knots].

use thiserror::Error;

use crate::{
    curve::BoundaryCondition,
    types::{VecD, VecHelpers},
};

pub mod fit;

#[derive(Error, Debug, PartialEq)]
pub enum PointsError {
    #[error("Index {index} is out of bounds for {size} control points.")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("Expected {expected} control points, found {found}.")]
    LengthMismatch { expected: usize, found: usize },
}

#[derive(PartialEq, Debug, Clone)]
pub struct ControlPoints {
    data: VecD,
    padding: VecD,
    boundary: BoundaryCondition,
    p: usize,
}

impl ControlPoints {
    /// # Examples
    /// ```
    /// use nalgebra::dvector;
    /// use bsplinex::curve::{points::ControlPoints, BoundaryCondition};
    ///
    /// let points = ControlPoints::new(dvector![1.0, 2.0, 3.0, 4.0], 2, BoundaryCondition::Periodic);
    /// assert_eq!(points.size(), 6);
    /// assert_eq!(points.at(5), Ok(2.0));
    /// ```
    pub fn new(data: VecD, degree: usize, boundary: BoundaryCondition) -> Self {
        let padding = Self::padding(&data, degree, boundary);
        ControlPoints { data, padding, boundary, p: degree }
    }

    fn padding(data: &VecD, p: usize, boundary: BoundaryCondition) -> VecD {
        match boundary {
            BoundaryCondition::Periodic if data.len() >= p => data.head(p).clone_owned(),
            // fewer points than the degree wrap around more than once
            BoundaryCondition::Periodic if !data.is_empty() => {
                VecD::from_iterator(p, (0..p).map(|i| data[i % data.len()]))
            }
            _ => VecD::zeros(0),
        }
    }

    pub fn at(&self, index: usize) -> Result<f64, PointsError> {
        if index >= self.size() {
            return Err(PointsError::IndexOutOfBounds { index, size: self.size() });
        }
        Ok(self.point(index))
    }

    pub(crate) fn point(&self, index: usize) -> f64 {
        if index < self.data.len() {
            self.data[index]
        } else {
            self.padding[index - self.data.len()]
        }
    }

    /// The number of control points including padding.
    pub fn size(&self) -> usize {
        self.data.len() + self.padding.len()
    }

    /// The number of raw control points.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.p
    }

    pub fn boundary_condition(&self) -> BoundaryCondition {
        self.boundary
    }

    pub fn data(&self) -> &VecD {
        &self.data
    }

    /// Replaces the raw control points and updates the padding.
    pub fn set_data(&mut self, data: VecD) -> Result<&mut Self, PointsError> {
        if data.len() != self.data.len() {
            return Err(PointsError::LengthMismatch { expected: self.data.len(), found: data.len() });
        }
        self.padding = Self::padding(&data, self.p, self.boundary);
        self.data = data;
        Ok(self)
    }

    /// The padded control points as a contiguous vector.
    pub fn vector(&self) -> VecD {
        VecD::from_iterator(self.size(), (0..self.size()).map(|i| self.point(i)))
    }
}
