use nalgebra::{Dyn, MatrixView, OMatrix, OVector, U1};

pub type VecD = OVector<f64, Dyn>;
pub type VecDView<'a> = MatrixView<'a, f64, Dyn, U1, U1, Dyn>;

pub type MatD = OMatrix<f64, Dyn, Dyn>;

pub trait VecHelpers {
    fn head(&self, n: usize) -> VecDView;
    fn segment(&self, i: usize, n: usize) -> VecDView;
}

impl VecHelpers for VecD {
    fn head(&self, n: usize) -> VecDView {
        self.segment(0, n)
    }

    fn segment(&self, start: usize, n: usize) -> VecDView {
        self.generic_view((start, 0), (Dyn(n), U1))
    }
}
