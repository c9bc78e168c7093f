use crate::error::ImgprocError;

/// A dense 2D filter kernel stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel2d {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Kernel2d {
    /// Create a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::InvalidKernelSize`] if the kernel is empty or `data` does not
    /// hold `rows * cols` weights.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ImgprocError> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(ImgprocError::InvalidKernelSize(rows as f64, cols as f64));
        }
        Ok(Self { data, rows, cols })
    }

    /// Number of kernel rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of kernel columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The kernel weights, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The weight at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Sample positions of an axis of (possibly fractional) size `size`.
///
/// The grid starts at `-(size - 1) / 2` with unit steps and stops strictly below
/// `(size - 1) / 2 + 1`, which yields `ceil(size)` samples.
fn centered_grid(size: f64) -> Vec<f64> {
    let m = (size - 1.0) / 2.0;
    let n = size.ceil() as usize;
    (0..n).map(|i| i as f64 - m).collect()
}

/// Create a 2D gaussian kernel.
///
/// The kernel is sampled on the grid centered at `(dim - 1) / 2` of each axis, values below
/// `f64::EPSILON * max` are zeroed and the result is normalized to sum one. When the raw
/// sum is exactly zero the kernel is returned as is.
///
/// # Arguments
///
/// * `shape` - The (rows, cols) size of the kernel. Fractional sizes round the number of
///   samples up, any size in `(0, 1]` gives a single sample.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Errors
///
/// Returns [`ImgprocError::InvalidKernelSize`] if an axis is not finite or is not positive.
///
/// # Example
///
/// ```
/// use saliency_imgproc::filter::kernels::gaussian_kernel_2d;
///
/// let kernel = gaussian_kernel_2d((5.0, 5.0), 1.0).unwrap();
/// assert_eq!(kernel.rows(), 5);
/// assert!((kernel.sum() - 1.0).abs() < 1e-12);
/// ```
pub fn gaussian_kernel_2d(shape: (f64, f64), sigma: f64) -> Result<Kernel2d, ImgprocError> {
    let (rows, cols) = shape;
    if !(rows.is_finite() && cols.is_finite() && rows > 0.0 && cols > 0.0) {
        return Err(ImgprocError::InvalidKernelSize(rows, cols));
    }

    let ys = centered_grid(rows);
    let xs = centered_grid(cols);
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut data = Vec::with_capacity(ys.len() * xs.len());
    for y in ys.iter() {
        for x in xs.iter() {
            data.push((-(x * x + y * y) / two_sigma_sq).exp());
        }
    }

    // drop the negligible tails
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let floor = f64::EPSILON * max;
    data.iter_mut().filter(|v| **v < floor).for_each(|v| *v = 0.0);

    let sum = data.iter().sum::<f64>();
    if sum != 0.0 {
        data.iter_mut().for_each(|v| *v /= sum);
    }

    Ok(Kernel2d {
        data,
        rows: ys.len(),
        cols: xs.len(),
    })
}

/// Sample the normal density `N(x; 0, std)` on `n` integer positions.
///
/// The positions run from `-(n / 2)` to `(n - 1) / 2` inclusive, so even sizes have one more
/// sample on the negative side. The values are not normalized to sum one.
///
/// # Example
///
/// ```
/// use saliency_imgproc::filter::kernels::gaussian_pdf_1d;
///
/// let pdf = gaussian_pdf_1d(3, 1.0);
/// assert_eq!(pdf.len(), 3);
/// assert_eq!(pdf[0], pdf[2]);
/// ```
pub fn gaussian_pdf_1d(n: usize, std: f64) -> Vec<f64> {
    let start = -((n / 2) as f64);
    let norm = std * (2.0 * std::f64::consts::PI).sqrt();

    (0..n)
        .map(|i| {
            let x = (start + i as f64) / std;
            (-0.5 * x * x).exp() / norm
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gaussian_kernel_2d_sum_and_symmetry() -> Result<(), ImgprocError> {
        let kernel = gaussian_kernel_2d((5.0, 5.0), 1.0)?;
        assert_eq!((kernel.rows(), kernel.cols()), (5, 5));
        assert_relative_eq!(kernel.sum(), 1.0, epsilon = 1e-12);

        // 180 degree rotation leaves the kernel unchanged
        let rotated = kernel.as_slice().iter().rev().copied().collect::<Vec<_>>();
        for (a, b) in kernel.as_slice().iter().zip(rotated.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-15);
        }

        // the peak sits at the center
        let center = kernel.get(2, 2).unwrap();
        assert!(kernel.as_slice().iter().all(|&v| v <= center));
        assert_relative_eq!(center, 0.1621028216371266, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn gaussian_kernel_2d_single_element() -> Result<(), ImgprocError> {
        let kernel = gaussian_kernel_2d((1.0, 1.0), 1e-8)?;
        assert_eq!(kernel.as_slice(), &[1.0]);
        Ok(())
    }

    #[test]
    fn gaussian_kernel_2d_below_one_sample() -> Result<(), ImgprocError> {
        // 3 * 0.05 * 6 rounds up to a single off-center sample
        let kernel = gaussian_kernel_2d((0.9000000000000001, 0.5), 0.30000000000000004)?;
        assert_eq!((kernel.rows(), kernel.cols()), (1, 1));
        assert_eq!(kernel.as_slice(), &[1.0]);
        Ok(())
    }

    #[test]
    fn gaussian_kernel_2d_zero_sum() -> Result<(), ImgprocError> {
        // no sample falls on the center so every weight underflows
        let kernel = gaussian_kernel_2d((2.0, 2.0), 1e-3)?;
        assert_eq!(kernel.as_slice(), &[0.0; 4]);
        Ok(())
    }

    #[test]
    fn gaussian_kernel_2d_fractional_shape() -> Result<(), ImgprocError> {
        let kernel = gaussian_kernel_2d((14.4, 15.0), 4.8)?;
        assert_eq!((kernel.rows(), kernel.cols()), (15, 15));
        assert_relative_eq!(kernel.sum(), 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn gaussian_kernel_2d_epsilon_floor() -> Result<(), ImgprocError> {
        // exp(-400) is far below the floor, the corners must be exactly zero
        let kernel = gaussian_kernel_2d((41.0, 41.0), 1.0)?;
        assert_eq!(kernel.get(0, 0), Some(0.0));
        assert!(kernel.get(20, 20).unwrap() > 0.0);
        Ok(())
    }

    #[test]
    fn gaussian_kernel_2d_invalid() {
        assert_eq!(
            gaussian_kernel_2d((0.0, 3.0), 1.0),
            Err(ImgprocError::InvalidKernelSize(0.0, 3.0))
        );
        assert!(gaussian_kernel_2d((3.0, -1.0), 1.0).is_err());
        assert!(gaussian_kernel_2d((f64::NAN, 3.0), 1.0).is_err());
    }

    #[test]
    fn gaussian_pdf_1d_even() {
        let pdf = gaussian_pdf_1d(4, 2.0);
        // positions -2, -1, 0, 1
        assert_relative_eq!(pdf[2], 1.0 / (2.0 * (2.0 * std::f64::consts::PI).sqrt()));
        assert_relative_eq!(pdf[1], pdf[3]);
        assert!(pdf[0] < pdf[1]);
    }
}
