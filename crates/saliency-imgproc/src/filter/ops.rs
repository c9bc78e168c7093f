use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use saliency_image::{Image, ImageError};

use super::kernels::{self, Kernel2d};
use crate::error::ImgprocError;

/// Correlate an image with a 2D kernel using zero padding.
///
/// The kernel is not flipped and is anchored at `(rows / 2, cols / 2)`:
///
/// ```text
/// dst[y, x, c] = sum_{i, j} kernel[i, j] * src[y + i - rows / 2, x + j - cols / 2, c]
/// ```
///
/// where samples outside the image read as zero. Every channel is filtered independently
/// with the same kernel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The 2D kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn correlate_2d<const C: usize>(
    src: &Image<f64, C>,
    dst: &mut Image<f64, C>,
    kernel: &Kernel2d,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (rows, cols) = (src.rows() as isize, src.cols() as isize);
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let anchor_y = (kernel.rows() / 2) as isize;
    let anchor_x = (kernel.cols() / 2) as isize;
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols as usize * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for x in 0..cols {
                let mut sum = [0.0; C];
                for ky in 0..kernel.rows() {
                    let sy = y as isize + ky as isize - anchor_y;
                    if sy < 0 || sy >= rows {
                        continue;
                    }
                    let row_offset = sy * cols;
                    for kx in 0..kernel.cols() {
                        let sx = x + kx as isize - anchor_x;
                        if sx < 0 || sx >= cols {
                            continue;
                        }
                        let w = kernel.as_slice()[ky * kernel.cols() + kx];
                        let src_idx = (row_offset + sx) as usize * C;
                        for (acc, &v) in sum.iter_mut().zip(&src_data[src_idx..src_idx + C]) {
                            *acc += w * v;
                        }
                    }
                }
                let dst_idx = x as usize * C;
                dst_row[dst_idx..dst_idx + C].copy_from_slice(&sum);
            }
        });

    Ok(())
}

/// Blur an image with a 2D gaussian kernel
///
/// The kernel is built with [`kernels::gaussian_kernel_2d`] and applied with
/// [`correlate_2d`]. A kernel whose weights all underflow zeroes the image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_size` - The (rows, cols) size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur_2d<const C: usize>(
    src: &Image<f64, C>,
    dst: &mut Image<f64, C>,
    kernel_size: (f64, f64),
    sigma: f64,
) -> Result<(), ImgprocError> {
    let kernel = kernels::gaussian_kernel_2d(kernel_size, sigma)?;
    log::debug!(
        "gaussian blur with {}x{} kernel, sigma {}",
        kernel.rows(),
        kernel.cols(),
        sigma
    );
    if kernel.sum() == 0.0 {
        log::warn!("gaussian kernel sums to zero, the blurred image is zeroed");
    }
    correlate_2d(src, dst, &kernel)?;
    Ok(())
}
