use std::path::{Path, PathBuf};

use saliency_image::Image;

use crate::{
    error::IoError,
    png::{write_image_png_gray8, write_image_png_rgb8},
};

/// An 8 bit image ready to be written to disk.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageBuffer {
    /// A single channel image.
    Gray8(Image<u8, 1>),
    /// A three channel RGB image.
    Rgb8(Image<u8, 3>),
}

impl From<Image<u8, 1>> for ImageBuffer {
    fn from(image: Image<u8, 1>) -> Self {
        ImageBuffer::Gray8(image)
    }
}

impl From<Image<u8, 3>> for ImageBuffer {
    fn from(image: Image<u8, 3>) -> Self {
        ImageBuffer::Rgb8(image)
    }
}

/// Ownership and directory handling of [`save_image`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveOptions {
    /// The owner of the written file and created directories.
    ///
    /// With `None` no ownership change is made: new entries belong to the current user.
    pub uid: Option<u32>,
    /// The group of the written file and created directories.
    ///
    /// With `None` no ownership change is made: new entries take the group the system assigns,
    /// which is the parent directory's group under a setgid parent rather than the current
    /// group.
    pub gid: Option<u32>,
    /// Create the missing parent directories of the file.
    pub create_parent: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            uid: None,
            gid: None,
            create_parent: true,
        }
    }
}

/// Write an image to a PNG file and hand it to the requested owner.
///
/// When `create_parent` is set, every missing ancestor directory is created and chowned one
/// by one, outermost first. The file itself is chowned once written.
///
/// # Arguments
///
/// * `file_path` - The path of the PNG file.
/// * `image` - The image to write.
/// * `options` - The ownership and directory options.
///
/// # Errors
///
/// Returns [`IoError::ParentDoesNotExist`] if the parent directory is missing and
/// `create_parent` is not set, or [`IoError::FileError`] if a directory, the file or an
/// ownership change fails.
///
/// # Example
///
/// ```no_run
/// use saliency_image::Image;
/// use saliency_io::functional::{save_image, SaveOptions};
///
/// let map = Image::<u8, 1>::from_size_val([64, 48].into(), 128).unwrap();
/// save_image("/tmp/maps/map.png", &map.into(), &SaveOptions::default()).unwrap();
/// ```
pub fn save_image(
    file_path: impl AsRef<Path>,
    image: &ImageBuffer,
    options: &SaveOptions,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            if !options.create_parent {
                return Err(IoError::ParentDoesNotExist(parent.to_path_buf()));
            }
            create_dirs_with_owner(parent, options)?;
        }
    }

    match image {
        ImageBuffer::Gray8(image) => write_image_png_gray8(file_path, image)?,
        ImageBuffer::Rgb8(image) => write_image_png_rgb8(file_path, image)?,
    }
    change_owner(file_path, options)?;

    log::debug!("saved {}", file_path.display());

    Ok(())
}

/// Convert a map in `[0, 1]` to 8 bits as `x * 255`, truncated and saturated.
///
/// NaN maps to 0.
pub fn to_u8_image<const C: usize>(src: &Image<f64, C>) -> Image<u8, C> {
    src.map(|&x| (x * 255.0) as u8)
}

fn create_dirs_with_owner(dir: &Path, options: &SaveOptions) -> Result<(), IoError> {
    let missing = dir
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .map(Path::to_path_buf)
        .collect::<Vec<PathBuf>>();

    for path in missing.iter().rev() {
        log::debug!("creating directory {}", path.display());
        std::fs::create_dir(path)?;
        change_owner(path, options)?;
    }

    Ok(())
}

#[cfg(unix)]
fn change_owner(path: &Path, options: &SaveOptions) -> Result<(), IoError> {
    if options.uid.is_none() && options.gid.is_none() {
        return Ok(());
    }
    std::os::unix::fs::chown(path, options.uid, options.gid)?;
    Ok(())
}

#[cfg(not(unix))]
fn change_owner(path: &Path, options: &SaveOptions) -> Result<(), IoError> {
    if options.uid.is_some() || options.gid.is_some() {
        log::warn!("ownership of {} left unchanged", path.display());
    }
    Ok(())
}
