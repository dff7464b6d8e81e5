use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use image::{imageops, io::Reader, ImageFormat};

#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("texture not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode texture: {0}")]
    Decode(#[from] image::ImageError),
}

/// RGBA8 pixels, stored bottom row first as GL expects
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Read a PPM image (ASCII `P3` or binary `P6`) for upload as a texture.
///
/// Samples are rescaled from the header's maxval to 0..=255, so a 15-level or 16-bit file comes
/// out at full brightness the same as an 8-bit one.
///
/// # Errors
///
/// `TextureError::NotFound` if `path` can't be opened, `TextureError::Decode` if it isn't a PPM.
pub fn load_ppm(path: impl AsRef<Path>) -> Result<TextureImage, TextureError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TextureError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let mut image = Reader::with_format(BufReader::new(file), ImageFormat::Pnm)
        .decode()?
        .to_rgba8();
    imageops::flip_vertical_in_place(&mut image);

    let (width, height) = image.dimensions();
    log::info!("Loaded texture {}: {}x{}", path.display(), width, height);
    Ok(TextureImage {
        width,
        height,
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_rows_reversed() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            "P3\n# sea\n2 2\n255\n255 0 0  0 255 0\n0 0 255  255 255 255\n"
        )?;

        let texture = load_ppm(file.path())?;
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(
            texture.rgba,
            vec![
                0, 0, 255, 255, 255, 255, 255, 255, // bottom row
                255, 0, 0, 255, 0, 255, 0, 255, // top row
            ]
        );
        Ok(())
    }

    #[test]
    fn test_samples_scaled_to_maxval() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "P3\n1 1\n15\n15 0 7\n")?;
        assert_eq!(load_ppm(file.path())?.rgba, vec![255, 0, 119, 255]);

        let mut wide = tempfile::NamedTempFile::new()?;
        write!(wide, "P3\n1 1\n65535\n65535 0 0\n")?;
        assert_eq!(load_ppm(wide.path())?.rgba, vec![255, 0, 0, 255]);
        Ok(())
    }

    #[test]
    fn test_missing_texture() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_ppm(dir.path().join("sky08.ppm")),
            Err(TextureError::NotFound { .. })
        ));
    }

    #[test]
    fn test_not_a_ppm() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "hello")?;
        assert!(matches!(
            load_ppm(file.path()),
            Err(TextureError::Decode(_))
        ));
        Ok(())
    }
}
