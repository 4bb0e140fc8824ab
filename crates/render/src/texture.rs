use std::path::{Path, PathBuf};

/// Errors from texture loading.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load texture {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {0:?} has zero extent")]
    Empty(PathBuf),
}

/// Tightly packed RGBA8 pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    const LIGHT: [u8; 4] = [230, 160, 60, 255];
    const DARK: [u8; 4] = [40, 40, 48, 255];

    /// Square two-tone checkerboard with `cells` squares per side.
    pub fn checkerboard(size: u32, cells: u32) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let texel = if (x / cell + y / cell) % 2 == 0 {
                    Self::LIGHT
                } else {
                    Self::DARK
                };
                pixels.extend_from_slice(&texel);
            }
        }
        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    /// Decode an image file into RGBA8.
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path)
            .map_err(|source| TextureError::Load {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path.to_path_buf()));
        }
        tracing::info!(width, height, "loaded texture {}", path.display());
        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

impl Default for TextureData {
    fn default() -> Self {
        Self::checkerboard(256, 8)
    }
}
