//! Job manifests
//!
//! A manifest is a JSON description of a laser job:
//!
//! ```json
//! {
//!   "title": "coaster",
//!   "parts": [
//!     { "kind": "raster3d", "dpi": 254, "image": "photo.png",
//!       "property": { "power": 60, "speed": 3000 } },
//!     { "kind": "vector", "dpi": 500,
//!       "property": { "power": 100, "speed": 300, "passes": 2 },
//!       "commands": [ { "type": "move_to", "x": 0, "y": 0 },
//!                     { "type": "line_to", "x": 500, "y": 0 } ] }
//!   ]
//! }
//! ```
//!
//! Raster pixels come either inline (`lines`, one array per row) or from an
//! image file decoded with the `image` crate. Image paths are relative to the
//! manifest.

use anyhow::{bail, Context, Result};
use image::GrayImage;
use lasercut_core::{
    LaserJob, Point, PropertyBag, Raster, Raster3dPart, RasterPart, VectorCommand, VectorPart,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Luma values below this are burned in bilevel images
const BILEVEL_THRESHOLD: u8 = 128;

/// Top level of a job manifest
#[derive(Debug, Clone, Deserialize)]
pub struct JobManifest {
    pub title: String,
    #[serde(default)]
    pub parts: Vec<PartSpec>,
}

/// One part of a job manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartSpec {
    Vector {
        dpi: f64,
        property: PropertyBag,
        #[serde(default)]
        commands: Vec<VectorCommand>,
    },
    Raster {
        dpi: f64,
        property: PropertyBag,
        #[serde(flatten)]
        pixels: PixelSource,
    },
    Raster3d {
        dpi: f64,
        property: PropertyBag,
        #[serde(flatten)]
        pixels: PixelSource,
    },
}

/// Where raster pixels come from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PixelSource {
    /// Top-left corner in pixels
    #[serde(default)]
    pub origin: Point,
    /// Inline rows; for bilevel parts any non-zero value burns
    pub lines: Option<Vec<Vec<u8>>>,
    /// Image file, relative to the manifest
    pub image: Option<PathBuf>,
}

impl JobManifest {
    /// Read a manifest from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job manifest {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse job manifest {}", path.display()))
    }

    /// Build the job; image paths are resolved against `base_dir`
    pub fn into_job(self, base_dir: &Path) -> Result<LaserJob> {
        let mut job = LaserJob::new(self.title);
        for (index, part) in self.parts.into_iter().enumerate() {
            let context = || format!("Invalid part {} of job manifest", index + 1);
            match part {
                PartSpec::Vector {
                    dpi,
                    property,
                    commands,
                } => {
                    let part =
                        VectorPart::with_commands(property, dpi, commands).with_context(context)?;
                    job.add_part(part);
                }
                PartSpec::Raster {
                    dpi,
                    property,
                    pixels,
                } => {
                    let part: RasterPart = pixels
                        .load(base_dir, property, dpi, |v| v != 0, |luma| {
                            luma < BILEVEL_THRESHOLD
                        })
                        .with_context(context)?;
                    job.add_part(part);
                }
                PartSpec::Raster3d {
                    dpi,
                    property,
                    pixels,
                } => {
                    let part: Raster3dPart = pixels
                        .load(base_dir, property, dpi, |v| v, |luma| 255 - luma)
                        .with_context(context)?;
                    job.add_part(part);
                }
            }
        }
        Ok(job)
    }
}

impl PixelSource {
    fn load<P: Copy>(
        self,
        base_dir: &Path,
        property: PropertyBag,
        dpi: f64,
        from_value: impl Fn(u8) -> P,
        from_luma: impl Fn(u8) -> P,
    ) -> Result<Raster<P>> {
        let (width, rows) = match (self.lines, self.image) {
            (Some(lines), None) => {
                let width = lines.first().map_or(0, Vec::len);
                let rows: Vec<Vec<P>> = lines
                    .into_iter()
                    .map(|row| row.into_iter().map(&from_value).collect())
                    .collect();
                (width, rows)
            }
            (None, Some(image)) => {
                let path = base_dir.join(image);
                let image = read_image(&path)?;
                let rows = image
                    .rows()
                    .map(|row| row.map(|pixel| from_luma(pixel.0[0])).collect())
                    .collect();
                (image.width() as usize, rows)
            }
            (Some(_), Some(_)) => bail!("raster parts take either 'lines' or 'image', not both"),
            (None, None) => bail!("raster parts need 'lines' or 'image'"),
        };

        let height = rows.len();
        Ok(Raster::new(self.origin, width, height, rows, property, dpi)?)
    }
}

fn read_image(path: &Path) -> Result<GrayImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?
        .to_luma8();
    debug!(
        "Loaded {}x{} image from {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(image)
}
