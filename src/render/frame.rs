//! PNG frames of grid snapshots

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::PathBuf;

use crate::core::error::{Result, SchellingError};
use crate::core::types::Cell;
use crate::render::colors::Palette;
use crate::render::FrameSink;
use crate::spatial::Grid;

/// Marker radius as a fraction of the cell side
const MARK_RADIUS: f32 = 0.2;

/// Draw `grid` with `cell_px` pixel squares per cell
pub fn render_image(
    grid: &Grid,
    cell_px: u32,
    palette: &Palette,
    mark_happiness: bool,
) -> RgbaImage {
    let side = grid.size as u32 * cell_px;
    let mut img = RgbaImage::new(side, side);

    for cell in grid.flatten() {
        let addr = cell.addr();
        let x0 = addr.col as u32 * cell_px;
        let y0 = addr.row as u32 * cell_px;

        let (base, mark) = match cell {
            Cell::Empty(_) => (palette.empty, None),
            Cell::Occupied(occupant) => {
                let base = palette.color_for(occupant.tag);
                let mark = mark_happiness.then(|| {
                    if occupant.happy {
                        palette.happy_mark
                    } else {
                        palette.unhappy_mark
                    }
                });
                (base, mark)
            }
        };

        let fill = Rgba(base.to_rgba8());
        let marked = mark.map(|m| Rgba(m.over(base).to_rgba8()));
        let centre = cell_px as f32 / 2.0;
        let radius_sq = (cell_px as f32 * MARK_RADIUS).powi(2);

        for dy in 0..cell_px {
            for dx in 0..cell_px {
                let px = dx as f32 + 0.5 - centre;
                let py = dy as f32 + 0.5 - centre;
                let color = match marked {
                    Some(m) if px * px + py * py <= radius_sq => m,
                    _ => fill,
                };
                img.put_pixel(x0 + dx, y0 + dy, color);
            }
        }
    }

    img
}

/// Writes `<out_dir>/<label>.png` for every frame
#[derive(Debug, Clone)]
pub struct PngRenderer {
    out_dir: PathBuf,
    cell_size_px: u32,
    palette: Palette,
}

impl PngRenderer {
    pub fn new(out_dir: impl Into<PathBuf>, cell_size_px: u32) -> Self {
        Self {
            out_dir: out_dir.into(),
            cell_size_px,
            palette: Palette::default(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn frame_path(&self, label: &str) -> PathBuf {
        self.out_dir.join(format!("{}.png", label))
    }
}

impl FrameSink for PngRenderer {
    fn emit(&mut self, grid: &Grid, label: &str, mark_happiness: bool) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.frame_path(label);
        let img = render_image(grid, self.cell_size_px, &self.palette, mark_happiness);
        img.save(&path)
            .map_err(|e| SchellingError::Render(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("Wrote frame {}", path.display());
        Ok(())
    }
}
