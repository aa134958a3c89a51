//! Frame output: the last frame as PNG, or every frame as an animated GIF.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Png,
    Gif,
}

impl OutputFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "gif" => Some(OutputFormat::Gif),
            _ => None,
        }
    }
}

/// Streaming frame encoder. GIF frames go straight to disk; PNG keeps only
/// the most recent frame and writes it on `finish`.
pub enum FrameEncoder {
    Png {
        path: PathBuf,
        last: Option<image::RgbImage>,
    },
    Gif {
        encoder: gif::Encoder<std::fs::File>,
        width: u16,
        height: u16,
        frame_delay: u16,
    },
}

impl FrameEncoder {
    /// `width` x `height` is the GIF canvas; every frame must have that size.
    pub fn create(
        output: &Path,
        format: OutputFormat,
        width: u32,
        height: u32,
        fps: u32,
    ) -> anyhow::Result<Self> {
        match format {
            OutputFormat::Png => Ok(FrameEncoder::Png { path: output.to_path_buf(), last: None }),
            OutputFormat::Gif => {
                use gif::{Encoder, Repeat};
                let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
                    (Ok(w), Ok(h)) => (w, h),
                    _ => anyhow::bail!("{}x{} is too large for a GIF", width, height),
                };
                let file = std::fs::File::create(output)
                    .with_context(|| format!("failed to create {:?}", output))?;
                let mut encoder = Encoder::new(file, w, h, &[])?;
                encoder.set_repeat(Repeat::Infinite)?;
                // GIF delays are in hundredths of a second
                let frame_delay = (100 / fps.max(1)).max(1) as u16;
                Ok(FrameEncoder::Gif { encoder, width: w, height: h, frame_delay })
            }
        }
    }

    pub fn write_frame(&mut self, frame: image::RgbImage) -> anyhow::Result<()> {
        match self {
            FrameEncoder::Png { last, .. } => {
                *last = Some(frame);
            }
            FrameEncoder::Gif { encoder, width, height, frame_delay } => {
                if frame.dimensions() != (*width as u32, *height as u32) {
                    anyhow::bail!(
                        "frame is {}x{}, GIF canvas is {}x{}",
                        frame.width(), frame.height(), width, height
                    );
                }
                let (pixels, palette) = index_colors(frame.as_raw());
                let mut gif_frame =
                    gif::Frame::from_palette_pixels(*width, *height, pixels, palette, None);
                gif_frame.delay = *frame_delay;
                encoder.write_frame(&gif_frame)?;
            }
        }
        Ok(())
    }

    /// Flush output. For PNG this is when the file is written.
    pub fn finish(self) -> anyhow::Result<()> {
        match self {
            FrameEncoder::Png { path, last } => {
                let frame = last.ok_or_else(|| anyhow::anyhow!("no frame to write"))?;
                frame
                    .save_with_format(&path, image::ImageFormat::Png)
                    .with_context(|| format!("failed to write {:?}", path))?;
                Ok(())
            }
            FrameEncoder::Gif { .. } => {
                // GIF encoder flushes on drop
                Ok(())
            }
        }
    }
}

/// Convert RGB data to palette indices plus a 256-entry flat palette.
///
/// Colors are matched exactly while the palette has room, then mapped to the
/// nearest existing entry.
pub fn index_colors(rgb_data: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut pixels: Vec<u8> = Vec::with_capacity(rgb_data.len() / 3);
    let mut palette: Vec<[u8; 3]> = Vec::new();

    for chunk in rgb_data.chunks_exact(3) {
        let rgb = [chunk[0], chunk[1], chunk[2]];
        let idx = palette.iter().position(|&c| c == rgb).unwrap_or_else(|| {
            if palette.len() < 256 {
                palette.push(rgb);
                palette.len() - 1
            } else {
                palette
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, c)| {
                        let dr = c[0] as i32 - rgb[0] as i32;
                        let dg = c[1] as i32 - rgb[1] as i32;
                        let db = c[2] as i32 - rgb[2] as i32;
                        dr * dr + dg * dg + db * db
                    })
                    .map(|(i, _)| i)
                    .unwrap_or(0)
            }
        });
        pixels.push(idx as u8);
    }

    palette.resize(256, [0, 0, 0]);
    let flat_palette: Vec<u8> = palette.iter().flat_map(|c| c.iter().copied()).collect();
    (pixels, flat_palette)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.GIF")), Some(OutputFormat::Gif));
        assert_eq!(OutputFormat::from_path(Path::new("out.png")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("out.mp4")), None);
        assert_eq!(OutputFormat::from_path(Path::new("out")), None);
    }

    #[test]
    fn test_index_colors_exact() {
        let data = [0, 0, 0, 255, 255, 255, 0, 0, 0];
        let (pixels, palette) = index_colors(&data);
        assert_eq!(pixels, vec![0, 1, 0]);
        assert_eq!(palette.len(), 256 * 3);
        assert_eq!(&palette[3..6], &[255, 255, 255]);
    }
}
