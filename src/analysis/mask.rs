use crate::{
    assets::store::PreparedImage,
    foundation::error::{PlinthError, PlinthResult},
};

/// Single-channel 8-bit coverage mask, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// One alpha byte per pixel.
    pub data: Vec<u8>,
}

impl AlphaMask {
    /// Build a mask from raw alpha bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> PlinthResult<Self> {
        if data.len() != (width as usize) * (height as usize) {
            return Err(PlinthError::validation(format!(
                "alpha mask has {} bytes, expected {}",
                data.len(),
                (width as usize) * (height as usize)
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Extract the alpha channel of `img`.
    pub fn from_image(img: &PreparedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            data: img.alpha(),
        }
    }

    /// Alpha at `(x, y)`; callers stay in bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Copy scaled down so neither side exceeds `max_dim`, plus the factor applied.
    ///
    /// Masks already within bounds come back unchanged with factor `1.0`.
    pub fn downscaled(&self, max_dim: u32) -> (AlphaMask, f64) {
        let longest = self.width.max(self.height);
        if max_dim == 0 || longest <= max_dim {
            return (self.clone(), 1.0);
        }
        let factor = f64::from(max_dim) / f64::from(longest);
        let w = ((f64::from(self.width) * factor).round() as u32).max(1);
        let h = ((f64::from(self.height) * factor).round() as u32).max(1);

        let Some(gray) = image::GrayImage::from_raw(self.width, self.height, self.data.clone())
        else {
            return (self.clone(), 1.0);
        };
        let small = image::imageops::resize(&gray, w, h, image::imageops::FilterType::Triangle);
        (
            AlphaMask {
                width: w,
                height: h,
                data: small.into_raw(),
            },
            factor,
        )
    }

    /// Morphological closing with a disk of `radius`: circular max, then circular min.
    ///
    /// Runs on a copy padded by `radius` transparent pixels so shapes near the border close the
    /// same way as shapes in the middle.
    pub fn close(&self, radius: u32) -> AlphaMask {
        if radius == 0 || self.width == 0 || self.height == 0 {
            return self.clone();
        }
        let disk = disk_offsets(radius);
        let padded = self.padded(radius);
        let dilated = padded.filter(&disk, |acc, v| acc.max(v), 0);
        dilated
            .filter(&disk, |acc, v| acc.min(v), 255)
            .cropped(radius, self.width, self.height)
    }

    fn padded(&self, pad: u32) -> AlphaMask {
        let w = (self.width + 2 * pad) as usize;
        let h = (self.height + 2 * pad) as usize;
        let mut data = vec![0u8; w * h];
        for (y, row) in self.data.chunks_exact(self.width as usize).enumerate() {
            let start = (y + pad as usize) * w + pad as usize;
            data[start..start + row.len()].copy_from_slice(row);
        }
        AlphaMask {
            width: w as u32,
            height: h as u32,
            data,
        }
    }

    fn cropped(&self, offset: u32, width: u32, height: u32) -> AlphaMask {
        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            let start = ((y + offset) as usize) * (self.width as usize) + offset as usize;
            data.extend_from_slice(&self.data[start..start + width as usize]);
        }
        AlphaMask {
            width,
            height,
            data,
        }
    }

    fn filter(&self, disk: &[(i32, i32)], fold: impl Fn(u8, u8) -> u8, init: u8) -> AlphaMask {
        let w = self.width as i32;
        let h = self.height as i32;
        let mut out = vec![0u8; self.data.len()];
        if self.width == 0 {
            return AlphaMask {
                width: self.width,
                height: self.height,
                data: out,
            };
        }
        for (y, row) in out.chunks_mut(self.width as usize).enumerate() {
            let y = y as i32;
            for x in 0..w {
                let mut acc = init;
                // Out-of-bounds neighbours do not take part.
                for &(dx, dy) in disk {
                    let sx = x + dx;
                    let sy = y + dy;
                    if sx < 0 || sy < 0 || sx >= w || sy >= h {
                        continue;
                    }
                    acc = fold(acc, self.data[(sy * w + sx) as usize]);
                }
                row[x as usize] = acc;
            }
        }
        AlphaMask {
            width: self.width,
            height: self.height,
            data: out,
        }
    }

    /// Keep only the largest 4-connected region with alpha `>= threshold`.
    ///
    /// Returns the filtered mask (everything outside the region zeroed) and the region's
    /// pixel count, or `None` when no pixel reaches `threshold`.
    pub fn largest_component(&self, threshold: u8) -> Option<(AlphaMask, usize)> {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut labels = vec![0u32; self.data.len()];
        let mut stack = Vec::<usize>::new();
        let mut best_label = 0u32;
        let mut best_size = 0usize;
        let mut next_label = 0u32;
        let mut components = 0usize;

        for start in 0..self.data.len() {
            if labels[start] != 0 || self.data[start] < threshold {
                continue;
            }
            next_label += 1;
            components += 1;
            labels[start] = next_label;
            stack.push(start);
            let mut size = 0usize;

            while let Some(idx) = stack.pop() {
                size += 1;
                let x = idx % w;
                let y = idx / w;
                let mut visit = |n: usize| {
                    if labels[n] == 0 && self.data[n] >= threshold {
                        labels[n] = next_label;
                        stack.push(n);
                    }
                };
                if x > 0 {
                    visit(idx - 1);
                }
                if x + 1 < w {
                    visit(idx + 1);
                }
                if y > 0 {
                    visit(idx - w);
                }
                if y + 1 < h {
                    visit(idx + w);
                }
            }

            if size > best_size {
                best_size = size;
                best_label = next_label;
            }
        }

        if best_size == 0 {
            return None;
        }
        tracing::debug!(components, best_size, "largest alpha component");

        let data = self
            .data
            .iter()
            .zip(&labels)
            .map(|(&a, &l)| if l == best_label { a } else { 0 })
            .collect();
        Some((
            AlphaMask {
                width: self.width,
                height: self.height,
                data,
            },
            best_size,
        ))
    }
}

fn disk_offsets(radius: u32) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let r2 = r * r;
    let mut out = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r2 {
                out.push((dx, dy));
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/mask.rs"]
mod tests;
