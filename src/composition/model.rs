use std::path::Path;

use anyhow::Context as _;

use crate::{
    deskew::orchestrator::DeskewOptions,
    foundation::core::{Canvas, Placement},
    foundation::error::{PlinthError, PlinthResult},
    render::plan::{CompositeOptions, ReflectionOptions},
};

/// One input image referenced by a [`Stage`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageSource {
    /// Path relative to the stage file.
    pub path: String,
    /// EXIF orientation code (1..=8); anything else is treated as upright.
    #[serde(default = "default_orientation")]
    pub orientation: u32,
}

fn default_orientation() -> u32 {
    1
}

/// A complete staging job: inputs, placement and effects.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stage {
    /// Output size; defaults to the backdrop's oriented size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<Canvas>,
    /// Backdrop photo.
    pub backdrop: ImageSource,
    /// Subject image including drop-shadow padding.
    pub shadowed: ImageSource,
    /// Bare product cutout; defaults to the shadowed image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean: Option<ImageSource>,
    /// Subject anchor and scale.
    #[serde(default)]
    pub placement: Placement,
    /// Reflection under the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<ReflectionOptions>,
    /// Backdrop blur sigma at the reference width; `None` disables the blur.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_of_field: Option<f64>,
    /// Straighten the subject before layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deskew: Option<DeskewOptions>,
}

impl Stage {
    /// Parse a stage from JSON text.
    pub fn from_json_str(s: &str) -> PlinthResult<Self> {
        serde_json::from_str(s).map_err(|e| PlinthError::serde(format!("parse stage JSON: {e}")))
    }

    /// Read and parse a stage file.
    pub fn from_path(path: &Path) -> PlinthResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("open stage '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check every numeric and path constraint without touching the filesystem.
    pub fn validate(&self) -> PlinthResult<()> {
        if let Some(c) = self.canvas
            && (c.width == 0 || c.height == 0)
        {
            return Err(PlinthError::validation("canvas width/height must be > 0"));
        }
        validate_rel_source(&self.backdrop.path, "backdrop.path")?;
        validate_rel_source(&self.shadowed.path, "shadowed.path")?;
        if let Some(clean) = &self.clean {
            validate_rel_source(&clean.path, "clean.path")?;
        }
        self.placement.validate()?;
        self.composite_options().validate()?;
        if let Some(d) = &self.deskew
            && d.max_analysis_dim == 0
        {
            return Err(PlinthError::validation("deskew max_analysis_dim must be > 0"));
        }
        Ok(())
    }

    /// Effects requested by this stage, in compositor form.
    pub fn composite_options(&self) -> CompositeOptions {
        let mut opts = CompositeOptions {
            reflection: self.reflection,
            ..CompositeOptions::default()
        };
        if let Some(radius) = self.depth_of_field {
            opts.depth_of_field = true;
            opts.blur_base_radius = radius;
        }
        opts
    }
}

fn validate_rel_source(source: &str, field: &str) -> PlinthResult<()> {
    if source.trim().is_empty() {
        return Err(PlinthError::validation(format!("{field} must be non-empty")));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PlinthError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(PlinthError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
