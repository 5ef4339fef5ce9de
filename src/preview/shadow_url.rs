//! Transformation URLs for the remote drop-shadow preview service.
//!
//! The service renders the shadow itself; this module only builds the request string.

use crate::foundation::error::{PlinthError, PlinthResult};

/// Host serving transformed uploads.
pub const DELIVERY_HOST: &str = "https://res.cloudinary.com";

/// Light direction and softness for a generated drop shadow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShadowParams {
    /// Light direction in degrees, `0..=360`.
    pub azimuth: u32,
    /// Light height above the horizon in degrees, `0..=90`.
    pub elevation: u32,
    /// Shadow softness, `0..=100`.
    pub spread: u32,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            azimuth: 215,
            elevation: 45,
            spread: 50,
        }
    }
}

impl ShadowParams {
    /// Check every parameter against the service's accepted range.
    pub fn validate(&self) -> PlinthResult<()> {
        if self.azimuth > 360 {
            return Err(PlinthError::validation("shadow azimuth must be in 0..=360"));
        }
        if self.elevation > 90 {
            return Err(PlinthError::validation("shadow elevation must be in 0..=90"));
        }
        if self.spread > 100 {
            return Err(PlinthError::validation("shadow spread must be in 0..=100"));
        }
        Ok(())
    }

    fn effect(&self) -> String {
        format!(
            "e_dropshadow:azimuth_{};elevation_{};spread_{}",
            self.azimuth, self.elevation, self.spread
        )
    }
}

/// Build the PNG delivery URL that renders `public_id` with a drop shadow.
pub fn shadow_preview_url(
    cloud: &str,
    public_id: &str,
    params: ShadowParams,
) -> PlinthResult<String> {
    params.validate()?;
    if cloud.is_empty()
        || !cloud
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(PlinthError::validation(format!(
            "invalid cloud name '{cloud}'"
        )));
    }
    let public_id = public_id.trim_matches('/');
    if public_id.is_empty()
        || public_id
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '?' | '#' | '%'))
    {
        return Err(PlinthError::validation(format!(
            "invalid public id '{public_id}'"
        )));
    }

    Ok(format!(
        "{DELIVERY_HOST}/{cloud}/image/upload/{}/{public_id}.png",
        params.effect()
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/preview/shadow_url.rs"]
mod tests;
