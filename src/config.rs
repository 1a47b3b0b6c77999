//! Runtime configuration.

use std::{env, fmt::Display, str::FromStr};

use anyhow::{bail, ensure, Context};

use crate::image::BlurKernel;
use crate::pipeline::ProviderOptions;
use crate::redact::Redactor;

/// Configuration of the detection pipeline and the frame loop.
///
/// Use [`Config::default`] and the builder methods, or [`Config::from_env`] to additionally apply
/// the `FINGERBAN_*` environment variables documented at the crate root.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of pixels to add on each side of a flagged hand's bounding box.
    pub padding: u32,
    /// Blur kernel used for redaction.
    pub blur_kernel: BlurKernel,
    /// Options handed to the landmark provider.
    pub provider: ProviderOptions,
    /// Whether to mirror frames horizontally before processing them.
    pub mirror: bool,
    /// Whether to draw the skeleton of hands that are not flagged.
    pub draw_skeleton: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            padding: Redactor::DEFAULT_PADDING,
            blur_kernel: BlurKernel::DEFAULT,
            provider: ProviderOptions::default(),
            mirror: true,
            draw_skeleton: true,
        }
    }
}

impl Config {
    /// Creates the default configuration and applies overrides from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides looked up by `var`, which maps `FINGERBAN_*` variable names to values.
    pub fn with_overrides(
        mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        if let Some(padding) = parse(&var, "FINGERBAN_PADDING")? {
            self.padding = padding;
        }
        if let Some(size) = parse(&var, "FINGERBAN_BLUR_KERNEL")? {
            self.blur_kernel = BlurKernel::new(size).context("invalid FINGERBAN_BLUR_KERNEL")?;
        }
        if let Some(max_hands) = parse(&var, "FINGERBAN_MAX_HANDS")? {
            self.provider.max_hands = max_hands;
        }
        if let Some(conf) = parse(&var, "FINGERBAN_MIN_DETECTION_CONFIDENCE")? {
            self.provider.min_detection_confidence = conf;
        }
        if let Some(conf) = parse(&var, "FINGERBAN_MIN_TRACKING_CONFIDENCE")? {
            self.provider.min_tracking_confidence = conf;
        }
        if let Some(mirror) = var("FINGERBAN_MIRROR") {
            self.mirror = parse_bool(&mirror).context("invalid FINGERBAN_MIRROR")?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks that all values are in range.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            (
                "min_detection_confidence",
                self.provider.min_detection_confidence,
            ),
            (
                "min_tracking_confidence",
                self.provider.min_tracking_confidence,
            ),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                "{name} must be between 0 and 1 (got {value})"
            );
        }
        ensure!(self.provider.max_hands > 0, "max_hands must not be 0");
        Ok(())
    }

    /// Sets the padding around redacted hands.
    #[inline]
    pub fn padding(self, padding: u32) -> Self {
        Self { padding, ..self }
    }

    /// Sets the redaction blur kernel.
    #[inline]
    pub fn blur_kernel(self, blur_kernel: BlurKernel) -> Self {
        Self {
            blur_kernel,
            ..self
        }
    }

    /// Sets the options forwarded to the landmark provider.
    #[inline]
    pub fn provider(self, provider: ProviderOptions) -> Self {
        Self { provider, ..self }
    }

    /// Sets whether frames are mirrored before processing.
    #[inline]
    pub fn mirror(self, mirror: bool) -> Self {
        Self { mirror, ..self }
    }

    /// Sets whether hands that are not flagged get a skeleton overlay.
    #[inline]
    pub fn draw_skeleton(self, draw_skeleton: bool) -> Self {
        Self {
            draw_skeleton,
            ..self
        }
    }
}

fn parse<T>(var: impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = var(key) else {
        return Ok(None);
    };
    match value.trim().parse() {
        Ok(v) => Ok(Some(v)),
        Err(e) => bail!("invalid value '{value}' for {key}: {e}"),
    }
}

fn parse_bool(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected a boolean, got '{value}'"),
    }
}
