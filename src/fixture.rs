//! Recorded hand landmarks.
//!
//! A fixture file lists the hands of a sequence of frames in a line-based text format:
//!
//! ```text
//! # comment
//! frame
//! hand
//! 0.51 0.82 0.0
//! 0.47 0.77
//! ...
//! frame
//! ```
//!
//! `frame` starts a new frame and `hand` starts a new hand within the current frame. Every other
//! non-empty line holds the normalized `x y` coordinates of one landmark, optionally followed by
//! `z`. Everything after a `#` is ignored. A frame without any `hand` line contains no hands.

use std::path::Path;

use anyhow::{bail, Context};

use crate::hand::landmark::HandLandmarks;
use crate::image::Image;
use crate::landmark::Landmark;
use crate::pipeline::{LandmarkProvider, ProviderOptions};

/// Parses fixture text into per-frame hand lists.
pub fn parse(text: &str) -> anyhow::Result<Vec<Vec<HandLandmarks>>> {
    let mut frames: Vec<Vec<Vec<Landmark>>> = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let lineno = i + 1;
        let line = match line.split_once('#') {
            Some((content, _comment)) => content,
            None => line,
        }
        .trim();

        match line {
            "" => continue,
            "frame" => frames.push(Vec::new()),
            "hand" => match frames.last_mut() {
                Some(frame) => frame.push(Vec::new()),
                None => bail!("line {lineno}: `hand` before the first `frame`"),
            },
            _ => {
                let Some(hand) = frames.last_mut().and_then(|frame| frame.last_mut()) else {
                    bail!("line {lineno}: landmark outside of a `hand`");
                };
                hand.push(parse_landmark(line).with_context(|| format!("line {lineno}"))?);
            }
        }
    }

    Ok(frames
        .into_iter()
        .map(|hands| hands.into_iter().map(HandLandmarks::new).collect())
        .collect())
}

fn parse_landmark(line: &str) -> anyhow::Result<Landmark> {
    let coords = line
        .split_whitespace()
        .map(|s| {
            s.parse::<f32>()
                .with_context(|| format!("invalid coordinate '{s}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    match coords[..] {
        [x, y] => Ok(Landmark::xy(x, y)),
        [x, y, z] => Ok(Landmark::new([x, y, z])),
        _ => bail!("expected 2 or 3 coordinates, got {}", coords.len()),
    }
}

/// A [`LandmarkProvider`] that replays recorded hands, one recorded frame per call.
///
/// Fails once every recorded frame has been returned.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    frames: std::vec::IntoIter<Vec<HandLandmarks>>,
    options: ProviderOptions,
}

impl FixtureProvider {
    pub fn new(frames: Vec<Vec<HandLandmarks>>, options: ProviderOptions) -> Self {
        log::debug!(
            "replaying {} frames (detection confidence {} and tracking confidence {} are ignored)",
            frames.len(),
            options.min_detection_confidence,
            options.min_tracking_confidence,
        );
        Self {
            frames: frames.into_iter(),
            options,
        }
    }

    /// Reads and parses the fixture file at `path`.
    pub fn load<P: AsRef<Path>>(path: P, options: ProviderOptions) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let frames = parse(&text).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Self::new(frames, options))
    }

    /// Returns the number of frames that have not been replayed yet.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkProvider for FixtureProvider {
    fn detect(&mut self, _frame: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
        let Some(mut hands) = self.frames.next() else {
            bail!("no recorded hands left");
        };
        if hands.len() > self.options.max_hands {
            log::debug!(
                "dropping {} of {} recorded hands",
                hands.len() - self.options.max_hands,
                hands.len()
            );
            hands.truncate(self.options.max_hands);
        }
        Ok(hands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_frames_and_hands() {
        let frames = parse(
            "
            # two frames
            frame
            hand
            0.1 0.2 0.3
            0.4 0.5   # no z
            hand
            1 1
            frame

            frame
            ",
        )
        .unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].len(), 2);
        assert_eq!(frames[0][0].len(), 2);
        assert_eq!(
            frames[0][0].landmarks().get(0),
            Some(Landmark::new([0.1, 0.2, 0.3]))
        );
        assert_eq!(frames[0][0].landmarks().get(1), Some(Landmark::xy(0.4, 0.5)));
        assert_eq!(frames[0][1].len(), 1);
        assert!(frames[1].is_empty());
        assert!(frames[2].is_empty());

        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn parse_errors() {
        let err = parse("hand\n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");

        let err = parse("frame\n0.1 0.2\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = parse("frame\nhand\n0.1 0.2\n0.1\n").unwrap_err();
        assert!(err.to_string().contains("line 4"), "{err}");

        assert!(parse("frame\nhand\n0.1 abc\n").is_err());
        assert!(parse("frame\nhand\n1 2 3 4\n").is_err());
    }

    #[test]
    fn provider_replays_frames() {
        let frames = parse("frame\nhand\n0 0\nhand\n1 1\nhand\n2 2\nframe\n").unwrap();
        let mut provider = FixtureProvider::new(
            frames,
            ProviderOptions {
                max_hands: 2,
                ..Default::default()
            },
        );
        let image = Image::new(1, 1);

        assert_eq!(provider.remaining(), 2);
        let hands = provider.detect(&image).unwrap();
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[1].landmarks().get(0), Some(Landmark::xy(1.0, 1.0)));
        assert!(provider.detect(&image).unwrap().is_empty());
        assert_eq!(provider.remaining(), 0);
        assert!(provider.detect(&image).is_err());
    }
}
