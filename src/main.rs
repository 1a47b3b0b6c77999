//! Redacts flagged hands in a still image, using hand landmarks recorded in a fixture file.
//!
//! Usage: `fingerban <image> <landmarks.txt> [out-dir]`
//!
//! The image is processed once for every frame in the fixture, and each processed frame is written
//! to `out-dir` (default `out`) as `frame_NNNN.png`.

use std::env;

use anyhow::bail;
use fingerban::capture::{self, PngSink, StillImage};
use fingerban::config::Config;
use fingerban::fixture::FixtureProvider;
use fingerban::pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    fingerban::init_logger!();

    let args = env::args().skip(1).collect::<Vec<_>>();
    let (image, fixture, out_dir) = match &args[..] {
        [image, fixture] => (image, fixture, "out"),
        [image, fixture, out_dir] => (image, fixture, out_dir.as_str()),
        _ => bail!("usage: fingerban <image> <landmarks.txt> [out-dir]"),
    };

    let config = Config::from_env()?;
    log::debug!("{:?}", config);

    let provider = FixtureProvider::load(fixture, config.provider)?;
    let mut source = StillImage::load(image, provider.remaining())?;
    let mut sink = PngSink::new(out_dir)?;
    let mut pipeline = Pipeline::new(provider, &config);

    let session = capture::run(&mut source, &mut pipeline, &mut sink, &config)?;
    log::info!(
        "processed {} frames, {} with flagged gestures",
        sink.frames(),
        session.detections()
    );
    Ok(())
}
