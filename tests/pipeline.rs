use std::{
    cell::Cell,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use fingerban::{
    capture::{self, Control, FrameSink, FrameSource, FrameStatus},
    config::Config,
    fixture::{self, FixtureProvider},
    hand::gesture::{classify, Verdict},
    hand::landmark::HandLandmarks,
    image::{Color, Image},
    landmark::Landmark,
    pipeline::{DetectionSession, LandmarkProvider, Pipeline},
    redact::Redaction,
};

/// Every landmark at the center, with the given (tip, pip) heights for index, middle, ring and
/// pinky fingers.
fn hand(fingers: [(f32, f32); 4]) -> HandLandmarks {
    let mut lms = vec![Landmark::xy(0.5, 0.5); HandLandmarks::NUM_LANDMARKS];
    for ((tip, pip), (t, p)) in [(8, 6), (12, 10), (16, 14), (20, 18)].into_iter().zip(fingers) {
        lms[tip] = Landmark::xy(0.45, t);
        lms[pip] = Landmark::xy(0.55, p);
    }
    HandLandmarks::new(lms)
}

/// Middle finger extended, all others folded.
fn scenario_a() -> HandLandmarks {
    hand([(0.58, 0.50), (0.15, 0.25), (0.58, 0.50), (0.60, 0.53)])
}

/// Index and middle fingers extended.
fn scenario_b() -> HandLandmarks {
    hand([(0.35, 0.45), (0.35, 0.45), (0.58, 0.50), (0.60, 0.53)])
}

fn frame(width: u32, height: u32) -> Image {
    let mut image = Image::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 7 + y * 13) % 256) as u8;
            image.set(x, y, Color::from_rgb8(v, 255 - v, v / 2));
        }
    }
    image
}

struct Frames {
    frames: Vec<Image>,
    released: Rc<Cell<u32>>,
}

impl FrameSource for Frames {
    fn read(&mut self) -> anyhow::Result<Option<Image>> {
        Ok(if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        })
    }

    fn release(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

struct FailingSource;

impl FrameSource for FailingSource {
    fn read(&mut self) -> anyhow::Result<Option<Image>> {
        anyhow::bail!("device unplugged")
    }
}

/// Records statuses and replays scripted controls.
#[derive(Default)]
struct Recorder {
    controls: Vec<Option<Control>>,
    statuses: Vec<FrameStatus>,
    frames: Vec<Image>,
}

impl FrameSink for Recorder {
    fn show(&mut self, frame: &Image, status: &FrameStatus) -> anyhow::Result<Option<Control>> {
        self.statuses.push(*status);
        self.frames.push(frame.clone());
        Ok(if self.controls.is_empty() {
            None
        } else {
            self.controls.remove(0)
        })
    }
}

struct Replay(Vec<Vec<HandLandmarks>>);

impl LandmarkProvider for Replay {
    fn detect(&mut self, _: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
        anyhow::ensure!(!self.0.is_empty(), "no hands left");
        Ok(self.0.remove(0))
    }
}

fn source(count: usize, released: &Rc<Cell<u32>>) -> Frames {
    Frames {
        frames: (0..count).map(|_| frame(160, 120)).collect(),
        released: released.clone(),
    }
}

#[test]
fn scenarios() {
    assert_eq!(classify(&scenario_a()), Verdict::Flagged);
    assert_eq!(classify(&scenario_b()), Verdict::Normal);
}

#[test]
fn flagged_frame_is_redacted_in_place() {
    let config = Config::default().padding(10);
    let mut pipeline = Pipeline::new(Replay(vec![vec![scenario_a()]]), &config);
    let mut session = DetectionSession::new();
    let mut image = frame(200, 200);
    let orig = image.clone();

    let report = pipeline.process(&mut image, &mut session);
    assert_eq!(report.hands.len(), 1);
    assert_eq!(report.hands[0].verdict, Verdict::Flagged);
    let Some(Redaction::Applied(rect)) = report.hands[0].redaction else {
        panic!("hand was not redacted: {:?}", report);
    };
    assert_eq!(image.resolution(), orig.resolution());
    assert_eq!(session.detections(), 1);

    // Pixels far away from the hand and the warning text are untouched.
    for (x, y) in [(0, 199), (199, 199), (5, 150)] {
        assert!(!rect.contains(x, y));
        assert_eq!(image.get(x as u32, y as u32), orig.get(x as u32, y as u32));
    }
}

#[test]
fn session_counts_flagged_frames() {
    let released = Rc::new(Cell::new(0));
    let mut source = source(4, &released);
    let hands = vec![
        vec![scenario_a(), scenario_a()],
        vec![scenario_b()],
        vec![],
        vec![scenario_b(), scenario_a()],
    ];
    let config = Config::default();
    let mut pipeline = Pipeline::new(Replay(hands), &config);
    let mut sink = Recorder::default();

    let session = capture::run(&mut source, &mut pipeline, &mut sink, &config).unwrap();
    assert_eq!(session.detections(), 2);
    assert_eq!(
        sink.statuses
            .iter()
            .map(|s| (s.any_flagged, s.detections))
            .collect::<Vec<_>>(),
        [(true, 1), (false, 1), (false, 1), (true, 2)]
    );
    assert_eq!(released.get(), 1);
    for frame in &sink.frames {
        assert_eq!((frame.width(), frame.height()), (160, 120));
    }
}

#[test]
fn reset_and_quit() {
    let released = Rc::new(Cell::new(0));
    let mut source = source(10, &released);
    let config = Config::default();
    let mut pipeline = Pipeline::new(Replay(vec![vec![scenario_a()]; 10]), &config);
    let mut sink = Recorder {
        controls: vec![None, Some(Control::ResetCounter), None, Some(Control::Quit)],
        ..Default::default()
    };

    let session = capture::run(&mut source, &mut pipeline, &mut sink, &config).unwrap();
    assert_eq!(
        sink.statuses.iter().map(|s| s.detections).collect::<Vec<_>>(),
        [1, 2, 1, 2]
    );
    assert_eq!(session.detections(), 2);
    assert_eq!(source.frames.len(), 6);
    assert_eq!(released.get(), 1);
}

#[test]
fn read_failure_stops_the_loop() {
    let config = Config::default();
    let mut pipeline = Pipeline::new(Replay(vec![]), &config);
    let mut sink = Recorder::default();
    let session = capture::run(&mut FailingSource, &mut pipeline, &mut sink, &config).unwrap();
    assert_eq!(session.detections(), 0);
    assert!(sink.statuses.is_empty());
}

#[test]
fn sink_failure_releases_source() {
    struct Broken;

    impl FrameSink for Broken {
        fn show(&mut self, _: &Image, _: &FrameStatus) -> anyhow::Result<Option<Control>> {
            anyhow::bail!("window closed")
        }
    }

    let released = Rc::new(Cell::new(0));
    let mut source = source(3, &released);
    let config = Config::default();
    let mut pipeline = Pipeline::new(Replay(vec![vec![]; 3]), &config);
    assert!(capture::run(&mut source, &mut pipeline, &mut Broken, &config).is_err());
    assert_eq!(released.get(), 1);
}

#[test]
fn panic_in_loop_releases_source() {
    struct Panicking;

    impl LandmarkProvider for Panicking {
        fn detect(&mut self, _: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
            panic!("estimator crashed");
        }
    }

    let released = Rc::new(Cell::new(0));
    let mut source = source(3, &released);
    let config = Config::default();
    let mut pipeline = Pipeline::new(Panicking, &config);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        capture::run(&mut source, &mut pipeline, &mut Recorder::default(), &config)
    }));
    assert!(result.is_err());
    assert_eq!(released.get(), 1);
}

#[test]
fn mirroring_flips_before_detection() {
    struct LeftEdge;

    impl LandmarkProvider for LeftEdge {
        fn detect(&mut self, frame: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
            assert_eq!(frame.get(0, 0), Color::BLUE);
            Ok(Vec::new())
        }
    }

    let mut image = Image::new(40, 40);
    image.set(39, 0, Color::BLUE);
    let released = Rc::new(Cell::new(0));
    let mut source = Frames {
        frames: vec![image],
        released,
    };
    let config = Config::default().mirror(true);
    let mut pipeline = Pipeline::new(LeftEdge, &config);
    capture::run(&mut source, &mut pipeline, &mut Recorder::default(), &config).unwrap();
}

#[test]
fn fixture_replay() {
    let mut text = String::from("# scenario A, then nothing, then scenario B\nframe\nhand\n");
    for lm in scenario_a().landmarks().iter() {
        text += &format!("{} {} {}\n", lm.x(), lm.y(), lm.z());
    }
    text += "frame\nframe\nhand\n";
    for lm in scenario_b().landmarks().iter() {
        text += &format!("{} {}\n", lm.x(), lm.y());
    }

    let frames = fixture::parse(&text).unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0][0], scenario_a());

    let config = Config::default().mirror(false);
    let mut source = source(3, &Rc::new(Cell::new(0)));
    let mut pipeline = Pipeline::new(FixtureProvider::new(frames, config.provider), &config);
    let mut sink = Recorder::default();
    let session = capture::run(&mut source, &mut pipeline, &mut sink, &config).unwrap();
    assert_eq!(session.detections(), 1);
    assert_eq!(
        sink.statuses.iter().map(|s| s.any_flagged).collect::<Vec<_>>(),
        [true, false, false]
    );
}
