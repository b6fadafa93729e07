//! End-to-end properties of the streaming pipeline: chunk-boundary
//! independence, gate arithmetic, flush completeness and error surfacing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ndarray::ArrayView2;

use verbatim_core::{
    AcousticModel, BeamParams, DecodeCandidate, FeatureExtractor, GreedyDecoder, LabelDecoder,
    ModelConfig, Recognizer, Scorer, StubAcousticModel, VerbatimError,
};

fn test_config() -> ModelConfig {
    ModelConfig {
        sample_rate: 16_000,
        window_len: 400,
        hop_len: 160,
        feature_width: 2,
        context: 2,
        batch_size: 3,
        class_count: 4,
    }
}

fn test_decoder() -> Box<GreedyDecoder> {
    Box::new(GreedyDecoder::new(vec!["a".into(), "b".into(), "c".into()]))
}

/// Deterministic audio that exercises varied feature values.
fn test_samples(len: usize) -> Vec<i16> {
    (0..len).map(|i| ((i * 37) % 331) as i16 - 165).collect()
}

/// Feature vector = [mean, peak], counting every extraction.
struct CountingExtractor {
    calls: Rc<Cell<usize>>,
}

impl CountingExtractor {
    fn new() -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl FeatureExtractor for CountingExtractor {
    fn feature_width(&self) -> usize {
        2
    }

    fn extract(&mut self, window: &[f32]) -> Vec<f32> {
        self.calls.set(self.calls.get() + 1);
        let mean = window.iter().sum::<f32>() / window.len().max(1) as f32;
        let peak = window.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        vec![mean, peak]
    }
}

/// Stub-logit model that records every inference call's frame count.
struct LoggingModel {
    inner: StubAcousticModel,
    frame_counts: Rc<RefCell<Vec<usize>>>,
    resets: Rc<Cell<usize>>,
}

impl LoggingModel {
    #[allow(clippy::type_complexity)]
    fn new(config: ModelConfig) -> (Self, Rc<RefCell<Vec<usize>>>, Rc<Cell<usize>>) {
        let frame_counts = Rc::new(RefCell::new(Vec::new()));
        let resets = Rc::new(Cell::new(0));
        (
            Self {
                inner: StubAcousticModel::new(config),
                frame_counts: Rc::clone(&frame_counts),
                resets: Rc::clone(&resets),
            },
            frame_counts,
            resets,
        )
    }
}

impl AcousticModel for LoggingModel {
    fn config(&self) -> &ModelConfig {
        self.inner.config()
    }

    fn reset_state(&mut self) -> Result<(), VerbatimError> {
        self.resets.set(self.resets.get() + 1);
        self.inner.reset_state()
    }

    fn infer(&mut self, features: &[f32], frame_count: usize) -> Result<Vec<f32>, VerbatimError> {
        self.frame_counts.borrow_mut().push(frame_count);
        self.inner.infer(features, frame_count)
    }
}

fn stub_recognizer(config: ModelConfig) -> Recognizer {
    Recognizer::new(
        Box::new(StubAcousticModel::new(config)),
        Box::new(CountingExtractor::new().0),
        test_decoder(),
        BeamParams::default(),
    )
    .expect("recognizer")
}

#[test]
fn chunk_boundary_independence() {
    let samples = test_samples(16_000);

    let mut reference = stub_recognizer(test_config());
    let mut stream = reference.create_stream().expect("stream");
    stream.feed(&samples).expect("feed");
    let reference_logits = stream.accumulated_logits().to_vec();
    let reference_text = stream.finish().expect("finish");

    for chunk_len in [1usize, 7, 160, 399, 400, 401, 2048, 15_999] {
        let mut recognizer = stub_recognizer(test_config());
        let mut stream = recognizer.create_stream().expect("stream");
        for chunk in samples.chunks(chunk_len) {
            stream.feed(chunk).expect("feed");
        }
        assert_eq!(
            stream.accumulated_logits(),
            &reference_logits[..],
            "pre-finish logits diverged at chunk_len={chunk_len}"
        );
        let text = stream.finish().expect("finish");
        assert_eq!(text, reference_text, "transcript diverged at chunk_len={chunk_len}");
    }
}

#[test]
fn parity_gate_extracts_every_other_window() {
    let (extractor, calls) = CountingExtractor::new();
    let mut recognizer = Recognizer::new(
        Box::new(StubAcousticModel::new(test_config())),
        Box::new(extractor),
        test_decoder(),
        BeamParams::default(),
    )
    .expect("recognizer");
    let mut stream = recognizer.create_stream().expect("stream");

    // First 400 zero samples: one window completion, gate emits.
    stream.feed(&vec![0i16; 400]).expect("feed");
    assert_eq!(calls.get(), 1);

    // Next 400: completions at samples 560 and 720 (the window refills
    // every hop). The gate skips the 2nd and emits on the 3rd — two
    // extractions after 800 samples.
    stream.feed(&vec![0i16; 400]).expect("feed");
    assert_eq!(calls.get(), 2);

    // Eight completions total → four extractions.
    let (extractor, calls) = CountingExtractor::new();
    let mut recognizer = Recognizer::new(
        Box::new(StubAcousticModel::new(test_config())),
        Box::new(extractor),
        test_decoder(),
        BeamParams::default(),
    )
    .expect("recognizer");
    let mut stream = recognizer.create_stream().expect("stream");
    stream.feed(&test_samples(400 + 160 * 7)).expect("feed");
    assert_eq!(calls.get(), 4);
}

#[test]
fn finish_flushes_partial_batch_with_true_frame_count() {
    // Large batch size so nothing dispatches before finish.
    let config = ModelConfig {
        batch_size: 50,
        ..test_config()
    };
    let (model, frame_counts, _) = LoggingModel::new(config);
    let (extractor, calls) = CountingExtractor::new();
    let mut recognizer = Recognizer::new(
        Box::new(model),
        Box::new(extractor),
        test_decoder(),
        BeamParams::default(),
    )
    .expect("recognizer");

    let mut stream = recognizer.create_stream().expect("stream");
    stream.feed(&test_samples(1200)).expect("feed");
    assert!(frame_counts.borrow().is_empty(), "nothing should dispatch yet");

    stream.finish().expect("finish");

    // Every extracted frame becomes the center of exactly one timestep, so
    // the single ragged batch carries as many frames as extractions.
    let extracted = calls.get();
    assert!(extracted > 0);
    assert_eq!(*frame_counts.borrow(), vec![extracted]);
}

#[test]
fn intermediate_decode_is_idempotent_and_non_mutating() {
    let mut recognizer = stub_recognizer(test_config());
    let mut stream = recognizer.create_stream().expect("stream");
    stream.feed(&test_samples(8_000)).expect("feed");

    let frames_before = stream.accumulated_frames();
    let first = stream.intermediate_decode().expect("decode");
    let second = stream.intermediate_decode().expect("decode");
    assert_eq!(first, second);
    assert_eq!(stream.accumulated_frames(), frames_before);

    // The stream remains feedable afterwards.
    stream.feed(&test_samples(4_000)).expect("feed");
    stream.finish().expect("finish");
}

#[test]
fn intermediate_decode_before_any_inference_is_empty() {
    let mut recognizer = stub_recognizer(test_config());
    let stream = recognizer.create_stream().expect("stream");
    assert_eq!(stream.intermediate_decode().expect("decode"), "");
}

#[test]
fn one_shot_transcribe_matches_manual_stream() {
    let samples = test_samples(12_000);

    let mut manual = stub_recognizer(test_config());
    let mut stream = manual.create_stream().expect("stream");
    stream.feed(&samples).expect("feed");
    let expected = stream.finish().expect("finish");

    let mut one_shot = stub_recognizer(test_config());
    assert_eq!(one_shot.transcribe(&samples).expect("transcribe"), expected);
}

#[test]
fn model_state_is_reset_once_per_stream() {
    let (model, _, resets) = LoggingModel::new(test_config());
    let mut recognizer = Recognizer::new(
        Box::new(model),
        Box::new(CountingExtractor::new().0),
        test_decoder(),
        BeamParams::default(),
    )
    .expect("recognizer");

    recognizer.transcribe(&test_samples(4_000)).expect("first");
    recognizer.transcribe(&test_samples(4_000)).expect("second");
    assert_eq!(resets.get(), 2);
}

struct FailingModel {
    config: ModelConfig,
}

impl AcousticModel for FailingModel {
    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn reset_state(&mut self) -> Result<(), VerbatimError> {
        Ok(())
    }

    fn infer(&mut self, _features: &[f32], _frame_count: usize) -> Result<Vec<f32>, VerbatimError> {
        Err(VerbatimError::Inference("backend exploded".into()))
    }
}

#[test]
fn inference_failure_surfaces_from_feed() {
    let config = ModelConfig {
        context: 0,
        batch_size: 1,
        ..test_config()
    };
    let mut recognizer = Recognizer::new(
        Box::new(FailingModel { config }),
        Box::new(CountingExtractor::new().0),
        test_decoder(),
        BeamParams::default(),
    )
    .expect("recognizer");

    let mut stream = recognizer.create_stream().expect("stream");
    // One full window → one frame → one single-timestep batch → inference.
    let err = stream.feed(&test_samples(400)).unwrap_err();
    assert!(matches!(err, VerbatimError::Inference(_)), "{err}");
}

struct SilentDecoder;

impl LabelDecoder for SilentDecoder {
    fn decode(
        &self,
        _frames: ArrayView2<'_, f32>,
        _params: &BeamParams,
        _scorer: Option<&dyn Scorer>,
    ) -> Vec<DecodeCandidate> {
        Vec::new()
    }
}

#[test]
fn empty_decoder_result_is_an_error() {
    let mut recognizer = Recognizer::new(
        Box::new(StubAcousticModel::new(test_config())),
        Box::new(CountingExtractor::new().0),
        Box::new(SilentDecoder),
        BeamParams::default(),
    )
    .expect("recognizer");

    let err = recognizer.transcribe(&test_samples(8_000)).unwrap_err();
    assert!(matches!(err, VerbatimError::EmptyDecode { .. }), "{err}");
}

struct RecordingDecoder {
    saw_scorer: Rc<Cell<bool>>,
}

impl LabelDecoder for RecordingDecoder {
    fn decode(
        &self,
        _frames: ArrayView2<'_, f32>,
        _params: &BeamParams,
        scorer: Option<&dyn Scorer>,
    ) -> Vec<DecodeCandidate> {
        self.saw_scorer.set(scorer.is_some());
        vec![DecodeCandidate {
            score: 0.0,
            transcript: "ok".into(),
        }]
    }
}

struct FlatScorer;

impl Scorer for FlatScorer {
    fn score(&self, _labels: &[usize]) -> f32 {
        0.0
    }
}

#[test]
fn attached_scorer_reaches_the_decoder() {
    let saw_scorer = Rc::new(Cell::new(false));
    let mut recognizer = Recognizer::new(
        Box::new(StubAcousticModel::new(test_config())),
        Box::new(CountingExtractor::new().0),
        Box::new(RecordingDecoder {
            saw_scorer: Rc::clone(&saw_scorer),
        }),
        BeamParams::default(),
    )
    .expect("recognizer");

    recognizer.set_scorer(Some(Box::new(FlatScorer)));
    let text = recognizer.transcribe(&test_samples(8_000)).expect("transcribe");
    assert_eq!(text, "ok");
    assert!(saw_scorer.get());
}
