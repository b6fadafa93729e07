//! Streaming transcription demo.
//!
//! Reads a 16-bit PCM WAV file and feeds it through the pipeline in small
//! chunks, printing intermediate transcripts along the way and the final
//! transcript at the end. Runs on the stub acoustic model with the built-in
//! MFCC frontend and greedy decoder, so the output demonstrates the
//! streaming machinery rather than real recognition quality.
//!
//! Usage: `transcribe <file.wav> [--chunk-ms N] [--intermediate-every N]`

use std::path::{Path, PathBuf};

use verbatim_core::{
    BeamParams, GreedyDecoder, MfccExtractor, ModelConfig, Recognizer, StubAcousticModel,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("transcribe failed: {e}");
        std::process::exit(1);
    }
}

struct Args {
    wav: PathBuf,
    chunk_ms: usize,
    intermediate_every: usize,
}

fn parse_args() -> Result<Args, String> {
    let mut wav: Option<PathBuf> = None;
    let mut chunk_ms = 100usize;
    let mut intermediate_every = 10usize;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--chunk-ms" => {
                let Some(v) = it.next() else {
                    return Err("missing value for --chunk-ms".into());
                };
                chunk_ms = v.parse().map_err(|e| format!("bad --chunk-ms: {e}"))?;
            }
            "--intermediate-every" => {
                let Some(v) = it.next() else {
                    return Err("missing value for --intermediate-every".into());
                };
                intermediate_every = v
                    .parse()
                    .map_err(|e| format!("bad --intermediate-every: {e}"))?;
            }
            other if wav.is_none() => wav = Some(PathBuf::from(other)),
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    Ok(Args {
        wav: wav.ok_or("usage: transcribe <file.wav> [--chunk-ms N] [--intermediate-every N]")?,
        chunk_ms: chunk_ms.max(1),
        intermediate_every: intermediate_every.max(1),
    })
}

fn read_mono_samples(path: &Path) -> Result<(Vec<i16>, u32), String> {
    let mut reader = hound::WavReader::open(path).map_err(|e| format!("open {path:?}: {e}"))?;
    let spec = reader.spec();
    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(format!(
            "expected 16-bit integer PCM, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        ));
    }

    let interleaved: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .map_err(|e| format!("read samples: {e}"))?;

    let channels = spec.channels as usize;
    let mono = if channels <= 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| (frame.iter().map(|&s| s as i32).sum::<i32>() / channels as i32) as i16)
            .collect()
    };

    Ok((mono, spec.sample_rate))
}

fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;
    let (samples, sample_rate) = read_mono_samples(&args.wav)?;
    let seconds = samples.len() as f64 / sample_rate as f64;
    println!(
        "{}: {} samples at {} Hz ({seconds:.2} s)",
        args.wav.display(),
        samples.len(),
        sample_rate
    );

    let config = ModelConfig {
        sample_rate,
        ..ModelConfig::default()
    };
    if sample_rate != 16_000 {
        // Window/hop stay at their 16 kHz defaults; fine for a stub demo.
        eprintln!("warning: {sample_rate} Hz input, pipeline tuned for 16000 Hz");
    }

    let extractor = MfccExtractor::new(config.sample_rate, config.feature_width);
    let model = StubAcousticModel::new(config.clone());
    let decoder = GreedyDecoder::english();

    let mut recognizer = Recognizer::new(
        Box::new(model),
        Box::new(extractor),
        Box::new(decoder),
        BeamParams::default(),
    )
    .map_err(|e| e.to_string())?;

    let chunk_len = (config.sample_rate as usize * args.chunk_ms / 1000).max(1);
    let mut stream = recognizer.create_stream().map_err(|e| e.to_string())?;

    for (i, chunk) in samples.chunks(chunk_len).enumerate() {
        stream.feed(chunk).map_err(|e| e.to_string())?;
        if (i + 1) % args.intermediate_every == 0 {
            let partial = stream.intermediate_decode().map_err(|e| e.to_string())?;
            println!(
                "[{:6.2}s] {} frames: {partial:?}",
                (i + 1) as f64 * args.chunk_ms as f64 / 1000.0,
                stream.accumulated_frames()
            );
        }
    }

    let transcript = stream.finish().map_err(|e| e.to_string())?;
    println!("final: {transcript:?}");
    Ok(())
}
