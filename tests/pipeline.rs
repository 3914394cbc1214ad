//! Pipeline integration tests with fake providers.
//!
//! These run entirely offline: a deterministic [`FakeGenerator`] stands in
//! for the LLM and a [`FakeSynthesizer`] for the speech service, so the
//! tests exercise the real orchestration (chunking, concurrent fan-out,
//! order preservation, fail-fast, polish, stats) without any API key.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use papercast::{
    generate_from_text, Complexity, PodcastConfig, PodcastError, SpeechSynthesizer, TextGenerator,
};

// ── Fakes ────────────────────────────────────────────────────────────────────

/// Echoes a deterministic transformation of the prompt after an optional
/// per-call delay, so completion order can be scrambled on purpose.
struct FakeGenerator {
    calls: AtomicUsize,
    /// Delay applied to the Nth call (cycled), in milliseconds.
    delays_ms: Vec<u64>,
    /// Calls (1-based) that should fail instead of answering.
    fail_on_call: Option<usize>,
}

impl FakeGenerator {
    fn instant() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delays_ms: vec![0],
            fail_on_call: None,
        })
    }

    fn with_delays(delays_ms: Vec<u64>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delays_ms,
            fail_on_call: None,
        })
    }

    fn failing_on(call: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delays_ms: vec![0],
            fail_on_call: Some(call),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, PodcastError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.delays_ms[(call - 1) % self.delays_ms.len()];
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_on_call == Some(call) {
            return Err(PodcastError::LlmApiError {
                message: "simulated provider failure".to_string(),
            });
        }
        // Answer with the tail of the prompt so tests can match chunks to
        // their summaries.
        let tail: String = {
            let mut chars: Vec<char> = prompt.chars().rev().take(40).collect();
            chars.reverse();
            chars.into_iter().collect()
        };
        Ok(format!("summary of [{tail}]"))
    }
}

struct FakeSynthesizer {
    calls: AtomicUsize,
}

impl FakeSynthesizer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, transcript: &str, _voice_id: &str) -> Result<Vec<u8>, PodcastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!transcript.is_empty());
        // A fixed MP3-ish header followed by one byte per transcript char.
        let mut audio = vec![0xFF, 0xFB, 0x90, 0x00];
        audio.extend(std::iter::repeat(0xAB).take(transcript.len()));
        Ok(audio)
    }
}

fn fake_config(generator: Arc<FakeGenerator>, synthesizer: Arc<FakeSynthesizer>) -> PodcastConfig {
    PodcastConfig::builder()
        .generator(generator)
        .synthesizer(synthesizer)
        .build()
        .expect("valid config")
}

// ── End-to-end with fakes ────────────────────────────────────────────────────

#[tokio::test]
async fn short_text_runs_the_whole_pipeline_with_one_chunk() {
    let generator = FakeGenerator::instant();
    let synthesizer = FakeSynthesizer::new();
    let config = PodcastConfig::builder()
        .generator(generator.clone())
        .synthesizer(synthesizer.clone())
        .complexity("BEGINNER".parse::<Complexity>().expect("parses"))
        .build()
        .expect("valid config");

    let output = generate_from_text("A. B. C.", &config)
        .await
        .expect("pipeline should succeed");

    assert_eq!(output.stats.chunk_count, 1, "one chunk expected");
    assert_eq!(output.summaries.len(), 1, "one summary per chunk");
    assert!(!output.transcript.is_empty());
    assert!(!output.audio.is_empty(), "audio buffer must be non-empty");
    assert_eq!(output.stats.audio_bytes, output.audio.len());
    // One call per chunk plus the composition call.
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn summaries_come_back_in_chunk_order_despite_scrambled_completion() {
    // Delays chosen so later chunks finish before earlier ones.
    let generator = FakeGenerator::with_delays(vec![120, 80, 40, 5]);
    let synthesizer = FakeSynthesizer::new();

    let text = (0..12)
        .map(|i| format!("Paragraph marker-{i:02} about one distinct topic.").repeat(3))
        .collect::<Vec<_>>()
        .join("\n\n");

    let config = PodcastConfig::builder()
        .generator(generator)
        .synthesizer(synthesizer)
        .chunk_size(160)
        .chunk_overlap(10)
        .concurrency(6)
        .build()
        .expect("valid config");

    let output = generate_from_text(&text, &config)
        .await
        .expect("pipeline should succeed");

    assert!(output.stats.chunk_count > 2, "text must have split");
    assert_eq!(output.summaries.len(), output.stats.chunk_count);

    // Each summary echoes its own chunk's tail; the markers must appear in
    // ascending order across the summary list.
    let mut last = 0usize;
    for i in 0..12 {
        let marker = format!("marker-{i:02}");
        if let Some(pos) = output.summaries.iter().position(|s| s.contains(&marker)) {
            assert!(
                pos >= last,
                "summary for {marker} out of order (position {pos}, expected ≥ {last})"
            );
            last = pos;
        }
    }
}

#[tokio::test]
async fn one_failed_chunk_aborts_the_whole_batch() {
    let generator = FakeGenerator::failing_on(2);
    let synthesizer = FakeSynthesizer::new();

    let text = (0..8)
        .map(|i| format!("Section {i} with enough words to form its own chunk.").repeat(4))
        .collect::<Vec<_>>()
        .join("\n\n");

    let config = PodcastConfig::builder()
        .generator(generator)
        .synthesizer(synthesizer.clone())
        .chunk_size(200)
        .chunk_overlap(10)
        .concurrency(4)
        .build()
        .expect("valid config");

    let err = generate_from_text(&text, &config)
        .await
        .expect_err("batch must fail");

    match err {
        PodcastError::ChunkFailed { total, detail, .. } => {
            assert!(total > 1);
            assert!(detail.contains("simulated provider failure"));
        }
        other => panic!("expected ChunkFailed, got {other:?}"),
    }
    // No partial artifact: synthesis must never have been reached.
    assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_text_is_rejected_before_any_provider_call() {
    let generator = FakeGenerator::instant();
    let synthesizer = FakeSynthesizer::new();
    let config = fake_config(generator.clone(), synthesizer);

    let err = generate_from_text("", &config).await.expect_err("must fail");
    assert!(matches!(err, PodcastError::InvalidInput { .. }));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn transcript_is_polished_before_synthesis() {
    // A generator whose "transcript" (the second call) carries markdown junk.
    struct MarkdownGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for MarkdownGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, PodcastError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == 1 {
                Ok("a plain chunk summary".to_string())
            } else {
                Ok("```\n# Welcome\n1. The paper matters.\n```".to_string())
            }
        }
    }

    let config = PodcastConfig::builder()
        .generator(Arc::new(MarkdownGenerator {
            calls: AtomicUsize::new(0),
        }))
        .synthesizer(FakeSynthesizer::new())
        .build()
        .expect("valid config");

    let output = generate_from_text("Some paper text.", &config)
        .await
        .expect("pipeline should succeed");

    assert!(!output.transcript.contains("```"));
    assert!(!output.transcript.contains('#'));
    assert!(!output.transcript.contains("1. "));
    assert!(output.transcript.contains("The paper matters."));
}

#[tokio::test]
async fn stats_cover_every_stage() {
    let generator = FakeGenerator::instant();
    let synthesizer = FakeSynthesizer::new();
    let config = fake_config(generator, synthesizer);

    let text = "A short but complete document about an interesting result.";
    let output = generate_from_text(text, &config)
        .await
        .expect("pipeline should succeed");

    assert_eq!(output.stats.extracted_chars, text.chars().count());
    assert!(output.stats.transcript_chars > 0);
    assert!(output.stats.audio_bytes > 0);
    assert_eq!(output.stats.chunk_count, output.summaries.len());
}

// ── Progress events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn progress_callback_sees_all_stages_and_chunks() {
    use papercast::{PipelineStage, PodcastProgressCallback};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        stages: Mutex<Vec<PipelineStage>>,
        summaries: AtomicUsize,
        completed: AtomicUsize,
    }

    impl PodcastProgressCallback for Recorder {
        fn on_stage_start(&self, stage: PipelineStage) {
            self.stages.lock().unwrap().push(stage);
        }
        fn on_summary_complete(&self, _index: usize, _total: usize, _len: usize) {
            self.summaries.fetch_add(1, Ordering::SeqCst);
        }
        fn on_pipeline_complete(&self, _chunks: usize, _bytes: usize) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    let recorder = Arc::new(Recorder::default());
    let config = PodcastConfig::builder()
        .generator(FakeGenerator::instant())
        .synthesizer(FakeSynthesizer::new())
        .progress_callback(recorder.clone())
        .build()
        .expect("valid config");

    let output = generate_from_text("A small document.", &config)
        .await
        .expect("pipeline should succeed");

    let stages = recorder.stages.lock().unwrap().clone();
    // generate_from_text skips extraction; the remaining stages run in order.
    assert_eq!(
        stages,
        vec![
            PipelineStage::Chunking,
            PipelineStage::Summarizing,
            PipelineStage::Composing,
            PipelineStage::Synthesizing,
        ]
    );
    assert_eq!(
        recorder.summaries.load(Ordering::SeqCst),
        output.stats.chunk_count
    );
    assert_eq!(recorder.completed.load(Ordering::SeqCst), 1);
}
