//! Commit-completion pacing: a submitted token is released on the first
//! boundary after submission, exactly once, and idle boundaries release
//! nothing.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use mirage_display::{CompletionSink, CompletionToken, VblankCounter, VblankStamp};
use mirage_timing::VblankEngine;
use pretty_assertions::assert_eq;

const TEST_INTERVAL: Duration = Duration::from_millis(2);
const WAIT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct RecordingCompletions {
    delivered: Mutex<Vec<(u64, VblankStamp)>>,
}

impl RecordingCompletions {
    fn snapshot(&self) -> Vec<(u64, VblankStamp)> {
        self.delivered.lock().unwrap().clone()
    }
}

impl CompletionSink for RecordingCompletions {
    fn complete(&self, token: CompletionToken, at: VblankStamp) {
        self.delivered.lock().unwrap().push((token.id(), at));
    }
}

fn harness() -> (VblankEngine, Arc<VblankCounter>, Arc<RecordingCompletions>) {
    let counter = Arc::new(VblankCounter::new());
    let completions = Arc::new(RecordingCompletions::default());
    let engine = VblankEngine::new(counter.clone(), completions.clone());
    (engine, counter, completions)
}

#[test]
fn submitted_token_is_released_exactly_once() {
    let (mut engine, counter, completions) = harness();
    engine.start(TEST_INTERVAL).unwrap();
    assert!(counter.wait_for(1, WAIT).is_some());

    let at_submit = engine.sequence();
    assert!(engine.submit(CompletionToken::new(7)).is_none());

    // Run well past the boundary that releases the token.
    assert!(counter.wait_for(at_submit + 4, WAIT).is_some());
    engine.stop();

    let delivered = completions.snapshot();
    assert_eq!(delivered.len(), 1);
    let (id, at) = delivered[0];
    assert_eq!(id, 7);
    // Released at a boundary, with that boundary's stamp, and only after the
    // token was queued.
    assert!(at.seq >= at_submit);
    assert_eq!(at.scheduled_ns % TEST_INTERVAL.as_nanos() as u64, 0);
    assert!(!engine.has_pending_commit());
}

#[test]
fn idle_boundaries_release_nothing() {
    let (mut engine, counter, completions) = harness();
    engine.start(TEST_INTERVAL).unwrap();

    // Plenty of boundaries, no commit: the counter moves, deliveries do not.
    assert!(counter.wait_for(5, WAIT).is_some());
    engine.stop();

    assert!(engine.sequence() >= 5);
    assert_eq!(completions.snapshot(), vec![]);
}

#[test]
fn token_queued_while_stopped_is_released_on_the_first_boundary_after_start() {
    let (mut engine, counter, completions) = harness();

    assert!(engine.submit(CompletionToken::new(3)).is_none());
    assert!(engine.has_pending_commit());

    // No engine, no delivery, however long we wait.
    thread::sleep(TEST_INTERVAL * 3);
    assert_eq!(completions.snapshot(), vec![]);

    engine.start(TEST_INTERVAL).unwrap();
    assert!(counter.wait_for(1, WAIT).is_some());
    engine.stop();

    let delivered = completions.snapshot();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, 3);
    assert_eq!(delivered[0].1.seq, 1);
}

#[test]
fn serialized_submits_each_deliver_exactly_once() {
    // Model the excluded serialization layer: each commit waits for the
    // previous completion before submitting the next. Every token must come
    // back exactly once, in order, on a strictly later boundary.
    let (mut engine, _counter, completions) = harness();
    engine.start(Duration::from_millis(1)).unwrap();

    let deadline = std::time::Instant::now() + WAIT;
    for i in 1..=20u64 {
        assert!(engine.submit(CompletionToken::new(i)).is_none());
        while completions.snapshot().len() < i as usize {
            assert!(
                std::time::Instant::now() < deadline,
                "timed out waiting for completion {i}"
            );
            thread::sleep(Duration::from_micros(200));
        }
    }
    engine.stop();

    let delivered = completions.snapshot();
    let ids: Vec<u64> = delivered.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
    for pair in delivered.windows(2) {
        assert!(pair[1].1.seq > pair[0].1.seq);
    }
}

#[test]
fn resubmission_before_delivery_displaces_the_earlier_token() {
    let (mut engine, counter, completions) = harness();

    assert!(engine.submit(CompletionToken::new(1)).is_none());
    let displaced = engine.submit(CompletionToken::new(2));
    assert_eq!(displaced, Some(CompletionToken::new(1)));

    engine.start(TEST_INTERVAL).unwrap();
    assert!(counter.wait_for(2, WAIT).is_some());
    engine.stop();

    // Only the newest token was ever released, and exactly once.
    let delivered = completions.snapshot();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, 2);
}
