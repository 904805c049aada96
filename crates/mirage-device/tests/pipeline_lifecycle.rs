//! Pipeline activation state machine: Inactive <-> Active, re-entrant
//! activation rejected, disable drains synchronously, repeated cycles stay
//! monotonic.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mirage_display::{CompletionSink, CompletionToken, VblankCounter, VblankStamp};
use mirage_device::{OutputPipeline, PipelineError, PipelineState};
use pretty_assertions::assert_eq;

const TEST_INTERVAL: Duration = Duration::from_millis(2);
const WAIT: Duration = Duration::from_secs(10);

struct DropCompletions;

impl CompletionSink for DropCompletions {
    fn complete(&self, _token: CompletionToken, _at: VblankStamp) {}
}

fn pipeline_with_counter() -> (OutputPipeline, Arc<VblankCounter>) {
    let counter = Arc::new(VblankCounter::new());
    let pipeline = OutputPipeline::new(TEST_INTERVAL, counter.clone(), Arc::new(DropCompletions));
    (pipeline, counter)
}

#[test]
fn starts_inactive_and_silent() {
    let (pipeline, counter) = pipeline_with_counter();
    assert_eq!(pipeline.state(), PipelineState::Inactive);

    // A full interval plus margin with zero boundaries.
    thread::sleep(TEST_INTERVAL * 3);
    assert_eq!(pipeline.vblank_sequence(), 0);
    assert_eq!(counter.sequence(), 0);
}

#[test]
fn enable_while_active_is_rejected() {
    let (mut pipeline, counter) = pipeline_with_counter();
    pipeline.enable().unwrap();
    assert_eq!(pipeline.state(), PipelineState::Active);

    assert!(matches!(
        pipeline.enable(),
        Err(PipelineError::AlreadyActive)
    ));

    // The rejection does not disturb the running simulation.
    assert!(counter.wait_for(2, WAIT).is_some());
    pipeline.disable();
}

#[test]
fn disable_drains_before_returning() {
    let (mut pipeline, counter) = pipeline_with_counter();
    pipeline.enable().unwrap();
    assert!(counter.wait_for(2, WAIT).is_some());

    pipeline.disable();
    assert_eq!(pipeline.state(), PipelineState::Inactive);

    // Any in-flight fire finished inside disable(); from here the counter
    // can never move until the next enable.
    let frozen = pipeline.vblank_sequence();
    thread::sleep(TEST_INTERVAL * 5);
    assert_eq!(pipeline.vblank_sequence(), frozen);
    assert_eq!(counter.sequence(), frozen);
}

#[test]
fn disable_when_inactive_is_a_noop() {
    let (mut pipeline, _counter) = pipeline_with_counter();
    pipeline.disable();
    pipeline.disable();
    assert_eq!(pipeline.state(), PipelineState::Inactive);
}

#[test]
fn repeated_cycles_keep_the_counter_monotonic_without_catch_up() {
    let (mut pipeline, counter) = pipeline_with_counter();

    let mut last = 0;
    for _ in 0..3 {
        pipeline.enable().unwrap();
        let stamp = counter.wait_for(last + 2, WAIT).expect("cadence resumes");
        assert!(stamp.seq > last);
        pipeline.disable();

        let frozen = pipeline.vblank_sequence();
        assert!(frozen >= stamp.seq);

        // Time passing while inactive is never caught up on re-enable.
        thread::sleep(TEST_INTERVAL * 3);
        assert_eq!(pipeline.vblank_sequence(), frozen);
        last = frozen;
    }
}
