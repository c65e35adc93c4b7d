//! Simulator Pipeline Tests.
//!
//! Verifies the shared hit/miss/evict/install sequence for every policy: hit handling,
//! capacity, victim choice, dirty-bit and swap-space bookkeeping, counters, and the
//! streaming versus batch entry points.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::TestContext;
use vmsim_core::common::{AccessRecord, FrameNumber, Operation, PageNumber, SimError, TraceError};
use vmsim_core::mem::{FrameTable, PageState};
use vmsim_core::policies::ReplacementPolicy as VictimSelection;
use vmsim_core::sim::{Eviction, Outcome};
use vmsim_core::{Config, ReplacementPolicy, Simulator};

use vmsim_core::ReplacementPolicy::{Fifo, Lru, Optimal};

// ══════════════════════════════════════════════════════════
// 1. Hits, misses, and free frames
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(Fifo)]
#[case(Lru)]
#[case(Optimal)]
fn cold_misses_fill_frames_in_order(#[case] policy: ReplacementPolicy) {
    let mut ctx = TestContext::new(policy, 3, 8);
    let outcomes = ctx.run("r5 r2 r7");

    assert_eq!(
        outcomes,
        vec![
            Outcome::Miss {
                frame: FrameNumber(0),
                eviction: None,
            },
            Outcome::Miss {
                frame: FrameNumber(1),
                eviction: None,
            },
            Outcome::Miss {
                frame: FrameNumber(2),
                eviction: None,
            },
        ]
    );
    assert_eq!(ctx.resident(), vec![Some(5), Some(2), Some(7)]);
    assert_eq!(ctx.sim.stats().page_miss_instances, 3);
    assert_eq!(ctx.sim.stats().frame_stolen_instances, 0);
    ctx.assert_consistent();
}

#[rstest]
#[case(Fifo)]
#[case(Lru)]
fn hit_changes_only_the_touched_frame(#[case] policy: ReplacementPolicy) {
    let mut ctx = TestContext::new(policy, 3, 6);
    let _ = ctx.run("r0 r1 r2 r3");

    let pages_before: Vec<_> = ctx.sim.page_table().iter().cloned().collect();
    let frames_before: Vec<_> = ctx.sim.frame_table().iter().cloned().collect();
    let resident_frame = ctx.sim.frame_table().find_page(PageNumber(2)).unwrap();

    let outcome = ctx.sim.access(Operation::Write, PageNumber(2)).unwrap();
    assert_eq!(outcome, Outcome::Hit { frame: resident_frame });

    let pages_after: Vec<_> = ctx.sim.page_table().iter().cloned().collect();
    assert_eq!(pages_before, pages_after);

    for (before, after) in frames_before.iter().zip(ctx.sim.frame_table().iter()) {
        assert_eq!(before.resident_page, after.resident_page);
        assert_eq!(before.load_time, after.load_time);
        if after.number == resident_frame {
            assert_eq!(after.last_access_time, 5);
            assert!(after.dirty);
        } else {
            assert_eq!(before, after);
        }
    }
    assert_eq!(ctx.sim.frame_table().occupied_count(), 3);
    ctx.assert_consistent();
}

#[test]
fn reads_never_set_the_dirty_bit() {
    let mut ctx = TestContext::new(Lru, 2, 4);
    let _ = ctx.run("r0 r0 r1");
    assert!(ctx.sim.frame_table().iter().all(|f| !f.dirty));

    let _ = ctx.run("w1");
    let frame = ctx.sim.frame_table().find_page(PageNumber(1)).unwrap();
    assert!(ctx.sim.frame_table().get(frame).unwrap().dirty);
}

#[rstest]
#[case(Fifo, 1)]
#[case(Fifo, 3)]
#[case(Lru, 2)]
#[case(Optimal, 4)]
fn occupied_frames_never_exceed_capacity(#[case] policy: ReplacementPolicy, #[case] frames: usize) {
    let mut ctx = TestContext::new(policy, frames, 8);
    let _ = ctx.run("r0 w1 r2 r3 w4 r5 r6 r7 r0 w3 r7 r1 r2");
    assert_eq!(ctx.sim.frame_table().occupied_count(), frames.min(8));
    ctx.assert_consistent();
}

// ══════════════════════════════════════════════════════════
// 2. Victim selection through the full pipeline
// ══════════════════════════════════════════════════════════

#[test]
fn fifo_single_frame_evicts_on_every_miss() {
    let mut ctx = TestContext::new(Fifo, 1, 4);
    let outcomes = ctx.run("r0 r1 r1 r2 r0");

    let evicted: Vec<_> = outcomes
        .iter()
        .filter_map(|o| o.eviction().map(|e| e.victim.index()))
        .collect();
    assert_eq!(evicted, vec![0, 1, 2]);

    let frame = ctx.sim.frame_table().get(FrameNumber(0)).unwrap();
    assert_eq!(frame.resident_page, Some(PageNumber(0)));
    assert_eq!(frame.load_time, 5);
    assert_eq!(ctx.sim.stats().frame_stolen_instances, 3);
    ctx.assert_consistent();
}

#[test]
fn fifo_ignores_hits_when_choosing_victim() {
    let mut ctx = TestContext::new(Fifo, 2, 4);
    let outcomes = ctx.run("r0 r1 r0 r2");
    assert_eq!(outcomes[3].eviction().unwrap().victim, PageNumber(0));
    assert_eq!(ctx.resident(), vec![Some(2), Some(1)]);
}

#[test]
fn lru_evicts_least_recently_used() {
    // A, B, A, then C: A was used more recently, so B goes.
    let mut ctx = TestContext::new(Lru, 2, 4);
    let outcomes = ctx.run("r0 r1 r0 r2");
    assert_eq!(outcomes[3].eviction().unwrap().victim, PageNumber(1));
    assert_eq!(ctx.resident(), vec![Some(0), Some(2)]);
    ctx.assert_consistent();
}

#[test]
fn optimal_keeps_the_page_needed_soonest() {
    // A B C A B: at C, A is next used at index 3 and B at index 4, so B goes.
    let mut ctx = TestContext::new(Optimal, 2, 4);
    let outcomes = ctx.run("r0 r1 r2 r0 r1");

    assert_eq!(outcomes[2].eviction().unwrap().victim, PageNumber(1));
    assert!(outcomes[3].is_hit());
    // At the final B, neither A nor C is used again; frame 0 is taken first.
    assert_eq!(outcomes[4].eviction().unwrap().victim, PageNumber(0));
    assert_eq!(ctx.sim.stats().page_miss_instances, 4);
    ctx.assert_consistent();
}

#[test]
fn optimal_prefers_a_page_never_used_again() {
    let mut ctx = TestContext::new(Optimal, 3, 8);
    let outcomes = ctx.run("r0 r1 r2 r3 r0 r2 r0");
    // Page 1 never returns, so its frame is taken even though frame 0 comes first.
    assert_eq!(outcomes[3].eviction().unwrap().victim, PageNumber(1));
    assert_eq!(outcomes[3].frame(), FrameNumber(1));
}

#[test]
fn pages_never_used_again_go_in_frame_order() {
    let mut ctx = TestContext::new(Optimal, 2, 4);
    let outcomes = ctx.run("r0 r1 r2 r3");
    // No resident page is used again at either fault, so frame 0 is taken both times.
    assert_eq!(outcomes[2].eviction().unwrap().victim, PageNumber(0));
    assert_eq!(outcomes[2].frame(), FrameNumber(0));
    assert_eq!(outcomes[3].eviction().unwrap().victim, PageNumber(2));
    assert_eq!(outcomes[3].frame(), FrameNumber(0));
    assert_eq!(ctx.resident(), vec![Some(3), Some(1)]);
}

// ══════════════════════════════════════════════════════════
// 3. Dirty pages and swap space
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(Fifo)]
#[case(Lru)]
#[case(Optimal)]
fn dirty_page_round_trips_through_swap(#[case] policy: ReplacementPolicy) {
    let mut ctx = TestContext::new(policy, 1, 4);

    let outcomes = ctx.run("w2 r1");
    assert_eq!(
        outcomes[1].eviction(),
        Some(Eviction {
            victim: PageNumber(2),
            written_to_swap: true,
            recovered_from_swap: false,
        })
    );
    assert_eq!(ctx.state_of(2), PageState::Evicted);
    assert!(ctx.on_disk(2));
    assert!(ctx.sim.backing_store().holds(PageNumber(2)));
    assert_eq!(ctx.sim.stats().stolen_frames_written_to_swapspace, 1);

    let outcomes = ctx.run("r2");
    assert_eq!(
        outcomes[0].eviction(),
        Some(Eviction {
            victim: PageNumber(1),
            written_to_swap: false,
            recovered_from_swap: true,
        })
    );
    assert_eq!(ctx.state_of(2), PageState::Resident);
    assert!(!ctx.on_disk(2));
    assert!(!ctx.sim.backing_store().holds(PageNumber(2)));
    assert_eq!(ctx.sim.stats().stolen_frames_recovered_from_swapspace, 1);
    ctx.assert_consistent();
}

#[test]
fn clean_eviction_writes_nothing() {
    let mut ctx = TestContext::new(Fifo, 1, 4);
    let _ = ctx.run("r0 r1 r0");
    assert_eq!(ctx.sim.stats().stolen_frames_written_to_swapspace, 0);
    assert_eq!(ctx.sim.stats().stolen_frames_recovered_from_swapspace, 0);
    assert_eq!(ctx.sim.backing_store().occupied_count(), 0);
    assert!(!ctx.on_disk(1));
}

#[test]
fn dirty_bit_from_a_hit_is_written_back() {
    let mut ctx = TestContext::new(Lru, 1, 4);
    let _ = ctx.run("r0 w0 r1");
    assert!(ctx.on_disk(0));
    assert_eq!(ctx.sim.stats().stolen_frames_written_to_swapspace, 1);
}

#[test]
fn reinstall_clears_dirty_bit() {
    let mut ctx = TestContext::new(Fifo, 1, 4);
    let _ = ctx.run("w0 r1");
    let frame = ctx.sim.frame_table().get(FrameNumber(0)).unwrap();
    assert!(!frame.dirty);
    assert_eq!(frame.resident_page, Some(PageNumber(1)));
}

// ══════════════════════════════════════════════════════════
// 4. Counters
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(Fifo)]
#[case(Lru)]
#[case(Optimal)]
fn counters_are_consistent(#[case] policy: ReplacementPolicy) {
    let mut ctx = TestContext::new(policy, 3, 10);
    let outcomes = ctx.run("r1 w2 r3 r4 w1 r2 r5 r1 r2 w3 r4 r5 r9 r0 r1");

    let hits = outcomes.iter().filter(|o| o.is_hit()).count() as u64;
    let stolen = outcomes.iter().filter(|o| o.eviction().is_some()).count() as u64;
    let stats = ctx.sim.stats();
    assert_eq!(stats.pages_referenced, 15);
    assert_eq!(stats.page_miss_instances + hits, stats.pages_referenced);
    assert_eq!(stats.frame_stolen_instances, stolen);
    assert_eq!(stats.pages_mapped, 7);
    ctx.assert_consistent();
}

#[test]
fn mapped_count_includes_evicted_pages() {
    let mut ctx = TestContext::new(Fifo, 1, 5);
    let _ = ctx.run("r0 r1 r2");
    assert_eq!(ctx.sim.recompute_mapped_count(), 3);
    assert_eq!(ctx.sim.page_table().resident_count(), 1);
    assert_eq!(ctx.state_of(3), PageState::NeverMapped);
}

#[test]
fn clock_advances_once_per_access() {
    let mut ctx = TestContext::new(Lru, 2, 4);
    assert_eq!(ctx.sim.clock(), 0);
    let _ = ctx.run("r0 r0 r1 r2");
    assert_eq!(ctx.sim.clock(), 4);
}

// ══════════════════════════════════════════════════════════
// 5. Translation, errors, and entry points
// ══════════════════════════════════════════════════════════

#[test]
fn addresses_are_divided_by_page_size() {
    let mut ctx = TestContext::with_config(Config::new(0x100, 2, 4, 4, Fifo));
    let _ = ctx.run("r0 r0ff r100 w1ff");
    assert_eq!(ctx.sim.stats().page_miss_instances, 2);
    assert_eq!(ctx.resident(), vec![Some(0), Some(1)]);
    assert!(ctx.sim.frame_table().get(FrameNumber(1)).unwrap().dirty);
    assert_eq!(ctx.sim.stats().pages_referenced, 4);
}

#[test]
fn out_of_range_page_is_rejected_without_side_effects() {
    let mut ctx = TestContext::with_config(Config::new(16, 2, 4, 4, Lru));
    let err = ctx.sim.access_record(&AccessRecord::read(0x40)).unwrap_err();
    assert!(matches!(
        err,
        SimError::Trace(TraceError::PageOutOfRange { page: PageNumber(4), num_pages: 4 })
    ));
    assert_eq!(ctx.sim.clock(), 0);
    assert_eq!(ctx.sim.frame_table().occupied_count(), 0);
}

#[test]
fn streaming_access_requires_a_streaming_policy() {
    let mut ctx = TestContext::new(Optimal, 2, 4);
    let err = ctx.sim.access(Operation::Read, PageNumber(0)).unwrap_err();
    assert!(matches!(err, SimError::LookaheadRequired));
    assert_eq!(ctx.sim.clock(), 0);
}

#[test]
fn batch_fails_before_touching_state() {
    let mut ctx = TestContext::new(Optimal, 2, 4);
    let records = TestContext::records("r0 r1 r9");
    let err = ctx.sim.run_batch(&records).unwrap_err();
    assert!(matches!(err, SimError::Trace(TraceError::PageOutOfRange { .. })));
    assert_eq!(ctx.sim.clock(), 0);
    assert_eq!(ctx.sim.page_table().mapped_count(), 0);
}

#[rstest]
#[case(Fifo)]
#[case(Lru)]
fn batch_matches_streaming_for_streaming_policies(#[case] policy: ReplacementPolicy) {
    let trace = "r0 w1 r2 r0 r3 w0 r4 r1 r2 w3";

    let mut streamed = TestContext::new(policy, 3, 5);
    let streamed_outcomes = streamed.run(trace);

    let mut batched = TestContext::new(policy, 3, 5);
    let batched_outcomes = batched
        .sim
        .run_batch(&TestContext::records(trace))
        .unwrap();

    assert_eq!(streamed_outcomes, batched_outcomes);
    assert_eq!(streamed.sim.stats(), batched.sim.stats());
    assert_eq!(streamed.resident(), batched.resident());
}

#[test]
fn batch_callback_sees_state_after_each_step() {
    let mut ctx = TestContext::new(Optimal, 2, 4);
    let records = TestContext::records("r0 r1 r2 r0");
    let mut clocks = Vec::new();
    let outcomes = ctx
        .sim
        .run_batch_with(&records, |i, sim| {
            clocks.push((i, sim.clock(), sim.stats().pages_mapped));
        })
        .unwrap();

    assert_eq!(outcomes.len(), 4);
    assert_eq!(clocks, vec![(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 4, 3)]);
}

#[test]
fn verbose_tracing_does_not_change_results() {
    let trace = "w0 r1 r2 w1 r3 r0 r2";
    let mut quiet = TestContext::new(Lru, 2, 4);
    let mut loud = TestContext::new(Lru, 2, 4);
    loud.sim.set_verbose(true);
    assert!(loud.sim.is_verbose());

    assert_eq!(quiet.run(trace), loud.run(trace));
    assert_eq!(quiet.sim.stats(), loud.sim.stats());
}

// ══════════════════════════════════════════════════════════
// Pluggable victim selection
// ══════════════════════════════════════════════════════════

/// Always answers with the same frame, whatever the table holds.
#[derive(Debug)]
struct FixedChoice(Option<FrameNumber>);

impl VictimSelection for FixedChoice {
    fn get_victim(
        &mut self,
        _frames: &FrameTable,
        _upcoming: &[PageNumber],
    ) -> Option<FrameNumber> {
        self.0
    }

    fn kind(&self) -> ReplacementPolicy {
        Lru
    }
}

#[test]
fn custom_policy_chooses_the_victim() {
    let config = Config::new(1, 3, 5, 5, Fifo);
    let policy = Box::new(FixedChoice(Some(FrameNumber(2))));
    let mut sim = Simulator::with_policy(&config, policy).unwrap();
    for page in 0..4 {
        let _ = sim.access(Operation::Read, PageNumber(page)).unwrap();
    }
    assert_eq!(sim.policy(), Lru);
    assert_eq!(
        sim.frame_table().get(FrameNumber(2)).unwrap().resident_page,
        Some(PageNumber(3))
    );
    assert_eq!(sim.stats().frame_stolen_instances, 1);
}

#[rstest]
#[case(None)]
#[case(Some(FrameNumber(7)))]
fn missing_victim_is_an_error(#[case] choice: Option<FrameNumber>) {
    let config = Config::new(1, 2, 4, 4, Lru);
    let mut sim = Simulator::with_policy(&config, Box::new(FixedChoice(choice))).unwrap();
    let _ = sim.access(Operation::Write, PageNumber(0)).unwrap();
    let _ = sim.access(Operation::Read, PageNumber(1)).unwrap();
    let before = sim.stats().clone();

    let err = sim.access(Operation::Read, PageNumber(2)).unwrap_err();
    assert!(matches!(
        err,
        SimError::NoVictim {
            page: PageNumber(2),
            ..
        }
    ));

    // No counter moves and no page is touched.
    assert_eq!(sim.stats(), &before);
    let resident: Vec<_> = sim.frame_table().iter().map(|f| f.resident_page).collect();
    assert_eq!(resident, vec![Some(PageNumber(0)), Some(PageNumber(1))]);
    assert_eq!(
        sim.page_table().get(PageNumber(2)).unwrap().state,
        PageState::NeverMapped
    );
}
