// ==============================================
// RANKING SCENARIO TESTS (integration)
// ==============================================
//
// End-to-end behavior of the counter and ranking together, driven through
// the public API only.

use std::collections::HashMap;

use iprank::addr::Ipv4Key;
use iprank::builder::RankingBuilder;
use iprank::ds::TopKState;
use iprank::tracker::{DEFAULT_TOP_K, RankedCounter, SAMPLE_STREAM, TopAddresses};

fn addr(s: &str) -> Ipv4Key {
    s.parse().unwrap()
}

// ==============================================
// Demonstration Stream
// ==============================================

mod sample_stream {
    use super::*;

    fn replay() -> TopAddresses {
        let mut top = TopAddresses::default();
        for line in SAMPLE_STREAM {
            top.observe_str(line).unwrap();
        }
        top
    }

    #[test]
    fn ranks_highest_count_first() {
        let top = replay();
        let ranked: Vec<String> = top.top_ranked().iter().map(Ipv4Key::to_string).collect();
        assert_eq!(
            ranked,
            ["8.8.8.8", "8.8.8.4", "127.0.0.1", "1.1.1.1", "192.164.0.1"]
        );
    }

    #[test]
    fn reports_exact_counts() {
        let top = replay();
        let counts: Vec<u64> = top.ranked().iter().map(|e| e.count).collect();
        assert_eq!(counts, [9, 4, 2, 1, 1]);
        assert_eq!(top.total_observations(), 17);
        assert_eq!(top.distinct(), 5);
    }

    #[test]
    fn unobserved_address_has_no_count() {
        let top = replay();
        assert_eq!(top.count(&Ipv4Key::BROADCAST), None);
        assert!(top.rank_of(&Ipv4Key::BROADCAST).is_none());
    }

    #[test]
    fn clear_then_query_is_empty() {
        let mut top = replay();
        top.clear();
        assert!(top.top_ranked().is_empty());
        assert_eq!(top.count(&addr("8.8.8.8")), None);
    }
}

// ==============================================
// Admission When Full
// ==============================================

mod admission {
    use super::*;

    #[test]
    fn equal_count_newcomer_is_not_admitted() {
        let mut counter = RankedCounter::new(2);
        for key in ["A", "B", "C", "A"] {
            counter.observe(key);
        }
        let ranked: Vec<(&str, u64)> = counter.ranked().iter().map(|e| (e.key, e.count)).collect();
        assert_eq!(ranked, [("A", 2), ("B", 1)]);
        assert_eq!(counter.count(&"C"), Some(1));
    }

    #[test]
    fn newcomer_displaces_lowest_once_it_beats_it() {
        let mut counter = RankedCounter::new(2);
        for key in ["A", "B", "C", "A", "C"] {
            counter.observe(key);
        }
        assert_eq!(counter.top_ranked(), ["A", "C"]);
        assert_eq!(counter.count(&"B"), Some(1));
    }

    #[test]
    fn tracked_set_only_changes_by_strict_improvement() {
        let mut counter = RankedCounter::new(3);
        for key in 0..3u32 {
            counter.observe(key);
            counter.observe(key);
        }
        // 3 reaches 2: tie with the minimum, rejected
        counter.observe(3);
        counter.observe(3);
        assert!(counter.rank_of(&3).is_none());

        // 3 reaches 3: strictly greater, admitted
        counter.observe(3);
        assert_eq!(counter.rank_of(&3), Some(0));
        assert_eq!(counter.tracked_len(), 3);
    }

    #[test]
    fn evicted_key_is_readmitted_only_after_beating_the_minimum() {
        let mut counter = RankedCounter::new(2);
        for key in ["A", "A", "B", "B", "C", "C", "C"] {
            counter.observe(key);
        }
        // C at 3 replaced B, the last entry among the tied pair
        let ranked: Vec<(&str, u64)> = counter.ranked().iter().map(|e| (e.key, e.count)).collect();
        assert_eq!(ranked, [("C", 3), ("A", 2)]);
        assert_eq!(counter.count(&"B"), Some(2));
        assert!(counter.rank_of(&"B").is_none());

        // B keeps its count while untracked, so one more hit puts it at 3 > 2
        assert_eq!(counter.observe("B"), 3);
        let ranked: Vec<(&str, u64)> = counter.ranked().iter().map(|e| (e.key, e.count)).collect();
        assert_eq!(ranked, [("C", 3), ("B", 3)]);
        assert!(counter.rank_of(&"A").is_none());

        // A ties the new minimum at 3 and stays out, then wins at 4
        assert_eq!(counter.observe("A"), 3);
        assert!(counter.rank_of(&"A").is_none());
        assert_eq!(counter.observe("A"), 4);
        let ranked: Vec<(&str, u64)> = counter.ranked().iter().map(|e| (e.key, e.count)).collect();
        assert_eq!(ranked, [("A", 4), ("C", 3)]);
        assert_eq!(counter.count(&"B"), Some(3));
        assert!(counter.check_invariants().is_ok());
    }
}

// ==============================================
// Single Hot Key
// ==============================================

mod single_key {
    use super::*;

    #[test]
    fn repeated_observations_occupy_one_slot() {
        let mut top = RankingBuilder::new(DEFAULT_TOP_K).build::<Ipv4Key>();
        let key = addr("10.10.10.10");
        for expected in 1..=(DEFAULT_TOP_K as u64 + 1) {
            assert_eq!(top.observe(key), expected);
            assert_eq!(top.top_ranked(), [key]);
        }
        assert_eq!(top.state(), TopKState::Partial);
    }
}

// ==============================================
// Bounds and Exactness
// ==============================================

mod properties {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn pseudo_random_stream(len: usize, universe: u32, seed: u64) -> Vec<u32> {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..len)
            .map(|_| {
                // skew toward low keys so counts spread out
                let r = u64::from(rng.random_range(0..universe));
                (r * r / u64::from(universe)) as u32
            })
            .collect()
    }

    #[test]
    fn ranking_size_is_min_of_capacity_and_distinct() {
        for capacity in [1usize, 5, 50] {
            let mut counter = RankedCounter::new(capacity);
            let mut seen = std::collections::HashSet::new();
            for key in pseudo_random_stream(2_000, 200, 3) {
                counter.observe(key);
                seen.insert(key);
                assert_eq!(counter.tracked_len(), capacity.min(seen.len()));
            }
        }
    }

    #[test]
    fn small_key_space_ranks_every_key_exactly() {
        let stream = pseudo_random_stream(3_000, 40, 9);
        let mut counter = RankedCounter::new(DEFAULT_TOP_K);
        let mut model: HashMap<u32, u64> = HashMap::new();
        for &key in &stream {
            counter.observe(key);
            *model.entry(key).or_insert(0) += 1;
        }

        let mut expected: Vec<u64> = model.values().copied().collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        let ranked: Vec<u64> = counter.ranked().iter().map(|e| e.count).collect();
        assert_eq!(ranked, expected);
        for entry in counter.ranked() {
            assert_eq!(model[&entry.key], entry.count);
        }
    }

    #[test]
    fn large_key_space_never_hides_a_heavier_key() {
        let stream = pseudo_random_stream(20_000, 5_000, 17);
        let mut counter = RankedCounter::new(25);
        for &key in &stream {
            counter.observe(key);
        }
        counter.debug_validate_invariants();

        let floor = counter.ranked().last().map(|e| e.count).unwrap();
        for (key, count) in counter.store().iter() {
            if counter.rank_of(key).is_none() {
                assert!(count <= floor, "untracked {} has {} > {}", key, count, floor);
            }
        }
    }

    #[test]
    fn clear_is_idempotent_and_equivalent_to_fresh() {
        let stream = pseudo_random_stream(500, 100, 23);

        let mut reused = RankedCounter::new(10);
        reused.observe_batch(stream.iter().copied());
        reused.clear();
        reused.clear();

        let mut fresh = RankedCounter::new(10);
        reused.observe_batch(stream.iter().copied());
        fresh.observe_batch(stream.iter().copied());

        assert_eq!(reused.ranked_entries(), fresh.ranked_entries());
        assert_eq!(reused.total_observations(), fresh.total_observations());
    }
}
