#![no_main]

use std::collections::HashMap;

use iprank::tracker::RankedCounter;
use libfuzzer_sys::fuzz_target;

// Stress RankedCounter against a reference model
//
// Each byte pair is an observation (or a clear). The model keeps exact
// counts in a HashMap and checks counts, ranking size and the admission
// guarantee after every step.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let capacity = usize::from(data[0] % 32) + 1;
    let mut counter: RankedCounter<u16> = RankedCounter::new(capacity);
    let mut model: HashMap<u16, u64> = HashMap::new();

    for chunk in data[1..].chunks(2) {
        if chunk.len() < 2 {
            break;
        }
        let key = u16::from_le_bytes([chunk[0], chunk[1] % 4]);

        if chunk[0] == 0xFF && chunk[1] == 0xFF {
            counter.clear();
            model.clear();
            assert!(counter.top_ranked().is_empty());
            continue;
        }

        let count = counter.observe(key);
        let expected = model.entry(key).or_insert(0);
        *expected += 1;
        assert_eq!(count, *expected);

        assert_eq!(counter.tracked_len(), capacity.min(model.len()));
        assert_eq!(counter.distinct(), model.len());
    }

    assert!(counter.check_invariants().is_ok());

    let floor = counter.ranked().last().map_or(0, |e| e.count);
    for (key, count) in &model {
        assert_eq!(counter.count(key), Some(*count));
        if counter.rank_of(key).is_none() {
            assert!(*count <= floor);
        }
    }
});
