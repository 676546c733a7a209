#![no_main]

use iprank::ds::{RankUpdate, TopK, TopKState};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on TopK
//
// Tests random sequences of update, lookups, clear and clear_shrink, checking
// the decision procedure and ordering after every step.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let capacity = usize::from(data[0] % 16);
    let mut top: TopK<u8> = TopK::new(capacity);

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 5;
        let key = data[idx + 1] % 32;
        let count = u64::from(data[idx + 2]);

        match op {
            0 | 1 => {
                // update
                let was_tracked = top.contains(&key);
                let old_len = top.len();
                let floor = top.admission_floor();

                match top.update(key, count) {
                    RankUpdate::Refreshed => {
                        assert!(was_tracked);
                        assert_eq!(top.len(), old_len);
                    }
                    RankUpdate::Inserted => {
                        assert!(!was_tracked);
                        assert_eq!(top.len(), old_len + 1);
                    }
                    RankUpdate::Replaced(evicted) => {
                        assert!(!was_tracked);
                        assert_eq!(top.len(), old_len);
                        assert_eq!(Some(evicted.count), floor);
                        assert!(count > evicted.count);
                        assert!(!top.contains(&evicted.key));
                    }
                    RankUpdate::Rejected => {
                        assert!(!was_tracked);
                        assert!(top.is_full());
                        assert!(floor.is_some_and(|floor| count <= floor));
                        assert!(!top.contains(&key));
                    }
                }

                if top.contains(&key) {
                    assert_eq!(top.count_of(&key), Some(count));
                }
            }
            2 => {
                // rank_of agrees with get
                if let Some(rank) = top.rank_of(&key) {
                    assert_eq!(top.get(rank).map(|e| e.key), Some(key));
                }
            }
            3 => {
                // clear
                top.clear();
                assert!(top.is_empty());
                assert_eq!(top.state(), TopKState::Empty);
            }
            4 => {
                // clear_shrink
                top.clear_shrink();
                assert!(top.is_empty());
                assert_eq!(top.capacity(), capacity);
            }
            _ => unreachable!(),
        }

        assert!(top.len() <= capacity);
        assert!(top.check_invariants().is_ok());

        idx += 3;
    }
});
