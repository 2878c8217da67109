#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use ringtrack::ds::IntrusiveList;

// Fuzz arbitrary operation sequences on IntrusiveList
//
// Mirrors every push_back, pop_front, move_to_back, and remove into a
// VecDeque and compares front-to-back order after each step.
fuzz_target!(|data: &[u8]| {
    let mut list: IntrusiveList<u32> = IntrusiveList::new();
    let mut model: VecDeque<u32> = VecDeque::new();
    let mut all_ids = Vec::new();
    let mut next = 0u32;

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 5;
        let pick = pair[1] as usize;

        match op {
            0 => {
                let id = list.push_back(next);
                all_ids.push((id, next));
                model.push_back(next);
                assert_eq!(list.back_id(), Some(id));
                next += 1;
            },
            1 => {
                assert_eq!(list.pop_front(), model.pop_front());
            },
            2 => {
                if !all_ids.is_empty() {
                    let (id, value) = all_ids[pick % all_ids.len()];
                    let moved = list.move_to_back(id);
                    if let Some(pos) = model.iter().position(|&v| v == value) {
                        assert!(moved);
                        model.remove(pos);
                        model.push_back(value);
                    } else {
                        assert!(!moved);
                    }
                }
            },
            3 => {
                if !all_ids.is_empty() {
                    let (id, value) = all_ids[pick % all_ids.len()];
                    let removed = list.remove(id);
                    if let Some(pos) = model.iter().position(|&v| v == value) {
                        assert_eq!(removed, Some(value));
                        model.remove(pos);
                    } else {
                        assert_eq!(removed, None);
                    }
                }
            },
            4 => {
                list.clear();
                model.clear();
                all_ids.clear();
            },
            _ => unreachable!(),
        }

        list.debug_validate_invariants();
        assert_eq!(list.len(), model.len());
        assert!(list.iter().eq(model.iter()));
        assert_eq!(list.front(), model.front());
        assert_eq!(list.back(), model.back());
    }
});
