#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use ringtrack::ds::RingBuffer;

// Fuzz arbitrary operation sequences on RingBuffer
//
// First byte picks the capacity (1-64). Appends, clears, and indexed reads are
// checked against a VecDeque that drops its front once full.
fuzz_target!(|data: &[u8]| {
    let Some((&cap_byte, ops)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap_byte % 64) + 1;
    let mut ring = RingBuffer::new(capacity).unwrap();
    let mut model: VecDeque<u8> = VecDeque::with_capacity(capacity);

    for pair in ops.chunks_exact(2) {
        let value = pair[1];
        match pair[0] % 4 {
            0 => {
                ring.append(value);
                if model.len() == capacity {
                    model.pop_front();
                }
                model.push_back(value);
            },
            1 => {
                let index = usize::from(value);
                match model.get(index) {
                    Some(expected) => assert_eq!(ring.get(index), Ok(expected)),
                    None => assert!(ring.get(index).is_err()),
                }
            },
            2 => {
                assert_eq!(ring.oldest(), model.front());
                assert_eq!(ring.newest(), model.back());
            },
            3 => {
                ring.clear();
                model.clear();
            },
            _ => unreachable!(),
        }

        ring.debug_validate_invariants();
        assert_eq!(ring.len(), model.len());
        assert_eq!(ring.is_full(), model.len() == capacity);
        assert!(ring.iter().eq(model.iter()));
    }
});
