pub mod intrusive_list;
pub mod ring_buffer;
pub mod slot_arena;

pub use intrusive_list::IntrusiveList;
pub use ring_buffer::RingBuffer;
pub use slot_arena::{SlotArena, SlotId};
