pub mod buffer_id;
pub mod change_hunk;
pub mod selection;
pub mod shared_buffer;
