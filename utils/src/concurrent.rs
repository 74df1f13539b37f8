pub mod count_down_latch;
pub mod manual_reset_event;

pub use self::{count_down_latch::*, manual_reset_event::*};
