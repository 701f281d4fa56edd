pub mod booking;
pub mod guest_tier;
pub mod pricing;
pub mod resort;
pub mod time_slot;
