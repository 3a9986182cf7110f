pub mod reset_marker;
pub mod staff;
