pub mod export;
pub mod presence;
pub mod staff;
