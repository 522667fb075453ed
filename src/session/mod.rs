pub mod input;
pub mod playback;
pub mod quiz;
pub mod result;
pub mod trainer;
