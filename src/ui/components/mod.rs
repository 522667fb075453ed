pub mod challenge_area;
pub mod level_list;
pub mod offline_warning;
pub mod progress_bar;
pub mod trainer_panel;
