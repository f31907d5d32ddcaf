pub mod exercise_list;
pub mod keyboard_diagram;
pub mod progress_bar;
pub mod result_panel;
pub mod typing_area;
