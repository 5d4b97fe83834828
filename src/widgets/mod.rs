pub mod chart;
pub mod controls;
pub mod menu;
pub mod picker;
