pub mod panels;
pub mod plot;
pub mod tables;
pub mod tabs;
pub mod widgets;
