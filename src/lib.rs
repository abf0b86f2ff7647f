pub mod capture;
pub mod geometry;
pub mod gui;
pub mod hotkey;
pub mod logging;
pub mod magnifier;
pub mod scheduler;
pub mod settings;
pub mod visibility;
