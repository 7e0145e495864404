pub mod content;
pub mod core;
pub mod exercises;
pub mod gui;
pub mod persistence;
pub mod playback;
pub mod session;
pub mod vocabulary;
