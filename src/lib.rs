pub mod controller;
pub mod input;
pub mod interaction;
pub mod player;
pub mod plugin;
pub mod ron;
pub mod settings;
pub mod space;
pub mod ui;
