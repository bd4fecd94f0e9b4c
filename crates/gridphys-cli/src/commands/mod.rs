pub mod run;
pub mod scenes;
