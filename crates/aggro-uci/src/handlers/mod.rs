pub mod game;
pub mod go;
pub mod options;
pub mod position;
