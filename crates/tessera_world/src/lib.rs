pub mod collision;
pub mod mesher;
pub mod persistence;
pub mod raycast;
pub mod settings;
pub mod world;
