pub mod bootstrap;
pub mod camera;
pub mod choreography;
pub mod cli;
pub mod core;
pub mod device;
pub mod loaders;
pub mod overlay;
pub mod renderer;
pub mod scene;
pub mod scroll;
pub mod timeline;
pub mod types;
pub mod variants;
pub mod viewer;
