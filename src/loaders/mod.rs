pub mod gltf;

pub use gltf::{load_model, load_model_from_slice, ModelAssets, TextureData};

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::thread::JoinHandle;

/// Load the model on a worker thread and hand the outcome to `deliver` there
pub fn spawn_model_load<F>(path: PathBuf, deliver: F) -> Result<JoinHandle<()>>
where
    F: FnOnce(Result<ModelAssets>) + Send + 'static,
{
    std::thread::Builder::new()
        .name("model-loader".into())
        .spawn(move || deliver(load_model(&path)))
        .context("Failed to start model loader thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_spawn_delivers_error_for_missing_file() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_model_load(PathBuf::from("/nonexistent/model.glb"), move |result| {
            let _ = tx.send(result.is_err());
        })
        .unwrap();

        handle.join().unwrap();
        assert_eq!(rx.recv().unwrap(), true);
    }
}
