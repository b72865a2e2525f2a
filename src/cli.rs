// cli.rs - Command-line interface configuration
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::choreography::Choreography;
use crate::device::DeviceClass;
use crate::timeline::Ease;
use crate::variants::DEFAULT_VARIANT;
use crate::viewer::ViewerConfig;

pub const DEFAULT_MODEL_PATH: &str = "MaterialsVariantsShoe/glTF/MaterialsVariantsShoe.gltf";

#[derive(Parser, Debug, Clone)]
#[command(name = "variant-viewer")]
#[command(about = "Scroll-driven glTF product viewer with material variants", long_about = None)]
pub struct Cli {
    /// glTF/GLB file to show (falls back to $GLTF_FILE)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Variant selected after loading (substring match)
    #[arg(long, default_value = DEFAULT_VARIANT)]
    pub variant: String,

    /// Browser-style user agent used to pick the device class
    #[arg(long = "user-agent")]
    pub user_agent: Option<String>,

    /// Force a device class
    #[arg(long, value_enum)]
    pub device: Option<DeviceClass>,

    /// Number of page sections
    #[arg(long, default_value_t = 6)]
    pub sections: usize,

    /// Height of one section in viewport heights
    #[arg(long = "section-height", default_value_t = 1.0)]
    pub section_height: f32,

    /// JSON file replacing the built-in keyframe tables
    #[arg(long)]
    pub choreography: Option<PathBuf>,

    /// Variant buttons to show, comma separated (default: every variant)
    #[arg(long, value_delimiter = ',')]
    pub buttons: Option<Vec<String>>,

    /// Easing for every keyframe step
    #[arg(long, value_enum, default_value_t = Ease::Power1Out)]
    pub ease: Ease,

    /// Hide variant buttons and status line
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

impl Cli {
    /// `--model`, then `$GLTF_FILE`, then the bundled shoe
    pub fn model_path(&self) -> PathBuf {
        self.model
            .clone()
            .or_else(|| std::env::var_os("GLTF_FILE").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
    }

    pub fn viewer_config(&self) -> Result<ViewerConfig> {
        let choreography = match &self.choreography {
            Some(path) => Choreography::from_json_file(path)?,
            None => Choreography::builtin(),
        };

        Ok(ViewerConfig {
            default_variant: self.variant.clone(),
            user_agent: self.user_agent.clone(),
            device: self.device,
            sections: self.sections,
            section_height: self.section_height,
            choreography,
            buttons: self.buttons.clone(),
            ease: self.ease,
            show_ui: !self.no_ui,
        })
    }
}
