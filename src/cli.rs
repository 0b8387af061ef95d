// cli.rs - Command-line interface configuration
use std::path::PathBuf;
use clap::Parser;
use crate::config::ViewerConfig;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "trackball-viewer")]
#[command(about = "Solar system viewer with a virtual trackball camera", long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Hide the HUD overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Sphere slices (stacks are half of this)
    #[arg(long)]
    pub tessellation: Option<u32>,

    /// Multiplier on trackball rotation
    #[arg(long)]
    pub rotation_scale: Option<f32>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Load the config file (or defaults), apply command-line overrides and
    /// validate the result
    pub fn resolve_config(&self) -> anyhow::Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)?,
            None => ViewerConfig::default(),
        };
        if let Some(tessellation) = self.tessellation {
            config.scene.tessellation = tessellation;
        }
        if let Some(rotation_scale) = self.rotation_scale {
            config.trackball.rotation_scale = rotation_scale;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "trackball-viewer",
            "--no-ui",
            "--tessellation",
            "24",
            "--rotation-scale",
            "2.5",
        ]);
        assert!(cli.no_ui);
        assert_eq!(cli.tessellation, Some(24));
        assert_eq!(cli.rotation_scale, Some(2.5));
        assert!(cli.config.is_none());
        assert!(!cli.print_config);
    }

    #[test]
    fn test_overrides_apply() {
        let cli = Cli {
            tessellation: Some(24),
            rotation_scale: Some(2.0),
            ..Default::default()
        };
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.scene.tessellation, 24);
        assert_eq!(config.trackball.rotation_scale, 2.0);
    }

    #[test]
    fn test_invalid_override_rejected() {
        for tessellation in [1, 100_000] {
            let cli = Cli {
                tessellation: Some(tessellation),
                ..Default::default()
            };
            assert!(cli.resolve_config().is_err(), "{}", tessellation);
        }
    }
}
