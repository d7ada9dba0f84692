//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Upload an iOS or Android build to Kobiton.
#[derive(Parser, Debug)]
#[command(name = "kobiton-upload", author, version, about, long_about = None)]
pub struct Args {
    /// Username or email of the Kobiton account.
    #[arg(short, long, env = "KOBITON_USERNAME")]
    pub username: Option<String>,

    /// API key from Kobiton.
    #[arg(short = 'k', long, env = "KOBITON_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// The build file (.apk or .ipa) to upload.
    #[arg(short, long, env = "KOBITON_FILE")]
    pub file: Option<PathBuf>,

    /// Kobiton app ID the build belongs to.
    #[arg(short, long, env = "KOBITON_APP_ID")]
    pub app_id: Option<u64>,

    /// Version name to display in Kobiton once the build is processed.
    #[arg(short, long, env = "KOBITON_NAME")]
    pub name: Option<String>,

    /// Path to a TOML config file.
    #[arg(short, long, env = "KOBITON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the API base URL.
    #[arg(long)]
    pub base_url: Option<String>,
}
