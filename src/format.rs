//! Output formatting for resolved settings.

use crate::config::Settings;
use anyhow::Result;

/// Output format for the `show` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    #[value(alias = "yml")]
    Yaml,
    /// Shell `export KEY='value'` lines
    #[value(alias = "shell")]
    Env,
}

/// Render settings in the requested format.
pub fn format_settings(settings: &Settings, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(settings)?,
        OutputFormat::Yaml => serde_yaml::to_string(settings)?,
        OutputFormat::Env => format_settings_env(settings),
    })
}

/// Format settings as shell export lines.
pub fn format_settings_env(settings: &Settings) -> String {
    let mut out = String::new();
    for (key, value) in settings.to_env_pairs() {
        out.push_str(&format!("export {}={}\n", key, shell_quote(&value)));
    }
    out
}

/// Single-quote a value for POSIX shells.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r#"'\''"#))
}
