//! Settings commands: show, change and reset the persisted `SystemSettings`.

use anyhow::Result;
use clap::Subcommand;
use sentinel_config::{ConfigError, SystemSettings};
use std::str::FromStr;

use crate::args::OutputFormat;
use crate::context::CommandContext;
use crate::formatters::get_formatter;

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Change one setting
    Set {
        /// One of: api_endpoint, refresh_interval, logs_per_page, theme,
        /// enable_notifications, enable_auto_refresh, live_end_margin_secs
        key: String,

        /// New value
        value: String,
    },

    /// Restore every setting to its default
    Reset,
}

pub fn run(context: &CommandContext, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show { format } => {
            print!("{}", get_formatter(format).format_settings(context.settings())?);
        }
        SettingsCommand::Set { key, value } => {
            let mut settings = context.settings().clone();
            set_key(&mut settings, &key, &value)?;
            settings.persist(&mut context.open_store()?)?;
            println!("Set {key} = {}", value.trim());
        }
        SettingsCommand::Reset => {
            SystemSettings::reset(&mut context.open_store()?)?;
            println!("Settings restored to defaults");
        }
    }
    Ok(())
}

fn set_key(settings: &mut SystemSettings, key: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.trim();
    match key.trim().to_ascii_lowercase().as_str() {
        "api_endpoint" => settings.api_endpoint = value.to_string(),
        "refresh_interval" => settings.refresh_interval = parse(key, value)?,
        "logs_per_page" => settings.logs_per_page = parse(key, value)?,
        "theme" => settings.theme = value.parse()?,
        "enable_notifications" => settings.enable_notifications = parse(key, value)?,
        "enable_auto_refresh" => settings.enable_auto_refresh = parse(key, value)?,
        "live_end_margin_secs" => settings.live_end_margin_secs = parse(key, value)?,
        other => {
            return Err(ConfigError::InvalidValue {
                var: other.to_string(),
                message: "unknown setting".to_string(),
            });
        }
    }
    Ok(())
}

fn parse<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var: key.to_string(),
        message: format!("{e} (got '{value}')"),
    })
}
