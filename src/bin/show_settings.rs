use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use mail_dispatch::SettingsSource;

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[command(author, version, about)]
/// Prints the settings a provider section resolves to
struct Cli {
    /// Section to show, lists the available sections if omitted
    #[arg(value_name = "SECTION")]
    section: Option<String>,

    /// Settings file to read, uses the built in settings if not specified
    #[arg(long = "config", short, value_name = "PATH")]
    config_filename: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let source = match &cli.config_filename {
        Some(path) => SettingsSource::from_path(path)?,
        None => SettingsSource::embedded()?,
    };

    match &cli.section {
        Some(section) => {
            let settings = source
                .section(section)
                .with_context(|| format!("Failed to resolve section {section:?}"))?;
            for (key, value) in settings.iter() {
                println!("{key} = {value}");
            }
        }
        None => {
            for name in source.section_names() {
                println!("{name}");
            }
        }
    }
    Ok(())
}
