use anyhow::Result;
use clap::Args;
use colored::Colorize;
use inkframe_editor::{Access, InitialConfig};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Query string of the embed URL, e.g. "?content=%3Cp%3EHi%3C%2Fp%3E&editable=false"
    pub query: String,

    /// Access key the editor would be built with
    #[arg(long)]
    pub access_key: Option<String>,
}

pub fn config(args: ConfigArgs) -> Result<()> {
    let config = InitialConfig::from_query(&args.query, args.access_key.as_deref());

    println!("{}", render(&config)?);
    eprintln!("{}", access_line(config.access));

    Ok(())
}

fn render(config: &InitialConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

fn access_line(access: Access) -> String {
    match access {
        Access::Open => format!("{} no access key configured", "✓".green()),
        Access::Granted => format!("{} access granted", "✓".green()),
        Access::Denied => format!("{} access denied, the editor would stay disabled", "✗".red()),
    }
}
