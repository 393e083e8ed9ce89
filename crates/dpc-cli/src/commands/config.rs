use anyhow::Result;
use dpc_core::config::RunConfig;

/// Print a fully-populated default `RunConfig` as TOML to stdout.
pub fn run() -> Result<()> {
    let config = RunConfig::default();
    let toml_str = toml::to_string_pretty(&config)?;
    print!("{}", toml_str);
    Ok(())
}
