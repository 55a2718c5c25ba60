use anyhow::Result;
use clap::{Parser, ValueEnum};
use longrun_common::observability::{LogConfig, LogFormat, init_logging};
use longrun_config::{DEFAULT_CONFIG_FILE, LogFormatSetting, LongrunConfig, LongrunConfigLoader};
use std::path::PathBuf;
use tether::{Tether, build_interactive, build_session};
mod headless;
mod tether;

#[derive(Parser, Debug)]
#[command(name = "longrun")]
#[command(about = "Scripted Puresport chat in the terminal", version)]
struct Cli {
    /// YAML config file. Defaults to `longrun.yaml` when it exists.
    #[arg(long, short = 'c', env = "LONGRUN_CONFIG")]
    config: Option<PathBuf>,

    /// Send this prompt without opening the UI; repeat for more turns.
    #[arg(long = "prompt", short = 'p')]
    prompts: Vec<String>,

    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    log_format: Option<CliLogFormat>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CliLogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let loader = match &cli.config {
        Some(path) => LongrunConfigLoader::new().with_file(path),
        None => LongrunConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let cfg: LongrunConfig = loader.load()?;

    // 2) Logging: flags beat the YAML section
    let log_path = init_logging(log_config(&cfg, &cli))?;
    tracing::info!(log = %log_path.display(), headless = !cli.prompts.is_empty(), "longrun.start");

    let session = build_session(&cfg)?;

    if !cli.prompts.is_empty() {
        let mut stdout = std::io::stdout();
        return headless::run_prompts(session, &cli.prompts, &mut stdout).await;
    }

    let mut tether = Tether::new();
    build_interactive(&mut tether, session)?;
    tether.run().await
}

fn log_config(cfg: &LongrunConfig, cli: &Cli) -> LogConfig {
    let format = match (cli.log_format, cfg.logging.format) {
        (Some(CliLogFormat::Json), _) | (None, LogFormatSetting::Json) => LogFormat::Json,
        _ => LogFormat::Text,
    };
    let defaults = LogConfig::default();
    LogConfig {
        log_dir: cli.log_dir.clone().or_else(|| cfg.logging.dir.clone()),
        emit_stderr: cfg.logging.stderr,
        format,
        default_filter: cfg.logging.filter.clone().unwrap_or(defaults.default_filter),
        ..defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(yaml: &str) -> LongrunConfig {
        LongrunConfigLoader::new().with_yaml_str(yaml).load().unwrap()
    }

    #[test]
    fn cli_flags_override_logging_section() {
        let cfg = cfg("logging:\n  dir: /var/log/longrun\n  format: json\n  filter: debug\n");
        let cli = Cli::parse_from(["longrun", "--log-dir", "/tmp/lr", "--log-format", "text"]);
        let lc = log_config(&cfg, &cli);
        assert_eq!(lc.log_dir, Some(PathBuf::from("/tmp/lr")));
        assert_eq!(lc.format, LogFormat::Text);
        assert_eq!(lc.default_filter, "debug");
    }

    #[test]
    fn logging_section_used_without_flags() {
        let cfg = cfg("logging:\n  format: json\n");
        let cli = Cli::parse_from(["longrun", "-p", "Building muscle", "-p", "3"]);
        let lc = log_config(&cfg, &cli);
        assert_eq!(lc.format, LogFormat::Json);
        assert_eq!(lc.default_filter, "info");
        assert_eq!(cli.prompts, vec!["Building muscle", "3"]);
    }
}
