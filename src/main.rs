use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use floatpane::config::types::Config;
use floatpane::overlay::Overlay;
use floatpane::script::Script;
use floatpane::stage::Stage;
use floatpane::window::ContentProps;

type Title = fn(&ContentProps<'_>) -> String;

fn main() -> anyhow::Result<()> {
    // Handle --print-default-config before any other initialization
    if std::env::args().any(|a| a == "--print-default-config") {
        print!("{}", Config::print_default());
        return Ok(());
    }

    env_logger::init();
    log::info!("floatpane v{} starting", env!("CARGO_PKG_VERSION"));

    let args = parse_args(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            let path = dirs_config_path();
            match Config::load(&path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("Config load error ({}), using defaults", e);
                    Config::default()
                }
            }
        }
    };
    log::info!(
        "Boundary: {}, windows: {}, min size: {}%",
        config.boundary.selector,
        config.windows.len(),
        config.limits.min_size
    );

    let script = Script::load(&args.script)
        .with_context(|| format!("failed to load script {}", args.script.display()))?;

    let mut overlay: Overlay<Title> = Overlay::new(&config, Stage::new());
    for entry in &config.windows {
        overlay.open(&entry.name, title as Title)?;
    }

    let commits = script.replay(&mut overlay).context("script replay failed")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for commit in &commits {
        writeln!(out, "{}", serde_json::to_string(commit)?)?;
    }

    for frame in overlay.frames() {
        log::debug!("{}: {}", frame.content, frame.style.to_css());
    }
    log::info!("Replayed {} steps, {} commits", script.steps.len(), commits.len());
    Ok(())
}

fn title(props: &ContentProps<'_>) -> String {
    props.window_name.to_string()
}

/// Command-line arguments: `floatpane <script.toml> [--config <path>]`.
#[derive(Debug, PartialEq)]
struct Args {
    script: PathBuf,
    config: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut args = args.into_iter();
    let mut script = None;
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config requires a path")?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
            _ if script.is_some() => bail!("unexpected argument '{arg}'"),
            _ => script = Some(PathBuf::from(arg)),
        }
    }
    let script = script.context("usage: floatpane <script.toml> [--config <path>]")?;
    Ok(Args { script, config })
}

/// Get the config file path (~/.config/floatpane/config.toml).
fn dirs_config_path() -> PathBuf {
    dirs_home()
        .join(".config")
        .join("floatpane")
        .join("config.toml")
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
