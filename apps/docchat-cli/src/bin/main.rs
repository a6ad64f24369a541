use std::env;
use std::path::PathBuf;

use docchat_agent::AppContext;
use docchat_core::config::Config;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: docchat <personas|starters|spec|references|replay> [args...]
  personas
  starters
  spec <persona> [--model M] [--temperature T]
  references <hits.json> [--json]
  replay <persona> <response.json> <message...>";

fn usage_exit() -> ! { eprintln!("{USAGE}"); std::process::exit(1) }

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let ctx = AppContext::from_config(&config)?;
    tracing::debug!(index = %ctx.app.data.index_path(&env::current_dir()?).display(), "configuration loaded");

    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { usage_exit(); }
    let cmd = args.remove(0);
    let out = match cmd.as_str() {
        "personas" => docchat_cli::personas(&ctx),
        "starters" => docchat_cli::starters(&ctx),
        "spec" => {
            let Some(persona) = args.first().cloned() else { usage_exit() };
            let (mut model, mut temperature) = (None, None);
            let mut i = 1;
            while i < args.len() {
                match args[i].as_str() {
                    "--model" => { i += 1; model = Some(args.get(i).cloned().unwrap_or_else(|| usage_exit())); }
                    "--temperature" => { i += 1; temperature = Some(docchat_cli::parse_temperature(args.get(i).map_or("", String::as_str))?); }
                    other => { eprintln!("Unknown option: {other}"); usage_exit(); }
                }
                i += 1;
            }
            docchat_cli::spec(&ctx, &persona, model, temperature)?
        }
        "references" => {
            let Some(file) = args.iter().find(|a| !a.starts_with('-')) else { usage_exit() };
            let as_json = args.iter().any(|a| a == "--json");
            docchat_cli::references(&ctx, &PathBuf::from(file), as_json)?
        }
        "replay" => {
            if args.len() < 3 { usage_exit(); }
            let message = args[2..].join(" ");
            docchat_cli::replay(&ctx, &args[0], &PathBuf::from(&args[1]), &message)?
        }
        _ => { eprintln!("Unknown command: {}", cmd); usage_exit() }
    };
    println!("{out}");
    Ok(())
}
