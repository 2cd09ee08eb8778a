use bsonscan::{cli as prog_cli, logger};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct AppConfig {
    max_record_size: Option<u32>,
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
    log_retention: Option<u32>,
}

fn load_config(cli_cfg: Option<PathBuf>) -> AppConfig {
    // Precedence: CLI > env > config files > defaults
    // 1) Start with defaults
    let mut cfg = AppConfig::default();
    // 2) Environment variables
    if let Ok(s) = std::env::var("BSONSCAN_MAX_RECORD_SIZE") { cfg.max_record_size = s.parse().ok(); }
    if let Ok(s) = std::env::var("BSONSCAN_LOG_DIR") { cfg.log_dir = Some(PathBuf::from(s)); }
    if let Ok(s) = std::env::var("BSONSCAN_LOG_LEVEL") { cfg.log_level = Some(s); }
    if let Ok(s) = std::env::var("BSONSCAN_LOG_RETENTION") { cfg.log_retention = s.parse().ok(); }
    // 3) Config files (custom path, ~/.bsonscanrc, ~/.config/bsonscan.toml, ./bsonscan.toml)
    //    fill whatever is still unset
    let mut paths: Vec<PathBuf> = vec![];
    if let Some(p) = &cli_cfg { paths.push(p.clone()); }
    if let Ok(p) = std::env::var("BSONSCAN_CONFIG") { paths.push(PathBuf::from(p)); }
    if let Ok(home) = std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME")) {
        let home_pb = PathBuf::from(home);
        paths.push(home_pb.join(".bsonscanrc"));
        paths.push(home_pb.join(".config").join("bsonscan.toml"));
    }
    if let Ok(cur) = std::env::current_dir() { paths.push(cur.join("bsonscan.toml")); }
    for p in paths {
        if p.exists() {
            if let Ok(s) = std::fs::read_to_string(&p) {
                if let Ok(file_cfg) = toml::from_str::<AppConfig>(&s) {
                    if cfg.max_record_size.is_none() { cfg.max_record_size = file_cfg.max_record_size; }
                    if cfg.log_dir.is_none() { cfg.log_dir = file_cfg.log_dir; }
                    if cfg.log_level.is_none() { cfg.log_level = file_cfg.log_level; }
                    if cfg.log_retention.is_none() { cfg.log_retention = file_cfg.log_retention; }
                }
            }
        }
    }
    cfg
}

#[derive(Parser, Debug)]
#[command(name = "bsonscan", version, about = "Filter BSON record files with MongoDB-style queries", long_about = None)]
struct Cli {
    /// Path to a config file (TOML)
    #[arg(long, help = "Path to a config file (TOML). If omitted, defaults are used.")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Find documents matching a filter; prints NDJSON to stdout")]
    Find {
        #[arg(help = "Path to the record file")]
        file: PathBuf,
        #[arg(help = "Filter JSON (e.g., {\"age\": {\"$gte\": 21}})")]
        filter: String,
        #[arg(long, help = "Stop after N matches")]
        limit: Option<u64>,
        #[arg(long, help = "Reject records longer than this many bytes")]
        max_record_size: Option<u32>,
        #[arg(long, help = "Log every predicate evaluation")]
        debug: bool,
    },
    #[command(about = "Count documents matching a filter")]
    Count {
        #[arg(help = "Path to the record file")]
        file: PathBuf,
        #[arg(help = "Filter JSON")]
        filter: String,
        #[arg(long, help = "Reject records longer than this many bytes")]
        max_record_size: Option<u32>,
        #[arg(long, help = "Log every predicate evaluation")]
        debug: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.clone());
    let debug = match &cli.command {
        Commands::Find { debug, .. } | Commands::Count { debug, .. } => *debug,
    };
    // The per-predicate trace is debug-level, so --debug raises the threshold
    let level = if debug { Some("debug".to_string()) } else { cfg.log_level.clone() };
    if let Err(e) = logger::configure(cfg.log_dir.as_deref(), level.as_deref(), cfg.log_retention) {
        eprintln!("warning: logging setup failed: {e}");
    }

    let r = match cli.command {
        Commands::Find { file, filter, limit, max_record_size, debug } => {
            prog_cli::run(prog_cli::Command::Find {
                file,
                filter_json: filter,
                limit,
                max_record_len: max_record_size.or(cfg.max_record_size),
                debug,
            })
        }
        Commands::Count { file, filter, max_record_size, debug } => {
            prog_cli::run(prog_cli::Command::Count {
                file,
                filter_json: filter,
                max_record_len: max_record_size.or(cfg.max_record_size),
                debug,
            })
        }
    };
    if let Err(e) = r {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
