use altre_dired::dired::EditorView;
use altre_dired::{local_session, logging, DiredConfig};
use anyhow::Context;
use std::path::PathBuf;

const DEFAULT_DEBUG_LOG: &str = "dired-debug.log";

#[derive(Debug)]
struct CliOptions {
    dir: String,
    show_dot_files: bool,
    select_all: bool,
    debug_log: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_usage();
        return Ok(());
    }
    if args.iter().any(|arg| arg == "--version") {
        println!("dired {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let options = parse_args(&args);

    let mut config = DiredConfig::load().context("failed to load dired configuration")?;
    if options.show_dot_files {
        config.show_dot_files = true;
    }
    if let Some(path) = options.debug_log {
        config.log_level = logging::LogLevel::Debug;
        config.log_file = Some(path);
    }
    logging::init(config.logger());

    let dir = shellexpand::tilde(&options.dir).into_owned();
    let mut session = local_session(&config);
    session.open(&dir);

    if options.select_all {
        session
            .select()
            .with_context(|| format!("cannot select entries in {}", dir))?;
    }

    println!("{}", session.view().text());
    for message in session.take_messages() {
        eprintln!("{}", message.message);
    }

    // 選択済みの行数をステータスとして出す
    let selected = session.view().lines().iter().skip(1).filter(|l| l.starts_with('*')).count();
    if selected > 0 {
        eprintln!("{} selected", selected);
    }

    Ok(())
}

fn parse_args(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        dir: ".".to_string(),
        show_dot_files: false,
        select_all: false,
        debug_log: None,
    };

    for arg in args {
        match arg.as_str() {
            "-a" | "--all" => options.show_dot_files = true,
            "--select-all" => options.select_all = true,
            "--debug-log" => options.debug_log = Some(PathBuf::from(DEFAULT_DEBUG_LOG)),
            other => {
                if let Some(path) = other.strip_prefix("--debug-log=") {
                    options.debug_log = Some(PathBuf::from(path));
                } else if !other.starts_with('-') {
                    options.dir = other.to_string();
                }
            }
        }
    }

    options
}

fn print_usage() {
    println!("Usage: dired [DIRECTORY] [--all] [--select-all] [--debug-log[=PATH]]");
    println!();
    println!("  -a, --all        show dot files");
    println!("      --select-all mark every entry");
    println!("      --debug-log  append debug logs to PATH (default: {})", DEFAULT_DEBUG_LOG);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        parse_args(&args)
    }

    #[test]
    fn test_debug_log_does_not_consume_directory() {
        let options = parse(&["--debug-log", "/srv"]);
        assert_eq!(options.dir, "/srv");
        assert_eq!(options.debug_log, Some(PathBuf::from(DEFAULT_DEBUG_LOG)));
    }

    #[test]
    fn test_debug_log_path_is_attached() {
        let options = parse(&["-a", "--debug-log=/tmp/dired.log", "work"]);
        assert_eq!(options.dir, "work");
        assert!(options.show_dot_files);
        assert_eq!(options.debug_log, Some(PathBuf::from("/tmp/dired.log")));
    }

    #[test]
    fn test_defaults_to_current_directory() {
        let options = parse(&["--select-all"]);
        assert_eq!(options.dir, ".");
        assert!(options.select_all);
        assert!(options.debug_log.is_none());
    }
}
