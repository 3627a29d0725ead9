use log::{LevelFilter, error};
use rt_mix::cli::cli_main::run_interactive_menu;
use rt_mix::cli::cli_plan::run_with_path;
use rt_mix::settings::ConfigManager;
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode};

pub fn main() {
    if TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        let _ = SimpleLogger::init(LevelFilter::Info, Config::default());
    }

    let manager = ConfigManager::new();
    let config = manager.get_config();

    match std::env::args().nth(1) {
        Some(path) => {
            if let Err(e) = run_with_path(&path, config) {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        None => run_interactive_menu(config),
    }
}
