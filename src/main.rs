use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use edudash::{
    App, AppConfig, AppEvent, Args, ConfigManager, CsvOptions, SourcePaths, Theme, APP_NAME,
};
use ratatui::DefaultTerminal;
use std::sync::mpsc::channel;

/// Resolve the two source files and CSV options from CLI args and config,
/// with CLI args taking precedence.
fn resolve_sources(args: &Args, config: &AppConfig) -> Result<(SourcePaths, CsvOptions)> {
    let observations = args
        .observations
        .clone()
        .or_else(|| config.data.observations.clone())
        .ok_or_else(|| {
            eyre!("no observations file given (pass a path or set [data].observations in config)")
        })?;
    let metadata = args
        .metadata
        .clone()
        .or_else(|| config.data.metadata.clone())
        .ok_or_else(|| {
            eyre!("no metadata file given (pass a path or set [data].metadata in config)")
        })?;
    let options = CsvOptions {
        delimiter: args.delimiter.or(config.data.delimiter),
    };
    Ok((
        SourcePaths {
            observations,
            metadata,
        },
        options,
    ))
}

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(mut terminal: DefaultTerminal, args: &Args, config: &AppConfig) -> Result<()> {
    let theme = Theme::from_config(&config.theme).unwrap_or_else(|e| {
        eprintln!("Warning: {}. Using default theme.", e);
        Theme::from_config(&AppConfig::default().theme).unwrap_or_default()
    });

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(tx.clone(), theme, config);
    if args.debug {
        app.enable_debug();
    }
    if let Some(page) = args.page {
        app.set_start_page(page);
    }

    let (paths, options) = resolve_sources(args, config)?;
    render(&mut terminal, &mut app)?;
    tx.send(AppEvent::Open(paths, options))?;

    loop {
        if crossterm::event::poll(std::time::Duration::from_millis(25))? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(std::time::Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = ConfigManager::new(APP_NAME)?;
    if args.write_default_config {
        match config_manager.write_default_config(false) {
            Ok(path) => {
                println!("Wrote default config to {}", path.display());
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error writing config: {}", e);
                std::process::exit(1);
            }
        }
    }
    let config = config_manager.load_config();

    color_eyre::install()?;
    let terminal = ratatui::init();
    let result = run(terminal, &args, &config);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args_with(observations: Option<PathBuf>, metadata: Option<PathBuf>) -> Args {
        Args {
            observations,
            metadata,
            delimiter: None,
            page: None,
            debug: false,
            write_default_config: false,
        }
    }

    #[test]
    fn cli_paths_take_precedence() {
        let mut config = AppConfig::default();
        config.data.observations = Some(PathBuf::from("config_obs.csv"));
        config.data.metadata = Some(PathBuf::from("config_meta.csv"));
        config.data.delimiter = Some(b';');

        let args = args_with(Some(PathBuf::from("cli_obs.csv")), None);
        let (paths, options) = resolve_sources(&args, &config).unwrap();
        assert_eq!(paths.observations, PathBuf::from("cli_obs.csv"));
        assert_eq!(paths.metadata, PathBuf::from("config_meta.csv"));
        assert_eq!(options.delimiter, Some(b';'));
    }

    #[test]
    fn missing_paths_error() {
        let config = AppConfig::default();
        let args = args_with(None, None);
        let err = resolve_sources(&args, &config).unwrap_err();
        assert!(err.to_string().contains("observations"));
    }
}
