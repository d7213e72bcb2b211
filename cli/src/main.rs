use anyhow::Result;
use clap::Parser;
use collateral_cli::clipboard::{ClipboardSink, FileClipboard, TerminalClipboard};
use collateral_cli::config::Args;
use collateral_cli::ledger::Ledger;
use collateral_cli::logging;
use collateral_cli::ui::{run_app, App};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::panic;
use std::sync::Arc;
use tracing::{error, info};

fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_target())?;

    let ledger = if args.empty {
        Ledger::new()
    } else {
        Ledger::seeded()
    };

    // Print mode - write the summary and exit
    if args.print {
        info!(liens = ledger.len(), "printing summary");
        println!("{}", ledger.summary_text());
        return Ok(());
    }

    let clipboard: Arc<dyn ClipboardSink> = match &args.clipboard_file {
        Some(path) => Arc::new(FileClipboard::new(path)),
        None => Arc::new(TerminalClipboard),
    };
    info!(target_sink = %clipboard.describe(), liens = ledger.len(), "starting");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let app = App::new(ledger, clipboard);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    cleanup_terminal();
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "ui loop failed");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
