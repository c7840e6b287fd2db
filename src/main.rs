//! Kepler Candidate Console
//!
//! Interactive terminal front end: edit a candidate's parameters through the
//! form or as JSON, then send it to the prediction service.

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

use kepler_console::console::{self, Command};
use kepler_console::error::SubmitError;
use kepler_console::input::FieldValue;
use kepler_console::{ConsoleConfig, Dashboard, FeatureRegistry, HttpPredictionClient};

// ──────────────────────────────────────────────────────────────────────────────
// MAIN ENTRY POINT
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = ConsoleConfig::load()?;
    kepler_console::utils::init_tracing(&config.log_filter)?;

    println!("\n{}", "═".repeat(60));
    println!("🔭 Kepler Candidate Console v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "═".repeat(60));
    println!("Prediction service: {}", config.api_url);
    println!("{}\n", "═".repeat(60));

    let client = HttpPredictionClient::with_timeout(&config.api_url, config.timeout_secs)?;
    let dashboard = Dashboard::new(FeatureRegistry::kepler(), Arc::new(client)).with_tasks(config.tasks.clone());
    info!("Console ready ({} features)", FeatureRegistry::kepler().len());

    println!("💡 Type 'help' for commands.\n");

    let stdin = io::stdin();
    loop {
        {
            let controller = dashboard.controller();
            let controller = controller.lock().await;
            print!("{} > ", console::render_status(&controller));
        }
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                println!("❌ {}\n", e);
                continue;
            }
        };

        if command == Command::Quit {
            println!("\n👋 Goodbye!\n");
            break;
        }

        run_command(&dashboard, command, &stdin).await?;
        println!();
    }

    Ok(())
}

// ──────────────────────────────────────────────────────────────────────────────
// COMMAND DISPATCH
// ──────────────────────────────────────────────────────────────────────────────

async fn run_command(dashboard: &Dashboard, command: Command, stdin: &io::Stdin) -> Result<()> {
    let controller = dashboard.controller();

    match command {
        Command::Fields(all) => {
            let controller = controller.lock().await;
            println!("{}", console::render_form(&controller, all));
        }
        Command::Set { id, value } => {
            if let Err(e) = controller.lock().await.set_field_value(&id, value) {
                println!("❌ {}", e);
            }
        }
        Command::Unset(id) => {
            if let Err(e) = controller.lock().await.set_field_value(&id, FieldValue::Unset) {
                println!("❌ {}", e);
            }
        }
        Command::Json => {
            let mut controller = controller.lock().await;
            controller.switch_to_document();
            println!("{}", controller.document_text());
        }
        Command::Edit => {
            println!("Enter JSON, then a line containing only '.':");
            let text = read_block(stdin)?;
            let mut controller = controller.lock().await;
            controller.edit_document(text);
            match controller.document_diagnostic() {
                Some(e) => println!("⚠️  {}", e),
                None => println!("JSON looks valid. Type 'apply' to use it."),
            }
        }
        Command::Apply => match controller.lock().await.apply_document() {
            Ok(()) => println!("✅ Document applied."),
            Err(e) => println!("❌ {}", e),
        },
        Command::Load(path) => match console::load_file(&mut *controller.lock().await, &path) {
            Ok(()) => println!("✅ Loaded {}.", path),
            Err(e) => println!("❌ {:#}", e),
        },
        Command::Form => {
            if controller.lock().await.switch_to_form() {
                println!("⚠️  Unapplied JSON edits were discarded.");
            }
        }
        Command::Export => {
            println!("{}", controller.lock().await.export_to_document());
        }
        Command::Validate => {
            let result = controller.lock().await.validate();
            println!("{}", console::render_validation(&result));
        }
        Command::Submit => {
            println!("🚀 Analyzing...");
            match dashboard.submit().await {
                Ok(_) => println!("{}", console::render_panel(&dashboard.panel().await)),
                Err(SubmitError::Invalid(result)) => println!("{}", console::render_validation(&result)),
                Err(SubmitError::Transport(_)) => println!("{}", console::render_panel(&dashboard.panel().await)),
                Err(e) => println!("❌ {}", e),
            }
        }
        Command::Health => match dashboard.health().await {
            Ok(health) => println!("{}", console::render_health(&health)),
            Err(e) => println!("❌ {}", e),
        },
        Command::Dismiss => {
            dashboard.dismiss_error().await;
            println!("{}", console::render_panel(&dashboard.panel().await));
        }
        Command::Help => println!("{}", console::HELP),
        Command::Quit => {}
    }

    Ok(())
}

/// Read lines until a lone `.` or end of input.
fn read_block(stdin: &io::Stdin) -> Result<String> {
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim() == "." {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}
