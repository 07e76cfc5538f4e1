//! # Boleta CLI
//!
//! Command-line interface for printing tickets to a networked thermal
//! printer.
//!
//! ## Usage
//!
//! ```bash
//! # List available ticket templates
//! boleta templates
//!
//! # Print the demo ticket
//! boleta print --host 192.168.1.50 demo
//!
//! # Print a one-line smoke test on a non-default port
//! boleta print --host 192.168.1.50 --port 9101 --text "hello printer"
//! ```

use std::sync::mpsc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use boleta::{
    BoletaError, ConnectionState, TcpTransport,
    elements::Encoding,
    templates,
};

/// Boleta - thermal receipt printer utility
#[derive(Parser, Debug)]
#[command(name = "boleta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a ticket to a network printer
    Print {
        /// Ticket template to print (see `boleta templates`)
        template: Option<String>,

        /// Print this text instead of a template
        #[arg(long, conflicts_with = "template")]
        text: Option<String>,

        /// Printer host name or IP address
        #[arg(long)]
        host: String,

        /// Printer TCP port (9100 is the raw-printing convention)
        #[arg(long, default_value = "9100")]
        port: String,

        /// Give up if the printer is not ready within this many seconds
        #[arg(long, default_value = "10")]
        connect_timeout: u64,
    },

    /// List available ticket templates
    Templates,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), BoletaError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Templates => {
            println!("Available templates:");
            for name in templates::list_templates() {
                println!("  {}", name);
            }
            Ok(())
        }
        Commands::Print {
            template,
            text,
            host,
            port,
            connect_timeout,
        } => {
            let ticket = match (template.as_deref(), text) {
                (_, Some(line)) => templates::text_ticket(line),
                (Some(name), None) => match templates::by_name(name) {
                    Some(ticket) => ticket,
                    None => {
                        eprintln!("Unknown template '{}'. Try `boleta templates`.", name);
                        std::process::exit(2);
                    }
                },
                (None, None) => templates::demo_ticket(),
            };

            let mut printer = TcpTransport::new();

            // Observe the connection lifecycle on a channel so we can both
            // report it and wait for Ready.
            let (state_tx, state_rx) = mpsc::channel();
            printer.on_connection_state_change(move |state| {
                eprintln!("printer: {:?}", state);
                let _ = state_tx.send(state);
            });

            printer.connect(&host, &port)?;
            wait_for_ready(&state_rx, Duration::from_secs(connect_timeout))?;

            printer.print(&ticket.serialize(Encoding::Utf8))?;
            println!("Printed successfully!");

            printer.disconnect();
            Ok(())
        }
    }
}

/// Block until the connection reports Ready, or fail on a terminal state
/// or timeout.
fn wait_for_ready(
    states: &mpsc::Receiver<ConnectionState>,
    timeout: Duration,
) -> Result<(), BoletaError> {
    loop {
        match states.recv_timeout(timeout) {
            Ok(ConnectionState::Ready) => return Ok(()),
            Ok(ConnectionState::SettingUp) => continue,
            Ok(state) => {
                return Err(BoletaError::Transport(format!(
                    "printer connection ended in {:?} before becoming ready",
                    state
                )));
            }
            Err(_) => {
                return Err(BoletaError::Transport(format!(
                    "printer not ready after {:?}",
                    timeout
                )));
            }
        }
    }
}
