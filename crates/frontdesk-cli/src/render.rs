//! Terminal rendering utilities.

use console::style;
use frontdesk_agent::AgentEvent;
use std::io::Write;

/// Print one receptionist event as it arrives.
pub fn render_event(event: &AgentEvent) {
    match event {
        AgentEvent::Text { chunk } => {
            print!("{}", chunk);
            let _ = std::io::stdout().flush();
        }
        AgentEvent::Tool { name } => {
            eprintln!();
            eprintln!("  {} {}", style("~").yellow(), style(name).dim());
        }
        AgentEvent::Error { message } => {
            eprintln!();
            eprintln!("{} {}", style("error:").red().bold(), message);
        }
        AgentEvent::Done => println!("\n"),
    }
}

pub fn render_reply_prefix() {
    print!("{} ", style("sarah>").cyan().bold());
    let _ = std::io::stdout().flush();
}

pub fn render_notice(text: &str) {
    eprintln!("{}", style(text).dim());
}

/// Print the welcome banner for the REPL.
pub fn render_welcome(clinic: &str, model: &str) {
    eprintln!(
        "{} {} {}",
        style("frontdesk").bold().cyan(),
        style(clinic).bold(),
        style(format!("({})", model)).dim(),
    );
    eprintln!("{}", style("Type /help for commands, /quit to exit.").dim());
    eprintln!();
}

/// Print the help message.
pub fn render_help() {
    eprintln!("{}", style("Available commands:").bold());
    eprintln!("  {}   - Show this help", style("/help").cyan());
    eprintln!("  {}   - Exit", style("/quit").cyan());
    eprintln!("  {}    - Start a new session", style("/new").cyan());
    eprintln!("  {} - Show session status", style("/status").cyan());
    eprintln!();
}
