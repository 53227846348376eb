//! Interactive read-eval-print loop.
//!
//! Provides `frontdesk chat`: a terminal conversation with the receptionist,
//! streamed as it is generated.

use crate::render;
use frontdesk_agent::Receptionist;
use frontdesk_core::SessionId;
use futures::StreamExt;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// A slash command typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Quit,
    New,
    Status,
    Unknown(String),
}

impl SlashCommand {
    /// Parse `line` if it is a slash command.
    pub fn parse(line: &str) -> Option<Self> {
        let command = line.strip_prefix('/')?;
        Some(match command.trim() {
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "new" => Self::New,
            "status" => Self::Status,
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// The interactive REPL.
pub struct Repl {
    receptionist: Receptionist,
    session: SessionId,
    clinic: String,
}

impl Repl {
    pub fn new(receptionist: Receptionist, session: SessionId, clinic: String) -> Self {
        Self {
            receptionist,
            session,
            clinic,
        }
    }

    /// Run the REPL loop until `/quit`, Ctrl-C or Ctrl-D.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        render::render_welcome(&self.clinic, &self.receptionist.config().model);
        let mut editor = DefaultEditor::new()?;

        loop {
            let line = match editor.readline("you> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let _ = editor.add_history_entry(line);

            match SlashCommand::parse(line) {
                Some(SlashCommand::Quit) => break,
                Some(SlashCommand::Help) => render::render_help(),
                Some(SlashCommand::New) => {
                    self.session = SessionId::generate();
                    render::render_notice(&format!("Started session {}", self.session));
                }
                Some(SlashCommand::Status) => {
                    let sessions = self.receptionist.sessions().len().await;
                    render::render_notice(&format!(
                        "Session {} ({} live)",
                        self.session, sessions
                    ));
                }
                Some(SlashCommand::Unknown(name)) => {
                    render::render_notice(&format!("Unknown command /{}, try /help", name));
                }
                None => self.send(line).await,
            }
        }

        Ok(())
    }

    async fn send(&self, message: &str) {
        let mut events = self.receptionist.stream(self.session.clone(), message);
        render::render_reply_prefix();
        while let Some(event) = events.next().await {
            render::render_event(&event);
        }
    }
}
