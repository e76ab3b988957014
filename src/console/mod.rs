//! Interactive console session.
//!
//! Reads one command per line and maps it onto workflow events, the way the
//! browser form maps clicks and key presses. Output goes to the writer; logs
//! go to tracing.

use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::diagnostics::DiagnosticsService;
use crate::export::ReportFormat;
use crate::form::{FormField, InputModel};
use crate::render::render_result;
use crate::workflow::{SubmitOutcome, WorkflowController};

const HELP: &str = "\
Commands:
  target <domain-or-ip>     set the target
  run [target]              run diagnostics (optionally setting the target first)
  toggle                    open/collapse the incident context section
  set <field> <value>       set an incident context field
                            fields: start, detection, users, criticality,
                                    firewall, dns, deployment
  show                      show the form, last error and last result
  export <technical|executive|json>
                            save a report for the last result
  state                     dump the session state as JSON
  help                      show this help
  quit                      leave";

/// One parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Target(String),
    Run(Option<String>),
    Toggle,
    Set { field: FormField, value: String },
    Show,
    Export(ReportFormat),
    State,
    Help,
    Quit,
}

impl Command {
    /// Parse a command line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "target" => Command::Target(rest.to_string()),
            "run" => Command::Run((!rest.is_empty()).then(|| rest.to_string())),
            "toggle" => Command::Toggle,
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(f, v)| (f, v.trim()))
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("Usage: set <field> <value>".to_string());
                }
                let field = field.parse::<FormField>().map_err(|e| e.to_string())?;
                Command::Set {
                    field,
                    value: value.to_string(),
                }
            }
            "show" => Command::Show,
            "export" => Command::Export(rest.parse()?),
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command: {} (try 'help')", other)),
        };

        Ok(Some(command))
    }
}

/// Result of handling one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to print (possibly empty); keep reading.
    Continue(String),
    /// End the session.
    Quit,
}

/// Console front-end over a workflow controller
pub struct Console<S> {
    controller: WorkflowController<S>,
    export_dir: PathBuf,
}

impl<S: DiagnosticsService> Console<S> {
    /// Create a console writing exports into `export_dir`.
    pub fn new(controller: WorkflowController<S>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            controller,
            export_dir: export_dir.into(),
        }
    }

    /// The underlying controller.
    pub fn controller(&self) -> &WorkflowController<S> {
        &self.controller
    }

    /// Run on stdin/stdout until `quit` or EOF.
    pub async fn run(&self) -> std::io::Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.run_with(reader, writer).await
    }

    /// Run over arbitrary streams until `quit` or EOF.
    pub async fn run_with<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Console session started");
        writer.write_all(b"Network RCA console. Type 'help' for commands.\n").await?;
        writer.flush().await?;

        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await?;

            // EOF reached
            if bytes_read == 0 {
                info!("EOF received, ending session");
                break;
            }

            debug!(command = %line.trim(), "Received command");

            match self.handle_line(&line).await {
                Reply::Continue(output) => {
                    if !output.is_empty() {
                        writer.write_all(output.as_bytes()).await?;
                        if !output.ends_with('\n') {
                            writer.write_all(b"\n").await?;
                        }
                        writer.flush().await?;
                    }
                }
                Reply::Quit => break,
            }
        }

        info!("Console session ended");
        Ok(())
    }

    /// Handle a single input line.
    pub async fn handle_line(&self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Reply::Continue(String::new()),
            Err(message) => Reply::Continue(format!("Error: {}", message)),
        }
    }

    async fn execute(&self, command: Command) -> Reply {
        let output = match command {
            Command::Target(value) => self.set_field(FormField::Target, &value),
            Command::Run(target) => {
                if let Some(target) = target {
                    if let Err(e) = self.controller.set_field(FormField::Target, &target) {
                        return Reply::Continue(format!("Error: {}", e));
                    }
                }
                self.run_diagnostics().await
            }
            Command::Toggle => {
                if self.controller.toggle_enterprise() {
                    "Incident context: included in the next run".to_string()
                } else {
                    "Incident context: excluded from the next run".to_string()
                }
            }
            Command::Set { field, value } => self.set_field(field, &value),
            Command::Show => self.show(),
            Command::Export(format) => self.export(format),
            Command::State => match serde_json::to_string_pretty(&self.controller.snapshot()) {
                Ok(json) => json,
                Err(e) => format!("Error: {}", e),
            },
            Command::Help => HELP.to_string(),
            Command::Quit => return Reply::Quit,
        };
        Reply::Continue(output)
    }

    fn set_field(&self, field: FormField, value: &str) -> String {
        match self.controller.set_field(field, value) {
            Ok(()) => String::new(),
            Err(e) => format!("Error: {}", e),
        }
    }

    async fn run_diagnostics(&self) -> String {
        match self.controller.submit().await {
            SubmitOutcome::Succeeded => self
                .controller
                .results()
                .map(|result| render_result(&result))
                .unwrap_or_default(),
            SubmitOutcome::Failed { message } => format!("Error: {}", message),
            SubmitOutcome::Rejected(e) => format!("Error: {}", e),
            SubmitOutcome::Ignored => "Diagnostics are already running".to_string(),
        }
    }

    fn show(&self) -> String {
        let state = self.controller.snapshot();
        let mut out = render_form(&state.input);
        if let Some(error) = &state.error {
            out.push_str(&format!("\nError: {}\n", error));
        }
        if let Some(result) = &state.results {
            out.push('\n');
            out.push_str(&render_result(result));
        }
        out
    }

    fn export(&self, format: ReportFormat) -> String {
        let file = match self.controller.export(format) {
            Ok(Some(file)) => file,
            Ok(None) => return String::new(),
            Err(e) => return format!("Error: {}", e),
        };

        match file.write_to(&self.export_dir) {
            Ok(path) => format!("Saved {} ({})", path.display(), file.media_type),
            Err(e) => {
                error!(error = %e, filename = %file.filename, "Failed to save report");
                format!("Error: {}", e)
            }
        }
    }
}

fn render_form(input: &InputModel) -> String {
    let mut lines = vec![
        format!("Target: {}", input.target.trim()),
        format!(
            "Incident context: {}",
            if input.show_enterprise_inputs {
                "included"
            } else {
                "excluded"
            }
        ),
    ];
    if input.show_enterprise_inputs {
        lines.extend(
            FormField::ALL
                .into_iter()
                .filter(|f| f.is_enterprise())
                .map(|field| format!("  {}: {}", field, input.field_text(field))),
        );
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
