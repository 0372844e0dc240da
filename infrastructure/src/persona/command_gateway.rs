//! Persona gateway backed by an external command.
//!
//! Each persona call runs the configured program once: the prompt is written
//! to its stdin, `{persona}` in the arguments is replaced by the persona name,
//! and `COUNCIL_PERSONA` is set in its environment. Whatever the program
//! prints on stdout is the persona's raw answer.

use crate::config::{FilePersonasConfig, PERSONA_PLACEHOLDER};
use async_trait::async_trait;
use council_application::ports::persona_gateway::{GatewayError, PersonaGateway};
use council_domain::core::string::truncate;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Environment variable carrying the persona name into the child process
pub const PERSONA_ENV_VAR: &str = "COUNCIL_PERSONA";

/// Maximum stderr excerpt kept in an error message
const MAX_STDERR_EXCERPT: usize = 500;

/// Runs one external command per persona call
#[derive(Debug, Clone)]
pub struct CommandPersonaGateway {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandPersonaGateway {
    /// Build from `[program, args...]`
    pub fn new(command: &[String]) -> Result<Self, GatewayError> {
        let (program, args) = command
            .split_first()
            .filter(|(program, _)| !program.trim().is_empty())
            .ok_or_else(|| GatewayError::Other("persona command is empty".to_string()))?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            working_dir: None,
        })
    }

    /// Build from the `[personas]` section
    pub fn from_config(config: &FilePersonasConfig) -> Result<Self, GatewayError> {
        let gateway = Self::new(&config.command)?;
        Ok(match &config.working_dir {
            Some(dir) => gateway.with_working_dir(dir),
            None => gateway,
        })
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Whether the program can be found (on `PATH` or as a path)
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn args_for(&self, persona: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(PERSONA_PLACEHOLDER, persona))
            .collect()
    }
}

#[async_trait]
impl PersonaGateway for CommandPersonaGateway {
    async fn generate(&self, persona: &str, prompt: &str) -> Result<String, GatewayError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args_for(persona))
            .env(PERSONA_ENV_VAR, persona)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A timed-out call drops this future; the child must not outlive it
            .kill_on_drop(true);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        debug!("Running {} for persona {}", self.program, persona);
        let mut child = cmd.spawn().map_err(|e| {
            GatewayError::PersonaNotAvailable(format!("failed to spawn {}: {}", self.program, e))
        })?;

        // Feed stdin concurrently so a chatty child cannot fill its stdout pipe first
        if let Some(mut stdin) = child.stdin.take() {
            let prompt = prompt.to_string();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    debug!("Persona command closed stdin early: {}", e);
                }
            });
        }

        let output = child.wait_with_output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            warn!("Persona {} command exited with {}", persona, code);
            return Err(GatewayError::RequestFailed(format!(
                "{} exited with {}: {}",
                self.program,
                code,
                truncate(stderr.trim(), MAX_STDERR_EXCERPT)
            )));
        }

        if stdout.trim().is_empty() {
            return Err(GatewayError::RequestFailed(format!(
                "{} produced no output for persona {}",
                self.program, persona
            )));
        }

        Ok(stdout)
    }
}
