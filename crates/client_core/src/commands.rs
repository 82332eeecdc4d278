//! Slash commands understood by every session.

use shared::domain::BufferRef;
use tracing::debug;

use crate::{
    buffers::NewBuffer,
    connections::ConnectOptions,
    error::{CoreError, CoreResult},
    CommandHandler, CommandPredicate, Orchestrator,
};

/// Treats input starting with `/` as a command. A leading `//` is ordinary text.
pub struct SlashCommandPredicate;

impl CommandPredicate for SlashCommandPredicate {
    fn is_command(&self, raw: &str) -> bool {
        raw.starts_with('/') && !raw.starts_with("//")
    }
}

/// Handles `/connect`, `/query` (`/join`), `/close` and `/msg`.
#[derive(Debug, Clone, Default)]
pub struct BuiltinCommands {
    identity: ConnectOptions,
}

impl BuiltinCommands {
    /// `identity` is used for servers opened with `/connect`.
    pub fn new(identity: ConnectOptions) -> Self {
        Self { identity }
    }

    fn connect(&self, orchestrator: &mut Orchestrator, args: &str) -> CoreResult<()> {
        let mut args = args.split_whitespace();
        let server_id = args
            .next()
            .ok_or_else(|| usage("/connect <server> [nick]"))?;
        let options = match args.next() {
            Some(nick) => self.identity.clone().with_nick(nick),
            None => self.identity.clone(),
        };
        orchestrator.connect(server_id, &options)
    }

    fn query(orchestrator: &mut Orchestrator, server_id: &str, args: &str) -> CoreResult<()> {
        let name = single_arg(args).ok_or_else(|| usage("/query <name>"))?;
        orchestrator.create_buffer(NewBuffer::new(server_id, name).focus(true));
        Ok(())
    }

    fn close(orchestrator: &mut Orchestrator, server_id: &str, args: &str) -> CoreResult<()> {
        let name = single_arg(args).ok_or_else(|| usage("/close <name>"))?;
        let Err(err) = orchestrator.delete_buffer(&BufferRef::new(server_id, name)) else {
            return Ok(());
        };
        if !err.is_not_found() {
            return Err(err);
        }
        // Tell the user in the server console; without one, hand the error back.
        let console = BufferRef::server(server_id);
        if orchestrator.buffer_exists(&console) {
            orchestrator.write_to_buffer(&console, format!("cannot close {name}: {err}"), None)
        } else {
            Err(err)
        }
    }

    fn msg(orchestrator: &mut Orchestrator, server_id: &str, args: &str) -> CoreResult<()> {
        let (target, text) = args
            .trim_start()
            .split_once(char::is_whitespace)
            .map(|(target, text)| (target, text.trim_start()))
            .filter(|(_, text)| !text.is_empty())
            .ok_or_else(|| usage("/msg <target> <text>"))?;
        orchestrator.send_to(server_id, target, text)?;
        orchestrator.create_buffer(NewBuffer::new(server_id, target));
        Ok(())
    }
}

impl CommandHandler for BuiltinCommands {
    fn handle(
        &self,
        orchestrator: &mut Orchestrator,
        server_id: &str,
        raw: &str,
    ) -> CoreResult<()> {
        let (name, args) = split_command(raw);
        debug!(command = %name, server_id, "handling command");
        match name.to_ascii_lowercase().as_str() {
            "connect" => self.connect(orchestrator, args),
            "query" | "join" => Self::query(orchestrator, server_id, args),
            "close" => Self::close(orchestrator, server_id, args),
            "msg" => Self::msg(orchestrator, server_id, args),
            "" => Err(CoreError::Command("empty command".to_string())),
            other => Err(CoreError::Command(format!("unknown command /{other}"))),
        }
    }
}

/// Splits `/name rest of line` into `("name", "rest of line")`.
fn split_command(raw: &str) -> (&str, &str) {
    let body = raw.strip_prefix('/').unwrap_or(raw);
    match body.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (body.trim_end(), ""),
    }
}

fn single_arg(args: &str) -> Option<&str> {
    let mut parts = args.split_whitespace();
    let arg = parts.next()?;
    parts.next().is_none().then_some(arg)
}

fn usage(text: &str) -> CoreError {
    CoreError::Command(format!("usage: {text}"))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
