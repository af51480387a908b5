//! Command definitions, registration, and routing.
//!
//! Commands form a tree: each definition carries a handler plus optional
//! subcommands, and routing descends the tree token by token. Matching is
//! case-insensitive on names and aliases, first registration wins, and a
//! token that matches no subcommand stays in place as a literal argument
//! to its parent.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::context::Context;
use crate::error::{BotError, HookResult};
use crate::events::ChatMessage;

pub mod args;

pub use self::args::{bind, Arg, BindError, Param, ParamKind};

/// Chat reply sent when a non-admin invokes an admin-gated command.
pub const DENIED_REPLY: &str = "You are not allowed to use this command";

/// Application logic behind one command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command with its bound arguments.
    async fn run(&self, ctx: &Context, message: &ChatMessage, args: Vec<Arg>) -> HookResult;
}

/// One command definition: name, matching rules, parameters, handler, and
/// nested subcommands.
///
/// Names and aliases are folded to ASCII lowercase when the definition is
/// built, so matching against case-folded chat tokens is a plain string
/// comparison.
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: String,
    admin: bool,
    unprefixed: bool,
    listed: bool,
    params: Vec<Param>,
    handler: Arc<dyn CommandHandler>,
    subcommands: Vec<Command>,
}

impl Command {
    /// Start a definition with a name and a handler.
    pub fn new(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            aliases: Vec::new(),
            description: String::new(),
            admin: false,
            unprefixed: false,
            listed: true,
            params: Vec::new(),
            handler: Arc::new(handler),
            subcommands: Vec::new(),
        }
    }

    /// Add an alternative name resolving to the same definition.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into().to_ascii_lowercase());
        self
    }

    /// Set the human-readable description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Restrict the command (and everything reached through it) to the
    /// configured admin set.
    pub fn admin(mut self) -> Self {
        self.admin = true;
        self
    }

    /// Match this command against bare chat text instead of prefixed
    /// invocations.
    pub fn unprefixed(mut self) -> Self {
        self.unprefixed = true;
        self
    }

    /// Hide the command from help listings.
    pub fn unlisted(mut self) -> Self {
        self.listed = false;
        self
    }

    /// Declare the next positional parameter.
    pub fn param(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.params.push(Param::new(name, kind));
        self
    }

    /// Attach a subcommand.
    pub fn subcommand(mut self, subcommand: Command) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// The folded command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The folded aliases, in declaration order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// The human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the command is admin-gated.
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Whether the command matches bare chat text.
    pub fn is_unprefixed(&self) -> bool {
        self.unprefixed
    }

    /// Whether help listings should include the command.
    pub fn is_listed(&self) -> bool {
        self.listed
    }

    fn matches(&self, folded: &str) -> bool {
        self.name == folded || self.aliases.iter().any(|alias| alias == folded)
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    fn validate_tree(&self) -> Result<(), RegistryError> {
        validate_siblings(&self.subcommands, &self.name)
    }
}

/// Rejected command registration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("duplicate command name or alias {name:?} {scope}")]
pub struct RegistryError {
    name: String,
    scope: String,
}

impl RegistryError {
    fn top_level(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scope: "at the top level".to_string(),
        }
    }

    fn under(name: &str, parent: &str) -> Self {
        Self {
            name: name.to_string(),
            scope: format!("under {parent:?}"),
        }
    }

    /// The colliding name or alias.
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn validate_siblings(children: &[Command], parent: &str) -> Result<(), RegistryError> {
    for (i, child) in children.iter().enumerate() {
        for label in child.labels() {
            if children[..i].iter().any(|earlier| earlier.matches(label)) {
                return Err(RegistryError::under(label, parent));
            }
        }
        validate_siblings(&child.subcommands, &child.name)?;
    }
    Ok(())
}

/// The registered command set, scanned in registration order.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level command.
    ///
    /// Fails when any name or alias collides with an already registered
    /// sibling, at any depth of the new definition's subtree.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        command.validate_tree()?;
        for label in command.labels() {
            if self.commands.iter().any(|existing| existing.matches(label)) {
                return Err(RegistryError::top_level(label));
            }
        }
        self.commands.push(command);
        Ok(())
    }

    /// Whether no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of top-level commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Registered top-level commands, in registration order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Route one chat message through the registry.
    ///
    /// Prefixed text is matched against regular commands, bare text
    /// against unprefixed ones; in both cases the first match in
    /// registration order wins. A message that matches nothing is not an
    /// error. The admin denial is the only outcome spoken back to chat;
    /// binder and handler failures come back as [`BotError`] for the
    /// caller to log.
    pub async fn route(&self, ctx: &Context, message: &ChatMessage) -> Result<(), BotError> {
        let prefix = ctx.config().prefix.as_str();
        if let Some(invocation) = message.content.strip_prefix(prefix) {
            let mut tokens = invocation.split_whitespace();
            let Some(first) = tokens.next() else {
                return Ok(());
            };
            let folded = first.to_ascii_lowercase();
            let rest: Vec<&str> = tokens.collect();
            for command in &self.commands {
                if !command.unprefixed && command.matches(&folded) {
                    return dispatch(command, ctx, message, &rest, true).await;
                }
            }
            debug!(command = %folded, "no registered command matched");
            Ok(())
        } else {
            let mut tokens = message.content.split_whitespace();
            let Some(first) = tokens.next() else {
                return Ok(());
            };
            let folded = first.to_ascii_lowercase();
            let rest: Vec<&str> = tokens.collect();
            for command in &self.commands {
                if command.unprefixed && command.matches(&folded) {
                    // No admin gate on the unprefixed path.
                    return dispatch(command, ctx, message, &rest, false).await;
                }
            }
            Ok(())
        }
    }
}

async fn dispatch(
    command: &Command,
    ctx: &Context,
    message: &ChatMessage,
    tokens: &[&str],
    gate_admin: bool,
) -> Result<(), BotError> {
    let mut command = command;
    let mut tokens = tokens;
    loop {
        if gate_admin && command.admin && !ctx.is_admin(&message.author) {
            debug!(user = %message.author, command = %command.name, "denied");
            ctx.say(DENIED_REPLY)?;
            return Ok(());
        }
        if command.subcommands.is_empty() {
            break;
        }
        let Some((first, rest)) = tokens.split_first() else {
            break;
        };
        let folded = first.to_ascii_lowercase();
        match command.subcommands.iter().find(|sub| sub.matches(&folded)) {
            Some(child) => {
                command = child;
                tokens = rest;
            }
            // An unmatched token stays in place as a literal argument.
            None => break,
        }
    }

    let args = args::bind(&command.name, &command.params, tokens)?;
    debug!(command = %command.name, args = args.len(), "dispatching");
    command.handler.run(ctx, message, args).await
}
