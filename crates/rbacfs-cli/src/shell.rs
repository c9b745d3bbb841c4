//! Command dispatch for the interactive shell
//!
//! Each input line is parsed into a [`Command`] and run against the
//! guarded file store. Results come back as a [`Reply`] for the console
//! to render, so the dispatcher itself never prints.

use rbacfs_core::{GuardedFileStore, Permission, StorageBackend};
use tracing::debug;

pub const HELP: &str = "\
Commands:
  add_role <role> <perm1,perm2,...>   Define or replace a role
  assign_role <user> <role>           Assign an existing role to a user
  create <user> <path> [content]      Create or overwrite a file
  read <user> <path>                  Print a file
  write <user> <path> <content>       Replace the content of an existing file
  delete <user> <path>                Remove a file
  permissions <user>                  List a user's effective permissions
  check <user> <permission>           Check a single permission
  roles                               List defined roles
  help                                Show this help
  quit | exit                         Leave the shell";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddRole { role: String, permissions: Vec<String> },
    AssignRole { user: String, role: String },
    Create { user: String, path: String, content: String },
    Read { user: String, path: String },
    Write { user: String, path: String, content: String },
    Delete { user: String, path: String },
    Permissions { user: String },
    Check { user: String, permission: String },
    Roles,
    Help,
    Quit,
}

/// Outcome of one command, rendered by the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Blank input
    Nothing,
    /// Confirmation or informational text
    Info(String),
    /// File content returned by a read
    Content { path: String, body: String },
    /// A core operation failed
    Failure(String),
    /// Unknown command or wrong arguments
    Usage(String),
    Quit,
}

/// Split off the first `n` whitespace-separated words and return the
/// remainder with leading whitespace removed
fn split_words(input: &str, n: usize) -> (Vec<&str>, &str) {
    let mut words = Vec::with_capacity(n);
    let mut rest = input.trim_start();

    while words.len() < n && !rest.is_empty() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        words.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }

    (words, rest)
}

/// Exactly `n` words and nothing after them
fn exact_words(args: &str, n: usize) -> Option<Vec<String>> {
    let (words, rest) = split_words(args, n);
    if words.len() == n && rest.is_empty() {
        Some(words.into_iter().map(str::to_string).collect())
    } else {
        None
    }
}

fn usage(text: &str) -> String {
    format!("Usage: {}", text)
}

impl Command {
    /// Parse a line. `Ok(None)` for a blank line, `Err` holds a usage message.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let (head, args) = split_words(line, 1);
        let Some(name) = head.first() else {
            return Ok(None);
        };

        let command = match *name {
            "add_role" => {
                let (words, rest) = split_words(args, 1);
                let permissions: Vec<String> = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
                match words.first() {
                    Some(role) if !permissions.is_empty() => Command::AddRole {
                        role: role.to_string(),
                        permissions,
                    },
                    _ => return Err(usage("add_role <role> <perm1,perm2,...>")),
                }
            }
            "assign_role" => match exact_words(args, 2) {
                Some(w) => Command::AssignRole {
                    user: w[0].clone(),
                    role: w[1].clone(),
                },
                None => return Err(usage("assign_role <user> <role>")),
            },
            "create" => {
                let (words, content) = split_words(args, 2);
                if words.len() < 2 {
                    return Err(usage("create <user> <path> [content]"));
                }
                Command::Create {
                    user: words[0].to_string(),
                    path: words[1].to_string(),
                    content: content.to_string(),
                }
            }
            "write" => {
                let (words, content) = split_words(args, 2);
                if words.len() < 2 || content.is_empty() {
                    return Err(usage("write <user> <path> <content>"));
                }
                Command::Write {
                    user: words[0].to_string(),
                    path: words[1].to_string(),
                    content: content.to_string(),
                }
            }
            "read" => match exact_words(args, 2) {
                Some(w) => Command::Read {
                    user: w[0].clone(),
                    path: w[1].clone(),
                },
                None => return Err(usage("read <user> <path>")),
            },
            "delete" => match exact_words(args, 2) {
                Some(w) => Command::Delete {
                    user: w[0].clone(),
                    path: w[1].clone(),
                },
                None => return Err(usage("delete <user> <path>")),
            },
            "permissions" => match exact_words(args, 1) {
                Some(w) => Command::Permissions { user: w[0].clone() },
                None => return Err(usage("permissions <user>")),
            },
            "check" => match exact_words(args, 2) {
                Some(w) => Command::Check {
                    user: w[0].clone(),
                    permission: w[1].clone(),
                },
                None => return Err(usage("check <user> <permission>")),
            },
            "roles" => Command::Roles,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(format!(
                    "Unknown command '{}'. Type 'help' for a list of commands.",
                    other
                ))
            }
        };

        Ok(Some(command))
    }
}

/// Shell state: the guarded store and the registry it owns
pub struct Shell<B: StorageBackend> {
    store: GuardedFileStore<B>,
}

impl<B: StorageBackend> Shell<B> {
    pub fn new(store: GuardedFileStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &GuardedFileStore<B> {
        &self.store
    }

    /// Parse and run one line of input
    pub fn execute(&mut self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(Some(command)) => self.run(command),
            Ok(None) => Reply::Nothing,
            Err(message) => Reply::Usage(message),
        }
    }

    pub fn run(&mut self, command: Command) -> Reply {
        debug!("Running shell command: {:?}", command);

        match command {
            Command::AddRole { role, permissions } => {
                let mut sorted = permissions.clone();
                sorted.sort();
                sorted.dedup();
                self.store.registry_mut().define_role(role.clone(), permissions);
                Reply::Info(format!(
                    "Role '{}' defined with permissions: {}",
                    role,
                    sorted.join(", ")
                ))
            }
            Command::AssignRole { user, role } => {
                match self.store.registry_mut().assign_role(&user, &role) {
                    Ok(()) => Reply::Info(format!("User '{}' assigned to role '{}'", user, role)),
                    Err(e) => Reply::Failure(e.to_string()),
                }
            }
            Command::Create { user, path, content } => {
                match self.store.create(&user, &path, &content) {
                    Ok(()) => Reply::Info(format!("File '{}' created by '{}'", path, user)),
                    Err(e) => Reply::Failure(e.to_string()),
                }
            }
            Command::Read { user, path } => match self.store.read(&user, &path) {
                Ok(body) => Reply::Content { path, body },
                Err(e) => Reply::Failure(e.to_string()),
            },
            Command::Write { user, path, content } => {
                match self.store.write(&user, &path, &content) {
                    Ok(()) => Reply::Info(format!("File '{}' updated by '{}'", path, user)),
                    Err(e) => Reply::Failure(e.to_string()),
                }
            }
            Command::Delete { user, path } => match self.store.delete(&user, &path) {
                Ok(()) => Reply::Info(format!("File '{}' deleted by '{}'", path, user)),
                Err(e) => Reply::Failure(e.to_string()),
            },
            Command::Permissions { user } => {
                let mut permissions: Vec<Permission> = self
                    .store
                    .registry()
                    .effective_permissions(&user)
                    .into_iter()
                    .collect();
                permissions.sort();

                if permissions.is_empty() {
                    Reply::Info(format!(
                        "User '{}' has no permissions or does not exist",
                        user
                    ))
                } else {
                    let listed: Vec<&str> = permissions.iter().map(Permission::as_str).collect();
                    Reply::Info(format!("Permissions of '{}': {}", user, listed.join(", ")))
                }
            }
            Command::Check { user, permission } => {
                if self.store.registry().has_permission(&user, &permission) {
                    Reply::Info(format!("User '{}' has permission '{}'", user, permission))
                } else {
                    Reply::Info(format!(
                        "User '{}' does not have permission '{}'",
                        user, permission
                    ))
                }
            }
            Command::Roles => {
                let roles = self.store.registry().roles();
                if roles.is_empty() {
                    return Reply::Info("No roles defined".to_string());
                }
                let lines: Vec<String> = roles
                    .iter()
                    .map(|role| {
                        let permissions: Vec<&str> = role
                            .sorted_permissions()
                            .into_iter()
                            .map(Permission::as_str)
                            .collect();
                        format!("{}: {}", role.name, permissions.join(", "))
                    })
                    .collect();
                Reply::Info(lines.join("\n"))
            }
            Command::Help => Reply::Info(HELP.to_string()),
            Command::Quit => Reply::Quit,
        }
    }
}
