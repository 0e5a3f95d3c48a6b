//! This crate serves purely as an rest api abstraction for a remote shell command execution server.
//! Additionally there is a canonical server implementation in the same repository.
//!
//! The server hands the command text unmodified to the host shell,
//! so pipes, redirection and globbing all work as if typed into a terminal.
//!
//! ## Usage
//! For the complete usage, see the serde structs in [`api`].
//! * `POST /run-command` runs a [`api::CommandRequest`] and answers with an [`api::CommandResult`].
//!   * `200` with `{"output": ...}` if the command exited with status zero.
//!   * `400` with `{"error": "No command provided"}` if the command is missing or empty.
//!   * `500` with `{"error": ...}` carrying the standard error of a failing command,
//!     or a description of why the shell could not be started.
//!
//! ## Long running jobs
//! The call waits until the command terminates and returns then, there is no timeout.
//! *Make sure your commands always terminate* in order to not lock up valuable resources.
//!
//! ## Security
//! The api does not include any security measures, this is *remote execution as a service!*.
//! Make sure it is only reachable from trusted hosts. E.g. by means of ssh port forwarding.

pub mod api;
