use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

pub const VERSION: &str = "1.0.0";

/// Error message of the `400` response for a missing or empty command.
pub const NO_COMMAND_PROVIDED: &str = "No command provided";

/// The body of `POST /run-command`.
///
/// A missing or `null` command still decodes, use [`CommandRequest::command`] to validate it.
/// Anything but a json object is refused, so a `["ls"]` body never reaches the shell.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommandRequest {
    /// Shell command line, interpreted by the shell of the server host.
    pub command: Option<String>,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
        }
    }

    /// The command to run, `None` if it was absent, `null` or empty.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref().filter(|command| !command.is_empty())
    }
}

// Derived impls also accept a sequence of the fields in order.
impl<'de> Deserialize<'de> for CommandRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = CommandRequest;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a json object with a `command` field")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CommandRequest, A::Error> {
                let mut command: Option<Option<String>> = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "command" {
                        if command.is_some() {
                            return Err(de::Error::duplicate_field("command"));
                        }
                        command = Some(map.next_value()?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(CommandRequest {
                    command: command.flatten(),
                })
            }
        }

        deserializer.deserialize_map(RequestVisitor)
    }
}

/// Describes the json response format for `/run-command`.
///
/// # Serialized Example
/// ```
/// # let ser = r#"
/// {
///     "error": "sh: 1: nonexistent-binary-xyz: not found\n"
/// }
/// # "#;
/// # let deser: shell_shim_api::api::CommandResult
/// #    = serde_json::from_str(ser).expect("failed parsing");
/// # assert!(matches!(deser, shell_shim_api::api::CommandResult::Failure { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandResult {
    /// The command exited with status zero.
    Success {
        /// Captured standard output. Standard error is dropped.
        output: String,
    },
    /// The command exited with a non-zero status or could not be started.
    Failure {
        /// Captured standard error, or a description of the execution fault.
        error: String,
    },
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_null_and_empty_commands_are_rejected() {
        for body in [json!({}), json!({ "command": null }), json!({ "command": "" })] {
            let request: CommandRequest = serde_json::from_value(body.clone()).unwrap();
            assert_eq!(request.command(), None, "{body}");
        }
    }

    #[test]
    fn command_is_kept_verbatim() {
        let request: CommandRequest =
            serde_json::from_value(json!({ "command": " ls | wc -l > out.txt " })).unwrap();
        assert_eq!(request.command(), Some(" ls | wc -l > out.txt "));
    }

    #[test]
    fn non_text_command_does_not_decode() {
        assert!(serde_json::from_value::<CommandRequest>(json!({ "command": 5 })).is_err());
    }

    #[test]
    fn only_objects_decode() {
        for body in [json!(["echo executed"]), json!([]), json!("echo hello"), json!(null)] {
            assert!(serde_json::from_value::<CommandRequest>(body.clone()).is_err(), "{body}");
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let request: CommandRequest =
            serde_json::from_value(json!({ "shell": "bash", "command": "ls" })).unwrap();
        assert_eq!(request.command(), Some("ls"));
    }

    #[test]
    fn result_wire_format() {
        let success = CommandResult::Success {
            output: String::from("hello\n"),
        };
        assert_eq!(
            serde_json::to_value(&success).unwrap(),
            json!({ "output": "hello\n" })
        );

        let failure = CommandResult::Failure {
            error: String::new(),
        };
        assert_eq!(serde_json::to_value(&failure).unwrap(), json!({ "error": "" }));
        assert!(!failure.is_success());
    }
}
