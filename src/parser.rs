use crate::errors::{ShellError, ShellResult};
use crate::redirection::{parse_redirect, Redirect};

pub const PIPE: &str = "|";

/// One command of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStage {
    pub name: String,
    pub args: Vec<String>,
    pub redirect: Redirect,
}

#[cfg(test)]
impl CommandStage {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
            redirect: Redirect::default(),
        }
    }
}

/// Split tokens on `|` and parse every group into a [`CommandStage`].
///
/// No tokens yields an empty pipeline. A pipe with nothing on either side,
/// or a stage without a command name, rejects the whole line.
pub fn parse_pipeline(tokens: &[String]) -> ShellResult<Vec<CommandStage>> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    tokens
        .split(|token| token == PIPE)
        .map(|group| {
            if group.is_empty() {
                return Err(ShellError::Syntax(PIPE.to_string()));
            }
            let (name, args, redirect) = parse_redirect(group)?;
            if name.is_empty() {
                return Err(ShellError::Syntax(PIPE.to_string()));
            }
            Ok(CommandStage {
                name,
                args,
                redirect,
            })
        })
        .collect()
}
