//! Interactive command parsing.

use std::path::PathBuf;

use thiserror::Error;
use vtune_models::Step;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0} (type `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid step: {0} (expected 1-5)")]
    InvalidStep(String),
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Tracks,
    Upload(PathBuf),
    Audio(String),
    Generate(Option<String>),
    Title(String),
    Description(String),
    Tag(String),
    Untag(String),
    SaveMetadata,
    Preview,
    Auth,
    Reselect(PathBuf),
    Publish,
    Goto(Step),
    Reset,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  status                 show progress and the current step
  tracks                 list the background tracks
  upload <path>          step 1: select the video file
  audio <track id>       step 2: select a background track
  generate [summary]     step 3: generate a metadata draft with AI
  title <text>           step 3: set the draft title
  description <text>     step 3: set the draft description
  tag <text>             step 3: add a tag to the draft
  untag <text>           step 3: remove a tag from the draft
  save-metadata          step 3: commit the draft
  preview                step 4: confirm the preview
  auth                   step 5: authenticate with YouTube (ends the session)
  reselect <path>        step 5: re-select the video after authentication
  publish                step 5: upload to YouTube
  goto <1-5>             move to an unlocked step
  reset                  start over
  help                   show this help
  quit                   leave (progress is not saved)";

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let required = |usage: &'static str| -> Result<String, ParseError> {
            if rest.is_empty() {
                Err(ParseError::Usage(usage))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "status" | "s" => Command::Status,
            "tracks" => Command::Tracks,
            "upload" => Command::Upload(PathBuf::from(required("upload <path>")?)),
            "audio" => Command::Audio(required("audio <track id>")?),
            "generate" => Command::Generate((!rest.is_empty()).then(|| rest.to_string())),
            "title" => Command::Title(required("title <text>")?),
            "description" | "desc" => Command::Description(required("description <text>")?),
            "tag" => Command::Tag(required("tag <text>")?),
            "untag" => Command::Untag(required("untag <text>")?),
            "save-metadata" | "save" => Command::SaveMetadata,
            "preview" => Command::Preview,
            "auth" => Command::Auth,
            "reselect" => Command::Reselect(PathBuf::from(required("reselect <path>")?)),
            "publish" => Command::Publish,
            "goto" => {
                let arg = required("goto <1-5>")?;
                let step = arg
                    .parse::<u8>()
                    .ok()
                    .and_then(|n| Step::from_number(n).ok())
                    .ok_or(ParseError::InvalidStep(arg))?;
                Command::Goto(step)
            }
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn test_arguments_keep_inner_spaces() {
        assert_eq!(parse("title  My Beach Day "), Command::Title("My Beach Day".into()));
        assert_eq!(
            parse("upload videos/clip one.mp4"),
            Command::Upload(PathBuf::from("videos/clip one.mp4"))
        );
    }

    #[test]
    fn test_optional_summary() {
        assert_eq!(parse("generate"), Command::Generate(None));
        assert_eq!(
            parse("generate sunset surfing"),
            Command::Generate(Some("sunset surfing".into()))
        );
    }

    #[test]
    fn test_goto() {
        assert_eq!(parse("goto 3"), Command::Goto(Step::Metadata));
        assert_eq!(
            Command::parse("goto 9"),
            Err(ParseError::InvalidStep("9".into()))
        );
        assert_eq!(Command::parse("goto"), Err(ParseError::Usage("goto <1-5>")));
    }

    #[test]
    fn test_missing_argument_and_unknown() {
        assert_eq!(Command::parse("audio"), Err(ParseError::Usage("audio <track id>")));
        assert_eq!(
            Command::parse("dance"),
            Err(ParseError::Unknown("dance".into()))
        );
    }

    #[test]
    fn test_aliases() {
        assert_eq!(parse("SAVE"), Command::SaveMetadata);
        assert_eq!(parse("q"), Command::Quit);
        assert_eq!(parse("desc Sun."), Command::Description("Sun.".into()));
    }
}
