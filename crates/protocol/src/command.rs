//! crates/protocol/src/command.rs
//!
//! The line-oriented command grammars: client↔router (§4.1) and
//! router↔shard (§4.1).

use std::fmt;

use crate::extension::Extension;
use crate::ProtocolError;

/// A command sent by a client to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// `uploadf <basename> <destdir>`
    UploadF { basename: String, destdir: String },
    /// `downlf <path>`
    DownlF { path: String },
    /// `removef <path>`
    RemoveF { path: String },
    /// `downltar <tag>`
    DownlTar { tag: String },
    /// `dispfnames <dir>`
    DispFNames { dir: String },
}

impl ClientCommand {
    /// Parses one already-trimmed command line.
    pub fn parse(line: &str) -> Result<ClientCommand, ProtocolError> {
        let mut parts = line.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| ProtocolError::MalformedCommand(line.to_string()))?;
        let rest: Vec<&str> = parts.collect();

        match verb {
            "uploadf" => match rest.as_slice() {
                [basename, destdir] => Ok(ClientCommand::UploadF {
                    basename: (*basename).to_string(),
                    destdir: (*destdir).to_string(),
                }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            "downlf" => match rest.as_slice() {
                [path] => Ok(ClientCommand::DownlF {
                    path: (*path).to_string(),
                }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            "removef" => match rest.as_slice() {
                [path] => Ok(ClientCommand::RemoveF {
                    path: (*path).to_string(),
                }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            "downltar" => match rest.as_slice() {
                [tag] => Ok(ClientCommand::DownlTar {
                    tag: (*tag).to_string(),
                }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            "dispfnames" => match rest.as_slice() {
                [dir] => Ok(ClientCommand::DispFNames {
                    dir: (*dir).to_string(),
                }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            _ => Err(ProtocolError::MalformedCommand(line.to_string())),
        }
    }
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientCommand::UploadF { basename, destdir } => {
                write!(f, "uploadf {basename} {destdir}")
            }
            ClientCommand::DownlF { path } => write!(f, "downlf {path}"),
            ClientCommand::RemoveF { path } => write!(f, "removef {path}"),
            ClientCommand::DownlTar { tag } => write!(f, "downltar {tag}"),
            ClientCommand::DispFNames { dir } => write!(f, "dispfnames {dir}"),
        }
    }
}

/// A command sent by the router to a shard over a fresh sub-connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardCommand {
    /// `RECEIVE <basename> <destdir>`
    Receive { basename: String, destdir: String },
    /// `SEND <path>`
    Send { path: String },
    /// `REMOVE <path>`
    Remove { path: String },
    /// `LIST <dir> <ext>`
    List { dir: String, ext: Extension },
    /// `CREATETAR <ext>`
    CreateTar { ext: Extension },
}

impl ShardCommand {
    /// Parses one already-trimmed command line received by a shard.
    pub fn parse(line: &str) -> Result<ShardCommand, ProtocolError> {
        let mut parts = line.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| ProtocolError::MalformedCommand(line.to_string()))?;
        let rest: Vec<&str> = parts.collect();

        match verb {
            "RECEIVE" => match rest.as_slice() {
                [basename, destdir] => Ok(ShardCommand::Receive {
                    basename: (*basename).to_string(),
                    destdir: (*destdir).to_string(),
                }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            "SEND" => match rest.as_slice() {
                [path] => Ok(ShardCommand::Send {
                    path: (*path).to_string(),
                }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            "REMOVE" => match rest.as_slice() {
                [path] => Ok(ShardCommand::Remove {
                    path: (*path).to_string(),
                }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            "LIST" => match rest.as_slice() {
                [dir, ext] => Ok(ShardCommand::List {
                    dir: (*dir).to_string(),
                    ext: ext.parse()?,
                }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            "CREATETAR" => match rest.as_slice() {
                [ext] => Ok(ShardCommand::CreateTar { ext: ext.parse()? }),
                _ => Err(ProtocolError::MalformedCommand(line.to_string())),
            },
            _ => Err(ProtocolError::MalformedCommand(line.to_string())),
        }
    }
}

impl fmt::Display for ShardCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShardCommand::Receive { basename, destdir } => {
                write!(f, "RECEIVE {basename} {destdir}")
            }
            ShardCommand::Send { path } => write!(f, "SEND {path}"),
            ShardCommand::Remove { path } => write!(f, "REMOVE {path}"),
            ShardCommand::List { dir, ext } => write!(f, "LIST {dir} {ext}"),
            ShardCommand::CreateTar { ext } => write!(f, "CREATETAR {ext}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uploadf() {
        let cmd = ClientCommand::parse("uploadf hello.c ~/S1/src").unwrap();
        assert_eq!(
            cmd,
            ClientCommand::UploadF {
                basename: "hello.c".into(),
                destdir: "~/S1/src".into(),
            }
        );
    }

    #[test]
    fn round_trips_through_display() {
        let cmd = ClientCommand::DownlF {
            path: "~/S1/x/a.txt".into(),
        };
        let line = cmd.to_string();
        assert_eq!(ClientCommand::parse(&line).unwrap(), cmd);
    }

    #[test]
    fn rejects_wrong_argument_count() {
        assert!(ClientCommand::parse("uploadf onlyone").is_err());
        assert!(ClientCommand::parse("downlf").is_err());
    }

    #[test]
    fn rejects_unknown_verb() {
        assert!(ClientCommand::parse("frobnicate x").is_err());
    }

    #[test]
    fn parses_shard_list_with_extension() {
        let cmd = ShardCommand::parse("LIST ~/S2/d pdf").unwrap();
        assert_eq!(
            cmd,
            ShardCommand::List {
                dir: "~/S2/d".into(),
                ext: Extension::Pdf,
            }
        );
    }

    #[test]
    fn shard_list_rejects_unsupported_extension() {
        assert!(ShardCommand::parse("LIST ~/S2/d doc").is_err());
    }

    #[test]
    fn parses_shard_createtar() {
        assert_eq!(
            ShardCommand::parse("CREATETAR zip").unwrap(),
            ShardCommand::CreateTar { ext: Extension::Zip }
        );
    }
}
