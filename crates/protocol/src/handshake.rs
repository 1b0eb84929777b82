//! crates/protocol/src/handshake.rs
//!
//! Handshake and status tokens exchanged around a payload transfer
//! (spec §4.1, §6).

use std::fmt;

use crate::ProtocolError;

/// A response a command responder sends back to its initiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Grant to begin an upload.
    ReadyToReceive,
    /// Grant to begin a plain download.
    ReadyToSend,
    /// Grant to begin an archive download, naming the archive.
    ReadyToSendTar(String),
    /// Grant to begin a listing response.
    FilesComing,
    /// Initiator's go-ahead to begin receiving a pre-announced payload.
    Ready,
    /// Terminal success status, with free-text detail.
    Success(String),
    /// Terminal or precondition failure, with free-text detail.
    Error(String),
    /// Archive build failed on the shard.
    TarCreationFailed,
    /// Archive family has no files.
    NoFiles,
    /// Router could not reach the owning shard.
    ServerConnectionFailed,
    /// Extension not in the supported set.
    InvalidFiletype,
}

impl Response {
    /// Parses one already-trimmed status/handshake line.
    pub fn parse(line: &str) -> Result<Response, ProtocolError> {
        if let Some(detail) = line.strip_prefix("ERROR: ") {
            return Ok(Response::Error(detail.to_string()));
        }
        if line == "ERROR:" {
            return Ok(Response::Error(String::new()));
        }
        if let Some(detail) = line.strip_prefix("SUCCESS: ") {
            return Ok(Response::Success(detail.to_string()));
        }
        if line == "SUCCESS:" {
            return Ok(Response::Success(String::new()));
        }
        if let Some(name) = line.strip_prefix("READY_TO_SEND_TAR ") {
            return Ok(Response::ReadyToSendTar(name.to_string()));
        }
        match line {
            "READY_TO_RECEIVE" => Ok(Response::ReadyToReceive),
            "READY_TO_SEND" => Ok(Response::ReadyToSend),
            "FILES_COMING" => Ok(Response::FilesComing),
            "READY" => Ok(Response::Ready),
            "TAR_CREATION_FAILED" => Ok(Response::TarCreationFailed),
            "NO_FILES" => Ok(Response::NoFiles),
            "SERVER_CONNECTION_FAILED" => Ok(Response::ServerConnectionFailed),
            "INVALID_FILETYPE" => Ok(Response::InvalidFiletype),
            other => Err(ProtocolError::UnexpectedResponse(other.to_string())),
        }
    }

    /// `true` if this response begins a payload transfer (grants a
    /// `READY_TO_*`/`FILES_COMING` handshake rather than ending the
    /// exchange).
    #[must_use]
    pub const fn grants_transfer(&self) -> bool {
        matches!(
            self,
            Response::ReadyToReceive
                | Response::ReadyToSend
                | Response::ReadyToSendTar(_)
                | Response::FilesComing
        )
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::ReadyToReceive => f.write_str("READY_TO_RECEIVE"),
            Response::ReadyToSend => f.write_str("READY_TO_SEND"),
            Response::ReadyToSendTar(name) => write!(f, "READY_TO_SEND_TAR {name}"),
            Response::FilesComing => f.write_str("FILES_COMING"),
            Response::Ready => f.write_str("READY"),
            Response::Success(detail) if detail.is_empty() => f.write_str("SUCCESS:"),
            Response::Success(detail) => write!(f, "SUCCESS: {detail}"),
            Response::Error(detail) if detail.is_empty() => f.write_str("ERROR:"),
            Response::Error(detail) => write!(f, "ERROR: {detail}"),
            Response::TarCreationFailed => f.write_str("TAR_CREATION_FAILED"),
            Response::NoFiles => f.write_str("NO_FILES"),
            Response::ServerConnectionFailed => f.write_str("SERVER_CONNECTION_FAILED"),
            Response::InvalidFiletype => f.write_str("INVALID_FILETYPE"),
        }
    }
}

/// The literal line the router sends when an aggregate listing is empty
/// (spec §4.2).
pub const NO_FILES_IN_DIRECTORY: &str = "No files found in this directory";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_simple_tokens() {
        for resp in [
            Response::ReadyToReceive,
            Response::ReadyToSend,
            Response::FilesComing,
            Response::Ready,
            Response::TarCreationFailed,
            Response::NoFiles,
            Response::ServerConnectionFailed,
            Response::InvalidFiletype,
        ] {
            let line = resp.to_string();
            assert_eq!(Response::parse(&line).unwrap(), resp);
        }
    }

    #[test]
    fn round_trips_tar_name() {
        let resp = Response::ReadyToSendTar("pdf_archive.tar".into());
        assert_eq!(Response::parse(&resp.to_string()).unwrap(), resp);
    }

    #[test]
    fn round_trips_error_and_success_detail() {
        let err = Response::Error("File not found".into());
        assert_eq!(Response::parse(&err.to_string()).unwrap(), err);

        let ok = Response::Success("File uploaded successfully".into());
        assert_eq!(Response::parse(&ok.to_string()).unwrap(), ok);
    }

    #[test]
    fn grants_transfer_only_for_ready_tokens() {
        assert!(Response::ReadyToReceive.grants_transfer());
        assert!(Response::FilesComing.grants_transfer());
        assert!(!Response::Ready.grants_transfer());
        assert!(!Response::Success(String::new()).grants_transfer());
    }

    #[test]
    fn unknown_token_is_an_error() {
        assert!(Response::parse("WHAT").is_err());
    }
}
