//! crates/client/src/commands.rs
//!
//! One function per REPL command, each opening its own fresh connection
//! to the router — grounded on the original's `main` loop (`w25clients.c`),
//! which likewise connected once per command rather than keeping one
//! session open across the whole REPL.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
use std::path::Path;

use protocol::handshake::Response;
use protocol::io::{read_required_line, recv_payload, send_payload, write_line};
use protocol::Extension;

use crate::error::ClientError;

fn connect(router_addr: &str) -> Result<(BufReader<TcpStream>, BufWriter<TcpStream>), ClientError> {
    let stream = TcpStream::connect(router_addr)?;
    let reader = BufReader::new(stream.try_clone()?);
    let writer = BufWriter::new(stream);
    Ok((reader, writer))
}

fn is_under_virtual_root(path: &str) -> bool {
    protocol::path::is_under_virtual_root(path)
}

/// `uploadf <filename> <destdir>`: uploads a local file to `destdir`
/// (which must be under `~/S1`).
pub fn uploadf(router_addr: &str, filename: &str, destdir: &str) -> Result<String, ClientError> {
    let local = Path::new(filename);
    if !local.is_file() {
        return Err(ClientError::LocalFileMissing(filename.to_string()));
    }
    let basename = local
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    if Extension::from_filename(&basename).is_none() {
        return Err(ClientError::UnsupportedExtension);
    }
    if !is_under_virtual_root(destdir) {
        return Err(ClientError::OutsideVirtualRoot);
    }

    let (mut reader, mut writer) = connect(router_addr)?;
    write_line(&mut writer, &format!("uploadf {basename} {destdir}"))?;

    let grant = Response::parse(&read_required_line(&mut reader)?)?;
    if grant != Response::ReadyToReceive {
        return Err(ClientError::UnexpectedResponse(grant.to_string()));
    }

    let len = std::fs::metadata(local)?.len();
    let mut file = File::open(local)?;
    let mut channel = ClientChannel { reader: &mut reader, writer: &mut writer };
    send_payload(&mut channel, &mut file, len)?;

    let outcome = Response::parse(&read_required_line(&mut reader)?)?;
    Ok(outcome.to_string())
}

/// `downlf <path>`: downloads `path` (must be under `~/S1`) into the
/// current directory under its own basename.
pub fn downlf(router_addr: &str, path: &str) -> Result<String, ClientError> {
    if !is_under_virtual_root(path) {
        return Err(ClientError::OutsideVirtualRoot);
    }
    let basename = path.rsplit('/').next().unwrap_or(path).to_string();

    let (mut reader, mut writer) = connect(router_addr)?;
    write_line(&mut writer, &format!("downlf {path}"))?;

    let grant = Response::parse(&read_required_line(&mut reader)?)?;
    if grant != Response::ReadyToSend {
        return Err(ClientError::UnexpectedResponse(grant.to_string()));
    }

    let mut channel = ClientChannel { reader: &mut reader, writer: &mut writer };
    let mut file = File::create(&basename)?;
    recv_payload(&mut channel, &mut file)?;

    Ok(format!("File '{basename}' downloaded successfully"))
}

/// `removef <path>`: removes `path` (must be under `~/S1`).
pub fn removef(router_addr: &str, path: &str) -> Result<String, ClientError> {
    if !is_under_virtual_root(path) {
        return Err(ClientError::OutsideVirtualRoot);
    }

    let (mut reader, mut writer) = connect(router_addr)?;
    write_line(&mut writer, &format!("removef {path}"))?;
    let response = Response::parse(&read_required_line(&mut reader)?)?;
    Ok(response.to_string())
}

/// `downltar <tag>`: downloads an archive of every file of extension
/// `tag` into the current directory. Unlike the original, which excluded
/// `zip` from this command for no documented reason, all four extensions
/// are accepted (spec §9, Open Question 5).
pub fn downltar(router_addr: &str, tag: &str) -> Result<String, ClientError> {
    let ext: Extension = tag.parse()?;

    let (mut reader, mut writer) = connect(router_addr)?;
    write_line(&mut writer, &format!("downltar {}", ext.tag()))?;

    let grant = Response::parse(&read_required_line(&mut reader)?)?;
    let archive_name = match grant {
        Response::ReadyToSendTar(name) => name,
        Response::NoFiles => return Ok("No files available to archive".to_string()),
        other => return Err(ClientError::UnexpectedResponse(other.to_string())),
    };

    let mut channel = ClientChannel { reader: &mut reader, writer: &mut writer };
    let mut file = File::create(&archive_name)?;
    recv_payload(&mut channel, &mut file)?;

    Ok(format!("Tar file '{archive_name}' downloaded successfully"))
}

/// `dispfnames <dir>`: lists every file under `dir` across all four
/// extension families, in the router's fixed `c, pdf, txt, zip` order.
pub fn dispfnames(router_addr: &str, dir: &str) -> Result<String, ClientError> {
    if !is_under_virtual_root(dir) {
        return Err(ClientError::OutsideVirtualRoot);
    }

    let (mut reader, mut writer) = connect(router_addr)?;
    write_line(&mut writer, &format!("dispfnames {dir}"))?;

    let grant = Response::parse(&read_required_line(&mut reader)?)?;
    match grant {
        Response::FilesComing => {
            let mut channel = ClientChannel { reader: &mut reader, writer: &mut writer };
            let mut body = Vec::new();
            recv_payload(&mut channel, &mut body)?;
            let listing = String::from_utf8_lossy(&body);
            Ok(format!("Files in {dir}:\n{listing}"))
        }
        Response::Error(detail) => Ok(detail),
        other => Err(ClientError::UnexpectedResponse(other.to_string())),
    }
}

/// Joins the split reader/writer halves of one command connection so the
/// framing helpers in [`protocol::io`] can both send a size announcement
/// and read the peer's `READY` ack over the same socket.
struct ClientChannel<'a> {
    reader: &'a mut BufReader<TcpStream>,
    writer: &'a mut BufWriter<TcpStream>,
}

impl Read for ClientChannel<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for ClientChannel<'_> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }
    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
    }
}

impl Write for ClientChannel<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploadf_rejects_missing_local_file() {
        let err = uploadf("127.0.0.1:1", "does-not-exist.pdf", "~/S1").unwrap_err();
        assert!(matches!(err, ClientError::LocalFileMissing(_)));
    }

    #[test]
    fn downlf_rejects_path_outside_virtual_root() {
        let err = downlf("127.0.0.1:1", "/etc/passwd").unwrap_err();
        assert!(matches!(err, ClientError::OutsideVirtualRoot));
    }

    #[test]
    fn downltar_rejects_unsupported_tag() {
        let err = downltar("127.0.0.1:1", "doc").unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
    }
}
