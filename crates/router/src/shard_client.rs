//! crates/router/src/shard_client.rs
//!
//! Opens a fresh TCP sub-connection to a shard and speaks one
//! [`ShardCommand`] over it, grounded on the original's
//! `transfer_file_to_server`/`retrieve_file_from_server` relay functions
//! (S1.c), which likewise opened a brand-new connection per sub-operation
//! rather than keeping one alive across a whole client session.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::TcpStream;

use protocol::command::ShardCommand;
use protocol::handshake::Response;
use protocol::io::{read_required_line, recv_payload, send_payload, write_line};
use protocol::Extension;

use crate::error::RouterError;

/// Address book for the three typed shards a router relays to.
#[derive(Debug, Clone)]
pub struct ShardAddresses {
    /// Address of the shard owning `.pdf` files.
    pub pdf: String,
    /// Address of the shard owning `.txt` files.
    pub txt: String,
    /// Address of the shard owning `.zip` files.
    pub zip: String,
}

impl ShardAddresses {
    /// The address of the shard owning `ext`, or `None` for [`Extension::C`],
    /// which the router always serves locally.
    #[must_use]
    pub fn for_extension(&self, ext: Extension) -> Option<&str> {
        match ext {
            Extension::C => None,
            Extension::Pdf => Some(&self.pdf),
            Extension::Txt => Some(&self.txt),
            Extension::Zip => Some(&self.zip),
        }
    }
}

fn connect(addr: &str, ext: Extension) -> Result<TcpStream, RouterError> {
    TcpStream::connect(addr).map_err(|source| RouterError::ShardUnreachable {
        extension: ext.tag(),
        source,
    })
}

/// Relays an upload to the owning shard: sends `RECEIVE`, then streams
/// `len` bytes read from `source`.
pub fn relay_upload<R: Read>(
    addr: &str,
    ext: Extension,
    basename: &str,
    destdir: &str,
    source: &mut R,
    len: u64,
) -> Result<Response, RouterError> {
    let stream = connect(addr, ext)?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    write_line(
        &mut writer,
        &ShardCommand::Receive {
            basename: basename.to_string(),
            destdir: destdir.to_string(),
        }
        .to_string(),
    )?;
    let grant = Response::parse(&read_required_line(&mut reader)?)?;
    if grant != Response::ReadyToReceive {
        return Ok(grant);
    }

    let mut channel = ShardChannel {
        reader: &mut reader,
        writer: &mut writer,
    };
    send_payload(&mut channel, source, len)?;
    Ok(Response::parse(&read_required_line(&mut reader)?)?)
}

/// Relays a download request to the owning shard, writing the payload to
/// `sink` once the shard grants a `READY_TO_SEND`.
pub fn relay_download<W: Write>(
    addr: &str,
    ext: Extension,
    path: &str,
    sink: &mut W,
) -> Result<Response, RouterError> {
    let stream = connect(addr, ext)?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    write_line(&mut writer, &ShardCommand::Send { path: path.to_string() }.to_string())?;
    let grant = Response::parse(&read_required_line(&mut reader)?)?;
    if grant != Response::ReadyToSend {
        return Ok(grant);
    }

    let mut channel = ShardChannel {
        reader: &mut reader,
        writer: &mut writer,
    };
    recv_payload(&mut channel, sink)?;
    Ok(grant)
}

/// Relays a remove request to the owning shard.
pub fn relay_remove(addr: &str, ext: Extension, path: &str) -> Result<Response, RouterError> {
    let stream = connect(addr, ext)?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    write_line(&mut writer, &ShardCommand::Remove { path: path.to_string() }.to_string())?;
    Ok(Response::parse(&read_required_line(&mut reader)?)?)
}

/// Relays a `LIST` request, returning the shard's newline-delimited file
/// names (already sorted by the shard).
pub fn relay_list(addr: &str, ext: Extension, dir: &str) -> Result<Vec<String>, RouterError> {
    let stream = connect(addr, ext)?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    write_line(
        &mut writer,
        &ShardCommand::List {
            dir: dir.to_string(),
            ext,
        }
        .to_string(),
    )?;

    let mut names = Vec::new();
    loop {
        let line = read_required_line(&mut reader)?;
        if line == "END" {
            break;
        }
        names.push(line);
    }
    Ok(names)
}

/// Relays a `CREATETAR` request, writing the resulting archive bytes into
/// `sink`. Returns `Ok(None)` if the shard reports it has no matching
/// files.
pub fn relay_create_tar<W: Write>(
    addr: &str,
    ext: Extension,
    sink: &mut W,
) -> Result<Option<()>, RouterError> {
    let stream = connect(addr, ext)?;
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    write_line(&mut writer, &ShardCommand::CreateTar { ext }.to_string())?;

    let grant = Response::parse(&read_required_line(&mut reader)?)?;
    match grant {
        Response::NoFiles => Ok(None),
        Response::ReadyToSendTar(_) => {
            let mut channel = ShardChannel {
                reader: &mut reader,
                writer: &mut writer,
            };
            recv_payload(&mut channel, sink)?;
            Ok(Some(()))
        }
        other => Err(RouterError::Protocol(protocol::ProtocolError::UnexpectedResponse(
            other.to_string(),
        ))),
    }
}

/// Adapts a split reader/writer pair over the same socket into the single
/// `BufRead + Write` type the framing helpers in [`protocol::io`] expect.
struct ShardChannel<'a> {
    reader: &'a mut BufReader<TcpStream>,
    writer: &'a mut BufWriter<TcpStream>,
}

impl std::io::Read for ShardChannel<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl std::io::BufRead for ShardChannel<'_> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }
    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
    }
}

impl Write for ShardChannel<'_> {
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
    use std::io::Read as _;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn relay_remove_parses_shard_response() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = BufWriter::new(stream);
            let line = read_required_line(&mut reader).unwrap();
            assert_eq!(line, "REMOVE ~/S2/docs/a.pdf");
            write_line(&mut writer, "SUCCESS: File removed successfully").unwrap();
        });

        let response = relay_remove(&addr, Extension::Pdf, "~/S2/docs/a.pdf").unwrap();
        assert_eq!(response, Response::Success("File removed successfully".into()));
        server.join().unwrap();
    }

    #[test]
    fn relay_list_collects_names_until_end_sentinel() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = BufWriter::new(stream);
            let _ = read_required_line(&mut reader).unwrap();
            write_line(&mut writer, "a.pdf").unwrap();
            write_line(&mut writer, "b.pdf").unwrap();
            write_line(&mut writer, "END").unwrap();
        });

        let names = relay_list(&addr, Extension::Pdf, "~/S2").unwrap();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
        server.join().unwrap();
    }
}
