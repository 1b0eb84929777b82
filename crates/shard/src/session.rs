//! crates/shard/src/session.rs
//!
//! Services one router sub-connection: exactly one command per
//! connection, matching the original's `process_s1_request` (S2.c),
//! which never looped to read a second command on the same socket.
//!
//! Every path received over the wire is validated against this shard's
//! own [`ManagedRoot`] before use (spec §9, Open Question 6) — the
//! original trusted the router's `is_path_in_s1` check and never
//! re-checked on its own end. Likewise, `LIST`/`CREATETAR`'s explicit
//! extension argument is checked against this shard's configured family
//! (spec §4.3) rather than trusted at face value.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::net::TcpStream;

use archiver::{Archiver, TarArchiver};
use protocol::command::ShardCommand;
use protocol::handshake::Response;
use protocol::io::{read_line_lossy, send_payload, write_line};
use protocol::Extension;
use storage::ManagedRoot;
use tracing::{info, warn};

/// This shard's own root and the extension family it owns.
pub struct ShardContext {
    /// This shard's filesystem root.
    pub root: ManagedRoot,
    /// The extension family this shard owns.
    pub extension: Extension,
}

/// Services one sub-connection: reads exactly one command, handles it,
/// and returns once the response (and any payload) has been written.
pub fn handle_session(stream: TcpStream, ctx: &ShardContext) -> std::io::Result<()> {
    let peer = stream.peer_addr().ok();
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    let Some(line) = read_line_lossy(&mut reader)? else {
        return Ok(());
    };

    let command = match ShardCommand::parse(&line) {
        Ok(command) => command,
        Err(e) => {
            warn!(?peer, %line, error = %e, "malformed shard command");
            return write_line(&mut writer, &Response::Error(e.to_string()).to_string());
        }
    };

    info!(?peer, command = %command, "shard handling command");
    match command {
        ShardCommand::Receive { basename, destdir } => receive(&basename, &destdir, &mut reader, &mut writer, ctx),
        ShardCommand::Send { path } => send(&path, &mut reader, &mut writer, ctx),
        ShardCommand::Remove { path } => remove(&path, &mut writer, ctx),
        ShardCommand::List { dir, ext } => list(&dir, ext, &mut writer, ctx),
        ShardCommand::CreateTar { ext } => create_tar(ext, &mut reader, &mut writer, ctx),
    }
}

fn receive(
    basename: &str,
    destdir: &str,
    reader: &mut BufReader<TcpStream>,
    writer: &mut BufWriter<TcpStream>,
    ctx: &ShardContext,
) -> std::io::Result<()> {
    let dest = match ctx.root.validate(&format!("{destdir}/{basename}")) {
        Ok(dest) => dest,
        Err(e) => return write_line(writer, &Response::Error(e.to_string()).to_string()),
    };

    write_line(writer, &Response::ReadyToReceive.to_string())?;
    let size_line = read_line_lossy(reader)?.unwrap_or_default();
    let len: u64 = match size_line.trim().parse() {
        Ok(len) => len,
        Err(_) => {
            return write_line(writer, &Response::Error("invalid size announcement".into()).to_string())
        }
    };
    write_line(writer, "READY")?;

    let outcome = storage::transfer::receive_to_file(&dest, reader, len)
        .map(|()| Response::Success("File uploaded successfully".into()))
        .unwrap_or_else(|e| Response::Error(e.to_string()));
    write_line(writer, &outcome.to_string())
}

fn send(
    wire_path: &str,
    reader: &mut BufReader<TcpStream>,
    writer: &mut BufWriter<TcpStream>,
    ctx: &ShardContext,
) -> std::io::Result<()> {
    let resolved = match ctx.root.validate(wire_path) {
        Ok(resolved) => resolved,
        Err(e) => return write_line(writer, &Response::Error(e.to_string()).to_string()),
    };
    if !resolved.is_file() {
        return write_line(writer, &Response::Error("File not found".into()).to_string());
    }

    let len = std::fs::metadata(&resolved)?.len();
    write_line(writer, &Response::ReadyToSend.to_string())?;
    let mut file = std::fs::File::open(&resolved)?;
    let mut channel = ShardSessionChannel { reader, writer };
    send_payload(&mut channel, &mut file, len).map_err(std::io::Error::other)
}

fn remove(wire_path: &str, writer: &mut BufWriter<TcpStream>, ctx: &ShardContext) -> std::io::Result<()> {
    let outcome = match ctx.root.validate(wire_path) {
        Ok(resolved) => std::fs::remove_file(&resolved)
            .map(|()| Response::Success("File removed successfully".into()))
            .unwrap_or_else(|e| Response::Error(e.to_string())),
        Err(e) => Response::Error(e.to_string()),
    };
    write_line(writer, &outcome.to_string())
}

fn list(dir: &str, ext: Extension, writer: &mut BufWriter<TcpStream>, ctx: &ShardContext) -> std::io::Result<()> {
    if ext != ctx.extension {
        return write_line(writer, &Response::InvalidFiletype.to_string());
    }
    let names = match ctx.root.validate(dir) {
        Ok(resolved) => storage::listing::list_by_extension(&resolved, ext).unwrap_or_default(),
        Err(_) => Vec::new(),
    };
    for name in &names {
        write_line(writer, name)?;
    }
    write_line(writer, "END")
}

fn create_tar(
    ext: Extension,
    reader: &mut BufReader<TcpStream>,
    writer: &mut BufWriter<TcpStream>,
    ctx: &ShardContext,
) -> std::io::Result<()> {
    if ext != ctx.extension {
        return write_line(writer, &Response::InvalidFiletype.to_string());
    }
    let names = storage::listing::list_by_extension_recursive(ctx.root.path(), ext).unwrap_or_default();
    if names.is_empty() {
        return write_line(writer, &Response::NoFiles.to_string());
    }

    let mut archive = match TarArchiver.build(ctx.root.path(), &names) {
        Ok(archive) => archive,
        Err(_) => return write_line(writer, &Response::TarCreationFailed.to_string()),
    };
    let len = archive.metadata()?.len();
    let archive_name = format!("{}.tar", ext.tag());
    write_line(writer, &Response::ReadyToSendTar(archive_name).to_string())?;
    let mut channel = ShardSessionChannel { reader, writer };
    send_payload(&mut channel, &mut archive, len).map_err(std::io::Error::other)
}

/// Joins this session's split reader/writer halves so the framing
/// helpers in [`protocol::io`] can both read the router's `READY` ack and
/// write the payload over the same connection.
struct ShardSessionChannel<'a> {
    reader: &'a mut BufReader<TcpStream>,
    writer: &'a mut BufWriter<TcpStream>,
}

impl Read for ShardSessionChannel<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for ShardSessionChannel<'_> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }
    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
    }
}

impl Write for ShardSessionChannel<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
