//! crates/router/src/session.rs
//!
//! One client connection, end to end: read a command line, validate it,
//! dispatch either to local storage (`.c`, owned by the router itself) or
//! relay it to the owning shard, stream the payload, reply. Grounded on
//! the dispatch structure of `process_client` in S1.c, generalized from
//! its five `strncmp`-chained handlers into one match over
//! [`ClientCommand`].

use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::net::TcpStream;

use archiver::{Archiver, TarArchiver};
use protocol::command::ClientCommand;
use protocol::handshake::{Response, NO_FILES_IN_DIRECTORY};
use protocol::io::{read_line_lossy, send_payload, write_line};
use protocol::{path, Extension};
use storage::ManagedRoot;
use tracing::{info, warn};

use crate::shard_client;
use crate::shard_client::ShardAddresses;

/// Everything one client session needs: its own root and the addresses
/// of the three shards it may relay to.
pub struct SessionContext {
    /// The router's own managed root, holding `.c` files.
    pub root: ManagedRoot,
    /// Addresses of the pdf/txt/zip shards.
    pub shards: ShardAddresses,
}

/// Services one client connection until it disconnects or sends `exit`.
pub fn handle_session(stream: TcpStream, ctx: &SessionContext) -> std::io::Result<()> {
    let peer = stream.peer_addr().ok();
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    loop {
        let Some(line) = read_line_lossy(&mut reader)? else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        if line == "exit" {
            break;
        }

        let command = match ClientCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                warn!(?peer, %line, error = %e, "malformed command");
                write_line(&mut writer, &Response::Error(e.to_string()).to_string())?;
                continue;
            }
        };

        info!(?peer, command = %command, "dispatching command");
        if let Err(e) = dispatch(&command, &mut reader, &mut writer, ctx) {
            warn!(?peer, command = %command, error = %e, "command failed");
            let _ = write_line(&mut writer, &Response::Error(e.to_string()).to_string());
        }
    }
    Ok(())
}

fn dispatch(
    command: &ClientCommand,
    reader: &mut BufReader<TcpStream>,
    writer: &mut BufWriter<TcpStream>,
    ctx: &SessionContext,
) -> std::io::Result<()> {
    match command {
        ClientCommand::UploadF { basename, destdir } => upload(basename, destdir, reader, writer, ctx),
        ClientCommand::DownlF { path } => download(path, reader, writer, ctx),
        ClientCommand::RemoveF { path } => remove(path, writer, ctx),
        ClientCommand::DownlTar { tag } => download_tar(tag, reader, writer, ctx),
        ClientCommand::DispFNames { dir } => dispfnames(dir, reader, writer, ctx),
    }
}

fn extension_of(name: &str) -> Option<Extension> {
    Extension::from_filename(name)
}

fn upload(
    basename: &str,
    destdir: &str,
    reader: &mut BufReader<TcpStream>,
    writer: &mut BufWriter<TcpStream>,
    ctx: &SessionContext,
) -> std::io::Result<()> {
    let Some(ext) = extension_of(basename) else {
        return write_line(writer, &Response::InvalidFiletype.to_string());
    };
    if !path::is_under_virtual_root(destdir) {
        return write_line(
            writer,
            &Response::Error(format!("{destdir} is not under the virtual root")).to_string(),
        );
    }

    write_line(writer, &Response::ReadyToReceive.to_string())?;
    let size_line = read_line_lossy(reader)?.unwrap_or_default();
    let len: u64 = match size_line.trim().parse() {
        Ok(len) => len,
        Err(_) => {
            return write_line(writer, &Response::Error("invalid size announcement".into()).to_string())
        }
    };
    write_line(writer, "READY")?;

    let outcome = match ext {
        Extension::C => {
            let dest = ctx.root.validate(&format!("{destdir}/{basename}"));
            match dest {
                Ok(dest) => {
                    let mut body = reader.take(len);
                    storage::transfer::receive_to_file(&dest, &mut body, len)
                        .map(|()| Response::Success("File uploaded successfully".into()))
                        .unwrap_or_else(|e| Response::Error(e.to_string()))
                }
                Err(e) => Response::Error(e.to_string()),
            }
        }
        other => {
            let addr = ctx.shards.for_extension(other).expect("non-C extension has a shard");
            let shard_destdir = path::translate(destdir, other);
            let mut body = reader.take(len);
            shard_client::relay_upload(addr, other, basename, &shard_destdir, &mut body, len)
                .unwrap_or_else(|e| Response::Error(e.to_string()))
        }
    };
    write_line(writer, &outcome.to_string())
}

fn download(
    wire_path: &str,
    reader: &mut BufReader<TcpStream>,
    writer: &mut BufWriter<TcpStream>,
    ctx: &SessionContext,
) -> std::io::Result<()> {
    let basename = wire_path.rsplit('/').next().unwrap_or(wire_path);
    let Some(ext) = extension_of(basename) else {
        return write_line(writer, &Response::InvalidFiletype.to_string());
    };

    match ext {
        Extension::C => match ctx.root.validate(wire_path) {
            Ok(resolved) if resolved.is_file() => {
                let len = std::fs::metadata(&resolved)?.len();
                write_line(writer, &Response::ReadyToSend.to_string())?;
                let mut file = std::fs::File::open(&resolved)?;
                let mut channel = SessionChannel { reader, writer };
                send_payload(&mut channel, &mut file, len).map_err(std::io::Error::other)?;
                Ok(())
            }
            Ok(_) => write_line(writer, &Response::Error("File not found".into()).to_string()),
            Err(e) => write_line(writer, &Response::Error(e.to_string()).to_string()),
        },
        other => {
            let addr = ctx.shards.for_extension(other).expect("non-C extension has a shard");
            let shard_path = path::translate(wire_path, other);
            let mut sink = Vec::new();
            match shard_client::relay_download(addr, other, &shard_path, &mut sink) {
                Ok(Response::ReadyToSend) => {
                    write_line(writer, &Response::ReadyToSend.to_string())?;
                    let mut channel = SessionChannel { reader, writer };
                    send_payload(&mut channel, &mut std::io::Cursor::new(&sink), sink.len() as u64)
                        .map_err(std::io::Error::other)
                }
                Ok(other_response) => write_line(writer, &other_response.to_string()),
                Err(e) => write_line(writer, &Response::Error(e.to_string()).to_string()),
            }
        }
    }
}

fn remove(wire_path: &str, writer: &mut BufWriter<TcpStream>, ctx: &SessionContext) -> std::io::Result<()> {
    let basename = wire_path.rsplit('/').next().unwrap_or(wire_path);
    let Some(ext) = extension_of(basename) else {
        return write_line(writer, &Response::InvalidFiletype.to_string());
    };

    let outcome = match ext {
        Extension::C => match ctx.root.validate(wire_path) {
            Ok(resolved) => std::fs::remove_file(&resolved)
                .map(|()| Response::Success("File removed successfully".into()))
                .unwrap_or_else(|e| Response::Error(e.to_string())),
            Err(e) => Response::Error(e.to_string()),
        },
        other => {
            let addr = ctx.shards.for_extension(other).expect("non-C extension has a shard");
            let shard_path = path::translate(wire_path, other);
            shard_client::relay_remove(addr, other, &shard_path).unwrap_or_else(|e| Response::Error(e.to_string()))
        }
    };
    write_line(writer, &outcome.to_string())
}

fn dispfnames(
    dir: &str,
    reader: &mut BufReader<TcpStream>,
    writer: &mut BufWriter<TcpStream>,
    ctx: &SessionContext,
) -> std::io::Result<()> {
    let mut aggregate = Vec::new();
    for ext in Extension::ALL {
        let names = match ext {
            Extension::C => match ctx.root.validate(dir) {
                Ok(resolved) => storage::listing::list_by_extension(&resolved, ext).unwrap_or_default(),
                Err(_) => Vec::new(),
            },
            other => {
                let addr = ctx.shards.for_extension(other).expect("non-C extension has a shard");
                let shard_dir = path::translate(dir, other);
                shard_client::relay_list(addr, other, &shard_dir).unwrap_or_default()
            }
        };
        aggregate.extend(names);
    }

    if aggregate.is_empty() {
        write_line(writer, &Response::Error(NO_FILES_IN_DIRECTORY.to_string()).to_string())
    } else {
        write_line(writer, &Response::FilesComing.to_string())?;
        let body = aggregate.join("\n");
        let mut channel = SessionChannel { reader, writer };
        send_payload(&mut channel, &mut std::io::Cursor::new(body.as_bytes()), body.len() as u64)
            .map_err(std::io::Error::other)
    }
}

fn download_tar(
    tag: &str,
    reader: &mut BufReader<TcpStream>,
    writer: &mut BufWriter<TcpStream>,
    ctx: &SessionContext,
) -> std::io::Result<()> {
    let Ok(ext): Result<Extension, _> = tag.parse() else {
        return write_line(writer, &Response::InvalidFiletype.to_string());
    };

    let body = match ext {
        Extension::C => {
            let names =
                storage::listing::list_by_extension_recursive(ctx.root.path(), Extension::C).unwrap_or_default();
            if names.is_empty() {
                None
            } else {
                TarArchiver
                    .build(ctx.root.path(), &names)
                    .ok()
                    .map(|mut file| {
                        let mut buf = Vec::new();
                        let _ = file.read_to_end(&mut buf);
                        buf
                    })
            }
        }
        other => {
            let addr = ctx.shards.for_extension(other).expect("non-C extension has a shard");
            let mut sink = Vec::new();
            match shard_client::relay_create_tar(addr, other, &mut sink) {
                Ok(Some(())) => Some(sink),
                Ok(None) | Err(_) => None,
            }
        }
    };

    match body {
        None => write_line(writer, &Response::NoFiles.to_string()),
        Some(bytes) => {
            let archive_name = format!("{tag}.tar");
            write_line(writer, &Response::ReadyToSendTar(archive_name).to_string())?;
            let mut channel = SessionChannel { reader, writer };
            send_payload(&mut channel, &mut std::io::Cursor::new(&bytes), bytes.len() as u64)
                .map_err(std::io::Error::other)
        }
    }
}

/// Joins the session's split reader/writer halves into the single
/// `BufRead + Write` type the framing helpers in [`protocol::io`] expect,
/// so a handshake ack can be read and the payload written over the same
/// connection without the two halves fighting over buffering.
struct SessionChannel<'a> {
    reader: &'a mut BufReader<TcpStream>,
    writer: &'a mut BufWriter<TcpStream>,
}

impl Read for SessionChannel<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for SessionChannel<'_> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        self.reader.fill_buf()
    }
    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
    }
}

impl Write for SessionChannel<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
