//! crates/client/src/repl.rs
//!
//! The interactive `w25clients$ ` prompt loop, grounded on the original's
//! `main` (`w25clients.c`): read a line, split into at most three
//! whitespace-separated fields, dispatch, print the result, loop until
//! `exit` or EOF.

use std::io::{self, BufRead, Write};

use crate::commands;

const PROMPT: &str = "w25clients$ ";

const HELP: &str = "Available commands:\n  \
     uploadf <filename> <destination_path>\n  \
     downlf <filename>\n  \
     removef <filename>\n  \
     downltar <filetype>\n  \
     dispfnames <pathname>\n  \
     exit";

/// Runs the REPL against `router_addr`, reading commands from `input` and
/// writing prompts/results to `output`, until `exit` or EOF.
pub fn run<R: BufRead, W: Write>(router_addr: &str, mut input: R, mut output: W) -> io::Result<()> {
    writeln!(output, "W25 Distributed File System Client")?;
    writeln!(output, "{HELP}")?;

    loop {
        write!(output, "\n{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);

        if line == "exit" {
            writeln!(output, "Exiting client...")?;
            break;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            writeln!(output, "Error: No command entered")?;
            continue;
        }

        let result = dispatch(router_addr, &fields);
        match result {
            Ok(message) => writeln!(output, "{message}")?,
            Err(message) => writeln!(output, "Error: {message}")?,
        }
    }
    Ok(())
}

fn dispatch(router_addr: &str, fields: &[&str]) -> Result<String, String> {
    match fields {
        ["uploadf", filename, destdir] => {
            commands::uploadf(router_addr, filename, destdir).map_err(|e| e.to_string())
        }
        ["uploadf", ..] => Err("Usage: uploadf <filename> <destination_path>".to_string()),
        ["downlf", path] => commands::downlf(router_addr, path).map_err(|e| e.to_string()),
        ["downlf", ..] => Err("Usage: downlf <filename>".to_string()),
        ["removef", path] => commands::removef(router_addr, path).map_err(|e| e.to_string()),
        ["removef", ..] => Err("Usage: removef <filename>".to_string()),
        ["downltar", tag] => commands::downltar(router_addr, tag).map_err(|e| e.to_string()),
        ["downltar", ..] => Err("Usage: downltar <filetype>".to_string()),
        ["dispfnames", dir] => commands::dispfnames(router_addr, dir).map_err(|e| e.to_string()),
        ["dispfnames", ..] => Err("Usage: dispfnames <pathname>".to_string()),
        ["help"] => Ok(HELP.to_string()),
        [unknown, ..] => Err(format!("Unknown command '{unknown}'")),
        [] => unreachable!("empty field list handled by caller"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn exit_command_stops_the_loop() {
        let input = Cursor::new(b"exit\n".to_vec());
        let mut output = Vec::new();
        run("127.0.0.1:1", input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Exiting client..."));
    }

    #[test]
    fn eof_stops_the_loop_without_exit_message() {
        let input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        run("127.0.0.1:1", input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(!text.contains("Exiting client..."));
    }

    #[test]
    fn unknown_command_reports_an_error_and_continues() {
        let input = Cursor::new(b"frobnicate\nexit\n".to_vec());
        let mut output = Vec::new();
        run("127.0.0.1:1", input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Unknown command 'frobnicate'"));
        assert!(text.contains("Exiting client..."));
    }

    #[test]
    fn wrong_argument_count_reports_usage() {
        let input = Cursor::new(b"uploadf onlyone\nexit\n".to_vec());
        let mut output = Vec::new();
        run("127.0.0.1:1", input, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Usage: uploadf"));
    }
}
