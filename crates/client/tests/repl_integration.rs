//! Drives the REPL end-to-end against a real router over loopback,
//! in the same spawn-and-connect style as the router's and shard's own
//! integration tests.

use std::io::Cursor;
use std::thread;
use std::time::{Duration, Instant};

use client::repl;
use router::{run_router, RouterConfig};
use test_support::{allocate_loopback_addr, EnvGuard};

fn connect_with_retries(addr: &str) {
    let start = Instant::now();
    loop {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        if start.elapsed() > Duration::from_secs(5) {
            panic!("router never accepted a connection on {addr}");
        }
        thread::sleep(Duration::from_millis(10));
    }
}

fn spawn_router(home_parent: &std::path::Path, port: u16) {
    let args = vec![
        "router".to_string(),
        "--port".to_string(),
        port.to_string(),
        "--home".to_string(),
        "~/S1".to_string(),
        "--pdf-addr".to_string(),
        "127.0.0.1:1".to_string(),
        "--txt-addr".to_string(),
        "127.0.0.1:1".to_string(),
        "--zip-addr".to_string(),
        "127.0.0.1:1".to_string(),
    ];
    let config = RouterConfig::from_iter(args).expect("parse router config");
    let home_parent = home_parent.to_path_buf();
    thread::spawn(move || {
        let _guard = EnvGuard::set("HOME", home_parent.to_str().unwrap());
        run_router(config).expect("router exits cleanly")
    });
}

#[test]
fn uploadf_and_downlf_round_trip_through_the_repl() {
    let home_parent = tempfile::tempdir().expect("home parent");
    let _home_guard = EnvGuard::set("HOME", home_parent.path().to_str().unwrap());
    std::fs::create_dir_all(home_parent.path().join("S1")).unwrap();

    let addr = allocate_loopback_addr();
    let port: u16 = addr.rsplit(':').next().unwrap().parse().unwrap();
    spawn_router(home_parent.path(), port);
    connect_with_retries(&format!("127.0.0.1:{port}"));

    let work_dir = tempfile::tempdir().expect("client cwd");
    let local_source = work_dir.path().join("hello.c");
    std::fs::write(&local_source, b"int main(void) { return 0; }\n").unwrap();

    let script = format!(
        "uploadf {} ~/S1\ndownlf ~/S1/hello.c\nremovef ~/S1/hello.c\nexit\n",
        local_source.display()
    );
    let input = Cursor::new(script.into_bytes());
    let mut output = Vec::new();
    repl::run(&format!("127.0.0.1:{port}"), input, &mut output).unwrap();

    let transcript = String::from_utf8(output).unwrap();
    assert!(transcript.contains("SUCCESS"), "transcript: {transcript}");
    assert!(transcript.contains("downloaded successfully"), "transcript: {transcript}");
    assert!(
        std::fs::read(home_parent.path().join("S1").join("hello.c")).is_err(),
        "removef should have deleted the stored file"
    );

    let _ = std::fs::remove_file("hello.c");
}

#[test]
fn unsupported_downltar_tag_is_reported_without_a_connection() {
    let input = Cursor::new(b"downltar doc\nexit\n".to_vec());
    let mut output = Vec::new();
    repl::run("127.0.0.1:1", input, &mut output).unwrap();
    let transcript = String::from_utf8(output).unwrap();
    assert!(transcript.contains("Error:"), "transcript: {transcript}");
}
