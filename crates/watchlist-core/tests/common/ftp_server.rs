//! Minimal passive-mode FTP server for integration tests.
//!
//! Accepts any login, serves one static file for every RETR and records the
//! control commands it receives.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub struct FtpServer {
    pub port: u16,
    commands: Arc<Mutex<Vec<String>>>,
}

impl FtpServer {
    /// Control commands received so far, e.g. "USER anonymous".
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

pub fn start(file: &[u8]) -> FtpServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let file = Arc::new(file.to_vec());
    let commands = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&commands);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let file = Arc::clone(&file);
            let seen = Arc::clone(&seen);
            thread::spawn(move || session(stream, &file, &seen));
        }
    });
    FtpServer { port, commands }
}

fn reply(out: &mut TcpStream, line: &str) -> bool {
    out.write_all(format!("{line}\r\n").as_bytes()).is_ok()
}

fn session(stream: TcpStream, file: &[u8], seen: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(5)));
    let Ok(mut out) = stream.try_clone() else {
        return;
    };
    let mut lines = BufReader::new(stream);
    let mut data: Option<TcpListener> = None;

    if !reply(&mut out, "220 test server ready") {
        return;
    }
    let mut line = String::new();
    loop {
        line.clear();
        match lines.read_line(&mut line) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let command = line.trim_end().to_string();
        seen.lock().unwrap().push(command.clone());
        let verb = command
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_uppercase();

        let ok = match verb.as_str() {
            "USER" => reply(&mut out, "331 password required"),
            "PASS" => reply(&mut out, "230 logged in"),
            "PWD" => reply(&mut out, "257 \"/\" is the current directory"),
            "EPSV" => {
                let listener = TcpListener::bind("127.0.0.1:0").expect("bind data");
                let port = listener.local_addr().unwrap().port();
                data = Some(listener);
                reply(&mut out, &format!("229 Entering Extended Passive Mode (|||{port}|)"))
            }
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0").expect("bind data");
                let port = listener.local_addr().unwrap().port();
                data = Some(listener);
                reply(
                    &mut out,
                    &format!(
                        "227 Entering Passive Mode (127,0,0,1,{},{})",
                        port / 256,
                        port % 256
                    ),
                )
            }
            "TYPE" => reply(&mut out, "200 type set"),
            "SIZE" => reply(&mut out, &format!("213 {}", file.len())),
            "RETR" => {
                let Some(listener) = data.take() else {
                    reply(&mut out, "425 use EPSV first");
                    continue;
                };
                if !reply(&mut out, "150 opening data connection") {
                    return;
                }
                if let Ok((mut conn, _)) = listener.accept() {
                    let _ = conn.write_all(file);
                }
                reply(&mut out, "226 transfer complete")
            }
            "QUIT" => {
                reply(&mut out, "221 bye");
                return;
            }
            _ => reply(&mut out, "200 ok"),
        };
        if !ok {
            return;
        }
    }
}
