//! Log sink writing RFC 3164 messages to the local syslog socket.

use std::{
    io,
    os::unix::net::UnixDatagram,
    path::Path,
    sync::Arc,
};

use chrono::{DateTime, Local};
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Default local syslog socket.
pub const SOCKET_PATH: &str = "/dev/log";

/// `daemon` facility.
const FACILITY_DAEMON: u8 = 3;

const TAG: &str = "ansihook";

/// Maps a tracing level to a syslog severity.
fn severity(level: &Level) -> u8 {
    match *level {
        Level::ERROR => 3,
        Level::WARN => 4,
        Level::INFO => 6,
        _ => 7,
    }
}

/// Formats one message as `<PRI>Mmm dd hh:mm:ss TAG[PID]: MSG`.
fn format_message(severity: u8, timestamp: DateTime<Local>, pid: u32, message: &str) -> String {
    let pri = FACILITY_DAEMON * 8 + severity;
    format!(
        "<{pri}>{} {TAG}[{pid}]: {}",
        timestamp.format("%b %e %H:%M:%S"),
        message.trim_end()
    )
}

/// [`MakeWriter`] sending every formatted event as one datagram.
#[derive(Clone, Debug)]
pub struct SyslogWriter {
    socket: Arc<UnixDatagram>,
    pid: u32,
}

impl SyslogWriter {
    /// Connects to the syslog socket at `path`.
    pub fn connect(path: impl AsRef<Path>) -> io::Result<Self> {
        let socket = UnixDatagram::unbound()?;
        socket.connect(path)?;
        Ok(Self {
            socket: Arc::new(socket),
            pid: std::process::id(),
        })
    }
}

/// Writer for a single event at a fixed severity.
pub struct SyslogMessage<'a> {
    writer: &'a SyslogWriter,
    severity: u8,
}

impl io::Write for SyslogMessage<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let message = format_message(
            self.severity,
            Local::now(),
            self.writer.pid,
            &String::from_utf8_lossy(buf),
        );
        self.writer.socket.send(message.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SyslogWriter {
    type Writer = SyslogMessage<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SyslogMessage {
            writer: self,
            severity: severity(&Level::INFO),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SyslogMessage {
            writer: self,
            severity: severity(meta.level()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use chrono::TimeZone;

    #[test]
    fn test_priority_combines_daemon_facility_and_severity() {
        let ts = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();

        assert_eq!(
            format_message(severity(&Level::ERROR), ts, 42, "playbook run failed\n"),
            "<27>Mar  5 14:07:09 ansihook[42]: playbook run failed"
        );
        assert_eq!(
            format_message(severity(&Level::INFO), ts, 42, "x"),
            "<30>Mar  5 14:07:09 ansihook[42]: x"
        );
        assert_eq!(severity(&Level::WARN), 4);
        assert_eq!(severity(&Level::TRACE), 7);
    }

    #[test]
    fn test_each_event_is_one_datagram() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.sock");
        let daemon = UnixDatagram::bind(&path).unwrap();
        let writer = SyslogWriter::connect(&path).unwrap();

        writer.make_writer().write_all(b"server started\n").unwrap();
        writer.make_writer().write_all(b"received a push event\n").unwrap();

        let mut buf = [0u8; 512];
        let n = daemon.recv(&mut buf).unwrap();
        let first = std::str::from_utf8(&buf[..n]).unwrap();
        assert!(first.starts_with("<30>"), "{first}");
        assert!(first.ends_with("]: server started"), "{first}");

        let n = daemon.recv(&mut buf).unwrap();
        assert!(std::str::from_utf8(&buf[..n]).unwrap().ends_with("]: received a push event"));
    }

    #[test]
    fn test_connect_fails_without_a_daemon() {
        let dir = tempfile::tempdir().unwrap();

        assert!(SyslogWriter::connect(dir.path().join("missing.sock")).is_err());
    }
}
