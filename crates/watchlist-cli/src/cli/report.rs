//! Failure reporting: plain text, or a Splunk error result set.

use std::io::{self, Write};

use watchlist_core::config::ErrorFormat;

/// Where a fatal error goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorChannel {
    /// Message on stdout; the error chain goes to the log.
    Plain,
    /// A one-column `ERROR` result set on stdout, which Splunk shows as a search error.
    Splunk,
}

impl ErrorChannel {
    pub fn select(format: ErrorFormat, under_splunk: bool) -> Self {
        match format {
            ErrorFormat::Plain => Self::Plain,
            ErrorFormat::Splunk => Self::Splunk,
            ErrorFormat::Auto if under_splunk => Self::Splunk,
            ErrorFormat::Auto => Self::Plain,
        }
    }

    pub fn from_env(format: ErrorFormat) -> Self {
        Self::select(format, std::env::var_os("SPLUNK_HOME").is_some())
    }

    /// Splunk reads the error row from stdout, so the process itself succeeds.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Plain => 1,
            Self::Splunk => 0,
        }
    }

    pub fn report(self, err: &anyhow::Error) {
        tracing::error!("{:?}", err);
        let stdout = io::stdout();
        if let Err(e) = self.write_report(err, stdout.lock()) {
            eprintln!("getwatchlist error: {:#} (reporting failed: {})", err, e);
        }
    }

    pub fn write_report<W: Write>(self, err: &anyhow::Error, mut out: W) -> io::Result<()> {
        let message = format!("{:#}", err);
        match self {
            Self::Plain => {
                writeln!(out, "{message}")?;
                out.flush()
            }
            Self::Splunk => {
                let mut writer = csv::Writer::from_writer(out);
                writer.write_record(["ERROR"])?;
                writer.write_record([message.as_str()])?;
                writer.flush()
            }
        }
    }
}
