//! Logging setup and PII redaction

use crate::config::LoggingConfig;
use regex::{Captures, Regex};
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fields treated as personally identifying by default
pub const PII_FIELDS: &[&str] = &["name", "email", "phone", "ssn", "password"];

/// Replacement text for redacted values
pub const REDACTION: &str = "***";

/// Terminator of a `field=value` pair in a log line
pub const SEPARATOR: &str = ";";

/// Precompiled `field=value<separator>` scrubber
#[derive(Debug, Clone)]
pub struct Redactor {
    pattern: Option<Regex>,
    redaction: String,
    separator: String,
}

impl Redactor {
    pub fn new<S: AsRef<str>>(
        fields: &[S],
        redaction: &str,
        separator: &str,
    ) -> std::result::Result<Self, regex::Error> {
        let pattern = if fields.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = fields
                .iter()
                .map(|f| regex::escape(f.as_ref()))
                .collect();
            Some(Regex::new(&format!(
                "({})=(.*?){}",
                alternatives.join("|"),
                regex::escape(separator)
            ))?)
        };

        Ok(Self {
            pattern,
            redaction: redaction.to_string(),
            separator: separator.to_string(),
        })
    }

    pub fn redact(&self, message: &str) -> String {
        match &self.pattern {
            Some(re) => re
                .replace_all(message, |caps: &Captures| {
                    format!("{}={}{}", &caps[1], self.redaction, self.separator)
                })
                .into_owned(),
            None => message.to_string(),
        }
    }
}

/// Replace the value of every listed field in `message` with `redaction`
pub fn filter_datum<S: AsRef<str>>(
    fields: &[S],
    redaction: &str,
    message: &str,
    separator: &str,
) -> String {
    match Redactor::new(fields, redaction, separator) {
        Ok(redactor) => redactor.redact(message),
        Err(_) => message.to_string(),
    }
}

/// Render a record as `key=value; key=value;`
pub fn record_line<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}{}", k.as_ref(), v.as_ref(), SEPARATOR))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `MakeWriter` that scrubs every formatted line before it reaches `inner`
#[derive(Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
    redactor: Arc<Redactor>,
}

impl<M> RedactingMakeWriter<M> {
    pub fn new(inner: M, redactor: Redactor) -> Self {
        Self {
            inner,
            redactor: Arc::new(redactor),
        }
    }
}

/// Writer handed out by [`RedactingMakeWriter`]
pub struct RedactingWriter<W> {
    inner: W,
    redactor: Arc<Redactor>,
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        self.inner.write_all(self.redactor.redact(&line).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for RedactingMakeWriter<M> {
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            redactor: Arc::clone(&self.redactor),
        }
    }
}

/// Install the global tracing subscriber
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let redactor = if config.redact_pii {
        match Redactor::new(config.pii_fields.as_slice(), REDACTION, SEPARATOR) {
            Ok(redactor) => Some(redactor),
            Err(e) => {
                eprintln!("Invalid PII field list, redaction disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let (plain, redacting) = match redactor {
        Some(redactor) => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(RedactingMakeWriter::new(io::stderr, redactor)),
            ),
        ),
        None => (
            Some(tracing_subscriber::fmt::layer().with_writer(io::stderr)),
            None,
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(redacting)
        .init();
}
