//! Trace file loader.
//!
//! A trace is a text file with one item per line:
//! 1. **Comments and blank lines:** Lines starting with `#`, or empty after trimming.
//! 2. **Header:** The first remaining line, `page_size num_frames num_pages num_backing_slots`.
//! 3. **Directives:** `print` (render a snapshot), `debug` and `nodebug` (toggle tracing).
//! 4. **Accesses:** `r<hex>` or `w<hex>` records.
//!
//! Directives may appear anywhere, including before the header. When the sizes come
//! from a JSON configuration instead, the trace is loaded with [`Trace::parse_body`]
//! and has no header: every non-directive line is an access.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::common::access::AccessRecord;
use crate::common::error::{ConfigError, SimError, TraceError};
use crate::config::{Config, ReplacementPolicy};

/// In-band control tokens handled by the dispatch loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Render the current state.
    Print,
    /// Enable per-access debug tracing.
    Debug,
    /// Disable per-access debug tracing.
    NoDebug,
}

impl Directive {
    /// Recognises a directive line (already trimmed).
    pub fn parse(line: &str) -> Option<Self> {
        match line {
            "print" => Some(Self::Print),
            "debug" => Some(Self::Debug),
            "nodebug" => Some(Self::NoDebug),
            _ => None,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Print => "print",
            Self::Debug => "debug",
            Self::NoDebug => "nodebug",
        })
    }
}

/// A meaningful trace line after the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceLine {
    /// A control token.
    Directive(Directive),
    /// A memory access.
    Access(AccessRecord),
}

/// A trace line with its 1-based position in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    /// Line number in the source text.
    pub line_no: usize,
    /// Decoded content.
    pub line: TraceLine,
}

/// A parsed trace: the configuration header and every entry in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    /// The raw configuration header line, absent for header-less traces.
    pub header: Option<String>,
    /// Directives and accesses in trace order; directives before the header included.
    pub entries: Vec<TraceEntry>,
}

/// A trace split for batch execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch {
    /// All access records in trace order.
    pub records: Vec<AccessRecord>,
    /// Each directive paired with the number of accesses that precede it.
    pub directives: Vec<(usize, Directive)>,
}

impl Batch {
    /// Directives that follow exactly `accesses` records, in trace order.
    pub fn directives_after(&self, accesses: usize) -> impl Iterator<Item = Directive> + '_ {
        self.directives
            .iter()
            .filter(move |(pos, _)| *pos == accesses)
            .map(|&(_, d)| d)
    }
}

impl Trace {
    /// Parses trace text.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::MissingHeader`] if there is no header line and
    /// [`TraceError::MalformedRecord`] for the first undecodable access line.
    pub fn parse(text: &str) -> Result<Self, TraceError> {
        let trace = Self::parse_lines(text, true)?;
        if trace.header.is_none() {
            return Err(TraceError::MissingHeader);
        }
        Ok(trace)
    }

    /// Parses trace text that has no header line.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::MalformedRecord`] for the first undecodable access line,
    /// including a header line left in the text.
    pub fn parse_body(text: &str) -> Result<Self, TraceError> {
        Self::parse_lines(text, false)
    }

    fn parse_lines(text: &str, expect_header: bool) -> Result<Self, TraceError> {
        let mut header = None;
        let mut entries = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(directive) = Directive::parse(line) {
                entries.push(TraceEntry {
                    line_no,
                    line: TraceLine::Directive(directive),
                });
                continue;
            }
            if expect_header && header.is_none() {
                header = Some(line.to_string());
                continue;
            }
            let record = AccessRecord::parse_line(line, line_no)?;
            entries.push(TraceEntry {
                line_no,
                line: TraceLine::Access(record),
            });
        }

        Ok(Self { header, entries })
    }

    /// Reads and parses a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be read, otherwise as
    /// [`Trace::parse`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TraceError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Reads and parses a header-less trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Io`] if the file cannot be read, otherwise as
    /// [`Trace::parse_body`].
    pub fn from_file_body<P: AsRef<Path>>(path: P) -> Result<Self, TraceError> {
        let text = fs::read_to_string(path)?;
        Self::parse_body(&text)
    }

    /// Loads a trace and the configuration that sizes its run.
    ///
    /// Without `config_file` the trace must start with a header, which supplies the
    /// sizes. With it, the sizes come from the JSON file and the trace has no header.
    /// `policy` overrides any policy named in the JSON file.
    ///
    /// # Errors
    ///
    /// Returns any [`TraceError`] from loading the trace and any [`ConfigError`] from
    /// the header or the JSON file.
    pub fn load<P: AsRef<Path>>(
        path: P,
        config_file: Option<&Path>,
        policy: ReplacementPolicy,
    ) -> Result<(Self, Config), SimError> {
        match config_file {
            Some(config_file) => {
                let mut config = Config::from_json_file(config_file)?;
                config.policy = policy;
                Ok((Self::from_file_body(path)?, config))
            }
            None => {
                let trace = Self::from_file(path)?;
                let config = trace.config(policy)?;
                Ok((trace, config))
            }
        }
    }

    /// Builds the configuration from the header and the chosen policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHeader`] for a header-less trace, otherwise as
    /// [`Config::from_header`].
    pub fn config(&self, policy: ReplacementPolicy) -> Result<Config, ConfigError> {
        let header = self.header.as_deref().ok_or(ConfigError::NoHeader)?;
        Config::from_header(header, policy)
    }

    /// Iterates over the access records in trace order.
    pub fn records(&self) -> impl Iterator<Item = &AccessRecord> {
        self.entries.iter().filter_map(|e| match &e.line {
            TraceLine::Access(record) => Some(record),
            TraceLine::Directive(_) => None,
        })
    }

    /// Splits the trace into its access records and positioned directives.
    pub fn to_batch(&self) -> Batch {
        let mut batch = Batch::default();
        for entry in &self.entries {
            match entry.line {
                TraceLine::Access(record) => batch.records.push(record),
                TraceLine::Directive(d) => batch.directives.push((batch.records.len(), d)),
            }
        }
        batch
    }
}
