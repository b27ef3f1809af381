//! The record every action command reports: which command ran, with which
//! positional arguments and options.

use crate::output::{Renderable, pretty_kv, pretty_section};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    /// Space-separated command path, e.g. `init contracts hardhat`.
    pub command: String,
    pub args: Vec<String>,
    pub opts: BTreeMap<String, Value>,
}

impl Invocation {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            opts: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn opt(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.opts.insert(key.to_string(), value.into());
        self
    }

    /// Record an optional value only when present.
    #[must_use]
    pub fn opt_some(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.opt(key, v),
            None => self,
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

impl Renderable for Invocation {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_section(w, &format!("dot {}", self.command))?;
        let args = if self.args.is_empty() {
            "-".to_string()
        } else {
            self.args.join(" ")
        };
        pretty_kv(w, "args", args)?;
        for (key, value) in &self.opts {
            pretty_kv(w, key, value_text(value))?;
        }
        Ok(())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *w, self).map_err(io::Error::other)?;
        writeln!(w)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let opts = self
            .opts
            .iter()
            .map(|(k, v)| format!("{k}={}", value_text(v)))
            .collect::<Vec<_>>()
            .join(";");
        writeln!(
            w,
            "{},{},{}",
            csv_field(&self.command),
            csv_field(&self.args.join(" ")),
            csv_field(&opts)
        )
    }
}
