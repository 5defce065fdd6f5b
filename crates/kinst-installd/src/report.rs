use std::io::{self, Write};

use serde_json::Value;

const FRAME: usize = 150;
const SEPARATOR: usize = 50;

/// Row of `*` used to bracket the waiting and collecting phases.
pub fn separator() -> String {
    "*".repeat(SEPARATOR)
}

/// Print the failure record of `unit` framed by rows of `*`.
///
/// Keys come out sorted; the record was decoded into an ordered map.
pub fn write_failure<W: Write>(out: &mut W, unit: &str, record: &Value) -> io::Result<()> {
    let frame = "*".repeat(FRAME);
    let body = serde_json::to_string_pretty(record).map_err(io::Error::other)?;

    writeln!(out, "\n")?;
    writeln!(out, "Task '{unit}' failed:")?;
    writeln!(out, "{frame}")?;
    writeln!(out, "{body}")?;
    writeln!(out, "{frame}")?;
    out.flush()
}
