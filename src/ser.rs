//! Serialization of a value tree back to JSON text.
//!
//! The marshaller walks the tree recursively into a caller-owned `String`.
//! Compact mode emits no whitespace at all. Pretty mode prints objects with
//! one entry per line at two-space indentation, keeps single-entry objects
//! inline, and puts a space after each `:` and after each comma in arrays.

use std::fmt;

use crate::escape;
use crate::float;
use crate::types::{Data, Value};

pub(crate) fn marshal(value: &Value, out: &mut String, pretty: bool, indent: usize) {
    match value.data() {
        Data::Null => out.push_str("null"),
        Data::Bool(true) => out.push_str("true"),
        Data::Bool(false) => out.push_str("false"),
        Data::Long(value) => {
            let mut scratch = itoa::Buffer::new();
            out.push_str(scratch.format(*value));
        }
        Data::Float(value) => float::format_single(*value, out),
        Data::Double(value) => float::format_double(*value, out),
        Data::String(value) => escape::quote(out, value.as_str()),
        Data::Array(items) => {
            out.push('[');
            let mut once = false;
            for item in items {
                if once {
                    out.push(',');
                    if pretty {
                        out.push(' ');
                    }
                }
                once = true;
                marshal(item, out, pretty, indent);
            }
            out.push(']');
        }
        Data::Object(entries) => {
            out.push('{');
            let multiline = pretty && entries.len() > 1;
            let mut once = false;
            for (key, item) in entries {
                if once {
                    out.push(',');
                }
                once = true;
                if multiline {
                    out.push('\n');
                    for _ in 0..=indent {
                        out.push_str("  ");
                    }
                }
                escape::quote(out, key);
                out.push(':');
                if pretty {
                    out.push(' ');
                }
                marshal(item, out, pretty, indent + 1);
            }
            if multiline {
                out.push('\n');
                for _ in 0..indent {
                    out.push_str("  ");
                }
            }
            out.push('}');
        }
    }
}

impl Value {
    /// Serialize to JSON with indentation and spacing for human eyes.
    ///
    /// The compact form comes from `Display`, i.e. `value.to_string()`.
    pub fn to_string_pretty(&self) -> String {
        let mut out = String::new();
        marshal(self, &mut out, true, 0);
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        marshal(self, &mut out, false, 0);
        f.write_str(&out)
    }
}
