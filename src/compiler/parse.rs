//! Parsers for short container option strings

use crate::pipeline::{CompileError, HostAlias, Port};
use std::num::ParseIntError;

/// Parses an extra host entry of the form `name:ip`.
///
/// Only the first `:` separates name and address, so IPv6 addresses are
/// kept whole.
///
/// # Errors
///
/// Returns [`CompileError::ExtraHostFormat`] if the entry has no `:`.
pub fn parse_extra_host(entry: &str) -> Result<HostAlias, CompileError> {
    let (name, ip) = entry
        .split_once(':')
        .ok_or_else(|| CompileError::ExtraHostFormat {
            host: entry.to_string(),
        })?;
    Ok(HostAlias {
        name: name.to_string(),
        ip: ip.to_string(),
    })
}

/// Parses a port of the form `number` or `number/protocol`.
///
/// # Errors
///
/// Returns the integer parse error if the number is not in `0..=65535`.
pub fn parse_port(definition: &str) -> Result<Port, ParseIntError> {
    let (number, protocol) = definition.split_once('/').unwrap_or((definition, ""));
    // `u16::from_str` accepts a leading `+`; a lone sign is an invalid digit
    let number = if number.starts_with('+') { "+" } else { number };
    Ok(Port {
        number: number.parse()?,
        protocol: protocol.to_string(),
    })
}
