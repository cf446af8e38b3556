use crate::Result;
use paragen_error::{paragen_bail, paragen_err};
use std::io::{Read, Write};

/// Every command and header field on the wire is exactly this many bytes of
/// ASCII, right-padded with spaces. Payloads follow as raw bytes and all
/// numeric fields are decimal ASCII.
pub const COMMAND_LENGTH: usize = 32;

pub(crate) mod commands {
    pub const GET_SEED: &str = "getSeed";
    pub const READY: &str = "ready";
    pub const RESULT: &str = "result";
    pub const COMPUTE: &str = "compute";
    pub const NO_SUCCESS: &str = "nosuccess";
}

/// Encodes a field value into its fixed-width wire form.
pub fn encode_field(value: &str) -> Result<[u8; COMMAND_LENGTH]> {
    let bytes = value.as_bytes();
    if bytes.len() > COMMAND_LENGTH {
        paragen_bail!(Protocol: "field {:?} exceeds the {} byte command length", value, COMMAND_LENGTH);
    }
    if !value.is_ascii() {
        paragen_bail!(Protocol: "field {:?} is not ASCII", value);
    }

    let mut field = [b' '; COMMAND_LENGTH];
    field[..bytes.len()].copy_from_slice(bytes);
    Ok(field)
}

pub fn write_field(writer: &mut impl Write, value: &str) -> Result<()> {
    let field = encode_field(value)?;
    writer.write_all(&field)?;
    Ok(())
}

/// Reads one fixed-width field and strips the space padding.
pub fn read_field(reader: &mut impl Read) -> Result<String> {
    let mut field = [0u8; COMMAND_LENGTH];
    reader.read_exact(&mut field)?;

    let value = std::str::from_utf8(&field)
        .map_err(|_| paragen_err!(Protocol: "field is not valid ASCII"))?;
    Ok(value.trim().to_string())
}

/// Reads one fixed-width field and parses it as a decimal number.
pub fn read_numeric_field(reader: &mut impl Read) -> Result<u64> {
    let field = read_field(reader)?;
    field
        .parse::<u64>()
        .map_err(|_| paragen_err!(Protocol: "expected a decimal field, got {:?}", field))
}

pub fn read_payload(reader: &mut impl Read, size: usize) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; size];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}
