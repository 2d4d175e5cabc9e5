//! Connectionless (out-of-band) RCON framing.
//!
//! ```text
//! request:  FF FF FF FF "rcon <password> <command>\n"
//! response: FF FF FF FF "print <text>"
//! ```

/// Out-of-band packet marker.
const OOB_HEADER: [u8; 4] = [0xFF; 4];

/// Keyword the server puts in front of console output.
const PRINT_PREFIX: &[u8] = b"print";

/// Frame a console command.
pub(super) fn encode(password: &str, command: &str) -> Vec<u8> {
    let mut packet = Vec::with_capacity(OOB_HEADER.len() + password.len() + command.len() + 7);
    packet.extend_from_slice(&OOB_HEADER);
    packet.extend_from_slice(b"rcon ");
    packet.extend_from_slice(password.as_bytes());
    packet.push(b' ');
    packet.extend_from_slice(command.as_bytes());
    packet.push(b'\n');
    packet
}

/// Extract console text from a reply. `None` if the packet is not a reply.
pub(super) fn decode(packet: &[u8]) -> Option<String> {
    let body = packet.strip_prefix(&OOB_HEADER)?;
    let body = body.strip_prefix(PRINT_PREFIX)?;
    // "print" is followed by either a space or a newline
    let body = body
        .strip_prefix(b" ")
        .or_else(|| body.strip_prefix(b"\n"))
        .unwrap_or(body);
    let text = String::from_utf8_lossy(body);
    Some(text.trim_end_matches(['\n', '\0']).to_string())
}
