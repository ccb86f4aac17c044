//! Message framing for the command-response stream.
//!
//! A frame is a little-endian `u32` byte count followed by that many
//! bytes of JSON. The count covers the payload only, never itself, and
//! is capped at [`MAX_MESSAGE_SIZE`] so a corrupt prefix cannot drive an
//! unbounded allocation.

use std::io::{ErrorKind, Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::protocol::{MAX_MESSAGE_SIZE, ProtocolError};

/// Read one frame and decode its payload.
///
/// `Ok(None)` means the peer closed the stream between frames (a clean
/// disconnect). EOF inside a frame is an error. When the stream has a
/// read timeout set and it elapses, the result is
/// [`ProtocolError::TimedOut`] so callers can distinguish a slow host
/// from a broken one.
pub fn read_message<T: DeserializeOwned>(
    reader: &mut impl Read,
) -> Result<Option<T>, ProtocolError> {
    let mut prefix = [0_u8; 4];
    if let Err(err) = reader.read_exact(&mut prefix) {
        if err.kind() == ErrorKind::UnexpectedEof {
            return Ok(None);
        }
        return Err(classify_io(err));
    }

    let len = u32::from_le_bytes(prefix) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::PayloadTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut payload = vec![0_u8; len];
    reader.read_exact(&mut payload).map_err(classify_io)?;
    Ok(Some(serde_json::from_slice(&payload)?))
}

/// Encode `message` and write it as one frame.
///
/// The prefix and payload go out in a single write so a frame is never
/// split by an error between the two; the stream is flushed afterwards.
pub fn write_message<T: Serialize>(
    writer: &mut impl Write,
    message: &T,
) -> Result<(), ProtocolError> {
    let payload = serde_json::to_vec(message)?;
    if payload.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }

    // cast cannot fail: MAX_MESSAGE_SIZE fits in u32
    let prefix = u32::try_from(payload.len())
        .map_err(|_| ProtocolError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_MESSAGE_SIZE,
        })?
        .to_le_bytes();

    let mut frame = Vec::with_capacity(prefix.len() + payload.len());
    frame.extend_from_slice(&prefix);
    frame.extend_from_slice(&payload);
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Socket read timeouts surface as `WouldBlock` on Unix and `TimedOut`
/// on Windows; both mean the deadline passed, not that the stream broke.
fn classify_io(err: std::io::Error) -> ProtocolError {
    match err.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => ProtocolError::TimedOut,
        _ => ProtocolError::Io(err),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
