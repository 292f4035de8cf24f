//! SMF parsing for round-trip validation and inspection.
//!
//! Reads back what the writer emits, plus enough of the general format
//! (running status, metas, sysex) to behave as a conformant Format-0
//! reader.

use std::collections::HashMap;

use crate::error::MidiError;
use crate::vlq;
use crate::writer::{SMF_MAGIC, TRACK_MAGIC};

/// Parsed header chunk fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmfHeader {
    pub format: u16,
    pub num_tracks: u16,
    pub division: u16,
}

/// A note recovered from an SMF track: the round-trip tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveredNote {
    pub pitch: u8,
    pub velocity: u8,
    pub tick: u32,
    pub duration_ticks: u32,
}

/// Validates magic and header layout, returning the parsed header.
pub fn validate_smf_bytes(data: &[u8]) -> Result<SmfHeader, MidiError> {
    if data.len() < 14 {
        return Err(MidiError::InvalidData(format!(
            "file too small: {} bytes",
            data.len()
        )));
    }
    if &data[0..4] != SMF_MAGIC {
        return Err(MidiError::InvalidData("missing MThd magic".to_string()));
    }
    let header_len = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    if header_len != 6 {
        return Err(MidiError::InvalidData(format!(
            "unexpected header length {header_len}"
        )));
    }
    Ok(SmfHeader {
        format: u16::from_be_bytes([data[8], data[9]]),
        num_tracks: u16::from_be_bytes([data[10], data[11]]),
        division: u16::from_be_bytes([data[12], data[13]]),
    })
}

/// Parses a Format-0 buffer into recovered notes, ordered by note-on tick.
///
/// Note-offs pair with the oldest open note-on of the same pitch. A
/// note-on with velocity 0 counts as a note-off, per the standard.
pub fn read_notes(data: &[u8]) -> Result<Vec<RecoveredNote>, MidiError> {
    let header = validate_smf_bytes(data)?;
    if header.format != 0 || header.num_tracks != 1 {
        return Err(MidiError::InvalidData(format!(
            "expected format 0 with 1 track, got format {} with {}",
            header.format, header.num_tracks
        )));
    }

    let track = track_body(data)?;
    let mut notes: Vec<RecoveredNote> = Vec::new();
    // Open note-ons per pitch: (index into notes, on tick), FIFO.
    let mut open: HashMap<u8, Vec<usize>> = HashMap::new();

    let mut pos = 0usize;
    let mut tick = 0u32;
    let mut running_status: Option<u8> = None;

    while pos < track.len() {
        let (delta, used) = vlq::decode(track, pos)
            .ok_or_else(|| MidiError::InvalidData("truncated delta time".to_string()))?;
        pos += used;
        tick += delta;

        let mut byte = *track
            .get(pos)
            .ok_or_else(|| MidiError::InvalidData("truncated event".to_string()))?;
        if byte & 0x80 == 0 {
            // Running status: reuse the previous channel status.
            byte = running_status
                .ok_or_else(|| MidiError::InvalidData("data byte without status".to_string()))?;
        } else {
            pos += 1;
        }

        match byte {
            0xFF => {
                // Meta event: type, length, payload.
                let meta_type = *track
                    .get(pos)
                    .ok_or_else(|| MidiError::InvalidData("truncated meta".to_string()))?;
                pos += 1;
                let (len, used) = vlq::decode(track, pos)
                    .ok_or_else(|| MidiError::InvalidData("truncated meta length".to_string()))?;
                pos += used + len as usize;
                if meta_type == 0x2F {
                    break;
                }
            }
            0xF0 | 0xF7 => {
                let (len, used) = vlq::decode(track, pos)
                    .ok_or_else(|| MidiError::InvalidData("truncated sysex".to_string()))?;
                pos += used + len as usize;
            }
            status => {
                running_status = Some(status);
                let data_len = match status & 0xF0 {
                    0xC0 | 0xD0 => 1,
                    _ => 2,
                };
                if pos + data_len > track.len() {
                    return Err(MidiError::InvalidData("truncated channel event".to_string()));
                }
                let d1 = track[pos];
                let d2 = if data_len == 2 { track[pos + 1] } else { 0 };
                pos += data_len;

                match status & 0xF0 {
                    0x90 if d2 > 0 => {
                        open.entry(d1).or_default().push(notes.len());
                        notes.push(RecoveredNote {
                            pitch: d1,
                            velocity: d2,
                            tick,
                            duration_ticks: 0,
                        });
                    }
                    0x80 | 0x90 => {
                        if let Some(stack) = open.get_mut(&d1) {
                            if !stack.is_empty() {
                                let idx = stack.remove(0);
                                notes[idx].duration_ticks = tick - notes[idx].tick;
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(notes)
}

fn track_body(data: &[u8]) -> Result<&[u8], MidiError> {
    if data.len() < 22 || &data[14..18] != TRACK_MAGIC {
        return Err(MidiError::InvalidData("missing MTrk chunk".to_string()));
    }
    let len = u32::from_be_bytes([data[18], data[19], data[20], data[21]]) as usize;
    data.get(22..22 + len)
        .ok_or_else(|| MidiError::InvalidData("track shorter than declared".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::encode_notes;
    use swarmsong_core::MidiNote;

    #[test]
    fn test_validate_rejects_garbage() {
        assert!(validate_smf_bytes(b"not midi").is_err());
        assert!(validate_smf_bytes(&[]).is_err());
    }

    #[test]
    fn test_validate_accepts_written_file() {
        let bytes = encode_notes(&[MidiNote {
            pitch: 60,
            duration_seconds: 0.5,
            velocity: 90,
            time_seconds: 0.0,
        }])
        .unwrap();
        let header = validate_smf_bytes(&bytes).unwrap();
        assert_eq!(header.format, 0);
        assert_eq!(header.num_tracks, 1);
        assert_eq!(header.division, 96);
    }

    #[test]
    fn test_read_recovers_note_tuple() {
        let bytes = encode_notes(&[MidiNote {
            pitch: 72,
            duration_seconds: 1.0,
            velocity: 101,
            time_seconds: 0.5,
        }])
        .unwrap();
        let notes = read_notes(&bytes).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].pitch, 72);
        assert_eq!(notes[0].velocity, 101);
        assert_eq!(notes[0].tick, 96);
        assert_eq!(notes[0].duration_ticks, 192);
    }

    #[test]
    fn test_overlapping_same_pitch_pairs_fifo() {
        let bytes = encode_notes(&[
            MidiNote {
                pitch: 60,
                duration_seconds: 1.0,
                velocity: 80,
                time_seconds: 0.0,
            },
            MidiNote {
                pitch: 60,
                duration_seconds: 1.0,
                velocity: 81,
                time_seconds: 0.5,
            },
        ])
        .unwrap();
        let notes = read_notes(&bytes).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].duration_ticks, 192);
        assert_eq!(notes[1].duration_ticks, 192);
    }
}
