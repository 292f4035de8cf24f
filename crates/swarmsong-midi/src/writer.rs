//! SMF Format-0 writer - assembles the note stream into a complete file.

use std::io::{self, Write};

use byteorder::{BigEndian, WriteBytesExt};
use swarmsong_core::MidiNote;

use crate::error::MidiError;
use crate::vlq;

/// Pulses per quarter note.
pub const PPQ: u16 = 96;

/// Tempo meta value: 500 000 microseconds per quarter note (120 BPM).
pub const TEMPO_USEC_PER_QN: u32 = 500_000;

/// Ticks per second at the fixed tempo: `PPQ * 1e6 / tempo`.
pub const TICKS_PER_SECOND: f64 = 192.0;

/// Header chunk magic.
pub const SMF_MAGIC: &[u8; 4] = b"MThd";

/// Track chunk magic.
pub const TRACK_MAGIC: &[u8; 4] = b"MTrk";

/// Converts a time in seconds to PPQ-quantized ticks.
pub fn seconds_to_ticks(seconds: f64) -> u32 {
    (seconds.max(0.0) * TICKS_PER_SECOND).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    NoteOff { pitch: u8 },
    NoteOn { pitch: u8, velocity: u8 },
}

#[derive(Debug, Clone, Copy)]
struct TimedEvent {
    tick: u32,
    kind: EventKind,
}

/// A Format-0 file built from a symphony's note stream.
///
/// Single track, channel 0, piano program, fixed 120 BPM tempo. The note
/// stream is expanded into tick-ordered note-on/note-off pairs; at equal
/// ticks, note-offs sort before note-ons so releases never swallow
/// re-triggers.
#[derive(Debug, Clone)]
pub struct SmfFile {
    events: Vec<TimedEvent>,
}

impl SmfFile {
    /// Builds the event list from a note stream.
    ///
    /// Zero-length notes are widened to one tick so every note-on has a
    /// distinct note-off.
    pub fn from_notes(notes: &[MidiNote]) -> Result<Self, MidiError> {
        if notes.is_empty() {
            return Err(MidiError::EmptyStream);
        }

        let mut events = Vec::with_capacity(notes.len() * 2);
        for note in notes {
            let on_tick = seconds_to_ticks(note.time_seconds);
            let duration = seconds_to_ticks(note.duration_seconds).max(1);
            events.push(TimedEvent {
                tick: on_tick,
                kind: EventKind::NoteOn {
                    pitch: note.pitch.min(127),
                    velocity: note.velocity.min(127),
                },
            });
            events.push(TimedEvent {
                tick: on_tick + duration,
                kind: EventKind::NoteOff {
                    pitch: note.pitch.min(127),
                },
            });
        }

        events.sort_by_key(|e| {
            let order = match e.kind {
                EventKind::NoteOff { .. } => 0u8,
                EventKind::NoteOn { .. } => 1,
            };
            (e.tick, order)
        });

        Ok(Self { events })
    }

    /// Number of note-on/note-off events in the track.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Writes the complete file: header chunk, then the single track.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        // Header chunk: magic, length 6, format 0, one track, division.
        writer.write_all(SMF_MAGIC)?;
        writer.write_u32::<BigEndian>(6)?;
        writer.write_u16::<BigEndian>(0)?;
        writer.write_u16::<BigEndian>(1)?;
        writer.write_u16::<BigEndian>(PPQ)?;

        // Track body is rendered first so the chunk length can be patched
        // into the MTrk header.
        let body = self.render_track_body();
        writer.write_all(TRACK_MAGIC)?;
        writer.write_u32::<BigEndian>(body.len() as u32)?;
        writer.write_all(&body)?;
        Ok(())
    }

    fn render_track_body(&self) -> Vec<u8> {
        let mut body = Vec::new();

        // Tempo meta event at tick 0.
        body.extend_from_slice(&vlq::encode(0));
        body.extend_from_slice(&[0xFF, 0x51, 0x03]);
        body.extend_from_slice(&TEMPO_USEC_PER_QN.to_be_bytes()[1..4]);

        // Program change to acoustic grand piano on channel 0.
        body.extend_from_slice(&vlq::encode(0));
        body.extend_from_slice(&[0xC0, 0x00]);

        let mut last_tick = 0u32;
        for event in &self.events {
            let delta = event.tick - last_tick;
            last_tick = event.tick;
            body.extend_from_slice(&vlq::encode(delta));
            match event.kind {
                EventKind::NoteOn { pitch, velocity } => {
                    body.extend_from_slice(&[0x90, pitch, velocity]);
                }
                EventKind::NoteOff { pitch } => {
                    body.extend_from_slice(&[0x80, pitch, 0x00]);
                }
            }
        }

        // End-of-track meta event.
        body.extend_from_slice(&vlq::encode(0));
        body.extend_from_slice(&[0xFF, 0x2F, 0x00]);
        body
    }

    /// Writes the file to a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MidiError> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// BLAKE3 hash of the encoded bytes.
    pub fn compute_hash(&self) -> Result<String, MidiError> {
        let bytes = self.to_bytes()?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}

/// Encodes a note stream straight to SMF bytes.
pub fn encode_notes(notes: &[MidiNote]) -> Result<Vec<u8>, MidiError> {
    SmfFile::from_notes(notes)?.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn note(pitch: u8, time: f64, dur: f64) -> MidiNote {
        MidiNote {
            pitch,
            duration_seconds: dur,
            velocity: 80,
            time_seconds: time,
        }
    }

    #[test]
    fn test_empty_stream_is_an_error() {
        assert!(matches!(
            SmfFile::from_notes(&[]),
            Err(MidiError::EmptyStream)
        ));
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode_notes(&[note(60, 0.0, 0.5)]).unwrap();
        assert_eq!(&bytes[0..4], b"MThd");
        assert_eq!(&bytes[4..8], &[0, 0, 0, 6]);
        assert_eq!(&bytes[8..10], &[0, 0]); // format 0
        assert_eq!(&bytes[10..12], &[0, 1]); // one track
        assert_eq!(&bytes[12..14], &[0, 96]); // division
        assert_eq!(&bytes[14..18], b"MTrk");
    }

    #[test]
    fn test_track_length_matches_body() {
        let bytes = encode_notes(&[note(60, 0.0, 0.5), note(64, 0.5, 0.5)]).unwrap();
        let len = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]) as usize;
        assert_eq!(bytes.len(), 14 + 8 + len);
    }

    #[test]
    fn test_tempo_and_program_events_lead_the_track() {
        let bytes = encode_notes(&[note(60, 0.0, 0.5)]).unwrap();
        // After MTrk header: delta 0, tempo meta 0x07A120, delta 0, C0 00.
        assert_eq!(
            &bytes[22..30],
            &[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, 0x00]
        );
        assert_eq!(&bytes[30..32], &[0xC0, 0x00]);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let notes = vec![note(60, 0.0, 0.5), note(67, 0.25, 0.25), note(64, 0.5, 1.0)];
        assert_eq!(encode_notes(&notes).unwrap(), encode_notes(&notes).unwrap());
    }

    #[test]
    fn test_zero_duration_note_gets_one_tick() {
        let smf = SmfFile::from_notes(&[note(60, 0.0, 0.0)]).unwrap();
        assert_eq!(smf.event_count(), 2);
        let bytes = smf.to_bytes().unwrap();
        // Note-on at delta 0, note-off one tick later.
        let tail = &bytes[32..];
        assert_eq!(&tail[0..4], &[0x00, 0x90, 60, 80]);
        assert_eq!(&tail[4..8], &[0x01, 0x80, 60, 0x00]);
    }

    #[test]
    fn test_seconds_to_ticks_quantization() {
        assert_eq!(seconds_to_ticks(0.0), 0);
        assert_eq!(seconds_to_ticks(0.5), 96);
        assert_eq!(seconds_to_ticks(1.0), 192);
        assert_eq!(seconds_to_ticks(-1.0), 0);
    }
}
