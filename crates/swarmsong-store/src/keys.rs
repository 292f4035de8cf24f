//! Key names, channel names and cache caps of the persistence surface.

/// Last consensus summary.
pub const CONSENSUS_LATEST: &str = "consensus:latest";

/// Rolling window of consensus summaries.
pub const CONSENSUS_HISTORY: &str = "consensus:history";
pub const CONSENSUS_HISTORY_CAP: usize = 100;

/// All accepted poems with quality profile.
pub const POEMS_NFT: &str = "poems:nft";
pub const POEMS_CAP: usize = 100;

/// Legendary artifacts. Never trimmed.
pub const ART_LEGENDARY: &str = "art:legendary";

/// Experimental artifacts.
pub const ART_EXPERIMENTAL: &str = "art:experimental";
pub const ART_EXPERIMENTAL_CAP: usize = 50;

/// Common artifacts.
pub const ART_COMMON: &str = "art:common";
pub const ART_COMMON_CAP: usize = 100;

/// Metadata per MIDI file.
pub const MIDI_RECORDINGS: &str = "midi:recordings";
pub const MIDI_RECORDINGS_CAP: usize = 100;

/// Bounded log of procedural profiles.
pub const PROFILE_LOG: &str = "profiles:log";
pub const PROFILE_LOG_CAP: usize = 1000;

/// Authoritative pending-suggestion list (JSON array value; writes are
/// read-modify-write transactions).
pub const PENDING_SUGGESTIONS: &str = "evolution:pending_suggestions";

/// External command channel.
pub const CONTROL_COMMANDS: &str = "control:commands";

/// Current mode, as key and as publication channel.
pub const OPTIMIZATION_MODE: &str = "optimization:mode";
