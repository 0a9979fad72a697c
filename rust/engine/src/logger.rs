use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::board::Stage;
use crate::cards::Card;
use crate::player::{PlayerAction, PlayerId};
use crate::pot::Payout;
use crate::repository::GameId;

/// Seat as it was when the hand was dealt.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub seat: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub starting_stack: u64,
}

/// Records a single player action during a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    /// Stage when this action occurred
    pub stage: Stage,
    pub action: PlayerAction,
}

/// A hand revealed at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShownHand {
    pub seat: usize,
    pub cards: [Card; 2],
    pub description: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    /// Seats that were awarded chips
    pub winners: Vec<usize>,
    #[serde(default)]
    pub hands: Vec<ShownHand>,
}

/// Complete record of one hand, written as a single JSONL line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Format: YYYYMMDD-NNNNNN
    pub hand_id: String,
    pub game_id: GameId,
    /// Seed of the service RNG, when one was configured
    pub seed: Option<u64>,
    pub big_blind: u64,
    pub dealer: usize,
    pub seats: Vec<SeatRecord>,
    pub actions: Vec<ActionRecord>,
    /// All five board cards, filled when the hand ends
    pub board: Vec<Card>,
    #[serde(default)]
    pub payouts: Vec<Payout>,
    #[serde(default)]
    pub refunds: Vec<Payout>,
    /// RFC3339, injected at write time when missing
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends hand records to a JSONL file and hands out sequential hand ids.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl HandLogger {
    /// Truncate `path` and start writing there.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::open(path.as_ref(), false)
    }

    /// Keep whatever `path` already holds and append after it.
    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Hands out ids without writing anywhere.
    pub fn detached() -> Self {
        Self {
            writer: None,
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        }
    }

    /// No file behind it; ids use a fixed date.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
