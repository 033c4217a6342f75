//! Per-organism life journal.
//!
//! Every organism keeps a small log book of what happened to it. The
//! configured [`JournalLevel`] decides which events are worth keeping; the
//! default keeps everything except routine foraging and consumption.

use crate::organism::TerminationReason;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of an organism's life is written down
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JournalLevel {
    /// Nothing is recorded
    Off,
    /// Birth, death, offspring and group founding
    MostImportant,
    /// Adds group changes, thefts and losses
    #[default]
    Important,
    /// Every event, including routine foraging and consumption
    All,
}

/// Something that happened to an organism during a period.
///
/// Variants are listed in the order they can occur within one period.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LifeEvent {
    Born,
    FormedGroup,
    JoinedGroup,
    RecruitedIntoGroup,
    StoleBeforeForaging,
    Foraged,
    StoleAfterForaging,
    Consumed,
    GaveBirth,
    GaveResources,
    ReceivedResources,
    Trained,
    LostStorage,
    Terminated(TerminationReason),
}

impl LifeEvent {
    /// Lowest journal level at which this event is kept
    pub fn importance(&self) -> JournalLevel {
        match self {
            LifeEvent::Born
            | LifeEvent::FormedGroup
            | LifeEvent::GaveBirth
            | LifeEvent::Terminated(_) => JournalLevel::MostImportant,
            LifeEvent::JoinedGroup
            | LifeEvent::RecruitedIntoGroup
            | LifeEvent::StoleBeforeForaging
            | LifeEvent::StoleAfterForaging
            | LifeEvent::LostStorage => JournalLevel::Important,
            LifeEvent::Foraged
            | LifeEvent::Consumed
            | LifeEvent::GaveResources
            | LifeEvent::ReceivedResources
            | LifeEvent::Trained => JournalLevel::All,
        }
    }
}

impl fmt::Display for LifeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifeEvent::Born => write!(f, "Born"),
            LifeEvent::FormedGroup => write!(f, "Formed group"),
            LifeEvent::JoinedGroup => write!(f, "Joined group"),
            LifeEvent::RecruitedIntoGroup => write!(f, "Recruited into group"),
            LifeEvent::StoleBeforeForaging => write!(f, "Stole before foraging"),
            LifeEvent::Foraged => write!(f, "Foraged"),
            LifeEvent::StoleAfterForaging => write!(f, "Stole after foraging"),
            LifeEvent::Consumed => write!(f, "Consumed"),
            LifeEvent::GaveBirth => write!(f, "Gave birth"),
            LifeEvent::GaveResources => write!(f, "Gave resources"),
            LifeEvent::ReceivedResources => write!(f, "Received resources"),
            LifeEvent::Trained => write!(f, "Trained"),
            LifeEvent::LostStorage => write!(f, "Lost storage"),
            LifeEvent::Terminated(reason) => write!(f, "Terminated ({})", reason),
        }
    }
}

/// One journal line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: u64,
    pub event: LifeEvent,
    /// Resources involved, if any
    pub quantity: Option<f64>,
    /// Personal storage after the event
    pub storage: f64,
    pub starvation: f64,
    pub shortages: u32,
}

/// Filtered, append-only event log
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<LogEntry>,
    level: JournalLevel,
}

impl Journal {
    pub fn new(level: JournalLevel) -> Self {
        Self {
            entries: Vec::new(),
            level,
        }
    }

    /// Whether an event of this kind would be kept
    #[inline]
    pub fn accepts(&self, event: &LifeEvent) -> bool {
        event.importance() <= self.level
    }

    /// Append an entry if its event passes the level filter.
    /// Returns true if the entry was kept.
    pub fn push(&mut self, entry: LogEntry) -> bool {
        if self.accepts(&entry.event) {
            self.entries.push(entry);
            true
        } else {
            false
        }
    }

    pub fn level(&self) -> JournalLevel {
        self.level
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Number of entries whose event matches `predicate`
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&LifeEvent) -> bool,
    {
        self.entries.iter().filter(|e| predicate(&e.event)).count()
    }
}
