use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxType {
    DoubleBox,
    FlushBox,
    NormalBox,
}

impl BoxType {
    pub const ALL: [BoxType; 3] = [Self::DoubleBox, Self::FlushBox, Self::NormalBox];

    /// Returns the canonical string used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoubleBox => "double_box",
            Self::FlushBox => "flush_box",
            Self::NormalBox => "normal_box",
        }
    }

    /// Human-readable label, used in tables and CSV files.
    pub fn label(self) -> &'static str {
        match self {
            Self::DoubleBox => "Double box",
            Self::FlushBox => "Flush box",
            Self::NormalBox => "Normal box",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == value)
    }
}

pub mod box_entry {
    use super::*;

    /// A full record as submitted for insertion or replacement.
    ///
    /// Derived fields are computed by the client at write time; the store
    /// persists them verbatim.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BoxEntryNew {
        pub date: NaiveDate,
        pub box_type: BoxType,
        pub number_of_boxes: i64,
        pub total_cost: f64,
        /// Reference sale price per box in effect at write time.
        pub unit_cost: f64,
        pub unit_margin: f64,
        pub total_margin: f64,
    }

    /// A canonical stored record, as returned by the store.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BoxEntry {
        pub id: Uuid,
        pub date: NaiveDate,
        pub box_type: BoxType,
        pub number_of_boxes: i64,
        pub total_cost: f64,
        pub unit_cost: f64,
        pub unit_margin: f64,
        pub total_margin: f64,
        pub created_at: DateTime<Utc>,
    }

    /// Response body for listing entries, newest first.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BoxList {
        pub entries: Vec<BoxEntry>,
    }

    /// Request body for bulk import; inserted all-or-nothing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BoxImport {
        pub entries: Vec<BoxEntryNew>,
    }
}

pub mod session {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Session {
        pub username: String,
    }
}
