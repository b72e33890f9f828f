//! Box entry primitives.
//!
//! An `Entry` is one recorded batch of produced boxes with its cost, the
//! reference sale price in effect when it was written, and the margins
//! derived from the two.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxType {
    DoubleBox,
    FlushBox,
    NormalBox,
}

impl BoxType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoubleBox => "double_box",
            Self::FlushBox => "flush_box",
            Self::NormalBox => "normal_box",
        }
    }
}

impl TryFrom<&str> for BoxType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "double_box" => Ok(Self::DoubleBox),
            "flush_box" => Ok(Self::FlushBox),
            "normal_box" => Ok(Self::NormalBox),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid box type: {other}"
            ))),
        }
    }
}

/// The full record of one batch, minus the store-assigned fields.
///
/// Margins arrive precomputed by the client; the store persists them verbatim
/// and only enforces the invariants it cannot store without.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub box_type: BoxType,
    pub number_of_boxes: i64,
    pub total_cost: f64,
    pub unit_cost: f64,
    pub unit_margin: f64,
    pub total_margin: f64,
}

impl EntryDraft {
    pub fn validate(&self) -> ResultEngine<()> {
        if self.number_of_boxes <= 0 {
            return Err(EngineError::InvalidCount(
                "number_of_boxes must be > 0".to_string(),
            ));
        }
        if !self.total_cost.is_finite() || self.total_cost < 0.0 {
            return Err(EngineError::InvalidAmount(
                "total_cost must be a finite amount >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A canonical stored entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
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

impl Entry {
    pub(crate) fn from_draft(draft: &EntryDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: draft.date,
            box_type: draft.box_type,
            number_of_boxes: draft.number_of_boxes,
            total_cost: draft.total_cost,
            unit_cost: draft.unit_cost,
            unit_margin: draft.unit_margin,
            total_margin: draft.total_margin,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "boxes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub date: Date,
    pub box_type: String,
    pub number_of_boxes: i64,
    pub total_cost: f64,
    pub unit_cost: f64,
    pub unit_margin: f64,
    pub total_margin: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Entry> for ActiveModel {
    fn from(entry: &Entry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            date: ActiveValue::Set(entry.date),
            box_type: ActiveValue::Set(entry.box_type.as_str().to_string()),
            number_of_boxes: ActiveValue::Set(entry.number_of_boxes),
            total_cost: ActiveValue::Set(entry.total_cost),
            unit_cost: ActiveValue::Set(entry.unit_cost),
            unit_margin: ActiveValue::Set(entry.unit_margin),
            total_margin: ActiveValue::Set(entry.total_margin),
            created_at: ActiveValue::Set(entry.created_at),
        }
    }
}

impl TryFrom<Model> for Entry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("entry not exists".to_string()))?,
            date: model.date,
            box_type: BoxType::try_from(model.box_type.as_str())?,
            number_of_boxes: model.number_of_boxes,
            total_cost: model.total_cost,
            unit_cost: model.unit_cost,
            unit_margin: model.unit_margin,
            total_margin: model.total_margin,
            created_at: model.created_at,
        })
    }
}
