//! Body measurements and garment sizes of one character.

use costume_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `measurements` table. At most one per character.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Measurements {
    pub id: EntityId,
    pub project_id: EntityId,
    pub character_id: EntityId,
    pub height: Option<f64>,
    pub shoulders: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub arm: Option<f64>,
    pub leg: Option<f64>,
    /// Unit of the numeric measurements, e.g. "cm".
    pub unit: Option<String>,
    pub shirt_size: Option<String>,
    pub coat_size: Option<String>,
    pub trousers_size: Option<String>,
    pub shoe_size: Option<String>,
    pub suit_size: Option<String>,
    pub bra_size: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating, replacing or updating measurements.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MeasurementsInput {
    #[validate(range(min = 0.0))]
    pub height: Option<f64>,
    #[validate(range(min = 0.0))]
    pub shoulders: Option<f64>,
    #[validate(range(min = 0.0))]
    pub chest: Option<f64>,
    #[validate(range(min = 0.0))]
    pub waist: Option<f64>,
    #[validate(range(min = 0.0))]
    pub hips: Option<f64>,
    #[validate(range(min = 0.0))]
    pub arm: Option<f64>,
    #[validate(range(min = 0.0))]
    pub leg: Option<f64>,
    #[validate(length(max = 10))]
    pub unit: Option<String>,
    pub shirt_size: Option<String>,
    pub coat_size: Option<String>,
    pub trousers_size: Option<String>,
    pub shoe_size: Option<String>,
    pub suit_size: Option<String>,
    pub bra_size: Option<String>,
}

pub type UpdateMeasurements = MeasurementsInput;

impl MeasurementsInput {
    pub fn apply(&self, m: &mut Measurements) {
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(v) = &self.$field {
                    m.$field = Some(v.clone());
                })*
            };
        }
        set!(
            height, shoulders, chest, waist, hips, arm, leg, unit, shirt_size, coat_size,
            trousers_size, shoe_size, suit_size, bra_size
        );
    }
}

#[derive(Debug, Clone)]
pub struct NewMeasurements {
    pub project_id: EntityId,
    pub character_id: EntityId,
    pub values: MeasurementsInput,
}
