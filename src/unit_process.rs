//! Unit processes: the building blocks of a treatment train.
//!
//! A unit is declared in the train file with an ID, a technology and the technology's
//! parameters. The configuration flags mirror the zeroth-order contract: units are
//! steady-state with no holdup, and any other value is rejected when the train is loaded.
use crate::id::define_id_type;
use crate::reference::ReferenceData;
use crate::technology::{CostModel, TechnologyParams};
use crate::units::Dimensionless;
use anyhow::{Result, ensure};
use serde::Deserialize;

define_id_type! {UnitID}

/// Represents a single entry of the `units` array in the train file
#[derive(PartialEq, Clone, Debug, Deserialize)]
pub struct UnitRaw {
    /// A unique identifier for the unit (e.g. `alum_feed`)
    pub id: UnitID,
    /// Dynamic model flag - must be false
    #[serde(default)]
    pub dynamic: bool,
    /// Holdup construction flag - must be false
    #[serde(default)]
    pub has_holdup: bool,
    /// Fraction of inlet flow recovered to the outlet; technology default when omitted
    pub water_recovery: Option<f64>,
    /// The unit's technology and its parameters
    #[serde(flatten)]
    pub technology: TechnologyParams,
}

/// A unit process with its cost model built
pub struct UnitProcess {
    /// A unique identifier for the unit
    pub id: UnitID,
    /// Fraction of inlet flow recovered to the outlet
    pub water_recovery: Dimensionless,
    /// The unit's cost model
    pub cost_model: Box<dyn CostModel>,
}

impl std::fmt::Debug for UnitProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitProcess")
            .field("id", &self.id)
            .field("water_recovery", &self.water_recovery)
            .field("cost_model", &"<dyn CostModel>")
            .finish()
    }
}

impl UnitRaw {
    /// Validates the unit's configuration flags.
    ///
    /// # Errors
    ///
    /// Returns an error if `dynamic` or `has_holdup` is true; the zeroth-order models do
    /// not support either.
    fn validate(&self) -> Result<()> {
        ensure!(
            !self.dynamic,
            "Error in unit {}: dynamic must be false",
            self.id
        );
        ensure!(
            !self.has_holdup,
            "Error in unit {}: has_holdup must be false",
            self.id
        );
        if let Some(water_recovery) = self.water_recovery {
            ensure!(
                (0.0..=1.0).contains(&water_recovery),
                "Error in unit {}: water_recovery must be between 0 and 1",
                self.id
            );
        }

        Ok(())
    }

    /// Build the unit, resolving its cost model against the reference data.
    pub fn into_unit(self, reference: &ReferenceData) -> Result<UnitProcess> {
        self.validate()?;
        let cost_model = self.technology.build(reference)?;
        let water_recovery = self
            .water_recovery
            .map_or_else(|| cost_model.default_water_recovery(), Dimensionless);

        Ok(UnitProcess {
            id: self.id,
            water_recovery,
            cost_model,
        })
    }
}
