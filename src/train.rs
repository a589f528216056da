//! Code for treatment train models.
//!
//! A train directory holds `train.toml` (the ordered unit list, the source flow and the
//! analysis year, plus optional financial overrides), the constituent list and the removal
//! factors.
use crate::constituent::{
    ConstituentID, ConstituentMap, RemovalFactorsMap, read_constituents, read_removal_factors,
};
use crate::finance::FinancialParams;
use crate::input::read_toml;
use crate::reference::ReferenceData;
use crate::unit_process::{UnitID, UnitProcess, UnitRaw};
use crate::units::{Dimensionless, FlowRate};
use anyhow::{Context, Result, ensure};
use indexmap::IndexSet;
use itertools::Itertools;
use std::path::Path;

/// The file name of the train file within a train directory
const TRAIN_FILE_NAME: &str = "train.toml";

/// Represents the contents of the entire train file.
#[derive(Debug, PartialEq, serde::Deserialize)]
struct TrainFile {
    train: TrainSection,
    #[serde(default)]
    finance: FinancialParams,
    units: Vec<UnitRaw>,
}

/// Represents the "train" section of the train file.
#[derive(Debug, PartialEq, serde::Deserialize)]
struct TrainSection {
    /// The year to which all costs are escalated
    analysis_year: u32,
    /// Source water flow in m³/h
    source_flow: f64,
}

/// Train definition
#[derive(Debug)]
pub struct Train {
    /// The year to which all costs are escalated
    pub analysis_year: u32,
    /// Source water flow
    pub source_flow: FlowRate,
    /// System-level financial parameters
    pub finance: FinancialParams,
    /// The units in treatment order
    pub units: Vec<UnitProcess>,
    /// Inlet concentrations of the tracked constituents
    pub constituents: ConstituentMap,
    /// Removal fractions by unit and constituent
    pub removal_factors: RemovalFactorsMap,
}

impl TrainFile {
    /// Read a train file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `train_dir` - Folder containing the train configuration files
    fn from_path(train_dir: &Path) -> Result<TrainFile> {
        let file_path = train_dir.join(TRAIN_FILE_NAME);
        let train_file: TrainFile = read_toml(&file_path)?;
        train_file.validate()?;

        Ok(train_file)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.train.source_flow > 0.0,
            "Source flow must be greater than 0"
        );
        ensure!(!self.units.is_empty(), "A train must contain at least one unit");
        self.finance.validate()?;

        let duplicates = self
            .units
            .iter()
            .map(|unit| &unit.id)
            .duplicates()
            .collect_vec();
        ensure!(
            duplicates.is_empty(),
            "Duplicate unit IDs found: {}",
            duplicates.iter().join(", ")
        );

        Ok(())
    }
}

impl Train {
    /// Read a train from the specified directory, building each unit's cost model against
    /// the reference data.
    ///
    /// # Arguments
    ///
    /// * `train_dir` - Folder containing the train configuration files
    /// * `reference` - The reference data tables
    pub fn from_path<P: AsRef<Path>>(train_dir: P, reference: &ReferenceData) -> Result<Train> {
        let train_dir = train_dir.as_ref();
        let train_file = TrainFile::from_path(train_dir)?;

        let unit_ids: IndexSet<UnitID> = train_file
            .units
            .iter()
            .map(|unit| unit.id.clone())
            .collect();

        let units = train_file
            .units
            .into_iter()
            .map(|unit| {
                let id = unit.id.clone();
                unit.into_unit(reference)
                    .with_context(|| format!("Failed to build unit {id}"))
            })
            .try_collect()?;

        let constituents = read_constituents(train_dir)?;
        let constituent_ids: IndexSet<ConstituentID> =
            constituents.keys().cloned().collect();
        let removal_factors = read_removal_factors(train_dir, &unit_ids, &constituent_ids)?;

        Ok(Train {
            analysis_year: train_file.train.analysis_year,
            source_flow: FlowRate(train_file.train.source_flow),
            finance: train_file.finance,
            units,
            constituents,
            removal_factors,
        })
    }

    /// The removal fraction for a unit and constituent, defaulting to zero removal.
    pub fn removal_fraction(
        &self,
        unit_id: &UnitID,
        constituent_id: &ConstituentID,
    ) -> Dimensionless {
        let fraction = self
            .removal_factors
            .get(&(unit_id.clone(), constituent_id.clone()))
            .copied()
            .unwrap_or(0.0);
        Dimensionless(fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, reference_data};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::{TempDir, tempdir};

    const TRAIN_TOML: &str = r#"
        [train]
        analysis_year = 2020
        source_flow = 450.0

        [finance]
        electricity_price = 0.05

        [[units]]
        id = "anti_scalant"
        technology = "chemical_addition"
        chemical = "anti_scalant"

        [[units]]
        id = "tank"
        technology = "holding_tank"
        avg_storage_time = 2.0
        surge_cap = 0.2
    "#;

    const CONSTITUENTS_CSV: &str = "constituent_id,concentration\ntds,1000.0\n";
    const REMOVAL_FACTORS_CSV: &str = "unit_id,constituent_id,removal_fraction\ntank,tds,0.1\n";

    fn create_train_dir(train_toml: &str) -> TempDir {
        let dir = tempdir().unwrap();
        File::create(dir.path().join(TRAIN_FILE_NAME))
            .unwrap()
            .write_all(train_toml.as_bytes())
            .unwrap();
        File::create(dir.path().join("constituents.csv"))
            .unwrap()
            .write_all(CONSTITUENTS_CSV.as_bytes())
            .unwrap();
        File::create(dir.path().join("removal_factors.csv"))
            .unwrap()
            .write_all(REMOVAL_FACTORS_CSV.as_bytes())
            .unwrap();
        dir
    }

    #[rstest]
    fn test_train_from_path(reference_data: ReferenceData) {
        let dir = create_train_dir(TRAIN_TOML);
        let train = Train::from_path(dir.path(), &reference_data).unwrap();

        assert_eq!(train.analysis_year, 2020);
        assert_eq!(train.source_flow, FlowRate(450.0));
        assert_approx_eq!(f64, train.finance.electricity_price, 0.05);
        assert_eq!(train.units.len(), 2);
        assert_eq!(train.units[0].id, "anti_scalant".into());

        // Unlisted pairs default to zero removal
        assert_eq!(
            train.removal_fraction(&"tank".into(), &"tds".into()),
            Dimensionless(0.1)
        );
        assert_eq!(
            train.removal_fraction(&"anti_scalant".into(), &"tds".into()),
            Dimensionless(0.0)
        );
    }

    #[rstest]
    fn test_train_from_path_duplicate_unit_ids(reference_data: ReferenceData) {
        let train_toml = TRAIN_TOML.replace("id = \"tank\"", "id = \"anti_scalant\"");
        let dir = create_train_dir(&train_toml);
        let result = Train::from_path(dir.path(), &reference_data);
        assert_error!(result, "Duplicate unit IDs found: anti_scalant");
    }

    #[rstest]
    fn test_train_from_path_bad_source_flow(reference_data: ReferenceData) {
        let train_toml = TRAIN_TOML.replace("source_flow = 450.0", "source_flow = 0.0");
        let dir = create_train_dir(&train_toml);
        let result = Train::from_path(dir.path(), &reference_data);
        assert_error!(result, "Source flow must be greater than 0");
    }

    #[rstest]
    fn test_train_from_path_rejects_dynamic(reference_data: ReferenceData) {
        let train_toml = TRAIN_TOML.replace(
            "id = \"tank\"",
            "id = \"tank\"\ndynamic = true",
        );
        let dir = create_train_dir(&train_toml);
        assert!(Train::from_path(dir.path(), &reference_data).is_err());
    }
}
