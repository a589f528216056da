//! Constituents tracked through the treatment train and their removal factors.
//!
//! Each unit must end up with a removal fraction for every constituent in the active
//! constituent list; pairs missing from the removal factors file default to zero removal.
use crate::id::{IDCollection, define_id_type};
use crate::input::{deserialise_proportion, input_err_msg, read_csv};
use crate::unit_process::UnitID;
use crate::units::Dose;
use anyhow::{Context, Result, ensure};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

define_id_type! {ConstituentID}

/// The file name of the constituents file within a train directory
const CONSTITUENTS_FILE_NAME: &str = "constituents.csv";

/// The file name of the removal factors file within a train directory
const REMOVAL_FACTORS_FILE_NAME: &str = "removal_factors.csv";

/// A map of inlet concentrations (kg/m³), keyed by constituent ID
pub type ConstituentMap = IndexMap<ConstituentID, Dose>;

/// A map of removal fractions, keyed by unit and constituent ID
pub type RemovalFactorsMap = HashMap<(UnitID, ConstituentID), f64>;

/// Represents a single row of the constituents CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct ConstituentRaw {
    constituent_id: String,
    /// Inlet concentration in mg/L
    concentration: f64,
}

/// Represents a single row of the removal factors CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct RemovalFactorRaw {
    unit_id: String,
    constituent_id: String,
    #[serde(deserialize_with = "deserialise_proportion")]
    removal_fraction: f64,
}

/// Read the constituent list from the specified train directory.
///
/// # Arguments
///
/// * `train_dir` - Folder containing the train configuration files
pub fn read_constituents(train_dir: &Path) -> Result<ConstituentMap> {
    let file_path = train_dir.join(CONSTITUENTS_FILE_NAME);
    let iter = read_csv::<ConstituentRaw>(&file_path)?;
    read_constituents_from_iter(iter).with_context(|| input_err_msg(&file_path))
}

fn read_constituents_from_iter<I>(iter: I) -> Result<ConstituentMap>
where
    I: Iterator<Item = ConstituentRaw>,
{
    let mut constituents = ConstituentMap::new();
    for raw in iter {
        ensure!(
            raw.concentration >= 0.0,
            "Concentration for constituent {} must not be negative",
            raw.constituent_id
        );
        let id = ConstituentID::from(raw.constituent_id);
        ensure!(
            constituents
                .insert(id.clone(), Dose::from_mg_per_litre(raw.concentration))
                .is_none(),
            "More than one concentration provided for constituent {id}"
        );
    }

    Ok(constituents)
}

/// Read removal factors from the specified train directory.
///
/// The file is optional; when absent, every unit gets zero removal for every constituent.
///
/// # Arguments
///
/// * `train_dir` - Folder containing the train configuration files
/// * `unit_ids` - All unit IDs in the train
/// * `constituent_ids` - All constituent IDs in the active constituent list
pub fn read_removal_factors(
    train_dir: &Path,
    unit_ids: &IndexSet<UnitID>,
    constituent_ids: &IndexSet<ConstituentID>,
) -> Result<RemovalFactorsMap> {
    let file_path = train_dir.join(REMOVAL_FACTORS_FILE_NAME);
    if !file_path.is_file() {
        return Ok(RemovalFactorsMap::new());
    }

    let iter = read_csv::<RemovalFactorRaw>(&file_path)?;
    read_removal_factors_from_iter(iter, unit_ids, constituent_ids)
        .with_context(|| input_err_msg(&file_path))
}

fn read_removal_factors_from_iter<I>(
    iter: I,
    unit_ids: &IndexSet<UnitID>,
    constituent_ids: &IndexSet<ConstituentID>,
) -> Result<RemovalFactorsMap>
where
    I: Iterator<Item = RemovalFactorRaw>,
{
    let mut factors = RemovalFactorsMap::new();
    for raw in iter {
        let unit_id = unit_ids.get_id_by_str(&raw.unit_id)?;
        let constituent_id = constituent_ids.get_id_by_str(&raw.constituent_id)?;
        ensure!(
            factors
                .insert((unit_id.clone(), constituent_id.clone()), raw.removal_fraction)
                .is_none(),
            "More than one removal factor provided for unit {unit_id} and constituent \
             {constituent_id}"
        );
    }

    Ok(factors)
}
