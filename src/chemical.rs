//! Chemicals dosed by the treatment units and their reference prices.
//!
//! Prices are read from the `chemical_prices.csv` reference table and apply at the analysis
//! year after adjustment with the catalysts & chemicals cost-index factor.
use crate::id::define_id_type;
use crate::input::{input_err_msg, read_csv};
use crate::units::MoneyPerMass;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

define_id_type! {ChemicalID}

/// The file name of the chemical prices reference table
const CHEMICAL_PRICES_FILE_NAME: &str = "chemical_prices.csv";

/// A map of chemical prices in $/kg, keyed by chemical ID
pub type ChemicalPrices = IndexMap<ChemicalID, MoneyPerMass>;

/// Represents a single row of the chemical prices CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct ChemicalPriceRaw {
    chemical_id: String,
    price: f64,
}

/// Read chemical prices from the specified data directory.
///
/// # Arguments
///
/// * `data_dir` - Folder containing the reference data tables
pub fn read_chemical_prices(data_dir: &Path) -> Result<ChemicalPrices> {
    let file_path = data_dir.join(CHEMICAL_PRICES_FILE_NAME);
    let iter = read_csv::<ChemicalPriceRaw>(&file_path)?;
    read_chemical_prices_from_iter(iter).with_context(|| input_err_msg(&file_path))
}

fn read_chemical_prices_from_iter<I>(iter: I) -> Result<ChemicalPrices>
where
    I: Iterator<Item = ChemicalPriceRaw>,
{
    let mut prices = ChemicalPrices::new();
    for raw in iter {
        ensure!(
            raw.price >= 0.0,
            "Price for chemical {} must not be negative",
            raw.chemical_id
        );
        let id = ChemicalID::from(raw.chemical_id);
        ensure!(
            prices.insert(id.clone(), MoneyPerMass(raw.price)).is_none(),
            "More than one price provided for chemical {id}"
        );
    }

    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_raw(chemical_id: &str, price: f64) -> ChemicalPriceRaw {
        ChemicalPriceRaw {
            chemical_id: chemical_id.to_string(),
            price,
        }
    }

    #[test]
    fn test_read_chemical_prices_from_iter_good() {
        let raw = [
            price_raw("Aluminum_Al2_SO4_3", 0.56),
            price_raw("Hydrazine_(N2H4)", 3.17),
        ];
        let prices = read_chemical_prices_from_iter(raw.into_iter()).unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(
            *prices.get("Hydrazine_(N2H4)").unwrap(),
            MoneyPerMass(3.17)
        );
    }

    #[test]
    fn test_read_chemical_prices_from_iter_bad_duplicate() {
        let raw = [
            price_raw("Aluminum_Al2_SO4_3", 0.56),
            price_raw("Aluminum_Al2_SO4_3", 0.6),
        ];
        assert!(read_chemical_prices_from_iter(raw.into_iter()).is_err());
    }

    #[test]
    fn test_read_chemical_prices_from_iter_bad_negative() {
        let raw = [price_raw("Chlorine", -1.0)];
        assert!(read_chemical_prices_from_iter(raw.into_iter()).is_err());
    }
}
