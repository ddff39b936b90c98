//! Run configuration loaded from JSON
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Command-line flags override file values before `validate`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::assumptions::loader::{load_rate_schedule, load_yearly_rates};
use crate::assumptions::{MacroAssumptions, RateSchedule, YearlyRateTable};
use crate::error::{DebtSimError, Result};
use crate::projection::{EndogenousRateModel, MacroConfig, NewDebtInterestStrategy, RateModel, RateStamping, PERCENT_SCALED, UNSCALED};
use crate::securities::{parse_security_types, SecurityType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Treasury marketable securities CSV
    #[serde(default = "default_raw_data_path")]
    pub raw_data_path: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Last date reissued and simulated
    #[serde(default = "default_reissue_end_date")]
    pub reissue_end_date: NaiveDate,

    /// Class 1 descriptions to include
    #[serde(default = "default_security_types")]
    pub security_types: Vec<String>,

    /// Reissuance rates by term in years
    #[serde(default)]
    pub initial_yields: RateSchedule,

    /// `term_years,rate` CSV replacing `initial_yields`
    #[serde(default)]
    pub initial_yields_path: Option<PathBuf>,

    /// Year-indexed rates for non-endogenous runs; a flat initial rate when absent
    #[serde(default)]
    pub yearly_rates: Option<YearlyRateTable>,

    /// `year,rate` CSV replacing `yearly_rates`
    #[serde(default)]
    pub yearly_rates_path: Option<PathBuf>,

    #[serde(default = "default_initial_gdp")]
    pub initial_gdp_millions: f64,

    #[serde(default = "default_initial_debt")]
    pub initial_debt_millions: f64,

    /// Percent
    #[serde(default = "default_initial_interest_rate")]
    pub initial_interest_rate: f64,

    /// Percent per year
    #[serde(default = "default_gdp_growth_rate")]
    pub gdp_growth_rate: f64,

    #[serde(default = "default_primary_deficit")]
    pub primary_deficit_pct_gdp: f64,

    #[serde(default = "default_laubach_ratio")]
    pub laubach_ratio: f64,

    /// `1.0` applies the relative ratio change as a fraction, `100.0` in percent
    #[serde(default = "default_ratio_change_scale")]
    pub ratio_change_scale: f64,

    #[serde(default = "default_one")]
    pub multiplier: f64,

    /// Charge interest on deficit-financed debt
    #[serde(default)]
    pub new_debt: bool,

    #[serde(default = "default_new_debt_strategy")]
    pub new_debt_strategy: NewDebtInterestStrategy,

    /// Endogenous rates instead of the year table
    #[serde(default)]
    pub laubach_rates: bool,

    #[serde(default)]
    pub rate_stamping: RateStamping,

    #[serde(default = "default_true")]
    pub prorate_first_year: bool,
}

fn default_raw_data_path() -> PathBuf { PathBuf::from("data/MSPD_MktSecty.csv") }
fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_reissue_end_date() -> NaiveDate { NaiveDate::from_ymd_opt(2050, 12, 31).unwrap_or(NaiveDate::MAX) }
fn default_security_types() -> Vec<String> {
    SecurityType::ALL.iter().map(|t| t.as_str().to_string()).collect()
}
fn default_initial_gdp() -> f64 { 27_360_000.0 }
fn default_initial_debt() -> f64 { 34_000_000.0 }
fn default_initial_interest_rate() -> f64 { 4.0 }
fn default_gdp_growth_rate() -> f64 { 4.0 }
fn default_primary_deficit() -> f64 { 3.0 }
fn default_laubach_ratio() -> f64 { 0.5 }
fn default_ratio_change_scale() -> f64 { UNSCALED }
fn default_one() -> f64 { 1.0 }
fn default_true() -> bool { true }
fn default_new_debt_strategy() -> NewDebtInterestStrategy { NewDebtInterestStrategy::Cumulative }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            raw_data_path: default_raw_data_path(),
            output_dir: default_output_dir(),
            reissue_end_date: default_reissue_end_date(),
            security_types: default_security_types(),
            initial_yields: RateSchedule::default(),
            initial_yields_path: None,
            yearly_rates: None,
            yearly_rates_path: None,
            initial_gdp_millions: default_initial_gdp(),
            initial_debt_millions: default_initial_debt(),
            initial_interest_rate: default_initial_interest_rate(),
            gdp_growth_rate: default_gdp_growth_rate(),
            primary_deficit_pct_gdp: default_primary_deficit(),
            laubach_ratio: default_laubach_ratio(),
            ratio_change_scale: default_ratio_change_scale(),
            multiplier: default_one(),
            new_debt: false,
            new_debt_strategy: default_new_debt_strategy(),
            laubach_rates: false,
            rate_stamping: RateStamping::default(),
            prorate_first_year: true,
        }
    }
}

impl SimulationConfig {
    /// Read a JSON config file; call `validate` after applying overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Replace inline rate tables with the CSV files named in the config
    pub fn load_rate_files(&mut self) -> Result<()> {
        if let Some(path) = &self.initial_yields_path {
            self.initial_yields = load_rate_schedule(path)?;
        }
        if let Some(path) = &self.yearly_rates_path {
            self.yearly_rates = Some(load_yearly_rates(path)?);
        }
        Ok(())
    }

    /// Every configuration error, raised before any data is read
    pub fn validate(&self) -> Result<()> {
        self.security_types()?;
        self.macro_assumptions().validate()?;
        EndogenousRateModel::new(self.laubach_ratio, self.ratio_change_scale).validate()?;
        if self.ratio_change_scale != UNSCALED && self.ratio_change_scale != PERCENT_SCALED {
            return Err(DebtSimError::config(format!(
                "ratio_change_scale must be {} (unscaled) or {} (percent), got {}",
                UNSCALED, PERCENT_SCALED, self.ratio_change_scale
            )));
        }

        if !(self.multiplier.is_finite() && self.multiplier >= 0.0) {
            return Err(DebtSimError::config(format!(
                "multiplier must be a non-negative number, got {}",
                self.multiplier
            )));
        }
        if !self.laubach_rates {
            if let Some(table) = &self.yearly_rates {
                // Missing years are caught once the cutoff is known
                table.rate_for_year(self.reissue_end_date.year())?;
            }
        }
        Ok(())
    }

    pub fn security_types(&self) -> Result<Vec<SecurityType>> {
        parse_security_types(&self.security_types)
    }

    pub fn macro_assumptions(&self) -> MacroAssumptions {
        MacroAssumptions {
            initial_gdp: self.initial_gdp_millions,
            initial_debt: self.initial_debt_millions,
            initial_interest_rate: self.initial_interest_rate,
            gdp_growth_rate: self.gdp_growth_rate,
            primary_deficit_pct_gdp: self.primary_deficit_pct_gdp,
        }
    }

    /// Endogenous model, the configured year table, or the initial rate held flat
    pub fn rate_model(&self) -> RateModel {
        if self.laubach_rates {
            RateModel::Endogenous(EndogenousRateModel::new(self.laubach_ratio, self.ratio_change_scale))
        } else {
            RateModel::Scheduled(
                self.yearly_rates
                    .clone()
                    .unwrap_or_else(|| YearlyRateTable::flat(self.initial_interest_rate)),
            )
        }
    }

    pub fn macro_config(&self) -> MacroConfig {
        MacroConfig {
            horizon: self.reissue_end_date,
            rate_model: self.rate_model(),
            new_debt: self.new_debt.then_some(self.new_debt_strategy),
            multiplier: self.multiplier,
            rate_stamping: self.rate_stamping,
            prorate_first_year: self.prorate_first_year,
        }
    }

    /// Output file name stem describing the run
    pub fn run_label(&self) -> String {
        let mut label = format!(
            "debt{}-gdp{}-int{}",
            self.initial_debt_millions, self.initial_gdp_millions, self.initial_interest_rate
        );
        if self.new_debt {
            label.push_str("-newdebt-");
            label.push_str(self.new_debt_strategy.as_str());
        }
        if self.laubach_rates {
            label.push_str("-laubach");
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = SimulationConfig::from_json("{}").unwrap();
        assert_eq!(config.security_types.len(), 3);
        assert_eq!(config.multiplier, 1.0);
        assert_eq!(config.ratio_change_scale, UNSCALED);
        assert!(config.prorate_first_year);
        assert!(!config.new_debt);
        assert_eq!(config.rate_stamping, RateStamping::All);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "reissue_end_date": "2040-12-31",
            "security_types": ["Notes", "Bonds"],
            "initial_yields": {"1": 4.5, "10": 4.2, "30": 4.4},
            "initial_gdp_millions": 28000000,
            "laubach_rates": true,
            "laubach_ratio": 0.3,
            "new_debt": true,
            "new_debt_strategy": "average_balance",
            "rate_stamping": "reissued_only"
        }"#;
        let config = SimulationConfig::from_json(json).unwrap();
        config.validate().unwrap();

        assert_eq!(config.security_types().unwrap(), vec![SecurityType::Note, SecurityType::Bond]);
        assert_eq!(config.initial_yields.rate_for_term(9.0).unwrap(), 4.2);

        let macro_config = config.macro_config();
        assert_eq!(macro_config.horizon, NaiveDate::from_ymd_opt(2040, 12, 31).unwrap());
        assert_eq!(macro_config.new_debt, Some(NewDebtInterestStrategy::AverageBalance));
        assert_eq!(macro_config.rate_stamping, RateStamping::ReissuedOnly);
        assert_eq!(
            macro_config.rate_model,
            RateModel::Endogenous(EndogenousRateModel::new(0.3, UNSCALED))
        );
        assert_eq!(config.macro_assumptions().initial_gdp, 28_000_000.0);
    }

    #[test]
    fn test_flat_initial_rate_without_table() {
        let config = SimulationConfig {
            initial_interest_rate: 3.25,
            ..Default::default()
        };
        match config.rate_model() {
            RateModel::Scheduled(table) => assert_eq!(table.rate_for_year(2031).unwrap(), 3.25),
            other => panic!("expected a scheduled model, got {:?}", other),
        }
        assert_eq!(config.macro_config().new_debt, None);
    }

    #[test]
    fn test_invalid_security_type_rejected() {
        let config = SimulationConfig {
            security_types: vec!["Floating Rate Notes".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DebtSimError::Configuration(_))));
    }

    #[test]
    fn test_year_table_without_fallback_rejected() {
        let json = r#"{"reissue_end_date": "2030-12-31", "yearly_rates": {"2024": 4.0}}"#;
        let config = SimulationConfig::from_json(json).unwrap();
        assert!(matches!(config.validate(), Err(DebtSimError::Configuration(_))));
    }

    #[test]
    fn test_ratio_change_scale_must_be_named_convention() {
        let percent = SimulationConfig {
            ratio_change_scale: PERCENT_SCALED,
            ..SimulationConfig::default()
        };
        assert!(percent.validate().is_ok());

        let odd = SimulationConfig {
            ratio_change_scale: 10.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(odd.validate(), Err(DebtSimError::Configuration(_))));
    }

    #[test]
    fn test_rejects_zero_gdp() {
        let config = SimulationConfig {
            initial_gdp_millions: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rate_files_replace_inline_tables() {
        let dir = std::env::temp_dir().join(format!("debt_burden_config_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let yields = dir.join("yields.csv");
        let yearly = dir.join("yearly.csv");
        fs::write(&yields, "term_years,rate\n1,4.8\n10,4.1\n").unwrap();
        fs::write(&yearly, "year,rate\n2025,4.4\n9999,3.9\n").unwrap();

        let mut config = SimulationConfig {
            initial_yields_path: Some(yields),
            yearly_rates_path: Some(yearly),
            ..Default::default()
        };
        config.load_rate_files().unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(config.initial_yields.rate_for_term(2.0).unwrap(), 4.8);
        let table = config.yearly_rates.as_ref().unwrap();
        assert_eq!(table.rate_for_year(2025).unwrap(), 4.4);
        assert_eq!(table.rate_for_year(2040).unwrap(), 3.9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_run_label() {
        let config = SimulationConfig {
            new_debt: true,
            laubach_rates: true,
            ..Default::default()
        };
        let label = config.run_label();
        assert!(label.contains("-newdebt-cumulative"));
        assert!(label.ends_with("-laubach"));
    }
}
