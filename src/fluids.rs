//! Heat transfer fluid specific-heat models.
//!
//! Only the properties the heat sink needs are modeled: specific heat as a
//! function of temperature, and its mean over a temperature span.

use serde::Deserialize;

use crate::error::{SimError, SimResult};

/// Library fluid code for the 60/40 nitrate solar salt.
pub const SOLAR_SALT: u32 = 17;
/// Library fluid code for user-defined property tables.
pub const USER_DEFINED: u32 = 50;

const USER_TABLE_MIN_ROWS: usize = 3;
const USER_TABLE_COLS: usize = 7;
/// Column holding temperature [C] in a user table.
const COL_TEMP: usize = 0;
/// Column holding specific heat [kJ/kg-K] in a user table.
const COL_CP: usize = 1;

/// Fluid selection as given in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FluidSpec {
    /// One of the built-in library fluids, by numeric code.
    Library(u32),
    /// Rows of `[T C, cp kJ/kg-K, density, viscosity, kinematic viscosity, conductivity, enthalpy]`.
    UserTable(Vec<Vec<f64>>),
}

impl Default for FluidSpec {
    fn default() -> Self {
        Self::Library(SOLAR_SALT)
    }
}

/// Built-in fluids with closed-form specific heat correlations (T in C, cp in kJ/kg-K).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryFluid {
    /// Liquid water, near-constant cp.
    Water,
    /// 60% NaNO3 / 40% KNO3.
    SolarSalt,
    /// Commercial nitrate salt, same correlation as solar salt.
    NitrateSalt,
    /// Therminol VP-1 synthetic oil.
    TherminolVp1,
    /// Hitec ternary salt.
    Hitec,
}

impl LibraryFluid {
    /// Resolves a library code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            3 => Some(Self::Water),
            SOLAR_SALT => Some(Self::SolarSalt),
            18 => Some(Self::NitrateSalt),
            21 => Some(Self::TherminolVp1),
            22 => Some(Self::Hitec),
            _ => None,
        }
    }

    fn cp(self, t_c: f64) -> f64 {
        match self {
            Self::Water => 4.181,
            Self::SolarSalt | Self::NitrateSalt => (1443.0 + 0.172 * t_c) / 1000.0,
            Self::TherminolVp1 => 1.509 + 0.002496 * t_c + 7.888e-7 * t_c * t_c,
            Self::Hitec => 1.56,
        }
    }
}

/// Linear interpolation table of temperature vs specific heat.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFluid {
    temps_c: Vec<f64>,
    cps: Vec<f64>,
}

impl UserFluid {
    /// Builds a user fluid from a 7-column property table.
    ///
    /// # Errors
    ///
    /// * [`SimError::TableShape`] unless the table has at least 3 rows and
    ///   every row has exactly 7 columns.
    /// * [`SimError::Config`] if temperatures are not strictly increasing or
    ///   a specific heat is not positive.
    pub fn from_table(table: &[Vec<f64>]) -> SimResult<Self> {
        let rows = table.len();
        let cols = table.first().map_or(0, Vec::len);
        if rows < USER_TABLE_MIN_ROWS || table.iter().any(|r| r.len() != USER_TABLE_COLS) {
            return Err(SimError::TableShape { rows, cols });
        }

        let temps_c: Vec<f64> = table.iter().map(|r| r[COL_TEMP]).collect();
        let cps: Vec<f64> = table.iter().map(|r| r[COL_CP]).collect();

        if temps_c.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::config(
                "fluid_table",
                "must list strictly increasing temperatures",
            ));
        }
        if cps.iter().any(|&cp| !(cp.is_finite() && cp > 0.0)) {
            return Err(SimError::config(
                "fluid_table",
                "must have positive specific heats",
            ));
        }

        Ok(Self { temps_c, cps })
    }

    /// Specific heat at `t_c`, clamped to the table's end values outside its range.
    /// A NaN temperature takes the first row.
    fn cp(&self, t_c: f64) -> f64 {
        let n = self.temps_c.len();
        if t_c.is_nan() || t_c <= self.temps_c[0] {
            return self.cps[0];
        }
        if t_c >= self.temps_c[n - 1] {
            return self.cps[n - 1];
        }
        let upper = self.temps_c.partition_point(|&t| t <= t_c);
        let (t0, t1) = (self.temps_c[upper - 1], self.temps_c[upper]);
        let (c0, c1) = (self.cps[upper - 1], self.cps[upper]);
        c0 + (c1 - c0) * (t_c - t0) / (t1 - t0)
    }
}

/// A resolved heat transfer fluid.
#[derive(Debug, Clone, PartialEq)]
pub enum HtfProperties {
    Library(LibraryFluid),
    User(UserFluid),
}

impl HtfProperties {
    /// Resolves a fluid selection.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] for an unknown library code (including the bare
    /// user-defined code without a table), or any error from
    /// [`UserFluid::from_table`].
    pub fn from_spec(spec: &FluidSpec) -> SimResult<Self> {
        match spec {
            FluidSpec::Library(code) => LibraryFluid::from_code(*code)
                .map(Self::Library)
                .ok_or_else(|| {
                    SimError::config("fluid", format!("code {code} is not a recognized HTF"))
                }),
            FluidSpec::UserTable(table) => UserFluid::from_table(table).map(Self::User),
        }
    }

    /// Specific heat [kJ/kg-K] at `t_c`.
    pub fn cp(&self, t_c: f64) -> f64 {
        match self {
            Self::Library(fluid) => fluid.cp(t_c),
            Self::User(table) => table.cp(t_c),
        }
    }

    /// Mean specific heat [kJ/kg-K] over `n_points` evenly spaced samples in
    /// `[t_cold_c, t_hot_c]`.
    pub fn cp_ave(&self, t_cold_c: f64, t_hot_c: f64, n_points: usize) -> f64 {
        if n_points < 2 {
            return self.cp(0.5 * (t_cold_c + t_hot_c));
        }
        let step = (t_hot_c - t_cold_c) / (n_points - 1) as f64;
        let sum: f64 = (0..n_points)
            .map(|i| self.cp(t_cold_c + step * i as f64))
            .sum();
        sum / n_points as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn table(rows: usize, cols: usize) -> Vec<Vec<f64>> {
        (0..rows)
            .map(|i| {
                let mut row = vec![0.0; cols];
                if cols > 1 {
                    row[0] = 100.0 * i as f64;
                    row[1] = 1.0 + i as f64;
                }
                row
            })
            .collect()
    }

    #[test]
    fn solar_salt_is_default_and_linear() {
        let salt = HtfProperties::from_spec(&FluidSpec::default()).unwrap();
        assert!((salt.cp(0.0) - 1.443).abs() < 1e-12);
        assert!((salt.cp(500.0) - 1.529).abs() < 1e-12);
        // mean of a linear cp equals cp at the midpoint
        assert!((salt.cp_ave(250.0, 300.0, 5) - salt.cp(275.0)).abs() < 1e-12);
    }

    #[test]
    fn unknown_library_code_is_config_error() {
        let err = HtfProperties::from_spec(&FluidSpec::Library(USER_DEFINED)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("fluid"));
    }

    #[test]
    fn user_table_needs_three_rows_and_seven_columns() {
        let err = UserFluid::from_table(&table(2, 7)).unwrap_err();
        assert_eq!(err, SimError::TableShape { rows: 2, cols: 7 });

        let err = UserFluid::from_table(&table(4, 6)).unwrap_err();
        assert_eq!(err, SimError::TableShape { rows: 4, cols: 6 });

        assert!(UserFluid::from_table(&table(3, 7)).is_ok());
    }

    #[test]
    fn user_table_interpolates_and_clamps() {
        let fluid = HtfProperties::from_spec(&FluidSpec::UserTable(table(3, 7))).unwrap();
        assert!((fluid.cp(50.0) - 1.5).abs() < 1e-12);
        assert!((fluid.cp(150.0) - 2.5).abs() < 1e-12);
        assert!((fluid.cp(-20.0) - 1.0).abs() < 1e-12);
        assert!((fluid.cp(900.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn user_table_nan_temperature_takes_first_row() {
        let fluid = HtfProperties::from_spec(&FluidSpec::UserTable(table(3, 7))).unwrap();
        assert_eq!(fluid.cp(f64::NAN), 1.0);
        assert!(fluid.cp_ave(0.0, f64::NAN, 5).is_finite());
        assert_eq!(fluid.cp(f64::INFINITY), 3.0);
        assert_eq!(fluid.cp(f64::NEG_INFINITY), 1.0);
    }

    #[test]
    fn user_table_rejects_unsorted_temperatures() {
        let mut t = table(3, 7);
        t.swap(0, 2);
        let err = UserFluid::from_table(&t).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
