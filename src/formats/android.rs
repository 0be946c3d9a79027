//! Android GNSS adapters: rename tables and the derived-measurement loader.

use log::debug;
use std::path::Path;

use crate::error::Result;
use crate::navdata::NavData;
use crate::tabular::ColumnMap;

/// Internal-only row added to derived stores: the corrected pseudorange.
pub const CORRECTED_PSEUDORANGE: &str = "corr_pr_m";

/// Columns of the derived CSV export and their internal names.
pub fn derived_column_map() -> ColumnMap {
    ColumnMap::new()
        .rename("collectionName", "trace_name")
        .rename("phoneName", "rx_name")
        .rename("constellationType", "gnss_id")
        .rename("svid", "sv_id")
        .rename("signalType", "signal_type")
        .rename("xSatPosM", "x_sat_m")
        .rename("ySatPosM", "y_sat_m")
        .rename("zSatPosM", "z_sat_m")
        .rename("xSatVelMps", "vx_sat_mps")
        .rename("ySatVelMps", "vy_sat_mps")
        .rename("zSatVelMps", "vz_sat_mps")
        .rename("satClkBiasM", "b_sat_m")
        .rename("satClkDriftMps", "b_dot_sat_mps")
        .rename("rawPrM", "raw_pr_m")
        .rename("rawPrUncM", "raw_pr_sigma_m")
        .rename("isrbM", "intersignal_bias_m")
        .rename("ionoDelayM", "iono_delay_m")
        .rename("tropoDelayM", "tropo_delay_m")
        .categorical("collectionName")
        .categorical("phoneName")
        .categorical("signalType")
}

/// `Raw` log fields renamed so raw and derived stores share a vocabulary.
pub fn raw_gnss_column_map() -> ColumnMap {
    ColumnMap::new()
        .rename("Svid", "sv_id")
        .rename("ConstellationType", "gnss_id")
        .rename("Cn0DbHz", "cn0_dbhz")
}

/// Accelerometer, gyroscope and magnetometer fields.
pub fn imu_column_map() -> ColumnMap {
    ColumnMap::new()
        .rename("AccelXMps2", "acc_x_mps2")
        .rename("AccelYMps2", "acc_y_mps2")
        .rename("AccelZMps2", "acc_z_mps2")
        .rename("GyroXRadPerSec", "ang_vel_x_radps")
        .rename("GyroYRadPerSec", "ang_vel_y_radps")
        .rename("GyroZRadPerSec", "ang_vel_z_radps")
        .rename("MagXMicroT", "mag_x_microt")
        .rename("MagYMicroT", "mag_y_microt")
        .rename("MagZMicroT", "mag_z_microt")
}

/// Load a derived measurement CSV and add the corrected pseudorange row.
pub fn read_derived<P: AsRef<Path>>(path: P) -> Result<NavData> {
    let mut nav = NavData::from_csv(path, &derived_column_map())?;
    add_corrected_pseudorange(&mut nav)?;
    Ok(nav)
}

/// Add [`CORRECTED_PSEUDORANGE`]:
/// `raw_pr_m + b_sat_m - intersignal_bias_m - tropo_delay_m - iono_delay_m`.
///
/// Returns `false` and leaves the store untouched when an input row is missing.
pub fn add_corrected_pseudorange(nav: &mut NavData) -> Result<bool> {
    const INPUTS: [&str; 5] = [
        "raw_pr_m",
        "b_sat_m",
        "intersignal_bias_m",
        "tropo_delay_m",
        "iono_delay_m",
    ];
    if let Some(missing) = INPUTS.iter().find(|f| !nav.contains(f)) {
        debug!("Not adding {}: '{}' is missing", CORRECTED_PSEUDORANGE, missing);
        return Ok(false);
    }

    let rows = nav.get(INPUTS.to_vec(), ..)?;
    let corrected: Vec<f64> = (0..nav.len())
        .map(|i| {
            let col = |r: usize| rows.row(r)[i];
            col(0) + col(1) - col(2) - col(3) - col(4)
        })
        .collect();
    nav.set(CORRECTED_PSEUDORANGE, corrected)?;
    Ok(true)
}
