//! Assembly of parsed record buffers into [`NavData`] stores.

use log::warn;
use std::collections::HashMap;

use crate::codec::Codec;
use crate::error::Result;
use crate::models::{RawValue, Record};
use crate::navdata::NavData;
use crate::tabular::ColumnMap;

/// Clock fields shared by the Accel, Gyro and Mag records. The IMU store keeps Accel's.
pub const TIMESTAMP_FIELDS: [&str; 2] = ["utcTimeMillis", "elapsedRealtimeNanos"];

impl NavData {
    /// Build a store with one row per distinct field name and one column per record.
    ///
    /// Fields are ordered by first occurrence. A field holding any text cell becomes
    /// categorical and all of its cells are encoded as text; missing or empty cells are `NaN`
    /// in numeric fields and the empty string in categorical ones.
    pub fn from_records(records: &[Record]) -> Result<Self> {
        let mut names: Vec<&str> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for record in records {
            for field in record.fields() {
                if !index.contains_key(field.as_str()) {
                    index.insert(field.as_str(), names.len());
                    names.push(field.as_str());
                }
            }
        }

        let mut cells: Vec<Vec<Option<&RawValue>>> = vec![vec![None; records.len()]; names.len()];
        let mut categorical = vec![false; names.len()];
        for (col, record) in records.iter().enumerate() {
            for (name, value) in record.iter() {
                let row = index[name];
                cells[row][col] = Some(value);
                categorical[row] |= value.is_text();
            }
        }

        let mut nav = NavData::new();
        for ((name, row), is_text) in names.into_iter().zip(cells).zip(categorical) {
            if is_text {
                let mut codec = Codec::new();
                let codes = row
                    .iter()
                    .map(|cell| {
                        let text = cell.map(RawValue::to_text).unwrap_or_default();
                        codec.encode(&text) as f64
                    })
                    .collect();
                nav.insert_row(name, codes, Some(codec))?;
            } else {
                let values = row
                    .iter()
                    .map(|cell| cell.map_or(f64::NAN, RawValue::as_f64))
                    .collect();
                nav.insert_row(name, values, None)?;
            }
        }
        Ok(nav)
    }
}

/// Build a store from records and normalize its field names.
pub fn build_renamed(records: &[Record], map: &ColumnMap) -> Result<NavData> {
    let mut nav = NavData::from_records(records)?;
    nav.rename(map.renames())?;
    Ok(nav)
}

/// Merge Accel, Gyro and Mag records into one IMU store on Accel's clock.
///
/// Gyro and Mag records are matched to Accel records by position, not by timestamp: record
/// `i` of each buffer is assumed to be sampled together with Accel record `i`. Shorter buffers
/// are padded with `NaN` (empty text for categorical fields) and longer ones truncated.
pub fn build_imu(
    accel: &[Record],
    gyro: &[Record],
    mag: &[Record],
    map: &ColumnMap,
) -> Result<NavData> {
    let mut imu = NavData::from_records(accel)?;

    for (label, records) in [("Gyro", gyro), ("Mag", mag)] {
        if records.is_empty() {
            continue;
        }
        if records.len() != accel.len() {
            warn!(
                "{} has {} records but Accel has {}; merging by position",
                label,
                records.len(),
                accel.len()
            );
        }
        let part = NavData::from_records(records)?;
        merge_by_position(&mut imu, &part)?;
    }

    imu.rename(map.renames())?;
    Ok(imu)
}

fn merge_by_position(target: &mut NavData, part: &NavData) -> Result<()> {
    let len = target.len();
    let shared = len.min(part.len());

    for field in part.fields() {
        if TIMESTAMP_FIELDS.contains(&field.as_str()) {
            continue;
        }
        if target.contains(field) {
            warn!("IMU field '{}' already present, keeping the first one", field);
            continue;
        }
        if part.is_categorical(field) {
            let mut text = part.decode(field, 0..shared)?;
            text.resize(len, String::new());
            target.set(field.as_str(), text)?;
        } else {
            let mut values = part.row(field)?[..shared].to_vec();
            values.resize(len, f64::NAN);
            target.set(field.as_str(), values)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn records(fields: &[&str], rows: &[&[&str]]) -> Vec<Record> {
        let schema: Arc<[String]> = fields.iter().map(|f| f.to_string()).collect();
        rows.iter()
            .map(|row| {
                let values = row.iter().map(|v| RawValue::parse(v)).collect();
                Record::new(Arc::clone(&schema), values).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_mixed_field_becomes_categorical() {
        let recs = records(
            &["Provider", "Accuracy"],
            &[&["gps", "3.5"], &["", "4"], &["fused", ""]],
        );
        let nav = NavData::from_records(&recs).unwrap();

        assert_eq!(nav.fields(), &["Provider", "Accuracy"]);
        assert_eq!(nav.decode("Provider", ..).unwrap(), vec!["gps", "", "fused"]);
        let accuracy = nav.row("Accuracy").unwrap();
        assert_eq!(&accuracy[..2], &[3.5, 4.0]);
        assert!(accuracy[2].is_nan());
    }

    #[test]
    fn test_schema_change_fills_missing_cells() {
        let mut recs = records(&["a", "b"], &[&["1", "2"]]);
        recs.extend(records(&["a", "c"], &[&["3", "x"]]));
        let nav = NavData::from_records(&recs).unwrap();

        assert_eq!(nav.fields(), &["a", "b", "c"]);
        assert_eq!(nav.row("a").unwrap(), &[1.0, 3.0]);
        assert!(nav.row("b").unwrap()[1].is_nan());
        assert_eq!(nav.decode("c", ..).unwrap(), vec!["", "x"]);
    }

    #[test]
    fn test_imu_merge_by_position() {
        let accel = records(
            &["utcTimeMillis", "elapsedRealtimeNanos", "AccelXMps2"],
            &[&["100", "1", "0.1"], &["110", "2", "0.2"], &["120", "3", "0.3"]],
        );
        let gyro = records(
            &["utcTimeMillis", "elapsedRealtimeNanos", "GyroXRadPerSec"],
            &[&["101", "9", "1.0"], &["111", "9", "2.0"]],
        );
        let map = ColumnMap::new().rename("AccelXMps2", "acc_x_mps2");

        let imu = build_imu(&accel, &gyro, &[], &map).unwrap();

        assert_eq!(imu.len(), 3);
        assert_eq!(
            imu.fields(),
            &["utcTimeMillis", "elapsedRealtimeNanos", "acc_x_mps2", "GyroXRadPerSec"]
        );
        assert_eq!(imu.row("utcTimeMillis").unwrap(), &[100.0, 110.0, 120.0]);
        let gyro_x = imu.row("GyroXRadPerSec").unwrap();
        assert_eq!(&gyro_x[..2], &[1.0, 2.0]);
        assert!(gyro_x[2].is_nan());
    }

    #[test]
    fn test_imu_merge_truncates_longer_buffers() {
        let accel = records(
            &["utcTimeMillis", "elapsedRealtimeNanos", "AccelXMps2"],
            &[&["100", "1", "0.1"], &["110", "2", "0.2"]],
        );
        let gyro = records(
            &["utcTimeMillis", "elapsedRealtimeNanos", "GyroXRadPerSec"],
            &[&["101", "9", "1.0"], &["111", "9", "2.0"], &["121", "9", "3.0"], &["131", "9", "4.0"]],
        );
        let mag = records(
            &["utcTimeMillis", "elapsedRealtimeNanos", "MagXMicroT", "MagAccuracy"],
            &[&["102", "9", "-21.5", "HIGH"], &["112", "9", "-21.0", "LOW"], &["122", "9", "-20.5", "LOW"]],
        );

        let imu = build_imu(&accel, &gyro, &mag, &ColumnMap::new()).unwrap();

        assert_eq!(imu.len(), accel.len());
        assert_eq!(imu.row("GyroXRadPerSec").unwrap(), &[1.0, 2.0]);
        assert_eq!(imu.row("MagXMicroT").unwrap(), &[-21.5, -21.0]);
        assert!(imu.is_categorical("MagAccuracy"));
        assert_eq!(imu.decode("MagAccuracy", ..).unwrap(), vec!["HIGH", "LOW"]);
        assert_eq!(imu.row("utcTimeMillis").unwrap(), &[100.0, 110.0]);
    }
}
