use crate::model::{CarRecord, StoreError};

use csv::Writer;
use std::fs::{self, File};
use std::path::Path;

/// Scraped records are persisted as a flat CSV; the header row comes from
/// the record's field names on the first write.
pub struct CsvStore {
    writer: Writer<File>,
}

impl CsvStore {
    pub fn create(path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            writer: Writer::from_path(path)?,
        })
    }

    pub fn append(&mut self, record: &CarRecord) -> Result<(), StoreError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UNKNOWN;

    fn sample_record() -> CarRecord {
        CarRecord {
            url: "https://www.autoscout24.com/offers/abc".to_string(),
            brand: "BMW".to_string(),
            model: "320d".to_string(),
            price: "€ 15,990".to_string(),
            first_registration: "03/2018".to_string(),
            mileage: "125,000 km".to_string(),
            fuel_type: "Diesel".to_string(),
            color: "Black".to_string(),
            gearbox: "Automatic".to_string(),
            power: "140 kW (190 hp)".to_string(),
            engine_size: "1,995 cc".to_string(),
            seller: "Dealer".to_string(),
            location: "Berlin, Germany".to_string(),
            body_type: "Sedans".to_string(),
            doors: "4".to_string(),
            seats: "5".to_string(),
            drivetrain: "4WD".to_string(),
            co2_emission: "119 g/km".to_string(),
            emission_class: "Euro 6".to_string(),
            condition: "Used".to_string(),
            upholstery: UNKNOWN.to_string(),
            upholstery_color: UNKNOWN.to_string(),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.csv");
        let path = path.to_str().unwrap();

        let mut store = CsvStore::create(path).unwrap();
        store.append(&sample_record()).unwrap();
        store.append(&sample_record()).unwrap();
        store.flush().unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("url,brand,model,price,first_registration,mileage"));
        assert_eq!(lines.count(), 2);
        assert!(content.contains("unknown"));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/cars.csv");

        let mut store = CsvStore::create(path.to_str().unwrap()).unwrap();
        store.append(&sample_record()).unwrap();
        store.flush().unwrap();

        assert!(path.exists());
    }
}
