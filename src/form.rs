// The specification form a caller fills in to request a price quote.
//
// This is the input side of the old dashboards reduced to its logic:
// required-field validation, CO2-to-Euro-class banding and the door-range
// bucketing the marketplace filters expect.
use crate::model::FormError;

use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecForm {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
    pub gearbox: Option<String>,
    pub color: Option<String>,
    pub seller: Option<String>,
    pub body_type: Option<String>,
    pub drivetrain: Option<String>,
    pub country: Option<String>,
    pub condition: Option<String>,
    pub upholstery_color: Option<String>,
    pub mileage: Option<u32>,
    pub power: Option<u32>,
    pub engine_size: Option<f64>,
    pub doors: Option<u8>,
    pub seats: Option<u8>,
    pub emission_class: Option<u32>,
    pub year: Option<i32>,
}

impl SpecForm {
    /// All categorical selections are required; the error names every
    /// missing one so it can be surfaced to the user verbatim.
    pub fn validate(&self) -> Result<(), FormError> {
        let required: [(&str, &Option<String>); 11] = [
            ("brand", &self.brand),
            ("model", &self.model),
            ("fuel_type", &self.fuel_type),
            ("gearbox", &self.gearbox),
            ("color", &self.color),
            ("seller", &self.seller),
            ("body_type", &self.body_type),
            ("drivetrain", &self.drivetrain),
            ("country", &self.country),
            ("condition", &self.condition),
            ("upholstery_color", &self.upholstery_color),
        ];

        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        if let Some(year) = self.year {
            if year > Utc::now().year() {
                return Err(FormError::FutureYear(year));
            }
        }

        Ok(())
    }

    /// Flat record for the prediction endpoint; categorical fields as
    /// strings, numeric fields with zero defaults matching the trained
    /// feature schema.
    pub fn input_data(&self) -> Map<String, Value> {
        let mut data = Map::new();

        let categorical: [(&str, &Option<String>); 11] = [
            ("brand", &self.brand),
            ("model", &self.model),
            ("fuel_type", &self.fuel_type),
            ("gearbox", &self.gearbox),
            ("color", &self.color),
            ("seller", &self.seller),
            ("body_type", &self.body_type),
            ("drivetrain", &self.drivetrain),
            ("country", &self.country),
            ("condition", &self.condition),
            ("upholstery_color", &self.upholstery_color),
        ];
        for (name, value) in categorical {
            if let Some(value) = value {
                data.insert(name.to_string(), Value::String(value.clone()));
            }
        }

        data.insert("mileage".to_string(), json!(self.mileage.unwrap_or(0)));
        data.insert("power".to_string(), json!(self.power.unwrap_or(0)));
        data.insert(
            "engine_size".to_string(),
            json!(self.engine_size.unwrap_or(0.0)),
        );
        data.insert("doors".to_string(), json!(self.doors.unwrap_or(0)));
        data.insert("seats".to_string(), json!(self.seats.unwrap_or(0)));
        data.insert(
            "emission_class".to_string(),
            json!(self.emission_class.unwrap_or(0)),
        );
        data.insert(
            "year".to_string(),
            json!(self.year.unwrap_or_else(|| Utc::now().year())),
        );

        data
    }

    /// Marketplace door filters work on ranges, not exact counts.
    pub fn door_range(&self) -> (u8, u8) {
        match self.doors {
            Some(2) | Some(3) => (2, 3),
            Some(4) | Some(5) => (4, 5),
            _ => (6, 7),
        }
    }
}

/// Maps a raw CO2 value (g/km) onto the Euro emission class bands; values
/// outside [0, 2370] have no class.
pub fn classify_emission(value: u32) -> Option<&'static str> {
    match value {
        0..=500 => Some("Euro 1"),
        501..=1000 => Some("Euro 2"),
        1001..=1500 => Some("Euro 3"),
        1501..=2000 => Some("Euro 4"),
        2001..=2250 => Some("Euro 5"),
        2251..=2370 => Some("Euro 6"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> SpecForm {
        SpecForm {
            brand: Some("BMW".to_string()),
            model: Some("320d".to_string()),
            fuel_type: Some("diesel".to_string()),
            gearbox: Some("automatic".to_string()),
            color: Some("Black".to_string()),
            seller: Some("dealer".to_string()),
            body_type: Some("sedans".to_string()),
            drivetrain: Some("4WD".to_string()),
            country: Some("D".to_string()),
            condition: Some("Used".to_string()),
            upholstery_color: Some("Black".to_string()),
            mileage: Some(125_000),
            power: Some(140),
            engine_size: Some(2.0),
            doors: Some(4),
            seats: Some(5),
            emission_class: Some(2300),
            year: Some(2018),
        }
    }

    #[test]
    fn complete_form_validates() {
        assert!(full_form().validate().is_ok());
    }

    #[test]
    fn validation_lists_every_missing_field() {
        let mut form = full_form();
        form.brand = None;
        form.gearbox = None;
        form.upholstery_color = None;

        let err = form.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "the following fields are required: brand, gearbox, upholstery_color"
        );
    }

    #[test]
    fn future_year_is_rejected() {
        let mut form = full_form();
        form.year = Some(Utc::now().year() + 1);

        assert!(matches!(
            form.validate(),
            Err(FormError::FutureYear(_))
        ));
    }

    #[test]
    fn input_data_carries_all_fields() {
        let data = full_form().input_data();

        assert_eq!(data["brand"], "BMW");
        assert_eq!(data["mileage"], 125_000);
        assert_eq!(data["engine_size"], 2.0);
        assert_eq!(data["year"], 2018);
    }

    #[test]
    fn input_data_defaults_absent_numerics_to_zero() {
        let form = SpecForm::default();
        let data = form.input_data();

        assert!(!data.contains_key("brand"));
        assert_eq!(data["mileage"], 0);
        assert_eq!(data["power"], 0);
        assert_eq!(data["year"], Utc::now().year());
    }

    #[test]
    fn door_counts_bucket_into_marketplace_ranges() {
        let mut form = full_form();
        for (doors, expected) in [
            (Some(2), (2, 3)),
            (Some(3), (2, 3)),
            (Some(4), (4, 5)),
            (Some(5), (4, 5)),
            (Some(6), (6, 7)),
            (None, (6, 7)),
        ] {
            form.doors = doors;
            assert_eq!(form.door_range(), expected);
        }
    }

    #[test]
    fn emission_bands_cover_the_euro_classes() {
        assert_eq!(classify_emission(0), Some("Euro 1"));
        assert_eq!(classify_emission(500), Some("Euro 1"));
        assert_eq!(classify_emission(501), Some("Euro 2"));
        assert_eq!(classify_emission(1500), Some("Euro 3"));
        assert_eq!(classify_emission(2000), Some("Euro 4"));
        assert_eq!(classify_emission(2250), Some("Euro 5"));
        assert_eq!(classify_emission(2370), Some("Euro 6"));
        assert_eq!(classify_emission(2371), None);
    }
}
