// Builds AutoScout24 search deep links from a specification form.
//
// The marketplace encodes most filters as single-letter or numeric query
// parameters; the lookup tables below mirror its current URL scheme.
use crate::form::{SpecForm, classify_emission};

const BASE_URL: &str = "https://www.autoscout24.com/lst";

/// Path and filter values must not carry raw spaces or slashes.
pub fn safe_value(value: &str) -> String {
    value.replace(' ', "-").replace('/', "%2F")
}

fn body_type_param(value: &str) -> Option<&'static str> {
    match value {
        "compact" => Some("1"),
        "convertible" => Some("2"),
        "coupe" => Some("3"),
        "offroad-truck" => Some("4"),
        "station-wagon" => Some("5"),
        "sedans" => Some("6"),
        "van" => Some("12"),
        "transporters" => Some("13"),
        "other" => Some("7"),
        _ => None,
    }
}

fn fuel_type_param(value: &str) -> Option<&'static str> {
    match value {
        "gazoline" => Some("B"),
        "diesel" => Some("D"),
        "electric" => Some("E"),
        "ethanol" => Some("M"),
        "hydrogen" => Some("H"),
        "lpg" => Some("L"),
        "cng" => Some("C"),
        "electric/gasoline" => Some("2"),
        "electric/diesel" => Some("3"),
        "other" => Some("O"),
        _ => None,
    }
}

fn gearbox_param(value: &str) -> Option<&'static str> {
    match value {
        "automatic" => Some("A"),
        "manual" => Some("M"),
        "semi-automatic" => Some("S"),
        _ => None,
    }
}

fn seller_param(value: &str) -> Option<&'static str> {
    match value {
        "dealer" => Some("D"),
        "private seller" => Some("P"),
        _ => None,
    }
}

fn emission_class_param(value: &str) -> Option<&'static str> {
    match value {
        "Euro 1" => Some("1"),
        "Euro 2" => Some("2"),
        "Euro 3" => Some("3"),
        "Euro 4" => Some("4"),
        "Euro 5" => Some("5"),
        "Euro 6" => Some("6"),
        "Euro 6b" => Some("11"),
        "Euro 6c" => Some("7"),
        "Euro 6d" => Some("8"),
        "Euro 6d-temp" => Some("9"),
        "Euro 6e" => Some("10"),
        _ => None,
    }
}

/// Builds the marketplace filter set in its canonical parameter order.
/// Entries whose source value is absent or has no marketplace code are
/// omitted entirely.
pub fn build_filters(form: &SpecForm) -> Vec<(&'static str, String)> {
    let mut filters = Vec::new();

    if let Some(code) = form.body_type.as_deref().and_then(body_type_param) {
        filters.push(("body", code.to_string()));
    }
    if let Some(code) = form.fuel_type.as_deref().and_then(fuel_type_param) {
        filters.push(("fuel", code.to_string()));
    }
    if let Some(code) = form.gearbox.as_deref().and_then(gearbox_param) {
        filters.push(("gear", code.to_string()));
    }
    if let Some(code) = form.seller.as_deref().and_then(seller_param) {
        filters.push(("custtype", code.to_string()));
    }
    if let Some(code) = form
        .emission_class
        .and_then(classify_emission)
        .and_then(emission_class_param)
    {
        filters.push(("emclass", code.to_string()));
    }
    if let Some(mileage) = form.mileage {
        filters.push(("kmfrom", mileage.to_string()));
        filters.push(("kmto", mileage.to_string()));
    }
    if let Some(power) = form.power {
        filters.push(("powerfrom", power.to_string()));
    }
    filters.push(("powertype", "kw".to_string()));
    let (door_from, door_to) = form.door_range();
    filters.push(("doorfrom", door_from.to_string()));
    filters.push(("doorto", door_to.to_string()));
    if let Some(seats) = form.seats {
        filters.push(("seatsfrom", seats.to_string()));
    }
    if let Some(year) = form.year {
        filters.push(("fregfrom", year.to_string()));
        filters.push(("fregto", year.to_string()));
    }
    if let Some(country) = &form.country {
        filters.push(("cy", country.clone()));
    }

    filters
}

/// Assembles the brand/model/condition deep link plus query string. The
/// result never ends in a separator and never carries raw spaces or
/// unescaped slashes in its path segments.
pub fn search_url(
    brand: &str,
    model: &str,
    condition: &str,
    filters: &[(&'static str, String)],
) -> String {
    let mut url = format!(
        "{BASE_URL}/{}/{}/ot_{}",
        safe_value(brand),
        safe_value(model),
        safe_value(condition)
    );

    url.push('?');
    for (key, value) in filters {
        url.push_str(key);
        url.push('=');
        url.push_str(&safe_value(value));
        url.push('&');
    }

    url.trim_end_matches('&').trim_end_matches('?').to_string()
}
