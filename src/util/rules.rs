//! Form field validation rules. `Err` carries the message shown under the field.

pub fn not_empty(value: Option<&str>) -> Result<(), &'static str> {
    match value {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err("Pole nesmí být prazdné"),
    }
}

pub fn is_number(value: f64) -> Result<(), &'static str> {
    if value.is_nan() {
        Err("Pole musí být číslo")
    } else {
        Ok(())
    }
}

pub fn at_least_one(value: f64) -> Result<(), &'static str> {
    if value > 0.0 {
        Ok(())
    } else {
        Err("Pole musí být číslo větší než 0")
    }
}

pub fn max_9999(value: f64) -> Result<(), &'static str> {
    if value < 9999.0 {
        Ok(())
    } else {
        Err("Pole nesmí být číslo větší než 9999")
    }
}

/// Parse an amount typed by the user, accepting a decimal comma
pub fn parse_amount(input: &str) -> Result<f64, &'static str> {
    let value = input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .unwrap_or(f64::NAN);
    is_number(value)?;
    Ok(value)
}
