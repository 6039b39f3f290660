//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use serde::Serialize;
use validator::ValidationError;

use crate::utils::errors::{invalid_input, AppResult};

/// Minutos en un día; los horarios se expresan como minuto del día
pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Validar y convertir string a fecha (YYYY-MM-DD)
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.len() < 2 || clean_plate.len() > 12 {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Tablas de una tarea o solicitud: siempre > 0
pub fn ensure_positive_boards(boards: i32) -> AppResult<()> {
    validate_positive(boards).map_err(|_| invalid_input("Boards must be > 0"))
}

/// Duración estimada en minutos: siempre > 0
pub fn ensure_positive_duration(minutes: i32) -> AppResult<()> {
    validate_positive(minutes).map_err(|_| invalid_input("Duration must be > 0"))
}

/// Rango horario dentro del día con fin estrictamente posterior al inicio
pub fn ensure_time_range(start_minute: i32, end_minute: i32) -> AppResult<()> {
    if end_minute <= start_minute {
        return Err(invalid_input("Invalid time range"));
    }
    if start_minute < 0 || end_minute > MINUTES_PER_DAY {
        return Err(invalid_input("Time range must be within the day"));
    }
    Ok(())
}
