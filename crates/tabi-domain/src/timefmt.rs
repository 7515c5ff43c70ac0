//! Validadores de formato de fecha/hora usados por los contratos de salida.
//!
//! Los esquemas exigen fechas ISO `YYYY-MM-DD` y horas locales `HH:MM`. Se
//! valida carácter a carácter (sin crate de regex) y con `chrono` para la
//! parte calendárica.

use chrono::NaiveDate;

/// `true` si `s` es una fecha ISO `YYYY-MM-DD` válida en el calendario.
pub fn is_iso_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() && s.len() == 10
}

/// `true` si `s` tiene forma `HH:MM` con HH en 00..=23 y MM en 00..=59.
pub fn is_hhmm(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() != 5 || b[2] != b':' {
        return false;
    }
    let digits = b[0].is_ascii_digit() && b[1].is_ascii_digit() && b[3].is_ascii_digit() && b[4].is_ascii_digit();
    if !digits {
        return false;
    }
    let hh = (b[0] - b'0') * 10 + (b[1] - b'0');
    let mm = (b[3] - b'0') * 10 + (b[4] - b'0');
    hh < 24 && mm < 60
}

/// `true` si `v` es un monto monetario admisible: finito y no negativo.
pub fn is_money(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}
