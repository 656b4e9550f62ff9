use serde::Serialize;
use thiserror::Error;

/// Every message the engine can produce. The `Display` text is exactly what
/// gets written next to a row or into the aggregate block.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind")]
pub enum ValidationError {
    #[error("Fecha invalida")]
    InvalidDate,

    #[error("Hora desde invalida")]
    InvalidStartTime,

    #[error("Hora hasta invalida")]
    InvalidEndTime,

    #[error("Hora desde debe ser menor a Hora hasta")]
    InvalidOrdering,

    #[error("Horario superpuesto con la franja de referencia {band_start} - {band_end}")]
    BandOverlap { band_start: String, band_end: String },

    #[error("Horario solapado con la siguiente entrada en {date}")]
    IntervalOverlap { date: String },

    #[error("Hueco entre entradas en {date}")]
    IntervalGap { date: String },
}
