// Archivo: indicators.rs
// Propósito: recoger los indicadores de rendimiento de la sección de salida
// como valores numéricos o textuales del job.
use crate::errors::{NodeFailure, Result, Stage};
use crate::summary::GleanSummary;
use job_domain::{GleanRepository, Job};
use job_params::{indicators, Located, ParamContainer, ParamValue};
use log::{debug, warn};

/// Valor de un campo ya convertido a lo que se persiste.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue<'a> {
    Float(f64),
    Char(&'a str),
}

/// Convierte el valor de un campo. `Ok(None)` significa que no hay nada que
/// registrar; `Err` es un valor numérico no representable.
pub fn coerce(value: &ParamValue) -> std::result::Result<Option<IndicatorValue<'_>>, String> {
    match value {
        ParamValue::Int(i) => Ok(Some(IndicatorValue::Float(*i as f64))),
        ParamValue::Float(f) if f.is_finite() => Ok(Some(IndicatorValue::Float(*f))),
        ParamValue::Float(f) => Err(format!("valor no finito: {}", f)),
        ParamValue::Text(s) if !s.is_empty() => Ok(Some(IndicatorValue::Char(s))),
        ParamValue::Null | ParamValue::Text(_) | ParamValue::Bool(_) | ParamValue::Other(_) => Ok(None),
    }
}

pub fn glean_performance_indicators<R>(repo: &R, job: &Job, output: &ParamContainer, summary: &mut GleanSummary)
    where R: GleanRepository + ?Sized
{
    for Located { path, node } in indicators(output) {
        for field in node.data_order() {
            let Some(value) = node.value(field) else { continue };
            let coerced = match coerce(value) {
                Ok(Some(v)) => v,
                Ok(None) => {
                    debug!("{}.{}: sin valor registrable", path, field);
                    summary.indicator_fields_skipped += 1;
                    continue;
                }
                Err(reason) => {
                    warn!("{}.{}: {}, se omite", path, field, reason);
                    summary.indicator_fields_skipped += 1;
                    continue;
                }
            };
            match record_value(repo, job, field, coerced) {
                Ok(IndicatorValue::Float(_)) => summary.float_values += 1,
                Ok(IndicatorValue::Char(_)) => summary.char_values += 1,
                Err(e) => {
                    warn!("{}.{}: no se pudo registrar el indicador: {}", path, field, e);
                    summary.record(NodeFailure::new(Stage::Harvest, format!("{}.{}", path, field), e));
                }
            }
        }
    }
}

fn record_value<'a, R>(repo: &R, job: &Job, field: &str, value: IndicatorValue<'a>) -> Result<IndicatorValue<'a>>
    where R: GleanRepository + ?Sized
{
    let (key, _) = repo.get_or_create_value_key(field)?;
    match value {
        IndicatorValue::Float(v) => {
            repo.add_float_value(&job.id, &key, v)?;
        }
        IndicatorValue::Char(s) => {
            repo.add_char_value(&job.id, &key, s)?;
        }
    }
    Ok(value)
}
