//! Workbook (XLSX/XLS) pipeline and cell text formatting.

use super::Pipeline;
use crate::error::Result;
use crate::model::{CellValue, DateSystem, ImageInfo};
use crate::render::{image_markdown, TableRenderConfig, TableRenderer};
use crate::source::WorkbookSource;
use crate::storage::GeometryCheck;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Number format fragments that mark a numeric cell as a date or time.
const DATE_FORMAT_TOKENS: &[&str] = &["yy", "dd", "mm", "hh", "ss"];

/// Integral values in this range may be unformatted date serials.
const BARE_SERIAL_RANGE: std::ops::RangeInclusive<f64> = 20000.0..=60000.0;

pub(crate) fn run(source: &mut dyn WorkbookSource, pipeline: &mut Pipeline<'_>) -> Result<()> {
    let date_system = source.date_system();

    let raw = source.images().unwrap_or_else(|e| {
        log::warn!("Error extracting images: {}", e);
        Vec::new()
    });
    let stored: Vec<(Option<String>, ImageInfo)> = raw
        .iter()
        .filter_map(|image| {
            pipeline
                .sink
                .accept(image, GeometryCheck::Skip)
                .map(|info| (image.sheet.clone(), info))
        })
        .collect();

    let sheets = source.sheets()?;
    log::info!("Workbook contains {} sheets", sheets.len());

    let renderer = TableRenderer::with_config(TableRenderConfig::spreadsheet());
    for sheet in &sheets {
        if sheet.is_empty() {
            log::debug!("Skipping empty sheet '{}'", sheet.name);
            continue;
        }

        let rows: Vec<Vec<String>> = sheet
            .rows
            .iter()
            .map(|row| row.iter().map(|c| cell_text(c, date_system)).collect())
            .collect();

        let Some(lines) = renderer.render_cells(&rows, None) else {
            continue;
        };
        pipeline.out.extend(lines);
        pipeline.out.push_blank();

        let anchored: Vec<&ImageInfo> = stored
            .iter()
            .filter(|(name, _)| name.as_deref() == Some(sheet.name.as_str()))
            .map(|(_, info)| info)
            .collect();
        if !anchored.is_empty() {
            for info in anchored {
                pipeline.out.push_line(image_markdown(&info.filename, &info.url));
            }
            pipeline.out.push_blank();
        }
    }

    pipeline.info("sheets", sheets.len());
    Ok(())
}

/// Display text of a cell.
///
/// Numbers whose format looks like a date, and bare integers in the usual
/// serial range that land between 1990 and 2100, are shown as dates.
pub fn cell_text(cell: &CellValue, date_system: DateSystem) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.clone(),
        CellValue::Bool(true) => "TRUE".to_string(),
        CellValue::Bool(false) => "FALSE".to_string(),
        CellValue::Date(d) => d.to_string(),
        CellValue::DateTime(dt) => format_datetime(dt),
        CellValue::DateSerial(v) => serial_to_datetime(*v, date_system)
            .map(|dt| format_datetime(&dt))
            .unwrap_or_else(|| format_number(*v)),
        CellValue::Number { value, format } => {
            let looks_like_date = format.as_deref().is_some_and(|f| {
                let f = f.to_lowercase();
                DATE_FORMAT_TOKENS.iter().any(|t| f.contains(t))
            });
            if looks_like_date {
                if let Some(dt) = serial_to_datetime(*value, date_system) {
                    return format_datetime(&dt);
                }
            }

            if value.fract() == 0.0 && BARE_SERIAL_RANGE.contains(value) {
                if let Some(dt) = serial_to_datetime(*value, date_system) {
                    if plausible_date(dt.date()) {
                        return format_datetime(&dt);
                    }
                }
            }

            format_number(*value)
        }
    }
}

/// Convert a spreadsheet serial number to a date-time.
pub fn serial_to_datetime(serial: f64, date_system: DateSystem) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    let base = match date_system {
        // Serials before the phantom 1900-02-29 are one day off
        DateSystem::V1900 if serial < 60.0 => NaiveDate::from_ymd_opt(1899, 12, 31)?,
        DateSystem::V1900 => NaiveDate::from_ymd_opt(1899, 12, 30)?,
        DateSystem::V1904 => NaiveDate::from_ymd_opt(1904, 1, 1)?,
    };

    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    base.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

/// Midnight prints as a date only.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.date().to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn plausible_date(date: NaiveDate) -> bool {
    NaiveDate::from_ymd_opt(1990, 1, 1).is_some_and(|lo| date >= lo)
        && NaiveDate::from_ymd_opt(2100, 12, 31).is_some_and(|hi| date <= hi)
}
