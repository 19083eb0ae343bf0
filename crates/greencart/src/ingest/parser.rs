use std::io::Read;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{IngestError, DRIVERS_FILE, ORDERS_FILE, ROUTES_FILE};
use crate::fleet::{Driver, Order, OrderId, Route, RouteId, TrafficLevel};

#[derive(Debug, Deserialize)]
struct RouteRow {
    route_id: String,
    distance_km: f64,
    #[serde(default)]
    traffic_level: String,
    base_time_min: f64,
}

#[derive(Debug, Deserialize)]
struct DriverRow {
    name: String,
    shift_hours: f64,
    #[serde(default)]
    past_week_hours: String,
}

#[derive(Debug, Deserialize)]
struct OrderRow {
    order_id: String,
    value_rs: f64,
    route_id: String,
    delivery_time: String,
}

/// Deserialize every row, pairing it with its 1-based line number in the file.
fn read_rows<T, R>(file: &'static str, reader: R) -> Result<Vec<(u64, T)>, IngestError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<T>()
        .enumerate()
        .map(|(index, row)| {
            row.map(|row| (index as u64 + 2, row))
                .map_err(|source| IngestError::Csv { file, source })
        })
        .collect()
}

pub(super) fn parse_routes<R: Read>(reader: R) -> Result<Vec<Route>, IngestError> {
    read_rows::<RouteRow, _>(ROUTES_FILE, reader)?
        .into_iter()
        .map(|(line, row)| {
            let field = FieldContext {
                file: ROUTES_FILE,
                line,
            };
            let traffic_level = if row.traffic_level.is_empty() {
                TrafficLevel::default()
            } else {
                row.traffic_level
                    .parse::<TrafficLevel>()
                    .map_err(|err| field.invalid("traffic_level", err.to_string()))?
            };

            Ok(Route {
                route_id: RouteId(field.required("route_id", row.route_id)?),
                distance_in_km: field.non_negative("distance_km", row.distance_km)?,
                traffic_level,
                base_time: field.non_negative("base_time_min", row.base_time_min)?,
            })
        })
        .collect()
}

pub(super) fn parse_drivers<R: Read>(reader: R) -> Result<Vec<Driver>, IngestError> {
    read_rows::<DriverRow, _>(DRIVERS_FILE, reader)?
        .into_iter()
        .map(|(line, row)| {
            let field = FieldContext {
                file: DRIVERS_FILE,
                line,
            };
            let past_7_day_work_hours = weekly_hours(&row.past_week_hours)
                .ok_or_else(|| {
                    field.invalid(
                        "past_week_hours",
                        format!("'{}' is not a '|' separated list of hours", row.past_week_hours),
                    )
                })?;

            Ok(Driver {
                name: field.required("name", row.name)?,
                current_shift_hours: field.non_negative("shift_hours", row.shift_hours)?,
                past_7_day_work_hours,
            })
        })
        .collect()
}

pub(super) fn parse_orders<R: Read>(reader: R) -> Result<Vec<Order>, IngestError> {
    read_rows::<OrderRow, _>(ORDERS_FILE, reader)?
        .into_iter()
        .map(|(line, row)| {
            let field = FieldContext {
                file: ORDERS_FILE,
                line,
            };
            let minutes = duration_minutes(&row.delivery_time).ok_or_else(|| {
                field.invalid(
                    "delivery_time",
                    format!("'{}' is not an HH:MM duration", row.delivery_time),
                )
            })?;
            let assigned_route = Some(row.route_id)
                .filter(|id| !id.is_empty())
                .map(RouteId);

            Ok(Order {
                order_id: OrderId(field.required("order_id", row.order_id)?),
                value_rs: field.non_negative("value_rs", row.value_rs)?,
                assigned_route,
                actual_delivery_duration_minutes: minutes,
            })
        })
        .collect()
}

#[derive(Clone, Copy)]
struct FieldContext {
    file: &'static str,
    line: u64,
}

impl FieldContext {
    fn invalid(self, field: &'static str, reason: String) -> IngestError {
        IngestError::InvalidField {
            file: self.file,
            line: self.line,
            field,
            reason,
        }
    }

    fn required(self, field: &'static str, value: String) -> Result<String, IngestError> {
        if value.is_empty() {
            Err(self.invalid(field, "must not be empty".to_string()))
        } else {
            Ok(value)
        }
    }

    fn non_negative(self, field: &'static str, value: f64) -> Result<f64, IngestError> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(self.invalid(field, format!("must be a non-negative number, got {value}")))
        }
    }
}

/// Convert an `HH:MM` duration into whole minutes.
pub(crate) fn duration_minutes(raw: &str) -> Option<f64> {
    let (hours, minutes) = raw.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    let total = hours.checked_mul(60)?.checked_add(minutes)?;
    Some(f64::from(total))
}

/// Sum a `|` separated list of daily hours.
fn weekly_hours(raw: &str) -> Option<f64> {
    if raw.trim().is_empty() {
        return Some(0.0);
    }

    raw.split('|').try_fold(0.0, |total, entry| {
        let hours: f64 = entry.trim().parse().ok()?;
        (hours.is_finite() && hours >= 0.0).then_some(total + hours)
    })
}
