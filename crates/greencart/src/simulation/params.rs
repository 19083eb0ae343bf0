use serde::{Deserialize, Serialize};

pub const NUMBER_OF_DRIVERS: &str = "numberOfDrivers";
pub const ROUTE_START_TIME: &str = "routeStartTime";
pub const MAX_HOURS_PER_DAY: &str = "maxHoursPerDay";

/// Raw run request as submitted by a client; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub number_of_drivers: Option<f64>,
    #[serde(default)]
    pub route_start_time: Option<String>,
    #[serde(default)]
    pub max_hours_per_day: Option<f64>,
}

impl RunRequest {
    pub fn new(number_of_drivers: u32, route_start_time: &str, max_hours_per_day: f64) -> Self {
        Self {
            number_of_drivers: Some(f64::from(number_of_drivers)),
            route_start_time: Some(route_start_time.to_string()),
            max_hours_per_day: Some(max_hours_per_day),
        }
    }
}

/// Validated fleet parameters recorded alongside every simulation result.
///
/// `route_start_time` is only required to be present; it is stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunParameters {
    pub number_of_drivers: u32,
    pub route_start_time: String,
    pub max_hours_per_day: f64,
}

/// Rejection raised before any order is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please provide numberOfDrivers, routeStartTime, and maxHoursPerDay.")]
    Missing { fields: Vec<&'static str> },
    #[error("Number of drivers and max hours per day must be positive.")]
    Invalid { fields: Vec<&'static str> },
}

impl InputError {
    /// Request fields responsible for the rejection.
    pub fn fields(&self) -> &[&'static str] {
        match self {
            InputError::Missing { fields } | InputError::Invalid { fields } => fields,
        }
    }
}

impl TryFrom<RunRequest> for RunParameters {
    type Error = InputError;

    fn try_from(request: RunRequest) -> Result<Self, Self::Error> {
        let RunRequest {
            number_of_drivers,
            route_start_time,
            max_hours_per_day,
        } = request;
        let route_start_time = route_start_time.filter(|value| !value.trim().is_empty());

        let mut missing = Vec::new();
        if number_of_drivers.is_none() {
            missing.push(NUMBER_OF_DRIVERS);
        }
        if route_start_time.is_none() {
            missing.push(ROUTE_START_TIME);
        }
        if max_hours_per_day.is_none() {
            missing.push(MAX_HOURS_PER_DAY);
        }

        let (Some(drivers), Some(route_start_time), Some(max_hours_per_day)) =
            (number_of_drivers, route_start_time, max_hours_per_day)
        else {
            return Err(InputError::Missing { fields: missing });
        };

        let mut invalid = Vec::new();
        let number_of_drivers = driver_count(drivers);
        if number_of_drivers.is_none() {
            invalid.push(NUMBER_OF_DRIVERS);
        }
        if !(max_hours_per_day.is_finite() && max_hours_per_day > 0.0) {
            invalid.push(MAX_HOURS_PER_DAY);
        }

        match number_of_drivers {
            Some(number_of_drivers) if invalid.is_empty() => Ok(RunParameters {
                number_of_drivers,
                route_start_time,
                max_hours_per_day,
            }),
            _ => Err(InputError::Invalid { fields: invalid }),
        }
    }
}

fn driver_count(raw: f64) -> Option<u32> {
    if raw.is_finite() && raw >= 1.0 && raw.fract() == 0.0 && raw <= f64::from(u32::MAX) {
        Some(raw as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_complete_positive_request() {
        let params = RunParameters::try_from(RunRequest::new(3, "08:30", 9.5)).expect("valid");
        assert_eq!(params.number_of_drivers, 3);
        assert_eq!(params.route_start_time, "08:30");
        assert_eq!(params.max_hours_per_day, 9.5);
    }

    #[test]
    fn reports_every_missing_field() {
        let request: RunRequest =
            serde_json::from_value(json!({ "numberOfDrivers": 5, "maxHoursPerDay": 8 }))
                .expect("request deserializes");

        let err = RunParameters::try_from(request).expect_err("start time missing");
        assert_eq!(
            err.to_string(),
            "Please provide numberOfDrivers, routeStartTime, and maxHoursPerDay."
        );
        assert_eq!(err.fields(), &[ROUTE_START_TIME]);

        let err = RunParameters::try_from(RunRequest::default()).expect_err("all missing");
        assert_eq!(
            err.fields(),
            &[NUMBER_OF_DRIVERS, ROUTE_START_TIME, MAX_HOURS_PER_DAY]
        );
    }

    #[test]
    fn treats_blank_start_time_as_missing() {
        let mut request = RunRequest::new(2, "08:00", 8.0);
        request.route_start_time = Some("   ".to_string());
        assert!(matches!(
            RunParameters::try_from(request),
            Err(InputError::Missing { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_values() {
        let err = RunParameters::try_from(RunRequest::new(0, "08:00", 8.0)).expect_err("zero");
        assert_eq!(
            err.to_string(),
            "Number of drivers and max hours per day must be positive."
        );
        assert_eq!(err.fields(), &[NUMBER_OF_DRIVERS]);

        let mut request = RunRequest::new(2, "08:00", 0.0);
        request.number_of_drivers = Some(-4.0);
        let err = RunParameters::try_from(request).expect_err("both invalid");
        assert_eq!(err.fields(), &[NUMBER_OF_DRIVERS, MAX_HOURS_PER_DAY]);
    }

    #[test]
    fn rejects_fractional_driver_counts() {
        let mut request = RunRequest::new(2, "08:00", 8.0);
        request.number_of_drivers = Some(2.5);
        assert!(matches!(
            RunParameters::try_from(request),
            Err(InputError::Invalid { .. })
        ));
    }

    #[test]
    fn start_time_is_passed_through_unparsed() {
        let params =
            RunParameters::try_from(RunRequest::new(1, "quarter past eight", 8.0)).expect("valid");
        assert_eq!(params.route_start_time, "quarter past eight");
    }
}
