use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::types::{FlightRecord, RouteType, SearchCriteria};
use crate::config::SynthesisConfig;

/// Carriers flights are drawn from.
pub const AIRLINES: [&str; 8] = [
    "American Airlines",
    "Delta Air Lines",
    "United Airlines",
    "Southwest Airlines",
    "JetBlue Airways",
    "Alaska Airlines",
    "Spirit Airlines",
    "Frontier Airlines",
];

/// Aircraft types flights are drawn from.
pub const AIRCRAFT_TYPES: [&str; 8] = [
    "Boeing 737",
    "Airbus A320",
    "Boeing 757",
    "Airbus A321",
    "Boeing 777",
    "Airbus A330",
    "Boeing 787",
    "Embraer E175",
];

const MAJOR_US_CITIES: [&str; 5] = ["New York", "Los Angeles", "Chicago", "Houston", "Phoenix"];
const INTERNATIONAL_HUBS: [&str; 5] = ["London", "Paris", "Tokyo", "Sydney", "Dubai"];

/// Inclusive bounds on flights generated per calendar day.
pub const FLIGHTS_PER_DAY: (u32, u32) = (3, 8);

const WEEKEND_FACTOR: f64 = 1.3;
const HOLIDAY_FACTOR: f64 = 1.5;
const RED_EYE_FACTOR: f64 = 0.8;
const EARLY_MORNING_FACTOR: f64 = 0.9;
const JITTER: (f64, f64) = (0.8, 1.2);

/// Multiplier applied for departures on the given weekday.
pub fn day_of_week_factor(day: Weekday) -> f64 {
    match day {
        Weekday::Sat | Weekday::Sun => WEEKEND_FACTOR,
        _ => 1.0,
    }
}

/// Peak-season multiplier: winter holidays and July.
pub fn season_factor(date: NaiveDate) -> f64 {
    match date.month() {
        12 | 1 | 7 => HOLIDAY_FACTOR,
        _ => 1.0,
    }
}

/// Red-eye and early-morning departures are discounted.
pub fn time_of_day_factor(departure_hour: u32) -> f64 {
    if departure_hour < 6 {
        RED_EYE_FACTOR
    } else if departure_hour < 9 {
        EARLY_MORNING_FACTOR
    } else {
        1.0
    }
}

/// Fare curve over days between booking and departure.
///
/// Last-minute fares carry a premium, the cheapest window is three weeks to
/// two months out, and fares drift back up slightly beyond that.
pub fn advance_purchase_factor(days_ahead: i64) -> f64 {
    match days_ahead {
        i64::MIN..=6 => 1.25,
        7..=13 => 1.10,
        14..=20 => 1.0,
        21..=59 => 0.90,
        _ => 0.95,
    }
}

/// Classify a route from the free-text city names.
///
/// Long haul when either city names an international hub, medium haul when
/// both name a major US city.
pub fn determine_route_type(origin: &str, destination: &str) -> RouteType {
    if names_any(&INTERNATIONAL_HUBS, origin) || names_any(&INTERNATIONAL_HUBS, destination) {
        RouteType::LongHaul
    } else if names_any(&MAJOR_US_CITIES, origin) && names_any(&MAJOR_US_CITIES, destination) {
        RouteType::MediumHaul
    } else {
        RouteType::ShortHaul
    }
}

fn names_any(cities: &[&str], text: &str) -> bool {
    cities.iter().any(|city| text.contains(city))
}

/// Generates synthetic flight records for a search.
#[derive(Debug, Clone, Default)]
pub struct FlightSynthesizer {
    seed: Option<u64>,
}

impl FlightSynthesizer {
    /// Create a synthesizer from configuration
    pub fn new(config: &SynthesisConfig) -> Self {
        Self { seed: config.seed }
    }

    /// Create a synthesizer whose output is fully determined by `seed`
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// The configured seed, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generate flights for every day in the criteria's range.
    ///
    /// `booked_on` anchors the advance-purchase discount curve. With a seed,
    /// the result depends only on the arguments.
    pub fn generate(&self, criteria: &SearchCriteria, booked_on: NaiveDate) -> Vec<FlightRecord> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let route_type = determine_route_type(&criteria.origin, &criteria.destination);
        debug!(
            origin = %criteria.origin,
            destination = %criteria.destination,
            route_type = route_type.as_str(),
            days = criteria.day_count(),
            "Synthesizing flight data"
        );

        let mut flights = Vec::new();
        for date in criteria.days() {
            let daily_flights = rng.gen_range(FLIGHTS_PER_DAY.0..=FLIGHTS_PER_DAY.1);
            for _ in 0..daily_flights {
                flights.push(synthesize_flight(
                    &mut rng, criteria, date, route_type, booked_on,
                ));
            }
        }

        info!(
            flights = flights.len(),
            origin = %criteria.origin,
            destination = %criteria.destination,
            "Generated flight data"
        );

        flights
    }
}

fn synthesize_flight<R: Rng>(
    rng: &mut R,
    criteria: &SearchCriteria,
    date: NaiveDate,
    route_type: RouteType,
    booked_on: NaiveDate,
) -> FlightRecord {
    let airline = AIRLINES[rng.gen_range(0..AIRLINES.len())];
    let aircraft = AIRCRAFT_TYPES[rng.gen_range(0..AIRCRAFT_TYPES.len())];
    let prefix: String = airline.chars().take(2).collect::<String>().to_uppercase();
    let flight_number = format!("{}{}", prefix, rng.gen_range(100..=9999));

    let departure_hour = rng.gen_range(5..=22);
    let departure_minute = [0, 15, 30, 45][rng.gen_range(0..4)];
    let departure_time =
        NaiveTime::from_hms_opt(departure_hour, departure_minute, 0).unwrap_or(NaiveTime::MIN);

    let (min_hours, max_hours) = route_type.duration_hours_range();
    let duration_minutes = rng.gen_range(min_hours..=max_hours) * 60 + rng.gen_range(0..=59);
    // NaiveTime addition wraps at midnight.
    let arrival_time = departure_time + Duration::minutes(i64::from(duration_minutes));

    let (min_fare, max_fare) = route_type.base_fare_range();
    let base_fare = f64::from(rng.gen_range(min_fare..=max_fare));
    let days_ahead = (date - booked_on).num_days();

    let multiplier = day_of_week_factor(date.weekday())
        * season_factor(date)
        * time_of_day_factor(departure_hour)
        * advance_purchase_factor(days_ahead)
        * rng.gen_range(JITTER.0..=JITTER.1);

    FlightRecord {
        date,
        airline: airline.to_string(),
        flight_number,
        aircraft: aircraft.to_string(),
        departure_time,
        arrival_time,
        duration_minutes,
        price: (base_fare * multiplier) as u32,
        route: FlightRecord::route_label(&criteria.origin, &criteria.destination),
        origin: criteria.origin.clone(),
        destination: criteria.destination.clone(),
        day_of_week: date.weekday(),
        route_type,
    }
}
