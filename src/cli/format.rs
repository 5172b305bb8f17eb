//! Alert text for newly seen objects.

use jiff::civil::Date;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::TrackedObject;

const ADJECTIVES: &[&str] = &[
    "harmless",
    "nasty",
    "threatening",
    "dangerous",
    "critical",
    "terrible",
    "bloody",
    "destructive",
    "deadly",
    "fatal",
];

/// Picks a random adjective for the alert.
pub(super) fn pick_adjective<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    ADJECTIVES.choose(rng).copied().unwrap_or("dangerous")
}

/// Build the status line announcing `object` approaching `body`.
pub(super) fn format_alert(
    object: &TrackedObject,
    body: &str,
    adjective: &str,
) -> Result<String, String> {
    let approach = object
        .first_approach()
        .ok_or_else(|| format!("object {} has no close approach", object.id))?;
    let date = Date::strptime("%Y-%m-%d", &approach.close_approach_date).map_err(|e| {
        format!(
            "bad approach date {:?} for object {}: {e}",
            approach.close_approach_date, object.id
        )
    })?;

    Ok(format!(
        "🔭 a #{adjective} #asteroid {}, Ø ~{:.2} km and ~{} km/s is coming close to #{body} on {}. {:02} (details here {})",
        display_name(&object.name),
        object.estimated_diameter.kilometers.mean(),
        display_speed(&approach.relative_velocity.kilometers_per_second),
        date.strftime("%b"),
        date.day(),
        object.nasa_jpl_url,
    ))
}

/// The designation inside parentheses, e.g. `2009 JR5` from
/// `465633 (2009 JR5)`. Falls back to the full name.
fn display_name(name: &str) -> &str {
    name.split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(inner, _)| inner)
        .filter(|inner| !inner.is_empty())
        .unwrap_or(name)
}

/// Trims long decimals to one fractional digit: `18.1279` → `18.1`.
fn display_speed(speed: &str) -> String {
    let parts: Vec<&str> = speed.split('.').collect();
    match parts.as_slice() {
        [whole, frac] if frac.chars().count() > 2 => {
            let first: String = frac.chars().take(1).collect();
            format!("{whole}.{first}")
        }
        _ => speed.to_string(),
    }
}
