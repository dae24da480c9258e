//! Sample data for local development.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::info;

use super::{areas, countries, events, reservations, tickets, users, DbResult, WriteTransaction};
use crate::constants::DEFAULT_COUNTRY;
use crate::models::{Country, NewArea, NewEvent, NewReservation, NewTicket, NewUser};

pub const SAMPLE_EMAIL: &str = "user.test@gmail.com";
pub const SAMPLE_AREA: &str = "Oulu - Keskusta";
pub const SAMPLE_EVENT: &str = "Stand Up Comedy at 45 Special";

/// Inserts one of each entity, wired together. Returns `false` when the
/// sample graph is already present.
pub async fn generate_test_database(pool: &SqlitePool) -> DbResult<bool> {
    let mut tx = WriteTransaction::begin(pool).await?;

    if users::find_by_email(&mut tx, SAMPLE_EMAIL).await?.is_some() {
        info!("Sample data already present");
        return Ok(false);
    }

    if !countries::exists(&mut tx, DEFAULT_COUNTRY).await? {
        countries::insert(
            &mut tx,
            &Country {
                country: DEFAULT_COUNTRY.to_string(),
                timezone: Some("Europe/Helsinki".to_string()),
                currency: Some("EUR".to_string()),
            },
        )
        .await?;
    }

    let user = users::insert(
        &mut tx,
        &NewUser {
            first_name: "user".to_string(),
            last_name: "test".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or(NaiveDate::MIN),
            email: SAMPLE_EMAIL.to_string(),
            nationality: Some(DEFAULT_COUNTRY.to_string()),
        },
    )
    .await?;

    let area = match areas::find_by_name(&mut tx, SAMPLE_AREA).await? {
        Some(area) => area,
        None => {
            areas::insert(
                &mut tx,
                &NewArea {
                    name: SAMPLE_AREA.to_string(),
                    country: DEFAULT_COUNTRY.to_string(),
                },
            )
            .await?
        }
    };

    let event = events::insert(
        &mut tx,
        &NewEvent {
            name: SAMPLE_EVENT.to_string(),
            max_tickets: Some(150),
            ticket_price: Some(19.0),
            status: "Cancelled".to_string(),
            event_begin: Utc::now() + Duration::days(1),
            event_manager: Some(user.id),
            area_id: Some(area.id),
        },
    )
    .await?;

    let reservation = reservations::insert(
        &mut tx,
        &NewReservation {
            user_id: user.id,
            event_id: event.id,
            paid: true,
            created_at: Utc::now(),
        },
    )
    .await?;

    tickets::insert(
        &mut tx,
        &NewTicket {
            reservation_id: reservation.id,
            ticket_type: Some("VIP".to_string()),
        },
    )
    .await?;

    tx.commit().await?;
    info!("Sample data inserted");
    Ok(true)
}
