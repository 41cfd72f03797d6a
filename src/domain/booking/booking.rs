use super::events::BookingEvent;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Booking aggregate root
///
/// Records that a user purchased a spot on a tour at a given price.
///
/// # Invariants
/// - Price must be positive
/// - Bookings created through checkout are immediately paid
#[derive(Debug, Clone)]
pub struct Booking {
    id: Uuid,
    tour_id: Uuid,
    user_id: Uuid,
    price: Decimal,
    paid: bool,
    created_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new paid Booking
    ///
    /// # Returns
    /// * `Ok((Booking, Vec<BookingEvent>))` - New booking and events generated
    /// * `Err(String)` - If the price is not positive
    pub fn new(
        tour_id: Uuid,
        user_id: Uuid,
        price: Decimal,
    ) -> Result<(Self, Vec<BookingEvent>), String> {
        if price <= Decimal::ZERO {
            return Err("Booking price must be positive".to_string());
        }

        let booking = Self {
            id: Uuid::new_v4(),
            tour_id,
            user_id,
            price,
            paid: true,
            created_at: Utc::now(),
        };

        let events = vec![BookingEvent::Created {
            booking_id: booking.id,
            tour_id: booking.tour_id,
            user_id: booking.user_id,
        }];

        Ok((booking, events))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tour_id(&self) -> Uuid {
        self.tour_id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn paid(&self) -> bool {
        self.paid
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a Booking from persistence layer data
    pub fn from_persistence(
        id: Uuid,
        tour_id: Uuid,
        user_id: Uuid,
        price: Decimal,
        paid: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            tour_id,
            user_id,
            price,
            paid,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_booking_with_valid_price() {
        let tour_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let (booking, events) =
            Booking::new(tour_id, user_id, Decimal::from(497)).expect("valid booking");

        assert_eq!(booking.tour_id(), tour_id);
        assert_eq!(booking.user_id(), user_id);
        assert!(booking.paid());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn create_booking_with_zero_price_fails() {
        let result = Booking::new(Uuid::new_v4(), Uuid::new_v4(), Decimal::ZERO);
        assert!(result.is_err());
    }

    #[test]
    fn create_booking_with_negative_price_fails() {
        let result = Booking::new(Uuid::new_v4(), Uuid::new_v4(), Decimal::from(-10));
        assert!(result.is_err());
    }

    #[test]
    fn booking_generates_created_event() {
        let tour_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let (booking, events) = Booking::new(tour_id, user_id, Decimal::from(100)).unwrap();

        match &events[0] {
            BookingEvent::Created {
                booking_id,
                tour_id: tid,
                user_id: uid,
            } => {
                assert_eq!(*booking_id, booking.id());
                assert_eq!(*tid, tour_id);
                assert_eq!(*uid, user_id);
            }
        }
    }
}
