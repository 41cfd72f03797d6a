use uuid::Uuid;

/// Domain events emitted by the Booking aggregate
///
/// Logged when a purchase completes; a future payment-webhook flow can
/// publish these to external systems.
#[derive(Debug, Clone)]
pub enum BookingEvent {
    /// Fired when a booking is recorded
    Created {
        /// ID of the new booking
        booking_id: Uuid,
        /// Tour that was booked
        tour_id: Uuid,
        /// User who booked it
        user_id: Uuid,
    },
}

impl BookingEvent {
    /// Returns the booking_id for this event
    pub fn booking_id(&self) -> Uuid {
        match self {
            BookingEvent::Created { booking_id, .. } => *booking_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_event_exposes_booking_id() {
        let booking_id = Uuid::new_v4();
        let event = BookingEvent::Created {
            booking_id,
            tour_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        };

        assert_eq!(event.booking_id(), booking_id);
    }
}
