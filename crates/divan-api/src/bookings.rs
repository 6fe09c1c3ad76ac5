use divan_core::{Booking, BookingDraft};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Validates a showroom booking and stores it as pending.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] for a missing field or an off-grid time.
    /// - [`ApiError::Unconfigured`] if no bookings endpoint is configured.
    /// - Any failure creating the booking.
    pub async fn create_booking(&self, draft: BookingDraft) -> Result<Booking, ApiError> {
        let booking = draft.into_booking()?;
        let bookings = self.bookings();
        let booking = bookings.create(&booking).await?;
        tracing::info!(
            product_id = %booking.product_id,
            date = %booking.date,
            time = %booking.time,
            "booking created"
        );
        Ok(booking)
    }
}
