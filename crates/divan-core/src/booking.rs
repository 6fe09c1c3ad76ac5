use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{ProductId, RecordId, UserId};
use crate::validation::{required, ValidationError};

/// Hourly showroom visit slots.
pub const TIME_SLOTS: [&str; 9] = [
    "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// A showroom visit to look at one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub status: BookingStatus,
}

/// Booking form input. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub user_id: String,
    pub product_id: String,
    pub date: Option<NaiveDate>,
    pub time: String,
}

impl BookingDraft {
    /// # Errors
    ///
    /// - [`ValidationError::MissingField`] when product, date, time, or user is missing.
    /// - [`ValidationError::UnknownTimeSlot`] when `time` is not one of [`TIME_SLOTS`].
    pub fn into_booking(self) -> Result<Booking, ValidationError> {
        let product_id = required("productId", &self.product_id)?;
        let date = self.date.ok_or(ValidationError::MissingField("date"))?;
        let time = required("time", &self.time)?;
        let user_id = required("userId", &self.user_id)?;
        if !TIME_SLOTS.contains(&time) {
            return Err(ValidationError::UnknownTimeSlot(time.to_owned()));
        }

        Ok(Booking {
            id: None,
            user_id: RecordId::from(user_id),
            product_id: RecordId::from(product_id),
            date,
            time: time.to_owned(),
            status: BookingStatus::Pending,
        })
    }
}
