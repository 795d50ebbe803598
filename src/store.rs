use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth::otp::{OtpEntry, OtpKind};
use crate::auth::users::User;
use crate::bikes::bikes::{seed_bikes, Bike};
use crate::bookings::Booking;
use crate::map::{seed_locations, LocationAvailability};

/// Storage seam for everything the route handlers touch. Only the in-memory
/// implementation exists; a persistent backend would slot in here without
/// changing any handler.
///
/// `insert_*` take a record with `id: 0` and return it with the id the store
/// assigned. Assignment happens under the store's lock, so concurrent inserts
/// cannot hand out the same id.
pub trait Store: Send + Sync {
    // Static catalog data.
    fn bikes(&self) -> Vec<Bike>;
    fn bike(&self, id: u32) -> Option<Bike>;
    fn locations(&self) -> Vec<LocationAvailability>;

    fn insert_user(&self, user: User) -> User;
    fn user(&self, id: u32) -> Option<User>;
    fn user_by_phone(&self, phone: &str) -> Option<User>;
    fn user_by_email(&self, email: &str) -> Option<User>;
    fn update_user(&self, user: User) -> Option<User>;
    fn users(&self) -> Vec<User>;

    fn insert_booking(&self, booking: Booking) -> Booking;
    fn booking(&self, id: u32) -> Option<Booking>;
    fn bookings_for(&self, user_id: u32) -> Vec<Booking>;
    fn update_booking(&self, booking: Booking) -> Option<Booking>;

    fn put_otp(&self, kind: OtpKind, key: &str, entry: OtpEntry);
    fn otp(&self, kind: OtpKind, key: &str) -> Option<OtpEntry>;
    fn remove_otp(&self, kind: OtpKind, key: &str);
}

/// Process-lifetime store: everything resets on restart.
pub struct MemoryStore {
    bikes: Vec<Bike>,
    locations: Vec<LocationAvailability>,
    users: Mutex<Vec<User>>,
    bookings: Mutex<Vec<Booking>>,
    otps: Mutex<HashMap<(OtpKind, String), OtpEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            bikes: seed_bikes(),
            locations: seed_locations(),
            users: Mutex::new(Vec::new()),
            bookings: Mutex::new(Vec::new()),
            otps: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// Users and bookings are never deleted, so `len + 1` stays unique as long as
// it is computed under the same lock as the push.
impl Store for MemoryStore {
    fn bikes(&self) -> Vec<Bike> {
        self.bikes.clone()
    }

    fn bike(&self, id: u32) -> Option<Bike> {
        self.bikes.iter().find(|b| b.id == id).cloned()
    }

    fn locations(&self) -> Vec<LocationAvailability> {
        self.locations.clone()
    }

    fn insert_user(&self, mut user: User) -> User {
        let mut users = self.users.lock().unwrap();
        user.id = users.len() as u32 + 1;
        users.push(user.clone());
        user
    }

    fn user(&self, id: u32) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn user_by_phone(&self, phone: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.phone == phone)
            .cloned()
    }

    fn user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    fn update_user(&self, user: User) -> Option<User> {
        let mut users = self.users.lock().unwrap();
        let slot = users.iter_mut().find(|u| u.id == user.id)?;
        *slot = user.clone();
        Some(user)
    }

    fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    fn insert_booking(&self, mut booking: Booking) -> Booking {
        let mut bookings = self.bookings.lock().unwrap();
        booking.id = bookings.len() as u32 + 1;
        bookings.push(booking.clone());
        booking
    }

    fn booking(&self, id: u32) -> Option<Booking> {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned()
    }

    fn bookings_for(&self, user_id: u32) -> Vec<Booking> {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect()
    }

    fn update_booking(&self, booking: Booking) -> Option<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let slot = bookings.iter_mut().find(|b| b.id == booking.id)?;
        *slot = booking.clone();
        Some(booking)
    }

    fn put_otp(&self, kind: OtpKind, key: &str, entry: OtpEntry) {
        self.otps
            .lock()
            .unwrap()
            .insert((kind, key.to_string()), entry);
    }

    fn otp(&self, kind: OtpKind, key: &str) -> Option<OtpEntry> {
        self.otps
            .lock()
            .unwrap()
            .get(&(kind, key.to_string()))
            .cloned()
    }

    fn remove_otp(&self, kind: OtpKind, key: &str) {
        self.otps.lock().unwrap().remove(&(kind, key.to_string()));
    }
}
