use mongodb::{Client, Collection};

use crate::models::booking::Booking;
use crate::models::guest_tier::GuestTier;
use crate::models::pricing::PricingMatrixEntry;
use crate::models::resort::Resort;
use crate::models::time_slot::TimeSlot;

pub fn resorts(client: &Client) -> Collection<Resort> {
    client.database("Resorts").collection("Resorts")
}

pub fn time_slots(client: &Client) -> Collection<TimeSlot> {
    client.database("Resorts").collection("TimeSlots")
}

pub fn guest_tiers(client: &Client) -> Collection<GuestTier> {
    client.database("Resorts").collection("GuestTiers")
}

pub fn pricing_matrix(client: &Client) -> Collection<PricingMatrixEntry> {
    client.database("Resorts").collection("PricingMatrix")
}

pub fn bookings(client: &Client) -> Collection<Booking> {
    client.database("Bookings").collection("Bookings")
}
