//! Records written by the seeder and how each one is laid out as a document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::store::{Document, Value};

pub mod collections {
    pub const CONFIGURATIONS: &str = "configurations";
    pub const USERS: &str = "users";
    pub const ITEMS: &str = "items";
    pub const BUNDLES: &str = "bundles";
    pub const RESERVATIONS: &str = "reservations";
    pub const TRANSPORT: &str = "transport";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Table,
    Chair,
    Stage,
    Decoration,
    Tent,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Table => "table",
            ItemCategory::Chair => "chair",
            ItemCategory::Stage => "stage",
            ItemCategory::Decoration => "decoration",
            ItemCategory::Tent => "tent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Confirmed,
    Pending,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Pending => "pending",
        }
    }
}

/// A configuration document stored under a fixed key.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub key: &'static str,
    pub settings: Document,
}

impl Configuration {
    pub fn to_document(&self) -> Document {
        self.settings
            .clone()
            .with("updatedAt", Value::ServerTimestamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserSeed {
    pub email: &'static str,
    pub name: &'static str,
    pub phone: &'static str,
    pub address: &'static str,
    pub role: Role,
}

impl UserSeed {
    pub fn to_profile_document(&self) -> Document {
        Document::new()
            .with("email", self.email)
            .with("name", self.name)
            .with("phone", self.phone)
            .with("address", self.address)
            .with("role", self.role.as_str())
            .with("registeredAt", Value::ServerTimestamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub category: ItemCategory,
    pub daily_rate: f64,
    pub total_quantity: u32,
    pub images: &'static [&'static str],
    pub features: &'static [&'static str],
}

impl ItemSeed {
    /// New stock starts fully available.
    pub fn to_document(&self) -> Document {
        Document::new()
            .with("name", self.name)
            .with("description", self.description)
            .with("category", self.category.as_str())
            .with("dailyRate", self.daily_rate)
            .with("totalQuantity", self.total_quantity)
            .with("availableQuantity", self.total_quantity)
            .with("images", self.images.to_vec())
            .with("features", self.features.to_vec())
            .with("status", "available")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BundleSeed {
    pub name: &'static str,
    pub description: &'static str,
    /// Item name and quantity pairs.
    pub items: &'static [(&'static str, u32)],
    pub bundle_rate: f64,
    pub available: bool,
    pub images: &'static [&'static str],
    pub event_types: &'static [&'static str],
    pub capacity: &'static str,
}

impl BundleSeed {
    /// `item_quantities` maps stored item ids to quantities.
    pub fn to_document(&self, item_quantities: BTreeMap<String, u32>) -> Document {
        let items: Document = item_quantities
            .into_iter()
            .map(|(id, quantity)| (id, Value::from(quantity)))
            .collect();
        Document::new()
            .with("name", self.name)
            .with("description", self.description)
            .with("items", items)
            .with("bundleRate", self.bundle_rate)
            .with("available", self.available)
            .with("images", self.images.to_vec())
            .with("eventTypes", self.event_types.to_vec())
            .with("capacity", self.capacity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub address: String,
    pub distance_km: f64,
    pub transport_cost: f64,
    pub contact: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub customer_id: String,
    pub bundle_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: ReservationStatus,
    pub total_cost: f64,
    pub deposit_paid: bool,
    pub contract_signed: bool,
    pub delivery: Option<Delivery>,
    pub notes: String,
}

impl Reservation {
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new()
            .with("customerId", self.customer_id.as_str())
            .with("bundleId", self.bundle_id.as_str())
            .with("startDate", self.start)
            .with("endDate", self.end)
            .with("status", self.status.as_str())
            .with("totalCost", self.total_cost)
            .with("depositPaid", self.deposit_paid)
            .with("contractSigned", self.contract_signed)
            .with("createdAt", Value::ServerTimestamp)
            .with("notes", self.notes.as_str());
        if let Some(delivery) = &self.delivery {
            doc.insert("deliveryAddress", delivery.address.as_str());
            doc.insert("distanceKm", delivery.distance_km);
            doc.insert("transportCost", delivery.transport_cost);
            doc.insert("deliveryContact", delivery.contact.as_str());
            doc.insert("deliveryTime", delivery.time.as_str());
        }
        doc
    }

    /// The transport record owed for this reservation, if it is delivered.
    /// Needs both an address and a non-zero transport cost.
    pub fn transport(&self, reservation_id: &str) -> Option<Transport> {
        let delivery = self.delivery.as_ref()?;
        if delivery.address.trim().is_empty() || delivery.transport_cost <= 0.0 {
            return None;
        }
        Some(Transport {
            reservation_id: reservation_id.to_string(),
            delivery_address: delivery.address.clone(),
            distance_km: delivery.distance_km,
            transport_cost: delivery.transport_cost,
            estimated_delivery: self.start,
            delivery_contact: delivery.contact.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub reservation_id: String,
    pub delivery_address: String,
    pub distance_km: f64,
    pub transport_cost: f64,
    pub estimated_delivery: DateTime<Utc>,
    pub delivery_contact: String,
}

impl Transport {
    /// Written unassigned and pending; dispatch fills the vehicle in later.
    pub fn to_document(&self) -> Document {
        Document::new()
            .with("reservationId", self.reservation_id.as_str())
            .with("deliveryAddress", self.delivery_address.as_str())
            .with("distanceKm", self.distance_km)
            .with("transportCost", self.transport_cost)
            .with("assignedVehicle", Value::Null)
            .with("status", "pending")
            .with("createdAt", Value::ServerTimestamp)
            .with("estimatedDelivery", self.estimated_delivery)
            .with("deliveryContact", self.delivery_contact.as_str())
    }
}
