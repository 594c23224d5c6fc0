//! The MobiEvent sample data.

use crate::{
    models::{BundleSeed, Configuration, ItemCategory, ItemSeed, ReservationStatus, Role, UserSeed},
    store::Document,
};

/// Delivery charge per kilometre, also used to price the sample deliveries.
pub const PER_KM_RATE: f64 = 10.0;

pub fn configurations() -> Vec<Configuration> {
    vec![
        Configuration {
            key: "rates",
            settings: Document::new()
                .with("perKmRate", PER_KM_RATE)
                .with("depositPercentage", 30_i64)
                .with("minRescheduleDays", 2_i64)
                .with("damageFee", 50.0),
        },
        Configuration {
            key: "policies",
            settings: Document::new()
                .with("maxRentalDays", 30_i64)
                .with("deliveryHours", "9:00-18:00")
                .with("pickupHours", "9:00-18:00")
                .with("cancellationPolicy", "Cancelacion con 48 horas de anticipacion"),
        },
        Configuration {
            key: "itemRates",
            settings: Document::new()
                .with(ItemCategory::Table.as_str(), 15.0)
                .with(ItemCategory::Chair.as_str(), 5.0)
                .with(ItemCategory::Stage.as_str(), 50.0)
                .with(ItemCategory::Decoration.as_str(), 20.0)
                .with(ItemCategory::Tent.as_str(), 100.0),
        },
        Configuration {
            key: "company",
            settings: Document::new()
                .with("name", "MobiEvent S.A.")
                .with("address", "Av. Principal 123, Lima, Peru")
                .with("phone", "+51 123 456 789")
                .with("email", "info@mobievent.com")
                .with("officeHours", "Lunes a Viernes 8:00-18:00"),
        },
    ]
}

pub const USERS: [UserSeed; 4] = [
    UserSeed {
        email: "cliente1@test.com",
        name: "Juan Perez",
        phone: "+51 987 654 321",
        address: "Calle Los Olivos 456, Miraflores, Lima",
        role: Role::Customer,
    },
    UserSeed {
        email: "cliente2@test.com",
        name: "Maria Lopez",
        phone: "+51 987 123 456",
        address: "Av. Arequipa 789, San Isidro, Lima",
        role: Role::Customer,
    },
    UserSeed {
        email: "empleado@test.com",
        name: "Carlos Rodriguez",
        phone: "+51 987 789 123",
        address: "Jr. Union 321, Lima Centro",
        role: Role::Staff,
    },
    UserSeed {
        email: "admin@test.com",
        name: "Ana Garcia",
        phone: "+51 987 456 789",
        address: "Av. Javier Prado 654, San Borja",
        role: Role::Admin,
    },
];

pub const ROUND_TABLE: &str = "Mesa Redonda 1.5m";
pub const RECTANGULAR_TABLE: &str = "Mesa Rectangular 2m";
pub const BANQUET_CHAIR: &str = "Silla de Banquete";
pub const FOLDING_CHAIR: &str = "Silla Plegable Plastica";
pub const MODULAR_STAGE: &str = "Escenario Modular 3x3m";
pub const DJ_PLATFORM: &str = "Tarima para DJ";
pub const FLORAL_CENTERPIECE: &str = "Centro de Mesa Floral";
pub const LED_CURTAIN: &str = "Cortina de Luces LED";
pub const WHITE_TENT: &str = "Carpa 6x6m Blanca";

pub const ITEMS: [ItemSeed; 9] = [
    ItemSeed {
        name: ROUND_TABLE,
        description: "Mesa redonda para 8 personas, diametro 1.5 metros",
        category: ItemCategory::Table,
        daily_rate: 15.0,
        total_quantity: 50,
        images: &["https://example.com/mesa1.jpg"],
        features: &["Acero inoxidable", "Resistente al agua", "Facil de limpiar"],
    },
    ItemSeed {
        name: RECTANGULAR_TABLE,
        description: "Mesa rectangular para 10 personas, 2 metros de largo",
        category: ItemCategory::Table,
        daily_rate: 18.0,
        total_quantity: 30,
        images: &["https://example.com/mesa2.jpg"],
        features: &["Madera tratada", "Patas plegables", "Transporte facil"],
    },
    ItemSeed {
        name: BANQUET_CHAIR,
        description: "Silla elegante para eventos formales",
        category: ItemCategory::Chair,
        daily_rate: 5.0,
        total_quantity: 200,
        images: &["https://example.com/silla1.jpg"],
        features: &["Tela resistente", "Estructura metalica", "Apoyabrazos"],
    },
    ItemSeed {
        name: FOLDING_CHAIR,
        description: "Silla practica para eventos informales",
        category: ItemCategory::Chair,
        daily_rate: 3.0,
        total_quantity: 150,
        images: &["https://example.com/silla2.jpg"],
        features: &["Plastico resistente", "Plegable", "Liviana"],
    },
    ItemSeed {
        name: MODULAR_STAGE,
        description: "Escenario modular para presentaciones",
        category: ItemCategory::Stage,
        daily_rate: 50.0,
        total_quantity: 10,
        images: &["https://example.com/escenario1.jpg"],
        features: &["Modular", "Barandas de seguridad", "Iluminacion integrada"],
    },
    ItemSeed {
        name: DJ_PLATFORM,
        description: "Tarima especial para DJs y musica",
        category: ItemCategory::Stage,
        daily_rate: 40.0,
        total_quantity: 5,
        images: &["https://example.com/escenario2.jpg"],
        features: &["Antivibratoria", "Conexiones electricas", "Resistente"],
    },
    ItemSeed {
        name: FLORAL_CENTERPIECE,
        description: "Arreglo floral para centro de mesa",
        category: ItemCategory::Decoration,
        daily_rate: 20.0,
        total_quantity: 100,
        images: &["https://example.com/decoracion1.jpg"],
        features: &["Flores artificiales", "Base estable", "Reutilizable"],
    },
    ItemSeed {
        name: LED_CURTAIN,
        description: "Cortina decorativa con luces LED",
        category: ItemCategory::Decoration,
        daily_rate: 25.0,
        total_quantity: 20,
        images: &["https://example.com/decoracion2.jpg"],
        features: &["LED RGB", "Control remoto", "10 metros de largo"],
    },
    ItemSeed {
        name: WHITE_TENT,
        description: "Carpa para eventos al aire libre",
        category: ItemCategory::Tent,
        daily_rate: 100.0,
        total_quantity: 8,
        images: &["https://example.com/carpa1.jpg"],
        features: &["Impermeable", "Proteccion UV", "Facil armado"],
    },
];

pub const BUNDLES: [BundleSeed; 4] = [
    BundleSeed {
        name: "Lote Fiesta Basica",
        description: "Ideal para fiestas pequeñas y familiares",
        items: &[(ROUND_TABLE, 10), (BANQUET_CHAIR, 50)],
        bundle_rate: 300.0,
        available: true,
        images: &["https://example.com/lote1.jpg"],
        event_types: &["familiar", "pequeno"],
        capacity: "50 personas",
    },
    BundleSeed {
        name: "Lote Bodas Elegante",
        description: "Perfecto para bodas y eventos formales",
        items: &[
            (RECTANGULAR_TABLE, 20),
            (FOLDING_CHAIR, 100),
            (MODULAR_STAGE, 1),
            (FLORAL_CENTERPIECE, 30),
        ],
        bundle_rate: 800.0,
        available: true,
        images: &["https://example.com/lote2.jpg"],
        event_types: &["boda", "formal", "grande"],
        capacity: "120 personas",
    },
    BundleSeed {
        name: "Lote Corporativo",
        description: "Para eventos empresariales y conferencias",
        items: &[
            (ROUND_TABLE, 15),
            (BANQUET_CHAIR, 75),
            (MODULAR_STAGE, 1),
            (DJ_PLATFORM, 1),
        ],
        bundle_rate: 650.0,
        available: true,
        images: &["https://example.com/lote3.jpg"],
        event_types: &["corporativo", "conferencia"],
        capacity: "75 personas",
    },
    BundleSeed {
        name: "Lote Fiesta Infantil",
        description: "Divertido y colorido para fiestas infantiles",
        items: &[
            (ROUND_TABLE, 5),
            (FOLDING_CHAIR, 30),
            (FLORAL_CENTERPIECE, 10),
            (LED_CURTAIN, 2),
        ],
        bundle_rate: 250.0,
        available: true,
        images: &["https://example.com/lote4.jpg"],
        event_types: &["infantil", "colorido", "pequeno"],
        capacity: "30 niños",
    },
];

/// Where a reservation's dates are counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAnchor {
    /// The moment the seeder runs.
    Now,
    /// Midnight UTC of the day the seeder runs, not the host's local midnight.
    StartOfDay,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryPlan {
    pub address: &'static str,
    pub distance_km: f64,
    pub contact: &'static str,
    pub time: &'static str,
}

impl DeliveryPlan {
    pub fn transport_cost(&self) -> f64 {
        self.distance_km * PER_KM_RATE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReservationPlan {
    /// Position in the bundle read-back the reservation books.
    pub bundle_slot: usize,
    pub anchor: DateAnchor,
    pub start_offset_days: i64,
    pub end_offset_days: i64,
    pub status: ReservationStatus,
    pub total_cost: f64,
    pub deposit_paid: bool,
    pub contract_signed: bool,
    pub delivery: Option<DeliveryPlan>,
    pub notes: &'static str,
}

pub const RESERVATIONS: [ReservationPlan; 2] = [
    ReservationPlan {
        bundle_slot: 0,
        anchor: DateAnchor::Now,
        start_offset_days: 7,
        end_offset_days: 9,
        status: ReservationStatus::Confirmed,
        total_cost: 650.0,
        deposit_paid: true,
        contract_signed: true,
        delivery: Some(DeliveryPlan {
            address: "Av. Salaverry 1234, Jesus Maria, Lima",
            distance_km: 12.5,
            contact: "+51 987 654 321",
            time: "14:00",
        }),
        notes: "Entrega en el salon de eventos \"Los Jardines\"",
    },
    ReservationPlan {
        bundle_slot: 1,
        anchor: DateAnchor::StartOfDay,
        start_offset_days: 14,
        end_offset_days: 16,
        status: ReservationStatus::Pending,
        total_cost: 800.0,
        deposit_paid: false,
        contract_signed: false,
        delivery: None,
        notes: "Por confirmar direccion exacta",
    },
];
