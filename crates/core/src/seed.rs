//! Initial catalogue inserted into an empty products table.
//!
//! Images live in the product image container and are served by this
//! service under `/images/{filename}`.

use serde_json::{json, Value};

use crate::types::DbId;

/// One entry of the seed catalogue.
#[derive(Debug, Clone, Copy)]
pub struct SeedProduct {
    pub id: DbId,
    pub name: &'static str,
    pub price: f64,
    pub description: &'static str,
    pub image: &'static str,
    pub category: &'static str,
    pub brand: &'static str,
}

/// The seed catalogue, ordered by id.
pub const SEED_PRODUCTS: [SeedProduct; 10] = [
    SeedProduct {
        id: 1,
        name: "UltraSlim X1 Laptop",
        price: 1299.99,
        description: "Experience peak performance with the UltraSlim X1. Featuring a 4K InfinityEdge display, i9 processor, and all-day battery life for professionals on the go.",
        image: "/images/laptop_x1.jpg",
        category: "Computers & Tablets",
        brand: "Apex",
    },
    SeedProduct {
        id: 2,
        name: "NoiseGuard Pro Headphones",
        price: 349.99,
        description: "Immerse yourself in music with industry-leading noise cancellation. The NoiseGuard Pro offers 30 hours of listening time and plush ear cushions for comfort.",
        image: "/images/headphones_pro.jpg",
        category: "Audio",
        brand: "Aura",
    },
    SeedProduct {
        id: 3,
        name: "Visionary 4K Monitor",
        price: 499.99,
        description: "See every detail with the Visionary 27-inch 4K monitor. Perfect for designers and gamers, featuring HDR support and a 144Hz refresh rate.",
        image: "/images/monitor_4k.jpg",
        category: "Computer Accessories",
        brand: "OptiMax",
    },
    SeedProduct {
        id: 4,
        name: "GamerZ Console 5",
        price: 499.99,
        description: "Next-gen gaming is here. Play games in stunning 4K at 120fps with ray tracing technology and ultra-fast load times.",
        image: "/images/console_5.jpg",
        category: "Video Games",
        brand: "Nexus",
    },
    SeedProduct {
        id: 5,
        name: "SmartWatch Series 7",
        price: 399.99,
        description: "Track your fitness, monitor your health, and stay connected without your phone. Features an always-on Retina display and crack-resistant crystal.",
        image: "/images/smartwatch_7.jpg",
        category: "Wearable Technology",
        brand: "Vital",
    },
    SeedProduct {
        id: 6,
        name: "BlueBeat Portable Speaker",
        price: 129.99,
        description: "Take the party anywhere with the BlueBeat. Waterproof, dustproof, and drop-proof, delivering powerful 360-degree sound.",
        image: "/images/speaker_blue.jpg",
        category: "Audio",
        brand: "Roam",
    },
    SeedProduct {
        id: 7,
        name: "ProTab Air Tablet",
        price: 599.99,
        description: "Power and portability combined. The ProTab Air features the M1 chip, a stunning Liquid Retina display, and compatibility with the smart pencil.",
        image: "/images/tablet_air.jpg",
        category: "Computers & Tablets",
        brand: "Forge",
    },
    SeedProduct {
        id: 8,
        name: "MechKey RGB Keyboard",
        price: 149.99,
        description: "Dominate the competition with the MechKey RGB. Features responsive mechanical switches, customizable macro keys, and vibrant backlighting.",
        image: "/images/keyboard_rgb.jpg",
        category: "Computer Accessories",
        brand: "Zenith",
    },
    SeedProduct {
        id: 9,
        name: "CineView 65\" OLED TV",
        price: 1999.99,
        description: "Experience true blacks and rich colors with the CineView OLED. Smart TV capabilities built-in with voice control and AI picture enhancement.",
        image: "/images/tv_oled.jpg",
        category: "TV & Home Theater",
        brand: "Luminos",
    },
    SeedProduct {
        id: 10,
        name: "Bolt External SSD 1TB",
        price: 159.99,
        description: "Transfer files in seconds with the Bolt SSD. Rugged design, USB-C connectivity, and read speeds up to 1050MB/s.",
        image: "/images/ssd_bolt.jpg",
        category: "Computer Accessories",
        brand: "Velocity",
    },
];

/// The seed catalogue as JSON documents ready for insertion.
pub fn seed_products() -> Vec<Value> {
    SEED_PRODUCTS
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "price": p.price,
                "description": p.description,
                "image": p.image,
                "category": p.category,
                "brand": p.brand,
            })
        })
        .collect()
}
