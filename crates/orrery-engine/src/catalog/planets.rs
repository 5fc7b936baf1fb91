//! Built-in planet catalog.
//!
//! Radii and distances are in scene units and deliberately not to scale:
//! the diagram favors readability over astronomy.

use crate::api::types::{BodyId, Rgb};
use crate::catalog::BodyDefinition;

struct PlanetRow {
    id: &'static str,
    name: &'static str,
    radius: f32,
    distance: f32,
    color: u32,
    speed: f32,
    rotation: f32,
    rings: bool,
}

const PLANETS: [PlanetRow; 8] = [
    PlanetRow { id: "mercury", name: "Mercury", radius: 0.38, distance: 8.0,  color: 0xa6a6a6, speed: 0.04,   rotation: 0.02,   rings: false },
    PlanetRow { id: "venus",   name: "Venus",   radius: 0.95, distance: 11.0, color: 0xd4b48c, speed: 0.015,  rotation: -0.005, rings: false },
    PlanetRow { id: "earth",   name: "Earth",   radius: 1.0,  distance: 14.0, color: 0x2e86de, speed: 0.01,   rotation: 0.03,   rings: false },
    PlanetRow { id: "mars",    name: "Mars",    radius: 0.53, distance: 17.0, color: 0xc1440e, speed: 0.008,  rotation: 0.028,  rings: false },
    PlanetRow { id: "jupiter", name: "Jupiter", radius: 11.2, distance: 23.0, color: 0xd2b48c, speed: 0.002,  rotation: 0.07,   rings: false },
    PlanetRow { id: "saturn",  name: "Saturn",  radius: 9.45, distance: 29.0, color: 0xe5c97b, speed: 0.0018, rotation: 0.06,   rings: true  },
    PlanetRow { id: "uranus",  name: "Uranus",  radius: 4.0,  distance: 34.0, color: 0x7fd1d8, speed: 0.001,  rotation: 0.05,   rings: false },
    PlanetRow { id: "neptune", name: "Neptune", radius: 3.9,  distance: 39.0, color: 0x4169e1, speed: 0.0008, rotation: 0.045,  rings: false },
];

pub(crate) fn planet_definitions() -> Vec<BodyDefinition> {
    PLANETS
        .iter()
        .map(|p| BodyDefinition {
            id: BodyId::new(p.id),
            name: p.name.to_owned(),
            radius: p.radius,
            distance: p.distance,
            color: Rgb::from_hex(p.color),
            speed: p.speed,
            rotation: p.rotation,
            rings: p.rings,
        })
        .collect()
}
