//! Body catalog: the static, ordered list of orbiting bodies.
//!
//! Used only to bootstrap the scene graph; the render loop never reads it.

mod planets;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, Rgb};
use crate::error::CatalogError;

/// Descriptive record for one orbiting body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDefinition {
    pub id: BodyId,
    pub name: String,
    /// Mean visual radius in scene units.
    pub radius: f32,
    /// Orbital distance from the central body (circular orbit).
    pub distance: f32,
    pub color: Rgb,
    /// Angular speed, radians per simulated second (the orbit phase doubles it).
    pub speed: f32,
    /// Self-rotation added per frame (radians).
    pub rotation: f32,
    #[serde(default)]
    pub rings: bool,
}

/// Ordered, validated collection of bodies. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    bodies: Vec<BodyDefinition>,
}

impl Catalog {
    /// Validate and wrap a list of bodies. Order is preserved.
    pub fn new(bodies: Vec<BodyDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(bodies.len());
        for body in &bodies {
            if !seen.insert(body.id.as_str()) {
                return Err(CatalogError::DuplicateId(body.id.0.clone()));
            }
            if !(body.radius.is_finite() && body.radius > 0.0) {
                return Err(CatalogError::InvalidBody {
                    id: body.id.0.clone(),
                    reason: "radius must be positive and finite",
                });
            }
            if !(body.distance.is_finite() && body.distance > 0.0) {
                return Err(CatalogError::InvalidBody {
                    id: body.id.0.clone(),
                    reason: "distance must be positive and finite",
                });
            }
            if !body.speed.is_finite() || !body.rotation.is_finite() {
                return Err(CatalogError::InvalidBody {
                    id: body.id.0.clone(),
                    reason: "speed and rotation must be finite",
                });
            }
        }
        Ok(Self { bodies })
    }

    /// Parse a JSON array of body definitions.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let bodies: Vec<BodyDefinition> = serde_json::from_str(json)?;
        Self::new(bodies)
    }

    /// The eight planets, mercury through neptune.
    pub fn default_planets() -> Self {
        Self {
            bodies: planets::planet_definitions(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyDefinition> {
        self.bodies.iter()
    }

    pub fn get(&self, id: &BodyId) -> Option<&BodyDefinition> {
        self.bodies.iter().find(|b| &b.id == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::default_planets()
    }
}
