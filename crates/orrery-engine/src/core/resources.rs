use crate::components::mesh::{Geometry, Material};

/// Handle to a geometry in a [`ResourceLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(pub u32);

/// Handle to a material in a [`ResourceLedger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Counts returned by [`ResourceLedger::release_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReleaseReport {
    pub geometries: usize,
    pub materials: usize,
}

/// Owner of every geometry and material the scene builder creates.
///
/// Surfaces upload from here on prepare; teardown releases everything in one
/// call so acquisitions and releases can be counted.
pub struct ResourceLedger {
    geometries: Vec<Option<Geometry>>,
    materials: Vec<Option<Material>>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self {
            geometries: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        let id = GeometryId(self.geometries.len() as u32);
        self.geometries.push(Some(geometry));
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(Some(material));
        id
    }

    /// Look up a geometry. `None` after release.
    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Look up a material. `None` after release.
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Iterate live materials with their handles.
    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.as_ref().map(|m| (MaterialId(i as u32), m)))
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.iter().filter(|g| g.is_some()).count()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.iter().filter(|m| m.is_some()).count()
    }

    /// Drop every live resource. Handles stay allocated but resolve to `None`.
    /// Calling again releases nothing.
    pub fn release_all(&mut self) -> ReleaseReport {
        let report = ReleaseReport {
            geometries: self.live_geometries(),
            materials: self.live_materials(),
        };
        self.geometries.iter_mut().for_each(|g| *g = None);
        self.materials.iter_mut().for_each(|m| *m = None);
        report
    }
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new()
    }
}
