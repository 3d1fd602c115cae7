//! Boundary validation for clock creation requests.
//!
//! The registry and render engine trust every [`ClockEntity`] they are
//! given. [`CreateClockRequest::validate`] is where untrusted input (a
//! console line, a command from a host) is checked and turned into one:
//! the name must be non-blank, the radius must be in range, and both hand
//! materials must be paintable according to a [`MaterialCatalog`].

use clockface_types::{BlockPos, ClockEntity, Facing, Material, WorldId};

/// Largest accepted clock radius, in voxels.
pub const MAX_RADIUS: i64 = 1024;

/// Block types accepted by [`SolidBlockCatalog::default`].
const DEFAULT_SOLID_BLOCKS: &[&str] = &[
    "STONE",
    "COBBLESTONE",
    "SMOOTH_STONE",
    "STONE_BRICKS",
    "DEEPSLATE",
    "BLACKSTONE",
    "OBSIDIAN",
    "BEDROCK",
    "SANDSTONE",
    "QUARTZ_BLOCK",
    "BRICKS",
    "OAK_PLANKS",
    "SPRUCE_PLANKS",
    "BIRCH_PLANKS",
    "DARK_OAK_PLANKS",
    "IRON_BLOCK",
    "GOLD_BLOCK",
    "DIAMOND_BLOCK",
    "EMERALD_BLOCK",
    "LAPIS_BLOCK",
    "REDSTONE_BLOCK",
    "COAL_BLOCK",
    "COPPER_BLOCK",
    "NETHERITE_BLOCK",
    "WHITE_WOOL",
    "BLACK_WOOL",
    "RED_WOOL",
    "BLUE_WOOL",
    "WHITE_CONCRETE",
    "BLACK_CONCRETE",
    "GLOWSTONE",
    "SEA_LANTERN",
];

/// Errors that reject a creation request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The clock name is empty or whitespace.
    #[error("clock name must not be blank")]
    EmptyName,

    /// The radius is below 1 or above [`MAX_RADIUS`].
    #[error("radius {radius} is outside 1..={max}", max = MAX_RADIUS)]
    InvalidRadius {
        /// The rejected radius.
        radius: i64,
    },

    /// A hand material is not a solid placeable block.
    #[error("{hand} hand material {material} is not a solid block")]
    InvalidMaterial {
        /// Which hand the material was given for.
        hand: &'static str,
        /// The rejected material.
        material: Material,
    },
}

/// Decides which block types may be painted as clock hands.
pub trait MaterialCatalog {
    /// Whether `material` is a solid block that can be placed.
    fn is_paintable(&self, material: &Material) -> bool;
}

impl<F> MaterialCatalog for F
where
    F: Fn(&Material) -> bool,
{
    fn is_paintable(&self, material: &Material) -> bool {
        self(material)
    }
}

/// A fixed allow-list of solid block types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidBlockCatalog {
    /// Accepted materials.
    solids: Vec<Material>,
}

impl SolidBlockCatalog {
    /// Create a catalog accepting exactly `solids`.
    pub fn new<I>(solids: I) -> Self
    where
        I: IntoIterator<Item = Material>,
    {
        Self {
            solids: solids.into_iter().filter(|m| !m.is_air()).collect(),
        }
    }
}

impl Default for SolidBlockCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_SOLID_BLOCKS.iter().map(|name| Material::new(name)))
    }
}

impl MaterialCatalog for SolidBlockCatalog {
    fn is_paintable(&self, material: &Material) -> bool {
        self.solids.contains(material)
    }
}

/// An unvalidated request to create a clock.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateClockRequest {
    /// Clock name.
    pub name: String,
    /// World the clock is placed in.
    pub world: WorldId,
    /// Anchor voxel.
    pub position: BlockPos,
    /// Look direction of the requester in degrees; fixes the facing.
    pub yaw: f64,
    /// Hour hand block type.
    pub hour_hand_material: Material,
    /// Minute hand block type.
    pub minute_hand_material: Material,
    /// Face radius as given.
    pub radius: i64,
}

impl CreateClockRequest {
    /// Check the request and build the clock it describes.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::EmptyName`] for a blank name,
    /// [`RequestError::InvalidRadius`] for a radius outside
    /// `1..=MAX_RADIUS`, and [`RequestError::InvalidMaterial`] when the
    /// catalog rejects either hand material.
    pub fn validate(self, catalog: &dyn MaterialCatalog) -> Result<ClockEntity, RequestError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RequestError::EmptyName);
        }
        let radius = u32::try_from(self.radius)
            .ok()
            .filter(|r| (1..=MAX_RADIUS).contains(&i64::from(*r)))
            .ok_or(RequestError::InvalidRadius { radius: self.radius })?;
        if !catalog.is_paintable(&self.hour_hand_material) {
            return Err(RequestError::InvalidMaterial {
                hand: "hour",
                material: self.hour_hand_material,
            });
        }
        if !catalog.is_paintable(&self.minute_hand_material) {
            return Err(RequestError::InvalidMaterial {
                hand: "minute",
                material: self.minute_hand_material,
            });
        }
        Ok(ClockEntity::new(
            name,
            self.world,
            self.position,
            Facing::from_yaw(self.yaw),
            self.hour_hand_material,
            self.minute_hand_material,
            radius,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn request() -> CreateClockRequest {
        CreateClockRequest {
            name: "spawn".to_owned(),
            world: WorldId::new(),
            position: BlockPos::new(0, 64, 0),
            yaw: 0.0,
            hour_hand_material: Material::new("stone"),
            minute_hand_material: Material::new("iron_block"),
            radius: 5,
        }
    }

    #[test]
    fn valid_request_builds_clock() {
        let clock = request().validate(&SolidBlockCatalog::default()).unwrap();
        assert_eq!(clock.name(), "spawn");
        assert_eq!(clock.radius(), 5);
        assert_eq!(clock.hour_hand_material().as_str(), "STONE");
    }

    #[test]
    fn yaw_fixes_facing() {
        let mut req = request();
        req.yaw = 90.0;
        let clock = req.validate(&SolidBlockCatalog::default()).unwrap();
        assert_eq!(clock.facing().quarter_turns(), 1);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut req = request();
        req.name = "   ".to_owned();
        assert_eq!(
            req.validate(&SolidBlockCatalog::default()),
            Err(RequestError::EmptyName)
        );
    }

    #[test]
    fn radius_bounds() {
        for radius in [0, -3, MAX_RADIUS + 1, i64::MAX] {
            let mut req = request();
            req.radius = radius;
            assert_eq!(
                req.validate(&SolidBlockCatalog::default()),
                Err(RequestError::InvalidRadius { radius })
            );
        }
        let mut req = request();
        req.radius = MAX_RADIUS;
        assert!(req.validate(&SolidBlockCatalog::default()).is_ok());
    }

    #[test]
    fn non_solid_materials_are_rejected() {
        let mut req = request();
        req.minute_hand_material = Material::new("water");
        let err = req.validate(&SolidBlockCatalog::default()).unwrap_err();
        assert!(matches!(err, RequestError::InvalidMaterial { hand: "minute", .. }));

        let mut req = request();
        req.hour_hand_material = Material::air();
        let err = req.validate(&SolidBlockCatalog::default()).unwrap_err();
        assert!(matches!(err, RequestError::InvalidMaterial { hand: "hour", .. }));
    }

    #[test]
    fn closures_act_as_catalogs() {
        let only_gold = |m: &Material| m.as_str() == "GOLD_BLOCK";
        let mut req = request();
        req.hour_hand_material = Material::new("gold_block");
        req.minute_hand_material = Material::new("gold_block");
        assert!(req.validate(&only_gold).is_ok());
        assert!(request().validate(&only_gold).is_err());
    }
}
