//! Conversion of resources and productions into credits.
//!
//! Every quantity that can appear on a card is reduced to credits, the
//! game's main currency. Two disjoint namespaces exist:
//!
//! - **Resources** ([`Resource`], written in lower case on cards) are gained
//!   once, e.g. `2 plant`.
//! - **Productions** ([`Production`], written in upper case) pay out every
//!   remaining generation, e.g. `1 PLANT`.
//!
//! # Standard projects
//!
//! Standard project costs anchor the scale:
//!
//! | Project  | Cost                  |
//! |----------|-----------------------|
//! | temp     | 14                    |
//! | ocean    | 18                    |
//! | greenery | 23                    |
//! | city     | 25 - (income + 1)     |
//!
//! Plants and heat are worth one eighth of a greenery and a temperature step
//! respectively, since eight of them convert into one.
//!
//! # Tile bonuses
//!
//! Placing a tile collects the resources printed on its area. The expected
//! bonus of a land or ocean tile is the average over all areas of the map
//! (see [`MapLayout::THARSIS`]).

use std::fmt;

use crate::context::GenerationContext;

/// Cost of the temperature standard project.
pub const TEMP: f64 = 14.0;
/// Cost of the ocean standard project.
pub const OCEAN: f64 = 18.0;
/// Cost of the greenery standard project.
pub const GREENERY: f64 = 23.0;
/// Base cost of the city standard project, before income is subtracted.
pub const CITY: f64 = 25.0;

const CREDIT: f64 = 1.0;
const STEEL: f64 = 2.0;
const TITANIUM: f64 = 3.0;
const PLANT: f64 = GREENERY / 8.0;
const HEAT: f64 = TEMP / 8.0;
// one energy trades like one titanium
const ENERGY: f64 = 3.0;
// 3 to buy the card plus 1 from selling it
const DRAW: f64 = 4.0;

/// Instantaneous resource (lower-case token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Credit,
    Steel,
    Titanium,
    Plant,
    Heat,
    Energy,
    Draw,
    Temp,
    Ocean,
    Greenery,
    Oxygen,
    City,
    TerraformRating,
    VictoryPoint,
    Microbe,
    Animal,
}

impl Resource {
    pub const ALL: [Resource; 16] = [
        Resource::Credit,
        Resource::Steel,
        Resource::Titanium,
        Resource::Plant,
        Resource::Heat,
        Resource::Energy,
        Resource::Draw,
        Resource::Temp,
        Resource::Ocean,
        Resource::Greenery,
        Resource::Oxygen,
        Resource::City,
        Resource::TerraformRating,
        Resource::VictoryPoint,
        Resource::Microbe,
        Resource::Animal,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let resource = match name {
            "credit" => Resource::Credit,
            "steel" => Resource::Steel,
            "titanium" => Resource::Titanium,
            "plant" => Resource::Plant,
            "heat" => Resource::Heat,
            "energy" => Resource::Energy,
            "draw" => Resource::Draw,
            "temp" => Resource::Temp,
            "ocean" => Resource::Ocean,
            "greenery" => Resource::Greenery,
            "oxygen" => Resource::Oxygen,
            "city" => Resource::City,
            "TR" | "tr" => Resource::TerraformRating,
            "vp" | "VP" => Resource::VictoryPoint,
            "microbe" => Resource::Microbe,
            "animal" => Resource::Animal,
            _ => return None,
        };
        Some(resource)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Resource::Credit => "credit",
            Resource::Steel => "steel",
            Resource::Titanium => "titanium",
            Resource::Plant => "plant",
            Resource::Heat => "heat",
            Resource::Energy => "energy",
            Resource::Draw => "draw",
            Resource::Temp => "temp",
            Resource::Ocean => "ocean",
            Resource::Greenery => "greenery",
            Resource::Oxygen => "oxygen",
            Resource::City => "city",
            Resource::TerraformRating => "TR",
            Resource::VictoryPoint => "vp",
            Resource::Microbe => "microbe",
            Resource::Animal => "animal",
        }
    }

    /// Returns the credit value of resources whose worth does not depend on the game state.
    #[must_use]
    pub const fn fixed_value(self) -> Option<f64> {
        let value = match self {
            Resource::Credit => CREDIT,
            Resource::Steel => STEEL,
            Resource::Titanium => TITANIUM,
            Resource::Plant => PLANT,
            Resource::Heat => HEAT,
            Resource::Energy => ENERGY,
            Resource::Draw => DRAW,
            Resource::Temp => TEMP,
            Resource::Ocean => OCEAN,
            Resource::Greenery => GREENERY,
            Resource::Oxygen
            | Resource::City
            | Resource::TerraformRating
            | Resource::VictoryPoint
            | Resource::Microbe
            | Resource::Animal => return None,
        };
        Some(value)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

/// Production rate (upper-case token), paid out for every remaining generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Production {
    Credit,
    Steel,
    Titanium,
    Plant,
    Energy,
    Heat,
}

impl Production {
    pub const ALL: [Production; 6] = [
        Production::Credit,
        Production::Steel,
        Production::Titanium,
        Production::Plant,
        Production::Energy,
        Production::Heat,
    ];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let production = match name {
            "CREDIT" => Production::Credit,
            "STEEL" => Production::Steel,
            "TITANIUM" => Production::Titanium,
            "PLANT" => Production::Plant,
            "ENERGY" => Production::Energy,
            "HEAT" => Production::Heat,
            _ => return None,
        };
        Some(production)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Production::Credit => "CREDIT",
            Production::Steel => "STEEL",
            Production::Titanium => "TITANIUM",
            Production::Plant => "PLANT",
            Production::Energy => "ENERGY",
            Production::Heat => "HEAT",
        }
    }

    /// Credits one unit of this production yields over `income` remaining generations.
    ///
    /// Credit and plant production also pay out in the generation they are
    /// acquired, hence the `+ 1`.
    #[must_use]
    pub fn value(self, income: f64) -> f64 {
        match self {
            Production::Credit => CREDIT * (income + 1.0),
            Production::Steel => STEEL * income,
            Production::Titanium => TITANIUM * income,
            Production::Plant => PLANT * (income + 1.0),
            Production::Energy => ENERGY * income,
            Production::Heat => HEAT * income,
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

/// Any name a card expression can count: a resource or a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Resource(Resource),
    Production(Production),
}

impl Quantity {
    /// Resolves a token, using the case convention to pick the namespace.
    ///
    /// ```
    /// use tmvalue_engine::{Production, Quantity, Resource};
    ///
    /// assert_eq!(Quantity::from_name("plant"), Some(Quantity::Resource(Resource::Plant)));
    /// assert_eq!(Quantity::from_name("PLANT"), Some(Quantity::Production(Production::Plant)));
    /// assert_eq!(Quantity::from_name("Plant"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Production::from_name(name)
            .map(Quantity::Production)
            .or_else(|| Resource::from_name(name).map(Quantity::Resource))
    }

    /// Returns `true` when the value depends on the number of remaining generations.
    #[must_use]
    pub fn is_income_dependent(self) -> bool {
        matches!(
            self,
            Quantity::Production(_) | Quantity::Resource(Resource::City)
        )
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Resource(r) => fmt::Display::fmt(r, f),
            Quantity::Production(p) => fmt::Display::fmt(p, f),
        }
    }
}

/// Resource printed on a map area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusResource {
    Steel,
    Titanium,
    Plant,
    Draw,
}

impl BonusResource {
    const fn value(self) -> f64 {
        match self {
            BonusResource::Steel => STEEL,
            BonusResource::Titanium => TITANIUM,
            BonusResource::Plant => PLANT,
            BonusResource::Draw => DRAW,
        }
    }
}

/// A group of identical map areas and the bonus printed on each.
#[derive(Debug, Clone, Copy)]
pub struct AreaBonus {
    pub areas: u32,
    pub bonus: &'static [(u32, BonusResource)],
}

impl AreaBonus {
    fn total_value(&self) -> f64 {
        let per_area = self
            .bonus
            .iter()
            .map(|&(count, resource)| f64::from(count) * resource.value())
            .sum::<f64>();
        f64::from(self.areas) * per_area
    }
}

/// Placement bonuses of a game map.
///
/// Only areas where ordinary tiles can be placed are counted; off-world
/// areas and reserved areas are left out.
#[derive(Debug, Clone, Copy)]
pub struct MapLayout {
    pub land_areas: u32,
    pub land_bonuses: &'static [AreaBonus],
    pub ocean_areas: u32,
    pub ocean_bonuses: &'static [AreaBonus],
}

impl MapLayout {
    pub const THARSIS: MapLayout = MapLayout {
        land_areas: 48,
        land_bonuses: &[
            AreaBonus {
                areas: 3,
                bonus: &[(2, BonusResource::Steel)],
            },
            AreaBonus {
                areas: 3,
                bonus: &[(1, BonusResource::Draw)],
            },
            AreaBonus {
                areas: 3,
                bonus: &[(1, BonusResource::Steel)],
            },
            AreaBonus {
                areas: 1,
                bonus: &[(1, BonusResource::Plant), (1, BonusResource::Titanium)],
            },
            AreaBonus {
                areas: 10,
                bonus: &[(1, BonusResource::Plant)],
            },
            AreaBonus {
                areas: 7,
                bonus: &[(2, BonusResource::Plant)],
            },
            AreaBonus {
                areas: 1,
                bonus: &[(1, BonusResource::Titanium)],
            },
        ],
        ocean_areas: 12,
        ocean_bonuses: &[
            AreaBonus {
                areas: 1,
                bonus: &[(2, BonusResource::Steel)],
            },
            AreaBonus {
                areas: 1,
                bonus: &[(1, BonusResource::Draw)],
            },
            AreaBonus {
                areas: 3,
                bonus: &[(1, BonusResource::Plant)],
            },
            AreaBonus {
                areas: 4,
                bonus: &[(2, BonusResource::Plant)],
            },
            AreaBonus {
                areas: 1,
                bonus: &[(2, BonusResource::Titanium)],
            },
        ],
    };

    fn average(areas: u32, bonuses: &[AreaBonus]) -> f64 {
        bonuses.iter().map(AreaBonus::total_value).sum::<f64>() / f64::from(areas)
    }
}

/// Conversion rates from every resource and production to credits.
///
/// The rates are fixed for the whole game except where they depend on the
/// [`GenerationContext`] (city, oxygen, TR, VP and card resources). The tile
/// bonus averages are computed once from the map layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceModel {
    tile_land: f64,
    tile_ocean: f64,
}

impl Default for ResourceModel {
    fn default() -> Self {
        Self::new(&MapLayout::THARSIS)
    }
}

impl ResourceModel {
    #[must_use]
    pub fn new(layout: &MapLayout) -> Self {
        Self {
            tile_land: MapLayout::average(layout.land_areas, layout.land_bonuses),
            tile_ocean: MapLayout::average(layout.ocean_areas, layout.ocean_bonuses),
        }
    }

    /// Expected bonus collected when placing a tile on a land area.
    #[must_use]
    pub const fn tile_land(&self) -> f64 {
        self.tile_land
    }

    /// Expected bonus collected when placing a tile on an ocean area.
    #[must_use]
    pub const fn tile_ocean(&self) -> f64 {
        self.tile_ocean
    }

    /// Credit value of one unit of `resource` in the given context.
    #[must_use]
    pub fn resource_value(&self, resource: Resource, context: &GenerationContext) -> f64 {
        let vp = context.credits_per_vp();
        let tr = context.terraforming_rating_value();
        match resource {
            Resource::City => CITY - (context.income() + 1.0),
            Resource::Oxygen | Resource::TerraformRating => tr,
            Resource::VictoryPoint => vp,
            // Ants, Decomposers, GHG Producing Bacteria, Nitrite Reducing
            // Bacteria, Regolith Eaters, Tardigrades
            Resource::Microbe => {
                (vp / 2.0 + vp / 3.0 + TEMP / 2.0 + tr / 3.0 + GREENERY / 4.0 + vp / 4.0) / 6.0
            }
            // four animals at 1 VP each, four at 1 VP per 2 animals
            Resource::Animal => (4.0 * vp + 4.0 * (vp / 2.0)) / 8.0,
            Resource::Credit
            | Resource::Steel
            | Resource::Titanium
            | Resource::Plant
            | Resource::Heat
            | Resource::Energy
            | Resource::Draw
            | Resource::Temp
            | Resource::Ocean
            | Resource::Greenery => resource.fixed_value().unwrap_or_default(),
        }
    }

    /// Credit value of one unit of `production` over `income` remaining generations.
    #[must_use]
    pub fn production_value(&self, production: Production, income: f64) -> f64 {
        production.value(income)
    }

    /// Credit value of one unit of any quantity in the given context.
    #[must_use]
    pub fn quantity_value(&self, quantity: Quantity, context: &GenerationContext) -> f64 {
        match quantity {
            Quantity::Resource(resource) => self.resource_value(resource, context),
            Quantity::Production(production) => {
                self.production_value(production, context.income())
            }
        }
    }
}
