//! Behavioral taxonomy of composite definitions.
//!
//! A composite is classified by testing its parent class against fixed
//! anchor classes. `Interface` also accepts a naming convention on the
//! asset name when the ancestry does not settle it.

use std::fmt;
use std::str::FromStr;

use crate::class::{ClassDescriptor, ClassRegistry, RegistryExt};

pub const ACTOR: &str = "/Script/Engine.Actor";
pub const USER_WIDGET: &str = "/Script/UMG.UserWidget";
pub const ANIM_INSTANCE: &str = "/Script/Engine.AnimInstance";
pub const CONTROL_RIG: &str = "/Script/ControlRig.ControlRig";
pub const INTERFACE: &str = "/Script/CoreUObject.Interface";
pub const GAME_MODE_BASE: &str = "/Script/Engine.GameModeBase";
pub const CONTROLLER: &str = "/Script/Engine.Controller";
pub const CHARACTER: &str = "/Script/Engine.Character";
pub const PAWN: &str = "/Script/Engine.Pawn";

/// Closed set of composite categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Taxonomy {
    /// Placeable actors, excluding widgets.
    Actor,
    Widget,
    Anim,
    ControlRig,
    Interface,
    GameMode,
    Controller,
    Character,
    Pawn,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 9] = [
        Taxonomy::Actor,
        Taxonomy::Widget,
        Taxonomy::Anim,
        Taxonomy::ControlRig,
        Taxonomy::Interface,
        Taxonomy::GameMode,
        Taxonomy::Controller,
        Taxonomy::Character,
        Taxonomy::Pawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Taxonomy::Actor => "actor",
            Taxonomy::Widget => "widget",
            Taxonomy::Anim => "anim",
            Taxonomy::ControlRig => "controlrig",
            Taxonomy::Interface => "interface",
            Taxonomy::GameMode => "gamemode",
            Taxonomy::Controller => "controller",
            Taxonomy::Character => "character",
            Taxonomy::Pawn => "pawn",
        }
    }

    /// Anchor class the parent must descend from.
    pub fn anchor(&self) -> &'static str {
        match self {
            Taxonomy::Actor => ACTOR,
            Taxonomy::Widget => USER_WIDGET,
            Taxonomy::Anim => ANIM_INSTANCE,
            Taxonomy::ControlRig => CONTROL_RIG,
            Taxonomy::Interface => INTERFACE,
            Taxonomy::GameMode => GAME_MODE_BASE,
            Taxonomy::Controller => CONTROLLER,
            Taxonomy::Character => CHARACTER,
            Taxonomy::Pawn => PAWN,
        }
    }

    /// Classify a composite by its parent class and asset name.
    ///
    /// Anchors missing from the registry match nothing.
    pub fn matches<R: ClassRegistry + ?Sized>(
        &self,
        registry: &R,
        parent: &ClassDescriptor,
        asset_name: &str,
        interface_prefix: &str,
    ) -> bool {
        let descends = registry.is_child_of_path(parent, self.anchor());
        match self {
            Taxonomy::Actor => descends && !registry.is_child_of_path(parent, USER_WIDGET),
            Taxonomy::Interface => {
                let named_as_interface =
                    !interface_prefix.is_empty() && asset_name.starts_with(interface_prefix);
                descends || named_as_interface
            }
            _ => descends,
        }
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown taxonomy '{0}', expected one of: actor, widget, anim, controlrig, interface, \
     gamemode, controller, character, pawn"
)]
pub struct UnknownTaxonomy(pub String);

impl FromStr for Taxonomy {
    type Err = UnknownTaxonomy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Taxonomy::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTaxonomy(s.to_string()))
    }
}
