//!
//! # Entity Kinds
//!
//! The kinds of remote entity, each kind's derived properties,
//! and the few edits which span more than a single property.
//!

// Crates.io
use log::info;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::args::encode;
use crate::entity::{Entity, Owner};
use crate::error::{AedtError, AedtResult};
use crate::keymap::{Derived, KeyMap, PropMaps};
use crate::registry::Registry;
use crate::session::Session;
use crate::tree::{Node, Seq};
use crate::utils::{enumstr, EnumStr, Ptr};
use crate::{args, Arg};

enumstr!(
    /// # Entity Kinds
    EntityKind {
        Component: "Component",
        Pin: "Pin",
        Net: "Net",
        Layer: "Layer",
        Padstack: "Padstack",
        PinGroup: "PinGroup",
        ComponentDef: "ComponentDef",
        Model: "Model",
    }
);
impl EntityKind {
    /// Whether edits are submitted immediately, or deferred until [Entity::update]
    pub fn write_through(&self) -> bool {
        !matches!(self, Self::PinGroup | Self::Net)
    }
    /// Whether entities are definitions, named by their payload's `NAME:` tag
    pub fn is_definition(&self) -> bool {
        matches!(
            self,
            Self::Padstack | Self::PinGroup | Self::ComponentDef | Self::Model
        )
    }
}

enumstr!(
    /// # Net Classes
    NetClass {
        Power: "Power",
        Ground: "Ground",
        Ignore: "Ignore",
        Signal: "Signal",
    }
);
enumstr!(
    /// # Part Classes, by reference designator
    PartClass {
        Resistor: "Resistor",
        Inductor: "Inductor",
        Capacitor: "Capacitor",
        Other: "Other",
    }
);

/// Derived properties for an entity of `kind`, whose freshly decoded tree is `tree`
pub fn prop_maps(kind: EntityKind, tree: &Seq) -> PropMaps<Owner> {
    let maps = PropMaps::new().derive(
        "Name",
        Derived::getter(|m: &KeyMap<Owner>| Ok(Node::from(m.owner().name.clone()))),
    );
    match kind {
        EntityKind::Component => component_maps(maps),
        EntityKind::Pin => pin_maps(maps),
        EntityKind::Net => maps.derive(
            "NetClass",
            Derived::getter(|m: &KeyMap<Owner>| {
                let owner = m.owner();
                Ok(Node::from(owner.options.net_class(&owner.name)?.to_str()))
            }),
        ),
        EntityKind::Layer => maps.derive(
            "ThicknessValue",
            Derived::getter(|m: &KeyMap<Owner>| {
                let unit = m.owner().options.design_unit()?;
                let thickness = m.get("Thickness")?;
                match thickness.as_quantity(unit) {
                    Some(q) => Ok(Node::from(q)),
                    None => Err(AedtError::InvalidQuantity(thickness.to_string())),
                }
            }),
        ),
        EntityKind::Padstack => padstack_maps(maps, tree),
        EntityKind::PinGroup => pin_group_maps(maps),
        EntityKind::ComponentDef | EntityKind::Model => maps,
    }
}

/// Names of the pins of component `refdes`, which are named `<refdes>-<pin>`
fn component_pins(owner: &Owner) -> AedtResult<Vec<String>> {
    let refdes = owner.name.as_str();
    let pins = owner.context.enumerate(EntityKind::Pin)?;
    Ok(pins
        .into_iter()
        .filter(|p| match split_pin_name(p) {
            Some((comp, _)) => comp.eq_ignore_ascii_case(refdes),
            None => false,
        })
        .collect())
}

fn component_maps(maps: PropMaps<Owner>) -> PropMaps<Owner> {
    maps.derive(
        "PinNames",
        Derived::getter(|m: &KeyMap<Owner>| Ok(Node::from(component_pins(m.owner())?))),
    )
    .derive(
        "ShortPinNames",
        Derived::getter(|m: &KeyMap<Owner>| {
            let short: Vec<String> = component_pins(m.owner())?
                .iter()
                .filter_map(|p| split_pin_name(p).map(|(_, pin)| pin.to_string()))
                .collect();
            Ok(Node::from(short))
        }),
    )
    .derive(
        "PinCount",
        Derived::getter(|m: &KeyMap<Owner>| Ok(Node::from(component_pins(m.owner())?.len()))),
    )
    .derive(
        "PartClass",
        Derived::getter(|m: &KeyMap<Owner>| {
            let owner = m.owner();
            Ok(Node::from(owner.options.part_class(&owner.name)?.to_str()))
        }),
    )
}

/// Split a pin name into component and pin, at its first `-` or `.`
pub fn split_pin_name(name: &str) -> Option<(&str, &str)> {
    name.split_once(|c| c == '-' || c == '.')
}

fn pin_maps(maps: PropMaps<Owner>) -> PropMaps<Owner> {
    fn part(m: &KeyMap<Owner>, first: bool) -> AedtResult<Node> {
        let name = &m.owner().name;
        match split_pin_name(name) {
            Some((comp, _)) if first => Ok(Node::from(comp)),
            Some((_, pin)) => Ok(Node::from(pin)),
            None => Err(AedtError::key(format!("{}: no component in pin name", name))),
        }
    }
    maps.derive(
        "CompName",
        Derived::getter(|m: &KeyMap<Owner>| part(m, true)),
    )
    .derive(
        "PinName",
        Derived::getter(|m: &KeyMap<Owner>| part(m, false)),
    )
    .derive(
        "IsSMTPad",
        Derived::getter(|m: &KeyMap<Owner>| {
            Ok(Node::from(m.get_text("Start Layer")? == m.get_text("Stop Layer")?))
        }),
    )
}

/// The per-layer `lgm` groups of padstack tree `root`
fn padstack_layers(root: &Seq) -> Vec<&Seq> {
    match root.get_path("psd/pds").and_then(Node::as_seq) {
        Some(pds) => pds
            .items()
            .filter_map(Node::as_seq)
            .filter(|s| s.contains("lay"))
            .collect(),
        None => Vec::new(),
    }
}
/// The layer name of `lgm` group `layer`
fn layer_name(layer: &Seq) -> Option<String> {
    match layer.get("lay")? {
        Node::Scalar(s) => Some(s.to_string()),
        Node::Seq(_) => None,
    }
}

fn padstack_maps(maps: PropMaps<Owner>, tree: &Seq) -> PropMaps<Owner> {
    let mut maps = maps.derive(
        "DrillSize",
        Derived::getter(|m: &KeyMap<Owner>| Ok(m.get("psd/hle/Szs/0")?.into_owned())),
    );
    for name in padstack_layers(tree).into_iter().filter_map(layer_name) {
        let key = name.clone();
        maps = maps.derive(
            key,
            Derived::getter(move |m: &KeyMap<Owner>| {
                padstack_layers(m.root())
                    .into_iter()
                    .find(|layer| layer_name(layer).as_deref() == Some(name.as_str()))
                    .map(|layer| Node::Seq(layer.clone()))
                    .ok_or_else(|| AedtError::key(name.as_str()))
            }),
        );
    }
    maps
}

/// Key-resolution map over a padstack's per-layer `lgm` group,
/// with `PadSize`, `AntipadSize` and `ThermalPadSize` resolving to the first size of each pad shape
pub fn padstack_layer_sizes(layer: &Node) -> AedtResult<KeyMap> {
    let seq = layer
        .as_seq()
        .ok_or_else(|| AedtError::msg("padstack layer is not a sequence"))?;
    let mut map = KeyMap::from_seq(seq.clone());
    map.set_maps(
        PropMaps::new()
            .derive("PadSize", first_size("pad"))
            .derive("AntipadSize", first_size("ant"))
            .derive("ThermalPadSize", first_size("thm")),
    )?;
    Ok(map)
}
fn first_size(shape: &'static str) -> Derived<()> {
    Derived::getter(move |m: &KeyMap| Ok(m.get(&format!("{}/Szs/0", shape))?.into_owned()))
}

/// Default `lgm` group for `layer`, with no pad shapes
fn layer_template(layer: &str) -> Vec<Arg> {
    args![
        "NAME:lgm",
        "lay:=",
        layer,
        "id:=",
        1,
        "pad:=",
        ["shp:=", "No", "Szs:=", [], "ply:=", [], "X:=", "0mil", "Y:=", "0mil", "R:=", "0deg"],
        "ant:=",
        ["shp:=", "No", "Szs:=", [], "ply:=", [], "X:=", "0mm", "Y:=", "0mm", "R:=", "0deg"],
        "thm:=",
        ["shp:=", "No", "Szs:=", [], "ply:=", [], "X:=", "0mm", "Y:=", "0mm", "R:=", "0deg"],
        "X:=",
        "0",
        "Y:=",
        "0",
        "dir:=",
        "No"
    ]
}

/// Append a default layer group for `layer` to padstack `padstack`
pub fn padstack_append_layer(padstack: &mut Entity, layer: &str) -> AedtResult<()> {
    if padstack.kind() != EntityKind::Padstack {
        return AedtError::fail(format!("{} is not a padstack", padstack.name()));
    }
    let group = crate::args::decode(&layer_template(layer))?;
    padstack.edit(|m| m.append_at("psd/pds", group))
}

/// Rename definition `old` to `new`, by submitting its payload under a new name tag.
/// Returns the renamed entity, from the refreshed `registry`.
/// The caller must not hold a guard on `old`, which is read here.
pub fn rename_definition(registry: &mut Registry, old: &str, new: &str) -> AedtResult<Ptr<Entity>> {
    let kind = registry.kind();
    if !kind.is_definition() {
        return AedtError::fail(format!("{} entities are not definitions", kind));
    }
    let entity = registry.lookup(old)?;
    let (name, payload) = {
        let mut entity = entity.write()?;
        let mut root = entity.info()?.root().clone();
        root.set_name(new);
        (entity.name().to_string(), encode(&root))
    };
    registry.context().submit(kind, &name, &payload)?;
    info!("Renamed {} {} to {}", kind, name, new);
    registry.refresh();
    registry.lookup(new)
}

fn pin_group_maps(maps: PropMaps<Owner>) -> PropMaps<Owner> {
    fn pin_names(m: &KeyMap<Owner>) -> Vec<String> {
        m.root().items().map(|n| n.to_string()).collect()
    }
    maps.derive(
        "PinNames",
        Derived::getter(|m: &KeyMap<Owner>| Ok(Node::from(pin_names(m)))),
    )
    .derive(
        "PinCount",
        Derived::getter(|m: &KeyMap<Owner>| Ok(Node::from(pin_names(m).len()))),
    )
    .derive(
        "CompName",
        Derived::getter(|m: &KeyMap<Owner>| {
            let pins = pin_names(m);
            let first = pins.first().ok_or_else(|| AedtError::key("CompName"))?;
            match split_pin_name(first) {
                Some((comp, _)) => Ok(Node::from(comp)),
                None => Err(AedtError::key("CompName")),
            }
        }),
    )
}

/// Create a pin group from `pins`.
///
/// Pins given without a component prefix are qualified with `comp`.
/// Without a `name`, the group is named after the first pin and its net, made unique among existing groups.
pub fn create_pin_group(
    session: &mut Session,
    pins: &[&str],
    comp: Option<&str>,
    name: Option<&str>,
) -> AedtResult<Ptr<Entity>> {
    let pins: Vec<String> = pins
        .iter()
        .map(|p| match comp {
            Some(comp) if split_pin_name(p).is_none() => format!("{}-{}", comp, p),
            _ => p.to_string(),
        })
        .collect();
    let first = match pins.first() {
        Some(first) => first.clone(),
        None => return AedtError::fail("Cannot create an empty pin group"),
    };
    let name = match name {
        Some(name) => name.to_string(),
        None => {
            let base = match pin_net(session, &first)? {
                Some(net) => format!("PinGroup_{}_{}", net, first),
                None => format!("PinGroup_{}", first),
            };
            session.pin_groups().unique_name(&base)?
        }
    };
    let mut group = Seq::named(name.as_str());
    for pin in pins.iter() {
        group.push(pin.as_str());
    }
    session.pin_groups().create(&name, &encode(&group))
}
/// The net of pin `name`, if it has one
fn pin_net(session: &mut Session, name: &str) -> AedtResult<Option<String>> {
    let pin = match session.pins().get(name)? {
        Some(pin) => pin,
        None => return Ok(None),
    };
    let mut pin = pin.write()?;
    match pin.get("Net") {
        Ok(Node::Scalar(net)) => Ok(Some(net.to_string())),
        Ok(Node::Seq(_)) => Ok(None),
        Err(e) if e.is_miss() => Ok(None),
        Err(e) => Err(e),
    }
}
