use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use super::{
    super::{
        super::game_data::{resolve_name, Localize},
        parser::{
            keys,
            types::{GameId, GameString},
            RawRecord, RecordMap,
        },
    },
    diagnostic::report,
    AsteroidBelt, BodyKind, CelestialBody, Diagnostic, Megastructure, System,
};

/// The resolved `moon_of` references of all planets
struct MoonLinks {
    parent_of: HashMap<GameId, GameId>,
    /// Children of each parent, in save file order
    children_of: HashMap<GameId, Vec<GameId>>,
}

impl MoonLinks {
    /// Follows `moon_of` up to the body that orbits a system center
    fn root_of(&self, id: GameId) -> GameId {
        let mut current = id;
        // links are acyclic, the bound only guards the walk
        for _ in 0..=self.parent_of.len() {
            match self.parent_of.get(&current) {
                Some(parent) => current = *parent,
                None => break,
            }
        }
        current
    }
}

/* Links every moon to its parent, across system boundaries. References to
missing bodies are dropped, and so is one link of every cycle, which is
enough to turn the moon_of graph into a forest. */
fn link_moons(planets: &RecordMap, diagnostics: &mut Vec<Diagnostic>) -> MoonLinks {
    let mut parent_of = HashMap::new();
    for planet in planets {
        let Some(parent) = planet.get_id_field(keys::MOON_OF) else {
            continue;
        };
        if planets.contains(&parent) {
            parent_of.insert(planet.get_id(), parent);
        } else {
            report(
                diagnostics,
                Diagnostic::MissingMoonParent {
                    body: planet.get_id(),
                    parent,
                },
            );
        }
    }
    for planet in planets {
        let id = planet.get_id();
        let mut current = id;
        // a chain leading into a cycle we aren't part of, gets broken when its members come up
        for _ in 0..planets.len() {
            let Some(&parent) = parent_of.get(&current) else {
                break;
            };
            if parent == id {
                parent_of.remove(&id);
                report(diagnostics, Diagnostic::CircularMoonReference { body: id });
                break;
            }
            current = parent;
        }
    }
    let mut children_of: HashMap<GameId, Vec<GameId>> = HashMap::new();
    for planet in planets {
        if let Some(parent) = parent_of.get(&planet.get_id()) {
            children_of.entry(*parent).or_default().push(planet.get_id());
        }
    }
    MoonLinks {
        parent_of,
        children_of,
    }
}

/// Creates the body for the record along with everything orbiting it
fn build_subtree(
    record: &RawRecord,
    planets: &RecordMap,
    links: &MoonLinks,
    hosted: &HashMap<GameId, GameId>,
) -> CelestialBody {
    let mut body = CelestialBody::from_record(record);
    if let Some(megastructure) = hosted.get(&record.get_id()) {
        body.set_megastructure(*megastructure);
    }
    if let Some(children) = links.children_of.get(&record.get_id()) {
        for child in children.iter().filter_map(|id| planets.get(id)) {
            body.push_child(build_subtree(child, planets, links, hosted));
        }
    }
    body
}

/// Computes relative geometry and sibling order at every level of the tree
fn place(body: &mut CelestialBody) {
    body.place_children();
    for child in body.children_mut() {
        place(child);
    }
}

/// Assigns nesting levels breadth first, starting from the center at zero
fn assign_levels(center: &mut CelestialBody) {
    let mut queue = VecDeque::from([(center, 0)]);
    while let Some((body, level)) = queue.pop_front() {
        body.set_nesting_level(level);
        for child in body.children_mut() {
            queue.push_back((child, level + 1));
        }
    }
}

fn resolve_names<L: Localize<GameString>>(
    body: &mut CelestialBody,
    planets: &RecordMap,
    localization: &L,
    star_count: usize,
    parent_name: Option<&str>,
) {
    let template = body
        .get_id()
        .and_then(|id| planets.get(&id))
        .and_then(RawRecord::get_name_template);
    if let Some(template) = template {
        body.set_name(resolve_name(
            template,
            localization,
            Some(star_count),
            parent_name,
        ));
    }
    // only moons get the name of their parent, planets orbit the center
    let name = match body.get_kind() {
        BodyKind::Center => None,
        _ => body.get_name().map(str::to_owned),
    };
    for child in body.children_mut() {
        resolve_names(child, planets, localization, star_count, name.as_deref());
    }
}

/// Builds the body tree of every star record.
///
/// Planets listed by a star orbit its system center, unless they are a moon
/// of an existing body, in which case they orbit that body no matter which
/// system listed them. When no star lists the body at the top of a moon's
/// chain, that body and everything orbiting it join the first system listing
/// one of its moons. A planet only ever appears in one tree. Problems are
/// added to `diagnostics` and never stop the build.
pub fn build_systems<L: Localize<GameString>>(
    stars: &RecordMap,
    planets: &RecordMap,
    megastructures: &[Megastructure],
    localization: &L,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<System> {
    let links = link_moons(planets, diagnostics);
    let hosted: HashMap<GameId, GameId> = megastructures
        .iter()
        .filter_map(|m| Some((m.host()?, m.get_id())))
        .collect();
    let mut by_origin: HashMap<GameId, Vec<Megastructure>> = HashMap::new();
    for megastructure in megastructures {
        by_origin
            .entry(megastructure.get_origin())
            .or_default()
            .push(megastructure.clone());
    }
    let listed: HashSet<GameId> = stars
        .iter()
        .flat_map(|s| s.get_planet_ids().iter().copied())
        .collect();
    let mut claimed = HashSet::new();
    let mut systems = Vec::with_capacity(stars.len());
    for star in stars {
        let system_id = star.get_id();
        let mut center = CelestialBody::center();
        for planet_id in star.get_planet_ids() {
            let Some(planet) = planets.get(planet_id) else {
                report(
                    diagnostics,
                    Diagnostic::UnknownPlanet {
                        system: system_id,
                        planet: *planet_id,
                    },
                );
                continue;
            };
            if links.parent_of.contains_key(planet_id) {
                let root = links.root_of(*planet_id);
                if listed.contains(&root) || !claimed.insert(root) {
                    continue;
                }
                // no system lists the tree this moon belongs to, so it comes here
                report(
                    diagnostics,
                    Diagnostic::UnplacedMoonParent {
                        body: *planet_id,
                        parent: root,
                    },
                );
                if let Some(root) = planets.get(&root) {
                    center.push_child(build_subtree(root, planets, &links, &hosted));
                }
                continue;
            }
            if !claimed.insert(*planet_id) {
                report(
                    diagnostics,
                    Diagnostic::DuplicatePlanet {
                        system: system_id,
                        planet: *planet_id,
                    },
                );
                continue;
            }
            center.push_child(build_subtree(planet, planets, &links, &hosted));
        }
        place(&mut center);
        assign_levels(&mut center);
        let mut star_count = 0;
        center.walk(&mut |b| {
            if b.is_star() {
                star_count += 1;
            }
        });
        resolve_names(&mut center, planets, localization, star_count, None);
        let name = match star.get_name_template() {
            Some(template) => Some(resolve_name(template, localization, None, None).into()),
            None => star.get_string(keys::NAME),
        };
        let system = System::new(
            system_id,
            name,
            star.get_position(),
            star.get_string(keys::STAR_CLASS),
            star.get_hyperlanes().to_vec(),
            star.get_belts().iter().map(AsteroidBelt::from).collect(),
            by_origin.remove(&system_id).unwrap_or_default(),
            star_count,
            center,
        );
        debug!("System {}: processed", system.get_display_name());
        systems.push(system);
    }
    systems
}
