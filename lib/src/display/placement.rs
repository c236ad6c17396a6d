use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::super::save_file::{
    parser::types::GameId,
    structures::{
        is_star_class, CelestialBody, Galaxy, Megastructure, System, DEFAULT_MOON_CLASS,
        DEFAULT_MOON_SIZE, DEFAULT_PLANET_CLASS, DEFAULT_PLANET_SIZE,
    },
};

/// The largest orbit a solar system initializer may place a body at
pub const MAX_ORBIT: f64 = 590.0;

/// Names of colonies the player never got to name
const NEW_COLONY_PREFIX: &str = "NEW COLONY";

/// Prefix of the star flags marking wormhole ends
const WORMHOLE_FLAG: &str = "continuum_wormhole_";

/// Folds an angle difference into (-180, 180]
fn normalize_angle(mut angle: f64) -> f64 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Formats a coordinate the way the game writes them, without a trailing `.0`
fn coordinate(value: f64) -> String {
    format!("{}", value)
}

#[derive(Serialize, Debug)]
pub struct ScenarioSystem {
    id: GameId,
    name: String,
    x: String,
    y: String,
    wormhole_flag: Option<String>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Hyperlane {
    from: GameId,
    to: GameId,
}

#[derive(Serialize, Debug)]
pub struct NebulaContext {
    name: String,
    x: String,
    y: String,
    radius: String,
}

/// Everything the static galaxy scenario needs
#[derive(Serialize, Debug)]
pub struct ScenarioContext {
    systems: Vec<ScenarioSystem>,
    hyperlanes: Vec<Hyperlane>,
    nebulae: Vec<NebulaContext>,
}

impl ScenarioContext {
    pub fn new(galaxy: &Galaxy) -> Self {
        let mut flags = HashMap::new();
        for (i, pair) in galaxy.get_wormhole_pairs().iter().enumerate() {
            let flag = format!("{}{}", WORMHOLE_FLAG, i);
            flags.insert(pair.first(), flag.clone());
            flags.insert(pair.second(), flag);
        }
        let systems = galaxy
            .get_systems()
            .iter()
            .map(|system| {
                let (x, y) = system.get_position();
                ScenarioSystem {
                    id: system.get_id(),
                    name: system.get_display_name(),
                    x: coordinate(x),
                    y: coordinate(y),
                    wormhole_flag: flags.get(&system.get_id()).cloned(),
                }
            })
            .collect();
        let existing: HashSet<GameId> = galaxy.get_systems().iter().map(|s| s.get_id()).collect();
        let mut seen = HashSet::new();
        let mut hyperlanes = Vec::new();
        for system in galaxy.get_systems() {
            let from = system.get_id();
            for to in system.get_hyperlanes() {
                if !existing.contains(to) {
                    continue;
                }
                if seen.insert((from.min(*to), from.max(*to))) {
                    hyperlanes.push(Hyperlane { from, to: *to });
                }
            }
        }
        let nebulae = galaxy
            .get_nebulae()
            .iter()
            .map(|nebula| {
                let (x, y) = nebula.get_position();
                NebulaContext {
                    name: nebula.get_name().to_owned(),
                    x: coordinate(x),
                    y: coordinate(y),
                    radius: coordinate(nebula.get_radius()),
                }
            })
            .collect();
        ScenarioContext {
            systems,
            hyperlanes,
            nebulae,
        }
    }
}

/// A planet or moon line of an initializer, with its moons nested inside
#[derive(Serialize, Debug)]
pub struct BodyContext {
    keyword: &'static str,
    indent: String,
    top_level: bool,
    name: Option<String>,
    class: String,
    size: u32,
    orbit_distance: String,
    orbit_angle: i64,
    home_planet: bool,
    moons: Vec<BodyContext>,
}

impl BodyContext {
    fn new(body: &CelestialBody, distance: f64, angle: f64, depth: usize) -> Self {
        let moon = depth > 1;
        let (default_class, default_size) = if moon {
            (DEFAULT_MOON_CLASS, DEFAULT_MOON_SIZE)
        } else {
            (DEFAULT_PLANET_CLASS, DEFAULT_PLANET_SIZE)
        };
        BodyContext {
            keyword: if moon { "moon" } else { "planet" },
            indent: "\t".repeat(depth),
            top_level: !moon,
            name: body
                .get_name()
                .filter(|n| !n.starts_with(NEW_COLONY_PREFIX))
                .map(str::to_owned),
            class: body.get_class().unwrap_or(default_class).to_owned(),
            size: body.get_size().unwrap_or(default_size),
            orbit_distance: format!("{:.2}", distance),
            orbit_angle: angle.round() as i64,
            home_planet: false,
            moons: moons(body, depth + 1),
        }
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn get_orbit_distance(&self) -> &str {
        &self.orbit_distance
    }

    pub fn get_orbit_angle(&self) -> i64 {
        self.orbit_angle
    }

    pub fn is_home_planet(&self) -> bool {
        self.home_planet
    }

    pub fn get_moons(&self) -> &[BodyContext] {
        &self.moons
    }
}

/// Moons are placed relative to the previous moon of the same parent
fn moons(parent: &CelestialBody, depth: usize) -> Vec<BodyContext> {
    let mut last = (0.0, 0.0);
    parent
        .get_children()
        .iter()
        .map(|moon| {
            let (distance, angle) = (moon.get_distance(), moon.get_angle());
            let context = BodyContext::new(
                moon,
                distance - last.0,
                normalize_angle(angle - last.1),
                depth,
            );
            last = (distance, angle);
            context
        })
        .collect()
}

#[derive(Serialize, Debug)]
pub struct BeltContext {
    r#type: String,
    radius: String,
}

#[derive(Serialize, Debug)]
pub struct MegastructureContext {
    r#type: String,
    orbit_distance: String,
    orbit_angle: String,
}

/// A single solar system initializer
#[derive(Serialize, Debug)]
pub struct InitializerContext {
    id: GameId,
    name: String,
    star_class: String,
    usage: &'static str,
    bodies: Vec<BodyContext>,
    belts: Vec<BeltContext>,
    megastructures: Vec<MegastructureContext>,
}

impl InitializerContext {
    /// Lays the system out for the initializer.
    ///
    /// Top level bodies and spawned megastructures share one scale, shrunk
    /// so that nothing sits further out than [MAX_ORBIT]. Each body is then
    /// placed relative to the previous one, the first body at angle zero.
    pub fn new(system: &System, start: bool) -> Self {
        let spawned: Vec<&Megastructure> = system
            .get_megastructures()
            .iter()
            .filter(|m| !m.is_gateway())
            .collect();
        let orbits: Vec<(f64, f64)> = spawned
            .iter()
            .map(|m| {
                let (x, y) = m.get_position();
                (x.hypot(y), (-y).atan2(-x).to_degrees())
            })
            .collect();
        let max_orbit = system
            .get_bodies()
            .iter()
            .map(|b| b.get_distance())
            .chain(orbits.iter().map(|o| o.0))
            .fold(0.0, f64::max);
        let scale = if max_orbit > MAX_ORBIT {
            MAX_ORBIT / max_orbit
        } else {
            1.0
        };

        let mut bodies = Vec::new();
        let mut last = (0.0, 0.0);
        let mut home_assigned = !start;
        for (i, body) in system.get_bodies().iter().enumerate() {
            let distance = body.get_distance() * scale;
            let angle = if i == 0 { 0.0 } else { body.get_angle() };
            let mut context =
                BodyContext::new(body, distance - last.0, normalize_angle(angle - last.1), 1);
            if !home_assigned && !is_star_class(&context.class) {
                context.home_planet = true;
                home_assigned = true;
            }
            bodies.push(context);
            last = (distance, angle);
        }

        InitializerContext {
            id: system.get_id(),
            name: system.get_display_name(),
            star_class: system.get_star_class().to_owned(),
            usage: if start {
                "empire_init"
            } else {
                "misc_system_init"
            },
            bodies,
            belts: system
                .get_asteroid_belts()
                .iter()
                .map(|belt| BeltContext {
                    r#type: belt.get_type().to_owned(),
                    radius: coordinate(belt.get_radius()),
                })
                .collect(),
            megastructures: spawned
                .iter()
                .zip(orbits)
                .map(|(m, (distance, angle))| MegastructureContext {
                    r#type: m.get_kind().to_owned(),
                    orbit_distance: format!("{:.2}", distance * scale),
                    orbit_angle: format!("{:.2}", angle),
                })
                .collect(),
        }
    }

    pub fn get_usage(&self) -> &str {
        self.usage
    }

    pub fn get_bodies(&self) -> &[BodyContext] {
        &self.bodies
    }
}

/// Builds the initializers of every system, the start system being the
/// one the player empire spawns in
pub fn initializers(galaxy: &Galaxy, start_system: &str) -> Vec<InitializerContext> {
    let start = galaxy.start_system(start_system).map(|s| s.get_id());
    galaxy
        .get_systems()
        .iter()
        .map(|s| InitializerContext::new(s, Some(s.get_id()) == start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        super::super::{game_data::Localizer, save_file::GameState},
        *,
    };

    fn galaxy(text: &str) -> Galaxy {
        GameState::parse(text).build_galaxy(&Localizer::default())
    }

    fn planet(
        id: GameId,
        name: &str,
        class: &str,
        x: f64,
        y: f64,
        moon_of: Option<GameId>,
    ) -> String {
        let moon = moon_of.map_or(String::new(), |m| format!("\t\t\tmoon_of={}\n", m));
        format!(
            "\t\t{}=\n\t\t{{\n\t\t\tname=\"{}\"\n\t\t\tplanet_class=\"{}\"\n\t\t\tcoordinate=\n\t\t\t{{\n\t\t\t\tx={}\n\t\t\t\ty={}\n\t\t\t}}\n{}\t\t}}\n",
            id, name, class, x, y, moon
        )
    }

    fn save(planets: &[String], ids: &[GameId], extra: &str) -> String {
        let listed: String = ids.iter().map(|i| format!("\t\tplanet={}\n", i)).collect();
        format!(
            "galactic_object=\n{{\n\t0=\n\t{{\n\t\tname=\"Sol\"\n{}\t\thyperlane=\n\t\t{{\n\t\t\t{{\n\t\t\t\tto=0\n\t\t\t}}\n\t\t}}\n\t}}\n}}\nplanets=\n{{\n\tplanet=\n\t{{\n{}\t}}\n}}\n{}",
            listed,
            planets.concat(),
            extra
        )
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(190.0), -170.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-540.0), 180.0);
        assert_eq!(normalize_angle(45.0), 45.0);
    }

    #[test]
    fn test_relative_orbits() {
        let galaxy = galaxy(&save(
            &[
                planet(0, "Sol", "pc_g_star", 0.0, 0.0, None),
                planet(1, "Mercury", "pc_molten", -20.0, 0.0, None),
                planet(2, "Venus", "pc_desert", 0.0, -50.0, None),
                planet(3, "Earth", "pc_continental", 100.0, 0.0, None),
            ],
            &[0, 1, 2, 3],
            "",
        ));
        let init = InitializerContext::new(&galaxy.get_systems()[0], true);
        assert_eq!(init.get_usage(), "empire_init");
        let bodies = init.get_bodies();
        assert_eq!(bodies.len(), 4);
        assert_eq!(bodies[0].get_orbit_distance(), "0.00");
        assert_eq!(bodies[0].get_orbit_angle(), 0);
        assert!(!bodies[0].is_home_planet());
        // Mercury lies at angle 0, Venus at 90 and Earth at 180
        assert_eq!(bodies[1].get_orbit_distance(), "20.00");
        assert_eq!(bodies[1].get_orbit_angle(), 0);
        assert!(bodies[1].is_home_planet());
        assert_eq!(bodies[2].get_orbit_distance(), "30.00");
        assert_eq!(bodies[2].get_orbit_angle(), 90);
        assert_eq!(bodies[3].get_orbit_distance(), "50.00");
        assert_eq!(bodies[3].get_orbit_angle(), 90);
        assert!(!bodies[3].is_home_planet());
    }

    #[test]
    fn test_scaling() {
        let galaxy = galaxy(&save(
            &[
                planet(0, "Inner", "pc_arid", -590.0, 0.0, None),
                planet(1, "Outer", "pc_frozen", -1180.0, 0.0, None),
            ],
            &[0, 1],
            "",
        ));
        let init = InitializerContext::new(&galaxy.get_systems()[0], false);
        assert_eq!(init.get_usage(), "misc_system_init");
        let bodies = init.get_bodies();
        assert_eq!(bodies[0].get_orbit_distance(), "295.00");
        assert_eq!(bodies[1].get_orbit_distance(), "295.00");
        assert!(bodies.iter().all(|b| !b.is_home_planet()));
    }

    #[test]
    fn test_moons() {
        let galaxy = galaxy(&save(
            &[
                planet(1, "NEW COLONY 3", "pc_ocean", -40.0, 0.0, None),
                planet(2, "Moon A", "pc_barren_cold", -45.0, 0.0, Some(1)),
                planet(3, "Moon B", "pc_toxic", -40.0, -10.0, Some(1)),
            ],
            &[1],
            "",
        ));
        let init = InitializerContext::new(&galaxy.get_systems()[0], true);
        let planet = &init.get_bodies()[0];
        assert_eq!(planet.get_name(), None);
        assert!(planet.is_home_planet());
        let moons = planet.get_moons();
        assert_eq!(moons.len(), 2);
        assert_eq!(moons[0].get_name(), Some("Moon A"));
        assert_eq!(moons[0].get_orbit_distance(), "5.00");
        assert_eq!(moons[0].get_orbit_angle(), 0);
        assert_eq!(moons[1].get_orbit_distance(), "5.00");
        assert_eq!(moons[1].get_orbit_angle(), 90);
    }

    #[test]
    fn test_scenario() {
        let extra = "galactic_object=\n{\n\t1=\n\t{\n\t\tname=\"Vega\"\n\t\thyperlane=\n\t\t{\n\t\t\t{\n\t\t\t\tto=0\n\t\t\t}\n\t\t\t{\n\t\t\t\tto=9\n\t\t\t}\n\t\t}\n\t}\n}\n";
        let galaxy = galaxy(&save(&[], &[], extra));
        let scenario = ScenarioContext::new(&galaxy);
        assert_eq!(scenario.systems.len(), 2);
        // 0-0 is a loop, 1-0 duplicates 0-1 and 9 doesn't exist
        assert_eq!(
            scenario.hyperlanes,
            vec![Hyperlane { from: 0, to: 0 }, Hyperlane { from: 1, to: 0 }]
        );
    }
}
