use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use super::{
    super::game_data::Localize,
    parser::{
        block::brace_balance,
        parse_generic, parse_nebula, parse_planet, parse_star, scan_section,
        types::{GameId, GameString},
        RecordKind, RecordMap, RECORD_HEADER,
    },
    structures::{
        anchor_bypasses, build_systems, pair_wormholes, report, BodyCounts, Diagnostic, Galaxy,
        Megastructure, Nebula,
    },
};

/// A line opening a named block, `key={`
static OPEN_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w.:-]+)\s*=\s*\{$").unwrap());
/// A line naming the block opened on the next line, `key=`
static PENDING_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w.:-]+)\s*=$").unwrap());
/// A nebula written on a single line
static INLINE_NEBULA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^nebula\s*=\s*\{").unwrap());

/// The parts of the gamestate we read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Stars,
    Planets,
    Nebula,
    Bypasses,
    NaturalWormholes,
    Megastructures,
}

impl Section {
    /// Returns the section located at the given key path, if any
    fn at(path: &[String]) -> Option<Section> {
        match path {
            [key] => match key.as_str() {
                "galactic_object" => Some(Section::Stars),
                "nebula" => Some(Section::Nebula),
                "bypasses" => Some(Section::Bypasses),
                "natural_wormholes" => Some(Section::NaturalWormholes),
                "megastructures" => Some(Section::Megastructures),
                _ => None,
            },
            [outer, inner] if outer == "planets" && inner == "planet" => Some(Section::Planets),
            _ => None,
        }
    }
}

/// Collects the rest of a block whose opening brace was already consumed.
/// Returns [None] if the input ends first.
fn collect_block<'a, I: Iterator<Item = &'a str>>(lines: &mut I) -> Option<String> {
    let mut body = String::from("{");
    let mut depth = 1;
    for line in lines {
        depth += brace_balance(line);
        body.push('\n');
        body.push_str(line);
        if depth <= 0 {
            return Some(body);
        }
    }
    None
}

/// The raw records of a gamestate, section by section.
/// Sections that are missing from the save are simply empty.
#[derive(Debug, Default)]
pub struct GameState {
    stars: RecordMap,
    planets: RecordMap,
    nebulae: RecordMap,
    bypasses: RecordMap,
    natural_wormholes: RecordMap,
    megastructures: RecordMap,
}

impl GameState {
    /// Reads the gamestate document.
    ///
    /// The document is read line by line, keeping track of the key path of
    /// the block we are in. When the path reaches one of the sections we
    /// care about, the section is handed to [scan_section] and everything
    /// else is stepped over.
    pub fn parse(text: &str) -> Self {
        let mut state = GameState::default();
        let mut lines = text.lines();
        let mut path: Vec<String> = Vec::new();
        let mut pending: Option<String> = None;
        while let Some(line) = lines.next() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let opened = if trimmed == "{" {
                Some(pending.take().unwrap_or_default())
            } else if let Some(captures) = OPEN_KEY.captures(trimmed) {
                pending = None;
                Some(captures[1].to_owned())
            } else {
                None
            };
            if let Some(key) = opened {
                path.push(key);
                if let Some(section) = Section::at(&path) {
                    state.read_section(section, &mut lines);
                    path.pop();
                }
                continue;
            }
            if let Some(captures) = PENDING_KEY.captures(trimmed) {
                pending = Some(captures[1].to_owned());
                continue;
            }
            pending = None;
            let balance = brace_balance(line);
            if balance == 0 {
                if path.is_empty() && INLINE_NEBULA.is_match(trimmed) {
                    state.add_nebula(trimmed);
                }
            } else if balance > 0 {
                for _ in 0..balance {
                    path.push(String::new());
                }
            } else {
                for _ in 0..-balance {
                    if path.pop().is_none() {
                        warn!("unbalanced closing brace in the gamestate: {}", trimmed);
                        break;
                    }
                }
            }
        }
        if !path.is_empty() {
            warn!("the gamestate ended inside {} unclosed blocks", path.len());
        }
        info!(
            "read {} systems, {} planets, {} nebulae, {} bypasses, {} natural wormholes and {} megastructures",
            state.stars.len(),
            state.planets.len(),
            state.nebulae.len(),
            state.bypasses.len(),
            state.natural_wormholes.len(),
            state.megastructures.len()
        );
        state
    }

    fn read_section<'a, I: Iterator<Item = &'a str>>(&mut self, section: Section, lines: &mut I) {
        match section {
            Section::Stars => self
                .stars
                .extend(scan_section(lines, &RECORD_HEADER, parse_star)),
            Section::Planets => self
                .planets
                .extend(scan_section(lines, &RECORD_HEADER, parse_planet)),
            Section::Bypasses => self.bypasses.extend(scan_section(
                lines,
                &RECORD_HEADER,
                |id, body| parse_generic(id, RecordKind::Bypass, body),
            )),
            Section::NaturalWormholes => self.natural_wormholes.extend(scan_section(
                lines,
                &RECORD_HEADER,
                |id, body| parse_generic(id, RecordKind::WormholeAnchor, body),
            )),
            Section::Megastructures => self.megastructures.extend(scan_section(
                lines,
                &RECORD_HEADER,
                |id, body| parse_generic(id, RecordKind::Megastructure, body),
            )),
            Section::Nebula => match collect_block(lines) {
                Some(body) => self.add_nebula(&body),
                None => warn!("nebula block is not closed before the end of input"),
            },
        }
        debug!("read section {:?}", section);
    }

    /// Nebulae have no ids, they are numbered in order of appearance
    fn add_nebula(&mut self, body: &str) {
        let id = self.nebulae.len() as GameId;
        self.nebulae.insert(parse_nebula(id, body));
    }

    pub fn get_stars(&self) -> &RecordMap {
        &self.stars
    }

    pub fn get_planets(&self) -> &RecordMap {
        &self.planets
    }

    pub fn get_nebulae(&self) -> &RecordMap {
        &self.nebulae
    }

    pub fn get_bypasses(&self) -> &RecordMap {
        &self.bypasses
    }

    pub fn get_natural_wormholes(&self) -> &RecordMap {
        &self.natural_wormholes
    }

    pub fn get_megastructures(&self) -> &RecordMap {
        &self.megastructures
    }

    /// Placed megastructures, with host references to missing planets removed
    fn collect_megastructures(&self, diagnostics: &mut Vec<Diagnostic>) -> Vec<Megastructure> {
        let mut megastructures = Vec::new();
        for record in &self.megastructures {
            let Some(mut megastructure) = Megastructure::from_record(record) else {
                debug!("skipping unplaced megastructure {}", record.get_id());
                continue;
            };
            if let Some(host) = megastructure.host() {
                if !self.planets.contains(&host) {
                    report(
                        diagnostics,
                        Diagnostic::MissingHostPlanet {
                            megastructure: megastructure.get_id(),
                            planet: host,
                        },
                    );
                    megastructure.clear_host();
                }
            }
            if !self.stars.contains(&megastructure.get_origin()) {
                report(
                    diagnostics,
                    Diagnostic::UnknownOriginSystem {
                        megastructure: megastructure.get_id(),
                        system: megastructure.get_origin(),
                    },
                );
            }
            megastructures.push(megastructure);
        }
        megastructures
    }

    /// Turns the raw records into the [Galaxy]
    pub fn build_galaxy<L: Localize<GameString>>(&self, localization: &L) -> Galaxy {
        let mut diagnostics = Vec::new();
        let anchors = anchor_bypasses(&self.natural_wormholes);
        let (wormhole_pairs, unanchored) = pair_wormholes(&self.bypasses, &anchors);
        for bypass in unanchored {
            report(&mut diagnostics, Diagnostic::UnanchoredBypass { bypass });
        }
        let megastructures = self.collect_megastructures(&mut diagnostics);
        let systems = build_systems(
            &self.stars,
            &self.planets,
            &megastructures,
            localization,
            &mut diagnostics,
        );
        let nebulae: Vec<_> = self
            .nebulae
            .iter()
            .map(|n| Nebula::from_record(n, localization))
            .collect();
        let mut counts = BodyCounts {
            systems: systems.len(),
            nebulae: nebulae.len(),
            megastructures: megastructures.len(),
            wormhole_pairs: wormhole_pairs.len(),
            ..Default::default()
        };
        counts.count_planets(&self.planets);
        info!("built {}", counts);
        Galaxy::new(
            systems,
            nebulae,
            wormhole_pairs,
            megastructures,
            counts,
            diagnostics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{
        super::{
            fixture::{sample_localizer, SAMPLE_GAMESTATE},
            structures::WormholePair,
        },
        *,
    };

    #[test]
    fn test_sections() {
        let state = GameState::parse(SAMPLE_GAMESTATE);
        assert_eq!(state.get_stars().len(), 2);
        // the planets of the country block are not part of the planet section
        assert_eq!(state.get_planets().len(), 4);
        assert!(!state.get_planets().contains(&99));
        assert_eq!(state.get_nebulae().len(), 2);
        assert_eq!(state.get_bypasses().len(), 3);
        assert_eq!(state.get_natural_wormholes().len(), 2);
        assert_eq!(state.get_megastructures().len(), 3);
    }

    #[test]
    fn test_galaxy() {
        let galaxy = GameState::parse(SAMPLE_GAMESTATE).build_galaxy(&sample_localizer());
        assert!(galaxy.get_diagnostics().is_empty());
        let sol = &galaxy.get_systems()[0];
        assert_eq!(sol.get_name(), Some("Sol"));
        assert_eq!(sol.get_position(), (10.0, -20.0));
        assert_eq!(sol.get_hyperlanes(), &[1]);
        assert_eq!(sol.get_asteroid_belts().len(), 1);
        let names: Vec<_> = sol.get_bodies().iter().map(|b| b.get_name()).collect();
        assert_eq!(names, vec![Some("Sol"), Some("Earth")]);
        let earth = &sol.get_bodies()[1];
        assert!((earth.get_distance() - 50.0).abs() < 1e-9);
        assert_eq!(earth.get_megastructure(), Some(20));
        let luna = &earth.get_children()[0];
        assert_eq!(luna.get_name(), Some("Luna"));
        assert!((luna.get_distance() - 5.0).abs() < 1e-9);
        assert_eq!(luna.get_nesting_level(), 2);

        let vega = &galaxy.get_systems()[1];
        assert_eq!(vega.get_star_class(), "sc_a");
        assert_eq!(vega.get_megastructures()[0].get_id(), 21);

        assert_eq!(galaxy.get_wormhole_pairs(), &[WormholePair::new(0, 1)]);
        assert_eq!(galaxy.get_megastructures().len(), 2);
        assert_eq!(galaxy.get_megastructures()[0].host(), Some(1));
        assert_eq!(galaxy.get_megastructures()[1].host(), None);

        let nebulae = galaxy.get_nebulae();
        assert_eq!(nebulae[0].get_name(), "Crimson Nebula");
        assert_eq!(nebulae[0].get_radius(), 45.0);
        assert_eq!(nebulae[1].get_name(), "Unknown");
        assert_eq!(nebulae[1].get_position(), (-5.0, 5.0));
        assert_eq!(nebulae[1].get_radius(), 20.0);

        assert_eq!(
            *galaxy.get_counts(),
            BodyCounts {
                systems: 2,
                nebulae: 2,
                stars: 2,
                planets: 1,
                moons: 1,
                asteroids: 0,
                megastructures: 2,
                wormhole_pairs: 1,
            }
        );
        assert_eq!(galaxy.start_system("SOL").unwrap().get_id(), 0);
        assert_eq!(galaxy.start_system("Vega").unwrap().get_id(), 1);
        assert_eq!(galaxy.start_system("Nowhere").unwrap().get_id(), 0);
    }

    fn wormhole_save(bypasses: &str) -> String {
        format!(
            "bypasses=\n{{\n{}}}\nnatural_wormholes=\n{{\n\t0=\n\t{{\n\t\tcoordinate=\n\t\t{{\n\t\t\tx=1\n\t\t\ty=1\n\t\t\torigin=57\n\t\t}}\n\t\tbypass=10\n\t}}\n\t1=\n\t{{\n\t\tcoordinate=\n\t\t{{\n\t\t\tx=1\n\t\t\ty=1\n\t\t\torigin=3\n\t\t}}\n\t\tbypass=11\n\t}}\n}}\n",
            bypasses
        )
    }

    #[test]
    fn test_wormhole_pair_order() {
        let first = "\t10=\n\t{\n\t\ttype=\"wormhole\"\n\t\tlinked_to=11\n\t}\n";
        let second = "\t11=\n\t{\n\t\ttype=\"wormhole\"\n\t\tlinked_to=10\n\t}\n";
        let loc = sample_localizer();
        let forward =
            GameState::parse(&wormhole_save(&format!("{}{}", first, second))).build_galaxy(&loc);
        let reverse =
            GameState::parse(&wormhole_save(&format!("{}{}", second, first))).build_galaxy(&loc);
        assert_eq!(forward.get_wormhole_pairs(), &[WormholePair::new(3, 57)]);
        assert_eq!(forward.get_wormhole_pairs()[0].first(), 3);
        assert_eq!(forward.get_wormhole_pairs(), reverse.get_wormhole_pairs());
    }

    #[test]
    fn test_empty() {
        let galaxy = GameState::parse("version=\"v4.0.2\"\n").build_galaxy(&sample_localizer());
        assert!(galaxy.get_systems().is_empty());
        assert!(galaxy.start_system("Sol").is_none());
        assert_eq!(*galaxy.get_counts(), BodyCounts::default());
    }

    #[test]
    fn test_inline_open() {
        let text = "galactic_object={\n\t0={\n\t\tname={ key=\"NAME_Sol\" }\n\t}\n}\nplanets = {\n\tplanet = {\n\t\t0={ planet_class=\"pc_g_star\" }\n\t}\n}\n";
        let state = GameState::parse(text);
        assert_eq!(state.get_stars().len(), 1);
        assert_eq!(state.get_planets().len(), 1);
    }

    #[test]
    fn test_truncated() {
        let truncated = &SAMPLE_GAMESTATE[..SAMPLE_GAMESTATE.find("\t1=\n").unwrap() + 8];
        let state = GameState::parse(truncated);
        assert_eq!(state.get_stars().len(), 1);
        assert!(state.get_planets().is_empty());
    }

    #[test]
    fn test_missing_references() {
        let text = "megastructures=\n{\n\t5=\n\t{\n\t\ttype=\"habitat_central\"\n\t\tcoordinate=\n\t\t{\n\t\t\tx=1\n\t\t\ty=1\n\t\t\torigin=8\n\t\t}\n\t\tplanet=77\n\t}\n}\nbypasses=\n{\n\t1={\n\t\ttype=\"wormhole\"\n\t\tlinked_to=2\n\t}\n}\n";
        let galaxy = GameState::parse(text).build_galaxy(&sample_localizer());
        assert_eq!(galaxy.get_megastructures()[0].host(), None);
        assert_eq!(
            galaxy.get_diagnostics(),
            &[
                Diagnostic::UnanchoredBypass { bypass: 1 },
                Diagnostic::UnanchoredBypass { bypass: 2 },
                Diagnostic::MissingHostPlanet {
                    megastructure: 5,
                    planet: 77
                },
                Diagnostic::UnknownOriginSystem {
                    megastructure: 5,
                    system: 8
                },
            ]
        );
    }
}
