use super::super::{
    super::game_data::{resolve_name, Localize, UNKNOWN},
    parser::{keys, types::GameString, RawRecord},
};

pub const DEFAULT_NEBULA_RADIUS: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Nebula {
    name: GameString,
    position: (f64, f64),
    radius: f64,
}

impl Nebula {
    pub fn from_record<L: Localize<GameString>>(record: &RawRecord, localization: &L) -> Self {
        let name = match record.get_name_template() {
            Some(template) => resolve_name(template, localization, None, None),
            None => UNKNOWN.to_owned(),
        };
        Nebula {
            name: name.into(),
            position: record.get_position().unwrap_or_default(),
            radius: record
                .get_real(keys::RADIUS)
                .unwrap_or(DEFAULT_NEBULA_RADIUS),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_position(&self) -> (f64, f64) {
        self.position
    }

    pub fn get_radius(&self) -> f64 {
        self.radius
    }
}
