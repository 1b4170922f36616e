//! Closed code sets for the enumerated record fields.
//!
//! Codes are stored in the database as short uppercase strings and must be
//! one of the declared values. Each code carries the display label shown on
//! the administrative surface.

/// Legal nature of an owning entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityType {
    Institutional,
    Organization,
    Company,
    Private,
}

impl EntityType {
    pub const ALL: [Self; 4] = [
        Self::Institutional,
        Self::Organization,
        Self::Company,
        Self::Private,
    ];

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "IN" => Some(Self::Institutional),
            "OR" => Some(Self::Organization),
            "CO" => Some(Self::Company),
            "PR" => Some(Self::Private),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Institutional => "IN",
            Self::Organization => "OR",
            Self::Company => "CO",
            Self::Private => "PR",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Institutional => "Institutionnel",
            Self::Organization => "Association",
            Self::Company => "Société",
            Self::Private => "Privé",
        }
    }
}

/// Whether an instrument is read by hand or reports automatically.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReadingType {
    Manual,
    Automatic,
}

impl ReadingType {
    pub const ALL: [Self; 2] = [Self::Manual, Self::Automatic];

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "MAN" => Some(Self::Manual),
            "AUT" => Some(Self::Automatic),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Manual => "MAN",
            Self::Automatic => "AUT",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "Instrument manuel",
            Self::Automatic => "Instrument automatique",
        }
    }
}

/// Kind of physical quantity an instrument measures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SensorType {
    Anemometer,
    RainGauge,
    Thermometer,
    Hygrometer,
    ThermoHygro,
    Pyranometer,
    UvSensor,
}

impl SensorType {
    pub const ALL: [Self; 7] = [
        Self::Anemometer,
        Self::RainGauge,
        Self::Thermometer,
        Self::Hygrometer,
        Self::ThermoHygro,
        Self::Pyranometer,
        Self::UvSensor,
    ];

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "ANM" => Some(Self::Anemometer),
            "PLG" => Some(Self::RainGauge),
            "THM" => Some(Self::Thermometer),
            "HYM" => Some(Self::Hygrometer),
            "THH" => Some(Self::ThermoHygro),
            "PYM" => Some(Self::Pyranometer),
            "UVS" => Some(Self::UvSensor),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Anemometer => "ANM",
            Self::RainGauge => "PLG",
            Self::Thermometer => "THM",
            Self::Hygrometer => "HYM",
            Self::ThermoHygro => "THH",
            Self::Pyranometer => "PYM",
            Self::UvSensor => "UVS",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Anemometer => "Anémomètre",
            Self::RainGauge => "Pluviographe / Pluviomètre",
            Self::Thermometer => "Thermomètre",
            Self::Hygrometer => "Hygromètre",
            Self::ThermoHygro => "Thermomètre & Hygromètre",
            Self::Pyranometer => "Pyranomètre",
            Self::UvSensor => "Capteur UV",
        }
    }
}

/// How a station configuration records its observations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StationType {
    DirectReading,
    TapeRecorder,
    DigitalRecorder,
    Other,
}

impl StationType {
    pub const ALL: [Self; 4] = [
        Self::DirectReading,
        Self::TapeRecorder,
        Self::DigitalRecorder,
        Self::Other,
    ];

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "RE" => Some(Self::DirectReading),
            "TP" => Some(Self::TapeRecorder),
            "DR" => Some(Self::DigitalRecorder),
            "OT" => Some(Self::Other),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::DirectReading => "RE",
            Self::TapeRecorder => "TP",
            Self::DigitalRecorder => "DR",
            Self::Other => "OT",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DirectReading => "Lecture directe",
            Self::TapeRecorder => "Station auto (Enregistreurs à bande)",
            Self::DigitalRecorder => "Station auto (Enregistreurs numériques)",
            Self::Other => "Autre type de station",
        }
    }
}

/// Unit system of an archive record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Units {
    Metric,
    Us,
}

impl Units {
    pub const ALL: [Self; 2] = [Self::Metric, Self::Us];

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "ME" => Some(Self::Metric),
            "US" => Some(Self::Us),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Metric => "ME",
            Self::Us => "US",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Metric => "Unités métriques",
            Self::Us => "Unités US",
        }
    }
}
