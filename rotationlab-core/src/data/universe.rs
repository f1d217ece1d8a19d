//! Universe configuration — sector-organized symbol lists.
//!
//! The built-in universe is an explicit enumeration of NSE sectors
//! (`SectorId`) with their constituents. A TOML file can replace it with
//! `[[sectors]]` tables; sector order is preserved either way and drives the
//! order of the report.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("read universe file: {0}")]
    Read(String),

    #[error("parse universe TOML: {0}")]
    Parse(String),

    #[error("serialize universe: {0}")]
    Serialize(String),

    #[error("unknown sector '{name}' (available: {available})")]
    UnknownSector { name: String, available: String },

    #[error("duplicate sector '{0}'")]
    DuplicateSector(String),

    #[error("universe has no sectors")]
    Empty,
}

/// Built-in sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectorId {
    BankingAndFinance,
    Automobiles,
    OilAndGas,
    ItAndServices,
    Pharmaceuticals,
    MetalsAndMining,
    Chemicals,
    ConstructionAndCement,
    ConsumerGoods,
    Utilities,
    RealEstate,
    Telecom,
    Media,
    Retail,
    CapitalGoodsAndEngineering,
    TransportationAndLogistics,
    HospitalAndHealthcare,
    Miscellaneous,
}

impl SectorId {
    pub const ALL: [SectorId; 18] = [
        SectorId::BankingAndFinance,
        SectorId::Automobiles,
        SectorId::OilAndGas,
        SectorId::ItAndServices,
        SectorId::Pharmaceuticals,
        SectorId::MetalsAndMining,
        SectorId::Chemicals,
        SectorId::ConstructionAndCement,
        SectorId::ConsumerGoods,
        SectorId::Utilities,
        SectorId::RealEstate,
        SectorId::Telecom,
        SectorId::Media,
        SectorId::Retail,
        SectorId::CapitalGoodsAndEngineering,
        SectorId::TransportationAndLogistics,
        SectorId::HospitalAndHealthcare,
        SectorId::Miscellaneous,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SectorId::BankingAndFinance => "Banking and Finance",
            SectorId::Automobiles => "Automobiles",
            SectorId::OilAndGas => "Oil and Gas",
            SectorId::ItAndServices => "IT and Services",
            SectorId::Pharmaceuticals => "Pharmaceuticals",
            SectorId::MetalsAndMining => "Metals and Mining",
            SectorId::Chemicals => "Chemicals",
            SectorId::ConstructionAndCement => "Construction and Cement",
            SectorId::ConsumerGoods => "Consumer Goods",
            SectorId::Utilities => "Utilities",
            SectorId::RealEstate => "Real Estate",
            SectorId::Telecom => "Telecom",
            SectorId::Media => "Media",
            SectorId::Retail => "Retail",
            SectorId::CapitalGoodsAndEngineering => "Capital Goods and Engineering",
            SectorId::TransportationAndLogistics => "Transportation and Logistics",
            SectorId::HospitalAndHealthcare => "Hospital and Healthcare",
            SectorId::Miscellaneous => "Miscellaneous",
        }
    }

    /// NSE trading symbols (without the `-EQ` series suffix).
    pub fn symbols(&self) -> &'static [&'static str] {
        match self {
            SectorId::BankingAndFinance => &[
                "HDFCBANK", "ICICIBANK", "SBIN", "KOTAKBANK", "AXISBANK", "INDUSINDBK",
                "BAJFINANCE", "BAJAJFINSV",
            ],
            SectorId::Automobiles => &[
                "MARUTI", "TATAMOTORS", "M&M", "BAJAJ-AUTO", "HEROMOTOCO", "EICHERMOT",
                "TVSMOTOR", "ASHOKLEY",
            ],
            SectorId::OilAndGas => &[
                "RELIANCE", "ONGC", "IOC", "BPCL", "HINDPETRO", "GAIL", "OIL", "PETRONET",
            ],
            SectorId::ItAndServices => &[
                "TCS", "INFY", "HCLTECH", "WIPRO", "TECHM", "LTIM", "PERSISTENT", "COFORGE",
            ],
            SectorId::Pharmaceuticals => &[
                "SUNPHARMA", "DRREDDY", "CIPLA", "DIVISLAB", "LUPIN", "AUROPHARMA",
                "ZYDUSLIFE", "TORNTPHARM",
            ],
            SectorId::MetalsAndMining => &[
                "TATASTEEL", "JSWSTEEL", "HINDALCO", "VEDL", "SAIL", "NMDC", "COALINDIA",
                "JINDALSTEL",
            ],
            SectorId::Chemicals => &[
                "PIDILITIND", "SRF", "UPL", "DEEPAKNTR", "AARTIIND", "TATACHEM", "NAVINFLUOR",
                "PIIND",
            ],
            SectorId::ConstructionAndCement => &[
                "LT", "ULTRACEMCO", "GRASIM", "AMBUJACEM", "ACC", "SHREECEM", "DALBHARAT",
                "RAMCOCEM",
            ],
            SectorId::ConsumerGoods => &[
                "HINDUNILVR", "ITC", "NESTLEIND", "BRITANNIA", "DABUR", "MARICO", "GODREJCP",
                "TATACONSUM",
            ],
            SectorId::Utilities => &[
                "NTPC", "POWERGRID", "TATAPOWER", "ADANIPOWER", "NHPC", "TORNTPOWER", "CESC",
            ],
            SectorId::RealEstate => &[
                "DLF", "GODREJPROP", "OBEROIRLTY", "PRESTIGE", "PHOENIXLTD", "BRIGADE", "SOBHA",
            ],
            SectorId::Telecom => &["BHARTIARTL", "IDEA", "INDUSTOWER", "TATACOMM", "HFCL"],
            SectorId::Media => &["ZEEL", "SUNTV", "PVRINOX", "NETWORK18", "NAZARA", "SAREGAMA"],
            SectorId::Retail => &["DMART", "TRENT", "ABFRL", "SHOPERSTOP", "VMART", "NYKAA"],
            SectorId::CapitalGoodsAndEngineering => &[
                "SIEMENS", "ABB", "BHEL", "BEL", "HAL", "CUMMINSIND", "THERMAX",
            ],
            SectorId::TransportationAndLogistics => &[
                "ADANIPORTS", "CONCOR", "INDIGO", "BLUEDART", "GESHIP", "DELHIVERY",
            ],
            SectorId::HospitalAndHealthcare => &[
                "APOLLOHOSP", "MAXHEALTH", "FORTIS", "NH", "METROPOLIS", "LALPATHLAB",
            ],
            SectorId::Miscellaneous => &[
                "TITAN", "ASIANPAINT", "HAVELLS", "VOLTAS", "PAGEIND", "INDHOTEL",
            ],
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A sector and its member symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub name: String,
    pub symbols: Vec<String>,
}

impl From<SectorId> for Sector {
    fn from(id: SectorId) -> Self {
        Self {
            name: id.name().to_string(),
            symbols: id.symbols().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The complete, ordered universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: Vec<Sector>,
}

impl Universe {
    /// All built-in NSE sectors in enumeration order.
    pub fn default_nse() -> Self {
        Self {
            sectors: SectorId::ALL.into_iter().map(Sector::from).collect(),
        }
    }

    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| UniverseError::Read(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, UniverseError> {
        let universe: Self =
            toml::from_str(content).map_err(|e| UniverseError::Parse(e.to_string()))?;
        universe.validate()?;
        Ok(universe)
    }

    /// Serialize the universe to TOML.
    pub fn to_toml(&self) -> Result<String, UniverseError> {
        toml::to_string_pretty(self).map_err(|e| UniverseError::Serialize(e.to_string()))
    }

    /// Reject empty universes and repeated sector names.
    pub fn validate(&self) -> Result<(), UniverseError> {
        if self.sectors.is_empty() {
            return Err(UniverseError::Empty);
        }
        let mut seen = HashSet::new();
        for sector in &self.sectors {
            if !seen.insert(sector.name.to_ascii_lowercase()) {
                return Err(UniverseError::DuplicateSector(sector.name.clone()));
            }
        }
        Ok(())
    }

    /// Keep only the named sectors (case-insensitive), in universe order.
    pub fn select(&self, names: &[String]) -> Result<Self, UniverseError> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        for name in names {
            if self.sector(name).is_none() {
                return Err(UniverseError::UnknownSector {
                    name: name.clone(),
                    available: self.sector_names().join(", "),
                });
            }
        }
        let sectors = self
            .sectors
            .iter()
            .filter(|s| names.iter().any(|n| s.name.eq_ignore_ascii_case(n.trim())))
            .cloned()
            .collect();
        Ok(Self { sectors })
    }

    /// Look up a sector by name (case-insensitive).
    pub fn sector(&self, name: &str) -> Option<&Sector> {
        self.sectors
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Get the list of sector names.
    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.iter().map(|s| s.name.as_str()).collect()
    }

    /// Total number of symbols.
    pub fn symbol_count(&self) -> usize {
        self.sectors.iter().map(|s| s.symbols.len()).sum()
    }
}
