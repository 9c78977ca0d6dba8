//! Parser for the VATSpy data project's `VATSpy.dat` file.
//!
//! The file is an INI-like text: `[Section]` headers followed by
//! pipe-separated records, with `;` comment lines. Sections of interest are
//! Countries, Airports, FIRs and UIRs; anything else is ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{AppError, Result};
use crate::fixed::boundaries::Boundaries;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_control_name: Option<String>,
}

impl Country {
    fn parse_line(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split('|').collect();
        if tokens.len() != 3 {
            return Err(AppError::InvalidRecord {
                section: "country",
                line: line.to_string(),
            });
        }
        Ok(Self {
            name: tokens[0].to_string(),
            code: tokens[1].to_string(),
            custom_control_name: non_empty(tokens[2]),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub icao: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iata: Option<String>,
    pub fir: String,
    pub is_pseudo: bool,
}

impl Airport {
    fn parse_line(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split('|').collect();
        if tokens.len() != 7 {
            return Err(AppError::InvalidRecord {
                section: "airport",
                line: line.to_string(),
            });
        }
        let latitude = tokens[2].parse().map_err(|_| AppError::InvalidRecord {
            section: "airport",
            line: line.to_string(),
        })?;
        let longitude = tokens[3].parse().map_err(|_| AppError::InvalidRecord {
            section: "airport",
            line: line.to_string(),
        })?;
        Ok(Self {
            icao: tokens[0].to_string(),
            name: tokens[1].to_string(),
            latitude,
            longitude,
            iata: non_empty(tokens[4]),
            fir: tokens[5].to_string(),
            is_pseudo: tokens[6] == "1",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fir {
    pub icao: String,
    pub name: String,
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<Boundaries>,
}

impl Fir {
    fn parse_line(line: &str, bounds: &HashMap<String, Boundaries>) -> Result<Self> {
        let tokens: Vec<&str> = line.split('|').collect();
        if tokens.len() != 4 {
            return Err(AppError::InvalidRecord {
                section: "FIR",
                line: line.to_string(),
            });
        }

        // The 4th token is the boundary id; older records leave it empty and
        // key the boundary by the FIR's own icao.
        let boundaries = bounds
            .get(tokens[3])
            .or_else(|| bounds.get(tokens[0]))
            .cloned();
        if boundaries.is_none() {
            error!("can't find boundaries for fir {} {}", tokens[0], tokens[2]);
        }

        Ok(Self {
            icao: tokens[0].to_string(),
            name: tokens[1].to_string(),
            prefix: tokens[2].to_string(),
            boundaries,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Uir {
    pub icao: String,
    pub name: String,
    pub fir_ids: Vec<String>,
}

impl Uir {
    fn parse_line(line: &str) -> Result<Self> {
        let tokens: Vec<&str> = line.split('|').collect();
        if tokens.len() != 3 {
            return Err(AppError::InvalidRecord {
                section: "UIR",
                line: line.to_string(),
            });
        }
        Ok(Self {
            icao: tokens[0].to_string(),
            name: tokens[1].to_string(),
            fir_ids: tokens[2].trim().split(',').map(str::to_string).collect(),
        })
    }
}

fn non_empty(token: &str) -> Option<String> {
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Parsed VATSpy dataset with lookup indexes over the record vectors.
#[derive(Debug)]
pub struct VatspyData {
    countries: Vec<Country>,
    airports: Vec<Airport>,
    firs: Vec<Fir>,
    uirs: Vec<Uir>,

    country_idx: HashMap<String, usize>,
    airport_icao_idx: HashMap<String, Vec<usize>>,
    airport_iata_idx: HashMap<String, Vec<usize>>,
    fir_icao_idx: HashMap<String, Vec<usize>>,
    fir_prefix_idx: HashMap<String, usize>,
    uir_icao_idx: HashMap<String, usize>,
    uir_fir_idx: HashMap<String, usize>,
}

impl VatspyData {
    pub fn parse(text: &str, bounds: &HashMap<String, Boundaries>) -> Result<Self> {
        let started = std::time::Instant::now();
        debug!("parsing fixed data");

        let mut countries = Vec::new();
        let mut airports = Vec::new();
        let mut firs = Vec::new();
        let mut uirs = Vec::new();

        let mut section = String::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                section = line[1..line.len() - 1].to_lowercase();
                continue;
            }

            match section.as_str() {
                "countries" => countries.push(Country::parse_line(line)?),
                "airports" => airports.push(Airport::parse_line(line)?),
                "firs" => firs.push(Fir::parse_line(line, bounds)?),
                "uirs" => uirs.push(Uir::parse_line(line)?),
                _ => {}
            }
        }

        debug!("fixed data parsed in {:.3}s", started.elapsed().as_secs_f64());
        Ok(Self::new(countries, airports, firs, uirs))
    }

    fn new(countries: Vec<Country>, airports: Vec<Airport>, firs: Vec<Fir>, uirs: Vec<Uir>) -> Self {
        debug!("building fixed data indexes");
        let started = std::time::Instant::now();

        let mut country_idx = HashMap::new();
        for (i, country) in countries.iter().enumerate() {
            country_idx.insert(country.code.clone(), i);
        }

        let mut airport_icao_idx: HashMap<String, Vec<usize>> = HashMap::new();
        let mut airport_iata_idx: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, airport) in airports.iter().enumerate() {
            airport_icao_idx.entry(airport.icao.clone()).or_default().push(i);
            if let Some(iata) = &airport.iata {
                airport_iata_idx.entry(iata.clone()).or_default().push(i);
            }
        }

        let mut fir_icao_idx: HashMap<String, Vec<usize>> = HashMap::new();
        let mut fir_prefix_idx = HashMap::new();
        for (i, fir) in firs.iter().enumerate() {
            fir_icao_idx.entry(fir.icao.clone()).or_default().push(i);
            fir_prefix_idx.insert(fir.prefix.clone(), i);
        }

        let mut uir_icao_idx = HashMap::new();
        let mut uir_fir_idx = HashMap::new();
        for (i, uir) in uirs.iter().enumerate() {
            uir_icao_idx.insert(uir.icao.clone(), i);
            for fir_id in &uir.fir_ids {
                uir_fir_idx.insert(fir_id.clone(), i);
            }
        }

        debug!(
            "fixed data indexes built in {:.3}s",
            started.elapsed().as_secs_f64()
        );

        Self {
            countries,
            airports,
            firs,
            uirs,
            country_idx,
            airport_icao_idx,
            airport_iata_idx,
            fir_icao_idx,
            fir_prefix_idx,
            uir_icao_idx,
            uir_fir_idx,
        }
    }

    /// Resolve a controller callsign to an airport. The part before the first
    /// underscore is an ICAO code, or an IATA code when shorter than 4 chars.
    pub fn find_airport_by_callsign(&self, callsign: &str) -> Option<&Airport> {
        let code = callsign.split('_').next().unwrap_or(callsign);
        let idxs = if code.len() < 4 {
            self.airport_iata_idx.get(code)?
        } else {
            self.airport_icao_idx
                .get(code)
                .or_else(|| self.airport_iata_idx.get(code))?
        };
        idxs.first().map(|&i| &self.airports[i])
    }

    /// Resolve a controller callsign to a FIR: first by the ICAO code before
    /// the underscore, then by the longest matching FIR prefix of at least
    /// five characters of the full callsign.
    pub fn find_fir_by_callsign(&self, callsign: &str) -> Option<&Fir> {
        let code = callsign.split('_').next().unwrap_or(callsign);
        if let Some(idxs) = self.fir_icao_idx.get(code) {
            if let Some(&i) = idxs.first() {
                return Some(&self.firs[i]);
            }
        }

        for len in (5..=callsign.len()).rev() {
            let Some(prefix) = callsign.get(..len) else {
                continue;
            };
            if let Some(&i) = self.fir_prefix_idx.get(prefix) {
                return Some(&self.firs[i]);
            }
        }
        None
    }

    /// Country lookup by the first two letters of an ICAO code.
    pub fn find_country_by_icao(&self, icao: &str) -> Option<&Country> {
        let code = icao.get(..2)?;
        self.country_idx.get(code).map(|&i| &self.countries[i])
    }

    pub fn find_uir_by_icao(&self, icao: &str) -> Option<&Uir> {
        self.uir_icao_idx.get(icao).map(|&i| &self.uirs[i])
    }

    pub fn find_uir_by_fir(&self, fir_icao: &str) -> Option<&Uir> {
        self.uir_fir_idx.get(fir_icao).map(|&i| &self.uirs[i])
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn firs(&self) -> &[Fir] {
        &self.firs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
; VATSpy.dat sample
[Countries]
Netherlands|EH|
Russia|U|Control
Russia|R|Control

[Airports]
EHAM|Amsterdam Schiphol|52.308613|4.763889|AMS|EHAA|0
EHRD|Rotterdam|51.956944|4.437222||EHAA|0
NL-0001|Schiphol Pseudo|52.3|4.76||EHAA|1

[FIRs]
EHAA|Amsterdam|EHAA|EHAA
UUWV|Moscow|MOW_N|UUWV
UTTR|Tashkent|TAS|UTTR

[UIRs]
EUR-W|West European UIR|EHAA,EBBU

[IDL]
180|90
";

    fn bounds() -> HashMap<String, Boundaries> {
        let raw = serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"id": "EHAA"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[3.0, 51.0], [7.0, 51.0], [7.0, 54.0], [3.0, 54.0], [3.0, 51.0]]]
                    }
                }
            ]
        })
        .to_string();
        crate::fixed::boundaries::parse_boundaries(&raw).unwrap()
    }

    #[test]
    fn test_parse_sections() {
        let data = VatspyData::parse(SAMPLE, &bounds()).unwrap();
        assert_eq!(data.airports().len(), 3);
        assert_eq!(data.firs().len(), 3);

        let eham = &data.airports()[0];
        assert_eq!(eham.icao, "EHAM");
        assert_eq!(eham.iata.as_deref(), Some("AMS"));
        assert!(!eham.is_pseudo);
        assert!(data.airports()[2].is_pseudo);
        assert!(data.airports()[1].iata.is_none());
    }

    #[test]
    fn test_airport_lookup() {
        let data = VatspyData::parse(SAMPLE, &bounds()).unwrap();

        let by_icao = data.find_airport_by_callsign("EHAM_TWR").unwrap();
        assert_eq!(by_icao.icao, "EHAM");

        // codes shorter than 4 characters go through the IATA index
        let by_iata = data.find_airport_by_callsign("AMS_GND").unwrap();
        assert_eq!(by_iata.icao, "EHAM");

        assert!(data.find_airport_by_callsign("XXXX_TWR").is_none());
    }

    #[test]
    fn test_fir_lookup() {
        let data = VatspyData::parse(SAMPLE, &bounds()).unwrap();

        let by_icao = data.find_fir_by_callsign("EHAA_CTR").unwrap();
        assert_eq!(by_icao.icao, "EHAA");
        assert!(by_icao.boundaries.is_some());

        // falls back to prefix matching against the full callsign
        let by_prefix = data.find_fir_by_callsign("MOW_N_CTR").unwrap();
        assert_eq!(by_prefix.icao, "UUWV");
        // no boundary feature for UUWV in the test set
        assert!(by_prefix.boundaries.is_none());

        // prefixes shorter than five characters are never tried, so the
        // TAS record is unreachable through the fallback
        assert!(data.find_fir_by_callsign("TAS_CTR").is_none());

        assert!(data.find_fir_by_callsign("LFFF_CTR").is_none());
    }

    #[test]
    fn test_country_lookup_includes_first_record() {
        let data = VatspyData::parse(SAMPLE, &bounds()).unwrap();

        // the record at vector index 0 must be reachable
        let nl = data.find_country_by_icao("EHAM").unwrap();
        assert_eq!(nl.name, "Netherlands");
        assert!(nl.custom_control_name.is_none());

        assert!(data.find_country_by_icao("ZZZZ").is_none());
        assert!(data.find_country_by_icao("E").is_none());
    }

    #[test]
    fn test_uir_lookup() {
        let data = VatspyData::parse(SAMPLE, &bounds()).unwrap();
        let uir = data.find_uir_by_icao("EUR-W").unwrap();
        assert_eq!(uir.fir_ids, vec!["EHAA", "EBBU"]);
        assert_eq!(data.find_uir_by_fir("EBBU").unwrap().icao, "EUR-W");
        assert!(data.find_uir_by_fir("EHAM").is_none());
    }

    #[test]
    fn test_invalid_record_rejected() {
        let err = VatspyData::parse("[Airports]\nEHAM|broken", &HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("invalid airport line"));
    }
}
