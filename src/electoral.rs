//! Electoral Dataset
//!
//! Hand-compiled 2024 Lok Sabha standings bundled with the client:
//! national party totals and per-state seat breakdowns keyed by
//! ISO 3166-2 code. Read-only.

/// Seats in the house
pub const TOTAL_SEATS: usize = 543;

/// National standing of one party
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartyStanding {
    pub name: &'static str,
    pub abbr: &'static str,
    pub seats: u32,
    /// Share of the house, in percent
    pub seat_share: f64,
    /// Share of the national vote, in percent
    pub vote_share: f64,
    pub symbol_url: &'static str,
    pub description: &'static str,
}

/// Seats won by one party in a state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeatCount {
    pub party: &'static str,
    pub seats: u32,
    pub colour: &'static str,
}

/// Result of one state or union territory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateResult {
    pub code: &'static str,
    pub name: &'static str,
    pub total: u32,
    pub results: &'static [SeatCount],
}

/// Colour bucket used by the region map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionBucket {
    BjpLead = 1,
    IncLead = 2,
    RegionalLead = 3,
    Mixed = 4,
}

impl RegionBucket {
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

/// Labels whose lead marks a state as regionally held
const REGIONAL_PARTIES: [&str; 8] = ["SP", "TMC", "DMK", "TDP", "BJD", "AAP", "JMM", "JKNC"];

impl StateResult {
    /// Party with the most seats; on a tie the later row wins
    pub fn leader(&self) -> Option<&'static SeatCount> {
        self.results
            .iter()
            .reduce(|prev, current| if prev.seats > current.seats { prev } else { current })
    }

    pub fn bucket(&self) -> RegionBucket {
        let Some(leader) = self.leader() else {
            return RegionBucket::Mixed;
        };

        if leader.party.contains("BJP") {
            RegionBucket::BjpLead
        } else if leader.party.contains("INC") {
            RegionBucket::IncLead
        } else if REGIONAL_PARTIES.iter().any(|p| leader.party.contains(p)) {
            RegionBucket::RegionalLead
        } else {
            RegionBucket::Mixed
        }
    }

    /// Width of a party's bar, as a percentage of the state's seats
    pub fn share_of(&self, row: &SeatCount) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(row.seats) / f64::from(self.total) * 100.0
        }
    }
}

/// National standings, largest party first
pub fn national_standings() -> &'static [PartyStanding] {
    &NATIONAL_STANDINGS
}

/// Every state and union territory
pub fn states() -> &'static [StateResult] {
    &STATE_RESULTS
}

/// Result for an ISO code such as `IN-UP`
pub fn state_result(code: &str) -> Option<&'static StateResult> {
    STATE_RESULTS.iter().find(|s| s.code == code)
}

/// Hemicycle colour of a party abbreviation
pub fn party_colour(abbr: &str) -> &'static str {
    match abbr {
        "BJP" => "#ff9933",
        "INC" => "#3B82F6",
        "SP" => "#EF4323",
        "TMC" => "#10B981",
        "DMK" => "#EF4444",
        "TDP" => "#FACC15",
        "AAP" => "#ffc107",
        _ => "#888",
    }
}

const NATIONAL_STANDINGS: [PartyStanding; 16] = [
    PartyStanding {
        name: "Bharatiya Janata Party",
        abbr: "BJP",
        seats: 240,
        seat_share: 44.2,
        vote_share: 36.6,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/1/1e/Bharatiya_Janata_Party_logo.svg/240px-Bharatiya_Janata_Party_logo.svg.png",
        description: "Ruling party, leads the NDA alliance. Ideology: Hindutva, Integral Humanism.",
    },
    PartyStanding {
        name: "Indian National Congress",
        abbr: "INC",
        seats: 99,
        seat_share: 18.2,
        vote_share: 21.2,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/6/6c/Indian_National_Congress_hand_logo.svg/240px-Indian_National_Congress_hand_logo.svg.png",
        description: "Main opposition, leads the INDIA alliance. Ideology: Secularism, Social Liberalism.",
    },
    PartyStanding {
        name: "Samajwadi Party",
        abbr: "SP",
        seats: 37,
        seat_share: 6.8,
        vote_share: 4.6,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/0/03/Samajwadi_Party_Flag.svg/240px-Samajwadi_Party_Flag.svg.png",
        description: "Major socialist party based in Uttar Pradesh. Key member of INDIA bloc.",
    },
    PartyStanding {
        name: "All India Trinamool Congress",
        abbr: "TMC",
        seats: 29,
        seat_share: 5.3,
        vote_share: 4.4,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/c/c0/All_India_Trinamool_Congress_symbol.svg/240px-All_India_Trinamool_Congress_symbol.svg.png",
        description: "Dominant governing party in West Bengal. Led by Mamata Banerjee.",
    },
    PartyStanding {
        name: "Dravida Munnetra Kazhagam",
        abbr: "DMK",
        seats: 22,
        seat_share: 4.1,
        vote_share: 2.0,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/0/05/DMK_Flag.svg/240px-DMK_Flag.svg.png",
        description: "Governing party of Tamil Nadu. Ideology: Social Justice, Dravidianism.",
    },
    PartyStanding {
        name: "Telugu Desam Party",
        abbr: "TDP",
        seats: 16,
        seat_share: 2.9,
        vote_share: 2.0,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/4/42/Telugu_Desam_Party_Flag.svg/240px-Telugu_Desam_Party_Flag.svg.png",
        description: "Ruling party of Andhra Pradesh. Key ally in the NDA government.",
    },
    PartyStanding {
        name: "Janata Dal (United)",
        abbr: "JD(U)",
        seats: 12,
        seat_share: 2.2,
        vote_share: 1.3,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/d/d3/Janata_Dal_%28United%29_Flag.svg/240px-Janata_Dal_%28United%29_Flag.svg.png",
        description: "Governing party in Bihar. Led by Nitish Kumar, NDA ally.",
    },
    PartyStanding {
        name: "Shiv Sena (UBT)",
        abbr: "SS(UBT)",
        seats: 9,
        seat_share: 1.7,
        vote_share: 2.5,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/6/65/Shiv_Sena_%28Uddhav_Balasaheb_Thackeray%29_logo.svg/240px-Shiv_Sena_%28Uddhav_Balasaheb_Thackeray%29_logo.svg.png",
        description: "Faction led by Uddhav Thackeray. Part of MVA (INDIA) in Maharashtra.",
    },
    PartyStanding {
        name: "NCP (Sharadchandra Pawar)",
        abbr: "NCP(SP)",
        seats: 8,
        seat_share: 1.5,
        vote_share: 1.0,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/8/86/NCP_Sharad_Pawar_Flag.svg/240px-NCP_Sharad_Pawar_Flag.svg.png",
        description: "Faction led by Sharad Pawar. Part of MVA (INDIA) in Maharashtra.",
    },
    PartyStanding {
        name: "Shiv Sena",
        abbr: "SHS",
        seats: 7,
        seat_share: 1.3,
        vote_share: 1.9,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/4/4a/Shiv_Sena_Logo.svg/180px-Shiv_Sena_Logo.svg.png",
        description: "Faction led by Eknath Shinde. NDA ally in Maharashtra.",
    },
    PartyStanding {
        name: "Lok Janshakti Party (RV)",
        abbr: "LJP(RV)",
        seats: 5,
        seat_share: 0.9,
        vote_share: 0.5,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/8/87/LJP_Ram_Vilas_Symbol.svg/180px-LJP_Ram_Vilas_Symbol.svg.png",
        description: "Bihar-based party led by Chirag Paswan. NDA ally.",
    },
    PartyStanding {
        name: "CPI (Marxist)",
        abbr: "CPI(M)",
        seats: 4,
        seat_share: 0.7,
        vote_share: 1.8,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a2/Cpm_election_symbol.svg/200px-Cpm_election_symbol.svg.png",
        description: "Leading Left party, governs Kerala. Part of INDIA bloc.",
    },
    PartyStanding {
        name: "Aam Aadmi Party",
        abbr: "AAP",
        seats: 3,
        seat_share: 0.6,
        vote_share: 1.1,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/3/30/Aam_Aadmi_Party_logo_%28English%29.svg/240px-Aam_Aadmi_Party_logo_%28English%29.svg.png",
        description: "Governing Delhi & Punjab. Part of INDIA bloc.",
    },
    PartyStanding {
        name: "JMM",
        abbr: "JMM",
        seats: 3,
        seat_share: 0.6,
        vote_share: 0.4,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a4/Jharkhand_Mukti_Morcha_flag.svg/240px-Jharkhand_Mukti_Morcha_flag.svg.png",
        description: "Ruling party in Jharkhand. Part of INDIA bloc.",
    },
    PartyStanding {
        name: "Communist Party of India",
        abbr: "CPI",
        seats: 2,
        seat_share: 0.4,
        vote_share: 0.5,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/1/18/CPI-banner.svg/240px-CPI-banner.svg.png",
        description: "Left wing party. Part of INDIA bloc.",
    },
    PartyStanding {
        name: "AIMIM",
        abbr: "AIMIM",
        seats: 1,
        seat_share: 0.2,
        vote_share: 0.3,
        symbol_url: "https://upload.wikimedia.org/wikipedia/commons/thumb/c/c4/All_India_Majlis-e-Ittehadul_Muslimeen.svg/240px-All_India_Majlis-e-Ittehadul_Muslimeen.svg.png",
        description: "Hyderabad based party led by Asaduddin Owaisi.",
    },
];

const SAFFRON: &str = "#ff9933";
const BLUE: &str = "#19aaed";
const RED: &str = "#d92c2c";
const GREEN: &str = "#22c55e";
const AMBER: &str = "#ffc107";
const GREY: &str = "#999";
const DARK: &str = "#333";

macro_rules! seats {
    ($($party:literal => $seats:literal @ $colour:expr),* $(,)?) => {
        &[$(SeatCount { party: $party, seats: $seats, colour: $colour }),*]
    };
}

const STATE_RESULTS: [StateResult; 36] = [
    StateResult { code: "IN-UP", name: "Uttar Pradesh", total: 80, results: seats!["Samajwadi Party" => 37 @ RED, "BJP" => 33 @ SAFFRON, "INC" => 6 @ BLUE, "Others" => 4 @ GREY] },
    StateResult { code: "IN-MH", name: "Maharashtra", total: 48, results: seats!["INC" => 13 @ BLUE, "BJP" => 9 @ SAFFRON, "Shiv Sena (UBT)" => 9 @ AMBER, "NCP (SP)" => 8 @ SAFFRON, "Others" => 9 @ GREY] },
    StateResult { code: "IN-WB", name: "West Bengal", total: 42, results: seats!["TMC" => 29 @ GREEN, "BJP" => 12 @ SAFFRON, "INC" => 1 @ BLUE] },
    StateResult { code: "IN-TN", name: "Tamil Nadu", total: 39, results: seats!["DMK" => 22 @ RED, "INC" => 9 @ BLUE, "VCK" => 2 @ DARK, "CPI" => 2 @ RED, "CPI(M)" => 2 @ RED] },
    StateResult { code: "IN-BR", name: "Bihar", total: 40, results: seats!["JD(U)" => 12 @ GREEN, "BJP" => 12 @ SAFFRON, "LJP (RV)" => 5 @ SAFFRON, "RJD" => 4 @ GREEN, "INC" => 3 @ BLUE] },
    StateResult { code: "IN-KA", name: "Karnataka", total: 28, results: seats!["BJP" => 17 @ SAFFRON, "INC" => 9 @ BLUE, "JD(S)" => 2 @ GREEN] },
    StateResult { code: "IN-GJ", name: "Gujarat", total: 26, results: seats!["BJP" => 25 @ SAFFRON, "INC" => 1 @ BLUE] },
    StateResult { code: "IN-RJ", name: "Rajasthan", total: 25, results: seats!["BJP" => 14 @ SAFFRON, "INC" => 8 @ BLUE, "Others" => 3 @ GREY] },
    StateResult { code: "IN-AP", name: "Andhra Pradesh", total: 25, results: seats!["TDP" => 16 @ "#ffeb3b", "YSRCP" => 4 @ BLUE, "BJP" => 3 @ SAFFRON, "JSP" => 2 @ RED] },
    StateResult { code: "IN-MP", name: "Madhya Pradesh", total: 29, results: seats!["BJP" => 29 @ SAFFRON] },
    StateResult { code: "IN-OR", name: "Odisha", total: 21, results: seats!["BJP" => 20 @ SAFFRON, "INC" => 1 @ BLUE] },
    StateResult { code: "IN-KL", name: "Kerala", total: 20, results: seats!["INC" => 14 @ BLUE, "IUML" => 2 @ GREEN, "CPI(M)" => 1 @ RED, "BJP" => 1 @ SAFFRON] },
    StateResult { code: "IN-TG", name: "Telangana", total: 17, results: seats!["BJP" => 8 @ SAFFRON, "INC" => 8 @ BLUE, "AIMIM" => 1 @ GREEN] },
    StateResult { code: "IN-CT", name: "Chhattisgarh", total: 11, results: seats!["BJP" => 10 @ SAFFRON, "INC" => 1 @ BLUE] },
    StateResult { code: "IN-JH", name: "Jharkhand", total: 14, results: seats!["BJP" => 8 @ SAFFRON, "JMM" => 3 @ GREEN, "INC" => 2 @ BLUE] },
    StateResult { code: "IN-PB", name: "Punjab", total: 13, results: seats!["INC" => 7 @ BLUE, "AAP" => 3 @ AMBER, "SAD" => 1 @ GREY] },
    StateResult { code: "IN-DL", name: "Delhi", total: 7, results: seats!["BJP" => 7 @ SAFFRON] },
    StateResult { code: "IN-HR", name: "Haryana", total: 10, results: seats!["BJP" => 5 @ SAFFRON, "INC" => 5 @ BLUE] },
    StateResult { code: "IN-UT", name: "Uttarakhand", total: 5, results: seats!["BJP" => 5 @ SAFFRON] },
    StateResult { code: "IN-HP", name: "Himachal Pradesh", total: 4, results: seats!["BJP" => 4 @ SAFFRON] },
    StateResult { code: "IN-JK", name: "Jammu & Kashmir", total: 5, results: seats!["JKNC" => 2 @ GREEN, "BJP" => 2 @ SAFFRON, "IND" => 1 @ GREY] },
    StateResult { code: "IN-AS", name: "Assam", total: 14, results: seats!["BJP" => 9 @ SAFFRON, "INC" => 3 @ BLUE, "UPPL" => 1 @ GREEN, "AGP" => 1 @ GREEN] },
    StateResult { code: "IN-GA", name: "Goa", total: 2, results: seats!["BJP" => 1 @ SAFFRON, "INC" => 1 @ BLUE] },
    StateResult { code: "IN-AR", name: "Arunachal Pradesh", total: 2, results: seats!["BJP" => 2 @ SAFFRON] },
    StateResult { code: "IN-MN", name: "Manipur", total: 2, results: seats!["INC" => 2 @ BLUE] },
    StateResult { code: "IN-ML", name: "Meghalaya", total: 2, results: seats!["VPP" => 1 @ DARK, "INC" => 1 @ BLUE] },
    StateResult { code: "IN-MZ", name: "Mizoram", total: 1, results: seats!["ZPM" => 1 @ GREEN] },
    StateResult { code: "IN-NL", name: "Nagaland", total: 1, results: seats!["INC" => 1 @ BLUE] },
    StateResult { code: "IN-SK", name: "Sikkim", total: 1, results: seats!["SKM" => 1 @ GREEN] },
    StateResult { code: "IN-TR", name: "Tripura", total: 2, results: seats!["BJP" => 2 @ SAFFRON] },
    StateResult { code: "IN-CH", name: "Chandigarh", total: 1, results: seats!["INC" => 1 @ BLUE] },
    StateResult { code: "IN-LD", name: "Lakshadweep", total: 1, results: seats!["INC" => 1 @ BLUE] },
    StateResult { code: "IN-AN", name: "Andaman & Nicobar", total: 1, results: seats!["BJP" => 1 @ SAFFRON] },
    StateResult { code: "IN-LA", name: "Ladakh", total: 1, results: seats!["IND" => 1 @ GREY] },
    StateResult { code: "IN-DN", name: "Dadra & Nagar Haveli", total: 2, results: seats!["BJP" => 1 @ SAFFRON, "IND" => 1 @ GREY] },
    StateResult { code: "IN-PY", name: "Puducherry", total: 1, results: seats!["INC" => 1 @ BLUE] },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_standings_sorted() {
        let standings = national_standings();
        assert_eq!(standings.len(), 16);
        assert_eq!(standings[0].abbr, "BJP");
        assert!(standings.windows(2).all(|w| w[0].seats >= w[1].seats));
        let total: u32 = standings.iter().map(|p| p.seats).sum();
        assert!(total as usize <= TOTAL_SEATS);
    }

    #[test]
    fn test_state_lookup() {
        let up = state_result("IN-UP").unwrap();
        assert_eq!(up.name, "Uttar Pradesh");
        assert_eq!(up.total, 80);
        assert!(state_result("IN-XX").is_none());
    }

    #[test]
    fn test_leader_tie_goes_to_later_row() {
        let haryana = state_result("IN-HR").unwrap();
        assert_eq!(haryana.leader().unwrap().party, "INC");
        assert_eq!(haryana.bucket(), RegionBucket::IncLead);
    }

    #[test]
    fn test_region_buckets() {
        assert_eq!(state_result("IN-GJ").unwrap().bucket(), RegionBucket::BjpLead);
        assert_eq!(state_result("IN-WB").unwrap().bucket(), RegionBucket::RegionalLead);
        // "Samajwadi Party" carries no regional token, so UP falls back to mixed
        assert_eq!(state_result("IN-UP").unwrap().bucket(), RegionBucket::Mixed);
        assert_eq!(state_result("IN-LA").unwrap().bucket(), RegionBucket::Mixed);
        assert_eq!(RegionBucket::Mixed.value(), 4);
    }

    #[test]
    fn test_share_of() {
        let delhi = state_result("IN-DL").unwrap();
        assert_eq!(delhi.share_of(&delhi.results[0]), 100.0);
    }

    #[test]
    fn test_party_colour_fallback() {
        assert_eq!(party_colour("BJP"), "#ff9933");
        assert_eq!(party_colour("JD(U)"), "#888");
    }
}
