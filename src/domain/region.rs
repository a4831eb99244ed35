//! Region lookup table (US states + DC).
//!
//! The table is a `const` sorted by code, so code lookups are a binary search
//! and nothing is built at run time.

/// A resolved region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub code: &'static str,
    pub name: &'static str,
}

const REGIONS: [Region; 51] = [
    Region { code: "AK", name: "Alaska" },
    Region { code: "AL", name: "Alabama" },
    Region { code: "AR", name: "Arkansas" },
    Region { code: "AZ", name: "Arizona" },
    Region { code: "CA", name: "California" },
    Region { code: "CO", name: "Colorado" },
    Region { code: "CT", name: "Connecticut" },
    Region { code: "DC", name: "District of Columbia" },
    Region { code: "DE", name: "Delaware" },
    Region { code: "FL", name: "Florida" },
    Region { code: "GA", name: "Georgia" },
    Region { code: "HI", name: "Hawaii" },
    Region { code: "IA", name: "Iowa" },
    Region { code: "ID", name: "Idaho" },
    Region { code: "IL", name: "Illinois" },
    Region { code: "IN", name: "Indiana" },
    Region { code: "KS", name: "Kansas" },
    Region { code: "KY", name: "Kentucky" },
    Region { code: "LA", name: "Louisiana" },
    Region { code: "MA", name: "Massachusetts" },
    Region { code: "MD", name: "Maryland" },
    Region { code: "ME", name: "Maine" },
    Region { code: "MI", name: "Michigan" },
    Region { code: "MN", name: "Minnesota" },
    Region { code: "MO", name: "Missouri" },
    Region { code: "MS", name: "Mississippi" },
    Region { code: "MT", name: "Montana" },
    Region { code: "NC", name: "North Carolina" },
    Region { code: "ND", name: "North Dakota" },
    Region { code: "NE", name: "Nebraska" },
    Region { code: "NH", name: "New Hampshire" },
    Region { code: "NJ", name: "New Jersey" },
    Region { code: "NM", name: "New Mexico" },
    Region { code: "NV", name: "Nevada" },
    Region { code: "NY", name: "New York" },
    Region { code: "OH", name: "Ohio" },
    Region { code: "OK", name: "Oklahoma" },
    Region { code: "OR", name: "Oregon" },
    Region { code: "PA", name: "Pennsylvania" },
    Region { code: "RI", name: "Rhode Island" },
    Region { code: "SC", name: "South Carolina" },
    Region { code: "SD", name: "South Dakota" },
    Region { code: "TN", name: "Tennessee" },
    Region { code: "TX", name: "Texas" },
    Region { code: "UT", name: "Utah" },
    Region { code: "VA", name: "Virginia" },
    Region { code: "VT", name: "Vermont" },
    Region { code: "WA", name: "Washington" },
    Region { code: "WI", name: "Wisconsin" },
    Region { code: "WV", name: "West Virginia" },
    Region { code: "WY", name: "Wyoming" },
];

impl Region {
    /// Exact (case-insensitive) two-letter code lookup.
    pub fn from_code(code: &str) -> Option<Region> {
        let code = code.trim().to_ascii_uppercase();
        REGIONS
            .binary_search_by(|r| r.code.cmp(code.as_str()))
            .ok()
            .map(|idx| REGIONS[idx])
    }

    /// Resolve a free-form location string: a code, or a full region name.
    ///
    /// Names match case-insensitively and ignore surrounding whitespace.
    /// A trailing `, XX` code suffix (e.g. `"Austin, TX"`) also resolves.
    pub fn lookup(raw: &str) -> Option<Region> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(region) = Self::from_code(raw) {
            return Some(region);
        }
        if let Some(region) = REGIONS.iter().find(|r| r.name.eq_ignore_ascii_case(raw)) {
            return Some(*region);
        }
        let (_, suffix) = raw.rsplit_once(',')?;
        let suffix = suffix.trim();
        Self::from_code(suffix).or_else(|| {
            REGIONS
                .iter()
                .find(|r| r.name.eq_ignore_ascii_case(suffix))
                .copied()
        })
    }
}
