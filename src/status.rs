//! Compiled-in conservation status scale.
//!
//! Seven categories, least to most severe. The table is the only source of
//! truth; record data only carries the short code.

use std::fmt;

/// Closed set of status codes, in scale order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    LeastConcern,
    NearThreatened,
    Vulnerable,
    Endangered,
    CriticallyEndangered,
    ExtinctInTheWild,
    Extinct,
}

impl StatusCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeastConcern => "LC",
            Self::NearThreatened => "NT",
            Self::Vulnerable => "VU",
            Self::Endangered => "EN",
            Self::CriticallyEndangered => "CR",
            Self::ExtinctInTheWild => "EW",
            Self::Extinct => "EX",
        }
    }

    /// Case-insensitive, whitespace-tolerant parse.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        SCALE
            .iter()
            .map(|d| d.code)
            .find(|code| code.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display attributes for one status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDescriptor {
    pub code: StatusCode,
    pub label: &'static str,
    /// `#RRGGBB`.
    pub color: &'static str,
    pub description: &'static str,
}

const SCALE: [StatusDescriptor; 7] = [
    StatusDescriptor {
        code: StatusCode::LeastConcern,
        label: "Least Concern",
        color: "#60C659",
        description: "Widespread and abundant; no significant threats.",
    },
    StatusDescriptor {
        code: StatusCode::NearThreatened,
        label: "Near Threatened",
        color: "#CCE226",
        description: "Close to qualifying for a threatened category in the near future.",
    },
    StatusDescriptor {
        code: StatusCode::Vulnerable,
        label: "Vulnerable",
        color: "#F9E814",
        description: "Facing a high risk of extinction in the wild.",
    },
    StatusDescriptor {
        code: StatusCode::Endangered,
        label: "Endangered",
        color: "#FC7F3F",
        description: "Facing a very high risk of extinction in the wild.",
    },
    StatusDescriptor {
        code: StatusCode::CriticallyEndangered,
        label: "Critically Endangered",
        color: "#D81E05",
        description: "Facing an extremely high risk of extinction in the wild.",
    },
    StatusDescriptor {
        code: StatusCode::ExtinctInTheWild,
        label: "Extinct in the Wild",
        color: "#542344",
        description: "Survives only in captivity or outside its historic range.",
    },
    StatusDescriptor {
        code: StatusCode::Extinct,
        label: "Extinct",
        color: "#000000",
        description: "No reasonable doubt that the last individual has died.",
    },
];

/// Resolve a raw code from record data. Unknown or absent codes yield `None`.
pub fn describe(code: Option<&str>) -> Option<&'static StatusDescriptor> {
    let code = StatusCode::parse(code?)?;
    SCALE.iter().find(|d| d.code == code)
}

/// All codes in fixed scale order.
pub fn all_codes() -> impl Iterator<Item = &'static StatusDescriptor> {
    SCALE.iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_known_codes() {
        let vu = describe(Some("VU")).unwrap();
        assert_eq!(vu.label, "Vulnerable");
        assert_eq!(vu.color, "#F9E814");
        assert_eq!(describe(Some(" cr ")).unwrap().code, StatusCode::CriticallyEndangered);
    }

    #[test]
    fn unknown_and_missing_codes_are_absent() {
        assert!(describe(None).is_none());
        assert!(describe(Some("DD")).is_none());
        assert!(describe(Some("")).is_none());
    }

    #[test]
    fn scale_order_is_stable() {
        let codes: Vec<&str> = all_codes().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, ["LC", "NT", "VU", "EN", "CR", "EW", "EX"]);
        let again: Vec<&str> = all_codes().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, again);
    }
}
