//! Conformance profiles and the registry mapping them to ordinal levels.

use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// Ordered conformance tier derived from a [`Profile`].
///
/// Every optional field of an invoice is gated against one of these tiers
/// (see [`super::gating`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConformanceLevel {
    /// 0: document-level totals only.
    Minimum,
    /// 1: header data and tax breakdown, no lines.
    BasicWl,
    /// 2: line items without the full EN 16931 data set.
    Basic,
    /// 3: full EN 16931 semantic model (and anything beyond it).
    En16931,
}

impl ConformanceLevel {
    /// All levels, lowest first.
    pub const ALL: [Self; 4] = [Self::Minimum, Self::BasicWl, Self::Basic, Self::En16931];

    /// Numeric tier (0 = MINIMUM … 3 = EN 16931).
    pub fn rank(self) -> u8 {
        match self {
            Self::Minimum => 0,
            Self::BasicWl => 1,
            Self::Basic => 2,
            Self::En16931 => 3,
        }
    }

    pub fn is_at_least(self, level: ConformanceLevel) -> bool {
        self >= level
    }

    pub fn is_above(self, level: ConformanceLevel) -> bool {
        self > level
    }
}

/// Result of a registry lookup. Unregistered profiles are reported, not guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelLookup {
    Known(ConformanceLevel),
    Unknown,
}

impl LevelLookup {
    /// The level, or `Minimum` for unknown profiles.
    pub fn or_minimum(self) -> ConformanceLevel {
        match self {
            Self::Known(level) => level,
            Self::Unknown => ConformanceLevel::Minimum,
        }
    }
}

/// What to do when the invoice profile is not in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownProfilePolicy {
    /// Treat the profile as MINIMUM and log a warning.
    #[default]
    DefaultToMinimum,
    /// Fail with a configuration error.
    Reject,
}

/// Output syntax family a profile is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Syntax {
    /// UN/CEFACT CII D16B (Factur-X / ZUGFeRD 2.x / XRechnung CII).
    FacturX,
    /// Legacy ZUGFeRD 1.0 CII (`CrossIndustryDocument`).
    Zugferd,
    /// OASIS UBL 2.1.
    Ubl,
}

/// CII-based conformance profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CiiProfile {
    /// Factur-X MINIMUM.
    Minimum,
    /// Factur-X BASIC WL (without lines).
    BasicWl,
    /// Factur-X BASIC.
    Basic,
    /// EN 16931 (Factur-X COMFORT).
    En16931,
    /// Factur-X / ZUGFeRD 2.1 EXTENDED.
    Extended,
    /// XRechnung (CII syntax).
    XRechnung,
    /// ZUGFeRD 1.0 BASIC.
    ZugferdBasic,
    /// ZUGFeRD 1.0 COMFORT.
    ZugferdComfort,
    /// ZUGFeRD 1.0 EXTENDED.
    ZugferdExtended,
}

impl CiiProfile {
    pub const ALL: [Self; 9] = [
        Self::Minimum,
        Self::BasicWl,
        Self::Basic,
        Self::En16931,
        Self::Extended,
        Self::XRechnung,
        Self::ZugferdBasic,
        Self::ZugferdComfort,
        Self::ZugferdExtended,
    ];

    /// Guideline identifier written to `GuidelineSpecifiedDocumentContextParameter`.
    pub fn urn(&self) -> &'static str {
        match self {
            Self::Minimum => "urn:factur-x.eu:1p0:minimum",
            Self::BasicWl => "urn:factur-x.eu:1p0:basicwl",
            Self::Basic => "urn:cen.eu:en16931:2017#compliant#urn:factur-x.eu:1p0:basic",
            Self::En16931 => "urn:cen.eu:en16931:2017",
            Self::Extended => "urn:cen.eu:en16931:2017#conformant#urn:zugferd.de:2p1:extended",
            Self::XRechnung => {
                "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_1.2"
            }
            Self::ZugferdBasic => "urn:ferd:CrossIndustryDocument:invoice:1p0:basic",
            Self::ZugferdComfort => "urn:ferd:CrossIndustryDocument:invoice:1p0:comfort",
            Self::ZugferdExtended => "urn:ferd:CrossIndustryDocument:invoice:1p0:extended",
        }
    }

    /// The XMP `ConformanceLevel` value used by PDF embedders.
    pub fn xmp_conformance_level(&self) -> &'static str {
        match self {
            Self::Minimum => "MINIMUM",
            Self::BasicWl => "BASIC WL",
            Self::Basic | Self::ZugferdBasic => "BASIC",
            Self::En16931 => "EN 16931",
            Self::ZugferdComfort => "COMFORT",
            Self::Extended | Self::ZugferdExtended => "EXTENDED",
            Self::XRechnung => "XRECHNUNG",
        }
    }

    /// The `AFRelationship` value for the PDF file specification.
    pub fn af_relationship(&self) -> &'static str {
        match self {
            Self::Minimum | Self::BasicWl => "Data",
            _ => "Alternative",
        }
    }

    pub fn syntax(&self) -> Syntax {
        match self {
            Self::ZugferdBasic | Self::ZugferdComfort | Self::ZugferdExtended => Syntax::Zugferd,
            _ => Syntax::FacturX,
        }
    }
}

/// UBL presets (national / community CIUS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UblPreset {
    Peppol,
    Nlcius,
    CiusRo,
    CiusIt,
    CiusEsFace,
    CiusAtGov,
    CiusAtNat,
    /// Malaysian MyInvois UBL.
    Malaysia,
}

impl UblPreset {
    pub const ALL: [Self; 8] = [
        Self::Peppol,
        Self::Nlcius,
        Self::CiusRo,
        Self::CiusIt,
        Self::CiusEsFace,
        Self::CiusAtGov,
        Self::CiusAtNat,
        Self::Malaysia,
    ];

    /// Short preset name, accepted by [`Profile::from_identifier`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Peppol => "PEPPOL",
            Self::Nlcius => "NLCIUS",
            Self::CiusRo => "CIUS-RO",
            Self::CiusIt => "CIUS-IT",
            Self::CiusEsFace => "CIUS-ES-FACE",
            Self::CiusAtGov => "CIUS-AT-GOV",
            Self::CiusAtNat => "CIUS-AT-NAT",
            Self::Malaysia => "MALAYSIA",
        }
    }

    /// BT-24 specification identifier. Malaysia carries none.
    pub fn customization_id(&self) -> Option<&'static str> {
        match self {
            Self::Peppol => Some(
                "urn:cen.eu:en16931:2017#compliant#urn:fdc:peppol.eu:2017:poacc:billing:3.0",
            ),
            Self::Nlcius => Some("urn:cen.eu:en16931:2017#compliant#urn:fdc:nen.nl:nlcius:v1.0"),
            Self::CiusRo => Some(
                "urn:cen.eu:en16931:2017#compliant#urn:efactura.mfinante.ro:CIUS-RO:1.0.1",
            ),
            Self::CiusIt => {
                Some("urn:cen.eu:en16931:2017#compliant#urn:fatturapa.gov.it:CIUS-IT:2.0.0")
            }
            Self::CiusEsFace => {
                Some("urn:cen.eu:en16931:2017#compliant#urn:feap.gov.es:cius-es-face:1.0")
            }
            Self::CiusAtGov => {
                Some("urn:cen.eu:en16931:2017#compliant#urn:erechnung.gv.at:cius-at-gov:1.0")
            }
            Self::CiusAtNat => {
                Some("urn:cen.eu:en16931:2017#compliant#urn:erechnung.gv.at:cius-at-nat:1.0")
            }
            Self::Malaysia => None,
        }
    }

    /// BT-23 business process identifier.
    pub fn profile_id(&self) -> Option<&'static str> {
        match self {
            Self::Peppol | Self::Nlcius => Some("urn:fdc:peppol.eu:2017:poacc:billing:01:1.0"),
            _ => None,
        }
    }
}

/// Named conformance target of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    Cii(CiiProfile),
    Ubl(UblPreset),
    /// An identifier no registry entry knows. Rendered as Factur-X CII.
    Unregistered(String),
}

impl Profile {
    /// Parse a profile from its URN, customization ID or preset name.
    ///
    /// Never fails: unknown identifiers become [`Profile::Unregistered`].
    pub fn from_identifier(id: &str) -> Self {
        let trimmed = id.trim();
        if let Some(p) = CiiProfile::ALL.iter().find(|p| p.urn() == trimmed) {
            return Self::Cii(*p);
        }
        if let Some(p) = UblPreset::ALL.iter().find(|p| {
            p.name().eq_ignore_ascii_case(trimmed) || p.customization_id() == Some(trimmed)
        }) {
            return Self::Ubl(*p);
        }
        Self::Unregistered(trimmed.to_string())
    }

    /// The identifier written into the document (URN, customization ID or preset name).
    pub fn identifier(&self) -> &str {
        match self {
            Self::Cii(p) => p.urn(),
            Self::Ubl(p) => p.customization_id().unwrap_or(p.name()),
            Self::Unregistered(id) => id,
        }
    }

    pub fn syntax(&self) -> Syntax {
        match self {
            Self::Cii(p) => p.syntax(),
            Self::Ubl(_) => Syntax::Ubl,
            Self::Unregistered(_) => Syntax::FacturX,
        }
    }
}

impl From<CiiProfile> for Profile {
    fn from(p: CiiProfile) -> Self {
        Self::Cii(p)
    }
}

impl From<UblPreset> for Profile {
    fn from(p: UblPreset) -> Self {
        Self::Ubl(p)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

static CII_LEVELS: &[(CiiProfile, ConformanceLevel)] = &[
    (CiiProfile::Minimum, ConformanceLevel::Minimum),
    (CiiProfile::BasicWl, ConformanceLevel::BasicWl),
    (CiiProfile::Basic, ConformanceLevel::Basic),
    (CiiProfile::En16931, ConformanceLevel::En16931),
    (CiiProfile::Extended, ConformanceLevel::En16931),
    (CiiProfile::XRechnung, ConformanceLevel::En16931),
    (CiiProfile::ZugferdBasic, ConformanceLevel::Basic),
    (CiiProfile::ZugferdComfort, ConformanceLevel::En16931),
    (CiiProfile::ZugferdExtended, ConformanceLevel::En16931),
];

static UBL_LEVELS: &[(UblPreset, ConformanceLevel)] = &[
    (UblPreset::Peppol, ConformanceLevel::En16931),
    (UblPreset::Nlcius, ConformanceLevel::En16931),
    (UblPreset::CiusRo, ConformanceLevel::En16931),
    (UblPreset::CiusIt, ConformanceLevel::En16931),
    (UblPreset::CiusEsFace, ConformanceLevel::En16931),
    (UblPreset::CiusAtGov, ConformanceLevel::En16931),
    (UblPreset::CiusAtNat, ConformanceLevel::En16931),
    (UblPreset::Malaysia, ConformanceLevel::En16931),
];

/// Static profile → conformance level table.
pub struct ProfileRegistry;

impl ProfileRegistry {
    /// Look up the level of a profile. Pure; no defaulting.
    pub fn level_of(profile: &Profile) -> LevelLookup {
        let found = match profile {
            Profile::Cii(p) => CII_LEVELS.iter().find(|(k, _)| k == p).map(|(_, l)| *l),
            Profile::Ubl(p) => UBL_LEVELS.iter().find(|(k, _)| k == p).map(|(_, l)| *l),
            Profile::Unregistered(_) => None,
        };
        found.map_or(LevelLookup::Unknown, LevelLookup::Known)
    }

    /// True if `profile` sits at `level` or higher. Unknown profiles count as MINIMUM.
    pub fn is_at_least(profile: &Profile, level: ConformanceLevel) -> bool {
        Self::level_of(profile).or_minimum().is_at_least(level)
    }

    /// True if `profile` sits strictly above `level`. Unknown profiles count as MINIMUM.
    pub fn is_above(profile: &Profile, level: ConformanceLevel) -> bool {
        Self::level_of(profile).or_minimum().is_above(level)
    }

    /// Resolve the level a builder works with, applying the caller's policy.
    pub fn resolve(
        profile: &Profile,
        policy: UnknownProfilePolicy,
    ) -> Result<ConformanceLevel, InvoiceError> {
        match (Self::level_of(profile), policy) {
            (LevelLookup::Known(level), _) => Ok(level),
            (LevelLookup::Unknown, UnknownProfilePolicy::DefaultToMinimum) => {
                tracing::warn!(
                    profile = %profile,
                    "profile is not registered, falling back to MINIMUM conformance level"
                );
                Ok(ConformanceLevel::Minimum)
            }
            (LevelLookup::Unknown, UnknownProfilePolicy::Reject) => Err(InvoiceError::config(
                format!("profile '{profile}' is not registered"),
            )),
        }
    }
}
