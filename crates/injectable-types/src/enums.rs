//! Administration-route vocabulary of the catalog.

use std::fmt;

/// Administration route of an injectable template.
///
/// The catalog stores the route as its display string, see [`Route::as_str`].
///
/// # Examples
///
/// ```
/// use injectable_types::Route;
///
/// assert_eq!(Route::default(), Route::IvOrIm);
/// assert_eq!(Route::IntraArticular.as_str(), "Intra-articular");
/// assert_eq!("SC".parse::<Route>(), Ok(Route::Subcutaneous));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Route {
    /// Either intravenous or intramuscular; used when the term names no route.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "IV/IM"))]
    IvOrIm,
    /// Intravenous.
    #[cfg_attr(feature = "serde", serde(rename = "IV"))]
    Intravenous,
    /// Intramuscular.
    #[cfg_attr(feature = "serde", serde(rename = "IM"))]
    Intramuscular,
    /// Subcutaneous.
    #[cfg_attr(feature = "serde", serde(rename = "SC"))]
    Subcutaneous,
    /// Into a joint space.
    #[cfg_attr(feature = "serde", serde(rename = "Intra-articular"))]
    IntraArticular,
    /// Into the subarachnoid space.
    Intrathecal,
    /// Into the dermis.
    Intradermal,
    /// Into the vitreous body of the eye.
    Intravitreal,
    /// Into the bone marrow cavity.
    Intraosseous,
    /// Into the epidural space.
    Epidural,
}

impl Route {
    /// All routes, default first.
    pub const ALL: [Route; 10] = [
        Route::IvOrIm,
        Route::Intravenous,
        Route::Intramuscular,
        Route::Subcutaneous,
        Route::IntraArticular,
        Route::Intrathecal,
        Route::Intradermal,
        Route::Intravitreal,
        Route::Intraosseous,
        Route::Epidural,
    ];

    /// Returns the catalog display string for this route.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IvOrIm => "IV/IM",
            Self::Intravenous => "IV",
            Self::Intramuscular => "IM",
            Self::Subcutaneous => "SC",
            Self::IntraArticular => "Intra-articular",
            Self::Intrathecal => "Intrathecal",
            Self::Intradermal => "Intradermal",
            Self::Intravitreal => "Intravitreal",
            Self::Intraosseous => "Intraosseous",
            Self::Epidural => "Epidural",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not part of the route vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoute(pub String);

impl fmt::Display for UnknownRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown route: {}", self.0)
    }
}

impl std::error::Error for UnknownRoute {}

impl std::str::FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| UnknownRoute(s.to_string()))
    }
}
