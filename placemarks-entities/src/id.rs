use std::{borrow::Borrow, convert::Infallible, fmt, str::FromStr};

use crate::geo::MapPoint;

const DERIVED_ID_PREFIX: &str = "geo:";

/// Portable public identifier with a string representation.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Id(String);

impl Id {
    /// Derive a session-unique identifier from a geocoded
    /// address and the coordinates it was resolved for.
    ///
    /// Derived identifiers live in their own namespace and
    /// never collide with identifiers assigned by a service.
    pub fn derive_from_geocode(address: &str, pos: MapPoint) -> Self {
        let MapPoint { lat, lng } = pos;
        format!("{DERIVED_ID_PREFIX}{lat},{lng}:{address}").into()
    }

    pub fn is_derived(&self) -> bool {
        self.0.starts_with(DERIVED_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for Id {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl From<&str> for Id {
    fn from(from: &str) -> Self {
        from.to_owned().into()
    }
}

impl From<Id> for String {
    fn from(from: Id) -> Self {
        from.0
    }
}

impl FromStr for Id {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Id, Self::Err> {
        Ok(s.into())
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        self.as_ref()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(self.as_ref())
    }
}
