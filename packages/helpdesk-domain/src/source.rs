use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Where a stored solution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionSource {
	ExternalDocument,
	Generated,
	Manual,
}
impl SolutionSource {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::ExternalDocument => "external_document",
			Self::Generated => "generated",
			Self::Manual => "manual",
		}
	}
}
impl fmt::Display for SolutionSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for SolutionSource {
	type Err = UnknownSource;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"external_document" => Ok(Self::ExternalDocument),
			"generated" => Ok(Self::Generated),
			"manual" => Ok(Self::Manual),
			other => Err(UnknownSource(other.to_string())),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSource(pub String);
impl fmt::Display for UnknownSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Unknown solution source {:?}.", self.0)
	}
}
impl std::error::Error for UnknownSource {}
