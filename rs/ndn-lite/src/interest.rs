use crate::name::Name;

/// A consumer request, as far as a producer needs to see one.
///
/// Interests are parsed by the face; reactive producers only inspect the name
/// and log the request.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Interest {
	pub name: Name,
	pub lifetime_ms: u64,
	pub must_be_fresh: bool,
}

impl Interest {
	pub fn new(name: Name) -> Self {
		Self {
			name,
			lifetime_ms: 4000,
			must_be_fresh: false,
		}
	}
}

impl std::fmt::Display for Interest {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		std::fmt::Display::fmt(&self.name, f)
	}
}
