use time::OffsetDateTime;

/// Axis-aligned bounding box in degrees, `west <= east` and `south <= north`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BBox {
	pub west: f64,
	pub south: f64,
	pub east: f64,
	pub north: f64,
}

impl BBox {
	pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
		Self { west, south, east, north }
	}

	pub fn is_valid(&self) -> bool {
		self.west.is_finite()
			&& self.south.is_finite()
			&& self.east.is_finite()
			&& self.north.is_finite()
			&& self.west <= self.east
			&& self.south <= self.north
	}

	/// Intersection test inclusive of boundaries; boxes that only touch intersect.
	pub fn intersects(&self, other: &Self) -> bool {
		self.west <= other.east
			&& self.east >= other.west
			&& self.south <= other.north
			&& self.north >= other.south
	}

	pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
		lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
	}
}

/// Closed time interval, `begin <= end`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeInterval {
	#[serde(with = "crate::time_serde")]
	pub begin: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub end: OffsetDateTime,
}

impl TimeInterval {
	pub fn new(begin: OffsetDateTime, end: OffsetDateTime) -> Self {
		Self { begin, end }
	}

	pub fn is_valid(&self) -> bool {
		self.begin <= self.end
	}

	/// Intersection test inclusive of boundaries.
	pub fn intersects(&self, other: &Self) -> bool {
		self.begin <= other.end && self.end >= other.begin
	}

	pub fn contains(&self, instant: OffsetDateTime) -> bool {
		instant >= self.begin && instant <= self.end
	}
}
