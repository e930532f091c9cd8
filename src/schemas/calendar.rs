use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utils::calendar::{MonthGrid, Selection};

/// The visitor's current selection, both ends are optional
///
/// `pick` is the day the visitor just clicked, it is applied to the
/// selection before the grid is rendered
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct CalendarQuery {
	pub start: Option<NaiveDate>,
	pub end:   Option<NaiveDate>,
	pub pick:  Option<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
	#[serde(flatten)]
	pub grid:      MonthGrid,
	/// The selection after applying `pick`
	pub selection: Selection,
	/// Whether both ends are chosen and the stay can be requested
	pub complete:  bool,
}
